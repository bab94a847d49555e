//! FIPS-keyed county boundary lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use atlas_common::fips::STATE_CODE_WIDTH;
use atlas_common::{AtlasError, AtlasResult, Fips};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::geojson::{Bounds, Feature, FeatureCollection, Geometry};

/// One county polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyBoundary {
    pub fips: Fips,

    /// Two-digit state code from the `STATE` property
    pub state_code: String,

    pub name: Option<String>,

    pub geometry: Geometry,

    pub bounds: Option<Bounds>,
}

impl CountyBoundary {
    /// Build a boundary from a GeoJSON feature.
    ///
    /// The FIPS code is the feature `id`, or `STATE` + `COUNTY` when the id
    /// is missing. The state code is the `STATE` property, or the first two
    /// digits of the FIPS code. Features without geometry are rejected.
    pub fn from_feature(feature: Feature) -> Result<Self, String> {
        let fips = feature_fips(&feature)?;

        let state_code = feature
            .property_str("STATE")
            .unwrap_or_else(|| fips.state_code().to_string());
        if state_code.len() != STATE_CODE_WIDTH {
            return Err(format!("county {} has malformed STATE '{}'", fips, state_code));
        }

        let name = feature.property_str("NAME");
        let geometry = feature
            .geometry
            .ok_or_else(|| format!("county {} has no geometry", fips))?;
        let bounds = geometry.bounds();

        Ok(Self {
            fips,
            state_code,
            name,
            geometry,
            bounds,
        })
    }
}

fn feature_fips(feature: &Feature) -> Result<Fips, String> {
    match &feature.id {
        Some(Value::String(id)) => id
            .parse()
            .map_err(|e| format!("feature id: {}", e)),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| format!("feature id {} is not a county code", n))
            .and_then(|code| Fips::from_number(code).map_err(|e| e.to_string())),
        _ => {
            let state = feature.property_str("STATE");
            let county = feature.property_str("COUNTY");
            match (state, county) {
                (Some(state), Some(county)) => format!("{}{}", state, county)
                    .parse()
                    .map_err(|e| format!("STATE/COUNTY properties: {}", e)),
                _ => Err("feature has neither an id nor STATE/COUNTY properties".to_string()),
            }
        }
    }
}

/// Static county boundary collection, loaded once.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCollection {
    boundaries: Vec<CountyBoundary>,
    index: HashMap<Fips, usize>,
}

impl BoundaryCollection {
    /// Load boundaries from a GeoJSON file.
    pub fn from_path(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AtlasError::DataUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loading county boundaries");
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> AtlasResult<Self> {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        Self::from_feature_collection(collection)
    }

    pub fn from_json(json: &str) -> AtlasResult<Self> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        Self::from_feature_collection(collection)
    }

    /// Index a parsed FeatureCollection by FIPS code.
    ///
    /// Unusable features are skipped with a warning; a duplicate FIPS keeps
    /// the first occurrence. A collection with no usable county at all is
    /// treated as unavailable.
    pub fn from_feature_collection(collection: FeatureCollection) -> AtlasResult<Self> {
        let total = collection.features.len();
        let mut boundaries = Vec::with_capacity(total);
        let mut index = HashMap::with_capacity(total);
        let mut skipped = 0usize;

        for feature in collection.features {
            match CountyBoundary::from_feature(feature) {
                Ok(boundary) => {
                    if index.contains_key(&boundary.fips) {
                        warn!(fips = %boundary.fips, "Duplicate county boundary ignored");
                        skipped += 1;
                        continue;
                    }
                    index.insert(boundary.fips.clone(), boundaries.len());
                    boundaries.push(boundary);
                }
                Err(reason) => {
                    debug!(%reason, "Skipping boundary feature");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, total, "Some boundary features were not usable");
        }

        if boundaries.is_empty() {
            return Err(AtlasError::DataUnavailable(format!(
                "boundary collection has no usable county features ({} features read)",
                total
            )));
        }

        info!(counties = boundaries.len(), "County boundaries loaded");
        Ok(Self { boundaries, index })
    }

    pub fn get(&self, fips: &Fips) -> Option<&CountyBoundary> {
        self.index.get(fips).map(|&i| &self.boundaries[i])
    }

    pub fn contains(&self, fips: &Fips) -> bool {
        self.index.contains_key(fips)
    }

    /// Boundaries whose state code equals `state_code`, in file order.
    pub fn for_state<'a>(&'a self, state_code: &'a str) -> impl Iterator<Item = &'a CountyBoundary> + 'a {
        self.boundaries
            .iter()
            .filter(move |b| b.state_code == state_code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountyBoundary> {
        self.boundaries.iter()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_fips_from_state_and_county_properties() {
        let feature = Feature::new(square())
            .with_property("STATE", json!("06"))
            .with_property("COUNTY", json!("037"));
        let boundary = CountyBoundary::from_feature(feature).unwrap();
        assert_eq!(boundary.fips.as_str(), "06037");
        assert_eq!(boundary.state_code, "06");
    }

    #[test]
    fn test_numeric_id_is_padded() {
        let mut feature = Feature::new(square());
        feature.id = Some(json!(1001));
        let boundary = CountyBoundary::from_feature(feature).unwrap();
        assert_eq!(boundary.fips.as_str(), "01001");
        assert_eq!(boundary.state_code, "01");
    }

    #[test]
    fn test_feature_without_geometry_is_rejected() {
        let mut feature = Feature::new(square()).with_id("01001");
        feature.geometry = None;
        assert!(CountyBoundary::from_feature(feature).is_err());
    }

    #[test]
    fn test_duplicate_fips_keeps_first() {
        let first = Feature::new(square())
            .with_id("01001")
            .with_property("NAME", json!("First"));
        let second = Feature::new(square())
            .with_id("01001")
            .with_property("NAME", json!("Second"));
        let collection = BoundaryCollection::from_feature_collection(
            FeatureCollection::new().with_feature(first).with_feature(second),
        )
        .unwrap();
        assert_eq!(collection.len(), 1);
        let fips: Fips = "01001".parse().unwrap();
        assert_eq!(collection.get(&fips).unwrap().name.as_deref(), Some("First"));
    }
}
