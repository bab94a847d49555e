//! The year-keyed dataset registry.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use atlas_common::{AtlasError, AtlasResult, Year};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::artifact::{Artifact, RawYearlyDataset};
use crate::table::{FeatureTable, TableKind};

/// One year of precomputed data. Immutable after construction.
#[derive(Debug, Clone)]
pub struct YearlyDataset {
    year: Year,
    shap_values: FeatureTable,
    processed_data: FeatureTable,
    top_features: Option<Vec<Vec<String>>>,
}

impl YearlyDataset {
    /// Assemble a year from typed tables.
    ///
    /// The raw-value table must describe the same counties in the same order
    /// as the attribution table, and any precomputed ranking must have one
    /// entry per row.
    pub fn new(
        year: Year,
        shap_values: FeatureTable,
        processed_data: FeatureTable,
        top_features: Option<Vec<Vec<String>>>,
    ) -> AtlasResult<Self> {
        if shap_values.len() != processed_data.len() {
            return Err(AtlasError::schema(
                year.as_str(),
                TableKind::ProcessedData.as_str(),
                format!(
                    "{} rows, but {} has {}",
                    processed_data.len(),
                    TableKind::ShapValues,
                    shap_values.len()
                ),
            ));
        }

        let mismatch = shap_values
            .records()
            .iter()
            .zip(processed_data.records())
            .position(|(a, b)| a.fips != b.fips);
        if let Some(row) = mismatch {
            return Err(AtlasError::schema(
                year.as_str(),
                TableKind::ProcessedData.as_str(),
                format!(
                    "row {} is county {}, but {} row {} is county {}",
                    row,
                    processed_data.records()[row].fips,
                    TableKind::ShapValues,
                    row,
                    shap_values.records()[row].fips
                ),
            ));
        }

        if let Some(ranked) = &top_features {
            if ranked.len() != shap_values.len() {
                return Err(AtlasError::schema(
                    year.as_str(),
                    "top_features",
                    format!("{} entries for {} rows", ranked.len(), shap_values.len()),
                ));
            }
        }

        Ok(Self {
            year,
            shap_values,
            processed_data,
            top_features,
        })
    }

    /// Parse and validate one year of the serialized artifact.
    pub fn from_raw(year: Year, raw: RawYearlyDataset) -> AtlasResult<Self> {
        let (shap_values, embedded) =
            FeatureTable::from_raw(raw.shap_values, &year, TableKind::ShapValues)?;
        let (processed_data, _) =
            FeatureTable::from_raw(raw.processed_data, &year, TableKind::ProcessedData)?;

        let top_features = match (raw.top_features, embedded) {
            (Some(_), Some(_)) => {
                return Err(AtlasError::schema(
                    year.as_str(),
                    TableKind::ShapValues.as_str(),
                    "top features given both as a column and as a separate list",
                ))
            }
            (explicit, embedded) => explicit.or(embedded),
        };

        Self::new(year, shap_values, processed_data, top_features)
    }

    pub fn year(&self) -> &Year {
        &self.year
    }

    /// Attribution values per county.
    pub fn shap_values(&self) -> &FeatureTable {
        &self.shap_values
    }

    /// Raw feature values per county.
    pub fn processed_data(&self) -> &FeatureTable {
        &self.processed_data
    }

    pub fn table(&self, kind: TableKind) -> &FeatureTable {
        match kind {
            TableKind::ShapValues => &self.shap_values,
            TableKind::ProcessedData => &self.processed_data,
        }
    }

    pub fn has_top_features(&self) -> bool {
        self.top_features.is_some()
    }

    /// The precomputed ranking for one row, if this dataset carries one.
    pub fn top_features(&self, row: usize) -> Option<&[String]> {
        self.top_features
            .as_ref()
            .and_then(|ranked| ranked.get(row))
            .map(Vec::as_slice)
    }
}

/// Ordered collection of yearly datasets.
///
/// Years keep the order they were loaded in; the first is the default shown
/// to a new session. There are no mutation operations.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    datasets: IndexMap<Year, YearlyDataset>,
    default_year: Year,
}

impl DatasetRegistry {
    /// Load the registry from an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AtlasError::DataUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loading dataset artifact");
        Self::from_reader(BufReader::new(file))
    }

    /// Load the registry from any reader producing the JSON artifact.
    pub fn from_reader(reader: impl Read) -> AtlasResult<Self> {
        let artifact: Artifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    /// Load the registry from the JSON artifact text.
    pub fn from_json(json: &str) -> AtlasResult<Self> {
        let artifact: Artifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: Artifact) -> AtlasResult<Self> {
        let datasets = artifact
            .into_iter()
            .map(|(year, raw)| YearlyDataset::from_raw(Year::from(year), raw))
            .collect::<AtlasResult<Vec<_>>>()?;
        Self::from_datasets(datasets)
    }

    /// Build a registry from already-constructed datasets, keeping their order.
    pub fn from_datasets(datasets: impl IntoIterator<Item = YearlyDataset>) -> AtlasResult<Self> {
        let mut map = IndexMap::new();
        for dataset in datasets {
            let year = dataset.year().clone();
            debug!(
                year = %year,
                counties = dataset.shap_values().len(),
                features = dataset.shap_values().features().len(),
                "Registered dataset"
            );
            if map.insert(year.clone(), dataset).is_some() {
                return Err(AtlasError::schema(
                    year.as_str(),
                    TableKind::ShapValues.as_str(),
                    "year appears more than once",
                ));
            }
        }

        let default_year = match map.keys().next() {
            Some(year) => year.clone(),
            None => {
                return Err(AtlasError::DataUnavailable(
                    "artifact contains no yearly datasets".to_string(),
                ))
            }
        };

        info!(years = map.len(), default_year = %default_year, "Dataset registry loaded");
        Ok(Self {
            datasets: map,
            default_year,
        })
    }

    /// Years in load order.
    pub fn years(&self) -> Vec<Year> {
        self.datasets.keys().cloned().collect()
    }

    /// The first loaded year.
    pub fn default_year(&self) -> &Year {
        &self.default_year
    }

    pub fn get(&self, year: &str) -> AtlasResult<&YearlyDataset> {
        self.datasets
            .get(year)
            .ok_or_else(|| AtlasError::UnknownYear {
                year: year.to_string(),
                available: self.datasets.keys().map(|y| y.to_string()).collect(),
            })
    }

    pub fn contains(&self, year: &str) -> bool {
        self.datasets.contains_key(year)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &YearlyDataset> {
        self.datasets.values()
    }
}
