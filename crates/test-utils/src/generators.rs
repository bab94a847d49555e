//! Synthetic artifact generators.
//!
//! These generators create predictable, verifiable artifacts of any size.
//! Values follow closed-form patterns so tests can compute expectations
//! without reading the generated data back.

use serde_json::{json, Value};

use crate::fixtures::METADATA_COLUMNS;

/// Two-letter codes handed out to synthetic states, in order.
const STATE_ABBREVIATIONS: [&str; 10] = ["AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA"];

/// Shape of a generated artifact.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSpec {
    pub states: usize,
    pub counties_per_state: usize,
    pub features: usize,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            states: 3,
            counties_per_state: 4,
            features: 5,
        }
    }
}

/// Name of the synthetic feature at `index`.
pub fn feature_name(index: usize) -> String {
    format!("Feature{:02}", index)
}

/// Synthetic FIPS code: state `s` gets code `(s + 1) * 2`, counties are odd numbers.
pub fn synthetic_fips(state: usize, county: usize) -> String {
    format!("{:02}{:03}", (state + 1) * 2, county * 2 + 1)
}

/// Attribution value for a cell.
///
/// `value = (feature + 1) * 0.01 * (row + 1) * sign`, where the sign flips
/// for odd features. Within a year the maximum is therefore held by the
/// highest even feature in the last row, and the minimum by the highest odd
/// feature in the last row.
pub fn synthetic_value(row: usize, feature: usize) -> f64 {
    let sign = if feature % 2 == 1 { -1.0 } else { 1.0 };
    (feature as f64 + 1.0) * 0.01 * (row as f64 + 1.0) * sign
}

/// Generate an artifact with one entry per year.
///
/// Every year uses the same counties; raw values are the attribution values
/// scaled by 100.
pub fn synthetic_artifact(years: &[&str], spec: SyntheticSpec) -> Value {
    let features: Vec<String> = (0..spec.features).map(feature_name).collect();
    let mut columns: Vec<String> = features.clone();
    columns.extend(METADATA_COLUMNS.iter().map(|c| c.to_string()));

    let mut shap_rows = Vec::new();
    let mut raw_rows = Vec::new();
    let mut row = 0;
    for state in 0..spec.states {
        let abbreviation = STATE_ABBREVIATIONS[state % STATE_ABBREVIATIONS.len()];
        for county in 0..spec.counties_per_state {
            let metadata = [
                json!(format!("County {}-{}", state, county)),
                json!(abbreviation),
                json!(synthetic_fips(state, county)),
                json!(5.0 + row as f64 * 0.25),
                json!(30.0 + state as f64),
                json!(-90.0 - county as f64),
            ];

            let mut shap: Vec<Value> = (0..spec.features)
                .map(|f| json!(synthetic_value(row, f)))
                .collect();
            shap.extend(metadata.iter().cloned());
            shap_rows.push(Value::Array(shap));

            let mut raw: Vec<Value> = (0..spec.features)
                .map(|f| json!(synthetic_value(row, f).abs() * 100.0))
                .collect();
            raw.extend(metadata);
            raw_rows.push(Value::Array(raw));

            row += 1;
        }
    }

    let mut artifact = serde_json::Map::new();
    for year in years {
        artifact.insert(
            year.to_string(),
            json!({
                "shap_values": { "columns": columns, "data": shap_rows },
                "processed_data": { "columns": columns, "data": raw_rows },
            }),
        );
    }
    Value::Object(artifact)
}

/// A closed square ring centered on `(lon, lat)`.
pub fn square_polygon(lon: f64, lat: f64, half_size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon - half_size, lat - half_size],
            [lon + half_size, lat - half_size],
            [lon + half_size, lat + half_size],
            [lon - half_size, lat + half_size],
            [lon - half_size, lat - half_size],
        ]]
    })
}

/// A county FeatureCollection in the layout of the Census/plotly county file:
/// `id` is the FIPS code and `properties` carry `STATE`, `COUNTY` and `NAME`.
pub fn boundary_collection(counties: &[(&str, &str, Value)]) -> Value {
    let features: Vec<Value> = counties
        .iter()
        .map(|(fips, name, geometry)| {
            json!({
                "type": "Feature",
                "id": fips,
                "properties": {
                    "GEO_ID": format!("0500000US{}", fips),
                    "STATE": &fips[..2],
                    "COUNTY": &fips[2..],
                    "NAME": name,
                    "LSAD": "County",
                },
                "geometry": geometry,
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Boundaries for every county of a synthetic artifact.
pub fn synthetic_boundaries(spec: SyntheticSpec) -> Value {
    let mut counties = Vec::new();
    for state in 0..spec.states {
        for county in 0..spec.counties_per_state {
            counties.push((
                synthetic_fips(state, county),
                format!("County {}-{}", state, county),
                square_polygon(-90.0 - county as f64, 30.0 + state as f64, 0.5),
            ));
        }
    }
    let borrowed: Vec<(&str, &str, Value)> = counties
        .iter()
        .map(|(fips, name, geometry)| (fips.as_str(), name.as_str(), geometry.clone()))
        .collect();
    boundary_collection(&borrowed)
}
