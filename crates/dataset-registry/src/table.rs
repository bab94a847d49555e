//! Typed county tables.
//!
//! Serialized tables carry their metadata as the last [`METADATA_WIDTH`]
//! columns. [`FeatureTable::from_raw`] checks that layout once and splits
//! every row into named metadata fields plus a feature vector, so nothing
//! downstream depends on column positions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use atlas_common::{
    AtlasError, AtlasResult, Fips, Year, COUNTY_COLUMN, FIPS_COLUMN, METADATA_WIDTH,
    OUTCOME_COLUMN, REQUIRED_METADATA, STATE_COLUMN, TOP_FEATURES_COLUMN,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::artifact::RawTable;

/// Which of a year's two tables a [`FeatureTable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Attribution values
    ShapValues,
    /// Raw feature values
    ProcessedData,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::ShapValues => "shap_values",
            TableKind::ProcessedData => "processed_data",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One county row.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub county: String,
    pub state: String,
    pub fips: Fips,

    /// Diagnosed diabetes prevalence (percent), NaN when missing
    pub outcome: f64,

    /// Reserved metadata columns (e.g. `Lat`, `Lon`), in table order
    pub extra: IndexMap<String, Value>,

    /// Feature values aligned with [`FeatureTable::features`], NaN when missing
    pub values: Vec<f64>,
}

impl CountyRecord {
    pub fn new(
        county: impl Into<String>,
        state: impl Into<String>,
        fips: Fips,
        outcome: f64,
        values: Vec<f64>,
    ) -> Self {
        Self {
            county: county.into(),
            state: state.into(),
            fips,
            outcome,
            extra: IndexMap::new(),
            values,
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

/// A table of county rows with named feature columns.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    features: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<CountyRecord>,
}

impl FeatureTable {
    /// Build a table from already-typed rows.
    ///
    /// Fails if a feature name repeats, collides with a metadata column, or a
    /// row's value count differs from the feature count.
    pub fn new(features: Vec<String>, records: Vec<CountyRecord>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(features.len());
        for (i, name) in features.iter().enumerate() {
            if REQUIRED_METADATA.contains(&name.as_str()) {
                return Err(format!("feature column '{}' shadows a metadata column", name));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("duplicate feature column '{}'", name));
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.values.len() != features.len() {
                return Err(format!(
                    "row {} has {} feature values, expected {}",
                    row,
                    record.values.len(),
                    features.len()
                ));
            }
        }

        Ok(Self {
            features,
            index,
            records,
        })
    }

    /// Parse a serialized table, enforcing the trailing-metadata layout.
    ///
    /// A `Top_Features` column, if present, is lifted out before the layout
    /// check and returned separately.
    pub fn from_raw(
        mut raw: RawTable,
        year: &Year,
        kind: TableKind,
    ) -> AtlasResult<(Self, Option<Vec<Vec<String>>>)> {
        let violation = |reason: String| AtlasError::schema(year.as_str(), kind.as_str(), reason);

        let top_features = match raw.take_column(TOP_FEATURES_COLUMN) {
            Some(cells) => Some(
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(row, cell)| parse_ranked_features(cell, row))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(violation)?,
            ),
            None => None,
        };

        let width = raw.columns.len();
        if width < METADATA_WIDTH {
            return Err(violation(format!(
                "table has {} columns, expected at least {} trailing metadata columns",
                width, METADATA_WIDTH
            )));
        }

        let split = width - METADATA_WIDTH;
        let (feature_names, metadata_names) = raw.columns.split_at(split);

        let mut seen = HashSet::new();
        for name in metadata_names {
            if !seen.insert(name.as_str()) {
                return Err(violation(format!("duplicate metadata column '{}'", name)));
            }
        }

        let mut required = HashMap::new();
        for name in REQUIRED_METADATA {
            match metadata_names.iter().position(|c| c == name) {
                Some(pos) => {
                    required.insert(name, split + pos);
                }
                None => {
                    let reason = if feature_names.iter().any(|c| c == name) {
                        format!(
                            "metadata column '{}' is outside the trailing {} columns",
                            name, METADATA_WIDTH
                        )
                    } else {
                        format!("missing metadata column '{}'", name)
                    };
                    return Err(violation(reason));
                }
            }
        }
        let extra_columns: Vec<(usize, &String)> = metadata_names
            .iter()
            .enumerate()
            .filter(|(_, name)| !REQUIRED_METADATA.contains(&name.as_str()))
            .map(|(pos, name)| (split + pos, name))
            .collect();

        let mut records = Vec::with_capacity(raw.data.len());
        for (row, cells) in raw.data.iter().enumerate() {
            if cells.len() != width {
                return Err(violation(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    width
                )));
            }

            let values = cells[..split]
                .iter()
                .zip(feature_names)
                .map(|(cell, name)| {
                    parse_number(cell)
                        .ok_or_else(|| format!("row {} column '{}' is not numeric: {}", row, name, cell))
                })
                .collect::<Result<Vec<f64>, String>>()
                .map_err(violation)?;

            let county = parse_label(&cells[required[COUNTY_COLUMN]])
                .ok_or_else(|| violation(format!("row {} has no {}", row, COUNTY_COLUMN)))?;
            let state = parse_label(&cells[required[STATE_COLUMN]])
                .ok_or_else(|| violation(format!("row {} has no {}", row, STATE_COLUMN)))?;
            let fips = parse_fips(&cells[required[FIPS_COLUMN]])
                .ok_or_else(|| {
                    violation(format!(
                        "row {} has invalid {}: {}",
                        row,
                        FIPS_COLUMN,
                        cells[required[FIPS_COLUMN]]
                    ))
                })?;
            let outcome = parse_number(&cells[required[OUTCOME_COLUMN]]).ok_or_else(|| {
                violation(format!("row {} {} is not numeric", row, OUTCOME_COLUMN))
            })?;

            let mut record = CountyRecord::new(county, state, fips, outcome, values);
            for (idx, name) in &extra_columns {
                record.extra.insert((*name).clone(), cells[*idx].clone());
            }
            records.push(record);
        }

        if let Some(ranked) = &top_features {
            if ranked.len() != records.len() {
                return Err(violation(format!(
                    "{} has {} entries for {} rows",
                    TOP_FEATURES_COLUMN,
                    ranked.len(),
                    records.len()
                )));
            }
        }

        let table = FeatureTable::new(feature_names.to_vec(), records).map_err(violation)?;
        Ok((table, top_features))
    }

    /// Feature column names in table order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn records(&self) -> &[CountyRecord] {
        &self.records
    }

    pub fn record(&self, row: usize) -> Option<&CountyRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A feature's value in one row.
    pub fn value(&self, row: usize, feature: &str) -> Option<f64> {
        let col = self.feature_index(feature)?;
        self.records.get(row).map(|r| r.values[col])
    }

    /// Every row's value of one feature, in row order.
    pub fn column(&self, feature: &str) -> Option<impl Iterator<Item = f64> + '_> {
        let col = self.feature_index(feature)?;
        Some(self.records.iter().map(move |r| r.values[col]))
    }

    /// Rows whose `State` equals `state`, with their row indices.
    pub fn rows_in_state<'a>(
        &'a self,
        state: &'a str,
    ) -> impl Iterator<Item = (usize, &'a CountyRecord)> + 'a {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.state == state)
    }

    /// First row for a state/county pair.
    pub fn find_county<'a>(&'a self, state: &str, county: &str) -> Option<(usize, &'a CountyRecord)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.state == state && r.county == county)
    }
}

fn parse_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::Null => Some(f64::NAN),
        _ => None,
    }
}

fn parse_label(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_fips(cell: &Value) -> Option<Fips> {
    match cell {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => {
            if let Some(code) = n.as_u64() {
                return Fips::from_number(code).ok();
            }
            // Float-typed codes such as 1001.0 after a pandas merge.
            let code = n.as_f64()?;
            if code.fract() == 0.0 && code >= 0.0 {
                Fips::from_number(code as u64).ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_ranked_features(cell: Value, row: usize) -> Result<Vec<String>, String> {
    match cell {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(format!(
                    "row {} {} entry is not a feature name: {}",
                    row, TOP_FEATURES_COLUMN, other
                )),
            })
            .collect(),
        other => Err(format!(
            "row {} {} is not a list: {}",
            row, TOP_FEATURES_COLUMN, other
        )),
    }
}
