//! Serialized artifact layout.
//!
//! The offline pipeline exports one JSON document keyed by year. Tables use
//! the "split" orientation (`columns` header plus row-major `data`), so cell
//! types are only known once the trailing metadata block is located.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The whole artifact: year entries in document order.
///
/// Repeated year keys are kept, not merged, so the registry can reject them.
#[derive(Debug, Clone, Default)]
pub struct Artifact {
    pub years: Vec<(String, RawYearlyDataset)>,
}

impl Artifact {
    /// Year keys in document order, repeats included.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.years.iter().map(|(year, _)| year)
    }
}

impl IntoIterator for Artifact {
    type Item = (String, RawYearlyDataset);
    type IntoIter = std::vec::IntoIter<(String, RawYearlyDataset)>;

    fn into_iter(self) -> Self::IntoIter {
        self.years.into_iter()
    }
}

impl<'de> Deserialize<'de> for Artifact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArtifactVisitor;

        impl<'de> Visitor<'de> for ArtifactVisitor {
            type Value = Artifact;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of year to dataset")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Artifact, A::Error> {
                let mut years = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RawYearlyDataset>()? {
                    years.push(entry);
                }
                Ok(Artifact { years })
            }
        }

        deserializer.deserialize_map(ArtifactVisitor)
    }
}

/// One year's tables as serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawYearlyDataset {
    pub shap_values: RawTable,

    pub processed_data: RawTable,

    /// Per-row ranked feature names, aligned with `shap_values` rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_features: Option<Vec<Vec<String>>>,
}

/// A table in split orientation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,

    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Remove a column from the header and every row, returning its cells.
    ///
    /// Rows shorter than the header yield `Value::Null` for the removed cell;
    /// width mismatches are reported later by the schema check.
    pub fn take_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let idx = self.column_index(name)?;
        self.columns.remove(idx);
        let cells = self
            .data
            .iter_mut()
            .map(|row| {
                if idx < row.len() {
                    row.remove(idx)
                } else {
                    Value::Null
                }
            })
            .collect();
        Some(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_preserves_year_order() {
        let json = r#"{
            "2021": {"shap_values": {"columns": [], "data": []}, "processed_data": {"columns": []}},
            "2012": {"shap_values": {"columns": [], "data": []}, "processed_data": {"columns": []}},
            "2019": {"shap_values": {"columns": [], "data": []}, "processed_data": {"columns": []}}
        }"#;
        let artifact: Artifact = serde_json::from_str(json).unwrap();
        let years: Vec<&str> = artifact.keys().map(String::as_str).collect();
        assert_eq!(years, vec!["2021", "2012", "2019"]);
    }

    #[test]
    fn test_artifact_keeps_repeated_years() {
        let json = r#"{
            "2021": {"shap_values": {"columns": ["a"]}, "processed_data": {"columns": []}},
            "2021": {"shap_values": {"columns": ["b"]}, "processed_data": {"columns": []}}
        }"#;
        let artifact: Artifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.years.len(), 2);
        assert_eq!(artifact.years[0].1.shap_values.columns, vec!["a".to_string()]);
        assert_eq!(artifact.years[1].1.shap_values.columns, vec!["b".to_string()]);
    }

    #[test]
    fn test_take_column() {
        let mut table = RawTable {
            columns: vec!["a".into(), "Top_Features".into(), "b".into()],
            data: vec![vec![json!(1), json!(["x"]), json!(2)], vec![json!(3)]],
        };
        let taken = table.take_column("Top_Features").unwrap();
        assert_eq!(taken, vec![json!(["x"]), Value::Null]);
        assert_eq!(table.columns, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(table.data[0], vec![json!(1), json!(2)]);
        assert!(table.take_column("missing").is_none());
    }
}
