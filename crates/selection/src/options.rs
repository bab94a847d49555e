//! Valid choices for each selection field.

use atlas_common::{AtlasError, AtlasResult};
use dataset_registry::{FeatureTable, YearlyDataset};
use ranking::top_values_by_column;

fn ranked_features(table: &FeatureTable) -> Vec<String> {
    top_values_by_column(table)
        .into_iter()
        .map(|c| c.feature)
        .collect()
}

/// Attribution factors, highest column maximum first.
///
/// The first entry is the default factor for the year.
pub fn available_factors(dataset: &YearlyDataset) -> Vec<String> {
    ranked_features(dataset.shap_values())
}

/// Raw-value factors, ordered the same way over the raw table.
pub fn available_raw_factors(dataset: &YearlyDataset) -> Vec<String> {
    ranked_features(dataset.processed_data())
}

/// Distinct states present in the year, sorted.
pub fn available_states(dataset: &YearlyDataset) -> Vec<String> {
    let mut states: Vec<String> = dataset
        .shap_values()
        .records()
        .iter()
        .map(|r| r.state.clone())
        .collect();
    states.sort();
    states.dedup();
    states
}

/// Distinct counties of one state, sorted.
pub fn available_counties(dataset: &YearlyDataset, state: &str) -> AtlasResult<Vec<String>> {
    let mut counties: Vec<String> = dataset
        .shap_values()
        .rows_in_state(state)
        .map(|(_, r)| r.county.clone())
        .collect();

    if counties.is_empty() {
        return Err(AtlasError::UnknownState {
            state: state.to_string(),
            available: available_states(dataset),
        });
    }

    counties.sort();
    counties.dedup();
    Ok(counties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_common::{Fips, Year};
    use dataset_registry::CountyRecord;

    fn dataset() -> YearlyDataset {
        let rows = [
            ("Pima", "AZ", "04019"),
            ("Cochise", "AZ", "04003"),
            ("Mobile", "AL", "01097"),
            ("Cochise", "AZ", "04003"),
        ];
        let records: Vec<CountyRecord> = rows
            .iter()
            .map(|(county, state, fips)| {
                let fips: Fips = fips.parse().unwrap();
                CountyRecord::new(*county, *state, fips, 10.0, vec![0.1])
            })
            .collect();
        let table = FeatureTable::new(vec!["Smoking".to_string()], records).unwrap();
        YearlyDataset::new(Year::from("2020"), table.clone(), table, None).unwrap()
    }

    #[test]
    fn test_states_sorted_and_distinct() {
        assert_eq!(available_states(&dataset()), vec!["AL", "AZ"]);
    }

    #[test]
    fn test_counties_sorted_and_distinct() {
        assert_eq!(
            available_counties(&dataset(), "AZ").unwrap(),
            vec!["Cochise", "Pima"]
        );
    }

    #[test]
    fn test_counties_for_unknown_state() {
        match available_counties(&dataset(), "CA").unwrap_err() {
            AtlasError::UnknownState { state, available } => {
                assert_eq!(state, "CA");
                assert_eq!(available, vec!["AL", "AZ"]);
            }
            other => panic!("expected UnknownState, got {:?}", other),
        }
    }
}
