//! Tests for loading and validating the dataset registry.

use atlas_common::AtlasError;
use dataset_registry::{CountyRecord, DatasetRegistry, FeatureTable, YearlyDataset};
use serde_json::json;
use test_utils::{
    cascade_artifact, example_2021_artifact, synthetic_artifact, write_temp_json, SyntheticSpec,
};

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_example_artifact() {
    let registry = DatasetRegistry::from_json(&example_2021_artifact().to_string()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.default_year().as_str(), "2021");

    let dataset = registry.get("2021").unwrap();
    let shap = dataset.shap_values();
    assert_eq!(shap.features(), ["FoodInsecurity", "Poverty"]);
    assert_eq!(shap.len(), 3);
    assert_eq!(shap.record(2).unwrap().county, "Los Angeles");
    assert_eq!(shap.value(2, "Poverty"), Some(0.9));
    assert!(!dataset.has_top_features());
}

#[test]
fn test_years_keep_load_order() {
    let registry = DatasetRegistry::from_json(&cascade_artifact().to_string()).unwrap();
    let years: Vec<String> = registry.years().iter().map(|y| y.to_string()).collect();
    assert_eq!(years, vec!["2021", "2019"]);
    assert_eq!(registry.default_year().as_str(), "2021");
}

#[test]
fn test_years_keep_load_order_for_many_years() {
    let artifact = synthetic_artifact(&["2016", "2021", "2012", "2019"], SyntheticSpec::default());
    let registry = DatasetRegistry::from_json(&artifact.to_string()).unwrap();
    let years: Vec<String> = registry.years().iter().map(|y| y.to_string()).collect();
    assert_eq!(years, vec!["2016", "2021", "2012", "2019"]);
}

#[test]
fn test_load_from_path() {
    let file = write_temp_json(&cascade_artifact());
    let registry = DatasetRegistry::from_path(file.path()).unwrap();
    assert!(registry.contains("2019"));
    assert_eq!(
        registry.get("2019").unwrap().top_features(0).unwrap()[0],
        "Obesity"
    );
}

#[test]
fn test_missing_file_is_data_unavailable() {
    let err = DatasetRegistry::from_path("/nonexistent/visual_datasets.json").unwrap_err();
    assert!(matches!(err, AtlasError::DataUnavailable(_)));
}

#[test]
fn test_corrupt_artifact_is_data_unavailable() {
    let err = DatasetRegistry::from_json("{\"2021\": [1, 2").unwrap_err();
    assert!(matches!(err, AtlasError::DataUnavailable(_)));
}

#[test]
fn test_empty_artifact_is_data_unavailable() {
    let err = DatasetRegistry::from_json("{}").unwrap_err();
    assert!(matches!(err, AtlasError::DataUnavailable(_)));
}

#[test]
fn test_unknown_year_lists_alternatives() {
    let registry = DatasetRegistry::from_json(&cascade_artifact().to_string()).unwrap();
    match registry.get("1999") {
        Err(AtlasError::UnknownYear { year, available }) => {
            assert_eq!(year, "1999");
            assert_eq!(available, vec!["2021".to_string(), "2019".to_string()]);
        }
        other => panic!("expected UnknownYear, got {:?}", other.map(|d| d.year().clone())),
    }
}

// ============================================================================
// Schema validation
// ============================================================================

#[test]
fn test_missing_metadata_column_is_schema_violation() {
    let mut artifact = example_2021_artifact();
    artifact["2021"]["shap_values"]["columns"][3] = json!("Region");
    let err = DatasetRegistry::from_json(&artifact.to_string()).unwrap_err();
    match err {
        AtlasError::SchemaViolation { year, table, reason } => {
            assert_eq!(year, "2021");
            assert_eq!(table, "shap_values");
            assert!(reason.contains("State"), "reason: {}", reason);
        }
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_removed_metadata_column_is_schema_violation() {
    // Without County the trailing six columns start at a feature column.
    let mut artifact = example_2021_artifact();
    let table = &mut artifact["2021"]["processed_data"];
    table["columns"].as_array_mut().unwrap().remove(2);
    for row in table["data"].as_array_mut().unwrap() {
        row.as_array_mut().unwrap().remove(2);
    }
    let err = DatasetRegistry::from_json(&artifact.to_string()).unwrap_err();
    match err {
        AtlasError::SchemaViolation { table, reason, .. } => {
            assert_eq!(table, "processed_data");
            assert!(reason.contains("County"), "reason: {}", reason);
        }
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_row_identity_mismatch_is_schema_violation() {
    let mut artifact = example_2021_artifact();
    artifact["2021"]["processed_data"]["data"][1][4] = json!("01005");
    let err = DatasetRegistry::from_json(&artifact.to_string()).unwrap_err();
    match err {
        AtlasError::SchemaViolation { table, reason, .. } => {
            assert_eq!(table, "processed_data");
            assert!(reason.contains("01005"));
        }
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_top_features_length_mismatch() {
    let mut artifact = cascade_artifact();
    artifact["2019"]["top_features"] = json!([["Obesity"]]);
    let err = DatasetRegistry::from_json(&artifact.to_string()).unwrap_err();
    assert!(matches!(err, AtlasError::SchemaViolation { .. }));
}

// ============================================================================
// In-memory construction
// ============================================================================

#[test]
fn test_from_datasets_rejects_duplicate_year() {
    let build = || {
        let table = FeatureTable::new(
            vec!["Poverty".to_string()],
            vec![CountyRecord::new(
                "Autauga",
                "AL",
                "01001".parse().unwrap(),
                9.1,
                vec![0.3],
            )],
        )
        .unwrap();
        YearlyDataset::new("2021".into(), table.clone(), table, None).unwrap()
    };

    let err = DatasetRegistry::from_datasets(vec![build(), build()]).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_repeated_year_key_in_artifact_is_schema_violation() {
    let year = example_2021_artifact()["2021"].to_string();
    let json = format!(r#"{{"2021": {0}, "2019": {0}, "2021": {0}}}"#, year);

    let err = DatasetRegistry::from_json(&json).unwrap_err();
    assert!(matches!(err, AtlasError::SchemaViolation { ref year, .. } if year == "2021"));
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_find_county_outlives_its_query() {
    let registry = DatasetRegistry::from_json(&cascade_artifact().to_string()).unwrap();
    let table = registry.get("2021").unwrap().shap_values();

    let found = {
        let state = String::from("AL");
        let county = String::from("Baldwin");
        table.find_county(&state, &county)
    };
    let (row, record) = found.unwrap();
    assert_eq!(row, 1);
    assert_eq!(record.fips.as_str(), "01003");

    assert!(table.find_county("CA", "Baldwin").is_none());
}
