//! HTTP handler tests against fixture data.

use std::sync::Arc;

use atlas_api::config::AtlasConfig;
use atlas_api::routes;
use atlas_api::state::AppState;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use boundaries::BoundaryCollection;
use dataset_registry::DatasetRegistry;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use test_utils::{
    cascade_artifact, county_boundaries, county_boundaries_without_baldwin, require_test_file,
    write_temp_json,
};
use tower::ServiceExt;

fn app_with(artifact: Value, collection: Value) -> Router {
    let registry = DatasetRegistry::from_json(&artifact.to_string()).unwrap();
    let boundaries = BoundaryCollection::from_json(&collection.to_string()).unwrap();
    let state = Arc::new(AppState::new(registry, boundaries, AtlasConfig::default()));
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    routes::router(state, prometheus)
}

fn app() -> Router {
    app_with(cascade_artifact(), county_boundaries())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_and_ready() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get(app(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ready": true, "years": 2, "boundaries": 5}));
}

#[tokio::test]
async fn test_metrics_endpoint_is_text() {
    let response = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_years_in_artifact_order() {
    let (status, body) = get(app(), "/api/years").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"years": ["2021", "2019"], "default": "2021"}));
}

#[tokio::test]
async fn test_factors_ranked_by_column_max() {
    let (status, body) = get(app(), "/api/years/2021/factors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["factors"],
        json!([
            {"feature": "Poverty", "max": 0.9},
            {"feature": "FoodInsecurity", "max": 0.4}
        ])
    );

    let (_, body) = get(app(), "/api/years/2021/raw-factors").await;
    assert_eq!(body["factors"][0]["feature"], "FoodInsecurity");
}

#[tokio::test]
async fn test_range() {
    let (status, body) = get(app(), "/api/years/2021/range").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], json!({"min": 0.1, "max": 0.9}));
}

#[tokio::test]
async fn test_unknown_year_is_404_with_alternatives() {
    let (status, body) = get(app(), "/api/years/1999/factors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UnknownYear");
    assert_eq!(body["field"], "year");
    assert_eq!(body["available"], json!(["2021", "2019"]));
}

#[tokio::test]
async fn test_states_and_counties() {
    let (_, body) = get(app(), "/api/years/2021/states").await;
    assert_eq!(body["states"], json!(["AL", "CA"]));

    let (_, body) = get(app(), "/api/years/2021/states/AL/counties").await;
    assert_eq!(body["counties"], json!(["Autauga", "Baldwin"]));

    let (status, body) = get(app(), "/api/years/2019/states/CA/counties").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UnknownState");
    assert_eq!(body["available"], json!(["AL", "TX"]));
}

#[tokio::test]
async fn test_selection_defaults_and_cascade() {
    let (status, body) = get(app(), "/api/selection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"year": "2021", "factor": "Poverty", "state": "AL", "county": "Autauga"})
    );

    let (_, body) = get(app(), "/api/selection?year=2019").await;
    assert_eq!(
        body,
        json!({"year": "2019", "factor": "Obesity", "state": "AL", "county": "Autauga"})
    );

    let (status, body) = get(app(), "/api/selection?year=2019&state=CA").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidSelection");
    assert_eq!(body["field"], "state");
    assert_eq!(body["available"], json!(["AL", "TX"]));
}

#[tokio::test]
async fn test_attribution_map() {
    let (status, body) = get(app(), "/api/map?year=2021&factor=Poverty").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["factor"], "Poverty");
    assert_eq!(body["range"], json!({"min": 0.1, "max": 0.9}));
    assert_eq!(body["ranking"][0]["feature"], "Poverty");

    let regions = body["map"]["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 3);
    let la = regions.iter().find(|r| r["fips"] == "06037").unwrap();
    assert_eq!(la["fill"], "rgb(255, 13, 87)");
    assert_eq!(la["hover"]["county"], "Los Angeles");
    assert_eq!(body["map"]["unmatched"], json!([]));
}

#[tokio::test]
async fn test_map_with_missing_boundary_still_renders() {
    let app = app_with(cascade_artifact(), county_boundaries_without_baldwin());
    let (status, body) = get(app, "/api/map?factor=FoodInsecurity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["map"]["unmatched"], json!(["01003"]));
    assert_eq!(body["map"]["regions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_map_defaults_to_first_factor() {
    let (_, body) = get(app(), "/api/map").await;
    assert_eq!(body["year"], "2021");
    assert_eq!(body["factor"], "Poverty");
}

#[tokio::test]
async fn test_map_unknown_factor_is_400() {
    let (status, body) = get(app(), "/api/map?year=2021&factor=Obesity").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "factor");
    assert_eq!(body["available"], json!(["Poverty", "FoodInsecurity"]));
}

#[tokio::test]
async fn test_raw_map_uses_column_range() {
    let (status, body) = get(app(), "/api/raw-map?year=2021&factor=FoodInsecurity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], json!({"min": 10.1, "max": 15.3}));
    assert_eq!(body["map"]["title"], "FoodInsecurity Raw Value");
    assert!(body.get("ranking").is_none());
}

#[tokio::test]
async fn test_state_map_with_precomputed_features() {
    let (status, body) = get(app(), "/api/state-map?year=2019&state=TX&county=Harris&n=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"]["state"], "TX");
    assert_eq!(
        body["top_features"],
        json!(["Obesity", "Poverty", "Unemployment"])
    );
    assert_eq!(body["map"]["fit_bounds"], true);
    assert_eq!(
        body["map"]["color_column"],
        "DiagnosedDiabetes(Percentage)"
    );
    let regions = body["map"]["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0]["hover"]["top_features"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_state_map_defaults() {
    let (status, body) = get(app(), "/api/state-map").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"]["state"], "AL");
    assert_eq!(body["selection"]["county"], "Autauga");
    // 2021 has no precomputed ranking: Autauga is Poverty 0.3, FoodInsecurity 0.1.
    assert_eq!(body["top_features"], json!(["Poverty", "FoodInsecurity"]));
}

#[tokio::test]
async fn test_state_map_unknown_county() {
    let (status, body) = get(app(), "/api/state-map?state=AL&county=Harris").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "county");
}

#[test]
fn test_state_load_from_files() {
    let artifact = write_temp_json(&cascade_artifact());
    let collection = write_temp_json(&county_boundaries());
    let config = AtlasConfig::default().with_overrides(
        Some(artifact.path().to_path_buf()),
        Some(collection.path().to_path_buf()),
        None,
    );

    let state = tokio_test::assert_ok!(AppState::load(config));
    assert_eq!(state.registry.len(), 2);
    assert_eq!(state.boundaries.len(), 5);
}

#[test]
fn test_state_load_missing_artifact_fails() {
    let config = AtlasConfig::default().with_overrides(
        Some("/nonexistent/visual_datasets.json".into()),
        None,
        None,
    );
    let err = AppState::load(config).err().unwrap();
    assert!(format!("{:#}", err).contains("Failed to load dataset artifact"));
}

#[test]
fn test_real_artifact_loads() {
    let dataset = require_test_file!("visual_datasets.json");
    let collection = require_test_file!("geojson-counties-fips.json");
    let config = AtlasConfig::default().with_overrides(Some(dataset), Some(collection), None);

    let state = AppState::load(config).unwrap();
    assert!(!state.registry.is_empty());
    for dataset in state.registry.iter() {
        assert!(!dataset.shap_values().features().is_empty());
    }
}
