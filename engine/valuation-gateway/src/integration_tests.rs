//! HTTP-level tests for the ValuationGateway routes

use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;

use valuation_engine::{ModelArtifact, ModelHandle, ValuationConfig, ValuationEngine};

use crate::config::GatewayConfig;
use crate::gateway::GatewayState;
use crate::rest_api::create_routes;

const BODY_LIMIT: u64 = 16 * 1024;

/// Linear artifact with zero weights: always predicts `base_value`
fn constant_artifact(feature_names: &[&str], base_value: f64) -> ModelArtifact {
    serde_json::from_value(json!({
        "feature_names": feature_names,
        "model": {
            "kind": "linear",
            "intercept": base_value.ln_1p(),
            "coefficients": vec![0.0; feature_names.len()],
        }
    }))
    .unwrap()
}

fn state_with(artifact: ModelArtifact) -> Arc<GatewayState> {
    let handle = ModelHandle::from_artifact(artifact, "inline").unwrap();
    let engine = ValuationEngine::new(Arc::new(handle), &ValuationConfig::default());
    Arc::new(GatewayState::new(Some(engine)))
}

fn loaded_state() -> Arc<GatewayState> {
    state_with(constant_artifact(
        &[
            "goals",
            "assists",
            "minutes_played",
            "value_momentum",
            "value_lag_1",
            "value_lag_2",
            "total_days_injured",
            "x0_Attack - Centre-Forward",
            "x1_France",
        ],
        2_000_000.0,
    ))
}

fn star_striker() -> Value {
    json!({
        "goals": 20,
        "assists": 2,
        "minutes_played": 3000,
        "age_momentum": 0.15,
        "prev_value": 5_000_000.0,
        "days_injured": 0,
        "country": "France",
        "position": "Attack - Centre-Forward"
    })
}

async fn post_predict(state: Arc<GatewayState>, body: &Value) -> (StatusCode, Value) {
    let routes = create_routes(state, BODY_LIMIT);
    let response =
        warp::test::request().method("POST").path("/predict").json(body).reply(&routes).await;
    let payload = serde_json::from_slice(response.body()).unwrap();
    (response.status(), payload)
}

async fn get(state: Arc<GatewayState>, path: &str) -> (StatusCode, Value) {
    let routes = create_routes(state, BODY_LIMIT);
    let response = warp::test::request().method("GET").path(path).reply(&routes).await;
    let payload = serde_json::from_slice(response.body()).unwrap();
    (response.status(), payload)
}

#[tokio::test]
async fn test_predict_success_payload() {
    let (status, payload) = post_predict(loaded_state(), &star_striker()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "success");
    // 2M × 1.15 × 1.10 + 5M goals + 0.3M assists + 2.5M minutes
    assert_eq!(payload["market_value_euro"], 10_330_000.0);
    assert_eq!(payload["range_min"], 9_297_000.0);
    assert_eq!(payload["range_max"], 11_363_000.0);
    assert_eq!(payload["similar_players"], "Squad Rotation / Championship Stars");

    let drivers: Vec<&str> =
        payload["drivers"].as_array().unwrap().iter().map(|d| d.as_str().unwrap()).collect();
    assert!(drivers.contains(&"🔥 Elite Goalscoring Form (+)"));
    assert!(drivers.contains(&"🌍 France Market Premium (+)"));

    let radar = payload["radar_stats"].as_object().unwrap();
    for key in ["Attacking", "Stamina", "Availability", "Potential"] {
        assert!(radar.contains_key(key), "missing radar score {}", key);
    }
}

#[tokio::test]
async fn test_predict_without_model() {
    let state = Arc::new(GatewayState::new(None));
    let (status, payload) = post_predict(state, &star_striker()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload, json!({"status": "error", "message": "Model not loaded"}));
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let mut body = star_striker();
    body["goals"] = json!(-3);
    let (status, payload) = post_predict(loaded_state(), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"].as_str().unwrap().starts_with("Invalid request body"));

    let mut body = star_striker();
    body.as_object_mut().unwrap().remove("country");
    let (status, _) = post_predict(loaded_state(), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_reports_invalid_values_as_error_payload() {
    let mut body = star_striker();
    body["prev_value"] = json!(-10.0);
    let (status, payload) = post_predict(loaded_state(), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "error");
    assert!(payload.get("market_value_euro").is_none());
}

#[tokio::test]
async fn test_predict_reports_schema_mismatch() {
    let state = state_with(constant_artifact(&["x1_France", "x0_Goalkeeper"], 1_000_000.0));
    let (status, payload) = post_predict(state, &star_striker()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"].as_str().unwrap().contains("goals"));
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let (status, payload) = get(loaded_state(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["model_loaded"], true);

    let (status, payload) = get(Arc::new(GatewayState::new(None)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["status"], "degraded");
    assert_eq!(payload["model_loaded"], false);
}

#[tokio::test]
async fn test_model_info() {
    let (status, payload) = get(loaded_state(), "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["kind"], "linear");
    assert_eq!(payload["feature_count"], 9);
    assert_eq!(payload["source"], "inline");

    let (status, payload) = get(Arc::new(GatewayState::new(None)), "/model").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(payload["message"], "Model not loaded");
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let (status, payload) = get(loaded_state(), "/valuations").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["status"], "error");

    let (status, _) = get(loaded_state(), "/predict").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_concurrent_valuations_share_one_model() {
    let state = loaded_state();

    let mut values: Vec<(u32, f64)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16u32)
            .map(|goals| {
                let state = state.clone();
                scope.spawn(move || {
                    let mut body = star_striker();
                    body["goals"] = json!(goals);
                    body["prev_value"] = json!(500_000.0);
                    let request = serde_json::from_value(body).unwrap();
                    let engine = state.engine().unwrap();
                    (goals, engine.value(&request).unwrap().market_value)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    values.sort_by_key(|(goals, _)| *goals);

    // Each extra goal adds €50,000 at tier 1
    for pair in values.windows(2) {
        assert_eq!(pair[1].1 - pair[0].1, 50_000.0);
    }
}

#[test]
fn test_state_without_artifact_starts_degraded() {
    let mut config = GatewayConfig::default();
    config.valuation.model.artifact_path = "/nonexistent/model.json".into();

    let state = GatewayState::from_config(&config);
    assert!(!state.model_loaded());
    assert!(state.engine().is_none());
}
