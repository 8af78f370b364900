//! REST API endpoints for the ValuationGateway
//!
//! `POST /predict` values a player, `GET /model` describes the loaded model
//! and `GET /health` reports liveness. Every failure is answered with the
//! `{"status": "error", "message": ...}` payload.

use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::Filter;

use valuation_engine::PlayerStatsRequest;

use crate::gateway::GatewayState;
use crate::messages::{HealthResponse, ModelInfoResponse, ValuationResponse};

/// Value a player
pub async fn predict(
    request: PlayerStatsRequest,
    state: Arc<GatewayState>,
) -> Result<impl warp::Reply, Infallible> {
    let Some(engine) = state.engine() else {
        warn!("Rejecting valuation request: model not loaded");
        let response = ValuationResponse::model_not_loaded();
        return Ok(reply(&response, StatusCode::INTERNAL_SERVER_ERROR));
    };

    match engine.value(&request) {
        Ok(result) => Ok(reply(&ValuationResponse::Success(result), StatusCode::OK)),
        Err(e) => {
            if e.is_prediction_failure() {
                warn!("Valuation failed for {} ({}): {}", request.position, request.country, e);
            } else {
                error!("Valuation failed for {} ({}): {}", request.position, request.country, e);
            }
            Ok(reply(&ValuationResponse::error(e.to_string()), StatusCode::OK))
        }
    }
}

/// Describe the loaded model
pub async fn model_info(state: Arc<GatewayState>) -> Result<impl warp::Reply, Infallible> {
    match state.model() {
        Some(model) => {
            let response = ModelInfoResponse {
                kind: model.kind().to_string(),
                feature_count: model.schema().len(),
                source: model.source().to_string(),
            };
            Ok(warp::reply::with_status(warp::reply::json(&response), StatusCode::OK))
        }
        None => {
            let response = ValuationResponse::model_not_loaded();
            Ok(reply(&response, StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

pub async fn health(state: Arc<GatewayState>) -> Result<impl warp::Reply, Infallible> {
    let model_loaded = state.model_loaded();
    let response = HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
        model_loaded,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    Ok(warp::reply::json(&response))
}

/// Turn rejections into the error payload
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Expected a JSON body".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(reply(&ValuationResponse::error(message), status))
}

fn reply(
    response: &ValuationResponse,
    status: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(response), status)
}

fn with_state(
    state: Arc<GatewayState>,
) -> impl Filter<Extract = (Arc<GatewayState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Create all REST API routes
pub fn create_routes(
    state: Arc<GatewayState>,
    max_body_bytes: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let predict_route = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(predict);

    let model_route = warp::path("model")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(model_info);

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(health);

    predict_route
        .or(model_route)
        .or(health_route)
        .recover(handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
        .with(warp::trace::request())
}
