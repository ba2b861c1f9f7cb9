//! HTTP API for the Downtime Cost Engine.
//!
//! This module exposes a minimal REST API around the engine using the
//! [`axum`](https://crates.io/crates/axum) framework.  Clients submit
//! raw form input as JSON and receive either the validated inputs, a
//! cost breakdown, or a map of per-field errors.

use crate::engine::{estimate, estimate_batch};
use crate::models::{RawInputs, ScenarioSet};
use crate::validate::{validate, ValidationErrors};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The submitted input failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                let body = Json(json!({ "errors": errors }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Build the API router.  The engine is stateless, so the router carries
/// no shared state.
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/validate", post(validate_handler))
        .route("/api/calculate", post(calculate_handler))
        .route("/api/scenarios", post(scenarios_handler))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for POST /api/validate
async fn validate_handler(Json(raw): Json<RawInputs>) -> Result<impl IntoResponse, ApiError> {
    let inputs = validate(&raw)?;
    Ok(Json(inputs))
}

/// Handler for POST /api/calculate
async fn calculate_handler(Json(raw): Json<RawInputs>) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(basis = %raw.calculation_basis, "estimate requested");
    let breakdown = estimate(&raw)?;
    Ok(Json(breakdown))
}

/// Handler for POST /api/scenarios
async fn scenarios_handler(Json(set): Json<ScenarioSet>) -> impl IntoResponse {
    tracing::debug!(scenarios = set.scenarios.len(), "batch requested");
    Json(estimate_batch(set))
}

/// Launch the API server on `addr`.  Runs until the server terminates
/// (e.g. when interrupted).
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("server listening on {}", addr);
    axum::serve(listener, build_router())
        .await
        .context("server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = build_router().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn base() -> Value {
        json!({
            "calculationBasis": "24/7",
            "annualRevenue": "8760000",
            "downtimeDuration": "1",
            "affectedEmployees": "10",
            "hourlyWage": "50"
        })
    }

    #[tokio::test]
    async fn test_calculate_returns_breakdown() {
        let (status, body) = post_json("/api/calculate", base()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalEstimatedCost"], json!(1500.0));
        assert_eq!(body["profitLoss"], Value::Null);
        assert_eq!(body["penaltyCost"], json!(0.0));
    }

    #[tokio::test]
    async fn test_calculate_accepts_numeric_json() {
        let (status, body) = post_json(
            "/api/calculate",
            json!({
                "calculationBasis": "business",
                "annualRevenue": 2000000,
                "downtimeDuration": 1,
                "affectedEmployees": 0,
                "hourlyWage": 0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hourlyRevenueRate"], json!(1000.0));
    }

    #[tokio::test]
    async fn test_calculate_rejects_invalid_input_with_field_map() {
        let mut input = base();
        input["affectedEmployees"] = json!("3.5");
        input["profitMargin"] = json!("101");
        input["hourlyWage"] = json!("");
        let (status, body) = post_json("/api/calculate", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["errors"],
            json!({
                "affectedEmployees": "Must be a non-negative integer",
                "hourlyWage": "Required",
                "profitMargin": "Must be between 0 and 100"
            })
        );
    }

    #[tokio::test]
    async fn test_validate_returns_typed_inputs() {
        let mut input = base();
        input["profitMargin"] = json!("20");
        let (status, body) = post_json("/api/validate", input).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["affectedEmployees"], json!(10));
        assert_eq!(body["profitMarginPercent"], json!(20.0));
        assert_eq!(body["calculationBasis"], json!("24/7"));
    }

    #[tokio::test]
    async fn test_scenarios_reports_each_outcome() {
        let mut named = base();
        named["name"] = json!("core switch");
        let (status, body) = post_json(
            "/api/scenarios",
            json!({ "scenarios": [named, { "name": "empty" }] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results[0]["name"], "core switch");
        assert_eq!(results[0]["status"], "estimated");
        assert_eq!(results[0]["breakdown"]["totalEstimatedCost"], json!(1500.0));
        assert_eq!(results[1]["status"], "rejected");
        assert_eq!(results[1]["errors"]["annualRevenue"], "Required");
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = build_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
