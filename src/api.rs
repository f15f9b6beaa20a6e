use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    TrafficError,
    advisory::build_advisory,
    models::{TrafficStatusRequest, TrafficStatusResponse},
    service::TrafficService,
};

#[derive(Serialize)]
pub struct ApiTrafficStatus {
    #[serde(flatten)]
    pub status: TrafficStatusResponse,
    pub advisory: String,
}

impl From<TrafficStatusResponse> for ApiTrafficStatus {
    fn from(status: TrafficStatusResponse) -> Self {
        let advisory = build_advisory(&status);
        Self { status, advisory }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl IntoResponse for TrafficError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("Traffic status request failed: {self}");
        } else {
            tracing::debug!("Traffic status request rejected: {self}");
        }

        let body = ApiError {
            code: code.as_str().to_string(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: Arc<TrafficService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/traffic/status",
            get(get_traffic_status).post(post_traffic_status),
        )
        .with_state(service)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

impl From<QueryRejection> for TrafficError {
    fn from(rejection: QueryRejection) -> Self {
        TrafficError::validation(rejection.body_text())
    }
}

impl From<JsonRejection> for TrafficError {
    fn from(rejection: JsonRejection) -> Self {
        TrafficError::validation(rejection.body_text())
    }
}

async fn get_traffic_status(
    State(service): State<Arc<TrafficService>>,
    request: Result<Query<TrafficStatusRequest>, QueryRejection>,
) -> Result<Json<ApiTrafficStatus>, TrafficError> {
    let Query(request) = request?;
    let status = service.get_traffic_status(&request).await?;
    Ok(Json(status.into()))
}

async fn post_traffic_status(
    State(service): State<Arc<TrafficService>>,
    request: Result<Json<TrafficStatusRequest>, JsonRejection>,
) -> Result<Json<ApiTrafficStatus>, TrafficError> {
    let Json(request) = request?;
    let status = service.get_traffic_status(&request).await?;
    Ok(Json(status.into()))
}
