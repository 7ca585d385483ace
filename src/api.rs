use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::service::FaturamentoService;
use crate::core::types::Portal;
use crate::error::FaturamentoError;
use crate::input::FaturamentoRequest;
use crate::summary::FaturamentoSummary;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router<P: Portal + 'static>(service: Arc<FaturamentoService<P>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/faturamento", post(faturamento::<P>))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health() -> &'static str {
    "OK"
}

async fn faturamento<P: Portal + 'static>(
    State(service): State<Arc<FaturamentoService<P>>>,
    payload: Result<Json<FaturamentoRequest>, JsonRejection>,
) -> ApiResult<FaturamentoSummary> {
    let Json(request) = payload.map_err(rejection_response)?;

    service
        .handle_request(request)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Bodies that are not a JSON object of strings are bad input like any other.
fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    log::debug!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

fn error_response(err: FaturamentoError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        FaturamentoError::Authentication(_) => StatusCode::UNAUTHORIZED,
        FaturamentoError::Input(_) => StatusCode::BAD_REQUEST,
        FaturamentoError::Internal(e) => {
            log::error!("Request failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
