use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

use crate::db;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::validator::{ValidationError, ValidationErrorKind};
use crate::submission::{metadata, parser, pipeline};

pub async fn create(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(ValidationError::new("body", ValidationErrorKind::Malformed))
        }
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let form = parser::parse_lead(content_type, &body)?;
    let meta = metadata::extract(&headers, addr.ip(), &state.config.trusted_proxies);

    pipeline::run(&state, &meta, form).await?;

    Ok(Json(json!({ "ok": true, "message": "Lead received." })))
}

pub async fn count(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    let count = db::leads::count(&state.pool).await?;
    Ok(Json(json!({ "count": count })))
}
