use axum::{http::header, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::error::ApiError;

pub async fn metrics_handler() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::Internal(format!("metrics encoding failed: {e}")))?;
    let body = String::from_utf8(buffer)
        .map_err(|e| ApiError::Internal(format!("metrics not utf-8: {e}")))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], body))
}
