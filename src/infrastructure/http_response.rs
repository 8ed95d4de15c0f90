// HTTP response utilities for JSON/SVG bodies with optional Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use bytes::Bytes;
use serde::Serialize;
use tokio::io::AsyncReadExt;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const JSON_CONTENT_TYPE: &str = "application/json";

/// True when the client lists `br` in `accept-encoding`.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|part| part.trim().starts_with("br")))
        .unwrap_or(false)
}

pub async fn compress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = BrotliEncoder::new(bytes);
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Build a response, Brotli-compressing the body when asked to.
pub async fn encoded_response(
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
    compress_body: bool,
) -> Result<Response<Body>, StatusCode> {
    let (body, encoding) = if compress_body {
        let compressed = compress(&body).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!(
            raw = body.len(),
            compressed = compressed.len(),
            "Compressed response body"
        );
        (Bytes::from(compressed), Some("br"))
    } else {
        (body, None)
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
        .header(header::VARY, "accept-encoding");
    if let Some(encoding) = encoding {
        builder = builder.header(header::CONTENT_ENCODING, encoding);
    }

    builder.body(Body::from(body)).map_err(|e| {
        tracing::error!("Response build error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
    compress_body: bool,
) -> Result<Response<Body>, StatusCode> {
    let body = serde_json::to_vec(value).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    encoded_response(status, JSON_CONTENT_TYPE, Bytes::from(body), compress_body).await
}

pub async fn svg_response(svg: String, compress_body: bool) -> Result<Response<Body>, StatusCode> {
    encoded_response(StatusCode::OK, SVG_CONTENT_TYPE, Bytes::from(svg), compress_body).await
}
