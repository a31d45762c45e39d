//! JSON and SSE request helpers shared by all models.

use std::collections::HashMap;

use futures::StreamExt;
use serde_json::Value;

use super::headers::{HttpHeaderBuilder, headermap_to_hashmap};
use super::transport::{ByteStream, HttpTransport, HttpTransportRequest};
use crate::error::LlmError;

/// Maps a non-success response to an error: `(provider, status, body)`.
pub type ErrorClassifier = fn(&str, u16, &str) -> LlmError;

/// Successful JSON response.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub body: Value,
    /// Response headers (lowercased keys).
    pub headers: HashMap<String, String>,
}

/// Successful streaming response.
pub struct StreamResponse {
    pub body: ByteStream,
    pub headers: HashMap<String, String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// POST `body` as JSON and decode the JSON response.
pub async fn post_json(
    transport: &dyn HttpTransport,
    provider: &str,
    url: String,
    headers: &HashMap<String, String>,
    body: Value,
    classify: ErrorClassifier,
) -> Result<JsonResponse, LlmError> {
    let headers = HttpHeaderBuilder::new()
        .with_json_content_type()
        .with_custom_headers(headers)?
        .build();

    tracing::debug!(provider, url = %url, "sending request");
    let response = transport
        .execute_json(HttpTransportRequest { url, headers, body })
        .await?;

    if !is_success(response.status) {
        let text = String::from_utf8_lossy(&response.body);
        tracing::warn!(provider, status = response.status, "request failed");
        return Err(classify(provider, response.status, &text));
    }

    let body: Value = serde_json::from_slice(&response.body).map_err(|e| {
        LlmError::ParseError(format!("Invalid JSON response from {provider}: {e}"))
    })?;

    Ok(JsonResponse {
        body,
        headers: headermap_to_hashmap(&response.headers),
    })
}

/// POST `body` as JSON and return the raw event stream.
///
/// Error responses are read to the end so they can be classified like
/// non-streaming errors.
pub async fn post_stream(
    transport: &dyn HttpTransport,
    provider: &str,
    url: String,
    headers: &HashMap<String, String>,
    body: Value,
    classify: ErrorClassifier,
) -> Result<StreamResponse, LlmError> {
    let headers = HttpHeaderBuilder::new()
        .with_json_content_type()
        .with_event_stream_accept()
        .with_custom_headers(headers)?
        .build();

    tracing::debug!(provider, url = %url, "sending streaming request");
    let response = transport
        .execute_stream(HttpTransportRequest { url, headers, body })
        .await?;

    if !is_success(response.status) {
        let mut body = response.body;
        let mut text = Vec::new();
        while let Some(chunk) = body.next().await {
            text.extend_from_slice(&chunk?);
        }
        let text = String::from_utf8_lossy(&text);
        tracing::warn!(provider, status = response.status, "streaming request failed");
        return Err(classify(provider, response.status, &text));
    }

    Ok(StreamResponse {
        body: response.body,
        headers: headermap_to_hashmap(&response.headers),
    })
}
