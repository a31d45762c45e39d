//! Error mapping for the OpenAI-compatible endpoints.
//!
//! Failures arrive as `{"error": {"message", "type", "code"}}`, or as
//! `{"error": "message"}` from some gateways.

use crate::error::LlmError;
use serde_json::Value;

struct ErrorEnvelope {
    message: String,
    kind: Option<String>,
    code: Option<String>,
    details: Value,
}

fn parse_envelope(body_text: &str) -> Option<ErrorEnvelope> {
    let details: Value = serde_json::from_str(body_text).ok()?;
    let error = details.get("error")?;

    if let Some(message) = error.as_str() {
        return Some(ErrorEnvelope {
            message: message.to_string(),
            kind: None,
            code: None,
            details,
        });
    }

    let text = |key: &str| match error.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    let message = text("message").unwrap_or_else(|| "Unknown error".to_string());
    let kind = text("type");
    let code = text("code");
    Some(ErrorEnvelope {
        message,
        kind,
        code,
        details,
    })
}

/// Classify a failure carrying the `error` envelope.
///
/// Returns `None` when the body has no envelope so callers can fall back to
/// [`openai_compatible_http_error`].
pub fn classify_openai_compatible_http_error(
    provider: &str,
    status: u16,
    body_text: &str,
) -> Option<LlmError> {
    let ErrorEnvelope {
        message,
        kind,
        code,
        details,
    } = parse_envelope(body_text)?;

    let mapped = match (status, kind.as_deref()) {
        (401 | 403, _) | (_, Some("authentication_error")) => {
            LlmError::AuthenticationError(message)
        }
        (429, _) | (_, Some("rate_limit_error")) => LlmError::RateLimitError(message),
        (400, _) | (_, Some("invalid_request_error")) => LlmError::InvalidInput(message),
        _ => match code {
            Some(code) => LlmError::ProviderError {
                provider: provider.to_string(),
                message,
                error_code: Some(code),
            },
            None => LlmError::api_error_with_details(
                status,
                format!("{provider} API error: {message}"),
                details,
            ),
        },
    };
    Some(mapped)
}

/// Classify any non-success response from an OpenAI-compatible endpoint.
pub fn openai_compatible_http_error(provider: &str, status: u16, body_text: &str) -> LlmError {
    classify_openai_compatible_http_error(provider, status, body_text).unwrap_or_else(|| {
        let message = if body_text.trim().is_empty() {
            format!("{provider} API error: HTTP {status}")
        } else {
            format!("{provider} API error: {body_text}")
        };
        match status {
            401 | 403 => LlmError::AuthenticationError(message),
            429 => LlmError::RateLimitError(message),
            _ => LlmError::api_error(status, message),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_error_maps_to_invalid_input() {
        let body =
            r#"{"error":{"message":"bad request","type":"invalid_request_error","code":null}}"#;
        let err =
            classify_openai_compatible_http_error("deepinfra", 400, body).expect("classified");
        match err {
            LlmError::InvalidInput(msg) => assert_eq!(msg, "bad request"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn numeric_code_field_becomes_provider_error() {
        let body = r#"{"error":{"message":"bad gateway","type":null,"code":123}}"#;
        let err =
            classify_openai_compatible_http_error("deepinfra", 502, body).expect("classified");
        match err {
            LlmError::ProviderError {
                provider,
                message,
                error_code,
            } => {
                assert_eq!(provider, "deepinfra");
                assert_eq!(message, "bad gateway");
                assert_eq!(error_code.as_deref(), Some("123"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn string_error_field_is_classified_by_status() {
        let body = r#"{"error":"Rate limit reached"}"#;
        let err =
            classify_openai_compatible_http_error("deepinfra", 429, body).expect("classified");
        assert!(matches!(err, LlmError::RateLimitError(_)));
    }

    #[test]
    fn untyped_envelope_without_code_keeps_details() {
        let body = r#"{"error":{"message":"Model is loading"}}"#;
        let err =
            classify_openai_compatible_http_error("deepinfra", 503, body).expect("classified");
        match err {
            LlmError::ApiError {
                code,
                message,
                details,
            } => {
                assert_eq!(code, 503);
                assert_eq!(message, "deepinfra API error: Model is loading");
                assert_eq!(details.unwrap()["error"]["message"], "Model is loading");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
        assert!(matches!(
            classify_openai_compatible_http_error("deepinfra", 403, body),
            Some(LlmError::AuthenticationError(_))
        ));
    }

    #[test]
    fn returns_none_on_non_envelope() {
        let body = r#"{"message":"not openai"}"#;
        assert!(classify_openai_compatible_http_error("deepinfra", 400, body).is_none());
    }

    #[test]
    fn fallback_keeps_status_and_body() {
        let err = openai_compatible_http_error("deepinfra", 500, "upstream exploded");
        match err {
            LlmError::ApiError { code, message, .. } => {
                assert_eq!(code, 500);
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
        assert!(matches!(
            openai_compatible_http_error("deepinfra", 401, ""),
            LlmError::AuthenticationError(_)
        ));
    }
}
