//! API key resolution.

use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;

/// Resolve an API key from an explicit value or an environment variable.
///
/// Called whenever request headers are built, so a key exported after the
/// provider was created is still picked up.
pub fn load_api_key(
    api_key: Option<&SecretString>,
    environment_variable: &str,
    description: &str,
) -> Result<String, LlmError> {
    load_api_key_with(api_key, environment_variable, description, |name| {
        std::env::var(name).ok()
    })
}

/// Same as [`load_api_key`] with an injectable environment lookup.
pub fn load_api_key_with<F>(
    api_key: Option<&SecretString>,
    environment_variable: &str,
    description: &str,
    lookup: F,
) -> Result<String, LlmError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(key) = api_key {
        return Ok(key.expose_secret().to_string());
    }

    match lookup(environment_variable) {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(LlmError::MissingApiKey(format!(
            "{description} API key is missing. Pass it using the 'api_key' setting or the \
             {environment_variable} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = SecretString::from("explicit".to_string());
        let resolved =
            load_api_key_with(Some(&key), "X_KEY", "Test", |_| Some("env".to_string())).unwrap();
        assert_eq!(resolved, "explicit");
    }

    #[test]
    fn falls_back_to_environment() {
        let resolved = load_api_key_with(None, "X_KEY", "Test", |name| {
            assert_eq!(name, "X_KEY");
            Some("env".to_string())
        })
        .unwrap();
        assert_eq!(resolved, "env");
    }

    #[test]
    fn missing_everywhere_is_an_error() {
        let err = load_api_key_with(None, "X_KEY", "Test", |_| None).unwrap_err();
        match err {
            LlmError::MissingApiKey(msg) => {
                assert!(msg.contains("X_KEY"));
                assert!(msg.starts_with("Test API key is missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_environment_value_counts_as_missing() {
        let err = load_api_key_with(None, "X_KEY", "Test", |_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(_)));
    }
}
