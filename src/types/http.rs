//! HTTP configuration types.
//!
//! `HttpConfig` configures the default `reqwest` transport. A custom `fetch`
//! transport ignores it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponseInfo {
    /// Timestamp when the response was received.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Model id used for the request (if known).
    #[serde(rename = "modelId", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Response headers (lowercased keys).
    pub headers: HashMap<String, String>,
}

impl HttpResponseInfo {
    pub fn new(model_id: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            model_id: Some(model_id.into()),
            headers,
        }
    }
}

// Timestamps differ between otherwise identical responses.
impl PartialEq for HttpResponseInfo {
    fn eq(&self, other: &Self) -> bool {
        self.model_id == other.model_id && self.headers == other.headers
    }
}

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

/// Builder for `HttpConfig`
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = user_agent.map(|s| s.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(|s| s.into());
        self
    }

    /// Build the configuration. Unset values fall back to `HttpConfig::default()`.
    pub fn build(self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout.or(defaults.timeout),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            proxy: self.proxy,
            user_agent: self.user_agent.or(defaults.user_agent),
        }
    }
}

impl HttpConfig {
    /// Returns a builder for constructing `HttpConfig`
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(crate::defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(crate::defaults::http::CONNECT_TIMEOUT),
            proxy: None,
            user_agent: Some(crate::defaults::http::USER_AGENT.to_string()),
        }
    }
}

// Helper module for Duration serialization
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_defaults_for_unset_fields() {
        let config = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(5)))
            .build();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            config.connect_timeout,
            Some(crate::defaults::http::CONNECT_TIMEOUT)
        );
        assert!(config.user_agent.unwrap().starts_with("siumai-provider-deepinfra/"));
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let config = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(30)))
            .proxy(Some("http://127.0.0.1:8080"))
            .build();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 30);

        let back: HttpConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
