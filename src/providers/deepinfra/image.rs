//! DeepInfra image generation over the native inference API.
//!
//! `POST {base_url}/{model_id}` with `{prompt, num_images, ...}`; the response
//! carries `images` as data URLs or bare base64.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde_json::{Map, Value, json};

use super::settings::DeepInfraImageSettings;
use crate::defaults::deepinfra::{MAX_CONCURRENT_IMAGE_CALLS, MAX_IMAGES_PER_GENERATION};
use crate::error::LlmError;
use crate::execution::http::request::post_json;
use crate::execution::http::transport::{HttpTransport, default_transport};
use crate::standards::openai_compatible::HeadersResolver;
use crate::standards::openai_compatible::errors::openai_compatible_http_error;
use crate::traits::ImageGenerationCapability;
use crate::types::{
    GeneratedImage, HttpResponseInfo, ImageGenerationRequest, ImageGenerationResponse, Warning,
};

/// Configuration record for [`DeepInfraImageModel`].
#[derive(Clone)]
pub struct DeepInfraImageModelConfig {
    /// Provider tag, `deepinfra.image`.
    pub provider: String,
    /// `{base}/inference`; the model id is appended per request.
    pub base_url: String,
    pub headers: HeadersResolver,
    pub fetch: Option<Arc<dyn HttpTransport>>,
}

impl std::fmt::Debug for DeepInfraImageModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepInfraImageModelConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("has_fetch", &self.fetch.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct DeepInfraImageModel {
    model_id: String,
    settings: DeepInfraImageSettings,
    config: DeepInfraImageModelConfig,
}

impl DeepInfraImageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: DeepInfraImageSettings,
        config: DeepInfraImageModelConfig,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    pub fn settings(&self) -> &DeepInfraImageSettings {
        &self.settings
    }

    pub fn config(&self) -> &DeepInfraImageModelConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!("{}/{}", self.config.base_url, self.model_id)
    }

    fn build_body(&self, request: &ImageGenerationRequest, count: u32) -> Result<Value, LlmError> {
        let mut body = Map::new();
        body.insert("prompt".into(), json!(request.prompt));
        body.insert("num_images".into(), json!(count));
        if let Some(aspect_ratio) = &request.aspect_ratio {
            body.insert("aspect_ratio".into(), json!(aspect_ratio));
        }
        if let Some(size) = &request.size {
            let (width, height) = parse_size(size)?;
            body.insert("width".into(), json!(width));
            body.insert("height".into(), json!(height));
        }
        if let Some(seed) = request.seed {
            body.insert("seed".into(), json!(seed));
        }
        for (key, value) in &request.provider_options {
            body.insert(key.clone(), value.clone());
        }
        Ok(Value::Object(body))
    }

    async fn generate_batch(
        &self,
        transport: &dyn HttpTransport,
        request: &ImageGenerationRequest,
        count: u32,
    ) -> Result<(Vec<GeneratedImage>, HttpResponseInfo), LlmError> {
        let body = self.build_body(request, count)?;
        let headers = (self.config.headers)()?;

        let response = post_json(
            transport,
            "deepinfra",
            self.url(),
            &headers,
            body,
            deepinfra_image_http_error,
        )
        .await?;

        let images = response
            .body
            .get("images")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::ParseError("No images in DeepInfra response".to_string()))?
            .iter()
            .map(|image| {
                image
                    .as_str()
                    .map(|s| GeneratedImage {
                        b64_json: strip_data_url_prefix(s).to_string(),
                    })
                    .ok_or_else(|| LlmError::ParseError("Image entry is not a string".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            images,
            HttpResponseInfo::new(&self.model_id, response.headers),
        ))
    }
}

#[async_trait]
impl ImageGenerationCapability for DeepInfraImageModel {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, LlmError> {
        if request.count == 0 {
            return Err(LlmError::InvalidParameter(
                "Image count must be at least 1".to_string(),
            ));
        }
        if request.count > MAX_IMAGES_PER_GENERATION {
            return Err(LlmError::InvalidParameter(format!(
                "Image count {} exceeds the limit of {MAX_IMAGES_PER_GENERATION}",
                request.count
            )));
        }

        let max = self.max_images_per_call();
        let calls = request.count.div_ceil(max.max(1));
        if calls > 1 {
            tracing::debug!(
                model = %self.model_id,
                count = request.count,
                calls,
                "splitting image request"
            );
        }

        let transport = self.config.fetch.clone().unwrap_or_else(default_transport);
        let results: Vec<_> = futures::stream::iter(split_count(request.count, max))
            .map(|n| self.generate_batch(transport.as_ref(), &request, n))
            .buffered(MAX_CONCURRENT_IMAGE_CALLS)
            .try_collect()
            .await?;

        let mut images = Vec::new();
        let mut responses = Vec::with_capacity(results.len());
        for (batch, info) in results {
            images.extend(batch);
            responses.push(info);
        }

        Ok(ImageGenerationResponse {
            images,
            warnings: Vec::<Warning>::new(),
            responses,
        })
    }

    fn max_images_per_call(&self) -> u32 {
        self.settings.resolved_max_images_per_call()
    }
}

/// Parse `"{width}x{height}"`.
fn parse_size(size: &str) -> Result<(u32, u32), LlmError> {
    let invalid = || {
        LlmError::InvalidParameter(format!(
            "Invalid image size '{size}', expected '{{width}}x{{height}}'"
        ))
    };
    let (width, height) = size.split_once('x').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

fn strip_data_url_prefix(image: &str) -> &str {
    match image.strip_prefix("data:image/") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((subtype, data)) if subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                data
            }
            _ => image,
        },
        None => image,
    }
}

/// Split `count` into per-call sizes of at most `max`.
fn split_count(count: u32, max: u32) -> impl Iterator<Item = u32> {
    let max = max.max(1);
    let rest = count % max;
    std::iter::repeat_n(max, (count / max) as usize).chain((rest != 0).then_some(rest))
}

/// The inference API reports errors as `{"detail": {"error": "..."}}`.
fn deepinfra_image_http_error(provider: &str, status: u16, body: &str) -> LlmError {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        json.get("detail")?
            .get("error")?
            .as_str()
            .map(str::to_string)
    });

    match detail {
        Some(message) => match status {
            401 | 403 => LlmError::AuthenticationError(message),
            429 => LlmError::RateLimitError(message),
            _ => LlmError::api_error(status, message),
        },
        None => openai_compatible_http_error(provider, status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::transport::{HttpTransportRequest, HttpTransportResponse};
    use reqwest::header::HeaderMap;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn model(settings: DeepInfraImageSettings) -> DeepInfraImageModel {
        DeepInfraImageModel::new(
            "black-forest-labs/FLUX-1-schnell",
            settings,
            DeepInfraImageModelConfig {
                provider: "deepinfra.image".to_string(),
                base_url: "https://api.deepinfra.com/v1/inference".to_string(),
                headers: Arc::new(|| Ok(HashMap::new())),
                fetch: None,
            },
        )
    }

    #[test]
    fn url_appends_model_id() {
        assert_eq!(
            model(DeepInfraImageSettings::new()).url(),
            "https://api.deepinfra.com/v1/inference/black-forest-labs/FLUX-1-schnell"
        );
    }

    #[test]
    fn body_maps_size_and_options() {
        let request = ImageGenerationRequest::new("a cat")
            .with_size("1024x768")
            .with_seed(7)
            .with_aspect_ratio("4:3")
            .with_provider_option("num_inference_steps", json!(4));
        let body = model(DeepInfraImageSettings::new())
            .build_body(&request, 2)
            .unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "a cat",
                "num_images": 2,
                "aspect_ratio": "4:3",
                "width": 1024,
                "height": 768,
                "seed": 7,
                "num_inference_steps": 4
            })
        );
    }

    #[test]
    fn invalid_size_is_rejected() {
        let request = ImageGenerationRequest::new("a cat").with_size("large");
        let err = model(DeepInfraImageSettings::new())
            .build_body(&request, 1)
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidParameter(_)));
    }

    #[test]
    fn strips_only_image_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,BBBB"), "BBBB");
        assert_eq!(strip_data_url_prefix("CCCC"), "CCCC");
        assert_eq!(
            strip_data_url_prefix("data:text/plain;base64,DDDD"),
            "data:text/plain;base64,DDDD"
        );
    }

    #[test]
    fn split_count_respects_limit() {
        let split = |count, max| split_count(count, max).collect::<Vec<_>>();
        assert_eq!(split(3, 1), vec![1, 1, 1]);
        assert_eq!(split(5, 2), vec![2, 2, 1]);
        assert_eq!(split(2, 4), vec![2]);
        assert_eq!(split(4, 0), vec![1, 1, 1, 1]);
    }

    #[test]
    fn split_count_is_lazy_for_huge_counts() {
        let mut batches = split_count(u32::MAX, 1);
        assert_eq!(batches.next(), Some(1));
        assert_eq!(batches.size_hint(), (u32::MAX as usize - 1, Some(u32::MAX as usize - 1)));
    }

    #[test]
    fn detail_error_body_becomes_message() {
        let err = deepinfra_image_http_error(
            "deepinfra",
            422,
            r#"{"detail":{"error":"prompt too long"}}"#,
        );
        match err {
            LlmError::ApiError { code, message, .. } => {
                assert_eq!(code, 422);
                assert_eq!(message, "prompt too long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            deepinfra_image_http_error("deepinfra", 401, r#"{"detail":{"error":"bad token"}}"#),
            LlmError::AuthenticationError(_)
        ));
    }

    #[tokio::test]
    async fn count_above_generation_limit_is_rejected() {
        let err = model(DeepInfraImageSettings::new())
            .generate_images(ImageGenerationRequest::new("x").with_count(u32::MAX))
            .await
            .unwrap_err();
        match err {
            LlmError::InvalidParameter(message) => assert!(message.contains("exceeds")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Counts requests in flight and remembers the peak.
    #[derive(Default)]
    struct CountingTransport {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpTransport for CountingTransport {
        async fn execute_json(
            &self,
            _request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(HttpTransportResponse {
                status: 200,
                headers: HeaderMap::new(),
                body: br#"{"images":["aW1n"]}"#.to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn split_calls_are_bounded_in_flight() {
        let transport = Arc::new(CountingTransport::default());
        let mut config = model(DeepInfraImageSettings::new()).config;
        config.fetch = Some(Arc::clone(&transport) as Arc<dyn HttpTransport>);
        let m = DeepInfraImageModel::new("m", DeepInfraImageSettings::new(), config);

        let count = (MAX_CONCURRENT_IMAGE_CALLS * 3) as u32;
        let response = m
            .generate_images(ImageGenerationRequest::new("x").with_count(count))
            .await
            .unwrap();

        assert_eq!(response.images.len(), count as usize);
        assert_eq!(response.responses.len(), count as usize);
        assert_eq!(transport.calls.load(Ordering::SeqCst), count as usize);
        assert!(transport.peak.load(Ordering::SeqCst) <= MAX_CONCURRENT_IMAGE_CALLS);
    }

    #[tokio::test]
    async fn zero_count_is_rejected() {
        let err = model(DeepInfraImageSettings::new())
            .generate_images(ImageGenerationRequest::new("x").with_count(0))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidParameter(_)));
    }
}
