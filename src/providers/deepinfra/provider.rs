//! DeepInfra provider factory.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

use super::image::{DeepInfraImageModel, DeepInfraImageModelConfig};
use super::settings::{
    DeepInfraChatSettings, DeepInfraCompletionSettings, DeepInfraEmbeddingSettings,
    DeepInfraImageSettings, DeepInfraProviderSettings,
};
use crate::defaults::deepinfra as defaults;
use crate::error::LlmError;
use crate::execution::http::headers::combine_headers;
use crate::execution::http::transport::{HttpTransport, ReqwestTransport};
use crate::standards::openai_compatible::{
    HeadersResolver, OpenAiCompatibleChatLanguageModel, OpenAiCompatibleCompletionLanguageModel,
    OpenAiCompatibleConfig, OpenAiCompatibleEmbeddingModel, UrlOptions, UrlResolver,
};
use crate::traits::{
    ChatCapability, EmbeddingCapability, ImageGenerationCapability, ProviderFactory,
};
use crate::types::ObjectGenerationMode;
use crate::utils::api_key::load_api_key;
use crate::utils::url::without_trailing_slash;

struct ProviderInner {
    base_url: String,
    api_key: Option<SecretString>,
    headers: HashMap<String, String>,
    fetch: Option<Arc<dyn HttpTransport>>,
}

/// Factory for DeepInfra models.
///
/// Cheap to clone. Every factory call returns a fresh model; nothing is
/// cached and no request is made until the model is used.
#[derive(Clone)]
pub struct DeepInfraProvider {
    inner: Arc<ProviderInner>,
}

impl std::fmt::Debug for DeepInfraProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepInfraProvider")
            .field("base_url", &self.inner.base_url)
            .field("has_api_key", &self.inner.api_key.is_some())
            .field("has_fetch", &self.inner.fetch.is_some())
            .finish_non_exhaustive()
    }
}

/// Create a DeepInfra provider.
///
/// Never fails: a missing API key is reported by the first request.
pub fn create_deepinfra(settings: DeepInfraProviderSettings) -> DeepInfraProvider {
    let DeepInfraProviderSettings {
        api_key,
        base_url,
        headers,
        fetch,
        http_config,
    } = settings;

    let base_url = without_trailing_slash(base_url.as_deref().unwrap_or(defaults::BASE_URL))
        .to_string();
    let fetch = fetch.or_else(|| {
        http_config.map(|config| Arc::new(ReqwestTransport::new(config)) as Arc<dyn HttpTransport>)
    });

    tracing::debug!(base_url = %base_url, has_fetch = fetch.is_some(), "created DeepInfra provider");

    DeepInfraProvider {
        inner: Arc::new(ProviderInner {
            base_url,
            api_key,
            headers,
            fetch,
        }),
    }
}

/// Provider with default settings: key from `DEEPINFRA_API_KEY`, default base URL.
pub fn deepinfra() -> DeepInfraProvider {
    create_deepinfra(DeepInfraProviderSettings::default())
}

impl DeepInfraProvider {
    /// Resolved base URL; one trailing `/` of the configured value is dropped.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Header resolver shared by all model configs.
    ///
    /// Each call re-reads the API key, so a key exported after the provider was
    /// created is picked up.
    pub fn headers(&self) -> HeadersResolver {
        let inner = Arc::clone(&self.inner);
        Arc::new(move || {
            let api_key = load_api_key(
                inner.api_key.as_ref(),
                defaults::API_KEY_ENV_VAR,
                "DeepInfra",
            )?;
            let computed = HashMap::from([(
                "Authorization".to_string(),
                format!("Bearer {api_key}"),
            )]);
            Ok(combine_headers(computed, &inner.headers))
        })
    }

    fn openai_url(&self) -> UrlResolver {
        let base = format!("{}{}", self.inner.base_url, defaults::OPENAI_PATH);
        Arc::new(move |opts: UrlOptions<'_>| format!("{base}{}", opts.path))
    }

    fn common_config(&self, kind: &str) -> OpenAiCompatibleConfig {
        OpenAiCompatibleConfig::new(
            format!("deepinfra.{kind}"),
            self.openai_url(),
            self.headers(),
        )
        .with_fetch(self.inner.fetch.clone())
    }

    pub fn chat_config(&self) -> OpenAiCompatibleConfig {
        self.common_config("chat")
            .with_default_object_generation_mode(ObjectGenerationMode::Json)
    }

    pub fn completion_config(&self) -> OpenAiCompatibleConfig {
        self.common_config("completion")
    }

    pub fn embedding_config(&self) -> OpenAiCompatibleConfig {
        self.common_config("embedding")
    }

    pub fn image_config(&self) -> DeepInfraImageModelConfig {
        DeepInfraImageModelConfig {
            provider: "deepinfra.image".to_string(),
            base_url: format!("{}{}", self.inner.base_url, defaults::INFERENCE_PATH),
            headers: self.headers(),
            fetch: self.inner.fetch.clone(),
        }
    }

    /// Default model kind: same as [`chat_model`](Self::chat_model).
    pub fn model(&self, model_id: &str) -> OpenAiCompatibleChatLanguageModel {
        self.chat_model(model_id)
    }

    pub fn model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraChatSettings,
    ) -> OpenAiCompatibleChatLanguageModel {
        self.chat_model_with_settings(model_id, settings)
    }

    pub fn language_model(&self, model_id: &str) -> OpenAiCompatibleChatLanguageModel {
        self.chat_model(model_id)
    }

    pub fn language_model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraChatSettings,
    ) -> OpenAiCompatibleChatLanguageModel {
        self.chat_model_with_settings(model_id, settings)
    }

    pub fn chat_model(&self, model_id: &str) -> OpenAiCompatibleChatLanguageModel {
        self.chat_model_with_settings(model_id, DeepInfraChatSettings::default())
    }

    pub fn chat_model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraChatSettings,
    ) -> OpenAiCompatibleChatLanguageModel {
        OpenAiCompatibleChatLanguageModel::new(model_id, settings, self.chat_config())
    }

    pub fn completion_model(&self, model_id: &str) -> OpenAiCompatibleCompletionLanguageModel {
        self.completion_model_with_settings(model_id, DeepInfraCompletionSettings::default())
    }

    pub fn completion_model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraCompletionSettings,
    ) -> OpenAiCompatibleCompletionLanguageModel {
        OpenAiCompatibleCompletionLanguageModel::new(model_id, settings, self.completion_config())
    }

    pub fn text_embedding_model(&self, model_id: &str) -> OpenAiCompatibleEmbeddingModel {
        self.text_embedding_model_with_settings(model_id, DeepInfraEmbeddingSettings::default())
    }

    pub fn text_embedding_model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraEmbeddingSettings,
    ) -> OpenAiCompatibleEmbeddingModel {
        OpenAiCompatibleEmbeddingModel::new(model_id, settings, self.embedding_config())
    }

    pub fn image(&self, model_id: &str) -> DeepInfraImageModel {
        self.image_model(model_id)
    }

    pub fn image_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraImageSettings,
    ) -> DeepInfraImageModel {
        self.image_model_with_settings(model_id, settings)
    }

    pub fn image_model(&self, model_id: &str) -> DeepInfraImageModel {
        self.image_model_with_settings(model_id, DeepInfraImageSettings::default())
    }

    pub fn image_model_with_settings(
        &self,
        model_id: &str,
        settings: DeepInfraImageSettings,
    ) -> DeepInfraImageModel {
        DeepInfraImageModel::new(model_id, settings, self.image_config())
    }
}

impl ProviderFactory for DeepInfraProvider {
    fn language_model(&self, model_id: &str) -> Result<Arc<dyn ChatCapability>, LlmError> {
        Ok(Arc::new(self.chat_model(model_id)))
    }

    fn embedding_model(&self, model_id: &str) -> Result<Arc<dyn EmbeddingCapability>, LlmError> {
        Ok(Arc::new(self.text_embedding_model(model_id)))
    }

    fn image_model(
        &self,
        model_id: &str,
    ) -> Result<Arc<dyn ImageGenerationCapability>, LlmError> {
        Ok(Arc::new(DeepInfraProvider::image_model(self, model_id)))
    }

    fn provider_name(&self) -> &'static str {
        "deepinfra"
    }
}
