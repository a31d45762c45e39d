//! Default values shared across the crate.

/// HTTP defaults.
pub mod http {
    use std::time::Duration;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const USER_AGENT: &str = concat!("siumai-provider-deepinfra/", env!("CARGO_PKG_VERSION"));
}

/// DeepInfra endpoint defaults.
pub mod deepinfra {
    /// Default API origin. The OpenAI-like protocol lives under `/openai`,
    /// native inference under `/inference`.
    pub const BASE_URL: &str = "https://api.deepinfra.com/v1";

    /// Environment variable consulted when no API key is configured.
    pub const API_KEY_ENV_VAR: &str = "DEEPINFRA_API_KEY";

    pub const OPENAI_PATH: &str = "/openai";
    pub const INFERENCE_PATH: &str = "/inference";

    /// The inference API returns one image per request.
    pub const MAX_IMAGES_PER_CALL: u32 = 1;

    /// Upper bound on `count` for one image generation.
    pub const MAX_IMAGES_PER_GENERATION: u32 = 64;

    /// Inference calls kept in flight while a generation is split.
    pub const MAX_CONCURRENT_IMAGE_CALLS: usize = 4;
}

/// OpenAI-compatible model defaults.
pub mod openai_compatible {
    pub const MAX_EMBEDDINGS_PER_CALL: usize = 2048;
}
