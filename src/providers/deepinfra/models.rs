//! DeepInfra model ids.
//!
//! Any id accepted by DeepInfra works; these are the commonly used ones.

/// Chat models (`/openai/chat/completions`)
pub mod chat {
    pub const LLAMA_3_3_70B_INSTRUCT: &str = "meta-llama/Llama-3.3-70B-Instruct";
    pub const LLAMA_3_3_70B_INSTRUCT_TURBO: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
    pub const LLAMA_3_1_8B_INSTRUCT: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct";
    pub const LLAMA_3_1_70B_INSTRUCT: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct";
    pub const LLAMA_3_1_405B_INSTRUCT: &str = "meta-llama/Meta-Llama-3.1-405B-Instruct";
    pub const LLAMA_4_MAVERICK_17B_128E_INSTRUCT_FP8: &str =
        "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8";
    pub const LLAMA_4_SCOUT_17B_16E_INSTRUCT: &str = "meta-llama/Llama-4-Scout-17B-16E-Instruct";
    /// `DeepSeek` V3
    pub const DEEPSEEK_V3: &str = "deepseek-ai/DeepSeek-V3";
    /// `DeepSeek` R1 (reasoning, streams `reasoning_content`)
    pub const DEEPSEEK_R1: &str = "deepseek-ai/DeepSeek-R1";
    pub const DEEPSEEK_R1_DISTILL_LLAMA_70B: &str = "deepseek-ai/DeepSeek-R1-Distill-Llama-70B";
    pub const QWEN_2_5_72B_INSTRUCT: &str = "Qwen/Qwen2.5-72B-Instruct";
    pub const QWEN_2_5_CODER_32B_INSTRUCT: &str = "Qwen/Qwen2.5-Coder-32B-Instruct";
    pub const QWQ_32B: &str = "Qwen/QwQ-32B";
    pub const MISTRAL_SMALL_24B_INSTRUCT: &str = "mistralai/Mistral-Small-24B-Instruct-2501";
    pub const MIXTRAL_8X7B_INSTRUCT: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
    pub const GEMMA_2_27B_IT: &str = "google/gemma-2-27b-it";

    pub const ALL: &[&str] = &[
        LLAMA_3_3_70B_INSTRUCT,
        LLAMA_3_3_70B_INSTRUCT_TURBO,
        LLAMA_3_1_8B_INSTRUCT,
        LLAMA_3_1_70B_INSTRUCT,
        LLAMA_3_1_405B_INSTRUCT,
        LLAMA_4_MAVERICK_17B_128E_INSTRUCT_FP8,
        LLAMA_4_SCOUT_17B_16E_INSTRUCT,
        DEEPSEEK_V3,
        DEEPSEEK_R1,
        DEEPSEEK_R1_DISTILL_LLAMA_70B,
        QWEN_2_5_72B_INSTRUCT,
        QWEN_2_5_CODER_32B_INSTRUCT,
        QWQ_32B,
        MISTRAL_SMALL_24B_INSTRUCT,
        MIXTRAL_8X7B_INSTRUCT,
        GEMMA_2_27B_IT,
    ];
}

/// Completion models (`/openai/completions`)
pub mod completion {
    pub const LLAMA_3_1_8B_INSTRUCT: &str = super::chat::LLAMA_3_1_8B_INSTRUCT;
    pub const LLAMA_3_3_70B_INSTRUCT: &str = super::chat::LLAMA_3_3_70B_INSTRUCT;
    pub const QWEN_2_5_CODER_32B_INSTRUCT: &str = super::chat::QWEN_2_5_CODER_32B_INSTRUCT;

    pub const ALL: &[&str] = &[
        LLAMA_3_1_8B_INSTRUCT,
        LLAMA_3_3_70B_INSTRUCT,
        QWEN_2_5_CODER_32B_INSTRUCT,
    ];
}

/// Embedding models (`/openai/embeddings`)
pub mod embedding {
    pub const BGE_BASE_EN_V1_5: &str = "BAAI/bge-base-en-v1.5";
    pub const BGE_LARGE_EN_V1_5: &str = "BAAI/bge-large-en-v1.5";
    pub const BGE_M3: &str = "BAAI/bge-m3";
    pub const E5_BASE_V2: &str = "intfloat/e5-base-v2";
    pub const E5_LARGE_V2: &str = "intfloat/e5-large-v2";
    pub const MULTILINGUAL_E5_LARGE: &str = "intfloat/multilingual-e5-large";
    pub const ALL_MINILM_L12_V2: &str = "sentence-transformers/all-MiniLM-L12-v2";
    pub const ALL_MINILM_L6_V2: &str = "sentence-transformers/all-MiniLM-L6-v2";
    pub const ALL_MPNET_BASE_V2: &str = "sentence-transformers/all-mpnet-base-v2";

    pub const ALL: &[&str] = &[
        BGE_BASE_EN_V1_5,
        BGE_LARGE_EN_V1_5,
        BGE_M3,
        E5_BASE_V2,
        E5_LARGE_V2,
        MULTILINGUAL_E5_LARGE,
        ALL_MINILM_L12_V2,
        ALL_MINILM_L6_V2,
        ALL_MPNET_BASE_V2,
    ];
}

/// Image models (`/inference/{model}`)
pub mod image {
    pub const FLUX_1_SCHNELL: &str = "black-forest-labs/FLUX-1-schnell";
    pub const FLUX_1_DEV: &str = "black-forest-labs/FLUX-1-dev";
    pub const FLUX_1_1_PRO: &str = "black-forest-labs/FLUX-1.1-pro";
    pub const FLUX_PRO: &str = "black-forest-labs/FLUX-pro";
    pub const SD3_5: &str = "stabilityai/sd3.5";
    pub const SD3_5_MEDIUM: &str = "stabilityai/sd3.5-medium";
    pub const SDXL_TURBO: &str = "stabilityai/sdxl-turbo";

    pub const ALL: &[&str] = &[
        FLUX_1_SCHNELL,
        FLUX_1_DEV,
        FLUX_1_1_PRO,
        FLUX_PRO,
        SD3_5,
        SD3_5_MEDIUM,
        SDXL_TURBO,
    ];
}
