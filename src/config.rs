use std::time::Duration;

/// Configuration for the advisory core, built once at process start and
/// passed into the facade. Replaces ambient module-level client state.
#[derive(Debug, Clone)]
pub struct AgriConfig {
    pub embedding_model: String,
    pub text_model: String,
    pub vision_model: String,
    pub treatments_namespace: String,
    pub schemes_namespace: String,
    /// Max records per vector-store upsert chunk.
    pub upsert_chunk_size: usize,
    /// Texts per upstream embedding call during batch stores.
    pub embed_batch_size: usize,
    pub treatment_top_k: usize,
    pub scheme_top_k: usize,
    pub max_image_bytes: usize,
    pub accepted_image_mime: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for AgriConfig {
    fn default() -> Self {
        Self {
            embedding_model: "text-embedding-004".into(),
            text_model: "gemini-2.5-flash".into(),
            vision_model: "gemini-2.5-flash".into(),
            treatments_namespace: "treatments".into(),
            schemes_namespace: "schemes".into(),
            upsert_chunk_size: 100,
            embed_batch_size: 8,
            treatment_top_k: 5,
            scheme_top_k: 10,
            max_image_bytes: 5 * 1024 * 1024,
            accepted_image_mime: "image/jpeg".into(),
            request_timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl AgriConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("AGRIGROW_EMBEDDING_MODEL") {
            config.embedding_model = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_TEXT_MODEL") {
            config.text_model = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_VISION_MODEL") {
            config.vision_model = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_TREATMENTS_NAMESPACE") {
            config.treatments_namespace = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_SCHEMES_NAMESPACE") {
            config.schemes_namespace = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_UPSERT_CHUNK_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                config.upsert_chunk_size = n;
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_EMBED_BATCH_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                config.embed_batch_size = n;
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_TREATMENT_TOP_K") {
            if let Ok(n) = v.parse::<usize>() {
                config.treatment_top_k = n;
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_SCHEME_TOP_K") {
            if let Ok(n) = v.parse::<usize>() {
                config.scheme_top_k = n;
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_MAX_IMAGE_BYTES") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_image_bytes = n;
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_IMAGE_MIME") {
            config.accepted_image_mime = v;
        }
        if let Ok(v) = std::env::var("AGRIGROW_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(v) = std::env::var("AGRIGROW_MAX_RETRIES") {
            if let Ok(n) = v.parse::<u32>() {
                config.max_retries = n;
            }
        }
        config
    }
}
