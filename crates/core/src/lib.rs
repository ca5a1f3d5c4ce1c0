pub mod analysis;
pub mod domain;
pub mod error;
pub mod inference;
pub mod text;

pub mod config {
    use anyhow::Context;

    const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co";
    const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
    const DEFAULT_CLASSIFICATION_MODEL: &str = "facebook/bart-large-mnli";
    const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 60;
    const DEFAULT_WARMUP_RETRIES: u32 = 5;
    const DEFAULT_PORT: u16 = 8000;
    const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001"];

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
        pub inference_base_url: String,
        pub hf_api_token: Option<String>,
        pub sentiment_model: String,
        pub classification_model: String,
        pub inference_timeout_secs: u64,
        pub warmup_retries: u32,
        pub inference_device: Option<String>,
        pub gpu_name: Option<String>,
        pub cors_allowed_origins: Vec<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = parse_var("PORT", DEFAULT_PORT)?;
            let inference_timeout_secs =
                parse_var("INFERENCE_TIMEOUT_SECS", DEFAULT_INFERENCE_TIMEOUT_SECS)?;
            let warmup_retries = parse_var("INFERENCE_WARMUP_RETRIES", DEFAULT_WARMUP_RETRIES)?;

            let cors_allowed_origins = non_empty_var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());

            Ok(Self {
                port,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                inference_base_url: non_empty_var("INFERENCE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string()),
                hf_api_token: non_empty_var("HF_API_TOKEN"),
                sentiment_model: non_empty_var("SENTIMENT_MODEL")
                    .unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
                classification_model: non_empty_var("CLASSIFICATION_MODEL")
                    .unwrap_or_else(|| DEFAULT_CLASSIFICATION_MODEL.to_string()),
                inference_timeout_secs,
                warmup_retries,
                inference_device: non_empty_var("INFERENCE_DEVICE"),
                gpu_name: non_empty_var("INFERENCE_GPU_NAME"),
                cors_allowed_origins,
            })
        }

        /// The hosted Hugging Face endpoint rejects anonymous calls; self-hosted gateways
        /// usually do not need a token.
        pub fn uses_hosted_inference(&self) -> bool {
            self.inference_base_url.trim_end_matches('/') == DEFAULT_INFERENCE_BASE_URL
        }

        pub fn require_hf_api_token(&self) -> anyhow::Result<&str> {
            self.hf_api_token
                .as_deref()
                .context("HF_API_TOKEN is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Unset or blank falls back to `default`; anything else must parse.
    fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        parse_value(key, non_empty_var(key).as_deref(), default)
    }

    fn parse_value<T>(key: &str, raw: Option<&str>, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match raw {
            Some(v) => v
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {v}")),
            None => Ok(default),
        }
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect()
    }

}
