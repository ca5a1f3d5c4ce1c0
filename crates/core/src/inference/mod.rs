pub mod error;
pub mod hf;

use crate::config::Settings;
use anyhow::Context;
use std::fmt;
use std::sync::Arc;

/// Top-ranked label for a single text.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPrediction {
    pub label: String,
    pub score: f64,
}

/// Candidate labels ranked best first, with their scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZeroShotPrediction {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotPrediction {
    pub fn top_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

#[async_trait::async_trait]
pub trait SentimentModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn classify(&self, text: &str) -> anyhow::Result<SentimentPrediction>;
}

#[async_trait::async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    fn model_id(&self) -> &str;

    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> anyhow::Result<ZeroShotPrediction>;
}

/// Where the backend runs the models. Only used for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda { gpu_name: Option<String> },
}

impl Device {
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.inference_device.as_deref() {
            Some(d) if d.eq_ignore_ascii_case("cuda") || d.eq_ignore_ascii_case("gpu") => {
                Device::Cuda {
                    gpu_name: settings.gpu_name.clone(),
                }
            }
            _ => Device::Cpu,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Device::Cpu => "CPU",
            Device::Cuda { .. } => "GPU (CUDA)",
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, Device::Cuda { .. })
    }
}

/// The model handles built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct ModelRegistry {
    sentiment: Arc<dyn SentimentModel>,
    classifier: Arc<dyn ZeroShotClassifier>,
    device: Device,
}

impl ModelRegistry {
    pub fn new(
        sentiment: Arc<dyn SentimentModel>,
        classifier: Arc<dyn ZeroShotClassifier>,
        device: Device,
    ) -> Self {
        Self {
            sentiment,
            classifier,
            device,
        }
    }

    /// Builds both backend clients and probes each model once. Any failure aborts startup.
    pub async fn load(settings: &Settings) -> anyhow::Result<Self> {
        let device = Device::from_settings(settings);
        tracing::info!(
            device = device.display_name(),
            base_url = %settings.inference_base_url,
            "loading inference models"
        );

        let client = hf::HfInferenceClient::from_settings(settings)?;
        let sentiment = hf::HfSentimentModel::new(client.clone(), &settings.sentiment_model);
        let classifier =
            hf::HfZeroShotClassifier::new(client, &settings.classification_model);

        sentiment
            .warm_up()
            .await
            .with_context(|| format!("failed to load sentiment model {}", settings.sentiment_model))?;
        classifier.warm_up().await.with_context(|| {
            format!(
                "failed to load classification model {}",
                settings.classification_model
            )
        })?;

        let registry = Self::new(Arc::new(sentiment), Arc::new(classifier), device);
        tracing::info!(
            models_loaded = registry.models_loaded(),
            device = registry.device.display_name(),
            "all models loaded"
        );
        Ok(registry)
    }

    pub fn sentiment(&self) -> &dyn SentimentModel {
        self.sentiment.as_ref()
    }

    pub fn classifier(&self) -> &dyn ZeroShotClassifier {
        self.classifier.as_ref()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn models_loaded(&self) -> usize {
        2
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("sentiment", &self.sentiment.model_id())
            .field("classifier", &self.classifier.model_id())
            .field("device", &self.device)
            .finish()
    }
}
