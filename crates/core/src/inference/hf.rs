use crate::config::Settings;
use crate::inference::error::InferenceError;
use crate::inference::{SentimentModel, SentimentPrediction, ZeroShotClassifier, ZeroShotPrediction};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const WARMUP_TEXT: &str = "warm-up";
const WARMUP_LABELS: &[&str] = &["General", "Technology"];
const WARMUP_BACKOFF_BASE: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// HTTP client for backends that speak the Hugging Face Inference API
/// (`POST {base}/models/{model}`).
#[derive(Debug, Clone)]
pub struct HfInferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    warmup_retries: u32,
    warmup_backoff: Duration,
}

impl HfInferenceClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_token = if settings.uses_hosted_inference() {
            Some(settings.require_hf_api_token()?.to_string())
        } else {
            settings.hf_api_token.clone()
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.inference_timeout_secs))
            .build()
            .context("failed to build inference http client")?;

        Ok(Self {
            http,
            base_url: settings.inference_base_url.clone(),
            api_token,
            warmup_retries: settings.warmup_retries.max(1),
            warmup_backoff: WARMUP_BACKOFF_BASE,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            model.trim_start_matches('/')
        )
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.api_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }
        Ok(headers)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, model: &str, body: &B) -> anyhow::Result<Value> {
        let res = self
            .http
            .post(self.model_url(model))
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("inference request to {model} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read inference response body")?;

        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<Value>(&text).ok();
            let reason = raw_response_json
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(Value::as_str)
                .map(|e| format!(" error={e}"))
                .unwrap_or_default();
            return Err(InferenceError {
                model: model.to_string(),
                stage: "http",
                status: Some(status.as_u16()),
                detail: format!("status={status}{reason}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            InferenceError {
                model: model.to_string(),
                stage: "decode",
                status: Some(status.as_u16()),
                detail: format!("response is not valid JSON: {e}"),
                raw_output: Some(text),
                raw_response_json: None,
            }
            .into()
        })
    }

    /// Sends a warm-up request, retrying with exponential backoff while the backend reports
    /// that the model is still loading.
    async fn warm_up<B: Serialize + ?Sized>(&self, model: &str, body: &B) -> anyhow::Result<Value> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.post_json(model, body).await {
                Ok(raw) => {
                    tracing::info!(model, attempt, "model ready");
                    return Ok(raw);
                }
                Err(err) => {
                    let loading = err
                        .downcast_ref::<InferenceError>()
                        .is_some_and(InferenceError::is_model_loading);
                    if !loading || attempt >= self.warmup_retries {
                        return Err(err);
                    }
                    let backoff = self
                        .warmup_backoff
                        .saturating_mul(1u32 << (attempt - 1).min(5))
                        .min(MAX_BACKOFF);
                    tracing::warn!(
                        model,
                        attempt,
                        ?backoff,
                        error = %err,
                        "model still loading; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct TextClassificationRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Text classification replies come back nested (one list per input) or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Columns {
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    Rows(Vec<LabelScore>),
}

fn parse_error(model: &str, detail: String, raw: &Value) -> anyhow::Error {
    InferenceError {
        model: model.to_string(),
        stage: "parse",
        status: None,
        detail,
        raw_output: None,
        raw_response_json: Some(raw.clone()),
    }
    .into()
}

fn parse_sentiment_response(model: &str, raw: &Value) -> anyhow::Result<SentimentPrediction> {
    let parsed = serde_json::from_value::<TextClassificationResponse>(raw.clone())
        .map_err(|e| parse_error(model, format!("unexpected text classification shape: {e}"), raw))?;

    let candidates = match parsed {
        TextClassificationResponse::Nested(mut outer) => {
            if outer.is_empty() {
                Vec::new()
            } else {
                outer.swap_remove(0)
            }
        }
        TextClassificationResponse::Flat(items) => items,
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|top| SentimentPrediction {
            label: top.label,
            score: top.score,
        })
        .ok_or_else(|| parse_error(model, "empty text classification result".to_string(), raw))
}

fn parse_zero_shot_response(model: &str, raw: &Value) -> anyhow::Result<ZeroShotPrediction> {
    let parsed = serde_json::from_value::<ZeroShotResponse>(raw.clone())
        .map_err(|e| parse_error(model, format!("unexpected zero-shot shape: {e}"), raw))?;

    let mut ranked: Vec<(String, f64)> = match parsed {
        ZeroShotResponse::Columns { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(parse_error(
                    model,
                    format!("{} labels but {} scores", labels.len(), scores.len()),
                    raw,
                ));
            }
            labels.into_iter().zip(scores).collect()
        }
        ZeroShotResponse::Rows(rows) => rows.into_iter().map(|r| (r.label, r.score)).collect(),
    };
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (labels, scores) = ranked.into_iter().unzip();
    Ok(ZeroShotPrediction { labels, scores })
}

#[derive(Debug, Clone)]
pub struct HfSentimentModel {
    client: HfInferenceClient,
    model: String,
}

impl HfSentimentModel {
    pub fn new(client: HfInferenceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub async fn warm_up(&self) -> anyhow::Result<()> {
        let raw = self
            .client
            .warm_up(&self.model, &TextClassificationRequest { inputs: WARMUP_TEXT })
            .await?;
        parse_sentiment_response(&self.model, &raw).map(|_| ())
    }
}

#[async_trait::async_trait]
impl SentimentModel for HfSentimentModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn classify(&self, text: &str) -> anyhow::Result<SentimentPrediction> {
        let raw = self
            .client
            .post_json(&self.model, &TextClassificationRequest { inputs: text })
            .await?;
        parse_sentiment_response(&self.model, &raw)
    }
}

#[derive(Debug, Clone)]
pub struct HfZeroShotClassifier {
    client: HfInferenceClient,
    model: String,
}

impl HfZeroShotClassifier {
    pub fn new(client: HfInferenceClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub async fn warm_up(&self) -> anyhow::Result<()> {
        let req = ZeroShotRequest {
            inputs: WARMUP_TEXT,
            parameters: ZeroShotParameters {
                candidate_labels: WARMUP_LABELS,
                multi_label: false,
            },
        };
        let raw = self.client.warm_up(&self.model, &req).await?;
        parse_zero_shot_response(&self.model, &raw).map(|_| ())
    }
}

#[async_trait::async_trait]
impl ZeroShotClassifier for HfZeroShotClassifier {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> anyhow::Result<ZeroShotPrediction> {
        let req = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: false,
            },
        };
        let raw = self.client.post_json(&self.model, &req).await?;
        parse_zero_shot_response(&self.model, &raw)
    }
}
