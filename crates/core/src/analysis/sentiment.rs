use crate::inference::SentimentModel;
use crate::text::truncate_chars;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest text sent to the sentiment model.
pub const MAX_TEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Accepts both raw head labels (`LABEL_0..2`) and named labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "label_0" | "negative" => Some(Sentiment::Negative),
            "label_1" | "neutral" => Some(Sentiment::Neutral),
            "label_2" | "positive" => Some(Sentiment::Positive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub overall_sentiment: Sentiment,
    pub confidence: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub neutral_ratio: f64,
}

impl SentimentSummary {
    /// Reported when the model cannot be used.
    pub fn fallback() -> Self {
        Self {
            overall_sentiment: Sentiment::Neutral,
            confidence: 0.5,
            positive_ratio: 0.33,
            negative_ratio: 0.33,
            neutral_ratio: 0.34,
        }
    }

    fn from_counts(positive: usize, negative: usize, neutral: usize, score_sum: f64) -> Self {
        let total = positive + negative + neutral;
        if total == 0 {
            return Self {
                overall_sentiment: Sentiment::Neutral,
                confidence: 0.0,
                positive_ratio: 0.0,
                negative_ratio: 0.0,
                neutral_ratio: 0.0,
            };
        }

        let overall_sentiment = if positive > negative && positive > neutral {
            Sentiment::Positive
        } else if negative > positive && negative > neutral {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        let total_f = total as f64;
        Self {
            overall_sentiment,
            confidence: score_sum / total_f,
            positive_ratio: positive as f64 / total_f,
            negative_ratio: negative as f64 / total_f,
            neutral_ratio: neutral as f64 / total_f,
        }
    }
}

/// Classifies every text and aggregates the labels. Never fails: model errors degrade to
/// [`SentimentSummary::fallback`].
pub async fn analyze_sentiment_batch(
    model: &dyn SentimentModel,
    texts: &[String],
) -> SentimentSummary {
    match try_analyze(model, texts).await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!(
                model = model.model_id(),
                error = %format!("{err:#}"),
                "sentiment analysis failed; using neutral fallback"
            );
            SentimentSummary::fallback()
        }
    }
}

async fn try_analyze(
    model: &dyn SentimentModel,
    texts: &[String],
) -> anyhow::Result<SentimentSummary> {
    let (mut positive, mut negative, mut neutral) = (0usize, 0usize, 0usize);
    let mut score_sum = 0.0;

    for text in texts {
        let prediction = model.classify(truncate_chars(text, MAX_TEXT_CHARS)).await?;
        let sentiment = Sentiment::from_label(&prediction.label)
            .with_context(|| format!("unrecognised sentiment label {:?}", prediction.label))?;
        match sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Negative => negative += 1,
            Sentiment::Neutral => neutral += 1,
        }
        score_sum += prediction.score;
    }

    Ok(SentimentSummary::from_counts(
        positive, negative, neutral, score_sum,
    ))
}
