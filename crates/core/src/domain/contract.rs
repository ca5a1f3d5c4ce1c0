use crate::domain::post::{Post, DEFAULT_TREND_CATEGORY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAnalysisRequest {
    pub posts: Vec<Post>,
    pub group_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSuggestionRequest {
    pub trend_analysis: TrendAnalysisInput,
    pub ai_insights: AiInsightsInput,
}

/// The parts of a previous trend analysis the suggestion templates read. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysisInput {
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for TrendAnalysisInput {
    fn default() -> Self {
        Self {
            category: default_category(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiInsightsInput {
    #[serde(default)]
    pub viral_factors: Vec<String>,
    #[serde(default)]
    pub content_themes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallAnalysisRequest {
    pub all_posts: Vec<Post>,
}

fn default_category() -> String {
    DEFAULT_TREND_CATEGORY.to_string()
}
