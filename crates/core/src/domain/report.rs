use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysisResponse {
    pub trend_title: String,
    pub trend_description: String,
    pub category: String,
    pub insights: Vec<String>,
    pub viral_factors: Vec<String>,
    pub content_themes: Vec<String>,
    pub ai_sentiment: String,
    pub engagement_prediction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSuggestion {
    pub content_type: String,
    pub suggested_content: String,
    pub suggested_hashtags: Vec<String>,
    pub confidence_score: f64,
    pub viral_potential: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSuggestionsResponse {
    pub suggestions: Vec<ContentSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallInsights {
    pub virality_insights: Vec<String>,
    /// One entry per platform, in the order platforms first appear in the input.
    pub platform_recommendations: IndexMap<String, String>,
    pub timing_insights: Vec<String>,
    pub content_strategy_advice: Vec<String>,
    pub trend_predictions: Vec<String>,
}
