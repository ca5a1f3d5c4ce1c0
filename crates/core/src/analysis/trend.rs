use crate::analysis::category::classify_content_category;
use crate::analysis::extract::{extract_hashtags_and_keywords, Extracted};
use crate::analysis::sentiment::{analyze_sentiment_batch, SentimentSummary, MAX_TEXT_CHARS};
use crate::domain::contract::PostAnalysisRequest;
use crate::domain::post::Post;
use crate::domain::report::PostAnalysisResponse;
use crate::error::AnalysisError;
use crate::inference::ModelRegistry;
use crate::text::{format_percent, format_thousands, truncate_chars};

const MAX_TITLE_CHARS: usize = 60;
const MAX_DESCRIPTION_CHARS: usize = 200;

/// Summarises one group of trending posts.
pub async fn analyze_posts(
    models: &ModelRegistry,
    request: &PostAnalysisRequest,
) -> Result<PostAnalysisResponse, AnalysisError> {
    let texts = post_texts(&request.posts);
    if texts.is_empty() {
        return Err(AnalysisError::NoContent);
    }

    let total_engagement = total_engagement(&request.posts)?;

    let sentiment = analyze_sentiment_batch(models.sentiment(), &texts).await;
    let category = classify_content_category(models.classifier(), &texts).await;
    let extracted = extract_hashtags_and_keywords(&texts);

    tracing::info!(
        group_key = %request.group_key,
        posts = request.posts.len(),
        texts = texts.len(),
        %category,
        sentiment = %sentiment.overall_sentiment,
        "analyzed post group"
    );

    Ok(build_report(
        &request.group_key,
        request.posts.len(),
        total_engagement,
        &sentiment,
        &category,
        &extracted,
    ))
}

fn post_texts(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .filter_map(Post::content)
        .map(|c| truncate_chars(c, MAX_TEXT_CHARS).to_string())
        .collect()
}

pub(crate) fn total_engagement(posts: &[Post]) -> Result<f64, AnalysisError> {
    posts.iter().map(Post::engagement_score).sum()
}

fn build_report(
    group_key: &str,
    post_count: usize,
    total_engagement: f64,
    sentiment: &SentimentSummary,
    category: &str,
    extracted: &Extracted,
) -> PostAnalysisResponse {
    let avg_engagement = if post_count > 0 {
        total_engagement / post_count as f64
    } else {
        0.0
    };

    let insights = vec![
        format!(
            "Analyzed {post_count} viral posts with {} total engagement",
            format_thousands(total_engagement)
        ),
        format!("Average engagement score: {avg_engagement:.1}"),
        format!(
            "Sentiment analysis: {} positive content",
            format_percent(sentiment.positive_ratio)
        ),
        format!("Category classification: {category} content dominates"),
    ];

    let mut viral_factors = Vec::new();
    if sentiment.positive_ratio > 0.6 {
        viral_factors.push("Positive emotional resonance drives engagement".to_string());
    }
    if avg_engagement > 1000.0 {
        viral_factors.push("High-quality content with broad appeal".to_string());
    }
    if extracted.hashtags.len() > 5 {
        viral_factors.push("Strategic hashtag usage for discoverability".to_string());
    }
    if viral_factors.is_empty() {
        viral_factors = ["Community engagement", "Timely content", "Relatable themes"]
            .map(String::from)
            .to_vec();
    }

    let content_themes = if extracted.hashtags.is_empty() && extracted.keywords.is_empty() {
        ["trending", "viral", "popular"].map(String::from).to_vec()
    } else {
        extracted
            .hashtags
            .iter()
            .take(5)
            .chain(extracted.keywords.iter().take(3))
            .cloned()
            .collect()
    };

    let engagement_prediction = if avg_engagement > 2000.0 {
        "High engagement potential - content shows strong viral indicators"
    } else if avg_engagement > 500.0 {
        "Moderate engagement expected - content has good viral elements"
    } else {
        "Growing engagement potential - optimize for better reach"
    };

    let title = format!("{category} Viral Trend: {group_key}");
    let description = format!(
        "AI analysis of {post_count} viral {} posts with {} sentiment",
        category.to_lowercase(),
        sentiment.overall_sentiment
    );

    PostAnalysisResponse {
        trend_title: truncate_chars(&title, MAX_TITLE_CHARS).to_string(),
        trend_description: truncate_chars(&description, MAX_DESCRIPTION_CHARS).to_string(),
        category: category.to_string(),
        insights,
        viral_factors,
        content_themes,
        ai_sentiment: format!(
            "{} (confidence: {:.2})",
            sentiment.overall_sentiment, sentiment.confidence
        ),
        engagement_prediction: engagement_prediction.to_string(),
    }
}
