use crate::domain::contract::ContentSuggestionRequest;
use crate::domain::report::{ContentSuggestion, ContentSuggestionsResponse};
use crate::text::dedup_preserving_order;

const MAX_HASHTAGS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Reel,
    Post,
    Story,
    Carousel,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Reel,
        ContentType::Post,
        ContentType::Story,
        ContentType::Carousel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Reel => "reel",
            ContentType::Post => "post",
            ContentType::Story => "story",
            ContentType::Carousel => "carousel",
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            ContentType::Reel => 0.85,
            ContentType::Post => 0.80,
            ContentType::Story => 0.75,
            ContentType::Carousel => 0.78,
        }
    }
}

/// Fills the per-format templates from a previous trend analysis. Always yields one
/// suggestion per [`ContentType`], in order.
pub fn generate_content_suggestions(
    request: &ContentSuggestionRequest,
) -> ContentSuggestionsResponse {
    let category = request.trend_analysis.category.as_str();
    let themes = &request.ai_insights.content_themes;
    let factors = &request.ai_insights.viral_factors;

    let ideas = content_ideas(category, themes, factors);
    let hashtags = suggested_hashtags(category, themes);
    let first_theme = themes.first().map(String::as_str);
    let first_factor = factors.first().map(String::as_str);
    let category_lower = category.to_lowercase();

    let suggestions = ContentType::ALL
        .into_iter()
        .map(|content_type| {
            let suggested_content = match content_type {
                ContentType::Reel => format!(
                    "🎥 {} | Create a 30-60 second video showcasing {}",
                    ideas[0],
                    first_theme.unwrap_or("trending topic")
                ),
                ContentType::Post => format!(
                    "📝 {} | Share your insights with engaging visuals",
                    ideas[1]
                ),
                ContentType::Story => format!(
                    "📱 {} | Quick story with polls/questions for engagement",
                    ideas[2]
                ),
                ContentType::Carousel => format!(
                    "🔄 {} | Multi-slide breakdown with key points and takeaways",
                    ideas[0]
                ),
            };

            ContentSuggestion {
                content_type: content_type.as_str().to_string(),
                suggested_content,
                suggested_hashtags: hashtags.clone(),
                confidence_score: content_type.confidence(),
                viral_potential: format!(
                    "High potential due to {} and current {category_lower} trends",
                    first_factor.unwrap_or("engaging content")
                ),
                target_audience: format!(
                    "{category} enthusiasts, social media users interested in trending topics"
                ),
            }
        })
        .collect();

    ContentSuggestionsResponse { suggestions }
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn content_ideas(category: &str, themes: &[String], factors: &[String]) -> [String; 3] {
    let first_theme = themes.first().map(String::as_str);
    let first_factor = factors.first().map(String::as_str);

    match category.to_lowercase().as_str() {
        "technology" => [
            format!("Tech trend: {} - What's your take?", join_first(themes, 3)),
            format!("Breaking: Latest in technology - {}", join_first(factors, 2)),
            format!(
                "Tech tip: How {} is changing everything",
                first_theme.unwrap_or("innovation")
            ),
        ],
        "entertainment" => [
            format!("Trending now: {} - Your thoughts?", join_first(themes, 2)),
            format!(
                "Entertainment buzz: {} explained",
                first_factor.unwrap_or("viral content")
            ),
            format!(
                "Pop culture moment: {} breakdown",
                first_theme.unwrap_or("trending topic")
            ),
        ],
        _ => [
            format!("Viral trend: {} - Join the conversation", join_first(themes, 2)),
            format!("Trending topic: {category} insights you need to know"),
            format!(
                "Hot take: {} analysis",
                first_factor.unwrap_or("engaging content")
            ),
        ],
    }
}

fn suggested_hashtags(category: &str, themes: &[String]) -> Vec<String> {
    let from_themes = themes
        .iter()
        .take(3)
        .map(|theme| format!("#{}", theme.replace('#', "").to_lowercase()));
    let fixed = [
        format!("#{}", category.to_lowercase()),
        "#viral".to_string(),
        "#trending".to_string(),
    ];

    let mut hashtags = dedup_preserving_order(from_themes.chain(fixed));
    hashtags.truncate(MAX_HASHTAGS);
    hashtags
}
