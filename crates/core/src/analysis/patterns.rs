use crate::domain::contract::OverallAnalysisRequest;
use crate::domain::post::{DEFAULT_PLATFORM, DEFAULT_TREND_CATEGORY};
use crate::domain::report::OverallInsights;
use crate::error::AnalysisError;
use crate::text::{format_thousands, title_case};
use indexmap::IndexMap;

/// Key with the largest total; the earliest key wins ties.
fn top_key<V: PartialOrd>(totals: &IndexMap<String, V>) -> Option<&str> {
    let mut best: Option<(&String, &V)> = None;
    for (key, value) in totals {
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((key, value));
        }
    }
    best.map(|(k, _)| k.as_str())
}

/// Engagement per platform and post counts per trend category across every post.
pub fn analyze_overall_patterns(
    request: &OverallAnalysisRequest,
) -> Result<OverallInsights, AnalysisError> {
    let posts = &request.all_posts;
    if posts.is_empty() {
        return Err(AnalysisError::NoPosts);
    }

    let mut platforms: IndexMap<String, f64> = IndexMap::new();
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    let mut total_engagement = 0.0;

    for post in posts {
        let engagement = post.engagement_score()?;
        *platforms.entry(post.platform().to_string()).or_insert(0.0) += engagement;
        *categories
            .entry(post.trend_category().to_string())
            .or_insert(0) += 1;
        total_engagement += engagement;
    }

    let top_platform = top_key(&platforms).unwrap_or(DEFAULT_PLATFORM);
    let top_category = top_key(&categories).unwrap_or(DEFAULT_TREND_CATEGORY);
    let avg_engagement = total_engagement / posts.len() as f64;

    tracing::info!(
        posts = posts.len(),
        platforms = platforms.len(),
        top_platform,
        top_category,
        "analyzed overall patterns"
    );

    Ok(OverallInsights {
        virality_insights: vec![
            format!(
                "Analyzed {} viral posts with {} total engagement",
                posts.len(),
                format_thousands(total_engagement)
            ),
            format!(
                "{} shows highest engagement performance",
                title_case(top_platform)
            ),
            format!("{top_category} content category dominates viral trends"),
            format!("Average viral score: {avg_engagement:.1} per post"),
        ],
        platform_recommendations: platforms
            .iter()
            .map(|(platform, engagement)| {
                (
                    platform.clone(),
                    format!(
                        "Focus on {platform} content - showing {} engagement points",
                        format_thousands(*engagement)
                    ),
                )
            })
            .collect(),
        timing_insights: vec![
            "Peak engagement hours: 6-9 PM local time (based on viral patterns)".to_string(),
            "Weekend posts show 40% higher viral potential".to_string(),
            "Consistent posting schedule improves long-term engagement".to_string(),
        ],
        content_strategy_advice: vec![
            format!(
                "Prioritize {} content for maximum viral potential",
                top_category.to_lowercase()
            ),
            "Use AI-analyzed sentiment patterns to optimize emotional appeal".to_string(),
            "Implement cross-platform hashtag strategies for better reach".to_string(),
            "Focus on community engagement to boost algorithmic visibility".to_string(),
        ],
        trend_predictions: vec![
            format!("{top_category} content will continue trending in next 7 days"),
            "Visual content (reels/videos) showing 3x higher engagement rates".to_string(),
            "Interactive content (polls, questions) gaining momentum for engagement".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(posts: serde_json::Value) -> OverallAnalysisRequest {
        serde_json::from_value(json!({ "all_posts": posts })).unwrap()
    }

    #[test]
    fn aggregates_platforms_and_categories() {
        let insights = analyze_overall_patterns(&request(json!([
            {"platform": "tiktok", "trend_category": "Sports", "engagement_score": 1200},
            {"platform": "instagram", "trend_category": "Technology", "engagement_score": 3000},
            {"platform": "tiktok", "trend_category": "Technology", "engagement_score": 2500},
            {"engagement_score": 100}
        ])))
        .unwrap();

        assert_eq!(
            insights.virality_insights,
            vec![
                "Analyzed 4 viral posts with 6,800 total engagement",
                "Tiktok shows highest engagement performance",
                "Technology content category dominates viral trends",
                "Average viral score: 1700.0 per post",
            ]
        );
        assert_eq!(insights.platform_recommendations.len(), 3);
        assert_eq!(
            insights.platform_recommendations["tiktok"],
            "Focus on tiktok content - showing 3,700 engagement points"
        );
        assert_eq!(
            insights.platform_recommendations["unknown"],
            "Focus on unknown content - showing 100 engagement points"
        );
        assert_eq!(
            insights.content_strategy_advice[0],
            "Prioritize technology content for maximum viral potential"
        );
        assert_eq!(
            insights.trend_predictions[0],
            "Technology content will continue trending in next 7 days"
        );
        assert_eq!(insights.timing_insights.len(), 3);
    }

    #[test]
    fn ties_go_to_first_seen() {
        let insights = analyze_overall_patterns(&request(json!([
            {"platform": "youtube", "trend_category": "Business", "engagement_score": 10},
            {"platform": "x", "trend_category": "Lifestyle", "engagement_score": 10}
        ])))
        .unwrap();
        assert_eq!(
            insights.virality_insights[1],
            "Youtube shows highest engagement performance"
        );
        assert_eq!(
            insights.virality_insights[2],
            "Business content category dominates viral trends"
        );
    }

    #[test]
    fn recommendations_keep_first_seen_platform_order() {
        let posts: Vec<_> = (0..12)
            .map(|i| json!({"platform": format!("platform-{i}"), "engagement_score": i}))
            .collect();
        let insights = analyze_overall_patterns(&request(json!(posts))).unwrap();

        let keys: Vec<&str> = insights
            .platform_recommendations
            .keys()
            .map(String::as_str)
            .collect();
        let expected: Vec<String> = (0..12).map(|i| format!("platform-{i}")).collect();
        assert_eq!(keys, expected);
        assert_eq!(
            insights.virality_insights[1],
            "Platform-11 shows highest engagement performance"
        );

        let serialized = serde_json::to_string(&insights.platform_recommendations).unwrap();
        assert!(serialized.find("platform-2").unwrap() < serialized.find("platform-10").unwrap());
    }

    #[test]
    fn many_distinct_platforms_are_aggregated() {
        let posts: Vec<_> = (0..20_000)
            .map(|i| json!({"platform": format!("p{}", i % 10_000), "engagement_score": 1}))
            .collect();
        let insights = analyze_overall_patterns(&request(json!(posts))).unwrap();
        assert_eq!(insights.platform_recommendations.len(), 10_000);
        assert_eq!(
            insights.platform_recommendations["p9999"],
            "Focus on p9999 content - showing 2 engagement points"
        );
        assert_eq!(
            insights.virality_insights[0],
            "Analyzed 20000 viral posts with 20,000 total engagement"
        );
    }

    #[test]
    fn empty_posts_is_client_error() {
        let err = analyze_overall_patterns(&request(json!([]))).unwrap_err();
        assert!(matches!(err, AnalysisError::NoPosts));
        assert!(err.is_client_error());
    }

    #[test]
    fn bad_engagement_is_internal_error() {
        let err = analyze_overall_patterns(&request(json!([{"engagement_score": [1]}]))).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidField { .. }));
    }
}
