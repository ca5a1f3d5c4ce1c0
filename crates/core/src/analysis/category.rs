use crate::inference::ZeroShotClassifier;
use crate::text::truncate_chars;

pub const CATEGORY_LABELS: [&str; 8] = [
    "Technology",
    "Entertainment",
    "Sports",
    "Business",
    "Lifestyle",
    "News & Politics",
    "Social Media",
    "General",
];

pub const FALLBACK_CATEGORY: &str = "General";

const MAX_TEXTS: usize = 5;
const MAX_INPUT_CHARS: usize = 1000;

/// The first few texts joined by spaces, capped for the classifier.
pub fn combined_input(texts: &[String]) -> String {
    let joined = texts
        .iter()
        .take(MAX_TEXTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&joined, MAX_INPUT_CHARS).to_string()
}

/// Picks the best-matching category label. Falls back to `General` on any failure.
pub async fn classify_content_category(
    model: &dyn ZeroShotClassifier,
    texts: &[String],
) -> String {
    let input = combined_input(texts);
    match model.classify(&input, &CATEGORY_LABELS).await {
        Ok(prediction) => prediction
            .top_label()
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string(),
        Err(err) => {
            tracing::error!(
                model = model.model_id(),
                error = %format!("{err:#}"),
                "content classification failed"
            );
            FALLBACK_CATEGORY.to_string()
        }
    }
}
