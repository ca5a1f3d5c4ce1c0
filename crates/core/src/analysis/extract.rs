use crate::text::dedup_preserving_order;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_HASHTAGS: usize = 20;
pub const MAX_KEYWORDS: usize = 30;
const KEYWORDS_PER_POST: usize = 10;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").unwrap());
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{4,}\b").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub hashtags: Vec<String>,
    pub keywords: Vec<String>,
}

/// Lower-cased hashtags and keyword candidates, de-duplicated in first-seen order.
pub fn extract_hashtags_and_keywords(texts: &[String]) -> Extracted {
    let mut hashtags = Vec::new();
    let mut keywords = Vec::new();

    for text in texts {
        let lowered = text.to_lowercase();
        hashtags.extend(HASHTAG_RE.find_iter(&lowered).map(|m| m.as_str().to_string()));
        keywords.extend(
            KEYWORD_RE
                .find_iter(&lowered)
                .take(KEYWORDS_PER_POST)
                .map(|m| m.as_str().to_string()),
        );
    }

    let mut hashtags = dedup_preserving_order(hashtags);
    hashtags.truncate(MAX_HASHTAGS);
    let mut keywords = dedup_preserving_order(keywords);
    keywords.truncate(MAX_KEYWORDS);

    Extracted { hashtags, keywords }
}
