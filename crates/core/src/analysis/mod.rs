//! Report building on top of the model seam: aggregation, extraction and templating.

pub mod category;
pub mod extract;
pub mod patterns;
pub mod sentiment;
pub mod suggestions;
pub mod trend;

pub use category::classify_content_category;
pub use extract::{extract_hashtags_and_keywords, Extracted};
pub use patterns::analyze_overall_patterns;
pub use sentiment::{analyze_sentiment_batch, Sentiment, SentimentSummary};
pub use suggestions::generate_content_suggestions;
pub use trend::analyze_posts;
