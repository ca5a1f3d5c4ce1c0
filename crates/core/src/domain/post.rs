use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PLATFORM: &str = "unknown";
pub const DEFAULT_TREND_CATEGORY: &str = "General";

/// A social post as sent by the caller. Only a handful of fields are read; everything else
/// is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Post(pub Map<String, Value>);

impl Post {
    /// Non-empty string content. Missing, empty or non-string values count as no content.
    pub fn content(&self) -> Option<&str> {
        self.0
            .get("content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Missing or `null` scores count as zero.
    pub fn engagement_score(&self) -> Result<f64, AnalysisError> {
        match self.0.get("engagement_score") {
            None | Some(Value::Null) => Ok(0.0),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| AnalysisError::InvalidField {
                field: "engagement_score",
                expected: "a finite number",
                found: n.to_string(),
            }),
            Some(other) => Err(AnalysisError::InvalidField {
                field: "engagement_score",
                expected: "a number",
                found: other.to_string(),
            }),
        }
    }

    pub fn platform(&self) -> &str {
        self.str_field("platform").unwrap_or(DEFAULT_PLATFORM)
    }

    pub fn trend_category(&self) -> &str {
        self.str_field("trend_category")
            .unwrap_or(DEFAULT_TREND_CATEGORY)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for Post {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
