use thiserror::Error;

/// Failures raised while turning posts into reports.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No valid content found in posts")]
    NoContent,

    #[error("No posts provided for analysis")]
    NoPosts,

    #[error("{field} must be {expected}, got {found}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl AnalysisError {
    /// Whether the caller sent something unusable, as opposed to the analysis itself failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::NoContent | AnalysisError::NoPosts)
    }
}
