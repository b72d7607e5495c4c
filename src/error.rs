use thiserror::Error;

/// Errors surfaced by the scraping engine.
///
/// Only acquisition and navigation failures are control-flow-significant;
/// probe-level failures degrade to empty defaults and are logged instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A cloud browser session could not be created (network/auth/quota).
    #[error("cloud session creation failed: {0}")]
    SessionCreation(String),

    /// The page could not be loaded with either wait strategy, or the
    /// server answered with an error status.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The overall per-scrape deadline elapsed before extraction finished.
    #[error("scrape timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid or unusable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Whether a full-scrape retry (fresh session) may recover from this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::SessionCreation(_)
                | ScrapeError::Navigation { .. }
                | ScrapeError::Timeout(_)
        )
    }
}

/// A failed browser-protocol command.
///
/// Kept as a plain message: callers either escalate into a
/// [`ScrapeError::Navigation`] or log it and fall back to defaults.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DriverError(pub String);

impl From<fantoccini::error::CmdError> for DriverError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        DriverError(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for ScrapeError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        ScrapeError::SessionCreation(err.to_string())
    }
}
