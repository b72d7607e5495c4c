// Re-export modules
pub mod config;
pub mod error;
pub mod extract;
pub mod navigate;
pub mod orchestrate;
pub mod pagequery;
pub mod probes;
pub mod results;
pub mod retry;
pub mod session;
pub mod summary;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ScrapeConfig, ScrapeOptions};
pub use error::ScrapeError;
pub use orchestrate::{ScrapeOrchestrator, scrape_many};
pub use results::ScrapedSite;
pub use summary::{SnapshotSummary, summarize};

/// Builder for configuring and running one page snapshot
pub struct Snapshot {
    url: String,
    config: ScrapeConfig,
    options: ScrapeOptions,
}

impl Snapshot {
    /// Create a new Snapshot builder for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: ScrapeConfig::default(),
            options: ScrapeOptions::default(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, ScrapeError> {
        self.config = ScrapeConfig::from_file(path)?;
        Ok(self)
    }

    /// Prefer a cloud browser session when credentials are configured
    pub fn prefer_cloud(mut self, prefer_cloud: bool) -> Self {
        self.options.prefer_cloud = prefer_cloud;
        self
    }

    /// Run the scrape and return the snapshot
    pub async fn capture(self) -> Result<ScrapedSite, ScrapeError> {
        let config = self.config.with_env_overrides();
        let orchestrator = ScrapeOrchestrator::new(config);
        orchestrator.scrape(&self.url, &self.options).await
    }
}
