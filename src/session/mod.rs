//! Browser session acquisition and release.

pub mod cloud;
pub mod driver;

use self::driver::{PageDriver, WebDriverPage};
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use async_trait::async_trait;
use fantoccini::ClientBuilder;
use serde_json::json;

/// Where a session came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Local,
    Cloud,
}

/// An acquired browser+page handle.
///
/// Owned exclusively by the invocation that acquired it and consumed by
/// [`release`] on every exit path.
pub struct SessionHandle {
    pub kind: SessionKind,
    pub driver: Box<dyn PageDriver>,
}

/// Source of browser sessions.
///
/// The production implementation is [`WebDriverProvider`]; orchestrator
/// tests substitute scripted providers.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a session. When `prefer_cloud` is set and cloud credentials
    /// are configured, the session is created through the cloud provider;
    /// the cloud-to-local fallback decision belongs to the orchestrator,
    /// not here.
    async fn acquire(&self, prefer_cloud: bool) -> Result<SessionHandle, ScrapeError>;
}

/// Session provider connecting to a WebDriver endpoint
pub struct WebDriverProvider {
    config: ScrapeConfig,
}

impl WebDriverProvider {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Capabilities for a local headless session with stability flags
    fn local_capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let args = vec![
            "--headless=new".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-extensions".to_string(),
            "--disable-background-timer-throttling".to_string(),
            "--disable-renderer-backgrounding".to_string(),
            "--disable-backgrounding-occluded-windows".to_string(),
            format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ),
            format!("--user-agent={}", self.config.user_agent),
        ];

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        capabilities
    }

    /// Connect to the configured WebDriver URL, trying common fallbacks
    async fn connect_local(&self) -> Result<SessionHandle, ScrapeError> {
        let capabilities = self.local_capabilities();

        match ClientBuilder::native()
            .capabilities(capabilities.clone())
            .connect(&self.config.webdriver_url)
            .await
        {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.config.webdriver_url);
                return Ok(SessionHandle {
                    kind: SessionKind::Local,
                    driver: Box::new(WebDriverPage::new(client)),
                });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.config.webdriver_url,
                    e
                );
            }
        }

        // Try common alternative endpoints before giving up
        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == self.config.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native()
                .capabilities(capabilities.clone())
                .connect(url)
                .await
            {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(SessionHandle {
                    kind: SessionKind::Local,
                    driver: Box::new(WebDriverPage::new(client)),
                });
            }
        }

        Err(ScrapeError::SessionCreation(format!(
            "no WebDriver server reachable at {} or fallbacks",
            self.config.webdriver_url
        )))
    }

    /// Create a cloud session and connect to it
    async fn connect_cloud(&self) -> Result<SessionHandle, ScrapeError> {
        let cloud = self
            .config
            .cloud
            .as_ref()
            .ok_or_else(|| ScrapeError::Config("cloud credentials not configured".to_string()))?;

        let connect_url = cloud::create_session(cloud).await?;

        let client = ClientBuilder::native().connect(&connect_url).await?;
        ::log::debug!("Connected to cloud session");

        Ok(SessionHandle {
            kind: SessionKind::Cloud,
            driver: Box::new(WebDriverPage::new(client)),
        })
    }
}

#[async_trait]
impl SessionProvider for WebDriverProvider {
    async fn acquire(&self, prefer_cloud: bool) -> Result<SessionHandle, ScrapeError> {
        if prefer_cloud && self.config.cloud.is_some() {
            self.connect_cloud().await
        } else {
            self.connect_local().await
        }
    }
}

/// Release a session. Ending the WebDriver session tears down the page,
/// context and browser behind it.
///
/// Never raises; cleanup failures are logged and swallowed.
pub async fn release(handle: SessionHandle) {
    if let Err(e) = handle.driver.close().await {
        ::log::warn!("Error during session cleanup: {}", e);
    }
}
