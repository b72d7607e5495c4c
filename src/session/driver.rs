use crate::error::DriverError;
use async_trait::async_trait;
use fantoccini::key::Key;
use fantoccini::{Client, Locator};
use serde_json::Value;

/// The browser-protocol operations the engine needs from a page handle.
///
/// Production code talks to a WebDriver session through [`WebDriverPage`];
/// tests substitute scripted implementations.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to the given URL
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Current (post-redirect) URL
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Serialized HTML of the current page
    async fn page_source(&self) -> Result<String, DriverError>;

    /// Execute a script in the page and return its JSON result
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError>;

    /// Resize the browser window
    async fn set_window_size(&self, width: u32, height: u32) -> Result<(), DriverError>;

    /// Capture a PNG screenshot of the current viewport
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// Send the Escape key to the page
    async fn send_escape(&self) -> Result<(), DriverError>;

    /// Close the page and end the underlying browser session
    async fn close(&self) -> Result<(), DriverError>;
}

/// [`PageDriver`] implementation backed by a fantoccini WebDriver client
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn page_source(&self) -> Result<String, DriverError> {
        Ok(self.client.source().await?)
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        Ok(self.client.execute(script, args).await?)
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<(), DriverError> {
        self.client.set_window_size(width, height).await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.client.screenshot().await?)
    }

    async fn send_escape(&self) -> Result<(), DriverError> {
        let body = self.client.find(Locator::Css("body")).await?;
        body.send_keys(&String::from(char::from(Key::Escape)))
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        // Client is a handle; closing a clone ends the whole session.
        self.client.clone().close().await?;
        Ok(())
    }
}
