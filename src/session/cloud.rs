use crate::config::CloudConfig;
use crate::error::ScrapeError;
use serde::Deserialize;
use std::time::Duration;

/// Deadline for the session-creation request
const CREATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Session record returned by the provider.
///
/// Providers differ in field naming; both `connectUrl` and `webdriverUrl`
/// are accepted, first one present wins.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(rename = "connectUrl")]
    connect_url: Option<String>,
    #[serde(rename = "webdriverUrl")]
    webdriver_url: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// Create a cloud browser session and return its WebDriver URL.
///
/// Any transport failure, timeout, non-2xx answer or unusable body maps to
/// [`ScrapeError::SessionCreation`]; the orchestrator decides whether to
/// fall back to a local session.
pub async fn create_session(config: &CloudConfig) -> Result<String, ScrapeError> {
    let client = reqwest::Client::builder()
        .timeout(CREATE_TIMEOUT)
        .build()
        .map_err(|e| ScrapeError::SessionCreation(e.to_string()))?;

    let response = client
        .post(&config.endpoint)
        .header("x-api-key", &config.api_key)
        .json(&serde_json::json!({ "projectId": config.project_id }))
        .send()
        .await
        .map_err(|e| ScrapeError::SessionCreation(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ScrapeError::SessionCreation(format!(
            "session endpoint answered HTTP {}",
            response.status()
        )));
    }

    let body: SessionResponse = response
        .json()
        .await
        .map_err(|e| ScrapeError::SessionCreation(format!("unreadable session response: {e}")))?;

    if let Some(id) = &body.id {
        ::log::debug!("Cloud session created: {}", id);
    }

    body.connect_url
        .or(body.webdriver_url)
        .ok_or_else(|| {
            ScrapeError::SessionCreation("session response carried no connect URL".to_string())
        })
}
