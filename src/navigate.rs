//! Resilient page loading and popup dismissal.

use crate::config::{BehaviorConfig, NavigationConfig};
use crate::error::{DriverError, ScrapeError};
use crate::pagequery;
use crate::session::driver::PageDriver;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

/// Poll interval for the wait strategies
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Load a URL with tiered wait strategies.
///
/// First attempt waits for network quiescence; when that times out or
/// errors, a second attempt waits only for DOM readiness. Both failing, or
/// an HTTP status of 400 or above, raises [`ScrapeError::Navigation`]. A
/// fixed settle delay follows success so deferred rendering can finish.
pub async fn load(
    driver: &dyn PageDriver,
    url: &str,
    config: &NavigationConfig,
) -> Result<(), ScrapeError> {
    ::log::debug!("Navigating to {}", url);

    let quiescent_deadline = Duration::from_secs(config.quiescent_timeout_secs);
    let quiet_window = Duration::from_millis(config.quiet_window_ms);

    let first = timeout(quiescent_deadline, async {
        driver.goto(url).await?;
        wait_network_quiet(driver, quiet_window).await
    })
    .await;

    match first {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            ::log::warn!(
                "Network-quiescent load failed for {} ({}), retrying with DOM-ready wait",
                url,
                e
            );
            load_dom_ready(driver, url, config).await?;
        }
        Err(_) => {
            ::log::warn!(
                "Network-quiescent load timed out for {}, retrying with DOM-ready wait",
                url
            );
            load_dom_ready(driver, url, config).await?;
        }
    }

    // The engine may hide the navigation status; treat that as success.
    let status = pagequery::query_response_status(driver).await.unwrap_or(200);
    if status >= 400 {
        return Err(ScrapeError::Navigation {
            url: url.to_string(),
            reason: format!("HTTP status {status}"),
        });
    }

    ::log::debug!("Loaded {}, settling for {}ms", url, config.settle_delay_ms);
    sleep(Duration::from_millis(config.settle_delay_ms)).await;

    Ok(())
}

/// Second-tier load waiting only for DOM readiness
async fn load_dom_ready(
    driver: &dyn PageDriver,
    url: &str,
    config: &NavigationConfig,
) -> Result<(), ScrapeError> {
    let deadline = Duration::from_secs(config.dom_ready_timeout_secs);

    let result = timeout(deadline, async {
        driver.goto(url).await?;
        wait_dom_ready(driver).await
    })
    .await;

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(ScrapeError::Navigation {
            url: url.to_string(),
            reason: format!("timed out after {}s waiting for DOM ready", deadline.as_secs()),
        }),
    }
}

/// Wait until no new resource-timing entries appear for `quiet_window`
async fn wait_network_quiet(
    driver: &dyn PageDriver,
    quiet_window: Duration,
) -> Result<(), DriverError> {
    let mut last_count = pagequery::query_resource_count(driver).await?;
    let mut quiet_since = Instant::now();

    loop {
        sleep(POLL_INTERVAL).await;
        let count = pagequery::query_resource_count(driver).await?;
        if count != last_count {
            last_count = count;
            quiet_since = Instant::now();
        } else if quiet_since.elapsed() >= quiet_window {
            return Ok(());
        }
    }
}

/// Wait until the document has left the "loading" state
async fn wait_dom_ready(driver: &dyn PageDriver) -> Result<(), DriverError> {
    loop {
        let state = pagequery::query_ready_state(driver).await?;
        if state != "loading" {
            return Ok(());
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Best-effort dismissal of cookie banners and modal overlays.
///
/// Scans the configured selector list for a visible overlay with an
/// accept/close control and clicks the first one found; otherwise sends
/// Escape. Never raises.
pub async fn dismiss_popups(driver: &dyn PageDriver, config: &NavigationConfig) {
    match pagequery::dismiss_overlays(driver, &config.popup_selectors, &config.accept_vocabulary)
        .await
    {
        Ok(true) => {
            ::log::debug!("Dismissed an overlay via its accept control");
            sleep(Duration::from_millis(500)).await;
        }
        Ok(false) => {
            if let Err(e) = driver.send_escape().await {
                ::log::debug!("Escape dismissal failed: {}", e);
            }
        }
        Err(e) => {
            ::log::debug!("Popup scan failed: {}", e);
        }
    }
}

/// Light scroll pass before extraction so lazy content gets a chance to
/// load. Best-effort; any failure stops the pass silently.
pub async fn settle_scroll(driver: &dyn PageDriver, config: &BehaviorConfig) {
    if !config.simulate_scroll {
        return;
    }

    for _ in 0..config.scroll_passes {
        if let Err(e) = pagequery::scroll_by(driver, config.scroll_step_px).await {
            ::log::debug!("Scroll pass stopped: {}", e);
            return;
        }
        sleep(Duration::from_millis(config.scroll_pause_ms)).await;
    }

    if let Err(e) = pagequery::scroll_to_top(driver).await {
        ::log::debug!("Could not scroll back to top: {}", e);
    }
}
