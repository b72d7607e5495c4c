//! Screenshot capture, responsive breakpoint testing and layout snapshots.

use crate::error::DriverError;
use crate::pagequery;
use crate::results::{
    BreakpointTest, LayoutSnapshot, MAX_LAYOUT_CONTAINERS, ResponsiveProfile, Screenshot,
    ScreenshotSet,
};
use crate::session::driver::PageDriver;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;

/// Named viewports screenshots are captured at
const SCREENSHOT_VIEWPORTS: [(&str, u32, u32); 3] = [
    ("desktop", 1920, 1080),
    ("tablet", 768, 1024),
    ("mobile", 375, 667),
];

/// Widths probed for responsive behavior
const BREAKPOINT_WIDTHS: [u32; 4] = [320, 768, 1024, 1440];

/// Height used while probing breakpoints
const BREAKPOINT_HEIGHT: u32 = 800;

/// Upper bound for full-page capture height
const MAX_FULL_PAGE_HEIGHT: u64 = 8000;

/// Reflow wait after a viewport resize
const REFLOW_WAIT: Duration = Duration::from_millis(1000);

/// Shorter reflow wait between breakpoint measurements
const BREAKPOINT_WAIT: Duration = Duration::from_millis(500);

/// Capture above-the-fold and full-page screenshots at each named viewport.
///
/// A failing viewport is logged and omitted; the others still land in the
/// returned set.
pub async fn capture_screenshots(driver: &dyn PageDriver) -> ScreenshotSet {
    let mut shots = BTreeMap::new();

    for (name, width, height) in SCREENSHOT_VIEWPORTS {
        match capture_viewport(driver, width, height).await {
            Ok((above_fold, full_page)) => {
                shots.insert(name.to_string(), above_fold);
                shots.insert(format!("{name}_full"), full_page);
            }
            Err(e) => {
                ::log::warn!("Failed to capture {} screenshots: {}", name, e);
            }
        }
    }

    // Leave the window at desktop size for whatever runs next
    let (_, width, height) = SCREENSHOT_VIEWPORTS[0];
    if let Err(e) = driver.set_window_size(width, height).await {
        ::log::debug!("Could not restore desktop viewport: {}", e);
    }

    ScreenshotSet { shots }
}

/// Capture the above-the-fold and full-page pair for one viewport
async fn capture_viewport(
    driver: &dyn PageDriver,
    width: u32,
    height: u32,
) -> Result<(Screenshot, Screenshot), DriverError> {
    driver.set_window_size(width, height).await?;
    sleep(REFLOW_WAIT).await;

    let above_fold = Screenshot {
        width,
        height,
        full_page: false,
        data: driver.screenshot().await?,
    };

    // Full page: grow the window to the document height, bounded
    let scroll_height = pagequery::query_scroll_height(driver)
        .await?
        .clamp(height as u64, MAX_FULL_PAGE_HEIGHT) as u32;
    driver.set_window_size(width, scroll_height).await?;
    sleep(REFLOW_WAIT).await;

    let full_page = Screenshot {
        width,
        height: scroll_height,
        full_page: true,
        data: driver.screenshot().await?,
    };

    driver.set_window_size(width, height).await?;

    Ok((above_fold, full_page))
}

/// Probe responsive behavior across fixed widths.
///
/// `is_responsive` depends only on the viewport meta tag; breakpoint
/// measurements feed `has_media_queries` and the per-width records.
pub async fn test_responsiveness(driver: &dyn PageDriver) -> ResponsiveProfile {
    let viewport_meta = match pagequery::query_viewport_meta(driver).await {
        Ok(meta) => meta,
        Err(e) => {
            ::log::warn!("Viewport meta unavailable: {}", e);
            None
        }
    };

    let mut breakpoints = Vec::new();
    for width in BREAKPOINT_WIDTHS {
        if let Err(e) = driver.set_window_size(width, BREAKPOINT_HEIGHT).await {
            ::log::warn!("Could not resize to {}px: {}", width, e);
            continue;
        }
        sleep(BREAKPOINT_WAIT).await;

        match pagequery::query_breakpoint(driver).await {
            Ok(raw) => breakpoints.push(BreakpointTest {
                width,
                body_width: raw.body_width,
                font_size: raw.font_size,
                container_max_width: raw.container_max_width,
                container_padding: raw.container_padding,
                grid_columns: raw.grid_columns,
                flex_direction: raw.flex_direction,
            }),
            Err(e) => {
                ::log::warn!("Breakpoint measurement at {}px failed: {}", width, e);
            }
        }
    }

    ResponsiveProfile {
        is_responsive: is_responsive_meta(viewport_meta.as_deref()),
        has_media_queries: max_width_varies(&breakpoints),
        viewport_meta,
        breakpoints,
    }
}

/// Capture the live layout snapshot at the current (desktop) width
pub async fn capture_layout(driver: &dyn PageDriver) -> LayoutSnapshot {
    match pagequery::query_layout(driver).await {
        Ok(mut raw) => {
            raw.containers.truncate(MAX_LAYOUT_CONTAINERS);
            LayoutSnapshot {
                viewport_width: raw.viewport.width,
                viewport_height: raw.viewport.height,
                containers: raw.containers,
                body: raw.body,
            }
        }
        Err(e) => {
            ::log::warn!("Layout snapshot unavailable: {}", e);
            LayoutSnapshot::default()
        }
    }
}

/// A page is responsive iff its viewport meta declares width=device-width
pub(crate) fn is_responsive_meta(meta: Option<&str>) -> bool {
    meta.map(|m| m.contains("width=device-width")).unwrap_or(false)
}

/// Media queries are assumed present when the primary container max-width
/// differs across tested widths
pub(crate) fn max_width_varies(breakpoints: &[BreakpointTest]) -> bool {
    breakpoints.len() > 1
        && breakpoints[1..]
            .iter()
            .any(|bp| bp.container_max_width != breakpoints[0].container_max_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakpoint(width: u32, max_width: &str) -> BreakpointTest {
        BreakpointTest {
            width,
            container_max_width: max_width.to_string(),
            ..BreakpointTest::default()
        }
    }

    #[test]
    fn test_viewport_meta_drives_responsiveness() {
        assert!(is_responsive_meta(Some(
            "width=device-width, initial-scale=1"
        )));
        assert!(!is_responsive_meta(Some("initial-scale=1")));
        assert!(!is_responsive_meta(None));
    }

    #[test]
    fn test_media_query_detection() {
        let varying = vec![breakpoint(320, "100%"), breakpoint(1024, "960px")];
        assert!(max_width_varies(&varying));

        let constant = vec![breakpoint(320, "none"), breakpoint(1024, "none")];
        assert!(!max_width_varies(&constant));

        let single = vec![breakpoint(320, "100%")];
        assert!(!max_width_varies(&single));
    }
}
