use crate::pagequery;
use crate::results::PerformanceMetrics;
use crate::session::driver::PageDriver;

/// Read navigation/paint/resource timing from the page.
///
/// Returns a zeroed record when the engine exposes no timing entries.
pub async fn capture(driver: &dyn PageDriver) -> PerformanceMetrics {
    match pagequery::query_performance(driver).await {
        Ok(raw) => PerformanceMetrics {
            load_time_ms: raw.load_time,
            dom_content_loaded_ms: raw.dom_content_loaded,
            first_paint_ms: raw.first_paint,
            first_contentful_paint_ms: raw.first_contentful_paint,
            transfer_size_bytes: raw.transfer_size.max(0.0) as u64,
            encoded_body_size_bytes: raw.encoded_body_size.max(0.0) as u64,
            decoded_body_size_bytes: raw.decoded_body_size.max(0.0) as u64,
            resource_count: raw.resource_count,
        },
        Err(e) => {
            ::log::warn!("Performance metrics unavailable: {}", e);
            PerformanceMetrics::default()
        }
    }
}
