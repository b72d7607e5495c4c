//! Scrape orchestration: retry, fallback, probe fan-out and merging.

use crate::config::{ScrapeConfig, ScrapeOptions};
use crate::error::ScrapeError;
use crate::extract::{self, DomContent};
use crate::navigate;
use crate::probes;
use crate::results::ScrapedSite;
use crate::retry::{self, timed};
use crate::session::driver::PageDriver;
use crate::session::{self, SessionProvider, WebDriverProvider};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::{Instant, timeout_at};
use url::Url;

/// Lifecycle of one scrape attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    Idle,
    Acquiring,
    Navigating,
    Extracting,
    Released(Outcome),
}

/// Terminal outcome of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeStage::Idle => write!(f, "idle"),
            ScrapeStage::Acquiring => write!(f, "acquiring"),
            ScrapeStage::Navigating => write!(f, "navigating"),
            ScrapeStage::Extracting => write!(f, "extracting"),
            ScrapeStage::Released(Outcome::Success) => write!(f, "released(success)"),
            ScrapeStage::Released(Outcome::Failed) => write!(f, "released(failed)"),
        }
    }
}

/// Sequences session acquisition, navigation and the extraction probes
/// into one [`ScrapedSite`], with retry, backoff and cloud-to-local
/// fallback.
pub struct ScrapeOrchestrator<P: SessionProvider> {
    config: ScrapeConfig,
    provider: P,
}

impl ScrapeOrchestrator<WebDriverProvider> {
    /// Orchestrator backed by a real WebDriver session provider
    pub fn new(config: ScrapeConfig) -> Self {
        let provider = WebDriverProvider::new(config.clone());
        Self { config, provider }
    }
}

impl<P: SessionProvider> ScrapeOrchestrator<P> {
    /// Orchestrator with a custom session provider
    pub fn with_provider(config: ScrapeConfig, provider: P) -> Self {
        Self { config, provider }
    }

    /// Scrape one URL into a [`ScrapedSite`].
    ///
    /// Retries the whole scrape (fresh session) on acquisition and
    /// navigation failures, with exponential backoff. Probe failures never
    /// retry; they degrade to empty defaults inside the attempt. Release
    /// runs exactly once per acquired session on every exit path.
    pub async fn scrape(
        &self,
        url: &str,
        options: &ScrapeOptions,
    ) -> Result<ScrapedSite, ScrapeError> {
        ::log::info!("Starting scrape of {}", url);

        // Cloud acquisition is tried until it fails once; after that every
        // attempt in this call goes straight to local.
        let prefer_cloud = AtomicBool::new(options.prefer_cloud && self.config.cloud.is_some());

        let policy = self.config.retry.clone();
        let result = retry::with_retry(&policy, "scrape", || {
            self.scrape_attempt(url, &prefer_cloud)
        })
        .await;

        match &result {
            Ok(site) => ::log::info!(
                "Scraped {} ({} words, {} links)",
                site.url,
                site.word_count,
                site.links.total()
            ),
            Err(e) => ::log::error!("Giving up on {}: {}", url, e),
        }

        result
    }

    /// One full attempt: acquire, navigate, extract, release
    async fn scrape_attempt(
        &self,
        url: &str,
        prefer_cloud: &AtomicBool,
    ) -> Result<ScrapedSite, ScrapeError> {
        let overall = Duration::from_secs(self.config.overall_timeout_secs);
        let deadline = Instant::now() + overall;

        let mut stage = ScrapeStage::Acquiring;
        ::log::debug!("Scrape stage: {}", stage);

        let handle = match timeout_at(deadline, self.acquire(prefer_cloud)).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => {
                ::log::debug!("Scrape stage: {}", ScrapeStage::Released(Outcome::Failed));
                return Err(e);
            }
            Err(_) => {
                ::log::debug!("Scrape stage: {}", ScrapeStage::Released(Outcome::Failed));
                return Err(ScrapeError::Timeout(overall));
            }
        };

        // The handle is released exactly once, whatever happens inside the
        // deadline-bounded pipeline.
        let result = timeout_at(
            deadline,
            self.navigate_and_extract(handle.driver.as_ref(), url, &mut stage),
        )
        .await;
        session::release(handle).await;

        match result {
            Ok(Ok(site)) => {
                stage = ScrapeStage::Released(Outcome::Success);
                ::log::debug!("Scrape stage: {}", stage);
                Ok(site)
            }
            Ok(Err(e)) => {
                stage = ScrapeStage::Released(Outcome::Failed);
                ::log::debug!("Scrape stage: {}", stage);
                Err(e)
            }
            Err(_) => {
                stage = ScrapeStage::Released(Outcome::Failed);
                ::log::debug!("Scrape stage: {}", stage);
                Err(ScrapeError::Timeout(overall))
            }
        }
    }

    /// Acquire a session, falling back from cloud to local at most once
    /// per scrape call
    async fn acquire(&self, prefer_cloud: &AtomicBool) -> Result<session::SessionHandle, ScrapeError> {
        if prefer_cloud.load(Ordering::Relaxed) {
            match self.provider.acquire(true).await {
                Ok(handle) => return Ok(handle),
                Err(e) => {
                    ::log::warn!("Cloud session acquisition failed, falling back to local: {}", e);
                    prefer_cloud.store(false, Ordering::Relaxed);
                }
            }
        }

        self.provider.acquire(false).await
    }

    /// Navigate and run the extraction probes against an acquired session
    async fn navigate_and_extract(
        &self,
        driver: &dyn PageDriver,
        url: &str,
        stage: &mut ScrapeStage,
    ) -> Result<ScrapedSite, ScrapeError> {
        *stage = ScrapeStage::Navigating;
        ::log::debug!("Scrape stage: {}", stage);

        navigate::load(driver, url, &self.config.navigation).await?;
        navigate::dismiss_popups(driver, &self.config.navigation).await;
        navigate::settle_scroll(driver, &self.config.behavior).await;

        *stage = ScrapeStage::Extracting;
        ::log::debug!("Scrape stage: {}", stage);

        // Probe failures below this point degrade to defaults; none of
        // them can fail the attempt.
        let final_url = match driver.current_url().await {
            Ok(current) => current,
            Err(e) => {
                ::log::warn!("Could not read final URL, keeping the input URL: {}", e);
                url.to_string()
            }
        };
        let raw_html = match driver.page_source().await {
            Ok(source) => source,
            Err(e) => {
                ::log::warn!("Could not read page source: {}", e);
                String::new()
            }
        };

        let base = Url::parse(&final_url)
            .or_else(|_| Url::parse(url))
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("unparseable page URL: {e}"),
            })?;

        let dom = extract::extract(&raw_html, &base);

        // Read-only probes can run concurrently; the viewport probe
        // resizes the window, so it runs after them.
        let (visual, performance, layout) = tokio::join!(
            timed(
                "visual pattern analysis",
                probes::visual::analyze(driver, &self.config.aesthetic)
            ),
            timed("performance probe", probes::performance::capture(driver)),
            timed("layout snapshot", probes::viewport::capture_layout(driver)),
        );
        let responsive = timed(
            "responsiveness probe",
            probes::viewport::test_responsiveness(driver),
        )
        .await;
        let screenshots = timed(
            "screenshot capture",
            probes::viewport::capture_screenshots(driver),
        )
        .await;

        Ok(merge(
            final_url,
            raw_html,
            dom,
            MergedProbes {
                visual,
                performance,
                layout,
                responsive,
                screenshots,
            },
        ))
    }
}

/// Live-probe results merged into the snapshot
struct MergedProbes {
    visual: crate::results::VisualPatterns,
    performance: crate::results::PerformanceMetrics,
    layout: crate::results::LayoutSnapshot,
    responsive: crate::results::ResponsiveProfile,
    screenshots: crate::results::ScreenshotSet,
}

/// Assemble the final snapshot from the pure extraction and the probes
fn merge(url: String, raw_html: String, dom: DomContent, live: MergedProbes) -> ScrapedSite {
    ScrapedSite {
        url,
        raw_html,
        title: dom.title,
        meta_description: dom.meta_description,
        meta_keywords: dom.meta_keywords,
        canonical_url: dom.canonical_url,
        language: dom.language,
        text_content: dom.text_content,
        word_count: dom.word_count,
        structure: dom.structure,
        styles: dom.styles,
        colors: dom.colors,
        fonts: dom.fonts,
        scripts: dom.scripts,
        images: dom.images,
        links: dom.links,
        forms: dom.forms,
        navigation: dom.navigation,
        social: dom.social,
        analytics: dom.analytics,
        favicons: dom.favicons,
        structured_data: dom.structured_data,
        layout: live.layout,
        responsive: live.responsive,
        visual: live.visual,
        performance: live.performance,
        screenshots: live.screenshots,
    }
}

/// Scrape many URLs through a bounded worker pool.
///
/// Yields per-URL results on the returned receiver as they finish; one
/// failed URL never aborts the batch. At most `config.max_concurrency`
/// browser sessions exist at any moment.
pub fn scrape_many(
    config: ScrapeConfig,
    urls: Vec<String>,
    options: ScrapeOptions,
) -> mpsc::Receiver<(String, Result<ScrapedSite, ScrapeError>)> {
    let (result_tx, result_rx) = mpsc::channel(urls.len().max(1));
    let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let orchestrator = Arc::new(ScrapeOrchestrator::new(config));

    for url in urls {
        let semaphore = Arc::clone(&semaphore);
        let result_tx = result_tx.clone();
        let orchestrator = Arc::clone(&orchestrator);
        let options = options.clone();

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                ::log::error!("Worker pool semaphore closed unexpectedly");
                return;
            };

            let result = orchestrator.scrape(&url, &options).await;
            if result_tx.send((url, result)).await.is_err() {
                ::log::debug!("Result receiver dropped, discarding snapshot");
            }
        });
    }

    result_rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::session::{SessionHandle, SessionKind};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted page driver. Navigation queries always answer so the
    /// wait strategies can finish; probe queries answer Null (or fail
    /// outright when `fail_probes` is set) so probes fall back to their
    /// defaults.
    struct FakeDriver {
        fail_goto: bool,
        slow_goto: bool,
        fail_probes: bool,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageDriver for FakeDriver {
        async fn goto(&self, _url: &str) -> Result<(), DriverError> {
            if self.slow_goto {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail_goto {
                Err(DriverError("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn current_url(&self) -> Result<String, DriverError> {
            Ok("https://example.com/final".to_string())
        }

        async fn page_source(&self) -> Result<String, DriverError> {
            Ok("<html><head><title>Fake Page</title></head>\
                <body><a href=\"/next\">Next</a></body></html>"
                .to_string())
        }

        async fn execute(&self, script: &str, _args: Vec<Value>) -> Result<Value, DriverError> {
            if script.contains("getEntriesByType('resource').length;") {
                return Ok(json!(0));
            }
            if script.contains("readyState") {
                return Ok(json!("complete"));
            }
            if script.contains("responseStatus") {
                return Ok(json!(200));
            }
            if script.contains("scrollHeight") {
                return Ok(json!(2000));
            }
            if self.fail_probes {
                return Err(DriverError("script crashed".to_string()));
            }
            Ok(Value::Null)
        }

        async fn set_window_size(&self, _width: u32, _height: u32) -> Result<(), DriverError> {
            if self.fail_probes {
                Err(DriverError("resize refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
            if self.fail_probes {
                Err(DriverError("capture refused".to_string()))
            } else {
                Ok(vec![0x89, 0x50, 0x4e, 0x47])
            }
        }

        async fn send_escape(&self) -> Result<(), DriverError> {
            Ok(())
        }

        async fn close(&self) -> Result<(), DriverError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Scripted session provider recording acquisition activity
    struct FakeProvider {
        acquires: Arc<AtomicUsize>,
        cloud_acquires: Arc<AtomicUsize>,
        acquire_times: Arc<Mutex<Vec<Instant>>>,
        closes: Arc<AtomicUsize>,
        fail_acquire: bool,
        fail_cloud: bool,
        failing_navigations: Arc<AtomicUsize>,
        slow_navigation: bool,
        fail_probes: bool,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                acquires: Arc::new(AtomicUsize::new(0)),
                cloud_acquires: Arc::new(AtomicUsize::new(0)),
                acquire_times: Arc::new(Mutex::new(Vec::new())),
                closes: Arc::new(AtomicUsize::new(0)),
                fail_acquire: false,
                fail_cloud: false,
                failing_navigations: Arc::new(AtomicUsize::new(0)),
                slow_navigation: false,
                fail_probes: false,
            }
        }
    }

    #[async_trait]
    impl SessionProvider for FakeProvider {
        async fn acquire(&self, prefer_cloud: bool) -> Result<SessionHandle, ScrapeError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            self.acquire_times.lock().unwrap().push(Instant::now());

            if prefer_cloud {
                self.cloud_acquires.fetch_add(1, Ordering::SeqCst);
                if self.fail_cloud {
                    return Err(ScrapeError::SessionCreation("quota exceeded".to_string()));
                }
            }

            if self.fail_acquire {
                return Err(ScrapeError::SessionCreation("no driver".to_string()));
            }

            let fail_goto = {
                let remaining = self.failing_navigations.load(Ordering::SeqCst);
                if remaining > 0 {
                    self.failing_navigations.fetch_sub(1, Ordering::SeqCst);
                    true
                } else {
                    false
                }
            };

            Ok(SessionHandle {
                kind: if prefer_cloud {
                    SessionKind::Cloud
                } else {
                    SessionKind::Local
                },
                driver: Box::new(FakeDriver {
                    fail_goto,
                    slow_goto: self.slow_navigation,
                    fail_probes: self.fail_probes,
                    closes: self.closes.clone(),
                }),
            })
        }
    }

    fn orchestrator(provider: FakeProvider) -> ScrapeOrchestrator<FakeProvider> {
        ScrapeOrchestrator::with_provider(ScrapeConfig::default(), provider)
    }

    fn cloud_config() -> ScrapeConfig {
        ScrapeConfig {
            cloud: Some(crate::config::CloudConfig {
                endpoint: "https://cloud.test/sessions".to_string(),
                api_key: "key".to_string(),
                project_id: "project".to_string(),
            }),
            ..ScrapeConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_scrape_populates_core_fields() {
        let provider = FakeProvider::new();
        let acquires = provider.acquires.clone();
        let closes = provider.closes.clone();

        let site = orchestrator(provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await
            .unwrap();

        assert_eq!(site.url, "https://example.com/final");
        assert_eq!(site.title, "Fake Page");
        // Above-fold and full-page shots for all three viewports
        assert_eq!(site.screenshots.shots.len(), 6);
        assert_eq!(acquires.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_increasing_delays() {
        let provider = FakeProvider::new();
        provider.failing_navigations.store(2, Ordering::SeqCst);
        let acquires = provider.acquires.clone();
        let closes = provider.closes.clone();
        let times = provider.acquire_times.clone();

        let site = orchestrator(provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await
            .unwrap();

        assert_eq!(site.title, "Fake Page");
        // Two failed navigations then success: three acquisitions, each
        // followed by exactly one release
        assert_eq!(acquires.load(Ordering::SeqCst), 3);
        assert_eq!(closes.load(Ordering::SeqCst), 3);

        // Backoff doubles, so inter-attempt gaps strictly increase
        let times = times.lock().unwrap();
        let first_gap = times[1] - times[0];
        let second_gap = times[2] - times[1];
        assert!(second_gap > first_gap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fail_with_navigation_error() {
        let provider = FakeProvider::new();
        provider.failing_navigations.store(10, Ordering::SeqCst);
        let acquires = provider.acquires.clone();
        let closes = provider.closes.clone();

        let result = orchestrator(provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await;

        assert!(matches!(result, Err(ScrapeError::Navigation { .. })));
        assert_eq!(acquires.load(Ordering::SeqCst), 3);
        // Every acquired session was released despite the failures
        assert_eq!(closes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_failure_releases_nothing() {
        let mut provider = FakeProvider::new();
        provider.fail_acquire = true;
        let closes = provider.closes.clone();

        let result = orchestrator(provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await;

        assert!(matches!(result, Err(ScrapeError::SessionCreation(_))));
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_failures_degrade_to_defaults() {
        let mut provider = FakeProvider::new();
        provider.fail_probes = true;
        let acquires = provider.acquires.clone();
        let closes = provider.closes.clone();

        let site = orchestrator(provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await
            .unwrap();

        // Probe failures never trigger a retry
        assert_eq!(acquires.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        // The affected substructures hold their empty defaults
        assert!(site.screenshots.shots.is_empty());
        assert_eq!(site.performance.resource_count, 0);
        assert!(site.layout.containers.is_empty());
        assert_eq!(site.visual.style_label, "traditional");

        // The DOM extraction still worked from the page source
        assert_eq!(site.title, "Fake Page");
        assert_eq!(site.links.total(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cloud_fallback_happens_once() {
        let mut provider = FakeProvider::new();
        provider.fail_cloud = true;
        provider.failing_navigations.store(1, Ordering::SeqCst);
        let acquires = provider.acquires.clone();
        let cloud_acquires = provider.cloud_acquires.clone();

        let site = ScrapeOrchestrator::with_provider(cloud_config(), provider)
            .scrape(
                "https://example.com",
                &ScrapeOptions { prefer_cloud: true },
            )
            .await
            .unwrap();

        assert_eq!(site.title, "Fake Page");
        // Cloud was tried exactly once; the navigation retry went local
        assert_eq!(cloud_acquires.load(Ordering::SeqCst), 1);
        // Attempt 1: cloud fail + local ok; attempt 2: local ok
        assert_eq!(acquires.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cloud_session_used_when_it_works() {
        let provider = FakeProvider::new();
        let cloud_acquires = provider.cloud_acquires.clone();
        let acquires = provider.acquires.clone();

        let site = ScrapeOrchestrator::with_provider(cloud_config(), provider)
            .scrape(
                "https://example.com",
                &ScrapeOptions { prefer_cloud: true },
            )
            .await
            .unwrap();

        assert_eq!(site.title, "Fake Page");
        assert_eq!(cloud_acquires.load(Ordering::SeqCst), 1);
        assert_eq!(acquires.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_timeout_still_releases() {
        let mut provider = FakeProvider::new();
        provider.slow_navigation = true;
        let acquires = provider.acquires.clone();
        let closes = provider.closes.clone();

        let config = ScrapeConfig {
            overall_timeout_secs: 5,
            ..ScrapeConfig::default()
        };
        let result = ScrapeOrchestrator::with_provider(config, provider)
            .scrape("https://example.com", &ScrapeOptions::default())
            .await;

        assert!(matches!(result, Err(ScrapeError::Timeout(_))));
        // Timed-out attempts are retried, and every acquired session was
        // still released
        assert_eq!(acquires.load(Ordering::SeqCst), 3);
        assert_eq!(closes.load(Ordering::SeqCst), 3);
    }
}
