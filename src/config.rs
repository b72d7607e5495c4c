use crate::error::ScrapeError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the snapshot engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// URL for the WebDriver instance used for local sessions
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Cloud browser provider credentials (absent means local-only operation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<CloudConfig>,

    /// Retry policy for whole-scrape attempts
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Navigation wait strategies and popup handling
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Post-load behavior heuristics
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Aesthetic score rubric weights
    #[serde(default)]
    pub aesthetic: AestheticWeights,

    /// Overall deadline for one scrape attempt (acquire + navigate + extract)
    #[serde(default = "default_overall_timeout_secs")]
    pub overall_timeout_secs: u64,

    /// Maximum number of concurrent browser sessions for batch scraping
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Browser window width for the initial session
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Browser window height for the initial session
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// User agent presented by local sessions
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Credentials and endpoint for a cloud headless-browser provider.
///
/// The provider is expected to answer a POST on `endpoint` with a JSON body
/// containing the WebDriver URL of the created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Session-creation endpoint
    pub endpoint: String,

    /// Provider API key, sent as the `x-api-key` header
    pub api_key: String,

    /// Provider project identifier
    pub project_id: String,
}

/// Configuration for navigation waits and popup dismissal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Deadline for the network-quiescent wait strategy, in seconds
    #[serde(default = "default_quiescent_timeout_secs")]
    pub quiescent_timeout_secs: u64,

    /// Deadline for the DOM-ready fallback wait strategy, in seconds
    #[serde(default = "default_dom_ready_timeout_secs")]
    pub dom_ready_timeout_secs: u64,

    /// Window with no new network entries that counts as quiescent, in ms
    #[serde(default = "default_quiet_window_ms")]
    pub quiet_window_ms: u64,

    /// Fixed settle delay after a successful load, in ms
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Overlay/consent selectors scanned during popup dismissal, in priority order
    #[serde(default = "default_popup_selectors")]
    pub popup_selectors: Vec<String>,

    /// Accept/close button vocabulary matched against text and ARIA labels
    #[serde(default = "default_accept_vocabulary")]
    pub accept_vocabulary: Vec<String>,
}

/// Post-load human-behavior heuristics.
///
/// These are best-effort anti-detection measures with no verified success
/// metric; every knob here is tunable and none of them is load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Whether to run a light scroll pass before extraction
    #[serde(default = "default_simulate_scroll")]
    pub simulate_scroll: bool,

    /// Number of scroll steps
    #[serde(default = "default_scroll_passes")]
    pub scroll_passes: u32,

    /// Pixels per scroll step
    #[serde(default = "default_scroll_step_px")]
    pub scroll_step_px: u32,

    /// Pause between scroll steps, in ms
    #[serde(default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,
}

/// Point weights for the aesthetic score rubric.
///
/// The weights are arbitrary by design and only the mechanism (weighted
/// signal aggregation mapped to label bands) is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AestheticWeights {
    /// Gradient backgrounds present anywhere in reachable CSS
    #[serde(default = "default_weight_gradients")]
    pub gradients: u32,

    /// Flex/grid layout adoption across sampled containers
    #[serde(default = "default_weight_layout")]
    pub layout: u32,

    /// Card-style elements detected
    #[serde(default = "default_weight_cards")]
    pub cards: u32,

    /// Hover/transition declarations present
    #[serde(default = "default_weight_transitions")]
    pub transitions: u32,

    /// Keyframe animations present
    #[serde(default = "default_weight_animations")]
    pub animations: u32,

    /// Non-generic font families in use
    #[serde(default = "default_weight_custom_fonts")]
    pub custom_fonts: u32,

    /// Viewport meta tag present
    #[serde(default = "default_weight_responsive")]
    pub responsive: u32,
}

/// Per-call options for a scrape
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Prefer a cloud session when cloud credentials are configured
    pub prefer_cloud: bool,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default overall per-scrape deadline
fn default_overall_timeout_secs() -> u64 {
    180
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    3
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_quiescent_timeout_secs() -> u64 {
    30
}

fn default_dom_ready_timeout_secs() -> u64 {
    20
}

fn default_quiet_window_ms() -> u64 {
    500
}

fn default_settle_delay_ms() -> u64 {
    3000
}

/// Default overlay selectors, highest priority first
fn default_popup_selectors() -> Vec<String> {
    [
        "[id*=\"cookie\"]",
        "[class*=\"cookie\"]",
        "[id*=\"gdpr\"]",
        "[class*=\"gdpr\"]",
        "[id*=\"consent\"]",
        "[class*=\"consent\"]",
        "[id*=\"privacy\"]",
        "[class*=\"privacy\"]",
        ".modal",
        ".popup",
        ".overlay",
        "[role=\"dialog\"]",
        "[role=\"alertdialog\"]",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default accept/close vocabulary, matched case-insensitively
fn default_accept_vocabulary() -> Vec<String> {
    ["accept", "agree", "close", "ok", "got it", "dismiss", "allow", "continue"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_simulate_scroll() -> bool {
    true
}

fn default_scroll_passes() -> u32 {
    3
}

fn default_scroll_step_px() -> u32 {
    600
}

fn default_scroll_pause_ms() -> u64 {
    400
}

fn default_weight_gradients() -> u32 {
    15
}

fn default_weight_layout() -> u32 {
    20
}

fn default_weight_cards() -> u32 {
    15
}

fn default_weight_transitions() -> u32 {
    15
}

fn default_weight_animations() -> u32 {
    10
}

fn default_weight_custom_fonts() -> u32 {
    10
}

fn default_weight_responsive() -> u32 {
    15
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            cloud: None,
            retry: RetryPolicy::default(),
            navigation: NavigationConfig::default(),
            behavior: BehaviorConfig::default(),
            aesthetic: AestheticWeights::default(),
            overall_timeout_secs: default_overall_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            quiescent_timeout_secs: default_quiescent_timeout_secs(),
            dom_ready_timeout_secs: default_dom_ready_timeout_secs(),
            quiet_window_ms: default_quiet_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            popup_selectors: default_popup_selectors(),
            accept_vocabulary: default_accept_vocabulary(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            simulate_scroll: default_simulate_scroll(),
            scroll_passes: default_scroll_passes(),
            scroll_step_px: default_scroll_step_px(),
            scroll_pause_ms: default_scroll_pause_ms(),
        }
    }
}

impl Default for AestheticWeights {
    fn default() -> Self {
        Self {
            gradients: default_weight_gradients(),
            layout: default_weight_layout(),
            cards: default_weight_cards(),
            transitions: default_weight_transitions(),
            animations: default_weight_animations(),
            custom_fonts: default_weight_custom_fonts(),
            responsive: default_weight_responsive(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file =
            File::open(path).map_err(|e| ScrapeError::Config(format!("cannot open file: {e}")))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ScrapeError::Config(format!("cannot read file: {e}")))?;

        serde_json::from_str(&contents).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Apply environment overrides (WEBDRIVER_URL) to the configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}
