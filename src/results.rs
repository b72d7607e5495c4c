use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum number of images kept per page
pub const MAX_IMAGES: usize = 30;
/// Maximum number of links kept per page, across all categories
pub const MAX_LINKS: usize = 100;
/// Maximum number of distinct colors kept
pub const MAX_COLORS: usize = 30;
/// Maximum number of distinct font families kept
pub const MAX_FONTS: usize = 15;
/// Maximum number of content blocks kept
pub const MAX_CONTENT_BLOCKS: usize = 20;
/// Maximum number of fields kept per form
pub const MAX_FORM_FIELDS: usize = 8;
/// Maximum number of inline style attributes kept
pub const MAX_INLINE_STYLES: usize = 20;
/// Maximum number of inline script samples kept
pub const MAX_INLINE_SCRIPT_SAMPLES: usize = 10;
/// Maximum number of CSS custom properties kept
pub const MAX_CSS_VARIABLES: usize = 50;
/// Maximum number of raw media query blocks kept
pub const MAX_MEDIA_QUERIES: usize = 20;
/// Maximum number of visible layout containers kept
pub const MAX_LAYOUT_CONTAINERS: usize = 50;
/// Maximum number of microdata items kept
pub const MAX_MICRODATA_ITEMS: usize = 10;

/// Normalized snapshot of one rendered webpage.
///
/// Immutable once returned; owns all substructures exclusively. Every URL
/// field is absolutized against the page base URL, and every bounded
/// collection has its cap applied after filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedSite {
    /// Final (post-redirect) URL of the page
    pub url: String,

    /// Page title, never empty ("Untitled" when the tag is absent)
    pub title: String,

    /// Meta description (og:description as fallback)
    pub meta_description: String,

    /// Meta keywords
    pub meta_keywords: String,

    /// Canonical URL, absolutized, empty when not declared
    pub canonical_url: String,

    /// Page language ("en" when undeclared)
    pub language: String,

    /// Raw HTML as rendered
    pub raw_html: String,

    /// Clean text content with scripts and styles stripped
    pub text_content: String,

    /// Word count of the text content
    pub word_count: usize,

    /// Heading/semantic-element/content-block structure
    pub structure: StructureInfo,

    /// Inline, internal and external CSS
    pub styles: StyleInfo,

    /// Color palette extracted from styles (capped at [`MAX_COLORS`])
    pub colors: Vec<String>,

    /// Font families extracted from styles (capped at [`MAX_FONTS`])
    pub fonts: Vec<String>,

    /// External/inline scripts and detected frameworks
    pub scripts: ScriptInfo,

    /// Images (capped at [`MAX_IMAGES`])
    pub images: Vec<ImageRef>,

    /// Links partitioned by category
    pub links: LinkInfo,

    /// Forms with their fields and buttons
    pub forms: Vec<FormInfo>,

    /// Navigation blocks and breadcrumbs
    pub navigation: NavigationInfo,

    /// Live layout snapshot at desktop width
    pub layout: LayoutSnapshot,

    /// Responsive design profile across tested viewport widths
    pub responsive: ResponsiveProfile,

    /// Live design-pattern inventory and aesthetic score
    pub visual: VisualPatterns,

    /// Navigation/paint/resource timing metrics
    pub performance: PerformanceMetrics,

    /// Screenshots per viewport
    pub screenshots: ScreenshotSet,

    /// OpenGraph/Twitter meta and social profile links
    pub social: SocialMeta,

    /// Analytics and tracking vendors detected
    pub analytics: AnalyticsSignals,

    /// Favicon declarations
    pub favicons: FaviconInfo,

    /// JSON-LD and microdata items
    pub structured_data: Vec<StructuredDataItem>,
}

/// One heading in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Heading text
    pub text: String,
    /// Element id, if any
    pub id: Option<String>,
    /// Element classes
    pub classes: Vec<String>,
    /// Position among all headings on the page
    pub ordinal: usize,
}

/// One semantic landmark element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticElement {
    /// Tag name (header, nav, main, section, article, aside, footer)
    pub tag: String,
    /// Element id, if any
    pub id: Option<String>,
    /// Element classes
    pub classes: Vec<String>,
    /// First 100 characters of the element text
    pub text_preview: String,
    /// Number of descendant elements
    pub child_count: usize,
}

/// One major content container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Tag name
    pub tag: String,
    /// Element id
    pub id: String,
    /// Space-joined class list
    pub classes: String,
    /// Length of the contained text
    pub text_length: usize,
    /// Number of descendant elements
    pub child_count: usize,
}

/// Structural overview of the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureInfo {
    /// Headings h1..h6 in document order
    pub headings: Vec<Heading>,
    /// Semantic landmark elements in document order
    pub semantic_elements: Vec<SemanticElement>,
    /// Major content blocks (capped at [`MAX_CONTENT_BLOCKS`])
    pub content_blocks: Vec<ContentBlock>,
}

/// CSS extracted from the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Inline style attribute values (capped at [`MAX_INLINE_STYLES`])
    pub inline_styles: Vec<String>,
    /// Bodies of internal `<style>` tags
    pub stylesheets: Vec<String>,
    /// External stylesheet URLs, absolutized
    pub external_css: Vec<String>,
    /// CSS custom properties (capped at [`MAX_CSS_VARIABLES`])
    pub css_variables: BTreeMap<String, String>,
    /// Raw media query blocks (capped at [`MAX_MEDIA_QUERIES`])
    pub media_queries: Vec<String>,
}

/// Scripts referenced or embedded by the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptInfo {
    /// External script URLs, absolutized
    pub external: Vec<String>,
    /// Leading text of inline scripts (capped at [`MAX_INLINE_SCRIPT_SAMPLES`])
    pub inline_samples: Vec<String>,
    /// Frameworks recognized from script URLs
    pub frameworks: BTreeSet<String>,
}

/// One image reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRef {
    /// Absolutized source URL
    pub src: String,
    /// Alt text
    pub alt: String,
    /// Title attribute
    pub title: String,
    /// Declared width, if parseable
    pub width: Option<u32>,
    /// Declared height, if parseable
    pub height: Option<u32>,
    /// Space-joined class list
    pub classes: String,
    /// Lazy-loading source (data-src), absolutized
    pub lazy_src: Option<String>,
    /// srcset attribute, verbatim
    pub srcset: String,
    /// sizes attribute, verbatim
    pub sizes: String,
    /// True when the image has no alt text
    pub is_decorative: bool,
}

/// One link reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkRef {
    /// Absolutized target
    pub href: String,
    /// Link text
    pub text: String,
    /// Title attribute
    pub title: String,
    /// rel attribute
    pub rel: String,
    /// target attribute
    pub target: String,
}

/// Links partitioned into mutually exclusive categories.
///
/// At most [`MAX_LINKS`] links are kept in total across all categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkInfo {
    /// Same-host and relative links
    pub internal: Vec<LinkRef>,
    /// Cross-host http(s) links
    pub external: Vec<LinkRef>,
    /// mailto: links
    pub email: Vec<LinkRef>,
    /// tel: links
    pub phone: Vec<LinkRef>,
    /// Links to known binary file types
    pub download: Vec<LinkRef>,
}

impl LinkInfo {
    /// Total number of links across all categories
    pub fn total(&self) -> usize {
        self.internal.len()
            + self.external.len()
            + self.email.len()
            + self.phone.len()
            + self.download.len()
    }
}

/// One form field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormField {
    /// Tag name (input, textarea, select)
    pub tag: String,
    /// type attribute
    #[serde(rename = "type")]
    pub type_: String,
    /// name attribute
    pub name: String,
    /// id attribute
    pub id: String,
    /// placeholder attribute
    pub placeholder: String,
    /// Whether the required attribute is present
    pub required: bool,
    /// value attribute
    pub value: String,
    /// Options, for select elements only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

/// One option of a select field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectOption {
    /// value attribute
    pub value: String,
    /// Option text
    pub text: String,
}

/// One form button
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormButton {
    /// Tag name
    pub tag: String,
    /// type attribute
    #[serde(rename = "type")]
    pub type_: String,
    /// Button text (value attribute for inputs)
    pub text: String,
}

/// One form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInfo {
    /// Absolutized action URL
    pub action: String,
    /// Lowercased method, "get" when undeclared
    pub method: String,
    /// enctype attribute
    pub enctype: String,
    /// id attribute
    pub id: String,
    /// Fields (capped at [`MAX_FORM_FIELDS`])
    pub fields: Vec<FormField>,
    /// Submit/button controls
    pub buttons: Vec<FormButton>,
}

/// One link inside a navigation block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavLink {
    /// Absolutized target
    pub href: String,
    /// Link text
    pub text: String,
}

/// One `<nav>` element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavBlock {
    /// id attribute
    pub id: String,
    /// Space-joined class list
    pub classes: String,
    /// Links in document order
    pub links: Vec<NavLink>,
    /// Number of nested lists (submenus)
    pub submenu_count: usize,
}

/// One breadcrumb entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    /// Crumb text
    pub text: String,
    /// Absolutized target
    pub href: String,
}

/// Navigation structure of the page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationInfo {
    /// `<nav>` blocks in document order
    pub nav_blocks: Vec<NavBlock>,
    /// Breadcrumb trails found on the page
    pub breadcrumbs: Vec<Vec<BreadcrumbItem>>,
}

/// Computed-style subset of a layout container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStyles {
    pub display: String,
    pub position: String,
    pub z_index: String,
    pub flex_direction: String,
    pub grid_template_columns: String,
    pub background_color: String,
    pub padding: String,
    pub margin: String,
}

/// One visible container with its bounding box
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutContainer {
    /// Tag name, lowercased
    pub tag: String,
    /// id attribute
    pub id: String,
    /// class attribute, verbatim
    pub classes: String,
    /// Bounding box x, rounded
    pub x: i64,
    /// Bounding box y, rounded
    pub y: i64,
    /// Bounding box width, rounded
    pub width: i64,
    /// Bounding box height, rounded
    pub height: i64,
    /// Computed style subset
    pub styles: ContainerStyles,
}

/// Computed body styles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyStyles {
    pub font_family: String,
    pub font_size: String,
    pub background_color: String,
    pub color: String,
}

/// Live layout snapshot at desktop width
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Viewport width at capture time
    pub viewport_width: u32,
    /// Viewport height at capture time
    pub viewport_height: u32,
    /// Visible containers (capped at [`MAX_LAYOUT_CONTAINERS`])
    pub containers: Vec<LayoutContainer>,
    /// Computed body styles
    pub body: BodyStyles,
}

/// Measurements taken at one tested viewport width
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakpointTest {
    /// Emulated viewport width
    pub width: u32,
    /// Rendered body width
    pub body_width: u32,
    /// Computed body font size
    pub font_size: String,
    /// Primary container max-width
    pub container_max_width: String,
    /// Primary container padding
    pub container_padding: String,
    /// Primary container grid-template-columns
    pub grid_columns: String,
    /// Primary container flex-direction
    pub flex_direction: String,
}

/// Responsive design profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsiveProfile {
    /// Content of the viewport meta tag, if present
    pub viewport_meta: Option<String>,
    /// Measurements across tested widths
    pub breakpoints: Vec<BreakpointTest>,
    /// True iff the viewport meta declares width=device-width
    pub is_responsive: bool,
    /// True iff the primary container max-width varies across tested widths
    pub has_media_queries: bool,
}

/// Grid/flex/card/hero usage counts across sampled containers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutCounts {
    pub grid: usize,
    pub flex: usize,
    pub cards: usize,
    pub hero: usize,
}

/// One probed UI component type with a representative style sample
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiComponent {
    /// Component type (button, modal, carousel, ...)
    #[serde(rename = "type")]
    pub type_: String,
    /// Number of matching elements
    pub count: usize,
    /// Computed style sample of the first match
    pub sample_style: BTreeMap<String, String>,
}

/// Design-pattern inventory from live CSSOM and computed-style inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualPatterns {
    /// Animation declarations and keyframe names
    pub animations: Vec<String>,
    /// Gradient background declarations
    pub gradients: Vec<String>,
    /// Box-shadow declarations
    pub shadows: Vec<String>,
    /// Border-radius declarations
    pub border_radii: Vec<String>,
    /// Layout pattern usage counts
    pub layout_counts: LayoutCounts,
    /// Probed UI components with at least one match
    pub ui_components: Vec<UiComponent>,
    /// Typographic hierarchy signals
    pub visual_hierarchy: BTreeMap<String, String>,
    /// CSS custom properties declared on :root
    pub design_tokens: BTreeMap<String, String>,
    /// Aesthetic score, 0 to 100 (advisory only)
    pub aesthetic_score: u32,
    /// Style label derived from the score band
    pub style_label: String,
}

impl Default for VisualPatterns {
    fn default() -> Self {
        Self {
            animations: Vec::new(),
            gradients: Vec::new(),
            shadows: Vec::new(),
            border_radii: Vec::new(),
            layout_counts: LayoutCounts::default(),
            ui_components: Vec::new(),
            visual_hierarchy: BTreeMap::new(),
            design_tokens: BTreeMap::new(),
            aesthetic_score: 0,
            style_label: "traditional".to_string(),
        }
    }
}

/// Navigation/paint/resource timing metrics.
///
/// All zeros when the rendering engine does not expose timing entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub load_time_ms: f64,
    pub dom_content_loaded_ms: f64,
    pub first_paint_ms: f64,
    pub first_contentful_paint_ms: f64,
    pub transfer_size_bytes: u64,
    pub encoded_body_size_bytes: u64,
    pub decoded_body_size_bytes: u64,
    pub resource_count: usize,
}

/// One captured screenshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Screenshot {
    /// Viewport width at capture time
    pub width: u32,
    /// Viewport height at capture time
    pub height: u32,
    /// Whether this covers the full page rather than above the fold
    pub full_page: bool,
    /// PNG bytes, serialized as base64
    #[serde(with = "crate::utils::base64_bytes")]
    pub data: Vec<u8>,
}

/// Screenshots keyed by viewport name.
///
/// Keys are "desktop", "tablet", "mobile" for above-the-fold captures and
/// the same names with a "_full" suffix for full-page captures. Viewports
/// whose capture failed are simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenshotSet {
    pub shots: BTreeMap<String, Screenshot>,
}

/// One social profile link
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name (facebook, twitter, ...)
    pub platform: String,
    /// Link target, verbatim
    pub url: String,
    /// Link text
    pub text: String,
}

/// Social metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMeta {
    /// OpenGraph properties without the og: prefix
    pub open_graph: BTreeMap<String, String>,
    /// Twitter card properties without the twitter: prefix
    pub twitter: BTreeMap<String, String>,
    /// Social profile links found on the page
    pub links: Vec<SocialLink>,
}

/// Analytics and tracking vendors detected on the page.
///
/// Detection is independent per vendor; several may match at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsSignals {
    /// Google Analytics ids (UA-... and G-...)
    pub google_analytics: Vec<String>,
    /// Google Tag Manager container ids
    pub google_tag_manager: Vec<String>,
    /// Facebook pixel ids
    pub facebook_pixel: Vec<String>,
    /// Other tracking vendors recognized by hostname
    pub other: Vec<String>,
}

/// One favicon declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaviconRef {
    /// Absolutized icon URL
    pub href: String,
    /// sizes attribute
    pub sizes: String,
    /// type attribute
    #[serde(rename = "type")]
    pub type_: String,
}

/// Favicon declarations keyed by rel value.
///
/// Contains a default `/favicon.ico` entry when the page declares none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaviconInfo {
    pub icons: BTreeMap<String, FaviconRef>,
}

/// One structured data item (JSON-LD or microdata)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredDataItem {
    /// "json-ld" or "microdata"
    pub kind: String,
    /// itemtype attribute, for microdata items
    pub item_type: String,
    /// Parsed payload (JSON-LD body, or microdata property map)
    pub data: serde_json::Value,
}
