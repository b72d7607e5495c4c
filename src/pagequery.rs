//! Named page-query contracts.
//!
//! Every in-page DOM/CSSOM read the probes need is defined here as a script
//! constant plus a typed wrapper that deserializes whatever JSON the script
//! returns. Probes never embed ad hoc script strings.

use crate::error::DriverError;
use crate::results::{BodyStyles, LayoutContainer, UiComponent};
use crate::session::driver::PageDriver;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of resource-timing entries recorded so far
const RESOURCE_COUNT_JS: &str = "return performance.getEntriesByType('resource').length;";

/// Current document ready state
const READY_STATE_JS: &str = "return document.readyState;";

/// HTTP status of the navigation response, 200 when the engine hides it
const RESPONSE_STATUS_JS: &str = "\
const nav = performance.getEntriesByType('navigation')[0];
return nav && nav.responseStatus ? nav.responseStatus : 200;";

/// Content attribute of the viewport meta tag, or null
const VIEWPORT_META_JS: &str = "\
const meta = document.querySelector('meta[name=\"viewport\"]');
return meta ? meta.getAttribute('content') : null;";

/// Full document scroll height
const SCROLL_HEIGHT_JS: &str = "return document.documentElement.scrollHeight;";

/// Scroll down by the given number of pixels
const SCROLL_BY_JS: &str = "window.scrollBy(0, arguments[0]); return window.pageYOffset;";

/// Scroll back to the top of the page
const SCROLL_TOP_JS: &str = "window.scrollTo(0, 0); return 0;";

/// Navigation/paint/resource timing summary
const PERFORMANCE_JS: &str = "\
const nav = performance.getEntriesByType('navigation')[0];
const paints = performance.getEntriesByType('paint');
const fp = paints.find(p => p.name === 'first-paint');
const fcp = paints.find(p => p.name === 'first-contentful-paint');
return {
  loadTime: nav ? nav.loadEventEnd - nav.loadEventStart : 0,
  domContentLoaded: nav ? nav.domContentLoadedEventEnd - nav.domContentLoadedEventStart : 0,
  firstPaint: fp ? fp.startTime : 0,
  firstContentfulPaint: fcp ? fcp.startTime : 0,
  transferSize: nav ? nav.transferSize : 0,
  encodedBodySize: nav ? nav.encodedBodySize : 0,
  decodedBodySize: nav ? nav.decodedBodySize : 0,
  resourceCount: performance.getEntriesByType('resource').length
};";

/// Visible containers with bounding boxes and a computed-style subset.
///
/// Invisible containers are filtered out before the cap is applied.
const LAYOUT_JS: &str = "\
const containers = document.querySelectorAll('div, section, main, header, footer, article, aside');
const picked = [];
for (const el of containers) {
  if (picked.length >= 50) break;
  const rect = el.getBoundingClientRect();
  if (rect.width <= 0 || rect.height <= 0) continue;
  const cs = window.getComputedStyle(el);
  picked.push({
    tag: el.tagName.toLowerCase(),
    id: el.id || '',
    classes: el.getAttribute('class') || '',
    x: Math.round(rect.x),
    y: Math.round(rect.y),
    width: Math.round(rect.width),
    height: Math.round(rect.height),
    styles: {
      display: cs.display,
      position: cs.position,
      zIndex: cs.zIndex,
      flexDirection: cs.flexDirection,
      gridTemplateColumns: cs.gridTemplateColumns,
      backgroundColor: cs.backgroundColor,
      padding: cs.padding,
      margin: cs.margin
    }
  });
}
const bodyCs = window.getComputedStyle(document.body);
return {
  viewport: { width: window.innerWidth, height: window.innerHeight },
  containers: picked,
  body: {
    fontFamily: bodyCs.fontFamily,
    fontSize: bodyCs.fontSize,
    backgroundColor: bodyCs.backgroundColor,
    color: bodyCs.color
  }
};";

/// Layout measurements of the body and primary container at the current width
const BREAKPOINT_JS: &str = "\
const body = document.body;
const bodyCs = window.getComputedStyle(body);
const container = document.querySelector('main, .container, .wrapper, .content') || body;
const containerCs = window.getComputedStyle(container);
return {
  bodyWidth: body.offsetWidth,
  fontSize: bodyCs.fontSize,
  containerMaxWidth: containerCs.maxWidth,
  containerPadding: containerCs.padding,
  gridColumns: containerCs.gridTemplateColumns,
  flexDirection: containerCs.flexDirection
};";

/// CSSOM and computed-style scan feeding the visual pattern analyzer.
///
/// Cross-origin stylesheets and individually failing elements are skipped;
/// the scan itself never throws.
const VISUAL_SCAN_JS: &str = "\
const animations = [];
const gradients = [];
const shadows = [];
const radii = [];
let keyframeCount = 0;
let transitionCount = 0;
for (const sheet of document.styleSheets) {
  let rules;
  try { rules = sheet.cssRules; } catch (e) { continue; }
  if (!rules) continue;
  for (const rule of rules) {
    try {
      if (rule.type === CSSRule.KEYFRAMES_RULE) {
        keyframeCount += 1;
        animations.push('@keyframes ' + rule.name);
        continue;
      }
      const style = rule.style;
      if (!style) continue;
      const animation = style.getPropertyValue('animation') || style.getPropertyValue('animation-name');
      if (animation) animations.push(animation.trim());
      if (style.getPropertyValue('transition')) transitionCount += 1;
      const background = (style.getPropertyValue('background') || '') + ' ' +
        (style.getPropertyValue('background-image') || '');
      if (background.includes('gradient')) gradients.push(background.trim());
      const shadow = style.getPropertyValue('box-shadow');
      if (shadow) shadows.push(shadow.trim());
      const radius = style.getPropertyValue('border-radius');
      if (radius) radii.push(radius.trim());
    } catch (e) { }
  }
}
let grid = 0, flex = 0, cards = 0, heroes = 0;
const sampled = document.querySelectorAll('div, section, main, header, article, aside, li');
let seen = 0;
for (const el of sampled) {
  if (seen >= 400) break;
  seen += 1;
  try {
    const cs = window.getComputedStyle(el);
    if (cs.display === 'grid') grid += 1;
    if (cs.display === 'flex') flex += 1;
    const cls = (el.getAttribute('class') || '').toLowerCase();
    const radius = parseFloat(cs.borderRadius) || 0;
    const hasShadow = cs.boxShadow && cs.boxShadow !== 'none';
    if (cls.includes('card') || (radius > 0 && hasShadow)) cards += 1;
    const rect = el.getBoundingClientRect();
    if (cls.includes('hero') || rect.height > window.innerHeight * 0.7) heroes += 1;
  } catch (e) { }
}
const probes = {
  button: 'button, .btn, [class*=\"button\"]',
  modal: '.modal, [role=\"dialog\"]',
  carousel: '.carousel, .slider, .swiper',
  dropdown: '.dropdown, select, [aria-haspopup=\"true\"]',
  tabs: '.tabs, [role=\"tablist\"]',
  accordion: '.accordion, details',
  badge: '.badge, .tag, .chip',
  tooltip: '.tooltip, [data-tooltip]'
};
const components = [];
for (const [type, selector] of Object.entries(probes)) {
  try {
    const matches = document.querySelectorAll(selector);
    if (matches.length === 0) continue;
    const cs = window.getComputedStyle(matches[0]);
    components.push({
      type: type,
      count: matches.length,
      sampleStyle: {
        backgroundColor: cs.backgroundColor,
        color: cs.color,
        borderRadius: cs.borderRadius,
        boxShadow: cs.boxShadow,
        padding: cs.padding,
        fontSize: cs.fontSize
      }
    });
  } catch (e) { }
}
const hierarchy = {};
try {
  const h1 = document.querySelector('h1');
  if (h1) {
    const hcs = window.getComputedStyle(h1);
    hierarchy.h1FontSize = hcs.fontSize;
    hierarchy.h1FontWeight = hcs.fontWeight;
  }
  const bodyCs = window.getComputedStyle(document.body);
  hierarchy.bodyFontSize = bodyCs.fontSize;
  hierarchy.bodyLineHeight = bodyCs.lineHeight;
} catch (e) { }
const tokens = {};
try {
  for (const sheet of document.styleSheets) {
    let rules;
    try { rules = sheet.cssRules; } catch (e) { continue; }
    if (!rules) continue;
    for (const rule of rules) {
      if (!rule.selectorText || rule.selectorText !== ':root') continue;
      for (const name of rule.style) {
        if (name.startsWith('--') && Object.keys(tokens).length < 40) {
          tokens[name] = rule.style.getPropertyValue(name).trim();
        }
      }
    }
  }
} catch (e) { }
let customFontCount = 0;
try {
  const generic = ['serif', 'sans-serif', 'monospace', 'system-ui', 'cursive', 'fantasy'];
  const family = window.getComputedStyle(document.body).fontFamily || '';
  customFontCount = family.split(',')
    .map(f => f.replace(/[\"']/g, '').trim().toLowerCase())
    .filter(f => f && !generic.includes(f)).length;
} catch (e) { }
const hasViewportMeta = !!document.querySelector('meta[name=\"viewport\"]');
return {
  animations: animations.slice(0, 20),
  gradients: gradients.slice(0, 20),
  shadows: shadows.slice(0, 20),
  borderRadii: radii.slice(0, 20),
  gridCount: grid,
  flexCount: flex,
  cardCount: cards,
  heroCount: heroes,
  transitionCount: transitionCount,
  keyframeCount: keyframeCount,
  uiComponents: components,
  visualHierarchy: hierarchy,
  designTokens: tokens,
  customFontCount: customFontCount,
  hasViewportMeta: hasViewportMeta
};";

/// Scan overlay selectors for a visible accept/close control and click it.
///
/// arguments[0] is the selector list, arguments[1] the accept vocabulary.
/// Returns 'clicked' when a control was clicked, 'none' otherwise.
const DISMISS_OVERLAYS_JS: &str = "\
const selectors = arguments[0];
const vocab = arguments[1];
for (const sel of selectors) {
  let nodes;
  try { nodes = document.querySelectorAll(sel); } catch (e) { continue; }
  for (const node of nodes) {
    if (!(node.offsetWidth || node.offsetHeight || node.getClientRects().length)) continue;
    const controls = node.querySelectorAll(
      'button, [role=\"button\"], a, .close, .dismiss, .accept');
    for (const control of controls) {
      const label = ((control.innerText || '') + ' ' +
        (control.getAttribute('aria-label') || '')).toLowerCase();
      if (vocab.some(word => label.includes(word))) {
        control.click();
        return 'clicked';
      }
    }
  }
}
return 'none';";

/// Raw timing record returned by [`PERFORMANCE_JS`]
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPerformance {
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub first_paint: f64,
    pub first_contentful_paint: f64,
    pub transfer_size: f64,
    pub encoded_body_size: f64,
    pub decoded_body_size: f64,
    pub resource_count: usize,
}

/// Raw viewport dimensions
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawViewport {
    pub width: u32,
    pub height: u32,
}

/// Raw layout record returned by [`LAYOUT_JS`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLayout {
    pub viewport: RawViewport,
    pub containers: Vec<LayoutContainer>,
    pub body: BodyStyles,
}

/// Raw measurements returned by [`BREAKPOINT_JS`]
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBreakpoint {
    pub body_width: u32,
    pub font_size: String,
    pub container_max_width: String,
    pub container_padding: String,
    pub grid_columns: String,
    pub flex_direction: String,
}

/// Raw scan record returned by [`VISUAL_SCAN_JS`]
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawVisualScan {
    pub animations: Vec<String>,
    pub gradients: Vec<String>,
    pub shadows: Vec<String>,
    pub border_radii: Vec<String>,
    pub grid_count: usize,
    pub flex_count: usize,
    pub card_count: usize,
    pub hero_count: usize,
    pub transition_count: usize,
    pub keyframe_count: usize,
    pub ui_components: Vec<UiComponent>,
    pub visual_hierarchy: BTreeMap<String, String>,
    pub design_tokens: BTreeMap<String, String>,
    pub custom_font_count: usize,
    pub has_viewport_meta: bool,
}

/// Run a query and deserialize its JSON result
async fn run<T: serde::de::DeserializeOwned>(
    driver: &dyn PageDriver,
    label: &str,
    script: &str,
    args: Vec<Value>,
) -> Result<T, DriverError> {
    let value = driver.execute(script, args).await?;
    serde_json::from_value(value)
        .map_err(|e| DriverError(format!("{label} query returned malformed data: {e}")))
}

/// Read a numeric query result, tolerating float encodings
async fn run_number(
    driver: &dyn PageDriver,
    label: &str,
    script: &str,
) -> Result<u64, DriverError> {
    let value = driver.execute(script, Vec::new()).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| f as u64))
        .ok_or_else(|| DriverError(format!("{label} query returned a non-number: {value}")))
}

/// Number of resource-timing entries recorded so far
pub async fn query_resource_count(driver: &dyn PageDriver) -> Result<u64, DriverError> {
    run_number(driver, "resource count", RESOURCE_COUNT_JS).await
}

/// Current document ready state string
pub async fn query_ready_state(driver: &dyn PageDriver) -> Result<String, DriverError> {
    let value = driver.execute(READY_STATE_JS, Vec::new()).await?;
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| DriverError(format!("ready state query returned a non-string: {value}")))
}

/// HTTP status of the navigation response
pub async fn query_response_status(driver: &dyn PageDriver) -> Result<u16, DriverError> {
    Ok(run_number(driver, "response status", RESPONSE_STATUS_JS).await? as u16)
}

/// Content of the viewport meta tag, if present
pub async fn query_viewport_meta(driver: &dyn PageDriver) -> Result<Option<String>, DriverError> {
    let value = driver.execute(VIEWPORT_META_JS, Vec::new()).await?;
    Ok(value.as_str().map(|s| s.to_string()))
}

/// Full document scroll height in pixels
pub async fn query_scroll_height(driver: &dyn PageDriver) -> Result<u64, DriverError> {
    run_number(driver, "scroll height", SCROLL_HEIGHT_JS).await
}

/// Scroll the page down by `pixels`
pub async fn scroll_by(driver: &dyn PageDriver, pixels: u32) -> Result<(), DriverError> {
    driver
        .execute(SCROLL_BY_JS, vec![Value::from(pixels)])
        .await?;
    Ok(())
}

/// Scroll the page back to the top
pub async fn scroll_to_top(driver: &dyn PageDriver) -> Result<(), DriverError> {
    driver.execute(SCROLL_TOP_JS, Vec::new()).await?;
    Ok(())
}

/// Timing summary from the performance entries
pub async fn query_performance(driver: &dyn PageDriver) -> Result<RawPerformance, DriverError> {
    run(driver, "performance", PERFORMANCE_JS, Vec::new()).await
}

/// Visible containers, bounding boxes and body styles
pub async fn query_layout(driver: &dyn PageDriver) -> Result<RawLayout, DriverError> {
    run(driver, "layout", LAYOUT_JS, Vec::new()).await
}

/// Body/primary-container measurements at the current viewport width
pub async fn query_breakpoint(driver: &dyn PageDriver) -> Result<RawBreakpoint, DriverError> {
    run(driver, "breakpoint", BREAKPOINT_JS, Vec::new()).await
}

/// CSSOM/computed-style scan for the visual pattern analyzer
pub async fn query_visual_scan(driver: &dyn PageDriver) -> Result<RawVisualScan, DriverError> {
    run(driver, "visual scan", VISUAL_SCAN_JS, Vec::new()).await
}

/// Try to click an accept/close control inside a visible overlay.
///
/// Returns true when a control was clicked.
pub async fn dismiss_overlays(
    driver: &dyn PageDriver,
    selectors: &[String],
    vocabulary: &[String],
) -> Result<bool, DriverError> {
    let args = vec![
        serde_json::to_value(selectors).unwrap_or(Value::Null),
        serde_json::to_value(vocabulary).unwrap_or(Value::Null),
    ];
    let value = driver.execute(DISMISS_OVERLAYS_JS, args).await?;
    Ok(value.as_str() == Some("clicked"))
}
