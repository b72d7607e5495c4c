use super::element_text;
use crate::results::{
    AnalyticsSignals, MAX_INLINE_SCRIPT_SAMPLES, MAX_MICRODATA_ITEMS, ScriptInfo, SocialLink,
    SocialMeta, StructuredDataItem,
};
use crate::utils::{absolutize, dedup_preserve_order, truncate_text};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Framework names recognized in script URLs
const FRAMEWORK_HINTS: [&str; 6] = ["react", "vue", "angular", "jquery", "svelte", "next"];

/// Tracking vendors recognized by hostname fragment
const TRACKING_VENDORS: [&str; 7] = [
    "hotjar",
    "mixpanel",
    "segment",
    "amplitude",
    "intercom",
    "clarity",
    "matomo",
];

/// Social platforms recognized in link targets
const SOCIAL_PLATFORMS: [&str; 8] = [
    "facebook",
    "twitter",
    "instagram",
    "linkedin",
    "youtube",
    "tiktok",
    "pinterest",
    "github",
];

/// External script URLs, inline samples and recognized frameworks
pub fn extract_scripts(doc: &Html, base: &Url) -> ScriptInfo {
    let selector = Selector::parse("script").unwrap();
    let mut external = Vec::new();
    let mut inline_samples = Vec::new();
    let mut frameworks = BTreeSet::new();

    for script in doc.select(&selector) {
        if let Some(src) = script.value().attr("src") {
            let lower = src.to_ascii_lowercase();
            for hint in FRAMEWORK_HINTS {
                if lower.contains(hint) {
                    frameworks.insert(hint.to_string());
                }
            }
            external.push(absolutize(base, src));
        } else {
            let body = script.text().collect::<String>();
            let sample = truncate_text(body.trim(), 200);
            if !sample.is_empty() && inline_samples.len() < MAX_INLINE_SCRIPT_SAMPLES {
                inline_samples.push(sample);
            }
        }
    }

    ScriptInfo {
        external,
        inline_samples,
        frameworks,
    }
}

/// Detect analytics vendors. Each vendor is matched independently, so
/// several may be present at once.
pub fn extract_analytics(doc: &Html) -> AnalyticsSignals {
    let selector = Selector::parse("script").unwrap();
    let ua_re = Regex::new(r"\bUA-\d+-\d+\b").unwrap();
    let g_re = Regex::new(r"\bG-[A-Z0-9]{4,}\b").unwrap();
    let gtm_re = Regex::new(r"\bGTM-[A-Z0-9]+\b").unwrap();
    let fbq_re = Regex::new(r#"fbq\(\s*['"]init['"]\s*,\s*['"](\d+)['"]"#).unwrap();

    let mut signals = AnalyticsSignals::default();

    for script in doc.select(&selector) {
        let src = script.value().attr("src").unwrap_or("").to_ascii_lowercase();
        let body = script.text().collect::<String>();
        let body_lower = body.to_ascii_lowercase();

        if src.contains("google-analytics.com")
            || body_lower.contains("gtag(")
            || body_lower.contains("ga(")
        {
            signals
                .google_analytics
                .extend(ua_re.find_iter(&body).map(|m| m.as_str().to_string()));
            signals
                .google_analytics
                .extend(g_re.find_iter(&body).map(|m| m.as_str().to_string()));
        }

        if src.contains("googletagmanager.com") || body_lower.contains("gtm-") {
            signals
                .google_tag_manager
                .extend(gtm_re.find_iter(&body).map(|m| m.as_str().to_string()));
        }

        if src.contains("connect.facebook.net") || body_lower.contains("fbq(") {
            signals
                .facebook_pixel
                .extend(fbq_re.captures_iter(&body).map(|c| c[1].to_string()));
        }

        for vendor in TRACKING_VENDORS {
            if src.contains(vendor) || body_lower.contains(vendor) {
                signals.other.push(vendor.to_string());
            }
        }
    }

    signals.google_analytics = dedup_preserve_order(signals.google_analytics);
    signals.google_tag_manager = dedup_preserve_order(signals.google_tag_manager);
    signals.facebook_pixel = dedup_preserve_order(signals.facebook_pixel);
    signals.other = dedup_preserve_order(signals.other);
    signals
}

/// OpenGraph/Twitter meta maps and social profile links
pub fn extract_social(doc: &Html) -> SocialMeta {
    let og_selector = Selector::parse("meta[property^=\"og:\"]").unwrap();
    let twitter_selector = Selector::parse("meta[name^=\"twitter:\"]").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let mut open_graph = BTreeMap::new();
    for meta in doc.select(&og_selector) {
        let Some(property) = meta.value().attr("property") else {
            continue;
        };
        let Some(content) = meta.value().attr("content") else {
            continue;
        };
        let key = property.trim_start_matches("og:").to_string();
        if !key.is_empty() && !content.is_empty() {
            open_graph.entry(key).or_insert_with(|| content.to_string());
        }
    }

    let mut twitter = BTreeMap::new();
    for meta in doc.select(&twitter_selector) {
        let Some(name) = meta.value().attr("name") else {
            continue;
        };
        let Some(content) = meta.value().attr("content") else {
            continue;
        };
        let key = name.trim_start_matches("twitter:").to_string();
        if !key.is_empty() && !content.is_empty() {
            twitter.entry(key).or_insert_with(|| content.to_string());
        }
    }

    let mut links = Vec::new();
    for a in doc.select(&link_selector) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let lower = href.to_ascii_lowercase();
        if let Some(platform) = SOCIAL_PLATFORMS.iter().find(|p| lower.contains(**p)) {
            links.push(SocialLink {
                platform: platform.to_string(),
                url: href.to_string(),
                text: element_text(&a),
            });
        }
    }

    SocialMeta {
        open_graph,
        twitter,
        links,
    }
}

/// JSON-LD blocks (skipped on parse failure) and microdata items
pub fn extract_structured_data(doc: &Html) -> Vec<StructuredDataItem> {
    let jsonld_selector = Selector::parse("script[type=\"application/ld+json\"]").unwrap();
    let scope_selector = Selector::parse("[itemscope]").unwrap();
    let prop_selector = Selector::parse("[itemprop]").unwrap();

    let mut items = Vec::new();

    for script in doc.select(&jsonld_selector) {
        let body = script.text().collect::<String>();
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(data) => items.push(StructuredDataItem {
                kind: "json-ld".to_string(),
                item_type: String::new(),
                data,
            }),
            Err(e) => ::log::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    for scope in doc.select(&scope_selector).take(MAX_MICRODATA_ITEMS) {
        let mut properties = serde_json::Map::new();
        for prop in scope.select(&prop_selector) {
            let Some(name) = prop.value().attr("itemprop") else {
                continue;
            };
            let value = prop
                .value()
                .attr("content")
                .map(|content| content.to_string())
                .unwrap_or_else(|| element_text(&prop));
            properties
                .entry(name.to_string())
                .or_insert(serde_json::Value::String(value));
        }

        if !properties.is_empty() {
            items.push(StructuredDataItem {
                kind: "microdata".to_string(),
                item_type: scope.value().attr("itemtype").unwrap_or("").to_string(),
                data: serde_json::Value::Object(properties),
            });
        }
    }

    items
}
