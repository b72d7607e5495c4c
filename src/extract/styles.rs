use crate::results::{
    MAX_COLORS, MAX_CSS_VARIABLES, MAX_FONTS, MAX_INLINE_STYLES, MAX_MEDIA_QUERIES, StyleInfo,
};
use crate::utils::{absolutize, dedup_preserve_order};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Inline styles, internal stylesheets, external links, variables and
/// media queries
pub fn extract_styles(doc: &Html, base: &Url) -> StyleInfo {
    let inline_selector = Selector::parse("[style]").unwrap();
    let inline_styles: Vec<String> = doc
        .select(&inline_selector)
        .filter_map(|el| el.value().attr("style"))
        .map(|s| s.to_string())
        .take(MAX_INLINE_STYLES)
        .collect();

    let style_selector = Selector::parse("style").unwrap();
    let stylesheets: Vec<String> = doc
        .select(&style_selector)
        .map(|el| el.text().collect::<String>())
        .collect();

    // rel is multi-valued, so match it as a whitespace-separated list
    let css_selector = Selector::parse("link[rel~=\"stylesheet\"]").unwrap();
    let external_css = doc
        .select(&css_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| absolutize(base, href))
        .collect();

    let css_variables = css_variables(&stylesheets, &inline_styles);
    let media_queries = media_queries(&stylesheets);

    StyleInfo {
        inline_styles,
        stylesheets,
        external_css,
        css_variables,
        media_queries,
    }
}

/// CSS custom property declarations as a name-to-value map
fn css_variables(stylesheets: &[String], inline_styles: &[String]) -> BTreeMap<String, String> {
    let var_re = Regex::new(r"--([\w-]+)\s*:\s*([^;{}]+)").unwrap();
    let mut variables = BTreeMap::new();

    for body in stylesheets.iter().chain(inline_styles.iter()) {
        for capture in var_re.captures_iter(body) {
            if variables.len() >= MAX_CSS_VARIABLES {
                return variables;
            }
            variables
                .entry(format!("--{}", &capture[1]))
                .or_insert_with(|| capture[2].trim().to_string());
        }
    }

    variables
}

/// Raw media query blocks (shallow: the condition plus its first block)
fn media_queries(stylesheets: &[String]) -> Vec<String> {
    let mq_re = Regex::new(r"(?s)@media[^{]+\{[^}]*\}").unwrap();
    let mut queries = Vec::new();

    for body in stylesheets {
        for found in mq_re.find_iter(body) {
            if queries.len() >= MAX_MEDIA_QUERIES {
                return queries;
            }
            queries.push(found.as_str().to_string());
        }
    }

    queries
}

/// Color tokens from inline styles and stylesheet bodies, deduplicated
/// in first-seen order and capped after deduplication
pub fn extract_colors(doc: &Html) -> Vec<String> {
    let color_re = Regex::new(r"#[0-9a-fA-F]{3,6}\b|rgba?\([^)]*\)").unwrap();
    let mut colors = Vec::new();

    for source in style_sources(doc) {
        colors.extend(color_re.find_iter(&source).map(|m| m.as_str().to_string()));
    }

    let mut colors = dedup_preserve_order(colors);
    colors.truncate(MAX_COLORS);
    colors
}

/// Font-family declarations, quotes normalized, deduplicated and capped
pub fn extract_fonts(doc: &Html) -> Vec<String> {
    let font_re = Regex::new(r"(?i)font-family\s*:\s*([^;{}]+)").unwrap();
    let mut fonts = Vec::new();

    for source in style_sources(doc) {
        for capture in font_re.captures_iter(&source) {
            fonts.push(capture[1].trim().replace('"', "'"));
        }
    }

    let mut fonts = dedup_preserve_order(fonts);
    fonts.truncate(MAX_FONTS);
    fonts
}

/// Inline style attributes followed by internal stylesheet bodies, in
/// document order
fn style_sources(doc: &Html) -> Vec<String> {
    let inline_selector = Selector::parse("[style]").unwrap();
    let style_selector = Selector::parse("style").unwrap();

    doc.select(&inline_selector)
        .filter_map(|el| el.value().attr("style").map(|s| s.to_string()))
        .chain(
            doc.select(&style_selector)
                .map(|el| el.text().collect::<String>()),
        )
        .collect()
}
