use super::element_classes;
use crate::results::{FaviconInfo, FaviconRef, ImageRef, MAX_IMAGES};
use crate::utils::absolutize;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Favicon link selectors, in lookup order
const FAVICON_SELECTORS: [&str; 4] = [
    "link[rel=\"icon\"]",
    "link[rel=\"shortcut icon\"]",
    "link[rel=\"apple-touch-icon\"]",
    "link[rel=\"apple-touch-icon-precomposed\"]",
];

/// Extract images with absolutized sources.
///
/// Images without a source are filtered out before the cap is applied.
pub fn extract_images(doc: &Html, base: &Url) -> Vec<ImageRef> {
    let selector = Selector::parse("img").unwrap();
    doc.select(&selector)
        .filter(|el| {
            el.value()
                .attr("src")
                .map(|src| !src.trim().is_empty())
                .unwrap_or(false)
        })
        .take(MAX_IMAGES)
        .map(|el| {
            let attr = |name: &str| el.value().attr(name).unwrap_or("").to_string();
            let alt = attr("alt");
            ImageRef {
                src: absolutize(base, el.value().attr("src").unwrap_or("")),
                is_decorative: alt.trim().is_empty(),
                alt,
                title: attr("title"),
                width: el.value().attr("width").and_then(|w| w.trim().parse().ok()),
                height: el.value().attr("height").and_then(|h| h.trim().parse().ok()),
                classes: element_classes(&el).join(" "),
                lazy_src: el.value().attr("data-src").map(|src| absolutize(base, src)),
                srcset: attr("srcset"),
                sizes: attr("sizes"),
            }
        })
        .collect()
}

/// Extract favicon declarations keyed by rel, with a default
/// `/favicon.ico` entry when the page declares none
pub fn extract_favicons(doc: &Html, base: &Url) -> FaviconInfo {
    let mut icons = BTreeMap::new();

    for selector in FAVICON_SELECTORS {
        let selector = Selector::parse(selector).unwrap();
        let Some(el) = doc.select(&selector).next() else {
            continue;
        };
        let Some(href) = el.value().attr("href") else {
            continue;
        };

        let rel = el.value().attr("rel").unwrap_or("icon").to_string();
        icons.entry(rel).or_insert_with(|| FaviconRef {
            href: absolutize(base, href),
            sizes: el.value().attr("sizes").unwrap_or("").to_string(),
            type_: el.value().attr("type").unwrap_or("").to_string(),
        });
    }

    if icons.is_empty() {
        icons.insert(
            "icon".to_string(),
            FaviconRef {
                href: absolutize(base, "/favicon.ico"),
                sizes: String::new(),
                type_: "image/x-icon".to_string(),
            },
        );
    }

    FaviconInfo { icons }
}
