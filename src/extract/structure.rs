use super::{descendant_element_count, element_classes, element_text};
use crate::results::{ContentBlock, Heading, MAX_CONTENT_BLOCKS, SemanticElement, StructureInfo};
use crate::utils::{absolutize, collapse_whitespace, truncate_text};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Class keywords marking a container as a major content block
const CONTENT_KEYWORDS: [&str; 5] = ["content", "main", "body", "article", "post"];

/// Page title, falling back to "Untitled" when absent or empty
pub fn title(doc: &Html) -> String {
    let selector = Selector::parse("title").unwrap();
    doc.select(&selector)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Meta description, with og:description as fallback
pub fn meta_description(doc: &Html) -> String {
    meta_content(doc, "meta[name=\"description\"]")
        .or_else(|| meta_content(doc, "meta[property=\"og:description\"]"))
        .unwrap_or_default()
}

/// Meta keywords
pub fn meta_keywords(doc: &Html) -> String {
    meta_content(doc, "meta[name=\"keywords\"]").unwrap_or_default()
}

/// Canonical URL, absolutized, empty when not declared
pub fn canonical_url(doc: &Html, base: &Url) -> String {
    let selector = Selector::parse("link[rel=\"canonical\"]").unwrap();
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| absolutize(base, href))
        .unwrap_or_default()
}

/// Page language from the html lang attribute, then the content-language
/// meta, defaulting to "en"
pub fn language(doc: &Html) -> String {
    let selector = Selector::parse("html").unwrap();
    if let Some(lang) = doc
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("lang"))
    {
        let lang = lang.trim();
        if !lang.is_empty() {
            return lang.to_string();
        }
    }

    meta_content(doc, "meta[http-equiv=\"content-language\"]").unwrap_or_else(|| "en".to_string())
}

/// Content attribute of the first element matching the selector
fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Clean text content with script, style and noscript elements stripped
pub fn text_content(doc: &Html) -> String {
    let mut out = String::new();
    collect_text(doc.root_element(), &mut out);
    collapse_whitespace(&out)
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if name == "script" || name == "style" || name == "noscript" {
                continue;
            }
            collect_text(child_el, out);
        }
    }
}

/// Heading, landmark and content-block structure
pub fn analyze(doc: &Html) -> StructureInfo {
    StructureInfo {
        headings: headings(doc),
        semantic_elements: semantic_elements(doc),
        content_blocks: content_blocks(doc),
    }
}

/// Headings h1..h6 walked in document order, ordinal preserved
fn headings(doc: &Html) -> Vec<Heading> {
    let selector = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();
    doc.select(&selector)
        .enumerate()
        .map(|(ordinal, el)| Heading {
            level: el.value().name().as_bytes()[1] - b'0',
            text: element_text(&el),
            id: el.value().id().map(|id| id.to_string()),
            classes: element_classes(&el),
            ordinal,
        })
        .collect()
}

/// Semantic landmark elements in document order
fn semantic_elements(doc: &Html) -> Vec<SemanticElement> {
    let selector = Selector::parse("header, nav, main, section, article, aside, footer").unwrap();
    doc.select(&selector)
        .map(|el| SemanticElement {
            tag: el.value().name().to_string(),
            id: el.value().id().map(|id| id.to_string()),
            classes: element_classes(&el),
            text_preview: truncate_text(&element_text(&el), 100),
            child_count: descendant_element_count(&el),
        })
        .collect()
}

/// Major content blocks: classed containers whose class list mentions a
/// content keyword. The cap applies after the keyword filter.
fn content_blocks(doc: &Html) -> Vec<ContentBlock> {
    let selector = Selector::parse("div[class], section[class], article[class]").unwrap();
    doc.select(&selector)
        .filter(|el| {
            let classes = element_classes(el).join(" ").to_lowercase();
            CONTENT_KEYWORDS.iter().any(|keyword| classes.contains(keyword))
        })
        .take(MAX_CONTENT_BLOCKS)
        .map(|el| ContentBlock {
            tag: el.value().name().to_string(),
            id: el.value().id().unwrap_or("").to_string(),
            classes: element_classes(&el).join(" "),
            text_length: element_text(&el).len(),
            child_count: descendant_element_count(&el),
        })
        .collect()
}
