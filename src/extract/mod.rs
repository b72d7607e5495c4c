//! Pure DOM extraction.
//!
//! Everything in this module is a function of the HTML text and the page
//! base URL alone: no browser, no I/O, no clock. Identical input yields
//! byte-identical output.

mod forms;
mod links;
mod media;
mod signals;
mod structure;
mod styles;

#[cfg(test)]
mod tests;

use crate::results::{
    AnalyticsSignals, FaviconInfo, FormInfo, ImageRef, LinkInfo, NavigationInfo, ScriptInfo,
    SocialMeta, StructureInfo, StructuredDataItem, StyleInfo,
};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use url::Url;

/// Everything the extractor derives from the static HTML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomContent {
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub canonical_url: String,
    pub language: String,
    pub text_content: String,
    pub word_count: usize,
    pub structure: StructureInfo,
    pub styles: StyleInfo,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    pub scripts: ScriptInfo,
    pub images: Vec<ImageRef>,
    pub links: LinkInfo,
    pub forms: Vec<FormInfo>,
    pub navigation: NavigationInfo,
    pub social: SocialMeta,
    pub analytics: AnalyticsSignals,
    pub favicons: FaviconInfo,
    pub structured_data: Vec<StructuredDataItem>,
}

/// Extract structural data from HTML against the given base URL
pub fn extract(html: &str, base_url: &Url) -> DomContent {
    let doc = Html::parse_document(html);

    let text_content = structure::text_content(&doc);
    let word_count = text_content.split_whitespace().count();

    DomContent {
        title: structure::title(&doc),
        meta_description: structure::meta_description(&doc),
        meta_keywords: structure::meta_keywords(&doc),
        canonical_url: structure::canonical_url(&doc, base_url),
        language: structure::language(&doc),
        structure: structure::analyze(&doc),
        styles: styles::extract_styles(&doc, base_url),
        colors: styles::extract_colors(&doc),
        fonts: styles::extract_fonts(&doc),
        scripts: signals::extract_scripts(&doc, base_url),
        images: media::extract_images(&doc, base_url),
        links: links::extract_links(&doc, base_url),
        forms: forms::extract_forms(&doc, base_url),
        navigation: forms::extract_navigation(&doc, base_url),
        social: signals::extract_social(&doc),
        analytics: signals::extract_analytics(&doc),
        favicons: media::extract_favicons(&doc, base_url),
        structured_data: signals::extract_structured_data(&doc),
        text_content,
        word_count,
    }
}

/// Classes of an element as owned strings
pub(crate) fn element_classes(el: &ElementRef) -> Vec<String> {
    el.value().classes().map(|c| c.to_string()).collect()
}

/// Number of descendant elements, excluding the element itself
pub(crate) fn descendant_element_count(el: &ElementRef) -> usize {
    el.descendants()
        .skip(1)
        .filter(|node| node.value().is_element())
        .count()
}

/// Full text of an element with whitespace collapsed
pub(crate) fn element_text(el: &ElementRef) -> String {
    crate::utils::collapse_whitespace(&el.text().collect::<String>())
}
