use super::element_text;
use crate::results::{LinkInfo, LinkRef, MAX_LINKS};
use crate::utils::absolutize;
use scraper::{Html, Selector};
use url::Url;

/// File extensions categorized as downloads
const DOWNLOAD_EXTENSIONS: [&str; 11] = [
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".zip", ".rar", ".dmg", ".mp3", ".mp4",
];

/// Link category. Categories are mutually exclusive and exhaustive: every
/// link lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkCategory {
    Internal,
    External,
    Email,
    Phone,
    Download,
}

/// Categorize one href against the page base URL.
///
/// Precedence: mailto, tel, known binary extension, then cross-host http(s)
/// as external; everything else (relative, fragment, other schemes,
/// unparseable) is internal.
pub(crate) fn categorize(href: &str, base: &Url) -> LinkCategory {
    let lower = href.trim().to_ascii_lowercase();
    if lower.starts_with("mailto:") {
        return LinkCategory::Email;
    }
    if lower.starts_with("tel:") {
        return LinkCategory::Phone;
    }

    match base.join(href.trim()) {
        Ok(resolved) => {
            let path = resolved.path().to_ascii_lowercase();
            if DOWNLOAD_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
                return LinkCategory::Download;
            }

            match resolved.scheme() {
                "http" | "https" => {
                    if resolved.host_str() == base.host_str() {
                        LinkCategory::Internal
                    } else {
                        LinkCategory::External
                    }
                }
                _ => LinkCategory::Internal,
            }
        }
        Err(_) => LinkCategory::Internal,
    }
}

/// Extract links partitioned by category.
///
/// Empty hrefs are filtered out first; the total cap applies to what
/// survives the filter.
pub fn extract_links(doc: &Html, base: &Url) -> LinkInfo {
    let selector = Selector::parse("a[href]").unwrap();
    let mut links = LinkInfo::default();

    for el in doc.select(&selector) {
        if links.total() >= MAX_LINKS {
            break;
        }

        let href = el.value().attr("href").unwrap_or("").trim();
        if href.is_empty() {
            continue;
        }

        let link = LinkRef {
            href: absolutize(base, href),
            text: element_text(&el),
            title: el.value().attr("title").unwrap_or("").to_string(),
            rel: el.value().attr("rel").unwrap_or("").to_string(),
            target: el.value().attr("target").unwrap_or("").to_string(),
        };

        match categorize(href, base) {
            LinkCategory::Internal => links.internal.push(link),
            LinkCategory::External => links.external.push(link),
            LinkCategory::Email => links.email.push(link),
            LinkCategory::Phone => links.phone.push(link),
            LinkCategory::Download => links.download.push(link),
        }
    }

    links
}
