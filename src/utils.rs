use url::Url;

/// Resolve a possibly-relative href against the page base URL.
///
/// Returns the raw value unchanged when it cannot be parsed as a URL at all,
/// so malformed attributes survive into the output instead of vanishing.
pub fn absolutize(base: &Url, href: &str) -> String {
    match base.join(href.trim()) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.trim().to_string(),
    }
}

/// Normalize a caller-supplied URL: trim, default the scheme to https,
/// drop a trailing slash.
pub fn normalize_input_url(url: &str) -> String {
    let mut url = url.trim().to_string();
    if url.is_empty() {
        return url;
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("https://{}", url);
    }

    if url.ends_with('/') {
        url.pop();
    }

    url
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate text to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Convert a URL to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%'], "_");

    // Limit filename length
    if name.len() > 100 {
        name[..100].to_string()
    } else {
        name
    }
}

/// Deduplicate while preserving first-seen order.
pub fn dedup_preserve_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Serde adapter encoding screenshot bytes as base64 strings.
pub mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        assert_eq!(
            absolutize(&base, "/img/logo.png"),
            "https://example.com/img/logo.png"
        );
        assert_eq!(
            absolutize(&base, "//cdn.example.com/a.js"),
            "https://cdn.example.com/a.js"
        );
        assert_eq!(
            absolutize(&base, "other.html"),
            "https://example.com/blog/other.html"
        );
        assert_eq!(
            absolutize(&base, "https://other.org/x"),
            "https://other.org/x"
        );
    }

    #[test]
    fn test_normalize_input_url() {
        assert_eq!(normalize_input_url("example.com"), "https://example.com");
        assert_eq!(
            normalize_input_url(" https://example.com/ "),
            "https://example.com"
        );
        assert_eq!(
            normalize_input_url("http://example.com"),
            "http://example.com"
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_dedup_preserve_order() {
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_preserve_order(values), vec!["b", "a"]);
    }
}
