use crate::extract;
use crate::extract::links::{LinkCategory, categorize};
use crate::results::{MAX_COLORS, MAX_FONTS, MAX_IMAGES, MAX_LINKS};
use url::Url;

fn base() -> Url {
    Url::parse("https://example.com/page").unwrap()
}

#[test]
fn test_categorize_precedence() {
    let base = base();

    assert_eq!(categorize("mailto:info@example.com", &base), LinkCategory::Email);
    assert_eq!(categorize("tel:+1-555-0100", &base), LinkCategory::Phone);
    assert_eq!(categorize("/files/report.pdf", &base), LinkCategory::Download);
    // A download on a foreign host is still a download
    assert_eq!(
        categorize("https://cdn.other.org/video.mp4", &base),
        LinkCategory::Download
    );
    assert_eq!(
        categorize("https://other.org/about", &base),
        LinkCategory::External
    );
    assert_eq!(
        categorize("https://example.com/about", &base),
        LinkCategory::Internal
    );
    assert_eq!(categorize("/about", &base), LinkCategory::Internal);
    assert_eq!(categorize("#section", &base), LinkCategory::Internal);
    assert_eq!(categorize("javascript:void(0)", &base), LinkCategory::Internal);
}

#[test]
fn test_link_partition_is_exhaustive_and_exclusive() {
    let html = r##"<html><body>
        <a href="/internal">Internal</a>
        <a href="https://other.org/x">External</a>
        <a href="mailto:a@b.c">Mail</a>
        <a href="tel:12345">Call</a>
        <a href="/doc.pdf">Doc</a>
        <a href="">Empty, filtered out</a>
    </body></html>"##;

    let content = extract::extract(html, &base());
    let links = &content.links;

    assert_eq!(links.internal.len(), 1);
    assert_eq!(links.external.len(), 1);
    assert_eq!(links.email.len(), 1);
    assert_eq!(links.phone.len(), 1);
    assert_eq!(links.download.len(), 1);
    assert_eq!(links.total(), 5);
}

#[test]
fn test_link_cap() {
    let mut body = String::new();
    for i in 0..150 {
        body.push_str(&format!("<a href=\"/page-{i}\">Page {i}</a>"));
    }
    let html = format!("<html><body>{body}</body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.links.total(), MAX_LINKS);
}

#[test]
fn test_image_cap() {
    let mut body = String::new();
    for i in 0..40 {
        body.push_str(&format!("<img src=\"/img-{i}.png\" alt=\"{i}\">"));
    }
    let html = format!("<html><body>{body}</body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.images.len(), MAX_IMAGES);
}

#[test]
fn test_image_cap_applies_after_filtering_sourceless_images() {
    // 10 sourceless images must not consume cap slots
    let mut body = String::new();
    for _ in 0..10 {
        body.push_str("<img alt=\"no source\">");
    }
    for i in 0..30 {
        body.push_str(&format!("<img src=\"/img-{i}.png\" alt=\"{i}\">"));
    }
    let html = format!("<html><body>{body}</body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.images.len(), 30);
}

#[test]
fn test_color_and_font_caps() {
    let mut css = String::new();
    for i in 0..40 {
        css.push_str(&format!(".c{i} {{ color: #{:06x}; }}\n", i * 1000 + 1));
    }
    for i in 0..20 {
        css.push_str(&format!(".f{i} {{ font-family: Font{i}, sans-serif; }}\n"));
    }
    let html = format!("<html><head><style>{css}</style></head><body></body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.colors.len(), MAX_COLORS);
    assert_eq!(content.fonts.len(), MAX_FONTS);
}

#[test]
fn test_colors_deduplicated_before_cap() {
    let html = "<html><body>\
        <div style=\"color: #ff0000\">a</div>\
        <div style=\"background: #ff0000\">b</div>\
        <div style=\"color: rgb(1, 2, 3)\">c</div>\
    </body></html>";

    let content = extract::extract(html, &base());
    assert_eq!(content.colors, vec!["#ff0000", "rgb(1, 2, 3)"]);
}

#[test]
fn test_external_css_absolutized() {
    let html = "<html><head>\
        <link rel=\"stylesheet\" href=\"/css/site.css\">\
    </head><body></body></html>";

    let content = extract::extract(html, &base());
    assert_eq!(
        content.styles.external_css,
        vec!["https://example.com/css/site.css"]
    );
}

#[test]
fn test_css_variables_and_media_queries() {
    let html = "<html><head><style>\
        :root { --brand-color: #336699; --gap: 1rem; }\
        @media (max-width: 768px) { body { font-size: 14px; } }\
    </style></head><body></body></html>";

    let content = extract::extract(html, &base());
    assert_eq!(
        content.styles.css_variables.get("--brand-color").map(String::as_str),
        Some("#336699")
    );
    assert_eq!(content.styles.media_queries.len(), 1);
    assert!(content.styles.media_queries[0].starts_with("@media (max-width: 768px)"));
}
