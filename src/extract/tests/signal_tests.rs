use crate::extract;
use url::Url;

fn base() -> Url {
    Url::parse("https://example.com/").unwrap()
}

#[test]
fn test_multiple_analytics_vendors_detected_independently() {
    let html = r#"<html><head>
        <script>
          gtag('config', 'UA-12345-1');
          gtag('config', 'G-ABCD1234');
        </script>
        <script>(function(w,d,s,l,i){w[l]=w[l]||[];})(window,document,'script','dataLayer','GTM-XYZ99');</script>
        <script>fbq('init', '123456789');</script>
        <script src="https://static.hotjar.com/c/hotjar.js"></script>
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    let analytics = &content.analytics;

    assert_eq!(analytics.google_analytics, vec!["UA-12345-1", "G-ABCD1234"]);
    assert_eq!(analytics.google_tag_manager, vec!["GTM-XYZ99"]);
    assert_eq!(analytics.facebook_pixel, vec!["123456789"]);
    assert_eq!(analytics.other, vec!["hotjar"]);
}

#[test]
fn test_analytics_ids_deduplicated() {
    let html = r#"<html><head>
        <script>ga('create', 'UA-1-1');</script>
        <script>ga('send', 'UA-1-1');</script>
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    assert_eq!(content.analytics.google_analytics, vec!["UA-1-1"]);
}

#[test]
fn test_framework_detection_from_script_urls() {
    let html = r#"<html><head>
        <script src="/vendor/react.production.min.js"></script>
        <script src="https://code.jquery.com/jquery-3.7.0.min.js"></script>
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    let frameworks = &content.scripts.frameworks;
    assert!(frameworks.contains("react"));
    assert!(frameworks.contains("jquery"));
    assert_eq!(
        content.scripts.external[0],
        "https://example.com/vendor/react.production.min.js"
    );
}

#[test]
fn test_inline_script_samples_truncated() {
    let long_body = "x".repeat(500);
    let html = format!("<html><head><script>{long_body}</script></head><body></body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.scripts.inline_samples.len(), 1);
    assert_eq!(content.scripts.inline_samples[0].len(), 200);
}

#[test]
fn test_json_ld_parsed_and_malformed_skipped() {
    let html = r#"<html><head>
        <script type="application/ld+json">{"@type": "Organization", "name": "Example"}</script>
        <script type="application/ld+json">{not valid json</script>
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    assert_eq!(content.structured_data.len(), 1);
    assert_eq!(content.structured_data[0].kind, "json-ld");
    assert_eq!(content.structured_data[0].data["name"], "Example");
}

#[test]
fn test_microdata_scan() {
    let html = r#"<html><body>
        <div itemscope itemtype="https://schema.org/Person">
            <span itemprop="name">Jane Doe</span>
            <meta itemprop="jobTitle" content="Engineer">
        </div>
    </body></html>"#;

    let content = extract::extract(html, &base());
    assert_eq!(content.structured_data.len(), 1);
    let item = &content.structured_data[0];
    assert_eq!(item.kind, "microdata");
    assert_eq!(item.item_type, "https://schema.org/Person");
    assert_eq!(item.data["name"], "Jane Doe");
    assert_eq!(item.data["jobTitle"], "Engineer");
}

#[test]
fn test_social_meta_maps() {
    let html = r#"<html><head>
        <meta property="og:title" content="Example Page">
        <meta property="og:image" content="https://example.com/og.png">
        <meta name="twitter:card" content="summary">
    </head><body>
        <a href="https://twitter.com/example">Follow us</a>
    </body></html>"#;

    let content = extract::extract(html, &base());
    let social = &content.social;

    assert_eq!(social.open_graph.get("title").map(String::as_str), Some("Example Page"));
    assert_eq!(social.twitter.get("card").map(String::as_str), Some("summary"));
    assert_eq!(social.links.len(), 1);
    assert_eq!(social.links[0].platform, "twitter");
}

#[test]
fn test_meta_and_canonical_extraction() {
    let html = r#"<html><head>
        <title>Page</title>
        <meta name="description" content="Described">
        <meta name="keywords" content="one, two">
        <link rel="canonical" href="/canonical-page">
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    assert_eq!(content.meta_description, "Described");
    assert_eq!(content.meta_keywords, "one, two");
    assert_eq!(content.canonical_url, "https://example.com/canonical-page");
}

#[test]
fn test_og_description_fallback() {
    let html = r#"<html><head>
        <meta property="og:description" content="From OpenGraph">
    </head><body></body></html>"#;

    let content = extract::extract(html, &base());
    assert_eq!(content.meta_description, "From OpenGraph");
}
