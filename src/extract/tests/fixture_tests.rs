use crate::extract;
use url::Url;

fn base() -> Url {
    Url::parse("https://example.com/").unwrap()
}

/// The reference fixture: a nav with two links, a contact form with three
/// fields, and three images.
const FIXTURE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Fixture Page</title>
  <meta name="description" content="A small fixture page">
  <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
  <nav id="main-nav">
    <ul>
      <li><a href="/">Home</a></li>
      <li><a href="/about">About</a></li>
    </ul>
  </nav>
  <h1>Welcome</h1>
  <h2 id="intro" class="section-title">Introduction</h2>
  <form method="post" action="/contact">
    <input type="text" name="name" required>
    <input type="email" name="email" placeholder="you@example.com">
    <textarea name="message"></textarea>
    <button type="submit">Send</button>
  </form>
  <img src="/a.png" alt="First">
  <img src="/b.png" alt="Second">
  <img src="relative/c.png" alt="">
</body>
</html>"#;

#[test]
fn test_fixture_navigation() {
    let content = extract::extract(FIXTURE, &base());

    assert_eq!(content.navigation.nav_blocks.len(), 1);
    let nav = &content.navigation.nav_blocks[0];
    assert_eq!(nav.id, "main-nav");
    assert_eq!(nav.links.len(), 2);
    assert_eq!(nav.links[0].text, "Home");
    assert_eq!(nav.links[1].text, "About");
    assert_eq!(nav.links[1].href, "https://example.com/about");
}

#[test]
fn test_fixture_form() {
    let content = extract::extract(FIXTURE, &base());

    assert_eq!(content.forms.len(), 1);
    let form = &content.forms[0];
    assert_eq!(form.method, "post");
    assert_eq!(form.action, "https://example.com/contact");
    assert_eq!(form.fields.len(), 3);
    assert_eq!(form.fields[0].tag, "input");
    assert_eq!(form.fields[0].type_, "text");
    assert!(form.fields[0].required);
    assert_eq!(form.fields[1].type_, "email");
    assert_eq!(form.fields[2].tag, "textarea");
    assert_eq!(form.buttons.len(), 1);
    assert_eq!(form.buttons[0].text, "Send");
}

#[test]
fn test_fixture_images() {
    let content = extract::extract(FIXTURE, &base());

    assert_eq!(content.images.len(), 3);
    assert_eq!(content.images[0].src, "https://example.com/a.png");
    assert_eq!(content.images[2].src, "https://example.com/relative/c.png");
    assert!(!content.images[0].is_decorative);
    assert!(content.images[2].is_decorative);
}

#[test]
fn test_fixture_headings_in_document_order() {
    let content = extract::extract(FIXTURE, &base());

    let headings = &content.structure.headings;
    assert_eq!(headings.len(), 2);
    assert_eq!(headings[0].level, 1);
    assert_eq!(headings[0].text, "Welcome");
    assert_eq!(headings[0].ordinal, 0);
    assert_eq!(headings[1].level, 2);
    assert_eq!(headings[1].id.as_deref(), Some("intro"));
    assert_eq!(headings[1].classes, vec!["section-title"]);
    assert_eq!(headings[1].ordinal, 1);
}

#[test]
fn test_title_fallback_when_absent() {
    let content = extract::extract("<html><body><p>No title here</p></body></html>", &base());
    assert_eq!(content.title, "Untitled");
}

#[test]
fn test_language_defaults_to_english() {
    let content = extract::extract("<html><body></body></html>", &base());
    assert_eq!(content.language, "en");

    let tagged = extract::extract("<html lang=\"de\"><body></body></html>", &base());
    assert_eq!(tagged.language, "de");
}

#[test]
fn test_text_content_excludes_scripts_and_styles() {
    let html = "<html><body><p>Visible</p><script>var hidden = 1;</script>\
                <style>.x { color: red; }</style><noscript>fallback</noscript></body></html>";
    let content = extract::extract(html, &base());
    assert_eq!(content.text_content, "Visible");
    assert_eq!(content.word_count, 1);
}

#[test]
fn test_extraction_is_deterministic() {
    let first = serde_json::to_string(&extract::extract(FIXTURE, &base())).unwrap();
    let second = serde_json::to_string(&extract::extract(FIXTURE, &base())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_default_favicon_when_undeclared() {
    let content = extract::extract("<html><body></body></html>", &base());
    let icon = content.favicons.icons.get("icon").unwrap();
    assert_eq!(icon.href, "https://example.com/favicon.ico");
}

#[test]
fn test_content_blocks_filtered_before_cap() {
    // 25 keyword-less containers followed by 3 content containers: the
    // keyword filter must run before the cap, so all 3 survive.
    let mut body = String::new();
    for i in 0..25 {
        body.push_str(&format!("<div class=\"widget-{i}\">x</div>"));
    }
    for i in 0..3 {
        body.push_str(&format!("<div class=\"content-{i}\">real</div>"));
    }
    let html = format!("<html><body>{body}</body></html>");

    let content = extract::extract(&html, &base());
    assert_eq!(content.structure.content_blocks.len(), 3);
}
