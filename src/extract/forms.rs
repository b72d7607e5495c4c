use super::{element_classes, element_text};
use crate::results::{
    BreadcrumbItem, FormButton, FormField, FormInfo, MAX_FORM_FIELDS, NavBlock, NavLink,
    NavigationInfo, SelectOption,
};
use crate::utils::absolutize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Selectors that may hold a breadcrumb trail; they overlap, so matched
/// elements are deduplicated by node identity
const BREADCRUMB_SELECTORS: [&str; 4] = [
    "[class*=\"breadcrumb\"]",
    "[id*=\"breadcrumb\"]",
    "nav ol",
    ".breadcrumbs",
];

/// Extract forms with their fields and buttons
pub fn extract_forms(doc: &Html, base: &Url) -> Vec<FormInfo> {
    let form_selector = Selector::parse("form").unwrap();
    let field_selector = Selector::parse("input, textarea, select").unwrap();
    let option_selector = Selector::parse("option").unwrap();
    let button_selector =
        Selector::parse("button, input[type=\"submit\"], input[type=\"button\"]").unwrap();

    doc.select(&form_selector)
        .map(|form| {
            let fields = form
                .select(&field_selector)
                .take(MAX_FORM_FIELDS)
                .map(|field| {
                    let attr = |name: &str| field.value().attr(name).unwrap_or("").to_string();
                    let options = if field.value().name() == "select" {
                        Some(
                            field
                                .select(&option_selector)
                                .map(|option| SelectOption {
                                    value: option.value().attr("value").unwrap_or("").to_string(),
                                    text: element_text(&option),
                                })
                                .collect(),
                        )
                    } else {
                        None
                    };

                    FormField {
                        tag: field.value().name().to_string(),
                        type_: attr("type"),
                        name: attr("name"),
                        id: attr("id"),
                        placeholder: attr("placeholder"),
                        required: field.value().attr("required").is_some(),
                        value: attr("value"),
                        options,
                    }
                })
                .collect();

            let buttons = form
                .select(&button_selector)
                .map(|button| {
                    let text = element_text(&button);
                    FormButton {
                        tag: button.value().name().to_string(),
                        type_: button.value().attr("type").unwrap_or("").to_string(),
                        text: if text.is_empty() {
                            button.value().attr("value").unwrap_or("").to_string()
                        } else {
                            text
                        },
                    }
                })
                .collect();

            FormInfo {
                action: absolutize(base, form.value().attr("action").unwrap_or("")),
                method: form
                    .value()
                    .attr("method")
                    .unwrap_or("get")
                    .to_ascii_lowercase(),
                enctype: form.value().attr("enctype").unwrap_or("").to_string(),
                id: form.value().attr("id").unwrap_or("").to_string(),
                fields,
                buttons,
            }
        })
        .collect()
}

/// Extract navigation blocks and breadcrumb trails
pub fn extract_navigation(doc: &Html, base: &Url) -> NavigationInfo {
    let nav_selector = Selector::parse("nav").unwrap();
    let link_selector = Selector::parse("a").unwrap();
    let submenu_selector = Selector::parse("li > ul, li > ol").unwrap();

    let nav_blocks = doc
        .select(&nav_selector)
        .map(|nav| NavBlock {
            id: nav.value().attr("id").unwrap_or("").to_string(),
            classes: element_classes(&nav).join(" "),
            links: nav
                .select(&link_selector)
                .map(|a| NavLink {
                    href: absolutize(base, a.value().attr("href").unwrap_or("")),
                    text: element_text(&a),
                })
                .collect(),
            submenu_count: nav.select(&submenu_selector).count(),
        })
        .collect();

    NavigationInfo {
        nav_blocks,
        breadcrumbs: breadcrumbs(doc, base),
    }
}

fn breadcrumbs(doc: &Html, base: &Url) -> Vec<Vec<BreadcrumbItem>> {
    let link_selector = Selector::parse("a").unwrap();
    let mut seen = HashSet::new();
    let mut trails = Vec::new();

    for selector in BREADCRUMB_SELECTORS {
        let selector = Selector::parse(selector).unwrap();
        for el in doc.select(&selector) {
            if !seen.insert(el.id()) {
                continue;
            }

            let trail: Vec<BreadcrumbItem> = el
                .select(&link_selector)
                .map(|a| BreadcrumbItem {
                    text: element_text(&a),
                    href: absolutize(base, a.value().attr("href").unwrap_or("")),
                })
                .collect();

            if !trail.is_empty() {
                trails.push(trail);
            }
        }
    }

    trails
}
