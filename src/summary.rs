//! Derived snapshot summary.

use crate::results::ScrapedSite;
use serde::{Deserialize, Serialize};

/// Compact summary of a finished snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub url: String,
    pub title: String,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub form_count: usize,
    pub heading_count: usize,
    pub color_count: usize,
    pub font_count: usize,
    pub has_responsive_design: bool,
    pub has_social_media: bool,
    pub has_analytics: bool,
    /// Simple performance score, 0 to 100 (higher is lighter)
    pub performance_score: f64,
    /// Website complexity score, 0 to 100
    pub complexity_score: f64,
}

/// Derive a summary from a snapshot. Pure; the snapshot is not consumed.
pub fn summarize(site: &ScrapedSite) -> SnapshotSummary {
    SnapshotSummary {
        url: site.url.clone(),
        title: site.title.clone(),
        word_count: site.word_count,
        image_count: site.images.len(),
        link_count: site.links.total(),
        form_count: site.forms.len(),
        heading_count: site.structure.headings.len(),
        color_count: site.colors.len(),
        font_count: site.fonts.len(),
        has_responsive_design: site.responsive.is_responsive,
        has_social_media: !site.social.links.is_empty(),
        has_analytics: has_analytics(site),
        performance_score: performance_score(site),
        complexity_score: complexity_score(site),
    }
}

fn has_analytics(site: &ScrapedSite) -> bool {
    !site.analytics.google_analytics.is_empty()
        || !site.analytics.google_tag_manager.is_empty()
        || !site.analytics.facebook_pixel.is_empty()
        || !site.analytics.other.is_empty()
}

/// Deduct points for heavy pages: many images, many external scripts,
/// many external stylesheets
fn performance_score(site: &ScrapedSite) -> f64 {
    let mut score = 100.0;

    let image_count = site.images.len() as f64;
    if image_count > 50.0 {
        score -= ((image_count - 50.0) * 0.5).min(20.0);
    }

    let external_scripts = site.scripts.external.len() as f64;
    if external_scripts > 10.0 {
        score -= ((external_scripts - 10.0) * 1.5).min(15.0);
    }

    let css_count = site.styles.external_css.len() as f64;
    if css_count > 5.0 {
        score -= ((css_count - 5.0) * 2.0).min(10.0);
    }

    score.max(0.0)
}

/// Add points for structural and feature richness
fn complexity_score(site: &ScrapedSite) -> f64 {
    let mut score = 0.0;

    score += (site.structure.headings.len() as f64 * 2.0).min(20.0);
    score += (site.forms.len() as f64 * 5.0).min(15.0);
    score += (site.images.len() as f64 * 0.2).min(10.0);
    score += (site.scripts.external.len() as f64 * 1.5).min(15.0);
    score += (site.styles.external_css.len() as f64 * 2.0).min(10.0);

    if site.responsive.is_responsive {
        score += 10.0;
    }
    if !site.social.links.is_empty() {
        score += 5.0;
    }
    if has_analytics(site) {
        score += 5.0;
    }
    if !site.structured_data.is_empty() {
        score += 10.0;
    }

    score.min(100.0)
}
