//! Live design-pattern inventory and aesthetic scoring.

use crate::config::AestheticWeights;
use crate::pagequery::{self, RawVisualScan};
use crate::results::{LayoutCounts, VisualPatterns};
use crate::session::driver::PageDriver;

/// Run the CSSOM/computed-style scan and derive the pattern inventory.
///
/// The whole analysis degrades to defaults when the scan fails; individual
/// rule or element failures were already excluded inside the page query.
pub async fn analyze(driver: &dyn PageDriver, weights: &AestheticWeights) -> VisualPatterns {
    match pagequery::query_visual_scan(driver).await {
        Ok(raw) => build_patterns(raw, weights),
        Err(e) => {
            ::log::warn!("Visual pattern scan unavailable: {}", e);
            VisualPatterns::default()
        }
    }
}

/// Shape the raw scan into the pattern inventory and score it
fn build_patterns(raw: RawVisualScan, weights: &AestheticWeights) -> VisualPatterns {
    let score = aesthetic_score(&raw, weights);

    VisualPatterns {
        layout_counts: LayoutCounts {
            grid: raw.grid_count,
            flex: raw.flex_count,
            cards: raw.card_count,
            hero: raw.hero_count,
        },
        aesthetic_score: score,
        style_label: style_label(score).to_string(),
        animations: raw.animations,
        gradients: raw.gradients,
        shadows: raw.shadows,
        border_radii: raw.border_radii,
        ui_components: raw.ui_components,
        visual_hierarchy: raw.visual_hierarchy,
        design_tokens: raw.design_tokens,
    }
}

/// Weighted signal aggregation over the scan.
///
/// Heavy flex/grid adoption earns the full layout weight, any adoption at
/// all earns half of it.
pub(crate) fn aesthetic_score(raw: &RawVisualScan, weights: &AestheticWeights) -> u32 {
    let mut score = 0;

    if !raw.gradients.is_empty() {
        score += weights.gradients;
    }

    let modern_layouts = raw.grid_count + raw.flex_count;
    if modern_layouts >= 3 {
        score += weights.layout;
    } else if modern_layouts > 0 {
        score += weights.layout / 2;
    }

    if raw.card_count > 0 {
        score += weights.cards;
    }
    if raw.transition_count > 0 {
        score += weights.transitions;
    }
    if raw.keyframe_count > 0 {
        score += weights.animations;
    }
    if raw.custom_font_count > 0 {
        score += weights.custom_fonts;
    }
    if raw.has_viewport_meta {
        score += weights.responsive;
    }

    score.min(100)
}

/// Map a score onto its style band
pub(crate) fn style_label(score: u32) -> &'static str {
    if score >= 70 {
        "cutting-edge"
    } else if score >= 50 {
        "modern"
    } else if score >= 30 {
        "contemporary"
    } else {
        "traditional"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scan() -> RawVisualScan {
        RawVisualScan {
            gradients: vec!["linear-gradient(90deg, #fff, #000)".to_string()],
            grid_count: 2,
            flex_count: 4,
            card_count: 3,
            transition_count: 5,
            keyframe_count: 1,
            custom_font_count: 2,
            has_viewport_meta: true,
            ..RawVisualScan::default()
        }
    }

    #[test]
    fn test_full_rubric_caps_at_100() {
        let weights = AestheticWeights::default();
        let score = aesthetic_score(&full_scan(), &weights);
        assert_eq!(score, 100);
        assert_eq!(style_label(score), "cutting-edge");
    }

    #[test]
    fn test_empty_scan_scores_zero() {
        let weights = AestheticWeights::default();
        let score = aesthetic_score(&RawVisualScan::default(), &weights);
        assert_eq!(score, 0);
        assert_eq!(style_label(score), "traditional");
    }

    #[test]
    fn test_partial_layout_adoption_earns_half_weight() {
        let weights = AestheticWeights::default();
        let raw = RawVisualScan {
            flex_count: 1,
            ..RawVisualScan::default()
        };
        assert_eq!(aesthetic_score(&raw, &weights), weights.layout / 2);
    }

    #[test]
    fn test_label_bands() {
        assert_eq!(style_label(70), "cutting-edge");
        assert_eq!(style_label(69), "modern");
        assert_eq!(style_label(50), "modern");
        assert_eq!(style_label(49), "contemporary");
        assert_eq!(style_label(30), "contemporary");
        assert_eq!(style_label(29), "traditional");
    }

    #[test]
    fn test_weights_are_tunable() {
        let weights = AestheticWeights {
            gradients: 0,
            layout: 0,
            cards: 0,
            transitions: 0,
            animations: 0,
            custom_fonts: 0,
            responsive: 40,
        };
        let score = aesthetic_score(&full_scan(), &weights);
        assert_eq!(score, 40);
    }
}
