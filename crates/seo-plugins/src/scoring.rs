use html_parser::TechnicalSignals;
use serde::{Deserialize, Serialize};

use crate::utils::issue::Issue;
use crate::utils::signals::ContentSignals;

const CONTENT_WEIGHT: f64 = 0.35;
const TECHNICAL_WEIGHT: f64 = 0.45;
const SPEED_WEIGHT: f64 = 0.20;

/// Every component that went into the final score.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub content_score: f64,
    pub technical_score: f64,
    pub speed_score: u8,
    pub final_score: u8,
}

pub fn base_score(issues: &[Issue]) -> f64 {
    100.0 - issues.iter().map(|i| i.severity.penalty()).sum::<f64>()
}

pub fn content_score(content: &ContentSignals) -> f64 {
    0.30 * f64::from(content.quality_score)
        + 0.25 * f64::from(content.eat.overall)
        + 0.15 * f64::from(content.readability_score)
        + 0.15 * f64::from(content.intent_alignment_score)
        + 0.15 * f64::from(content.uniqueness_score)
}

/// Bonus points for technical signals in their optimal range.
pub fn technical_bonus(technical: &TechnicalSignals) -> f64 {
    let meta = &technical.meta;
    let bonuses = [
        ((30..=60).contains(&meta.title_length), 5.0),
        ((120..=160).contains(&meta.description_length), 5.0),
        (technical.headings.h1_count() == 1, 3.0),
        (technical.mobile.responsive && technical.mobile.has_viewport, 5.0),
        (technical.schema.has_structured_data, 5.0),
        (meta.has_open_graph() || meta.has_twitter_card(), 3.0),
        (technical.images.missing_alt == 0, 3.0),
    ];
    bonuses
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, points)| points)
        .sum()
}

/// Pure function of its inputs; the final score is always within 0..=100.
pub fn calculate_score(
    issues: &[Issue],
    technical: &TechnicalSignals,
    content: &ContentSignals,
    speed_score: u8,
) -> ScoreBreakdown {
    let base_score = base_score(issues);
    let content_score = content_score(content);
    let technical_score = base_score + technical_bonus(technical);
    let weighted = CONTENT_WEIGHT * content_score
        + TECHNICAL_WEIGHT * technical_score
        + SPEED_WEIGHT * f64::from(speed_score);

    ScoreBreakdown {
        base_score,
        content_score,
        technical_score,
        speed_score,
        final_score: weighted.round().clamp(0.0, 100.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::{RuleCategory, Severity};
    use crate::utils::test_support::healthy_technical;

    fn critical(n: usize) -> Vec<Issue> {
        (0..n)
            .map(|i| {
                Issue::new(
                    format!("test.{}", i),
                    "Missing Page Title",
                    Severity::Critical,
                    RuleCategory::Meta,
                    "",
                )
            })
            .collect()
    }

    #[test]
    fn test_perfect_page_is_clamped() {
        let mut content = ContentSignals::fallback(1000);
        content.quality_score = 100;
        content.readability_score = 100;
        content.intent_alignment_score = 100;
        content.uniqueness_score = 100;
        content.eat.overall = 100;
        let score = calculate_score(&[], &healthy_technical(), &content, 100);

        assert_eq!(score.base_score, 100.0);
        assert_eq!(score.technical_score, 129.0);
        assert_eq!(score.final_score, 100);
    }

    #[test]
    fn test_many_issues_floor_at_zero() {
        let score = calculate_score(
            &critical(40),
            &TechnicalSignals::default(),
            &ContentSignals::fallback(0),
            0,
        );
        assert!(score.base_score < 0.0);
        assert_eq!(score.final_score, 0);
    }

    #[test]
    fn test_weighted_components() {
        let technical = TechnicalSignals::default();
        let content = ContentSignals::fallback(500);
        let score = calculate_score(&critical(1), &technical, &content, 50);

        assert_eq!(score.base_score, 88.0);
        assert!((score.content_score - 70.0).abs() < 1e-9);
        // Only the zero missing-alt bonus applies to an empty page.
        assert_eq!(score.technical_score, 91.0);
        // 0.35*70 + 0.45*91 + 0.2*50 = 75.45
        assert_eq!(score.final_score, 75);
    }

    #[test]
    fn test_scoring_is_pure() {
        let technical = healthy_technical();
        let content = ContentSignals::fallback(800);
        let issues = critical(2);
        assert_eq!(
            calculate_score(&issues, &technical, &content, 63),
            calculate_score(&issues, &technical, &content, 63)
        );
    }
}
