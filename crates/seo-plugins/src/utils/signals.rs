use html_parser::TechnicalSignals;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordDistribution {
    Good,
    #[default]
    Moderate,
    Poor,
}

impl KeywordDistribution {
    /// Lenient mapping of whatever label the content-analysis capability returns.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if ["poor", "bad", "stuffed", "uneven", "none", "sparse"]
            .iter()
            .any(|l| label.contains(l))
        {
            KeywordDistribution::Poor
        } else if ["good", "excellent", "natural", "even", "balanced"]
            .iter()
            .any(|l| label.contains(l))
        {
            KeywordDistribution::Good
        } else {
            KeywordDistribution::Moderate
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EatScores {
    pub expertise: u8,
    pub authoritativeness: u8,
    pub trustworthiness: u8,
    pub overall: u8,
}

impl EatScores {
    pub fn uniform(score: u8) -> Self {
        Self {
            expertise: score,
            authoritativeness: score,
            trustworthiness: score,
            overall: score,
        }
    }
}

/// Content quality facts returned by the content-analysis capability.
/// `lsi_keywords` and `duplicate_risk` are passed through as supplied.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentSignals {
    pub quality_score: u8,
    pub readability_score: u8,
    pub structure_score: u8,
    pub uniqueness_score: u8,
    pub intent_alignment_score: u8,
    pub keyword_density: f64,
    pub keyword_distribution: KeywordDistribution,
    pub missing_keywords: Vec<String>,
    pub lsi_keywords: Vec<String>,
    pub semantic_keywords: Vec<String>,
    pub content_gaps: Vec<String>,
    pub eat: EatScores,
    pub word_count: usize,
    pub duplicate_risk: u8,
}

impl ContentSignals {
    pub const DEFAULT_SCORE: u8 = 70;

    /// Substituted whenever no analysis is available. The word count is
    /// measured locally, so it is still reported.
    pub fn fallback(word_count: usize) -> Self {
        Self {
            quality_score: Self::DEFAULT_SCORE,
            readability_score: Self::DEFAULT_SCORE,
            structure_score: Self::DEFAULT_SCORE,
            uniqueness_score: Self::DEFAULT_SCORE,
            intent_alignment_score: Self::DEFAULT_SCORE,
            keyword_density: 0.0,
            keyword_distribution: KeywordDistribution::Moderate,
            missing_keywords: Vec::new(),
            lsi_keywords: Vec::new(),
            semantic_keywords: Vec::new(),
            content_gaps: Vec::new(),
            eat: EatScores::uniform(Self::DEFAULT_SCORE),
            word_count,
            duplicate_risk: 0,
        }
    }

    /// True when every analysed field matches the fallback values.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback(self.word_count)
    }
}

impl Default for ContentSignals {
    fn default() -> Self {
        Self::fallback(0)
    }
}

/// Everything the rules look at for one page.
#[derive(Debug, Clone, Copy)]
pub struct AuditSignals<'a> {
    pub technical: &'a TechnicalSignals,
    pub content: &'a ContentSignals,
}

impl<'a> AuditSignals<'a> {
    pub fn new(technical: &'a TechnicalSignals, content: &'a ContentSignals) -> Self {
        Self { technical, content }
    }
}
