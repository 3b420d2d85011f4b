use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use seo_plugins::{ContentSignals, EatScores, KeywordDistribution};

/// Reads the provider's JSON reply. Scores are clamped to 0..=100, absent
/// fields keep their fallback values. `None` when no JSON object is found.
pub fn parse_analysis(text: &str, word_count: usize) -> Option<ContentSignals> {
    let json: Value = serde_json::from_str(extract_json(text)?).ok()?;
    if !json.is_object() {
        return None;
    }

    let defaults = ContentSignals::fallback(word_count);
    let eat = &json["eatScore"];
    let eat_overall_default = defaults.eat.overall;
    let expertise = score(&eat["expertise"]).unwrap_or(eat_overall_default);
    let authoritativeness = score(&eat["authoritativeness"]).unwrap_or(eat_overall_default);
    let trustworthiness = score(&eat["trustworthiness"]).unwrap_or(eat_overall_default);
    let overall = score(&eat["overall"]).unwrap_or_else(|| {
        ((u32::from(expertise) + u32::from(authoritativeness) + u32::from(trustworthiness)) / 3)
            as u8
    });

    Some(ContentSignals {
        quality_score: score(&json["qualityScore"]).unwrap_or(defaults.quality_score),
        readability_score: score(&json["readabilityScore"]).unwrap_or(defaults.readability_score),
        structure_score: score(&json["structureScore"]).unwrap_or(defaults.structure_score),
        uniqueness_score: score(&json["uniquenessScore"]).unwrap_or(defaults.uniqueness_score),
        intent_alignment_score: score(&json["userIntentAlignment"])
            .unwrap_or(defaults.intent_alignment_score),
        keyword_density: number(&json["keywordDensity"])
            .map(|d| d.clamp(0.0, 100.0))
            .unwrap_or(defaults.keyword_density),
        keyword_distribution: json["keywordDistribution"]
            .as_str()
            .map(KeywordDistribution::from_label)
            .unwrap_or(defaults.keyword_distribution),
        missing_keywords: strings(&json["missingKeywords"]),
        lsi_keywords: strings(&json["lsiKeywords"]),
        semantic_keywords: strings(&json["semanticKeywords"]),
        content_gaps: strings(&json["contentGaps"]),
        eat: EatScores {
            expertise,
            authoritativeness,
            trustworthiness,
            overall,
        },
        word_count,
        duplicate_risk: score(&json["duplicateContentRisk"]).unwrap_or(defaults.duplicate_risk),
    })
}

static LABELS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("quality", r"(?i)\bquality(?:[ _]?score)?\b\W{0,5}(\d{1,3})"),
        ("readability", r"(?i)\breadability(?:[ _]?score)?\b\W{0,5}(\d{1,3})"),
        ("eat", r"(?i)\b(?:e-?a-?t|overall)(?:[ _]?score)?\b\W{0,5}(\d{1,3})"),
        ("structure", r"(?i)\bstructure(?:[ _]?score)?\b\W{0,5}(\d{1,3})"),
        ("uniqueness", r"(?i)\buniqueness(?:[ _]?score)?\b\W{0,5}(\d{1,3})"),
        ("intent", r"(?i)\bintent(?:[ _]?alignment)?\b\W{0,5}(\d{1,3})"),
    ]
    .into_iter()
    .filter_map(|(label, pattern)| Regex::new(pattern).ok().map(|re| (label, re)))
    .collect()
});

/// Last resort for prose replies such as "Quality: 85". Needs at least the
/// quality score to count as a result.
pub fn extract_labeled_scores(text: &str, word_count: usize) -> Option<ContentSignals> {
    let find = |wanted: &str| -> Option<u8> {
        LABELS
            .iter()
            .find(|(label, _)| *label == wanted)
            .and_then(|(_, re)| re.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(|n| n.min(100) as u8)
    };

    let mut signals = ContentSignals::fallback(word_count);
    signals.quality_score = find("quality")?;
    if let Some(readability) = find("readability") {
        signals.readability_score = readability;
    }
    if let Some(eat) = find("eat") {
        signals.eat = EatScores::uniform(eat);
    }
    if let Some(structure) = find("structure") {
        signals.structure_score = structure;
    }
    if let Some(uniqueness) = find("uniqueness") {
        signals.uniqueness_score = uniqueness;
    }
    if let Some(intent) = find("intent") {
        signals.intent_alignment_score = intent;
    }
    Some(signals)
}

/// The outermost `{...}` in the reply, which also drops markdown fences.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn score(value: &Value) -> Option<u8> {
    number(value).map(|n| n.round().clamp(0.0, 100.0) as u8)
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"```json
        {
            "qualityScore": 82,
            "readabilityScore": 74.6,
            "keywordDensity": "2.5%",
            "keywordDistribution": "Good",
            "missingKeywords": ["rust audit"],
            "lsiKeywords": ["crawler"],
            "eatScore": {"expertise": 80, "authoritativeness": 70, "trustworthiness": 90, "overall": 80},
            "contentGaps": ["pricing", " "],
            "semanticKeywords": ["technical seo"],
            "structureScore": 77,
            "uniquenessScore": 65,
            "userIntentAlignment": 88,
            "duplicateContentRisk": 12
        }
        ```"#;
        let signals = parse_analysis(reply, 640).unwrap();
        assert_eq!(signals.quality_score, 82);
        assert_eq!(signals.readability_score, 75);
        assert_eq!(signals.keyword_density, 2.5);
        assert_eq!(signals.keyword_distribution, KeywordDistribution::Good);
        assert_eq!(signals.missing_keywords, vec!["rust audit"]);
        assert_eq!(signals.lsi_keywords, vec!["crawler"]);
        assert_eq!(signals.content_gaps, vec!["pricing"]);
        assert_eq!(signals.eat.trustworthiness, 90);
        assert_eq!(signals.intent_alignment_score, 88);
        assert_eq!(signals.duplicate_risk, 12);
        assert_eq!(signals.word_count, 640);
    }

    #[test]
    fn test_parse_clamps_and_defaults() {
        let reply = r#"{"qualityScore": 140, "readabilityScore": -5, "eatScore": {"expertise": 60, "authoritativeness": 60, "trustworthiness": 90}}"#;
        let signals = parse_analysis(reply, 100).unwrap();
        assert_eq!(signals.quality_score, 100);
        assert_eq!(signals.readability_score, 0);
        assert_eq!(signals.eat.overall, 70);
        assert_eq!(signals.structure_score, ContentSignals::DEFAULT_SCORE);
        assert_eq!(signals.keyword_density, 0.0);
        assert!(signals.content_gaps.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_analysis("I could not analyze this page.", 10).is_none());
        assert!(parse_analysis("{not json}", 10).is_none());
    }

    #[test]
    fn test_extract_labeled_scores() {
        let reply = "Overall the page is decent.\nQuality: 85\nReadability score - 62\nE-A-T: 55";
        let signals = extract_labeled_scores(reply, 300).unwrap();
        assert_eq!(signals.quality_score, 85);
        assert_eq!(signals.readability_score, 62);
        assert_eq!(signals.eat.overall, 55);
        assert_eq!(signals.uniqueness_score, ContentSignals::DEFAULT_SCORE);
    }

    #[test]
    fn test_labels_need_word_boundaries() {
        let reply = "Quality: 80. Create 3 sections, the intro is great: 9 out of 10.";
        let signals = extract_labeled_scores(reply, 300).unwrap();
        assert_eq!(signals.quality_score, 80);
        assert_eq!(signals.eat, EatScores::uniform(ContentSignals::DEFAULT_SCORE));
    }

    #[test]
    fn test_extract_labeled_scores_needs_quality() {
        assert!(extract_labeled_scores("Readability: 40", 300).is_none());
    }
}
