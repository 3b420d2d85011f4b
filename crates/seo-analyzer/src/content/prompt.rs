/// Fields the provider is asked to return, in the order of the schema below.
const RESPONSE_SCHEMA: &str = r#"{
  "qualityScore": <0-100>,
  "readabilityScore": <0-100>,
  "keywordDensity": <percentage of words that are target keywords, e.g. 2.4>,
  "keywordDistribution": "good" | "moderate" | "poor",
  "missingKeywords": [<target keywords absent from the content>],
  "lsiKeywords": [<related terms expected alongside the keywords>],
  "eatScore": {
    "expertise": <0-100>,
    "authoritativeness": <0-100>,
    "trustworthiness": <0-100>,
    "overall": <0-100>
  },
  "contentGaps": [<topics a searcher would expect but the page lacks>],
  "semanticKeywords": [<semantically related phrases worth adding>],
  "structureScore": <0-100>,
  "uniquenessScore": <0-100>,
  "userIntentAlignment": <0-100>,
  "duplicateContentRisk": <0-100>
}"#;

pub struct PromptInput<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub target_keywords: &'a [String],
    pub excerpt: &'a str,
    pub word_count: usize,
}

pub fn build_prompt(input: &PromptInput) -> String {
    let keywords = if input.target_keywords.is_empty() {
        "(none provided, infer the primary topic)".to_string()
    } else {
        input.target_keywords.join(", ")
    };

    format!(
        "Analyze the SEO quality of the following web page content.\n\n\
         Title: {title}\n\
         Meta description: {description}\n\
         Target keywords: {keywords}\n\
         Word count: {word_count}\n\n\
         Content:\n\"\"\"\n{excerpt}\n\"\"\"\n\n\
         Score each aspect from 0 to 100 where 100 is best. Respond with JSON only, \
         using exactly this shape:\n{schema}\n",
        title = input.title.unwrap_or("(missing)"),
        description = input.description.unwrap_or("(missing)"),
        keywords = keywords,
        word_count = input.word_count,
        excerpt = input.excerpt,
        schema = RESPONSE_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_inputs() {
        let keywords = vec!["rust".to_string(), "seo audit".to_string()];
        let prompt = build_prompt(&PromptInput {
            title: Some("Rust SEO"),
            description: None,
            target_keywords: &keywords,
            excerpt: "Some body text",
            word_count: 3,
        });
        assert!(prompt.contains("Title: Rust SEO"));
        assert!(prompt.contains("Meta description: (missing)"));
        assert!(prompt.contains("Target keywords: rust, seo audit"));
        assert!(prompt.contains("Some body text"));
        assert!(prompt.contains("\"userIntentAlignment\""));
    }
}
