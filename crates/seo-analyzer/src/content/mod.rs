mod parser;
mod prompt;

use std::sync::Arc;

use html_parser::signals::MetaSignals;
use html_parser::extract_visible_text;
use serde::{Deserialize, Serialize};
use seo_plugins::ContentSignals;
use thiserror::Error;
use tracing::{debug, warn};

use crate::providers::{ContentProvider, ProviderError};

pub use parser::{extract_labeled_scores, parse_analysis};
pub use prompt::{build_prompt, PromptInput};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Content provider failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Could not read scores from the provider reply")]
    Unparseable,
}

/// Where the content signals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisSource {
    Provider,
    LabelExtraction,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentAnalysis {
    pub signals: ContentSignals,
    pub tokens_used: Option<u32>,
    pub source: AnalysisSource,
}

impl ContentAnalysis {
    fn fallback(word_count: usize, tokens_used: Option<u32>) -> Self {
        Self {
            signals: ContentSignals::fallback(word_count),
            tokens_used,
            source: AnalysisSource::Fallback,
        }
    }
}

#[derive(Clone)]
pub struct ContentAnalyzer {
    provider: Option<Arc<dyn ContentProvider>>,
    max_excerpt_chars: usize,
}

impl ContentAnalyzer {
    pub fn new(provider: Option<Arc<dyn ContentProvider>>, max_excerpt_chars: usize) -> Self {
        Self {
            provider,
            max_excerpt_chars,
        }
    }

    /// Never fails: any provider or parse problem yields the fallback signals.
    pub async fn analyze(
        &self,
        html: &str,
        meta: &MetaSignals,
        target_keywords: &[String],
    ) -> ContentAnalysis {
        let text = extract_visible_text(html);
        let Some(provider) = &self.provider else {
            debug!("no content provider configured, using fallback signals");
            return ContentAnalysis::fallback(text.word_count, None);
        };

        let prompt = build_prompt(&PromptInput {
            title: meta.title.as_deref(),
            description: meta.description.as_deref(),
            target_keywords,
            excerpt: text.excerpt(self.max_excerpt_chars),
            word_count: text.word_count,
        });

        match provider.analyze(&prompt).await {
            Ok(response) => match interpret(&response.text, text.word_count) {
                Ok((signals, source)) => ContentAnalysis {
                    signals,
                    tokens_used: response.tokens_used,
                    source,
                },
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "falling back to default content signals");
                    ContentAnalysis::fallback(text.word_count, response.tokens_used)
                }
            },
            Err(e) => {
                let e = AnalysisError::from(e);
                warn!(provider = provider.name(), error = %e, "falling back to default content signals");
                ContentAnalysis::fallback(text.word_count, None)
            }
        }
    }
}

fn interpret(reply: &str, word_count: usize) -> Result<(ContentSignals, AnalysisSource), AnalysisError> {
    if let Some(signals) = parse_analysis(reply, word_count) {
        return Ok((signals, AnalysisSource::Provider));
    }
    extract_labeled_scores(reply, word_count)
        .map(|signals| (signals, AnalysisSource::LabelExtraction))
        .ok_or(AnalysisError::Unparseable)
}

#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::providers::{ContentProvider, ProviderError, ProviderResponse};

    /// Replies with a canned result and records every prompt.
    pub struct FakeProvider {
        reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn analyze(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
            self.prompts.lock().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(ProviderResponse {
                    text: text.clone(),
                    tokens_used: Some(250),
                }),
                Err(message) => Err(ProviderError::Network(message.clone())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeProvider;
    use super::*;

    const PAGE: &str = r#"<html><head><title>Guide</title></head><body>
        <nav>Home About</nav>
        <main><p>Rust makes fast and reliable software. This guide walks through auditing a page
        for search quality, covering titles, descriptions, headings, images and links in detail.
        Each section explains what to check and how to fix it, with examples taken from real
        production sites and notes on the trade-offs involved.</p></main>
        <footer>Copyright</footer>
    </body></html>"#;

    fn meta() -> MetaSignals {
        MetaSignals {
            title: Some("Guide".to_string()),
            title_length: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_without_provider() {
        let analyzer = ContentAnalyzer::new(None, 8000);
        let analysis = analyzer.analyze(PAGE, &meta(), &[]).await;
        assert_eq!(analysis.source, AnalysisSource::Fallback);
        assert!(analysis.signals.is_fallback());
        assert_eq!(analysis.tokens_used, None);
        assert!(analysis.signals.word_count > 20);
    }

    #[tokio::test]
    async fn test_provider_reply_is_parsed() {
        let provider = Arc::new(FakeProvider::replying(
            r#"{"qualityScore": 91, "keywordDensity": 6.2}"#,
        ));
        let analyzer = ContentAnalyzer::new(Some(provider.clone()), 8000);
        let keywords = vec!["rust".to_string()];
        let analysis = analyzer.analyze(PAGE, &meta(), &keywords).await;

        assert_eq!(analysis.source, AnalysisSource::Provider);
        assert_eq!(analysis.signals.quality_score, 91);
        assert_eq!(analysis.signals.keyword_density, 6.2);
        assert_eq!(analysis.tokens_used, Some(250));

        let prompts = provider.prompts.lock();
        assert!(prompts[0].contains("Target keywords: rust"));
        assert!(prompts[0].contains("Rust makes fast"));
        assert!(!prompts[0].contains("Copyright"));
    }

    #[tokio::test]
    async fn test_excerpt_is_capped() {
        let provider = Arc::new(FakeProvider::replying("{}"));
        let analyzer = ContentAnalyzer::new(Some(provider.clone()), 10);
        analyzer.analyze(PAGE, &meta(), &[]).await;
        let prompts = provider.prompts.lock();
        assert!(prompts[0].contains("\"\"\"\nRust makes\n\"\"\""));
    }

    #[tokio::test]
    async fn test_label_extraction() {
        let provider = Arc::new(FakeProvider::replying("Quality: 45, readability: 50"));
        let analyzer = ContentAnalyzer::new(Some(provider), 8000);
        let analysis = analyzer.analyze(PAGE, &meta(), &[]).await;
        assert_eq!(analysis.source, AnalysisSource::LabelExtraction);
        assert_eq!(analysis.signals.quality_score, 45);
        assert_eq!(analysis.signals.readability_score, 50);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let analyzer = ContentAnalyzer::new(Some(Arc::new(FakeProvider::failing("down"))), 8000);
        let analysis = analyzer.analyze(PAGE, &meta(), &[]).await;
        assert_eq!(analysis.source, AnalysisSource::Fallback);
        assert!(analysis.signals.is_fallback());
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_token_count() {
        let analyzer =
            ContentAnalyzer::new(Some(Arc::new(FakeProvider::replying("no idea"))), 8000);
        let analysis = analyzer.analyze(PAGE, &meta(), &[]).await;
        assert_eq!(analysis.source, AnalysisSource::Fallback);
        assert_eq!(analysis.tokens_used, Some(250));
    }
}
