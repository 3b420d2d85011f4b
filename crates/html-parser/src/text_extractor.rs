use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// A content container is only preferred over `<body>` when it holds more text than this.
pub const MIN_CONTAINER_CHARS: usize = 200;

const CONTENT_CONTAINERS: [&str; 8] = [
    "main",
    "article",
    "[role=\"main\"]",
    ".content",
    "#content",
    ".post-content",
    ".entry-content",
    ".main-content",
];

const EXCLUDED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
    "template",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    pub text: String,
    pub word_count: usize,
}

impl PageText {
    fn from_fragments(fragments: Vec<String>) -> Self {
        let text = fragments.join(" ");
        let word_count = text.split_whitespace().count();
        Self { text, word_count }
    }

    /// The first `max_chars` characters, cut on a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((index, _)) => &self.text[..index],
            None => &self.text,
        }
    }
}

fn collect_text(element: ElementRef, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !trimmed.is_empty() {
                out.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !EXCLUDED_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

fn text_of(element: ElementRef) -> Vec<String> {
    let mut fragments = Vec::new();
    collect_text(element, &mut fragments);
    fragments
}

/// Visible text of the page's main content, skipping scripts and page chrome.
pub fn extract_visible_text(html: &str) -> PageText {
    let document = Html::parse_document(html);

    for css in CONTENT_CONTAINERS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for container in document.select(&selector) {
            let fragments = text_of(container);
            let length: usize = fragments.iter().map(|f| f.chars().count()).sum();
            if length > MIN_CONTAINER_CHARS {
                return PageText::from_fragments(fragments);
            }
        }
    }

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    match body {
        Some(body) => PageText::from_fragments(text_of(body)),
        None => PageText::from_fragments(text_of(document.root_element())),
    }
}
