use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Structural facts extracted from a single page. Produced once per audit
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSignals {
    pub url: String,
    pub meta: MetaSignals,
    pub headings: HeadingSignals,
    pub images: ImageSignals,
    pub links: LinkSignals,
    pub mobile: MobileSignals,
    pub schema: SchemaSignals,
    pub site: SiteSignals,
    pub page_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaSignals {
    pub title: Option<String>,
    pub title_length: usize,
    pub description: Option<String>,
    pub description_length: usize,
    pub keywords: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub charset: Option<String>,
    pub og_tags: HashMap<String, String>,
    pub twitter_tags: HashMap<String, String>,
}

impl MetaSignals {
    pub fn has_title(&self) -> bool {
        self.title_length > 0
    }

    pub fn has_description(&self) -> bool {
        self.description_length > 0
    }

    pub fn has_open_graph(&self) -> bool {
        !self.og_tags.is_empty()
    }

    pub fn has_twitter_card(&self) -> bool {
        !self.twitter_tags.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingSignals {
    /// Counts for h1 through h6, index 0 is h1.
    pub counts: [usize; 6],
    pub hierarchy_ok: bool,
    pub h1_texts: Vec<String>,
}

impl Default for HeadingSignals {
    fn default() -> Self {
        Self {
            counts: [0; 6],
            hierarchy_ok: true,
            h1_texts: Vec::new(),
        }
    }
}

impl HeadingSignals {
    pub fn h1_count(&self) -> usize {
        self.counts[0]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSignals {
    pub total: usize,
    pub missing_alt: usize,
    pub missing_title: usize,
    pub missing_dimensions: usize,
    pub missing_lazy_loading: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkSignals {
    pub internal: usize,
    pub external: usize,
    pub broken: usize,
    pub unsafe_external: usize,
    pub inbound: usize,
    pub broken_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MobileSignals {
    pub viewport: Option<String>,
    pub has_viewport: bool,
    pub has_media_queries: bool,
    pub uses_flex_or_grid: bool,
    pub uses_layout_framework: bool,
    pub responsive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSignals {
    pub has_structured_data: bool,
    pub types: Vec<String>,
    pub has_faq_schema: bool,
    pub has_breadcrumb_schema: bool,
    pub has_article_schema: bool,
    pub has_product_schema: bool,
    pub has_breadcrumb_nav: bool,
    pub has_faq_content: bool,
}

impl SchemaSignals {
    pub fn has_breadcrumbs(&self) -> bool {
        self.has_breadcrumb_schema || self.has_breadcrumb_nav
    }
}

/// Results of the best-effort site-wide checks. A failed check reads as absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSignals {
    pub has_sitemap: bool,
    pub sitemap_urls: usize,
    pub has_robots_txt: bool,
}
