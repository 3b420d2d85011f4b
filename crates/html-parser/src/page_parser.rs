use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::signals::{
    HeadingSignals, ImageSignals, LinkSignals, MetaSignals, MobileSignals, SchemaSignals,
    TechnicalSignals,
};

/// Images before this index are assumed to be above the fold and are not
/// expected to lazy load.
pub const LAZY_LOADING_EXEMPT: usize = 3;

const FRAMEWORK_CLASSES: [&str; 5] = ["container", "container-fluid", "row", "columns", "grid-container"];
const FRAMEWORK_PREFIXES: [&str; 6] = ["col-", "sm:", "md:", "lg:", "xl:", "small-"];
const FLEX_GRID_CLASSES: [&str; 6] = ["flex", "grid", "d-flex", "d-grid", "inline-flex", "flexbox"];

fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

pub struct PageParser {
    base_url: Url,
    document: Html,
    byte_size: usize,
}

impl PageParser {
    pub fn new(base_url: Url, html: &str) -> Self {
        Self {
            base_url,
            document: Html::parse_document(html),
            byte_size: html.len(),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn extract_meta_tags(&self) -> MetaSignals {
        let mut meta_tags = MetaSignals::default();

        if let Some(title) = select(&self.document, "title").first() {
            let text = element_text(title);
            if !text.is_empty() {
                meta_tags.title_length = text.chars().count();
                meta_tags.title = Some(text);
            }
        }

        for link in select(&self.document, "link[rel]") {
            let rel = link.value().attr("rel").unwrap_or_default().to_lowercase();
            if rel.split_whitespace().any(|r| r == "canonical") {
                meta_tags.canonical = link.value().attr("href").map(|s| s.trim().to_string());
            }
        }

        for meta in select(&self.document, "meta") {
            let content = meta.value().attr("content").map(|s| s.trim().to_string());
            if let Some(charset) = meta.value().attr("charset") {
                meta_tags.charset = Some(charset.to_string());
            }
            if let Some(name) = meta.value().attr("name") {
                match name.to_lowercase().as_str() {
                    "description" => {
                        if let Some(description) = content.clone().filter(|c| !c.is_empty()) {
                            meta_tags.description_length = description.chars().count();
                            meta_tags.description = Some(description);
                        }
                    }
                    "robots" => meta_tags.robots = content.clone(),
                    "keywords" => meta_tags.keywords = content.clone(),
                    _ => {}
                }
            }

            let key = meta
                .value()
                .attr("property")
                .or_else(|| meta.value().attr("name"))
                .map(|k| k.to_lowercase());
            if let (Some(key), Some(value)) = (key, content) {
                if let Some(og) = key.strip_prefix("og:") {
                    meta_tags.og_tags.insert(og.to_string(), value);
                } else if let Some(twitter) = key.strip_prefix("twitter:") {
                    meta_tags.twitter_tags.insert(twitter.to_string(), value);
                }
            }
        }

        meta_tags
    }

    /// Heading counts plus the hierarchy check: no heading may be more than one
    /// level deeper than the heading before it.
    pub fn extract_headings(&self) -> HeadingSignals {
        let mut signals = HeadingSignals::default();
        let mut previous: Option<usize> = None;

        for heading in select(&self.document, "h1, h2, h3, h4, h5, h6") {
            let level = heading
                .value()
                .name()
                .trim_start_matches('h')
                .parse::<usize>()
                .unwrap_or(1)
                .clamp(1, 6);
            signals.counts[level - 1] += 1;
            if level == 1 {
                signals.h1_texts.push(element_text(&heading));
            }
            if let Some(previous) = previous {
                if level > previous + 1 {
                    signals.hierarchy_ok = false;
                }
            }
            previous = Some(level);
        }

        signals
    }

    pub fn extract_images(&self) -> ImageSignals {
        let mut signals = ImageSignals::default();

        for (index, img) in select(&self.document, "img").iter().enumerate() {
            let attrs = img.value();
            signals.total += 1;
            if attrs.attr("alt").map(|alt| alt.trim().is_empty()).unwrap_or(true) {
                signals.missing_alt += 1;
            }
            if attrs.attr("title").is_none() {
                signals.missing_title += 1;
            }
            if attrs.attr("width").is_none() || attrs.attr("height").is_none() {
                signals.missing_dimensions += 1;
            }
            let lazy = attrs
                .attr("loading")
                .map(|l| l.eq_ignore_ascii_case("lazy"))
                .unwrap_or(false)
                || attrs.attr("data-src").is_some();
            if index >= LAZY_LOADING_EXEMPT && !lazy {
                signals.missing_lazy_loading += 1;
            }
        }

        signals
    }

    pub fn extract_links(&self) -> LinkSignals {
        let mut signals = LinkSignals::default();
        let page_path = self.base_url.path().trim_end_matches('/').to_string();

        for link in select(&self.document, "a[href]") {
            let href = link.value().attr("href").unwrap_or_default().trim();
            let lowered = href.to_lowercase();
            if href.is_empty()
                || href.starts_with('#')
                || lowered.starts_with("javascript:")
                || lowered.starts_with("mailto:")
                || lowered.starts_with("tel:")
            {
                continue;
            }
            let Ok(url) = self.base_url.join(href) else {
                continue;
            };

            if lowered.contains("404") || lowered.contains("error") {
                signals.broken += 1;
                signals.broken_urls.push(url.to_string());
            }

            if url.host_str() == self.base_url.host_str() {
                signals.internal += 1;
                if url.path().trim_end_matches('/') == page_path {
                    signals.inbound += 1;
                }
            } else {
                signals.external += 1;
                let opens_new_tab = link
                    .value()
                    .attr("target")
                    .map(|t| t.eq_ignore_ascii_case("_blank"))
                    .unwrap_or(false);
                let rel = link.value().attr("rel").unwrap_or_default().to_lowercase();
                let safe_rel = rel
                    .split_whitespace()
                    .any(|r| r == "noopener" || r == "noreferrer");
                if opens_new_tab && !safe_rel {
                    signals.unsafe_external += 1;
                }
            }
        }

        // The site root is reachable by definition.
        if page_path.is_empty() {
            signals.inbound += 1;
        }

        signals
    }

    /// Responsive when at least two of: viewport meta, media queries,
    /// flex/grid layout, known layout framework classes.
    pub fn extract_mobile(&self) -> MobileSignals {
        let viewport = select(&self.document, "meta[name]")
            .into_iter()
            .find(|m| {
                m.value()
                    .attr("name")
                    .map(|n| n.eq_ignore_ascii_case("viewport"))
                    .unwrap_or(false)
            })
            .and_then(|m| m.value().attr("content").map(|c| c.to_string()));

        let styles: Vec<String> = select(&self.document, "style")
            .iter()
            .map(|s| s.text().collect::<String>())
            .collect();
        let inline_styles: Vec<String> = select(&self.document, "[style]")
            .iter()
            .filter_map(|e| e.value().attr("style").map(|s| s.to_string()))
            .collect();

        let has_media_queries = styles.iter().any(|s| s.contains("@media"))
            || select(&self.document, "link[media]").iter().any(|l| {
                let media = l.value().attr("media").unwrap_or_default().to_lowercase();
                media.contains("width") || media.contains("orientation")
            });

        let classes: Vec<String> = select(&self.document, "[class]")
            .iter()
            .flat_map(|e| e.value().classes().map(|c| c.to_string()).collect::<Vec<_>>())
            .collect();

        let uses_flex_or_grid = styles
            .iter()
            .chain(inline_styles.iter())
            .map(|s| compact(s))
            .any(|s| s.contains("display:flex") || s.contains("display:grid"))
            || classes.iter().any(|c| FLEX_GRID_CLASSES.contains(&c.as_str()));

        let uses_layout_framework = classes.iter().any(|c| {
            FRAMEWORK_CLASSES.contains(&c.as_str())
                || FRAMEWORK_PREFIXES.iter().any(|p| c.starts_with(p))
        });

        let has_viewport = viewport.is_some();
        let hits = [
            has_viewport,
            has_media_queries,
            uses_flex_or_grid,
            uses_layout_framework,
        ]
        .iter()
        .filter(|hit| **hit)
        .count();

        MobileSignals {
            viewport,
            has_viewport,
            has_media_queries,
            uses_flex_or_grid,
            uses_layout_framework,
            responsive: hits >= 2,
        }
    }

    pub fn extract_schema(&self) -> SchemaSignals {
        let mut signals = SchemaSignals::default();
        let mut payloads = Vec::new();

        for script in select(&self.document, "script[type=\"application/ld+json\"]") {
            let payload = script.text().collect::<String>();
            if payload.trim().is_empty() {
                continue;
            }
            signals.has_structured_data = true;
            if let Ok(value) = serde_json::from_str::<Value>(&payload) {
                collect_schema_types(&value, &mut signals.types);
            }
            payloads.push(payload);
        }

        for item in select(&self.document, "[itemscope]") {
            signals.has_structured_data = true;
            if let Some(item_type) = item.value().attr("itemtype") {
                if let Some(name) = item_type.trim_end_matches('/').rsplit('/').next() {
                    signals.types.push(name.to_string());
                }
            }
        }
        signals.types.sort();
        signals.types.dedup();

        let has_type = |names: &[&str]| {
            signals.types.iter().any(|t| names.contains(&t.as_str()))
                || payloads
                    .iter()
                    .any(|p| names.iter().any(|n| p.contains(&format!("\"{}\"", n))))
        };
        signals.has_faq_schema = has_type(&["FAQPage"]);
        signals.has_breadcrumb_schema = has_type(&["BreadcrumbList"]);
        signals.has_article_schema = has_type(&["Article", "BlogPosting", "NewsArticle"]);
        signals.has_product_schema = has_type(&["Product"]);

        signals.has_breadcrumb_nav = select(&self.document, "nav, ol, ul, div")
            .iter()
            .any(|e| {
                ["aria-label", "class", "id"].iter().any(|attr| {
                    e.value()
                        .attr(attr)
                        .map(|v| v.to_lowercase().contains("breadcrumb"))
                        .unwrap_or(false)
                })
            });

        let questions = select(&self.document, "h2, h3, h4, dt, summary")
            .iter()
            .filter(|h| element_text(h).ends_with('?'))
            .count();
        let faq_section = select(&self.document, "[class], [id]").iter().any(|e| {
            ["class", "id"].iter().any(|attr| {
                e.value()
                    .attr(attr)
                    .map(|v| v.to_lowercase().contains("faq"))
                    .unwrap_or(false)
            })
        });
        signals.has_faq_content = questions >= 2 || faq_section;

        signals
    }

    /// Everything but the site checks, which need the network.
    pub fn analyze(&self) -> TechnicalSignals {
        TechnicalSignals {
            url: self.base_url.to_string(),
            meta: self.extract_meta_tags(),
            headings: self.extract_headings(),
            images: self.extract_images(),
            links: self.extract_links(),
            mobile: self.extract_mobile(),
            schema: self.extract_schema(),
            site: Default::default(),
            page_size_bytes: self.byte_size,
        }
    }
}

fn collect_schema_types(value: &Value, types: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(name)) => types.push(name.clone()),
                Some(Value::Array(names)) => types.extend(
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(|s| s.to_string())),
                ),
                _ => {}
            }
            for child in map.values() {
                collect_schema_types(child, types);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_schema_types(item, types);
            }
        }
        _ => {}
    }
}

/// Convenience wrapper used by the analyzer: parse once, extract everything.
pub fn analyze_markup(url: &Url, html: &str) -> TechnicalSignals {
    PageParser::new(url.clone(), html).analyze()
}
