use std::collections::HashMap;

use html_parser::signals::{
    HeadingSignals, ImageSignals, LinkSignals, MetaSignals, MobileSignals, SchemaSignals,
    SiteSignals,
};
use html_parser::TechnicalSignals;

/// A page that passes every technical rule.
pub fn healthy_technical() -> TechnicalSignals {
    let title = "Rust SEO auditing: a practical guide for teams".to_string();
    let description = "A".repeat(140);
    TechnicalSignals {
        url: "https://example.com/guide".to_string(),
        meta: MetaSignals {
            title_length: title.chars().count(),
            title: Some(title),
            description_length: description.chars().count(),
            description: Some(description),
            keywords: None,
            canonical: Some("https://example.com/guide".to_string()),
            robots: None,
            charset: Some("utf-8".to_string()),
            og_tags: HashMap::from([("title".to_string(), "Guide".to_string())]),
            twitter_tags: HashMap::from([("card".to_string(), "summary".to_string())]),
        },
        headings: HeadingSignals {
            counts: [1, 2, 1, 0, 0, 0],
            hierarchy_ok: true,
            h1_texts: vec!["Guide".to_string()],
        },
        images: ImageSignals {
            total: 2,
            ..Default::default()
        },
        links: LinkSignals {
            internal: 5,
            external: 1,
            inbound: 1,
            ..Default::default()
        },
        mobile: MobileSignals {
            viewport: Some("width=device-width".to_string()),
            has_viewport: true,
            has_media_queries: true,
            uses_flex_or_grid: true,
            uses_layout_framework: false,
            responsive: true,
        },
        schema: SchemaSignals {
            has_structured_data: true,
            types: vec!["FAQPage".to_string(), "BreadcrumbList".to_string()],
            has_faq_schema: true,
            has_breadcrumb_schema: true,
            ..Default::default()
        },
        site: SiteSignals {
            has_sitemap: true,
            sitemap_urls: 10,
            has_robots_txt: true,
        },
        page_size_bytes: 50_000,
    }
}
