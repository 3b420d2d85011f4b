//! Normalises issue titles onto a fixed taxonomy so that tracking does not
//! depend on the exact wording of a title.

const TITLE_TYPES: [(&str, &str); 37] = [
    ("Missing Page Title", "missing_title"),
    ("Title Too Short", "title_length"),
    ("Title Too Long", "title_length"),
    ("Missing Meta Description", "missing_meta_description"),
    ("Meta Description Too Short", "meta_description_length"),
    ("Meta Description Too Long", "meta_description_length"),
    ("Missing Canonical URL", "missing_canonical"),
    ("Missing Open Graph Tags", "missing_open_graph"),
    ("Missing Twitter Card Tags", "missing_twitter_card"),
    ("Large Page Size", "page_size"),
    ("Missing H1 Tag", "missing_h1"),
    ("Multiple H1 Tags", "multiple_h1"),
    ("Broken Heading Hierarchy", "heading_hierarchy"),
    ("Images Missing Alt Text", "image_alt_text"),
    ("Images Missing Dimensions", "image_dimensions"),
    ("Images Not Lazy Loaded", "image_lazy_loading"),
    ("Insufficient Internal Links", "internal_links"),
    ("Broken Links Detected", "broken_links"),
    ("Orphan Page", "orphan_page"),
    ("Unsafe External Links", "unsafe_external_links"),
    ("Missing Viewport Meta Tag", "missing_viewport"),
    ("Not Mobile Responsive", "mobile_responsive"),
    ("Missing Structured Data", "missing_structured_data"),
    ("Missing FAQ Schema", "missing_faq_schema"),
    ("Missing Breadcrumbs", "missing_breadcrumbs"),
    ("Missing XML Sitemap", "missing_sitemap"),
    ("Missing Robots.txt", "missing_robots_txt"),
    ("Low Content Quality", "content_quality"),
    ("Poor Readability", "readability"),
    ("Low E-A-T Score", "eat_signals"),
    ("Keyword Over-Optimization", "keyword_density"),
    ("Thin Content", "thin_content"),
    ("Duplicate Content Risk", "duplicate_content"),
    ("Missing Meta Keywords", "missing_meta_keywords"),
    ("Images Missing Titles", "image_titles"),
    ("Missing Article Schema", "missing_article_schema"),
    ("Missing Product Schema", "missing_product_schema"),
];

const MISSING: &[&str] = &["missing", "no ", "not found", "without", "empty", "lack"];

// Checked in order, so more specific phrases come first. A rule matches when
// every keyword group has at least one hit. Every type here also appears in
// TITLE_TYPES.
const KEYWORD_TYPES: [(&[&[&str]], &str); 33] = [
    (&[&["meta description"], MISSING], "missing_meta_description"),
    (&[&["meta description"]], "meta_description_length"),
    (&[&["meta keyword"]], "missing_meta_keywords"),
    (&[&["open graph", "og:"]], "missing_open_graph"),
    (&[&["twitter"]], "missing_twitter_card"),
    (&[&["faq"]], "missing_faq_schema"),
    (&[&["breadcrumb"]], "missing_breadcrumbs"),
    (&[&["article"], &["schema", "structured data"]], "missing_article_schema"),
    (&[&["product"], &["schema", "structured data"]], "missing_product_schema"),
    (&[&["structured data", "schema", "json-ld"]], "missing_structured_data"),
    (&[&["alt text", "alt attribute"]], "image_alt_text"),
    (&[&["image"], &["dimension", "width", "height"]], "image_dimensions"),
    (&[&["image"], &["title"]], "image_titles"),
    (&[&["lazy"]], "image_lazy_loading"),
    (&[&["h1"], &["multiple", "more than one", "duplicate"]], "multiple_h1"),
    (&[&["h1"]], "missing_h1"),
    (&[&["heading"]], "heading_hierarchy"),
    (&[&["canonical"]], "missing_canonical"),
    (&[&["viewport"]], "missing_viewport"),
    (&[&["responsive", "mobile"]], "mobile_responsive"),
    (&[&["internal link"]], "internal_links"),
    (&[&["broken link", "404"]], "broken_links"),
    (&[&["orphan"]], "orphan_page"),
    (&[&["external link", "noopener"]], "unsafe_external_links"),
    (&[&["sitemap"]], "missing_sitemap"),
    (&[&["robots"]], "missing_robots_txt"),
    (&[&["page size", "page weight"]], "page_size"),
    (&[&["thin content", "word count"]], "thin_content"),
    (&[&["readability"]], "readability"),
    (&[&["e-a-t", "eeat", "expertise"]], "eat_signals"),
    (&[&["keyword"]], "keyword_density"),
    (&[&["duplicate"]], "duplicate_content"),
    (&[&["content quality"]], "content_quality"),
];

// Title rules go last so that "image title" and the like match first.
const TITLE_KEYWORD_TYPES: [(&[&[&str]], &str); 2] = [
    (&[&["title"], MISSING], "missing_title"),
    (&[&["title"]], "title_length"),
];

/// Fixed title mapping first, then keyword matching, then a slug of the title.
pub fn normalize_issue_type(title: &str) -> String {
    let trimmed = title.trim();
    if let Some((_, issue_type)) = TITLE_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(trimmed))
    {
        return issue_type.to_string();
    }

    let lowered = trimmed.to_lowercase();
    if let Some((_, issue_type)) = KEYWORD_TYPES
        .iter()
        .chain(TITLE_KEYWORD_TYPES.iter())
        .find(|(groups, _)| {
            groups
                .iter()
                .all(|group| group.iter().any(|k| lowered.contains(k)))
        })
    {
        return issue_type.to_string();
    }

    slugify(&lowered)
}

fn slugify(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
