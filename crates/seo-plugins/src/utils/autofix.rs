/// Issue titles an automated remediation process can safely correct.
pub const AUTOFIX_TITLES: [&str; 30] = [
    "Missing Page Title",
    "Title Too Short",
    "Title Too Long",
    "Missing Meta Description",
    "Meta Description Too Short",
    "Meta Description Too Long",
    "Missing Meta Keywords",
    "Missing H1 Tag",
    "Multiple H1 Tags",
    "Broken Heading Hierarchy",
    "Images Missing Alt Text",
    "Images Missing Dimensions",
    "Images Not Lazy Loaded",
    "Images Missing Titles",
    "Missing Structured Data",
    "Missing FAQ Schema",
    "Missing Article Schema",
    "Missing Product Schema",
    "Missing Breadcrumbs",
    "Missing Canonical URL",
    "Missing Open Graph Tags",
    "Missing Twitter Card Tags",
    "Missing Viewport Meta Tag",
    "Insufficient Internal Links",
    "Orphan Page",
    "Unsafe External Links",
    "Broken Links Detected",
    "Missing XML Sitemap",
    "Missing Robots.txt",
    "Missing Language Attribute",
];

pub fn is_autofix_eligible(title: &str) -> bool {
    let title = title.trim();
    AUTOFIX_TITLES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(title))
}
