use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::fetcher::PageFetcher;
use crate::signals::SiteSignals;

/// Number of `<loc>` entries in a sitemap or sitemap index, `None` when the
/// document is not XML.
pub fn count_sitemap_urls(content: &str) -> Option<usize> {
    let document = roxmltree::Document::parse(content).ok()?;
    Some(
        document
            .descendants()
            .filter(|node| node.has_tag_name("loc"))
            .filter(|node| node.text().map(|t| !t.trim().is_empty()).unwrap_or(false))
            .count(),
    )
}

/// Checks `/sitemap.xml` and `/robots.txt` at the page's origin. Failures of
/// any kind read as absent.
pub async fn check_site(fetcher: &PageFetcher, page_url: &Url, timeout: Duration) -> SiteSignals {
    let sitemap_url = page_url.join("/sitemap.xml").ok();
    let robots_url = page_url.join("/robots.txt").ok();

    let (sitemap, robots) = tokio::join!(
        async {
            match &sitemap_url {
                Some(url) => fetcher.fetch_optional(url, timeout).await,
                None => None,
            }
        },
        async {
            match &robots_url {
                Some(url) => fetcher.fetch_optional(url, timeout).await,
                None => None,
            }
        }
    );

    let sitemap_urls = sitemap
        .as_deref()
        .and_then(count_sitemap_urls)
        .unwrap_or_default();
    let has_robots_txt = robots.map(|body| !body.trim().is_empty()).unwrap_or(false);
    debug!(sitemap_urls, has_robots_txt, "site checks finished");

    SiteSignals {
        has_sitemap: sitemap_urls > 0,
        sitemap_urls,
        has_robots_txt,
    }
}
