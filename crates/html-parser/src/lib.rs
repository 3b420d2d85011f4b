pub mod fetcher;
pub mod page_parser;
pub mod signals;
pub mod site_checks;
pub mod text_extractor;

pub use fetcher::{normalize_url, FetchError, FetchOptions, FetchedPage, PageFetcher};
pub use page_parser::{analyze_markup, PageParser};
pub use signals::TechnicalSignals;
pub use site_checks::check_site;
pub use text_extractor::{extract_visible_text, PageText};
