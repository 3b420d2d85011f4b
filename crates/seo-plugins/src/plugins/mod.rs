pub mod content;
pub mod heading;
pub mod image;
pub mod links;
pub mod meta_description;
pub mod mobile;
pub mod schema;
pub mod seo_basic;
pub mod site;
pub mod title;
