pub mod autofix;
pub mod config;
pub mod issue;
pub mod issue_type;
pub mod page_plugin;
pub mod registry;
pub mod signals;

#[cfg(test)]
pub(crate) mod test_support;
