use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::plugins::content::ContentPlugin;
use crate::plugins::heading::HeadingPlugin;
use crate::plugins::image::ImagePlugin;
use crate::plugins::links::LinksPlugin;
use crate::plugins::meta_description::MetaDescriptionPlugin;
use crate::plugins::mobile::MobilePlugin;
use crate::plugins::schema::SchemaPlugin;
use crate::plugins::seo_basic::SeoBasicPlugin;
use crate::plugins::site::SitePlugin;
use crate::plugins::title::TitlePlugin;

use super::config::{RuleConfig, RuleDisplay};
use super::issue::Issue;
use super::page_plugin::SeoPlugin;
use super::signals::AuditSignals;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Rule {0} is already registered")]
    DuplicateRule(String),
}

pub struct PluginRegistry {
    plugins: Vec<Box<dyn SeoPlugin>>,
    rule_ids: HashSet<&'static str>,
    config: RuleConfig,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginRegistry({} plugins)", self.plugins.len())
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            rule_ids: HashSet::new(),
            config: RuleConfig::new(),
        }
    }

    pub fn set_config(&mut self, config: RuleConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn register<P: SeoPlugin>(&mut self, plugin: P) -> Result<(), RegistryError> {
        let rules = plugin.available_rules();
        if let Some(rule) = rules.iter().find(|rule| self.rule_ids.contains(rule.id)) {
            return Err(RegistryError::DuplicateRule(rule.id.to_string()));
        }
        self.rule_ids.extend(rules.iter().map(|rule| rule.id));
        self.plugins.push(Box::new(plugin));
        Ok(())
    }

    pub fn get_available_rules(&self) -> Vec<RuleDisplay> {
        self.plugins
            .iter()
            .flat_map(|plugin| {
                plugin
                    .available_rules()
                    .into_iter()
                    .map(|rule| RuleDisplay {
                        id: rule.id.to_string(),
                        title: rule.title.to_string(),
                        description: rule.description.to_string(),
                        plugin_name: plugin.name().to_string(),
                        default_severity: rule.default_severity,
                        category: rule.category,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Runs every enabled rule. Pure: the same signals always yield the same
    /// issues in the same order.
    pub fn detect(&self, signals: &AuditSignals) -> Vec<Issue> {
        self.plugins
            .iter()
            .flat_map(|plugin| plugin.analyze(signals, &self.config))
            .collect()
    }

    pub fn with_config(config: RuleConfig) -> Self {
        let mut registry = Self::default();
        registry.set_config(config);
        registry
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        let results = [
            registry.register(ContentPlugin::new()),
            registry.register(TitlePlugin::new()),
            registry.register(MetaDescriptionPlugin::new()),
            registry.register(SeoBasicPlugin::new()),
            registry.register(HeadingPlugin::new()),
            registry.register(ImagePlugin::new()),
            registry.register(LinksPlugin::new()),
            registry.register(MobilePlugin::new()),
            registry.register(SchemaPlugin::new()),
            registry.register(SitePlugin::new()),
        ];
        debug_assert!(results.iter().all(|r| r.is_ok()));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Severity;
    use crate::utils::signals::ContentSignals;
    use crate::utils::test_support::healthy_technical;

    #[test]
    fn test_duplicate_rules_are_rejected() {
        let mut registry = PluginRegistry::default();
        let result = registry.register(TitlePlugin::new());
        assert!(matches!(result, Err(RegistryError::DuplicateRule(_))));
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let registry = PluginRegistry::default();
        let rules = registry.get_available_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_healthy_page_has_no_issues() {
        let registry = PluginRegistry::default();
        let technical = healthy_technical();
        let content = ContentSignals::fallback(800);
        let issues = registry.detect(&AuditSignals::new(&technical, &content));
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let registry = PluginRegistry::default();
        let technical = html_parser::TechnicalSignals::default();
        let content = ContentSignals::fallback(100);
        let signals = AuditSignals::new(&technical, &content);
        assert_eq!(registry.detect(&signals), registry.detect(&signals));
    }

    #[test]
    fn test_disabled_rules_and_overrides() {
        let mut config = RuleConfig::new();
        config.disable_rule("title.missing");
        config.set_severity("site.sitemap", Severity::Warning);
        let registry = PluginRegistry::with_config(config);

        let technical = html_parser::TechnicalSignals::default();
        let content = ContentSignals::fallback(800);
        let issues = registry.detect(&AuditSignals::new(&technical, &content));

        assert!(!issues.iter().any(|i| i.title == "Missing Page Title"));
        let sitemap = issues
            .iter()
            .find(|i| i.title == "Missing XML Sitemap")
            .unwrap();
        assert_eq!(sitemap.severity, Severity::Warning);
    }
}
