//! Keyword categorization of line items.

use crate::models::config::CategoryConfig;

/// Assigns items to the first category whose keyword occurs in the name.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(String, Vec<String>)>,
    fallback: String,
}

impl Categorizer {
    pub fn new(config: &CategoryConfig) -> Self {
        let rules = config
            .rules
            .iter()
            .map(|rule| {
                let keywords = rule
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (rule.name.clone(), keywords)
            })
            .collect();

        Self {
            rules,
            fallback: config.fallback.clone(),
        }
    }

    /// Category for an item name.
    pub fn categorize(&self, name: &str) -> &str {
        let name = name.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k.as_str())))
            .map(|(category, _)| category.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(&CategoryConfig::default())
    }
}
