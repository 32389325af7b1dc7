//! Rule-based field extractors.
//!
//! Every field is extracted by an ordered [`StrategyChain`]: each strategy is
//! a plain function over the whole text, and the first one that produces a
//! value wins. Strategies never depend on the result of another field.

pub mod amounts;
pub mod dates;
pub mod invoice_number;
pub mod items;
pub mod patterns;
pub mod vendor;

pub use amounts::parse_amount;
pub use dates::parse_date;
pub use items::ExtractedItem;

use tracing::{debug, trace};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A named extraction heuristic.
pub struct Strategy<T> {
    pub name: &'static str,
    run: fn(&str) -> Option<T>,
}

impl<T> Strategy<T> {
    pub const fn new(name: &'static str, run: fn(&str) -> Option<T>) -> Self {
        Self { name, run }
    }

    /// Run this strategy alone.
    pub fn apply(&self, text: &str) -> Option<T> {
        (self.run)(text)
    }
}

/// Candidate strategies for one field, in priority order.
pub struct StrategyChain<T> {
    field: &'static str,
    strategies: Vec<Strategy<T>>,
}

impl<T> StrategyChain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a lower-priority strategy.
    pub fn then(mut self, name: &'static str, run: fn(&str) -> Option<T>) -> Self {
        self.strategies.push(Strategy::new(name, run));
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn strategies(&self) -> &[Strategy<T>] {
        &self.strategies
    }

    /// Run the chain and report which strategy matched.
    pub fn extract_named(&self, text: &str) -> Option<(&'static str, T)> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.apply(text) {
                debug!("{}: matched by '{}'", self.field, strategy.name);
                return Some((strategy.name, value));
            }
            trace!("{}: '{}' found nothing", self.field, strategy.name);
        }
        None
    }
}

impl<T> FieldExtractor for StrategyChain<T> {
    type Output = T;

    fn extract(&self, text: &str) -> Option<T> {
        self.extract_named(text).map(|(_, value)| value)
    }
}

/// Text from the end of the first match of `label` to the end of `text`.
pub(crate) fn region_after<'a>(text: &'a str, label: &regex::Regex) -> Option<&'a str> {
    label.find(text).map(|m| &text[m.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<u32> {
        None
    }

    fn length(text: &str) -> Option<u32> {
        Some(text.len() as u32)
    }

    fn forty_two(_: &str) -> Option<u32> {
        Some(42)
    }

    #[test]
    fn test_first_success_wins() {
        let chain = StrategyChain::new("number")
            .then("never", never)
            .then("length", length)
            .then("constant", forty_two);

        assert_eq!(chain.extract_named("abc"), Some(("length", 3)));
        assert_eq!(chain.extract("abcd"), Some(4));
        assert_eq!(chain.strategies().len(), 3);
        assert_eq!(chain.field(), "number");
    }

    #[test]
    fn test_empty_chain_finds_nothing() {
        let chain: StrategyChain<u32> = StrategyChain::new("number").then("never", never);
        assert_eq!(chain.extract("anything"), None);
    }

    #[test]
    fn test_strategies_run_alone() {
        let chain = StrategyChain::new("number").then("constant", forty_two);
        assert_eq!(chain.strategies()[0].apply(""), Some(42));
    }
}
