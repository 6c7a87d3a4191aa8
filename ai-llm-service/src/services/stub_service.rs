//! Deterministic offline generator.
//!
//! Answers from an ordered list of `(marker, response)` rules: the first rule
//! whose marker occurs in the prompt wins, otherwise the fallback response is
//! returned. No I/O, no randomness.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Canned-response generator.
#[derive(Debug, Clone, Default)]
pub struct StubGenerator {
    rules: Vec<(String, String)>,
    fallback: String,
    calls: Arc<AtomicUsize>,
}

impl StubGenerator {
    /// Stub that always answers `fallback` unless a rule matches.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a rule; rules are checked in insertion order.
    pub fn with_rule(mut self, marker: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((marker.into(), response.into()));
        self
    }

    /// Picks the response for `prompt` and records the call.
    pub fn respond(&self, prompt: &str) -> &str {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let hit = self
            .rules
            .iter()
            .position(|(marker, _)| prompt.contains(marker.as_str()));
        debug!(rule = ?hit, prompt_len = prompt.len(), "stub generator answered");
        match hit {
            Some(i) => &self.rules[i].1,
            None => &self.fallback,
        }
    }

    /// Number of prompts answered so far (shared across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let stub = StubGenerator::new("fallback")
            .with_rule("alpha", "A")
            .with_rule("beta", "B");
        assert_eq!(stub.respond("beta then alpha"), "A");
        assert_eq!(stub.respond("only beta"), "B");
        assert_eq!(stub.respond("nothing"), "fallback");

        let clone = stub.clone();
        clone.respond("again");
        assert_eq!(stub.calls(), 4);
    }
}
