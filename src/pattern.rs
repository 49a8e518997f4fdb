//! PatternParser: rule-index extraction from free-text patterns
//!
//! Extracts the `<minor>` part of every `<major>:<minor>` token, e.g. the
//! `x-edg-mr: 591:0;591:3;591:8` response header yields `0`, `3`, `8`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// =============================================================================
// Types
// =============================================================================

/// Ordinal identifier of a rule, kept as the text it was typed as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleIndex(String);

impl RuleIndex {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Zero-based position this index addresses.
    ///
    /// Only canonical decimals address a position: "01" and values past
    /// `usize::MAX` address nothing.
    pub fn position(&self) -> Option<usize> {
        let value: usize = self.0.parse().ok()?;
        (value.to_string() == self.0).then_some(value)
    }
}

impl std::fmt::Display for RuleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered rule indices to highlight. Repeats are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    indices: Vec<RuleIndex>,
}

impl Selection {
    pub fn new(indices: Vec<RuleIndex>) -> Self {
        Self { indices }
    }

    /// Empty selection means "no filter"
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[RuleIndex] {
        &self.indices
    }

    /// Whether the rule at `position` is selected
    pub fn contains_position(&self, position: usize) -> bool {
        self.indices.iter().any(|i| i.position() == Some(position))
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().filter_map(RuleIndex::position)
    }
}

impl FromIterator<RuleIndex> for Selection {
    fn from_iter<I: IntoIterator<Item = RuleIndex>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// =============================================================================
// PatternParser
// =============================================================================

#[wasm_bindgen]
pub struct PatternParser {
    token_regex: Regex,
}

impl Default for PatternParser {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PatternParser {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // ASCII digits only; `\d` would also accept other Unicode digits
        let token_regex = Regex::new(r"[0-9]+:([0-9]+)").expect("Token regex should compile");
        Self { token_regex }
    }

    /// Parse and return the indices as a string array for WASM
    #[wasm_bindgen(js_name = parse)]
    pub fn js_parse(&self, pattern: &str) -> Vec<String> {
        self.parse(pattern)
            .indices
            .into_iter()
            .map(|i| i.0)
            .collect()
    }
}

impl PatternParser {
    /// Extract rule indices in order of appearance. Never fails.
    pub fn parse(&self, pattern: &str) -> Selection {
        self.token_regex
            .captures_iter(pattern)
            .filter_map(|cap| cap.get(1))
            .map(|m| RuleIndex::new(m.as_str()))
            .collect()
    }
}

static SHARED_PARSER: LazyLock<PatternParser> = LazyLock::new(PatternParser::new);

/// Parse with a lazily compiled, shared parser
pub fn parse_pattern(pattern: &str) -> Selection {
    SHARED_PARSER.parse(pattern)
}

// =============================================================================
// Tests
// =============================================================================
