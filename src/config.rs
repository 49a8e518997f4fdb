//! Configuration types and defaults for the highlighter
//!
//! Defaults target the host page's current markup. Every field can be
//! overridden from JS by passing a camelCase object to `install()`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::HighlightError;

// =============================================================================
// Force-render policy
// =============================================================================

/// How often the scroll-to-end maneuver runs before a list-view filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ForceRenderPolicy {
    /// Once per mount session
    #[default]
    FirstPass,
    /// Before every non-empty filter pass
    EveryPass,
    Never,
}

// =============================================================================
// Row styles
// =============================================================================

/// Inline style values written to list rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowStyleConfig {
    /// Opacity for matched rows and for restored rows. Default: "1"
    pub full_opacity: String,
    /// Opacity for filtered-out rows. Default: "0.25"
    pub dimmed_opacity: String,
    /// Background tint for matched rows (soft orange)
    pub highlight_background: String,
}

impl Default for RowStyleConfig {
    fn default() -> Self {
        Self {
            full_opacity: "1".to_string(),
            dimmed_opacity: "0.25".to_string(),
            highlight_background: "rgba(255, 165, 0, 0.1)".to_string(),
        }
    }
}

// =============================================================================
// Selectors
// =============================================================================

/// CSS selectors locating the host page's elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorConfig {
    /// Element whose appearance signals that the rules view has mounted.
    /// The input control is inserted before its next sibling.
    pub mount: String,
    /// Drag-and-drop container holding one child per rule
    pub rule_rows: String,
    /// Scrollable element used by the forced-render maneuver
    pub scroll_container: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            mount: ".MuiGrid-root.MuiGrid-container".to_string(),
            rule_rows: r#".MuiBox-root form div[data-rbd-droppable-id="droppable-rules"]"#.to_string(),
            scroll_container: "main".to_string(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlighterConfig {
    /// Path suffix identifying the rules view. Default: "/rules"
    pub rules_path_suffix: String,
    pub selectors: SelectorConfig,
    pub row_style: RowStyleConfig,
    pub force_render: ForceRenderPolicy,
    /// Fixed wait after scrolling to the end. Default: 1000
    pub settle_delay_ms: u32,
    /// Extra pixels scrolled past `scrollHeight`. Default: 1000
    pub scroll_overshoot_px: f64,
    pub label: String,
    pub placeholder: String,
    /// One of trace, debug, info, warn, error. Default: "info"
    pub log_level: String,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            rules_path_suffix: "/rules".to_string(),
            selectors: SelectorConfig::default(),
            row_style: RowStyleConfig::default(),
            force_render: ForceRenderPolicy::default(),
            settle_delay_ms: 1000,
            scroll_overshoot_px: 1000.0,
            label: "Highlight Rules".to_string(),
            placeholder: "(e.g., x-edg-mr: 591:0;591:3;591:8;591:12;591:13;591:29;591:33;)".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl HighlighterConfig {
    /// Build from an optional JS object; `undefined`/`null` yields defaults.
    pub fn from_js(value: JsValue) -> Result<Self, HighlightError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|e| HighlightError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, HighlightError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HighlightError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HighlightError> {
        if self.rules_path_suffix.is_empty() {
            return Err(HighlightError::Config("rulesPathSuffix must not be empty".into()));
        }
        let selectors = [
            ("selectors.mount", &self.selectors.mount),
            ("selectors.ruleRows", &self.selectors.rule_rows),
            ("selectors.scrollContainer", &self.selectors.scroll_container),
        ];
        for (name, value) in selectors {
            if value.trim().is_empty() {
                return Err(HighlightError::Config(format!("{} must not be empty", name)));
            }
        }
        if !self.scroll_overshoot_px.is_finite() || self.scroll_overshoot_px < 0.0 {
            return Err(HighlightError::Config("scrollOvershootPx must be a non-negative number".into()));
        }
        Ok(())
    }

    pub fn is_rules_path(&self, path: &str) -> bool {
        path.ends_with(&self.rules_path_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_host_page() {
        let config = HighlighterConfig::default();
        assert_eq!(config.settle_delay_ms, 1000);
        assert_eq!(config.row_style.dimmed_opacity, "0.25");
        assert_eq!(config.force_render, ForceRenderPolicy::FirstPass);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_keep_defaults() {
        let config = HighlighterConfig::from_json(
            r#"{"settleDelayMs": 250, "rowStyle": {"dimmedOpacity": "0.5"}, "forceRender": "everyPass"}"#,
        )
        .unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.row_style.dimmed_opacity, "0.5");
        assert_eq!(config.row_style.full_opacity, "1");
        assert_eq!(config.force_render, ForceRenderPolicy::EveryPass);
        assert_eq!(config.selectors.scroll_container, "main");
    }

    #[test]
    fn test_empty_selector_rejected() {
        let err = HighlighterConfig::from_json(r#"{"selectors": {"ruleRows": "  "}}"#).unwrap_err();
        assert!(matches!(err, HighlightError::Config(_)));
    }

    #[test]
    fn test_rules_path_detection() {
        let config = HighlighterConfig::default();
        assert!(config.is_rules_path("/acme/site/env/production/rules"));
        assert!(!config.is_rules_path("/acme/site/env/production/rules/history"));
        assert!(!config.is_rules_path("/acme/site/overview"));
    }
}
