//! Error taxonomy for the highlighting engine.
//!
//! Adapters report failures as [`HighlightError`]; the lifecycle controller logs
//! them and degrades to "do nothing". Only [`HighlightError::Config`] ever reaches
//! JavaScript, from `install()`.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum HighlightError {
    /// Editor content is not valid JSON (usually mid-edit).
    #[error("structured content is not parseable: {0}")]
    ParseFailure(#[from] serde_json::Error),

    /// A container, selector or editor command is absent on the host page.
    #[error("missing capability: {0}")]
    MissingCapability(String),

    /// A browser API call threw.
    #[error("javascript error: {0}")]
    Js(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HighlightError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingCapability(what.into())
    }

    /// Parse failures are expected while the user edits; everything else is worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::ParseFailure(_))
    }
}

impl From<JsValue> for HighlightError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        Self::Js(message)
    }
}

impl From<HighlightError> for JsValue {
    fn from(err: HighlightError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type HighlightResult<T> = Result<T, HighlightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_is_expected() {
        let err: HighlightError = serde_json::from_str::<serde_json::Value>("[{").unwrap_err().into();
        assert!(err.is_expected());
        assert!(err.to_string().starts_with("structured content is not parseable"));
    }

    #[test]
    fn test_missing_capability_message() {
        let err = HighlightError::missing("editor.fold");
        assert!(!err.is_expected());
        assert_eq!(err.to_string(), "missing capability: editor.fold");
    }
}
