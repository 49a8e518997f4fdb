//! EditorAdapter: highlighting inside the JSON rules editor
//!
//! The editor shows the rule list as a pretty-printed JSON array. Matches are
//! isolated by folding every other top-level entry: the editor's fold command
//! collapses the regions under the cursors, so one cursor is dropped on the
//! first line of each non-matching entry before folding.
//!
//! Content is parsed as leniently as the page's own `JSON.parse`: numbers
//! outside the `f64` range are kept verbatim and nesting depth is unbounded.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{HighlightError, HighlightResult};
use crate::pattern::Selection;
use crate::surface::{CursorPoint, Highlighter, StructuredEditor, FOLD_COMMAND, UNFOLD_ALL_COMMAND};

/// Indentation prefix of a line that opens a top-level array entry
const ENTRY_OPENING: &str = "  {";

/// Parse editor text into a JSON value with no nesting limit
pub fn parse_rules(text: &str) -> HighlightResult<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// 1-based start line of every top-level object entry, in entry order.
///
/// Line numbers refer to the 2-space pretty rendering of `rules`, which is how
/// the host editor formats its content.
pub fn entry_start_lines(rules: &Value) -> HighlightResult<Vec<u32>> {
    let pretty = serde_json::to_string_pretty(rules)?;
    Ok(pretty
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with(ENTRY_OPENING))
        .map(|(index, _)| index as u32 + 1)
        .collect())
}

pub struct EditorAdapter<E: StructuredEditor> {
    editor: E,
}

impl<E: StructuredEditor> EditorAdapter<E> {
    pub fn new(editor: E) -> Self {
        Self { editor }
    }

    fn require_command(&self, id: &str) -> HighlightResult<()> {
        if self.editor.has_command(id) {
            Ok(())
        } else {
            Err(HighlightError::missing(id))
        }
    }

    fn parse_content(&self) -> HighlightResult<Value> {
        let text = self
            .editor
            .text()
            .ok_or_else(|| HighlightError::missing("editor model"))?;
        parse_rules(&text)
    }
}

impl<E: StructuredEditor> Highlighter for EditorAdapter<E> {
    fn apply(&mut self, selection: &Selection) -> HighlightResult<()> {
        if selection.is_empty() {
            return self.restore();
        }

        let rules = self.parse_content()?;
        let starts = entry_start_lines(&rules)?;

        // Nothing is touched unless both commands are available
        self.require_command(UNFOLD_ALL_COMMAND)?;
        self.require_command(FOLD_COMMAND)?;

        self.editor.run_command(UNFOLD_ALL_COMMAND)?;
        self.editor.set_selection(CursorPoint::NEUTRAL)?;

        let cursors: Vec<CursorPoint> = starts
            .iter()
            .enumerate()
            .filter(|(position, _)| !selection.contains_position(*position))
            .map(|(_, line)| CursorPoint::line_start(*line))
            .collect();

        if cursors.is_empty() {
            tracing::debug!(entries = starts.len(), "every entry matched, nothing to fold");
            return Ok(());
        }

        self.editor.set_selections(&cursors)?;
        self.editor.run_command(FOLD_COMMAND)?;
        tracing::debug!(
            entries = starts.len(),
            folded = cursors.len(),
            "editor entries folded"
        );
        Ok(())
    }

    fn restore(&mut self) -> HighlightResult<()> {
        self.require_command(UNFOLD_ALL_COMMAND)?;
        self.editor.set_selection(CursorPoint::NEUTRAL)?;
        self.editor.run_command(UNFOLD_ALL_COMMAND)?;
        tracing::debug!("editor restored");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
