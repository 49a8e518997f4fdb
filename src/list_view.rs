//! ListViewAdapter: highlighting on the drag-and-drop rule rows
//!
//! Matched rows keep full opacity and get a tint; the rest are dimmed.
//! Restoring writes full opacity and clears the tint on every row.

use crate::config::RowStyleConfig;
use crate::error::{HighlightError, HighlightResult};
use crate::pattern::Selection;
use crate::surface::{Highlighter, RowStyle, RuleListView};

pub struct ListViewAdapter<'a, L: RuleListView> {
    list: L,
    style: &'a RowStyleConfig,
}

impl<'a, L: RuleListView> ListViewAdapter<'a, L> {
    pub fn new(list: L, style: &'a RowStyleConfig) -> Self {
        Self { list, style }
    }

    /// First half of the forced-render maneuver: scroll to the end so that
    /// lazily rendered rows mount. Returns the scroll position to restore.
    pub fn begin_forced_render(&self) -> Option<f64> {
        self.list.scroll_to_end()
    }

    pub fn finish_forced_render(&self, saved_top: Option<f64>) {
        if let Some(top) = saved_top {
            self.list.scroll_to(top);
        }
    }

    fn rows(&self) -> HighlightResult<Vec<L::Row>> {
        self.list
            .rows()
            .ok_or_else(|| HighlightError::missing("rule row container"))
    }

    fn mark(&self, row: &L::Row, matched: bool) {
        if matched {
            row.set_opacity(&self.style.full_opacity);
            row.set_background(&self.style.highlight_background);
        } else {
            row.set_opacity(&self.style.dimmed_opacity);
            row.set_background("");
        }
    }
}

impl<L: RuleListView> Highlighter for ListViewAdapter<'_, L> {
    fn apply(&mut self, selection: &Selection) -> HighlightResult<()> {
        if selection.is_empty() {
            return self.restore();
        }

        if !self.list.expand_rows() {
            tracing::trace!("no expand control for the rule list");
        }

        let rows = self.rows()?;
        let mut matched = 0usize;
        for (position, row) in rows.iter().enumerate() {
            let hit = selection.contains_position(position);
            matched += usize::from(hit);
            self.mark(row, hit);
        }
        tracing::debug!(rows = rows.len(), matched, "list view filtered");
        Ok(())
    }

    fn restore(&mut self) -> HighlightResult<()> {
        let rows = self.rows()?;
        for row in &rows {
            row.set_opacity(&self.style.full_opacity);
            row.set_background("");
        }
        tracing::debug!(rows = rows.len(), "list view restored");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse_pattern;
    use crate::testing::{FakeList, RowState};

    const TINT: &str = "rgba(255, 165, 0, 0.1)";

    fn row(opacity: &str, background: &str) -> RowState {
        RowState {
            opacity: opacity.to_string(),
            background: background.to_string(),
        }
    }

    #[test]
    fn test_matched_rows_tinted_others_dimmed() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(5);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        adapter.apply(&parse_pattern("591:2;591:4")).unwrap();

        assert_eq!(
            list.states(),
            vec![
                row("0.25", ""),
                row("0.25", ""),
                row("1", TINT),
                row("0.25", ""),
                row("1", TINT),
            ]
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(6);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);
        let selection = parse_pattern("1:0;1:3;1:3");

        adapter.apply(&selection).unwrap();
        let once = list.states();
        adapter.apply(&selection).unwrap();

        assert_eq!(list.states(), once);
    }

    #[test]
    fn test_restore_after_any_selection_returns_baseline() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(4);
        let baseline = list.states();
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        for pattern in ["9:0", "9:1;9:2;9:3", "9:7", "9:0;9:1;9:2;9:3"] {
            adapter.apply(&parse_pattern(pattern)).unwrap();
            adapter.restore().unwrap();
            assert_eq!(list.states(), baseline, "after {}", pattern);
        }
    }

    #[test]
    fn test_empty_selection_restores() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(3);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        adapter.apply(&parse_pattern("5:1")).unwrap();
        adapter.apply(&Selection::default()).unwrap();

        assert!(list.states().iter().all(|s| s == &row("1", "")));
        // Restoring never touches the expand control
        assert_eq!(list.0.expand_clicks.get(), 1);
    }

    #[test]
    fn test_expand_control_reveals_hidden_rows() {
        let style = RowStyleConfig::default();
        let list = FakeList::collapsed(8, 3);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        adapter.apply(&parse_pattern("5:6")).unwrap();

        assert_eq!(list.0.expand_clicks.get(), 1);
        assert_eq!(list.states()[6], row("1", TINT));
        assert_eq!(list.states()[7], row("0.25", ""));
    }

    #[test]
    fn test_non_canonical_index_matches_nothing() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(3);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        adapter.apply(&parse_pattern("5:01")).unwrap();

        assert_eq!(list.opacities(), vec!["0.25", "0.25", "0.25"]);
    }

    #[test]
    fn test_custom_style_is_used() {
        let style = RowStyleConfig {
            full_opacity: "0.9".into(),
            dimmed_opacity: "0.1".into(),
            highlight_background: "yellow".into(),
        };
        let list = FakeList::new(2);
        let mut adapter = ListViewAdapter::new(list.clone(), &style);

        adapter.apply(&parse_pattern("1:1")).unwrap();
        assert_eq!(list.states(), vec![row("0.1", ""), row("0.9", "yellow")]);
    }

    #[test]
    fn test_forced_render_restores_scroll() {
        let style = RowStyleConfig::default();
        let list = FakeList::new(2);
        list.0.scroll_top.set(120.0);
        let adapter = ListViewAdapter::new(list.clone(), &style);

        let saved = adapter.begin_forced_render();
        assert_eq!(list.0.scroll_top.get(), 2400.0);
        adapter.finish_forced_render(saved);

        assert_eq!(list.0.scroll_top.get(), 120.0);
        assert_eq!(*list.0.scroll_log.borrow(), vec![2400.0, 120.0]);
    }
}
