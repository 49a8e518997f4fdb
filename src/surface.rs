//! Surface detection and the capability interfaces shared by both adapters.
//!
//! The host page shows the rule list either as draggable rows or as JSON in a
//! structured editor, never both. [`detect`] picks the live one per event.

use crate::error::HighlightResult;
use crate::pattern::Selection;

// =============================================================================
// Capabilities
// =============================================================================

/// Something that can show and clear a highlight selection
pub trait Highlighter {
    fn apply(&mut self, selection: &Selection) -> HighlightResult<()>;
    fn restore(&mut self) -> HighlightResult<()>;
}

/// A rule row's mutable visual style
pub trait RowStyle {
    fn set_opacity(&self, value: &str);
    /// Empty string clears the tint
    fn set_background(&self, value: &str);
}

/// The list-view surface: one row per rule, in list order
pub trait RuleListView {
    type Row: RowStyle;

    /// Styled element of every rendered row, in position order.
    /// `None` when the row container is absent.
    fn rows(&self) -> Option<Vec<Self::Row>>;

    /// Invoke the control that expands the extra rows, returning whether it exists.
    fn expand_rows(&self) -> bool;

    /// Scroll the page to its end, returning the position to come back to.
    /// `None` when there is nothing to scroll.
    fn scroll_to_end(&self) -> Option<f64>;

    fn scroll_to(&self, top: f64);
}

/// 1-based editor position. `(0, 0)` is the neutral point the editor clamps to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPoint {
    pub line: u32,
    pub column: u32,
}

impl CursorPoint {
    pub const NEUTRAL: CursorPoint = CursorPoint { line: 0, column: 0 };

    pub fn line_start(line: u32) -> Self {
        Self { line, column: 1 }
    }
}

pub const FOLD_COMMAND: &str = "editor.fold";
pub const UNFOLD_ALL_COMMAND: &str = "editor.unfoldAll";

/// The structured-editor surface
pub trait StructuredEditor {
    /// Current text of the editor model, `None` if there is no model
    fn text(&self) -> Option<String>;

    /// Collapse everything to a single point
    fn set_selection(&self, point: CursorPoint) -> HighlightResult<()>;

    /// Replace the selection with one zero-width cursor per point
    fn set_selections(&self, points: &[CursorPoint]) -> HighlightResult<()>;

    fn has_command(&self, id: &str) -> bool;

    /// Run a named editor command; `MissingCapability` if it is not supported
    fn run_command(&self, id: &str) -> HighlightResult<()>;
}

/// Access to whatever the host page currently renders
pub trait HostPage {
    type Editor: StructuredEditor;
    type List: RuleListView;

    /// First live editor instance, if any
    fn active_editor(&self) -> Option<Self::Editor>;

    /// The list surface, `None` when the page has no list markup
    fn rule_list(&self) -> Option<Self::List>;
}

// =============================================================================
// Detection
// =============================================================================

/// The live rendering surface
#[derive(Debug)]
pub enum Surface<E> {
    ListView,
    StructuredEditor(E),
}

/// Which surface handled an event, without the editor handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    ListView,
    StructuredEditor,
}

impl<E> Surface<E> {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Surface::ListView => SurfaceKind::ListView,
            Surface::StructuredEditor(_) => SurfaceKind::StructuredEditor,
        }
    }
}

/// An obtainable editor wins; otherwise the list view is assumed.
pub fn detect<H: HostPage>(host: &H) -> Surface<H::Editor> {
    match host.active_editor() {
        Some(editor) => Surface::StructuredEditor(editor),
        None => Surface::ListView,
    }
}
