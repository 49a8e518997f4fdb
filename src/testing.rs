//! In-memory stand-ins for the host page, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::{HighlightError, HighlightResult};
use crate::surface::{
    CursorPoint, HostPage, RowStyle, RuleListView, StructuredEditor, FOLD_COMMAND,
    UNFOLD_ALL_COMMAND,
};

// =============================================================================
// List view
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowState {
    pub opacity: String,
    pub background: String,
}

#[derive(Debug, Clone)]
pub struct FakeRow(Rc<RefCell<RowState>>);

impl FakeRow {
    pub fn state(&self) -> RowState {
        self.0.borrow().clone()
    }
}

impl RowStyle for FakeRow {
    fn set_opacity(&self, value: &str) {
        self.0.borrow_mut().opacity = value.to_string();
    }

    fn set_background(&self, value: &str) {
        self.0.borrow_mut().background = value.to_string();
    }
}

#[derive(Debug)]
pub struct ListState {
    pub rows: Vec<FakeRow>,
    /// Rows past this count stay hidden until the expand control is clicked
    pub rendered: Cell<usize>,
    pub has_expand_control: bool,
    pub expand_clicks: Cell<usize>,
    pub scroll_top: Cell<f64>,
    pub scroll_height: f64,
    pub scroll_log: RefCell<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct FakeList(pub Rc<ListState>);

impl FakeList {
    pub fn new(count: usize) -> Self {
        let rows = (0..count)
            .map(|_| {
                FakeRow(Rc::new(RefCell::new(RowState {
                    opacity: "1".to_string(),
                    background: String::new(),
                })))
            })
            .collect();
        Self(Rc::new(ListState {
            rows,
            rendered: Cell::new(count),
            has_expand_control: true,
            expand_clicks: Cell::new(0),
            scroll_top: Cell::new(0.0),
            scroll_height: 2400.0,
            scroll_log: RefCell::new(Vec::new()),
        }))
    }

    /// Only the first `visible` rows render until expanded
    pub fn collapsed(count: usize, visible: usize) -> Self {
        let list = Self::new(count);
        list.0.rendered.set(visible);
        list
    }

    pub fn states(&self) -> Vec<RowState> {
        self.0.rows.iter().map(FakeRow::state).collect()
    }

    pub fn opacities(&self) -> Vec<String> {
        self.states().into_iter().map(|s| s.opacity).collect()
    }
}

impl RuleListView for FakeList {
    type Row = FakeRow;

    fn rows(&self) -> Option<Vec<FakeRow>> {
        Some(self.0.rows.iter().take(self.0.rendered.get()).cloned().collect())
    }

    fn expand_rows(&self) -> bool {
        if !self.0.has_expand_control {
            return false;
        }
        self.0.expand_clicks.set(self.0.expand_clicks.get() + 1);
        self.0.rendered.set(self.0.rows.len());
        true
    }

    fn scroll_to_end(&self) -> Option<f64> {
        let original = self.0.scroll_top.get();
        self.scroll_to(self.0.scroll_height);
        Some(original)
    }

    fn scroll_to(&self, top: f64) {
        self.0.scroll_top.set(top);
        self.0.scroll_log.borrow_mut().push(top);
    }
}

// =============================================================================
// Structured editor
// =============================================================================

#[derive(Debug)]
pub struct EditorState {
    pub text: RefCell<String>,
    pub selections: RefCell<Vec<CursorPoint>>,
    /// Lines whose region is currently folded
    pub folded: RefCell<BTreeSet<u32>>,
    pub commands: RefCell<Vec<String>>,
    pub log: RefCell<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct FakeEditor(pub Rc<EditorState>);

impl FakeEditor {
    pub fn new(text: &str) -> Self {
        Self(Rc::new(EditorState {
            text: RefCell::new(text.to_string()),
            selections: RefCell::new(vec![CursorPoint::NEUTRAL]),
            folded: RefCell::new(BTreeSet::new()),
            commands: RefCell::new(vec![FOLD_COMMAND.to_string(), UNFOLD_ALL_COMMAND.to_string()]),
            log: RefCell::new(Vec::new()),
        }))
    }

    pub fn without_command(self, id: &str) -> Self {
        self.0.commands.borrow_mut().retain(|c| c != id);
        self
    }

    pub fn folded(&self) -> Vec<u32> {
        self.0.folded.borrow().iter().copied().collect()
    }

    pub fn selections(&self) -> Vec<CursorPoint> {
        self.0.selections.borrow().clone()
    }

    pub fn log(&self) -> Vec<String> {
        self.0.log.borrow().clone()
    }
}

impl StructuredEditor for FakeEditor {
    fn text(&self) -> Option<String> {
        Some(self.0.text.borrow().clone())
    }

    fn set_selection(&self, point: CursorPoint) -> HighlightResult<()> {
        self.0.log.borrow_mut().push("setSelection".into());
        *self.0.selections.borrow_mut() = vec![point];
        Ok(())
    }

    fn set_selections(&self, points: &[CursorPoint]) -> HighlightResult<()> {
        if points.is_empty() {
            return Err(HighlightError::Js("Invalid arguments".into()));
        }
        self.0.log.borrow_mut().push("setSelections".into());
        *self.0.selections.borrow_mut() = points.to_vec();
        Ok(())
    }

    fn has_command(&self, id: &str) -> bool {
        self.0.commands.borrow().iter().any(|c| c == id)
    }

    fn run_command(&self, id: &str) -> HighlightResult<()> {
        if !self.has_command(id) {
            return Err(HighlightError::missing(id));
        }
        self.0.log.borrow_mut().push(id.to_string());
        match id {
            FOLD_COMMAND => {
                let lines: Vec<u32> = self
                    .0
                    .selections
                    .borrow()
                    .iter()
                    .filter(|p| p.line > 0)
                    .map(|p| p.line)
                    .collect();
                self.0.folded.borrow_mut().extend(lines);
            }
            UNFOLD_ALL_COMMAND => self.0.folded.borrow_mut().clear(),
            _ => {}
        }
        Ok(())
    }
}

// =============================================================================
// Page
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub list: Option<FakeList>,
    pub editor: Option<FakeEditor>,
}

impl FakePage {
    pub fn with_rows(count: usize) -> Self {
        Self {
            list: Some(FakeList::new(count)),
            editor: None,
        }
    }

    pub fn list(&self) -> &FakeList {
        self.list.as_ref().expect("page has a list")
    }
}

impl HostPage for FakePage {
    type Editor = FakeEditor;
    type List = FakeList;

    fn active_editor(&self) -> Option<FakeEditor> {
        self.editor.clone()
    }

    fn rule_list(&self) -> Option<FakeList> {
        self.list.clone()
    }
}

/// Pretty JSON array of `count` rule objects, as the host editor shows it
pub fn rules_json(count: usize) -> String {
    let rules: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "if": [{"==": [{"request": "path"}, format!("/route-{}", i)]}],
                "caching": {"max_age": {"200": "1d"}},
                "headers": ["x-a", "x-b"],
            })
        })
        .collect();
    serde_json::to_string_pretty(&rules).expect("rules serialize")
}
