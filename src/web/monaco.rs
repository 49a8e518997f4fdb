//! MonacoEditor: `StructuredEditor` over the page's global `monaco` object
//!
//! Monaco is loaded by the host page, so everything goes through `Reflect`
//! rather than typed bindings.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::{HighlightError, HighlightResult};
use crate::surface::{CursorPoint, StructuredEditor};

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn method(target: &JsValue, name: &str) -> HighlightResult<Function> {
    get(target, name)
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| HighlightError::missing(format!("editor method {}", name)))
}

/// `{selectionStartLineNumber, selectionStartColumn, positionLineNumber, positionColumn}`
fn selection_object(point: CursorPoint) -> JsValue {
    let obj = Object::new();
    let line = JsValue::from(point.line);
    let column = JsValue::from(point.column);
    let fields = [
        ("selectionStartLineNumber", &line),
        ("selectionStartColumn", &column),
        ("positionLineNumber", &line),
        ("positionColumn", &column),
    ];
    for (key, value) in fields {
        if let Err(err) = Reflect::set(&obj, &JsValue::from_str(key), value) {
            tracing::trace!(key, error = ?err, "selection field not set");
        }
    }
    obj.into()
}

#[derive(Clone)]
pub struct MonacoEditor {
    inner: JsValue,
}

impl MonacoEditor {
    /// First instance from `monaco.editor.getEditors()`, if Monaco is loaded and has one.
    pub fn first() -> Option<Self> {
        let monaco = get(&js_sys::global(), "monaco")?;
        let namespace = get(&monaco, "editor")?;
        let get_editors = method(&namespace, "getEditors").ok()?;
        let editors: Array = get_editors.call0(&namespace).ok()?.dyn_into().ok()?;
        let first = editors.get(0);
        if first.is_undefined() || first.is_null() {
            return None;
        }
        Some(Self { inner: first })
    }

    fn call0(&self, name: &str) -> HighlightResult<JsValue> {
        Ok(method(&self.inner, name)?.call0(&self.inner)?)
    }

    fn call1(&self, name: &str, arg: &JsValue) -> HighlightResult<JsValue> {
        Ok(method(&self.inner, name)?.call1(&self.inner, arg)?)
    }

    fn find_action(&self, id: &str) -> Option<JsValue> {
        let actions: Array = self.call0("getSupportedActions").ok()?.dyn_into().ok()?;
        actions
            .iter()
            .find(|action| get(action, "id").and_then(|v| v.as_string()).as_deref() == Some(id))
    }
}

impl StructuredEditor for MonacoEditor {
    fn text(&self) -> Option<String> {
        let model = self.call0("getModel").ok()?;
        if model.is_null() || model.is_undefined() {
            return None;
        }
        method(&model, "getValue").ok()?.call0(&model).ok()?.as_string()
    }

    fn set_selection(&self, point: CursorPoint) -> HighlightResult<()> {
        self.call1("setSelection", &selection_object(point))?;
        Ok(())
    }

    fn set_selections(&self, points: &[CursorPoint]) -> HighlightResult<()> {
        let selections: Array = points.iter().map(|p| selection_object(*p)).collect();
        self.call1("setSelections", &selections)?;
        Ok(())
    }

    fn has_command(&self, id: &str) -> bool {
        self.find_action(id).is_some()
    }

    fn run_command(&self, id: &str) -> HighlightResult<()> {
        let action = self.find_action(id).ok_or_else(|| HighlightError::missing(id))?;
        // `run` returns a promise; it is not awaited
        method(&action, "run")?.call0(&action)?;
        Ok(())
    }
}
