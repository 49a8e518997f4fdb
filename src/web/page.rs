//! WebPage: `HostPage` over the live document

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::config::SelectorConfig;
use crate::surface::{HostPage, RowStyle, RuleListView};
use crate::web::monaco::MonacoEditor;

#[derive(Clone)]
pub struct WebPage {
    document: Document,
    selectors: SelectorConfig,
    scroll_overshoot_px: f64,
}

impl WebPage {
    pub fn new(document: Document, selectors: SelectorConfig, scroll_overshoot_px: f64) -> Self {
        Self {
            document,
            selectors,
            scroll_overshoot_px,
        }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Element the input control goes in front of: the mount container's next sibling
    pub fn control_anchor(&self) -> Option<Element> {
        self.query(&self.selectors.mount)?.next_element_sibling()
    }

    pub fn is_mount_ready(&self) -> bool {
        self.query(&self.selectors.mount).is_some()
    }
}

impl HostPage for WebPage {
    type Editor = MonacoEditor;
    type List = DomRuleList;

    fn active_editor(&self) -> Option<MonacoEditor> {
        MonacoEditor::first()
    }

    fn rule_list(&self) -> Option<DomRuleList> {
        let container = self.query(&self.selectors.rule_rows)?;
        Some(DomRuleList {
            container,
            controls: self.control_anchor(),
            scroller: self.query(&self.selectors.scroll_container),
            overshoot: self.scroll_overshoot_px,
        })
    }
}

// =============================================================================
// Rule rows
// =============================================================================

/// Styled element of one row; rows without a first element child are inert
pub struct DomRow(Option<HtmlElement>);

impl DomRow {
    fn set(&self, property: &str, value: &str) {
        if let Some(el) = &self.0 {
            // An empty value removes the inline declaration
            if let Err(err) = el.style().set_property(property, value) {
                tracing::trace!(property, error = ?err, "row style not written");
            }
        }
    }
}

impl RowStyle for DomRow {
    fn set_opacity(&self, value: &str) {
        self.set("opacity", value);
    }

    fn set_background(&self, value: &str) {
        self.set("background-color", value);
    }
}

pub struct DomRuleList {
    container: Element,
    /// Holds the header action buttons; the second one toggles the extra rows
    controls: Option<Element>,
    scroller: Option<Element>,
    overshoot: f64,
}

impl RuleListView for DomRuleList {
    type Row = DomRow;

    fn rows(&self) -> Option<Vec<DomRow>> {
        let children = self.container.children();
        let rows = (0..children.length())
            .map(|i| {
                let styled = children
                    .item(i)
                    .and_then(|child| child.first_element_child())
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok());
                DomRow(styled)
            })
            .collect();
        Some(rows)
    }

    fn expand_rows(&self) -> bool {
        let Some(controls) = &self.controls else {
            return false;
        };
        let Ok(buttons) = controls.query_selector_all("button") else {
            return false;
        };
        if buttons.length() < 2 {
            return false;
        }
        match buttons.item(1).and_then(|b| b.dyn_into::<HtmlElement>().ok()) {
            Some(button) => {
                button.click();
                true
            }
            None => false,
        }
    }

    fn scroll_to_end(&self) -> Option<f64> {
        let scroller = self.scroller.as_ref()?;
        let original = f64::from(scroller.scroll_top());
        let options = ScrollToOptions::new();
        options.set_top(f64::from(scroller.scroll_height()) + self.overshoot);
        options.set_behavior(ScrollBehavior::Smooth);
        scroller.scroll_to_with_scroll_to_options(&options);
        Some(original)
    }

    fn scroll_to(&self, top: f64) {
        if let Some(scroller) = &self.scroller {
            scroller.scroll_to_with_x_and_y(0.0, top);
        }
    }
}
