//! Input control: labelled text field with a clear affordance, styled to sit
//! alongside the host page's Material UI form.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::error::{HighlightError, HighlightResult};

pub struct InputControl {
    pub root: Element,
    pub input: HtmlInputElement,
    pub clear: HtmlElement,
}

fn styled(document: &Document, tag: &str, styles: &[(&str, &str)]) -> HighlightResult<HtmlElement> {
    let el = document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| HighlightError::Js(format!("<{}> is not an HTMLElement", tag)))?;
    let style = el.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(el)
}

impl InputControl {
    pub fn build(document: &Document, label_text: &str, placeholder: &str) -> HighlightResult<Self> {
        let root = styled(document, "div", &[("width", "100%"), ("margin-bottom", "10px")])?;

        let label = styled(
            document,
            "label",
            &[
                ("display", "block"),
                ("margin-bottom", "5px"),
                ("font-size", "14px"),
                ("color", "rgba(0, 0, 0, 0.87)"),
                ("font-family", r#""Roboto", "Helvetica", "Arial", sans-serif"#),
                ("line-height", "1.5"),
                ("letter-spacing", "0.00938em"),
            ],
        )?;
        label.set_text_content(Some(label_text));

        let wrapper = styled(document, "div", &[("position", "relative"), ("width", "100%")])?;

        let input: HtmlInputElement = styled(
            document,
            "input",
            &[
                ("width", "100%"),
                ("padding", "10px 30px 10px 10px"),
                ("border", "1px solid rgba(0, 0, 0, 0.23)"),
                ("border-radius", "4px"),
                ("font-size", "16px"),
                ("box-sizing", "border-box"),
            ],
        )?
        .dyn_into()
        .map_err(|_| HighlightError::Js("<input> is not an HTMLInputElement".into()))?;
        input.set_type("text");
        input.set_placeholder(placeholder);

        let clear = styled(
            document,
            "span",
            &[
                ("cursor", "pointer"),
                ("position", "absolute"),
                ("right", "10px"),
                ("top", "50%"),
                ("transform", "translateY(-50%)"),
                ("font-size", "16px"),
                ("color", "rgba(0, 0, 0, 0.54)"),
            ],
        )?;
        clear.set_text_content(Some("\u{2715}"));

        wrapper.append_child(&input)?;
        wrapper.append_child(&clear)?;
        root.append_child(&label)?;
        root.append_child(&wrapper)?;

        Ok(Self {
            root: root.into(),
            input,
            clear,
        })
    }

    /// Insert in front of `anchor`
    pub fn insert_before(&self, anchor: &Element) -> HighlightResult<()> {
        let parent = anchor
            .parent_node()
            .ok_or_else(|| HighlightError::missing("control anchor parent"))?;
        parent.insert_before(&self.root, Some(anchor.as_ref()))?;
        Ok(())
    }
}
