//! DOM rendering of the chat widget.
//!
//! Bubble markup mirrors the hosting page's Tailwind classes. All message
//! text goes through `textContent`, never `innerHTML`.

use chatwidget_engine::{ChatView, Direction, DomIds, Message};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

use crate::{js_err, MountError};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const ROW_CLASS: &str = "flex items-start gap-4";
const AVATAR_BASE_CLASS: &str =
    "w-10 h-10 rounded-full flex-shrink-0 flex items-center justify-center overflow-hidden";
const BUBBLE_BASE_CLASS: &str = "p-4 rounded-2xl max-w-md";

/// Renders the conversation into the hosting page.
pub struct DomView {
    document: Document,
    messages: Element,
    input: HtmlInputElement,
    send_button: HtmlButtonElement,
    avatar_url: String,
    direction: Direction,
}

impl DomView {
    /// Create a view over already-resolved elements.
    pub fn new(
        document: Document,
        messages: Element,
        input: HtmlInputElement,
        send_button: HtmlButtonElement,
        avatar_url: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            document,
            messages,
            input,
            send_button,
            avatar_url: avatar_url.into(),
            direction,
        }
    }

    /// Resolve the widget's elements by id.
    pub fn bind(
        document: Document,
        ids: &DomIds,
        avatar_url: impl Into<String>,
        direction: Direction,
    ) -> Result<Self, MountError> {
        let messages = element_by_id(&document, &ids.messages)?;
        let input = element_by_id(&document, &ids.input)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| MountError::WrongElementType(ids.input.clone()))?;
        let send_button = element_by_id(&document, &ids.send_button)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| MountError::WrongElementType(ids.send_button.clone()))?;

        Ok(Self::new(
            document,
            messages,
            input,
            send_button,
            avatar_url,
            direction,
        ))
    }

    /// The text input bound to this view.
    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    /// The scrolling message container.
    pub fn messages(&self) -> &Element {
        &self.messages
    }

    fn scroll_to_bottom(&self) {
        self.messages.set_scroll_top(self.messages.scroll_height());
    }

    fn div(&self, class: &str) -> Result<Element, JsValue> {
        let div = self.document.create_element("div")?;
        div.set_class_name(class);
        Ok(div)
    }

    fn bot_avatar(&self) -> Result<Element, JsValue> {
        let holder = self.div(&format!("{AVATAR_BASE_CLASS} bg-gray-600"))?;
        let img = self.document.create_element("img")?;
        img.set_attribute("src", &self.avatar_url)?;
        img.set_attribute("alt", "AI Avatar")?;
        img.set_class_name("w-full h-full rounded-full object-cover");
        holder.append_child(&img)?;
        Ok(holder)
    }

    fn user_avatar(&self) -> Result<Element, JsValue> {
        let holder = self.div(&format!("{AVATAR_BASE_CLASS} bg-blue-600"))?;
        let svg = self.document.create_element_ns(Some(SVG_NS), "svg")?;
        for (name, value) in [
            ("width", "20"),
            ("height", "20"),
            ("viewBox", "0 0 24 24"),
            ("fill", "none"),
            ("stroke", "currentColor"),
            ("stroke-width", "2"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ] {
            svg.set_attribute(name, value)?;
        }

        let path = self.document.create_element_ns(Some(SVG_NS), "path")?;
        path.set_attribute("d", "M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2")?;
        svg.append_child(&path)?;

        let circle = self.document.create_element_ns(Some(SVG_NS), "circle")?;
        circle.set_attribute("cx", "12")?;
        circle.set_attribute("cy", "7")?;
        circle.set_attribute("r", "4")?;
        svg.append_child(&circle)?;

        holder.append_child(&svg)?;
        Ok(holder)
    }

    fn bubble(
        &self,
        is_user: bool,
        text: &str,
        text_class: Option<&str>,
    ) -> Result<Element, JsValue> {
        let tone = if is_user {
            "bg-blue-600 rounded-br-none"
        } else {
            "bg-slate-700 rounded-bl-none"
        };
        let bubble = self.div(&format!("{BUBBLE_BASE_CLASS} {tone}"))?;
        bubble.set_attribute("dir", self.direction.as_attr())?;

        let paragraph = self.document.create_element("p")?;
        if let Some(class) = text_class {
            paragraph.set_class_name(class);
        }
        paragraph.set_text_content(Some(text));
        bubble.append_child(&paragraph)?;
        Ok(bubble)
    }

    fn render_message(&self, message: &Message) -> Result<Element, JsValue> {
        let is_user = message.sender.is_user();
        let row = if is_user {
            self.div(&format!("{ROW_CLASS} justify-end"))?
        } else {
            self.div(ROW_CLASS)?
        };

        let bubble = self.bubble(is_user, &message.text, None)?;
        if is_user {
            row.append_child(&bubble)?;
            let avatar: Element = self.user_avatar()?;
            row.append_child(&avatar)?;
        } else {
            let avatar: Element = self.bot_avatar()?;
            row.append_child(&avatar)?;
            row.append_child(&bubble)?;
        }
        Ok(row)
    }

    fn render_indicator(&self, label: &str) -> Result<Element, JsValue> {
        let row = self.div(ROW_CLASS)?;
        row.set_attribute("aria-live", "polite")?;
        let avatar: Element = self.bot_avatar()?;
        row.append_child(&avatar)?;
        let bubble: Element = self.bubble(false, label, Some("animate-pulse"))?;
        row.append_child(&bubble)?;
        Ok(row)
    }
}

impl ChatView for DomView {
    type Indicator = Option<Element>;

    fn append_message(&mut self, message: &Message) {
        match self.render_message(message) {
            Ok(row) => {
                if let Err(err) = self.messages.append_child(&row) {
                    report("append message", &err);
                }
            }
            Err(err) => report("render message", &err),
        }
        self.scroll_to_bottom();
    }

    fn show_typing_indicator(&mut self, label: &str) -> Option<Element> {
        let indicator = match self.render_indicator(label) {
            Ok(row) => match self.messages.append_child(&row) {
                Ok(_) => Some(row),
                Err(err) => {
                    report("append typing indicator", &err);
                    None
                }
            },
            Err(err) => {
                report("render typing indicator", &err);
                None
            }
        };
        self.scroll_to_bottom();
        indicator
    }

    fn remove_typing_indicator(&mut self, indicator: Option<Element>) {
        if let Some(row) = indicator {
            row.remove();
        }
    }

    fn clear_input(&mut self) {
        self.input.set_value("");
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_button.set_disabled(!enabled);
    }
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, MountError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| MountError::MissingElement(id.to_string()))
}

fn report(what: &str, err: &JsValue) {
    let message = format!("chatwidget: failed to {what}: {}", js_err(err));
    tracing::error!("{message}");
    web_sys::console::error_1(&message.into());
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use chatwidget_engine::DomIds;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(prefix: &str) -> DomView {
        let document = web_sys::window().unwrap().document().unwrap();
        let body = document.body().unwrap();

        let messages = document.create_element("div").unwrap();
        messages.set_id(&format!("{prefix}-messages"));
        body.append_child(&messages).unwrap();

        let input = document.create_element("input").unwrap();
        input.set_id(&format!("{prefix}-input"));
        body.append_child(&input).unwrap();

        let button = document.create_element("button").unwrap();
        button.set_id(&format!("{prefix}-send"));
        body.append_child(&button).unwrap();

        let ids = DomIds {
            form: format!("{prefix}-form"),
            input: format!("{prefix}-input"),
            messages: format!("{prefix}-messages"),
            send_button: format!("{prefix}-send"),
        };
        DomView::bind(document, &ids, "/static/chatbot-icon.png", Direction::Rtl).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_message_text_is_not_markup() {
        let mut view = fixture("markup");
        view.append_message(&Message::user("<b>bold</b><script>x()</script>"));

        let list = view.messages();
        assert_eq!(list.child_element_count(), 1);
        assert!(list.query_selector("b").unwrap().is_none());
        assert!(list.query_selector("script").unwrap().is_none());
        assert!(list
            .text_content()
            .unwrap()
            .contains("<b>bold</b><script>x()</script>"));
    }

    #[wasm_bindgen_test]
    fn test_user_and_bot_alignment() {
        let mut view = fixture("align");
        view.append_message(&Message::user("hi"));
        view.append_message(&Message::bot("hello"));

        let rows = view.messages().children();
        let user_row = rows.item(0).unwrap();
        let bot_row = rows.item(1).unwrap();
        assert!(user_row.class_name().contains("justify-end"));
        assert!(!bot_row.class_name().contains("justify-end"));
        assert!(bot_row.query_selector("img").unwrap().is_some());
        assert!(user_row.query_selector("svg").unwrap().is_some());
    }

    #[wasm_bindgen_test]
    fn test_indicator_removed_by_handle() {
        let mut view = fixture("typing");
        let handle = view.show_typing_indicator("typing");
        assert_eq!(view.messages().child_element_count(), 1);

        view.remove_typing_indicator(handle);
        assert_eq!(view.messages().child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_send_toggle_and_clear() {
        let mut view = fixture("controls");
        view.input().set_value("draft");
        view.clear_input();
        assert_eq!(view.input().value(), "");

        view.set_send_enabled(false);
        view.set_send_enabled(true);
        let button = web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .get_element_by_id("controls-send")
            .unwrap()
            .dyn_into::<HtmlButtonElement>()
            .unwrap();
        assert!(!button.disabled());
    }
}
