//! chatwidget-web: Browser front end for the chat widget
//!
//! Binds [`ChatController`] to the hosting page:
//! - [`DomView`] renders bubbles into the page's message list
//! - [`FetchTransport`] posts messages with `fetch`
//! - [`mount`] wires the form's `submit` and the window's `load` events

mod dom;
mod fetch;

pub use dom::DomView;
pub use fetch::FetchTransport;

use chatwidget_engine::{ChatController, ChatTransport, ConfigError, WidgetConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, Window};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Errors raised while attaching the widget to a page.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// No `window`/`document` (not running in a page).
    #[error("No browser document available")]
    NoDocument,

    /// An element of the DOM contract is absent.
    #[error("Element not found: #{0}")]
    MissingElement(String),

    /// An element exists but has the wrong tag.
    #[error("Element has unexpected type: #{0}")]
    WrongElementType(String),

    /// Configuration JSON was rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A DOM call failed.
    #[error("DOM error: {0}")]
    Js(String),
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Handle to a mounted widget.
///
/// Dropping it detaches the event listeners.
#[wasm_bindgen]
pub struct ChatWidget {
    window: Window,
    form: Element,
    controller: Rc<RefCell<ChatController<DomView>>>,
    on_submit: Closure<dyn FnMut(Event)>,
    on_load: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl ChatWidget {
    /// Whether a reply is pending.
    #[wasm_bindgen(js_name = isWaiting)]
    pub fn is_waiting(&self) -> bool {
        self.controller
            .try_borrow()
            .map(|ctl| ctl.is_waiting())
            .unwrap_or(true)
    }
}

impl Drop for ChatWidget {
    fn drop(&mut self) {
        let _ = self.form.remove_event_listener_with_callback(
            "submit",
            self.on_submit.as_ref().unchecked_ref(),
        );
        if let Some(on_load) = &self.on_load {
            let _ = self
                .window
                .remove_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
        }
    }
}

/// Attach the widget to the current page.
///
/// `config_json` is an optional [`WidgetConfig`] in JSON; missing fields take
/// their defaults.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<ChatWidget, JsValue> {
    let config = match config_json {
        Some(json) => WidgetConfig::from_json(&json).map_err(MountError::from)?,
        None => WidgetConfig::default(),
    };
    mount_with(&config).map_err(|err| {
        web_sys::console::error_1(&format!("chatwidget: {err}").into());
        JsValue::from(err)
    })
}

/// Attach the widget using an already-parsed configuration.
pub fn mount_with(config: &WidgetConfig) -> Result<ChatWidget, MountError> {
    let window = web_sys::window().ok_or(MountError::NoDocument)?;
    let document = window.document().ok_or(MountError::NoDocument)?;

    let form = document
        .get_element_by_id(&config.dom.form)
        .ok_or_else(|| MountError::MissingElement(config.dom.form.clone()))?;
    let view = DomView::bind(
        document.clone(),
        &config.dom,
        config.avatar_url.clone(),
        config.locale.direction(),
    )?;
    let input = view.input().clone();

    let controller = Rc::new(RefCell::new(ChatController::new(view, config.strings())));
    let transport = Rc::new(FetchTransport::new(config.endpoint.clone()));

    let on_submit = {
        let controller = controller.clone();
        Closure::<dyn FnMut(_)>::new(move |event: Event| {
            event.prevent_default();

            let Ok(request) = controller.borrow_mut().begin_turn(&input.value()) else {
                return;
            };

            let controller = controller.clone();
            let transport = transport.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match transport.post(&request).await {
                    Ok(response) => {
                        controller.borrow_mut().response_arrived();
                        transport.read(response).await
                    }
                    Err(err) => Err(err),
                };
                controller.borrow_mut().finish_turn(result);
            });
        })
    };
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(|e| MountError::Js(js_err(&e)))?;

    let on_load = if document.ready_state() == "complete" {
        controller.borrow_mut().greet();
        None
    } else {
        let controller = controller.clone();
        let on_load = Closure::<dyn FnMut()>::new(move || {
            controller.borrow_mut().greet();
        });
        window
            .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
            .map_err(|e| MountError::Js(js_err(&e)))?;
        Some(on_load)
    };

    tracing::debug!(endpoint = %config.endpoint, "chat widget mounted");

    Ok(ChatWidget {
        window,
        form,
        controller,
        on_submit,
        on_load,
    })
}

/// Human-readable text of a JS exception.
pub(crate) fn js_err(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
