//! Browser integration.
//!
//! The page provides a `canvas.webgl`, a `<textarea>` with a `#submit` button,
//! `.theme` buttons whose ids are theme ids and two groups of tooltips
//! (`.tooltip`, `.mobile-tooltip`). DOM listeners forward input to the event
//! loop as [`UiEvent`]s.

use anyhow::{Context as _, anyhow};
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::{
    AddEventListenerOptions, Document, HtmlCanvasElement, HtmlElement, HtmlTextAreaElement,
    KeyboardEvent, TouchEvent,
};
use winit::event_loop::EventLoopProxy;

use crate::{
    controller::UiEvent,
    editor::OPEN_KEY,
    flow::FlowEvent,
    overlay::Overlay,
    viewport::{TooltipMode, Viewport},
};

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn document() -> anyhow::Result<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .context("no document")
}

fn query<T: JsCast>(document: &Document, selector: &str) -> anyhow::Result<T> {
    document
        .query_selector(selector)
        .map_err(js_err)?
        .with_context(|| format!("no element matches {}", selector))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("{} has an unexpected element type", selector))
}

fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn set_display(element: &HtmlElement, value: &str) {
    if let Err(e) = element.style().set_property("display", value) {
        log::warn!("failed to set display of {}: {:?}", element.id(), e);
    }
}

fn is_hidden(element: &HtmlElement) -> bool {
    element
        .style()
        .get_property_value("display")
        .map(|display| display == "none")
        .unwrap_or(false)
}

pub fn canvas() -> anyhow::Result<HtmlCanvasElement> {
    query(&document()?, "canvas.webgl")
}

/// Size of the browser window in CSS pixels.
pub fn initial_viewport() -> Option<Viewport> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width, height, window.device_pixel_ratio()))
}

/// The `<textarea>` and `#submit` button.
pub struct DomOverlay {
    document: Document,
    input: HtmlTextAreaElement,
    submit: HtmlElement,
}

impl DomOverlay {
    /// Finds the elements and hides the input.
    pub fn new() -> anyhow::Result<Self> {
        let document = document()?;
        let input: HtmlTextAreaElement = query(&document, "textarea")?;
        let submit: HtmlElement = query(&document, "#submit")?;
        set_display(&input, "none");
        Ok(Self {
            document,
            input,
            submit,
        })
    }
}

impl Overlay for DomOverlay {
    fn show(&mut self) {
        set_display(&self.input, "block");
        set_display(&self.submit, "block");
        self.input.set_value("");
        if let Err(e) = self.input.focus() {
            log::warn!("failed to focus the text input: {:?}", e);
        }
    }

    fn hide(&mut self) {
        set_display(&self.input, "none");
        set_display(&self.submit, "none");
    }

    fn value(&self) -> String {
        self.input.value()
    }

    fn set_tooltip_mode(&mut self, mode: TooltipMode) {
        let (desktop, mobile) = match mode {
            TooltipMode::Desktop => ("block", "none"),
            TooltipMode::Mobile => ("none", "block"),
        };
        for tooltip in query_all(&self.document, ".tooltip") {
            set_display(&tooltip, desktop);
        }
        for tooltip in query_all(&self.document, ".mobile-tooltip") {
            set_display(&tooltip, mobile);
        }
    }
}

fn send(proxy: &EventLoopProxy<FlowEvent>, event: UiEvent) {
    if proxy.send_event(FlowEvent::Ui(event)).is_err() {
        log::warn!("event loop closed, dropping input");
    }
}

/// Register the window, theme and submit listeners. They live as long as the page.
pub fn install_listeners(proxy: EventLoopProxy<FlowEvent>) -> anyhow::Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = document()?;
    let input: HtmlTextAreaElement = query(&document, "textarea")?;

    {
        let proxy = proxy.clone();
        let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let key = event.key();
            if key == OPEN_KEY && is_hidden(&input) {
                // keep the opening keystroke out of the input it focuses
                event.prevent_default();
            }
            send(&proxy, UiEvent::KeyDown { key, text: None });
        }) as Box<dyn FnMut(KeyboardEvent)>);
        window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .map_err(js_err)?;
        keydown.forget();
    }

    {
        let proxy = proxy.clone();
        let dblclick = Closure::wrap(Box::new(move || {
            send(&proxy, UiEvent::DoubleClick);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("dblclick", dblclick.as_ref().unchecked_ref())
            .map_err(js_err)?;
        dblclick.forget();
    }

    {
        let proxy = proxy.clone();
        let touchstart = Closure::wrap(Box::new(move |event: TouchEvent| {
            // disables the browser's double tap zoom
            event.prevent_default();
            send(
                &proxy,
                UiEvent::TouchStart {
                    timestamp_ms: event.time_stamp(),
                },
            );
        }) as Box<dyn FnMut(TouchEvent)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                touchstart.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_err)?;
        touchstart.forget();
    }

    for theme in query_all(&document, ".theme") {
        let proxy = proxy.clone();
        let id = theme.id();
        let click = Closure::wrap(Box::new(move || {
            send(&proxy, UiEvent::ThemeSelected(id.clone()));
        }) as Box<dyn FnMut()>);
        theme
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .map_err(js_err)?;
        click.forget();
    }

    let submit: HtmlElement = query(&document, "#submit")?;
    let click = Closure::wrap(Box::new(move || {
        send(&proxy, UiEvent::Submit);
    }) as Box<dyn FnMut()>);
    submit
        .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
        .map_err(js_err)?;
    click.forget();

    Ok(())
}
