//! `OverlayHost` over the real browser DOM.

pub mod observer;

use crate::shared::overlay::{Handler, HostEvent, OverlayHost, Task};
use gloo_timers::future::TimeoutFuture;
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, HtmlElement, KeyboardEvent, Window};

type DocumentListener = (String, Closure<dyn FnMut(Event)>);

pub struct WebHost {
    window: Window,
    document: Document,
    document_listeners: RefCell<Vec<DocumentListener>>,
}

impl WebHost {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            document_listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.release_document_listeners();
    }
}

fn host_event(event: &Event) -> HostEvent {
    let key = event.dyn_ref::<KeyboardEvent>().map(|k| k.key());
    let on_self = match (event.target(), event.current_target()) {
        (Some(target), Some(current)) => target == current,
        _ => false,
    };
    HostEvent { key, on_self }
}

fn wrap(mut handler: Handler) -> Closure<dyn FnMut(Event)> {
    Closure::wrap(Box::new(move |event: Event| handler(&host_event(&event))) as Box<dyn FnMut(_)>)
}

impl OverlayHost for WebHost {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn document_root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn matches(&self, node: &Element, selector: &str) -> bool {
        node.matches(selector).unwrap_or(false)
    }

    fn query(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, scope: &Element, selector: &str) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(selector) else {
            log::warn!("invalid selector `{selector}`");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            log::warn!("set attribute {name}: {err:?}");
        }
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = element.style().set_property(property, value) {
            log::warn!("set style {property}: {err:?}");
        }
    }

    fn computed_style(&self, node: &Element, property: &str) -> String {
        self.window
            .get_computed_style(node)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn prepend_element(&self, parent: &Element, class: &str) -> Option<Element> {
        let element = self.document.create_element("div").ok()?;
        element.set_class_name(class);
        let _ = element.set_attribute("aria-hidden", "true");
        parent.prepend_with_node_1(&element).ok()?;
        Some(element)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .or_else(|| {
                self.document
                    .document_element()
                    .map(|root| f64::from(root.client_width()))
            })
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn listen(&self, node: &Element, event: &str, handler: Handler) {
        let closure = wrap(handler);
        if let Err(err) =
            node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("listen {event}: {err:?}");
            return;
        }
        // Lives as long as the element does.
        closure.forget();
    }

    fn listen_document(&self, event: &str, handler: Handler) {
        let closure = wrap(handler);
        if let Err(err) = self
            .document
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("listen document {event}: {err:?}");
            return;
        }
        self.document_listeners
            .borrow_mut()
            .push((event.to_string(), closure));
    }

    fn release_document_listeners(&self) {
        for (event, closure) in self.document_listeners.borrow_mut().drain(..) {
            let _ = self
                .document
                .remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref());
        }
    }

    fn dispatch(&self, node: &Element, event: &str) {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        match CustomEvent::new_with_event_init_dict(event, &init) {
            Ok(custom) => {
                let _ = node.dispatch_event(&custom);
            }
            Err(err) => log::warn!("dispatch {event}: {err:?}"),
        }
    }

    fn defer(&self, delay_ms: u32, task: Task) {
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            task();
        });
    }
}
