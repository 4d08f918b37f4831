//! Pressed-state feedback for touch input.
//!
//! One delegated listener pair on the document; the element nearest to the
//! touch target that matches the configured selectors gets the active class
//! until the touch ends.

use contracts::shared::overlay_config::TouchConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

type Listener = Closure<dyn FnMut(Event)>;

pub struct TouchFeedback {
    document: Document,
    listeners: Vec<(&'static [&'static str], Listener)>,
}

/// Selector group for the configured targets, `None` when there is nothing to track.
pub fn target_selector(config: &TouchConfig) -> Option<String> {
    let selectors: Vec<&str> = config
        .selectors
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if selectors.is_empty() {
        None
    } else {
        Some(selectors.join(", "))
    }
}

impl TouchFeedback {
    pub fn install(document: &Document, config: &TouchConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let selector = target_selector(config)?;
        let active_class = config.active_class.clone();
        let pressed: Rc<RefCell<Option<Element>>> = Rc::new(RefCell::new(None));

        let start = {
            let pressed = Rc::clone(&pressed);
            let active_class = active_class.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let target = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest(&selector).ok().flatten());
                if let Some(element) = target {
                    let _ = element.class_list().add_1(&active_class);
                    if let Some(previous) = pressed.borrow_mut().replace(element) {
                        let _ = previous.class_list().remove_1(&active_class);
                    }
                }
            }) as Box<dyn FnMut(_)>)
        };

        let end = {
            let pressed = Rc::clone(&pressed);
            Closure::wrap(Box::new(move |_event: Event| {
                if let Some(element) = pressed.borrow_mut().take() {
                    let _ = element.class_list().remove_1(&active_class);
                }
            }) as Box<dyn FnMut(_)>)
        };

        let mut feedback = Self {
            document: document.clone(),
            listeners: Vec::new(),
        };
        feedback.add(&["touchstart"], start);
        feedback.add(&["touchend", "touchcancel"], end);
        Some(feedback)
    }

    fn add(&mut self, events: &'static [&'static str], listener: Listener) {
        for event in events {
            if let Err(err) = self
                .document
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::warn!("touch feedback: listen {event}: {err:?}");
            }
        }
        self.listeners.push((events, listener));
    }
}

impl Drop for TouchFeedback {
    fn drop(&mut self) {
        for (events, listener) in &self.listeners {
            for event in events.iter() {
                let _ = self
                    .document
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
        }
    }
}
