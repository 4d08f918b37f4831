//! Deferred image loading: `img[data-src]` gets its `src` once it scrolls near
//! the viewport.

use contracts::shared::overlay_config::LazyImageConfig;
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub struct LazyImages {
    source_attribute: String,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
}

/// `img[<attr>]`
pub fn image_selector(source_attribute: &str) -> String {
    format!("img[{source_attribute}]")
}

fn load(image: &Element, source_attribute: &str) {
    if let Some(src) = image.get_attribute(source_attribute) {
        let _ = image.set_attribute("src", &src);
        let _ = image.remove_attribute(source_attribute);
    }
}

fn observer_supported() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
        .unwrap_or(false)
}

impl LazyImages {
    pub fn install(config: &LazyImageConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let source_attribute = config.source_attribute.clone();
        let observer = if observer_supported() {
            match Self::create_observer(config) {
                Ok(observer) => Some(observer),
                Err(err) => {
                    log::warn!("lazy images: observer unavailable: {err:?}");
                    None
                }
            }
        } else {
            None
        };
        Some(Self {
            source_attribute,
            observer,
        })
    }

    fn create_observer(
        config: &LazyImageConfig,
    ) -> Result<(IntersectionObserver, ObserverCallback), JsValue> {
        let source_attribute = config.source_attribute.clone();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let image = entry.target();
                    load(&image, &source_attribute);
                    observer.unobserve(&image);
                }
            },
        ) as Box<dyn FnMut(_, _)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&config.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok((observer, callback))
    }

    /// Watch every pending image in `scope` (including `scope` itself).
    /// Without IntersectionObserver support they are loaded right away.
    pub fn observe_within(&self, scope: &Element) {
        let selector = image_selector(&self.source_attribute);
        let mut images = Vec::new();
        if scope.matches(&selector).unwrap_or(false) {
            images.push(scope.clone());
        }
        if let Ok(list) = scope.query_selector_all(&selector) {
            images.extend(
                (0..list.length())
                    .filter_map(|i| list.get(i))
                    .filter_map(|node| node.dyn_into::<Element>().ok()),
            );
        }

        for image in &images {
            match &self.observer {
                Some((observer, _)) => observer.observe(image),
                None => load(image, &self.source_attribute),
            }
        }
    }
}

impl Drop for LazyImages {
    fn drop(&mut self) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}
