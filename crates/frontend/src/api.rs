//! JavaScript entry point: `MobileOverlays.install(config?)`.

use crate::shared::lazy_images::LazyImages;
use crate::shared::overlay::OverlayCoordinator;
use crate::shared::touch_feedback::TouchFeedback;
use crate::shared::web_host::observer::TreeObserver;
use crate::shared::web_host::WebHost;
use contracts::shared::overlay_config::{load_config, OverlayConfig};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// Overlay coordinator installed on the current document, together with the
/// observers feeding it.
///
/// Dropping it (or calling `shutdown`) disconnects everything and releases
/// the scroll lock.
#[wasm_bindgen]
pub struct MobileOverlays {
    coordinator: OverlayCoordinator<WebHost>,
    observer: Option<TreeObserver>,
    _touch: Option<TouchFeedback>,
    _images: Option<Rc<LazyImages>>,
}

/// Parse a config object coming from JavaScript; anything unusable falls
/// back to the defaults.
fn config_from_js(value: JsValue) -> OverlayConfig {
    if value.is_undefined() || value.is_null() {
        return OverlayConfig::default();
    }
    if let Some(json) = value.as_string() {
        return load_config(Some(&json)).unwrap_or_else(|err| {
            log::warn!("overlay config rejected, using defaults: {err:#}");
            OverlayConfig::default()
        });
    }
    let config: OverlayConfig = match serde_wasm_bindgen::from_value(value) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("overlay config rejected, using defaults: {err}");
            return OverlayConfig::default();
        }
    };
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::warn!("overlay config rejected, using defaults: {err:#}");
            OverlayConfig::default()
        }
    }
}

#[wasm_bindgen]
impl MobileOverlays {
    /// Install on the current document. `config` may be omitted, a JSON
    /// string or a plain object.
    pub fn install(config: JsValue) -> Result<MobileOverlays, JsValue> {
        Self::with_config(config_from_js(config))
    }

    /// Manually optimize an overlay the tree watcher cannot see.
    pub fn optimize(&self, element: &Element) {
        self.coordinator.optimize(element);
    }

    #[wasm_bindgen(js_name = isMobile)]
    pub fn is_mobile(&self) -> bool {
        self.coordinator.is_mobile()
    }

    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self) -> bool {
        self.coordinator.is_locked()
    }

    #[wasm_bindgen(js_name = openCount)]
    pub fn open_count(&self) -> usize {
        self.coordinator.open_count()
    }

    /// Close the topmost overlay, as Escape would.
    #[wasm_bindgen(js_name = closeTop)]
    pub fn close_top(&self) {
        self.coordinator.close_top();
    }

    pub fn shutdown(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.coordinator.shutdown();
    }
}

impl MobileOverlays {
    pub fn with_config(config: OverlayConfig) -> Result<MobileOverlays, JsValue> {
        let host = WebHost::new().ok_or_else(|| JsValue::from_str("no window/document"))?;
        let document = host.document().clone();
        let touch = TouchFeedback::install(&document, &config.touch);
        let images = LazyImages::install(&config.lazy_images).map(Rc::new);

        let coordinator = OverlayCoordinator::new(host, config);
        coordinator.start();

        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;
        if let Some(images) = &images {
            images.observe_within(&root);
        }
        let on_added = images.clone().map(|images| {
            Box::new(move |element: &Element| images.observe_within(element))
                as Box<dyn Fn(&Element)>
        });
        let observer = TreeObserver::observe(&coordinator, &root, on_added)?;

        log::info!(
            "mobile overlays installed ({} px breakpoint, {} open)",
            coordinator.config().mobile_breakpoint_px,
            coordinator.open_count()
        );
        Ok(Self {
            coordinator,
            observer: Some(observer),
            _touch: touch,
            _images: images,
        })
    }

    pub fn coordinator(&self) -> &OverlayCoordinator<WebHost> {
        &self.coordinator
    }
}

impl Drop for MobileOverlays {
    fn drop(&mut self) {
        self.shutdown();
    }
}
