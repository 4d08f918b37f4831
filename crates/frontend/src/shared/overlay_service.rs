use crate::api::MobileOverlays;
use crate::shared::overlay::OverlayHost;
use contracts::shared::overlay_config::OverlayConfig;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use web_sys::Element;

/// The app-wide overlay coordinator, provided through context.
///
/// Constructed once in the app root; components reach it with
/// `use_context::<OverlayService>()` instead of a global.
#[derive(Clone, Copy)]
pub struct OverlayService {
    overlays: StoredValue<Option<MobileOverlays>, LocalStorage>,
}

impl OverlayService {
    pub fn install(config: OverlayConfig) -> Self {
        let overlays = match MobileOverlays::with_config(config) {
            Ok(overlays) => Some(overlays),
            Err(err) => {
                log::error!("overlay coordinator not installed: {err:?}");
                None
            }
        };
        Self {
            overlays: StoredValue::new_local(overlays),
        }
    }

    pub fn optimize(&self, element: &Element) {
        self.overlays.with_value(|overlays| {
            if let Some(overlays) = overlays {
                overlays.optimize(element);
            }
        });
    }

    /// Run the close sequence for a registered overlay root.
    ///
    /// Returns `false` when the element is not a registered overlay, in which
    /// case no `closed` signal will follow.
    pub fn close(&self, element: &Element) -> bool {
        self.overlays.with_value(|overlays| {
            let Some(overlays) = overlays else {
                return false;
            };
            let coordinator = overlays.coordinator();
            if !coordinator.is_registered(element) {
                return false;
            }
            match coordinator.host().key_of(element) {
                Some(key) => {
                    coordinator.close(key);
                    true
                }
                None => false,
            }
        })
    }

    pub fn is_mobile(&self) -> bool {
        self.overlays
            .with_value(|overlays| overlays.as_ref().map(|o| o.is_mobile()))
            .unwrap_or(false)
    }

    pub fn is_locked(&self) -> bool {
        self.overlays
            .with_value(|overlays| overlays.as_ref().map(|o| o.is_locked()))
            .unwrap_or(false)
    }

    /// Name of the signal fired on an overlay root once it has closed.
    pub fn closed_signal(&self) -> String {
        self.overlays
            .with_value(|overlays| {
                overlays
                    .as_ref()
                    .map(|o| o.coordinator().config().closed_signal.clone())
            })
            .unwrap_or_else(|| OverlayConfig::default().closed_signal)
    }
}
