//! Dismissal wiring and the close sequence.

use super::host::{HostEvent, OverlayHost, OverlayKey};
use super::layout;
use super::registry::Phase;
use super::OverlayCoordinator;
use contracts::shared::roles::Role;

const CLOSE_WIRED: &str = "data-overlay-close-wired";
const BACKDROP_WIRED: &str = "data-overlay-backdrop-wired";
const SIGNAL_WIRED: &str = "data-overlay-signal-wired";

impl<H: OverlayHost> OverlayCoordinator<H> {
    /// Wire close triggers, backdrop and the custom close signal of one overlay.
    ///
    /// Every wired element is marked, so wiring survives re-registration
    /// without being duplicated.
    pub(crate) fn attach_listeners(&self, key: OverlayKey) {
        let already = self
            .state()
            .registry
            .get(key)
            .map(|h| h.listeners_attached)
            .unwrap_or(true);
        if already {
            return;
        }
        let host = self.host();
        let selectors = &self.config().selectors;
        let Some(root) = self.locate(key) else {
            return;
        };

        for trigger in host.query_all(&root, &selectors.group(Role::CloseTrigger)) {
            if host.attribute(&trigger, CLOSE_WIRED).is_some() {
                continue;
            }
            host.set_attribute(&trigger, CLOSE_WIRED, "true");
            let weak = self.downgrade();
            host.listen(
                &trigger,
                "click",
                Box::new(move |_: &HostEvent| {
                    if let Some(coordinator) = weak.upgrade() {
                        coordinator.close(key);
                    }
                }),
            );
        }

        let backdrop_group = selectors.group(Role::Backdrop);
        let backdrop = if host.matches(&root, &backdrop_group) {
            Some(root.clone())
        } else {
            host.query(&root, &backdrop_group)
        };
        if let Some(backdrop) = backdrop {
            if host.attribute(&backdrop, BACKDROP_WIRED).is_none() {
                host.set_attribute(&backdrop, BACKDROP_WIRED, "true");
                let weak = self.downgrade();
                host.listen(
                    &backdrop,
                    "click",
                    Box::new(move |event: &HostEvent| {
                        // Clicks bubbling up from the content do not count.
                        if !event.on_self {
                            return;
                        }
                        if let Some(coordinator) = weak.upgrade() {
                            coordinator.close(key);
                        }
                    }),
                );
            }
        }

        if host.attribute(&root, SIGNAL_WIRED).is_none() {
            host.set_attribute(&root, SIGNAL_WIRED, "true");
            let weak = self.downgrade();
            host.listen(
                &root,
                &self.config().close_signal,
                Box::new(move |_: &HostEvent| {
                    if let Some(coordinator) = weak.upgrade() {
                        coordinator.close(key);
                    }
                }),
            );
        }

        if let Some(handle) = self.state_mut().registry.get_mut(key) {
            handle.listeners_attached = true;
        }
    }

    /// Single document-level Escape listener; always targets the current top.
    pub(crate) fn wire_escape(&self) {
        let weak = self.downgrade();
        self.host().listen_document(
            "keydown",
            Box::new(move |event: &HostEvent| {
                if event.key.as_deref() != Some("Escape") {
                    return;
                }
                if let Some(coordinator) = weak.upgrade() {
                    coordinator.close_top();
                }
            }),
        );
    }

    /// Close the topmost overlay, if any.
    pub fn close_top(&self) {
        let top = self.top();
        if let Some(key) = top {
            self.close(key);
        }
    }

    /// Run the close sequence for `key`.
    ///
    /// Mobile sheets slide out first and finish after the transition; dialogs
    /// finish immediately. Closing an overlay that is already closing, or not
    /// registered, does nothing.
    pub fn close(&self, key: OverlayKey) {
        let (mobile, generation) = {
            let mut state = self.state_mut();
            let Some(handle) = state.registry.get_mut(key) else {
                log::debug!("overlay {key}: close ignored, not registered");
                return;
            };
            if handle.phase == Phase::Closing {
                return;
            }
            handle.phase = Phase::Closing;
            (handle.mobile, handle.generation)
        };

        if !mobile {
            self.finish_close(key, generation);
            return;
        }

        let host = self.host();
        if let Some(root) = self.locate(key) {
            layout::slide_out(host, &layout::content_region(host, self.config(), &root));
        }
        log::debug!("overlay {key}: closing, finishing in {}ms", self.config().transition_ms);
        self.defer(self.config().transition_ms, move |coordinator| {
            coordinator.finish_close(key, generation)
        });
    }

    fn finish_close(&self, key: OverlayKey, generation: u32) {
        let removed = {
            let mut guard = self.state_mut();
            let state = &mut *guard;
            let current = state
                .registry
                .get(key)
                .map(|h| h.phase == Phase::Closing && h.generation == generation)
                .unwrap_or(false);
            if !current {
                // Re-opened or already removed from the tree in the meantime.
                return;
            }
            let removal = state.registry.remove(key);
            if removal.as_ref().map(|r| r.emptied).unwrap_or(false) {
                state.lock.disengage(self.host(), self.config());
            }
            removal.is_some()
        };
        if !removed {
            return;
        }

        let host = self.host();
        let config = self.config();
        let root = self.locate(key);
        self.unpin_detached(key);
        if let Some(root) = root {
            host.remove_class(&root, &config.marker_class);
            host.dispatch(&root, &config.closed_signal);
        }
        log::debug!("overlay {key}: closed");
    }
}
