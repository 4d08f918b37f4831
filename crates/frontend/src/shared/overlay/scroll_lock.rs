//! Background scroll lock and the body style snapshot it restores from.
//!
//! The lock attribute on the body marks an active session; a snapshot exists
//! exactly while the attribute does.

use super::host::OverlayHost;
use contracts::shared::body_style::BodyStyleSnapshot;
use contracts::shared::overlay_config::OverlayConfig;
use contracts::shared::presentation;

#[derive(Debug, Default)]
pub struct ScrollLock {
    snapshot: Option<BodyStyleSnapshot>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged<H: OverlayHost>(&self, host: &H, config: &OverlayConfig) -> bool {
        host.body()
            .map(|body| host.attribute(&body, &config.lock_attribute).is_some())
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> Option<&BodyStyleSnapshot> {
        self.snapshot.as_ref()
    }

    /// Capture the body styles and pin the body. No-op inside a session.
    pub fn engage<H: OverlayHost>(&mut self, host: &H, config: &OverlayConfig) {
        let Some(body) = host.body() else {
            log::warn!("scroll lock: document has no body");
            return;
        };
        if host.attribute(&body, &config.lock_attribute).is_some() {
            return;
        }

        let snapshot =
            BodyStyleSnapshot::capture(host.scroll_y(), |name| host.computed_style(&body, name));
        host.set_styles(&body, &presentation::scroll_lock(snapshot.scroll_y));
        host.set_attribute(&body, &config.lock_attribute, "true");
        log::debug!("scroll lock engaged at offset {}", snapshot.scroll_y);
        self.snapshot = Some(snapshot);
    }

    /// Restore the captured styles and scroll offset. No-op outside a session.
    pub fn disengage<H: OverlayHost>(&mut self, host: &H, config: &OverlayConfig) {
        let Some(body) = host.body() else {
            self.snapshot = None;
            return;
        };
        if host.attribute(&body, &config.lock_attribute).is_none() {
            return;
        }

        host.remove_attribute(&body, &config.lock_attribute);
        if let Some(snapshot) = self.snapshot.take() {
            for (property, value) in &snapshot.properties {
                host.set_style(&body, property, value);
            }
            host.scroll_to(snapshot.scroll_y);
            log::debug!("scroll lock released, back to offset {}", snapshot.scroll_y);
        }
    }
}
