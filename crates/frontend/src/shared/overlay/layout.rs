//! Responsive presentation of an overlay's content region.

use super::host::{OverlayHost, OverlayKey};
use super::registry::Phase;
use super::OverlayCoordinator;
use contracts::shared::overlay_config::OverlayConfig;
use contracts::shared::presentation::{self, OFFSCREEN_TRANSFORM, ONSCREEN_TRANSFORM};
use contracts::shared::roles::Role;

/// Content region of an overlay, falling back to the root itself.
pub fn content_region<H: OverlayHost>(host: &H, config: &OverlayConfig, root: &H::Node) -> H::Node {
    host.first_match(root, config.selectors.selectors(Role::ContentRegion))
        .unwrap_or_else(|| root.clone())
}

pub fn scroll_region<H: OverlayHost>(
    host: &H,
    config: &OverlayConfig,
    root: &H::Node,
) -> Option<H::Node> {
    host.first_match(root, config.selectors.selectors(Role::ScrollRegion))
}

/// Apply the presentation for the current viewport. Returns whether the
/// mobile (bottom-sheet) branch was taken.
pub fn apply<H: OverlayHost>(host: &H, config: &OverlayConfig, root: &H::Node) -> bool {
    let content = content_region(host, config, root);
    let mobile = config.is_mobile_width(host.viewport_width());

    if mobile {
        host.set_styles(&content, &presentation::bottom_sheet(config));
        ensure_indicator(host, config, &content);
    } else {
        host.set_styles(&content, &presentation::centered_dialog(config));
    }

    if let Some(scroll) = scroll_region(host, config, root) {
        host.set_styles(&scroll, &presentation::scroll_region(config, mobile));
    }

    mobile
}

/// Insert the drag indicator into the header area (or the content region
/// when there is no header) unless one is already there.
pub fn ensure_indicator<H: OverlayHost>(host: &H, config: &OverlayConfig, content: &H::Node) {
    let marker = format!(".{}", config.indicator_class);
    if host.matches(content, &marker) || host.query(content, &marker).is_some() {
        return;
    }
    let target = host
        .first_match(content, config.selectors.selectors(Role::Header))
        .unwrap_or_else(|| content.clone());
    if host.prepend_element(&target, &config.indicator_class).is_none() {
        log::warn!("layout: could not insert drag indicator");
    }
}

pub fn slide_in<H: OverlayHost>(host: &H, content: &H::Node) {
    host.set_style(content, "transform", ONSCREEN_TRANSFORM);
}

pub fn slide_out<H: OverlayHost>(host: &H, content: &H::Node) {
    host.set_style(content, "transform", OFFSCREEN_TRANSFORM);
}

impl<H: OverlayHost> OverlayCoordinator<H> {
    /// Lay out a registered overlay and, on mobile, schedule its entrance.
    pub(crate) fn apply_layout(&self, key: OverlayKey) {
        let host = self.host();
        let config = self.config();
        let Some(root) = self.locate(key) else {
            return;
        };

        let mobile = apply(host, config, &root);
        let generation = {
            let mut state = self.state_mut();
            let Some(handle) = state.registry.get_mut(key) else {
                return;
            };
            handle.mobile = mobile;
            handle.generation
        };
        log::debug!(
            "overlay {key}: {} layout",
            if mobile { "bottom-sheet" } else { "dialog" }
        );

        if mobile {
            // The offscreen offset has to be committed before it is cleared,
            // otherwise there is nothing to transition from.
            self.defer(0, move |coordinator| coordinator.finish_entrance(key, generation));
        }
    }

    fn finish_entrance(&self, key: OverlayKey, generation: u32) {
        let still_open = self
            .state()
            .registry
            .get(key)
            .map(|h| h.phase == Phase::Open && h.generation == generation)
            .unwrap_or(false);
        if !still_open {
            return;
        }
        let host = self.host();
        if let Some(root) = self.locate(key) {
            slide_in(host, &content_region(host, self.config(), &root));
        }
    }
}
