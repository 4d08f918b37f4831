use serde::{Deserialize, Serialize};

/// Role a node can play inside an overlay.
///
/// Classification is always done through a [`SelectorTable`], never by
/// ad-hoc string matching at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    OverlayRoot,
    ContentRegion,
    ScrollRegion,
    CloseTrigger,
    Backdrop,
    Header,
}

impl Role {
    /// Stable code used in logs and config documents
    pub fn code(&self) -> &'static str {
        match self {
            Role::OverlayRoot => "overlay-root",
            Role::ContentRegion => "content-region",
            Role::ScrollRegion => "scroll-region",
            Role::CloseTrigger => "close-trigger",
            Role::Backdrop => "backdrop",
            Role::Header => "header",
        }
    }

    pub fn all() -> [Role; 6] {
        [
            Role::OverlayRoot,
            Role::ContentRegion,
            Role::ScrollRegion,
            Role::CloseTrigger,
            Role::Backdrop,
            Role::Header,
        ]
    }
}

/// Current version of the built-in selector table.
pub const SELECTOR_TABLE_VERSION: u32 = 1;

/// Versioned predicate table: an ordered selector list per [`Role`].
///
/// Order matters for the fallback chains (content region, scroll region,
/// header): the first selector with a match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorTable {
    pub version: u32,
    pub overlay_roots: Vec<String>,
    pub content_regions: Vec<String>,
    pub scroll_regions: Vec<String>,
    pub close_triggers: Vec<String>,
    pub backdrops: Vec<String>,
    pub headers: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            version: SELECTOR_TABLE_VERSION,
            overlay_roots: owned(&[
                ".modal-overlay",
                ".modal",
                ".drawer",
                ".dialog",
                ".bottom-sheet",
                "[role=\"dialog\"]",
                "[role=\"alertdialog\"]",
                "[aria-modal=\"true\"]",
            ]),
            content_regions: owned(&[
                ".modal-content",
                ".modal",
                ".drawer-content",
                ".dialog-content",
                ".sheet-content",
                "[role=\"document\"]",
            ]),
            scroll_regions: owned(&[
                ".modal-body",
                ".drawer-body",
                ".dialog-body",
                ".sheet-body",
                ".content",
            ]),
            close_triggers: owned(&[
                ".modal__close",
                ".modal-close",
                ".btn-close",
                ".close",
                "[data-dismiss=\"modal\"]",
                "[aria-label=\"Close\"]",
            ]),
            backdrops: owned(&[
                ".modal-backdrop",
                ".drawer-backdrop",
                ".backdrop",
                ".modal-overlay",
                ".overlay",
            ]),
            headers: owned(&[
                ".modal-header",
                ".drawer-header",
                ".dialog-header",
                ".sheet-header",
            ]),
        }
    }
}

impl SelectorTable {
    /// Ordered selectors for a role.
    pub fn selectors(&self, role: Role) -> &[String] {
        match role {
            Role::OverlayRoot => &self.overlay_roots,
            Role::ContentRegion => &self.content_regions,
            Role::ScrollRegion => &self.scroll_regions,
            Role::CloseTrigger => &self.close_triggers,
            Role::Backdrop => &self.backdrops,
            Role::Header => &self.headers,
        }
    }

    /// All selectors of a role joined into one selector group
    /// (`a, b, c`), suitable for a single `matches`/`querySelectorAll`.
    pub fn group(&self, role: Role) -> String {
        self.selectors(role).join(", ")
    }
}
