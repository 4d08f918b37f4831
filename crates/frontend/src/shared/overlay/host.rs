use contracts::shared::presentation::StyleList;
use std::fmt;

/// Attribute holding an overlay root's stable key.
pub const KEY_ATTRIBUTE: &str = "data-overlay-key";

/// Stable identity of an overlay root.
///
/// The key lives on the node itself, so a handle never owns a node: it is
/// resolved through the current tree every time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayKey(pub u64);

impl OverlayKey {
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(OverlayKey)
    }

    pub fn selector(&self) -> String {
        format!("[{KEY_ATTRIBUTE}=\"{}\"]", self.0)
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The parts of a DOM event the coordinator looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostEvent {
    /// `KeyboardEvent.key`, if any.
    pub key: Option<String>,
    /// The event target is the listening node itself, not a bubbled child.
    pub on_self: bool,
}

pub type Handler = Box<dyn FnMut(&HostEvent)>;
pub type Task = Box<dyn FnOnce()>;

/// Rendering-layer capabilities the overlay coordinator is built on.
///
/// `query`/`query_all` search descendants of `scope` only (not `scope`
/// itself), in document order. Mutating operations never fail: a host that
/// cannot perform one logs it and carries on.
pub trait OverlayHost: 'static {
    type Node: Clone + 'static;

    fn body(&self) -> Option<Self::Node>;
    fn document_root(&self) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &str) -> bool;
    fn query(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn query_all(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn computed_style(&self, node: &Self::Node, property: &str) -> String;

    /// Create a `div` with `class` and insert it as the first child of `parent`.
    fn prepend_element(&self, parent: &Self::Node, class: &str) -> Option<Self::Node>;

    fn viewport_width(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, y: f64);

    fn listen(&self, node: &Self::Node, event: &str, handler: Handler);
    fn listen_document(&self, event: &str, handler: Handler);
    /// Remove every listener added through `listen_document`.
    fn release_document_listeners(&self);
    /// Fire a bubbling custom event on `node`.
    fn dispatch(&self, node: &Self::Node, event: &str);

    /// Run `task` after `delay_ms` on the event loop. `0` means next tick.
    fn defer(&self, delay_ms: u32, task: Task);

    fn set_styles(&self, node: &Self::Node, styles: &StyleList) {
        for (property, value) in styles {
            self.set_style(node, property, value);
        }
    }

    /// First descendant matching the selectors, tried in order.
    fn first_match(&self, scope: &Self::Node, selectors: &[String]) -> Option<Self::Node> {
        selectors
            .iter()
            .find_map(|selector| self.query(scope, selector))
    }

    fn key_of(&self, node: &Self::Node) -> Option<OverlayKey> {
        self.attribute(node, KEY_ATTRIBUTE)
            .and_then(|value| OverlayKey::parse(&value))
    }

    /// Find the root carrying `key` in the live tree.
    fn resolve(&self, key: OverlayKey) -> Option<Self::Node> {
        let root = self.document_root()?;
        if self.key_of(&root) == Some(key) {
            return Some(root);
        }
        self.query(&root, &key.selector())
    }

    /// Keys on `node` and its descendants. Works on detached subtrees.
    fn keys_within(&self, node: &Self::Node) -> Vec<OverlayKey> {
        let mut keys: Vec<OverlayKey> = self.key_of(node).into_iter().collect();
        keys.extend(
            self.query_all(node, &format!("[{KEY_ATTRIBUTE}]"))
                .iter()
                .filter_map(|child| self.key_of(child)),
        );
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse_and_selector() {
        assert_eq!(OverlayKey::parse(" 17 "), Some(OverlayKey(17)));
        assert_eq!(OverlayKey::parse("x"), None);
        assert_eq!(OverlayKey(3).selector(), "[data-overlay-key=\"3\"]");
        assert_eq!(OverlayKey(3).to_string(), "3");
    }
}
