use serde::{Deserialize, Serialize};

/// Body style properties captured before the scroll lock takes over.
pub const TRACKED_BODY_PROPERTIES: [&str; 8] = [
    "position", "top", "left", "right", "bottom", "overflow", "height", "width",
];

/// Body styles captured at the start of a lock session.
///
/// Values are kept verbatim (as reported by the computed style) and written
/// back verbatim on restore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyStyleSnapshot {
    pub properties: Vec<(String, String)>,
    /// Vertical scroll offset of the page when the lock was engaged.
    pub scroll_y: f64,
}

impl BodyStyleSnapshot {
    /// Build a snapshot by reading every tracked property through `read`.
    pub fn capture(scroll_y: f64, mut read: impl FnMut(&str) -> String) -> Self {
        let properties = TRACKED_BODY_PROPERTIES
            .iter()
            .map(|name| (name.to_string(), read(name)))
            .collect();
        Self { properties, scroll_y }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reads_every_tracked_property() {
        let mut seen = Vec::new();
        let snapshot = BodyStyleSnapshot::capture(42.0, |name| {
            seen.push(name.to_string());
            format!("{name}-value")
        });
        assert_eq!(seen.len(), TRACKED_BODY_PROPERTIES.len());
        assert_eq!(snapshot.get("overflow"), Some("overflow-value"));
        assert_eq!(snapshot.get("z-index"), None);
        assert_eq!(snapshot.scroll_y, 42.0);
    }
}
