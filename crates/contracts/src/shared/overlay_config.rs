use super::roles::SelectorTable;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Runtime configuration of the overlay coordinator.
///
/// Every field has a default, so a partial document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub selectors: SelectorTable,
    /// Viewports narrower than this are laid out as bottom sheets.
    pub mobile_breakpoint_px: f64,
    /// Duration of the sheet slide transition, also the close delay.
    pub transition_ms: u32,
    pub sheet_max_height: String,
    pub dialog_max_width: String,
    pub dialog_max_height: String,
    pub dialog_radius: String,
    /// Height kept free for the header/footer band around a scroll region.
    pub scroll_reserved_px: u32,
    pub marker_class: String,
    pub indicator_class: String,
    pub lock_attribute: String,
    pub close_signal: String,
    pub closed_signal: String,
    pub touch: TouchConfig,
    pub lazy_images: LazyImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    pub enabled: bool,
    pub selectors: Vec<String>,
    pub active_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyImageConfig {
    pub enabled: bool,
    pub source_attribute: String,
    pub root_margin: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
{
    "mobile_breakpoint_px": 768,
    "transition_ms": 300,
    "sheet_max_height": "90vh",
    "dialog_max_width": "90vw",
    "dialog_max_height": "90vh",
    "dialog_radius": "12px",
    "scroll_reserved_px": 120,
    "marker_class": "mobile-optimized",
    "indicator_class": "mobile-drag-indicator",
    "lock_attribute": "data-scroll-locked",
    "close_signal": "close",
    "closed_signal": "closed",
    "touch": {
        "enabled": true,
        "selectors": ["button", "a", ".button", "[role=\"button\"]"],
        "active_class": "touch-active"
    },
    "lazy_images": {
        "enabled": true,
        "source_attribute": "data-src",
        "root_margin": "50px"
    }
}
"#;

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorTable::default(),
            mobile_breakpoint_px: 768.0,
            transition_ms: 300,
            sheet_max_height: "90vh".to_string(),
            dialog_max_width: "90vw".to_string(),
            dialog_max_height: "90vh".to_string(),
            dialog_radius: "12px".to_string(),
            scroll_reserved_px: 120,
            marker_class: "mobile-optimized".to_string(),
            indicator_class: "mobile-drag-indicator".to_string(),
            lock_attribute: "data-scroll-locked".to_string(),
            close_signal: "close".to_string(),
            closed_signal: "closed".to_string(),
            touch: TouchConfig::default(),
            lazy_images: LazyImageConfig::default(),
        }
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selectors: vec![
                "button".to_string(),
                "a".to_string(),
                ".button".to_string(),
                "[role=\"button\"]".to_string(),
            ],
            active_class: "touch-active".to_string(),
        }
    }
}

impl Default for LazyImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_attribute: "data-src".to_string(),
            root_margin: "50px".to_string(),
        }
    }
}

impl OverlayConfig {
    pub fn is_mobile_width(&self, viewport_width: f64) -> bool {
        viewport_width < self.mobile_breakpoint_px
    }

    /// Reject values no viewport or animation can work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mobile_breakpoint_px.is_nan() || self.mobile_breakpoint_px <= 0.0 {
            anyhow::bail!(
                "mobile_breakpoint_px must be positive, got {}",
                self.mobile_breakpoint_px
            );
        }
        Ok(())
    }

    /// `transition: transform <ms>ms ease-out`
    pub fn transition_value(&self) -> String {
        format!("transform {}ms ease-out", self.transition_ms)
    }
}

/// Load configuration from a JSON document.
///
/// `None` uses the embedded default document.
pub fn load_config(json: Option<&str>) -> anyhow::Result<OverlayConfig> {
    let source = json.unwrap_or(DEFAULT_CONFIG);
    let config: OverlayConfig =
        serde_json::from_str(source).context("parse overlay configuration")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = load_config(None);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config, OverlayConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = load_config(Some(r#"{ "transition_ms": 450, "touch": { "enabled": false } }"#))
            .unwrap();
        assert_eq!(config.transition_ms, 450);
        assert!(!config.touch.enabled);
        assert_eq!(config.touch.active_class, "touch-active");
        assert_eq!(config.mobile_breakpoint_px, 768.0);
        assert_eq!(config.selectors.version, 1);
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        assert!(load_config(Some("{ not json")).is_err());
        assert!(load_config(Some(r#"{ "mobile_breakpoint_px": 0 }"#)).is_err());
    }

    #[test]
    fn test_validate_rejects_unusable_breakpoint() {
        assert!(OverlayConfig::default().validate().is_ok());

        let zero = OverlayConfig {
            mobile_breakpoint_px: 0.0,
            ..OverlayConfig::default()
        };
        assert!(zero.validate().is_err());

        let negative = OverlayConfig {
            mobile_breakpoint_px: -320.0,
            ..OverlayConfig::default()
        };
        assert!(negative.validate().is_err());

        let nan = OverlayConfig {
            mobile_breakpoint_px: f64::NAN,
            ..OverlayConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_breakpoint_is_exclusive() {
        let config = OverlayConfig::default();
        assert!(config.is_mobile_width(375.0));
        assert!(config.is_mobile_width(767.9));
        assert!(!config.is_mobile_width(768.0));
        assert!(!config.is_mobile_width(1280.0));
    }
}
