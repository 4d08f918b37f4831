//! Inline style tables for every presentation the coordinator applies.
//!
//! Kept as plain data so hosts only have to write `(property, value)` pairs.

use super::overlay_config::OverlayConfig;

pub type StyleList = Vec<(&'static str, String)>;

pub const OFFSCREEN_TRANSFORM: &str = "translateY(100%)";
pub const ONSCREEN_TRANSFORM: &str = "translateY(0)";

/// Bottom-sheet presentation for the content region on narrow viewports.
///
/// The region starts one full height below its resting place; the caller
/// slides it in on the next tick.
pub fn bottom_sheet(config: &OverlayConfig) -> StyleList {
    vec![
        ("position", "fixed".to_string()),
        ("left", "0".to_string()),
        ("right", "0".to_string()),
        ("bottom", "0".to_string()),
        ("top", "auto".to_string()),
        ("width", "100%".to_string()),
        ("max-width", "100vw".to_string()),
        ("max-height", config.sheet_max_height.clone()),
        ("margin", "0".to_string()),
        ("border-radius", "0".to_string()),
        ("transform", OFFSCREEN_TRANSFORM.to_string()),
        ("transition", config.transition_value()),
    ]
}

/// Centered dialog presentation for wide viewports.
pub fn centered_dialog(config: &OverlayConfig) -> StyleList {
    vec![
        ("position", "relative".to_string()),
        ("top", "auto".to_string()),
        ("bottom", "auto".to_string()),
        ("width", "auto".to_string()),
        ("max-width", config.dialog_max_width.clone()),
        ("max-height", config.dialog_max_height.clone()),
        ("margin", "auto".to_string()),
        ("border-radius", config.dialog_radius.clone()),
        ("transform", "none".to_string()),
        ("transition", "none".to_string()),
    ]
}

/// Contained, touch-friendly scrolling for the inner scrollable region.
pub fn scroll_region(config: &OverlayConfig, mobile: bool) -> StyleList {
    let frame = if mobile {
        &config.sheet_max_height
    } else {
        &config.dialog_max_height
    };
    vec![
        ("overflow-y", "auto".to_string()),
        ("-webkit-overflow-scrolling", "touch".to_string()),
        ("overscroll-behavior", "contain".to_string()),
        (
            "max-height",
            format!("calc({frame} - {}px)", config.scroll_reserved_px),
        ),
    ]
}

/// Body styles while a lock session is active.
pub fn scroll_lock(scroll_y: f64) -> StyleList {
    vec![
        ("position", "fixed".to_string()),
        ("top", format!("-{}px", scroll_y.max(0.0))),
        ("left", "0".to_string()),
        ("right", "0".to_string()),
        ("width", "100%".to_string()),
        ("overflow", "hidden".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(styles: &'a StyleList, property: &str) -> Option<&'a str> {
        styles
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_bottom_sheet_starts_offscreen() {
        let config = OverlayConfig::default();
        let styles = bottom_sheet(&config);
        assert_eq!(value(&styles, "transform"), Some(OFFSCREEN_TRANSFORM));
        assert_eq!(value(&styles, "bottom"), Some("0"));
        assert_eq!(value(&styles, "width"), Some("100%"));
        assert_eq!(value(&styles, "border-radius"), Some("0"));
        assert_eq!(value(&styles, "transition"), Some("transform 300ms ease-out"));
    }

    #[test]
    fn test_centered_dialog_is_capped_and_rounded() {
        let config = OverlayConfig::default();
        let styles = centered_dialog(&config);
        assert_eq!(value(&styles, "max-width"), Some("90vw"));
        assert_eq!(value(&styles, "border-radius"), Some("12px"));
        assert_eq!(value(&styles, "transform"), Some("none"));
    }

    #[test]
    fn test_scroll_region_reserves_band() {
        let config = OverlayConfig::default();
        let styles = scroll_region(&config, true);
        assert_eq!(value(&styles, "max-height"), Some("calc(90vh - 120px)"));
        assert_eq!(value(&styles, "overscroll-behavior"), Some("contain"));
    }

    #[test]
    fn test_scroll_lock_pins_current_offset() {
        let styles = scroll_lock(240.0);
        assert_eq!(value(&styles, "top"), Some("-240px"));
        assert_eq!(value(&styles, "overflow"), Some("hidden"));
        assert_eq!(value(&scroll_lock(-5.0), "top"), Some("-0px"));
    }
}
