pub mod body_style;
pub mod overlay_config;
pub mod presentation;
pub mod roles;
