pub mod lazy_images;
pub mod modal;
pub mod modal_frame;
pub mod modal_stack;
pub mod overlay;
pub mod overlay_service;
pub mod touch_feedback;
pub mod web_host;
