use crate::shared::overlay_service::OverlayService;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Attribute linking a rendered surface back to its modal stack entry.
pub const MODAL_ID_ATTRIBUTE: &str = "data-modal-id";

/// Modal frame container (overlay + positioned surface).
///
/// Renders the markup the overlay coordinator recognises (`.modal-overlay`
/// root acting as backdrop, `.modal` surface). Layout, scroll lock and
/// dismissal are left to the coordinator; `on_closed` runs once it reports
/// the surface closed.
#[component]
pub fn ModalFrame(
    /// Stack entry id, exposed as `data-modal-id`.
    modal_id: u64,
    /// Called after the coordinator has finished closing the surface.
    on_closed: Callback<()>,
    /// z-index for overlay stacking (default: 1000).
    #[prop(optional)]
    z_index: Option<i32>,
    /// Extra class for the modal surface (`div.modal`).
    #[prop(optional)]
    modal_class: Option<String>,
    children: Children,
) -> impl IntoView {
    let z_index = z_index.unwrap_or(1000);
    let overlay_ref = NodeRef::<Div>::new();
    let closed_signal = use_context::<OverlayService>()
        .map(|overlays| overlays.closed_signal())
        .unwrap_or_else(|| "closed".to_string());

    Effect::new(move |_| {
        let Some(overlay) = overlay_ref.get() else {
            return;
        };
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            on_closed.run(());
        }) as Box<dyn FnMut(_)>);
        let _ = overlay
            .add_event_listener_with_callback(&closed_signal, closure.as_ref().unchecked_ref());
        // The surface is removed right after it closes; the listener goes with it.
        closure.forget();
    });

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {z_index};")
            node_ref=overlay_ref
            data-modal-id=modal_id.to_string()
        >
            <div class=move || {
                match modal_class.clone().filter(|cls| !cls.is_empty()) {
                    Some(cls) => format!("modal {cls}"),
                    None => "modal".to_string(),
                }
            }>
                {children()}
            </div>
        </div>
    }
}
