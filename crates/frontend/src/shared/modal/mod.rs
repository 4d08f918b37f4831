use leptos::prelude::*;

/// Standard modal content: header with title, optional actions and a close
/// button, followed by a scrollable body.
///
/// The class names are the ones the overlay coordinator looks for
/// (`.modal-header` receives the drag indicator on phones, `.modal-body` gets
/// contained scrolling, `.modal__close` is wired as a close trigger).
#[component]
pub fn Modal(
    /// Title of the modal
    title: String,
    /// Optional action buttons (Save, Cancel, etc.) to display in header
    #[prop(optional)]
    action_buttons: Option<ChildrenFn>,
    /// Modal content
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-header">
            <h2 class="modal-title">{title}</h2>
            <div class="modal-header-actions">
                {move || action_buttons.as_ref().map(|buttons| buttons())}
                <button class="button button--icon modal__close" aria-label="Close">
                    "×"
                </button>
            </div>
        </div>
        <div class="modal-body">
            {children()}
        </div>
    }
}
