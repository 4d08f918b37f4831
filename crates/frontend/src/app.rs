use crate::shared::modal::Modal;
use crate::shared::modal_stack::{ModalHost, ModalStackService};
use crate::shared::overlay_service::OverlayService;
use contracts::shared::overlay_config::OverlayConfig;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // One coordinator for the whole document, shared through context.
    provide_context(OverlayService::install(OverlayConfig::default()));

    // Provide ModalStackService for stacked modal flows
    provide_context(ModalStackService::new());

    view! {
        <Playground />
        <ModalHost />
    }
}

/// Small page for trying the overlay behaviour on a phone or in a narrow window.
#[component]
fn Playground() -> impl IntoView {
    let stack = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let open_details = move |_| {
        stack.push(move |_handle| {
            view! {
                <Modal title="Details".to_string()>
                    <p>"Opened on top of the filters. Escape closes this one first."</p>
                </Modal>
            }
            .into_any()
        });
    };

    let open_filters = move |_| {
        stack.push(move |handle| {
            view! {
                <Modal title="Filters".to_string()>
                    <p>"Background scrolling is locked while this is open."</p>
                    <button class="button" on:click=open_details>"Open details"</button>
                    <button class="button button--primary" on:click=move |_| handle.close()>
                        "Apply"
                    </button>
                </Modal>
            }
            .into_any()
        });
    };

    view! {
        <main class="playground">
            <h1>"Overlays"</h1>
            <button class="button" on:click=open_filters>"Open filters"</button>
            {(0..40).map(|i| view! { <p>{format!("Row {i}")}</p> }).collect_view()}
        </main>
    }
}
