use crate::shared::modal_frame::{ModalFrame, MODAL_ID_ATTRIBUTE};
use crate::shared::overlay_service::OverlayService;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::sync::Arc;
use wasm_bindgen_futures::spawn_local;

#[derive(Clone)]
struct ModalEntry {
    id: u64,
    builder: Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>,
    modal_class: Option<String>,
}

/// A handle returned by `ModalStackService::push`.
///
/// Closing through the handle dismisses the surface itself, so the overlay
/// coordinator plays the exit animation before the entry is removed.
#[derive(Clone)]
pub struct ModalHandle {
    id: u64,
    svc: ModalStackService,
    overlays: Option<OverlayService>,
}

impl ModalHandle {
    pub fn close(&self) {
        let surface = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| {
                d.query_selector(&format!("[{MODAL_ID_ATTRIBUTE}=\"{}\"]", self.id))
                    .ok()
                    .flatten()
            });
        let animated = match (self.overlays, surface) {
            (Some(overlays), Some(surface)) => overlays.close(&surface),
            _ => false,
        };
        if !animated {
            self.svc.close_deferred(self.id);
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Stack of open modal surfaces.
///
/// - Supports push/close/pop
/// - Escape, backdrop clicks and close buttons are handled by the overlay
///   coordinator; an entry leaves the stack when its `closed` signal fires
#[derive(Clone, Copy)]
pub struct ModalStackService {
    stack: RwSignal<Vec<ModalEntry>>,
    next_id: RwSignal<u64>,
}

impl ModalStackService {
    pub fn new() -> Self {
        Self {
            stack: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    fn defer(&self, f: impl FnOnce(ModalStackService) + 'static) {
        let svc = *self;
        spawn_local(async move {
            // Next tick: the entry may be removed from inside its own event dispatch.
            TimeoutFuture::new(0).await;
            f(svc);
        });
    }

    pub fn is_open(&self) -> bool {
        !self.stack.get().is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.get().len()
    }

    /// Push a new modal onto the stack.
    ///
    /// `builder` receives a `ModalHandle` so the modal can close itself.
    pub fn push<F>(&self, builder: F) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        self.push_with_class(None, builder)
    }

    /// Push a new modal with an extra class on the surface.
    pub fn push_with_class<F>(&self, modal_class: Option<String>, builder: F) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);

        let handle = ModalHandle {
            id,
            svc: *self,
            overlays: use_context::<OverlayService>(),
        };
        let builder = Arc::new(builder) as Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>;

        self.stack.update(|s| {
            s.push(ModalEntry {
                id,
                builder,
                modal_class,
            });
        });

        handle
    }

    /// Remove an entry right away, without the exit animation.
    pub fn remove(&self, id: u64) {
        self.stack.update(|s| {
            s.retain(|e| e.id != id);
        });
    }

    pub fn close_deferred(&self, id: u64) {
        self.defer(move |svc| svc.remove(id));
    }

    pub fn clear(&self) {
        self.stack.set(Vec::new());
    }
}

/// Renders the modal stack at the application root.
///
/// Must be mounted exactly once.
#[component]
pub fn ModalHost() -> impl IntoView {
    let svc = use_context::<ModalStackService>()
        .expect("ModalStackService not provided in context (provide it in app root)");
    let overlays = use_context::<OverlayService>();

    view! {
        <Show when=move || svc.is_open()>
            <For
                each=move || {
                    svc.stack
                        .get()
                        .into_iter()
                        .enumerate()
                        .collect::<Vec<(usize, ModalEntry)>>()
                }
                key=|(_, entry)| entry.id
                children=move |(idx, entry)| {
                    // z-index based on current stack order
                    let z_index = 1000 + idx as i32;
                    let on_closed = {
                        let id = entry.id;
                        Callback::new(move |_| svc.close_deferred(id))
                    };

                    let handle = ModalHandle { id: entry.id, svc, overlays };
                    let view = (entry.builder)(handle);
                    let modal_class = entry.modal_class.clone().unwrap_or_default();

                    view! {
                        <ModalFrame
                            modal_id=entry.id
                            z_index=z_index
                            on_closed=on_closed
                            modal_class=modal_class
                        >
                            {view}
                        </ModalFrame>
                    }
                }
            />
        </Show>
    }
}
