//! MutationObserver glue feeding the coordinator's tree watcher.

use super::WebHost;
use crate::shared::overlay::{MutationBatch, OverlayCoordinator};
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node, NodeList};

type ObserverCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// Hook run for every inserted element after the coordinator has seen the batch.
pub type AddedHook = Box<dyn Fn(&Element)>;

/// Observes `childList` changes of a subtree for as long as it is alive.
pub struct TreeObserver {
    observer: MutationObserver,
    _callback: ObserverCallback,
}

fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
    (0..list.length())
        .filter_map(move |i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

/// Flatten one callback's records into a single batch, preserving record order.
fn batch_from_records(records: &Array) -> MutationBatch<Element> {
    let mut batch = MutationBatch::default();
    for record in records.iter() {
        let record: MutationRecord = record.unchecked_into();
        batch.added.extend(elements(&record.added_nodes()));
        batch.removed.extend(elements(&record.removed_nodes()));
    }
    batch
}

impl TreeObserver {
    pub fn observe(
        coordinator: &OverlayCoordinator<WebHost>,
        target: &Node,
        on_added: Option<AddedHook>,
    ) -> Result<Self, JsValue> {
        let weak = coordinator.downgrade();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |records: Array, _observer: MutationObserver| {
                let batch = batch_from_records(&records);
                if batch.is_empty() {
                    return;
                }
                let added = on_added.as_ref().map(|_| batch.added.clone());
                if let Some(coordinator) = weak.upgrade() {
                    coordinator.process_batch(batch);
                }
                if let (Some(hook), Some(added)) = (on_added.as_ref(), added) {
                    for element in &added {
                        hook(element);
                    }
                }
            },
        ) as Box<dyn FnMut(_, _)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(target, &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for TreeObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
