//! Dynamic overlay lifecycle coordinator.
//!
//! Detects dialog-like surfaces as they enter the document, lays them out for
//! the current viewport, locks background scrolling while any is open and
//! sequences close animations with state teardown.
//!
//! The coordinator is single-threaded and cheap to clone. All state lives
//! behind one `RefCell`; borrows are never held across host calls that can
//! dispatch events back into the coordinator.

pub mod close;
pub mod host;
pub mod layout;
pub mod registry;
pub mod scroll_lock;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_dom;

pub use host::{Handler, HostEvent, OverlayHost, OverlayKey, Task, KEY_ATTRIBUTE};
pub use registry::{OverlayHandle, OverlayRegistry, Phase};
pub use watcher::MutationBatch;

use contracts::shared::overlay_config::OverlayConfig;
use registry::Added;
use scroll_lock::ScrollLock;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

pub(crate) struct CoordinatorState {
    pub(crate) registry: OverlayRegistry,
    pub(crate) lock: ScrollLock,
    next_key: u64,
    started: bool,
}

struct Inner<H: OverlayHost> {
    host: H,
    config: OverlayConfig,
    state: RefCell<CoordinatorState>,
    /// Roots registered while unreachable from the document root, such as
    /// detached subtrees or shadow-root content.
    detached: RefCell<Vec<(OverlayKey, H::Node)>>,
}

/// Handle to the overlay coordinator.
///
/// Construct once per document, call [`OverlayCoordinator::start`], and pass
/// clones to whoever needs to trigger or query overlays.
pub struct OverlayCoordinator<H: OverlayHost> {
    inner: Rc<Inner<H>>,
}

impl<H: OverlayHost> Clone for OverlayCoordinator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning handle used by listeners and deferred tasks.
pub struct WeakCoordinator<H: OverlayHost> {
    inner: Weak<Inner<H>>,
}

impl<H: OverlayHost> Clone for WeakCoordinator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<H: OverlayHost> WeakCoordinator<H> {
    pub fn upgrade(&self) -> Option<OverlayCoordinator<H>> {
        self.inner.upgrade().map(|inner| OverlayCoordinator { inner })
    }
}

impl<H: OverlayHost> OverlayCoordinator<H> {
    pub fn new(host: H, config: OverlayConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                state: RefCell::new(CoordinatorState {
                    registry: OverlayRegistry::new(),
                    lock: ScrollLock::new(),
                    next_key: 0,
                    started: false,
                }),
                detached: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.inner.config
    }

    pub(crate) fn state(&self) -> Ref<'_, CoordinatorState> {
        self.inner.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, CoordinatorState> {
        self.inner.state.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakCoordinator<H> {
        WeakCoordinator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` after `delay_ms`, unless the coordinator is gone by then.
    fn defer(&self, delay_ms: u32, f: impl FnOnce(Self) + 'static) {
        let weak = self.downgrade();
        self.host().defer(
            delay_ms,
            Box::new(move || {
                if let Some(coordinator) = weak.upgrade() {
                    f(coordinator);
                }
            }),
        );
    }

    /// Wire the Escape listener and pick up overlays rendered before now.
    pub fn start(&self) {
        {
            let mut state = self.state_mut();
            if state.started {
                return;
            }
            state.started = true;
        }
        self.wire_escape();
        self.scan();
        log::debug!("overlay coordinator started, {} open", self.open_count());
    }

    /// Manual trigger for overlays inserted where the tree watcher cannot see them.
    pub fn optimize(&self, node: &H::Node) {
        self.register(node);
    }

    pub fn is_mobile(&self) -> bool {
        self.config().is_mobile_width(self.host().viewport_width())
    }

    /// Mirrors the lock attribute on the body.
    pub fn is_locked(&self) -> bool {
        self.state().lock.is_engaged(self.host(), self.config())
    }

    pub fn open_count(&self) -> usize {
        self.state().registry.len()
    }

    pub fn top(&self) -> Option<OverlayKey> {
        self.state().registry.top().map(|h| h.key)
    }

    pub fn handle(&self, key: OverlayKey) -> Option<OverlayHandle> {
        self.state().registry.get(key).cloned()
    }

    pub fn is_registered(&self, node: &H::Node) -> bool {
        self.host()
            .key_of(node)
            .map(|key| self.state().registry.contains(key))
            .unwrap_or(false)
    }

    /// Drop every overlay without animation, release the scroll lock and the
    /// Escape listener. A later [`OverlayCoordinator::start`] wires it again.
    pub fn shutdown(&self) {
        let keys = self.state().registry.keys();
        for key in keys.into_iter().rev() {
            if let Some(root) = self.locate(key) {
                self.host().remove_class(&root, &self.config().marker_class);
            }
            self.deregister(key);
        }
        self.host().release_document_listeners();
        self.state_mut().started = false;
        log::debug!("overlay coordinator shut down");
    }

    /// Root carrying `key`: the live tree first, then detached registrations.
    pub(crate) fn locate(&self, key: OverlayKey) -> Option<H::Node> {
        self.host().resolve(key).or_else(|| {
            self.inner
                .detached
                .borrow()
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, node)| node.clone())
        })
    }

    fn pin_detached(&self, key: OverlayKey, root: &H::Node) {
        let mut detached = self.inner.detached.borrow_mut();
        detached.retain(|(k, _)| *k != key);
        detached.push((key, root.clone()));
    }

    fn unpin_detached(&self, key: OverlayKey) {
        self.inner.detached.borrow_mut().retain(|(k, _)| *k != key);
    }

    /// Register `root`, or re-open it if its close is still pending.
    pub(crate) fn register(&self, root: &H::Node) {
        let host = self.host();
        let config = self.config();
        let key = match host.key_of(root) {
            Some(key) => key,
            None => {
                let key = self.allocate_key();
                host.set_attribute(root, KEY_ATTRIBUTE, &key.to_string());
                key
            }
        };

        {
            let mut guard = self.state_mut();
            let state = &mut *guard;
            match state.registry.get(key).map(|h| h.phase) {
                Some(Phase::Open) => return,
                Some(Phase::Closing) => {
                    if let Some(handle) = state.registry.get_mut(key) {
                        handle.phase = Phase::Open;
                        handle.generation += 1;
                    }
                    log::debug!("overlay {key}: re-opened during close");
                }
                None => {
                    if let Added::Added { first: true } =
                        state.registry.add(OverlayHandle::new(key))
                    {
                        state.lock.engage(host, config);
                    }
                    log::debug!("overlay {key}: registered, {} open", state.registry.len());
                }
            }
        }

        if host.resolve(key).is_none() {
            log::debug!("overlay {key}: not reachable from the document, keeping a direct reference");
            self.pin_detached(key, root);
        }

        host.add_class(root, &config.marker_class);
        self.apply_layout(key);
        self.attach_listeners(key);
    }

    /// Forget `key` without running the close sequence.
    pub(crate) fn deregister(&self, key: OverlayKey) {
        self.unpin_detached(key);
        let mut guard = self.state_mut();
        let state = &mut *guard;
        if let Some(removal) = state.registry.remove(key) {
            if removal.emptied {
                state.lock.disengage(self.host(), self.config());
            }
            log::debug!("overlay {key}: dropped, {} open", state.registry.len());
        }
    }

    /// Next key not already present in the document (keys survive restarts).
    fn allocate_key(&self) -> OverlayKey {
        loop {
            let key = {
                let mut state = self.state_mut();
                state.next_key += 1;
                OverlayKey(state.next_key)
            };
            if self.locate(key).is_none() {
                return key;
            }
        }
    }
}
