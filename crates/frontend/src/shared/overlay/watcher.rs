//! Tree watching: classify inserted/removed subtrees against the role table.

use super::host::OverlayHost;
use super::OverlayCoordinator;
use contracts::shared::roles::Role;

/// Structural changes observed in one observer callback.
#[derive(Debug, Clone)]
pub struct MutationBatch<N> {
    pub added: Vec<N>,
    pub removed: Vec<N>,
}

impl<N> Default for MutationBatch<N> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<N> MutationBatch<N> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<H: OverlayHost> OverlayCoordinator<H> {
    /// Register overlays already present in the document.
    pub fn scan(&self) {
        let Some(root) = self.host().document_root() else {
            return;
        };
        for candidate in self.candidates(&root) {
            self.register_candidate(&candidate);
        }
    }

    /// Apply one batch: additions first, then removals, so a node inserted
    /// and removed within the same batch leaves nothing behind.
    pub fn process_batch(&self, batch: MutationBatch<H::Node>) {
        for node in &batch.added {
            for candidate in self.candidates(node) {
                self.register_candidate(&candidate);
            }
        }

        let host = self.host();
        for node in &batch.removed {
            for key in host.keys_within(node) {
                if !self.state().registry.contains(key) {
                    continue;
                }
                // Moved rather than removed: still reachable from the document.
                if host.resolve(key).is_some() {
                    continue;
                }
                self.deregister(key);
            }
        }
    }

    /// `node` and its descendants that match an overlay-root selector.
    fn candidates(&self, node: &H::Node) -> Vec<H::Node> {
        let host = self.host();
        let group = self.config().selectors.group(Role::OverlayRoot);
        let mut found = Vec::new();
        if host.matches(node, &group) {
            found.push(node.clone());
        }
        found.extend(host.query_all(node, &group));
        found
    }

    fn register_candidate(&self, node: &H::Node) {
        if self.has_registered_ancestor(node) {
            return;
        }
        self.register(node);
    }

    /// Surfaces nested inside an open overlay belong to that overlay.
    fn has_registered_ancestor(&self, node: &H::Node) -> bool {
        let host = self.host();
        let mut current = host.parent(node);
        while let Some(ancestor) = current {
            if let Some(key) = host.key_of(&ancestor) {
                if self.state().registry.contains(key) {
                    return true;
                }
            }
            current = host.parent(&ancestor);
        }
        false
    }
}
