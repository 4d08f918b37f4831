use super::host::OverlayKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Open,
    Closing,
}

/// One tracked overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayHandle {
    pub key: OverlayKey,
    /// Layout chosen at the last apply.
    pub mobile: bool,
    pub listeners_attached: bool,
    pub phase: Phase,
    /// Bumped on every re-open; pending continuations from an older
    /// generation are ignored.
    pub generation: u32,
}

impl OverlayHandle {
    pub fn new(key: OverlayKey) -> Self {
        Self {
            key,
            mobile: false,
            listeners_attached: false,
            phase: Phase::Open,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    AlreadyPresent,
    /// `first` is true when the registry went from empty to non-empty.
    Added { first: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub handle: OverlayHandle,
    /// The registry is empty after this removal.
    pub emptied: bool,
}

/// Open overlays in stacking order; the last entry is the topmost.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    entries: Vec<OverlayHandle>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handle: OverlayHandle) -> Added {
        if self.contains(handle.key) {
            return Added::AlreadyPresent;
        }
        let first = self.entries.is_empty();
        self.entries.push(handle);
        Added::Added { first }
    }

    pub fn remove(&mut self, key: OverlayKey) -> Option<Removal> {
        let index = self.entries.iter().position(|h| h.key == key)?;
        let handle = self.entries.remove(index);
        Some(Removal {
            handle,
            emptied: self.entries.is_empty(),
        })
    }

    /// The Escape target.
    pub fn top(&self) -> Option<&OverlayHandle> {
        self.entries.last()
    }

    pub fn get(&self, key: OverlayKey) -> Option<&OverlayHandle> {
        self.entries.iter().find(|h| h.key == key)
    }

    pub fn get_mut(&mut self, key: OverlayKey) -> Option<&mut OverlayHandle> {
        self.entries.iter_mut().find(|h| h.key == key)
    }

    pub fn contains(&self, key: OverlayKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<OverlayKey> {
        self.entries.iter().map(|h| h.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(key: u64) -> OverlayHandle {
        OverlayHandle::new(OverlayKey(key))
    }

    #[test]
    fn test_add_reports_first_entry() {
        let mut registry = OverlayRegistry::new();
        assert_eq!(registry.add(handle(1)), Added::Added { first: true });
        assert_eq!(registry.add(handle(2)), Added::Added { first: false });
        assert_eq!(registry.add(handle(1)), Added::AlreadyPresent);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_top_is_last_inserted() {
        let mut registry = OverlayRegistry::new();
        assert!(registry.top().is_none());
        registry.add(handle(1));
        registry.add(handle(2));
        assert_eq!(registry.top().map(|h| h.key), Some(OverlayKey(2)));

        registry.remove(OverlayKey(2));
        assert_eq!(registry.top().map(|h| h.key), Some(OverlayKey(1)));
    }

    #[test]
    fn test_remove_reports_emptied() {
        let mut registry = OverlayRegistry::new();
        registry.add(handle(1));
        registry.add(handle(2));

        let removal = registry.remove(OverlayKey(1)).unwrap();
        assert_eq!(removal.handle.key, OverlayKey(1));
        assert!(!removal.emptied);

        assert!(registry.remove(OverlayKey(1)).is_none());
        assert!(registry.remove(OverlayKey(2)).unwrap().emptied);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_from_middle_keeps_order() {
        let mut registry = OverlayRegistry::new();
        for key in 1..=3 {
            registry.add(handle(key));
        }
        registry.remove(OverlayKey(2));
        assert_eq!(registry.keys(), vec![OverlayKey(1), OverlayKey(3)]);
    }
}
