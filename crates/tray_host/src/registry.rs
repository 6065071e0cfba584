use crate::{SourceKind, Subscription, TrayKey};

/// One icon currently shown in the tray.
#[derive(Debug)]
pub struct TrayEntry<W> {
    pub key: TrayKey,
    pub widget: W,
    /// Kept alive for as long as the entry exists.
    subscription: Option<Subscription>,
}

impl<W> TrayEntry<W> {
    pub fn new(key: TrayKey, widget: W, subscription: Option<Subscription>) -> Self {
        Self { key, widget, subscription }
    }

    pub fn kind(&self) -> SourceKind {
        self.key.kind()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

/// All tray entries, in the order they were discovered.
///
/// The registry owns every widget. Removed widgets are not dropped right away, they are retired
/// and only destroyed once [`Registry::drain_retired`] is called from an idle point of the event
/// loop.
#[derive(Debug)]
pub struct Registry<W> {
    entries: Vec<TrayEntry<W>>,
    retired: Vec<W>,
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self { entries: Vec::new(), retired: Vec::new() }
    }
}

impl<W> Registry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &TrayKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &TrayKey) -> Option<&TrayEntry<W>> {
        self.position(key).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, key: &TrayKey) -> Option<&mut TrayEntry<W>> {
        self.position(key).map(move |i| &mut self.entries[i])
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrayEntry<W>> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TrayKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    pub fn keys_of(&self, kind: SourceKind) -> impl Iterator<Item = &TrayKey> {
        self.keys().filter(move |key| key.kind() == kind)
    }

    /// Add a new entry at the end. Returns `false` and leaves the registry untouched if the key
    /// is already present.
    pub fn insert(&mut self, entry: TrayEntry<W>) -> bool {
        if self.contains(&entry.key) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry for `key`, retiring its widget. Its subscription is stopped immediately.
    pub fn remove(&mut self, key: &TrayKey) -> bool {
        match self.position(key) {
            Some(i) => {
                let TrayEntry { widget, .. } = self.entries.remove(i);
                self.retired.push(widget);
                true
            }
            None => false,
        }
    }

    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Hand out all widgets removed since the last call, so they can be destroyed.
    pub fn drain_retired(&mut self) -> Vec<W> {
        std::mem::take(&mut self.retired)
    }

    fn position(&self, key: &TrayKey) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sni(path: &str) -> TrayKey {
        TrayKey::StatusNotifierItem(path.to_string())
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = Registry::new();
        assert!(registry.insert(TrayEntry::new(TrayKey::X11Window(5), "first", None)));
        assert!(!registry.insert(TrayEntry::new(TrayKey::X11Window(5), "second", None)));
        assert_eq!(1, registry.len());
        assert_eq!(Some(&"first"), registry.get(&TrayKey::X11Window(5)).map(|e| &e.widget));
    }

    #[test]
    fn test_keeps_insertion_order() {
        let mut registry = Registry::new();
        registry.insert(TrayEntry::new(TrayKey::X11Window(9), (), None));
        registry.insert(TrayEntry::new(sni("/a"), (), None));
        registry.insert(TrayEntry::new(TrayKey::X11Window(5), (), None));
        registry.remove(&sni("/a"));
        registry.insert(TrayEntry::new(sni("/a"), (), None));

        let keys: Vec<_> = registry.keys().cloned().collect();
        assert_eq!(vec![TrayKey::X11Window(9), TrayKey::X11Window(5), sni("/a")], keys);
        let windows: Vec<_> = registry.keys_of(SourceKind::X11Window).collect();
        assert_eq!(vec![&TrayKey::X11Window(9), &TrayKey::X11Window(5)], windows);
    }

    #[test]
    fn test_remove_retires_widget() {
        let mut registry = Registry::new();
        registry.insert(TrayEntry::new(TrayKey::X11Window(5), String::from("five"), None));
        assert!(registry.remove(&TrayKey::X11Window(5)));
        assert!(!registry.remove(&TrayKey::X11Window(5)));
        assert!(registry.is_empty());
        assert_eq!(1, registry.retired_count());
        assert_eq!(vec![String::from("five")], registry.drain_retired());
        assert_eq!(0, registry.retired_count());
    }
}
