//! Stand-ins for the dock, the widgets and the tray protocols.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use tokio::sync::oneshot;

use crate::{
    error::*, DockHost, DockItem, EventSender, SourceKind, Subscription, TrayKey, TraySource, TrayWidget, WidgetFactory,
    WindowClassLookup,
};

#[derive(Debug)]
pub struct FakeWidget {
    pub key: TrayKey,
    pub icon_updates: usize,
    drops: Rc<Cell<usize>>,
}

impl TrayWidget for FakeWidget {
    fn update_icon(&mut self) {
        self.icon_updates += 1;
    }
}

impl Drop for FakeWidget {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct FakeFactory {
    pub created: Vec<TrayKey>,
    /// Keys for which widget creation fails.
    pub refuse: Vec<TrayKey>,
    /// Whether created widgets get a subscription.
    subscribe: bool,
    /// For every subscription handed out, a receiver that closes once its task is gone.
    pub subscriptions: Vec<(TrayKey, oneshot::Receiver<()>)>,
    drops: Rc<Cell<usize>>,
}

impl FakeFactory {
    pub fn refusing(keys: &[TrayKey]) -> Self {
        Self { refuse: keys.to_vec(), ..Self::default() }
    }

    /// Subscribes every new entry to a task that never finishes on its own.
    pub fn subscribing() -> Self {
        Self { subscribe: true, ..Self::default() }
    }

    pub fn dropped(&self) -> usize {
        self.drops.get()
    }

    pub fn drop_counter(&self) -> Rc<Cell<usize>> {
        self.drops.clone()
    }
}

impl WidgetFactory for FakeFactory {
    type Widget = FakeWidget;

    fn create(&mut self, key: &TrayKey) -> Option<FakeWidget> {
        if self.refuse.contains(key) {
            return None;
        }
        self.created.push(key.clone());
        Some(FakeWidget { key: key.clone(), icon_updates: 0, drops: self.drops.clone() })
    }

    fn subscribe(&mut self, key: &TrayKey, _events: &EventSender) -> Option<Subscription> {
        if !self.subscribe {
            return None;
        }
        let (alive, ended) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _alive = alive;
            std::future::pending::<()>().await
        });
        self.subscriptions.push((key.clone(), ended));
        Some(Subscription::new(task))
    }
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub added: Vec<String>,
    pub refreshes: Vec<Vec<String>>,
    /// Per refresh, the keys that may be moved to the container.
    pub allowed: Vec<Vec<String>>,
    /// Per refresh, the keys that are in the container.
    pub contained: Vec<Vec<String>>,
    pub icon_changes: Vec<TrayKey>,
}

impl<W> DockHost<W> for RecordingHost {
    fn add_item(&mut self, item_key: &str) {
        self.added.push(item_key.to_string());
    }

    fn refresh_items(&mut self, items: &[DockItem<'_, W>]) {
        self.refreshes.push(keys_where(items, |_| true));
        self.allowed.push(keys_where(items, |i| i.allow_container));
        self.contained.push(keys_where(items, |i| i.in_container));
    }

    fn item_icon_changed(&mut self, key: &TrayKey, _widget: &W) {
        self.icon_changes.push(key.clone());
    }
}

fn keys_where<W>(items: &[DockItem<'_, W>], pred: impl Fn(&DockItem<'_, W>) -> bool) -> Vec<String> {
    items.iter().filter(|item| pred(item)).map(|item| item.key.to_string()).collect()
}

#[derive(Debug, Default)]
pub struct FakeLookup(HashMap<u32, String>);

impl FakeLookup {
    pub fn with(classes: &[(u32, &str)]) -> Self {
        Self(classes.iter().map(|(id, class)| (*id, class.to_string())).collect())
    }
}

impl WindowClassLookup for FakeLookup {
    fn window_class(&self, window_id: u32) -> Option<String> {
        self.0.get(&window_id).cloned()
    }
}

/// A source whose current set (or failure) is controlled by the test through a shared handle.
#[derive(Debug, Clone)]
pub struct FakeSource {
    kind: SourceKind,
    current: Rc<RefCell<Option<Vec<TrayKey>>>>,
    queries: Rc<Cell<usize>>,
}

impl FakeSource {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind, current: Rc::new(RefCell::new(Some(Vec::new()))), queries: Rc::new(Cell::new(0)) }
    }

    pub fn set(&self, keys: Vec<TrayKey>) {
        *self.current.borrow_mut() = Some(keys);
    }

    pub fn set_windows(&self, ids: &[u32]) {
        self.set(ids.iter().copied().map(TrayKey::X11Window).collect());
    }

    pub fn set_items(&self, paths: &[&str]) {
        self.set(paths.iter().map(|p| TrayKey::StatusNotifierItem(p.to_string())).collect());
    }

    /// Make every query fail until the next `set`.
    pub fn fail(&self) {
        *self.current.borrow_mut() = None;
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl TraySource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn list_current(&self) -> Result<Vec<TrayKey>> {
        self.queries.set(self.queries.get() + 1);
        self.current.borrow().clone().ok_or_else(|| zbus::Error::Failure("service went away".to_string()).into())
    }
}
