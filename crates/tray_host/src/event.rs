use crate::TrayKey;

/// Everything the tray reacts to. All of these are handled one at a time on the tray's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// The tray manager's set of embedded windows may have changed.
    X11IconsChanged,
    /// The icon of an embedded window changed. Membership is unaffected.
    X11IconChanged(u32),
    /// The settle delay scheduled by [`TrayEvent::X11IconsChanged`] has passed.
    X11Settled,
    /// An item was registered with or unregistered from the StatusNotifierWatcher.
    SniItemsChanged,
    /// A StatusNotifierItem announced a new icon.
    ItemIconChanged(TrayKey),
    /// The stored container choices were changed by another process.
    ContainersChanged,
    Shutdown,
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<TrayEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<TrayEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// A background task forwarding updates of a single tray entry. The task stops when this is dropped.
#[derive(Debug)]
pub struct Subscription(tokio::task::AbortHandle);

impl Subscription {
    pub fn new(task: tokio::task::JoinHandle<()>) -> Self {
        Self(task.abort_handle())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.0.abort();
    }
}
