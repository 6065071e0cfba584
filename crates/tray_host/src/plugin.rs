use std::time::Duration;

use crate::{
    error::Result,
    reconcile::{self, ReconcileOutcome},
    DockHost, EventReceiver, EventSender, HostAdapter, Registry, TrayEvent, TrayKey, TraySource, TrayWidget,
    WidgetFactory,
};

/// The system tray: keeps the registry in sync with both tray protocols and the dock in sync with
/// the registry.
///
/// Everything happens on a single task, one [`TrayEvent`] at a time (see [`SystemTray::run`]).
/// The only thing running concurrently is the settle timer for the X11 source, which reports back
/// through the event channel.
pub struct SystemTray<F: WidgetFactory, H> {
    registry: Registry<F::Widget>,
    factory: F,
    adapter: HostAdapter<H>,
    events: EventSender,
    x11_settle_delay: Duration,
    x11_pass_scheduled: bool,
}

impl<F, H> SystemTray<F, H>
where
    F: WidgetFactory,
    H: DockHost<F::Widget>,
{
    pub fn new(factory: F, adapter: HostAdapter<H>, events: EventSender, x11_settle_delay: Duration) -> Self {
        Self { registry: Registry::new(), factory, adapter, events, x11_settle_delay, x11_pass_scheduled: false }
    }

    /// Register with the dock and schedule the first pass of both sources.
    pub fn init(&mut self) {
        self.adapter.register::<F::Widget>();
        for event in [TrayEvent::X11IconsChanged, TrayEvent::SniItemsChanged] {
            // we hold a sender ourselves, so the channel can't be closed here
            let _ = self.events.send(event);
        }
    }

    /// Handle events until a [`TrayEvent::Shutdown`] arrives or every sender is gone.
    pub async fn run(&mut self, x11: &impl TraySource, sni: &impl TraySource, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            if event == TrayEvent::Shutdown {
                log::info!("Shutting down system tray");
                break;
            }
            self.handle_event(event, x11, sni).await;

            // the event is fully handled, nothing refers to removed widgets anymore
            self.collect_retired();
        }
    }

    pub async fn handle_event(&mut self, event: TrayEvent, x11: &impl TraySource, sni: &impl TraySource) {
        match event {
            TrayEvent::X11IconsChanged => self.schedule_x11_pass(),
            TrayEvent::X11Settled => {
                self.x11_pass_scheduled = false;
                self.reconcile_logging_errors(x11).await;
            }
            TrayEvent::SniItemsChanged => self.reconcile_logging_errors(sni).await,
            TrayEvent::X11IconChanged(window_id) => self.update_icon(&TrayKey::X11Window(window_id)),
            TrayEvent::ItemIconChanged(key) => self.update_icon(&key),
            TrayEvent::ContainersChanged => {
                self.adapter.reload_containers();
                self.adapter.refresh(&self.registry);
            }
            TrayEvent::Shutdown => {}
        }
    }

    /// Run one reconciliation pass of `source`. On error, the registry is left untouched.
    pub async fn reconcile(&mut self, source: &impl TraySource) -> Result<ReconcileOutcome> {
        let kind = source.kind();
        log::debug!("Reconciling {} icons", kind);
        let snapshot = source.list_current().await?;
        let outcome = reconcile::reconcile_snapshot(&mut self.registry, &mut self.factory, &self.events, kind, snapshot)?;
        if !outcome.is_empty() {
            self.adapter.refresh(&self.registry);
        }
        Ok(outcome)
    }

    /// Destroy all widgets removed since the last call. Returns how many there were.
    pub fn collect_retired(&mut self) -> usize {
        let retired = self.registry.drain_retired();
        if !retired.is_empty() {
            log::debug!("Destroying {} removed tray widgets", retired.len());
        }
        retired.len()
    }

    pub fn registry(&self) -> &Registry<F::Widget> {
        &self.registry
    }

    pub fn adapter(&self) -> &HostAdapter<H> {
        &self.adapter
    }

    pub fn item_widget(&self, item_key: &str) -> Option<&F::Widget> {
        self.adapter.item_widget(&self.registry, item_key)
    }

    pub fn item_allow_container(&self, item_key: &str) -> bool {
        self.adapter.item_allow_container(item_key)
    }

    pub fn item_is_in_container(&self, item_key: &str) -> bool {
        self.adapter.item_is_in_container(item_key)
    }

    pub fn set_item_is_in_container(&mut self, item_key: &str, in_container: bool) {
        self.adapter.set_item_is_in_container(item_key, in_container)
    }

    pub fn item_sort_key(&self, item_key: &str) -> i32 {
        self.adapter.item_sort_key(item_key)
    }

    async fn reconcile_logging_errors(&mut self, source: &impl TraySource) {
        if let Err(e) = self.reconcile(source).await {
            log::warn!("Abandoned reconciliation of {} icons: {}", source.kind(), e);
        }
    }

    /// The dock embeds windows asynchronously, so the tray manager's list is only asked for once
    /// things had some time to settle. Triggers arriving while a pass is already scheduled are
    /// folded into it.
    fn schedule_x11_pass(&mut self) {
        if self.x11_pass_scheduled {
            log::debug!("X11 pass already scheduled");
            return;
        }
        self.x11_pass_scheduled = true;

        let events = self.events.clone();
        let delay = self.x11_settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(TrayEvent::X11Settled);
        });
    }

    fn update_icon(&mut self, key: &TrayKey) {
        let Some(entry) = self.registry.get_mut(key) else {
            log::debug!("Icon change for unknown tray icon {}", key);
            return;
        };
        entry.widget.update_icon();
        self.adapter.host_mut().item_icon_changed(&entry.key, &entry.widget);
    }
}

impl<F: WidgetFactory, H> SystemTray<F, H> {
    pub fn is_x11_pass_scheduled(&self) -> bool {
        self.x11_pass_scheduled
    }
}
