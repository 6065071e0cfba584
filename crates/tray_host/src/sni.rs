//! The StatusNotifierItem side of the tray: talking to the StatusNotifierWatcher, and following
//! individual items.

use futures::StreamExt;

use crate::{dbus, error::*, EventSender, SourceKind, Subscription, TrayEvent, TrayKey, TraySource};

/// Object path items are expected at when they only registered a bus name.
pub const ITEM_OBJECT: &str = "/StatusNotifierItem";

/// Register this connection as a StatusNotifierHost.
///
/// Returns the well-known name that was claimed, together with a proxy to the watcher.
pub async fn register_host(con: &zbus::Connection) -> Result<(String, dbus::StatusNotifierWatcherProxy<'static>)> {
    // From <https://www.freedesktop.org/wiki/Specifications/StatusNotifierItem/StatusNotifierHost/>:
    //
    // Instances of this service are registered on the Dbus session bus, under a name on the
    // form org.freedesktop.StatusNotifierHost-id where id is an unique identifier, that keeps
    // the names unique on the bus, such as the process-id of the application or another type
    // of identifier if more that one StatusNotifierHost is registered by the same process.
    //
    // The watcher we talk to is the KDE one, so the name follows its namespace.
    let pid = std::process::id();
    let mut i = 0;
    let wellknown_name = loop {
        let wellknown_name = format!("org.kde.StatusNotifierHost-{}-{}", pid, i);
        let flags = [zbus::fdo::RequestNameFlags::DoNotQueue];

        use zbus::fdo::RequestNameReply::*;
        match con.request_name_with_flags(wellknown_name.as_str(), flags.into_iter().collect()).await? {
            PrimaryOwner => break wellknown_name,
            Exists | AlreadyOwner => {}
            InQueue => {
                return Err(zbus::Error::Failure(format!("Queued for {} even though DoNotQueue was given", wellknown_name)).into())
            }
        };

        i += 1;
    };

    // properties are read on every pass, a stale cache would defeat the reconciliation
    let snw = dbus::StatusNotifierWatcherProxy::builder(con).cache_properties(zbus::CacheProperties::No).build().await?;
    snw.register_status_notifier_host(&wellknown_name).await?;
    log::info!("Registered as StatusNotifierHost {}", wellknown_name);

    Ok((wellknown_name, snw))
}

/// The StatusNotifierItems registered with the watcher.
#[derive(Clone)]
pub struct SniSource {
    snw: dbus::StatusNotifierWatcherProxy<'static>,
}

impl SniSource {
    pub fn new(snw: dbus::StatusNotifierWatcherProxy<'static>) -> Self {
        Self { snw }
    }

    /// Post a [`TrayEvent::SniItemsChanged`] whenever an item comes or goes. Runs until the
    /// watcher's signal streams end or nobody listens for events anymore.
    pub async fn forward_changes(&self, events: EventSender) -> Result<()> {
        let new_items = self.snw.receive_status_notifier_item_registered().await?;
        let gone_items = self.snw.receive_status_notifier_item_unregistered().await?;

        let mut changes = futures::stream::select(new_items.map(|_| ()), gone_items.map(|_| ()));
        while changes.next().await.is_some() {
            if events.send(TrayEvent::SniItemsChanged).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl TraySource for SniSource {
    fn kind(&self) -> SourceKind {
        SourceKind::StatusNotifierItem
    }

    async fn list_current(&self) -> Result<Vec<TrayKey>> {
        let items = self.snw.registered_status_notifier_items().await?;
        Ok(items.into_iter().map(TrayKey::StatusNotifierItem).collect())
    }
}

/// Split an address as listed by the watcher into bus name and object path.
///
/// The format is `{bus}{object_path}` (e.g. `:1.50/org/ayatana/NotificationItem/nm_applet`),
/// which is what the [RegisteredStatusNotifierItems property][rsni] contains. Items that only
/// registered a bus name live at [`ITEM_OBJECT`].
///
/// [rsni]: https://freedesktop.org/wiki/Specifications/StatusNotifierItem/StatusNotifierWatcher/#registeredstatusnotifieritems
pub fn split_service_address(service: &str) -> Result<(String, String)> {
    match service.split_once('/') {
        Some(("", _)) => Err(Error::DbusAddressError(service.to_owned())),
        Some((addr, path)) => Ok((addr.to_owned(), format!("/{}", path))),
        None if service.is_empty() => Err(Error::DbusAddressError(service.to_owned())),
        None => Ok((service.to_owned(), ITEM_OBJECT.to_owned())),
    }
}

/// Build a proxy for the item at `service`.
pub async fn item_proxy(con: &zbus::Connection, service: &str) -> Result<dbus::StatusNotifierItemProxy<'static>> {
    let (addr, path) = split_service_address(service)?;
    Ok(dbus::StatusNotifierItemProxy::builder(con).destination(addr)?.path(path)?.build().await?)
}

/// Follow the icon of the item behind `key`, posting [`TrayEvent::ItemIconChanged`] for every
/// change. Returns `None` for keys that aren't StatusNotifierItems.
pub fn subscribe_item_icon(con: &zbus::Connection, key: &TrayKey, events: &EventSender) -> Option<Subscription> {
    let service = key.service_path()?.to_owned();
    let con = con.clone();
    let key = key.clone();
    let events = events.clone();

    let task = tokio::spawn(async move {
        if let Err(e) = forward_item_icon(&con, &service, &key, events).await {
            log::warn!("Stopped following the icon of {}: {}", key, e);
        }
    });
    Some(Subscription::new(task))
}

async fn forward_item_icon(con: &zbus::Connection, service: &str, key: &TrayKey, events: EventSender) -> Result<()> {
    let sni = item_proxy(con, service).await?;
    let mut icon_updates = futures::stream::select(
        sni.receive_new_icon().await?.map(|_| ()),
        sni.receive_new_attention_icon().await?.map(|_| ()),
    );
    while icon_updates.next().await.is_some() {
        if events.send(TrayEvent::ItemIconChanged(key.clone())).is_err() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_service_address() {
        assert_eq!(
            (":1.50".to_string(), "/org/ayatana/NotificationItem/nm_applet".to_string()),
            split_service_address(":1.50/org/ayatana/NotificationItem/nm_applet").unwrap()
        );
        assert_eq!((":1.7".to_string(), ITEM_OBJECT.to_string()), split_service_address(":1.7").unwrap());
        assert_eq!(
            ("org.kde.StatusNotifierItem-42-1".to_string(), ITEM_OBJECT.to_string()),
            split_service_address("org.kde.StatusNotifierItem-42-1").unwrap()
        );
    }

    #[test]
    fn test_split_service_address_rejects_pathless_or_busless() {
        assert!(matches!(split_service_address("/org/a/Item"), Err(Error::DbusAddressError(_))));
        assert!(matches!(split_service_address(""), Err(Error::DbusAddressError(_))));
    }
}
