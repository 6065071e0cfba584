//! The legacy side of the tray: XEmbed icons, embedded by the desktop's tray manager and listed
//! over DBus as X11 window ids.

use futures::StreamExt;

use crate::{dbus, error::*, EventSender, SourceKind, TrayEvent, TrayKey, TraySource};

/// Windows embedded by the tray manager.
#[derive(Clone)]
pub struct X11Source {
    manager: dbus::TrayManagerProxy<'static>,
}

impl X11Source {
    pub async fn new(con: &zbus::Connection) -> Result<Self> {
        let manager = dbus::TrayManagerProxy::builder(con).cache_properties(zbus::CacheProperties::No).build().await?;
        Ok(Self { manager })
    }

    /// Ask the tray manager to take ownership of the X11 system tray selection.
    pub async fn manage(&self) -> Result<bool> {
        let managed = self.manager.manage().await?;
        if !managed {
            log::warn!("Tray manager refused to manage the system tray, another tray is probably running");
        }
        Ok(managed)
    }

    /// Post tray events for the tray manager's signals: added and removed windows become
    /// [`TrayEvent::X11IconsChanged`], icon updates [`TrayEvent::X11IconChanged`].
    pub async fn forward_changes(&self, events: EventSender) -> Result<()> {
        enum ManagerEvent {
            Membership,
            Icon(dbus::Changed),
        }

        let added = self.manager.receive_added().await?;
        let removed = self.manager.receive_removed().await?;
        let changed = self.manager.receive_changed().await?;

        let mut ev_stream = futures::stream::select(
            futures::stream::select(added.map(|_| ManagerEvent::Membership), removed.map(|_| ManagerEvent::Membership)),
            changed.map(ManagerEvent::Icon),
        );
        while let Some(ev) = ev_stream.next().await {
            let event = match ev {
                ManagerEvent::Membership => TrayEvent::X11IconsChanged,
                ManagerEvent::Icon(sig) => match sig.args() {
                    Ok(args) => TrayEvent::X11IconChanged(args.id),
                    Err(e) => {
                        log::warn!("Malformed Changed signal from tray manager: {}", e);
                        continue;
                    }
                },
            };
            if events.send(event).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl TraySource for X11Source {
    fn kind(&self) -> SourceKind {
        SourceKind::X11Window
    }

    async fn list_current(&self) -> Result<Vec<TrayKey>> {
        let windows = self.manager.tray_icons().await?;
        Ok(windows.into_iter().map(TrayKey::X11Window).collect())
    }
}
