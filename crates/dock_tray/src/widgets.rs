use std::io::Write;

use serde::Serialize;
use tray_host::{DockHost, DockItem, EventSender, Subscription, TrayKey, TrayWidget, WidgetFactory};

/// What dock-tray hands to the dock for a single icon. The dock draws it however it likes, the
/// revision tells it when to reload the icon.
#[derive(Debug, Serialize)]
pub struct TrayIcon {
    pub key: TrayKey,
    pub icon_revision: u32,
}

impl TrayWidget for TrayIcon {
    fn update_icon(&mut self) {
        self.icon_revision = self.icon_revision.wrapping_add(1);
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        log::debug!("Destroyed widget of {}", self.key);
    }
}

pub struct IconFactory {
    /// Session bus, to follow StatusNotifierItems on. `None` in setups without one.
    con: Option<zbus::Connection>,
}

impl IconFactory {
    pub fn new(con: Option<zbus::Connection>) -> Self {
        Self { con }
    }
}

impl WidgetFactory for IconFactory {
    type Widget = TrayIcon;

    fn create(&mut self, key: &TrayKey) -> Option<TrayIcon> {
        Some(TrayIcon { key: key.clone(), icon_revision: 0 })
    }

    fn subscribe(&mut self, key: &TrayKey, events: &EventSender) -> Option<Subscription> {
        tray_host::sni::subscribe_item_icon(self.con.as_ref()?, key, events)
    }
}

/// Messages written to stdout, one JSON object per line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrayUpdate<'a> {
    Registered { item: &'a str },
    Items { items: Vec<ItemLine<'a>> },
    Icon { icon: &'a TrayIcon },
}

/// An icon in an items update, together with how the dock should place it.
#[derive(Debug, Serialize)]
pub struct ItemLine<'a> {
    #[serde(flatten)]
    icon: &'a TrayIcon,
    allow_container: bool,
    in_container: bool,
}

impl<'a> From<&DockItem<'a, TrayIcon>> for ItemLine<'a> {
    fn from(item: &DockItem<'a, TrayIcon>) -> Self {
        Self { icon: item.widget, allow_container: item.allow_container, in_container: item.in_container }
    }
}

/// A "dock" that writes every change to stdout, for panels that read their tray from a command.
pub struct JsonLinesHost<Out: Write> {
    out: Out,
}

impl<Out: Write> JsonLinesHost<Out> {
    pub fn new(out: Out) -> Self {
        Self { out }
    }

    fn emit(&mut self, update: &TrayUpdate) {
        let result = serde_json::to_writer(&mut self.out, update)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::error!("Failed to write tray update: {}", e);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Out {
        self.out
    }
}

impl<Out: Write> DockHost<TrayIcon> for JsonLinesHost<Out> {
    fn add_item(&mut self, item_key: &str) {
        self.emit(&TrayUpdate::Registered { item: item_key });
    }

    fn refresh_items(&mut self, items: &[DockItem<'_, TrayIcon>]) {
        self.emit(&TrayUpdate::Items { items: items.iter().map(ItemLine::from).collect() });
    }

    fn item_icon_changed(&mut self, _key: &TrayKey, widget: &TrayIcon) {
        self.emit(&TrayUpdate::Icon { icon: widget });
    }
}
