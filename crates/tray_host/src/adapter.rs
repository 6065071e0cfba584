//! The boundary to the dock: pushing the current icons to it, and answering its questions about
//! single items.

use crate::{error::Result, ContainerSettings, Registry, SourceKind, TrayKey, WindowClassLookup};

/// Name the tray registers itself under with the dock.
pub const APPLET_ITEM_KEY: &str = "system-tray";

/// The dock the tray is shown in.
pub trait DockHost<W> {
    /// Register a dock item for the tray.
    fn add_item(&mut self, item_key: &str);

    /// Replace everything the dock shows with `items`, in this order.
    fn refresh_items(&mut self, items: &[DockItem<'_, W>]);

    /// A single icon was redrawn, the set of items is unchanged.
    fn item_icon_changed(&mut self, _key: &TrayKey, _widget: &W) {}
}

/// One icon as handed to the dock on a refresh.
#[derive(Debug)]
pub struct DockItem<'a, W> {
    pub key: &'a TrayKey,
    pub widget: &'a W,
    pub allow_container: bool,
    pub in_container: bool,
}

/// Whether the user moved an application's icon into the secondary container.
///
/// Choices are remembered per application (by window class), not per tray key, since window ids
/// change every time an application restarts.
pub struct ContainerPreferences {
    settings: ContainerSettings,
    lookup: Box<dyn WindowClassLookup>,
}

impl ContainerPreferences {
    pub fn new(settings: ContainerSettings, lookup: impl WindowClassLookup + 'static) -> Self {
        Self { settings, lookup: Box::new(lookup) }
    }

    /// StatusNotifierItems have no window to take a class from, so only XEmbed icons can be moved.
    pub fn allow_container(&self, key: &TrayKey) -> bool {
        key.kind() == SourceKind::X11Window
    }

    pub fn is_in_container(&self, key: &TrayKey) -> bool {
        match self.preference_key(key) {
            Some(class) => self.settings.get(&class),
            None => false,
        }
    }

    /// Remember the choice for `key`'s application. Returns whether there was an application to
    /// remember it for.
    pub fn set_in_container(&mut self, key: &TrayKey, in_container: bool) -> Result<bool> {
        let Some(class) = self.preference_key(key) else {
            return Ok(false);
        };
        self.settings.set(&class, in_container)?;
        Ok(true)
    }

    /// Re-read the stored choices, picking up changes made by other processes.
    pub fn reload(&mut self) -> Result<()> {
        self.settings.reload()
    }

    fn preference_key(&self, key: &TrayKey) -> Option<String> {
        self.lookup.window_class(key.window_id()?)
    }
}

/// Answers the dock's per-item queries and keeps its view of the tray up to date.
pub struct HostAdapter<H> {
    host: H,
    containers: ContainerPreferences,
}

impl<H> HostAdapter<H> {
    pub fn new(host: H, containers: ContainerPreferences) -> Self {
        Self { host, containers }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn register<W>(&mut self)
    where
        H: DockHost<W>,
    {
        self.host.add_item(APPLET_ITEM_KEY);
    }

    /// Hand the complete, current list of widgets to the dock.
    pub fn refresh<W>(&mut self, registry: &Registry<W>)
    where
        H: DockHost<W>,
    {
        let items: Vec<_> = registry
            .entries()
            .map(|entry| DockItem {
                key: &entry.key,
                widget: &entry.widget,
                allow_container: self.containers.allow_container(&entry.key),
                in_container: self.containers.is_in_container(&entry.key),
            })
            .collect();
        self.host.refresh_items(&items);
    }

    /// Pick up container choices changed outside of this process. Keeps the old ones on failure.
    pub fn reload_containers(&mut self) {
        if let Err(e) = self.containers.reload() {
            log::warn!("Failed to reload container settings: {}", e);
        }
    }

    pub fn item_widget<'r, W>(&self, registry: &'r Registry<W>, item_key: &str) -> Option<&'r W> {
        let key = item_key.parse::<TrayKey>().ok()?;
        registry.get(&key).map(|entry| &entry.widget)
    }

    pub fn item_allow_container(&self, item_key: &str) -> bool {
        item_key.parse::<TrayKey>().map_or(false, |key| self.containers.allow_container(&key))
    }

    pub fn item_is_in_container(&self, item_key: &str) -> bool {
        item_key.parse::<TrayKey>().map_or(false, |key| self.containers.is_in_container(&key))
    }

    pub fn set_item_is_in_container(&mut self, item_key: &str, in_container: bool) {
        let Ok(key) = item_key.parse::<TrayKey>() else {
            log::warn!("Ignoring container change for unknown item {:?}", item_key);
            return;
        };
        match self.containers.set_in_container(&key, in_container) {
            Ok(true) => log::debug!("{} in container: {}", key, in_container),
            Ok(false) => log::debug!("No window class for {}, container change not remembered", key),
            Err(e) => log::error!("Failed to save container setting for {}: {}", key, e),
        }
    }

    /// Items are not sorted, they all compare equal and stay in discovery order.
    pub fn item_sort_key(&self, _item_key: &str) -> i32 {
        0
    }
}
