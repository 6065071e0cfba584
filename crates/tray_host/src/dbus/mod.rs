//! # DBus interface proxies
//!
//! Client side of the services the tray talks to. The StatusNotifier interfaces follow the
//! [freedesktop specification](https://freedesktop.org/wiki/Specifications/StatusNotifierItem/),
//! the tray manager is the one exported by the Deepin desktop daemon, which embeds XEmbed icons
//! on behalf of the dock.

mod dbus_status_notifier_item;
pub use dbus_status_notifier_item::*;

mod dbus_status_notifier_watcher;
pub use dbus_status_notifier_watcher::*;

mod dbus_tray_manager;
pub use dbus_tray_manager::*;
