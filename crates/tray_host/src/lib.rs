//! Discovery of system tray icons for a dock.
//!
//! Icons come from two protocols: legacy XEmbed windows, embedded by the desktop's tray manager,
//! and StatusNotifierItems registered with a StatusNotifierWatcher. Both are folded into a single
//! [`Registry`], which is what the dock gets to see through a [`DockHost`].

pub mod dbus;

mod adapter;
pub use adapter::*;

mod config;
pub use config::*;

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::*;

mod key;
pub use key::*;

mod plugin;
pub use plugin::*;

pub mod reconcile;

mod registry;
pub use registry::*;

mod settings;
pub use settings::*;

pub mod sni;

mod source;
pub use source::*;

mod widget;
pub use widget::*;

mod window_class;
pub use window_class::*;

pub mod xembed;

#[cfg(test)]
mod testing;
