use crate::{EventSender, Subscription, TrayKey};

/// The displayable part of a tray entry. How it is drawn is up to the dock.
pub trait TrayWidget {
    /// The icon behind this widget changed and should be reloaded.
    fn update_icon(&mut self);
}

/// Builds widgets for newly discovered tray icons.
pub trait WidgetFactory {
    type Widget: TrayWidget;

    /// Create the widget for `key`. Returning `None` skips the icon for this pass.
    fn create(&mut self, key: &TrayKey) -> Option<Self::Widget>;

    /// Start forwarding per-item updates of `key` into `events`, if the protocol has any.
    fn subscribe(&mut self, _key: &TrayKey, _events: &EventSender) -> Option<Subscription> {
        None
    }
}
