use zbus::proxy;

#[proxy(
    interface = "com.deepin.dde.TrayManager",
    default_service = "com.deepin.dde.TrayManager",
    default_path = "/com/deepin/dde/TrayManager",
    gen_blocking = false
)]
pub trait TrayManager {
    /// Manage method. Claims the X11 system tray selection, returns whether that succeeded.
    fn manage(&self) -> zbus::Result<bool>;

    /// Added signal
    #[zbus(signal)]
    fn added(&self, id: u32) -> zbus::Result<()>;

    /// Removed signal
    #[zbus(signal)]
    fn removed(&self, id: u32) -> zbus::Result<()>;

    /// Changed signal
    #[zbus(signal)]
    fn changed(&self, id: u32) -> zbus::Result<()>;

    /// TrayIcons property
    #[zbus(property)]
    fn tray_icons(&self) -> zbus::Result<Vec<u32>>;
}
