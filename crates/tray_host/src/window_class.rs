use x11rb::{properties::WmClass, rust_connection::RustConnection};

use crate::error::Result;

/// Resolves the `WM_CLASS` of a window, the stable identity of the application behind a tray icon.
pub trait WindowClassLookup {
    /// `"<class>-<instance>"` for the window, or `None` if it can't be determined.
    fn window_class(&self, window_id: u32) -> Option<String>;
}

/// Looks window classes up on the X server.
pub struct X11WindowClassLookup {
    conn: RustConnection,
}

impl X11WindowClassLookup {
    pub fn connect() -> Result<Self> {
        let (conn, _) = RustConnection::connect(None)?;
        Ok(Self { conn })
    }
}

impl WindowClassLookup for X11WindowClassLookup {
    fn window_class(&self, window_id: u32) -> Option<String> {
        let cookie = match WmClass::get(&self.conn, window_id) {
            Ok(cookie) => cookie,
            Err(e) => {
                log::debug!("Failed to request WM_CLASS of {}: {}", window_id, e);
                return None;
            }
        };
        match cookie.reply() {
            Ok(Some(wm_class)) => format_window_class(wm_class.class(), wm_class.instance()),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Failed to get WM_CLASS of {}: {}", window_id, e);
                None
            }
        }
    }
}

/// Lookup for when there is no X server to ask.
impl WindowClassLookup for () {
    fn window_class(&self, _window_id: u32) -> Option<String> {
        None
    }
}

fn format_window_class(class: &[u8], instance: &[u8]) -> Option<String> {
    if class.is_empty() && instance.is_empty() {
        return None;
    }
    Some(format!("{}-{}", String::from_utf8_lossy(class), String::from_utf8_lossy(instance)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_window_class() {
        assert_eq!(Some("Nm-applet-nm-applet".to_string()), format_window_class(b"Nm-applet", b"nm-applet"));
        assert_eq!(Some("Steam-".to_string()), format_window_class(b"Steam", b""));
        assert_eq!(None, format_window_class(b"", b""));
    }
}
