//! Tray keys: the string identifiers the dock uses to refer to a single tray icon.
//!
//! A key carries both the protocol that published the icon and the protocol-specific handle,
//! so it can be handed out to the host as a plain string and decoded again without any lookup:
//!
//! - XEmbed icons are `x:<window id>`, e.g. `x:62914566`
//! - StatusNotifierItems are `sni:<service>`, e.g. `sni::1.50/org/ayatana/NotificationItem/nm_applet`

use thiserror::Error;

pub const X11_KEY_PREFIX: &str = "x:";
pub const SNI_KEY_PREFIX: &str = "sni:";

/// The protocol a tray icon was published with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A window embedded through the legacy X11 tray manager.
    X11Window,
    /// An item registered with the StatusNotifierWatcher.
    StatusNotifierItem,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::X11Window => write!(f, "xembed"),
            SourceKind::StatusNotifierItem => write!(f, "sni"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Tray key {0:?} has no known source prefix")]
    UnknownTag(String),
    #[error("Tray key {0:?} does not contain a valid window id")]
    InvalidWindowId(String),
}

/// Identifies one tray icon, together with the protocol it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrayKey {
    X11Window(u32),
    StatusNotifierItem(String),
}

impl TrayKey {
    pub fn kind(&self) -> SourceKind {
        match self {
            TrayKey::X11Window(_) => SourceKind::X11Window,
            TrayKey::StatusNotifierItem(_) => SourceKind::StatusNotifierItem,
        }
    }

    pub fn window_id(&self) -> Option<u32> {
        match self {
            TrayKey::X11Window(id) => Some(*id),
            TrayKey::StatusNotifierItem(_) => None,
        }
    }

    pub fn service_path(&self) -> Option<&str> {
        match self {
            TrayKey::StatusNotifierItem(path) => Some(path),
            TrayKey::X11Window(_) => None,
        }
    }

    /// Decode `key`, but only if it was produced by the given source.
    ///
    /// Anything else, including an `x:` key whose suffix isn't a window id, is "not mine".
    pub fn parse_as(key: &str, kind: SourceKind) -> Option<TrayKey> {
        key.parse::<TrayKey>().ok().filter(|k| k.kind() == kind)
    }
}

impl std::fmt::Display for TrayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrayKey::X11Window(id) => write!(f, "{}{}", X11_KEY_PREFIX, id),
            TrayKey::StatusNotifierItem(path) => write!(f, "{}{}", SNI_KEY_PREFIX, path),
        }
    }
}

impl std::str::FromStr for TrayKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix(X11_KEY_PREFIX) {
            // u32::from_str accepts a leading '+' and zeros, neither of which Display produces
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) || (id.starts_with('0') && id != "0") {
                return Err(KeyError::InvalidWindowId(s.to_string()));
            }
            id.parse().map(TrayKey::X11Window).map_err(|_| KeyError::InvalidWindowId(s.to_string()))
        } else if let Some(path) = s.strip_prefix(SNI_KEY_PREFIX) {
            Ok(TrayKey::StatusNotifierItem(path.to_string()))
        } else {
            Err(KeyError::UnknownTag(s.to_string()))
        }
    }
}

impl From<u32> for TrayKey {
    fn from(window_id: u32) -> Self {
        TrayKey::X11Window(window_id)
    }
}

impl serde::Serialize for TrayKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode() {
        assert_eq!("x:5", TrayKey::X11Window(5).to_string());
        assert_eq!("sni:/org/a/Item", TrayKey::StatusNotifierItem("/org/a/Item".into()).to_string());
        assert_eq!("sni:", TrayKey::StatusNotifierItem(String::new()).to_string());
    }

    #[test]
    fn test_decode_round_trips() {
        let keys = [
            TrayKey::X11Window(0),
            TrayKey::X11Window(u32::MAX),
            TrayKey::StatusNotifierItem(":1.50/org/ayatana/NotificationItem/nm_applet".into()),
            TrayKey::StatusNotifierItem(String::new()),
            TrayKey::StatusNotifierItem("x:12".into()),
        ];
        for key in keys {
            assert_eq!(Ok(key.clone()), key.to_string().parse::<TrayKey>());
        }
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(Err(KeyError::InvalidWindowId("x:abc".into())), "x:abc".parse::<TrayKey>());
        assert_eq!(Err(KeyError::InvalidWindowId("x:".into())), "x:".parse::<TrayKey>());
        assert_eq!(Err(KeyError::InvalidWindowId("x:+5".into())), "x:+5".parse::<TrayKey>());
        assert_eq!(Err(KeyError::InvalidWindowId("x:05".into())), "x:05".parse::<TrayKey>());
        assert_eq!(Err(KeyError::InvalidWindowId("x:00".into())), "x:00".parse::<TrayKey>());
        assert_eq!(Ok(TrayKey::X11Window(0)), "x:0".parse::<TrayKey>());
        assert_eq!(Err(KeyError::InvalidWindowId("x:4294967296".into())), "x:4294967296".parse::<TrayKey>());
        assert_eq!(Err(KeyError::UnknownTag("system-tray".into())), "system-tray".parse::<TrayKey>());
    }

    #[test]
    fn test_parse_as_foreign_kind() {
        assert_eq!(None, TrayKey::parse_as("sni:/org/a/Item", SourceKind::X11Window));
        assert_eq!(None, TrayKey::parse_as("x:5", SourceKind::StatusNotifierItem));
        assert_eq!(None, TrayKey::parse_as("x:not-a-number", SourceKind::X11Window));
        assert_eq!(Some(TrayKey::X11Window(5)), TrayKey::parse_as("x:5", SourceKind::X11Window));
    }

    #[test]
    fn test_kind_follows_key() {
        assert_eq!(SourceKind::X11Window, TrayKey::from(9).kind());
        assert_eq!(Some(9), TrayKey::from(9).window_id());
        assert_eq!(None, TrayKey::StatusNotifierItem("/a".into()).window_id());
        assert_eq!(Some("/a"), TrayKey::StatusNotifierItem("/a".into()).service_path());
    }
}
