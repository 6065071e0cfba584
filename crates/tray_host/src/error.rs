use std::path::PathBuf;

use thiserror::Error;

use crate::{SourceKind, TrayKey};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dbus connection error")]
    DbusError(#[from] zbus::Error),
    #[error("Service path {0} was not understood")]
    DbusAddressError(String),
    #[error("Could not connect to the X server")]
    X11ConnectError(#[from] x11rb::errors::ConnectError),
    #[error("The {kind} source reported {key}, which belongs to another source")]
    ForeignKey { kind: SourceKind, key: TrayKey },
    #[error("Failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("Malformed JSON file")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
