use crate::{error::Result, SourceKind, TrayKey};

/// Something that knows which tray icons of one protocol currently exist.
///
/// Sources are only ever queried for their complete current set; the reconciler works out what
/// changed.
#[allow(async_fn_in_trait)]
pub trait TraySource {
    fn kind(&self) -> SourceKind;

    /// The keys of every icon this source currently publishes.
    async fn list_current(&self) -> Result<Vec<TrayKey>>;
}

/// A source that can be switched off. Switched off, it never has any icons.
#[derive(Debug, Clone)]
pub struct OptionalSource<T> {
    kind: SourceKind,
    inner: Option<T>,
}

impl<T: TraySource> OptionalSource<T> {
    pub fn on(source: T) -> Self {
        Self { kind: source.kind(), inner: Some(source) }
    }

    pub fn off(kind: SourceKind) -> Self {
        Self { kind, inner: None }
    }
}

impl<T: TraySource> TraySource for OptionalSource<T> {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn list_current(&self) -> Result<Vec<TrayKey>> {
        match &self.inner {
            Some(source) => source.list_current().await,
            None => Ok(Vec::new()),
        }
    }
}
