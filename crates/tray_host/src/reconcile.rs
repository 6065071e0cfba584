//! Diffing a source's current set of icons against the registry.
//!
//! A pass is split in two halves: [`ReconcilePlan::compute`] looks at one snapshot of a source and
//! decides everything that has to change, [`apply`] then performs those changes. Nothing is
//! mutated if the snapshot is rejected, so the registry always stays at its last good state.

use std::collections::HashSet;

use crate::{error::*, EventSender, Registry, SourceKind, TrayEntry, TrayKey, WidgetFactory};

/// The changes a single reconciliation pass of one source is going to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub kind: SourceKind,
    pub removals: Vec<TrayKey>,
    pub additions: Vec<TrayKey>,
}

impl ReconcilePlan {
    /// Compare `snapshot`, the complete current key set of the `kind` source, with the registry.
    ///
    /// Entries of the other source are never considered for removal. Duplicate keys in the
    /// snapshot are collapsed, keeping the position of their first occurrence.
    pub fn compute<W>(registry: &Registry<W>, kind: SourceKind, snapshot: Vec<TrayKey>) -> Result<Self> {
        if let Some(key) = snapshot.iter().find(|key| key.kind() != kind) {
            return Err(Error::ForeignKey { kind, key: key.clone() });
        }

        let mut seen = HashSet::new();
        let current: Vec<TrayKey> = snapshot.into_iter().filter(|key| seen.insert(key.clone())).collect();

        let removals = registry.keys_of(kind).filter(|key| !seen.contains(*key)).cloned().collect();
        let additions = current.into_iter().filter(|key| !registry.contains(key)).collect();

        Ok(ReconcilePlan { kind, removals, additions })
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }
}

/// What a pass actually changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub removed: Vec<TrayKey>,
    pub added: Vec<TrayKey>,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Perform `plan` on the registry. Removals go first, so that an icon which vanished and came
/// back within one snapshot is never mistaken for one that stayed.
pub fn apply<F: WidgetFactory>(
    plan: ReconcilePlan,
    registry: &mut Registry<F::Widget>,
    factory: &mut F,
    events: &EventSender,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for key in plan.removals {
        if registry.remove(&key) {
            log::info!("Removed tray icon {}", key);
            outcome.removed.push(key);
        }
    }

    for key in plan.additions {
        let Some(widget) = factory.create(&key) else {
            log::warn!("Could not create a widget for tray icon {}", key);
            continue;
        };
        let subscription = factory.subscribe(&key, events);
        if registry.insert(TrayEntry::new(key.clone(), widget, subscription)) {
            log::info!("Added tray icon {}", key);
            outcome.added.push(key);
        }
    }

    outcome
}

/// Compute and apply a pass for one snapshot of the `kind` source.
pub fn reconcile_snapshot<F: WidgetFactory>(
    registry: &mut Registry<F::Widget>,
    factory: &mut F,
    events: &EventSender,
    kind: SourceKind,
    snapshot: Vec<TrayKey>,
) -> Result<ReconcileOutcome> {
    let plan = ReconcilePlan::compute(registry, kind, snapshot)?;
    if plan.is_empty() {
        log::debug!("{} icons unchanged", kind);
        return Ok(ReconcileOutcome::default());
    }
    Ok(apply(plan, registry, factory, events))
}
