//! # Freeze Registry
//!
//! Snapshots and restores per-body axis locks so that freezing a body is
//! reversible.
//!
//! The registry is keyed by body handle, so a body has at most one lock
//! entry at a time. It is owned by whoever drives the tool (normally the
//! [`SimulatorController`](crate::controller::SimulatorController)); there is
//! no process-wide instance.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::host::BodyStore;
use crate::locks::AxisLocks;

/// Saved state of one frozen body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEntry<B> {
    pub body: B,
    /// Axis locks the body had before it was frozen
    pub saved: AxisLocks,
}

/// Outcome of [`FreezeRegistry::restore_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Bodies whose saved locks were written back
    pub restored: usize,
    /// Entries dropped because their body no longer exists
    pub stale: usize,
}

impl RestoreSummary {
    /// Number of entries the registry held before the restore.
    pub fn total(&self) -> usize {
        self.restored + self.stale
    }
}

/// Outcome of [`FreezeRegistry::freeze_unselected`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeSummary {
    /// Locks released by the implicit restore at the start of the call
    pub previous: RestoreSummary,
    /// Bodies frozen when the call returned
    pub frozen: usize,
    /// Selected bodies that were frozen and then given back their locks
    pub released: usize,
    /// Bodies that vanished between enumeration and freezing
    pub skipped_stale: usize,
}

/// Map from body handle to its pre-freeze axis locks.
#[derive(Debug)]
pub struct FreezeRegistry<B> {
    entries: HashMap<B, LockEntry<B>>,
}

impl<B> Default for FreezeRegistry<B> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<B> FreezeRegistry<B>
where
    B: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies currently frozen by this registry.
    pub fn lock_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_locked(&self, body: B) -> bool {
        self.entries.contains_key(&body)
    }

    /// Axis locks `body` will get back on restore, if it is frozen.
    pub fn saved_locks(&self, body: B) -> Option<AxisLocks> {
        self.entries.get(&body).map(|entry| entry.saved)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LockEntry<B>> {
        self.entries.values()
    }

    /// Freeze every active body in `all_bodies` except the active ones in `selected`.
    ///
    /// Any locks already held are restored first, so a second call replaces
    /// the first one instead of stacking on top of it. Inactive bodies are
    /// left alone whether or not they are selected.
    pub fn freeze_unselected<S>(&mut self, store: &mut S, all_bodies: &[B], selected: &[B]) -> FreezeSummary
    where
        S: BodyStore<Body = B>,
    {
        let mut summary = FreezeSummary {
            previous: self.restore_all(store),
            ..FreezeSummary::default()
        };

        for &body in all_bodies {
            if !store.is_active(body) || self.entries.contains_key(&body) {
                continue;
            }
            let Some(saved) = store.axis_locks(body) else {
                summary.skipped_stale += 1;
                continue;
            };
            if let Err(err) = store.set_axis_locks(body, AxisLocks::FREEZE_ALL) {
                tracing::debug!("skipping {:?} while freezing: {}", body, err);
                summary.skipped_stale += 1;
                continue;
            }
            self.entries.insert(body, LockEntry { body, saved });
        }

        for &body in selected {
            if !store.is_active(body) {
                continue;
            }
            if let Some(entry) = self.entries.remove(&body) {
                match store.set_axis_locks(body, entry.saved) {
                    Ok(()) => summary.released += 1,
                    Err(err) => tracing::debug!("selected body {:?} vanished: {}", body, err),
                }
            }
        }

        summary.frozen = self.entries.len();
        summary
    }

    /// Write every saved lock back to its body and empty the registry.
    ///
    /// Entries whose body no longer exists are dropped without error.
    pub fn restore_all<S>(&mut self, store: &mut S) -> RestoreSummary
    where
        S: BodyStore<Body = B>,
    {
        let mut summary = RestoreSummary::default();
        for (body, entry) in self.entries.drain() {
            match store.set_axis_locks(body, entry.saved) {
                Ok(()) => summary.restored += 1,
                Err(err) => {
                    tracing::debug!("dropping lock on {:?}: {}", body, err);
                    summary.stale += 1;
                }
            }
        }
        summary
    }

    /// Restore a single body and forget its entry.
    ///
    /// Returns `false` when the body was not frozen by this registry.
    pub fn unfreeze<S>(&mut self, store: &mut S, body: B) -> bool
    where
        S: BodyStore<Body = B>,
    {
        let Some(entry) = self.entries.remove(&body) else {
            return false;
        };
        if let Err(err) = store.set_axis_locks(body, entry.saved) {
            tracing::debug!("dropping lock on {:?}: {}", body, err);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockScene;

    const ROT: AxisLocks = AxisLocks::ROTATION;
    const TY: AxisLocks = AxisLocks::TRANSLATION_Y;

    fn three_bodies() -> MockScene {
        MockScene::new()
            .with_body(1, AxisLocks::empty())
            .with_body(2, ROT)
            .with_body(3, TY)
    }

    fn freeze_from_scene(registry: &mut FreezeRegistry<u32>, scene: &mut MockScene) -> FreezeSummary {
        let all = scene.active_bodies();
        let selected = scene.selected_bodies();
        registry.freeze_unselected(scene, &all, &selected)
    }

    #[test]
    fn restore_on_empty_registry_is_noop() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::<u32>::new();

        assert_eq!(registry.restore_all(&mut scene).restored, 0);
        assert_eq!(registry.restore_all(&mut scene), RestoreSummary::default());
        assert_eq!(scene.locks(2), ROT);
    }

    #[test]
    fn freeze_then_restore_round_trips() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();

        let summary = freeze_from_scene(&mut registry, &mut scene);
        assert_eq!(summary.frozen, 3);
        assert!(scene.locks(1).is_frozen());
        assert!(scene.locks(3).is_frozen());

        let restored = registry.restore_all(&mut scene);
        assert_eq!(restored.restored, 3);
        assert!(registry.is_empty());
        assert_eq!(scene.locks(1), AxisLocks::empty());
        assert_eq!(scene.locks(2), ROT);
        assert_eq!(scene.locks(3), TY);
    }

    #[test]
    fn selected_bodies_keep_original_locks() {
        let mut scene = three_bodies();
        scene.select(&[2]);
        let mut registry = FreezeRegistry::new();

        let summary = freeze_from_scene(&mut registry, &mut scene);

        assert_eq!(summary.frozen, 2);
        assert_eq!(summary.released, 1);
        assert!(scene.locks(1).is_frozen());
        assert_eq!(scene.locks(2), ROT);
        assert!(scene.locks(3).is_frozen());
        assert!(!registry.is_locked(2));
        assert_eq!(registry.saved_locks(3), Some(TY));
    }

    #[test]
    fn disabled_bodies_are_untouched() {
        let mut scene = three_bodies().with_disabled_body(4, TY);
        scene.select(&[4]);
        let mut registry = FreezeRegistry::new();

        // Pass the disabled body explicitly to make sure the registry filters it.
        let summary = registry.freeze_unselected(&mut scene, &[1, 2, 3, 4], &[4]);

        assert_eq!(summary.frozen, 3);
        assert_eq!(summary.released, 0);
        assert!(!registry.is_locked(4));
        assert_eq!(scene.locks(4), TY);
    }

    #[test]
    fn selection_without_bodies_is_ignored() {
        let mut scene = three_bodies();
        scene.select(&[1, 99]);
        let mut registry = FreezeRegistry::new();

        let summary = freeze_from_scene(&mut registry, &mut scene);

        assert_eq!(summary.frozen, 2);
        assert_eq!(scene.locks(1), AxisLocks::empty());
    }

    #[test]
    fn second_freeze_replaces_first() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();

        scene.select(&[1]);
        freeze_from_scene(&mut registry, &mut scene);
        scene.select(&[3]);
        let summary = freeze_from_scene(&mut registry, &mut scene);

        assert_eq!(summary.previous.restored, 2);
        assert!(scene.locks(1).is_frozen());
        assert!(scene.locks(2).is_frozen());
        assert_eq!(scene.locks(3), TY);
        // Saved state comes from the restored scene, not from the first freeze.
        assert_eq!(registry.saved_locks(2), Some(ROT));
        assert_eq!(registry.saved_locks(1), Some(AxisLocks::empty()));

        registry.restore_all(&mut scene);
        assert_eq!(scene.locks(1), AxisLocks::empty());
        assert_eq!(scene.locks(2), ROT);
        assert_eq!(scene.locks(3), TY);
    }

    #[test]
    fn stale_entries_are_dropped_on_restore() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();
        freeze_from_scene(&mut registry, &mut scene);

        scene.despawn(2);
        let summary = registry.restore_all(&mut scene);

        assert_eq!(summary, RestoreSummary { restored: 2, stale: 1 });
        assert_eq!(summary.total(), 3);
        assert!(registry.is_empty());
        assert_eq!(scene.locks(3), TY);
    }

    #[test]
    fn stale_bodies_in_input_are_skipped() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();

        let summary = registry.freeze_unselected(&mut scene, &[1, 42], &[]);

        assert_eq!(summary.frozen, 1);
        assert!(!registry.is_locked(42));
    }

    #[test]
    fn duplicate_handles_freeze_once() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();

        registry.freeze_unselected(&mut scene, &[2, 2], &[]);
        assert_eq!(registry.lock_count(), 1);
        assert_eq!(registry.saved_locks(2), Some(ROT));
    }

    #[test]
    fn unfreeze_restores_single_body() {
        let mut scene = three_bodies();
        let mut registry = FreezeRegistry::new();
        freeze_from_scene(&mut registry, &mut scene);

        assert!(registry.unfreeze(&mut scene, 2));
        assert!(!registry.unfreeze(&mut scene, 2));
        assert_eq!(scene.locks(2), ROT);
        assert_eq!(registry.lock_count(), 2);
        assert!(scene.locks(1).is_frozen());
    }
}
