//! # Axis Locks
//!
//! Motion-constraint bitset for a simulated body: which translation and
//! rotation axes the solver is not allowed to move.

use std::fmt;

bitflags::bitflags! {
    /// Locked translation/rotation axes of a body
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisLocks: u8 {
        const TRANSLATION_X = 1 << 0;
        const TRANSLATION_Y = 1 << 1;
        const TRANSLATION_Z = 1 << 2;
        const ROTATION_X = 1 << 3;
        const ROTATION_Y = 1 << 4;
        const ROTATION_Z = 1 << 5;

        const TRANSLATION = Self::TRANSLATION_X.bits()
            | Self::TRANSLATION_Y.bits()
            | Self::TRANSLATION_Z.bits();
        const ROTATION = Self::ROTATION_X.bits()
            | Self::ROTATION_Y.bits()
            | Self::ROTATION_Z.bits();
        /// Body cannot move at all
        const FREEZE_ALL = Self::TRANSLATION.bits() | Self::ROTATION.bits();
    }
}

impl AxisLocks {
    /// True when every axis is locked.
    pub fn is_frozen(self) -> bool {
        self.contains(Self::FREEZE_ALL)
    }
}

impl fmt::Display for AxisLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        if self.is_frozen() {
            return write!(f, "all");
        }
        let labels = [
            (Self::TRANSLATION_X, "tx"),
            (Self::TRANSLATION_Y, "ty"),
            (Self::TRANSLATION_Z, "tz"),
            (Self::ROTATION_X, "rx"),
            (Self::ROTATION_Y, "ry"),
            (Self::ROTATION_Z, "rz"),
        ];
        let parts: Vec<&str> = labels
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect();
        write!(f, "{}", parts.join("|"))
    }
}

// ============================================================================
// Avian Conversion
// ============================================================================

#[cfg(feature = "physics")]
mod avian_conversion {
    use super::AxisLocks;
    use avian3d::prelude::LockedAxes;

    impl From<LockedAxes> for AxisLocks {
        fn from(axes: LockedAxes) -> Self {
            let mut locks = AxisLocks::empty();
            locks.set(AxisLocks::TRANSLATION_X, axes.is_translation_x_locked());
            locks.set(AxisLocks::TRANSLATION_Y, axes.is_translation_y_locked());
            locks.set(AxisLocks::TRANSLATION_Z, axes.is_translation_z_locked());
            locks.set(AxisLocks::ROTATION_X, axes.is_rotation_x_locked());
            locks.set(AxisLocks::ROTATION_Y, axes.is_rotation_y_locked());
            locks.set(AxisLocks::ROTATION_Z, axes.is_rotation_z_locked());
            locks
        }
    }

    impl From<AxisLocks> for LockedAxes {
        fn from(locks: AxisLocks) -> Self {
            let mut axes = LockedAxes::new();
            if locks.contains(AxisLocks::TRANSLATION_X) {
                axes = axes.lock_translation_x();
            }
            if locks.contains(AxisLocks::TRANSLATION_Y) {
                axes = axes.lock_translation_y();
            }
            if locks.contains(AxisLocks::TRANSLATION_Z) {
                axes = axes.lock_translation_z();
            }
            if locks.contains(AxisLocks::ROTATION_X) {
                axes = axes.lock_rotation_x();
            }
            if locks.contains(AxisLocks::ROTATION_Y) {
                axes = axes.lock_rotation_y();
            }
            if locks.contains(AxisLocks::ROTATION_Z) {
                axes = axes.lock_rotation_z();
            }
            axes
        }
    }
}
