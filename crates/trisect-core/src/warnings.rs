//! Non-fatal classification warnings.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of warnings accumulated across the classification phases.
///
/// Warnings never abort the pipeline; they mark places where the local or
/// global structure was inconsistent and the output is best-effort. Worker
/// threads accumulate into their own set and the sets are merged with `|=`
/// at phase boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Warnings(u8);

impl Warnings {
    /// No warnings.
    pub const NONE: Warnings = Warnings(0);
    /// A border edge had an incidence structure the local classifier could
    /// not interpret, or two border edges disagreed about a face.
    pub const LOCAL_INCONSISTENCY: Warnings = Warnings(1);
    /// A connected component carried contradictory locally assigned tags.
    pub const GLOBAL_SEED_CONFLICT: Warnings = Warnings(1 << 1);
    /// A component without any locally classified face was labeled by a ray
    /// test against the other mesh.
    pub const ISOLATED_COMPONENT_FALLBACK: Warnings = Warnings(1 << 2);

    /// True when no warning is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag of `other` is set in `self`.
    pub fn contains(self, other: Warnings) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Warnings {
    type Output = Warnings;

    fn bitor(self, rhs: Warnings) -> Warnings {
        Warnings(self.0 | rhs.0)
    }
}

impl BitOrAssign for Warnings {
    fn bitor_assign(&mut self, rhs: Warnings) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (flag, name) in [
            (Warnings::LOCAL_INCONSISTENCY, "local-inconsistency"),
            (Warnings::GLOBAL_SEED_CONFLICT, "global-seed-conflict"),
            (
                Warnings::ISOLATED_COMPONENT_FALLBACK,
                "isolated-component-fallback",
            ),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_query() {
        let mut w = Warnings::NONE;
        assert!(w.is_empty());
        w |= Warnings::LOCAL_INCONSISTENCY;
        w |= Warnings::ISOLATED_COMPONENT_FALLBACK;
        assert!(w.contains(Warnings::LOCAL_INCONSISTENCY));
        assert!(!w.contains(Warnings::GLOBAL_SEED_CONFLICT));
        assert_eq!(
            format!("{w}"),
            "local-inconsistency, isolated-component-fallback"
        );
    }
}
