//! Exact geometric predicates on f64 coordinates.
//!
//! These predicates are based on Shewchuk's adaptive-precision algorithms
//! (via the `robust` crate): fast when possible, exact when needed. They
//! eliminate epsilon-based tolerance tuning and are the fast path for points
//! whose coordinates are plain f64 values; constructed points fall back to
//! the interval/rational layers in [`crate::lazy`].

use crate::{Point2, Point3};

/// The sign of a geometric predicate result.
///
/// For orientation predicates:
/// - `Positive`: counter-clockwise (2D) or below the plane (3D)
/// - `Zero`: collinear (2D) or coplanar (3D)
/// - `Negative`: clockwise (2D) or above the plane (3D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Strictly negative value.
    Negative,
    /// Exactly zero.
    Zero,
    /// Strictly positive value.
    Positive,
}

impl Sign {
    /// Create a Sign from an f64 value.
    ///
    /// Note: this should only be used with results from exact predicates,
    /// not with raw floating-point computations.
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        if v > 0.0 {
            Sign::Positive
        } else if v < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Returns true if the sign is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Sign::Positive)
    }

    /// Returns true if the sign is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }

    /// Returns true if the sign is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        matches!(self, Sign::Zero)
    }
}

/// Determine the orientation of point `c` relative to the directed line from
/// `a` to `b`.
///
/// Returns:
/// - `Positive`: `c` is to the left of the line (counter-clockwise)
/// - `Zero`: `c` is on the line (collinear with `a` and `b`)
/// - `Negative`: `c` is to the right of the line (clockwise)
#[inline]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Sign {
    let result = robust::orient2d(
        robust::Coord { x: a.x, y: a.y },
        robust::Coord { x: b.x, y: b.y },
        robust::Coord { x: c.x, y: c.y },
    );
    Sign::from_f64(result)
}

/// Determine the orientation of point `d` relative to the plane through `a`,
/// `b`, `c`.
///
/// Returns the sign of the determinant:
/// ```text
/// | ax-dx  ay-dy  az-dz |
/// | bx-dx  by-dy  bz-dz |
/// | cx-dx  cy-dy  cz-dz |
/// ```
///
/// With `a`, `b`, `c` counter-clockwise as seen against their outward normal
/// `(b-a)×(c-a)`, `Positive` means `d` lies on the inner side of the plane
/// (opposite the normal) and `Negative` on the outer side.
#[inline]
pub fn orient3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Sign {
    let result = robust::orient3d(
        robust::Coord3D {
            x: a.x,
            y: a.y,
            z: a.z,
        },
        robust::Coord3D {
            x: b.x,
            y: b.y,
            z: b.z,
        },
        robust::Coord3D {
            x: c.x,
            y: c.y,
            z: c.z,
        },
        robust::Coord3D {
            x: d.x,
            y: d.y,
            z: d.z,
        },
    );
    Sign::from_f64(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient2d_ccw() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 1.0);
        assert_eq!(orient2d(&a, &b, &c), Sign::Positive);
    }

    #[test]
    fn test_orient2d_collinear() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(1.0, 0.0);
        assert_eq!(orient2d(&a, &b, &c), Sign::Zero);
    }

    #[test]
    fn test_orient2d_near_collinear() {
        // The exact predicate must detect this tiny offset.
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 1e-15);
        assert_eq!(orient2d(&a, &b, &c), Sign::Positive);
    }

    #[test]
    fn test_orient3d_sides() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        // +Z is the outward normal side.
        assert_eq!(
            orient3d(&a, &b, &c, &Point3::new(0.0, 0.0, 1.0)),
            Sign::Negative
        );
        assert_eq!(
            orient3d(&a, &b, &c, &Point3::new(0.0, 0.0, -1.0)),
            Sign::Positive
        );
        assert_eq!(
            orient3d(&a, &b, &c, &Point3::new(0.5, 0.5, 0.0)),
            Sign::Zero
        );
    }

    #[test]
    fn test_orient3d_near_coplanar() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let d = Point3::new(0.5, 0.5, 1e-15);
        assert_eq!(orient3d(&a, &b, &c, &d), Sign::Negative);
    }
}
