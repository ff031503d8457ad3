//! Arbitrary-precision rational coordinates.
//!
//! The ground truth behind the interval filter. Every f64 input coordinate
//! converts exactly (f64 values are dyadic rationals), so predicates and
//! constructions evaluated here are error-free.

use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::interval::Interval;
use crate::predicates::Sign;
use crate::Point3;

/// A 2D point with exact rational coordinates, used by the planar
/// triangulator after projection.
pub type ExactPoint2 = [BigRational; 2];

/// A 3D point with exact rational coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactPoint3 {
    /// x coordinate.
    pub x: BigRational,
    /// y coordinate.
    pub y: BigRational,
    /// z coordinate.
    pub z: BigRational,
}

/// A 3D vector with exact rational coordinates.
#[derive(Debug, Clone)]
pub struct ExactVec3 {
    /// x component.
    pub x: BigRational,
    /// y component.
    pub y: BigRational,
    /// z component.
    pub z: BigRational,
}

/// Convert a finite f64 to its exact rational value.
///
/// Non-finite coordinates are rejected at the I/O boundary, so this is total
/// over pipeline inputs.
pub fn rat(v: f64) -> BigRational {
    BigRational::from_float(v).expect("finite coordinate")
}

/// Enclose an exact rational in an f64 interval.
pub fn rat_to_interval(r: &BigRational) -> Interval {
    let Some(v) = r.to_f64() else {
        return Interval::whole();
    };
    if !v.is_finite() {
        return Interval::whole();
    }
    // to_f64 may round twice internally; a handful of ulps covers it.
    let mut lo = v;
    let mut hi = v;
    for _ in 0..4 {
        lo = lo.next_down();
        hi = hi.next_up();
    }
    Interval::new(lo, hi)
}

/// The sign of an exact rational.
#[inline]
pub fn rat_sign(r: &BigRational) -> Sign {
    if r.is_positive() {
        Sign::Positive
    } else if r.is_negative() {
        Sign::Negative
    } else {
        Sign::Zero
    }
}

impl ExactPoint3 {
    /// Exact value of an f64 point.
    pub fn from_point3(p: &Point3) -> Self {
        Self {
            x: rat(p.x),
            y: rat(p.y),
            z: rat(p.z),
        }
    }

    /// Construct from rational coordinates.
    pub fn from_coords(x: BigRational, y: BigRational, z: BigRational) -> Self {
        Self { x, y, z }
    }

    /// Coordinate by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn coord(&self, axis: usize) -> &BigRational {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// Difference vector `self - other`.
    pub fn sub(&self, other: &ExactPoint3) -> ExactVec3 {
        ExactVec3 {
            x: &self.x - &other.x,
            y: &self.y - &other.y,
            z: &self.z - &other.z,
        }
    }

    /// Translate by a vector.
    pub fn add(&self, v: &ExactVec3) -> ExactPoint3 {
        ExactPoint3 {
            x: &self.x + &v.x,
            y: &self.y + &v.y,
            z: &self.z + &v.z,
        }
    }

    /// Interval enclosure of each coordinate.
    pub fn approx(&self) -> [Interval; 3] {
        [
            rat_to_interval(&self.x),
            rat_to_interval(&self.y),
            rat_to_interval(&self.z),
        ]
    }
}

impl ExactVec3 {
    /// Cross product.
    pub fn cross(&self, other: &ExactVec3) -> ExactVec3 {
        ExactVec3 {
            x: &self.y * &other.z - &self.z * &other.y,
            y: &self.z * &other.x - &self.x * &other.z,
            z: &self.x * &other.y - &self.y * &other.x,
        }
    }

    /// Dot product.
    pub fn dot(&self, other: &ExactVec3) -> BigRational {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    /// Scale by a rational factor.
    pub fn scaled(&self, s: &BigRational) -> ExactVec3 {
        ExactVec3 {
            x: &self.x * s,
            y: &self.y * s,
            z: &self.z * s,
        }
    }

    /// True when all components are zero.
    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn coord(&self, axis: usize) -> &BigRational {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }

    /// The axis index (0/1/2) of the component with the largest magnitude.
    pub fn dominant_axis(&self) -> usize {
        let ax = self.x.abs();
        let ay = self.y.abs();
        let az = self.z.abs();
        if ax >= ay && ax >= az {
            0
        } else if ay >= az {
            1
        } else {
            2
        }
    }
}

/// Orientation of `d` relative to the plane through `a`, `b`, `c`; same sign
/// convention as [`crate::predicates::orient3d`].
pub fn orient3d_exact(
    a: &ExactPoint3,
    b: &ExactPoint3,
    c: &ExactPoint3,
    d: &ExactPoint3,
) -> Sign {
    let ad = a.sub(d);
    let bd = b.sub(d);
    let cd = c.sub(d);
    rat_sign(&ad.dot(&bd.cross(&cd)))
}

/// Orientation of 2D point `c` relative to the directed line `a -> b`; same
/// sign convention as [`crate::predicates::orient2d`].
pub fn orient2d_exact(a: &ExactPoint2, b: &ExactPoint2, c: &ExactPoint2) -> Sign {
    let det = (&a[0] - &c[0]) * (&b[1] - &c[1]) - (&a[1] - &c[1]) * (&b[0] - &c[0]);
    rat_sign(&det)
}

/// Incircle test: `Positive` when `d` is strictly inside the circumcircle of
/// the counter-clockwise triangle `a b c`.
pub fn incircle_exact(
    a: &ExactPoint2,
    b: &ExactPoint2,
    c: &ExactPoint2,
    d: &ExactPoint2,
) -> Sign {
    let adx = &a[0] - &d[0];
    let ady = &a[1] - &d[1];
    let bdx = &b[0] - &d[0];
    let bdy = &b[1] - &d[1];
    let cdx = &c[0] - &d[0];
    let cdy = &c[1] - &d[1];

    let alift = &adx * &adx + &ady * &ady;
    let blift = &bdx * &bdx + &bdy * &bdy;
    let clift = &cdx * &cdx + &cdy * &cdy;

    let det = &alift * (&bdx * &cdy - &bdy * &cdx) - &blift * (&adx * &cdy - &ady * &cdx)
        + &clift * (&adx * &bdy - &ady * &bdx);
    rat_sign(&det)
}

/// For four points with `r` and `w` both on a plane through the line `u-v`:
/// `Positive` when `r` and `w` lie in the same open half-plane bounded by
/// that line, `Negative` when in opposite half-planes, `Zero` when `w` is on
/// the line itself.
pub fn same_half_plane(
    u: &ExactPoint3,
    v: &ExactPoint3,
    r: &ExactPoint3,
    w: &ExactPoint3,
) -> Sign {
    let e = v.sub(u);
    let nr = e.cross(&r.sub(u));
    let nw = e.cross(&w.sub(u));
    rat_sign(&nr.dot(&nw))
}
