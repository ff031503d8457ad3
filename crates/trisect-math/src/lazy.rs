//! Lazy-exact 3D points.
//!
//! A [`LazyPoint3`] holds an interval enclosure of each coordinate, the
//! construction it arose from, and a cached exact rational value computed on
//! first demand. Predicates run the cheapest layer that can decide:
//!
//! 1. all-literal operands: adaptive f64 predicates ([`crate::predicates`]),
//! 2. interval determinant,
//! 3. exact rational determinant.
//!
//! The cached exact value must be materialized (via [`LazyPoint3::exact`])
//! before a point is read concurrently from multiple threads; the pipeline
//! does this in a dedicated parallel phase between constructions and
//! triangulation.

use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::exact::{orient3d_exact, rat_sign, ExactPoint3};
use crate::interval::{div, Interval};
use crate::predicates::{self, Sign};
use crate::Point3;

/// How a point came to exist. Constructions reference only literal (input)
/// points: the pipeline never constructs from constructed points.
#[derive(Debug, Clone)]
pub enum Construction {
    /// An input vertex with plain f64 coordinates.
    Literal(Point3),
    /// Intersection of segment `s0-s1` with the plane through `t0 t1 t2`.
    /// The segment must properly cross the plane.
    SegmentPlane {
        /// Segment start.
        s0: Point3,
        /// Segment end.
        s1: Point3,
        /// Plane point.
        t0: Point3,
        /// Plane point.
        t1: Point3,
        /// Plane point.
        t2: Point3,
    },
    /// Intersection of the coplanar segments `a0-a1` and `b0-b1`, which must
    /// properly cross.
    SegmentSegment {
        /// First segment start.
        a0: Point3,
        /// First segment end.
        a1: Point3,
        /// Second segment start.
        b0: Point3,
        /// Second segment end.
        b1: Point3,
    },
}

/// A 3D point with lazily evaluated exact coordinates.
#[derive(Debug, Clone)]
pub struct LazyPoint3 {
    approx: [Interval; 3],
    recipe: Construction,
    exact: OnceLock<ExactPoint3>,
}

impl LazyPoint3 {
    /// Wrap an input vertex.
    pub fn literal(p: Point3) -> Self {
        Self {
            approx: [
                Interval::point(p.x),
                Interval::point(p.y),
                Interval::point(p.z),
            ],
            recipe: Construction::Literal(p),
            exact: OnceLock::new(),
        }
    }

    /// Construct the intersection of a segment and a triangle's plane.
    pub fn segment_plane(s0: Point3, s1: Point3, t0: Point3, t1: Point3, t2: Point3) -> Self {
        let recipe = Construction::SegmentPlane { s0, s1, t0, t1, t2 };
        Self::from_recipe(recipe)
    }

    /// Construct the intersection of two coplanar segments.
    pub fn segment_segment(a0: Point3, a1: Point3, b0: Point3, b1: Point3) -> Self {
        let recipe = Construction::SegmentSegment { a0, a1, b0, b1 };
        Self::from_recipe(recipe)
    }

    fn from_recipe(recipe: Construction) -> Self {
        let mut point = Self {
            approx: [Interval::whole(); 3],
            recipe,
            exact: OnceLock::new(),
        };
        match approx_of(&point.recipe) {
            Some(iv) => point.approx = iv,
            None => {
                // The filter could not bound the construction; fall back to
                // the exact value right away and enclose that.
                let exact = eval_exact(&point.recipe);
                point.approx = exact.approx();
                let _ = point.exact.set(exact);
            }
        }
        point
    }

    /// Interval enclosure of the coordinates.
    #[inline]
    pub fn approx(&self) -> &[Interval; 3] {
        &self.approx
    }

    /// An f64 representative, for output and broad-phase use only.
    pub fn approx_point(&self) -> Point3 {
        Point3::new(
            self.approx[0].midpoint(),
            self.approx[1].midpoint(),
            self.approx[2].midpoint(),
        )
    }

    /// The f64 coordinates when this is an input vertex.
    #[inline]
    pub fn as_literal(&self) -> Option<&Point3> {
        match &self.recipe {
            Construction::Literal(p) => Some(p),
            _ => None,
        }
    }

    /// The exact rational value, computed and cached on first call.
    pub fn exact(&self) -> &ExactPoint3 {
        self.exact.get_or_init(|| eval_exact(&self.recipe))
    }
}

fn iv(p: &Point3) -> [Interval; 3] {
    [
        Interval::point(p.x),
        Interval::point(p.y),
        Interval::point(p.z),
    ]
}

fn iv_sub(a: &[Interval; 3], b: &[Interval; 3]) -> [Interval; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn iv_cross(a: &[Interval; 3], b: &[Interval; 3]) -> [Interval; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn iv_dot(a: &[Interval; 3], b: &[Interval; 3]) -> Interval {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Interval enclosure of a construction, or `None` when a divisor straddles
/// zero and the filter cannot bound the result.
fn approx_of(recipe: &Construction) -> Option<[Interval; 3]> {
    match recipe {
        Construction::Literal(p) => Some(iv(p)),
        Construction::SegmentPlane { s0, s1, t0, t1, t2 } => {
            let (s0, s1, t0, t1, t2) = (iv(s0), iv(s1), iv(t0), iv(t1), iv(t2));
            let n = iv_cross(&iv_sub(&t1, &t0), &iv_sub(&t2, &t0));
            let d = iv_sub(&s1, &s0);
            let den = iv_dot(&n, &d);
            if den.contains_zero() {
                return None;
            }
            let t = div(iv_dot(&n, &iv_sub(&t0, &s0)), den);
            Some([s0[0] + t * d[0], s0[1] + t * d[1], s0[2] + t * d[2]])
        }
        Construction::SegmentSegment { a0, a1, b0, b1 } => {
            let (a0, a1, b0, b1) = (iv(a0), iv(a1), iv(b0), iv(b1));
            let da = iv_sub(&a1, &a0);
            let db = iv_sub(&b1, &b0);
            let n = iv_cross(&da, &db);
            let den = iv_dot(&n, &n);
            if den.contains_zero() {
                return None;
            }
            let t = div(iv_dot(&iv_cross(&iv_sub(&b0, &a0), &db), &n), den);
            Some([a0[0] + t * da[0], a0[1] + t * da[1], a0[2] + t * da[2]])
        }
    }
}

fn eval_exact(recipe: &Construction) -> ExactPoint3 {
    match recipe {
        Construction::Literal(p) => ExactPoint3::from_point3(p),
        Construction::SegmentPlane { s0, s1, t0, t1, t2 } => {
            let s0 = ExactPoint3::from_point3(s0);
            let s1 = ExactPoint3::from_point3(s1);
            let t0 = ExactPoint3::from_point3(t0);
            let t1 = ExactPoint3::from_point3(t1);
            let t2 = ExactPoint3::from_point3(t2);
            let n = t1.sub(&t0).cross(&t2.sub(&t0));
            let d = s1.sub(&s0);
            let t = n.dot(&t0.sub(&s0)) / n.dot(&d);
            s0.add(&d.scaled(&t))
        }
        Construction::SegmentSegment { a0, a1, b0, b1 } => {
            let a0 = ExactPoint3::from_point3(a0);
            let a1 = ExactPoint3::from_point3(a1);
            let b0 = ExactPoint3::from_point3(b0);
            let b1 = ExactPoint3::from_point3(b1);
            let da = a1.sub(&a0);
            let db = b1.sub(&b0);
            let n = da.cross(&db);
            let t = b0.sub(&a0).cross(&db).dot(&n) / n.dot(&n);
            a0.add(&da.scaled(&t))
        }
    }
}

/// Orientation of `d` relative to the plane through `a`, `b`, `c`, with the
/// sign convention of [`predicates::orient3d`]: `Positive` means `d` is on
/// the inner side (opposite the outward normal `(b-a)×(c-a)`).
pub fn orient3d(a: &LazyPoint3, b: &LazyPoint3, c: &LazyPoint3, d: &LazyPoint3) -> Sign {
    if let (Some(pa), Some(pb), Some(pc), Some(pd)) =
        (a.as_literal(), b.as_literal(), c.as_literal(), d.as_literal())
    {
        return predicates::orient3d(pa, pb, pc, pd);
    }

    let ad = iv_sub(a.approx(), d.approx());
    let bd = iv_sub(b.approx(), d.approx());
    let cd = iv_sub(c.approx(), d.approx());
    if let Some(sign) = iv_dot(&ad, &iv_cross(&bd, &cd)).sign() {
        return sign;
    }

    orient3d_exact(a.exact(), b.exact(), c.exact(), d.exact())
}

/// 2D orientation after dropping one axis. `drop` is the discarded axis; the
/// remaining axes are taken in cyclic order, so the result is the sign of the
/// `drop` component of `(b-a)×(c-a)`.
pub fn orient2d_dropped(a: &LazyPoint3, b: &LazyPoint3, c: &LazyPoint3, drop: usize) -> Sign {
    let u = (drop + 1) % 3;
    let v = (drop + 2) % 3;

    if let (Some(pa), Some(pb), Some(pc)) = (a.as_literal(), b.as_literal(), c.as_literal()) {
        return predicates::orient2d(
            &crate::Point2::new(pa[u], pa[v]),
            &crate::Point2::new(pb[u], pb[v]),
            &crate::Point2::new(pc[u], pc[v]),
        );
    }

    let (aa, ba, ca) = (a.approx(), b.approx(), c.approx());
    let det = (aa[u] - ca[u]) * (ba[v] - ca[v]) - (aa[v] - ca[v]) * (ba[u] - ca[u]);
    if let Some(sign) = det.sign() {
        return sign;
    }

    let (ae, be, ce) = (a.exact(), b.exact(), c.exact());
    let det = (ae.coord(u) - ce.coord(u)) * (be.coord(v) - ce.coord(v))
        - (ae.coord(v) - ce.coord(v)) * (be.coord(u) - ce.coord(u));
    rat_sign(&det)
}

/// Compare two points by one coordinate axis.
pub fn cmp_along_axis(a: &LazyPoint3, b: &LazyPoint3, axis: usize) -> Ordering {
    let ia = a.approx()[axis];
    let ib = b.approx()[axis];
    if ia.hi < ib.lo {
        return Ordering::Less;
    }
    if ia.lo > ib.hi {
        return Ordering::Greater;
    }
    a.exact().coord(axis).cmp(b.exact().coord(axis))
}

/// Exact coordinate-wise equality.
pub fn points_equal(a: &LazyPoint3, b: &LazyPoint3) -> bool {
    for axis in 0..3 {
        let ia = a.approx()[axis];
        let ib = b.approx()[axis];
        if ia.hi < ib.lo || ia.lo > ib.hi {
            return false;
        }
    }
    a.exact() == b.exact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_plane_midpoint() {
        // Segment from (0,0,-1) to (0,0,1) through the z=0 plane.
        let p = LazyPoint3::segment_plane(
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let e = p.exact();
        assert_eq!(e, &ExactPoint3::from_point3(&Point3::new(0.0, 0.0, 0.0)));
        let a = p.approx_point();
        assert!(a.z.abs() < 1e-12);
    }

    #[test]
    fn test_segment_segment_crossing() {
        // Diagonals of the unit square in the z=0 plane.
        let p = LazyPoint3::segment_segment(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(
            p.exact(),
            &ExactPoint3::from_point3(&Point3::new(0.5, 0.5, 0.0))
        );
    }

    #[test]
    fn test_orient3d_with_constructed_point() {
        let a = LazyPoint3::literal(Point3::new(0.0, 0.0, 0.0));
        let b = LazyPoint3::literal(Point3::new(1.0, 0.0, 0.0));
        let c = LazyPoint3::literal(Point3::new(0.0, 1.0, 0.0));
        // Constructed point exactly on the a-b-c plane.
        let d = LazyPoint3::segment_plane(
            Point3::new(0.25, 0.25, -3.0),
            Point3::new(0.25, 0.25, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(orient3d(&a, &b, &c, &d), Sign::Zero);
    }

    #[test]
    fn test_orient2d_dropped_consistency() {
        let a = LazyPoint3::literal(Point3::new(0.0, 0.0, 7.0));
        let b = LazyPoint3::literal(Point3::new(1.0, 0.0, 7.0));
        let c = LazyPoint3::literal(Point3::new(0.0, 1.0, 7.0));
        // Dropping z keeps x,y: counter-clockwise.
        assert_eq!(orient2d_dropped(&a, &b, &c, 2), Sign::Positive);
    }

    #[test]
    fn test_cmp_along_axis_close_points() {
        let a = LazyPoint3::segment_plane(
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(3.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let b = LazyPoint3::literal(Point3::new(1.0, 0.0, 0.0));
        assert_eq!(cmp_along_axis(&a, &b, 0), Ordering::Equal);
        assert!(points_equal(&a, &b));
    }
}
