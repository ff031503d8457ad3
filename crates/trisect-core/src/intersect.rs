//! Symbolic face–face intersection.
//!
//! For a candidate pair this computes where the two triangles meet, expressed
//! as [`SymbolicIntersection`]s: features of each triangle rather than
//! coordinates. Any intersection element coinciding with an existing input
//! vertex is reported as that vertex, never as a new construction, so the
//! point inserter can reuse pool ids and no near-duplicate points arise.
//!
//! Scratch rational constructions are used internally to order cut points
//! along the intersection line; they are discarded and only the symbolic
//! labels leave this module.

use std::cmp::Ordering;

use arrayvec::ArrayVec;
use num_traits::Signed;
use trisect_math::exact::ExactPoint2;
use trisect_math::lazy::{self, LazyPoint3};
use trisect_math::predicates::Sign;
use trisect_math::Point3;
use trisect_mesh::{PointPool, VertexId};

use crate::region::{Feature, SymbolicIntersection};

/// Reusable per-task buffers, passed explicitly by the worker pool.
#[derive(Default)]
pub struct Scratch {
    points: Vec<LazyPoint3>,
    feats: Vec<(Feature, Feature)>,
}

impl Scratch {
    /// Fresh buffers.
    pub fn new() -> Self {
        Self::default()
    }
}

/// How one triangle meets the supporting plane of the other.
enum Cut {
    /// Strictly on one side.
    None,
    /// Touches the plane at corner `i` only.
    Point(u8),
    /// Crosses or touches the plane along a segment.
    Segment {
        ends: [CutPoint; 2],
        /// Set when the cut is exactly edge `e` of the triangle.
        on_edge: Option<u8>,
    },
    /// Lies in the plane.
    Coplanar,
}

#[derive(Clone, Copy)]
enum CutPoint {
    /// Corner `i` lies on the plane.
    Vertex(u8),
    /// Edge `e` properly crosses the plane.
    EdgeCross(u8),
}

impl CutPoint {
    fn feature(self) -> Feature {
        match self {
            CutPoint::Vertex(i) => Feature::Vertex(i),
            CutPoint::EdgeCross(e) => Feature::Edge(e),
        }
    }
}

/// A cut endpoint materialized just far enough to compare positions.
enum TmpPoint<'a> {
    Borrowed(&'a LazyPoint3),
    Owned(LazyPoint3),
}

impl TmpPoint<'_> {
    fn get(&self) -> &LazyPoint3 {
        match self {
            TmpPoint::Borrowed(p) => p,
            TmpPoint::Owned(p) => p,
        }
    }
}

/// Compute the symbolic intersection of a candidate face pair, given the six
/// point-pool ids of its corners. Returns at most two elements for
/// transversal pairs and at most six for coplanar overlaps; an empty result
/// means the closed triangles are disjoint or share only a single vertex.
pub fn face_face_intersection(
    pool: &PointPool,
    left: [VertexId; 3],
    right: [VertexId; 3],
    scratch: &mut Scratch,
) -> ArrayVec<SymbolicIntersection, 6> {
    let lp = [pool.at(left[0]), pool.at(left[1]), pool.at(left[2])];
    let rp = [pool.at(right[0]), pool.at(right[1]), pool.at(right[2])];

    // Sides of each triangle's corners against the other's plane.
    let sr = [
        lazy::orient3d(rp[0], rp[1], rp[2], lp[0]),
        lazy::orient3d(rp[0], rp[1], rp[2], lp[1]),
        lazy::orient3d(rp[0], rp[1], rp[2], lp[2]),
    ];
    let sl = [
        lazy::orient3d(lp[0], lp[1], lp[2], rp[0]),
        lazy::orient3d(lp[0], lp[1], lp[2], rp[1]),
        lazy::orient3d(lp[0], lp[1], lp[2], rp[2]),
    ];

    let left_cut = classify_cut(&sr);
    let right_cut = classify_cut(&sl);

    match (&left_cut, &right_cut) {
        (Cut::None, _) | (_, Cut::None) => ArrayVec::new(),
        (Cut::Coplanar, _) | (_, Cut::Coplanar) => {
            coplanar_intersection(pool, left, right, scratch)
        }
        (Cut::Point(k), _) => {
            // The left triangle reaches the right plane at one corner; the
            // witness is any left corner off the plane.
            let witness = (0..3)
                .find(|&i| sr[i] != Sign::Zero)
                .map(|i| lp[i])
                .unwrap_or(lp[0]);
            vertex_touch(pool, left[*k as usize], *k, right, witness, false)
        }
        (_, Cut::Point(k)) => {
            let witness = (0..3)
                .find(|&j| sl[j] != Sign::Zero)
                .map(|j| rp[j])
                .unwrap_or(rp[0]);
            vertex_touch(pool, right[*k as usize], *k, left, witness, true)
        }
        (
            Cut::Segment {
                ends: l_ends,
                on_edge: l_on_edge,
            },
            Cut::Segment {
                ends: r_ends,
                on_edge: r_on_edge,
            },
        ) => segment_overlap(pool, left, right, l_ends, *l_on_edge, r_ends, *r_on_edge),
    }
}

fn classify_cut(signs: &[Sign; 3]) -> Cut {
    let zeros: ArrayVec<u8, 3> = (0..3u8)
        .filter(|&i| signs[i as usize] == Sign::Zero)
        .collect();
    let has_pos = signs.contains(&Sign::Positive);
    let has_neg = signs.contains(&Sign::Negative);

    match zeros.len() {
        3 => Cut::Coplanar,
        2 => {
            // The edge between the two zero corners lies in the plane.
            let (i, j) = (zeros[0], zeros[1]);
            let edge = if (i + 1) % 3 == j { i } else { j };
            Cut::Segment {
                ends: [CutPoint::Vertex(i), CutPoint::Vertex(j)],
                on_edge: Some(edge),
            }
        }
        1 => {
            if has_pos && has_neg {
                // Corner on the plane, the opposite edge crossing it.
                let k = zeros[0];
                Cut::Segment {
                    ends: [CutPoint::Vertex(k), CutPoint::EdgeCross((k + 1) % 3)],
                    on_edge: None,
                }
            } else {
                Cut::Point(zeros[0])
            }
        }
        _ => {
            if has_pos && has_neg {
                let mut ends = ArrayVec::<CutPoint, 2>::new();
                for e in 0..3u8 {
                    let s0 = signs[e as usize];
                    let s1 = signs[((e + 1) % 3) as usize];
                    if s0 != s1 {
                        ends.push(CutPoint::EdgeCross(e));
                    }
                }
                debug_assert_eq!(ends.len(), 2);
                Cut::Segment {
                    ends: [ends[0], ends[1]],
                    on_edge: None,
                }
            } else {
                Cut::None
            }
        }
    }
}

/// One triangle touches the other's plane at a single corner; the pair
/// intersects exactly when that corner lies within the other triangle. A
/// shared corner needs no refinement and produces no output.
fn vertex_touch(
    pool: &PointPool,
    corner_id: VertexId,
    corner: u8,
    other: [VertexId; 3],
    witness: &LazyPoint3,
    flipped: bool,
) -> ArrayVec<SymbolicIntersection, 6> {
    let mut out = ArrayVec::new();
    let Some(feat) = locate_on_triangle(pool, corner_id, other, witness) else {
        return out;
    };
    if feat.is_vertex() {
        return out;
    }
    let sym = if flipped {
        SymbolicIntersection {
            left: feat,
            right: Feature::Vertex(corner),
        }
    } else {
        SymbolicIntersection {
            left: Feature::Vertex(corner),
            right: feat,
        }
    };
    out.push(sym);
    out
}

/// Locate a pool point known to lie in a triangle's plane relative to that
/// triangle, using a witness point off the plane to express 2D side tests as
/// 3D orientations. Returns `None` when the point is outside.
fn locate_on_triangle(
    pool: &PointPool,
    x: VertexId,
    tri: [VertexId; 3],
    witness: &LazyPoint3,
) -> Option<Feature> {
    for (j, &v) in tri.iter().enumerate() {
        if v == x {
            return Some(Feature::Vertex(j as u8));
        }
    }

    let xp = pool.at(x);
    let mut on_edge = None;
    for j in 0..3u8 {
        let p0 = pool.at(tri[j as usize]);
        let p1 = pool.at(tri[((j + 1) % 3) as usize]);
        let opp = pool.at(tri[((j + 2) % 3) as usize]);
        let s = lazy::orient3d(p0, p1, witness, xp);
        if s == Sign::Zero {
            if let Some(e) = on_edge {
                // On two edge lines at once: geometrically a corner, which
                // the id shortcut above would have caught for deduplicated
                // inputs. Treat as the shared corner: edge k runs from
                // corner k to k+1, so consecutive edges meet at the later
                // edge's first corner.
                let corner = if (e + 1) % 3 == j { j } else { e };
                return Some(Feature::Vertex(corner));
            }
            on_edge = Some(j);
            continue;
        }
        let inside = lazy::orient3d(p0, p1, witness, opp);
        if s != inside {
            return None;
        }
    }
    Some(match on_edge {
        Some(e) => Feature::Edge(e),
        None => Feature::Face,
    })
}

fn literal(pool: &PointPool, id: VertexId) -> Point3 {
    *pool
        .at(id)
        .as_literal()
        .expect("cut endpoints reference input vertices")
}

/// Materialize a cut endpoint for position comparisons.
fn endpoint<'a>(
    pool: &'a PointPool,
    cut: CutPoint,
    own: [VertexId; 3],
    other: [VertexId; 3],
) -> TmpPoint<'a> {
    match cut {
        CutPoint::Vertex(i) => TmpPoint::Borrowed(pool.at(own[i as usize])),
        CutPoint::EdgeCross(e) => {
            let s0 = literal(pool, own[e as usize]);
            let s1 = literal(pool, own[((e + 1) % 3) as usize]);
            TmpPoint::Owned(LazyPoint3::segment_plane(
                s0,
                s1,
                literal(pool, other[0]),
                literal(pool, other[1]),
                literal(pool, other[2]),
            ))
        }
    }
}

/// Both triangles cross the common plane line; the intersection is the
/// overlap of the two collinear cut segments.
fn segment_overlap(
    pool: &PointPool,
    left: [VertexId; 3],
    right: [VertexId; 3],
    l_ends: &[CutPoint; 2],
    l_on_edge: Option<u8>,
    r_ends: &[CutPoint; 2],
    r_on_edge: Option<u8>,
) -> ArrayVec<SymbolicIntersection, 6> {
    let mut out = ArrayVec::new();

    // Direction of the plane-plane intersection line, for picking the axis
    // the cut points are ordered along.
    let la = pool.at(left[0]).exact();
    let n_l = pool
        .at(left[1])
        .exact()
        .sub(la)
        .cross(&pool.at(left[2]).exact().sub(la));
    let ra = pool.at(right[0]).exact();
    let n_r = pool
        .at(right[1])
        .exact()
        .sub(ra)
        .cross(&pool.at(right[2]).exact().sub(ra));
    let dir = n_l.cross(&n_r);
    debug_assert!(!dir.is_zero());
    let axis = dir.dominant_axis();

    let mut l0 = endpoint(pool, l_ends[0], left, right);
    let mut l1 = endpoint(pool, l_ends[1], left, right);
    let mut l_feats = [l_ends[0].feature(), l_ends[1].feature()];
    if lazy::cmp_along_axis(l0.get(), l1.get(), axis) == Ordering::Greater {
        std::mem::swap(&mut l0, &mut l1);
        l_feats.swap(0, 1);
    }

    let mut r0 = endpoint(pool, r_ends[0], right, left);
    let mut r1 = endpoint(pool, r_ends[1], right, left);
    let mut r_feats = [r_ends[0].feature(), r_ends[1].feature()];
    if lazy::cmp_along_axis(r0.get(), r1.get(), axis) == Ordering::Greater {
        std::mem::swap(&mut r0, &mut r1);
        r_feats.swap(0, 1);
    }

    let l_interior = l_on_edge.map(Feature::Edge).unwrap_or(Feature::Face);
    let r_interior = r_on_edge.map(Feature::Edge).unwrap_or(Feature::Face);

    // Overlap start: the larger of the two lower endpoints.
    let (start, start_left, start_right) =
        match lazy::cmp_along_axis(l0.get(), r0.get(), axis) {
            Ordering::Less => (&r0, None, Some(r_feats[0])),
            Ordering::Greater => (&l0, Some(l_feats[0]), None),
            Ordering::Equal => (&l0, Some(l_feats[0]), Some(r_feats[0])),
        };
    // Overlap end: the smaller of the two upper endpoints.
    let (end, end_left, end_right) = match lazy::cmp_along_axis(l1.get(), r1.get(), axis) {
        Ordering::Less => (&l1, Some(l_feats[1]), None),
        Ordering::Greater => (&r1, None, Some(r_feats[1])),
        Ordering::Equal => (&l1, Some(l_feats[1]), Some(r_feats[1])),
    };

    match lazy::cmp_along_axis(start.get(), end.get(), axis) {
        Ordering::Greater => out,
        Ordering::Equal => {
            // Single-point contact.
            let lf = feature_at(start, start_left, (&l0, l_feats[0]), (&l1, l_feats[1]), l_interior);
            let rf =
                feature_at(start, start_right, (&r0, r_feats[0]), (&r1, r_feats[1]), r_interior);
            if !(lf.is_vertex() && rf.is_vertex()) {
                out.push(SymbolicIntersection { left: lf, right: rf });
            }
            out
        }
        Ordering::Less => {
            let lf0 =
                feature_at(start, start_left, (&l0, l_feats[0]), (&l1, l_feats[1]), l_interior);
            let rf0 =
                feature_at(start, start_right, (&r0, r_feats[0]), (&r1, r_feats[1]), r_interior);
            let lf1 = feature_at(end, end_left, (&l0, l_feats[0]), (&l1, l_feats[1]), l_interior);
            let rf1 = feature_at(end, end_right, (&r0, r_feats[0]), (&r1, r_feats[1]), r_interior);
            out.push(SymbolicIntersection {
                left: lf0,
                right: rf0,
            });
            out.push(SymbolicIntersection {
                left: lf1,
                right: rf1,
            });
            out
        }
    }
}

/// Feature of one side at an overlap endpoint: the known feature when the
/// endpoint came from that side, the endpoint's feature when it coincides
/// with one, the segment interior otherwise.
fn feature_at(
    at: &TmpPoint<'_>,
    known: Option<Feature>,
    lo: (&TmpPoint<'_>, Feature),
    hi: (&TmpPoint<'_>, Feature),
    interior: Feature,
) -> Feature {
    if let Some(feat) = known {
        return feat;
    }
    if lazy::points_equal(at.get(), lo.0.get()) {
        return lo.1;
    }
    if lazy::points_equal(at.get(), hi.0.get()) {
        return hi.1;
    }
    interior
}

/// Intersection of two triangles sharing a plane: the convex clip polygon,
/// reported as up to six symbolic points in cyclic order.
fn coplanar_intersection(
    pool: &PointPool,
    left: [VertexId; 3],
    right: [VertexId; 3],
    scratch: &mut Scratch,
) -> ArrayVec<SymbolicIntersection, 6> {
    scratch.points.clear();
    scratch.feats.clear();

    let la = pool.at(left[0]).exact();
    let normal = pool
        .at(left[1])
        .exact()
        .sub(la)
        .cross(&pool.at(left[2]).exact().sub(la));
    let drop = normal.dominant_axis();

    let orient_of = |tri: [VertexId; 3]| {
        lazy::orient2d_dropped(pool.at(tri[0]), pool.at(tri[1]), pool.at(tri[2]), drop)
    };
    let orient_l = orient_of(left);
    let orient_r = orient_of(right);

    // Corners of each triangle inside (or on) the other.
    for i in 0..3u8 {
        let x = left[i as usize];
        if let Some(rf) = locate_in_triangle_2d(pool, x, right, drop, orient_r) {
            push_candidate(
                scratch,
                pool.at(x).clone(),
                (Feature::Vertex(i), rf),
            );
        }
    }
    for j in 0..3u8 {
        let x = right[j as usize];
        if let Some(lf) = locate_in_triangle_2d(pool, x, left, drop, orient_l) {
            push_candidate(
                scratch,
                pool.at(x).clone(),
                (lf, Feature::Vertex(j)),
            );
        }
    }

    // Proper edge-edge crossings.
    for i in 0..3u8 {
        let (a0, a1) = (left[i as usize], left[((i + 1) % 3) as usize]);
        for j in 0..3u8 {
            let (b0, b1) = (right[j as usize], right[((j + 1) % 3) as usize]);
            let s0 = lazy::orient2d_dropped(pool.at(a0), pool.at(a1), pool.at(b0), drop);
            let s1 = lazy::orient2d_dropped(pool.at(a0), pool.at(a1), pool.at(b1), drop);
            if s0 == Sign::Zero || s1 == Sign::Zero || s0 == s1 {
                continue;
            }
            let t0 = lazy::orient2d_dropped(pool.at(b0), pool.at(b1), pool.at(a0), drop);
            let t1 = lazy::orient2d_dropped(pool.at(b0), pool.at(b1), pool.at(a1), drop);
            if t0 == Sign::Zero || t1 == Sign::Zero || t0 == t1 {
                continue;
            }
            let point = LazyPoint3::segment_segment(
                literal(pool, a0),
                literal(pool, a1),
                literal(pool, b0),
                literal(pool, b1),
            );
            push_candidate(scratch, point, (Feature::Edge(i), Feature::Edge(j)));
        }
    }

    let mut out = ArrayVec::new();
    match scratch.points.len() {
        0 => out,
        1 => {
            let (lf, rf) = scratch.feats[0];
            if !(lf.is_vertex() && rf.is_vertex()) {
                out.push(SymbolicIntersection { left: lf, right: rf });
            }
            out
        }
        _ => {
            for idx in polygon_order(scratch, drop) {
                let (lf, rf) = scratch.feats[idx];
                if out.is_full() {
                    break;
                }
                out.push(SymbolicIntersection { left: lf, right: rf });
            }
            out
        }
    }
}

/// Add a clip-polygon candidate, merging features with any exactly-equal
/// point already collected.
fn push_candidate(scratch: &mut Scratch, point: LazyPoint3, feats: (Feature, Feature)) {
    for (i, existing) in scratch.points.iter().enumerate() {
        if lazy::points_equal(existing, &point) {
            let (lf, rf) = scratch.feats[i];
            scratch.feats[i] = (lf.more_specific(feats.0), rf.more_specific(feats.1));
            return;
        }
    }
    scratch.points.push(point);
    scratch.feats.push(feats);
}

/// 2D containment of a pool point in a triangle after dropping an axis.
/// `orient` is the triangle's own 2D orientation sign.
fn locate_in_triangle_2d(
    pool: &PointPool,
    x: VertexId,
    tri: [VertexId; 3],
    drop: usize,
    orient: Sign,
) -> Option<Feature> {
    for (j, &v) in tri.iter().enumerate() {
        if v == x {
            return Some(Feature::Vertex(j as u8));
        }
    }

    let xp = pool.at(x);
    let mut on_edge = None;
    for j in 0..3u8 {
        let p0 = pool.at(tri[j as usize]);
        let p1 = pool.at(tri[((j + 1) % 3) as usize]);
        let s = lazy::orient2d_dropped(p0, p1, xp, drop);
        if s == Sign::Zero {
            if let Some(e) = on_edge {
                let corner = if (e + 1) % 3 == j { j } else { e };
                return Some(Feature::Vertex(corner));
            }
            on_edge = Some(j);
            continue;
        }
        if s != orient {
            return None;
        }
    }
    Some(match on_edge {
        Some(e) => Feature::Edge(e),
        None => Feature::Face,
    })
}

/// Cyclic ordering of the clip-polygon candidates: angular sort around the
/// lexicographically smallest projected point.
fn polygon_order(scratch: &Scratch, drop: usize) -> Vec<usize> {
    let u = (drop + 1) % 3;
    let v = (drop + 2) % 3;
    let coords: Vec<ExactPoint2> = scratch
        .points
        .iter()
        .map(|p| {
            let e = p.exact();
            [e.coord(u).clone(), e.coord(v).clone()]
        })
        .collect();

    let pivot = (0..coords.len())
        .min_by(|&a, &b| coords[a].cmp(&coords[b]))
        .unwrap_or(0);

    let mut order: Vec<usize> = (0..coords.len()).filter(|&i| i != pivot).collect();
    order.sort_by(|&a, &b| {
        match trisect_math::exact::orient2d_exact(&coords[a], &coords[b], &coords[pivot]) {
            Sign::Positive => Ordering::Less,
            Sign::Negative => Ordering::Greater,
            Sign::Zero => {
                // Collinear with the pivot: nearer point first.
                let da = (&coords[a][0] - &coords[pivot][0]).abs()
                    + (&coords[a][1] - &coords[pivot][1]).abs();
                let db = (&coords[b][0] - &coords[pivot][0]).abs()
                    + (&coords[b][1] - &coords[pivot][1]).abs();
                da.cmp(&db)
            }
        }
    });
    let mut out = Vec::with_capacity(coords.len());
    out.push(pivot);
    out.extend(order);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(points: &[Point3]) -> (PointPool, Vec<VertexId>) {
        let mut pool = PointPool::new();
        pool.start_uniqueness_check();
        let ids = points
            .iter()
            .map(|p| pool.insert(LazyPoint3::literal(*p)))
            .collect();
        pool.stop_uniqueness_check();
        (pool, ids)
    }

    #[test]
    fn test_transversal_crossing() {
        // Left triangle in the z=0 plane, right triangle vertical, crossing
        // through its interior.
        let (pool, ids) = pool_with(&[
            Point3::new(-5.0, -5.0, 0.0),
            Point3::new(5.0, -5.0, 0.0),
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 2.0),
        ]);
        let mut scratch = Scratch::new();
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut scratch,
        );
        assert_eq!(syms.len(), 2);
        for sym in &syms {
            // Segment interior to the left face, crossing right edges.
            assert_eq!(sym.left, Feature::Face);
            assert!(matches!(sym.right, Feature::Edge(_)));
        }
    }

    #[test]
    fn test_shared_vertex_only_is_empty() {
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(0.0, -1.0, 1.0),
        ]);
        // Both triangles share pool id 0 and meet only there.
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[0], ids[3], ids[4]],
            &mut Scratch::new(),
        );
        assert!(syms.is_empty());
    }

    #[test]
    fn test_shared_edge_reports_both_vertices() {
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[0], ids[1], ids[3]],
            &mut Scratch::new(),
        );
        assert_eq!(syms.len(), 2);
        for sym in &syms {
            assert!(sym.left.is_vertex());
            assert!(sym.right.is_vertex());
        }
    }

    #[test]
    fn test_vertex_on_edge_interior() {
        // Right triangle's corner 0 sits in the middle of the left edge 0-1;
        // the right triangle is vertical so the contact is that single point.
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 1.0),
            Point3::new(2.0, -1.0, 1.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut Scratch::new(),
        );
        assert_eq!(syms.len(), 1);
        assert_eq!(syms[0].left, Feature::Edge(0));
        assert_eq!(syms[0].right, Feature::Vertex(0));
    }

    #[test]
    fn test_disjoint_parallel_is_empty() {
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut Scratch::new(),
        );
        assert!(syms.is_empty());
    }

    #[test]
    fn test_interior_segment_between_edge_crossings() {
        // Right triangle pierces the left one: its cut segment lies strictly
        // inside the left face.
        let (pool, ids) = pool_with(&[
            Point3::new(-10.0, -10.0, 0.0),
            Point3::new(10.0, -10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut Scratch::new(),
        );
        assert_eq!(syms.len(), 2);
        assert!(syms.iter().all(|s| s.left == Feature::Face));
        assert!(syms.iter().all(|s| matches!(s.right, Feature::Edge(_))));
    }

    #[test]
    fn test_coplanar_overlap_polygon() {
        // Two overlapping coplanar triangles; the clip region is a polygon
        // whose corners are edge-edge crossings and contained vertices.
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(-1.0, 3.0, 0.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut Scratch::new(),
        );
        assert!(syms.len() >= 3, "expected a polygon, got {}", syms.len());
        assert!(syms
            .iter()
            .any(|s| matches!((s.left, s.right), (Feature::Edge(_), Feature::Edge(_)))));
    }

    #[test]
    fn test_coplanar_contained_triangle() {
        // Right triangle strictly inside the left one: three vertex-in-face
        // candidates.
        let (pool, ids) = pool_with(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(8.0, 0.0, 0.0),
            Point3::new(0.0, 8.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ]);
        let syms = face_face_intersection(
            &pool,
            [ids[0], ids[1], ids[2]],
            [ids[3], ids[4], ids[5]],
            &mut Scratch::new(),
        );
        assert_eq!(syms.len(), 3);
        assert!(syms.iter().all(|s| s.left == Feature::Face));
        assert!(syms.iter().all(|s| s.right.is_vertex()));
    }
}
