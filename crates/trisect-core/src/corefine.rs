//! The corefinement driver.
//!
//! Takes two triangle soups and refines every face against the other soup so
//! that their intersection curves lie exactly on edges of both. Phases, with
//! serial boundaries between the parallel ones:
//!
//! 1. serial: seed the deduplicated point pool and the per-soup id tables
//! 2. serial: coplanar/opposite tagging and broad-phase pair culling
//! 3. parallel: symbolic face–face intersection over candidate pairs
//! 4. serial: construct and deduplicate intersection points
//! 5. parallel: force exact coordinates of the newly constructed points
//! 6. parallel: per-face constrained triangulations, left soup then right

use std::collections::HashMap;
use std::ops::Range;

use arrayvec::ArrayVec;
use rayon::prelude::*;
use trisect_math::lazy::LazyPoint3;
use trisect_mesh::{make_edge, EdgeSet, FaceId, FaceTag, PointPool, TriangleSoup, VertexId};

use crate::broadphase::find_possibly_intersecting_faces;
use crate::coplanar::find_coplanar_faces;
use crate::error::{BooleanError, InputMesh};
use crate::insert::IntersectionPointInserter;
use crate::intersect::{face_face_intersection, Scratch};
use crate::region::SymbolicIntersection;
use crate::side::{PerSide, Side};
use crate::triangulate::{ConstraintCrossing, PlanarTriangulation, VertexHandle};

/// One intersecting face pair with its symbolic intersections and, after
/// point insertion, their resolved pool ids. Lives through the triangulation
/// phase and is discarded with the corefiner.
#[derive(Debug)]
pub struct IntersectionInfo {
    /// Face of the left soup.
    pub left_fi: FaceId,
    /// Face of the right soup.
    pub right_fi: FaceId,
    /// Symbolic intersection elements, in intersection order.
    pub symbolic: ArrayVec<SymbolicIntersection, 6>,
    /// Pool ids parallel to `symbolic`.
    pub points: ArrayVec<VertexId, 6>,
}

/// Corefined state of two soups: the shared pool, per-face tags, and the
/// per-face triangulations of every refined face.
pub struct Corefine<'a, D> {
    soups: PerSide<&'a TriangleSoup<D>>,
    pool: PointPool,
    point_ids: PerSide<Vec<VertexId>>,
    face_tags: PerSide<Vec<FaceTag>>,
    triangulations: PerSide<HashMap<FaceId, PlanarTriangulation>>,
    infos: Vec<IntersectionInfo>,
}

impl<'a, D: Send + Sync> Corefine<'a, D> {
    /// Run corefinement. Fails when a constraint crossing reveals a
    /// self-intersecting input.
    pub fn new(left: &'a TriangleSoup<D>, right: &'a TriangleSoup<D>) -> Result<Self, BooleanError> {
        let soups = PerSide::new(left, right);

        log::info!("finding face pairs");
        let mut pool = PointPool::new();
        pool.start_uniqueness_check();
        pool.reserve(left.num_vertices() + right.num_vertices());
        let point_ids = PerSide::new(
            seed_points(&mut pool, left),
            seed_points(&mut pool, right),
        );
        pool.stop_uniqueness_check();

        let face_tags = find_coplanar_faces(soups, &point_ids);
        let pairs = find_possibly_intersecting_faces(soups, &face_tags);

        log::info!("finding symbolic intersections ({} candidate pairs)", pairs.len());
        let face_ids = |side: Side, fi: FaceId| -> [VertexId; 3] {
            let f = soups[side].face(fi);
            let ids = &point_ids[side];
            [
                ids[f[0].index()],
                ids[f[1].index()],
                ids[f[2].index()],
            ]
        };

        let found: Vec<Option<IntersectionInfo>> = pairs
            .par_iter()
            .map_init(Scratch::new, |scratch, &(left_fi, right_fi)| {
                let symbolic = face_face_intersection(
                    &pool,
                    face_ids(Side::Left, left_fi),
                    face_ids(Side::Right, right_fi),
                    scratch,
                );
                if symbolic.is_empty() {
                    return None;
                }
                Some(IntersectionInfo {
                    left_fi,
                    right_fi,
                    symbolic,
                    points: ArrayVec::new(),
                })
            })
            .collect();
        let mut infos: Vec<IntersectionInfo> = found.into_iter().flatten().collect();
        // The candidate list was sorted; keep the merge order independent of
        // scheduling anyway.
        infos.sort_unstable_by_key(|info| (info.left_fi, info.right_fi));
        let num_intersections: usize = infos.iter().map(|i| i.symbolic.len()).sum();

        log::info!("constructing intersection points ({num_intersections} symbolic)");
        let num_points_before = pool.len();
        pool.reserve(num_intersections / 2);
        let mut inserter = IntersectionPointInserter::new(&mut pool);
        for info in &mut infos {
            let l = face_ids(Side::Left, info.left_fi);
            let r = face_ids(Side::Right, info.right_fi);
            for sym in &info.symbolic {
                info.points.push(inserter.insert(sym.left, l, sym.right, r));
            }
        }
        drop(inserter);

        // Materialize the new points' exact coordinates so every later phase
        // reads them without evaluation.
        pool.range(num_points_before)
            .par_iter()
            .for_each(|p| {
                p.exact();
            });

        log::info!("triangulating");
        let left_order: Vec<usize> = (0..infos.len()).collect();
        let left_triangulations = triangulate_side(
            &pool,
            soups.left,
            &point_ids.left,
            &infos,
            Side::Left,
            &left_order,
        )
        .map_err(|_| BooleanError::SelfIntersection(InputMesh::Second))?;

        let mut right_order: Vec<usize> = (0..infos.len()).collect();
        right_order.sort_unstable_by_key(|&i| (infos[i].right_fi, infos[i].left_fi));
        let right_triangulations = triangulate_side(
            &pool,
            soups.right,
            &point_ids.right,
            &infos,
            Side::Right,
            &right_order,
        )
        .map_err(|_| BooleanError::SelfIntersection(InputMesh::First))?;

        Ok(Self {
            soups,
            pool,
            point_ids,
            face_tags,
            triangulations: PerSide::new(left_triangulations, right_triangulations),
            infos,
        })
    }

    /// Tag of a face and its refined triangles: the triangulation's output
    /// when the face was refined, the original triple otherwise.
    pub fn faces_of(&self, side: Side, fi: FaceId, out: &mut Vec<[VertexId; 3]>) -> FaceTag {
        if let Some(t) = self.triangulations[side].get(&fi) {
            t.get_faces(out);
        } else {
            let f = self.soups[side].face(fi);
            let ids = &self.point_ids[side];
            out.push([
                ids[f[0].index()],
                ids[f[1].index()],
                ids[f[2].index()],
            ]);
        }
        self.face_tags[side][fi.index()]
    }

    /// Edges of the mixed mesh lying on intersection curves: consecutive
    /// intersection points of each info, with polygonal regions closed.
    pub fn intersecting_edges(&self) -> EdgeSet {
        let mut edges = EdgeSet::new();
        for info in &self.infos {
            let n = info.points.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let j = if i < n - 1 { i + 1 } else { 0 };
                let a = info.points[i];
                let b = info.points[j];
                if a != b {
                    edges.insert(make_edge(a, b));
                }
            }
        }
        edges
    }

    /// Drain the point pool for the output mesh. Triangulations keep working
    /// afterwards; they only store ids.
    pub fn take_points(&mut self) -> Vec<LazyPoint3> {
        std::mem::take(&mut self.pool).take_points()
    }
}

fn seed_points<D>(pool: &mut PointPool, soup: &TriangleSoup<D>) -> Vec<VertexId> {
    soup.vertices()
        .map(|vi| pool.insert(LazyPoint3::literal(*soup.point(vi))))
        .collect()
}

/// Group an ordered info permutation into contiguous per-face ranges and
/// triangulate each face in parallel.
fn triangulate_side<D: Send + Sync>(
    pool: &PointPool,
    soup: &TriangleSoup<D>,
    point_ids: &[VertexId],
    infos: &[IntersectionInfo],
    side: Side,
    order: &[usize],
) -> Result<HashMap<FaceId, PlanarTriangulation>, ConstraintCrossing> {
    let face_of = |idx: usize| match side {
        Side::Left => infos[idx].left_fi,
        Side::Right => infos[idx].right_fi,
    };

    let mut ranges: Vec<(FaceId, Range<usize>)> = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let fi = face_of(order[start]);
        let mut end = start + 1;
        while end < order.len() && face_of(order[end]) == fi {
            end += 1;
        }
        ranges.push((fi, start..end));
        start = end;
    }

    let built: Result<Vec<(FaceId, PlanarTriangulation)>, ConstraintCrossing> = ranges
        .par_iter()
        .map(|(fi, range)| {
            let f = soup.face(*fi);
            let a = point_ids[f[0].index()];
            let b = point_ids[f[1].index()];
            let c = point_ids[f[2].index()];
            let mut cdt =
                PlanarTriangulation::new(pool.at(a), pool.at(b), pool.at(c), a, b, c);
            for &idx in &order[range.clone()] {
                insert_intersection(&mut cdt, &infos[idx], side, pool)?;
            }
            Ok((*fi, cdt))
        })
        .collect();

    Ok(built?.into_iter().collect())
}

/// Insert one info's points into a face triangulation and constrain the
/// polyline between them, closing it when it is a polygon.
fn insert_intersection(
    cdt: &mut PlanarTriangulation,
    info: &IntersectionInfo,
    side: Side,
    pool: &PointPool,
) -> Result<(), ConstraintCrossing> {
    let mut first: Option<VertexHandle> = None;
    let mut prev: Option<VertexHandle> = None;
    for (i, &id) in info.points.iter().enumerate() {
        let feature = match side {
            Side::Left => info.symbolic[i].left,
            Side::Right => info.symbolic[i].right,
        };
        let cur = cdt.insert(pool.at(id), id, feature);
        if let Some(p) = prev {
            cdt.insert_constraint(p, cur)?;
        }
        if first.is_none() {
            first = Some(cur);
        }
        prev = Some(cur);
    }
    if info.points.len() > 2 {
        if let (Some(p), Some(f)) = (prev, first) {
            cdt.insert_constraint(p, f)?;
        }
    }
    Ok(())
}
