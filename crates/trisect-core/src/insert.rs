//! Resolution of symbolic intersections to point-pool ids.
//!
//! Runs single-threaded after the parallel symbolic phase: it is the only
//! writer the pool sees from here on. A symbolic intersection lying on a
//! vertex resolves to that vertex's existing id; everything else is
//! constructed once per global feature pair, so two face pairs meeting at
//! the same symbolic point share one id without the pool's uniqueness index.

use std::collections::HashMap;

use trisect_math::lazy::{self, LazyPoint3};
use trisect_math::predicates::Sign;
use trisect_math::Point3;
use trisect_mesh::{PointPool, VertexId};

use crate::region::Feature;

/// A triangle feature lifted to global point-pool ids, the dedup key for
/// constructed intersection points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FeatureKey {
    /// An edge as its sorted endpoint ids.
    Edge(VertexId, VertexId),
    /// A face as its sorted corner ids.
    Face(VertexId, VertexId, VertexId),
}

fn edge_key(tri: [VertexId; 3], e: u8) -> FeatureKey {
    let a = tri[e as usize];
    let b = tri[((e + 1) % 3) as usize];
    if a <= b {
        FeatureKey::Edge(a, b)
    } else {
        FeatureKey::Edge(b, a)
    }
}

fn face_key(tri: [VertexId; 3]) -> FeatureKey {
    let mut t = tri;
    t.sort();
    FeatureKey::Face(t[0], t[1], t[2])
}

/// Constructs and deduplicates intersection points.
pub struct IntersectionPointInserter<'a> {
    pool: &'a mut PointPool,
    side_map: HashMap<(FeatureKey, FeatureKey), VertexId>,
}

impl<'a> IntersectionPointInserter<'a> {
    /// Wrap the pool; the side map starts empty and dies with the inserter
    /// at the end of the phase.
    pub fn new(pool: &'a mut PointPool) -> Self {
        Self {
            pool,
            side_map: HashMap::new(),
        }
    }

    /// Resolve one symbolic intersection of the face pair `(left, right)` to
    /// a pool id, constructing the point if no equivalent feature pair has
    /// been seen.
    pub fn insert(
        &mut self,
        left_region: Feature,
        left: [VertexId; 3],
        right_region: Feature,
        right: [VertexId; 3],
    ) -> VertexId {
        // Vertices already exist in the pool.
        if let Feature::Vertex(i) = left_region {
            return left[i as usize];
        }
        if let Feature::Vertex(j) = right_region {
            return right[j as usize];
        }

        let key = (
            feature_key(left_region, left),
            feature_key(right_region, right),
        );
        if let Some(&id) = self.side_map.get(&key) {
            return id;
        }

        let point = self.construct(left_region, left, right_region, right);
        let id = self.pool.insert(point);
        self.side_map.insert(key, id);
        id
    }

    fn construct(
        &self,
        left_region: Feature,
        left: [VertexId; 3],
        right_region: Feature,
        right: [VertexId; 3],
    ) -> LazyPoint3 {
        match (left_region, right_region) {
            (Feature::Edge(e), Feature::Face) => self.edge_through_plane(left, e, right),
            (Feature::Face, Feature::Edge(e)) => self.edge_through_plane(right, e, left),
            (Feature::Edge(le), Feature::Edge(re)) => {
                // An edge-edge meeting point: transversal when the left edge
                // crosses the right plane, in-plane otherwise.
                let s0 = self.point(left[le as usize]);
                let s1 = self.point(left[((le + 1) % 3) as usize]);
                let p = self.pool.at(right[0]);
                let q = self.pool.at(right[1]);
                let r = self.pool.at(right[2]);
                let z0 = lazy::orient3d(p, q, r, self.pool.at(left[le as usize]));
                let z1 = lazy::orient3d(p, q, r, self.pool.at(left[((le + 1) % 3) as usize]));
                if z0 == Sign::Zero && z1 == Sign::Zero {
                    let t0 = self.point(right[re as usize]);
                    let t1 = self.point(right[((re + 1) % 3) as usize]);
                    LazyPoint3::segment_segment(s0, s1, t0, t1)
                } else {
                    LazyPoint3::segment_plane(
                        s0,
                        s1,
                        self.point(right[0]),
                        self.point(right[1]),
                        self.point(right[2]),
                    )
                }
            }
            // (Face, Face) and vertex combinations never reach here: a
            // face-interior/face-interior contact is not a single point and
            // vertices resolve before construction.
            _ => unreachable!("unexpected symbolic feature pair"),
        }
    }

    fn edge_through_plane(
        &self,
        edge_tri: [VertexId; 3],
        e: u8,
        plane_tri: [VertexId; 3],
    ) -> LazyPoint3 {
        LazyPoint3::segment_plane(
            self.point(edge_tri[e as usize]),
            self.point(edge_tri[((e + 1) % 3) as usize]),
            self.point(plane_tri[0]),
            self.point(plane_tri[1]),
            self.point(plane_tri[2]),
        )
    }

    fn point(&self, id: VertexId) -> Point3 {
        *self
            .pool
            .at(id)
            .as_literal()
            .expect("constructions reference input vertices")
    }
}

fn feature_key(feature: Feature, tri: [VertexId; 3]) -> FeatureKey {
    match feature {
        Feature::Edge(e) => edge_key(tri, e),
        Feature::Face => face_key(tri),
        Feature::Vertex(_) => unreachable!("vertex features resolve to existing ids"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_pool(points: &[Point3]) -> (PointPool, Vec<VertexId>) {
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
    fn test_vertex_regions_reuse_ids() {
        let (mut pool, ids) = seeded_pool(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]);
        let before = pool.len();
        let mut inserter = IntersectionPointInserter::new(&mut pool);
        let id = inserter.insert(
            Feature::Vertex(1),
            [ids[0], ids[1], ids[2]],
            Feature::Face,
            [ids[3], ids[4], ids[5]],
        );
        assert_eq!(id, ids[1]);
        assert_eq!(pool.len(), before);
    }

    #[test]
    fn test_same_feature_pair_shares_one_point() {
        // Left edge 0-1 pierces the right triangle's plane.
        let (mut pool, ids) = seeded_pool(&[
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(3.0, 0.0, 0.5),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let before = pool.len();
        let mut inserter = IntersectionPointInserter::new(&mut pool);
        let left = [ids[0], ids[1], ids[2]];
        let right = [ids[3], ids[4], ids[5]];
        let a = inserter.insert(Feature::Edge(0), left, Feature::Face, right);
        let b = inserter.insert(Feature::Edge(0), left, Feature::Face, right);
        assert_eq!(a, b);
        assert_eq!(pool.len(), before + 1);
        // The constructed point is the exact plane crossing.
        let expected = LazyPoint3::literal(Point3::new(0.0, 0.0, 0.0));
        assert!(lazy::points_equal(pool.at(a), &expected));
    }

    #[test]
    fn test_coplanar_edge_pair_uses_segment_construction() {
        // Both triangles in the z=0 plane with crossing edges.
        let (mut pool, ids) = seeded_pool(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(4.0, 2.0, 0.0),
        ]);
        let mut inserter = IntersectionPointInserter::new(&mut pool);
        let id = inserter.insert(
            Feature::Edge(0),
            [ids[0], ids[1], ids[2]],
            Feature::Edge(0),
            [ids[3], ids[4], ids[5]],
        );
        let expected = LazyPoint3::literal(Point3::new(1.0, 1.0, 0.0));
        assert!(lazy::points_equal(pool.at(id), &expected));
    }
}
