//! Broad-phase culling of face pairs.
//!
//! Input coordinates are plain f64, so the axis-aligned boxes here are exact
//! hulls and the filter never rejects a truly intersecting pair. Pairs whose
//! faces were already tagged coplanar or opposite are skipped; the narrow
//! phase would only rediscover what the tag already says.

use trisect_math::Point3;
use trisect_mesh::{FaceId, FaceTag, TriangleSoup};

use crate::side::PerSide;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Componentwise minimum corner.
    pub min: Point3,
    /// Componentwise maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// The empty box.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Grow to include a point.
    pub fn grow(&mut self, p: &Point3) {
        for k in 0..3 {
            self.min[k] = self.min[k].min(p[k]);
            self.max[k] = self.max[k].max(p[k]);
        }
    }

    /// The hull of a face's three vertices.
    pub fn of_face<D>(soup: &TriangleSoup<D>, fi: FaceId) -> Self {
        let mut aabb = Self::empty();
        for v in soup.face(fi) {
            aabb.grow(soup.point(v));
        }
        aabb
    }

    /// Grow to include another box.
    pub fn merge(&mut self, other: &Aabb) {
        self.grow(&other.min);
        self.grow(&other.max);
    }

    /// Closed-interval overlap test.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|k| self.min[k] <= other.max[k] && self.max[k] >= other.min[k])
    }

    fn center(&self, axis: usize) -> f64 {
        0.5 * (self.min[axis] + self.max[axis])
    }

    fn longest_axis(&self) -> usize {
        let mut axis = 0;
        let mut best = f64::NEG_INFINITY;
        for k in 0..3 {
            let extent = self.max[k] - self.min[k];
            if extent > best {
                best = extent;
                axis = k;
            }
        }
        axis
    }
}

const LEAF_SIZE: usize = 8;

enum Node {
    Leaf {
        aabb: Aabb,
        start: usize,
        len: usize,
    },
    Internal {
        aabb: Aabb,
        children: [usize; 2],
    },
}

impl Node {
    fn aabb(&self) -> &Aabb {
        match self {
            Node::Leaf { aabb, .. } | Node::Internal { aabb, .. } => aabb,
        }
    }
}

/// A median-split bounding-volume hierarchy over one soup's faces.
pub struct Bvh {
    nodes: Vec<Node>,
    // Face ids permuted so each leaf owns a contiguous range.
    order: Vec<(FaceId, Aabb)>,
    root: Option<usize>,
}

impl Bvh {
    /// Build over the given faces.
    pub fn build<D>(soup: &TriangleSoup<D>, faces: impl Iterator<Item = FaceId>) -> Self {
        let mut order: Vec<(FaceId, Aabb)> =
            faces.map(|fi| (fi, Aabb::of_face(soup, fi))).collect();
        let mut bvh = Self {
            nodes: Vec::new(),
            order: Vec::new(),
            root: None,
        };
        if !order.is_empty() {
            let len = order.len();
            let root = bvh.build_range(&mut order, 0, len);
            bvh.root = Some(root);
        }
        bvh.order = order;
        bvh
    }

    fn build_range(&mut self, order: &mut [(FaceId, Aabb)], start: usize, len: usize) -> usize {
        let slice = &mut order[start..start + len];
        let mut aabb = Aabb::empty();
        for (_, face_aabb) in slice.iter() {
            aabb.merge(face_aabb);
        }

        if len <= LEAF_SIZE {
            self.nodes.push(Node::Leaf { aabb, start, len });
            return self.nodes.len() - 1;
        }

        let axis = aabb.longest_axis();
        let mid = len / 2;
        slice.select_nth_unstable_by(mid, |a, b| {
            a.1.center(axis)
                .partial_cmp(&b.1.center(axis))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let left = self.build_range(order, start, mid);
        let right = self.build_range(order, start + mid, len - mid);
        self.nodes.push(Node::Internal {
            aabb,
            children: [left, right],
        });
        self.nodes.len() - 1
    }

    /// Collect all stored faces whose box overlaps `query`.
    pub fn query(&self, query: &Aabb, out: &mut Vec<FaceId>) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(ni) = stack.pop() {
            let node = &self.nodes[ni];
            if !node.aabb().overlaps(query) {
                continue;
            }
            match node {
                Node::Leaf { start, len, .. } => {
                    for (fi, aabb) in &self.order[*start..*start + *len] {
                        if aabb.overlaps(query) {
                            out.push(*fi);
                        }
                    }
                }
                Node::Internal { children, .. } => {
                    stack.push(children[1]);
                    stack.push(children[0]);
                }
            }
        }
    }
}

/// Enumerate candidate face pairs `(left, right)` whose bounding boxes
/// overlap, excluding faces tagged coplanar or opposite. The result is
/// sorted by `(left, right)`.
pub fn find_possibly_intersecting_faces<D>(
    soups: PerSide<&TriangleSoup<D>>,
    tags: &PerSide<Vec<FaceTag>>,
) -> Vec<(FaceId, FaceId)> {
    let skip = |tag: FaceTag| matches!(tag, FaceTag::Coplanar | FaceTag::Opposite);

    let bvh = Bvh::build(
        soups.right,
        soups
            .right
            .faces()
            .filter(|fi| !skip(tags.right[fi.index()])),
    );

    let mut pairs = Vec::new();
    let mut hits = Vec::new();
    for left_fi in soups.left.faces() {
        if skip(tags.left[left_fi.index()]) {
            continue;
        }
        let query = Aabb::of_face(soups.left, left_fi);
        hits.clear();
        bvh.query(&query, &mut hits);
        for &right_fi in &hits {
            pairs.push((left_fi, right_fi));
        }
    }
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use trisect_math::Point3;
    use trisect_mesh::primitives::make_cube;

    #[test]
    fn test_disjoint_cubes_no_pairs() {
        let left = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let right = make_cube::<()>(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
        let tags = PerSide::new(
            vec![FaceTag::Unknown; 12],
            vec![FaceTag::Unknown; 12],
        );
        let pairs = find_possibly_intersecting_faces(PerSide::new(&left, &right), &tags);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_overlapping_cubes_complete_enumeration() {
        let left = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let right = make_cube::<()>(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5));
        let tags = PerSide::new(
            vec![FaceTag::Unknown; 12],
            vec![FaceTag::Unknown; 12],
        );
        let pairs = find_possibly_intersecting_faces(PerSide::new(&left, &right), &tags);

        // Brute force reference.
        let mut expected = Vec::new();
        for lf in left.faces() {
            for rf in right.faces() {
                if Aabb::of_face(&left, lf).overlaps(&Aabb::of_face(&right, rf)) {
                    expected.push((lf, rf));
                }
            }
        }
        assert_eq!(pairs, expected);
        assert!(!pairs.is_empty());
    }

    #[test]
    fn test_tagged_faces_are_skipped() {
        let left = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let right = left.clone();
        let tags = PerSide::new(
            vec![FaceTag::Coplanar; 12],
            vec![FaceTag::Coplanar; 12],
        );
        let pairs = find_possibly_intersecting_faces(PerSide::new(&left, &right), &tags);
        assert!(pairs.is_empty());
    }
}
