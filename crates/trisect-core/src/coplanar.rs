//! Detection of faces present in both inputs.
//!
//! Two faces whose vertex triples resolve to the same point-pool ids in the
//! same cyclic order are the same triangle in the same plane with the same
//! orientation; reversed cyclic order means reversed orientation. Such pairs
//! are tagged up front so the broad phase can skip them and extraction can
//! treat them as boundary faces.

use std::collections::HashMap;

use trisect_mesh::{FaceId, FaceTag, TriangleSoup, VertexId};

use crate::side::PerSide;

/// Tag faces of both soups that have an identical (or orientation-reversed)
/// counterpart in the other soup. Returns one tag vector per soup, `Unknown`
/// everywhere else.
pub fn find_coplanar_faces<D>(
    soups: PerSide<&TriangleSoup<D>>,
    point_ids: &PerSide<Vec<VertexId>>,
) -> PerSide<Vec<FaceTag>> {
    let mut tags = PerSide::new(
        vec![FaceTag::Unknown; soups.left.num_faces()],
        vec![FaceTag::Unknown; soups.right.num_faces()],
    );

    // Hash the smaller soup, stream the larger one over it.
    let left_is_a = soups.left.num_faces() < soups.right.num_faces();
    let (a, b) = if left_is_a {
        (soups.left, soups.right)
    } else {
        (soups.right, soups.left)
    };
    let (a_points, b_points) = if left_is_a {
        (&point_ids.left, &point_ids.right)
    } else {
        (&point_ids.right, &point_ids.left)
    };

    let (a_tags, b_tags) = if left_is_a {
        (&mut tags.left, &mut tags.right)
    } else {
        (&mut tags.right, &mut tags.left)
    };

    let mut triangle_to_face: HashMap<[VertexId; 3], FaceId> = HashMap::with_capacity(a.num_faces());
    for fi in a.faces() {
        triangle_to_face.insert(canonical_triangle(a, fi, a_points), fi);
    }

    for fi in b.faces() {
        let tri = canonical_triangle(b, fi, b_points);

        if let Some(&afi) = triangle_to_face.get(&tri) {
            a_tags[afi.index()] = FaceTag::Coplanar;
            b_tags[fi.index()] = FaceTag::Coplanar;
            continue;
        }

        if let Some(&afi) = triangle_to_face.get(&opposite(tri)) {
            a_tags[afi.index()] = FaceTag::Opposite;
            b_tags[fi.index()] = FaceTag::Opposite;
        }
    }

    tags
}

/// Pool-id triple of a face, rotated so the smallest id leads while the
/// cyclic order is preserved.
fn canonical_triangle<D>(
    soup: &TriangleSoup<D>,
    fi: FaceId,
    point_ids: &[VertexId],
) -> [VertexId; 3] {
    let face = soup.face(fi);
    let tri = [
        point_ids[face[0].index()],
        point_ids[face[1].index()],
        point_ids[face[2].index()],
    ];
    let min = (0..3).min_by_key(|&i| tri[i]).unwrap_or(0);
    [tri[min], tri[(min + 1) % 3], tri[(min + 2) % 3]]
}

/// The same triangle with reversed orientation.
fn opposite(tri: [VertexId; 3]) -> [VertexId; 3] {
    [tri[0], tri[2], tri[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use trisect_math::Point3;

    fn soup_with_triangle(order: [usize; 3]) -> (TriangleSoup<()>, Vec<VertexId>) {
        let mut soup = TriangleSoup::new();
        let v = [
            soup.add_vertex(Point3::new(0.0, 0.0, 0.0)),
            soup.add_vertex(Point3::new(1.0, 0.0, 0.0)),
            soup.add_vertex(Point3::new(0.0, 1.0, 0.0)),
        ];
        soup.add_face([v[order[0]], v[order[1]], v[order[2]]], ());
        // Identity table: soup vertex i maps to pool id of vertex position i.
        let ids = vec![VertexId(0), VertexId(1), VertexId(2)];
        (soup, ids)
    }

    #[test]
    fn test_same_cyclic_order_is_coplanar() {
        let (left, left_ids) = soup_with_triangle([0, 1, 2]);
        let (right, right_ids) = soup_with_triangle([1, 2, 0]);
        let tags = find_coplanar_faces(
            PerSide::new(&left, &right),
            &PerSide::new(left_ids, right_ids),
        );
        assert_eq!(tags.left[0], FaceTag::Coplanar);
        assert_eq!(tags.right[0], FaceTag::Coplanar);
    }

    #[test]
    fn test_reversed_order_is_opposite() {
        let (left, left_ids) = soup_with_triangle([0, 1, 2]);
        let (right, right_ids) = soup_with_triangle([0, 2, 1]);
        let tags = find_coplanar_faces(
            PerSide::new(&left, &right),
            &PerSide::new(left_ids, right_ids),
        );
        assert_eq!(tags.left[0], FaceTag::Opposite);
        assert_eq!(tags.right[0], FaceTag::Opposite);
    }

    #[test]
    fn test_different_triangles_stay_unknown() {
        let (left, left_ids) = soup_with_triangle([0, 1, 2]);
        let mut right = TriangleSoup::<()>::new();
        let a = right.add_vertex(Point3::new(5.0, 0.0, 0.0));
        let b = right.add_vertex(Point3::new(6.0, 0.0, 0.0));
        let c = right.add_vertex(Point3::new(5.0, 1.0, 0.0));
        right.add_face([a, b, c], ());
        let right_ids = vec![VertexId(3), VertexId(4), VertexId(5)];
        let tags = find_coplanar_faces(
            PerSide::new(&left, &right),
            &PerSide::new(left_ids, right_ids),
        );
        assert_eq!(tags.left[0], FaceTag::Unknown);
        assert_eq!(tags.right[0], FaceTag::Unknown);
    }
}
