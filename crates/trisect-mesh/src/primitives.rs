//! Simple closed soups for tests and demos.

use trisect_math::predicates::orient3d;
use trisect_math::Point3;

use crate::soup::TriangleSoup;

/// An axis-aligned box as 12 outward-oriented triangles.
pub fn make_cube<D: Default>(min: Point3, max: Point3) -> TriangleSoup<D> {
    let mut soup = TriangleSoup::new();
    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    let v: Vec<_> = corners.into_iter().map(|p| soup.add_vertex(p)).collect();

    let faces = [
        // bottom (-z), top (+z)
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        // front (-y), back (+y)
        [0, 1, 5],
        [0, 5, 4],
        [2, 3, 7],
        [2, 7, 6],
        // left (-x), right (+x)
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    for [a, b, c] in faces {
        soup.add_face([v[a], v[b], v[c]], D::default());
    }
    soup
}

/// A tetrahedron over four non-coplanar points, with outward-oriented faces
/// regardless of the order the corners are given in.
pub fn make_tetrahedron<D: Default>(
    a: Point3,
    b: Point3,
    c: Point3,
    d: Point3,
) -> TriangleSoup<D> {
    // Positive orient3d means d is opposite the outward normal of (a, b, c),
    // which is what an outward base face needs; otherwise swap two corners.
    let (b, c) = if orient3d(&a, &b, &c, &d).is_positive() {
        (b, c)
    } else {
        (c, b)
    };

    let mut soup = TriangleSoup::new();
    let va = soup.add_vertex(a);
    let vb = soup.add_vertex(b);
    let vc = soup.add_vertex(c);
    let vd = soup.add_vertex(d);
    for tri in [[va, vb, vc], [va, vd, vb], [vb, vd, vc], [vc, vd, va]] {
        soup.add_face(tri, D::default());
    }
    soup
}

#[cfg(test)]
mod tests {
    use super::*;
    use trisect_math::predicates::Sign;

    #[test]
    fn test_cube_faces_point_outward() {
        let soup = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let center = Point3::new(0.5, 0.5, 0.5);
        assert_eq!(soup.num_faces(), 12);
        for fi in soup.faces() {
            let [a, b, c] = soup.face(fi);
            // The center is on the inner side of every outward face.
            assert_eq!(
                orient3d(soup.point(a), soup.point(b), soup.point(c), &center),
                Sign::Positive
            );
        }
    }

    #[test]
    fn test_tetrahedron_faces_point_outward() {
        for (a, b, c, d) in [
            (
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ),
            (
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ),
        ] {
            let soup = make_tetrahedron::<()>(a, b, c, d);
            let centroid = Point3::new(
                (a.x + b.x + c.x + d.x) / 4.0,
                (a.y + b.y + c.y + d.y) / 4.0,
                (a.z + b.z + c.z + d.z) / 4.0,
            );
            for fi in soup.faces() {
                let [p, q, r] = soup.face(fi);
                assert_eq!(
                    orient3d(soup.point(p), soup.point(q), soup.point(r), &centroid),
                    Sign::Positive
                );
            }
        }
    }
}
