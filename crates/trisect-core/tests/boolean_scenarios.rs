//! End-to-end Boolean scenarios on small closed solids.

use approx::assert_relative_eq;
use trisect_core::{boolean, mix, BooleanError, BooleanOp, InputMesh};
use trisect_math::Point3;
use trisect_mesh::primitives::{make_cube, make_tetrahedron};
use trisect_mesh::{FaceTag, TriangleSoup};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// Signed volume of a closed soup via the divergence theorem.
fn volume(soup: &TriangleSoup<()>) -> f64 {
    soup.faces()
        .map(|fi| {
            let [a, b, c] = soup.face(fi);
            let pa = soup.point(a).coords;
            let pb = soup.point(b).coords;
            let pc = soup.point(c).coords;
            pa.dot(&pb.cross(&pc)) / 6.0
        })
        .sum()
}

#[test]
fn disjoint_cubes_union_and_intersection() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(2.0, 0.0, 0.0), p(3.0, 1.0, 1.0));

    let (mixed, warnings) = mix(&left, &right).unwrap();
    assert_eq!(mixed.num_faces(), 24);
    for i in 0..mixed.num_faces() {
        assert_eq!(
            mixed.data(trisect_mesh::FaceId(i as u32)).tag.as_output(),
            FaceTag::Exterior
        );
    }
    // Disjoint inputs have no intersection curves, so no local seeds; the
    // ray fallback labels both components.
    assert!(warnings.contains(trisect_core::Warnings::ISOLATED_COMPONENT_FALLBACK));

    let (union, _) = boolean(&left, &right, BooleanOp::Union).unwrap();
    assert_eq!(union.num_faces(), 24);
    assert_relative_eq!(volume(&union), 2.0, max_relative = 1e-9);

    let (inter, _) = boolean(&left, &right, BooleanOp::Intersection).unwrap();
    assert_eq!(inter.num_faces(), 0);
}

#[test]
fn identical_cubes() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = left.clone();

    let (mixed, warnings) = mix(&left, &right).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(mixed.num_faces(), 24);
    for i in 0..mixed.num_faces() {
        let data = mixed.data(trisect_mesh::FaceId(i as u32));
        assert_eq!(data.tag, FaceTag::Coplanar);
        assert_eq!(data.tag.as_output(), FaceTag::Boundary);
    }

    let (inter, _) = boolean(&left, &right, BooleanOp::Intersection).unwrap();
    assert_eq!(inter.num_faces(), 12);
    assert_relative_eq!(volume(&inter), 1.0, max_relative = 1e-9);

    let (sym, _) = boolean(&left, &right, BooleanOp::SymmetricDifference).unwrap();
    assert_eq!(sym.num_faces(), 0);
}

#[test]
fn shifted_cubes_all_operations() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.5, 0.5, 0.5), p(1.5, 1.5, 1.5));

    let (inter, warnings) = boolean(&left, &right, BooleanOp::Intersection).unwrap();
    assert!(warnings.is_empty());
    assert!(inter.num_faces() >= 12);
    assert_relative_eq!(volume(&inter), 0.125, max_relative = 1e-9);
    // The intersection is the corner cube [0.5, 1]^3.
    for vi in inter.vertices() {
        let q = inter.point(vi);
        for k in 0..3 {
            assert!(q[k] >= 0.5 - 1e-12 && q[k] <= 1.0 + 1e-12);
        }
    }

    let (union, _) = boolean(&left, &right, BooleanOp::Union).unwrap();
    assert_relative_eq!(volume(&union), 1.875, max_relative = 1e-9);

    let (diff, _) = boolean(&left, &right, BooleanOp::Difference).unwrap();
    assert_relative_eq!(volume(&diff), 0.875, max_relative = 1e-9);

    let (sym, _) = boolean(&left, &right, BooleanOp::SymmetricDifference).unwrap();
    assert_relative_eq!(volume(&sym), 1.75, max_relative = 1e-9);
}

#[test]
fn edge_touching_tetrahedra() {
    let left = make_tetrahedron::<()>(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, 1.0, 0.0),
        p(0.0, 0.0, 1.0),
    );
    let right = make_tetrahedron::<()>(
        p(0.0, 0.0, 0.0),
        p(1.0, 0.0, 0.0),
        p(0.0, -1.0, 0.0),
        p(0.0, 0.0, -1.0),
    );

    let (mixed, _) = mix(&left, &right).unwrap();
    // The shared edge's endpoints deduplicate; nothing new is constructed.
    assert_eq!(mixed.points().len(), 6);

    let (union, _) = boolean(&left, &right, BooleanOp::Union).unwrap();
    assert_eq!(union.num_faces(), 8);
    assert_relative_eq!(volume(&union), 1.0 / 3.0, max_relative = 1e-9);

    let (inter, _) = boolean(&left, &right, BooleanOp::Intersection).unwrap();
    assert_eq!(inter.num_faces(), 0);
}

#[test]
fn slab_through_cube() {
    let cube = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let slab = make_cube::<()>(p(-5.0, -5.0, 0.25), p(5.0, 5.0, 0.75));

    let (inter, warnings) = boolean(&cube, &slab, BooleanOp::Intersection).unwrap();
    assert!(warnings.is_empty());
    assert_relative_eq!(volume(&inter), 0.5, max_relative = 1e-9);
    for vi in inter.vertices() {
        let q = inter.point(vi);
        assert!(q.z >= 0.25 - 1e-12 && q.z <= 0.75 + 1e-12);
    }

    let (diff, _) = boolean(&cube, &slab, BooleanOp::Difference).unwrap();
    assert_relative_eq!(volume(&diff), 0.5, max_relative = 1e-9);
}

#[test]
fn self_intersecting_input_fails() {
    // One big horizontal face.
    let mut left = TriangleSoup::<()>::new();
    let a = left.add_vertex(p(-5.0, -5.0, 0.0));
    let b = left.add_vertex(p(5.0, -5.0, 0.0));
    let c = left.add_vertex(p(0.0, 5.0, 0.0));
    left.add_face([a, b, c], ());

    // Two triangles whose cuts through the z=0 plane cross each other.
    let mut right = TriangleSoup::<()>::new();
    let r = [
        right.add_vertex(p(-1.0, 0.0, -1.0)),
        right.add_vertex(p(1.0, 0.0, -1.0)),
        right.add_vertex(p(0.0, 0.0, 2.0)),
        right.add_vertex(p(0.0, -1.0, -1.0)),
        right.add_vertex(p(0.0, 1.0, -1.0)),
        right.add_vertex(p(0.0, 0.0, 2.0)),
    ];
    right.add_face([r[0], r[1], r[2]], ());
    right.add_face([r[3], r[4], r[5]], ());

    let err = mix(&left, &right).unwrap_err();
    assert!(matches!(
        err,
        BooleanError::SelfIntersection(InputMesh::Second)
    ));
}

#[test]
fn union_is_commutative() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.5, 0.5, 0.5), p(1.5, 1.5, 1.5));

    let (ab, _) = boolean(&left, &right, BooleanOp::Union).unwrap();
    let (ba, _) = boolean(&right, &left, BooleanOp::Union).unwrap();
    assert_eq!(ab.num_faces(), ba.num_faces());
    assert_relative_eq!(volume(&ab), volume(&ba), max_relative = 1e-9);
}

#[test]
fn self_intersection_of_a_mesh_with_itself_is_boundary() {
    let cube = make_cube::<()>(p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0));
    let (mixed, warnings) = mix(&cube, &cube).unwrap();
    assert!(warnings.is_empty());
    for i in 0..mixed.num_faces() {
        let data = mixed.data(trisect_mesh::FaceId(i as u32));
        assert_eq!(data.tag.as_output(), FaceTag::Boundary);
    }
    let (inter, _) = boolean(&cube, &cube, BooleanOp::Intersection).unwrap();
    assert_eq!(inter.num_faces(), 12);
    assert_relative_eq!(volume(&inter), 8.0, max_relative = 1e-9);
}

#[test]
fn differences_and_intersection_partition_the_union() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.25, 0.25, -0.5), p(0.75, 0.75, 0.5));

    let (l_minus_r, _) = boolean(&left, &right, BooleanOp::Difference).unwrap();
    let (r_minus_l, _) = boolean(&right, &left, BooleanOp::Difference).unwrap();
    let (inter, _) = boolean(&left, &right, BooleanOp::Intersection).unwrap();
    let (union, _) = boolean(&left, &right, BooleanOp::Union).unwrap();

    assert_relative_eq!(
        volume(&l_minus_r) + volume(&r_minus_l) + volume(&inter),
        volume(&union),
        max_relative = 1e-9
    );
    assert_relative_eq!(volume(&inter), 0.125, max_relative = 1e-9);
}

#[test]
fn swapped_inputs_classify_the_same() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.5, 0.5, 0.5), p(1.5, 1.5, 1.5));

    let count = |a: &TriangleSoup<()>, b: &TriangleSoup<()>| {
        let (mixed, _) = mix(a, b).unwrap();
        let mut interior_left = 0usize;
        let mut interior_right = 0usize;
        for i in 0..mixed.num_faces() {
            let d = mixed.data(trisect_mesh::FaceId(i as u32));
            if d.tag == FaceTag::Interior {
                if d.from_left {
                    interior_left += 1;
                } else {
                    interior_right += 1;
                }
            }
        }
        (interior_left, interior_right)
    };

    let (il, ir) = count(&left, &right);
    let (jl, jr) = count(&right, &left);
    assert_eq!(il, jr);
    assert_eq!(ir, jl);
}

#[test]
fn every_output_face_has_one_output_tag() {
    let left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.5, 0.5, 0.5), p(1.5, 1.5, 1.5));
    let (mixed, _) = mix(&left, &right).unwrap();
    for i in 0..mixed.num_faces() {
        let tag = mixed.data(trisect_mesh::FaceId(i as u32)).tag.as_output();
        assert!(
            matches!(tag, FaceTag::Interior | FaceTag::Exterior | FaceTag::Boundary),
            "face {i} left with tag {tag:?}"
        );
    }
}

#[test]
fn deduplication_keeps_output_vertices_stable() {
    // Adding a geometrically equal but distinct input vertex must not change
    // which pool ids the output references.
    let mut left = make_cube::<()>(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let right = make_cube::<()>(p(0.5, 0.5, 0.5), p(1.5, 1.5, 1.5));

    let (mixed_a, _) = mix(&left, &right).unwrap();
    let points_a = mixed_a.points().len();

    // A duplicate of an existing corner, referenced by a degenerate unused
    // position in the vertex list only.
    left.add_vertex(p(0.0, 0.0, 0.0));
    let (mixed_b, _) = mix(&left, &right).unwrap();
    assert_eq!(points_a, mixed_b.points().len());
    assert_eq!(mixed_a.faces(), mixed_b.faces());
}
