#![warn(missing_docs)]

//! Corefinement and classification pipeline for exact mesh Booleans.
//!
//! Given two closed, oriented, non-self-intersecting triangle soups, [`mix`]
//! produces a single refined soup in which every triangle lies entirely
//! inside, entirely outside, or on the boundary of the other input, tagged
//! accordingly. [`extract`] then selects any of the standard Boolean
//! combinations from that one result.
//!
//! ```no_run
//! use trisect_core::{boolean, BooleanOp};
//! use trisect_mesh::primitives::make_cube;
//! use trisect_math::Point3;
//!
//! let a = make_cube::<()>(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
//! let b = make_cube::<()>(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5));
//! let (result, warnings) = boolean(&a, &b, BooleanOp::Intersection)?;
//! assert!(warnings.is_empty());
//! assert!(result.num_faces() >= 12);
//! # Ok::<(), trisect_core::BooleanError>(())
//! ```

mod broadphase;
mod classify_global;
mod classify_local;
mod coplanar;
mod corefine;
mod error;
mod extract;
mod insert;
mod intersect;
mod region;
mod side;
mod triangulate;
mod warnings;

use std::collections::HashMap;

use trisect_mesh::{
    make_edge, EdgeSet, MixedFaceData, MixedMesh, MixedTriangleSoup, TriangleSoup,
};

pub use crate::broadphase::{Aabb, Bvh};
pub use crate::corefine::Corefine;
pub use crate::error::{BooleanError, InputMesh};
pub use crate::extract::{extract, BooleanOp};
pub use crate::region::{Feature, SymbolicIntersection};
pub use crate::side::{PerSide, Side};
pub use crate::triangulate::{ConstraintCrossing, PlanarTriangulation, VertexHandle};
pub use crate::warnings::Warnings;

/// Corefine both inputs and classify every refined face against the other
/// input. The result carries all faces of both sides; apply [`extract`] to
/// pull out a Boolean combination.
pub fn mix<D: Clone + Default + Send + Sync>(
    left: &TriangleSoup<D>,
    right: &TriangleSoup<D>,
) -> Result<(MixedTriangleSoup<D>, Warnings), BooleanError> {
    let mut corefine = Corefine::new(left, right)?;

    log::info!("constructing mixed mesh");
    let mut m = MixedMesh::new(corefine.take_points());
    let mut tris = Vec::new();
    for side in Side::both() {
        let soup = match side {
            Side::Left => left,
            Side::Right => right,
        };
        for fi in soup.faces() {
            tris.clear();
            let tag = corefine.faces_of(side, fi, &mut tris);
            for &tri in &tris {
                m.add_face(
                    tri,
                    MixedFaceData {
                        from_left: side == Side::Left,
                        tag,
                        data: soup.data(fi).clone(),
                    },
                );
            }
        }
    }
    m.finalize();

    log::info!("local classification");
    let border_edges = find_border_edges(&m, corefine.intersecting_edges());
    let (local_tags, mut warnings) = classify_local::classify_locally(&m, &border_edges);
    warnings |= classify_local::apply_local_tags(&mut m, local_tags);

    log::info!("global classification");
    warnings |= classify_global::classify_globally(&mut m, &border_edges, PerSide::new(left, right));

    Ok((m.take_triangle_soup(), warnings))
}

/// Run the pipeline and extract one Boolean combination.
pub fn boolean<D: Clone + Default + Send + Sync>(
    left: &TriangleSoup<D>,
    right: &TriangleSoup<D>,
    op: BooleanOp,
) -> Result<(TriangleSoup<D>, Warnings), BooleanError> {
    let (mixed, warnings) = mix(left, right)?;
    Ok((extract(&mixed, op), warnings))
}

/// Edges separating the two inputs: every edge incident to faces of both
/// sides, which covers intersection curves and the rims of coplanar patches.
/// The corefiner's intersecting edges are folded in for good measure.
fn find_border_edges<D>(m: &MixedMesh<D>, mut edges: EdgeSet) -> EdgeSet {
    let mut seen: HashMap<trisect_mesh::Edge, [bool; 2]> = HashMap::new();
    for fi in m.faces() {
        let face = m.face(fi);
        let from_left = m.data(fi).from_left;
        for k in 0..3 {
            let edge = make_edge(face[k], face[(k + 1) % 3]);
            let sides = seen.entry(edge).or_insert([false; 2]);
            sides[usize::from(from_left)] = true;
        }
    }
    for (edge, sides) in seen {
        if sides[0] && sides[1] {
            edges.insert(edge);
        }
    }
    edges
}
