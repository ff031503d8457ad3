//! Boolean extraction from the classified mixed soup.
//!
//! Every operation is a mask over `(from_left, tag)` plus an optional face
//! reversal; the pipeline output already contains every face any operation
//! could want.

use std::collections::HashMap;

use trisect_mesh::{FaceId, FaceTag, MixedTriangleSoup, TriangleSoup, VertexId};

/// A Boolean combination of the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Everything in either input.
    Union,
    /// Everything in both inputs.
    Intersection,
    /// The first input minus the second.
    Difference,
    /// Union minus intersection.
    SymmetricDifference,
}

/// Whether a face survives the operation and whether it must be reversed.
fn selects(op: BooleanOp, from_left: bool, tag: FaceTag) -> Option<bool> {
    use BooleanOp::*;
    use FaceTag::*;
    match (op, from_left, tag) {
        (Union, _, Exterior) => Some(false),
        (Union, true, Coplanar) => Some(false),

        (Intersection, _, Interior) => Some(false),
        (Intersection, true, Coplanar) => Some(false),

        // L - R: the outside of L, the inside of R turned inside out, and
        // the patches where the surfaces cancel.
        (Difference, true, Exterior) => Some(false),
        (Difference, false, Interior) => Some(true),
        (Difference, true, Opposite) => Some(false),

        // (L - R) plus (R - L). Patches where the surfaces cancel separate
        // the two lobes from inside and are dropped with the intersection.
        (SymmetricDifference, _, Exterior) => Some(false),
        (SymmetricDifference, _, Interior) => Some(true),

        _ => None,
    }
}

/// Extract one Boolean combination as a plain triangle soup, compacting the
/// vertex set to the faces that survive. Coordinates are the f64
/// representatives of the exact points.
pub fn extract<D: Clone>(mixed: &MixedTriangleSoup<D>, op: BooleanOp) -> TriangleSoup<D> {
    let mut out = TriangleSoup::new();
    let mut vertex_map: HashMap<VertexId, VertexId> = HashMap::new();

    for (i, face) in mixed.faces().iter().enumerate() {
        let fi = FaceId(i as u32);
        let data = mixed.data(fi);
        let Some(reverse) = selects(op, data.from_left, data.tag) else {
            continue;
        };

        let mut tri = [VertexId(0); 3];
        for (k, &v) in face.iter().enumerate() {
            let mapped = *vertex_map.entry(v).or_insert_with(|| {
                out.add_vertex(mixed.points()[v.index()].approx_point())
            });
            tri[k] = mapped;
        }
        if reverse {
            tri.swap(1, 2);
        }
        out.add_face(tri, data.data.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        use BooleanOp::*;
        use FaceTag::*;
        // Union keeps both exteriors and one copy of coplanar patches.
        assert_eq!(selects(Union, true, Exterior), Some(false));
        assert_eq!(selects(Union, false, Exterior), Some(false));
        assert_eq!(selects(Union, true, Coplanar), Some(false));
        assert_eq!(selects(Union, false, Coplanar), None);
        assert_eq!(selects(Union, true, Interior), None);

        // Intersection keeps interiors.
        assert_eq!(selects(Intersection, false, Interior), Some(false));
        assert_eq!(selects(Intersection, true, Coplanar), Some(false));
        assert_eq!(selects(Intersection, true, Exterior), None);

        // Difference reverses the subtrahend's interior.
        assert_eq!(selects(Difference, true, Exterior), Some(false));
        assert_eq!(selects(Difference, false, Interior), Some(true));
        assert_eq!(selects(Difference, false, Exterior), None);
        assert_eq!(selects(Difference, true, Opposite), Some(false));
        assert_eq!(selects(Difference, true, Coplanar), None);

        // Symmetric difference of identical solids is empty: coplanar faces
        // never survive it.
        assert_eq!(selects(SymmetricDifference, true, Coplanar), None);
        assert_eq!(selects(SymmetricDifference, false, Coplanar), None);
    }
}
