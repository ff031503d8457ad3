//! Local classification around border edges.
//!
//! A border edge is shared by faces of both inputs. Around such an edge the
//! other input's two incident faces form a dihedral wedge whose interior is
//! the inside of that mesh; each face of this input falls strictly inside
//! the wedge, strictly outside, or onto one of its bounding half-planes.
//! All side decisions are exact orientation signs.
//!
//! Tasks run one border edge each and only *emit* `(face, tag)` pairs; the
//! merge into the mesh happens serially afterwards, so concurrent tasks
//! never write shared state.

use rayon::prelude::*;
use trisect_math::exact::same_half_plane;
use trisect_math::lazy;
use trisect_math::predicates::Sign;
use trisect_mesh::{Edge, EdgeSet, FaceId, FaceTag, MixedMesh};

use crate::warnings::Warnings;

/// Classify every face incident to a border edge, in parallel over edges.
/// Returns the raw per-edge observations and the merged warnings.
pub fn classify_locally<D: Send + Sync>(
    m: &MixedMesh<D>,
    border_edges: &EdgeSet,
) -> (Vec<(FaceId, FaceTag)>, Warnings) {
    let mut edges: Vec<Edge> = border_edges.iter().copied().collect();
    edges.sort_unstable();

    let per_edge: Vec<(Vec<(FaceId, FaceTag)>, Warnings)> = edges
        .par_iter()
        .map(|&edge| classify_edge(m, edge))
        .collect();

    let mut tags = Vec::new();
    let mut warnings = Warnings::NONE;
    for (t, w) in per_edge {
        tags.extend(t);
        warnings |= w;
    }
    (tags, warnings)
}

/// Serially merge per-edge observations into the mesh. Distinct observations
/// for one face mean the local structure is contradictory; the
/// highest-priority tag wins and a warning is recorded.
pub fn apply_local_tags<D>(m: &mut MixedMesh<D>, mut tags: Vec<(FaceId, FaceTag)>) -> Warnings {
    fn rank(tag: FaceTag) -> u8 {
        match tag {
            FaceTag::Coplanar => 0,
            FaceTag::Opposite => 1,
            FaceTag::Interior => 2,
            FaceTag::Exterior => 3,
            _ => 4,
        }
    }
    tags.sort_unstable_by_key(|&(fi, tag)| (fi, rank(tag)));

    let mut warnings = Warnings::NONE;
    let mut i = 0;
    while i < tags.len() {
        let (fi, tag) = tags[i];
        let mut j = i + 1;
        while j < tags.len() && tags[j].0 == fi {
            if tags[j].1 != tag {
                warnings |= Warnings::LOCAL_INCONSISTENCY;
            }
            j += 1;
        }
        let data = m.data_mut(fi);
        // Detector-assigned coplanar tags are final.
        if data.tag == FaceTag::Unknown {
            data.tag = tag;
        }
        i = j;
    }
    warnings
}

fn classify_edge<D>(m: &MixedMesh<D>, edge: Edge) -> (Vec<(FaceId, FaceTag)>, Warnings) {
    let mut out = Vec::new();
    let mut warnings = Warnings::NONE;

    let mut lefts = Vec::new();
    let mut rights = Vec::new();
    for fi in m.faces_around_edge(edge) {
        if m.data(fi).from_left {
            lefts.push(fi);
        } else {
            rights.push(fi);
        }
    }

    classify_against(m, edge, &lefts, &rights, &mut out, &mut warnings);
    classify_against(m, edge, &rights, &lefts, &mut out, &mut warnings);

    (out, warnings)
}

/// Classify the faces of one side against the wedge the other side's two
/// faces form around the edge.
fn classify_against<D>(
    m: &MixedMesh<D>,
    edge: Edge,
    faces: &[FaceId],
    other: &[FaceId],
    out: &mut Vec<(FaceId, FaceTag)>,
    warnings: &mut Warnings,
) {
    if other.len() != 2 {
        // A closed 2-manifold contributes exactly two faces around every
        // border edge.
        *warnings |= Warnings::LOCAL_INCONSISTENCY;
        return;
    }
    // One face traverses the edge forward, the other backward, when the
    // other mesh is consistently oriented.
    let (fwd, bwd) = if m.traverses_forward(other[0], edge) {
        (other[0], other[1])
    } else {
        (other[1], other[0])
    };
    if !m.traverses_forward(fwd, edge) || m.traverses_forward(bwd, edge) {
        *warnings |= Warnings::LOCAL_INCONSISTENCY;
        return;
    }

    let Some(w1) = m.opposite_vertex(fwd, edge) else {
        *warnings |= Warnings::LOCAL_INCONSISTENCY;
        return;
    };
    let Some(w2) = m.opposite_vertex(bwd, edge) else {
        *warnings |= Warnings::LOCAL_INCONSISTENCY;
        return;
    };

    let u = m.point(edge.a);
    let v = m.point(edge.b);
    let p1 = m.point(w1);
    let p2 = m.point(w2);
    // Positive: the wedge's inner dihedral angle is below pi.
    let conv = lazy::orient3d(u, v, p1, p2);

    for &fi in faces {
        let current = m.data(fi).tag;
        if current == FaceTag::Coplanar || current == FaceTag::Opposite {
            continue;
        }
        let Some(wf) = m.opposite_vertex(fi, edge) else {
            *warnings |= Warnings::LOCAL_INCONSISTENCY;
            continue;
        };
        let pw = m.point(wf);

        // Positive: strictly on the inner side of the respective face plane.
        let s1 = lazy::orient3d(u, v, p1, pw);
        let s2 = lazy::orient3d(v, u, p2, pw);

        let tag = if s1 == Sign::Zero
            && same_half_plane(u.exact(), v.exact(), p1.exact(), pw.exact()) == Sign::Positive
        {
            coincident_tag(m, fi, edge, true)
        } else if s2 == Sign::Zero
            && same_half_plane(u.exact(), v.exact(), p2.exact(), pw.exact()) == Sign::Positive
        {
            coincident_tag(m, fi, edge, false)
        } else if s1 == Sign::Zero || s2 == Sign::Zero {
            // On the plane of one wedge face but pointing away from it: the
            // wedge decides by whether it opens past that plane.
            match conv {
                Sign::Negative => FaceTag::Interior,
                Sign::Positive => FaceTag::Exterior,
                Sign::Zero => {
                    *warnings |= Warnings::LOCAL_INCONSISTENCY;
                    continue;
                }
            }
        } else {
            match conv {
                Sign::Positive => {
                    if s1 == Sign::Positive && s2 == Sign::Positive {
                        FaceTag::Interior
                    } else {
                        FaceTag::Exterior
                    }
                }
                Sign::Negative => {
                    if s1 == Sign::Positive || s2 == Sign::Positive {
                        FaceTag::Interior
                    } else {
                        FaceTag::Exterior
                    }
                }
                Sign::Zero => {
                    // The wedge is flat. Opposite half-planes make it a
                    // half-space; equal half-planes mean zero volume.
                    if same_half_plane(u.exact(), v.exact(), p1.exact(), p2.exact())
                        == Sign::Positive
                    {
                        *warnings |= Warnings::LOCAL_INCONSISTENCY;
                        continue;
                    }
                    if s1 == Sign::Positive {
                        FaceTag::Interior
                    } else {
                        FaceTag::Exterior
                    }
                }
            }
        };
        out.push((fi, tag));
    }
}

/// A face lying exactly on a wedge face's half-plane: coplanar when it has
/// the same rotational orientation around the edge as that wedge face,
/// opposite otherwise. `wedge_forward` says which wedge face matched.
fn coincident_tag<D>(m: &MixedMesh<D>, fi: FaceId, edge: Edge, wedge_forward: bool) -> FaceTag {
    if m.traverses_forward(fi, edge) == wedge_forward {
        FaceTag::Coplanar
    } else {
        FaceTag::Opposite
    }
}
