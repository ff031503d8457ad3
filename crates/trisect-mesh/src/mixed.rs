//! The mixed mesh: refined faces of both inputs over the shared point pool.

use trisect_math::lazy::LazyPoint3;

use crate::edge::Edge;
use crate::soup::{FaceId, VertexId};
use crate::tag::FaceTag;

/// Provenance attached to every mixed-mesh face.
#[derive(Debug, Clone)]
pub struct MixedFaceData<D> {
    /// True when the face came from the first (left) input.
    pub from_left: bool,
    /// Classification relative to the other input.
    pub tag: FaceTag,
    /// Payload copied from the origin face.
    pub data: D,
}

/// An indexed mesh over the global point pool, built face by face from the
/// corefined inputs and then finalized for adjacency queries.
#[derive(Debug)]
pub struct MixedMesh<D> {
    points: Vec<LazyPoint3>,
    faces: Vec<[VertexId; 3]>,
    data: Vec<MixedFaceData<D>>,
    // Per vertex, the sorted list of incident faces. Empty until finalize().
    face_lists: Vec<Vec<FaceId>>,
}

impl<D> MixedMesh<D> {
    /// Create a mesh owning the drained point pool.
    pub fn new(points: Vec<LazyPoint3>) -> Self {
        Self {
            points,
            faces: Vec::new(),
            data: Vec::new(),
            face_lists: Vec::new(),
        }
    }

    /// Append a face with its provenance.
    pub fn add_face(&mut self, face: [VertexId; 3], data: MixedFaceData<D>) -> FaceId {
        debug_assert!(face.iter().all(|v| v.index() < self.points.len()));
        let id = FaceId(self.faces.len() as u32);
        self.faces.push(face);
        self.data.push(data);
        id
    }

    /// Build the per-vertex incident-face lists. Must be called before
    /// [`MixedMesh::faces_around_edge`]; adding faces afterwards is a logic
    /// error.
    pub fn finalize(&mut self) {
        self.face_lists = vec![Vec::new(); self.points.len()];
        for (i, face) in self.faces.iter().enumerate() {
            for v in face {
                self.face_lists[v.index()].push(FaceId(i as u32));
            }
        }
        // Face ids are pushed in increasing order, so each list is sorted
        // already; degenerate faces repeating a vertex are the exception.
        for list in &mut self.face_lists {
            list.dedup();
        }
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Iterate face ids in order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len() as u32).map(FaceId)
    }

    /// Vertex triple of a face.
    #[inline]
    pub fn face(&self, fi: FaceId) -> [VertexId; 3] {
        self.faces[fi.index()]
    }

    /// Provenance of a face.
    #[inline]
    pub fn data(&self, fi: FaceId) -> &MixedFaceData<D> {
        &self.data[fi.index()]
    }

    /// Mutable provenance of a face.
    #[inline]
    pub fn data_mut(&mut self, fi: FaceId) -> &mut MixedFaceData<D> {
        &mut self.data[fi.index()]
    }

    /// Point backing a vertex id.
    #[inline]
    pub fn point(&self, vi: VertexId) -> &LazyPoint3 {
        &self.points[vi.index()]
    }

    /// The faces incident to both endpoints of an edge, as the sorted-merge
    /// intersection of the two per-vertex incident-face lists.
    pub fn faces_around_edge(&self, edge: Edge) -> FacesAroundEdge<'_> {
        FacesAroundEdge {
            i: &self.face_lists[edge.a.index()],
            j: &self.face_lists[edge.b.index()],
        }
    }

    /// The third vertex of a face relative to an edge, if the face contains
    /// both edge endpoints.
    pub fn opposite_vertex(&self, fi: FaceId, edge: Edge) -> Option<VertexId> {
        let face = self.face(fi);
        face.into_iter().find(|&v| v != edge.a && v != edge.b)
    }

    /// Whether the face traverses the edge as `a -> b` (true) or `b -> a`
    /// (false), following the face's vertex order.
    pub fn traverses_forward(&self, fi: FaceId, edge: Edge) -> bool {
        let f = self.face(fi);
        for k in 0..3 {
            if f[k] == edge.a && f[(k + 1) % 3] == edge.b {
                return true;
            }
        }
        false
    }

    /// Finish into the output soup.
    pub fn take_triangle_soup(self) -> MixedTriangleSoup<D> {
        MixedTriangleSoup {
            points: self.points,
            faces: self.faces,
            data: self.data,
        }
    }
}

/// Sorted-merge intersection of two incident-face lists.
pub struct FacesAroundEdge<'a> {
    i: &'a [FaceId],
    j: &'a [FaceId],
}

impl Iterator for FacesAroundEdge<'_> {
    type Item = FaceId;

    fn next(&mut self) -> Option<FaceId> {
        while let (Some(&fi), Some(&fj)) = (self.i.first(), self.j.first()) {
            match fi.cmp(&fj) {
                std::cmp::Ordering::Less => self.i = &self.i[1..],
                std::cmp::Ordering::Greater => self.j = &self.j[1..],
                std::cmp::Ordering::Equal => {
                    self.i = &self.i[1..];
                    self.j = &self.j[1..];
                    return Some(fi);
                }
            }
        }
        None
    }
}

/// The finished output of the pipeline: refined faces of both inputs with
/// their tags, sharing the drained point pool.
#[derive(Debug)]
pub struct MixedTriangleSoup<D> {
    points: Vec<LazyPoint3>,
    faces: Vec<[VertexId; 3]>,
    data: Vec<MixedFaceData<D>>,
}

impl<D> MixedTriangleSoup<D> {
    /// All points.
    pub fn points(&self) -> &[LazyPoint3] {
        &self.points
    }

    /// All faces.
    pub fn faces(&self) -> &[[VertexId; 3]] {
        &self.faces
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Provenance of a face.
    pub fn data(&self, fi: FaceId) -> &MixedFaceData<D> {
        &self.data[fi.index()]
    }
}
