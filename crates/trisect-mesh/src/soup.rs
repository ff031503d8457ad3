//! Triangle soups and their index types.

use trisect_math::Point3;

/// Index of a vertex, either within one soup or within the global point pool.
///
/// Ids are plain dense indices: the pool and the soups only ever append, so
/// an id handed out once stays valid for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Index of a face within one soup or the mixed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl VertexId {
    /// The id as a usize, for indexing parallel tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    /// The id as a usize, for indexing parallel tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An input or output mesh with no enforced topology.
///
/// `D` is an arbitrary per-face payload carried through Boolean operations
/// unchanged. Faces are orientation-significant: the vertex order defines
/// the outward normal `(b-a)×(c-a)`.
#[derive(Debug, Clone)]
pub struct TriangleSoup<D> {
    vertices: Vec<Point3>,
    faces: Vec<[VertexId; 3]>,
    data: Vec<D>,
}

impl<D> Default for TriangleSoup<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> TriangleSoup<D> {
    /// An empty soup.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Append a vertex and return its id.
    pub fn add_vertex(&mut self, p: Point3) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(p);
        id
    }

    /// Append a face with its payload and return its id.
    ///
    /// The indices must refer to vertices already added.
    pub fn add_face(&mut self, face: [VertexId; 3], data: D) -> FaceId {
        debug_assert!(face.iter().all(|v| v.index() < self.vertices.len()));
        let id = FaceId(self.faces.len() as u32);
        self.faces.push(face);
        self.data.push(data);
        id
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Position of a vertex.
    #[inline]
    pub fn point(&self, vi: VertexId) -> &Point3 {
        &self.vertices[vi.index()]
    }

    /// Vertex triple of a face.
    #[inline]
    pub fn face(&self, fi: FaceId) -> [VertexId; 3] {
        self.faces[fi.index()]
    }

    /// Payload of a face.
    #[inline]
    pub fn data(&self, fi: FaceId) -> &D {
        &self.data[fi.index()]
    }

    /// Iterate vertex ids in order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId)
    }

    /// Iterate face ids in order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len() as u32).map(FaceId)
    }
}
