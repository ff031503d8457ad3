#![warn(missing_docs)]

//! Triangle soups, the exact point pool, and the mixed mesh for the trisect
//! kernel.
//!
//! A triangle soup is an unstructured mesh: a list of vertices and a list of
//! vertex-index triples with no enforced topology. The Boolean pipeline takes
//! two soups, refines them against a shared deduplicated pool of lazy-exact
//! points, and assembles the result into a mixed mesh whose faces remember
//! which input they came from.

pub mod defects;
pub mod edge;
pub mod mixed;
pub mod pool;
pub mod primitives;
pub mod soup;
pub mod tag;

pub use edge::{make_edge, Edge, EdgeSet};
pub use mixed::{MixedFaceData, MixedMesh, MixedTriangleSoup};
pub use pool::PointPool;
pub use soup::{FaceId, TriangleSoup, VertexId};
pub use tag::FaceTag;
