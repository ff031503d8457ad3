//! JSON region format.
//!
//! A region file is a triangle soup with optional per-face payloads, which
//! OBJ cannot carry. Payloads round-trip through Boolean operations
//! untouched.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use trisect_math::Point3;
use trisect_mesh::{TriangleSoup, VertexId};

use crate::error::IoError;

#[derive(Serialize, Deserialize)]
struct RegionFile<D> {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payloads: Option<Vec<D>>,
}

/// Read a JSON region file.
pub fn read_region<D: DeserializeOwned + Default>(path: &Path) -> Result<TriangleSoup<D>, IoError> {
    let file = std::fs::File::open(path)?;
    let region: RegionFile<D> = serde_json::from_reader(std::io::BufReader::new(file))?;

    if let Some(payloads) = &region.payloads {
        if payloads.len() != region.faces.len() {
            return Err(IoError::InvalidMesh(format!(
                "{} payloads for {} faces",
                payloads.len(),
                region.faces.len()
            )));
        }
    }

    let mut soup = TriangleSoup::new();
    for v in &region.vertices {
        if !v.iter().all(|c| c.is_finite()) {
            return Err(IoError::InvalidMesh("non-finite coordinate".into()));
        }
        soup.add_vertex(Point3::new(v[0], v[1], v[2]));
    }

    let mut payloads = region.payloads.map(Vec::into_iter);
    for face in &region.faces {
        if face.iter().any(|&i| i as usize >= soup.num_vertices()) {
            return Err(IoError::InvalidMesh("face index out of range".into()));
        }
        let data = payloads
            .as_mut()
            .and_then(Iterator::next)
            .unwrap_or_default();
        soup.add_face(
            [VertexId(face[0]), VertexId(face[1]), VertexId(face[2])],
            data,
        );
    }
    Ok(soup)
}

/// Write a soup as a JSON region file, payloads included.
pub fn write_region<D: Serialize + Clone>(
    soup: &TriangleSoup<D>,
    path: &Path,
) -> Result<(), IoError> {
    let region = RegionFile {
        vertices: soup
            .vertices()
            .map(|vi| {
                let p = soup.point(vi);
                [p.x, p.y, p.z]
            })
            .collect(),
        faces: soup
            .faces()
            .map(|fi| {
                let [a, b, c] = soup.face(fi);
                [a.0, b.0, c.0]
            })
            .collect(),
        payloads: Some(soup.faces().map(|fi| soup.data(fi).clone()).collect()),
    };
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(std::io::BufWriter::new(file), &region)?;
    Ok(())
}
