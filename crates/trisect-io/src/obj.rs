//! Minimal Wavefront OBJ support.
//!
//! Reads `v` and `f` statements, fan-triangulating larger polygons, and
//! ignores everything else. Payloads are defaulted since OBJ carries none.

use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use trisect_math::Point3;
use trisect_mesh::{TriangleSoup, VertexId};

use crate::error::IoError;

/// Read an OBJ file into a soup.
pub fn read_obj<D: Default>(path: &Path) -> Result<TriangleSoup<D>, IoError> {
    let file = std::fs::File::open(path)?;
    read_obj_from(std::io::BufReader::new(file))
}

/// Read OBJ data from any reader.
pub fn read_obj_from<D: Default, R: BufRead>(reader: R) -> Result<TriangleSoup<D>, IoError> {
    let mut soup = TriangleSoup::new();

    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f64; 3];
                for c in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| IoError::parse(lineno, "vertex needs 3 coordinates"))?;
                    *c = token
                        .parse()
                        .map_err(|_| IoError::parse(lineno, format!("bad coordinate {token:?}")))?;
                    if !c.is_finite() {
                        return Err(IoError::InvalidMesh(format!(
                            "non-finite coordinate at line {lineno}"
                        )));
                    }
                }
                soup.add_vertex(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let mut indices = Vec::with_capacity(4);
                for token in tokens {
                    // "i", "i/t", "i/t/n", "i//n" all start with the index.
                    let index_part = token.split('/').next().unwrap_or(token);
                    let idx: i64 = index_part
                        .parse()
                        .map_err(|_| IoError::parse(lineno, format!("bad face index {token:?}")))?;
                    let resolved = if idx > 0 {
                        idx - 1
                    } else if idx < 0 {
                        soup.num_vertices() as i64 + idx
                    } else {
                        return Err(IoError::parse(lineno, "face index 0"));
                    };
                    if resolved < 0 || resolved as usize >= soup.num_vertices() {
                        return Err(IoError::InvalidMesh(format!(
                            "face index out of range at line {lineno}"
                        )));
                    }
                    indices.push(VertexId(resolved as u32));
                }
                if indices.len() < 3 {
                    return Err(IoError::parse(lineno, "face needs at least 3 vertices"));
                }
                for k in 1..indices.len() - 1 {
                    soup.add_face([indices[0], indices[k], indices[k + 1]], D::default());
                }
            }
            _ => {}
        }
    }

    Ok(soup)
}

/// Write a soup as OBJ.
pub fn write_obj<D>(soup: &TriangleSoup<D>, path: &Path) -> Result<(), IoError> {
    let file = std::fs::File::create(path)?;
    let mut w = BufWriter::new(file);
    for vi in soup.vertices() {
        let p = soup.point(vi);
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for fi in soup.faces() {
        let [a, b, c] = soup.face(fi);
        writeln!(w, "f {} {} {}", a.0 + 1, b.0 + 1, c.0 + 1)?;
    }
    w.flush()?;
    Ok(())
}
