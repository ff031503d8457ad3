#![warn(missing_docs)]

//! Mesh readers and writers for the trisect tools.
//!
//! Two formats: Wavefront OBJ (geometry only) and a JSON region format that
//! additionally carries per-face payloads. [`read_soup`]/[`write_soup`]
//! dispatch on the file extension.

pub mod error;
pub mod obj;
pub mod region;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use trisect_mesh::TriangleSoup;

pub use error::IoError;

/// Read a mesh, picking the format from the file extension (`.obj` or
/// `.json`).
pub fn read_soup<D: Default + DeserializeOwned>(path: &Path) -> Result<TriangleSoup<D>, IoError> {
    match extension(path).as_deref() {
        Some("obj") => obj::read_obj(path),
        Some("json") => region::read_region(path),
        _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Write a mesh, picking the format from the file extension.
pub fn write_soup<D: Serialize + Clone>(
    soup: &TriangleSoup<D>,
    path: &Path,
) -> Result<(), IoError> {
    match extension(path).as_deref() {
        Some("obj") => obj::write_obj(soup, path),
        Some("json") => region::write_region(soup, path),
        _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
