//! Wavefront OBJ loading, satisfying the scene-input interface for the
//! `blastool` demonstration binary. Not part of the core's tested
//! contract; the core performs no parsing of its own.

use std::path::Path;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Load the first object in an OBJ file as a single triangle mesh,
/// triangulating any polygon with more than 3 vertices as a fan.
pub fn load_obj_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let obj_obj: obj::Obj<obj::SimplePolygon> = obj::Obj::load(path.as_ref())
        .map_err(|e| Error::invalid(format!("failed to load {}: {}", path.as_ref().display(), e)))?;

    let vertices: Vec<f32> = obj_obj.position.iter()
        .flat_map(|p| p.iter().copied())
        .collect();

    let mut faces = Vec::new();
    for object in &obj_obj.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let idx: Vec<u32> = poly.iter().map(|t| t.0 as u32).collect();
                for i in 1..idx.len().saturating_sub(1) {
                    faces.push(idx[0]);
                    faces.push(idx[i]);
                    faces.push(idx[i + 1]);
                }
            }
        }
    }

    Mesh::new(vertices.into_boxed_slice(), faces.into_boxed_slice())
}
