//! Bottom-Level Acceleration Structure assembly: build a SAH BVH over a
//! mesh's triangles, linearize it, and pack `[header | nodes | triangles |
//! vertices]` into one self-contained, position-independent byte blob.

use byteorder::{ByteOrder, LE};

use crate::builder::{build_sah, linearize::linearize, BBoxTmp};
use crate::config::BuildConfig;
use crate::device_layout::*;
use crate::error::{Error, Result};
use crate::geometry::{Aabb, Point3f};
use crate::mesh::Mesh;
use crate::progress::ProgressSink;

/// A built bottom-level acceleration structure. Immutable once built; the
/// `blob` is the only long-lived artifact, the intermediate tree is
/// dropped at the end of [`build_blas`].
#[derive(Debug)]
pub struct Blas {
    blob: Vec<u8>,
    node_byte_offset: u32,
    face_byte_offset: u32,
    vertex_byte_offset: u32,
}

impl Blas {
    pub fn blob(&self) -> &[u8] { &self.blob }
    pub fn len(&self) -> usize { self.blob.len() }
    pub fn is_empty(&self) -> bool { self.blob.is_empty() }
    pub fn node_byte_offset(&self) -> u32 { self.node_byte_offset }
    pub fn face_byte_offset(&self) -> u32 { self.face_byte_offset }
    pub fn vertex_byte_offset(&self) -> u32 { self.vertex_byte_offset }

    /// The bounds of the root node, i.e. of the whole mesh. The root is
    /// always node 0 since the linearizer emits in pre-order.
    pub fn root_bounds(&self) -> Aabb<f32> {
        let base = self.node_byte_offset as usize;
        let f = |o: usize| LE::read_f32(&self.blob[base + o..base + o + 4]);
        Aabb::new(
            Point3f::new(f(0), f(4), f(8)),
            Point3f::new(f(16), f(20), f(24)),
        )
    }
}

pub fn build_blas(mesh: &Mesh, config: &BuildConfig, progress: &dyn ProgressSink) -> Result<Blas> {
    if mesh.fcount() == 0 {
        return Err(Error::invalid("mesh must have at least one triangle"));
    }

    log::debug!("building BLAS over {} triangles", mesh.fcount());

    let items: Vec<BBoxTmp<u32>> = (0..mesh.fcount())
        .map(|f| BBoxTmp::new(mesh.triangle_bounds(f), f))
        .collect();

    let tree = build_sah(items, config, progress);
    let (nodes, triangles) = linearize(tree, PRIM_KIND_TRIANGLE, |_, f: u32| {
        let i = 3 * f as usize;
        let faces = mesh.faces();
        (faces[i], faces[i + 1], faces[i + 2], f)
    })?;

    let node_byte_offset = HEADER_SIZE as u32;
    let face_byte_offset = node_byte_offset + (nodes.len() * NODE_RECORD_SIZE) as u32;
    let vertex_byte_offset = face_byte_offset + (triangles.len() * TRIANGLE_RECORD_SIZE) as u32;
    let total_size = vertex_byte_offset as usize + mesh.vcount() as usize * VERTEX_RECORD_SIZE;

    let mut blob = Vec::with_capacity(total_size);
    write_header(&mut blob, ACCEL_TYPE_BLAS, node_byte_offset, face_byte_offset, vertex_byte_offset)?;
    for node in &nodes {
        write_node(&mut blob, node)?;
    }
    for (i0, i1, i2, prim_id) in &triangles {
        write_triangle(&mut blob, *i0, *i1, *i2, *prim_id)?;
    }
    for v in mesh.vertices().chunks(3) {
        write_vertex(&mut blob, v[0], v[1], v[2])?;
    }

    if blob.len() != total_size {
        return Err(Error::invariant(format!("BLAS blob size {} != computed {}", blob.len(), total_size)));
    }

    log::debug!("BLAS built: {} nodes, {} bytes", nodes.len(), blob.len());

    Ok(Blas { blob, node_byte_offset, face_byte_offset, vertex_byte_offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    fn unit_triangle_mesh() -> Mesh {
        Mesh::new(
            Box::new([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            Box::new([0, 1, 2]),
        ).unwrap()
    }

    #[test]
    fn single_triangle_blas_layout_matches_s1() {
        let mesh = unit_triangle_mesh();
        let blas = build_blas(&mesh, &BuildConfig::default(), &NullProgress).unwrap();

        assert_eq!(blas.node_byte_offset(), HEADER_SIZE as u32);
        assert_eq!(blas.face_byte_offset(), HEADER_SIZE as u32 + NODE_RECORD_SIZE as u32);
        assert_eq!(blas.vertex_byte_offset(), blas.face_byte_offset() + TRIANGLE_RECORD_SIZE as u32);
        assert_eq!(blas.len(), blas.vertex_byte_offset() as usize + 3 * VERTEX_RECORD_SIZE);

        let root = blas.root_bounds();
        assert_eq!(root.min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(root.max, Point3f::new(1.0, 1.0, 0.0));

        let header_kind = LE::read_u32(&blas.blob()[0..4]);
        assert_eq!(header_kind, ACCEL_TYPE_BLAS);

        let tri_base = blas.face_byte_offset() as usize;
        let i0 = LE::read_u32(&blas.blob()[tri_base..tri_base + 4]);
        let prim_id = LE::read_u32(&blas.blob()[tri_base + 12..tri_base + 16]);
        assert_eq!(i0, 0);
        assert_eq!(prim_id, 0);
    }

    #[test]
    fn build_is_deterministic() {
        let mesh = unit_triangle_mesh();
        let a = build_blas(&mesh, &BuildConfig::default(), &NullProgress).unwrap();
        let b = build_blas(&mesh, &BuildConfig::default(), &NullProgress).unwrap();
        assert_eq!(a.blob(), b.blob());
    }
}
