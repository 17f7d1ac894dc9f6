use crate::error::{Error, Result};
use crate::geometry::{Aabb, Point3f};

/// A triangle mesh: flat vertex buffer plus a flat face-index buffer.
/// Built meshes are the input to [`crate::blas`] and are consumed by
/// reference; the mesh itself never becomes device-resident, only the
/// [`crate::blas::Blas`] built from it does.
#[derive(Debug)]
pub struct Mesh {
    /// 3 floats per vertex.
    vertices: Box<[f32]>,
    /// 3 indices per face, into `vertices`.
    faces: Box<[u32]>,
    bounds: Aabb<f32>,
}

impl Mesh {
    pub fn new(vertices: Box<[f32]>, faces: Box<[u32]>) -> Result<Mesh> {
        if vertices.len() % 3 != 0 {
            return Err(Error::invalid("vertex buffer length must be a multiple of 3"));
        }
        if faces.len() % 3 != 0 {
            return Err(Error::invalid("face buffer length must be a multiple of 3"));
        }
        if faces.is_empty() {
            return Err(Error::invalid("mesh must have at least one triangle"));
        }
        let vcount = (vertices.len() / 3) as u32;
        for &idx in faces.iter() {
            if idx >= vcount {
                return Err(Error::invalid(format!("face index {} out of range (vcount={})", idx, vcount)));
            }
        }

        let bounds = vertices.chunks(3).fold(Aabb::none(), |bounds, v| {
            bounds.point_union(&Point3f::new(v[0], v[1], v[2]))
        });

        Ok(Mesh { vertices, faces, bounds })
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] { &self.vertices }

    #[inline]
    pub fn faces(&self) -> &[u32] { &self.faces }

    #[inline]
    pub fn vcount(&self) -> u32 { (self.vertices.len() / 3) as u32 }

    #[inline]
    pub fn fcount(&self) -> u32 { (self.faces.len() / 3) as u32 }

    #[inline]
    pub fn bounds(&self) -> Aabb<f32> { self.bounds }

    /// Bounds of the triangle at face index `f`.
    pub fn triangle_bounds(&self, f: u32) -> Aabb<f32> {
        let (p0, p1, p2) = self.triangle_vertices(f);
        Aabb::none().point_union(&p0).point_union(&p1).point_union(&p2)
    }

    pub fn triangle_vertices(&self, f: u32) -> (Point3f, Point3f, Point3f) {
        debug_assert!(f < self.fcount());
        let i = 3 * f as usize;
        (self.vertex(self.faces[i]), self.vertex(self.faces[i + 1]), self.vertex(self.faces[i + 2]))
    }

    #[inline]
    fn vertex(&self, i: u32) -> Point3f {
        let i = i as usize * 3;
        Point3f::new(self.vertices[i], self.vertices[i + 1], self.vertices[i + 2])
    }
}
