use std::rc::Rc;

use crate::blas::Blas;
use crate::geometry::Matrix4f;

/// An instance of a BLAS placed in the scene with an affine transform.
/// Multiple instances may share the same `blas` (by `Rc` identity), and the
/// TLAS assembler de-duplicates on that identity, emitting each unique
/// BLAS blob exactly once.
#[derive(Debug, Clone)]
pub struct Instance {
    pub transform: Matrix4f,
    pub sbt_offset: u32,
    pub custom_id: u32,
    pub blas: Rc<Blas>,
}

impl Instance {
    pub fn new(transform: Matrix4f, sbt_offset: u32, custom_id: u32, blas: Rc<Blas>) -> Self {
        Instance { transform, sbt_offset, custom_id, blas }
    }
}
