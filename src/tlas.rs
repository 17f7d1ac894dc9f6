//! Top-Level Acceleration Structure assembly: build a SAH BVH over scene
//! instances, linearize it, and pack `[header | outer-nodes |
//! instance-records | BLAS#1 | BLAS#2 | …]` into one self-contained blob.
//! Each unique BLAS (by `Rc` identity) is emitted exactly once, in
//! first-seen order, and every instance record's `blasByteOffset` points
//! at that single copy.

use std::collections::HashMap;
use std::rc::Rc;

use cgmath::{SquareMatrix, Transform};

use crate::blas::Blas;
use crate::builder::{build_sah, linearize::linearize, BBoxTmp};
use crate::config::BuildConfig;
use crate::device_layout::*;
use crate::error::{Error, Result};
use crate::geometry::Aabb;
use crate::instance::Instance;
use crate::progress::ProgressSink;

#[derive(Debug)]
pub struct Tlas {
    blob: Vec<u8>,
    node_byte_offset: u32,
    inst_byte_offset: u32,
}

impl Tlas {
    pub fn blob(&self) -> &[u8] { &self.blob }
    pub fn len(&self) -> usize { self.blob.len() }
    pub fn is_empty(&self) -> bool { self.blob.is_empty() }
    pub fn node_byte_offset(&self) -> u32 { self.node_byte_offset }
    pub fn inst_byte_offset(&self) -> u32 { self.inst_byte_offset }
}

fn blas_key(blas: &Rc<Blas>) -> usize {
    Rc::as_ptr(blas) as usize
}

const AFFINE_EPSILON: f32 = 1e-6;

/// Rejects a transform whose bottom row isn't `[0, 0, 0, 1]` (non-affine)
/// or whose determinant is (near) zero (degenerate, not invertible).
fn validate_transform(transform: &cgmath::Matrix4<f32>) -> Result<()> {
    let bottom_row_ok = transform.x.w.abs() < AFFINE_EPSILON
        && transform.y.w.abs() < AFFINE_EPSILON
        && transform.z.w.abs() < AFFINE_EPSILON
        && (transform.w.w - 1.0).abs() < AFFINE_EPSILON;
    if !bottom_row_ok {
        return Err(Error::invalid("instance transform is not affine: bottom row must be [0, 0, 0, 1]"));
    }
    if transform.determinant().abs() < AFFINE_EPSILON {
        return Err(Error::invalid("instance transform is degenerate: determinant is zero"));
    }
    Ok(())
}

/// World-space AABB of an instance: the union of the instance transform
/// applied to the eight corners of its BLAS root AABB. Any AABB enclosing
/// the transformed corner set is an acceptable result; this is not
/// required to be tight.
fn instance_world_bounds(inst: &Instance) -> Aabb<f32> {
    let root = inst.blas.root_bounds();
    (0..8u32).fold(Aabb::none(), |b, i| {
        let corner = root.corner(i);
        let world = inst.transform.transform_point(corner);
        b.point_union(&world)
    })
}

pub fn build_tlas(instances: &[Instance], config: &BuildConfig, progress: &dyn ProgressSink) -> Result<Tlas> {
    if instances.is_empty() {
        return Err(Error::invalid("TLAS must have at least one instance"));
    }

    log::debug!("building TLAS over {} instances", instances.len());

    for inst in instances {
        validate_transform(&inst.transform)?;
        let bounds = instance_world_bounds(inst);
        if bounds.diagonal() == cgmath::Vector3::new(0.0, 0.0, 0.0) {
            log::warn!("instance (sbt_offset {}) has a degenerate, zero-volume world AABB", inst.sbt_offset);
        }
    }

    // First-seen unique-BLAS order, independent of how the SAH tree later
    // reorders instances.
    let mut unique_blas: Vec<Rc<Blas>> = Vec::new();
    let mut seen: HashMap<usize, usize> = HashMap::new();
    for inst in instances {
        let key = blas_key(&inst.blas);
        seen.entry(key).or_insert_with(|| {
            unique_blas.push(Rc::clone(&inst.blas));
            unique_blas.len() - 1
        });
    }

    let items: Vec<BBoxTmp<usize>> = instances.iter().enumerate()
        .map(|(i, inst)| BBoxTmp::new(instance_world_bounds(inst), i))
        .collect();

    let tree = build_sah(items, config, progress);
    let instance_count = tree.prim_count();
    let (nodes, reordered_indices) = linearize(tree, PRIM_KIND_INSTANCE, |_, i: usize| i)?;
    debug_assert_eq!(reordered_indices.len(), instance_count);

    let node_byte_offset = HEADER_SIZE as u32;
    let inst_byte_offset = node_byte_offset + (nodes.len() * NODE_RECORD_SIZE) as u32;
    let blas_section_start = inst_byte_offset as usize + reordered_indices.len() * INSTANCE_RECORD_SIZE;

    // Assign each unique BLAS its final byte offset within the TLAS blob,
    // in first-seen order, stacked after the instance-record section.
    let mut blas_offsets: HashMap<usize, u32> = HashMap::new();
    let mut cursor = blas_section_start;
    for blas in &unique_blas {
        blas_offsets.insert(blas_key(blas), cursor as u32);
        cursor += blas.len();
    }
    let total_size = cursor;

    let mut blob = Vec::with_capacity(total_size);
    write_header(&mut blob, ACCEL_TYPE_TLAS, node_byte_offset, inst_byte_offset, total_size as u32)?;
    for node in &nodes {
        write_node(&mut blob, node)?;
    }
    for (instance_id, &orig_idx) in reordered_indices.iter().enumerate() {
        let inst = &instances[orig_idx];
        let blas_byte_offset = blas_offsets[&blas_key(&inst.blas)];
        write_instance(
            &mut blob,
            &inst.transform,
            inst.sbt_offset,
            instance_id as u32,
            inst.custom_id,
            blas_byte_offset,
        )?;
    }
    for blas in &unique_blas {
        blob.extend_from_slice(blas.blob());
    }

    if blob.len() != total_size {
        return Err(Error::invariant(format!("TLAS blob size {} != computed {}", blob.len(), total_size)));
    }

    log::debug!("TLAS built: {} nodes, {} unique BLAS, {} bytes", nodes.len(), unique_blas.len(), blob.len());

    Ok(Tlas { blob, node_byte_offset, inst_byte_offset })
}
