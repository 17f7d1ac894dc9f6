//! Byte-exact, little-endian record shapes for the flattened device
//! layout. Every record here round-trips through [`crate::serialize`]
//! unchanged: there is no per-field encoding beyond raw IEEE-754 binary32
//! and u32, matching the on-device memory layout a traversal kernel would
//! read directly.

use byteorder::{WriteBytesExt, LE};
use std::io::Write;

use crate::builder::linearize::{FlatNode, FlatPayload};
use crate::error::Result;

pub const PRIM_KIND_INSTANCE: u32 = 1;
pub const PRIM_KIND_TRIANGLE: u32 = 2;

pub const ACCEL_TYPE_TLAS: u32 = 1;
pub const ACCEL_TYPE_BLAS: u32 = 2;

pub const LEAF_SENTINEL_BIT: u32 = 0x8000_0000;

pub const NODE_RECORD_SIZE: usize = 48;
pub const HEADER_SIZE: usize = 16;
pub const TRIANGLE_RECORD_SIZE: usize = 16;
pub const VERTEX_RECORD_SIZE: usize = 16;
pub const INSTANCE_RECORD_SIZE: usize = 16 * 4 + 16; // 4x4 transform + 4 u32 fields

/// Writes one 48-byte flattened node record: `bottom[3], pad, top[3], pad`
/// (32 bytes) followed by the 16-byte inner/leaf union.
pub fn write_node(out: &mut Vec<u8>, node: &FlatNode) -> Result<()> {
    out.write_f32::<LE>(node.bounds.min.x)?;
    out.write_f32::<LE>(node.bounds.min.y)?;
    out.write_f32::<LE>(node.bounds.min.z)?;
    out.write_f32::<LE>(0.0)?;
    out.write_f32::<LE>(node.bounds.max.x)?;
    out.write_f32::<LE>(node.bounds.max.y)?;
    out.write_f32::<LE>(node.bounds.max.z)?;
    out.write_f32::<LE>(0.0)?;

    match node.payload {
        FlatPayload::Inner { left_idx, right_idx } => {
            out.write_u32::<LE>(left_idx)?;
            out.write_u32::<LE>(right_idx)?;
            out.write_u32::<LE>(0)?;
            out.write_u32::<LE>(0)?;
        }
        FlatPayload::Leaf { first_prim_idx, count, prim_kind } => {
            out.write_u32::<LE>(count | LEAF_SENTINEL_BIT)?;
            out.write_u32::<LE>(first_prim_idx)?;
            out.write_u32::<LE>(prim_kind)?;
            out.write_u32::<LE>(0)?;
        }
    }
    Ok(())
}

pub fn write_header(out: &mut Vec<u8>, kind: u32, offset1: u32, offset2: u32, offset3_or_size: u32) -> Result<()> {
    out.write_u32::<LE>(kind)?;
    out.write_u32::<LE>(offset1)?;
    out.write_u32::<LE>(offset2)?;
    out.write_u32::<LE>(offset3_or_size)?;
    Ok(())
}

pub fn write_triangle(out: &mut Vec<u8>, i0: u32, i1: u32, i2: u32, prim_id: u32) -> Result<()> {
    out.write_u32::<LE>(i0)?;
    out.write_u32::<LE>(i1)?;
    out.write_u32::<LE>(i2)?;
    out.write_u32::<LE>(prim_id)?;
    Ok(())
}

pub fn write_vertex(out: &mut Vec<u8>, x: f32, y: f32, z: f32) -> Result<()> {
    out.write_f32::<LE>(x)?;
    out.write_f32::<LE>(y)?;
    out.write_f32::<LE>(z)?;
    out.write_f32::<LE>(0.0)?;
    Ok(())
}

/// Row-major 4x4 transform, in cgmath's column-major `Matrix4` storage;
/// the rows are written out explicitly so the on-disk layout matches
/// the row-major convention the instance transform is documented in.
pub fn write_instance(
    out: &mut Vec<u8>,
    transform: &cgmath::Matrix4<f32>,
    sbt_offset: u32,
    instance_id: u32,
    custom_id: u32,
    blas_byte_offset: u32,
) -> Result<()> {
    for row in 0..4 {
        for col in 0..4 {
            out.write_f32::<LE>(transform[col][row])?;
        }
    }
    out.write_u32::<LE>(sbt_offset)?;
    out.write_u32::<LE>(instance_id)?;
    out.write_u32::<LE>(custom_id)?;
    out.write_u32::<LE>(blas_byte_offset)?;
    Ok(())
}

/// Ensures a `Vec<u8>` grows by exactly `n` zero bytes; used to pre-reserve
/// header-sized slots that get overwritten once offsets are known.
pub fn reserve(out: &mut Vec<u8>, n: usize) -> Result<()> {
    out.write_all(&vec![0u8; n])?;
    Ok(())
}
