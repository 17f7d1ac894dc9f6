//! Depth-first flattening of a tagged [`super::Node`] tree into the
//! cache-friendly `nodes[]` / `prims[]` arrays that make up the device
//! layout. See [`crate::device_layout`] for the byte-exact record shapes
//! this produces.

use super::Node;
use crate::error::{Error, Result};
use crate::geometry::Aabb;

/// One slot of the flattened node array, still axis/offset agnostic about
/// what a leaf's primitives mean (triangle vs. instance); that's carried
/// by `prim_kind` and resolved by the caller when writing bytes.
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub bounds: Aabb<f32>,
    pub payload: FlatPayload,
}

#[derive(Debug, Clone, Copy)]
pub enum FlatPayload {
    Inner { left_idx: u32, right_idx: u32 },
    Leaf { first_prim_idx: u32, count: u32, prim_kind: u32 },
}

/// Flatten `tree` into `(nodes, prims)`. `prim_kind` is stamped into every
/// leaf slot (2 = triangle, 1 = instance, per the device layout). Each
/// leaf's primitives are converted to their flattened record via
/// `to_record`, which receives the primitive's position in the final
/// `prims` array (used by callers that need to renumber, e.g. TLAS
/// instance ids = depth-first leaf-visitation order).
pub fn linearize<P, R>(
    tree: Node<P>,
    prim_kind: u32,
    mut to_record: impl FnMut(usize, P) -> R,
) -> Result<(Vec<FlatNode>, Vec<R>)> {
    let node_count = tree.node_count();
    let prim_total = tree.prim_count();

    let mut nodes = Vec::with_capacity(node_count);
    let mut prims = Vec::with_capacity(prim_total);

    // Reserve node slots up front so `visit` can record child indices before
    // the children themselves have been emitted.
    nodes.resize_with(node_count, || FlatNode {
        bounds: Aabb::none(),
        payload: FlatPayload::Leaf { first_prim_idx: 0, count: 0, prim_kind },
    });

    let mut next_node = 0usize;
    visit(tree, &mut nodes, &mut prims, &mut next_node, prim_kind, &mut to_record);

    if next_node != node_count {
        return Err(Error::invariant(format!(
            "linearizer emitted {} nodes, expected {}",
            next_node, node_count
        )));
    }
    if prims.len() != prim_total {
        return Err(Error::invariant(format!(
            "linearizer emitted {} primitives, expected {}",
            prims.len(), prim_total
        )));
    }

    Ok((nodes, prims))
}

fn visit<P, R>(
    node: Node<P>,
    nodes: &mut Vec<FlatNode>,
    prims: &mut Vec<R>,
    next_node: &mut usize,
    prim_kind: u32,
    to_record: &mut impl FnMut(usize, P) -> R,
) -> usize {
    let my_idx = *next_node;
    *next_node += 1;

    match node {
        Node::Leaf { bounds, primitives } => {
            let first_prim_idx = prims.len() as u32;
            let count = primitives.len() as u32;
            for p in primitives {
                let idx = prims.len();
                let record = to_record(idx, p);
                prims.push(record);
            }
            nodes[my_idx] = FlatNode {
                bounds,
                payload: FlatPayload::Leaf { first_prim_idx, count, prim_kind },
            };
        }
        Node::Inner { bounds, left, right } => {
            let left_idx = visit(*left, nodes, prims, next_node, prim_kind, to_record) as u32;
            let right_idx = *next_node as u32;
            let _ = visit(*right, nodes, prims, next_node, prim_kind, to_record);
            nodes[my_idx] = FlatNode {
                bounds,
                payload: FlatPayload::Inner { left_idx, right_idx },
            };
        }
    }

    my_idx
}
