/// Per-build policy for the SAH binned builder. Passed by reference into
/// the builder entry points rather than baked in as constants, since the
/// reference implementation this crate is descended from shipped two
/// divergent leaf-size constants depending on which build path was taken.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    /// Stop subdividing once a working set drops below this size.
    pub max_leaf_prim_size: usize,

    /// Number of candidate splits considered per axis at depth 0; the
    /// reference scales this down with depth (`* (d+1) / resolution`).
    pub bin_resolution: u32,

    /// Minimum axis span considered for splitting; axes narrower than
    /// this are skipped entirely.
    pub min_axis_span: f32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            max_leaf_prim_size: 4,
            bin_resolution: 1024,
            min_axis_span: 1e-4,
        }
    }
}
