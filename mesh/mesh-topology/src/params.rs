//! Parameters for welding and normal estimation.

/// How triangle-soup positions are matched to existing vertices.
///
/// # Example
///
/// ```
/// use mesh_topology::WeldMode;
///
/// assert_eq!(WeldMode::default(), WeldMode::Exact);
/// let snapped = WeldMode::grid(1e-4);
/// assert!(matches!(snapped, WeldMode::Grid { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeldMode {
    /// Bit-exact comparison of the stored `f32` coordinates.
    ///
    /// Geometrically coincident points that differ by rounding noise are
    /// kept as separate vertices.
    #[default]
    Exact,

    /// Quantize coordinates onto a grid and weld points sharing a cell.
    ///
    /// Two points closer than `cell_size` may still land in neighbouring
    /// cells and stay separate; this is snapping, not a distance query.
    Grid {
        /// Edge length of a grid cell, in mesh units. Must be finite and positive.
        cell_size: f64,
    },
}

impl WeldMode {
    /// Grid welding with the given cell size.
    #[must_use]
    pub const fn grid(cell_size: f64) -> Self {
        Self::Grid { cell_size }
    }
}

/// How adjacent face normals are combined into a vertex normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalWeighting {
    /// Every adjacent face contributes its unit normal equally.
    #[default]
    Uniform,

    /// Each adjacent face contributes in proportion to its area.
    AreaWeighted,
}

/// Parameters for normal estimation.
///
/// # Example
///
/// ```
/// use mesh_topology::{NormalParams, NormalWeighting};
///
/// let params = NormalParams::default();
/// assert_eq!(params.weighting, NormalWeighting::Uniform);
///
/// let weighted = NormalParams::area_weighted();
/// assert_eq!(weighted.weighting, NormalWeighting::AreaWeighted);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NormalParams {
    /// Vertex normal weighting scheme. Default: [`NormalWeighting::Uniform`]
    pub weighting: NormalWeighting,
}

impl NormalParams {
    /// Params that weight face normals by triangle area.
    #[must_use]
    pub fn area_weighted() -> Self {
        Self {
            weighting: NormalWeighting::AreaWeighted,
        }
    }

    /// Set the weighting scheme.
    #[must_use]
    pub const fn with_weighting(mut self, weighting: NormalWeighting) -> Self {
        self.weighting = weighting;
        self
    }
}
