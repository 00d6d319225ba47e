//! Parameters for STL decoding.

use mesh_topology::WeldMode;

/// Parameters controlling how binary STL data is decoded.
///
/// # Example
///
/// ```
/// use mesh_io::StlReadParams;
/// use mesh_topology::WeldMode;
///
/// let params = StlReadParams::default();
/// assert_eq!(params.weld, WeldMode::Exact);
///
/// let snapped = StlReadParams::grid(1e-5).with_reserve_limit(1 << 16);
/// assert_eq!(snapped.reserve_limit, 1 << 16);
/// ```
#[derive(Debug, Clone)]
pub struct StlReadParams {
    /// How decoded positions are welded into vertices. Default: bit-exact
    pub weld: WeldMode,

    /// Upper bound on the number of faces to pre-allocate for.
    ///
    /// Pre-allocation is sized from the records actually present in the
    /// buffer, never from the header count alone. This caps it for very
    /// large buffers; faces past the limit still decode, the mesh just grows
    /// as it goes. Default: 4 million
    pub reserve_limit: usize,
}

impl Default for StlReadParams {
    fn default() -> Self {
        Self {
            weld: WeldMode::Exact,
            reserve_limit: 4_000_000,
        }
    }
}

impl StlReadParams {
    /// Bit-exact welding (the default).
    #[must_use]
    pub fn exact() -> Self {
        Self::default()
    }

    /// Quantized-grid welding with the given cell size.
    #[must_use]
    pub fn grid(cell_size: f64) -> Self {
        Self {
            weld: WeldMode::grid(cell_size),
            ..Self::default()
        }
    }

    /// Set the weld mode.
    #[must_use]
    pub const fn with_weld(mut self, weld: WeldMode) -> Self {
        self.weld = weld;
        self
    }

    /// Set the pre-allocation limit.
    #[must_use]
    pub const fn with_reserve_limit(mut self, reserve_limit: usize) -> Self {
        self.reserve_limit = reserve_limit;
        self
    }
}
