//! Named, coloured surfaces loaded from STL resources.

use std::path::Path;

use mesh_io::{load_stl, save_stl, ByteStore, StlReadParams};
use mesh_types::{BoundingBox, IndexedMesh, MeshBounds};
use tracing::{debug, info};

use crate::color::{Color, ColorCycle};
use crate::error::IngestResult;

/// A surface mesh as the viewer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAsset {
    /// Display name, the file name of the resource it came from.
    pub name: String,

    /// Display colour.
    pub color: Color,

    /// Welded geometry.
    pub mesh: IndexedMesh,

    /// Whether the surface takes part in drawing and scene bounds.
    pub visible: bool,
}

impl SurfaceAsset {
    /// Create a visible surface.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color, mesh: IndexedMesh) -> Self {
        Self {
            name: name.into(),
            color,
            mesh,
            visible: true,
        }
    }

    /// Bounding box of the surface's vertices.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.mesh.bounds()
    }

    /// Show or hide the surface.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// The file-name part of a resource path, or the whole path if it has none.
#[must_use]
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Load an STL resource as a new visible surface.
///
/// The surface is named after the resource's file name and takes the next
/// colour from `colors`. A colour is only consumed when loading succeeds.
///
/// # Errors
///
/// Any error from [`load_stl`], and [`IoError::Truncated`] if the file
/// ends before its declared face count; a partial surface is never returned.
///
/// [`IoError::Truncated`]: mesh_io::IoError::Truncated
///
/// # Example
///
/// ```
/// use mesh_ingest::{load_surface, Color, ColorCycle};
/// use mesh_io::{encode_stl, MemoryStore, StlReadParams};
/// use mesh_types::unit_cube;
///
/// let mut store = MemoryStore::new();
/// store.insert("parts/cube.stl", encode_stl(&unit_cube()).unwrap());
///
/// let mut colors = ColorCycle::new();
/// let surface = load_surface(&store, "parts/cube.stl", &StlReadParams::default(), &mut colors)
///     .unwrap();
///
/// assert_eq!(surface.name, "cube.stl");
/// assert_eq!(surface.color, Color::RED);
/// assert!(surface.visible);
/// ```
pub fn load_surface<S: ByteStore + ?Sized>(
    store: &S,
    path: &str,
    params: &StlReadParams,
    colors: &mut ColorCycle,
) -> IngestResult<SurfaceAsset> {
    let mesh = load_stl(store, path, params)?.into_complete()?;
    let surface = SurfaceAsset::new(display_name(path), colors.next_color(), mesh);
    info!(
        name = %surface.name,
        vertices = surface.mesh.vertices.len(),
        faces = surface.mesh.faces.len(),
        "Surface loaded"
    );
    Ok(surface)
}

/// Write a surface's mesh to an STL resource.
///
/// # Errors
///
/// Any error from [`save_stl`].
pub fn save_surface<S: ByteStore + ?Sized>(
    store: &mut S,
    path: &str,
    surface: &SurfaceAsset,
) -> IngestResult<()> {
    save_stl(store, path, &surface.mesh)?;
    Ok(())
}

/// Merged bounding box of every visible surface.
///
/// Invalid when no visible surface has vertices.
///
/// # Example
///
/// ```
/// use mesh_ingest::{scene_bounds, Color, SurfaceAsset};
/// use mesh_types::unit_cube;
///
/// let mut hidden = SurfaceAsset::new("far", Color::RED, unit_cube());
/// for v in &mut hidden.mesh.vertices {
///     v.x += 100.0;
/// }
/// hidden.set_visible(false);
/// let near = SurfaceAsset::new("near", Color::BLUE, unit_cube());
///
/// let bounds = scene_bounds(&[hidden, near]);
/// assert_eq!(bounds.max.x, 1.0);
/// ```
#[must_use]
pub fn scene_bounds<'a>(surfaces: impl IntoIterator<Item = &'a SurfaceAsset>) -> BoundingBox {
    let mut counted = 0usize;
    let bounds = surfaces
        .into_iter()
        .filter(|s| s.visible)
        .inspect(|_| counted += 1)
        .fold(BoundingBox::empty(), |acc, s| acc.merge(&s.bounds()));
    debug!(surfaces = counted, valid = bounds.is_valid(), "Scene bounds merged");
    bounds
}
