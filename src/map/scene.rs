//! The unchanging background: land outline plus country boundary mesh.
//!
//! Geometry extraction runs exactly once at startup; drawing happens per
//! frame because the projection follows the terminal size.

use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_geo_line, LineString};
use crate::map::projection::Projection;
use crate::map::topo::Topology;
use anyhow::Result;

/// Name of the land object inside the world topology
const LAND_OBJECT: &str = "land";
/// Name of the country polygons object inside the world topology
const COUNTRIES_OBJECT: &str = "countries";

pub struct StaticScene {
    land: Vec<LineString>,
    boundaries: Vec<LineString>,
}

impl StaticScene {
    /// Extract the land outline and the boundary mesh from the topology.
    /// A boundary is kept only when the two adjoining regions differ and
    /// their group identifiers (id / 1000) differ.
    pub fn from_topology(topology: &Topology) -> Result<Self> {
        let decoded = topology.decode_arcs();
        let land = topology.object_lines(LAND_OBJECT, &decoded)?;
        let boundaries = topology.mesh_lines(COUNTRIES_OBJECT, &decoded, |a, b| {
            a.index != b.index && a.group() != b.group()
        })?;
        Ok(Self { land, boundaries })
    }

    /// Draw both layers onto fresh canvases: (land, boundaries)
    pub fn render(
        &self,
        width: usize,
        height: usize,
        projection: &Projection,
    ) -> (BrailleCanvas, BrailleCanvas) {
        let mut land = BrailleCanvas::new(width, height);
        let mut boundaries = BrailleCanvas::new(width, height);
        for line in &self.land {
            draw_geo_line(&mut land, line, projection);
        }
        for line in &self.boundaries {
            draw_geo_line(&mut boundaries, line, projection);
        }
        (land, boundaries)
    }
}
