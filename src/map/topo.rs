//! Minimal TopoJSON decoder for the world topology file.
//!
//! The world file encodes shared boundaries once: every shape references
//! arcs by index, with negative indices meaning "reversed". When a
//! `transform` is present, arc points are quantized delta-encoded integers.
//! This module decodes arcs back to lon/lat, extracts named objects as
//! polylines, and implements the `mesh` operation used to build the
//! country boundary layer.

use crate::map::geometry::LineString;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// A TopoJSON topology: shared arcs plus named geometry objects.
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: HashMap<String, TopoGeometry>,
}

/// Quantization transform: position = translate + scale * running_sum
#[derive(Debug, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// One geometry inside a topology. Shapes carry arc indices, not coordinates.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        #[serde(default)]
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<i64>,
        arcs: Vec<Vec<i32>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<i64>,
        arcs: Vec<Vec<Vec<i32>>>,
    },
    LineString {
        #[serde(default)]
        id: Option<i64>,
        arcs: Vec<i32>,
    },
    MultiLineString {
        #[serde(default)]
        id: Option<i64>,
        arcs: Vec<Vec<i32>>,
    },
    Point {
        #[serde(default)]
        coordinates: Vec<f64>,
    },
    MultiPoint {
        #[serde(default)]
        coordinates: Vec<Vec<f64>>,
    },
}

/// Identity of a region adjoining a shared arc.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Region {
    /// Position of the region within its containing object
    pub index: usize,
    /// Numeric feature id, when the source data carries one
    pub id: Option<i64>,
}

impl Region {
    /// Group identifier: regions whose ids integer-divide to the same
    /// thousand belong to one logical group. Id-less regions have no group.
    pub fn group(self) -> Option<i64> {
        self.id.map(|id| id / 1000)
    }
}

impl Topology {
    /// Decode every arc to absolute lon/lat coordinates.
    pub fn decode_arcs(&self) -> Vec<LineString> {
        self.arcs
            .iter()
            .map(|arc| match &self.transform {
                Some(t) => {
                    let mut x = 0.0;
                    let mut y = 0.0;
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            (t.translate[0] + t.scale[0] * x, t.translate[1] + t.scale[1] * y)
                        })
                        .collect()
                }
                None => arc
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| (p[0], p[1]))
                    .collect(),
            })
            .collect()
    }

    /// Extract a named object as polylines (polygon rings and line strings).
    pub fn object_lines(&self, name: &str, decoded: &[LineString]) -> Result<Vec<LineString>> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| anyhow!("topology object {name:?} missing"))?;
        let mut lines = Vec::new();
        collect_lines(object, decoded, &mut lines);
        Ok(lines)
    }

    /// Build a boundary mesh over a named object: every arc shared by the
    /// object's regions is considered once, with the first and last region
    /// touching it passed to `filter`. Arcs the filter rejects are dropped.
    pub fn mesh_lines<F>(
        &self,
        name: &str,
        decoded: &[LineString],
        mut filter: F,
    ) -> Result<Vec<LineString>>
    where
        F: FnMut(Region, Region) -> bool,
    {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| anyhow!("topology object {name:?} missing"))?;

        // First and last region referencing each arc; equal when only one does
        let mut owners: Vec<Option<(Region, Region)>> = vec![None; decoded.len()];
        for (index, (id, refs)) in regions_of(object).into_iter().enumerate() {
            let region = Region { index, id };
            for r in refs {
                let Some(slot) = owners.get_mut(arc_index(r)) else {
                    continue;
                };
                *slot = match *slot {
                    None => Some((region, region)),
                    Some((first, _)) => Some((first, region)),
                };
            }
        }

        let lines = decoded
            .iter()
            .zip(&owners)
            .filter_map(|(arc, owner)| match owner {
                Some((a, b)) if filter(*a, *b) => Some(arc.clone()),
                _ => None,
            })
            .collect();
        Ok(lines)
    }
}

/// Resolve an arc reference: negative values index the reversed arc
fn arc_index(r: i32) -> usize {
    if r < 0 {
        (!r) as usize
    } else {
        r as usize
    }
}

/// Concatenate referenced arcs into one polyline, dropping duplicated
/// join points between consecutive arcs
fn stitch(refs: &[i32], decoded: &[LineString]) -> LineString {
    let mut line: LineString = Vec::new();
    for &r in refs {
        let Some(arc) = decoded.get(arc_index(r)) else {
            continue;
        };
        let mut points = arc.clone();
        if r < 0 {
            points.reverse();
        }
        let skip = usize::from(!line.is_empty());
        line.extend(points.into_iter().skip(skip));
    }
    line
}

fn collect_lines(geometry: &TopoGeometry, decoded: &[LineString], out: &mut Vec<LineString>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_lines(g, decoded, out);
            }
        }
        TopoGeometry::Polygon { arcs, .. } => {
            for ring in arcs {
                out.push(stitch(ring, decoded));
            }
        }
        TopoGeometry::MultiPolygon { arcs, .. } => {
            for polygon in arcs {
                for ring in polygon {
                    out.push(stitch(ring, decoded));
                }
            }
        }
        TopoGeometry::LineString { arcs, .. } => out.push(stitch(arcs, decoded)),
        TopoGeometry::MultiLineString { arcs, .. } => {
            for line in arcs {
                out.push(stitch(line, decoded));
            }
        }
        TopoGeometry::Point { .. } | TopoGeometry::MultiPoint { .. } => {}
    }
}

/// Flatten an object into mesh regions: each direct child of a
/// GeometryCollection is one region, anything else is a single region.
/// Returns (id, arc references) per region.
fn regions_of(object: &TopoGeometry) -> Vec<(Option<i64>, Vec<i32>)> {
    match object {
        TopoGeometry::GeometryCollection { geometries } => geometries
            .iter()
            .map(|g| (geometry_id(g), arc_refs(g)))
            .collect(),
        other => vec![(geometry_id(other), arc_refs(other))],
    }
}

fn geometry_id(geometry: &TopoGeometry) -> Option<i64> {
    match geometry {
        TopoGeometry::Polygon { id, .. }
        | TopoGeometry::MultiPolygon { id, .. }
        | TopoGeometry::LineString { id, .. }
        | TopoGeometry::MultiLineString { id, .. } => *id,
        _ => None,
    }
}

fn arc_refs(geometry: &TopoGeometry) -> Vec<i32> {
    let mut refs = Vec::new();
    collect_refs(geometry, &mut refs);
    refs
}

fn collect_refs(geometry: &TopoGeometry, out: &mut Vec<i32>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_refs(g, out);
            }
        }
        TopoGeometry::Polygon { arcs, .. } => {
            for ring in arcs {
                out.extend_from_slice(ring);
            }
        }
        TopoGeometry::MultiPolygon { arcs, .. } => {
            for polygon in arcs {
                for ring in polygon {
                    out.extend_from_slice(ring);
                }
            }
        }
        TopoGeometry::LineString { arcs, .. } => out.extend_from_slice(arcs),
        TopoGeometry::MultiLineString { arcs, .. } => {
            for line in arcs {
                out.extend_from_slice(line);
            }
        }
        TopoGeometry::Point { .. } | TopoGeometry::MultiPoint { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two adjacent unit squares sharing one vertical edge.
    /// Arc 0 is the shared edge, arcs 1 and 2 close each square.
    fn two_squares(left_id: i64, right_id: i64) -> Topology {
        let arcs = vec![
            // shared edge, bottom to top at x=1
            vec![vec![1.0, 0.0], vec![1.0, 1.0]],
            // rest of the left square, top of edge back around to its bottom
            vec![vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]],
            // rest of the right square
            vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![2.0, 1.0], vec![1.0, 1.0]],
        ];
        let countries = TopoGeometry::GeometryCollection {
            geometries: vec![
                TopoGeometry::Polygon {
                    id: Some(left_id),
                    arcs: vec![vec![0, 1]],
                },
                TopoGeometry::Polygon {
                    id: Some(right_id),
                    arcs: vec![vec![-1, 2]],
                },
            ],
        };
        let mut objects = HashMap::new();
        objects.insert("countries".to_string(), countries);
        Topology {
            transform: None,
            arcs,
            objects,
        }
    }

    fn group_filter(a: Region, b: Region) -> bool {
        a.index != b.index && a.group() != b.group()
    }

    #[test]
    fn test_decode_quantized_arcs() {
        let topo: Topology = serde_json::from_str(
            r#"{
                "type": "Topology",
                "transform": {"scale": [0.5, 0.25], "translate": [-180.0, -90.0]},
                "objects": {},
                "arcs": [[[0, 0], [10, 4], [-2, 8]]]
            }"#,
        )
        .unwrap();
        let decoded = topo.decode_arcs();
        assert_eq!(
            decoded,
            vec![vec![(-180.0, -90.0), (-175.0, -89.0), (-176.0, -87.0)]]
        );
    }

    #[test]
    fn test_decode_unquantized_arcs_pass_through() {
        let topo = two_squares(1, 2);
        let decoded = topo.decode_arcs();
        assert_eq!(decoded[0], vec![(1.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_object_lines_stitches_rings() {
        let topo = two_squares(1, 2);
        let decoded = topo.decode_arcs();
        let lines = topo.object_lines("countries", &decoded).unwrap();
        assert_eq!(lines.len(), 2);
        // Left ring: shared edge then the closing arc, join point deduplicated
        assert_eq!(
            lines[0],
            vec![
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
                (1.0, 0.0)
            ]
        );
        // Right ring starts with the shared edge reversed
        assert_eq!(lines[1][0], (1.0, 1.0));
        assert_eq!(lines[1][1], (1.0, 0.0));
    }

    #[test]
    fn test_mesh_excludes_same_group_boundary() {
        // 1001/1000 == 1002/1000, so the shared edge is not a group boundary
        let topo = two_squares(1001, 1002);
        let decoded = topo.decode_arcs();
        let mesh = topo.mesh_lines("countries", &decoded, group_filter).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_mesh_includes_cross_group_boundary() {
        let topo = two_squares(1001, 2001);
        let decoded = topo.decode_arcs();
        let mesh = topo.mesh_lines("countries", &decoded, group_filter).unwrap();
        // Only the shared edge qualifies; outer edges belong to one region each
        assert_eq!(mesh, vec![vec![(1.0, 0.0), (1.0, 1.0)]]);
    }

    #[test]
    fn test_missing_object_is_an_error() {
        let topo = two_squares(1, 2);
        let decoded = topo.decode_arcs();
        assert!(topo.object_lines("land", &decoded).is_err());
    }
}
