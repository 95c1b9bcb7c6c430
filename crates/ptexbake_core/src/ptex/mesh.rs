use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ptex::{PtexError, Result};

/// Polygon as a contiguous range of loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poly {
	/// First loop index.
	pub loop_start: u32,
	/// Number of loops (corners).
	pub loop_count: u32,
}

/// Polygon corner: the vertex it starts at and the edge to the next corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loop {
	/// Vertex index.
	pub vert: u32,
	/// Edge from `vert` to the next loop's vertex.
	pub edge: u32,
}

/// Undirected edge stored with a fixed vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
	/// First vertex.
	pub v1: u32,
	/// Second vertex.
	pub v2: u32,
}

/// JSON mesh description: one vertex list per face.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshDesc {
	/// Face vertex indices in winding order.
	pub faces: Vec<Vec<u32>>,
}

impl MeshDesc {
	/// Load a description from a JSON file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		Ok(serde_json::from_slice(&raw)?)
	}
}

/// Read-only polygon mesh topology.
#[derive(Debug, Clone)]
pub struct Mesh {
	num_verts: usize,
	polys: Vec<Poly>,
	loops: Vec<Loop>,
	edges: Vec<Edge>,
}

impl Mesh {
	/// Build topology from per-face vertex lists, deduplicating shared edges.
	pub fn from_faces(faces: &[Vec<u32>]) -> Result<Self> {
		let mut polys = Vec::with_capacity(faces.len());
		let mut loops = Vec::new();
		let mut edges = Vec::new();
		let mut edge_lookup: HashMap<(u32, u32), u32> = HashMap::new();
		let mut num_verts = 0_usize;

		for (face_index, face) in faces.iter().enumerate() {
			let verts = face.as_slice();
			if verts.len() < 3 {
				return Err(PtexError::InvalidFace {
					face: face_index,
					reason: "fewer than three vertices",
				});
			}

			polys.push(Poly {
				loop_start: loops.len() as u32,
				loop_count: verts.len() as u32,
			});

			for (corner, &vert) in verts.iter().enumerate() {
				let next = verts[(corner + 1) % verts.len()];
				if vert == next {
					return Err(PtexError::InvalidFace {
						face: face_index,
						reason: "repeated consecutive vertex",
					});
				}
				num_verts = num_verts.max(vert as usize + 1);

				let key = (vert.min(next), vert.max(next));
				let edge = *edge_lookup.entry(key).or_insert_with(|| {
					edges.push(Edge { v1: vert, v2: next });
					(edges.len() - 1) as u32
				});
				loops.push(Loop { vert, edge });
			}
		}

		Ok(Self {
			num_verts,
			polys,
			loops,
			edges,
		})
	}

	/// Build topology from a parsed description.
	pub fn from_desc(desc: &MeshDesc) -> Result<Self> {
		Self::from_faces(&desc.faces)
	}

	/// Number of vertices referenced by faces.
	pub fn num_verts(&self) -> usize {
		self.num_verts
	}

	/// Number of polygons.
	pub fn num_polys(&self) -> usize {
		self.polys.len()
	}

	/// Number of loops across all polygons.
	pub fn num_loops(&self) -> usize {
		self.loops.len()
	}

	/// Number of unique edges.
	pub fn num_edges(&self) -> usize {
		self.edges.len()
	}

	/// All polygons.
	pub fn polys(&self) -> &[Poly] {
		&self.polys
	}

	/// All loops.
	pub fn loops(&self) -> &[Loop] {
		&self.loops
	}

	/// All edges.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Loops of one polygon.
	pub fn poly_loops(&self, poly: usize) -> &[Loop] {
		let p = self.polys[poly];
		&self.loops[p.loop_start as usize..(p.loop_start + p.loop_count) as usize]
	}

	/// Whether the loop walks its edge in the edge's stored `v1 -> v2` order.
	pub fn loop_edge_forward(&self, loop_index: usize) -> bool {
		let l = self.loops[loop_index];
		self.edges[l.edge as usize].v1 == l.vert
	}
}
