use crate::ptex::{Mesh, PtexError, Result};

/// Filtering expects edges to have one or two adjacent polygons.
pub const MAX_ADJ_POLYS: usize = 2;

/// One occupied adjacency slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjSlot {
	/// Polygon index.
	pub poly: u32,
	/// Whether the polygon walks the edge in its stored `v1 -> v2` order.
	pub forward: bool,
}

/// Fixed-capacity set of the polygons bordering one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeAdjacency {
	slots: [Option<AdjSlot>; MAX_ADJ_POLYS],
}

impl EdgeAdjacency {
	/// Slot holding `poly`, if any.
	pub fn find_slot(&self, poly: u32) -> Option<usize> {
		self.slots.iter().position(|slot| slot.is_some_and(|slot| slot.poly == poly))
	}

	/// Index of the complementary slot.
	pub const fn other_slot(slot: usize) -> usize {
		MAX_ADJ_POLYS - 1 - slot
	}

	/// Polygon on the other side of the edge from `poly`.
	///
	/// `None` when `poly` does not border the edge or the edge is a boundary.
	pub fn other_polygon(&self, poly: u32) -> Option<u32> {
		let slot = self.find_slot(poly)?;
		self.slots[Self::other_slot(slot)].map(|other| other.poly)
	}

	/// Slot contents.
	pub fn slot(&self, slot: usize) -> Option<AdjSlot> {
		self.slots.get(slot).copied().flatten()
	}

	/// Bordering polygons in slot order.
	pub fn polys(&self) -> impl Iterator<Item = u32> + '_ {
		self.slots.iter().flatten().map(|slot| slot.poly)
	}

	/// Number of bordering polygons.
	pub fn len(&self) -> usize {
		self.slots.iter().flatten().count()
	}

	/// Whether no polygon borders the edge.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// For a two-sided edge, whether the polygons walk it in opposite directions.
	pub fn consistent_winding(&self) -> Option<bool> {
		match self.slots {
			[Some(first), Some(second)] => Some(first.forward != second.forward),
			_ => None,
		}
	}

	/// Add a polygon; re-adding a present polygon is a no-op.
	///
	/// Returns the occupants plus `slot.poly` when the set is already full.
	fn insert(&mut self, slot: AdjSlot) -> std::result::Result<(), [u32; 3]> {
		if self.find_slot(slot.poly).is_some() {
			return Ok(());
		}
		match self.slots.iter_mut().find(|item| item.is_none()) {
			Some(free) => {
				*free = Some(slot);
				Ok(())
			}
			None => {
				let [first, second] = self.slots.map(|item| item.map_or(u32::MAX, |item| item.poly));
				Err([first, second, slot.poly])
			}
		}
	}
}

/// Per-edge adjacency built from one mesh topology snapshot.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
	edges: Vec<EdgeAdjacency>,
}

impl AdjacencyIndex {
	/// Scan every polygon's loops once and record the polygons bordering each edge.
	///
	/// A third polygon on one edge is rejected as non-manifold.
	pub fn build(mesh: &Mesh) -> Result<Self> {
		let mut edges = vec![EdgeAdjacency::default(); mesh.num_edges()];

		for (poly_index, poly) in mesh.polys().iter().enumerate() {
			for offset in 0..poly.loop_count {
				let loop_index = (poly.loop_start + offset) as usize;
				let edge = mesh.loops()[loop_index].edge as usize;
				debug_assert!(edge < edges.len(), "loop {loop_index} references edge {edge} past {}", edges.len());

				let slot = AdjSlot {
					poly: poly_index as u32,
					forward: mesh.loop_edge_forward(loop_index),
				};
				edges[edge].insert(slot).map_err(|polys| PtexError::NonManifoldEdge { edge, polys })?;
			}
		}

		Ok(Self { edges })
	}

	/// Adjacency of one edge.
	pub fn edge(&self, edge: usize) -> Option<&EdgeAdjacency> {
		self.edges.get(edge)
	}

	/// Polygon across `edge` from `poly`.
	pub fn other_polygon(&self, edge: usize, poly: u32) -> Option<u32> {
		self.edges.get(edge)?.other_polygon(poly)
	}

	/// Number of indexed edges.
	pub fn len(&self) -> usize {
		self.edges.len()
	}

	/// Whether the index has no edges.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	/// Edges bordered by exactly one polygon.
	pub fn boundary_edges(&self) -> usize {
		self.edges.iter().filter(|edge| edge.len() == 1).count()
	}

	/// Two-sided edges whose polygons walk it in the same direction.
	pub fn inconsistent_winding_edges(&self) -> impl Iterator<Item = usize> + '_ {
		self.edges
			.iter()
			.enumerate()
			.filter(|(_, edge)| edge.consistent_winding() == Some(false))
			.map(|(index, _)| index)
	}
}
