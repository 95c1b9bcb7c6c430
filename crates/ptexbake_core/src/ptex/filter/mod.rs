use serde::Serialize;

use crate::ptex::{AdjacencyIndex, AtlasImage, ImageBuf, Mesh, PackedRegion, PtexError, Result};

/// Raster side in Ptex order.
///
/// Loop rasters have their origin at the polygon centre. `Top` (row `v = H-1`)
/// runs along the loop's own mesh edge, `Right` (column `u = W-1`) along the
/// previous loop's edge. `Bottom` and `Left` are interior to the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
	/// Row `v = 0`.
	Bottom = 0,
	/// Column `u = W-1`.
	Right = 1,
	/// Row `v = H-1`.
	Top = 2,
	/// Column `u = 0`.
	Left = 3,
}

impl Side {
	/// All sides in blend order.
	pub const ALL: [Side; 4] = [Side::Bottom, Side::Right, Side::Top, Side::Left];

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bottom => "bottom",
			Self::Right => "right",
			Self::Top => "top",
			Self::Left => "left",
		}
	}

	/// Texel count along this side of `region`.
	fn len(self, region: PackedRegion) -> u32 {
		match self {
			Self::Bottom | Self::Top => region.width,
			Self::Right | Self::Left => region.height,
		}
	}

	/// Atlas coordinate of the `k`-th texel along this side of `region`.
	///
	/// Sides are walked counter-clockwise: bottom `+u`, right `+v`, top `-u`,
	/// left `-v`.
	fn texel(self, region: PackedRegion, k: u32) -> (u32, u32) {
		match self {
			Self::Bottom => (region.x + k, region.y),
			Self::Right => (region.x + region.width - 1, region.y + k),
			Self::Top => (region.x + region.width - 1 - k, region.y + region.height - 1),
			Self::Left => (region.x, region.y + region.height - 1 - k),
		}
	}
}

/// Neighbouring loop raster and side across one side of a loop raster.
///
/// `reverse` is relative to the counter-clockwise walk of both sides, so two
/// sides meeting head to tail pair their `k`-th texels as `k` and `len - 1 - k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjacentEdge {
	/// Mesh loop index of the neighbour raster.
	pub loop_index: usize,
	/// Side of the neighbour raster that touches ours.
	pub side: Side,
	/// Walk the neighbour side in the opposite direction.
	pub reverse: bool,
}

/// Counters from one border filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
	/// Loops processed.
	pub loops: usize,
	/// Sides that fell back to blending with themselves.
	pub self_blends: usize,
	/// Shared edges whose polygons walk it in the same direction.
	pub inconsistent_winding: usize,
}

/// Resolve the raster side adjacent to `side` of loop `loop_offset` in `poly`.
///
/// `Bottom` and `Left` rotate within the polygon. `Top` and `Right` cross the
/// mesh edge to the neighbouring polygon, assuming it winds opposite to ours.
/// Boundary edges resolve to the loop's own side.
pub fn adjacent_edge(adj: &AdjacencyIndex, mesh: &Mesh, poly: usize, loop_offset: usize, side: Side) -> AdjacentEdge {
	let p = mesh.polys()[poly];
	let start = p.loop_start as usize;
	let count = p.loop_count as usize;
	let prev = (loop_offset + count - 1) % count;
	let next = (loop_offset + 1) % count;

	let mesh_edge = match side {
		Side::Bottom => {
			return AdjacentEdge {
				loop_index: start + prev,
				side: Side::Left,
				reverse: true,
			};
		}
		Side::Left => {
			return AdjacentEdge {
				loop_index: start + next,
				side: Side::Bottom,
				reverse: true,
			};
		}
		Side::Top => mesh.loops()[start + loop_offset].edge,
		Side::Right => mesh.loops()[start + prev].edge,
	};

	let own = AdjacentEdge {
		loop_index: start + loop_offset,
		side,
		reverse: false,
	};
	let Some(other_index) = adj.other_polygon(mesh_edge as usize, poly as u32) else {
		return own;
	};

	let other = mesh.polys()[other_index as usize];
	let other_start = other.loop_start as usize;
	let other_count = other.loop_count as usize;
	let found = mesh.loops()[other_start..other_start + other_count].iter().position(|l| l.edge == mesh_edge);
	match (found, side) {
		(Some(i), Side::Top) => AdjacentEdge {
			loop_index: other_start + (i + 1) % other_count,
			side: Side::Right,
			reverse: true,
		},
		(Some(i), _) => AdjacentEdge {
			loop_index: other_start + i,
			side: Side::Top,
			reverse: true,
		},
		(None, _) => {
			log::warn!("edge {mesh_edge} lists polygon {other_index} but none of its loops use it; blending loop {} with itself", own.loop_index);
			own
		}
	}
}

/// Blend the four sides of `dst` with their neighbours.
///
/// Reads both sides from `snapshot` and writes the channel-wise average into
/// `buf`. Neighbour sides of a different length are sampled by nearest index.
pub fn rect_borders_update(
	buf: &mut ImageBuf,
	snapshot: &ImageBuf,
	dst: PackedRegion,
	src: &[PackedRegion; 4],
	edges: &[AdjacentEdge; 4],
) -> Result<()> {
	if (buf.width(), buf.height()) != (snapshot.width(), snapshot.height()) || buf.texel_info() != snapshot.texel_info() {
		return Err(PtexError::TexelInfoMismatch {
			expected: buf.texel_info(),
			got: snapshot.texel_info(),
		});
	}
	buf.check_region(dst)?;
	for region in src {
		buf.check_region(*region)?;
	}

	let channels = usize::from(buf.num_channels());
	for side in Side::ALL {
		let edge = edges[side as usize];
		let src_region = src[side as usize];
		let dst_len = side.len(dst);
		let src_len = edge.side.len(src_region);
		if dst_len == 0 || src_len == 0 {
			continue;
		}

		for k in 0..dst_len {
			let nearest = (u64::from(k) * u64::from(src_len) / u64::from(dst_len)) as u32;
			let j = if edge.reverse { src_len - 1 - nearest } else { nearest };
			let (dx, dy) = side.texel(dst, k);
			let (sx, sy) = edge.side.texel(src_region, j);
			for channel in 0..channels {
				let blended = 0.5 * (snapshot.channel(dx, dy, channel) + snapshot.channel(sx, sy, channel));
				buf.set_channel(dx, dy, channel, blended);
			}
		}
	}
	Ok(())
}

/// Blend every loop raster's borders with its neighbours across the mesh.
///
/// All reads come from a copy of the atlas taken before the pass, so both
/// sides of a shared edge end up with matching values.
pub fn filter_borders(atlas: &mut AtlasImage, mesh: &Mesh) -> Result<FilterReport> {
	if atlas.regions().len() != mesh.num_loops() {
		return Err(PtexError::LoopCountMismatch {
			expected: mesh.num_loops(),
			got: atlas.regions().len(),
		});
	}
	let adj = AdjacencyIndex::build(mesh)?;

	let mut report = FilterReport {
		inconsistent_winding: adj.inconsistent_winding_edges().count(),
		..FilterReport::default()
	};
	for edge in adj.inconsistent_winding_edges() {
		log::warn!("edge {edge} is walked in the same direction by both polygons; border filter assumes opposite winding");
	}

	let (buf, regions) = atlas.parts_mut();
	let snapshot = buf.clone();
	for (poly_index, poly) in mesh.polys().iter().enumerate() {
		for offset in 0..poly.loop_count as usize {
			let loop_index = poly.loop_start as usize + offset;
			let edges = Side::ALL.map(|side| adjacent_edge(&adj, mesh, poly_index, offset, side));
			for (side, edge) in Side::ALL.iter().zip(&edges) {
				if edge.loop_index == loop_index && edge.side == *side {
					report.self_blends += 1;
				}
			}
			let src = edges.map(|edge| regions[edge.loop_index]);
			log::trace!("filtering loop {loop_index}: {edges:?}");
			rect_borders_update(buf, &snapshot, regions[loop_index], &src, &edges)
				.unwrap_or_else(|err| panic!("border blend failed for loop {loop_index} with validated regions: {err}"));
			report.loops += 1;
		}
	}

	log::debug!(
		"filtered {} loops ({} self blends, {} inconsistent edges)",
		report.loops,
		report.self_blends,
		report.inconsistent_winding
	);
	Ok(report)
}

#[cfg(test)]
mod tests;
