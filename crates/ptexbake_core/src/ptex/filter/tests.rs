use crate::ptex::{
	AdjacencyIndex, AdjacentEdge, AtlasImage, DataType, ImageBuf, LoopPtex, Mesh, PackOptions, PackedRegion, Side, TexelData,
	TexelInfo, adjacent_edge, filter_borders, pack_loops, rect_borders_update,
};

fn two_triangles() -> Mesh {
	Mesh::from_faces(&[vec![0, 1, 2], vec![0, 2, 3]]).expect("mesh builds")
}

fn region(x: u32, y: u32) -> PackedRegion {
	PackedRegion {
		x,
		y,
		width: 4,
		height: 4,
	}
}

#[test]
fn shared_edge_resolves_across_polygons() {
	let mesh = two_triangles();
	let adj = AdjacencyIndex::build(&mesh).expect("index builds");

	assert_eq!(
		adjacent_edge(&adj, &mesh, 0, 2, Side::Top),
		AdjacentEdge {
			loop_index: 4,
			side: Side::Right,
			reverse: true
		}
	);
	assert_eq!(
		adjacent_edge(&adj, &mesh, 1, 1, Side::Right),
		AdjacentEdge {
			loop_index: 2,
			side: Side::Top,
			reverse: true
		}
	);
	assert_eq!(
		adjacent_edge(&adj, &mesh, 0, 0, Side::Right),
		AdjacentEdge {
			loop_index: 3,
			side: Side::Top,
			reverse: true
		}
	);
}

#[test]
fn interior_sides_rotate_within_polygon() {
	let mesh = two_triangles();
	let adj = AdjacencyIndex::build(&mesh).expect("index builds");

	let bottom = adjacent_edge(&adj, &mesh, 1, 0, Side::Bottom);
	assert_eq!((bottom.loop_index, bottom.side), (5, Side::Left));
	let left = adjacent_edge(&adj, &mesh, 1, 2, Side::Left);
	assert_eq!((left.loop_index, left.side), (3, Side::Bottom));
}

#[test]
fn boundary_sides_resolve_to_themselves() {
	let mesh = two_triangles();
	let adj = AdjacencyIndex::build(&mesh).expect("index builds");

	let top = adjacent_edge(&adj, &mesh, 0, 0, Side::Top);
	assert_eq!(
		top,
		AdjacentEdge {
			loop_index: 0,
			side: Side::Top,
			reverse: false
		}
	);
}

#[test]
fn resolution_is_symmetric_on_closed_mesh() {
	let mesh = Mesh::from_faces(&[
		vec![0, 3, 2, 1],
		vec![4, 5, 6, 7],
		vec![0, 1, 5, 4],
		vec![1, 2, 6, 5],
		vec![2, 3, 7, 6],
		vec![3, 0, 4, 7],
	])
	.expect("cube builds");
	let adj = AdjacencyIndex::build(&mesh).expect("index builds");
	let owner = |loop_index: usize| {
		mesh.polys()
			.iter()
			.position(|p| (p.loop_start as usize..(p.loop_start + p.loop_count) as usize).contains(&loop_index))
			.expect("loop has an owner")
	};

	for (poly_index, poly) in mesh.polys().iter().enumerate() {
		for offset in 0..poly.loop_count as usize {
			for side in Side::ALL {
				let there = adjacent_edge(&adj, &mesh, poly_index, offset, side);
				let there_poly = owner(there.loop_index);
				let there_offset = there.loop_index - mesh.polys()[there_poly].loop_start as usize;
				let back = adjacent_edge(&adj, &mesh, there_poly, there_offset, there.side);
				assert_eq!((back.loop_index, back.side), (poly.loop_start as usize + offset, side));
				assert!(there.reverse);
			}
		}
	}
}

#[test]
fn blend_pairs_counter_clockwise_walks() {
	let info = TexelInfo::new(DataType::F32, 1).expect("info");
	let mut buf = ImageBuf::new(8, 4, info).expect("buffer");
	for y in 0..4 {
		for x in 0..8 {
			buf.set_channel(x, y, 0, (y * 8 + x) as f32);
		}
	}
	let snapshot = buf.clone();
	let dst = region(0, 0);
	let other = region(4, 0);
	let edges = [
		AdjacentEdge {
			loop_index: 0,
			side: Side::Bottom,
			reverse: false,
		},
		AdjacentEdge {
			loop_index: 0,
			side: Side::Right,
			reverse: false,
		},
		AdjacentEdge {
			loop_index: 1,
			side: Side::Right,
			reverse: true,
		},
		AdjacentEdge {
			loop_index: 0,
			side: Side::Left,
			reverse: false,
		},
	];
	let src = [dst, dst, other, dst];

	rect_borders_update(&mut buf, &snapshot, dst, &src, &edges).expect("blend succeeds");

	// Top walks -u and the neighbour's right column +v, so reversing pairs
	// texel x of the top row with row x of the right column.
	for x in 1..3 {
		let own = snapshot.channel(x, 3, 0);
		let neighbour = snapshot.channel(7, x, 0);
		assert_eq!(buf.channel(x, 3, 0), 0.5 * (own + neighbour));
	}
	// Self-blended sides keep their values.
	assert_eq!(buf.channel(2, 0, 0), snapshot.channel(2, 0, 0));
	assert_eq!(buf.channel(0, 1, 0), snapshot.channel(0, 1, 0));
	// Interior untouched, second region untouched.
	assert_eq!(buf.channel(1, 1, 0), snapshot.channel(1, 1, 0));
	assert_eq!(buf.channel(7, 1, 0), snapshot.channel(7, 1, 0));
}

#[test]
fn blend_resamples_shorter_neighbour_side() {
	let info = TexelInfo::new(DataType::F32, 1).expect("info");
	let mut buf = ImageBuf::new(6, 4, info).expect("buffer");
	let dst = region(0, 0);
	let small = PackedRegion {
		x: 4,
		y: 0,
		width: 2,
		height: 2,
	};
	buf.set_channel(4, 0, 0, 8.0);
	buf.set_channel(5, 0, 0, 16.0);
	let snapshot = buf.clone();
	let own = |side| AdjacentEdge {
		loop_index: 0,
		side,
		reverse: false,
	};
	let edges = [
		AdjacentEdge {
			loop_index: 1,
			side: Side::Bottom,
			reverse: false,
		},
		own(Side::Right),
		own(Side::Top),
		own(Side::Left),
	];

	rect_borders_update(&mut buf, &snapshot, dst, &[small, dst, dst, dst], &edges).expect("blend succeeds");

	// Corners are rewritten by the self-blended left and right sides.
	assert_eq!(buf.channel(1, 0, 0), 4.0);
	assert_eq!(buf.channel(2, 0, 0), 8.0);
}

#[test]
fn filter_reports_self_blends_and_rejects_misaligned_regions() {
	let mesh = two_triangles();
	let info = TexelInfo::new(DataType::U8, 4).expect("info");
	let buf = ImageBuf::new(24, 4, info).expect("buffer");
	let regions = (0..6).map(|index| region(index * 4, 0)).collect();
	let mut atlas = AtlasImage::new(buf, regions).expect("atlas");

	let report = filter_borders(&mut atlas, &mesh).expect("filter succeeds");
	assert_eq!(report.loops, 6);
	assert_eq!(report.self_blends, 8);
	assert_eq!(report.inconsistent_winding, 0);

	let buf = ImageBuf::new(4, 4, info).expect("buffer");
	let mut short = AtlasImage::new(buf, vec![region(0, 0)]).expect("atlas");
	assert!(filter_borders(&mut short, &mesh).is_err());
}

#[test]
fn inconsistent_winding_is_counted() {
	let mesh = Mesh::from_faces(&[vec![0, 1, 2], vec![0, 1, 3]]).expect("mesh builds");
	let info = TexelInfo::new(DataType::U8, 4).expect("info");
	let buf = ImageBuf::new(24, 4, info).expect("buffer");
	let regions = (0..6).map(|index| region(index * 4, 0)).collect();
	let mut atlas = AtlasImage::new(buf, regions).expect("atlas");

	let report = filter_borders(&mut atlas, &mesh).expect("filter succeeds");
	assert_eq!(report.inconsistent_winding, 1);
}

#[test]
fn quad_split_seams_blend_geometric_neighbours() {
	let mesh = Mesh::from_faces(&[vec![0, 1, 2, 3]]).expect("mesh builds");
	let info = TexelInfo::new(DataType::F32, 1).expect("info");
	let full = ImageBuf::from_data(8, 8, 1, TexelData::F32((0..64).map(|v| v as f32).collect())).expect("quad face");
	let mut subs: Vec<ImageBuf> = (0..4).map(|_| ImageBuf::new(4, 4, info).expect("sub")).collect();
	let [s0, s1, s2, s3] = subs.as_mut_slice() else { unreachable!() };
	ImageBuf::quad_split(&full, [s0, s1, s2, s3]).expect("split");
	let loops: Vec<LoopPtex> = subs.into_iter().map(|buf| LoopPtex::from_buf(buf).expect("raster")).collect();

	// Loop 0 bottom and loop 3 left touch texel for texel along the same row index.
	assert_eq!(loops[0].texel(1, 0), vec![26.0]);
	assert_eq!(loops[3].texel(0, 1), vec![34.0]);

	let packed = pack_loops(&mesh, &loops, &PackOptions::default()).expect("pack succeeds");
	let atlas = packed.atlas.buf();
	let r0 = packed.atlas.regions()[0];
	let r3 = packed.atlas.regions()[3];

	assert_eq!(atlas.channel(r0.x + 1, r0.y, 0), 30.0);
	assert_eq!(atlas.channel(r0.x + 2, r0.y, 0), 29.0);
	for k in 0..4 {
		let expected = 0.5 * (loops[3].texel(0, k)[0] + loops[0].texel(k, 0)[0]);
		assert_eq!(atlas.channel(r3.x, r3.y + k, 0), expected, "loop 3 left texel {k}");
	}
}
