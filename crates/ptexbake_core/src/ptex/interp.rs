use serde::Serialize;

use crate::ptex::{Mesh, PtexError, Result};

/// Per-loop record tying derived geometry back to a source loop raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoopInterp {
	/// Source loop index.
	pub id: u32,
	/// Position inside the source loop raster.
	pub uv: [f32; 2],
}

/// Tessellated quad face sampling one source loop raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TessFacePtex {
	/// Source loop index shared by all four corners.
	pub id: u32,
	/// Corner positions inside the source raster.
	pub uv: [[f32; 2]; 4],
}

/// One record per mesh loop, each pointing at itself with zero uv.
pub fn inject_loop_interp(mesh: &Mesh) -> Vec<LoopInterp> {
	mesh.polys()
		.iter()
		.flat_map(|poly| poly.loop_start..poly.loop_start + poly.loop_count)
		.map(|id| LoopInterp { id, uv: [0.0, 0.0] })
		.collect()
}

/// Collect the four corner records of a tessellated face.
pub fn tess_face_interp(loop_interp: &[LoopInterp], loop_indices: [u32; 4]) -> Result<TessFacePtex> {
	let mut face = TessFacePtex::default();
	for (corner, &index) in loop_indices.iter().enumerate() {
		let src = loop_interp.get(index as usize).ok_or(PtexError::LoopOutOfRange {
			index: index as usize,
			len: loop_interp.len(),
		})?;
		if corner == 0 {
			face.id = src.id;
		} else if src.id != face.id {
			return Err(PtexError::TessFaceIdMismatch {
				expected: face.id,
				got: src.id,
			});
		}
		face.uv[corner] = src.uv;
	}
	Ok(face)
}

#[cfg(test)]
mod tests {
	use crate::ptex::{LoopInterp, Mesh, PtexError, inject_loop_interp, tess_face_interp};

	#[test]
	fn injected_records_point_at_their_loop() {
		let mesh = Mesh::from_faces(&[vec![0, 1, 2, 3], vec![1, 4, 2]]).expect("mesh builds");
		let records = inject_loop_interp(&mesh);
		assert_eq!(records.len(), 7);
		assert!(records.iter().enumerate().all(|(index, record)| record.id as usize == index && record.uv == [0.0, 0.0]));
	}

	#[test]
	fn tess_face_copies_uvs_of_one_source() {
		let records: Vec<LoopInterp> = (0..4)
			.map(|corner| LoopInterp {
				id: 5,
				uv: [corner as f32 * 0.25, 1.0],
			})
			.chain([LoopInterp { id: 6, uv: [0.0, 0.0] }])
			.collect();

		let face = tess_face_interp(&records, [3, 2, 1, 0]).expect("same source");
		assert_eq!(face.id, 5);
		assert_eq!(face.uv[0], [0.75, 1.0]);

		let err = tess_face_interp(&records, [0, 1, 4, 2]).expect_err("mixed sources");
		assert!(matches!(err, PtexError::TessFaceIdMismatch { expected: 5, got: 6 }));
		assert!(matches!(tess_face_interp(&records, [0, 1, 2, 9]), Err(PtexError::LoopOutOfRange { index: 9, len: 5 })));
	}
}
