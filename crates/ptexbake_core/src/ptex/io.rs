use std::path::Path;

use crate::ptex::{
	ArchiveReader, ArchiveWriter, Compression, ImageBuf, LogRes, LoopPtex, Mesh, PtexError, PtexLayer, Res, Result, SubimageSink,
	SubimageSource, TexelInfo,
};

/// Controls for [`export_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
	/// zstd-compress the written archive.
	pub compress: bool,
}

impl ExportOptions {
	fn compression(self) -> Compression {
		if self.compress { Compression::Zstd } else { Compression::None }
	}
}

/// Read one non-quad loop raster from the selected subimage.
///
/// Stored rows run top to bottom, so the raster is flipped into buffer order.
pub fn import_loop(source: &mut impl SubimageSource, info: TexelInfo, res: Res) -> Result<LoopPtex> {
	LogRes::from_res(res.u, res.v)?;
	let mut buf = source.read_subimage()?;
	if buf.texel_info() != info {
		return Err(PtexError::TexelInfoMismatch {
			expected: info,
			got: buf.texel_info(),
		});
	}
	buf.flip_vertical();
	LoopPtex::from_buf(buf)
}

/// Split the selected quad subimage into its four loop rasters.
///
/// Each loop gets half the face resolution per axis, never below one texel;
/// odd loops are transposed.
pub fn import_quad(source: &mut impl SubimageSource, info: TexelInfo, res: Res) -> Result<[LoopPtex; 4]> {
	let half = LogRes::from_res(res.u, res.v)?.halved();
	let full = source.read_subimage()?;
	if full.texel_info() != info {
		return Err(PtexError::TexelInfoMismatch {
			expected: info,
			got: full.texel_info(),
		});
	}

	let mut loops = [
		LoopPtex::new(info, half)?,
		LoopPtex::new(info, half.transposed())?,
		LoopPtex::new(info, half)?,
		LoopPtex::new(info, half.transposed())?,
	];
	let [l0, l1, l2, l3] = &mut loops;
	ImageBuf::quad_split(&full, [l0.buf_mut(), l1.buf_mut(), l2.buf_mut(), l3.buf_mut()])?;
	Ok(loops)
}

/// Build a layer named `name` from every subimage of `source`.
///
/// Quads consume one subimage for all four loops; other polygons consume one
/// subimage per loop.
pub fn import(mesh: &Mesh, source: &mut impl SubimageSource, name: &str) -> Result<PtexLayer> {
	let info = source.texel_info();
	let mut loops = Vec::with_capacity(mesh.num_loops());
	let mut face_id = 0_usize;

	for poly in mesh.polys() {
		if poly.loop_count == 4 {
			let res = source.seek_subimage(face_id)?;
			loops.extend(import_quad(source, info, res)?);
			face_id += 1;
			continue;
		}
		for _ in 0..poly.loop_count {
			let res = source.seek_subimage(face_id)?;
			loops.push(import_loop(source, info, res)?);
			face_id += 1;
		}
	}

	if face_id != source.num_subimages() {
		log::warn!("layer {name}: mesh used {face_id} of {} subimages", source.num_subimages());
	}
	log::info!("imported layer {name}: {} loops from {face_id} subimages", loops.len());
	PtexLayer::from_loops(name, mesh, info, loops)
}

/// Import a `.ptxa` file; the layer is named after the file stem.
pub fn import_file(mesh: &Mesh, path: impl AsRef<Path>) -> Result<PtexLayer> {
	let path = path.as_ref();
	let mut reader = ArchiveReader::open(path)?;
	let name = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
	import(mesh, &mut reader, &name)
}

/// Write a layer as subimages, undoing what [`import`] does.
pub fn export(mesh: &Mesh, layer: &PtexLayer, sink: &mut impl SubimageSink) -> Result<()> {
	let loops = layer.loops();
	if loops.len() != mesh.num_loops() {
		return Err(PtexError::LoopCountMismatch {
			expected: mesh.num_loops(),
			got: loops.len(),
		});
	}

	for (poly_index, poly) in mesh.polys().iter().enumerate() {
		let start = poly.loop_start as usize;
		let poly_loops = &loops[start..start + poly.loop_count as usize];
		if let [l0, l1, l2, l3] = poly_loops {
			let logres = l0.logres();
			let consistent = l2.logres() == logres && l1.logres() == logres.transposed() && l3.logres() == logres.transposed();
			if !consistent {
				return Err(PtexError::QuadResolutionMismatch { poly: poly_index });
			}
			let merged = ImageBuf::quad_merge([l0.buf(), l1.buf(), l2.buf(), l3.buf()])?;
			sink.write_subimage(&merged)?;
			continue;
		}
		for raster in poly_loops {
			let mut buf = raster.buf().clone();
			buf.flip_vertical();
			sink.write_subimage(&buf)?;
		}
	}
	Ok(())
}

/// Export a layer to a `.ptxa` file.
pub fn export_file(mesh: &Mesh, layer: &PtexLayer, path: impl AsRef<Path>, options: &ExportOptions) -> Result<()> {
	let mut writer = ArchiveWriter::new(layer.texel_info());
	export(mesh, layer, &mut writer)?;
	writer.write_to(path, options.compression())
}
