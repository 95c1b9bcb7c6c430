use std::path::Path;

use image::{ImageFormat, Rgba32FImage, RgbaImage};

use crate::ptex::{
	FilterReport, ImageBuf, LoopPtex, Mesh, PackedLayout, PackedRegion, PtexError, Result, TexelData, TexelInfo, filter_borders,
};

/// Controls for [`pack_loops`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
	/// Largest atlas side the packer may grow to.
	pub max_atlas_side: u32,
	/// Run the border filter after copying rasters in.
	pub filter_borders: bool,
}

impl Default for PackOptions {
	fn default() -> Self {
		Self {
			max_atlas_side: 16384,
			filter_borders: true,
		}
	}
}

/// One shared RGBA buffer holding every loop raster of a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasImage {
	buf: ImageBuf,
	regions: Vec<PackedRegion>,
}

impl AtlasImage {
	/// Pair a buffer with its per-loop regions, checking every region fits.
	pub fn new(buf: ImageBuf, regions: Vec<PackedRegion>) -> Result<Self> {
		for region in &regions {
			buf.check_region(*region)?;
		}
		Ok(Self { buf, regions })
	}

	/// Shared texel buffer.
	pub fn buf(&self) -> &ImageBuf {
		&self.buf
	}

	/// Regions indexed by loop.
	pub fn regions(&self) -> &[PackedRegion] {
		&self.regions
	}

	/// Atlas width.
	pub fn width(&self) -> u32 {
		self.buf.width()
	}

	/// Atlas height.
	pub fn height(&self) -> u32 {
		self.buf.height()
	}

	/// Mutable buffer alongside the fixed regions.
	pub fn parts_mut(&mut self) -> (&mut ImageBuf, &[PackedRegion]) {
		(&mut self.buf, &self.regions)
	}

	/// Split into buffer and regions.
	pub fn into_parts(self) -> (ImageBuf, Vec<PackedRegion>) {
		(self.buf, self.regions)
	}

	/// Save as PNG (u8) or OpenEXR (f32), top row first.
	///
	/// Only four-channel atlases can be saved.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let info = self.buf.texel_info();
		if info.num_channels() != 4 {
			return Err(PtexError::TexelInfoMismatch {
				expected: info.with_channels(4)?,
				got: info,
			});
		}
		let mut buf = self.buf.clone();
		buf.flip_vertical();
		let (width, height) = (buf.width(), buf.height());
		let expected = width as usize * height as usize * 4;
		let path = path.as_ref();
		match buf.into_data() {
			TexelData::U8(values) => {
				let got = values.len();
				let image = RgbaImage::from_raw(width, height, values).ok_or(PtexError::BufferSizeMismatch { expected, got })?;
				image.save_with_format(path, ImageFormat::Png)?;
			}
			TexelData::F32(values) => {
				let got = values.len();
				let image = Rgba32FImage::from_raw(width, height, values).ok_or(PtexError::BufferSizeMismatch { expected, got })?;
				image.save_with_format(path, ImageFormat::OpenExr)?;
			}
		}
		log::info!("saved {width}x{height} {} atlas to {}", info.data_type().as_str(), path.display());
		Ok(())
	}
}

/// Packed atlas plus the filter pass summary, if one ran.
#[derive(Debug, Clone)]
pub struct PackResult {
	/// Packed atlas.
	pub atlas: AtlasImage,
	/// Border filter counters.
	pub filter: Option<FilterReport>,
}

/// Pack every loop raster of a layer into one RGBA atlas.
pub fn pack_loops(mesh: &Mesh, loops: &[LoopPtex], options: &PackOptions) -> Result<PackResult> {
	if loops.len() != mesh.num_loops() {
		return Err(PtexError::LoopCountMismatch {
			expected: mesh.num_loops(),
			got: loops.len(),
		});
	}
	let first = loops.first().ok_or(PtexError::EmptyLayout)?;
	let info = first.texel_info();
	for (loop_index, raster) in loops.iter().enumerate() {
		if raster.texel_info() != info {
			return Err(PtexError::MixedTexelInfo {
				loop_index,
				expected: info,
				got: raster.texel_info(),
			});
		}
	}

	let mut layout = PackedLayout::new(loops.len());
	for (id, raster) in loops.iter().enumerate() {
		let res = raster.res();
		layout.add(res.u, res.v, id)?;
	}
	let placement = layout.finalize(options.max_atlas_side)?;

	let rgba = TexelInfo::new(info.data_type(), 4)?;
	let mut buf = ImageBuf::new(placement.width, placement.height, rgba)?;
	for (raster, region) in loops.iter().zip(&placement.regions) {
		buf.copy_pixels(raster.buf(), region.x, region.y)?;
	}
	let mut atlas = AtlasImage::new(buf, placement.regions)?;

	let filter = if options.filter_borders {
		Some(filter_borders(&mut atlas, mesh)?)
	} else {
		None
	};
	if info.num_channels() < 4 {
		atlas.buf.fill_alpha(1.0);
	}

	log::info!("packed {} loop rasters ({info}) into {}x{} atlas", loops.len(), atlas.width(), atlas.height());
	Ok(PackResult { atlas, filter })
}

/// Copy each atlas region back into its loop raster.
pub fn update_from_image(loops: &mut [LoopPtex], atlas: &AtlasImage) -> Result<()> {
	if atlas.regions.len() != loops.len() {
		return Err(PtexError::LoopCountMismatch {
			expected: loops.len(),
			got: atlas.regions.len(),
		});
	}
	if let Some(raster) = loops.iter().find(|raster| raster.data_type() != atlas.buf.data_type()) {
		return Err(PtexError::TexelInfoMismatch {
			expected: raster.texel_info(),
			got: atlas.buf.texel_info(),
		});
	}
	for (loop_index, (raster, region)) in loops.iter().zip(&atlas.regions).enumerate() {
		let res = raster.res();
		if (region.width, region.height) != (res.u, res.v) {
			return Err(PtexError::RegionSizeMismatch {
				loop_index,
				region_width: region.width,
				region_height: region.height,
				width: res.u,
				height: res.v,
			});
		}
	}

	// Nothing is written until every region has been checked.
	for (loop_index, (raster, region)) in loops.iter_mut().zip(&atlas.regions).enumerate() {
		raster
			.buf_mut()
			.copy_pixels_partial(&atlas.buf, 0, 0, *region)
			.unwrap_or_else(|err| panic!("copy of validated region for loop {loop_index} failed: {err}"));
	}
	Ok(())
}
