use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use imgref::Img;

use crate::ptex::{DataType, PackedRegion, PtexError, Result, TexelInfo, u8_to_unit_float, unit_float_to_u8};

/// Channel values of a buffer, stored in their native type.
#[derive(Debug, Clone, PartialEq)]
pub enum TexelData {
	/// 8-bit channels.
	U8(Vec<u8>),
	/// 32-bit float channels.
	F32(Vec<f32>),
}

impl TexelData {
	/// Zero-filled storage for `len` channel values.
	pub fn zeroed(data_type: DataType, len: usize) -> Self {
		match data_type {
			DataType::U8 => Self::U8(vec![0; len]),
			DataType::F32 => Self::F32(vec![0.0; len]),
		}
	}

	/// Channel storage type.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::U8(_) => DataType::U8,
			Self::F32(_) => DataType::F32,
		}
	}

	/// Number of channel values.
	pub fn len(&self) -> usize {
		match self {
			Self::U8(values) => values.len(),
			Self::F32(values) => values.len(),
		}
	}

	/// Whether no values are stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Raw byte view.
	pub fn as_bytes(&self) -> &[u8] {
		match self {
			Self::U8(values) => values,
			Self::F32(values) => bytemuck::cast_slice(values),
		}
	}

	/// Mutable raw byte view.
	pub fn as_bytes_mut(&mut self) -> &mut [u8] {
		match self {
			Self::U8(values) => values,
			Self::F32(values) => bytemuck::cast_slice_mut(values),
		}
	}

	/// Value at `index` as a unit float (`u8` is divided by 255).
	pub fn get(&self, index: usize) -> f32 {
		match self {
			Self::U8(values) => u8_to_unit_float(values[index]),
			Self::F32(values) => values[index],
		}
	}

	/// Store a unit float at `index`, quantizing for `u8`.
	pub fn set(&mut self, index: usize, value: f32) {
		match self {
			Self::U8(values) => values[index] = unit_float_to_u8(value),
			Self::F32(values) => values[index] = value,
		}
	}
}

/// Owned width × height raster of interleaved channels.
///
/// Row 0 is the bottom row (`v = 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuf {
	width: u32,
	height: u32,
	num_channels: u8,
	data: TexelData,
}

impl ImageBuf {
	/// Zero-filled buffer.
	pub fn new(width: u32, height: u32, info: TexelInfo) -> Result<Self> {
		if info.num_channels() == 0 {
			return Err(PtexError::InvalidChannelCount { channels: 0 });
		}
		let len = width as usize * height as usize * usize::from(info.num_channels());
		Ok(Self {
			width,
			height,
			num_channels: info.num_channels(),
			data: TexelData::zeroed(info.data_type(), len),
		})
	}

	/// Wrap existing storage, validating its length.
	pub fn from_data(width: u32, height: u32, num_channels: u8, data: TexelData) -> Result<Self> {
		TexelInfo::new(data.data_type(), num_channels)?;
		if num_channels == 0 {
			return Err(PtexError::InvalidChannelCount { channels: 0 });
		}
		let expected = width as usize * height as usize * usize::from(num_channels);
		if data.len() != expected {
			return Err(PtexError::BufferSizeMismatch { expected, got: data.len() });
		}
		Ok(Self {
			width,
			height,
			num_channels,
			data,
		})
	}

	/// Width in texels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in texels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Channels per texel.
	pub fn num_channels(&self) -> u8 {
		self.num_channels
	}

	/// Channel storage type.
	pub fn data_type(&self) -> DataType {
		self.data.data_type()
	}

	/// Texel layout of this buffer.
	pub fn texel_info(&self) -> TexelInfo {
		TexelInfo::new(self.data_type(), self.num_channels).expect("buffer channel count validated at construction")
	}

	/// Borrow channel storage.
	pub fn data(&self) -> &TexelData {
		&self.data
	}

	/// Raw bytes, row-major from the bottom row.
	pub fn as_bytes(&self) -> &[u8] {
		self.data.as_bytes()
	}

	/// Consume the buffer and return its storage.
	pub fn into_data(self) -> TexelData {
		self.data
	}

	/// Full-buffer rectangle.
	pub fn bounds(&self) -> PackedRegion {
		PackedRegion {
			x: 0,
			y: 0,
			width: self.width,
			height: self.height,
		}
	}

	fn index(&self, x: u32, y: u32, channel: usize) -> usize {
		debug_assert!(x < self.width && y < self.height, "texel ({x}, {y}) outside {}x{}", self.width, self.height);
		(y as usize * self.width as usize + x as usize) * usize::from(self.num_channels) + channel
	}

	/// One channel at `(x, y)` as a unit float.
	pub fn channel(&self, x: u32, y: u32, channel: usize) -> f32 {
		self.data.get(self.index(x, y, channel))
	}

	/// Store one channel at `(x, y)`.
	pub fn set_channel(&mut self, x: u32, y: u32, channel: usize, value: f32) {
		let index = self.index(x, y, channel);
		self.data.set(index, value);
	}

	/// All channels of one texel as unit floats.
	pub fn texel(&self, x: u32, y: u32) -> Vec<f32> {
		(0..usize::from(self.num_channels)).map(|channel| self.channel(x, y, channel)).collect()
	}

	/// Fill every texel with `pixel`, converting it once.
	pub fn fill(&mut self, pixel: &[f32]) -> Result<()> {
		let channels = usize::from(self.num_channels);
		if pixel.len() < channels {
			return Err(PtexError::PixelTooShort {
				need: channels,
				have: pixel.len(),
			});
		}
		if self.data.is_empty() {
			return Ok(());
		}

		for (channel, value) in pixel.iter().take(channels).enumerate() {
			self.data.set(channel, *value);
		}

		let bytes_per_texel = self.texel_info().bytes_per_texel();
		let (first, rest) = self.data.as_bytes_mut().split_at_mut(bytes_per_texel);
		for texel in rest.chunks_exact_mut(bytes_per_texel) {
			texel.copy_from_slice(first);
		}
		Ok(())
	}

	/// Set channel 3 of every texel; no-op for buffers without alpha.
	pub fn fill_alpha(&mut self, value: f32) {
		if self.num_channels < 4 {
			return;
		}
		let stride = usize::from(self.num_channels);
		for index in (3..self.data.len()).step_by(stride) {
			self.data.set(index, value);
		}
	}

	/// Copy all of `src` into this buffer with its origin at `(x, y)`.
	pub fn copy_pixels(&mut self, src: &ImageBuf, x: u32, y: u32) -> Result<()> {
		self.copy_pixels_partial(src, x, y, src.bounds())
	}

	/// Copy `src_rect` of `src` into this buffer with its origin at `(dst_x, dst_y)`.
	///
	/// Both buffers must share a data type. When channel counts differ only the
	/// common leading channels are copied.
	pub fn copy_pixels_partial(&mut self, src: &ImageBuf, dst_x: u32, dst_y: u32, src_rect: PackedRegion) -> Result<()> {
		if src.data_type() != self.data_type() {
			return Err(PtexError::TexelInfoMismatch {
				expected: self.texel_info(),
				got: src.texel_info(),
			});
		}
		src.check_region(src_rect)?;
		self.check_region(PackedRegion {
			x: dst_x,
			y: dst_y,
			width: src_rect.width,
			height: src_rect.height,
		})?;
		if src_rect.width == 0 || src_rect.height == 0 {
			return Ok(());
		}

		if src.num_channels == self.num_channels {
			let texel_bytes = self.texel_info().bytes_per_texel();
			let src_row = src.width as usize * texel_bytes;
			let dst_row = self.width as usize * texel_bytes;
			let src_img = Img::new(src.as_bytes(), src_row, src.height as usize);
			let src_sub = src_img.sub_image(
				src_rect.x as usize * texel_bytes,
				src_rect.y as usize,
				src_rect.width as usize * texel_bytes,
				src_rect.height as usize,
			);
			let height = self.height as usize;
			let mut dst_img = Img::new(self.data.as_bytes_mut(), dst_row, height);
			let mut dst_sub = dst_img.sub_image_mut(
				dst_x as usize * texel_bytes,
				dst_y as usize,
				src_rect.width as usize * texel_bytes,
				src_rect.height as usize,
			);
			for (dst, src) in dst_sub.rows_mut().zip(src_sub.rows()) {
				dst.copy_from_slice(src);
			}
			return Ok(());
		}

		let common = usize::from(src.num_channels.min(self.num_channels));
		for row in 0..src_rect.height {
			for col in 0..src_rect.width {
				for channel in 0..common {
					let value = src.channel(src_rect.x + col, src_rect.y + row, channel);
					self.set_channel(dst_x + col, dst_y + row, channel, value);
				}
			}
		}
		Ok(())
	}

	/// Resample `src` into this buffer's resolution.
	///
	/// Equal resolutions copy exactly. Float channels are resampled through an
	/// affine normalization so values outside `[0, 1]` survive the filter.
	pub fn resize_from(&mut self, src: &ImageBuf) -> Result<()> {
		if src.texel_info() != self.texel_info() {
			return Err(PtexError::TexelInfoMismatch {
				expected: self.texel_info(),
				got: src.texel_info(),
			});
		}
		if src.width == self.width && src.height == self.height {
			self.data = src.data.clone();
			return Ok(());
		}

		let channels = usize::from(self.num_channels);
		let (src_w, src_h) = (src.width, src.height);
		let (dst_w, dst_h) = (self.width, self.height);
		for channel in 0..channels {
			match (&src.data, &mut self.data) {
				(TexelData::U8(from), TexelData::U8(to)) => {
					let plane = ImageBuffer::from_fn(src_w, src_h, |x, y| Luma([from[plane_index(src_w, channels, x, y, channel)]]));
					let resized = imageops::resize(&plane, dst_w, dst_h, FilterType::Triangle);
					for (x, y, pixel) in resized.enumerate_pixels() {
						to[plane_index(dst_w, channels, x, y, channel)] = pixel[0];
					}
				}
				(TexelData::F32(from), TexelData::F32(to)) => {
					let (lo, hi) = (0..(src_w * src_h) as usize)
						.map(|texel| from[texel * channels + channel])
						.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), value| (lo.min(value), hi.max(value)));
					let span = hi - lo;
					if span.is_nan() || span <= 0.0 {
						for texel in 0..(dst_w * dst_h) as usize {
							to[texel * channels + channel] = lo;
						}
						continue;
					}
					let plane: ImageBuffer<Luma<f32>, Vec<f32>> =
						ImageBuffer::from_fn(src_w, src_h, |x, y| Luma([(from[plane_index(src_w, channels, x, y, channel)] - lo) / span]));
					let resized = imageops::resize(&plane, dst_w, dst_h, FilterType::Triangle);
					for (x, y, pixel) in resized.enumerate_pixels() {
						to[plane_index(dst_w, channels, x, y, channel)] = pixel[0] * span + lo;
					}
				}
				_ => unreachable!("texel info compared above"),
			}
		}
		Ok(())
	}

	/// Orientation normalization applied to imported per-loop subimages.
	///
	/// Archives store the top row first; buffers store the bottom row first.
	/// The transform is its own inverse.
	pub fn flip_vertical(&mut self) {
		let row = self.width as usize * self.texel_info().bytes_per_texel();
		let height = self.height as usize;
		let bytes = self.data.as_bytes_mut();
		for y in 0..height / 2 {
			let (lower, upper) = bytes.split_at_mut((height - 1 - y) * row);
			lower[y * row..(y + 1) * row].swap_with_slice(&mut upper[..row]);
		}
	}

	/// Split one quad face raster into its four corner sub-rasters.
	///
	/// `dst[0]` and `dst[2]` must be `(w, h)` and `dst[1]`, `dst[3]` the
	/// transposed `(h, w)`, with `w`, `h` at most the source sides. Each
	/// sub-raster has its origin at the quad centre, its top row on quad edge
	/// `i`, and its right column on quad edge `i - 1`.
	pub fn quad_split(src: &ImageBuf, dst: [&mut ImageBuf; 4]) -> Result<()> {
		let (half_w, half_h) = (dst[0].width, dst[0].height);
		if half_w == 0 || half_h == 0 {
			return Err(PtexError::QuadLayoutMismatch { index: 0 });
		}
		let layout = QuadLayout::new(src.width, src.height, half_w, half_h);
		for (index, sub) in dst.into_iter().enumerate() {
			if sub.texel_info() != src.texel_info() || (sub.width, sub.height) != layout.sub_size(index) {
				return Err(PtexError::QuadLayoutMismatch { index });
			}
			for y in 0..sub.height {
				for x in 0..sub.width {
					let (fx, fy) = layout.full_coord(index, x, y);
					for channel in 0..usize::from(sub.num_channels) {
						sub.set_channel(x, y, channel, src.channel(fx, fy, channel));
					}
				}
			}
		}
		Ok(())
	}

	/// Inverse of [`ImageBuf::quad_split`]: assemble a `2w × 2h` quad raster.
	pub fn quad_merge(src: [&ImageBuf; 4]) -> Result<ImageBuf> {
		let (half_w, half_h) = (src[0].width, src[0].height);
		let info = src[0].texel_info();
		let mut full = ImageBuf::new(half_w * 2, half_h * 2, info)?;
		let layout = QuadLayout::new(full.width, full.height, half_w, half_h);
		for (index, sub) in src.into_iter().enumerate() {
			if sub.texel_info() != info || (sub.width, sub.height) != layout.sub_size(index) {
				return Err(PtexError::QuadLayoutMismatch { index });
			}
			for y in 0..sub.height {
				for x in 0..sub.width {
					let (fx, fy) = layout.full_coord(index, x, y);
					for channel in 0..usize::from(sub.num_channels) {
						full.set_channel(fx, fy, channel, sub.channel(x, y, channel));
					}
				}
			}
		}
		Ok(full)
	}

	pub(crate) fn check_region(&self, region: PackedRegion) -> Result<()> {
		let fits_x = u64::from(region.x) + u64::from(region.width) <= u64::from(self.width);
		let fits_y = u64::from(region.y) + u64::from(region.height) <= u64::from(self.height);
		if fits_x && fits_y {
			return Ok(());
		}
		Err(PtexError::RegionOutOfBounds {
			x: region.x,
			y: region.y,
			width: region.width,
			height: region.height,
			image_width: self.width,
			image_height: self.height,
		})
	}
}

fn plane_index(width: u32, channels: usize, x: u32, y: u32, channel: usize) -> usize {
	(y as usize * width as usize + x as usize) * channels + channel
}

#[derive(Debug, Clone, Copy)]
struct QuadLayout {
	full_w: u32,
	full_h: u32,
	half_w: u32,
	half_h: u32,
}

impl QuadLayout {
	fn new(full_w: u32, full_h: u32, half_w: u32, half_h: u32) -> Self {
		Self {
			full_w,
			full_h,
			half_w,
			half_h,
		}
	}

	fn sub_size(self, index: usize) -> (u32, u32) {
		if index % 2 == 0 { (self.half_w, self.half_h) } else { (self.half_h, self.half_w) }
	}

	fn full_coord(self, index: usize, x: u32, y: u32) -> (u32, u32) {
		let far_x = self.full_w - self.half_w;
		let far_y = self.full_h - self.half_h;
		match index {
			0 => (self.half_w - 1 - x, self.half_h - 1 - y),
			1 => (far_x + y, self.half_h - 1 - x),
			2 => (far_x + x, far_y + y),
			_ => (self.half_w - 1 - y, far_y + x),
		}
	}
}
