use crate::ptex::{DataType, ImageBuf, LogRes, PtexError, Res, Result, TexelData, TexelInfo, rect_num_bytes};

/// Colour new rasters are filled with.
pub const DEFAULT_PIXEL: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Texel raster attached to one mesh loop.
///
/// The raster origin sits at the polygon centre; see [`crate::ptex::Side`]
/// for how its sides map onto mesh edges.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopPtex {
	logres: LogRes,
	buf: ImageBuf,
}

impl LoopPtex {
	/// Allocate a raster of `logres` filled with [`DEFAULT_PIXEL`].
	pub fn new(info: TexelInfo, logres: LogRes) -> Result<Self> {
		if info.num_channels() == 0 {
			return Err(PtexError::InvalidChannelCount { channels: 0 });
		}
		let res = logres.res();
		let mut buf = ImageBuf::new(res.u, res.v, info)?;
		buf.fill(&DEFAULT_PIXEL)?;
		Ok(Self { logres, buf })
	}

	/// Adopt an existing buffer; its sides must be powers of two.
	pub fn from_buf(buf: ImageBuf) -> Result<Self> {
		let logres = LogRes::from_res(buf.width(), buf.height())?;
		Ok(Self { logres, buf })
	}

	/// Texel layout.
	pub fn texel_info(&self) -> TexelInfo {
		self.buf.texel_info()
	}

	/// Channel storage type.
	pub fn data_type(&self) -> DataType {
		self.buf.data_type()
	}

	/// Log2 resolution.
	pub fn logres(&self) -> LogRes {
		self.logres
	}

	/// Side lengths.
	pub fn res(&self) -> Res {
		self.logres.res()
	}

	/// Size of the texel storage in bytes.
	pub fn rect_num_bytes(&self) -> usize {
		rect_num_bytes(self.texel_info(), self.logres)
	}

	/// Raw texel bytes, bottom row first.
	pub fn bytes(&self) -> &[u8] {
		self.buf.as_bytes()
	}

	/// Borrow the texel buffer.
	pub fn buf(&self) -> &ImageBuf {
		&self.buf
	}

	/// Mutably borrow the texel buffer.
	pub fn buf_mut(&mut self) -> &mut ImageBuf {
		&mut self.buf
	}

	/// Consume the raster and return its buffer.
	pub fn into_buf(self) -> ImageBuf {
		self.buf
	}

	/// One texel as unit floats.
	pub fn texel(&self, x: u32, y: u32) -> Vec<f32> {
		self.buf.texel(x, y)
	}

	/// Fill every texel with `pixel`.
	pub fn fill(&mut self, pixel: &[f32]) -> Result<()> {
		self.buf.fill(pixel)
	}

	/// Debug pattern: a u/v gradient tinted by `index`.
	///
	/// Indices 0 to 3 are solid red, green, blue and yellow. The `u = 0` column
	/// lifts zero channels by half and the origin texel is white, which makes
	/// raster orientation visible in a packed atlas.
	pub fn fill_pattern(&mut self, index: usize) {
		let Res { u: u_res, v: v_res } = self.res();
		let channels = usize::from(self.buf.num_channels());
		let tint = match index {
			0 => Some([1.0, 0.0, 0.0]),
			1 => Some([0.0, 1.0, 0.0]),
			2 => Some([0.0, 0.0, 1.0]),
			3 => Some([1.0, 1.0, 0.0]),
			_ => None,
		};

		for y in 0..v_res {
			for x in 0..u_res {
				let u = unit_coord(x, u_res);
				let v = unit_coord(y, v_res);
				let mut rgba = match tint {
					Some([r, g, b]) => [r, g, b, 1.0],
					None => [u, v, index as f32 / 2.0, 1.0],
				};
				if x == 0 && y == 0 {
					rgba = [1.0; 4];
				} else if x == 0 {
					for value in rgba.iter_mut().take(3) {
						if *value == 0.0 {
							*value += 0.5;
						}
					}
				}
				for (channel, value) in rgba.iter().take(channels).enumerate() {
					self.buf.set_channel(x, y, channel, *value);
				}
			}
		}
	}

	/// Resample to `logres`. On failure the raster is left untouched.
	pub fn resize(&mut self, logres: LogRes) -> Result<()> {
		if logres == self.logres {
			return Ok(());
		}
		let res = logres.res();
		let mut resized = ImageBuf::new(res.u, res.v, self.texel_info())?;
		resized.resize_from(&self.buf)?;
		log::trace!("resized loop raster {}x{} -> {}x{}", self.buf.width(), self.buf.height(), res.u, res.v);
		self.buf = resized;
		self.logres = logres;
		Ok(())
	}

	/// Storage of this raster.
	pub fn data(&self) -> &TexelData {
		self.buf.data()
	}
}

fn unit_coord(index: u32, res: u32) -> f32 {
	if res <= 1 { 0.0 } else { index as f32 / (res - 1) as f32 }
}
