use std::fmt;

use serde::Serialize;

use crate::ptex::{PtexError, Result};

/// Storage type of one texel channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
	/// Unsigned 8-bit, normalized to `[0, 1]`.
	U8,
	/// 32-bit float.
	F32,
}

impl DataType {
	/// Size of one channel value in bytes.
	pub fn num_bytes(self) -> usize {
		match self {
			Self::U8 => 1,
			Self::F32 => 4,
		}
	}

	/// Stable on-disk tag.
	pub fn tag(self) -> u8 {
		match self {
			Self::U8 => 0,
			Self::F32 => 1,
		}
	}

	/// Decode an on-disk tag.
	pub fn from_tag(tag: u8) -> Result<Self> {
		match tag {
			0 => Ok(Self::U8),
			1 => Ok(Self::F32),
			_ => Err(PtexError::UnsupportedDataType { tag }),
		}
	}

	/// Render data type as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::U8 => "uint8",
			Self::F32 => "float32",
		}
	}
}

/// Per-texel layout: channel type and channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TexelInfo {
	data_type: DataType,
	num_channels: u8,
}

impl TexelInfo {
	/// Maximum number of channels per texel.
	pub const MAX_CHANNELS: u8 = 4;

	/// Build a texel layout, rejecting more than four channels.
	pub fn new(data_type: DataType, num_channels: u8) -> Result<Self> {
		if num_channels > Self::MAX_CHANNELS {
			return Err(PtexError::InvalidChannelCount { channels: num_channels });
		}
		Ok(Self { data_type, num_channels })
	}

	/// Channel storage type.
	pub fn data_type(self) -> DataType {
		self.data_type
	}

	/// Channels per texel.
	pub fn num_channels(self) -> u8 {
		self.num_channels
	}

	/// Bytes occupied by one texel.
	pub fn bytes_per_texel(self) -> usize {
		self.data_type.num_bytes() * usize::from(self.num_channels)
	}

	/// Same data type with a different channel count.
	pub fn with_channels(self, num_channels: u8) -> Result<Self> {
		Self::new(self.data_type, num_channels)
	}
}

impl fmt::Display for TexelInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}", self.data_type.as_str(), self.num_channels)
	}
}

/// Side lengths in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Res {
	/// Width.
	pub u: u32,
	/// Height.
	pub v: u32,
}

/// Base-2 logarithm of a raster's side lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LogRes {
	u: u8,
	v: u8,
}

impl LogRes {
	/// Largest accepted log2 side, about a billion texels per side.
	pub const LIMIT: u8 = 30;

	/// Build a log resolution, rejecting values above [`LogRes::LIMIT`].
	pub fn new(u: u8, v: u8) -> Result<Self> {
		if u > Self::LIMIT || v > Self::LIMIT {
			return Err(PtexError::InvalidLogRes {
				u: u32::from(u),
				v: u32::from(v),
			});
		}
		Ok(Self { u, v })
	}

	/// Derive log resolution from power-of-two side lengths.
	pub fn from_res(width: u32, height: u32) -> Result<Self> {
		if !width.is_power_of_two() || !height.is_power_of_two() {
			return Err(PtexError::NotPowerOfTwo { width, height });
		}
		let u = width.trailing_zeros();
		let v = height.trailing_zeros();
		if u > u32::from(Self::LIMIT) || v > u32::from(Self::LIMIT) {
			return Err(PtexError::InvalidLogRes { u, v });
		}
		Ok(Self { u: u as u8, v: v as u8 })
	}

	/// Log2 width.
	pub fn u(self) -> u8 {
		self.u
	}

	/// Log2 height.
	pub fn v(self) -> u8 {
		self.v
	}

	/// Actual side lengths.
	pub fn res(self) -> Res {
		Res { u: 1 << self.u, v: 1 << self.v }
	}

	/// Number of texels.
	pub fn area(self) -> usize {
		1_usize << (u32::from(self.u) + u32::from(self.v))
	}

	/// Swap the two axes.
	pub fn transposed(self) -> Self {
		Self { u: self.v, v: self.u }
	}

	/// Halve both sides, never going below one texel.
	pub fn halved(self) -> Self {
		Self {
			u: self.u.saturating_sub(1),
			v: self.v.saturating_sub(1),
		}
	}
}

/// Bytes needed for a raster of `logres` with layout `info`.
pub fn rect_num_bytes(info: TexelInfo, logres: LogRes) -> usize {
	info.bytes_per_texel() * logres.area()
}

/// Quantize a unit float to `u8` with round-to-nearest and clamping.
pub fn unit_float_to_u8(value: f32) -> u8 {
	if value.is_nan() || value <= 0.0 {
		0
	} else if value > 1.0 - 0.5 / 255.0 {
		255
	} else {
		(255.0 * value + 0.5) as u8
	}
}

/// Expand a `u8` channel to a unit float.
pub fn u8_to_unit_float(value: u8) -> f32 {
	f32::from(value) / 255.0
}
