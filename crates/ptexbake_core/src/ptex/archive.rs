use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::ptex::bytes::Cursor;
use crate::ptex::compression::MAX_DECOMPRESSED_BYTES;
use crate::ptex::{Compression, DataType, ImageBuf, PtexError, Res, Result, TexelData, TexelInfo};

const ARCHIVE_MAGIC: [u8; 4] = *b"PTXA";
const ARCHIVE_VERSION: u16 = 1;

/// Reader side of a multi-subimage texture file.
pub trait SubimageSource {
	/// Texel layout shared by every subimage.
	fn texel_info(&self) -> TexelInfo;

	/// Number of subimages.
	fn num_subimages(&self) -> usize;

	/// Select subimage `index` and return its resolution.
	fn seek_subimage(&mut self, index: usize) -> Result<Res>;

	/// Read the selected subimage in stored row order.
	fn read_subimage(&mut self) -> Result<ImageBuf>;
}

/// Writer side of a multi-subimage texture file.
pub trait SubimageSink {
	/// Append one subimage; rows are taken in buffer order.
	fn write_subimage(&mut self, buf: &ImageBuf) -> Result<()>;
}

/// Parsed `.ptxa` header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveHeader {
	/// Format version.
	pub version: u16,
	/// Texel layout of every face.
	pub texel_info: TexelInfo,
	/// Number of face subimages.
	pub num_faces: u32,
	/// Outer stream compression.
	pub compression: Compression,
}

/// One face entry of the archive table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveFace {
	/// Width in texels.
	pub width: u32,
	/// Height in texels.
	pub height: u32,
	/// Byte offset of the texels in the decoded stream.
	#[serde(skip)]
	offset: usize,
}

/// In-memory `.ptxa` archive.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
	header: ArchiveHeader,
	faces: Vec<ArchiveFace>,
	bytes: Vec<u8>,
	current: Option<usize>,
}

impl ArchiveReader {
	/// Read and parse an archive file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_bytes(fs::read(path)?)
	}

	/// Parse archive bytes, zstd-compressed or raw.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let compression = Compression::sniff(&raw);
		if compression == Compression::None && !raw.starts_with(&ARCHIVE_MAGIC) {
			return Err(PtexError::UnknownMagic { magic: leading_magic(&raw) });
		}
		let bytes = compression.unpack(raw, MAX_DECOMPRESSED_BYTES)?;
		if !bytes.starts_with(&ARCHIVE_MAGIC) {
			return Err(PtexError::NotArchiveAfterDecompress);
		}
		let mut cursor = Cursor::new(&bytes);
		cursor.read_array::<4>()?;
		let version = cursor.read_u16_le()?;
		if version != ARCHIVE_VERSION {
			return Err(PtexError::UnsupportedArchiveVersion { version });
		}
		let data_type = DataType::from_tag(cursor.read_u8()?)?;
		let channels = cursor.read_u8()?;
		if channels == 0 {
			return Err(PtexError::InvalidChannelCount { channels });
		}
		let texel_info = TexelInfo::new(data_type, channels)?;
		let num_faces = cursor.read_u32_le()?;

		let mut faces = Vec::with_capacity((num_faces as usize).min(cursor.remaining() / 8));
		for _ in 0..num_faces {
			let width = cursor.read_u32_le()?;
			let height = cursor.read_u32_le()?;
			let len = u64::from(width) * u64::from(height) * texel_info.bytes_per_texel() as u64;
			let offset = cursor.pos();
			let len = usize::try_from(len).map_err(|_| PtexError::UnexpectedEof {
				at: offset,
				need: usize::MAX,
				rem: cursor.remaining(),
			})?;
			cursor.read_exact(len)?;
			faces.push(ArchiveFace { width, height, offset });
		}

		let header = ArchiveHeader {
			version,
			texel_info,
			num_faces,
			compression,
		};
		log::debug!("opened ptxa archive: {} faces of {texel_info}, {} compression", faces.len(), compression.as_str());
		Ok(Self {
			header,
			faces,
			bytes,
			current: None,
		})
	}

	/// Parsed header.
	pub fn header(&self) -> &ArchiveHeader {
		&self.header
	}

	/// Face table in file order.
	pub fn faces(&self) -> &[ArchiveFace] {
		&self.faces
	}
}

impl SubimageSource for ArchiveReader {
	fn texel_info(&self) -> TexelInfo {
		self.header.texel_info
	}

	fn num_subimages(&self) -> usize {
		self.faces.len()
	}

	fn seek_subimage(&mut self, index: usize) -> Result<Res> {
		let face = self.faces.get(index).ok_or(PtexError::SubimageOutOfRange {
			index,
			count: self.faces.len(),
		})?;
		self.current = Some(index);
		Ok(Res {
			u: face.width,
			v: face.height,
		})
	}

	fn read_subimage(&mut self) -> Result<ImageBuf> {
		let face = self.current.map(|index| self.faces[index]).ok_or(PtexError::NoSubimageSelected)?;
		let info = self.header.texel_info;
		let values = face.width as usize * face.height as usize * usize::from(info.num_channels());
		let raw = &self.bytes[face.offset..face.offset + values * info.data_type().num_bytes()];
		let data = match info.data_type() {
			DataType::U8 => TexelData::U8(raw.to_vec()),
			DataType::F32 => TexelData::F32(raw.chunks_exact(4).map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])).collect()),
		};
		ImageBuf::from_data(face.width, face.height, info.num_channels(), data)
	}
}

/// Accumulates subimages and serializes them as a `.ptxa` archive.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
	texel_info: TexelInfo,
	num_faces: u32,
	body: Vec<u8>,
}

impl ArchiveWriter {
	/// Empty archive for subimages of `texel_info`.
	pub fn new(texel_info: TexelInfo) -> Self {
		Self {
			texel_info,
			num_faces: 0,
			body: Vec::new(),
		}
	}

	/// Number of subimages written so far.
	pub fn num_faces(&self) -> u32 {
		self.num_faces
	}

	/// Serialize header and faces, then apply `compression`.
	pub fn to_bytes(&self, compression: Compression) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(12 + self.body.len());
		out.extend_from_slice(&ARCHIVE_MAGIC);
		out.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
		out.push(self.texel_info.data_type().tag());
		out.push(self.texel_info.num_channels());
		out.extend_from_slice(&self.num_faces.to_le_bytes());
		out.extend_from_slice(&self.body);
		compression.pack(out)
	}

	/// Serialize to `path`.
	pub fn write_to(&self, path: impl AsRef<Path>, compression: Compression) -> Result<()> {
		let bytes = self.to_bytes(compression)?;
		fs::write(path.as_ref(), &bytes)?;
		log::info!("wrote {} ({} faces, {} bytes, {})", path.as_ref().display(), self.num_faces, bytes.len(), compression.as_str());
		Ok(())
	}
}

impl SubimageSink for ArchiveWriter {
	fn write_subimage(&mut self, buf: &ImageBuf) -> Result<()> {
		if buf.texel_info() != self.texel_info {
			return Err(PtexError::TexelInfoMismatch {
				expected: self.texel_info,
				got: buf.texel_info(),
			});
		}
		self.body.extend_from_slice(&buf.width().to_le_bytes());
		self.body.extend_from_slice(&buf.height().to_le_bytes());
		match buf.data() {
			TexelData::U8(values) => self.body.extend_from_slice(values),
			TexelData::F32(values) => {
				for value in values {
					self.body.extend_from_slice(&value.to_le_bytes());
				}
			}
		}
		self.num_faces += 1;
		Ok(())
	}
}

/// First four bytes of `raw`, zero padded when shorter.
fn leading_magic(raw: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	for (dst, src) in magic.iter_mut().zip(raw) {
		*dst = *src;
	}
	magic
}

#[cfg(test)]
mod tests;
