use std::io::Read;

use crate::ptex::{PtexError, Result};

/// Upper bound on decompressed archive size.
pub const MAX_DECOMPRESSED_BYTES: usize = 1024 * 1024 * 1024;
/// zstd frame magic marking a compressed archive.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
const ZSTD_LEVEL: i32 = 3;

/// Compression mode of an archive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
	/// Raw archive bytes.
	None,
	/// Whole stream is one zstd frame.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}

	/// Mode a stream was written with, judged by its leading frame magic.
	pub fn sniff(raw: &[u8]) -> Self {
		if raw.starts_with(&ZSTD_MAGIC) { Self::Zstd } else { Self::None }
	}

	/// Wrap serialized archive bytes in this mode.
	pub(crate) fn pack(self, raw: Vec<u8>) -> Result<Vec<u8>> {
		match self {
			Self::None => Ok(raw),
			Self::Zstd => Ok(zstd::stream::encode_all(raw.as_slice(), ZSTD_LEVEL)?),
		}
	}

	/// Undo this mode, refusing output longer than `limit` bytes.
	pub(crate) fn unpack(self, raw: Vec<u8>, limit: usize) -> Result<Vec<u8>> {
		match self {
			Self::None => Ok(raw),
			Self::Zstd => {
				// One byte past the limit tells an exact fit from an overflow.
				let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
				let mut out = Vec::new();
				zstd::stream::read::Decoder::new(raw.as_slice())?.take(cap).read_to_end(&mut out)?;
				if out.len() > limit {
					return Err(PtexError::DecompressedTooLarge { limit });
				}
				Ok(out)
			}
		}
	}
}
