use crate::ptex::{PtexError, Result};

/// Bounded little-endian cursor over an archive byte slice.
pub(crate) struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	pub(crate) fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	pub(crate) fn pos(&self) -> usize {
		self.pos
	}

	pub(crate) fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Borrow the next `n` bytes and advance past them.
	pub(crate) fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(PtexError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	pub(crate) fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	pub(crate) fn read_u16_le(&mut self) -> Result<u16> {
		self.read_array().map(u16::from_le_bytes)
	}

	pub(crate) fn read_u32_le(&mut self) -> Result<u32> {
		self.read_array().map(u32::from_le_bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::Cursor;
	use crate::ptex::PtexError;

	#[test]
	fn reads_little_endian_fields_in_order() {
		let bytes = [b'P', b'T', b'X', b'A', 0x01, 0x00, 0x07, 0x04, 0x03, 0x00, 0x00];
		let mut cursor = Cursor::new(&bytes);
		assert_eq!(&cursor.read_array::<4>().expect("magic"), b"PTXA");
		assert_eq!(cursor.read_u16_le().expect("u16"), 1);
		assert_eq!(cursor.read_u8().expect("u8"), 7);
		assert_eq!(cursor.pos(), 7);

		assert_eq!(cursor.read_u8().expect("u8"), 4);

		let err = cursor.read_u32_le().expect_err("only three bytes remain");
		assert!(matches!(err, PtexError::UnexpectedEof { at: 8, need: 4, rem: 3 }));
	}
}
