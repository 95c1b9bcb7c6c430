use crate::ptex::{
	ArchiveReader, ArchiveWriter, Compression, DataType, ImageBuf, PtexError, SubimageSink, SubimageSource, TexelData, TexelInfo,
};

fn float_face(width: u32, height: u32) -> ImageBuf {
	let values = (0..width * height * 2).map(|value| value as f32 * 0.75 - 3.0).collect();
	ImageBuf::from_data(width, height, 2, TexelData::F32(values)).expect("face")
}

#[test]
fn faces_survive_write_and_read() {
	let info = TexelInfo::new(DataType::F32, 2).expect("info");
	let faces = [float_face(4, 2), float_face(1, 1), float_face(8, 8)];
	let mut writer = ArchiveWriter::new(info);
	for face in &faces {
		writer.write_subimage(face).expect("write face");
	}

	for compression in [Compression::None, Compression::Zstd] {
		let bytes = writer.to_bytes(compression).expect("serialize");
		let mut reader = ArchiveReader::from_bytes(bytes).expect("parse");
		assert_eq!(reader.header().compression, compression);
		assert_eq!(reader.header().num_faces, 3);
		assert_eq!(reader.texel_info(), info);
		assert_eq!(reader.num_subimages(), 3);

		for (index, face) in faces.iter().enumerate() {
			let res = reader.seek_subimage(index).expect("seek");
			assert_eq!((res.u, res.v), (face.width(), face.height()));
			assert_eq!(&reader.read_subimage().expect("read"), face);
		}
	}
}

#[test]
fn header_layout_is_stable() {
	let info = TexelInfo::new(DataType::U8, 3).expect("info");
	let mut writer = ArchiveWriter::new(info);
	let face = ImageBuf::from_data(1, 1, 3, TexelData::U8(vec![9, 8, 7])).expect("face");
	writer.write_subimage(&face).expect("write face");

	let bytes = writer.to_bytes(Compression::None).expect("serialize");
	assert_eq!(bytes, [b'P', b'T', b'X', b'A', 1, 0, 0, 3, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 9, 8, 7]);
}

#[test]
fn reader_errors_are_reported() {
	let info = TexelInfo::new(DataType::U8, 1).expect("info");
	let mut writer = ArchiveWriter::new(info);
	writer
		.write_subimage(&ImageBuf::from_data(2, 2, 1, TexelData::U8(vec![1, 2, 3, 4])).expect("face"))
		.expect("write face");
	let bytes = writer.to_bytes(Compression::None).expect("serialize");

	let mut reader = ArchiveReader::from_bytes(bytes.clone()).expect("parse");
	assert!(matches!(reader.read_subimage(), Err(PtexError::NoSubimageSelected)));
	assert!(matches!(reader.seek_subimage(1), Err(PtexError::SubimageOutOfRange { index: 1, count: 1 })));

	let truncated = bytes[..bytes.len() - 1].to_vec();
	assert!(matches!(ArchiveReader::from_bytes(truncated), Err(PtexError::UnexpectedEof { .. })));

	let mut bad_version = bytes.clone();
	bad_version[4] = 9;
	assert!(matches!(ArchiveReader::from_bytes(bad_version), Err(PtexError::UnsupportedArchiveVersion { version: 9 })));

	let mut bad_type = bytes;
	bad_type[6] = 5;
	assert!(matches!(ArchiveReader::from_bytes(bad_type), Err(PtexError::UnsupportedDataType { tag: 5 })));
}

#[test]
fn writer_rejects_foreign_texel_layout() {
	let mut writer = ArchiveWriter::new(TexelInfo::new(DataType::U8, 4).expect("info"));
	let err = writer.write_subimage(&float_face(1, 1)).expect_err("layout mismatch");
	assert!(matches!(err, PtexError::TexelInfoMismatch { .. }));
	assert_eq!(writer.num_faces(), 0);
}

#[test]
fn foreign_streams_are_rejected_by_magic() {
	let err = ArchiveReader::from_bytes(b"BLENDER".to_vec()).expect_err("unknown magic");
	assert!(matches!(err, PtexError::UnknownMagic { magic } if &magic == b"BLEN"));

	let err = ArchiveReader::from_bytes(b"PT".to_vec()).expect_err("short stream");
	assert!(matches!(err, PtexError::UnknownMagic { magic } if magic == *b"PT\0\0"));

	let foreign = Compression::Zstd.pack(b"not an archive".to_vec()).expect("encode");
	assert!(matches!(ArchiveReader::from_bytes(foreign), Err(PtexError::NotArchiveAfterDecompress)));
}
