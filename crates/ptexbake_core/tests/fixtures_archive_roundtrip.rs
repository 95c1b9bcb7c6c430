#![allow(missing_docs)]

use ptexbake::ptex::{
	ArchiveReader, Compression, DataType, ExportOptions, LogRes, Mesh, MeshDesc, PtexError, PtexLayer, SubimageSource, TexelInfo, export_file,
	import_file,
};
use ptexbake_testkit::{fixture_path, scratch_dir};

fn quad_tri() -> Mesh {
	let desc = MeshDesc::load(fixture_path("quad_tri.json")).expect("fixture loads");
	Mesh::from_desc(&desc).expect("mesh builds")
}

#[test]
fn exported_file_imports_back() {
	let mesh = quad_tri();
	let dir = scratch_dir("archive_roundtrip");

	for (info, compress) in [
		(TexelInfo::new(DataType::U8, 4).expect("info"), false),
		(TexelInfo::new(DataType::F32, 1).expect("info"), true),
	] {
		let mut layer = PtexLayer::new("bake", &mesh, info, LogRes::new(3, 3).expect("logres")).expect("layer");
		layer.fill_pattern();
		let path = dir.join(format!("bake_{}.ptxa", info.data_type().as_str()));
		export_file(&mesh, &layer, &path, &ExportOptions { compress }).expect("export succeeds");

		let reader = ArchiveReader::open(&path).expect("archive opens");
		let expected = if compress { Compression::Zstd } else { Compression::None };
		assert_eq!(reader.header().compression, expected);
		// One subimage for the quad, three for the triangle.
		assert_eq!(reader.num_subimages(), 4);
		assert_eq!((reader.faces()[0].width, reader.faces()[0].height), (16, 16));

		let imported = import_file(&mesh, &path).expect("import succeeds");
		assert_eq!(imported.name(), format!("bake_{}", info.data_type().as_str()));
		assert_eq!(imported.loops(), layer.loops());
	}
}

#[test]
fn missing_archive_reports_io_error() {
	let mesh = quad_tri();
	let path = scratch_dir("archive_missing").join("absent.ptxa");
	let err = import_file(&mesh, &path).expect_err("file is absent");
	assert!(matches!(err, PtexError::Io(_)), "unexpected error: {err}");
}
