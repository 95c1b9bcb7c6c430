use std::path::PathBuf;

use ptexbake::ptex::{ArchiveReader, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print archive header fields and per-face sizes.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let reader = ArchiveReader::open(&path)?;
	let header = reader.header();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			version: header.version,
			compression: header.compression.as_str().to_owned(),
			data_type: header.texel_info.data_type().as_str().to_owned(),
			channels: header.texel_info.num_channels(),
			num_faces: header.num_faces,
			faces: reader
				.faces()
				.iter()
				.map(|face| FaceJson {
					width: face.width,
					height: face.height,
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("version: {}", header.version);
	println!("compression: {}", header.compression.as_str());
	println!("texel: {}", header.texel_info);
	println!("faces: {}", header.num_faces);
	println!();
	println!("face\twidth\theight");
	for (index, face) in reader.faces().iter().enumerate() {
		println!("{index}\t{}\t{}", face.width, face.height);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	version: u16,
	compression: String,
	data_type: String,
	channels: u8,
	num_faces: u32,
	faces: Vec<FaceJson>,
}

#[derive(serde::Serialize)]
struct FaceJson {
	width: u32,
	height: u32,
}
