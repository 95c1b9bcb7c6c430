use std::path::PathBuf;

use ptexbake::ptex::{FilterReport, PackOptions, PackedRegion, Result, import_file, pack_loops};

use crate::cmd::util::{emit_json, load_mesh};

#[derive(clap::Args)]
pub struct Args {
	pub mesh: PathBuf,
	pub path: PathBuf,
	/// Save the packed atlas (PNG for 8-bit layers, OpenEXR for float).
	#[arg(long)]
	pub atlas: Option<PathBuf>,
	#[arg(long)]
	pub no_filter: bool,
	#[arg(long, default_value_t = PackOptions::default().max_atlas_side)]
	pub max_side: u32,
	#[arg(long)]
	pub json: bool,
}

/// Pack a layer into one atlas and report the regions and filter counters.
pub fn run(args: Args) -> Result<()> {
	let Args {
		mesh: mesh_path,
		path,
		atlas: atlas_path,
		no_filter,
		max_side,
		json,
	} = args;

	let mesh = load_mesh(&mesh_path)?;
	let layer = import_file(&mesh, &path)?;
	let options = PackOptions {
		max_atlas_side: max_side,
		filter_borders: !no_filter,
	};
	let packed = pack_loops(&mesh, layer.loops(), &options)?;
	let atlas = &packed.atlas;

	if let Some(atlas_path) = &atlas_path {
		atlas.save(atlas_path)?;
	}

	if json {
		let payload = PackJson {
			path: path.display().to_string(),
			layer: layer.name().to_owned(),
			texel: layer.texel_info().to_string(),
			width: atlas.width(),
			height: atlas.height(),
			regions: atlas.regions().to_vec(),
			filter: packed.filter,
			atlas: atlas_path.map(|item| item.display().to_string()),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("layer: {}", layer.name());
	println!("texel: {}", layer.texel_info());
	println!("atlas: {}x{}", atlas.width(), atlas.height());
	match packed.filter {
		Some(report) => println!(
			"filter: loops={} self_blends={} inconsistent_winding={}",
			report.loops, report.self_blends, report.inconsistent_winding
		),
		None => println!("filter: skipped"),
	}
	if let Some(atlas_path) = &atlas_path {
		println!("saved: {}", atlas_path.display());
	}
	println!();
	println!("loop\tx\ty\twidth\theight");
	for (index, region) in atlas.regions().iter().enumerate() {
		println!("{index}\t{}\t{}\t{}\t{}", region.x, region.y, region.width, region.height);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct PackJson {
	path: String,
	layer: String,
	texel: String,
	width: u32,
	height: u32,
	regions: Vec<PackedRegion>,
	#[serde(skip_serializing_if = "Option::is_none")]
	filter: Option<FilterReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	atlas: Option<String>,
}
