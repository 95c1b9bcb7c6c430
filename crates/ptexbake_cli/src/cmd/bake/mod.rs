use std::path::PathBuf;

use ptexbake::ptex::{DataType, ExportOptions, PtexLayer, Result, TexelInfo, export_file};

use crate::cmd::util::{load_mesh, square_logres};

#[derive(clap::Args)]
pub struct Args {
	pub mesh: PathBuf,
	#[arg(long)]
	pub out: PathBuf,
	/// Log2 side length of every loop raster.
	#[arg(long, default_value_t = 4)]
	pub res: u8,
	/// Store 32-bit float channels instead of 8-bit.
	#[arg(long)]
	pub float: bool,
	#[arg(long, default_value_t = 4)]
	pub channels: u8,
	#[arg(long)]
	pub compress: bool,
}

/// Fill a new layer with the debug pattern and export it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		mesh: mesh_path,
		out,
		res,
		float,
		channels,
		compress,
	} = args;

	let mesh = load_mesh(&mesh_path)?;
	let data_type = if float { DataType::F32 } else { DataType::U8 };
	let info = TexelInfo::new(data_type, channels)?;
	let name = out.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();

	let mut layer = PtexLayer::new(name, &mesh, info, square_logres(res)?)?;
	layer.fill_pattern();
	export_file(&mesh, &layer, &out, &ExportOptions { compress })?;

	println!("wrote {} ({} loops, {info})", out.display(), layer.loops().len());
	Ok(())
}
