use std::path::PathBuf;

use ptexbake::ptex::{ExportOptions, Result, export_file, import_file};

use crate::cmd::util::{load_mesh, square_logres};

#[derive(clap::Args)]
pub struct Args {
	pub mesh: PathBuf,
	pub path: PathBuf,
	/// Target log2 side length.
	#[arg(long)]
	pub res: u8,
	#[arg(long)]
	pub out: PathBuf,
	#[arg(long)]
	pub compress: bool,
}

/// Import a layer, resample every loop raster and export the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		mesh: mesh_path,
		path,
		res,
		out,
		compress,
	} = args;

	let mesh = load_mesh(&mesh_path)?;
	let mut layer = import_file(&mesh, &path)?;
	layer.resize_all(square_logres(res)?)?;
	export_file(&mesh, &layer, &out, &ExportOptions { compress })?;

	println!("wrote {} ({} loops at 2^{res})", out.display(), layer.loops().len());
	Ok(())
}

#[cfg(test)]
mod tests;
