use std::path::Path;

use ptexbake::ptex::{LogRes, Mesh, MeshDesc, Result};
use serde::Serialize;

/// Pretty-print `payload` as JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => {
			eprintln!("error: failed to render json: {err}");
			std::process::exit(1);
		}
	}
}

/// Load a JSON mesh description and build its topology.
pub(crate) fn load_mesh(path: &Path) -> Result<Mesh> {
	let desc = MeshDesc::load(path)?;
	let mesh = Mesh::from_desc(&desc)?;
	log::debug!(
		"loaded mesh {}: {} polys, {} loops, {} edges",
		path.display(),
		mesh.num_polys(),
		mesh.num_loops(),
		mesh.num_edges()
	);
	Ok(mesh)
}

/// Square log2 resolution from a `--res` flag.
pub(crate) fn square_logres(res: u8) -> Result<LogRes> {
	LogRes::new(res, res)
}
