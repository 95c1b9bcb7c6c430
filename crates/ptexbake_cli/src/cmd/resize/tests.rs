use crate::cmd::test_support::{fixture_arg, run_ptexbake, run_ptexbake_json, run_ptexbake_ok, scratch_dir};

#[test]
fn resize_rewrites_every_face_at_the_new_resolution() {
	let dir = scratch_dir("resize");
	let baked = dir.join("quad_tri.ptxa").to_string_lossy().into_owned();
	let resized = dir.join("quad_tri_small.ptxa").to_string_lossy().into_owned();
	let mesh = fixture_arg("quad_tri.json");

	run_ptexbake_ok(&["bake", &mesh, "--out", &baked, "--res", "3"]);
	run_ptexbake_ok(&["resize", &mesh, &baked, "--res", "1", "--out", &resized, "--compress"]);

	let json = run_ptexbake_json(&["info", &resized, "--json"]);
	assert_eq!(json["compression"], "zstd");
	assert_eq!(json["num_faces"], 4);
	let faces = json["faces"].as_array().expect("faces array");
	// The quad stores its four loops merged; the triangle stores one face per loop.
	assert_eq!((faces[0]["width"].as_u64(), faces[0]["height"].as_u64()), (Some(4), Some(4)));
	assert!(faces[1..].iter().all(|face| face["width"] == 2 && face["height"] == 2));
}

#[test]
fn resize_rejects_mesh_that_does_not_match_archive() {
	let dir = scratch_dir("resize_mismatch");
	let baked = dir.join("quad_tri.ptxa").to_string_lossy().into_owned();
	let resized = dir.join("out.ptxa");

	// Four faces on disk, six quads in the mesh.
	run_ptexbake_ok(&["bake", &fixture_arg("quad_tri.json"), "--out", &baked, "--res", "2"]);
	let output = run_ptexbake(&["resize", &fixture_arg("cube.json"), &baked, "--res", "1", "--out", &resized.to_string_lossy()]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
	assert!(!resized.exists());
}
