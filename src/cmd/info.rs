use std::path::PathBuf;

use serde::Serialize;
use threedo::codec::{DecodeOptions, Result};

use crate::cmd::util::{emit_json, load_model};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct InfoJson {
	path: String,
	file_size: usize,
	root: String,
	objects: usize,
	vertices: usize,
	primitives: usize,
	textures: Vec<String>,
	regions: usize,
}

/// Print file size, hierarchy counts and texture names.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let (bytes, parsed) = load_model(&path, &DecodeOptions::default())?;
	let root = &parsed.root;
	let payload = InfoJson {
		path: path.display().to_string(),
		file_size: bytes.len(),
		root: root.name.clone(),
		objects: root.object_count(),
		vertices: root.vertex_count(),
		primitives: root.primitive_count(),
		textures: root.texture_names().into_iter().map(str::to_owned).collect(),
		regions: parsed.regions.len(),
	};

	if json {
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", payload.path);
	println!("file_size: {}", payload.file_size);
	println!("root: {}", payload.root);
	println!("objects: {}", payload.objects);
	println!("vertices: {}", payload.vertices);
	println!("primitives: {}", payload.primitives);
	println!("regions: {}", payload.regions);
	println!("textures:");
	for name in &payload.textures {
		println!("  {name}");
	}

	Ok(())
}
