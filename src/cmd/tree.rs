use std::path::PathBuf;

use serde::Serialize;
use threedo::codec::{DecodeOptions, Object, Result};

use crate::cmd::util::{emit_json, load_model};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct TreeNodeJson {
	name: String,
	offset: [i32; 3],
	vertices: usize,
	primitives: usize,
	textures: Vec<String>,
	children: Vec<TreeNodeJson>,
}

impl TreeNodeJson {
	fn from_object(object: &Object) -> Self {
		Self {
			name: object.name.clone(),
			offset: [object.x_offset, object.y_offset, object.z_offset],
			vertices: object.vertices.len(),
			primitives: object.primitives.len(),
			textures: own_textures(object),
			children: object.children.iter().map(Self::from_object).collect(),
		}
	}
}

/// Print the object hierarchy with offsets and per-object counts.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let (_, parsed) = load_model(&path, &DecodeOptions::default())?;

	if json {
		emit_json(&TreeNodeJson::from_object(&parsed.root));
		return Ok(());
	}

	print_object(&parsed.root, 0);
	Ok(())
}

fn print_object(object: &Object, depth: usize) {
	let (x, y, z) = object.offset();
	let name = if object.name.is_empty() { "<unnamed>" } else { object.name.as_str() };
	let mut line = format!(
		"{}{} ({x}, {y}, {z}) vertices={} primitives={}",
		"  ".repeat(depth),
		name,
		object.vertices.len(),
		object.primitives.len()
	);

	let textures = own_textures(object);
	if !textures.is_empty() {
		line.push_str(" textures=");
		line.push_str(&textures.join(","));
	}
	println!("{line}");

	for child in &object.children {
		print_object(child, depth + 1);
	}
}

/// Distinct texture names of this object's own primitives.
fn own_textures(object: &Object) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();
	for primitive in &object.primitives {
		let name = &primitive.texture_name;
		if !name.is_empty() && !out.contains(name) {
			out.push(name.clone());
		}
	}
	out
}
