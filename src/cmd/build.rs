use std::path::PathBuf;

use serde::Serialize;
use threedo::codec::{BuildMode, ByteSink, DecodeOptions, LayoutBuilder, MODEL_CONTENT_TYPE, PathSink, Result};

use crate::cmd::util::{emit_json, load_model};

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
	/// Keep the hierarchy.
	Normal,
	/// Flatten into a single object.
	Unifusion,
}

impl From<ModeArg> for BuildMode {
	fn from(value: ModeArg) -> Self {
		match value {
			ModeArg::Normal => Self::Normal,
			ModeArg::Unifusion => Self::Unifusion,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub out: PathBuf,
	#[arg(long, value_enum, default_value = "normal")]
	pub mode: ModeArg,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct BuildJson {
	input: String,
	output: String,
	mode: &'static str,
	content_type: &'static str,
	objects: usize,
	bytes: usize,
	regions: usize,
}

/// Decode a model, optionally flatten it, and write the rebuilt file.
pub fn run(args: Args) -> Result<()> {
	let Args { path, out, mode, json } = args;
	let mode = BuildMode::from(mode);

	let (_, parsed) = load_model(&path, &DecodeOptions::default())?;
	let built = LayoutBuilder::new(mode).build(&parsed.root)?;

	let suggested = out.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_else(|| "model.3do".to_owned());
	PathSink::new(&out).deliver(&suggested, MODEL_CONTENT_TYPE, &built.bytes)?;

	let objects = match mode {
		BuildMode::Normal => parsed.root.object_count(),
		BuildMode::Unifusion => 1,
	};
	let payload = BuildJson {
		input: path.display().to_string(),
		output: out.display().to_string(),
		mode: mode.as_str(),
		content_type: MODEL_CONTENT_TYPE,
		objects,
		bytes: built.bytes.len(),
		regions: built.regions.len(),
	};

	if json {
		emit_json(&payload);
		return Ok(());
	}

	println!("wrote {} ({} bytes, {} regions, mode {})", payload.output, payload.bytes, payload.regions, payload.mode);
	Ok(())
}
