use std::path::Path;

use serde::Serialize;
use threedo::codec::{ByteSource, DecodeOptions, FileSource, ParsedModel, Result, decode_model_with};

/// Print `value` as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Read and decode the model at `path`, returning the raw bytes alongside.
pub(crate) fn load_model(path: &Path, options: &DecodeOptions) -> Result<(Vec<u8>, ParsedModel)> {
	let bytes = FileSource::new(path).read_all()?;
	let parsed = decode_model_with(&bytes, options)?;
	Ok((bytes, parsed))
}
