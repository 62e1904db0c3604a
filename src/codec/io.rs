use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::Result;

/// Content-type hint for serialized models.
pub const MODEL_CONTENT_TYPE: &str = "application/x-binary";

/// Somewhere whole model files are read from.
pub trait ByteSource {
	/// Read every byte.
	fn read_all(&mut self) -> Result<Vec<u8>>;
}

/// Somewhere built model files are delivered to.
pub trait ByteSink {
	/// Deliver `bytes`; `suggested_name` and `content_type` are hints the sink may ignore.
	fn deliver(&mut self, suggested_name: &str, content_type: &str, bytes: &[u8]) -> Result<()>;
}

/// Reads a file from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
	path: PathBuf,
}

impl FileSource {
	/// Source for `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Path being read.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ByteSource for FileSource {
	fn read_all(&mut self) -> Result<Vec<u8>> {
		let bytes = fs::read(&self.path)?;
		debug!(path = %self.path.display(), bytes = bytes.len(), "read model file");
		Ok(bytes)
	}
}

/// Writes `<dir>/<suggested_name>`.
#[derive(Debug, Clone)]
pub struct DirSink {
	dir: PathBuf,
}

impl DirSink {
	/// Sink writing into `dir`.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
}

impl ByteSink for DirSink {
	fn deliver(&mut self, suggested_name: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
		let path = self.dir.join(suggested_name);
		fs::write(&path, bytes)?;
		debug!(path = %path.display(), content_type, bytes = bytes.len(), "delivered model file");
		Ok(())
	}
}

/// Writes to one fixed path, ignoring the suggested name.
#[derive(Debug, Clone)]
pub struct PathSink {
	path: PathBuf,
}

impl PathSink {
	/// Sink writing to `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ByteSink for PathSink {
	fn deliver(&mut self, _suggested_name: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
		fs::write(&self.path, bytes)?;
		debug!(path = %self.path.display(), content_type, bytes = bytes.len(), "delivered model file");
		Ok(())
	}
}
