use thiserror::Error;

use crate::codec::{IntType, RegionKind};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Coarse classification of [`ModelError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Malformed input bytes.
	Format,
	/// A value does not fit its declared integer width.
	Range,
	/// Defect in the builder itself rather than in the input.
	Internal,
	/// A read or write addressed bytes outside the buffer.
	OutOfBounds,
	/// Filesystem or stream failure at the byte source/sink.
	Io,
	/// Invalid caller-provided selector.
	Usage,
}

impl ErrorKind {
	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Format => "format",
			Self::Range => "range",
			Self::Internal => "internal",
			Self::OutOfBounds => "out_of_bounds",
			Self::Io => "io",
			Self::Usage => "usage",
		}
	}
}

/// Errors produced while decoding, building and flattening `.3do` models.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read or write.
	#[error("unexpected eof at offset {at}, need {need} bytes, buffer length {len}")]
	UnexpectedEof {
		/// Byte offset where the access was attempted.
		at: i64,
		/// Requested bytes.
		need: usize,
		/// Total buffer length.
		len: usize,
	},
	/// Top-level object chain did not contain exactly one object.
	#[error("expected exactly one root object, found {count}")]
	RootCount {
		/// Number of top-level objects in the chain.
		count: usize,
	},
	/// No NUL terminator within the name scan limit.
	#[error("unterminated {kind} at offset {at} (no terminator within {limit} bytes)")]
	UnterminatedName {
		/// Region kind of the name being read.
		kind: RegionKind,
		/// Offset of the first name byte.
		at: usize,
		/// Scan limit in bytes, terminator included.
		limit: usize,
	},
	/// Name bytes outside 7-bit ASCII.
	#[error("{kind} at offset {at} contains non-ascii byte 0x{byte:02x}")]
	NonAsciiName {
		/// Region kind of the name being read.
		kind: RegionKind,
		/// Offset of the offending byte.
		at: usize,
		/// Offending byte.
		byte: u8,
	},
	/// Count field in a record was negative.
	#[error("negative {field} {value} in record at offset {at}")]
	NegativeCount {
		/// Count field name.
		field: &'static str,
		/// Parsed signed count.
		value: i64,
		/// Record offset.
		at: usize,
	},
	/// Sibling/child pointers revisit an object record.
	#[error("object chain cycles back to offset {at}")]
	ObjectCycle {
		/// Offset of the revisited object record.
		at: usize,
	},
	/// Child nesting exceeded the configured depth.
	#[error("object nesting deeper than {max_depth}")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: usize,
	},
	/// Primitive references a vertex the owning object does not have.
	#[error("vertex index {index} out of range for object {object:?} with {count} vertices")]
	VertexIndexOutOfRange {
		/// Owning object's name.
		object: String,
		/// Offending index.
		index: u16,
		/// Vertex count of the owning object.
		count: usize,
	},
	/// Value does not fit the inclusive bounds of its integer type.
	#[error("integer {value} does not fit {ty} (range {min}..={max})")]
	IntegerRange {
		/// Value that was written.
		value: i64,
		/// Destination integer type.
		ty: IntType,
		/// Inclusive minimum of `ty`.
		min: i64,
		/// Inclusive maximum of `ty`.
		max: i64,
	},
	/// Translated vertex coordinate left the signed 32-bit range.
	#[error("translated {axis} coordinate {value} + {offset} overflows i32")]
	CoordinateOverflow {
		/// Axis label (`x`, `y`, `z`).
		axis: &'static str,
		/// Original coordinate.
		value: i32,
		/// Accumulated offset applied to it.
		offset: i64,
	},
	/// Name contains a character that is not encodable as 7-bit ASCII.
	#[error("name {name:?} contains unsupported character {ch:?} at position {pos}")]
	NameNotAscii {
		/// Full name.
		name: String,
		/// Offending character.
		ch: char,
		/// Character position.
		pos: usize,
	},
	/// Name does not fit the on-disk string limit.
	#[error("name {name:?} is {len} bytes, maximum is {max}")]
	NameTooLong {
		/// Full name.
		name: String,
		/// Byte length of the name.
		len: usize,
		/// Maximum encodable length without terminator.
		max: usize,
	},
	/// Texture name missing from the pooled name table.
	#[error("texture name {name:?} missing from name pool")]
	MissingTextureName {
		/// Texture name that was looked up.
		name: String,
	},
	/// Written regions do not tile the output buffer.
	#[error("layout tiling mismatch: region at {found} where {expected} was expected")]
	TilingMismatch {
		/// Expected next region start.
		expected: usize,
		/// Actual next region start.
		found: usize,
	},
	/// Field name is not part of a schema.
	#[error("record schema {schema} has no field {field}")]
	UnknownField {
		/// Schema name.
		schema: &'static str,
		/// Requested field.
		field: &'static str,
	},
	/// Record written through a schema it was not built for.
	#[error("record for schema {record} written as {schema}")]
	SchemaMismatch {
		/// Schema the record belongs to.
		record: &'static str,
		/// Schema requested for the write.
		schema: &'static str,
	},
	/// Build mode label was not recognized.
	#[error("unknown build mode {mode:?} (expected normal or unifusion)")]
	UnknownBuildMode {
		/// User-provided label.
		mode: String,
	},
}

impl ModelError {
	/// Classify this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::UnexpectedEof { .. } => ErrorKind::OutOfBounds,
			Self::RootCount { .. }
			| Self::UnterminatedName { .. }
			| Self::NonAsciiName { .. }
			| Self::NegativeCount { .. }
			| Self::ObjectCycle { .. }
			| Self::DepthExceeded { .. }
			| Self::VertexIndexOutOfRange { .. } => ErrorKind::Format,
			Self::IntegerRange { .. } | Self::CoordinateOverflow { .. } | Self::NameNotAscii { .. } | Self::NameTooLong { .. } => ErrorKind::Range,
			Self::MissingTextureName { .. } | Self::TilingMismatch { .. } | Self::UnknownField { .. } | Self::SchemaMismatch { .. } => ErrorKind::Internal,
			Self::UnknownBuildMode { .. } => ErrorKind::Usage,
		}
	}
}
