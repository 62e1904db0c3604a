mod bytes;
mod decode;
mod error;
mod filemap;
mod flatten;
mod io;
mod layout;
mod model;
mod schema;

/// Integer codec primitives and the bounded byte cursor.
pub use bytes::{Cursor, Endianness, IntType, read_integer, write_integer};
/// Decoder entry points and options.
pub use decode::{DecodeOptions, ModelDecoder, NAME_SCAN_LIMIT, decode_model, decode_model_with};
/// Error taxonomy and result alias.
pub use error::{ErrorKind, ModelError, Result};
/// Diagnostic file-map analysis.
pub use filemap::{RegionGroup, analyze, trailing_gap};
/// Tree flattening ("unifusion").
pub use flatten::flatten;
/// Byte source and sink seams.
pub use io::{ByteSink, ByteSource, DirSink, FileSource, MODEL_CONTENT_TYPE, PathSink};
/// Layout builder and build modes.
pub use layout::{BuildMode, BuiltModel, LayoutBuilder, MAX_NAME_LEN, build_model, encode_name};
/// In-memory model types.
pub use model::{ByteRegion, Object, ParsedModel, Primitive, RegionKind, Vertex, Walk};
/// Record schemas, records and field names.
pub use schema::{FieldDef, OBJECT_SCHEMA, PRIMITIVE_SCHEMA, Record, RecordSchema, UNRESOLVED, VERTEX_SCHEMA, field, read_record, write_record};
