use std::collections::HashSet;

use tracing::{debug, trace};

use crate::codec::{
	ByteRegion, Cursor, IntType, ModelError, OBJECT_SCHEMA, Object, PRIMITIVE_SCHEMA, ParsedModel, Primitive, Record, RecordSchema, RegionKind, Result, VERTEX_SCHEMA,
	Vertex, field, read_record,
};

/// Maximum bytes scanned for a name, terminator included.
pub const NAME_SCAN_LIMIT: usize = 255;

/// Decoder behavior controls.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Bytes scanned for a name terminator before giving up.
	pub name_scan_limit: usize,
	/// Reject primitives referencing vertices their object does not have.
	pub check_vertex_indices: bool,
	/// Maximum child nesting depth below the root.
	pub max_depth: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			name_scan_limit: NAME_SCAN_LIMIT,
			check_vertex_indices: true,
			max_depth: 1024,
		}
	}
}

impl DecodeOptions {
	/// Options for inspecting damaged files: vertex indices are not checked.
	pub fn lenient() -> Self {
		Self {
			check_vertex_indices: false,
			..Self::default()
		}
	}
}

/// Decode a whole `.3do` buffer with default options.
pub fn decode_model(bytes: &[u8]) -> Result<ParsedModel> {
	decode_model_with(bytes, &DecodeOptions::default())
}

/// Decode a whole `.3do` buffer.
///
/// The buffer must hold exactly one top-level object; the tree below it is
/// reached through the child and sibling pointers of each object record.
pub fn decode_model_with(bytes: &[u8], options: &DecodeOptions) -> Result<ParsedModel> {
	if bytes.is_empty() {
		return Err(ModelError::RootCount { count: 0 });
	}

	let mut decoder = ModelDecoder::new(bytes, options.clone());
	let mut roots = decoder.parse_object_chain(0)?;
	if roots.len() != 1 {
		return Err(ModelError::RootCount { count: roots.len() });
	}
	let Some(root) = roots.pop() else {
		return Err(ModelError::RootCount { count: 0 });
	};

	let regions = decoder.into_regions();
	debug!(
		bytes = bytes.len(),
		objects = root.object_count(),
		vertices = root.vertex_count(),
		primitives = root.primitive_count(),
		regions = regions.len(),
		"decoded model"
	);

	Ok(ParsedModel { root, regions })
}

/// Recursive-descent reader over the pointer-linked object records of one buffer.
pub struct ModelDecoder<'a> {
	bytes: &'a [u8],
	options: DecodeOptions,
	regions: Vec<ByteRegion>,
	seen_regions: HashSet<ByteRegion>,
	visited_objects: HashSet<usize>,
	depth: usize,
}

impl<'a> ModelDecoder<'a> {
	/// Create a decoder over `bytes`.
	pub fn new(bytes: &'a [u8], options: DecodeOptions) -> Self {
		Self {
			bytes,
			options,
			regions: Vec::new(),
			seen_regions: HashSet::new(),
			visited_objects: HashSet::new(),
			depth: 0,
		}
	}

	/// Regions consumed so far, in consumption order.
	pub fn regions(&self) -> &[ByteRegion] {
		&self.regions
	}

	/// Consume the decoder, returning its regions.
	pub fn into_regions(self) -> Vec<ByteRegion> {
		self.regions
	}

	/// Parse the sibling chain starting at `offset`, children included.
	pub fn parse_object_chain(&mut self, offset: usize) -> Result<Vec<Object>> {
		let mut result = Vec::new();
		let mut offset = offset;

		loop {
			if !self.visited_objects.insert(offset) {
				return Err(ModelError::ObjectCycle { at: offset });
			}

			let record = read_record(self.bytes, offset, &OBJECT_SCHEMA)?;
			self.push_region(RegionKind::Object, offset, OBJECT_SCHEMA.size());

			let name = self.parse_name(record.get(field::OFFSET_TO_OBJECT_NAME)?, RegionKind::ObjectName)?;

			let vertex_count = count_field(&record, field::NUMBER_OF_VERTEXES, offset)?;
			let vertices = self.parse_vertices(record.get(field::OFFSET_TO_VERTEX_ARRAY)?, vertex_count)?;

			let primitive_count = count_field(&record, field::NUMBER_OF_PRIMITIVES, offset)?;
			let primitives = self.parse_primitives(record.get(field::OFFSET_TO_PRIMITIVE_ARRAY)?, primitive_count)?;

			if self.options.check_vertex_indices {
				check_vertex_indices(&name, &vertices, &primitives)?;
			}

			trace!(offset, name = %name, vertices = vertices.len(), primitives = primitives.len(), "decoded object");

			let child = record.get(field::OFFSET_TO_CHILD_OBJECT)?;
			let children = if child != 0 {
				let child_offset = self.pointer(child, OBJECT_SCHEMA.size())?;
				if self.depth >= self.options.max_depth {
					return Err(ModelError::DepthExceeded { max_depth: self.options.max_depth });
				}
				self.depth += 1;
				let children = self.parse_object_chain(child_offset);
				self.depth -= 1;
				children?
			} else {
				Vec::new()
			};

			let sibling = record.get(field::OFFSET_TO_SIBLING_OBJECT)?;
			result.push(Object {
				name,
				x_offset: data_i32(&record, field::X_FROM_PARENT)?,
				y_offset: data_i32(&record, field::Y_FROM_PARENT)?,
				z_offset: data_i32(&record, field::Z_FROM_PARENT)?,
				vertices,
				primitives,
				children,
				source: record,
			});

			if sibling == 0 {
				break;
			}
			offset = self.pointer(sibling, OBJECT_SCHEMA.size())?;
		}

		Ok(result)
	}

	/// Read the NUL-terminated ASCII string at `pointer`.
	///
	/// A zero pointer is the empty name and consumes no bytes.
	pub fn parse_name(&mut self, pointer: i64, kind: RegionKind) -> Result<String> {
		if pointer == 0 {
			return Ok(String::new());
		}

		let start = self.pointer(pointer, 1)?;
		let limit = self.options.name_scan_limit;
		let mut text_len = None;

		for idx in 0..limit {
			let at = start + idx;
			let byte = *self.bytes.get(at).ok_or(ModelError::UnexpectedEof {
				at: at as i64,
				need: 1,
				len: self.bytes.len(),
			})?;
			if byte == 0 {
				text_len = Some(idx);
				break;
			}
			if !byte.is_ascii() {
				return Err(ModelError::NonAsciiName { kind, at, byte });
			}
		}

		let Some(text_len) = text_len else {
			return Err(ModelError::UnterminatedName { kind, at: start, limit });
		};

		let name = self.bytes[start..start + text_len].iter().map(|byte| char::from(*byte)).collect();
		self.push_region(kind, start, text_len + 1);
		Ok(name)
	}

	fn parse_vertices(&mut self, pointer: i64, count: usize) -> Result<Vec<Vertex>> {
		if count == 0 {
			return Ok(Vec::new());
		}

		let base = self.array_start(pointer, count, &VERTEX_SCHEMA)?;
		let mut vertices = Vec::with_capacity(count);
		for idx in 0..count {
			let offset = base + idx * VERTEX_SCHEMA.size();
			let record = read_record(self.bytes, offset, &VERTEX_SCHEMA)?;
			self.push_region(RegionKind::Vertices, offset, VERTEX_SCHEMA.size());
			vertices.push(Vertex {
				x: data_i32(&record, field::X)?,
				y: data_i32(&record, field::Y)?,
				z: data_i32(&record, field::Z)?,
				source: record,
			});
		}
		Ok(vertices)
	}

	fn parse_primitives(&mut self, pointer: i64, count: usize) -> Result<Vec<Primitive>> {
		if count == 0 {
			return Ok(Vec::new());
		}

		let base = self.array_start(pointer, count, &PRIMITIVE_SCHEMA)?;
		let mut primitives = Vec::with_capacity(count);
		for idx in 0..count {
			let offset = base + idx * PRIMITIVE_SCHEMA.size();
			let record = read_record(self.bytes, offset, &PRIMITIVE_SCHEMA)?;
			self.push_region(RegionKind::Primitive, offset, PRIMITIVE_SCHEMA.size());

			let texture_name = self.parse_name(record.get(field::OFFSET_TO_TEXTURE_NAME)?, RegionKind::TextureName)?;

			let index_count = count_field(&record, field::NUMBER_OF_VERTEX_INDEXES, offset)?;
			let vertex_indices = self.parse_vertex_indices(record.get(field::OFFSET_TO_VERTEX_INDEX_ARRAY)?, index_count)?;

			primitives.push(Primitive {
				texture_name,
				vertex_indices,
				source: record,
			});
		}
		Ok(primitives)
	}

	fn parse_vertex_indices(&mut self, pointer: i64, count: usize) -> Result<Vec<u16>> {
		if count == 0 {
			return Ok(Vec::new());
		}

		let start = self.pointer(pointer, 2)?;
		let length = self.span(start, count, 2)?;
		let mut cursor = Cursor::at(self.bytes, start);
		let mut indices = Vec::with_capacity(count);
		for _ in 0..count {
			indices.push(cursor.read_u16_le()?);
		}
		self.push_region(RegionKind::VertexIndices, start, length);
		Ok(indices)
	}

	fn array_start(&self, pointer: i64, count: usize, schema: &RecordSchema) -> Result<usize> {
		let start = self.pointer(pointer, schema.size())?;
		self.span(start, count, schema.size())?;
		Ok(start)
	}

	/// Validate that `count` elements of `size` bytes fit at `start`; returns the byte length.
	fn span(&self, start: usize, count: usize, size: usize) -> Result<usize> {
		let length = count.checked_mul(size);
		match length.and_then(|length| start.checked_add(length)) {
			Some(end) if end <= self.bytes.len() => Ok(end - start),
			_ => Err(ModelError::UnexpectedEof {
				at: start as i64,
				need: length.unwrap_or(usize::MAX),
				len: self.bytes.len(),
			}),
		}
	}

	fn pointer(&self, value: i64, need: usize) -> Result<usize> {
		match usize::try_from(value) {
			Ok(offset) if offset < self.bytes.len() => Ok(offset),
			_ => Err(ModelError::UnexpectedEof {
				at: value,
				need,
				len: self.bytes.len(),
			}),
		}
	}

	fn push_region(&mut self, kind: RegionKind, offset: usize, length: usize) {
		let region = ByteRegion { kind, offset, length };
		if length > 0 && self.seen_regions.insert(region) {
			self.regions.push(region);
		}
	}
}

fn count_field(record: &Record, name: &'static str, at: usize) -> Result<usize> {
	let value = record.get(name)?;
	usize::try_from(value).map_err(|_| ModelError::NegativeCount { field: name, value, at })
}

fn data_i32(record: &Record, name: &'static str) -> Result<i32> {
	let value = record.get(name)?;
	i32::try_from(value).map_err(|_| ModelError::IntegerRange {
		value,
		ty: IntType::I32,
		min: i64::from(i32::MIN),
		max: i64::from(i32::MAX),
	})
}

pub(crate) fn check_vertex_indices(name: &str, vertices: &[Vertex], primitives: &[Primitive]) -> Result<()> {
	for primitive in primitives {
		if let Some(&index) = primitive.vertex_indices.iter().find(|index| usize::from(**index) >= vertices.len()) {
			return Err(ModelError::VertexIndexOutOfRange {
				object: name.to_owned(),
				index,
				count: vertices.len(),
			});
		}
	}
	Ok(())
}
