//! Shared test helpers: hand-assembled `.3do` buffers.
//!
//! Buffers built here never go through the library's layout builder, so decoder
//! tests do not depend on the encoder being correct.

/// Object record size in bytes.
pub const OBJECT_SIZE: usize = 52;
/// Vertex record size in bytes.
pub const VERTEX_SIZE: usize = 12;
/// Primitive record size in bytes.
pub const PRIMITIVE_SIZE: usize = 32;

/// Raw object record fields in on-disk order.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFields {
	pub version: i32,
	pub vertex_count: i32,
	pub primitive_count: i32,
	pub selection_primitive: i32,
	pub x: i32,
	pub y: i32,
	pub z: i32,
	pub name: i32,
	pub always_0: i32,
	pub vertices: i32,
	pub primitives: i32,
	pub sibling: i32,
	pub child: i32,
}

impl ObjectFields {
	fn to_array(self) -> [i32; 13] {
		[
			self.version,
			self.vertex_count,
			self.primitive_count,
			self.selection_primitive,
			self.x,
			self.y,
			self.z,
			self.name,
			self.always_0,
			self.vertices,
			self.primitives,
			self.sibling,
			self.child,
		]
	}
}

/// Raw primitive record fields in on-disk order.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveFields {
	pub color_index: i32,
	pub index_count: i32,
	pub always_0: i32,
	pub indices: i32,
	pub texture: i32,
	pub unknown_1: i32,
	pub unknown_2: i32,
	pub is_colored: i32,
}

impl PrimitiveFields {
	fn to_array(self) -> [i32; 8] {
		[
			self.color_index,
			self.index_count,
			self.always_0,
			self.indices,
			self.texture,
			self.unknown_1,
			self.unknown_2,
			self.is_colored,
		]
	}
}

/// Append-only little-endian byte writer with patchable slots.
#[derive(Debug, Default)]
pub struct ModelBytes {
	bytes: Vec<u8>,
}

impl ModelBytes {
	/// Empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current end offset.
	pub fn pos(&self) -> usize {
		self.bytes.len()
	}

	/// Append zeroed bytes, returning their start.
	pub fn reserve(&mut self, len: usize) -> usize {
		let at = self.pos();
		self.bytes.resize(at + len, 0);
		at
	}

	/// Append raw bytes, returning their start.
	pub fn raw(&mut self, bytes: &[u8]) -> usize {
		let at = self.pos();
		self.bytes.extend_from_slice(bytes);
		at
	}

	/// Append little-endian `i32` values, returning their start.
	pub fn i32s(&mut self, values: &[i32]) -> usize {
		let at = self.pos();
		for value in values {
			self.bytes.extend_from_slice(&value.to_le_bytes());
		}
		at
	}

	/// Append little-endian `u16` values, returning their start.
	pub fn u16s(&mut self, values: &[u16]) -> usize {
		let at = self.pos();
		for value in values {
			self.bytes.extend_from_slice(&value.to_le_bytes());
		}
		at
	}

	/// Append `text` plus a NUL terminator, returning its start.
	pub fn cstr(&mut self, text: &[u8]) -> usize {
		let at = self.raw(text);
		self.bytes.push(0);
		at
	}

	/// Append vertex records, returning their start.
	pub fn vertices(&mut self, vertices: &[[i32; 3]]) -> usize {
		let at = self.pos();
		for vertex in vertices {
			self.i32s(vertex);
		}
		at
	}

	/// Overwrite an object record at `at`.
	pub fn put_object(&mut self, at: usize, fields: ObjectFields) {
		self.put_i32s(at, &fields.to_array());
	}

	/// Append an object record, returning its start.
	pub fn object(&mut self, fields: ObjectFields) -> usize {
		self.i32s(&fields.to_array())
	}

	/// Overwrite a primitive record at `at`.
	pub fn put_primitive(&mut self, at: usize, fields: PrimitiveFields) {
		self.put_i32s(at, &fields.to_array());
	}

	/// Append a primitive record, returning its start.
	pub fn primitive(&mut self, fields: PrimitiveFields) -> usize {
		self.i32s(&fields.to_array())
	}

	/// Overwrite one little-endian `i32` at `at`.
	pub fn patch_i32(&mut self, at: usize, value: i32) {
		self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
	}

	fn put_i32s(&mut self, at: usize, values: &[i32]) {
		for (idx, value) in values.iter().enumerate() {
			self.patch_i32(at + idx * 4, *value);
		}
	}

	/// Finish and return the buffer.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}

fn offset(value: usize) -> i32 {
	i32::try_from(value).expect("test buffers stay below 2 GiB")
}

/// One root object `root` with vertices `{0,0,0} {1,0,0} {1,1,0}` and a single
/// primitive over `[0, 1, 2]` textured `wall`. Every byte is attributed.
pub fn triangle_model() -> Vec<u8> {
	let mut out = ModelBytes::new();
	let root = out.reserve(OBJECT_SIZE);
	let vertices = out.vertices(&[[0, 0, 0], [1, 0, 0], [1, 1, 0]]);
	let primitive = out.reserve(PRIMITIVE_SIZE);
	let indices = out.u16s(&[0, 1, 2]);
	let texture = out.cstr(b"wall");
	let name = out.cstr(b"root");

	out.put_primitive(
		primitive,
		PrimitiveFields {
			color_index: 3,
			index_count: 3,
			indices: offset(indices),
			texture: offset(texture),
			is_colored: 1,
			..PrimitiveFields::default()
		},
	);
	out.put_object(
		root,
		ObjectFields {
			version: 1,
			vertex_count: 3,
			primitive_count: 1,
			selection_primitive: -1,
			name: offset(name),
			vertices: offset(vertices),
			primitives: offset(primitive),
			..ObjectFields::default()
		},
	);
	out.into_bytes()
}

/// Root `base` with two children `left` (offset `(5,5,5)`) and `right`, each
/// holding one vertex and one primitive textured `steel`. Both primitives point
/// at a single shared `steel` string.
pub fn two_child_model() -> Vec<u8> {
	let mut out = ModelBytes::new();
	let root = out.reserve(OBJECT_SIZE);
	let texture = out.cstr(b"steel");
	let root_name = out.cstr(b"base");
	let children = out.reserve(OBJECT_SIZE * 2);

	let mut child_fields = Vec::new();
	for (idx, label) in [b"left".as_slice(), b"right".as_slice()].into_iter().enumerate() {
		let vertices = out.vertices(&[[1, 0, 0]]);
		let primitive = out.reserve(PRIMITIVE_SIZE);
		let indices = out.u16s(&[0]);
		let name = out.cstr(label);
		out.put_primitive(
			primitive,
			PrimitiveFields {
				index_count: 1,
				indices: offset(indices),
				texture: offset(texture),
				..PrimitiveFields::default()
			},
		);
		let (x, y, z) = if idx == 0 { (5, 5, 5) } else { (0, 0, 0) };
		child_fields.push(ObjectFields {
			version: 1,
			vertex_count: 1,
			primitive_count: 1,
			x,
			y,
			z,
			name: offset(name),
			vertices: offset(vertices),
			primitives: offset(primitive),
			sibling: if idx == 0 { offset(children + OBJECT_SIZE) } else { 0 },
			..ObjectFields::default()
		});
	}
	for (idx, fields) in child_fields.into_iter().enumerate() {
		out.put_object(children + idx * OBJECT_SIZE, fields);
	}

	out.put_object(
		root,
		ObjectFields {
			version: 1,
			name: offset(root_name),
			child: offset(children),
			..ObjectFields::default()
		},
	);
	out.into_bytes()
}
