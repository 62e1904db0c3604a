use std::collections::HashSet;
use std::fmt;

use crate::codec::{OBJECT_SCHEMA, PRIMITIVE_SCHEMA, Record, VERTEX_SCHEMA, field};

/// Structure kind a byte region is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKind {
	/// Object record.
	Object,
	/// Vertex record(s).
	Vertices,
	/// Primitive record(s).
	Primitive,
	/// Object name string.
	ObjectName,
	/// Texture name string.
	TextureName,
	/// Packed `u16` vertex-index array.
	VertexIndices,
	/// Bytes not attributed to any parsed structure.
	UnknownGap,
}

impl RegionKind {
	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Object => "object",
			Self::Vertices => "vertexes",
			Self::Primitive => "primitive",
			Self::ObjectName => "object-name",
			Self::TextureName => "texture-name",
			Self::VertexIndices => "vindices",
			Self::UnknownGap => "unknown-gap",
		}
	}
}

impl fmt::Display for RegionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Byte span attributed to one parsed or written structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRegion {
	/// Structure kind.
	pub kind: RegionKind,
	/// Start offset in the buffer.
	pub offset: usize,
	/// Length in bytes.
	pub length: usize,
}

impl ByteRegion {
	/// Exclusive end offset.
	pub fn end(&self) -> usize {
		self.offset + self.length
	}
}

/// One vertex of an object, in the object's local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
	/// X coordinate.
	pub x: i32,
	/// Y coordinate.
	pub y: i32,
	/// Z coordinate.
	pub z: i32,
	/// Raw record fields as read.
	pub source: Record,
}

impl Vertex {
	/// Build a vertex with a matching raw record.
	pub fn new(x: i32, y: i32, z: i32) -> Self {
		let mut source = Record::zeroed(&VERTEX_SCHEMA);
		// Fields belong to VERTEX_SCHEMA; these sets cannot miss.
		let _ = source.set(field::X, i64::from(x));
		let _ = source.set(field::Y, i64::from(y));
		let _ = source.set(field::Z, i64::from(z));
		Self { x, y, z, source }
	}

	/// Coordinates as a tuple.
	pub fn xyz(&self) -> (i32, i32, i32) {
		(self.x, self.y, self.z)
	}
}

/// One polygon/line/point primitive of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
	/// Texture name; empty when the primitive is untextured.
	pub texture_name: String,
	/// Indices into the owning object's vertex list.
	pub vertex_indices: Vec<u16>,
	/// Raw record fields; pointer fields are recomputed on encode.
	pub source: Record,
}

impl Primitive {
	/// Build a primitive with a zeroed raw record.
	pub fn new(texture_name: impl Into<String>, vertex_indices: Vec<u16>) -> Self {
		let mut source = Record::zeroed(&PRIMITIVE_SCHEMA);
		let _ = source.set(field::NUMBER_OF_VERTEX_INDEXES, vertex_indices.len() as i64);
		Self {
			texture_name: texture_name.into(),
			vertex_indices,
			source,
		}
	}
}

/// One node of the model hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
	/// Object name.
	pub name: String,
	/// X offset relative to the parent.
	pub x_offset: i32,
	/// Y offset relative to the parent.
	pub y_offset: i32,
	/// Z offset relative to the parent.
	pub z_offset: i32,
	/// Vertices in local coordinates.
	pub vertices: Vec<Vertex>,
	/// Primitives indexing into `vertices`.
	pub primitives: Vec<Primitive>,
	/// Child objects in sibling order.
	pub children: Vec<Object>,
	/// Raw record fields; pointer and count fields are recomputed on encode.
	pub source: Record,
}

impl Object {
	/// Version signature found in exported files.
	pub const VERSION_SIGNATURE: i64 = 1;

	/// Empty object with a fresh record.
	pub fn new(name: impl Into<String>) -> Self {
		let mut source = Record::zeroed(&OBJECT_SCHEMA);
		let _ = source.set(field::VERSION_SIGNATURE, Self::VERSION_SIGNATURE);
		Self {
			name: name.into(),
			x_offset: 0,
			y_offset: 0,
			z_offset: 0,
			vertices: Vec::new(),
			primitives: Vec::new(),
			children: Vec::new(),
			source,
		}
	}

	/// Builder-style offset setter.
	pub fn with_offset(mut self, x: i32, y: i32, z: i32) -> Self {
		self.x_offset = x;
		self.y_offset = y;
		self.z_offset = z;
		self
	}

	/// Offsets relative to the parent as a tuple.
	pub fn offset(&self) -> (i32, i32, i32) {
		(self.x_offset, self.y_offset, self.z_offset)
	}

	/// Visit this object and every descendant in pre-order.
	pub fn walk(&self) -> Walk<'_> {
		Walk { stack: vec![self] }
	}

	/// Number of objects in this subtree, itself included.
	pub fn object_count(&self) -> usize {
		self.walk().count()
	}

	/// Total vertices in this subtree.
	pub fn vertex_count(&self) -> usize {
		self.walk().map(|item| item.vertices.len()).sum()
	}

	/// Total primitives in this subtree.
	pub fn primitive_count(&self) -> usize {
		self.walk().map(|item| item.primitives.len()).sum()
	}

	/// Distinct non-empty texture names in pre-order first-encounter order.
	pub fn texture_names(&self) -> Vec<&str> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for object in self.walk() {
			for primitive in &object.primitives {
				let name = primitive.texture_name.as_str();
				if !name.is_empty() && seen.insert(name) {
					out.push(name);
				}
			}
		}
		out
	}
}

/// Pre-order iterator over an object subtree.
pub struct Walk<'a> {
	stack: Vec<&'a Object>,
}

impl<'a> Iterator for Walk<'a> {
	type Item = &'a Object;

	fn next(&mut self) -> Option<Self::Item> {
		let item = self.stack.pop()?;
		self.stack.extend(item.children.iter().rev());
		Some(item)
	}
}

/// Decoder output: the object tree plus every consumed byte region.
#[derive(Debug, Clone)]
pub struct ParsedModel {
	/// Root object.
	pub root: Object,
	/// Regions in the order they were consumed.
	pub regions: Vec<ByteRegion>,
}
