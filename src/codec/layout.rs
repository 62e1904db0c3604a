use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::codec::decode::check_vertex_indices;
use crate::codec::{
	ByteRegion, Endianness, IntType, ModelError, OBJECT_SCHEMA, Object, PRIMITIVE_SCHEMA, Primitive, RegionKind, Result, VERTEX_SCHEMA, Vertex, field,
	flatten, write_integer, write_record,
};

/// Longest name the format can hold, terminator excluded.
pub const MAX_NAME_LEN: usize = 254;

/// Output pipeline selected for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
	/// Keep the hierarchy as-is.
	#[default]
	Normal,
	/// Flatten the hierarchy into a single object first.
	Unifusion,
}

impl BuildMode {
	/// Render the mode as its stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Normal => "normal",
			Self::Unifusion => "unifusion",
		}
	}
}

impl fmt::Display for BuildMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BuildMode {
	type Err = ModelError;

	fn from_str(value: &str) -> Result<Self> {
		match value {
			"normal" => Ok(Self::Normal),
			"unifusion" => Ok(Self::Unifusion),
			_ => Err(ModelError::UnknownBuildMode { mode: value.to_owned() }),
		}
	}
}

/// Builder output: the serialized file plus every region written.
#[derive(Debug, Clone)]
pub struct BuiltModel {
	/// Serialized `.3do` bytes.
	pub bytes: Vec<u8>,
	/// Written regions sorted by offset; they tile `bytes` exactly.
	pub regions: Vec<ByteRegion>,
}

/// Serializes an object tree, assigning every pointer field.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBuilder {
	mode: BuildMode,
}

impl LayoutBuilder {
	/// Builder for `mode`.
	pub fn new(mode: BuildMode) -> Self {
		Self { mode }
	}

	/// Selected mode.
	pub fn mode(&self) -> BuildMode {
		self.mode
	}

	/// Serialize `root`.
	///
	/// Layout: root record at 0, pooled texture names, then per object in
	/// pre-order its vertices, primitive records, index arrays, name and the
	/// record block of its children.
	pub fn build(&self, root: &Object) -> Result<BuiltModel> {
		let flat;
		let root = match self.mode {
			BuildMode::Normal => root,
			BuildMode::Unifusion => {
				flat = flatten(root)?;
				&flat
			}
		};

		let mut ctx = LayoutContext::default();
		let root_slot = ctx.reserve(OBJECT_SCHEMA.size());
		ctx.write_texture_pool(root)?;
		ctx.write_object(root, root_slot, 0)?;

		let LayoutContext { bytes, mut regions, textures } = ctx;
		regions.sort_by_key(|region| region.offset);
		verify_tiling(&regions, bytes.len())?;

		debug!(
			mode = %self.mode,
			bytes = bytes.len(),
			regions = regions.len(),
			textures = textures.len(),
			"built model"
		);

		Ok(BuiltModel { bytes, regions })
	}
}

/// Serialize `root` with `mode`, returning only the bytes.
pub fn build_model(root: &Object, mode: BuildMode) -> Result<Vec<u8>> {
	Ok(LayoutBuilder::new(mode).build(root)?.bytes)
}

/// Allocation state of one build.
#[derive(Default)]
struct LayoutContext {
	bytes: Vec<u8>,
	regions: Vec<ByteRegion>,
	textures: HashMap<String, usize>,
}

impl LayoutContext {
	/// Append `len` zero bytes and return their offset.
	fn reserve(&mut self, len: usize) -> usize {
		let at = self.bytes.len();
		self.bytes.resize(at + len, 0);
		at
	}

	fn push_region(&mut self, kind: RegionKind, offset: usize, length: usize) {
		if length > 0 {
			self.regions.push(ByteRegion { kind, offset, length });
		}
	}

	fn write_texture_pool(&mut self, root: &Object) -> Result<()> {
		for name in root.texture_names() {
			let at = self.write_name(name, RegionKind::TextureName)?;
			self.textures.insert(name.to_owned(), at);
		}
		Ok(())
	}

	fn write_object(&mut self, object: &Object, slot: usize, sibling: usize) -> Result<()> {
		check_vertex_indices(&object.name, &object.vertices, &object.primitives)?;

		let vertices_at = self.write_vertices(&object.vertices)?;
		let primitives_at = self.write_primitives(&object.primitives)?;
		let name_at = self.write_name(&object.name, RegionKind::ObjectName)?;

		let size = OBJECT_SCHEMA.size();
		let children_at = self.reserve(size * object.children.len());
		trace!(slot, name = %object.name, children = object.children.len(), "laid out object");

		let last = object.children.len().saturating_sub(1);
		for (idx, child) in object.children.iter().enumerate() {
			let child_slot = children_at + idx * size;
			let child_sibling = if idx < last { child_slot + size } else { 0 };
			self.write_object(child, child_slot, child_sibling)?;
		}

		let mut record = object.source.clone();
		record.set(field::NUMBER_OF_VERTEXES, object.vertices.len() as i64)?;
		record.set(field::NUMBER_OF_PRIMITIVES, object.primitives.len() as i64)?;
		record.set(field::X_FROM_PARENT, i64::from(object.x_offset))?;
		record.set(field::Y_FROM_PARENT, i64::from(object.y_offset))?;
		record.set(field::Z_FROM_PARENT, i64::from(object.z_offset))?;
		record.set(field::OFFSET_TO_OBJECT_NAME, name_at as i64)?;
		record.set(field::OFFSET_TO_VERTEX_ARRAY, vertices_at as i64)?;
		record.set(field::OFFSET_TO_PRIMITIVE_ARRAY, primitives_at as i64)?;
		record.set(field::OFFSET_TO_SIBLING_OBJECT, sibling as i64)?;
		let child = if object.children.is_empty() { 0 } else { children_at };
		record.set(field::OFFSET_TO_CHILD_OBJECT, child as i64)?;

		write_record(&record, &mut self.bytes, slot, &OBJECT_SCHEMA)?;
		self.push_region(RegionKind::Object, slot, size);
		Ok(())
	}

	fn write_vertices(&mut self, vertices: &[Vertex]) -> Result<usize> {
		let start = self.bytes.len();
		for vertex in vertices {
			let mut record = vertex.source.clone();
			record.set(field::X, i64::from(vertex.x))?;
			record.set(field::Y, i64::from(vertex.y))?;
			record.set(field::Z, i64::from(vertex.z))?;

			let at = self.reserve(VERTEX_SCHEMA.size());
			write_record(&record, &mut self.bytes, at, &VERTEX_SCHEMA)?;
			self.push_region(RegionKind::Vertices, at, VERTEX_SCHEMA.size());
		}
		Ok(start)
	}

	fn write_primitives(&mut self, primitives: &[Primitive]) -> Result<usize> {
		let size = PRIMITIVE_SCHEMA.size();
		let start = self.reserve(size * primitives.len());

		let mut index_offsets = Vec::with_capacity(primitives.len());
		for primitive in primitives {
			let width = IntType::U16.width();
			let at = self.reserve(width * primitive.vertex_indices.len());
			for (idx, value) in primitive.vertex_indices.iter().enumerate() {
				write_integer(i64::from(*value), &mut self.bytes, at + idx * width, IntType::U16, Endianness::Little)?;
			}
			self.push_region(RegionKind::VertexIndices, at, width * primitive.vertex_indices.len());
			index_offsets.push(at);
		}

		for (idx, (primitive, indices_at)) in primitives.iter().zip(index_offsets).enumerate() {
			let texture_at = if primitive.texture_name.is_empty() {
				0
			} else {
				*self.textures.get(&primitive.texture_name).ok_or_else(|| ModelError::MissingTextureName {
					name: primitive.texture_name.clone(),
				})?
			};

			let mut record = primitive.source.clone();
			record.set(field::NUMBER_OF_VERTEX_INDEXES, primitive.vertex_indices.len() as i64)?;
			record.set(field::OFFSET_TO_VERTEX_INDEX_ARRAY, indices_at as i64)?;
			record.set(field::OFFSET_TO_TEXTURE_NAME, texture_at as i64)?;

			let at = start + idx * size;
			write_record(&record, &mut self.bytes, at, &PRIMITIVE_SCHEMA)?;
			self.push_region(RegionKind::Primitive, at, size);
		}

		Ok(start)
	}

	/// Write `name` plus terminator; an empty name is a lone terminator byte.
	fn write_name(&mut self, name: &str, kind: RegionKind) -> Result<usize> {
		let encoded = encode_name(name)?;
		let at = self.reserve(encoded.len() + 1);
		self.bytes[at..at + encoded.len()].copy_from_slice(encoded);
		self.push_region(kind, at, encoded.len() + 1);
		Ok(at)
	}
}

/// Validate `name` for the on-disk string format and return its bytes.
pub fn encode_name(name: &str) -> Result<&[u8]> {
	if let Some((pos, ch)) = name.chars().enumerate().find(|(_, ch)| !ch.is_ascii() || *ch == '\0') {
		return Err(ModelError::NameNotAscii {
			name: name.to_owned(),
			ch,
			pos,
		});
	}
	if name.len() > MAX_NAME_LEN {
		return Err(ModelError::NameTooLong {
			name: name.to_owned(),
			len: name.len(),
			max: MAX_NAME_LEN,
		});
	}
	Ok(name.as_bytes())
}

fn verify_tiling(regions: &[ByteRegion], total: usize) -> Result<()> {
	let mut expected = 0;
	for region in regions {
		if region.offset != expected {
			return Err(ModelError::TilingMismatch {
				expected,
				found: region.offset,
			});
		}
		expected = region.end();
	}
	if expected != total {
		return Err(ModelError::TilingMismatch { expected: total, found: expected });
	}
	Ok(())
}

#[cfg(test)]
mod tests;
