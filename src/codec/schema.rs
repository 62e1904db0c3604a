use crate::codec::{Cursor, Endianness, IntType, ModelError, Result, write_integer};

/// Sentinel stored in pointer fields that the layout builder has yet to assign.
pub const UNRESOLVED: i64 = -1;

/// One field declaration inside a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
	/// Field name as it appears in format documentation.
	pub name: &'static str,
	/// Integer type of the field.
	pub ty: IntType,
	/// Whether the field holds a byte offset into the same buffer.
	pub pointer: bool,
}

impl FieldDef {
	/// Signed 32-bit data field.
	pub const fn data(name: &'static str) -> Self {
		Self {
			name,
			ty: IntType::I32,
			pointer: false,
		}
	}

	/// Signed 32-bit pointer field.
	pub const fn pointer(name: &'static str) -> Self {
		Self {
			name,
			ty: IntType::I32,
			pointer: true,
		}
	}
}

/// Ordered field list of one binary record kind.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
	name: &'static str,
	fields: &'static [FieldDef],
	size: usize,
}

impl RecordSchema {
	/// Declare a schema; the byte size is computed here, once.
	pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
		let mut size = 0;
		let mut idx = 0;
		while idx < fields.len() {
			size += fields[idx].ty.width();
			idx += 1;
		}
		Self { name, fields, size }
	}

	/// Schema name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Fields in declaration order.
	pub fn fields(&self) -> &'static [FieldDef] {
		self.fields
	}

	/// Record size in bytes.
	pub const fn size(&self) -> usize {
		self.size
	}

	/// Position of `name` in the field list.
	pub fn index_of(&self, name: &'static str) -> Result<usize> {
		self.fields
			.iter()
			.position(|item| item.name == name)
			.ok_or(ModelError::UnknownField { schema: self.name, field: name })
	}
}

/// Field names used by the three record schemas.
pub mod field {
	#![allow(missing_docs)]

	pub const VERSION_SIGNATURE: &str = "VersionSignature";
	pub const NUMBER_OF_VERTEXES: &str = "NumberOfVertexes";
	pub const NUMBER_OF_PRIMITIVES: &str = "NumberOfPrimitives";
	pub const SELECTION_PRIMITIVE_OFFSET: &str = "SelectionPrimitiveOffset";
	pub const X_FROM_PARENT: &str = "XFromParent";
	pub const Y_FROM_PARENT: &str = "YFromParent";
	pub const Z_FROM_PARENT: &str = "ZFromParent";
	pub const OFFSET_TO_OBJECT_NAME: &str = "OffsetToObjectName";
	pub const ALWAYS_0: &str = "Always_0";
	pub const OFFSET_TO_VERTEX_ARRAY: &str = "OffsetToVertexArray";
	pub const OFFSET_TO_PRIMITIVE_ARRAY: &str = "OffsetToPrimitiveArray";
	pub const OFFSET_TO_SIBLING_OBJECT: &str = "OffsetToSiblingObject";
	pub const OFFSET_TO_CHILD_OBJECT: &str = "OffsetToChildObject";

	pub const X: &str = "x";
	pub const Y: &str = "y";
	pub const Z: &str = "z";

	pub const COLOR_INDEX: &str = "ColorIndex";
	pub const NUMBER_OF_VERTEX_INDEXES: &str = "NumberOfVertexIndexes";
	pub const OFFSET_TO_VERTEX_INDEX_ARRAY: &str = "OffsetToVertexIndexArray";
	pub const OFFSET_TO_TEXTURE_NAME: &str = "OffsetToTextureName";
	pub const UNKNOWN_1: &str = "Unknown_1";
	pub const UNKNOWN_2: &str = "Unknown_2";
	pub const IS_COLORED: &str = "IsColored";
}

const OBJECT_FIELDS: &[FieldDef] = &[
	FieldDef::data(field::VERSION_SIGNATURE),
	FieldDef::data(field::NUMBER_OF_VERTEXES),
	FieldDef::data(field::NUMBER_OF_PRIMITIVES),
	FieldDef::data(field::SELECTION_PRIMITIVE_OFFSET),
	FieldDef::data(field::X_FROM_PARENT),
	FieldDef::data(field::Y_FROM_PARENT),
	FieldDef::data(field::Z_FROM_PARENT),
	FieldDef::pointer(field::OFFSET_TO_OBJECT_NAME),
	FieldDef::data(field::ALWAYS_0),
	FieldDef::pointer(field::OFFSET_TO_VERTEX_ARRAY),
	FieldDef::pointer(field::OFFSET_TO_PRIMITIVE_ARRAY),
	FieldDef::pointer(field::OFFSET_TO_SIBLING_OBJECT),
	FieldDef::pointer(field::OFFSET_TO_CHILD_OBJECT),
];

const VERTEX_FIELDS: &[FieldDef] = &[FieldDef::data(field::X), FieldDef::data(field::Y), FieldDef::data(field::Z)];

const PRIMITIVE_FIELDS: &[FieldDef] = &[
	FieldDef::data(field::COLOR_INDEX),
	FieldDef::data(field::NUMBER_OF_VERTEX_INDEXES),
	FieldDef::data(field::ALWAYS_0),
	FieldDef::pointer(field::OFFSET_TO_VERTEX_INDEX_ARRAY),
	FieldDef::pointer(field::OFFSET_TO_TEXTURE_NAME),
	FieldDef::data(field::UNKNOWN_1),
	FieldDef::data(field::UNKNOWN_2),
	FieldDef::data(field::IS_COLORED),
];

/// Object record: 13 signed 32-bit fields, 52 bytes.
pub static OBJECT_SCHEMA: RecordSchema = RecordSchema::new("Object", OBJECT_FIELDS);

/// Vertex record: three signed 32-bit coordinates, 12 bytes.
pub static VERTEX_SCHEMA: RecordSchema = RecordSchema::new("Vertex", VERTEX_FIELDS);

/// Primitive record: 8 signed 32-bit fields, 32 bytes.
pub static PRIMITIVE_SCHEMA: RecordSchema = RecordSchema::new("Primitive", PRIMITIVE_FIELDS);

/// Raw field values of one record, in schema order.
///
/// Values are kept wide so an assembled value that does not fit its field is
/// reported by [`write_record`] instead of being truncated on assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	schema: &'static RecordSchema,
	values: Vec<i64>,
}

impl Record {
	/// All-zero record for `schema`.
	pub fn zeroed(schema: &'static RecordSchema) -> Self {
		Self {
			schema,
			values: vec![0; schema.fields.len()],
		}
	}

	/// Schema this record belongs to.
	pub fn schema(&self) -> &'static RecordSchema {
		self.schema
	}

	/// Value of field `name`.
	pub fn get(&self, name: &'static str) -> Result<i64> {
		let idx = self.schema.index_of(name)?;
		Ok(self.values[idx])
	}

	/// Overwrite field `name`.
	pub fn set(&mut self, name: &'static str, value: i64) -> Result<()> {
		let idx = self.schema.index_of(name)?;
		self.values[idx] = value;
		Ok(())
	}

	/// Set every pointer field to [`UNRESOLVED`].
	pub fn clear_pointers(&mut self) {
		for (def, value) in self.schema.fields.iter().zip(self.values.iter_mut()) {
			if def.pointer {
				*value = UNRESOLVED;
			}
		}
	}

	/// Iterate `(field, value)` pairs in schema order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDef, i64)> + '_ {
		self.schema.fields.iter().zip(self.values.iter().copied())
	}

	/// Iterate `(field, value)` pairs of non-pointer fields.
	pub fn data_fields(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
		self.iter().filter(|(def, _)| !def.pointer).map(|(def, value)| (def.name, value))
	}
}

/// Read one little-endian record of `schema` at `offset`.
pub fn read_record(buf: &[u8], offset: usize, schema: &'static RecordSchema) -> Result<Record> {
	let mut cursor = Cursor::at(buf, offset);
	let mut values = Vec::with_capacity(schema.fields.len());
	for def in schema.fields {
		values.push(cursor.read_int(def.ty, Endianness::Little)?);
	}
	Ok(Record { schema, values })
}

/// Write `record` as a little-endian `schema` record at `offset`.
pub fn write_record(record: &Record, buf: &mut [u8], offset: usize, schema: &'static RecordSchema) -> Result<()> {
	if record.schema != schema {
		return Err(ModelError::SchemaMismatch {
			record: record.schema.name,
			schema: schema.name,
		});
	}

	let mut pos = offset;
	for (def, value) in record.iter() {
		write_integer(value, buf, pos, def.ty, Endianness::Little)?;
		pos += def.ty.width();
	}
	Ok(())
}
