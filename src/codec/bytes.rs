use std::fmt;

use crate::codec::{ModelError, Result};

/// Fixed-width integer types that can appear in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
	/// Unsigned 8-bit.
	U8,
	/// Signed 8-bit.
	I8,
	/// Unsigned 16-bit.
	U16,
	/// Signed 16-bit.
	I16,
	/// Unsigned 32-bit.
	U32,
	/// Signed 32-bit.
	I32,
}

impl IntType {
	/// Width in bytes.
	pub const fn width(self) -> usize {
		match self {
			Self::U8 | Self::I8 => 1,
			Self::U16 | Self::I16 => 2,
			Self::U32 | Self::I32 => 4,
		}
	}

	/// Inclusive lower bound.
	pub const fn min(self) -> i64 {
		match self {
			Self::U8 | Self::U16 | Self::U32 => 0,
			Self::I8 => i8::MIN as i64,
			Self::I16 => i16::MIN as i64,
			Self::I32 => i32::MIN as i64,
		}
	}

	/// Inclusive upper bound.
	pub const fn max(self) -> i64 {
		match self {
			Self::U8 => u8::MAX as i64,
			Self::I8 => i8::MAX as i64,
			Self::U16 => u16::MAX as i64,
			Self::I16 => i16::MAX as i64,
			Self::U32 => u32::MAX as i64,
			Self::I32 => i32::MAX as i64,
		}
	}

	/// Render the type as its short label (`U8`, `I32`, ...).
	pub fn as_str(self) -> &'static str {
		match self {
			Self::U8 => "U8",
			Self::I8 => "I8",
			Self::U16 => "U16",
			Self::I16 => "I16",
			Self::U32 => "U32",
			Self::I32 => "I32",
		}
	}
}

impl fmt::Display for IntType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Byte order for integer access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
	/// Least significant byte first. The `.3do` format is always little-endian.
	#[default]
	Little,
	/// Most significant byte first.
	Big,
}

/// Read one integer of type `ty` at `offset`.
///
/// Every bit pattern is a valid value; the only failure is a read past the end of `buf`.
pub fn read_integer(buf: &[u8], offset: usize, ty: IntType, endianness: Endianness) -> Result<i64> {
	let raw = slot(buf, offset, ty.width())?;
	let mut wide = [0_u8; 4];
	wide[..raw.len()].copy_from_slice(raw);

	Ok(match (ty, endianness) {
		(IntType::U8, _) => i64::from(raw[0]),
		(IntType::I8, _) => i64::from(raw[0] as i8),
		(IntType::U16, Endianness::Little) => i64::from(u16::from_le_bytes([raw[0], raw[1]])),
		(IntType::U16, Endianness::Big) => i64::from(u16::from_be_bytes([raw[0], raw[1]])),
		(IntType::I16, Endianness::Little) => i64::from(i16::from_le_bytes([raw[0], raw[1]])),
		(IntType::I16, Endianness::Big) => i64::from(i16::from_be_bytes([raw[0], raw[1]])),
		(IntType::U32, Endianness::Little) => i64::from(u32::from_le_bytes(wide)),
		(IntType::U32, Endianness::Big) => i64::from(u32::from_be_bytes(wide)),
		(IntType::I32, Endianness::Little) => i64::from(i32::from_le_bytes(wide)),
		(IntType::I32, Endianness::Big) => i64::from(i32::from_be_bytes(wide)),
	})
}

/// Write `value` as type `ty` at `offset`.
///
/// Values outside the inclusive bounds of `ty` are rejected instead of truncated.
pub fn write_integer(value: i64, buf: &mut [u8], offset: usize, ty: IntType, endianness: Endianness) -> Result<()> {
	if value < ty.min() || value > ty.max() {
		return Err(ModelError::IntegerRange {
			value,
			ty,
			min: ty.min(),
			max: ty.max(),
		});
	}

	let len = buf.len();
	let dest = buf.get_mut(offset..offset.saturating_add(ty.width())).ok_or(ModelError::UnexpectedEof {
		at: offset as i64,
		need: ty.width(),
		len,
	})?;

	// `value` is within the bounds of `ty` here.
	match (ty, endianness) {
		(IntType::U8 | IntType::I8, _) => dest[0] = value as u8,
		(IntType::U16 | IntType::I16, Endianness::Little) => dest.copy_from_slice(&(value as u16).to_le_bytes()),
		(IntType::U16 | IntType::I16, Endianness::Big) => dest.copy_from_slice(&(value as u16).to_be_bytes()),
		(IntType::U32 | IntType::I32, Endianness::Little) => dest.copy_from_slice(&(value as u32).to_le_bytes()),
		(IntType::U32 | IntType::I32, Endianness::Big) => dest.copy_from_slice(&(value as u32).to_be_bytes()),
	}

	Ok(())
}

fn slot(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
	buf.get(offset..offset.saturating_add(width)).ok_or(ModelError::UnexpectedEof {
		at: offset as i64,
		need: width,
		len: buf.len(),
	})
}

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Create a cursor positioned at `pos`.
	pub fn at(bytes: &'a [u8], pos: usize) -> Self {
		Self { bytes, pos }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read one integer and advance by its width.
	pub fn read_int(&mut self, ty: IntType, endianness: Endianness) -> Result<i64> {
		let value = read_integer(self.bytes, self.pos, ty, endianness)?;
		self.pos += ty.width();
		Ok(value)
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		let value = self.read_int(IntType::U16, Endianness::Little)?;
		// U16 reads never exceed u16::MAX.
		Ok(value as u16)
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		let value = self.read_int(IntType::I32, Endianness::Little)?;
		Ok(value as i32)
	}
}
