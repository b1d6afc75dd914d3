use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::nbt::{Compression, NbtError, Record, Result, TagKind, Value};

/// Streaming writer over the payload grammar, mirror of the decoder.
pub struct Encoder<'a> {
	writer: &'a mut dyn Write,
}

impl<'a> Encoder<'a> {
	/// Create an encoder at the start of a tag stream.
	pub fn new(writer: &'a mut dyn Write) -> Self {
		Self { writer }
	}

	/// Write raw payload bytes.
	pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
		self.writer.write_all(bytes)?;
		Ok(())
	}

	/// Write a tag code byte.
	pub fn write_kind(&mut self, kind: TagKind) -> Result<()> {
		self.write_raw(&[kind.code()])
	}

	/// Write a tag or field name.
	pub fn write_name(&mut self, name: &str) -> Result<()> {
		self.write_string(name)
	}

	/// Write a u16-length-prefixed UTF-8 string payload.
	pub fn write_string(&mut self, value: &str) -> Result<()> {
		let len = u16::try_from(value.len()).map_err(|_| NbtError::ValueTooLarge { len: value.len(), max: usize::from(u16::MAX) })?;
		self.write_raw(&len.to_be_bytes())?;
		self.write_raw(value.as_bytes())
	}

	/// Write a u32 element or byte count.
	pub fn write_len(&mut self, len: usize) -> Result<()> {
		let len = u32::try_from(len).map_err(|_| NbtError::ValueTooLarge { len, max: u32::MAX as usize })?;
		self.write_raw(&len.to_be_bytes())
	}

	/// Write a signed byte.
	pub fn write_i8(&mut self, value: i8) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write an unsigned byte.
	pub fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_raw(&[value])
	}

	/// Write a big-endian `i16`.
	pub fn write_i16(&mut self, value: i16) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `u16`.
	pub fn write_u16(&mut self, value: u16) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `i32`.
	pub fn write_i32(&mut self, value: i32) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `u32`.
	pub fn write_u32(&mut self, value: u32) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `i64`.
	pub fn write_i64(&mut self, value: i64) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `u64`.
	pub fn write_u64(&mut self, value: u64) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `f32`.
	pub fn write_f32(&mut self, value: f32) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write a big-endian `f64`.
	pub fn write_f64(&mut self, value: f64) -> Result<()> {
		self.write_raw(&value.to_be_bytes())
	}

	/// Write one named tag: kind byte, name, payload.
	pub fn write_tag<T: ToNbt + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
		self.write_kind(value.kind())?;
		self.write_name(name)?;
		value.write_payload(self)
	}
}

/// Encode half of the native type lattice: write `self` as one payload.
pub trait ToNbt {
	/// Wire kind this value encodes as.
	fn kind(&self) -> TagKind;

	/// Write this value's bare payload.
	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()>;

	/// Validate static field mappings before any byte is written.
	fn check_fields() -> Result<()> {
		Ok(())
	}
}

/// Value with one statically known wire kind, usable as a list element.
///
/// Everything except the dynamic [`Value`] carries its kind in the type, so
/// a sequence's element code is written once from the declared element type.
pub trait NbtType: ToNbt {
	/// Wire kind shared by every value of this type.
	const KIND: TagKind;
}

impl ToNbt for bool {
	fn kind(&self) -> TagKind {
		TagKind::Byte
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_i8(if *self { 1 } else { 0 })
	}
}

impl NbtType for bool {
	const KIND: TagKind = TagKind::Byte;
}

impl ToNbt for i8 {
	fn kind(&self) -> TagKind {
		TagKind::Byte
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_i8(*self)
	}
}

impl NbtType for i8 {
	const KIND: TagKind = TagKind::Byte;
}

impl ToNbt for u8 {
	fn kind(&self) -> TagKind {
		TagKind::Byte
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_u8(*self)
	}
}

impl NbtType for u8 {
	const KIND: TagKind = TagKind::Byte;
}

impl ToNbt for i16 {
	fn kind(&self) -> TagKind {
		TagKind::Short
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_i16(*self)
	}
}

impl NbtType for i16 {
	const KIND: TagKind = TagKind::Short;
}

impl ToNbt for u16 {
	fn kind(&self) -> TagKind {
		TagKind::Short
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_u16(*self)
	}
}

impl NbtType for u16 {
	const KIND: TagKind = TagKind::Short;
}

impl ToNbt for i32 {
	fn kind(&self) -> TagKind {
		TagKind::Int
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_i32(*self)
	}
}

impl NbtType for i32 {
	const KIND: TagKind = TagKind::Int;
}

impl ToNbt for u32 {
	fn kind(&self) -> TagKind {
		TagKind::Int
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_u32(*self)
	}
}

impl NbtType for u32 {
	const KIND: TagKind = TagKind::Int;
}

impl ToNbt for i64 {
	fn kind(&self) -> TagKind {
		TagKind::Long
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_i64(*self)
	}
}

impl NbtType for i64 {
	const KIND: TagKind = TagKind::Long;
}

impl ToNbt for u64 {
	fn kind(&self) -> TagKind {
		TagKind::Long
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_u64(*self)
	}
}

impl NbtType for u64 {
	const KIND: TagKind = TagKind::Long;
}

impl ToNbt for f32 {
	fn kind(&self) -> TagKind {
		TagKind::Float
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_f32(*self)
	}
}

impl NbtType for f32 {
	const KIND: TagKind = TagKind::Float;
}

impl ToNbt for f64 {
	fn kind(&self) -> TagKind {
		TagKind::Double
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_f64(*self)
	}
}

impl NbtType for f64 {
	const KIND: TagKind = TagKind::Double;
}

impl ToNbt for str {
	fn kind(&self) -> TagKind {
		TagKind::String
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_string(self)
	}
}

impl ToNbt for String {
	fn kind(&self) -> TagKind {
		TagKind::String
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_string(self)
	}
}

impl NbtType for String {
	const KIND: TagKind = TagKind::String;
}

impl<const N: usize> ToNbt for [u8; N] {
	fn kind(&self) -> TagKind {
		TagKind::ByteArray
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_len(N)?;
		encoder.write_raw(self)
	}
}

impl<const N: usize> NbtType for [u8; N] {
	const KIND: TagKind = TagKind::ByteArray;
}

impl<const N: usize> ToNbt for [i32; N] {
	fn kind(&self) -> TagKind {
		TagKind::IntArray
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_len(N)?;
		for value in self {
			encoder.write_i32(*value)?;
		}
		Ok(())
	}
}

impl<const N: usize> NbtType for [i32; N] {
	const KIND: TagKind = TagKind::IntArray;
}

impl<const N: usize> ToNbt for [u32; N] {
	fn kind(&self) -> TagKind {
		TagKind::IntArray
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_len(N)?;
		for value in self {
			encoder.write_u32(*value)?;
		}
		Ok(())
	}
}

impl<const N: usize> NbtType for [u32; N] {
	const KIND: TagKind = TagKind::IntArray;
}

impl<const N: usize> ToNbt for [i64; N] {
	fn kind(&self) -> TagKind {
		TagKind::LongArray
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_len(N)?;
		for value in self {
			encoder.write_i64(*value)?;
		}
		Ok(())
	}
}

impl<const N: usize> NbtType for [i64; N] {
	const KIND: TagKind = TagKind::LongArray;
}

impl<const N: usize> ToNbt for [u64; N] {
	fn kind(&self) -> TagKind {
		TagKind::LongArray
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_len(N)?;
		for value in self {
			encoder.write_u64(*value)?;
		}
		Ok(())
	}
}

impl<const N: usize> NbtType for [u64; N] {
	const KIND: TagKind = TagKind::LongArray;
}

impl<T: NbtType> ToNbt for Vec<T> {
	fn kind(&self) -> TagKind {
		TagKind::List
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.write_kind(T::KIND)?;
		encoder.write_len(self.len())?;

		for (index, item) in self.iter().enumerate() {
			item.write_payload(encoder).map_err(|err| err.at_index(index))?;
		}

		Ok(())
	}

	fn check_fields() -> Result<()> {
		T::check_fields()
	}
}

impl<T: NbtType> NbtType for Vec<T> {
	const KIND: TagKind = TagKind::List;
}

impl<V: ToNbt> ToNbt for HashMap<String, V> {
	fn kind(&self) -> TagKind {
		TagKind::Compound
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		for (name, value) in self {
			encoder.write_tag(name, value).map_err(|err| err.at_field(name))?;
		}

		encoder.write_kind(TagKind::End)
	}

	fn check_fields() -> Result<()> {
		V::check_fields()
	}
}

impl<V: ToNbt> NbtType for HashMap<String, V> {
	const KIND: TagKind = TagKind::Compound;
}

impl ToNbt for Value {
	fn kind(&self) -> TagKind {
		self.kind()
	}

	fn write_payload(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		match self {
			Self::Byte(value) => encoder.write_i8(*value),
			Self::Short(value) => encoder.write_i16(*value),
			Self::Int(value) => encoder.write_i32(*value),
			Self::Long(value) => encoder.write_i64(*value),
			Self::Float(value) => encoder.write_f32(*value),
			Self::Double(value) => encoder.write_f64(*value),
			Self::ByteArray(bytes) => {
				encoder.write_len(bytes.len())?;
				encoder.write_raw(bytes)
			}
			Self::String(text) => encoder.write_string(text),
			Self::List { elem, items } => {
				encoder.write_kind(*elem)?;
				encoder.write_len(items.len())?;

				for (index, item) in items.iter().enumerate() {
					if item.kind() != *elem {
						return Err(NbtError::ListElementMismatch { expected: *elem, found: item.kind() }.at_index(index));
					}
					item.write_payload(encoder).map_err(|err| err.at_index(index))?;
				}

				Ok(())
			}
			Self::Compound(entries) => {
				let mut seen = HashSet::with_capacity(entries.len());
				for entry in entries {
					if !seen.insert(entry.name.as_str()) {
						return Err(NbtError::DuplicateFieldName { record: "Compound", name: entry.name.clone() });
					}
				}

				for entry in entries {
					encoder.write_tag(&entry.name, &entry.value).map_err(|err| err.at_field(&entry.name))?;
				}

				encoder.write_kind(TagKind::End)
			}
			Self::IntArray(values) => {
				encoder.write_len(values.len())?;
				for value in values {
					encoder.write_i32(*value)?;
				}
				Ok(())
			}
			Self::LongArray(values) => {
				encoder.write_len(values.len())?;
				for value in values {
					encoder.write_i64(*value)?;
				}
				Ok(())
			}
		}
	}
}

/// Encode a record's mapped fields as a compound payload, declaration order.
pub fn write_record<R: Record>(record: &R, encoder: &mut Encoder<'_>) -> Result<()> {
	let table = R::table()?;

	for field in table.fields() {
		(field.encode)(record, encoder).map_err(|err| err.at_field(field.name))?;
	}

	encoder.write_kind(TagKind::End)
}

/// Write `value` as one root named tag with an empty name.
///
/// The value's field mappings, nested record types included, are validated
/// before the first byte is written; the compression trailer is finalized
/// before returning.
pub fn encode<T: ToNbt + ?Sized>(compression: Compression, sink: impl Write, value: &T) -> Result<()> {
	T::check_fields()?;

	let mut sink = compression.writer(sink);
	let mut encoder = Encoder::new(&mut sink);
	encoder.write_tag("", value)?;
	sink.finish()
}
