use std::any;
use std::collections::HashMap;
use std::io::Read;

use crate::nbt::{Compression, NamedValue, NbtError, Record, Result, TagKind, Value};

/// Maximum container nesting accepted before a stream is rejected.
const MAX_DEPTH: u32 = 64;
/// Upper bound on up-front element reservations; wire lengths are untrusted.
const MAX_PREALLOC: usize = 4096;
/// Read granularity for raw byte payloads.
const CHUNK: usize = 8192;

/// Streaming reader over the payload grammar: big-endian scalars, u16-length
/// strings, u32-length buffers, list headers.
pub struct Decoder<'a> {
	reader: &'a mut dyn Read,
	depth: u32,
}

impl<'a> Decoder<'a> {
	/// Create a decoder at the start of a tag stream.
	pub fn new(reader: &'a mut dyn Read) -> Self {
		Self { reader, depth: 0 }
	}

	fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
		self.reader.read_exact(buf)?;
		Ok(())
	}

	/// Read a tag code byte and map it to a kind.
	pub fn read_kind(&mut self) -> Result<TagKind> {
		TagKind::from_code(self.read_u8()?)
	}

	/// Read a tag or field name.
	pub fn read_name(&mut self) -> Result<String> {
		self.read_string()
	}

	/// Read a u16-length-prefixed UTF-8 string payload.
	pub fn read_string(&mut self) -> Result<String> {
		let len = usize::from(self.read_u16()?);
		let mut buf = vec![0_u8; len];
		self.fill(&mut buf)?;
		Ok(String::from_utf8(buf)?)
	}

	/// Read a u32 element or byte count.
	pub fn read_len(&mut self) -> Result<usize> {
		Ok(self.read_u32()? as usize)
	}

	/// Read a list header: element kind, then element count.
	pub fn read_list_header(&mut self) -> Result<(TagKind, usize)> {
		let elem = self.read_kind()?;
		let len = self.read_len()?;
		Ok((elem, len))
	}

	/// Read `len` raw bytes, growing the buffer chunk-wise so a forged
	/// length prefix cannot force a huge allocation before any data exists.
	pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(len.min(CHUNK));
		let mut buf = [0_u8; CHUNK];
		let mut remaining = len;

		while remaining > 0 {
			let take = remaining.min(buf.len());
			self.fill(&mut buf[..take])?;
			out.extend_from_slice(&buf[..take]);
			remaining -= take;
		}

		Ok(out)
	}

	/// Read an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		let mut buf = [0_u8; 1];
		self.fill(&mut buf)?;
		Ok(buf[0])
	}

	/// Read a signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_u8()? as i8)
	}

	/// Read a big-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		let mut buf = [0_u8; 2];
		self.fill(&mut buf)?;
		Ok(i16::from_be_bytes(buf))
	}

	/// Read a big-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		let mut buf = [0_u8; 2];
		self.fill(&mut buf)?;
		Ok(u16::from_be_bytes(buf))
	}

	/// Read a big-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		let mut buf = [0_u8; 4];
		self.fill(&mut buf)?;
		Ok(i32::from_be_bytes(buf))
	}

	/// Read a big-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		let mut buf = [0_u8; 4];
		self.fill(&mut buf)?;
		Ok(u32::from_be_bytes(buf))
	}

	/// Read a big-endian `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		let mut buf = [0_u8; 8];
		self.fill(&mut buf)?;
		Ok(i64::from_be_bytes(buf))
	}

	/// Read a big-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		let mut buf = [0_u8; 8];
		self.fill(&mut buf)?;
		Ok(u64::from_be_bytes(buf))
	}

	/// Read a big-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		let mut buf = [0_u8; 4];
		self.fill(&mut buf)?;
		Ok(f32::from_be_bytes(buf))
	}

	/// Read a big-endian `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		let mut buf = [0_u8; 8];
		self.fill(&mut buf)?;
		Ok(f64::from_be_bytes(buf))
	}

	/// Track entry into a nested container.
	pub fn enter(&mut self) -> Result<()> {
		if self.depth >= MAX_DEPTH {
			return Err(NbtError::DepthExceeded { max: MAX_DEPTH });
		}
		self.depth += 1;
		Ok(())
	}

	/// Track exit from a nested container.
	pub fn leave(&mut self) {
		self.depth = self.depth.saturating_sub(1);
	}
}

/// Decode half of the native type lattice: build `Self` from one payload.
pub trait FromNbt: Sized {
	/// Decode one payload of the given wire kind.
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self>;

	/// Validate static field mappings before any byte is read.
	fn check_fields() -> Result<()> {
		Ok(())
	}
}

fn mismatch<T>(kind: TagKind) -> NbtError {
	NbtError::TypeMismatch { kind, target: any::type_name::<T>() }
}

impl FromNbt for bool {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Byte => Ok(decoder.read_i8()? != 0),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for i8 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Byte => decoder.read_i8(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for u8 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Byte => decoder.read_u8(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for i16 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Short => decoder.read_i16(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for u16 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Short => decoder.read_u16(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for i32 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Int => decoder.read_i32(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for u32 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Int => decoder.read_u32(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for i64 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Long => decoder.read_i64(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for u64 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Long => decoder.read_u64(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for f32 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Float => decoder.read_f32(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for f64 {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::Double => decoder.read_f64(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

impl FromNbt for String {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::String => decoder.read_string(),
			_ => Err(mismatch::<Self>(kind)),
		}
	}
}

fn decode_array_elems<T: FromNbt>(decoder: &mut Decoder<'_>, elem: TagKind) -> Result<Vec<T>> {
	let len = decoder.read_len()?;
	let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));

	for index in 0..len {
		items.push(T::decode_payload(elem, decoder).map_err(|err| err.at_index(index))?);
	}

	Ok(items)
}

impl<T: FromNbt> FromNbt for Vec<T> {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::List => {
				let (elem, len) = decoder.read_list_header()?;
				decoder.enter()?;
				let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));

				for index in 0..len {
					items.push(T::decode_payload(elem, decoder).map_err(|err| err.at_index(index))?);
				}

				decoder.leave();
				Ok(items)
			}
			TagKind::ByteArray => decode_array_elems(decoder, TagKind::Byte),
			TagKind::IntArray => decode_array_elems(decoder, TagKind::Int),
			TagKind::LongArray => decode_array_elems(decoder, TagKind::Long),
			_ => Err(mismatch::<Self>(kind)),
		}
	}

	fn check_fields() -> Result<()> {
		T::check_fields()
	}
}

impl<T: FromNbt + Default, const N: usize> FromNbt for [T; N] {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		let elem = match kind {
			TagKind::ByteArray => TagKind::Byte,
			TagKind::IntArray => TagKind::Int,
			TagKind::LongArray => TagKind::Long,
			_ => return Err(mismatch::<Self>(kind)),
		};

		let len = decoder.read_len()?;
		if len > N {
			return Err(NbtError::CapacityTooSmall { need: len, have: N });
		}

		let mut items: [T; N] = std::array::from_fn(|_| T::default());
		for (index, slot) in items.iter_mut().enumerate().take(len) {
			*slot = T::decode_payload(elem, decoder).map_err(|err| err.at_index(index))?;
		}

		Ok(items)
	}

	fn check_fields() -> Result<()> {
		T::check_fields()
	}
}

impl<V: FromNbt> FromNbt for HashMap<String, V> {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		if kind != TagKind::Compound {
			return Err(mismatch::<Self>(kind));
		}

		decoder.enter()?;
		let mut entries = HashMap::new();

		loop {
			let child = decoder.read_kind()?;
			if child == TagKind::End {
				break;
			}

			let name = decoder.read_name()?;
			let value = V::decode_payload(child, decoder).map_err(|err| err.at_field(&name))?;
			entries.insert(name, value);
		}

		decoder.leave();
		Ok(entries)
	}

	fn check_fields() -> Result<()> {
		V::check_fields()
	}
}

impl FromNbt for Value {
	fn decode_payload(kind: TagKind, decoder: &mut Decoder<'_>) -> Result<Self> {
		match kind {
			TagKind::End => Err(NbtError::UnknownTagKind { code: TagKind::End.code() }),
			TagKind::Byte => Ok(Self::Byte(decoder.read_i8()?)),
			TagKind::Short => Ok(Self::Short(decoder.read_i16()?)),
			TagKind::Int => Ok(Self::Int(decoder.read_i32()?)),
			TagKind::Long => Ok(Self::Long(decoder.read_i64()?)),
			TagKind::Float => Ok(Self::Float(decoder.read_f32()?)),
			TagKind::Double => Ok(Self::Double(decoder.read_f64()?)),
			TagKind::ByteArray => {
				let len = decoder.read_len()?;
				Ok(Self::ByteArray(decoder.read_bytes(len)?))
			}
			TagKind::String => Ok(Self::String(decoder.read_string()?)),
			TagKind::List => {
				let (elem, len) = decoder.read_list_header()?;
				decoder.enter()?;
				let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));

				for index in 0..len {
					items.push(Self::decode_payload(elem, decoder).map_err(|err| err.at_index(index))?);
				}

				decoder.leave();
				Ok(Self::List { elem, items })
			}
			TagKind::Compound => {
				decoder.enter()?;
				let mut entries = Vec::new();

				loop {
					let child = decoder.read_kind()?;
					if child == TagKind::End {
						break;
					}

					let name = decoder.read_name()?;
					let value = Self::decode_payload(child, decoder).map_err(|err| err.at_field(&name))?;
					entries.push(NamedValue { name, value });
				}

				decoder.leave();
				Ok(Self::Compound(entries))
			}
			TagKind::IntArray => {
				let len = decoder.read_len()?;
				let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
				for _ in 0..len {
					items.push(decoder.read_i32()?);
				}
				Ok(Self::IntArray(items))
			}
			TagKind::LongArray => {
				let len = decoder.read_len()?;
				let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
				for _ in 0..len {
					items.push(decoder.read_i64()?);
				}
				Ok(Self::LongArray(items))
			}
		}
	}
}

/// Decode a compound payload into a record target, field by field.
///
/// Incoming names are looked up on the record's table; a name with no
/// mapping is a hard [`NbtError::UnhandledField`] rather than a skip.
pub fn read_record<R: Record>(target: &mut R, kind: TagKind, decoder: &mut Decoder<'_>) -> Result<()> {
	if kind != TagKind::Compound {
		return Err(NbtError::TypeMismatch { kind, target: R::NAME });
	}

	let table = R::table()?;
	decoder.enter()?;

	loop {
		let child = decoder.read_kind()?;
		if child == TagKind::End {
			break;
		}

		let name = decoder.read_name()?;
		let Some(field) = table.get(&name) else {
			return Err(NbtError::UnhandledField { kind: child, name, record: R::NAME });
		};

		(field.decode)(target, child, decoder).map_err(|err| err.at_field(field.name))?;
	}

	decoder.leave();
	Ok(())
}

/// Read one root named tag from `source` into `target`.
///
/// The target's field mappings, nested record types included, are validated
/// before the first byte is read. The root name is read and discarded; a bare
/// end tag at the root succeeds and leaves the target untouched. Bytes after
/// the root tag are never inspected.
pub fn decode<T: FromNbt>(compression: Compression, source: impl Read, target: &mut T) -> Result<()> {
	T::check_fields()?;

	let mut source = compression.reader(source);
	let mut decoder = Decoder::new(&mut source);

	let kind = decoder.read_kind()?;
	if kind == TagKind::End {
		return Ok(());
	}

	decoder.read_name()?;
	*target = T::decode_payload(kind, &mut decoder)?;
	Ok(())
}

/// Read one root named tag as a dynamic value, returning the root name too.
///
/// A bare end tag at the root maps to an unnamed empty compound.
pub fn decode_value(compression: Compression, source: impl Read) -> Result<(String, Value)> {
	let mut source = compression.reader(source);
	let mut decoder = Decoder::new(&mut source);

	let kind = decoder.read_kind()?;
	if kind == TagKind::End {
		return Ok((String::new(), Value::Compound(Vec::new())));
	}

	let name = decoder.read_name()?;
	let value = Value::decode_payload(kind, &mut decoder)?;
	Ok((name, value))
}

#[cfg(test)]
mod tests;
