use crate::nbt::TagKind;

/// One decoded tag payload in dynamic form, for targets whose shape is not
/// known until the stream is read.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Signed 8-bit integer.
	Byte(i8),
	/// Signed 16-bit integer.
	Short(i16),
	/// Signed 32-bit integer.
	Int(i32),
	/// Signed 64-bit integer.
	Long(i64),
	/// IEEE 754 binary32.
	Float(f32),
	/// IEEE 754 binary64.
	Double(f64),
	/// Raw byte buffer.
	ByteArray(Vec<u8>),
	/// UTF-8 text.
	String(String),
	/// Homogeneous sequence. The element kind is kept so an empty list
	/// re-encodes with the same element code it was read with.
	List {
		/// Element kind shared by every entry.
		elem: TagKind,
		/// Element payloads in wire order.
		items: Vec<Value>,
	},
	/// Named children in wire order.
	Compound(Vec<NamedValue>),
	/// Sequence of 32-bit integers.
	IntArray(Vec<i32>),
	/// Sequence of 64-bit integers.
	LongArray(Vec<i64>),
}

/// One named child inside a compound value.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
	/// Wire field name.
	pub name: String,
	/// Decoded payload.
	pub value: Value,
}

impl Value {
	/// Wire kind this value carries and encodes as.
	pub fn kind(&self) -> TagKind {
		match self {
			Self::Byte(_) => TagKind::Byte,
			Self::Short(_) => TagKind::Short,
			Self::Int(_) => TagKind::Int,
			Self::Long(_) => TagKind::Long,
			Self::Float(_) => TagKind::Float,
			Self::Double(_) => TagKind::Double,
			Self::ByteArray(_) => TagKind::ByteArray,
			Self::String(_) => TagKind::String,
			Self::List { .. } => TagKind::List,
			Self::Compound(_) => TagKind::Compound,
			Self::IntArray(_) => TagKind::IntArray,
			Self::LongArray(_) => TagKind::LongArray,
		}
	}

	/// Look up a direct child of a compound by name, first match wins.
	pub fn field(&self, name: &str) -> Option<&Value> {
		match self {
			Self::Compound(entries) => entries.iter().find(|entry| entry.name == name).map(|entry| &entry.value),
			_ => None,
		}
	}
}
