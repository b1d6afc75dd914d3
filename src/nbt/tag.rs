use std::fmt;

use crate::nbt::{NbtError, Result};

/// Wire kind of one tag, as carried in its leading code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
	/// Terminates the child list of a compound. Carries no name and no payload.
	End = 0,
	/// Signed 8-bit integer.
	Byte = 1,
	/// Signed 16-bit integer.
	Short = 2,
	/// Signed 32-bit integer.
	Int = 3,
	/// Signed 64-bit integer.
	Long = 4,
	/// IEEE 754 binary32.
	Float = 5,
	/// IEEE 754 binary64.
	Double = 6,
	/// Length-prefixed raw byte buffer.
	ByteArray = 7,
	/// Length-prefixed UTF-8 text.
	String = 8,
	/// Homogeneous sequence of unnamed payloads sharing one element kind.
	List = 9,
	/// Named heterogeneous children terminated by an end tag.
	Compound = 10,
	/// Length-prefixed sequence of 32-bit integers.
	IntArray = 11,
	/// Length-prefixed sequence of 64-bit integers.
	LongArray = 12,
}

impl TagKind {
	/// Wire code byte for this kind.
	pub fn code(self) -> u8 {
		self as u8
	}

	/// Map a wire code byte back to a kind.
	pub fn from_code(code: u8) -> Result<Self> {
		match code {
			0 => Ok(Self::End),
			1 => Ok(Self::Byte),
			2 => Ok(Self::Short),
			3 => Ok(Self::Int),
			4 => Ok(Self::Long),
			5 => Ok(Self::Float),
			6 => Ok(Self::Double),
			7 => Ok(Self::ByteArray),
			8 => Ok(Self::String),
			9 => Ok(Self::List),
			10 => Ok(Self::Compound),
			11 => Ok(Self::IntArray),
			12 => Ok(Self::LongArray),
			_ => Err(NbtError::UnknownTagKind { code }),
		}
	}

	/// Diagnostic label for any code byte, e.g. `TAG_Compound (0x0a)`.
	///
	/// Out-of-range codes render as `Unknown` rather than failing, so error
	/// paths can always describe what they saw.
	pub fn describe(code: u8) -> String {
		let name = match Self::from_code(code) {
			Ok(kind) => kind.name(),
			Err(_) => "Unknown",
		};
		format!("{name} (0x{code:02x})")
	}

	fn name(self) -> &'static str {
		match self {
			Self::End => "TAG_End",
			Self::Byte => "TAG_Byte",
			Self::Short => "TAG_Short",
			Self::Int => "TAG_Int",
			Self::Long => "TAG_Long",
			Self::Float => "TAG_Float",
			Self::Double => "TAG_Double",
			Self::ByteArray => "TAG_Byte_Array",
			Self::String => "TAG_String",
			Self::List => "TAG_List",
			Self::Compound => "TAG_Compound",
			Self::IntArray => "TAG_Int_Array",
			Self::LongArray => "TAG_Long_Array",
		}
	}
}

impl fmt::Display for TagKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", Self::describe(self.code()))
	}
}
