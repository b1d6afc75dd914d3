use std::string::FromUtf8Error;

use thiserror::Error;

use crate::nbt::TagKind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NbtError>;

/// Errors produced while decoding, encoding, and dumping tag streams.
///
/// Failures inside containers are wrapped in [`NbtError::AtField`] and
/// [`NbtError::AtIndex`] frames on the way out, so the rendered message reads
/// innermost cause first, e.g.
/// `tag TAG_String (0x08) cannot decode into f32 at field "ip" at list index 0 at field "servers"`.
#[derive(Debug, Error)]
pub enum NbtError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Tag code byte with no handling: outside the known table, or an end
	/// marker where a value was required.
	#[error("unhandled tag kind 0x{code:02x}")]
	UnknownTagKind {
		/// Offending wire code byte.
		code: u8,
	},
	/// Wire kind cannot populate the requested native type.
	#[error("tag {kind} cannot decode into {target}")]
	TypeMismatch {
		/// Wire kind found in the stream.
		kind: TagKind,
		/// Native target type name.
		target: &'static str,
	},
	/// Two fields of one compound map to the same wire name.
	#[error("duplicate field name {name:?} in {record}")]
	DuplicateFieldName {
		/// Record type or compound owning the colliding fields.
		record: &'static str,
		/// Colliding wire name.
		name: String,
	},
	/// Incoming named tag has no mapping on the target record.
	#[error("unhandled tag {kind} named {name:?} in {record}")]
	UnhandledField {
		/// Wire kind of the unmapped tag.
		kind: TagKind,
		/// Wire name of the unmapped tag.
		name: String,
		/// Record type the name was looked up on.
		record: &'static str,
	},
	/// Value is longer than its length prefix can represent.
	#[error("value length {len} exceeds wire maximum {max}")]
	ValueTooLarge {
		/// Actual byte or element count.
		len: usize,
		/// Largest count the prefix can carry.
		max: usize,
	},
	/// Fixed-size target cannot hold the incoming element count.
	#[error("array of {need} elements exceeds target capacity {have}")]
	CapacityTooSmall {
		/// Incoming wire element count.
		need: usize,
		/// Target capacity.
		have: usize,
	},
	/// Container nesting exceeded the decoder limit.
	#[error("nesting depth exceeded (max={max})")]
	DepthExceeded {
		/// Maximum container nesting.
		max: u32,
	},
	/// String payload held invalid UTF-8.
	#[error("invalid utf-8 in string payload: {0}")]
	InvalidString(#[from] FromUtf8Error),
	/// Dynamic list element does not match the list's declared element kind.
	#[error("list element kind {found} does not match declared {expected}")]
	ListElementMismatch {
		/// Element kind declared in the list header.
		expected: TagKind,
		/// Offending element's kind.
		found: TagKind,
	},
	/// CLI compression mode argument was invalid.
	#[error("invalid compression mode: {mode}")]
	InvalidCompression {
		/// User-provided mode string.
		mode: String,
	},
	/// Failure attributed to one named compound field.
	#[error("{source} at field {name:?}")]
	AtField {
		/// Compound field name.
		name: String,
		/// Underlying failure.
		source: Box<NbtError>,
	},
	/// Failure attributed to one list or array element.
	#[error("{source} at list index {index}")]
	AtIndex {
		/// Zero-based element index.
		index: usize,
		/// Underlying failure.
		source: Box<NbtError>,
	},
}

impl NbtError {
	/// Wrap with the compound field name the failure occurred under.
	pub fn at_field(self, name: &str) -> Self {
		Self::AtField { name: name.to_owned(), source: Box::new(self) }
	}

	/// Wrap with the list or array index the failure occurred under.
	pub fn at_index(self, index: usize) -> Self {
		Self::AtIndex { index, source: Box::new(self) }
	}
}
