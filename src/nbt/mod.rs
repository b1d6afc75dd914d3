mod compression;
mod decode;
mod dump;
mod encode;
mod error;
mod fields;
mod tag;
mod value;

/// Compression mode selection, detection, and stream wrapping.
pub use compression::{Compression, Sink, Source};
/// Decoding trait, engine state, and entry points.
pub use decode::{Decoder, FromNbt, decode, decode_value, read_record};
/// Diagnostic tree dumper.
pub use dump::dump;
/// Encoding traits, engine state, and entry point.
pub use encode::{Encoder, NbtType, ToNbt, encode, write_record};
/// Error and result aliases.
pub use error::{NbtError, Result};
/// Record field mapping types and validation entry points.
pub use fields::{FieldDef, FieldTable, Record, check_value, resolve_table, run_field_checks};
/// Wire tag kinds and diagnostic labels.
pub use tag::TagKind;
/// Dynamic value tree.
pub use value::{NamedValue, Value};
