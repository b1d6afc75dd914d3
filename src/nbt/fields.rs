use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::nbt::{Decoder, Encoder, FromNbt, NbtError, Result, TagKind, ToNbt};

/// Maps one record field to its wire name and codec accessors.
pub struct FieldDef<R> {
	/// Wire name this field reads and writes as.
	pub name: &'static str,
	/// Decode one payload of the given wire kind into the field.
	pub decode: fn(&mut R, TagKind, &mut Decoder<'_>) -> Result<()>,
	/// Write the field as one named tag, header included.
	pub encode: fn(&R, &mut Encoder<'_>) -> Result<()>,
	/// Validate the field's value type mapping, nested records included.
	pub check: fn(&R) -> Result<()>,
}

impl<R> fmt::Debug for FieldDef<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDef").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Native struct with a declared wire field mapping.
///
/// Implemented by [`nbt_record!`](crate::nbt_record); both codec directions
/// consume the same table, so whatever one writes the other accepts.
pub trait Record: Sized + 'static {
	/// Record type name used in diagnostics.
	const NAME: &'static str;

	/// Field descriptors in declaration order.
	fn fields() -> &'static [FieldDef<Self>];

	/// The validated lookup table, built once per type.
	fn table() -> Result<&'static FieldTable<Self>>;
}

/// Wire-name lookup table over a record's field descriptors.
pub struct FieldTable<R: 'static> {
	fields: &'static [FieldDef<R>],
	by_name: HashMap<&'static str, usize>,
}

impl<R> fmt::Debug for FieldTable<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldTable").field("fields", &self.fields).finish()
	}
}

impl<R> FieldTable<R> {
	fn build(fields: &'static [FieldDef<R>]) -> std::result::Result<Self, &'static str> {
		let mut by_name = HashMap::with_capacity(fields.len());
		for (slot, field) in fields.iter().enumerate() {
			if by_name.insert(field.name, slot).is_some() {
				return Err(field.name);
			}
		}

		Ok(Self { fields, by_name })
	}

	/// Look up a field descriptor by wire name.
	pub fn get(&self, name: &str) -> Option<&FieldDef<R>> {
		self.by_name.get(name).map(|slot| &self.fields[*slot])
	}

	/// All field descriptors in declaration order.
	pub fn fields(&self) -> &'static [FieldDef<R>] {
		self.fields
	}
}

/// Build-or-reuse a record's field table, surfacing a name collision as
/// [`NbtError::DuplicateFieldName`] on every call without rebuilding.
pub fn resolve_table<R: Record>(slot: &'static OnceLock<std::result::Result<FieldTable<R>, &'static str>>) -> Result<&'static FieldTable<R>> {
	match slot.get_or_init(|| FieldTable::build(R::fields())) {
		Ok(table) => Ok(table),
		Err(name) => Err(NbtError::DuplicateFieldName { record: R::NAME, name: (*name).to_owned() }),
	}
}

/// Validate a field value's own mapping, both codec directions.
pub fn check_value<T: FromNbt + ToNbt>(_value: &T) -> Result<()> {
	<T as FromNbt>::check_fields()?;
	<T as ToNbt>::check_fields()
}

thread_local! {
	static CHECK_STACK: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Resolve a record's table, then validate every field's value type.
///
/// A record type already on the current walk is not descended into again, so
/// self-referential records terminate.
pub fn run_field_checks<R: Record + Default>() -> Result<()> {
	let id = TypeId::of::<R>();
	let revisit = CHECK_STACK.with(|stack| {
		let mut stack = stack.borrow_mut();
		if stack.contains(&id) {
			return true;
		}
		stack.push(id);
		false
	});
	if revisit {
		return R::table().map(|_| ());
	}

	let outcome = check_each::<R>();
	CHECK_STACK.with(|stack| {
		stack.borrow_mut().pop();
	});
	outcome
}

fn check_each<R: Record + Default>() -> Result<()> {
	let table = R::table()?;
	let record = R::default();
	for field in table.fields() {
		(field.check)(&record)?;
	}
	Ok(())
}

/// Implements [`Record`], [`FromNbt`](crate::nbt::FromNbt),
/// [`ToNbt`](crate::nbt::ToNbt), and [`NbtType`](crate::nbt::NbtType) for a
/// struct that implements `Default`.
///
/// Each listed field maps to a wire field named after the field identifier;
/// `field => "wireName"` overrides the name. Fields left off the list never
/// touch the wire: they are skipped on encode and unknown to decode.
#[macro_export]
macro_rules! nbt_record {
	($ty:ty { $($field:ident $(=> $wire:literal)?),* $(,)? }) => {
		impl $crate::nbt::Record for $ty {
			const NAME: &'static str = stringify!($ty);

			fn fields() -> &'static [$crate::nbt::FieldDef<Self>] {
				static FIELDS: &[$crate::nbt::FieldDef<$ty>] = &[$(
					$crate::nbt::FieldDef {
						name: $crate::nbt_record!(@wire $field $(=> $wire)?),
						decode: |record, kind, decoder| {
							record.$field = $crate::nbt::FromNbt::decode_payload(kind, decoder)?;
							Ok(())
						},
						encode: |record, encoder| encoder.write_tag($crate::nbt_record!(@wire $field $(=> $wire)?), &record.$field),
						check: |record| $crate::nbt::check_value(&record.$field),
					},
				)*];
				FIELDS
			}

			fn table() -> $crate::nbt::Result<&'static $crate::nbt::FieldTable<Self>> {
				static TABLE: ::std::sync::OnceLock<::std::result::Result<$crate::nbt::FieldTable<$ty>, &'static str>> = ::std::sync::OnceLock::new();
				$crate::nbt::resolve_table::<$ty>(&TABLE)
			}
		}

		impl $crate::nbt::FromNbt for $ty {
			fn decode_payload(kind: $crate::nbt::TagKind, decoder: &mut $crate::nbt::Decoder<'_>) -> $crate::nbt::Result<Self> {
				let mut record = <$ty as ::std::default::Default>::default();
				$crate::nbt::read_record(&mut record, kind, decoder)?;
				Ok(record)
			}

			fn check_fields() -> $crate::nbt::Result<()> {
				$crate::nbt::run_field_checks::<$ty>()
			}
		}

		impl $crate::nbt::ToNbt for $ty {
			fn kind(&self) -> $crate::nbt::TagKind {
				$crate::nbt::TagKind::Compound
			}

			fn write_payload(&self, encoder: &mut $crate::nbt::Encoder<'_>) -> $crate::nbt::Result<()> {
				$crate::nbt::write_record(self, encoder)
			}

			fn check_fields() -> $crate::nbt::Result<()> {
				$crate::nbt::run_field_checks::<$ty>()
			}
		}

		impl $crate::nbt::NbtType for $ty {
			const KIND: $crate::nbt::TagKind = $crate::nbt::TagKind::Compound;
		}
	};

	(@wire $field:ident) => {
		stringify!($field)
	};
	(@wire $field:ident => $wire:literal) => {
		$wire
	};
}
