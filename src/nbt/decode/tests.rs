use std::collections::HashMap;

use crate::nbt::{Compression, NbtError, TagKind, Value, decode, decode_value};

fn header(kind: TagKind, name: &str) -> Vec<u8> {
	let mut out = vec![kind.code()];
	out.extend_from_slice(&(name.len() as u16).to_be_bytes());
	out.extend_from_slice(name.as_bytes());
	out
}

#[test]
fn root_scalar_decodes_and_name_is_discarded() {
	let mut wire = header(TagKind::Int, "answer");
	wire.extend_from_slice(&42_i32.to_be_bytes());

	let mut target = 0_i32;
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert_eq!(target, 42);
}

#[test]
fn decode_value_surfaces_root_name() {
	let mut wire = header(TagKind::String, "greeting");
	wire.extend_from_slice(&5_u16.to_be_bytes());
	wire.extend_from_slice(b"hello");

	let (name, value) = decode_value(Compression::None, wire.as_slice()).expect("decode succeeds");
	assert_eq!(name, "greeting");
	assert_eq!(value, Value::String("hello".to_owned()));
}

#[test]
fn empty_compound_decodes_with_zero_children() {
	let mut wire = header(TagKind::Compound, "");
	wire.push(TagKind::End.code());

	let (name, value) = decode_value(Compression::None, wire.as_slice()).expect("decode succeeds");
	assert_eq!(name, "");
	assert_eq!(value, Value::Compound(Vec::new()));
}

#[test]
fn root_end_tag_leaves_target_untouched() {
	let wire = [TagKind::End.code()];

	let mut target = 7_i32;
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert_eq!(target, 7);

	let (name, value) = decode_value(Compression::None, wire.as_slice()).expect("decode succeeds");
	assert_eq!(name, "");
	assert_eq!(value, Value::Compound(Vec::new()));
}

#[test]
fn trailing_bytes_are_never_inspected() {
	let mut wire = header(TagKind::Byte, "b");
	wire.push(0x01);
	wire.extend_from_slice(b"garbage after the root tag");

	let mut target = false;
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert!(target);
}

#[test]
fn unknown_code_byte_is_rejected() {
	let wire = [13_u8, 0, 0];

	let err = decode_value(Compression::None, wire.as_slice()).expect_err("code 13 rejected");
	match err {
		NbtError::UnknownTagKind { code } => assert_eq!(code, 13),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn unsigned_targets_reinterpret_wire_bits() {
	let mut wire = header(TagKind::Int, "n");
	wire.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);

	let mut target = 0_u32;
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert_eq!(target, u32::MAX);

	let mut signed = 0_i32;
	decode(Compression::None, wire.as_slice(), &mut signed).expect("decode succeeds");
	assert_eq!(signed, -1);
}

#[test]
fn vec_decodes_from_list_and_raw_arrays() {
	let mut wire = header(TagKind::List, "xs");
	wire.push(TagKind::Short.code());
	wire.extend_from_slice(&2_u32.to_be_bytes());
	wire.extend_from_slice(&300_i16.to_be_bytes());
	wire.extend_from_slice(&(-300_i16).to_be_bytes());

	let mut shorts: Vec<i16> = Vec::new();
	decode(Compression::None, wire.as_slice(), &mut shorts).expect("decode succeeds");
	assert_eq!(shorts, [300, -300]);

	let mut wire = header(TagKind::ByteArray, "raw");
	wire.extend_from_slice(&3_u32.to_be_bytes());
	wire.extend_from_slice(&[1, 2, 3]);

	let mut bytes: Vec<u8> = Vec::new();
	decode(Compression::None, wire.as_slice(), &mut bytes).expect("decode succeeds");
	assert_eq!(bytes, [1, 2, 3]);

	let mut wire = header(TagKind::LongArray, "longs");
	wire.extend_from_slice(&2_u32.to_be_bytes());
	wire.extend_from_slice(&i64::MIN.to_be_bytes());
	wire.extend_from_slice(&i64::MAX.to_be_bytes());

	let mut longs: Vec<i64> = Vec::new();
	decode(Compression::None, wire.as_slice(), &mut longs).expect("decode succeeds");
	assert_eq!(longs, [i64::MIN, i64::MAX]);
}

#[test]
fn array_element_type_must_match_target() {
	let mut wire = header(TagKind::IntArray, "ints");
	wire.extend_from_slice(&1_u32.to_be_bytes());
	wire.extend_from_slice(&5_i32.to_be_bytes());

	let mut wrong: Vec<i64> = Vec::new();
	let err = decode(Compression::None, wire.as_slice(), &mut wrong).expect_err("long target rejects int elements");
	let message = err.to_string();
	assert!(message.contains("TAG_Int (0x03)"), "message: {message}");
	assert!(message.contains("at list index 0"), "message: {message}");
}

#[test]
fn fixed_array_respects_capacity() {
	let mut wire = header(TagKind::ByteArray, "fits");
	wire.extend_from_slice(&2_u32.to_be_bytes());
	wire.extend_from_slice(&[9, 8]);

	let mut target = [0_u8; 4];
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert_eq!(target, [9, 8, 0, 0]);

	let mut wire = header(TagKind::ByteArray, "overflow");
	wire.extend_from_slice(&5_u32.to_be_bytes());
	wire.extend_from_slice(&[1, 2, 3, 4, 5]);

	let mut small = [0_u8; 4];
	let err = decode(Compression::None, wire.as_slice(), &mut small).expect_err("five bytes cannot fit four slots");
	match err {
		NbtError::CapacityTooSmall { need, have } => {
			assert_eq!(need, 5);
			assert_eq!(have, 4);
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn open_map_accepts_any_names_and_keeps_last_duplicate() {
	let mut wire = header(TagKind::Compound, "");
	wire.extend(header(TagKind::Int, "a"));
	wire.extend_from_slice(&1_i32.to_be_bytes());
	wire.extend(header(TagKind::Int, "b"));
	wire.extend_from_slice(&2_i32.to_be_bytes());
	wire.extend(header(TagKind::Int, "a"));
	wire.extend_from_slice(&3_i32.to_be_bytes());
	wire.push(TagKind::End.code());

	let mut target: HashMap<String, i32> = HashMap::new();
	decode(Compression::None, wire.as_slice(), &mut target).expect("decode succeeds");
	assert_eq!(target.len(), 2);
	assert_eq!(target.get("a"), Some(&3));
	assert_eq!(target.get("b"), Some(&2));
}

#[test]
fn invalid_utf8_in_string_payload_fails() {
	let mut wire = header(TagKind::String, "s");
	wire.extend_from_slice(&2_u16.to_be_bytes());
	wire.extend_from_slice(&[0xff, 0xfe]);

	let err = decode_value(Compression::None, wire.as_slice()).expect_err("bad utf-8 rejected");
	assert!(matches!(err, NbtError::InvalidString(_)), "unexpected error: {err}");
}

#[test]
fn runaway_nesting_is_cut_off() {
	let mut wire = header(TagKind::List, "deep");
	for _ in 0..100 {
		wire.push(TagKind::List.code());
		wire.extend_from_slice(&1_u32.to_be_bytes());
	}

	let err = decode_value(Compression::None, wire.as_slice()).expect_err("depth limit fires");
	let mut cause: &NbtError = &err;
	while let NbtError::AtIndex { source, .. } = cause {
		cause = source.as_ref();
	}
	assert!(matches!(cause, NbtError::DepthExceeded { max: 64 }), "unexpected cause: {cause}");
}

#[test]
fn nesting_at_the_limit_still_decodes() {
	let mut wire = header(TagKind::List, "deep");
	for _ in 0..63 {
		wire.push(TagKind::List.code());
		wire.extend_from_slice(&1_u32.to_be_bytes());
	}
	wire.push(TagKind::Byte.code());
	wire.extend_from_slice(&0_u32.to_be_bytes());

	decode_value(Compression::None, wire.as_slice()).expect("64 nested lists fit");
}

#[derive(Default)]
struct Tally {
	count: i32,
}

crate::nbt_record!(Tally { count });

#[test]
fn unmapped_field_name_is_a_hard_error() {
	let mut wire = header(TagKind::Compound, "");
	wire.extend(header(TagKind::Int, "count"));
	wire.extend_from_slice(&1_i32.to_be_bytes());
	wire.extend(header(TagKind::Byte, "extra"));
	wire.push(0x01);
	wire.push(TagKind::End.code());

	let mut target = Tally::default();
	let err = decode(Compression::None, wire.as_slice(), &mut target).expect_err("unmapped name rejected");
	assert_eq!(err.to_string(), "unhandled tag TAG_Byte (0x01) named \"extra\" in Tally");
}

#[test]
fn record_rejects_non_compound_root() {
	let mut wire = header(TagKind::Int, "");
	wire.extend_from_slice(&1_i32.to_be_bytes());

	let mut target = Tally::default();
	let err = decode(Compression::None, wire.as_slice(), &mut target).expect_err("scalar root rejected");
	assert_eq!(err.to_string(), "tag TAG_Int (0x03) cannot decode into Tally");
}
