use std::io::{Read, Write};

use crate::nbt::{Compression, Decoder, NbtError, Result, TagKind};

/// Walk one root tag and write an indented diagnostic tree.
///
/// Purely for human inspection; the output has no round-trip obligation.
pub fn dump(compression: Compression, source: impl Read, mut out: impl Write) -> Result<()> {
	let mut source = compression.reader(source);
	let mut decoder = Decoder::new(&mut source);
	dump_tag(&mut decoder, &mut out, 0)?;
	Ok(())
}

fn pad(indent: usize) -> String {
	" ".repeat(indent * 4)
}

fn dump_tag(decoder: &mut Decoder<'_>, out: &mut impl Write, indent: usize) -> Result<bool> {
	let kind = decoder.read_kind()?;
	if kind == TagKind::End {
		writeln!(out, "{}{kind}", pad(indent))?;
		return Ok(false);
	}

	let name = decoder.read_name()?;
	writeln!(out, "{}{kind} named [{}] {name}:", pad(indent), name.len())?;
	dump_payload(decoder, out, indent + 1, kind)?;
	Ok(true)
}

fn dump_payload(decoder: &mut Decoder<'_>, out: &mut impl Write, indent: usize, kind: TagKind) -> Result<()> {
	match kind {
		TagKind::End => Err(NbtError::UnknownTagKind { code: TagKind::End.code() }),
		TagKind::Byte => {
			let value = decoder.read_u8()?;
			writeln!(out, "{}0x{value:02x}", pad(indent))?;
			Ok(())
		}
		TagKind::Short => {
			let value = decoder.read_u16()?;
			writeln!(out, "{}0x{value:04x}", pad(indent))?;
			Ok(())
		}
		TagKind::Int => {
			let value = decoder.read_u32()?;
			writeln!(out, "{}0x{value:08x}", pad(indent))?;
			Ok(())
		}
		TagKind::Long => {
			let value = decoder.read_u64()?;
			writeln!(out, "{}0x{value:016x}", pad(indent))?;
			Ok(())
		}
		TagKind::Float => {
			let value = decoder.read_f32()?;
			writeln!(out, "{}{value:?}", pad(indent))?;
			Ok(())
		}
		TagKind::Double => {
			let value = decoder.read_f64()?;
			writeln!(out, "{}{value:?}", pad(indent))?;
			Ok(())
		}
		TagKind::ByteArray => {
			let len = decoder.read_len()?;
			writeln!(out, "{}Length: {len} (0x{len:08x})", pad(indent))?;
			let bytes = decoder.read_bytes(len)?;
			writeln!(out, "{}Value: {bytes:?}", pad(indent))?;
			Ok(())
		}
		TagKind::String => {
			let value = decoder.read_string()?;
			writeln!(out, "{}Length: {}", pad(indent), value.len())?;
			writeln!(out, "{}Value: {value}", pad(indent))?;
			Ok(())
		}
		TagKind::List => {
			let (elem, len) = decoder.read_list_header()?;
			writeln!(out, "{}Element type: {elem}", pad(indent))?;
			writeln!(out, "{}Length: {len}", pad(indent))?;
			writeln!(out, "{}Value: {{", pad(indent))?;

			decoder.enter()?;
			for _ in 0..len {
				dump_payload(decoder, out, indent + 1, elem)?;
			}
			decoder.leave();

			writeln!(out, "{}}}", pad(indent))?;
			Ok(())
		}
		TagKind::Compound => {
			writeln!(out, "{}Values: {{", pad(indent))?;

			decoder.enter()?;
			while dump_tag(decoder, out, indent + 1)? {}
			decoder.leave();

			writeln!(out, "{}}}", pad(indent))?;
			Ok(())
		}
		TagKind::IntArray => {
			let len = decoder.read_len()?;
			writeln!(out, "{}Length: {len}", pad(indent))?;
			writeln!(out, "{}Values: {{", pad(indent))?;

			for _ in 0..len {
				let value = decoder.read_u32()?;
				writeln!(out, "{}0x{value:08x}", pad(indent + 1))?;
			}

			writeln!(out, "{}}}", pad(indent))?;
			Ok(())
		}
		TagKind::LongArray => {
			let len = decoder.read_len()?;
			writeln!(out, "{}Length: {len}", pad(indent))?;
			writeln!(out, "{}Values: {{", pad(indent))?;

			for _ in 0..len {
				let value = decoder.read_u64()?;
				writeln!(out, "{}0x{value:016x}", pad(indent + 1))?;
			}

			writeln!(out, "{}}}", pad(indent))?;
			Ok(())
		}
	}
}
