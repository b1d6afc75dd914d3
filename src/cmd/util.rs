use nbtool::nbt::{Compression, NbtError, Result};

/// Parse a CLI compression mode, `auto` meaning sniff the stream magic.
pub(crate) fn parse_compression(mode: &str) -> Result<Option<Compression>> {
	match mode {
		"auto" => Ok(None),
		"none" => Ok(Some(Compression::None)),
		"gzip" => Ok(Some(Compression::Gzip)),
		"zlib" => Ok(Some(Compression::Zlib)),
		_ => Err(NbtError::InvalidCompression { mode: mode.to_owned() }),
	}
}

/// Resolve a CLI compression mode against the raw file bytes.
pub(crate) fn resolve_compression(mode: &str, raw: &[u8]) -> Result<Compression> {
	Ok(match parse_compression(mode)? {
		Some(mode) => mode,
		None => Compression::detect(raw),
	})
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: {err}"),
	}
}
