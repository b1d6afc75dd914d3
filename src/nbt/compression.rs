use std::io::{self, Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};

use crate::nbt::Result;

/// gzip member magic (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
/// zlib CMF byte for deflate with a 32K window (RFC 1950).
const ZLIB_CMF: u8 = 0x78;

/// Stream compression applied around one codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed stream.
	None,
	/// gzip-wrapped stream (RFC 1952).
	Gzip,
	/// zlib-wrapped stream (RFC 1950).
	Zlib,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Gzip => "gzip",
			Self::Zlib => "zlib",
		}
	}

	/// Sniff the compression mode from a stream's leading bytes.
	///
	/// Anything that is neither a gzip member nor a zlib header is treated as
	/// uncompressed; an uncompressed tag stream starts with a code byte in
	/// `0x00..=0x0c`, which collides with neither magic.
	pub fn detect(raw: &[u8]) -> Self {
		if raw.starts_with(&GZIP_MAGIC) {
			return Self::Gzip;
		}

		if raw.len() >= 2 && raw[0] == ZLIB_CMF && matches!(raw[1], 0x01 | 0x5e | 0x9c | 0xda) {
			return Self::Zlib;
		}

		Self::None
	}

	/// Wrap a raw source in the decompressing reader for this mode.
	pub fn reader<R: Read>(self, source: R) -> Source<R> {
		match self {
			Self::None => Source::Plain(source),
			Self::Gzip => Source::Gzip(GzDecoder::new(source)),
			Self::Zlib => Source::Zlib(ZlibDecoder::new(source)),
		}
	}

	/// Wrap a raw sink in the compressing writer for this mode.
	///
	/// The returned sink buffers compressed state; [`Sink::finish`] must run
	/// after the last payload byte or the trailer never reaches the output.
	pub fn writer<W: Write>(self, sink: W) -> Sink<W> {
		match self {
			Self::None => Sink::Plain(sink),
			Self::Gzip => Sink::Gzip(GzEncoder::new(sink, flate2::Compression::default())),
			Self::Zlib => Sink::Zlib(ZlibEncoder::new(sink, flate2::Compression::default())),
		}
	}
}

/// Reader side of one compression mode.
pub enum Source<R: Read> {
	/// Pass-through reader.
	Plain(R),
	/// gzip decompressor.
	Gzip(GzDecoder<R>),
	/// zlib decompressor.
	Zlib(ZlibDecoder<R>),
}

impl<R: Read> Read for Source<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		match self {
			Self::Plain(source) => source.read(buf),
			Self::Gzip(source) => source.read(buf),
			Self::Zlib(source) => source.read(buf),
		}
	}
}

/// Writer side of one compression mode.
pub enum Sink<W: Write> {
	/// Pass-through writer.
	Plain(W),
	/// gzip compressor.
	Gzip(GzEncoder<W>),
	/// zlib compressor.
	Zlib(ZlibEncoder<W>),
}

impl<W: Write> Sink<W> {
	/// Flush remaining compressed state and write the stream trailer.
	pub fn finish(self) -> Result<()> {
		match self {
			Self::Plain(mut sink) => Ok(sink.flush()?),
			Self::Gzip(encoder) => {
				encoder.finish()?;
				Ok(())
			}
			Self::Zlib(encoder) => {
				encoder.finish()?;
				Ok(())
			}
		}
	}
}

impl<W: Write> Write for Sink<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self {
			Self::Plain(sink) => sink.write(buf),
			Self::Gzip(sink) => sink.write(buf),
			Self::Zlib(sink) => sink.write(buf),
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		match self {
			Self::Plain(sink) => sink.flush(),
			Self::Gzip(sink) => sink.flush(),
			Self::Zlib(sink) => sink.flush(),
		}
	}
}
