use std::io::Write;
use std::path::PathBuf;

use nbtool::nbt::{Result, dump};

use crate::cmd::util::resolve_compression;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, default_value = "auto")]
	pub mode: String,
}

/// Print one file's tag tree as indented text.
pub fn run(args: Args) -> Result<()> {
	let Args { path, mode } = args;

	let raw = std::fs::read(&path)?;
	let compression = resolve_compression(&mode, &raw)?;

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	dump(compression, raw.as_slice(), &mut out)?;
	out.flush()?;

	Ok(())
}
