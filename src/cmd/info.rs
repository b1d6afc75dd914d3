use std::collections::HashMap;
use std::path::PathBuf;

use nbtool::nbt::{Result, TagKind, Value, decode_value};

use crate::cmd::util::{emit_json, resolve_compression};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, default_value = "auto")]
	pub mode: String,
	#[arg(long)]
	pub json: bool,
}

/// Print high-level file and tag statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { path, mode, json } = args;

	let raw = std::fs::read(&path)?;
	let compression = resolve_compression(&mode, &raw)?;
	let (root_name, value) = decode_value(compression, raw.as_slice())?;

	let mut stats = TagStats::default();
	scan_tags(&value, 0, &mut stats);

	let mut entries: Vec<_> = stats.kinds.into_iter().collect();
	entries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.code().cmp(&right.0.code())));

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			size: raw.len(),
			compression: compression.as_str(),
			root_name,
			root_kind: value.kind().to_string(),
			tag_count: stats.count,
			max_depth: stats.max_depth,
			kinds: entries.iter().map(|(kind, count)| (kind.to_string(), *count)).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("size: {}", raw.len());
	println!("compression: {}", compression.as_str());
	println!("root_name: {root_name:?}");
	println!("root_kind: {}", value.kind());
	println!("tag_count: {}", stats.count);
	println!("max_depth: {}", stats.max_depth);
	println!("kinds:");
	for (kind, count) in entries {
		println!("  {kind}: {count}");
	}

	Ok(())
}

#[derive(Default)]
struct TagStats {
	count: u64,
	max_depth: u32,
	kinds: HashMap<TagKind, u64>,
}

fn scan_tags(value: &Value, depth: u32, stats: &mut TagStats) {
	stats.count += 1;
	stats.max_depth = stats.max_depth.max(depth);
	*stats.kinds.entry(value.kind()).or_insert(0) += 1;

	match value {
		Value::List { items, .. } => {
			for item in items {
				scan_tags(item, depth + 1, stats);
			}
		}
		Value::Compound(entries) => {
			for entry in entries {
				scan_tags(&entry.value, depth + 1, stats);
			}
		}
		_ => {}
	}
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	size: usize,
	compression: &'static str,
	root_name: String,
	root_kind: String,
	tag_count: u64,
	max_depth: u32,
	kinds: Vec<(String, u64)>,
}
