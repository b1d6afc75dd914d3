use std::path::PathBuf;

use nbtool::nbt::{Result, Value, decode_value};

use crate::cmd::util::{emit_json, resolve_compression};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, default_value = "auto")]
	pub mode: String,
}

/// Print the decoded root value as pretty JSON.
pub fn run(args: Args) -> Result<()> {
	let Args { path, mode } = args;

	let raw = std::fs::read(&path)?;
	let compression = resolve_compression(&mode, &raw)?;
	let (root_name, value) = decode_value(compression, raw.as_slice())?;

	let payload = JsonDoc {
		path: path.display().to_string(),
		compression: compression.as_str(),
		root_name,
		value: value_to_json_value(&value),
	};

	emit_json(&payload);
	Ok(())
}

fn value_to_json_value(value: &Value) -> serde_json::Value {
	use serde_json::{Map, Value as JsonValue};

	match value {
		Value::Byte(v) => serde_json::json!(v),
		Value::Short(v) => serde_json::json!(v),
		Value::Int(v) => serde_json::json!(v),
		Value::Long(v) => serde_json::json!(v),
		Value::Float(v) => serde_json::json!(v),
		Value::Double(v) => serde_json::json!(v),
		Value::ByteArray(bytes) => {
			let values: Vec<JsonValue> = bytes.iter().map(|item| serde_json::json!(item)).collect();
			JsonValue::Array(values)
		}
		Value::String(v) => serde_json::json!(v),
		Value::List { items, .. } => {
			let values: Vec<JsonValue> = items.iter().map(value_to_json_value).collect();
			JsonValue::Array(values)
		}
		Value::Compound(entries) => {
			let fields: Map<String, JsonValue> = entries.iter().map(|entry| (entry.name.clone(), value_to_json_value(&entry.value))).collect();
			JsonValue::Object(fields)
		}
		Value::IntArray(values) => {
			let values: Vec<JsonValue> = values.iter().map(|item| serde_json::json!(item)).collect();
			JsonValue::Array(values)
		}
		Value::LongArray(values) => {
			let values: Vec<JsonValue> = values.iter().map(|item| serde_json::json!(item)).collect();
			JsonValue::Array(values)
		}
	}
}

#[derive(serde::Serialize)]
struct JsonDoc {
	path: String,
	compression: &'static str,
	root_name: String,
	value: serde_json::Value,
}
