#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "nbtool", about = "NBT tag stream inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Dump(cmd::dump::Args),
	Info(cmd::info::Args),
	Json(cmd::json::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> nbtool::nbt::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Info(args) => cmd::info::run(args),
		Commands::Json(args) => cmd::json::run(args),
	}
}
