#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "threedo", about = "Legacy .3do model inspection and rebuild tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Summarize a model file.
	Info(cmd::info::Args),
	/// Print the object hierarchy.
	Tree(cmd::tree::Args),
	/// Print the byte-level file map.
	Map(cmd::map::Args),
	/// Decode and re-build a model file.
	Build(cmd::build::Args),
}

fn main() {
	init_tracing();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.init();
}

fn run() -> threedo::codec::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Tree(args) => cmd::tree::run(args),
		Commands::Map(args) => cmd::map::run(args),
		Commands::Build(args) => cmd::build::run(args),
	}
}
