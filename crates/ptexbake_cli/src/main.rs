#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "ptexbake", about = "Ptex baking, seam filtering and atlas packing tools")]
struct Cli {
	/// Raise log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print archive header and face table.
	Info(cmd::info::Args),
	/// Write a debug-pattern layer for a mesh.
	Bake(cmd::bake::Args),
	/// Import, pack and seam-filter a layer.
	Pack(cmd::pack::Args),
	/// Resample every loop raster of a layer.
	Resize(cmd::resize::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> ptexbake::ptex::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Bake(args) => cmd::bake::run(args),
		Commands::Pack(args) => cmd::pack::run(args),
		Commands::Resize(args) => cmd::resize::run(args),
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
