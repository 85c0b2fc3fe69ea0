//! Build-pipeline entry point for proxy synthesis.
//!
//! Reads a TOML contract manifest, reports usage diagnostics to stderr, and
//! writes one generated proxy file per valid contract plus a `mod.rs` with
//! the `register_generated` wiring. Usage violations skip their type but
//! never fail the run; only manifest or I/O errors do.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lazysh_contract::{Manifest, validate};
use lazysh_synth::{instrumented, lazy, write_artifacts};
use tracing::info;

/// Synthesizer command line arguments.
#[derive(Parser, Debug)]
#[command(name = "lazysh-synth")]
#[command(about = "Generates lazy and instrumented proxy sources from a contract manifest")]
struct Args {
	/// Contract manifest (TOML)
	#[arg(short, long, value_name = "PATH")]
	manifest: PathBuf,

	/// Output directory for generated sources
	#[arg(short, long, value_name = "DIR")]
	out_dir: PathBuf,

	/// Also generate instrumented (logging) proxies
	#[arg(long)]
	instrumented: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> ExitCode {
	let args = Args::parse();
	setup_tracing(args.verbose);
	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("lazysh-synth: {err:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: &Args) -> anyhow::Result<()> {
	let manifest = Manifest::load(&args.manifest)
		.with_context(|| format!("loading manifest {}", args.manifest.display()))?;

	let validated = validate(manifest.discovered());
	for diagnostic in &validated.diagnostics {
		eprintln!("{diagnostic}");
	}

	let mut artifacts = Vec::new();
	for contract in validated.contracts.iter() {
		artifacts.push(lazy::synthesize(&validated.contracts, contract)?);
		if args.instrumented {
			artifacts.push(instrumented::synthesize(&validated.contracts, contract)?);
		}
	}

	write_artifacts(&artifacts, &args.out_dir)?;
	info!(
		contracts = validated.contracts.len(),
		skipped = validated.diagnostics.len(),
		files = artifacts.len() + 1,
		out_dir = %args.out_dir.display(),
		"wrote generated proxies"
	);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let default = if verbose { "debug" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
		.with_writer(std::io::stderr)
		.init();
}
