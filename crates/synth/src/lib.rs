//! Proxy source synthesis.
//!
//! Given contract descriptors, produces Rust source artifacts:
//!
//! - [`lazy`] - `Lazysh<Name>` proxies that defer and memoize target
//!   construction behind `lazysh_registry::LazyTarget`
//! - [`instrumented`] - `Logged<Name>` proxies that bracket every forwarded
//!   call with `tracing` start/arguments/elapsed/return logging
//!
//! One artifact per contract; [`write_artifacts`] lays them out as a module
//! directory with a `register_generated` entry point, ready to be mounted
//! into a build (`include!` from `OUT_DIR`, or checked in).
//!
//! Contract `qualified_name`s double as Rust paths in the emitted source, so
//! they must resolve wherever the generated module is mounted.

use std::path::Path;

// Used by the lazysh-synth binary only.
use {anyhow as _, clap as _, tracing_subscriber as _};

use lazysh_contract::ContractError;

pub mod emit;
pub mod instrumented;
pub mod lazy;

/// A generated proxy type bound to its contract. At most one per contract
/// per synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyArtifact {
	/// Qualified name of the owning contract.
	pub contract: String,
	/// Name of the generated type, e.g. `LazyshLoader`.
	pub type_name: String,
	/// Module (and file stem) the artifact lands in, e.g. `lazysh_loader`.
	pub module_name: String,
	/// Generated file name, e.g. `lazysh_loader.rs`.
	pub file_name: String,
	/// Complete generated source.
	pub source: String,
	/// Registration statement for `register_generated`, if this artifact
	/// registers a constructor (lazy proxies do, instrumented ones are
	/// constructed eagerly by the caller).
	pub registration: Option<String>,
}

/// Synthesis failures. Usage violations never reach here; validation strips
/// the offending types first.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
	#[error(transparent)]
	Contract(#[from] ContractError),
	#[error("failed to write {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
}

const GENERATED_HEADER: &str = "// @generated by lazysh-synth. Do not edit.";

/// Writes one file per artifact plus a `mod.rs` declaring them and wiring
/// `register_generated`.
pub fn write_artifacts(artifacts: &[ProxyArtifact], out_dir: &Path) -> Result<(), SynthError> {
	let io_err = |path: &Path| {
		let path = path.display().to_string();
		move |source| SynthError::Io { path, source }
	};

	std::fs::create_dir_all(out_dir).map_err(io_err(out_dir))?;
	for artifact in artifacts {
		let path = out_dir.join(&artifact.file_name);
		std::fs::write(&path, &artifact.source).map_err(io_err(&path))?;
	}

	let path = out_dir.join("mod.rs");
	std::fs::write(&path, render_mod(artifacts)).map_err(io_err(&path))?;
	Ok(())
}

/// Renders the `mod.rs` tying the generated files together.
pub fn render_mod(artifacts: &[ProxyArtifact]) -> String {
	use emit::SourceWriter;

	let mut w = SourceWriter::new();
	w.line(GENERATED_HEADER);
	w.blank();
	for artifact in artifacts {
		w.line(&format!("pub mod {};", artifact.module_name));
	}
	w.blank();
	for artifact in artifacts {
		w.line(&format!(
			"pub use {}::{};",
			artifact.module_name, artifact.type_name
		));
	}
	w.blank();
	w.line("/// Registers every generated lazy proxy constructor.");
	w.open("pub fn register_generated(builder: &mut lazysh_registry::FactoryRegistryBuilder) {");
	for artifact in artifacts {
		if let Some(registration) = &artifact.registration {
			w.line(registration);
		}
	}
	w.close("}");
	w.finish()
}
