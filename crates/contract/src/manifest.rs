//! TOML contract manifest.
//!
//! The Rust-native stand-in for attribute-driven discovery: a build pipeline
//! lists the marked types (and any named scopes) in a manifest and hands it
//! to the synthesizer CLI.
//!
//! ```toml
//! namespace = "demo"
//!
//! [[contract]]
//! name = "Loader"
//! kind = "interface"
//! file = "src/loader.rs"
//! line = 10
//!
//! [[contract.method]]
//! name = "fetch"
//! ret = "i32"
//!
//! [[scope]]
//! name = "loaders"
//! allow = ["demo::Loader"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::descriptor::{MethodDescriptor, Param, ReturnType};
use crate::discover::{DiscoveredType, SourceLocation, TypeKind};

/// Manifest loading errors. Usage violations are not errors at this layer;
/// they surface later as diagnostics from validation.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("failed to read manifest {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse manifest {path}: {source}")]
	Parse {
		path: String,
		#[source]
		source: toml::de::Error,
	},
}

/// A contract manifest as a build pipeline writes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
	/// Namespace prefix for contracts without an explicit qualified name.
	#[serde(default)]
	pub namespace: Option<String>,
	#[serde(default, rename = "contract")]
	pub contracts: Vec<ContractEntry>,
	#[serde(default, rename = "scope")]
	pub scopes: Vec<ScopeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractEntry {
	pub name: String,
	#[serde(default)]
	pub qualified_name: Option<String>,
	#[serde(default = "default_kind")]
	pub kind: TypeKind,
	#[serde(default)]
	pub extends: Vec<String>,
	#[serde(default, rename = "method")]
	pub methods: Vec<MethodEntry>,
	#[serde(default)]
	pub file: Option<String>,
	#[serde(default = "default_line")]
	pub line: u32,
	#[serde(default = "default_line")]
	pub column: u32,
}

fn default_kind() -> TypeKind {
	TypeKind::Interface
}

fn default_line() -> u32 {
	1
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodEntry {
	pub name: String,
	#[serde(default)]
	pub params: Vec<ParamEntry>,
	#[serde(default)]
	pub ret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamEntry {
	pub name: String,
	pub ty: String,
}

/// A named scope definition: the allow-list is fixed here, at definition
/// time, and never grows afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeEntry {
	pub name: String,
	#[serde(default)]
	pub allow: Vec<String>,
}

impl Manifest {
	/// Loads and parses a manifest file.
	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::parse(&text, &path.display().to_string())
	}

	/// Parses manifest text. `origin` names the source for error reporting
	/// and for contract entries without an explicit `file`.
	pub fn parse(text: &str, origin: &str) -> Result<Self, ManifestError> {
		let mut manifest: Manifest =
			toml::from_str(text).map_err(|source| ManifestError::Parse {
				path: origin.to_string(),
				source,
			})?;
		for contract in &mut manifest.contracts {
			if contract.file.is_none() {
				contract.file = Some(origin.to_string());
			}
		}
		Ok(manifest)
	}

	/// Lowers manifest entries into the discovery input model.
	pub fn discovered(&self) -> Vec<DiscoveredType> {
		self.contracts
			.iter()
			.map(|entry| {
				let qualified_name = entry.qualified_name.clone().unwrap_or_else(|| {
					match &self.namespace {
						Some(ns) => format!("{ns}::{}", entry.name),
						None => entry.name.clone(),
					}
				});
				DiscoveredType {
					kind: entry.kind,
					name: entry.name.clone(),
					qualified_name,
					extends: entry.extends.clone(),
					methods: entry
						.methods
						.iter()
						.map(|m| {
							MethodDescriptor::new(
								m.name.clone(),
								m.params
									.iter()
									.map(|p| Param::new(p.name.clone(), p.ty.clone()))
									.collect(),
								ReturnType::parse(m.ret.as_deref()),
							)
						})
						.collect(),
					location: SourceLocation::new(
						entry.file.clone().unwrap_or_default(),
						entry.line,
						entry.column,
					),
				}
			})
			.collect()
	}
}
