//! Discovery input model and usage validation.
//!
//! The external discovery step (a compiler plugin, a manifest, anything)
//! hands over [`DiscoveredType`]s. [`validate`] partitions them: interface
//! contracts pass through as descriptors, anything else yields the `LG01`
//! diagnostic and is excluded from synthesis. One bad type never blocks its
//! siblings.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{ContractDescriptor, ContractSet, MethodDescriptor};
use crate::diagnostics::Diagnostic;

/// What kind of declaration carried the proxy-eligibility marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
	Interface,
	Class,
	Struct,
	Enum,
}

/// Location of a discovered declaration, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
	pub file: String,
	pub line: u32,
	pub column: u32,
}

impl SourceLocation {
	pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
		Self {
			file: file.into(),
			line,
			column,
		}
	}
}

impl fmt::Display for SourceLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}:{}", self.file, self.line, self.column)
	}
}

/// A type the discovery step found marked for proxy generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredType {
	pub kind: TypeKind,
	pub name: String,
	pub qualified_name: String,
	pub extends: Vec<String>,
	pub methods: Vec<MethodDescriptor>,
	pub location: SourceLocation,
}

impl DiscoveredType {
	fn into_descriptor(self) -> ContractDescriptor {
		ContractDescriptor {
			name: self.name,
			qualified_name: self.qualified_name,
			extends: self.extends,
			methods: self.methods,
		}
	}
}

/// Outcome of discovery validation.
#[derive(Debug, Clone, Default)]
pub struct Validated {
	/// Contracts eligible for synthesis, in discovery order.
	pub contracts: ContractSet,
	/// Usage violations for the skipped types.
	pub diagnostics: Vec<Diagnostic>,
}

/// Validates discovered types. Non-interface types get an `LG01` diagnostic
/// and are dropped; no partial artifact is ever emitted for them.
pub fn validate(types: Vec<DiscoveredType>) -> Validated {
	let mut out = Validated::default();
	for ty in types {
		if ty.kind != TypeKind::Interface {
			out.diagnostics.push(Diagnostic::must_be_interface(ty.location));
			continue;
		}
		debug!(contract = %ty.qualified_name, methods = ty.methods.len(), "accepted contract");
		out.contracts.insert(ty.into_descriptor());
	}
	out
}
