//! Contract model for lazysh proxy synthesis.
//!
//! This crate is the data boundary between the external discovery step and
//! the synthesizers. It carries:
//!
//! - [`descriptor`] - immutable contract/method descriptors and the resolved
//!   [`ContractSet`] with transitive method collection
//! - [`discover`] - the discovery input model and usage validation
//! - [`diagnostics`] - stable-coded usage diagnostics (`LG01`)
//! - [`manifest`] - the TOML manifest a build pipeline hands to the
//!   synthesizer CLI

pub mod descriptor;
pub mod diagnostics;
pub mod discover;
pub mod manifest;

pub use descriptor::{
	ContractDescriptor, ContractError, ContractSet, MethodDescriptor, MethodSig, Param, ReturnType,
};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use discover::{DiscoveredType, SourceLocation, TypeKind, Validated, validate};
pub use manifest::{Manifest, ManifestError};
