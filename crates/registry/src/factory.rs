//! Type-indexed factory registry.
//!
//! # Role
//!
//! Maps a proxy-constructible contract type `P` (typically `Box<dyn Trait>`)
//! to the constructor a synthesized proxy registered for it. Two-phase:
//! [`FactoryRegistryBuilder`] collects registrations during setup, `build()`
//! freezes the table, and the resulting [`FactoryRegistry`] is shared behind
//! an `Arc` and read without locks.
//!
//! # Invariants
//!
//! - No registration after `build()`; the published table never changes.
//! - Duplicate registration is last-write-wins and is never silent: the
//!   builder returns [`InsertAction::ReplacedExisting`] and warns.

use std::any::{Any, TypeId};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::cell::Supplier;
use crate::error::{InsertAction, RegistryError};
use crate::scope::ScopedRegistry;

/// A contract type the registry can construct proxies for.
///
/// Synthesized proxies emit this impl for `Box<dyn Trait>`; `NAME` is the
/// stable display name used as the registry's enumerable identity in error
/// messages and scope allow-lists.
pub trait Contract: 'static {
	const NAME: &'static str;
}

/// Type-erased constructor; concretely a [`Ctor<P>`].
struct FactoryEntry {
	name: &'static str,
	ctor: Box<dyn Any + Send + Sync>,
}

struct Ctor<P>(Arc<dyn Fn(Supplier<P>) -> P + Send + Sync>);

/// Collects proxy registrations during setup.
pub struct FactoryRegistryBuilder {
	label: &'static str,
	entries: FxHashMap<TypeId, FactoryEntry>,
}

impl FactoryRegistryBuilder {
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			entries: FxHashMap::default(),
		}
	}

	/// Registers the proxy constructor for contract `P`.
	///
	/// A second registration for the same contract replaces the first and
	/// returns [`InsertAction::ReplacedExisting`]; treat that as a
	/// configuration error worth fixing, not a feature.
	pub fn register<P: Contract>(
		&mut self,
		ctor: impl Fn(Supplier<P>) -> P + Send + Sync + 'static,
	) -> InsertAction {
		let entry = FactoryEntry {
			name: P::NAME,
			ctor: Box::new(Ctor::<P>(Arc::new(ctor))),
		};
		match self.entries.insert(TypeId::of::<P>(), entry) {
			None => {
				debug!(registry = self.label, contract = P::NAME, "registered proxy constructor");
				InsertAction::InsertedNew
			}
			Some(previous) => {
				warn!(
					registry = self.label,
					contract = P::NAME,
					replaced = previous.name,
					"duplicate proxy registration; last write wins"
				);
				InsertAction::ReplacedExisting
			}
		}
	}

	/// Freezes the table. No registration is possible afterwards.
	pub fn build(self) -> FactoryRegistry {
		FactoryRegistry {
			label: self.label,
			entries: self.entries,
		}
	}
}

/// Immutable, type-indexed table of proxy constructors.
pub struct FactoryRegistry {
	label: &'static str,
	entries: FxHashMap<TypeId, FactoryEntry>,
}

impl FactoryRegistry {
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Returns a proxy for `P` if one was registered; `None` otherwise.
	/// Never fails. The supplier is not invoked here; the proxy defers it.
	pub fn try_get<P: Contract>(&self, supplier: impl FnOnce() -> P + Send + 'static) -> Option<P> {
		let entry = self.entries.get(&TypeId::of::<P>())?;
		let ctor = entry
			.ctor
			.downcast_ref::<Ctor<P>>()
			.expect("entry keyed by TypeId of P always holds a Ctor<P>");
		Some((ctor.0)(Box::new(supplier)))
	}

	/// Returns a proxy for `P`, or [`RegistryError::NotAllowed`] naming `P`
	/// and enumerating every registered contract.
	pub fn get<P: Contract>(
		&self,
		supplier: impl FnOnce() -> P + Send + 'static,
	) -> Result<P, RegistryError> {
		self.try_get(supplier)
			.ok_or_else(|| RegistryError::not_allowed(P::NAME, self.contract_names()))
	}

	pub fn contains<P: Contract>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<P>())
	}

	/// Display names of every registered contract, sorted.
	pub fn contract_names(&self) -> Vec<String> {
		let mut names: Vec<String> =
			self.entries.values().map(|e| e.name.to_string()).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Builds a named scoped view from contract names, e.g. straight from a
	/// manifest `[[scope]]` entry. Names that resolve to nothing registered
	/// stay in the scope's allow-list for messages but can never serve.
	/// Clone the `Arc` to keep a handle on the global registry.
	pub fn scoped(self: Arc<Self>, name: impl Into<String>, allow: &[&str]) -> ScopedRegistry {
		let mut scope = ScopedRegistry::new(name, self);
		for contract in allow {
			scope.allow_name(contract);
		}
		scope
	}

	pub(crate) fn type_id_of(&self, contract: &str) -> Option<TypeId> {
		self.entries
			.iter()
			.find(|(_, entry)| entry.name == contract)
			.map(|(type_id, _)| *type_id)
	}
}

impl std::fmt::Debug for FactoryRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FactoryRegistry")
			.field("label", &self.label)
			.field("contracts", &self.contract_names())
			.finish()
	}
}
