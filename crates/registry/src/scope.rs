//! Named allow-list views over the global factory registry.
//!
//! Independent call sites share one global registry but see only the subset
//! a scope allows. The global registry never learns scope names; a scope is
//! just a membership check in front of delegation.

use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::RegistryError;
use crate::factory::{Contract, FactoryRegistry};

/// A restricted, named view of a [`FactoryRegistry`].
///
/// The allow-list is fixed at scope-definition time: build the scope with
/// [`allow`](ScopedRegistry::allow) / [`allow_name`](ScopedRegistry::allow_name)
/// calls, then share it. A contract outside the allow-list behaves exactly as if it were
/// never registered, except the failure message enumerates the *scope's*
/// allow-list rather than the global one.
pub struct ScopedRegistry {
	name: String,
	allowed: FxHashSet<TypeId>,
	allowed_names: Vec<String>,
	global: Arc<FactoryRegistry>,
}

impl ScopedRegistry {
	pub fn new(name: impl Into<String>, global: Arc<FactoryRegistry>) -> Self {
		Self {
			name: name.into(),
			allowed: FxHashSet::default(),
			allowed_names: Vec::new(),
			global,
		}
	}

	/// Admits contract `P` to this scope. Consuming-chain style so finished
	/// scopes are naturally immutable.
	pub fn allow<P: Contract>(mut self) -> Self {
		self.allowed.insert(TypeId::of::<P>());
		self.allowed_names.push(P::NAME.to_string());
		self
	}

	/// Admits a contract by display name, resolving it against the global
	/// registry. An unresolvable name stays in the allow-list for messages
	/// but can never serve a proxy.
	pub fn allow_name(&mut self, contract: &str) {
		if let Some(type_id) = self.global.type_id_of(contract) {
			self.allowed.insert(type_id);
		}
		self.allowed_names.push(contract.to_string());
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The scope's allow-list, sorted, as rendered in failures.
	pub fn allowed_names(&self) -> Vec<String> {
		let mut names = self.allowed_names.clone();
		names.sort_unstable();
		names
	}

	/// Like [`FactoryRegistry::try_get`], but absent for anything outside
	/// the allow-list, registered globally or not.
	pub fn try_get<P: Contract>(&self, supplier: impl FnOnce() -> P + Send + 'static) -> Option<P> {
		if !self.allowed.contains(&TypeId::of::<P>()) {
			return None;
		}
		self.global.try_get(supplier)
	}

	/// Like [`FactoryRegistry::get`], but failures carry this scope's
	/// allow-list.
	pub fn get<P: Contract>(
		&self,
		supplier: impl FnOnce() -> P + Send + 'static,
	) -> Result<P, RegistryError> {
		self.try_get(supplier)
			.ok_or_else(|| RegistryError::not_allowed(P::NAME, self.allowed_names.clone()))
	}
}

impl std::fmt::Debug for ScopedRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScopedRegistry")
			.field("name", &self.name)
			.field("allowed", &self.allowed_names)
			.field("global", &self.global.label())
			.finish()
	}
}
