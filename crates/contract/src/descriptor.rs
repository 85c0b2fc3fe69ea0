//! Contract and method descriptors.
//!
//! # Role
//!
//! Descriptors are produced by an external discovery step and consumed, never
//! mutated, by the synthesizers. [`ContractSet`] resolves `extends` edges and
//! collects the full transitive method set of a contract, collapsing
//! duplicate signatures that arrive through diamond inheritance.
//!
//! # Invariants
//!
//! - Method identity is the full signature (name + parameter types), never
//!   the name alone; overloaded contracts stay unambiguous.
//! - Transitive collection is base-first declaration order; the first
//!   occurrence of a signature wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Return shape of a contract method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnType {
	/// The method returns nothing (`()`).
	#[default]
	Void,
	/// The method returns a value of the named type.
	Value(String),
}

impl ReturnType {
	/// Parses a rendered return type; `None`, `""` and `"()"` all mean void.
	pub fn parse(ty: Option<&str>) -> Self {
		match ty {
			None | Some("") | Some("()") => Self::Void,
			Some(ty) => Self::Value(ty.to_string()),
		}
	}

	pub fn is_void(&self) -> bool {
		matches!(self, Self::Void)
	}

	/// Whether the return type is a `Result` shape, i.e. the method can fail
	/// with a recoverable error the instrumented proxy should log.
	pub fn is_result(&self) -> bool {
		match self {
			Self::Void => false,
			Self::Value(ty) => ty.starts_with("Result<") || ty.starts_with("std::result::Result<"),
		}
	}

	/// Renders the type as it appears in a signature.
	pub fn render(&self) -> &str {
		match self {
			Self::Void => "()",
			Self::Value(ty) => ty,
		}
	}
}

/// A named method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
	pub name: String,
	pub ty: String,
}

impl Param {
	pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			ty: ty.into(),
		}
	}
}

/// One method of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
	pub name: String,
	pub params: Vec<Param>,
	pub ret: ReturnType,
}

impl MethodDescriptor {
	pub fn new(name: impl Into<String>, params: Vec<Param>, ret: ReturnType) -> Self {
		Self {
			name: name.into(),
			params,
			ret,
		}
	}

	/// Full-signature identity key: name plus parameter types, in order.
	pub fn sig(&self) -> MethodSig {
		MethodSig {
			name: self.name.clone(),
			param_types: self.params.iter().map(|p| p.ty.clone()).collect(),
		}
	}
}

/// Method identity for duplicate collapsing. Two methods with the same name
/// but different parameter types are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
	pub name: String,
	pub param_types: Vec<String>,
}

/// An interface contract as handed over by discovery. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDescriptor {
	/// Unqualified name, e.g. `Loader`.
	pub name: String,
	/// Namespace-qualified name, e.g. `demo::Loader`. Registry display name.
	pub qualified_name: String,
	/// Qualified names of directly extended contracts.
	pub extends: Vec<String>,
	/// Methods declared directly on this contract, in declaration order.
	pub methods: Vec<MethodDescriptor>,
}

/// Descriptor resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
	#[error("contract '{contract}' extends unknown contract '{base}'")]
	UnknownBase { contract: String, base: String },
}

/// The resolved collection of contracts for one synthesis run, keyed by
/// qualified name. Insertion order is preserved so generated output is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct ContractSet {
	by_name: IndexMap<String, ContractDescriptor>,
}

impl ContractSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a contract. At most one descriptor exists per qualified name;
	/// a later insert for the same name replaces the earlier one.
	pub fn insert(&mut self, contract: ContractDescriptor) -> Option<ContractDescriptor> {
		self.by_name.insert(contract.qualified_name.clone(), contract)
	}

	pub fn get(&self, qualified_name: &str) -> Option<&ContractDescriptor> {
		self.by_name.get(qualified_name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ContractDescriptor> {
		self.by_name.values()
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	/// Collects the full transitive method set of `contract`: all methods of
	/// all extended contracts (recursively, base-first), then the contract's
	/// own, with duplicate signatures collapsed to the first occurrence.
	pub fn transitive_methods<'a>(
		&'a self,
		contract: &'a ContractDescriptor,
	) -> Result<Vec<&'a MethodDescriptor>, ContractError> {
		let mut seen_contracts = Vec::new();
		let mut seen_sigs: IndexMap<MethodSig, &'a MethodDescriptor> = IndexMap::new();
		self.collect_into(contract, &mut seen_contracts, &mut seen_sigs)?;
		Ok(seen_sigs.into_values().collect())
	}

	fn collect_into<'a>(
		&'a self,
		contract: &'a ContractDescriptor,
		seen_contracts: &mut Vec<String>,
		seen_sigs: &mut IndexMap<MethodSig, &'a MethodDescriptor>,
	) -> Result<(), ContractError> {
		// Diamond edges revisit a base; collect it once.
		if seen_contracts.iter().any(|c| c == &contract.qualified_name) {
			return Ok(());
		}
		seen_contracts.push(contract.qualified_name.clone());

		for base in &contract.extends {
			let base_contract =
				self.get(base)
					.ok_or_else(|| ContractError::UnknownBase {
						contract: contract.qualified_name.clone(),
						base: base.clone(),
					})?;
			self.collect_into(base_contract, seen_contracts, seen_sigs)?;
		}

		for method in &contract.methods {
			seen_sigs.entry(method.sig()).or_insert(method);
		}
		Ok(())
	}
}

impl FromIterator<ContractDescriptor> for ContractSet {
	fn from_iter<I: IntoIterator<Item = ContractDescriptor>>(iter: I) -> Self {
		let mut set = Self::new();
		for contract in iter {
			set.insert(contract);
		}
		set
	}
}
