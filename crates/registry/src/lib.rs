//! Runtime half of lazysh: the one-shot memoizing cell generated proxies
//! delegate to, and the type-indexed registry that hands proxies out.
//!
//! # Modules
//!
//! - [`cell`] - [`LazyTarget`], the materialize-at-most-once target slot
//! - [`factory`] - [`FactoryRegistryBuilder`] / [`FactoryRegistry`],
//!   build-then-freeze proxy constructor table
//! - [`scope`] - [`ScopedRegistry`], a named allow-list view over the
//!   global registry
//! - [`error`] - the runtime error taxonomy
//!
//! Registries follow a two-phase life: every registration happens during
//! setup, `build()` freezes the table, and lookups afterwards take no locks.

pub mod cell;
pub mod error;
pub mod factory;
pub mod scope;

pub use cell::{LazyTarget, Supplier};
pub use error::{HOWTO_URL, InsertAction, RegistryError};
pub use factory::{Contract, FactoryRegistry, FactoryRegistryBuilder};
pub use scope::ScopedRegistry;
