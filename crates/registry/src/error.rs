//! Runtime error taxonomy.
//!
//! Exactly one runtime error kind exists: an unregistered (or out-of-scope)
//! contract requested through `get`. Everything a real target does wrong
//! propagates unchanged through the proxy layer.

/// Pointer included in every not-allowed message.
pub const HOWTO_URL: &str = "https://github.com/lazysh-rs/lazysh#readme";

/// Result of a registration during setup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Contract was new; constructor inserted.
	InsertedNew,
	/// Contract was already registered; the new constructor replaced the
	/// old one (last write wins, reported loudly).
	ReplacedExisting,
}

/// Runtime registry failures. Distinct from generic argument errors so call
/// sites can match on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The requested contract is not in the allow-list of the registry (or
	/// scope) that was asked. Carries the full allow-list at the point of
	/// failure.
	#[error(
		"'{contract}' is not allowed. Allowed list: [{list}]. Please see README for howto: {url}",
		list = .allowed.join(", "),
		url = HOWTO_URL
	)]
	NotAllowed {
		/// Display name of the requested contract.
		contract: String,
		/// Every contract name the asked registry/scope allows, sorted.
		allowed: Vec<String>,
	},
}

impl RegistryError {
	pub(crate) fn not_allowed(contract: &str, mut allowed: Vec<String>) -> Self {
		allowed.sort_unstable();
		Self::NotAllowed {
			contract: contract.to_string(),
			allowed,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_names_contract_and_enumerates_allow_list() {
		let err = RegistryError::not_allowed(
			"demo::Cache",
			vec!["demo::Loader".to_string(), "demo::Auditor".to_string()],
		);
		assert_eq!(
			err.to_string(),
			format!(
				"'demo::Cache' is not allowed. Allowed list: [demo::Auditor, demo::Loader]. \
				 Please see README for howto: {HOWTO_URL}"
			)
		);
	}

	#[test]
	fn empty_allow_list_renders_empty_brackets() {
		let err = RegistryError::not_allowed("demo::Loader", vec![]);
		assert!(err.to_string().contains("Allowed list: []."));
	}
}
