//! Stable-coded usage diagnostics.
//!
//! Discovery-time misuse is reported, not fatal: the offending type is
//! skipped and every other valid contract still proceeds.

use std::fmt;

use crate::discover::SourceLocation;

/// Message for the non-interface usage violation. The marker only makes
/// sense on interface contracts.
pub const MUST_BE_INTERFACE: &str = "[Lazysh] must be applied to an interface";

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
	/// `[Lazysh]` applied to something other than an interface.
	Lg01,
}

impl fmt::Display for DiagnosticCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Lg01 => f.write_str("LG01"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Warning => f.write_str("warning"),
			Self::Error => f.write_str("error"),
		}
	}
}

/// One reported usage violation, carrying the offending declaration's
/// location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub code: DiagnosticCode,
	pub severity: Severity,
	pub message: String,
	pub location: SourceLocation,
}

impl Diagnostic {
	/// The `LG01` violation: the proxy-eligibility marker on a
	/// non-interface type.
	pub fn must_be_interface(location: SourceLocation) -> Self {
		Self {
			code: DiagnosticCode::Lg01,
			severity: Severity::Error,
			message: MUST_BE_INTERFACE.to_string(),
			location,
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}[{}]: {} ({})",
			self.severity, self.code, self.message, self.location
		)
	}
}
