//! Source emission helpers shared by both synthesizers.

use lazysh_contract::{MethodDescriptor, Param};

/// Tab-indented source buffer.
pub struct SourceWriter {
	buf: String,
	indent: usize,
}

impl SourceWriter {
	pub fn new() -> Self {
		Self {
			buf: String::new(),
			indent: 0,
		}
	}

	/// Appends one line at the current indent.
	pub fn line(&mut self, text: &str) {
		for _ in 0..self.indent {
			self.buf.push('\t');
		}
		self.buf.push_str(text);
		self.buf.push('\n');
	}

	pub fn blank(&mut self) {
		self.buf.push('\n');
	}

	/// Appends a line and indents the following ones (a block opener).
	pub fn open(&mut self, text: &str) {
		self.line(text);
		self.indent += 1;
	}

	/// Dedents and appends the closing line.
	pub fn close(&mut self, text: &str) {
		self.indent = self.indent.saturating_sub(1);
		self.line(text);
	}

	pub fn finish(self) -> String {
		self.buf
	}
}

impl Default for SourceWriter {
	fn default() -> Self {
		Self::new()
	}
}

/// `key: String, value: i32` — parameter list after `&self`, names and
/// order exactly as declared.
pub fn render_params(params: &[Param]) -> String {
	params
		.iter()
		.map(|p| format!("{}: {}", p.name, p.ty))
		.collect::<Vec<_>>()
		.join(", ")
}

/// `key, value` — forwarded call arguments, unchanged.
pub fn render_args(params: &[Param]) -> String {
	params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Full method signature: `fn store(&self, key: String, value: i32)` plus
/// the return arrow for non-void methods.
pub fn render_sig(method: &MethodDescriptor) -> String {
	let mut sig = format!("fn {}(&self", method.name);
	if !method.params.is_empty() {
		sig.push_str(", ");
		sig.push_str(&render_params(&method.params));
	}
	sig.push(')');
	if !method.ret.is_void() {
		sig.push_str(" -> ");
		sig.push_str(method.ret.render());
	}
	sig
}

#[cfg(test)]
mod tests {
	use lazysh_contract::{MethodDescriptor, Param, ReturnType};

	use super::*;

	#[test]
	fn signature_preserves_names_order_and_return() {
		let method = MethodDescriptor::new(
			"store",
			vec![Param::new("key", "String"), Param::new("value", "i32")],
			ReturnType::Void,
		);
		assert_eq!(render_sig(&method), "fn store(&self, key: String, value: i32)");
		assert_eq!(render_args(&method.params), "key, value");

		let method = MethodDescriptor::new("fetch", vec![], ReturnType::Value("i32".to_string()));
		assert_eq!(render_sig(&method), "fn fetch(&self) -> i32");
	}

	#[test]
	fn writer_indents_with_tabs() {
		let mut w = SourceWriter::new();
		w.open("impl Demo {");
		w.line("fn run(&self) {}");
		w.close("}");
		assert_eq!(w.finish(), "impl Demo {\n\tfn run(&self) {}\n}\n");
	}
}
