//! Instrumented proxy synthesis.
//!
//! For contract `Name`, emits `LoggedName`: an eager decorator around a
//! real target that brackets every forwarded call with `tracing` logging —
//! start line, each argument as `name = value`, elapsed time, and the
//! return value for non-void methods. `Result`-returning methods log the
//! error and return the identical `Err`; nothing is ever swallowed or
//! wrapped, and panics are never caught.
//!
//! Laziness is orthogonal: compose by nesting one proxy inside the other.
//! Argument and return types must implement `Debug` to be rendered.

use heck::ToSnakeCase;
use lazysh_contract::{ContractDescriptor, ContractSet, MethodDescriptor};
use tracing::debug;

use crate::emit::{SourceWriter, render_args, render_sig};
use crate::{GENERATED_HEADER, ProxyArtifact, SynthError};

/// Synthesizes the instrumented proxy artifact for one contract.
pub fn synthesize(
	set: &ContractSet,
	contract: &ContractDescriptor,
) -> Result<ProxyArtifact, SynthError> {
	let methods = set.transitive_methods(contract)?;
	let type_name = format!("Logged{}", contract.name);
	let module_name = format!("logged_{}", contract.name.to_snake_case());
	let path = &contract.qualified_name;
	let boxed = format!("Box<dyn {path}>");

	let mut w = SourceWriter::new();
	w.line(GENERATED_HEADER);
	w.blank();
	w.line("use std::time::Instant;");
	w.blank();
	w.line(&format!("/// Logging decorator for [`{path}`]: forwards every call to an"));
	w.line("/// eagerly supplied target, bracketed with start/elapsed/result logs.");
	w.open(&format!("pub struct {type_name} {{"));
	w.line(&format!("target: {boxed},"));
	w.close("}");
	w.blank();

	w.open(&format!("impl {type_name} {{"));
	w.open(&format!("pub fn new(target: {boxed}) -> Self {{"));
	w.line("Self { target }");
	w.close("}");
	w.close("}");
	w.blank();

	w.open(&format!("impl {path} for {type_name} {{"));
	let mut first = true;
	for method in &methods {
		if !first {
			w.blank();
		}
		first = false;
		emit_logged_method(&mut w, method);
	}
	w.close("}");

	debug!(contract = %path, methods = methods.len(), proxy = %type_name, "synthesized instrumented proxy");

	Ok(ProxyArtifact {
		contract: path.clone(),
		file_name: format!("{module_name}.rs"),
		registration: None,
		module_name,
		type_name,
		source: w.finish(),
	})
}

fn emit_logged_method(w: &mut SourceWriter, method: &MethodDescriptor) {
	let name = &method.name;
	w.open(&format!("{} {{", render_sig(method)));
	w.line(&format!("tracing::info!(\"{name} started...\");"));
	if !method.params.is_empty() {
		let fmt = method
			.params
			.iter()
			.map(|p| format!("{} = {{:?}}", p.name))
			.collect::<Vec<_>>()
			.join(", ");
		w.line(&format!(
			"tracing::info!(\"  Arguments: {fmt}\", {});",
			render_args(&method.params)
		));
	}
	w.line("let started = Instant::now();");

	let call = format!("self.target.{name}({})", render_args(&method.params));
	if method.ret.is_void() {
		w.line(&format!("{call};"));
		w.line(&format!(
			"tracing::info!(\"{name} finished in {{:?}}\", started.elapsed());"
		));
	} else if method.ret.is_result() {
		w.line(&format!("let result = {call};"));
		w.open("match &result {");
		w.open("Ok(value) => {");
		w.line(&format!(
			"tracing::info!(\"{name} finished in {{:?}}\", started.elapsed());"
		));
		w.line("tracing::info!(\"Return value: {:?}\", value);");
		w.close("}");
		w.line(&format!(
			"Err(error) => tracing::error!(\"{name} failed after {{:?}}: {{:?}}\", started.elapsed(), error),"
		));
		w.close("}");
		w.line("result");
	} else {
		w.line(&format!("let result = {call};"));
		w.line(&format!(
			"tracing::info!(\"{name} finished in {{:?}}\", started.elapsed());"
		));
		w.line("tracing::info!(\"Return value: {:?}\", result);");
		w.line("result");
	}
	w.close("}");
}

#[cfg(test)]
mod tests {
	use lazysh_contract::{ContractDescriptor, MethodDescriptor, Param, ReturnType};
	use pretty_assertions::assert_eq;

	use super::*;

	fn set_with(methods: Vec<MethodDescriptor>) -> ContractSet {
		[ContractDescriptor {
			name: "Loader".to_string(),
			qualified_name: "demo::Loader".to_string(),
			extends: vec![],
			methods,
		}]
		.into_iter()
		.collect()
	}

	#[test]
	fn non_void_method_logs_and_returns_raw_result() {
		let set = set_with(vec![MethodDescriptor::new(
			"fetch",
			vec![],
			ReturnType::Value("i32".to_string()),
		)]);
		let artifact = synthesize(&set, set.get("demo::Loader").unwrap()).unwrap();

		assert_eq!(artifact.type_name, "LoggedLoader");
		assert_eq!(artifact.file_name, "logged_loader.rs");
		assert_eq!(artifact.registration, None);

		let expected_body = "\
\tfn fetch(&self) -> i32 {
\t\ttracing::info!(\"fetch started...\");
\t\tlet started = Instant::now();
\t\tlet result = self.target.fetch();
\t\ttracing::info!(\"fetch finished in {:?}\", started.elapsed());
\t\ttracing::info!(\"Return value: {:?}\", result);
\t\tresult
\t}
";
		assert!(artifact.source.contains(expected_body), "{}", artifact.source);
	}

	#[test]
	fn void_method_logs_arguments_but_no_return() {
		let set = set_with(vec![MethodDescriptor::new(
			"store",
			vec![Param::new("key", "String"), Param::new("value", "i32")],
			ReturnType::Void,
		)]);
		let artifact = synthesize(&set, set.get("demo::Loader").unwrap()).unwrap();

		assert!(artifact.source.contains(
			"tracing::info!(\"  Arguments: key = {:?}, value = {:?}\", key, value);"
		));
		assert!(artifact.source.contains("self.target.store(key, value);"));
		assert!(!artifact.source.contains("Return value"), "{}", artifact.source);
	}

	#[test]
	fn result_method_logs_error_and_returns_it_unchanged() {
		let set = set_with(vec![MethodDescriptor::new(
			"load",
			vec![Param::new("path", "String")],
			ReturnType::Value("Result<String, std::io::Error>".to_string()),
		)]);
		let artifact = synthesize(&set, set.get("demo::Loader").unwrap()).unwrap();

		let expected_body = "\
\tfn load(&self, path: String) -> Result<String, std::io::Error> {
\t\ttracing::info!(\"load started...\");
\t\ttracing::info!(\"  Arguments: path = {:?}\", path);
\t\tlet started = Instant::now();
\t\tlet result = self.target.load(path);
\t\tmatch &result {
\t\t\tOk(value) => {
\t\t\t\ttracing::info!(\"load finished in {:?}\", started.elapsed());
\t\t\t\ttracing::info!(\"Return value: {:?}\", value);
\t\t\t}
\t\t\tErr(error) => tracing::error!(\"load failed after {:?}: {:?}\", started.elapsed(), error),
\t\t}
\t\tresult
\t}
";
		assert!(artifact.source.contains(expected_body), "{}", artifact.source);
	}
}
