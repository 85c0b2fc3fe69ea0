//! Lazy proxy synthesis.
//!
//! For contract `Name`, emits `LazyshName`: a struct owning a
//! `LazyTarget<Box<dyn Name>>`, implementing `Name` by forwarding every
//! method (the full transitive set, diamond duplicates collapsed) to
//! `self.target.get()`, plus the `create`/`constructor`/`register` surface
//! the factory registry consumes.

use heck::ToSnakeCase;
use lazysh_contract::{ContractDescriptor, ContractSet, MethodDescriptor};
use tracing::debug;

use crate::emit::{SourceWriter, render_args, render_sig};
use crate::{GENERATED_HEADER, ProxyArtifact, SynthError};

/// Synthesizes the lazy proxy artifact for one contract.
pub fn synthesize(
	set: &ContractSet,
	contract: &ContractDescriptor,
) -> Result<ProxyArtifact, SynthError> {
	let methods = set.transitive_methods(contract)?;
	let type_name = format!("Lazysh{}", contract.name);
	let module_name = format!("lazysh_{}", contract.name.to_snake_case());
	let path = &contract.qualified_name;
	let boxed = format!("Box<dyn {path}>");

	let mut w = SourceWriter::new();
	w.line(GENERATED_HEADER);
	w.blank();
	w.line("use lazysh_registry::{Contract, FactoryRegistryBuilder, LazyTarget, Supplier};");
	w.blank();
	w.line(&format!("/// Lazy proxy for [`{path}`]: builds the real target on the"));
	w.line("/// first forwarded call, then reuses it forever.");
	w.open(&format!("pub struct {type_name} {{"));
	w.line(&format!("target: LazyTarget<{boxed}>,"));
	w.close("}");
	w.blank();

	w.open(&format!("impl {type_name} {{"));
	w.line("/// Cheap to call: the supplier runs on the first forwarded call,");
	w.line("/// not here.");
	w.open(&format!(
		"pub fn create(supplier: impl FnOnce() -> {boxed} + Send + 'static) -> Self {{"
	));
	w.open("Self {");
	w.line("target: LazyTarget::new(supplier),");
	w.close("}");
	w.close("}");
	w.blank();
	w.open(&format!("pub fn constructor(supplier: Supplier<{boxed}>) -> {boxed} {{"));
	w.line("Box::new(Self::create(supplier))");
	w.close("}");
	w.blank();
	w.open("pub fn register(builder: &mut FactoryRegistryBuilder) {");
	w.line(&format!("builder.register::<{boxed}>(Self::constructor);"));
	w.close("}");
	w.close("}");
	w.blank();

	w.open(&format!("impl Contract for {boxed} {{"));
	w.line(&format!("const NAME: &'static str = \"{path}\";"));
	w.close("}");
	w.blank();

	w.open(&format!("impl {path} for {type_name} {{"));
	let mut first = true;
	for method in &methods {
		if !first {
			w.blank();
		}
		first = false;
		emit_forwarding_method(&mut w, method);
	}
	w.close("}");

	debug!(contract = %path, methods = methods.len(), proxy = %type_name, "synthesized lazy proxy");

	Ok(ProxyArtifact {
		contract: path.clone(),
		file_name: format!("{module_name}.rs"),
		registration: Some(format!("{module_name}::{type_name}::register(builder);")),
		module_name,
		type_name,
		source: w.finish(),
	})
}

fn emit_forwarding_method(w: &mut SourceWriter, method: &MethodDescriptor) {
	w.open(&format!("{} {{", render_sig(method)));
	w.line(&format!(
		"self.target.get().{}({})",
		method.name,
		render_args(&method.params)
	));
	w.close("}");
}

#[cfg(test)]
mod tests {
	use lazysh_contract::{ContractDescriptor, MethodDescriptor, Param, ReturnType};
	use pretty_assertions::assert_eq;

	use super::*;

	fn loader_set() -> ContractSet {
		[ContractDescriptor {
			name: "Loader".to_string(),
			qualified_name: "demo::Loader".to_string(),
			extends: vec![],
			methods: vec![
				MethodDescriptor::new("fetch", vec![], ReturnType::Value("i32".to_string())),
				MethodDescriptor::new(
					"store",
					vec![Param::new("key", "String"), Param::new("value", "i32")],
					ReturnType::Void,
				),
			],
		}]
		.into_iter()
		.collect()
	}

	#[test]
	fn golden_loader_proxy() {
		let set = loader_set();
		let artifact = synthesize(&set, set.get("demo::Loader").unwrap()).unwrap();

		assert_eq!(artifact.contract, "demo::Loader");
		assert_eq!(artifact.type_name, "LazyshLoader");
		assert_eq!(artifact.file_name, "lazysh_loader.rs");
		assert_eq!(
			artifact.registration.as_deref(),
			Some("lazysh_loader::LazyshLoader::register(builder);")
		);

		let expected = "\
// @generated by lazysh-synth. Do not edit.

use lazysh_registry::{Contract, FactoryRegistryBuilder, LazyTarget, Supplier};

/// Lazy proxy for [`demo::Loader`]: builds the real target on the
/// first forwarded call, then reuses it forever.
pub struct LazyshLoader {
\ttarget: LazyTarget<Box<dyn demo::Loader>>,
}

impl LazyshLoader {
\t/// Cheap to call: the supplier runs on the first forwarded call,
\t/// not here.
\tpub fn create(supplier: impl FnOnce() -> Box<dyn demo::Loader> + Send + 'static) -> Self {
\t\tSelf {
\t\t\ttarget: LazyTarget::new(supplier),
\t\t}
\t}

\tpub fn constructor(supplier: Supplier<Box<dyn demo::Loader>>) -> Box<dyn demo::Loader> {
\t\tBox::new(Self::create(supplier))
\t}

\tpub fn register(builder: &mut FactoryRegistryBuilder) {
\t\tbuilder.register::<Box<dyn demo::Loader>>(Self::constructor);
\t}
}

impl Contract for Box<dyn demo::Loader> {
\tconst NAME: &'static str = \"demo::Loader\";
}

impl demo::Loader for LazyshLoader {
\tfn fetch(&self) -> i32 {
\t\tself.target.get().fetch()
\t}

\tfn store(&self, key: String, value: i32) {
\t\tself.target.get().store(key, value)
\t}
}
";
		assert_eq!(artifact.source, expected);
	}

	/// The full transitive method set flows into the proxy, diamond
	/// duplicates collapsed to one forwarding implementation.
	#[test]
	fn diamond_contract_forwards_each_method_once() {
		let base = |name: &str, extends: Vec<&str>, methods: Vec<MethodDescriptor>| {
			ContractDescriptor {
				name: name.to_string(),
				qualified_name: format!("demo::{name}"),
				extends: extends.into_iter().map(|b| format!("demo::{b}")).collect(),
				methods,
			}
		};
		let set: ContractSet = [
			base("Top", vec![], vec![MethodDescriptor::new("ping", vec![], ReturnType::Void)]),
			base("Left", vec!["Top"], vec![]),
			base("Right", vec!["Top"], vec![]),
			base(
				"Bottom",
				vec!["Left", "Right"],
				vec![MethodDescriptor::new("own", vec![], ReturnType::Void)],
			),
		]
		.into_iter()
		.collect();

		let artifact = synthesize(&set, set.get("demo::Bottom").unwrap()).unwrap();
		assert_eq!(artifact.source.matches("fn ping(&self)").count(), 1);
		assert_eq!(artifact.source.matches("fn own(&self)").count(), 1);
	}

	#[test]
	fn unknown_base_surfaces_as_contract_error() {
		let set: ContractSet = [ContractDescriptor {
			name: "Leaf".to_string(),
			qualified_name: "demo::Leaf".to_string(),
			extends: vec!["demo::Missing".to_string()],
			methods: vec![],
		}]
		.into_iter()
		.collect();

		let err = synthesize(&set, set.get("demo::Leaf").unwrap()).unwrap_err();
		assert!(matches!(err, SynthError::Contract(_)));
	}
}
