//! End-to-end lazy loading scenario: a slow-to-build `Loader` behind a
//! hand-expanded lazy proxy (the exact shape `lazysh-synth` emits), obtained
//! through the factory registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use lazysh_registry::{Contract, FactoryRegistryBuilder, LazyTarget, Supplier};

const BUILD_DELAY: Duration = Duration::from_millis(300);

trait Loader: Send + Sync {
	fn fetch(&self) -> i32;
	fn describe(&self, prefix: String, verbose: bool) -> String;
}

struct SlowLoader;

impl Loader for SlowLoader {
	fn fetch(&self) -> i32 {
		5
	}

	fn describe(&self, prefix: String, verbose: bool) -> String {
		if verbose {
			format!("{prefix}: slow loader")
		} else {
			prefix
		}
	}
}

struct LazyshLoader {
	target: LazyTarget<Box<dyn Loader>>,
}

impl LazyshLoader {
	fn create(supplier: impl FnOnce() -> Box<dyn Loader> + Send + 'static) -> Self {
		Self {
			target: LazyTarget::new(supplier),
		}
	}

	fn constructor(supplier: Supplier<Box<dyn Loader>>) -> Box<dyn Loader> {
		Box::new(Self::create(supplier))
	}
}

impl Loader for LazyshLoader {
	fn fetch(&self) -> i32 {
		self.target.get().fetch()
	}

	fn describe(&self, prefix: String, verbose: bool) -> String {
		self.target.get().describe(prefix, verbose)
	}
}

impl Contract for Box<dyn Loader> {
	const NAME: &'static str = "demo::Loader";
}

fn build_registry() -> Arc<lazysh_registry::FactoryRegistry> {
	let mut builder = FactoryRegistryBuilder::new("lazy-loader-test");
	builder.register::<Box<dyn Loader>>(LazyshLoader::constructor);
	Arc::new(builder.build())
}

/// First call pays the build delay, the second is immediate, both return
/// the single built target's value.
#[test]
fn first_call_builds_second_call_reuses() {
	let registry = build_registry();
	let builds = Arc::new(AtomicUsize::new(0));
	let counter = builds.clone();

	let proxy = registry
		.get::<Box<dyn Loader>>(move || {
			counter.fetch_add(1, Ordering::SeqCst);
			std::thread::sleep(BUILD_DELAY);
			Box::new(SlowLoader)
		})
		.expect("Loader is registered");

	// Obtaining the proxy does no target work.
	assert_eq!(builds.load(Ordering::SeqCst), 0);

	let first = Instant::now();
	assert_eq!(proxy.fetch(), 5);
	assert!(first.elapsed() >= BUILD_DELAY, "first call must materialize");

	let second = Instant::now();
	assert_eq!(proxy.fetch(), 5);
	assert!(
		second.elapsed() < BUILD_DELAY / 2,
		"second call must reuse the target"
	);

	assert_eq!(builds.load(Ordering::SeqCst), 1);
}

/// Arguments pass through unchanged, in order, and the return value is the
/// target's raw result.
#[test]
fn forwards_arguments_and_returns_unchanged() {
	let registry = build_registry();
	let proxy = registry
		.get::<Box<dyn Loader>>(|| Box::new(SlowLoader))
		.unwrap();

	assert_eq!(proxy.describe("cold".to_string(), true), "cold: slow loader");
	assert_eq!(proxy.describe("warm".to_string(), false), "warm");
}
