//! Lazy loading demo: building the real `Loaded` takes a second, obtaining
//! the proxy is free, and only the first forwarded call pays the cost.
//!
//! Run with `cargo run --example lazy_loader`.

use std::time::{Duration, Instant};

use lazysh_registry::{Contract, FactoryRegistryBuilder, LazyTarget, Supplier};
use tracing::info;

trait Loaded: Send + Sync {
	fn do_int(&self) -> i32;
	fn do_void(&self);
}

struct RealLoaded;

impl Loaded for RealLoaded {
	fn do_int(&self) -> i32 {
		5
	}

	fn do_void(&self) {
		info!("This!");
	}
}

fn load() -> Box<dyn Loaded> {
	// Time consuming operation.
	std::thread::sleep(Duration::from_secs(1));
	Box::new(RealLoaded)
}

// What lazysh-synth emits for `Loaded`.
struct LazyshLoaded {
	target: LazyTarget<Box<dyn Loaded>>,
}

impl LazyshLoaded {
	fn constructor(supplier: Supplier<Box<dyn Loaded>>) -> Box<dyn Loaded> {
		Box::new(Self {
			target: LazyTarget::from_supplier(supplier),
		})
	}
}

impl Loaded for LazyshLoaded {
	fn do_int(&self) -> i32 {
		self.target.get().do_int()
	}

	fn do_void(&self) {
		self.target.get().do_void()
	}
}

impl Contract for Box<dyn Loaded> {
	const NAME: &'static str = "usage::Loaded";
}

fn main() {
	tracing_subscriber::fmt().init();

	let mut builder = FactoryRegistryBuilder::new("usage");
	builder.register::<Box<dyn Loaded>>(LazyshLoaded::constructor);
	let registry = builder.build();

	let started = Instant::now();
	let lazy_loaded = registry
		.get::<Box<dyn Loaded>>(load)
		.expect("Loaded was registered above");
	info!(elapsed = ?started.elapsed(), "got proxy (not yet loaded)");

	let started = Instant::now();
	info!(value = lazy_loaded.do_int(), elapsed = ?started.elapsed(), "first call (loads)");

	let started = Instant::now();
	lazy_loaded.do_void();
	info!(elapsed = ?started.elapsed(), "second call (already loaded)");
}
