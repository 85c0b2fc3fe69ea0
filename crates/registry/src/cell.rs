//! One-shot memoizing target cell.
//!
//! # Role
//!
//! [`LazyTarget`] is the single concurrency-sensitive hot path of a lazy
//! proxy: it owns the supplier and an empty slot, runs the supplier at most
//! once on first access, and serves the same target to every later call.
//!
//! # Invariants
//!
//! - The supplier runs exactly once, even under concurrent first calls;
//!   callers that lose the race block until materialization completes.
//! - A supplier panic poisons the cell: the panic propagates to the caller
//!   that ran the supplier, and every blocked or later caller panics too.
//!   There is no retry.

use std::sync::OnceLock;

use parking_lot::{Condvar, Mutex};

/// Boxed zero-argument builder of a (potentially expensive) target. This is
/// what proxy constructors receive from the factory registry and what a
/// [`LazyTarget`] defers and memoizes.
pub type Supplier<T> = Box<dyn FnOnce() -> T + Send>;

enum BuildState<T> {
	/// Nobody asked yet; the supplier is waiting.
	Idle(Option<Supplier<T>>),
	/// One caller is running the supplier; the rest wait on the condvar.
	Building,
	/// The target is published in the value slot.
	Ready,
	/// The supplier panicked. Terminal.
	Poisoned,
}

/// A not-yet-materialized target slot with a one-shot computation guard.
///
/// Created cheap (no target work), materializes on the first
/// [`get`](LazyTarget::get), and retains the target for its own lifetime.
/// Reads after materialization are lock-free.
pub struct LazyTarget<T> {
	value: OnceLock<T>,
	state: Mutex<BuildState<T>>,
	cond: Condvar,
}

impl<T> LazyTarget<T> {
	pub fn new(supplier: impl FnOnce() -> T + Send + 'static) -> Self {
		Self::from_supplier(Box::new(supplier))
	}

	pub fn from_supplier(supplier: Supplier<T>) -> Self {
		Self {
			value: OnceLock::new(),
			state: Mutex::new(BuildState::Idle(Some(supplier))),
			cond: Condvar::new(),
		}
	}

	/// Returns the target, materializing it first if this is the first call.
	///
	/// Panics if the supplier panicked, on this call or any earlier one.
	pub fn get(&self) -> &T {
		if let Some(value) = self.value.get() {
			return value;
		}

		let mut state = self.state.lock();
		loop {
			match &mut *state {
				BuildState::Idle(supplier) => {
					let supplier = supplier.take().expect("idle state always holds the supplier");
					*state = BuildState::Building;
					drop(state);

					let guard = PoisonGuard { cell: self, armed: true };
					let target = supplier();
					guard.disarm();

					if self.value.set(target).is_err() {
						unreachable!("only the building caller publishes the target");
					}
					*self.state.lock() = BuildState::Ready;
					self.cond.notify_all();
					return self.value.get().expect("target was just published");
				}
				BuildState::Building => self.cond.wait(&mut state),
				BuildState::Ready => {
					return self.value.get().expect("ready state implies a published target");
				}
				BuildState::Poisoned => {
					panic!("lazy target poisoned: supplier panicked during materialization")
				}
			}
		}
	}

	/// Whether the target has been built. Never triggers materialization.
	pub fn is_materialized(&self) -> bool {
		self.value.get().is_some()
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for LazyTarget<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.value.get() {
			Some(value) => f.debug_tuple("LazyTarget").field(value).finish(),
			None => f.write_str("LazyTarget(<unmaterialized>)"),
		}
	}
}

/// Marks the cell poisoned if the supplier unwinds, waking all waiters.
struct PoisonGuard<'a, T> {
	cell: &'a LazyTarget<T>,
	armed: bool,
}

impl<T> PoisonGuard<'_, T> {
	fn disarm(mut self) {
		self.armed = false;
	}
}

impl<T> Drop for PoisonGuard<'_, T> {
	fn drop(&mut self) {
		if self.armed {
			*self.cell.state.lock() = BuildState::Poisoned;
			self.cell.cond.notify_all();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::panic::{AssertUnwindSafe, catch_unwind};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::{Arc, Barrier};
	use std::thread;

	use super::*;

	#[test]
	fn creation_does_no_work() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let cell = LazyTarget::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
			5
		});
		assert!(!cell.is_materialized());
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(*cell.get(), 5);
		assert!(cell.is_materialized());
	}

	#[test]
	fn repeated_gets_observe_the_same_target() {
		let cell = LazyTarget::new(|| "target".to_string());
		let first: *const String = cell.get();
		let second: *const String = cell.get();
		assert_eq!(first, second);
	}

	/// Many threads race the first call; the supplier must run exactly once
	/// and every thread must see a result from that single build.
	#[test]
	fn concurrent_first_calls_materialize_once() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let cell = Arc::new(LazyTarget::new(move || {
			counter.fetch_add(1, Ordering::SeqCst);
			// Widen the race window.
			thread::sleep(std::time::Duration::from_millis(20));
			42_i64
		}));

		let threads = 16;
		let barrier = Arc::new(Barrier::new(threads));
		let handles: Vec<_> = (0..threads)
			.map(|_| {
				let cell = cell.clone();
				let barrier = barrier.clone();
				thread::spawn(move || {
					barrier.wait();
					*cell.get()
				})
			})
			.collect();

		for handle in handles {
			assert_eq!(handle.join().unwrap(), 42);
		}
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn panicking_supplier_poisons_for_every_caller() {
		let cell: LazyTarget<i32> = LazyTarget::new(|| panic!("supplier failed"));

		let first = catch_unwind(AssertUnwindSafe(|| cell.get()));
		assert!(first.is_err());

		// Later calls fail identically instead of retrying.
		let second = catch_unwind(AssertUnwindSafe(|| cell.get()));
		assert!(second.is_err());
		assert!(!cell.is_materialized());
	}
}
