//! Reactive Runtime
//!
//! This module provides the thread-local runtime that delivers change
//! notifications for Cells and Views.
//!
//! ## Architecture
//!
//! Execution is single-threaded and cooperative:
//!
//! 1. **Notification Queue**: Every write schedules one notification for the written node
//! 2. **Coalescing**: A node that is already queued is not queued twice, so observers
//!    only see the latest value once the queue drains
//! 3. **Height Order**: The queue drains lowest height first (cells are 0, a view is one
//!    above its highest source), so a view is delivered only after every path into it
//!    has settled
//! 4. **Batching**: [`batch`] defers the flush until the outermost scope returns
//! 5. **Synchronous Flush**: Outside a batch, the queue is drained before `set()` returns
//!
//! ## Example
//!
//! ```ignore
//! use formcell_reactive::{Cell, Observable, batch};
//!
//! let count = Cell::new(0);
//! let _sub = count.subscribe(|n| println!("Count is: {}", n));
//!
//! // Prints once, with the final value
//! batch(|| {
//!     count.set(1);
//!     count.set(2);
//! });
//! ```

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

extern crate alloc;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;

/// Unique identifier for reactive nodes (Cells, Views, Submitters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Deferred notification for a single node
pub(crate) type NotifyFn = Rc<dyn Fn()>;

/// Reactive runtime
///
/// Holds the pending notification queue and the batch depth for the current thread.
pub struct Runtime {
	/// Nesting depth of active `batch` scopes
	batch_depth: RefCell<usize>,
	/// Whether the queue is currently being drained
	flushing: RefCell<bool>,
	/// Pending notifications keyed by (height, scheduling order)
	pending: RefCell<BTreeMap<(usize, u64), (NodeId, NotifyFn)>>,
	/// Scheduling counter breaking ties within a height
	next_seq: RefCell<u64>,
	/// Nodes currently present in `pending`
	queued: RefCell<BTreeSet<NodeId>>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			batch_depth: RefCell::new(0),
			flushing: RefCell::new(false),
			pending: RefCell::new(BTreeMap::new()),
			next_seq: RefCell::new(0),
			queued: RefCell::new(BTreeSet::new()),
		}
	}

	/// Whether notifications are currently being deferred
	///
	/// This is true inside a `batch` scope and while the queue is being drained.
	pub fn is_batching(&self) -> bool {
		*self.batch_depth.borrow() > 0 || *self.flushing.borrow()
	}

	/// Number of notifications waiting to be delivered
	pub fn pending_count(&self) -> usize {
		self.pending.borrow().len()
	}

	/// Whether the given node has a notification waiting
	pub fn is_queued(&self, node_id: NodeId) -> bool {
		self.queued.borrow().contains(&node_id)
	}

	/// Queue a notification for a node
	///
	/// A node that is already queued keeps its place; the queued notification
	/// reads the node's value at delivery time, so the later write is not lost.
	pub(crate) fn schedule(&self, node_id: NodeId, height: usize, notify: NotifyFn) {
		if self.queued.borrow_mut().insert(node_id) {
			let seq = {
				let mut next = self.next_seq.borrow_mut();
				*next += 1;
				*next
			};
			self.pending
				.borrow_mut()
				.insert((height, seq), (node_id, notify));
		} else {
			tracing::trace!(node = %node_id, "coalesced notification");
		}
	}

	pub(crate) fn begin_batch(&self) {
		*self.batch_depth.borrow_mut() += 1;
	}

	/// Leave a batch scope, returning `true` when the outermost scope closed
	pub(crate) fn end_batch(&self) -> bool {
		let mut depth = self.batch_depth.borrow_mut();
		*depth = depth.saturating_sub(1);
		*depth == 0
	}

	/// Deliver every pending notification
	///
	/// Lower heights go first; within a height, scheduling order is kept.
	/// Notifications scheduled while draining (an observer writing another Cell)
	/// are delivered in the same flush, before this call returns.
	pub fn flush(&self) {
		if *self.flushing.borrow() {
			return;
		}
		*self.flushing.borrow_mut() = true;
		let _guard = FlushGuard(self);

		let mut delivered = 0usize;
		loop {
			let next = self.pending.borrow_mut().pop_first();
			let Some((_, (node_id, notify))) = next else {
				break;
			};
			self.queued.borrow_mut().remove(&node_id);
			notify();
			delivered += 1;
		}

		tracing::trace!(delivered, "flushed reactive notifications");
	}

	/// Drop every pending notification without delivering it
	pub(crate) fn discard_pending(&self) {
		self.pending.borrow_mut().clear();
		self.queued.borrow_mut().clear();
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

/// Resets the flushing flag even if an observer panics
struct FlushGuard<'a>(&'a Runtime);

impl Drop for FlushGuard<'_> {
	fn drop(&mut self) {
		*self.0.flushing.borrow_mut() = false;
	}
}

// Thread-local runtime instance
//
// Reactive state is `Rc`-based and never crosses threads, so each thread
// gets its own queue.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Schedule a notification and flush unless a batch is open
pub(crate) fn notify(node_id: NodeId, height: usize, notify: NotifyFn) {
	with_runtime(|rt| {
		rt.schedule(node_id, height, notify);
		if !rt.is_batching() {
			rt.flush();
		}
	});
}

/// Run `f` with notifications deferred until it returns
///
/// Observers see each written node at most once, with its final value.
/// Batches nest; only the outermost scope flushes.
///
/// # Example
///
/// ```ignore
/// let first = Cell::new(String::new());
/// let last = Cell::new(String::new());
/// let full = View::combine(&first, &last, |f, l| format!("{f} {l}"));
///
/// batch(|| {
///     first.set("Ann".to_string());
///     last.set("Lee".to_string());
/// });
/// // `full` recomputed once
/// ```
pub fn batch<F, R>(f: F) -> R
where
	F: FnOnce() -> R,
{
	with_runtime(|rt| rt.begin_batch());
	let guard = BatchGuard;
	let result = f();
	drop(guard);
	result
}

/// Closes a batch scope, flushing when it was the outermost one
struct BatchGuard;

impl Drop for BatchGuard {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| {
			if rt.end_batch() {
				if std::thread::panicking() {
					rt.discard_pending();
				} else {
					rt.flush();
				}
			}
		});
	}
}
