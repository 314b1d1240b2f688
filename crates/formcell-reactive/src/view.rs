//! View - Derived, Memoized Projections
//!
//! [`View<T>`] wraps a pure mapping over one or two [`Observable`] sources and
//! caches its result. When a source changes, the cached value is marked dirty
//! and one notification is scheduled for the view; the mapping runs again only
//! when the value is next read.
//!
//! # Invariants
//!
//! 1. Once propagation settles, `get()` equals the mapping applied to the
//!    sources' current values.
//! 2. The mapping runs at most once per settled propagation step, however
//!    many sources changed within it.
//! 3. Reading an unchanged view returns the cached value without recomputing.
//! 4. `version()` increments by exactly 1 per recomputation.
//! 5. Observers see one notification per settled step, even when the sources
//!    reach the view through paths of different lengths.
//!
//! A view over an unset source is itself unset; use [`View::optional`] to
//! turn readiness into a value.

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::ReactiveError;
use crate::observable::{Observable, Subscribers, Subscription};
use crate::runtime::{self, NodeId};

struct ViewInner<T> {
	id: NodeId,
	compute: Box<dyn Fn() -> Option<T>>,
	memo: RefCell<Option<T>>,
	dirty: RefCell<bool>,
	version: RefCell<u64>,
	/// One above the highest source
	height: RefCell<usize>,
	subscribers: Rc<Subscribers<T>>,
	/// Keeps the upstream observers registered; never read
	_upstream: RefCell<Vec<Subscription>>,
}

impl<T: Clone + 'static> ViewInner<T> {
	fn current(&self) -> Option<T> {
		if *self.dirty.borrow() {
			let fresh = (self.compute)();
			*self.memo.borrow_mut() = fresh;
			*self.dirty.borrow_mut() = false;
			*self.version.borrow_mut() += 1;
		}
		self.memo.borrow().clone()
	}

	fn invalidate(self: &Rc<Self>) {
		*self.dirty.borrow_mut() = true;

		let weak = Rc::downgrade(self);
		runtime::notify(
			self.id,
			*self.height.borrow(),
			Rc::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.deliver();
				}
			}),
		);
	}

	fn deliver(&self) {
		// Nobody is listening: stay dirty and recompute on the next read
		if self.subscribers.is_empty() {
			return;
		}
		if let Some(value) = self.current() {
			self.subscribers.deliver(&value);
		}
	}
}

/// A read-only, memoized projection of one or more observables
///
/// Cloning a `View` creates a new handle to the **same** cached state.
pub struct View<T: 'static> {
	inner: Rc<ViewInner<T>>,
}

impl<T: Clone + 'static> View<T> {
	fn from_compute(compute: Box<dyn Fn() -> Option<T>>) -> Self {
		Self {
			inner: Rc::new(ViewInner {
				id: NodeId::new(),
				compute,
				memo: RefCell::new(None),
				dirty: RefCell::new(true),
				version: RefCell::new(0),
				height: RefCell::new(0),
				subscribers: Subscribers::new(),
				_upstream: RefCell::new(Vec::new()),
			}),
		}
	}

	fn track<S: Observable>(&self, source: &S) {
		{
			let mut height = self.inner.height.borrow_mut();
			*height = (*height).max(source.height() + 1);
		}

		let weak = Rc::downgrade(&self.inner);
		let sub = source.subscribe_boxed(Box::new(move |_: &S::Value| {
			if let Some(inner) = weak.upgrade() {
				inner.invalidate();
			}
		}));
		self.inner._upstream.borrow_mut().push(sub);
	}

	/// Create a view applying `f` to a single source
	///
	/// # Example
	///
	/// ```ignore
	/// let user = Cell::new(User::default());
	/// let greeting = View::map(&user, |u| format!("Hello, {}", u.firstname));
	/// ```
	pub fn map<S, F>(source: &S, f: F) -> Self
	where
		S: Observable + Clone + 'static,
		F: Fn(&S::Value) -> T + 'static,
	{
		let src = source.clone();
		let view = Self::from_compute(Box::new(move || src.try_get().map(|value| f(&value))));
		view.track(source);
		view
	}

	/// Create a view combining two sources
	///
	/// The view is unset until both sources hold a value.
	pub fn combine<A, B, F>(a: &A, b: &B, f: F) -> Self
	where
		A: Observable + Clone + 'static,
		B: Observable + Clone + 'static,
		F: Fn(&A::Value, &B::Value) -> T + 'static,
	{
		let src_a = a.clone();
		let src_b = b.clone();
		let view = Self::from_compute(Box::new(move || {
			let a = src_a.try_get()?;
			let b = src_b.try_get()?;
			Some(f(&a, &b))
		}));
		view.track(a);
		view.track(b);
		view
	}

	/// Derive another view from this one
	pub fn map_view<U, F>(&self, f: F) -> View<U>
	where
		U: Clone + 'static,
		F: Fn(&T) -> U + 'static,
	{
		View::map(self, f)
	}

	/// Get the current value, failing while a source is unset
	pub fn get(&self) -> Result<T, ReactiveError> {
		self.try_get().ok_or(ReactiveError::NotReady {
			node: self.inner.id,
		})
	}

	/// Get the current value if every source is set
	pub fn try_get(&self) -> Option<T> {
		self.inner.current()
	}

	/// Number of recomputations so far
	pub fn version(&self) -> u64 {
		*self.inner.version.borrow()
	}

	/// Get the NodeId of this view
	pub fn id(&self) -> NodeId {
		self.inner.id
	}
}

impl<T: Clone + 'static> View<Option<T>> {
	/// View that is always set, yielding `None` while `source` is unset
	///
	/// # Example
	///
	/// ```ignore
	/// let model: Cell<User> = Cell::unset();
	/// let loaded = View::optional(&model);
	/// assert_eq!(loaded.get(), Ok(None));
	/// ```
	pub fn optional<S>(source: &S) -> Self
	where
		S: Observable<Value = T> + Clone + 'static,
	{
		let src = source.clone();
		let view = Self::from_compute(Box::new(move || Some(src.try_get())));
		view.track(source);
		view
	}
}

impl<T: 'static> Clone for View<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Clone + 'static> Observable for View<T> {
	type Value = T;

	fn node_id(&self) -> NodeId {
		self.inner.id
	}

	fn try_get(&self) -> Option<T> {
		View::try_get(self)
	}

	fn version(&self) -> u64 {
		View::version(self)
	}

	fn height(&self) -> usize {
		*self.inner.height.borrow()
	}

	fn subscribe_boxed(&self, observer: Box<dyn Fn(&T)>) -> Subscription {
		self.inner.subscribers.add(observer)
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for View<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("id", &self.inner.id)
			.field("cached", &*self.inner.memo.borrow())
			.field("dirty", &*self.inner.dirty.borrow())
			.field("version", &self.version())
			.finish()
	}
}
