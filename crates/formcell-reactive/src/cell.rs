//! Cell - Observable Mutable Value
//!
//! `Cell<T>` holds a value that can change over time and notifies its
//! observers whenever it is written.
//!
//! ## Key Features
//!
//! - **Unset State**: A Cell can start without a value ([`Cell::unset`]); readiness-requiring
//!   reads fail with [`ReactiveError::NotReady`] until the first write.
//! - **Versioning**: Every write bumps a monotonic version counter.
//! - **Coalesced Notification**: Observers are notified once per write, or once per
//!   [`batch`](crate::batch) with the final value.
//! - **Lightweight**: `Cell<T>` is an `Rc` handle; clones share the same value.
//!
//! ## Example
//!
//! ```ignore
//! use formcell_reactive::{Cell, Observable};
//!
//! let count = Cell::new(0);
//! let _sub = count.subscribe(|n| println!("count = {n}"));
//!
//! count.set(42);
//! assert_eq!(count.get(), Ok(42));
//!
//! count.update(|n| *n += 1)?;
//! assert_eq!(count.get(), Ok(43));
//! ```

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::error::ReactiveError;
use crate::lens::Lens;
use crate::observable::{Observable, Subscribers, Subscription};
use crate::runtime::{self, NodeId};
use crate::view::View;

/// A reactive cell that holds a value and notifies observers on write
///
/// ## Cloning
///
/// `Cell<T>` shares its value via `Rc`. All clones of the same Cell observe
/// and write the same underlying value.
pub struct Cell<T: 'static> {
	inner: Rc<CellInner<T>>,
}

struct CellInner<T> {
	/// Unique identifier for this cell
	id: NodeId,
	/// Current value, `None` while unset
	value: RefCell<Option<T>>,
	/// Incremented on every write
	version: RefCell<u64>,
	subscribers: Rc<Subscribers<T>>,
}

impl<T: Clone + 'static> CellInner<T> {
	fn deliver(&self) {
		// Clone out so observers may write back into this cell
		let current = self.value.borrow().clone();
		if let Some(value) = current {
			self.subscribers.deliver(&value);
		}
	}
}

impl<T: Clone + 'static> Cell<T> {
	/// Create a new Cell holding `value`
	pub fn new(value: T) -> Self {
		Self::from_option(Some(value))
	}

	/// Create a Cell in the unset (waiting) state
	///
	/// # Example
	///
	/// ```ignore
	/// let model: Cell<User> = Cell::unset();
	/// assert!(!model.is_set());
	/// assert!(model.get().is_err());
	/// ```
	pub fn unset() -> Self {
		Self::from_option(None)
	}

	fn from_option(value: Option<T>) -> Self {
		Self {
			inner: Rc::new(CellInner {
				id: NodeId::new(),
				value: RefCell::new(value),
				version: RefCell::new(0),
				subscribers: Subscribers::new(),
			}),
		}
	}

	/// Get the current value, failing while the cell is unset
	pub fn get(&self) -> Result<T, ReactiveError> {
		self.try_get().ok_or(ReactiveError::NotReady {
			node: self.inner.id,
		})
	}

	/// Get the current value if there is one
	pub fn try_get(&self) -> Option<T> {
		self.inner.value.borrow().clone()
	}

	/// Read the current value by reference without cloning it
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ReactiveError> {
		match self.inner.value.borrow().as_ref() {
			Some(value) => Ok(f(value)),
			None => Err(ReactiveError::NotReady {
				node: self.inner.id,
			}),
		}
	}

	/// Whether the cell holds a value
	pub fn is_set(&self) -> bool {
		self.inner.value.borrow().is_some()
	}

	/// Set the cell to a new value
	///
	/// Observers are notified before this returns, unless a `batch` is open,
	/// in which case they are notified once when it closes.
	pub fn set(&self, value: T) {
		*self.inner.value.borrow_mut() = Some(value);
		self.bump_and_notify();
	}

	/// Update the value through a closure
	///
	/// `f` works on a copy, so it may read this cell (or its lenses) freely;
	/// the result is written back as one `set`. Fails with
	/// [`ReactiveError::NotReady`] if the cell is unset.
	pub fn update<F>(&self, f: F) -> Result<(), ReactiveError>
	where
		F: FnOnce(&mut T),
	{
		let mut value = self.get()?;
		f(&mut value);
		self.set(value);
		Ok(())
	}

	fn bump_and_notify(&self) {
		let version = {
			let mut version = self.inner.version.borrow_mut();
			*version += 1;
			*version
		};
		tracing::trace!(node = %self.inner.id, version, "cell written");

		let weak = Rc::downgrade(&self.inner);
		runtime::notify(
			self.inner.id,
			0,
			Rc::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.deliver();
				}
			}),
		);
	}

	/// Number of writes so far
	pub fn version(&self) -> u64 {
		*self.inner.version.borrow()
	}

	/// Get the NodeId of this cell
	pub fn id(&self) -> NodeId {
		self.inner.id
	}

	/// Number of registered observers
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.len()
	}

	/// Derived read-only view of this cell
	pub fn view(&self) -> View<T> {
		View::map(self, T::clone)
	}

	/// Field lens over this cell
	///
	/// # Example
	///
	/// ```ignore
	/// let user = Cell::new(User::default());
	/// let firstname = user.lens(
	///     |u: &User| u.firstname.clone(),
	///     |u: &User, v: String| User { firstname: v, ..u.clone() },
	/// );
	/// firstname.set("Ann".to_string())?;
	/// ```
	pub fn lens<I, G, S>(&self, get: G, set: S) -> Lens<T, I>
	where
		I: Clone + 'static,
		G: Fn(&T) -> I + 'static,
		S: Fn(&T, I) -> T + 'static,
	{
		Lens::new(self, get, set)
	}
}

impl<T: 'static> Clone for Cell<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Clone + 'static> Observable for Cell<T> {
	type Value = T;

	fn node_id(&self) -> NodeId {
		self.inner.id
	}

	fn try_get(&self) -> Option<T> {
		Cell::try_get(self)
	}

	fn version(&self) -> u64 {
		Cell::version(self)
	}

	fn subscribe_boxed(&self, observer: Box<dyn Fn(&T)>) -> Subscription {
		self.inner.subscribers.add(observer)
	}

	fn is_ready(&self) -> bool {
		self.is_set()
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Cell<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cell")
			.field("id", &self.inner.id)
			.field("version", &self.version())
			.field("value", &self.try_get())
			.finish()
	}
}
