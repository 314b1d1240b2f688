//! Observable - Publish/Subscribe Interface
//!
//! Every reactive node ([`Cell`](crate::Cell), [`View`](crate::View),
//! [`Lens`](crate::Lens), [`Submitter`](crate::Submitter)) implements
//! [`Observable`], so derived views and submitters can be built over any of them.

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::ReactiveError;
use crate::runtime::NodeId;

/// A readable, subscribable reactive value
pub trait Observable {
	/// The value type carried by this node
	type Value: Clone + 'static;

	/// Identifier of the node whose writes drive this observable
	fn node_id(&self) -> NodeId;

	/// Current value, or `None` while the node is still unset
	///
	/// Never fails; use it for readiness checks.
	fn try_get(&self) -> Option<Self::Value>;

	/// Monotonic change counter of the underlying node
	fn version(&self) -> u64;

	/// Depth in the dependency graph: 0 for nodes written directly, one above
	/// the highest source for derived nodes
	///
	/// The runtime delivers lower heights first.
	fn height(&self) -> usize {
		0
	}

	/// Register a boxed observer
	fn subscribe_boxed(&self, observer: Box<dyn Fn(&Self::Value)>) -> Subscription;

	/// Current value, failing with [`ReactiveError::NotReady`] while unset
	fn get(&self) -> Result<Self::Value, ReactiveError> {
		self.try_get().ok_or(ReactiveError::NotReady {
			node: self.node_id(),
		})
	}

	/// Whether the node currently holds a value
	fn is_ready(&self) -> bool {
		self.try_get().is_some()
	}

	/// Register an observer called once per settled change
	///
	/// The observer stays registered until the returned [`Subscription`] is dropped.
	fn subscribe<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&Self::Value) + 'static,
		Self: Sized,
	{
		self.subscribe_boxed(Box::new(observer))
	}
}

/// Handle to a registered observer
///
/// Dropping the handle unsubscribes the observer. Use [`Subscription::detach`]
/// to keep the observer registered for the lifetime of the source.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub(crate) fn new<F>(cancel: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Remove the observer now
	pub fn unsubscribe(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}

	/// Keep the observer registered until the source is dropped
	pub fn detach(mut self) {
		self.cancel = None;
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

type ObserverFn<T> = Rc<dyn Fn(&T)>;

/// Observer registry shared by a node and the subscriptions it hands out
pub(crate) struct Subscribers<T> {
	next_key: RefCell<u64>,
	entries: RefCell<BTreeMap<u64, ObserverFn<T>>>,
}

impl<T: 'static> Subscribers<T> {
	pub(crate) fn new() -> Rc<Self> {
		Rc::new(Self {
			next_key: RefCell::new(0),
			entries: RefCell::new(BTreeMap::new()),
		})
	}

	pub(crate) fn add(self: &Rc<Self>, observer: Box<dyn Fn(&T)>) -> Subscription {
		let key = {
			let mut next = self.next_key.borrow_mut();
			*next += 1;
			*next
		};
		self.entries.borrow_mut().insert(key, Rc::from(observer));

		let weak = Rc::downgrade(self);
		Subscription::new(move || {
			if let Some(subscribers) = weak.upgrade() {
				subscribers.entries.borrow_mut().remove(&key);
			}
		})
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Call every observer registered at the start of delivery
	///
	/// Observers may subscribe, unsubscribe or write other nodes while running.
	pub(crate) fn deliver(&self, value: &T) {
		let observers: Vec<ObserverFn<T>> = self.entries.borrow().values().cloned().collect();
		for observer in observers {
			observer(value);
		}
	}
}
