//! Submitter - Manually Gated Relay
//!
//! A [`Submitter<T>`] follows a source observable into an internal buffer and
//! republishes the buffered value only when [`Submitter::trigger`] is called.
//! This separates "data has arrived" from "the page should re-render now": a
//! page can write its model, reset a status message and then trigger once,
//! producing a single visible transition.
//!
//! ## Example
//!
//! ```ignore
//! use formcell_reactive::{Cell, Submitter, Observable};
//!
//! let model: Cell<User> = Cell::unset();
//! let submitter = Submitter::new(&model);
//!
//! model.set(user);
//! assert!(submitter.view().try_get().is_none()); // not published yet
//!
//! submitter.trigger();
//! assert!(submitter.view().try_get().is_some());
//! ```
//!
//! The buffer follows the source's notifications, so a source written inside
//! an open [`batch`](crate::batch) is buffered when that batch closes.

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::cell::Cell;
use crate::observable::{Observable, Subscription};
use crate::runtime::NodeId;
use crate::view::View;

struct SubmitterInner<T: 'static> {
	/// Latest value seen from the source
	buffered: RefCell<Option<T>>,
	/// Value exposed to observers; only written by `trigger`
	published: Cell<T>,
	/// Read-only handle over `published`
	view: View<T>,
	/// Keeps the source observer registered
	_source: RefCell<Option<Subscription>>,
}

/// A gate that republishes its source's latest value on demand
///
/// Cloning a `Submitter` creates a new handle to the same gate.
pub struct Submitter<T: 'static> {
	inner: Rc<SubmitterInner<T>>,
}

impl<T: Clone + 'static> Submitter<T> {
	/// Create a submitter following `source`
	///
	/// The buffer starts with the source's current value, if any; nothing is
	/// published until the first `trigger()`.
	pub fn new<S>(source: &S) -> Self
	where
		S: Observable<Value = T>,
	{
		let published = Cell::unset();
		let inner = Rc::new(SubmitterInner {
			buffered: RefCell::new(source.try_get()),
			view: published.view(),
			published,
			_source: RefCell::new(None),
		});

		let weak = Rc::downgrade(&inner);
		let sub = source.subscribe_boxed(Box::new(move |value: &T| {
			if let Some(inner) = weak.upgrade() {
				*inner.buffered.borrow_mut() = Some(value.clone());
			}
		}));
		*inner._source.borrow_mut() = Some(sub);

		Self { inner }
	}

	/// Publish the buffered value
	///
	/// Observers of the published output are notified exactly once. Returns
	/// `false` (and publishes nothing) when the source has never held a value.
	pub fn trigger(&self) -> bool {
		let buffered = self.inner.buffered.borrow().clone();
		match buffered {
			Some(value) => {
				self.inner.published.set(value);
				tracing::trace!(node = %self.inner.published.id(), "submitter triggered");
				true
			}
			None => {
				tracing::trace!(node = %self.inner.published.id(), "trigger ignored, nothing buffered");
				false
			}
		}
	}

	/// Read-only view of the published output
	pub fn view(&self) -> View<T> {
		self.inner.view.clone()
	}

	/// Whether anything has been published yet
	pub fn is_published(&self) -> bool {
		self.inner.published.is_set()
	}

	/// Latest source value, published or not
	pub fn buffered(&self) -> Option<T> {
		self.inner.buffered.borrow().clone()
	}

	/// Number of triggers that published a value
	pub fn trigger_count(&self) -> u64 {
		self.inner.published.version()
	}
}

impl<T: 'static> Clone for Submitter<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Clone + 'static> Observable for Submitter<T> {
	type Value = T;

	fn node_id(&self) -> NodeId {
		self.inner.published.id()
	}

	fn try_get(&self) -> Option<T> {
		self.inner.published.try_get()
	}

	fn version(&self) -> u64 {
		self.inner.published.version()
	}

	fn subscribe_boxed(&self, observer: Box<dyn Fn(&T)>) -> Subscription {
		self.inner.published.subscribe_boxed(observer)
	}

	fn is_ready(&self) -> bool {
		self.is_published()
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Submitter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Submitter")
			.field("buffered", &*self.inner.buffered.borrow())
			.field("published", &self.inner.published.try_get())
			.finish()
	}
}
