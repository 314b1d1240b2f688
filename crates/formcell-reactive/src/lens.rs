//! Lens - Two-Way Field Binding
//!
//! A [`Lens<O, I>`] exposes one part `I` of a [`Cell<O>`] as if it were its own
//! reactive value. Reading applies the getter to the cell's value; writing
//! reads the cell's *latest* value, applies the setter and writes the result
//! back, so lenses on disjoint fields of the same cell never clobber each other.
//!
//! Lenses own no storage. Both laws are expected of the getter/setter pair:
//!
//! - `set(o, get(o)) == o`
//! - `get(set(o, v)) == v`
//!
//! ## Example
//!
//! ```ignore
//! use formcell_reactive::Cell;
//!
//! let user = Cell::new(User { firstname: "Ann".into(), lastname: "Lee".into() });
//!
//! let firstname = user.lens(
//!     |u: &User| u.firstname.clone(),
//!     |u: &User, v: String| User { firstname: v, ..u.clone() },
//! );
//!
//! firstname.set("Anna".to_string())?;
//! assert_eq!(user.get()?.firstname, "Anna");
//! ```

use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::cell::Cell;
use crate::error::ReactiveError;
use crate::observable::{Observable, Subscription};
use crate::runtime::NodeId;
use crate::view::View;

type Getter<O, I> = Rc<dyn Fn(&O) -> I>;
type Setter<O, I> = Rc<dyn Fn(&O, I) -> O>;

/// Bidirectional accessor for a sub-part of a Cell's value
pub struct Lens<O: 'static, I: 'static> {
	cell: Cell<O>,
	getter: Getter<O, I>,
	setter: Setter<O, I>,
}

impl<O, I> Lens<O, I>
where
	O: Clone + 'static,
	I: Clone + 'static,
{
	/// Create a lens over `cell`
	pub fn new<G, S>(cell: &Cell<O>, get: G, set: S) -> Self
	where
		G: Fn(&O) -> I + 'static,
		S: Fn(&O, I) -> O + 'static,
	{
		Self {
			cell: cell.clone(),
			getter: Rc::new(get),
			setter: Rc::new(set),
		}
	}

	/// Read the focused part, failing while the cell is unset
	pub fn get(&self) -> Result<I, ReactiveError> {
		self.cell.with(|outer| (self.getter)(outer))
	}

	/// Read the focused part if the cell is set
	pub fn try_get(&self) -> Option<I> {
		self.get().ok()
	}

	/// Write the focused part
	///
	/// Reads the cell's current value, applies the setter and writes the
	/// result back. Fails with [`ReactiveError::NotReady`] if the cell is unset.
	pub fn set(&self, value: I) -> Result<(), ReactiveError> {
		let updated = self.cell.with(|outer| (self.setter)(outer, value))?;
		self.cell.set(updated);
		Ok(())
	}

	/// Modify the focused part in place
	pub fn update<F>(&self, f: F) -> Result<(), ReactiveError>
	where
		F: FnOnce(&mut I),
	{
		let mut inner = self.get()?;
		f(&mut inner);
		self.set(inner)
	}

	/// Focus further into the part this lens exposes
	///
	/// # Example
	///
	/// ```ignore
	/// let address = user.lens(|u: &User| u.address.clone(), |u, a| User { address: a, ..u.clone() });
	/// let city = address.zoom(|a: &Address| a.city.clone(), |a, c| Address { city: c, ..a.clone() });
	/// ```
	pub fn zoom<J, G, S>(&self, get: G, set: S) -> Lens<O, J>
	where
		J: Clone + 'static,
		G: Fn(&I) -> J + 'static,
		S: Fn(&I, J) -> I + 'static,
	{
		let outer_get = self.getter.clone();
		let outer_get_for_set = self.getter.clone();
		let outer_set = self.setter.clone();

		let composed_get = move |outer: &O| get(&outer_get(outer));
		let composed_set = move |outer: &O, value: J| {
			let inner = outer_get_for_set(outer);
			outer_set(outer, set(&inner, value))
		};

		Lens::new(&self.cell, composed_get, composed_set)
	}

	/// Memoized read-only view of the focused part
	pub fn view(&self) -> View<I> {
		View::map(self, I::clone)
	}

	/// The cell this lens writes through
	pub fn cell(&self) -> &Cell<O> {
		&self.cell
	}
}

impl<O: 'static, I: 'static> Clone for Lens<O, I> {
	fn clone(&self) -> Self {
		Self {
			cell: self.cell.clone(),
			getter: self.getter.clone(),
			setter: self.setter.clone(),
		}
	}
}

impl<O, I> Observable for Lens<O, I>
where
	O: Clone + 'static,
	I: Clone + 'static,
{
	type Value = I;

	fn node_id(&self) -> NodeId {
		self.cell.id()
	}

	fn try_get(&self) -> Option<I> {
		Lens::try_get(self)
	}

	fn version(&self) -> u64 {
		self.cell.version()
	}

	fn subscribe_boxed(&self, observer: Box<dyn Fn(&I)>) -> Subscription {
		let getter = self.getter.clone();
		self.cell.subscribe(move |outer: &O| observer(&getter(outer)))
	}

	fn is_ready(&self) -> bool {
		self.cell.is_set()
	}
}

impl<O, I> fmt::Debug for Lens<O, I>
where
	O: Clone + 'static,
	I: fmt::Debug + Clone + 'static,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Lens")
			.field("cell", &self.cell.id())
			.field("value", &self.try_get())
			.finish()
	}
}
