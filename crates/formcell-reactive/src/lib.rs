//! Formcell Reactive - Observer-based State for Form Pages
//!
//! Fine-grained reactive primitives used by formcell pages:
//!
//! - [`Cell`]: observable mutable value, optionally starting unset
//! - [`View`]: memoized projection over one or two observables
//! - [`Lens`]: two-way accessor exposing a field of a Cell as its own value
//! - [`Submitter`]: gate that republishes its source only on `trigger()`
//! - [`batch`]: defer notifications so observers see one coalesced change
//!
//! ## Execution Model
//!
//! Single-threaded and cooperative. State is `Rc`-shared and the notification
//! queue is thread-local; writes, view recomputation and triggers are
//! synchronous. Every notification caused by a write is delivered before the
//! write returns (or before the enclosing `batch` returns).
//!
//! ## Example
//!
//! ```ignore
//! use formcell_reactive::{Cell, Observable, Submitter, View};
//!
//! let model: Cell<User> = Cell::unset();
//! let submitter = Submitter::new(&model);
//! let title = View::map(&submitter, |u: &User| format!("Editing {}", u.firstname));
//!
//! model.set(user);
//! submitter.trigger();
//! assert_eq!(title.get()?, "Editing Ann");
//! ```

#![warn(missing_docs)]

pub mod cell;
pub mod error;
pub mod lens;
pub mod observable;
pub mod runtime;
pub mod submitter;
pub mod view;

pub use cell::Cell;
pub use error::ReactiveError;
pub use lens::Lens;
pub use observable::{Observable, Subscription};
pub use runtime::{NodeId, Runtime, batch, with_runtime};
pub use submitter::Submitter;
pub use view::View;
