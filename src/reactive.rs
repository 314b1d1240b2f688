//! Reactive primitives for page state
//!
//! This module provides access to formcell-reactive: observable cells,
//! memoized views, field lenses and trigger-gated submitters.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formcell::reactive::{Cell, Observable, Submitter, View};
//!
//! let draft = Cell::new(String::from("Ann"));
//! let submitter = Submitter::new(&draft);
//! let greeting = View::map(&submitter, |name: &String| format!("Hello, {name}"));
//!
//! draft.set(String::from("Anna"));
//! assert!(greeting.try_get().is_none());
//!
//! submitter.trigger();
//! assert_eq!(greeting.get()?, "Hello, Anna");
//! ```

// Re-export all formcell-reactive functionality
pub use formcell_reactive::*;
