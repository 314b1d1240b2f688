//! # Formcell
//!
//! Reactive state for form-driven pages backed by asynchronous model services.
//!
//! A page loads a model, lets inputs edit it through field lenses, and saves
//! it back. Formcell keeps the pieces of that loop consistent: the draft the
//! inputs show, the last model the server confirmed, the status message, and
//! a single renderable view over all of them.
//!
//! ## Core Principles
//!
//! - **Glitch-free propagation**: observers see one coalesced change per write or batch
//! - **Explicit publication**: rendering only moves when a submitter is triggered
//! - **Outcome routing**: every remote call ends in exactly one success or failure
//! - **Single-threaded**: `Rc`-based state on a cooperative, thread-local runtime
//!
//! ## Feature Flags
//!
//! - `reactive` - Reactive primitives only (`Cell`, `View`, `Lens`, `Submitter`)
//! - `pages` - Form and listing pages, services, settings and navigation
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use formcell::prelude::*;
//! use std::rc::Rc;
//!
//! let service = Rc::new(InMemoryUserService::new().with_users([user]));
//! let page = FormPage::new(service, PageSettings::default());
//!
//! page.mount(42).await?;
//! User::firstname_lens(page.model()).set("Anna".to_string())?;
//!
//! match page.save().await? {
//!     Ok(saved) => println!("saved at {}", saved.update_date),
//!     Err(error) => println!("not saved: {error}"),
//! }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "reactive")]
pub mod reactive;

// Re-export reactive primitives
#[cfg(feature = "reactive")]
pub use formcell_reactive::{
	Cell, Lens, Observable, ReactiveError, Submitter, Subscription, View, batch,
};

// Re-export pages
#[cfg(feature = "pages")]
pub use formcell_pages::{
	AppState, Body, DoubleSubmit, Endpoint, FormPage, InMemoryUserService, ListPage,
	ListService, ModelService, PageError, PageSettings, Rendered, RequestError, RequestOutcome,
	RequestPhase, User,
};

/// Commonly used items
///
/// ```rust,ignore
/// use formcell::prelude::*;
/// ```
pub mod prelude {
	// Reactive primitives
	#[cfg(feature = "reactive")]
	pub use crate::{Cell, Lens, Observable, Submitter, View, batch};

	// Pages
	#[cfg(feature = "pages")]
	pub use crate::{
		AppState, Body, Endpoint, FormPage, ListPage, ListService, ModelService, PageError,
		PageSettings, RequestError, RequestOutcome, User,
	};

	// External
	#[cfg(feature = "pages")]
	pub use async_trait::async_trait;
}
