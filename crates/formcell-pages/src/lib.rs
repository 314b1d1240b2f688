//! Formcell Pages - Form and Listing Pages over Reactive Cells
//!
//! Page-level building blocks on top of `formcell-reactive`:
//!
//! - [`FormPage`]: load one model, edit it through lenses, save it back
//! - [`ListPage`]: load and render every row of a listing
//! - [`AppState`]: current endpoint and signed-in user, with login redirects
//! - [`Orchestrator`]: routes async request outcomes into page state
//! - [`PageSettings`]: behaviour knobs loaded from TOML
//!
//! Remote calls go through the [`ModelService`] and [`ListService`] traits;
//! [`InMemoryUserService`] is the in-process backend for the `User` model.
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use formcell_pages::{FormPage, InMemoryUserService, PageSettings, User};
//!
//! let service = Rc::new(InMemoryUserService::new().with_users([user]));
//! let page = FormPage::new(service, PageSettings::default());
//!
//! page.mount(42).await?;
//! User::firstname_lens(page.model()).set("Anna".to_string())?;
//! page.save().await??;
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod error;
pub mod form;
pub mod listing;
pub mod orchestrator;
pub mod render;
pub mod service;
pub mod settings;
pub mod user;

pub use app::{AppState, Endpoint};
pub use error::{PageError, RequestError, RequestOutcome};
pub use form::FormPage;
pub use listing::ListPage;
pub use orchestrator::{MountFlag, OnSuccess, Orchestrator, RequestPhase};
pub use render::{Body, Rendered, rendered_view};
pub use service::{ListService, ModelService};
pub use settings::{DoubleSubmit, PageSettings, SettingsError};
pub use user::{InMemoryUserService, User};
