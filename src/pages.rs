//! Form and listing pages
//!
//! This module provides access to formcell-pages, which binds reactive cells
//! to asynchronous model services.
//!
//! ## Architecture
//!
//! - **Services**: `ModelService` / `ListService` perform the remote calls
//! - **Orchestrator**: applies each outcome to model, status and submitter
//! - **Pages**: `FormPage` and `ListPage` compose the above per screen
//! - **Navigation**: `AppState` redirects private endpoints to login
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use formcell::pages::{FormPage, InMemoryUserService, PageSettings, User};
//!
//! let page = FormPage::new(Rc::new(InMemoryUserService::new()), PageSettings::default());
//! page.mount(42).await?;
//! User::firstname_lens(page.model()).set("Anna".to_string())?;
//! page.save().await??;
//! ```

// Re-export all formcell-pages functionality
pub use formcell_pages::*;
