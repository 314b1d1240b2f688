//! Application State and Navigation
//!
//! The current endpoint and signed-in user live in an [`AppState`] that is
//! passed to each page, rather than in ambient globals. Navigation is a
//! state transition: [`AppState::navigate`] decides the actual destination
//! (redirecting private endpoints to the login page when nobody is signed
//! in) and writes it in one step.
//!
//! ```text
//! navigate(Form(42)) ── signed out ──▶ Login     (remembers Form(42))
//! sign_in("ann")     ───────────────▶ Form(42)
//! sign_out()         ───────────────▶ Home
//! ```

use core::cell::RefCell;
use core::fmt;

use formcell_reactive::{Cell, View, batch};
use serde::{Deserialize, Serialize};

use crate::settings::PageSettings;

/// A page of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
	/// Landing page
	Home,
	/// Sign-in page
	Login,
	/// Listing of all users
	Listing,
	/// Edit form for the user with this code
	Form(i64),
}

impl Endpoint {
	/// Whether the endpoint requires a signed-in user
	pub fn is_private(&self) -> bool {
		matches!(self, Self::Listing | Self::Form(_))
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Home => write!(f, "/"),
			Self::Login => write!(f, "/login"),
			Self::Listing => write!(f, "/users"),
			Self::Form(code) => write!(f, "/users/{}", code),
		}
	}
}

/// Application-wide state shared by every page
pub struct AppState {
	endpoint: Cell<Endpoint>,
	user: Cell<Option<String>>,
	/// Private endpoint requested while signed out
	resume: RefCell<Option<Endpoint>>,
	require_login: bool,
}

impl AppState {
	/// Start at [`Endpoint::Home`], signed out
	pub fn new(settings: &PageSettings) -> Self {
		Self {
			endpoint: Cell::new(Endpoint::Home),
			user: Cell::new(None),
			resume: RefCell::new(None),
			require_login: settings.require_login,
		}
	}

	/// Move to `to`, returning where the application actually went
	pub fn navigate(&self, to: Endpoint) -> Endpoint {
		let destination = if self.require_login && to.is_private() && !self.is_signed_in() {
			tracing::debug!(requested = %to, "redirecting to login");
			*self.resume.borrow_mut() = Some(to);
			Endpoint::Login
		} else {
			to
		};

		self.endpoint.set(destination.clone());
		destination
	}

	/// Sign `username` in and resume the endpoint that required it
	pub fn sign_in(&self, username: impl Into<String>) -> Endpoint {
		let username = username.into();
		tracing::debug!(%username, "signed in");
		let next = self.resume.borrow_mut().take().unwrap_or(Endpoint::Home);
		batch(|| {
			self.user.set(Some(username));
			self.navigate(next)
		})
	}

	/// Sign out and return to [`Endpoint::Home`]
	pub fn sign_out(&self) {
		self.resume.borrow_mut().take();
		batch(|| {
			self.user.set(None);
			self.endpoint.set(Endpoint::Home);
		});
	}

	/// Whether a user is signed in
	pub fn is_signed_in(&self) -> bool {
		matches!(self.user.try_get(), Some(Some(_)))
	}

	/// Current endpoint
	pub fn current(&self) -> Endpoint {
		self.endpoint.try_get().unwrap_or(Endpoint::Home)
	}

	/// Observable current endpoint
	pub fn endpoint(&self) -> View<Endpoint> {
		self.endpoint.view()
	}

	/// Observable signed-in user
	pub fn user(&self) -> View<Option<String>> {
		self.user.view()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formcell_reactive::Observable;
	use rstest::rstest;
	use std::rc::Rc;

	fn state() -> AppState {
		AppState::new(&PageSettings::default())
	}

	#[rstest]
	#[case(Endpoint::Home, "/")]
	#[case(Endpoint::Login, "/login")]
	#[case(Endpoint::Listing, "/users")]
	#[case(Endpoint::Form(42), "/users/42")]
	fn test_endpoint_display(#[case] endpoint: Endpoint, #[case] path: &str) {
		assert_eq!(endpoint.to_string(), path);
	}

	#[rstest]
	fn test_public_navigation() {
		let app = state();
		assert_eq!(app.navigate(Endpoint::Login), Endpoint::Login);
		assert_eq!(app.current(), Endpoint::Login);
	}

	#[rstest]
	fn test_private_endpoint_redirects_then_resumes() {
		let app = state();

		assert_eq!(app.navigate(Endpoint::Form(42)), Endpoint::Login);
		assert_eq!(app.current(), Endpoint::Login);

		assert_eq!(app.sign_in("ann"), Endpoint::Form(42));
		assert_eq!(app.current(), Endpoint::Form(42));
		assert!(app.is_signed_in());
	}

	#[rstest]
	fn test_sign_in_without_pending_goes_home() {
		let app = state();
		assert_eq!(app.sign_in("ann"), Endpoint::Home);
	}

	#[rstest]
	fn test_sign_out_returns_home() {
		let app = state();
		app.sign_in("ann");
		app.navigate(Endpoint::Listing);

		app.sign_out();

		assert_eq!(app.current(), Endpoint::Home);
		assert_eq!(app.user().get(), Ok(None));
		assert_eq!(app.navigate(Endpoint::Listing), Endpoint::Login);
	}

	#[rstest]
	fn test_login_not_required() {
		let app = AppState::new(&PageSettings::default().with_require_login(false));
		assert_eq!(app.navigate(Endpoint::Listing), Endpoint::Listing);
	}

	#[rstest]
	fn test_sign_in_is_one_transition() {
		let app = state();
		app.navigate(Endpoint::Form(7));

		let header = View::combine(&app.endpoint(), &app.user(), |e, u| (e.clone(), u.clone()));
		let frames = Rc::new(RefCell::new(Vec::new()));
		let frames_clone = frames.clone();
		let _sub = header.subscribe(move |frame| frames_clone.borrow_mut().push(frame.clone()));

		app.sign_in("ann");

		assert_eq!(
			*frames.borrow(),
			vec![(Endpoint::Form(7), Some("ann".to_string()))]
		);
	}
}
