//! Request and Page Error Types
//!
//! [`RequestError`] is what a remote call can fail with. It is expected and
//! recoverable: the orchestrator turns it into a status message. [`PageError`]
//! covers failures of the page operations themselves and is propagated with `?`.

use formcell_reactive::ReactiveError;
use serde::{Deserialize, Serialize};

/// Outcome of a single remote call
pub type RequestOutcome<T> = Result<T, RequestError>;

/// Unified error type for remote model calls
///
/// `Display` yields the human-readable message only, so it can be shown to
/// the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RequestError {
	/// Input rejected by server-side validation
	#[error("{0}")]
	Validation(String),

	/// No entity matches the requested identifier
	#[error("{0}")]
	NotFound(String),

	/// The call did not reach the server or its reply was unusable
	#[error("{0}")]
	Transport(String),
}

impl RequestError {
	/// Create a validation error
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}

	/// Create a not-found error
	pub fn not_found(msg: impl Into<String>) -> Self {
		Self::NotFound(msg.into())
	}

	/// Create a transport error
	pub fn transport(msg: impl Into<String>) -> Self {
		Self::Transport(msg.into())
	}

	/// The user-facing message
	pub fn message(&self) -> &str {
		match self {
			Self::Validation(msg) | Self::NotFound(msg) | Self::Transport(msg) => msg,
		}
	}
}

/// Errors raised by page operations
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
	/// The page model was used before it loaded
	#[error(transparent)]
	Reactive(#[from] ReactiveError),

	/// A save was requested while the previous one is still pending
	#[error("a save request is already in flight")]
	SaveInFlight,
}
