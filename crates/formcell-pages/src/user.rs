//! User Model and In-Memory Service
//!
//! The cookbook's example entity and a [`ModelService`] / [`ListService`]
//! implementation that keeps users in memory. It applies the same validation
//! and messages the remote endpoints do, which makes it the reference
//! backend for tests and demos.

use core::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formcell_reactive::{Cell, Lens};
use serde::{Deserialize, Serialize};

use crate::error::{RequestError, RequestOutcome};
use crate::service::{ListService, ModelService};

/// Message returned when no user matches the requested code
pub const USER_NOT_FOUND: &str = "User not found!";
/// Message returned when the first name is blank
pub const FIRSTNAME_EMPTY: &str = "Fistname is empty.";
/// Message returned when the last name is blank
pub const LASTNAME_EMPTY: &str = "Lastname is empty.";

/// A user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
	/// Identifier
	pub code: i64,
	/// First name
	pub firstname: String,
	/// Last name
	pub lastname: String,
	/// Time of the last successful save
	pub update_date: DateTime<Utc>,
}

impl User {
	/// Create a user
	pub fn new(
		code: i64,
		firstname: impl Into<String>,
		lastname: impl Into<String>,
		update_date: DateTime<Utc>,
	) -> Self {
		Self {
			code,
			firstname: firstname.into(),
			lastname: lastname.into(),
			update_date,
		}
	}

	/// Check the fields a save requires
	pub fn validate(&self) -> Result<(), RequestError> {
		if self.firstname.trim().is_empty() {
			return Err(RequestError::validation(FIRSTNAME_EMPTY));
		}
		if self.lastname.trim().is_empty() {
			return Err(RequestError::validation(LASTNAME_EMPTY));
		}
		Ok(())
	}

	/// Lens over the first name
	pub fn firstname_lens(cell: &Cell<User>) -> Lens<User, String> {
		cell.lens(
			|u: &User| u.firstname.clone(),
			|u: &User, firstname: String| User {
				firstname,
				..u.clone()
			},
		)
	}

	/// Lens over the last name
	pub fn lastname_lens(cell: &Cell<User>) -> Lens<User, String> {
		cell.lens(
			|u: &User| u.lastname.clone(),
			|u: &User, lastname: String| User {
				lastname,
				..u.clone()
			},
		)
	}
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Users kept in memory, keyed by code
pub struct InMemoryUserService {
	users: RefCell<BTreeMap<i64, User>>,
	clock: Clock,
}

impl InMemoryUserService {
	/// Create an empty service stamping saves with the system clock
	pub fn new() -> Self {
		Self {
			users: RefCell::new(BTreeMap::new()),
			clock: Box::new(Utc::now),
		}
	}

	/// Seed the store
	pub fn with_users(self, users: impl IntoIterator<Item = User>) -> Self {
		self.users
			.borrow_mut()
			.extend(users.into_iter().map(|user| (user.code, user)));
		self
	}

	/// Replace the clock used to stamp `update_date`
	pub fn with_clock<F>(mut self, clock: F) -> Self
	where
		F: Fn() -> DateTime<Utc> + 'static,
	{
		self.clock = Box::new(clock);
		self
	}

	/// Stored copy of a user
	pub fn stored(&self, code: i64) -> Option<User> {
		self.users.borrow().get(&code).cloned()
	}
}

impl Default for InMemoryUserService {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait(?Send)]
impl ModelService for InMemoryUserService {
	type Model = User;

	async fn load_model(&self, id: i64) -> RequestOutcome<User> {
		self.stored(id)
			.ok_or_else(|| RequestError::not_found(USER_NOT_FOUND))
	}

	async fn save_model(&self, model: User) -> RequestOutcome<User> {
		model.validate()?;

		let mut users = self.users.borrow_mut();
		let stored = users
			.get_mut(&model.code)
			.ok_or_else(|| RequestError::not_found(USER_NOT_FOUND))?;
		*stored = User {
			update_date: (self.clock)(),
			..model
		};
		tracing::debug!(code = stored.code, "user saved");
		Ok(stored.clone())
	}
}

#[async_trait(?Send)]
impl ListService for InMemoryUserService {
	type Item = User;

	async fn list_models(&self) -> RequestOutcome<Vec<User>> {
		Ok(self.users.borrow().values().cloned().collect())
	}
}
