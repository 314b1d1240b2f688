//! Remote Model Services
//!
//! The asynchronous calls a page makes. Implementations wrap whatever RPC
//! transport the application uses; pages only see the outcome.
//!
//! Futures are `?Send`: pages run on a single cooperative thread and their
//! state is `Rc`-based.

use async_trait::async_trait;

use crate::error::RequestOutcome;

/// Fetch-by-identifier and validate-then-persist calls for one model type
#[async_trait(?Send)]
pub trait ModelService {
	/// The model exchanged with the server
	type Model: Clone + 'static;

	/// Fetch the model with identifier `id`
	///
	/// Fails with [`RequestError::NotFound`](crate::RequestError::NotFound)
	/// when no entity matches.
	async fn load_model(&self, id: i64) -> RequestOutcome<Self::Model>;

	/// Validate and persist `model`
	///
	/// Returns the canonical model as stored, which may differ from the input
	/// (for example an updated timestamp).
	async fn save_model(&self, model: Self::Model) -> RequestOutcome<Self::Model>;
}

/// Listing call for a model type
#[async_trait(?Send)]
pub trait ListService {
	/// The row type of the listing
	type Item: Clone + 'static;

	/// Fetch every row
	async fn list_models(&self) -> RequestOutcome<Vec<Self::Item>>;
}
