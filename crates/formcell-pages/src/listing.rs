//! Listing Page
//!
//! Loads every row through a [`ListService`] and renders them once the first
//! load succeeds. Reloading keeps the previous rows visible until the new
//! ones arrive.

extern crate alloc;
use alloc::rc::Rc;

use formcell_reactive::View;

use crate::error::RequestOutcome;
use crate::orchestrator::{MountFlag, OnSuccess, Orchestrator, RequestPhase};
use crate::render::{Rendered, rendered_view};
use crate::service::ListService;

/// Page showing every row of a listing
pub struct ListPage<S: ListService> {
	service: Rc<S>,
	orchestrator: Orchestrator<Vec<S::Item>>,
	rendered: View<Rendered<Vec<S::Item>>>,
}

impl<S: ListService> ListPage<S> {
	/// Create a listing page over `service`
	pub fn new(service: Rc<S>) -> Self {
		let orchestrator = Orchestrator::new(MountFlag::new());
		let rendered = rendered_view(orchestrator.submitter(), &orchestrator.status());
		Self {
			service,
			orchestrator,
			rendered,
		}
	}

	/// Load the rows
	pub async fn mount(&self) -> RequestOutcome<Vec<S::Item>> {
		self.orchestrator.mount_flag().mount();
		self.refresh().await
	}

	/// Reload the rows
	pub async fn refresh(&self) -> RequestOutcome<Vec<S::Item>> {
		let outcome = self
			.orchestrator
			.run(self.service.list_models(), OnSuccess::ClearStatus)
			.await;
		if let Ok(rows) = &outcome {
			tracing::debug!(rows = rows.len(), "listing loaded");
		}
		outcome
	}

	/// Stop applying outcomes of requests still in flight
	pub fn unmount(&self) {
		self.orchestrator.mount_flag().unmount();
	}

	/// Published rows, `None` until the first successful load
	pub fn rows(&self) -> Option<Vec<S::Item>> {
		self.orchestrator.submitter().view().try_get()
	}

	/// Current status message
	pub fn status(&self) -> View<Option<String>> {
		self.orchestrator.status()
	}

	/// Phase of the most recent load
	pub fn phase(&self) -> View<RequestPhase> {
		self.orchestrator.phase_view()
	}

	/// What to render
	pub fn rendered(&self) -> View<Rendered<Vec<S::Item>>> {
		self.rendered.clone()
	}
}
