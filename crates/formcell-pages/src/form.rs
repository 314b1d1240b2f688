//! Form Page
//!
//! A [`FormPage`] loads one model on mount, binds inputs to its fields
//! through lenses and saves it back through a [`ModelService`].
//!
//! ## State
//!
//! Two copies of the model are kept apart on purpose:
//!
//! - the **draft** ([`FormPage::model`]): what the inputs show. Lens writes
//!   land here immediately, before any server confirmation.
//! - the **confirmed** model ([`FormPage::confirmed`]): the last value the
//!   server returned, published through the submitter.
//!
//! A successful save replaces both with the server's reply. A failed save
//! leaves both untouched: the inputs keep the unsaved edits and the
//! confirmed model stays what the server last accepted.
//!
//! ## Example
//!
//! ```ignore
//! use formcell_pages::{FormPage, InMemoryUserService, PageSettings, User};
//!
//! let page = FormPage::new(Rc::new(service), PageSettings::default());
//! page.mount(42).await;
//!
//! User::firstname_lens(page.model()).set("Anna".to_string())?;
//! page.save().await?;
//! ```

extern crate alloc;
use alloc::rc::Rc;

use formcell_reactive::{Cell, Lens, Submitter, View};

use crate::error::{PageError, RequestOutcome};
use crate::orchestrator::{MountFlag, OnSuccess, Orchestrator, RequestPhase};
use crate::render::{Rendered, rendered_view};
use crate::service::ModelService;
use crate::settings::{DoubleSubmit, PageSettings};

/// Page editing a single model loaded by identifier
pub struct FormPage<S: ModelService> {
	service: Rc<S>,
	settings: PageSettings,
	orchestrator: Orchestrator<S::Model>,
	rendered: View<Rendered<S::Model>>,
}

impl<S: ModelService> FormPage<S> {
	/// Create an unmounted-model page over `service`
	pub fn new(service: Rc<S>, settings: PageSettings) -> Self {
		let orchestrator = Orchestrator::new(MountFlag::new());
		let rendered = rendered_view(orchestrator.submitter(), &orchestrator.status());
		Self {
			service,
			settings,
			orchestrator,
			rendered,
		}
	}

	/// Load the model with identifier `id`
	///
	/// On failure the status shows the message and the page keeps rendering
	/// its loading affordance.
	pub async fn mount(&self, id: i64) -> RequestOutcome<S::Model> {
		self.orchestrator.mount_flag().mount();
		tracing::debug!(id, "mounting form page");
		self.orchestrator
			.run(self.service.load_model(id), OnSuccess::ClearStatus)
			.await
	}

	/// Save the current draft
	///
	/// Fails with [`PageError::Reactive`] if nothing has loaded yet, and with
	/// [`PageError::SaveInFlight`] when a request is pending and the
	/// double-submit policy is [`DoubleSubmit::Reject`]. Otherwise returns the
	/// request's outcome, which has already been applied to the page.
	pub async fn save(&self) -> Result<RequestOutcome<S::Model>, PageError> {
		if self.settings.double_submit == DoubleSubmit::Reject && self.is_busy() {
			tracing::warn!("save rejected, previous request still pending");
			return Err(PageError::SaveInFlight);
		}

		let draft = self.orchestrator.model().get()?;
		let on_success = OnSuccess::Message(self.settings.saved_message.clone());
		Ok(self
			.orchestrator
			.run(self.service.save_model(draft), on_success)
			.await)
	}

	/// Stop applying outcomes of requests still in flight
	pub fn unmount(&self) {
		tracing::debug!("unmounting form page");
		self.orchestrator.mount_flag().unmount();
	}

	/// Whether the page is mounted
	pub fn is_mounted(&self) -> bool {
		self.orchestrator.mount_flag().is_mounted()
	}

	/// Lens binding one input to a field of the draft
	pub fn field<I, G, T>(&self, get: G, set: T) -> Lens<S::Model, I>
	where
		I: Clone + 'static,
		G: Fn(&S::Model) -> I + 'static,
		T: Fn(&S::Model, I) -> S::Model + 'static,
	{
		self.orchestrator.model().lens(get, set)
	}

	/// The draft edited by the inputs
	pub fn model(&self) -> &Cell<S::Model> {
		self.orchestrator.model()
	}

	/// Last model confirmed by the server
	pub fn confirmed(&self) -> View<S::Model> {
		self.orchestrator.submitter().view()
	}

	/// The submitter gating renders
	pub fn submitter(&self) -> &Submitter<S::Model> {
		self.orchestrator.submitter()
	}

	/// Current status message
	pub fn status(&self) -> View<Option<String>> {
		self.orchestrator.status()
	}

	/// Phase of the most recent load or save
	pub fn phase(&self) -> View<RequestPhase> {
		self.orchestrator.phase_view()
	}

	/// Whether a load or save is pending; disable the save action while true
	pub fn is_busy(&self) -> bool {
		self.orchestrator.phase().is_pending()
	}

	/// What to render
	pub fn rendered(&self) -> View<Rendered<S::Model>> {
		self.rendered.clone()
	}

	/// Settings in effect
	pub fn settings(&self) -> &PageSettings {
		&self.settings
	}
}
