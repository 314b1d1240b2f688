//! Async Request Orchestrator
//!
//! An [`Orchestrator`] runs one remote call at a time against a page's model
//! and routes the outcome into reactive state:
//!
//! ```text
//! Idle ──run()──▶ Pending ──Ok(v)──▶ Succeeded   model := v, status := success, trigger()
//!                        └─Err(e)──▶ Failed      status := Some(e)
//! ```
//!
//! - Every invocation produces exactly one outcome, returned to the caller.
//! - On failure the submitter is not triggered: a page that never loaded keeps
//!   showing its loading affordance, and a page that did keeps showing the last
//!   published model next to the message.
//! - If the page was unmounted (or unmounted and mounted again) while the call
//!   was pending, the outcome is returned but written nowhere. An unmounted
//!   page drops back to `Idle`.
//! - Overlapping invocations are not deduplicated; the later completion wins.

use core::cell::RefCell;
use core::future::Future;

extern crate alloc;
use alloc::rc::Rc;

use formcell_reactive::{Cell, Submitter, View, batch};

use crate::error::RequestOutcome;

/// Lifecycle of the most recent request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
	/// No request issued yet
	#[default]
	Idle,
	/// A request is awaiting its reply
	Pending,
	/// The last request succeeded
	Succeeded,
	/// The last request failed
	Failed,
}

impl RequestPhase {
	/// Whether a request is awaiting its reply
	pub fn is_pending(self) -> bool {
		matches!(self, Self::Pending)
	}
}

/// Status written on success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnSuccess {
	/// Clear any previous message
	ClearStatus,
	/// Show this message
	Message(String),
}

impl OnSuccess {
	fn status(self) -> Option<String> {
		match self {
			Self::ClearStatus => None,
			Self::Message(message) => Some(message),
		}
	}
}

#[derive(Debug)]
struct MountState {
	mounted: bool,
	/// Incremented by every `mount()`
	epoch: u64,
}

/// Shared mount state of a page
///
/// Every [`MountFlag::mount`] starts a new session. A request belongs to the
/// session it started in and its outcome is applied only while that session
/// is still the current, mounted one.
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone)]
pub struct MountFlag(Rc<RefCell<MountState>>);

impl MountFlag {
	/// Create a flag in the mounted state
	pub fn new() -> Self {
		Self(Rc::new(RefCell::new(MountState {
			mounted: true,
			epoch: 0,
		})))
	}

	/// Whether the page is mounted
	pub fn is_mounted(&self) -> bool {
		self.0.borrow().mounted
	}

	/// Current session number
	pub fn epoch(&self) -> u64 {
		self.0.borrow().epoch
	}

	/// Whether `epoch` is the current session and the page is mounted
	pub fn is_current(&self, epoch: u64) -> bool {
		let state = self.0.borrow();
		state.mounted && state.epoch == epoch
	}

	/// Mark the page as mounted, starting a new session
	///
	/// Outcomes of requests started in earlier sessions are discarded.
	pub fn mount(&self) {
		let mut state = self.0.borrow_mut();
		state.mounted = true;
		state.epoch += 1;
	}

	/// Mark the page as unmounted; pending outcomes will be discarded
	pub fn unmount(&self) {
		self.0.borrow_mut().mounted = false;
	}
}

impl Default for MountFlag {
	fn default() -> Self {
		Self::new()
	}
}

/// Routes remote call outcomes into a page's model, status and submitter
pub struct Orchestrator<M: 'static> {
	model: Cell<M>,
	status: Cell<Option<String>>,
	submitter: Submitter<M>,
	phase: Cell<RequestPhase>,
	mount: MountFlag,
}

impl<M: Clone + 'static> Orchestrator<M> {
	/// Create an orchestrator over an unset model cell
	pub fn new(mount: MountFlag) -> Self {
		Self::with_model(Cell::unset(), mount)
	}

	/// Create an orchestrator over an existing model cell
	pub fn with_model(model: Cell<M>, mount: MountFlag) -> Self {
		let submitter = Submitter::new(&model);
		Self {
			model,
			status: Cell::new(None),
			submitter,
			phase: Cell::new(RequestPhase::Idle),
			mount,
		}
	}

	/// Await `request` and apply its outcome
	///
	/// # Example
	///
	/// ```ignore
	/// let outcome = orchestrator
	///     .run(service.load_model(42), OnSuccess::ClearStatus)
	///     .await;
	/// ```
	pub async fn run<F>(&self, request: F, on_success: OnSuccess) -> RequestOutcome<M>
	where
		F: Future<Output = RequestOutcome<M>>,
	{
		let epoch = self.mount.epoch();
		self.phase.set(RequestPhase::Pending);
		tracing::debug!(epoch, "request pending");

		let outcome = request.await;

		if !self.mount.is_current(epoch) {
			tracing::warn!(
				epoch,
				ok = outcome.is_ok(),
				"page session ended, discarding request outcome"
			);
			// A remounted page owns the phase of its own requests
			if !self.mount.is_mounted() {
				self.phase.set(RequestPhase::Idle);
			}
			return outcome;
		}

		match &outcome {
			Ok(model) => {
				// Outside the batch so the submitter buffers it before trigger()
				self.model.set(model.clone());
				batch(|| {
					self.status.set(on_success.status());
					self.submitter.trigger();
					self.phase.set(RequestPhase::Succeeded);
				});
				tracing::debug!("request succeeded");
			}
			Err(error) => {
				batch(|| {
					self.status.set(Some(error.to_string()));
					self.phase.set(RequestPhase::Failed);
				});
				tracing::debug!(%error, "request failed");
			}
		}

		outcome
	}

	/// The model cell (the locally edited draft)
	pub fn model(&self) -> &Cell<M> {
		&self.model
	}

	/// Status message shown to the user, if any
	pub fn status(&self) -> View<Option<String>> {
		self.status.view()
	}

	/// The gate between the model and the rendering boundary
	pub fn submitter(&self) -> &Submitter<M> {
		&self.submitter
	}

	/// Phase of the most recent request
	pub fn phase(&self) -> RequestPhase {
		self.phase.try_get().unwrap_or_default()
	}

	/// Observable phase, for spinners and disabled buttons
	pub fn phase_view(&self) -> View<RequestPhase> {
		self.phase.view()
	}

	/// The mount flag gating outcome writes
	pub fn mount_flag(&self) -> &MountFlag {
		&self.mount
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RequestError;
	use formcell_reactive::Observable;
	use rstest::rstest;
	use tokio::sync::oneshot;

	#[rstest]
	#[tokio::test]
	async fn test_success_writes_model_and_triggers() {
		let orchestrator = Orchestrator::<i32>::new(MountFlag::new());

		let outcome = orchestrator.run(async { Ok(7) }, OnSuccess::ClearStatus).await;

		assert_eq!(outcome, Ok(7));
		assert_eq!(orchestrator.model().get(), Ok(7));
		assert_eq!(orchestrator.submitter().get(), Ok(7));
		assert_eq!(orchestrator.status().get(), Ok(None));
		assert_eq!(orchestrator.phase(), RequestPhase::Succeeded);
	}

	#[rstest]
	#[tokio::test]
	async fn test_failure_writes_status_without_trigger() {
		let orchestrator = Orchestrator::<i32>::new(MountFlag::new());

		let outcome = orchestrator
			.run(
				async { Err(RequestError::not_found("User not found!")) },
				OnSuccess::ClearStatus,
			)
			.await;

		assert!(outcome.is_err());
		assert!(!orchestrator.submitter().is_published());
		assert!(!orchestrator.model().is_set());
		assert_eq!(orchestrator.status().get(), Ok(Some("User not found!".to_string())));
		assert_eq!(orchestrator.phase(), RequestPhase::Failed);
	}

	#[rstest]
	#[tokio::test]
	async fn test_success_message_replaces_error() {
		let orchestrator = Orchestrator::<i32>::new(MountFlag::new());

		let _ = orchestrator
			.run(async { Err(RequestError::validation("bad")) }, OnSuccess::ClearStatus)
			.await;
		let _ = orchestrator
			.run(async { Ok(1) }, OnSuccess::Message("Saved!".to_string()))
			.await;

		assert_eq!(orchestrator.status().get(), Ok(Some("Saved!".to_string())));
	}

	#[rstest]
	#[tokio::test]
	async fn test_phase_is_pending_while_awaiting() {
		let orchestrator = Orchestrator::<i32>::new(MountFlag::new());
		let (tx, rx) = oneshot::channel::<RequestOutcome<i32>>();

		let request = async { rx.await.unwrap_or_else(|_| Err(RequestError::transport("dropped"))) };
		let run = orchestrator.run(request, OnSuccess::ClearStatus);
		let check = async {
			tokio::task::yield_now().await;
			assert!(orchestrator.phase().is_pending());
			tx.send(Ok(3)).unwrap();
		};

		let (outcome, ()) = tokio::join!(run, check);
		assert_eq!(outcome, Ok(3));
		assert_eq!(orchestrator.phase(), RequestPhase::Succeeded);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unmounted_outcome_is_not_applied() {
		let mount = MountFlag::new();
		let orchestrator = Orchestrator::<i32>::new(mount.clone());
		let (tx, rx) = oneshot::channel::<RequestOutcome<i32>>();

		let request = async { rx.await.unwrap_or_else(|_| Err(RequestError::transport("dropped"))) };
		let run = orchestrator.run(request, OnSuccess::ClearStatus);
		let navigate_away = async {
			tokio::task::yield_now().await;
			mount.unmount();
			tx.send(Ok(9)).unwrap();
		};

		let (outcome, ()) = tokio::join!(run, navigate_away);
		assert_eq!(outcome, Ok(9));
		assert!(!orchestrator.model().is_set());
		assert!(!orchestrator.submitter().is_published());
		assert_eq!(orchestrator.phase(), RequestPhase::Idle);
	}

	#[rstest]
	#[tokio::test]
	async fn test_outcome_from_previous_session_is_not_applied() {
		let mount = MountFlag::new();
		let orchestrator = Orchestrator::<i32>::new(mount.clone());
		let (tx, rx) = oneshot::channel::<RequestOutcome<i32>>();

		let stale = async { rx.await.unwrap_or_else(|_| Err(RequestError::transport("dropped"))) };
		let first = orchestrator.run(stale, OnSuccess::ClearStatus);
		let remount = async {
			tokio::task::yield_now().await;
			mount.unmount();
			mount.mount();
			let fresh = orchestrator.run(async { Ok(2) }, OnSuccess::ClearStatus).await;
			tx.send(Ok(1)).unwrap();
			fresh
		};

		let (stale, fresh) = tokio::join!(first, remount);
		assert_eq!((stale, fresh), (Ok(1), Ok(2)));
		assert_eq!(orchestrator.submitter().get(), Ok(2));
		assert_eq!(orchestrator.submitter().trigger_count(), 1);
		assert_eq!(orchestrator.phase(), RequestPhase::Succeeded);
	}

	#[rstest]
	fn test_mount_starts_new_session() {
		let mount = MountFlag::new();
		let epoch = mount.epoch();
		assert!(mount.is_current(epoch));

		mount.unmount();
		assert!(!mount.is_current(epoch));

		mount.mount();
		assert!(mount.is_mounted());
		assert!(!mount.is_current(epoch));
		assert!(mount.is_current(mount.epoch()));
	}
}
