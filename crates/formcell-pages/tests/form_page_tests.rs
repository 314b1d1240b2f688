//! Form page scenarios: load, edit, save, double-submit and unmount

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use formcell_pages::{
	Body, DoubleSubmit, FormPage, InMemoryUserService, ModelService, PageError, PageSettings,
	RequestError, RequestOutcome, RequestPhase, User,
};
use formcell_reactive::{Observable, ReactiveError};
use rstest::{fixture, rstest};
use tokio::sync::oneshot;

fn at(hour: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn ann() -> User {
	User::new(42, "Ann", "Lee", at(9))
}

#[fixture]
fn service() -> Rc<InMemoryUserService> {
	Rc::new(
		InMemoryUserService::new()
			.with_users([ann()])
			.with_clock(|| at(12)),
	)
}

/// Holds the next save until the paired sender fires
struct GatedService {
	inner: InMemoryUserService,
	gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl GatedService {
	fn new(inner: InMemoryUserService) -> (Rc<Self>, oneshot::Sender<()>) {
		let (tx, rx) = oneshot::channel();
		let service = Self {
			inner,
			gate: RefCell::new(Some(rx)),
		};
		(Rc::new(service), tx)
	}
}

#[async_trait(?Send)]
impl ModelService for GatedService {
	type Model = User;

	async fn load_model(&self, id: i64) -> RequestOutcome<User> {
		self.inner.load_model(id).await
	}

	async fn save_model(&self, model: User) -> RequestOutcome<User> {
		let gate = self.gate.borrow_mut().take();
		if let Some(rx) = gate {
			let _ = rx.await;
		}
		self.inner.save_model(model).await
	}
}

/// Holds loads of one code until the paired sender fires
struct SlowLoadService {
	inner: InMemoryUserService,
	slow_code: i64,
	gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl SlowLoadService {
	fn new(inner: InMemoryUserService, slow_code: i64) -> (Rc<Self>, oneshot::Sender<()>) {
		let (tx, rx) = oneshot::channel();
		let service = Self {
			inner,
			slow_code,
			gate: RefCell::new(Some(rx)),
		};
		(Rc::new(service), tx)
	}
}

#[async_trait(?Send)]
impl ModelService for SlowLoadService {
	type Model = User;

	async fn load_model(&self, id: i64) -> RequestOutcome<User> {
		if id == self.slow_code {
			let gate = self.gate.borrow_mut().take();
			if let Some(rx) = gate {
				let _ = rx.await;
			}
		}
		self.inner.load_model(id).await
	}

	async fn save_model(&self, model: User) -> RequestOutcome<User> {
		self.inner.save_model(model).await
	}
}

#[rstest]
#[tokio::test]
async fn test_load_not_found_keeps_loading(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service, PageSettings::default());

	let outcome = page.mount(7).await;

	assert_eq!(outcome, Err(RequestError::not_found("User not found!")));
	assert_eq!(page.status().get(), Ok(Some("User not found!".to_string())));
	assert_eq!(page.submitter().trigger_count(), 0);

	let rendered = page.rendered().get().unwrap();
	assert_eq!(rendered.body, Body::Loading);
	assert_eq!(rendered.alert.as_deref(), Some("User not found!"));
}

#[rstest]
#[tokio::test]
async fn test_load_renders_form(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service, PageSettings::default());

	page.mount(42).await.unwrap();

	assert_eq!(page.model().get(), Ok(ann()));
	assert_eq!(page.submitter().trigger_count(), 1);
	assert_eq!(page.phase().get(), Ok(RequestPhase::Succeeded));

	let rendered = page.rendered().get().unwrap();
	assert_eq!(rendered.body.loaded().map(|u| u.firstname.as_str()), Some("Ann"));
	assert_eq!(rendered.alert, None);
}

#[rstest]
#[tokio::test]
async fn test_save_validation_error_keeps_draft_and_confirmed(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service.clone(), PageSettings::default());
	page.mount(42).await.unwrap();

	User::firstname_lens(page.model()).set(String::new()).unwrap();
	let outcome = page.save().await.unwrap();

	assert_eq!(outcome, Err(RequestError::validation("Fistname is empty.")));
	assert_eq!(page.model().get().unwrap().firstname, "");
	assert_eq!(page.confirmed().get().unwrap().firstname, "Ann");
	assert_eq!(page.status().get(), Ok(Some("Fistname is empty.".to_string())));
	assert_eq!(page.submitter().trigger_count(), 1);
	assert_eq!(service.stored(42), Some(ann()));
}

#[rstest]
#[tokio::test]
async fn test_save_success_is_one_render_transition(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service, PageSettings::default());
	page.mount(42).await.unwrap();

	let frames = Rc::new(RefCell::new(Vec::new()));
	let frames_clone = frames.clone();
	let _sub = page
		.rendered()
		.subscribe(move |frame| frames_clone.borrow_mut().push(frame.clone()));

	User::firstname_lens(page.model()).set("Anna".to_string()).unwrap();
	assert!(frames.borrow().is_empty());

	let saved = page.save().await.unwrap().unwrap();

	assert_eq!(saved.update_date, at(12));
	assert_eq!(page.model().get(), Ok(saved.clone()));
	assert_eq!(page.status().get(), Ok(Some("Saved!".to_string())));
	assert_eq!(page.submitter().trigger_count(), 2);

	let frames = frames.borrow();
	assert_eq!(frames.len(), 1);
	assert_eq!(frames[0].body, Body::Loaded(saved));
	assert_eq!(frames[0].alert.as_deref(), Some("Saved!"));
}

#[rstest]
#[tokio::test]
async fn test_saved_message_from_settings(service: Rc<InMemoryUserService>) {
	let settings = PageSettings::from_toml_str("saved_message = \"Stored.\"").unwrap();
	let page = FormPage::new(service, settings);
	page.mount(42).await.unwrap();

	page.save().await.unwrap().unwrap();

	assert_eq!(page.status().get(), Ok(Some("Stored.".to_string())));
}

#[rstest]
#[tokio::test]
async fn test_save_before_load_is_not_ready(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service, PageSettings::default());

	let err = page.save().await.unwrap_err();

	assert!(matches!(err, PageError::Reactive(ReactiveError::NotReady { .. })));
}

#[rstest]
#[tokio::test]
async fn test_double_submit_rejected_while_pending() {
	let (service, release) = GatedService::new(InMemoryUserService::new().with_users([ann()]));
	let page = FormPage::new(service, PageSettings::default());
	page.mount(42).await.unwrap();

	let first = page.save();
	let second = async {
		tokio::task::yield_now().await;
		assert!(page.is_busy());
		let rejected = page.save().await;
		release.send(()).unwrap();
		rejected
	};

	let (first, second) = tokio::join!(first, second);

	assert!(first.unwrap().is_ok());
	assert!(matches!(second, Err(PageError::SaveInFlight)));
	assert!(!page.is_busy());
}

#[rstest]
#[tokio::test]
async fn test_double_submit_allowed_last_completion_wins() {
	let ticks = Rc::new(std::cell::Cell::new(10));
	let clock_ticks = ticks.clone();
	let inner = InMemoryUserService::new().with_users([ann()]).with_clock(move || {
		let hour = clock_ticks.get();
		clock_ticks.set(hour + 1);
		at(hour)
	});
	let (service, release) = GatedService::new(inner);
	let settings = PageSettings::default().with_double_submit(DoubleSubmit::Allow);
	let page = FormPage::new(service, settings);
	page.mount(42).await.unwrap();

	let first = page.save();
	let second = async {
		tokio::task::yield_now().await;
		let outcome = page.save().await;
		release.send(()).unwrap();
		outcome
	};

	let (first, second) = tokio::join!(first, second);

	assert_eq!(second.unwrap().unwrap().update_date, at(10));
	assert_eq!(first.unwrap().unwrap().update_date, at(11));
	assert_eq!(page.confirmed().get().unwrap().update_date, at(11));
	assert_eq!(page.submitter().trigger_count(), 3);
}

#[rstest]
#[tokio::test]
async fn test_unmount_discards_pending_save() {
	let (service, release) = GatedService::new(InMemoryUserService::new().with_users([ann()]));
	let page = FormPage::new(service, PageSettings::default());
	page.mount(42).await.unwrap();
	User::firstname_lens(page.model()).set("Anna".to_string()).unwrap();

	let save = page.save();
	let leave = async {
		tokio::task::yield_now().await;
		page.unmount();
		release.send(()).unwrap();
	};

	let (outcome, ()) = tokio::join!(save, leave);

	assert_eq!(outcome.unwrap().unwrap().firstname, "Anna");
	assert!(!page.is_mounted());
	assert!(!page.is_busy());
	assert_eq!(page.phase().get(), Ok(RequestPhase::Idle));
	assert_eq!(page.status().get(), Ok(None));
	assert_eq!(page.confirmed().get(), Ok(ann()));
	assert_eq!(page.submitter().trigger_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_remount_ignores_load_from_previous_visit() {
	let bob = User::new(7, "Bob", "Ray", at(9));
	let (service, release) =
		SlowLoadService::new(InMemoryUserService::new().with_users([ann(), bob.clone()]), 42);
	let page = FormPage::new(service, PageSettings::default());

	let first_visit = page.mount(42);
	let second_visit = async {
		tokio::task::yield_now().await;
		page.unmount();
		let outcome = page.mount(7).await;
		release.send(()).unwrap();
		outcome
	};

	let (stale, fresh) = tokio::join!(first_visit, second_visit);

	assert_eq!(stale, Ok(ann()));
	assert_eq!(fresh, Ok(bob.clone()));
	assert!(page.is_mounted());
	assert_eq!(page.model().get(), Ok(bob.clone()));
	assert_eq!(page.confirmed().get(), Ok(bob));
	assert_eq!(page.submitter().trigger_count(), 1);
	assert_eq!(page.phase().get(), Ok(RequestPhase::Succeeded));
}

#[rstest]
#[tokio::test]
async fn test_field_binding_round_trip(service: Rc<InMemoryUserService>) {
	let page = FormPage::new(service, PageSettings::default());
	page.mount(42).await.unwrap();

	let lastname = page.field(
		|u: &User| u.lastname.clone(),
		|u: &User, lastname: String| User {
			lastname,
			..u.clone()
		},
	);

	assert_eq!(lastname.get(), Ok("Lee".to_string()));
	lastname.set("Li".to_string()).unwrap();
	assert_eq!(page.model().get().unwrap().lastname, "Li");
	assert_eq!(page.confirmed().get().unwrap().lastname, "Lee");
}
