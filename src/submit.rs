//! Contact form submission lifecycle.
//!
//! [`ContactForm`] owns the state of one contact form instance and drives it
//! through a small state machine:
//!
//! ```text
//!            valid submit             delivery Ok            success_display
//!   Idle ───────────────▶ Submitting ───────────▶ Succeeded ───────────────▶ Idle
//!    ▲                        │
//!    └──── delivery Err ──────┘
//! ```
//!
//! - A submit that fails validation leaves the state untouched and stores the
//!   per-field errors.
//! - A submit while `Submitting` is ignored, never queued. The check-and-set
//!   happens before the first await point, so two submits polled back to back
//!   on the same thread cannot both reach the delivery collaborator.
//! - Leaving `Succeeded` is driven by a timer owned by the form, not by the
//!   view: the success message disappears exactly when the timer elapses.
//!
//! Every transition is published through a [`tokio::sync::watch`] channel so
//! the view (and the tests) can observe the full state sequence.

use crate::delivery::{Deliver, DeliveryError, Receipt};
use crate::validate::{Field, FormRecord, ValidationResult, validate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

impl SubmissionState {
    /// Label of the submit control. The control is disabled while submitting.
    pub fn button_label(self) -> &'static str {
        match self {
            SubmissionState::Submitting => "Sending...",
            _ => "Send Message",
        }
    }

    pub fn accepts_submit(self) -> bool {
        self != SubmissionState::Submitting
    }
}

/// Everything the view needs to render the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub state: SubmissionState,
    pub fields: FormRecord,
    pub errors: ValidationResult,
    /// Inline message after a failed delivery. Cleared by the next attempt.
    pub failure: Option<String>,
    generation: u64,
}

impl FormSnapshot {
    pub fn success_message(&self) -> Option<&'static str> {
        (self.state == SubmissionState::Succeeded).then_some(SUCCESS_MESSAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight, or the form has been disposed.
    Ignored,
    /// Validation failed; nothing was delivered.
    Rejected(ValidationResult),
    Delivered(Receipt),
    Failed(DeliveryError),
    /// The form was disposed while the delivery was pending.
    Cancelled,
}

struct Inner<D> {
    delivery: D,
    snapshot: watch::Sender<FormSnapshot>,
    success_display: Duration,
    cancel: CancellationToken,
}

/// One contact form instance. Cloning yields another handle to the same form.
pub struct ContactForm<D> {
    inner: Arc<Inner<D>>,
}

impl<D> Clone for ContactForm<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Deliver + 'static> ContactForm<D> {
    pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

    pub fn new(delivery: D) -> Self {
        Self::with_success_display(delivery, Self::DEFAULT_SUCCESS_DISPLAY)
    }

    pub fn with_success_display(delivery: D, success_display: Duration) -> Self {
        let (snapshot, _) = watch::channel(FormSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                delivery,
                snapshot,
                success_display,
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn watch(&self) -> watch::Receiver<FormSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.snapshot.borrow().state
    }

    /// What the fields currently hold.
    pub fn fields(&self) -> FormRecord {
        self.inner.snapshot.borrow().fields.clone()
    }

    /// Update one field as the user types.
    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.inner.snapshot.send_modify(|s| s.fields.set(field, value));
    }

    /// Submit whatever the fields currently hold.
    pub async fn submit_current(&self) -> SubmitOutcome {
        self.submit(self.fields()).await
    }

    pub async fn submit(&self, record: FormRecord) -> SubmitOutcome {
        if self.inner.cancel.is_cancelled() {
            return SubmitOutcome::Ignored;
        }

        let errors = validate(&record);
        let mut busy = false;
        self.inner.snapshot.send_if_modified(|s| {
            if s.state == SubmissionState::Submitting {
                busy = true;
                return false;
            }
            s.fields = record.clone();
            s.failure = None;
            s.errors = errors.clone();
            if errors.is_valid() {
                s.state = SubmissionState::Submitting;
            }
            true
        });

        if busy {
            tracing::debug!("submit ignored: delivery already in flight");
            return SubmitOutcome::Ignored;
        }
        if !errors.is_valid() {
            tracing::debug!(errors = errors.len(), "submit rejected by validation");
            return SubmitOutcome::Rejected(errors);
        }

        let result = tokio::select! {
            _ = self.inner.cancel.cancelled() => None,
            result = self.inner.delivery.deliver(&record) => Some(result),
        };

        match result {
            Some(Ok(receipt)) => {
                self.succeed();
                SubmitOutcome::Delivered(receipt)
            }
            Some(Err(err)) => {
                tracing::warn!(error = %err, "contact delivery failed");
                let message = format!("We couldn't send your message ({err}). Please try again.");
                self.inner.snapshot.send_modify(|s| {
                    s.state = SubmissionState::Idle;
                    s.failure = Some(message);
                });
                SubmitOutcome::Failed(err)
            }
            None => {
                self.inner
                    .snapshot
                    .send_modify(|s| s.state = SubmissionState::Idle);
                SubmitOutcome::Cancelled
            }
        }
    }

    /// Cancel the pending return-to-idle timer and any in-flight delivery.
    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }

    fn succeed(&self) {
        let mut generation = 0;
        self.inner.snapshot.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.state = SubmissionState::Succeeded;
            s.fields = FormRecord::default();
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.success_display) => {
                    inner.snapshot.send_if_modified(|s| {
                        if s.generation == generation && s.state == SubmissionState::Succeeded {
                            s.state = SubmissionState::Idle;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::SimulatedDelivery;
    use crate::test_helpers::{RecordingDelivery, valid_record};
    use tokio::time::{Instant, sleep};

    fn record(name: &str, email: &str) -> FormRecord {
        FormRecord {
            name: name.into(),
            email: email.into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        }
    }

    /// Collect every state published on `rx` (including the current one).
    fn spawn_state_log(
        mut rx: watch::Receiver<FormSnapshot>,
    ) -> Arc<std::sync::Mutex<Vec<SubmissionState>>> {
        let log = Arc::new(std::sync::Mutex::new(vec![rx.borrow().state]));
        let sink = Arc::clone(&log);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().state;
                let mut log = sink.lock().unwrap();
                if log.last() != Some(&state) {
                    log.push(state);
                }
            }
        });
        log
    }

    #[tokio::test(start_paused = true)]
    async fn blank_name_stays_idle_with_one_error() {
        let delivery = RecordingDelivery::succeeding();
        let form = ContactForm::new(delivery.clone());

        let outcome = form.submit(record("", "a@b.com")).await;

        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.error(Field::Name), Some("Name is required"));
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.snapshot().errors, errors);
        assert_eq!(delivery.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_email_is_surfaced_without_delivery() {
        let delivery = RecordingDelivery::succeeding();
        let form = ContactForm::new(delivery.clone());

        let outcome = form.submit(record("Jo", "not-an-email")).await;

        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.error(Field::Email), Some("Invalid email address"));
        assert_eq!(errors.len(), 1);
        assert_eq!(delivery.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_submit_walks_idle_submitting_succeeded_idle() {
        let form = ContactForm::new(SimulatedDelivery::default());
        let log = spawn_state_log(form.watch());
        let started = Instant::now();

        let outcome = form.submit(valid_record()).await;

        assert!(matches!(outcome, SubmitOutcome::Delivered(_)));
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        let snapshot = form.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Succeeded);
        assert!(snapshot.fields.is_blank(), "fields cleared after success");
        assert_eq!(snapshot.success_message(), Some(SUCCESS_MESSAGE));

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(form.state(), SubmissionState::Succeeded);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.snapshot().success_message(), None);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                SubmissionState::Idle,
                SubmissionState::Submitting,
                SubmissionState::Succeeded,
                SubmissionState::Idle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_submitting_is_ignored() {
        let delivery = RecordingDelivery::succeeding().with_delay(Duration::from_secs(2));
        let form = ContactForm::new(delivery.clone());

        let (first, second) = tokio::join!(form.submit(valid_record()), async {
            assert_eq!(form.state(), SubmissionState::Submitting);
            form.submit(valid_record()).await
        });

        assert!(matches!(first, SubmitOutcome::Delivered(_)));
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(delivery.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_carry_over_between_attempts() {
        let form = ContactForm::new(RecordingDelivery::succeeding());

        form.submit(record("", "bad")).await;
        assert_eq!(form.snapshot().errors.len(), 2);

        form.submit(record("Jo", "bad")).await;
        let errors = form.snapshot().errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.error(Field::Name), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_returns_to_idle_and_keeps_fields() {
        let delivery = RecordingDelivery::failing(DeliveryError::Unavailable("offline".into()));
        let form = ContactForm::new(delivery.clone());

        let outcome = form.submit(valid_record()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(DeliveryError::Unavailable("offline".into()))
        );
        let snapshot = form.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Idle);
        assert_eq!(snapshot.fields, valid_record());
        assert!(snapshot.failure.as_deref().unwrap().contains("offline"));

        // Resubmission is allowed and clears the failure message.
        form.submit(record("", "")).await;
        assert_eq!(form.snapshot().failure, None);
        assert_eq!(delivery.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmitting_restarts_the_success_timer() {
        let form = ContactForm::new(RecordingDelivery::succeeding().with_delay(Duration::from_secs(2)));

        form.submit(valid_record()).await; // succeeded at t=2
        sleep(Duration::from_millis(500)).await;
        form.submit(valid_record()).await; // succeeded at t=4.5

        // The first timer (t=5) must not end the second success early.
        sleep(Duration::from_millis(1000)).await; // t=5.5
        assert_eq!(form.state(), SubmissionState::Succeeded);

        sleep(Duration::from_millis(2100)).await; // t=7.6
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_reset() {
        let form = ContactForm::new(RecordingDelivery::succeeding());
        form.submit(valid_record()).await;
        assert_eq!(form.state(), SubmissionState::Succeeded);

        form.dispose();
        sleep(Duration::from_secs(10)).await;
        assert_eq!(form.state(), SubmissionState::Succeeded);
        assert_eq!(form.submit(valid_record()).await, SubmitOutcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_during_delivery_cancels_it() {
        let delivery = RecordingDelivery::succeeding().with_delay(Duration::from_secs(2));
        let form = ContactForm::new(delivery);

        let (outcome, _) = tokio::join!(form.submit(valid_record()), async {
            sleep(Duration::from_millis(100)).await;
            form.dispose();
        });

        assert_eq!(outcome, SubmitOutcome::Cancelled);
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_current_uses_typed_fields() {
        let delivery = RecordingDelivery::succeeding();
        let form = ContactForm::new(delivery.clone());
        form.set_field(Field::Name, "Jo");
        form.set_field(Field::Email, "jo@x.com");
        form.set_field(Field::Subject, "Hi");
        form.set_field(Field::Message, "Hello");
        assert_eq!(form.fields(), valid_record());

        let outcome = form.submit_current().await;

        assert!(matches!(outcome, SubmitOutcome::Delivered(_)));
        assert_eq!(delivery.delivered(), vec![valid_record()]);
        assert!(form.fields().is_blank());
    }

    #[test]
    fn button_label_tracks_state() {
        assert_eq!(SubmissionState::Idle.button_label(), "Send Message");
        assert_eq!(SubmissionState::Submitting.button_label(), "Sending...");
        assert_eq!(SubmissionState::Succeeded.button_label(), "Send Message");
        assert!(!SubmissionState::Submitting.accepts_submit());
    }
}
