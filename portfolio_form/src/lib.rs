//! View state of the contact form.
//!
//! A [`ContactForm`] owns the four input fields, the submission status and the
//! status message shown below the form. Every change is published through a
//! [`watch`] channel. After a submission has finished, the status message is
//! cleared again once [`ContactFormConfig::status_reset_delay`] has elapsed.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, Weak,
    },
    time::Duration,
};

use portfolio_di::Build;
use portfolio_extern_contracts::contact::{ContactApiResponse, ContactApiService};
use portfolio_models::contact::{ContactMessageDraft, ContactMessageField};
use portfolio_utils::trace_instrument;
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const REJECTED_MESSAGE: &str = "Something went wrong. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Build)]
pub struct ContactForm<Api> {
    api: Api,
    config: ContactFormConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    pub status_reset_delay: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormView {
    pub fields: ContactMessageDraft,
    pub status: ContactFormStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactFormStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl ContactFormStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ContactFormSubmitError {
    #[error("A submission is already in progress.")]
    InProgress,
}

#[derive(Debug)]
struct State {
    view: watch::Sender<ContactFormView>,
    /// Incremented on every submission. A pending reset only applies to the
    /// submission it was scheduled for.
    epoch: AtomicU64,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            view: watch::Sender::new(ContactFormView::default()),
            epoch: AtomicU64::new(0),
            reset_task: Mutex::new(None),
        }
    }
}

impl State {
    fn replace_reset_task(&self, task: Option<JoinHandle<()>>) {
        let previous = std::mem::replace(
            &mut *self
                .reset_task
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            task,
        );
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn reset_status(&self, epoch: u64) {
        self.view.send_if_modified(|view| {
            if self.epoch.load(Ordering::SeqCst) != epoch
                || !matches!(
                    view.status,
                    ContactFormStatus::Success | ContactFormStatus::Error
                )
            {
                return false;
            }
            view.status = ContactFormStatus::Idle;
            view.message.clear();
            true
        });
    }
}

impl Drop for State {
    fn drop(&mut self) {
        let task = self
            .reset_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl<Api> ContactForm<Api> {
    pub fn new(api: Api, config: ContactFormConfig) -> Self {
        Self {
            api,
            config,
            state: Default::default(),
        }
    }

    /// Return a snapshot of the current view state.
    pub fn view(&self) -> ContactFormView {
        self.state.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContactFormView> {
        self.state.view.subscribe()
    }

    pub fn update_field(&self, field: ContactMessageField, value: impl Into<String>) {
        let value = value.into();
        self.state
            .view
            .send_modify(|view| view.fields.set(field, value));
    }

    /// Publish the outcome of a submission and arm the auto-clear timer.
    fn finish(&self, epoch: u64, status: ContactFormStatus, message: String) {
        self.state.view.send_modify(|view| {
            view.status = status;
            view.message = message;
            if status == ContactFormStatus::Success {
                view.fields = Default::default();
            }
        });
        self.schedule_reset(epoch);
    }

    fn schedule_reset(&self, epoch: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime, the status message will not be cleared");
            return;
        };
        let state = Arc::downgrade(&self.state);
        let delay = self.config.status_reset_delay;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(state) = Weak::upgrade(&state) {
                state.reset_status(epoch);
            }
        });
        self.state.replace_reset_task(Some(task));
    }
}

impl<Api: ContactApiService> ContactForm<Api> {
    /// Send the current fields to the contact endpoint.
    ///
    /// Returns the status the form ended up in. Fails without touching the
    /// view state if another submission has not finished yet.
    #[trace_instrument(skip(self))]
    pub async fn submit(&self) -> Result<ContactFormStatus, ContactFormSubmitError> {
        let mut submission = None;
        self.state.view.send_if_modified(|view| {
            if view.status == ContactFormStatus::Loading {
                return false;
            }
            let epoch = self.state.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            view.status = ContactFormStatus::Loading;
            view.message.clear();
            submission = Some((epoch, view.fields.clone()));
            true
        });
        let (epoch, fields) = submission.ok_or(ContactFormSubmitError::InProgress)?;

        self.state.replace_reset_task(None);
        let submission = Submission {
            form: self,
            epoch,
            pending: true,
        };

        let (status, message) = match self.api.send_message(&fields).await {
            Ok(ContactApiResponse::Accepted { .. }) => {
                (ContactFormStatus::Success, SUCCESS_MESSAGE.to_owned())
            }
            Ok(ContactApiResponse::Rejected { status, error }) => {
                warn!(status, ?error, "Contact endpoint rejected the message");
                let message = error
                    .filter(|error| !error.is_empty())
                    .unwrap_or_else(|| REJECTED_MESSAGE.to_owned());
                (ContactFormStatus::Error, message)
            }
            Err(err) => {
                warn!("Failed to reach contact endpoint: {err:#}");
                (ContactFormStatus::Error, NETWORK_ERROR_MESSAGE.to_owned())
            }
        };

        submission.complete(status, message);

        Ok(status)
    }
}

/// A submission in `loading` state. If it is dropped before it completes,
/// the form is moved to `error` so that it accepts new submissions again.
struct Submission<'a, Api> {
    form: &'a ContactForm<Api>,
    epoch: u64,
    pending: bool,
}

impl<Api> Submission<'_, Api> {
    fn complete(mut self, status: ContactFormStatus, message: String) {
        self.pending = false;
        self.form.finish(self.epoch, status, message);
    }
}

impl<Api> Drop for Submission<'_, Api> {
    fn drop(&mut self) {
        if self.pending {
            warn!("Submission was cancelled before the contact endpoint answered");
            self.form.finish(
                self.epoch,
                ContactFormStatus::Error,
                NETWORK_ERROR_MESSAGE.to_owned(),
            );
        }
    }
}
