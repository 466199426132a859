//! Service layer adapter for the TUI
//!
//! Bridges the async [`VillaService`] and the synchronous event loop:
//!
//! - `ServiceHandle` owns the service and a tokio runtime
//! - [`dispatch`](ServiceHandle::dispatch) runs an [`Effect`] on the runtime
//!   and reports the outcome as an [`Action`] on a crossbeam channel
//! - [`subscribe`](ServiceHandle::subscribe) bridges the broadcast event bus
//!   to crossbeam for the status line

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use libvillastay::api::mock::{fixtures, MockBookingApi};
use libvillastay::service::events::Event;
use libvillastay::{Config, Notification, VillaService};
use tokio::sync::broadcast::error::RecvError;

use crate::app::{Action, Effect};
use crate::error::Result;

/// Service handle for TUI operations
pub struct ServiceHandle {
    service: Arc<VillaService>,
    runtime: tokio::runtime::Runtime,
    results_tx: Sender<Action>,
    results_rx: Receiver<Action>,
}

impl ServiceHandle {
    /// Connect to the configured backend, or to canned data with `demo`
    pub fn connect(demo: bool) -> Result<Self> {
        let service = if demo {
            let mut config = Config::default_config();
            config.session.user_id = Some(fixtures::DEMO_HOST_ID.to_string());
            VillaService::with_api(config, Arc::new(MockBookingApi::demo()))
        } else {
            VillaService::new()?
        };
        Self::from_service(service)
    }

    pub fn from_service(service: VillaService) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (results_tx, results_rx) = unbounded();
        Ok(Self {
            service: Arc::new(service),
            runtime,
            results_tx,
            results_rx,
        })
    }

    pub fn service(&self) -> &VillaService {
        &self.service
    }

    /// Resolve the configured host before the first draw
    pub fn sign_in(&self) -> Result<String> {
        let user = self.runtime.block_on(self.service.sign_in_configured())?;
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user.display_name())
    }

    /// Outcomes of dispatched effects
    pub fn results(&self) -> &Receiver<Action> {
        &self.results_rx
    }

    /// Notifications queued by services since the last call
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.service.store().drain_notifications()
    }

    /// Run `effect` in the background; the result arrives on [`results`](Self::results)
    pub fn dispatch(&self, effect: Effect) {
        let service = Arc::clone(&self.service);
        let tx = self.results_tx.clone();

        self.runtime.spawn(async move {
            let action = perform(&service, effect).await;
            if tx.send(action).is_err() {
                tracing::debug!("Result receiver dropped");
            }
        });
    }

    /// Bridge the service event bus to a crossbeam receiver
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        let mut events = self.service.subscribe();

        self.runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event receiver lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        rx
    }
}

async fn perform(service: &VillaService, effect: Effect) -> Action {
    match effect {
        Effect::LoadThreads(tab) => match service.inbox().threads(tab).await {
            Ok(threads) => Action::InboxThreadsLoaded { tab, threads },
            Err(e) => Action::InboxThreadsFailed {
                tab,
                error: e.to_string(),
            },
        },
        Effect::LoadHistoryPage { booking_id, page } => {
            match service.inbox().fetch_page(&booking_id, page).await {
                Ok(messages) => Action::InboxHistoryPageLoaded {
                    booking_id,
                    offset: page.offset,
                    messages,
                },
                Err(e) => Action::InboxHistoryFailed {
                    booking_id,
                    error: e.to_string(),
                },
            }
        }
        Effect::SendMessage {
            booking_id,
            body,
            pages,
        } => match service.inbox().send(&booking_id, &body).await {
            Ok(_) => {
                let history = match service.inbox().reload(&booking_id, pages).await {
                    Ok(history) => Some(history),
                    Err(e) => {
                        tracing::warn!(booking_id = %booking_id, error = %e, "Refetch after send failed");
                        None
                    }
                };
                Action::InboxSendSucceeded { booking_id, history }
            }
            Err(e) => Action::InboxSendFailed {
                booking_id,
                error: e.to_string(),
            },
        },
        Effect::LoadBooking(booking_id) => match service.review().load_booking(&booking_id).await {
            Ok(booking) => Action::ReviewBookingLoaded(booking),
            Err(e) => Action::ReviewBookingFailed {
                booking_id,
                error: e.to_string(),
            },
        },
        Effect::SubmitReview { booking, form } => match service.review().submit(&booking, &form).await {
            Ok(review) => Action::ReviewSubmitSucceeded {
                booking_id: booking.id,
                review_id: review.id,
                at: Instant::now(),
            },
            Err(e) => Action::ReviewSubmitFailed {
                booking_id: booking.id,
                error: e.to_string(),
            },
        },
    }
}

/// Status line text for a service event, if it deserves one
pub fn status_for_event(event: &Event) -> Option<String> {
    match event {
        Event::ThreadsLoaded { tab, count } => Some(format!("{} threads in {}", count, tab)),
        Event::HistoryPageLoaded { has_more: false, .. } => Some("Start of conversation".to_string()),
        Event::HistoryPageLoaded { .. } => None,
        Event::MessageSent { .. } => Some("Message sent".to_string()),
        Event::ReviewSubmitted { rating, .. } => Some(format!("Review submitted ({}/5)", rating)),
        Event::MessageSendFailed { .. } | Event::ReviewSubmitFailed { .. } => None,
    }
}
