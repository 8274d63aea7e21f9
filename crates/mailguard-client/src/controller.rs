//! Async submission controller.
//!
//! Owns the [`SubmissionState`] reducer and publishes every applied state on a
//! `watch` channel. Each submission runs as its own task tagged with the
//! generation it started; when it finishes, the reducer drops the outcome if a
//! newer submission has been issued in the meantime.

use std::sync::{Arc, Mutex, PoisonError};

use mailguard_core::{Applied, Event, FormFields, SubmissionState, ViewState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::http::Classify;

pub struct Controller<C> {
    service: Arc<C>,
    state: Arc<Mutex<SubmissionState>>,
    tx: Arc<watch::Sender<ViewState>>,
}

impl<C: Classify + 'static> Controller<C> {
    pub fn new(service: Arc<C>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::Idle);
        Self {
            service,
            state: Arc::new(Mutex::new(SubmissionState::new())),
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> ViewState {
        lock(&self.state).view().clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    /// Build the request from `fields`, move to `Loading`, and issue exactly
    /// one classify call on a spawned task. Must be called from within a
    /// Tokio runtime.
    pub fn submit(&self, fields: &FormFields) -> JoinHandle<()> {
        let request = fields.build_request();
        let generation = match dispatch(&self.state, &self.tx, Event::Submitted) {
            Applied::Started { generation } => generation,
            other => unreachable!("submit always starts a generation, got {other:?}"),
        };
        info!(generation, "submission started");

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let tx = Arc::clone(&self.tx);
        tokio::spawn(async move {
            let outcome = service.classify(&request).await.map_err(|e| e.to_string());
            if let Err(message) = &outcome {
                info!(generation, error = %message, "classification failed");
            }
            let applied = dispatch(
                &state,
                &tx,
                Event::Resolved {
                    generation,
                    outcome,
                },
            );
            if applied == Applied::Stale {
                debug!(generation, "dropping result of superseded submission");
            }
        })
    }
}

fn lock(state: &Mutex<SubmissionState>) -> std::sync::MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply `event` and publish the new view while still holding the lock, so
/// subscribers see states in the order they were applied.
fn dispatch(
    state: &Mutex<SubmissionState>,
    tx: &watch::Sender<ViewState>,
    event: Event,
) -> Applied {
    let mut guard = lock(state);
    let applied = guard.apply(event);
    if applied != Applied::Stale {
        tx.send_replace(guard.view().clone());
    }
    applied
}
