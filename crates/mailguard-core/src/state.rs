//! Submission state machine.
//!
//! `Idle → Loading → {Success | Failure} → Loading → …`. Every submission
//! gets a generation number; a result is only applied if it belongs to the
//! most recent submission, so a slow response can never overwrite a newer one.

use crate::message::ClassificationResponse;

/// What the result area currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success(ClassificationResponse),
    Failure(String),
}

/// Input to [`SubmissionState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new request was issued.
    Submitted,
    /// The request tagged `generation` finished.
    Resolved {
        generation: u64,
        outcome: Result<ClassificationResponse, String>,
    },
}

/// Result of applying an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A submission started; resolve it with this generation.
    Started { generation: u64 },
    /// The outcome replaced `Loading`.
    Resolved,
    /// The outcome belonged to a superseded submission and was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    view: ViewState,
    generation: u64,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    pub fn apply(&mut self, event: Event) -> Applied {
        match event {
            Event::Submitted => {
                self.generation += 1;
                self.view = ViewState::Loading;
                Applied::Started {
                    generation: self.generation,
                }
            }
            Event::Resolved {
                generation,
                outcome,
            } => {
                if generation != self.generation || !self.is_loading() {
                    return Applied::Stale;
                }
                self.view = match outcome {
                    Ok(resp) => ViewState::Success(resp),
                    Err(message) => ViewState::Failure(message),
                };
                Applied::Resolved
            }
        }
    }
}
