//! Core types for the email classification client: wire format, request
//! building, the submission state machine, and result interpretation.

pub mod form;
pub mod message;
pub mod state;
pub mod view;

pub use form::{FormFields, Sample, parse_attachments};
pub use message::{Attachment, ClassificationRequest, ClassificationResponse, EmailHeaders, Scores};
pub use state::{Applied, Event, SubmissionState, ViewState};
pub use view::{ActionTier, DisplayModel, ResultView, ScorePill, interpret};
