//! Transport layer: the classification service's HTTP API and the async
//! controller that drives the submission state machine.

pub mod controller;
pub mod http;

pub use controller::Controller;
pub use http::{Classify, ClassifyClient, ClassifyError, ClientConfig, HealthReport};
