//! Status-page incident notifier.
//!
//! Fetches the unresolved and the historical incident lists of a
//! Statuspage-style API (or local fixtures), keeps the unresolved incidents
//! that also appear in the history, and writes them as a JSON notice payload.
//!
//! One run, one thread, blocking I/O; every error ends the run.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reconcile;
pub mod source;
pub mod types;
pub mod writer;

pub use config::{Config, SourceMode};
pub use error::{ConfigError, FetchError, LogInitError, NotifierError, WriteError};
pub use pipeline::{run, RunSummary};
pub use reconcile::reconcile;
pub use source::IncidentSource;
pub use types::{IncidentCollection, IncidentRecord, NotificationRecord};
