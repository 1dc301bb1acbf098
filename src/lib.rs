//! MedRounds — medication administration lifecycle engine for a
//! school-health portal.
//!
//! The portal's UI layers (forms, charts, notification screens) live
//! elsewhere; this crate owns the part with real state: a guardian's
//! medication request from draft to approval, the expansion of an
//! approved request into daily dose rows, and the time-gated recording
//! of each dose's outcome, all against a remote portal backend reached
//! over authenticated HTTP.

pub mod api;
pub mod config;
pub mod dose_gate;
pub mod error;
pub mod models;
pub mod optimistic;
pub mod requests;
pub mod schedule_times;
pub mod session;
pub mod tracking;

use tracing_subscriber::EnvFilter;

pub use api::{HttpPortalApi, PortalApi};
pub use error::{PortalError, ValidationIssue};
pub use requests::RequestLifecycleManager;
pub use session::Session;
pub use tracking::DoseScheduleTracker;

/// Install the global tracing subscriber, honoring `RUST_LOG` and
/// falling back to the crate default filter. Later calls are no-ops so
/// host applications and tests can both call it freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
