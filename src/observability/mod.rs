//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle stages produce:
//!     → logging.rs (subscriber setup for structured events)
//!     → metrics.rs (counters through the `metrics` facade)
//!     → tracing.rs (per-operation spans with correlation IDs)
//!
//! Consumers:
//!     → Host application's log pipeline
//!     → Host application's metrics recorder, if one is installed
//! ```
//!
//! # Design Decisions
//! - The SDK never installs a metrics exporter; without a recorder counters are no-ops
//! - Operation IDs flow through every event of one pipeline run
//! - Key material is never a field on any event

pub mod logging;
pub mod metrics;
pub mod tracing;
