//! Per-operation spans.
//!
//! Every pipeline run gets a fresh UUID v4 so its build, sign, broadcast and
//! poll events can be correlated in aggregated logs.

use tracing::Span;
use uuid::Uuid;

/// Open a span for one staking operation on `chain`.
pub fn operation_span(chain: &str, operation: &'static str) -> Span {
    tracing::info_span!(
        "staking_operation",
        operation_id = %Uuid::new_v4(),
        chain = %chain,
        operation
    )
}
