//! Estimate events for the `tracing` feature.
//!
//! Each call opens a TRACE span named after the event and records one event
//! per field inside it. Without the feature this compiles to nothing; the CLI
//! decides whether a subscriber is installed.

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, fields: &[(&str, String)]) {
    let span = tracing::trace_span!("estimate", event);
    span.in_scope(|| {
        for (field, value) in fields {
            tracing::trace!(field = *field, value = %value, "estimate field");
        }
    });
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _fields: &[(&str, String)]) {}
