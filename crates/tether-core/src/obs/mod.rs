//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Cascade logic never touches metrics state directly; every counter moves
//! through a `MetricsEvent` recorded on the active sink.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{CollectionCounters, EventOps, EventReport};
pub use sink::{
    CascadeOp, MetricsEvent, MetricsSink, MutationKind, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
