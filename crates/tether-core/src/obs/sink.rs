//! Metrics sink boundary.
//!
//! Cascade logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between execution logic
//! and the global metrics state.
use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// CascadeOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CascadeOp {
    Delete,
    SoftDelete,
    Restore,
    Purge,
}

///
/// MutationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MutationKind {
    Deleted,
    Nulled,
    Flagged,
    Restored,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    CascadeStart {
        op: CascadeOp,
        collection: &'a str,
    },
    CascadeFinish {
        op: CascadeOp,
        collection: &'a str,
        rows_touched: u64,
        ok: bool,
    },
    ChildrenFetched {
        collection: &'a str,
        rows: u64,
    },
    RowsMutated {
        collection: &'a str,
        kind: MutationKind,
        rows: u64,
    },
    RestrictBlocked {
        collection: &'a str,
    },
    OverflowBlocked {
        collection: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::CascadeStart { op, .. } => {
                metrics::with_state_mut(|m| {
                    let calls = match op {
                        CascadeOp::Delete => &mut m.ops.delete_calls,
                        CascadeOp::SoftDelete => &mut m.ops.soft_delete_calls,
                        CascadeOp::Restore => &mut m.ops.restore_calls,
                        CascadeOp::Purge => &mut m.ops.purge_calls,
                    };
                    *calls = calls.saturating_add(1);
                });
            }

            MetricsEvent::CascadeFinish { ok, .. } => {
                if !ok {
                    metrics::with_state_mut(|m| {
                        m.ops.failed_calls = m.ops.failed_calls.saturating_add(1);
                    });
                }
            }

            MetricsEvent::ChildrenFetched { collection, rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.children_fetched = m.ops.children_fetched.saturating_add(rows);
                    let entry = m.collections.entry(collection.to_string()).or_default();
                    entry.children_fetched = entry.children_fetched.saturating_add(rows);
                });
            }

            MetricsEvent::RowsMutated {
                collection,
                kind,
                rows,
            } => {
                metrics::with_state_mut(|m| {
                    let total = match kind {
                        MutationKind::Deleted => &mut m.ops.rows_deleted,
                        MutationKind::Nulled => &mut m.ops.rows_nulled,
                        MutationKind::Flagged => &mut m.ops.rows_flagged,
                        MutationKind::Restored => &mut m.ops.rows_restored,
                    };
                    *total = total.saturating_add(rows);

                    let entry = m.collections.entry(collection.to_string()).or_default();
                    let per = match kind {
                        MutationKind::Deleted => &mut entry.rows_deleted,
                        MutationKind::Nulled => &mut entry.rows_nulled,
                        MutationKind::Flagged => &mut entry.rows_flagged,
                        MutationKind::Restored => &mut entry.rows_restored,
                    };
                    *per = per.saturating_add(rows);
                });
            }

            MetricsEvent::RestrictBlocked { collection } => {
                metrics::with_state_mut(|m| {
                    m.ops.restrict_blocks = m.ops.restrict_blocks.saturating_add(1);
                    let entry = m.collections.entry(collection.to_string()).or_default();
                    entry.restrict_blocks = entry.restrict_blocks.saturating_add(1);
                });
            }

            MetricsEvent::OverflowBlocked { collection } => {
                metrics::with_state_mut(|m| {
                    m.ops.overflow_blocks = m.ops.overflow_blocks.saturating_add(1);
                    let entry = m.collections.entry(collection.to_string()).or_default();
                    entry.overflow_blocks = entry.overflow_blocks.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one executor call.
/// A span dropped without `finish` is reported as failed.

pub(crate) struct Span<'a> {
    op: CascadeOp,
    collection: &'a str,
    rows: u64,
    ok: bool,
}

impl<'a> Span<'a> {
    /// Start a metrics span for one entry-point call.
    #[must_use]
    pub(crate) fn new(op: CascadeOp, collection: &'a str) -> Self {
        record(MetricsEvent::CascadeStart { op, collection });

        Self {
            op,
            collection,
            rows: 0,
            ok: false,
        }
    }

    /// Mark the call successful with the number of rows it touched.
    pub(crate) const fn finish(&mut self, rows: u64) {
        self.rows = rows;
        self.ok = true;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        record(MetricsEvent::CascadeFinish {
            op: self.op,
            collection: self.collection,
            rows_touched: self.rows,
            ok: self.ok,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink<'a> {
        calls: &'a AtomicUsize,
    }

    impl MetricsSink for CountingSink<'_> {
        fn record(&self, _: MetricsEvent<'_>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fetched(rows: u64) -> MetricsEvent<'static> {
        MetricsEvent::ChildrenFetched {
            collection: "obs::tests",
            rows,
        }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let outer_calls = AtomicUsize::new(0);
        let inner_calls = AtomicUsize::new(0);
        let outer = CountingSink {
            calls: &outer_calls,
        };
        let inner = CountingSink {
            calls: &inner_calls,
        };

        with_metrics_sink(&outer, || {
            record(fetched(1));
            assert_eq!(outer_calls.load(Ordering::SeqCst), 1);

            with_metrics_sink(&inner, || {
                record(fetched(1));
            });

            // Inner override was restored to outer override.
            record(fetched(1));
        });

        assert_eq!(outer_calls.load(Ordering::SeqCst), 2);
        assert_eq!(inner_calls.load(Ordering::SeqCst), 1);

        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let calls = AtomicUsize::new(0);
        let sink = CountingSink { calls: &calls };

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(&sink, || {
                record(fetched(1));
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn span_dropped_without_finish_counts_as_failed() {
        metrics_reset_all();

        {
            let _span = Span::new(CascadeOp::Delete, "projects");
        }
        {
            let mut span = Span::new(CascadeOp::Restore, "projects");
            span.finish(3);
        }

        let ops = metrics_report().ops;
        assert_eq!(ops.delete_calls, 1);
        assert_eq!(ops.restore_calls, 1);
        assert_eq!(ops.failed_calls, 1);
    }

    #[test]
    fn mutation_and_block_events_accumulate_per_collection() {
        metrics_reset_all();

        record(MetricsEvent::RowsMutated {
            collection: "issues",
            kind: MutationKind::Deleted,
            rows: 2,
        });
        record(MetricsEvent::RowsMutated {
            collection: "documents",
            kind: MutationKind::Nulled,
            rows: 1,
        });
        record(MetricsEvent::RestrictBlocked {
            collection: "releases",
        });
        record(MetricsEvent::OverflowBlocked {
            collection: "issues",
        });

        let report = metrics_report();
        assert_eq!(report.ops.rows_deleted, 2);
        assert_eq!(report.ops.rows_nulled, 1);
        assert_eq!(report.ops.restrict_blocks, 1);
        assert_eq!(report.ops.overflow_blocks, 1);

        let issues = report
            .collections
            .get("issues")
            .expect("issue counters should be present");
        assert_eq!(issues.rows_deleted, 2);
        assert_eq!(issues.overflow_blocks, 1);
    }
}
