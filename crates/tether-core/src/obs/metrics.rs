use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for cascade operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub ops: EventOps,
    pub collections: BTreeMap<String, CollectionCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Entrypoints
    pub delete_calls: u64,
    pub soft_delete_calls: u64,
    pub restore_calls: u64,
    pub purge_calls: u64,
    pub failed_calls: u64,

    // Rows touched
    pub children_fetched: u64,
    pub rows_deleted: u64,
    pub rows_nulled: u64,
    pub rows_flagged: u64,
    pub rows_restored: u64,

    // Blocks
    pub restrict_blocks: u64,
    pub overflow_blocks: u64,
}

///
/// CollectionCounters
/// Per child-collection counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CollectionCounters {
    pub children_fetched: u64,
    pub rows_deleted: u64,
    pub rows_nulled: u64,
    pub rows_flagged: u64,
    pub rows_restored: u64,
    pub restrict_blocks: u64,
    pub overflow_blocks: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub collections: BTreeMap<String, CollectionCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the counters.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        collections: m.collections.clone(),
    })
}
