//! Mock implementations for testing
//!
//! mockall doubles of the host collaborator traits, so importer behaviour
//! can be pinned down call by call.

#![allow(dead_code)]

use mockall::mock;

use crate::core::host::{
    NewRecord, Notification, Notifier, Record, RecordId, RecordStore, StoreResult,
};
use crate::core::npc_import::RowIdGenerator;

// ============================================================================
// Record Store Mock
// ============================================================================

mock! {
    pub Store {}

    impl RecordStore for Store {
        fn create(&mut self, record: NewRecord) -> StoreResult<Record>;
        fn remove(&mut self, id: &RecordId) -> StoreResult<()>;
    }
}

// ============================================================================
// Notifier Mock
// ============================================================================

mock! {
    pub Chat {}

    impl Notifier for Chat {
        fn notify(&mut self, notification: Notification);
    }
}

// ============================================================================
// Row Id Mock
// ============================================================================

mock! {
    pub RowIds {}

    impl RowIdGenerator for RowIds {
        fn next_row_id(&mut self) -> String;
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Echo a new record back as created, with ids `rec-1`, `rec-2`, ...
pub fn echo_record(seq: &mut usize, record: NewRecord) -> StoreResult<Record> {
    *seq += 1;
    Ok(Record {
        id: RecordId::from(format!("rec-{seq}")),
        kind: record.kind,
        fields: record.fields,
    })
}

/// A store that accepts every write.
pub fn create_accepting_store() -> MockStore {
    let mut store = MockStore::new();
    let mut seq = 0;
    store
        .expect_create()
        .returning(move |record| echo_record(&mut seq, record));
    store
}

/// A store that must never be written to.
pub fn create_untouched_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_create().never();
    store.expect_remove().never();
    store
}

/// A notifier expecting exactly one private whisper satisfying `check`.
pub fn expect_one_whisper<F>(check: F) -> MockChat
where
    F: Fn(&Notification) -> bool + Send + 'static,
{
    let mut chat = MockChat::new();
    chat.expect_notify()
        .withf(move |n| n.audience.is_private() && check(n))
        .times(1)
        .return_const(());
    chat
}

/// A notifier that must stay silent.
pub fn create_silent_chat() -> MockChat {
    let mut chat = MockChat::new();
    chat.expect_notify().never();
    chat
}
