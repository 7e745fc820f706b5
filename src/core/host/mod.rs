//! Host collaborators.
//!
//! The virtual tabletop owns the object store, the chat transport and event
//! delivery. This module describes each one as a trait the importer is
//! constructed with, and provides in-process implementations used by the
//! binary and the tests.
//!
//! # Modules
//!
//! - `record` - Record ids, kinds and field maps
//! - `store` - `RecordStore` trait and `InMemoryRecordStore`
//! - `notify` - `Notifier` trait, audiences and chat rendering
//! - `events` - Inbound messages and event sources
//! - `error` - Store error types

pub mod error;
pub mod events;
pub mod notify;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use events::{
    run, ChannelEventSource, EventSource, InboundMessage, LineEventSource, MessageHandler,
    MessageKind,
};
pub use notify::{Audience, Notification, Notifier, RecordingNotifier, WriterNotifier};
pub use record::{Fields, NewRecord, Record, RecordId, RecordKind, PARENT_FIELD};
pub use store::{InMemoryRecordStore, RecordStore};
