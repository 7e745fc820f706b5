//! Property-based tests for npc-bridge
//!
//! ## Test Modules
//!
//! - `importer_props`: end-to-end properties of the `!create-npc` pipeline
//!   - Record counts follow the list lengths
//!   - Row ids are distinct within an import
//!   - Rejected payloads create nothing and whisper exactly once
//!
//! - `row_id_props`: row id generation
//!   - Ids never contain the group separator
//!   - Seeded generators are deterministic
//!   - The allocator never repeats an id
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```
