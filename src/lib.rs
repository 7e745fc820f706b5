//! npc-bridge - Chat-command NPC importer for virtual tabletops
//!
//! Parses `!create-npc <JSON>` commands, validates the payload, and
//! materializes the character as linked records in the host's object store.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
