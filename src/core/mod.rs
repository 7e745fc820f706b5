pub mod logging;

// Host collaborators: record store, notifications, inbound events
pub mod host;

// `!create-npc` command pipeline
pub mod npc_import;
