//! Command matching for inbound chat messages.

use crate::core::host::{InboundMessage, MessageKind};

use super::error::{ImportError, ImportResult};

/// Default chat command token.
pub const DEFAULT_COMMAND: &str = "!create-npc";

/// Recognises the import command on the script channel.
#[derive(Debug, Clone)]
pub struct CommandMatcher {
    token: String,
}

impl CommandMatcher {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Return the trimmed payload following the token.
    ///
    /// Only `api` messages whose content begins with the token qualify.
    /// Whatever follows the token is handed to the parser, so `!create-npcs`
    /// reaches it as the payload `s`.
    pub fn strip<'a>(&self, message: &'a InboundMessage) -> ImportResult<&'a str> {
        if message.kind != MessageKind::Api {
            return Err(ImportError::NotAddressedToUs);
        }
        message
            .content
            .strip_prefix(self.token.as_str())
            .map(str::trim)
            .ok_or(ImportError::NotAddressedToUs)
    }

    pub fn matches(&self, message: &InboundMessage) -> bool {
        self.strip(message).is_ok()
    }
}

impl Default for CommandMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}
