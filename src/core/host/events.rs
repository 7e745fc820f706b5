//! Inbound chat events and the sources that deliver them.
//!
//! Delivery is fire-and-forget: there is no acknowledgement and no
//! redelivery, and messages arrive in the order they were sent.

use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Chat message type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Script command channel; never shown to players.
    Api,
    General,
    Whisper,
    Emote,
    RollResult,
    Other(String),
}

impl FromStr for MessageKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "api" => Self::Api,
            "general" => Self::General,
            "whisper" => Self::Whisper,
            "emote" => Self::Emote,
            "rollresult" => Self::RollResult,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::General => f.write_str("general"),
            Self::Whisper => f.write_str("whisper"),
            Self::Emote => f.write_str("emote"),
            Self::RollResult => f.write_str("rollresult"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// A chat message as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub kind: MessageKind,
    pub content: String,
    /// Id of the player who sent the message.
    pub player_id: String,
    /// Display name of the sender.
    pub who: String,
}

impl InboundMessage {
    pub fn new(kind: MessageKind, player_id: impl Into<String>, content: impl Into<String>) -> Self {
        let player_id = player_id.into();
        Self {
            kind,
            content: content.into(),
            who: player_id.clone(),
            player_id,
        }
    }

    /// Shorthand for a script-channel message.
    pub fn api(player_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Api, player_id, content)
    }

    pub fn with_who(mut self, who: impl Into<String>) -> Self {
        self.who = who.into();
        self
    }
}

/// Something that reacts to inbound messages.
pub trait MessageHandler {
    fn on_message(&mut self, message: &InboundMessage);
}

/// Delivers inbound messages in arrival order.
pub trait EventSource {
    /// Next message, or `None` once the source is exhausted.
    fn next_message(&mut self) -> Option<InboundMessage>;
}

/// Drive `handler` until `source` is exhausted. Returns the number of
/// messages delivered.
pub fn run<E, H>(source: &mut E, handler: &mut H) -> usize
where
    E: EventSource + ?Sized,
    H: MessageHandler + ?Sized,
{
    let mut delivered = 0;
    while let Some(message) = source.next_message() {
        handler.on_message(&message);
        delivered += 1;
    }
    debug!(delivered, "event source exhausted");
    delivered
}

/// Event source fed from other threads over a crossbeam channel.
pub struct ChannelEventSource {
    rx: Receiver<InboundMessage>,
}

impl ChannelEventSource {
    /// Create an unbounded channel and the source reading from it.
    pub fn channel() -> (Sender<InboundMessage>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Self { rx })
    }
}

impl EventSource for ChannelEventSource {
    fn next_message(&mut self) -> Option<InboundMessage> {
        self.rx.recv().ok()
    }
}

/// Event source reading one message per line.
///
/// Lines are either `<kind>|<player_id>|<content>` or a bare command starting
/// with `!`, which is treated as an api message from the default player.
/// Blank lines and lines starting with `#` are skipped.
pub struct LineEventSource<R: BufRead> {
    reader: R,
    default_player: String,
    line_no: usize,
}

impl<R: BufRead> LineEventSource<R> {
    pub fn new(reader: R, default_player: impl Into<String>) -> Self {
        Self {
            reader,
            default_player: default_player.into(),
            line_no: 0,
        }
    }

    fn parse_line(&self, line: &str) -> InboundMessage {
        if line.starts_with('!') {
            return InboundMessage::api(self.default_player.clone(), line);
        }
        let mut parts = line.splitn(3, '|');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(player), Some(content)) => {
                let kind = kind.parse().unwrap_or(MessageKind::General);
                InboundMessage::new(kind, player.trim(), content)
            }
            _ => InboundMessage::new(MessageKind::General, self.default_player.clone(), line),
        }
    }
}

impl<R: BufRead> EventSource for LineEventSource<R> {
    /// Lines that are not valid UTF-8 are skipped; only I/O errors end the
    /// stream.
    fn next_message(&mut self) -> Option<InboundMessage> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let text = match std::str::from_utf8(&buf) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(line = self.line_no, error = %e, "skipping line that is not UTF-8");
                            continue;
                        }
                    };
                    let line = text.trim_end_matches(['\r', '\n']);
                    if line.trim().is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(self.parse_line(line));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(line = self.line_no + 1, error = %e, "stopped reading messages");
                    return None;
                }
            }
        }
    }
}
