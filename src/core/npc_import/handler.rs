//! The `!create-npc` command handler.
//!
//! Runs matcher, parser, validator and materializer in sequence for one
//! message. Every failure ends in exactly one private notification and one
//! log event; nothing is ever broadcast and nothing panics.

use tracing::{debug, error, info, trace, warn};

use crate::config::AppConfig;
use crate::core::host::{
    Audience, InboundMessage, MessageHandler, Notification, Notifier, RecordStore,
};

use super::command::{CommandMatcher, DEFAULT_COMMAND};
use super::descriptor::NpcDescriptor;
use super::error::{ImportError, ImportResult};
use super::materializer::{CommitMode, MaterializationReport, RecordPlan};
use super::payload::parse_payload;
use super::row_id::{RowIdAllocator, RowIdGenerator};
use super::validator::{SchemaValidator, ValidationPolicy};

/// Default display name for importer notifications.
pub const DEFAULT_SENDER: &str = "NPC Creator";

/// Behaviour knobs for [`NpcImporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterOptions {
    pub command: String,
    pub sender: String,
    pub policy: ValidationPolicy,
    pub commit: CommitMode,
    pub max_payload_bytes: Option<usize>,
    pub max_list_len: Option<usize>,
}

impl Default for ImporterOptions {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            policy: ValidationPolicy::Presence,
            commit: CommitMode::Direct,
            max_payload_bytes: None,
            max_list_len: None,
        }
    }
}

impl From<&AppConfig> for ImporterOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            command: config.command.token.clone(),
            sender: config.command.sender.clone(),
            policy: config.command.policy,
            commit: config.command.commit,
            max_payload_bytes: config.limits.payload_limit(),
            max_list_len: config.limits.list_limit(),
        }
    }
}

/// Result of handling one message.
#[derive(Debug)]
pub enum HandleOutcome {
    /// Not the import command; nothing happened.
    Ignored,
    Created(MaterializationReport),
    Failed(ImportError),
}

impl HandleOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Turns `!create-npc` commands into character records.
pub struct NpcImporter<S, N, G> {
    matcher: CommandMatcher,
    validator: SchemaValidator,
    options: ImporterOptions,
    store: S,
    notifier: N,
    row_ids: G,
}

impl<S, N, G> NpcImporter<S, N, G>
where
    S: RecordStore,
    N: Notifier,
    G: RowIdGenerator,
{
    pub fn new(options: ImporterOptions, store: S, notifier: N, row_ids: G) -> Self {
        Self {
            matcher: CommandMatcher::new(options.command.clone()),
            validator: SchemaValidator::new(options.policy).with_max_list_len(options.max_list_len),
            options,
            store,
            notifier,
            row_ids,
        }
    }

    pub fn options(&self) -> &ImporterOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (S, N, G) {
        (self.store, self.notifier, self.row_ids)
    }

    /// Run the pipeline without reporting back.
    pub fn import(&mut self, message: &InboundMessage) -> ImportResult<MaterializationReport> {
        let payload = self.matcher.strip(message)?;
        let raw = parse_payload(payload, self.options.max_payload_bytes)?;
        self.validator.validate(&raw)?;

        let npc = NpcDescriptor::from_validated(&raw);
        let plan = {
            let mut row_ids = RowIdAllocator::new(&mut self.row_ids);
            RecordPlan::build(&npc, &message.player_id, &mut row_ids)?
        };
        debug!(npc = %npc.name, records = plan.record_count(), "record plan built");

        plan.commit(&mut self.store, self.options.commit)
    }

    /// Run the pipeline and whisper the outcome to the requester.
    pub fn handle(&mut self, message: &InboundMessage) -> HandleOutcome {
        match self.import(message) {
            Ok(report) => {
                info!(
                    npc = %report.name,
                    character_id = %report.character_id,
                    records = report.total_records(),
                    requester = %message.player_id,
                    "npc created"
                );
                let text = format!("NPC {} created successfully!", report.name);
                self.whisper(message, text);
                HandleOutcome::Created(report)
            }
            Err(err) if err.is_silent() => {
                trace!(kind = %message.kind, "message ignored");
                HandleOutcome::Ignored
            }
            Err(err) => {
                log_failure(&err, message);
                if let Some(text) = err.user_message() {
                    self.whisper(message, text);
                }
                HandleOutcome::Failed(err)
            }
        }
    }

    fn whisper(&mut self, message: &InboundMessage, text: String) {
        self.notifier.notify(Notification {
            audience: Audience::private(message.player_id.clone()),
            sender: self.options.sender.clone(),
            text,
        });
    }
}

impl<S, N, G> MessageHandler for NpcImporter<S, N, G>
where
    S: RecordStore,
    N: Notifier,
    G: RowIdGenerator,
{
    fn on_message(&mut self, message: &InboundMessage) {
        self.handle(message);
    }
}

fn log_failure(err: &ImportError, message: &InboundMessage) {
    let requester = message.player_id.as_str();
    match err {
        ImportError::NotAddressedToUs => {}
        ImportError::InvalidPayloadFormat(reason) => {
            warn!(requester, reason = %reason, "rejected npc payload: invalid JSON");
        }
        ImportError::PayloadTooLarge { len, max } => {
            warn!(requester, len, max, "rejected npc payload: too large");
        }
        ImportError::SchemaValidationFailed(detail) => {
            warn!(requester, detail = %detail, "rejected npc payload: schema validation failed");
        }
        ImportError::RowIdExhausted { attempts } => {
            error!(requester, attempts, "npc import failed: row id generator exhausted");
        }
        ImportError::RecordStoreFailure {
            source,
            written,
            rolled_back,
        } => {
            error!(
                requester,
                error = %source,
                written,
                rolled_back,
                "npc import failed: record store rejected a write"
            );
        }
    }
}
