//! NPC Importer Unit Tests
//!
//! Drives `NpcImporter` against mockall collaborators to pin down exactly
//! which store and chat calls each outcome makes.

use mockall::predicate::eq;
use mockall::Sequence;
use rstest::rstest;
use serde_json::Value;

use crate::core::host::{
    InboundMessage, MessageKind, RecordId, RecordKind, StoreError, PARENT_FIELD,
};
use crate::core::npc_import::testing::{grak_command, grak_payload};
use crate::core::npc_import::{
    encode_command, CommitMode, HandleOutcome, ImportError, ImporterOptions, NpcImporter,
    SequentialRowIds, ValidationPolicy, INVALID_NPC_DATA, REQUIRED_FIELDS,
};
use crate::tests::mocks::{
    create_accepting_store, create_silent_chat, create_untouched_store, echo_record,
    expect_one_whisper, MockRowIds, MockStore,
};

fn api(content: impl Into<String>) -> InboundMessage {
    InboundMessage::api("player-1", content)
}

// ============================================================================
// Rejections never touch the store
// ============================================================================

#[rstest]
fn test_missing_field_creates_nothing(
    #[values(
        "name", "race", "class", "level", "strength", "dexterity", "constitution",
        "intelligence", "wisdom", "charisma", "actions", "background",
        "personality_traits", "equipment", "skills", "languages", "appearance"
    )]
    field: &str,
) {
    assert!(REQUIRED_FIELDS.contains(&field));
    let mut raw = grak_payload();
    raw.remove(field);

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        create_untouched_store(),
        expect_one_whisper(|n| n.text == INVALID_NPC_DATA),
        SequentialRowIds::default(),
    );
    let outcome = importer.handle(&api(encode_command("!create-npc", &raw)));
    assert!(matches!(
        outcome,
        HandleOutcome::Failed(ImportError::SchemaValidationFailed(_))
    ));
}

#[rstest]
#[case("!create-npc")]
#[case("!create-npc {")]
#[case("!create-npc not json")]
#[case("!create-npc [\"Grak\"]")]
#[case("!create-npc \"Grak\"")]
#[case("!create-npc {\"name\":\"Grak\",}")]
#[case("!create-npcs {\"name\":\"x\"}")]
fn test_malformed_payload_creates_nothing(#[case] content: &str) {
    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        create_untouched_store(),
        expect_one_whisper(|n| n.text.starts_with("Error: Invalid JSON format.")),
        SequentialRowIds::default(),
    );
    let outcome = importer.handle(&api(content));
    assert!(matches!(
        outcome,
        HandleOutcome::Failed(ImportError::InvalidPayloadFormat(_))
    ));
}

#[rstest]
#[case(MessageKind::General, grak_command())]
#[case(MessageKind::Whisper, grak_command())]
#[case(MessageKind::Api, "!help".to_string())]
fn test_unrelated_messages_are_silent(#[case] kind: MessageKind, #[case] content: String) {
    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        create_untouched_store(),
        create_silent_chat(),
        SequentialRowIds::default(),
    );
    let outcome = importer.handle(&InboundMessage::new(kind, "player-1", content));
    assert!(matches!(outcome, HandleOutcome::Ignored));
}

#[test]
fn test_strict_policy_rejects_before_writing() {
    let mut raw = grak_payload();
    raw.insert("strength".into(), Value::from(40));

    let mut importer = NpcImporter::new(
        ImporterOptions {
            policy: ValidationPolicy::Strict,
            ..ImporterOptions::default()
        },
        create_untouched_store(),
        expect_one_whisper(|n| n.text == INVALID_NPC_DATA),
        SequentialRowIds::default(),
    );
    assert!(!importer.handle(&api(encode_command("!create-npc", &raw))).is_created());
}

#[test]
fn test_list_limit_rejects_before_writing() {
    let mut raw = grak_payload();
    raw.insert(
        "languages".into(),
        Value::from(vec!["Common"; 10]),
    );

    let mut importer = NpcImporter::new(
        ImporterOptions {
            max_list_len: Some(8),
            ..ImporterOptions::default()
        },
        create_untouched_store(),
        expect_one_whisper(|n| n.text == INVALID_NPC_DATA),
        SequentialRowIds::default(),
    );
    assert!(!importer.handle(&api(encode_command("!create-npc", &raw))).is_created());
}

// ============================================================================
// Successful writes
// ============================================================================

#[test]
fn test_character_written_first_then_dependents() {
    let mut seq = Sequence::new();
    let mut store = MockStore::new();
    store
        .expect_create()
        .withf(|r| r.kind == RecordKind::Character && r.get_str("controlledby") == Some("player-1"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|r| {
            let mut n = 0;
            echo_record(&mut n, r)
        });
    store
        .expect_create()
        .withf(|r| r.kind == RecordKind::Attribute && r.parent() == Some(RecordId::from("rec-1")))
        .times(16)
        .in_sequence(&mut seq)
        .returning({
            let mut n = 1;
            move |r| echo_record(&mut n, r)
        });
    store
        .expect_create()
        .withf(|r| r.kind == RecordKind::Ability && r.fields.get(PARENT_FIELD).is_some())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|r| {
            let mut n = 99;
            echo_record(&mut n, r)
        });
    store.expect_remove().never();

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        store,
        expect_one_whisper(|n| n.text == "NPC Grak created successfully!"),
        SequentialRowIds::default(),
    );
    match importer.handle(&api(grak_command())) {
        HandleOutcome::Created(report) => {
            assert_eq!(report.character_id, RecordId::from("rec-1"));
            assert_eq!(report.total_records(), 18);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_row_ids_come_from_injected_generator() {
    let mut ids = MockRowIds::new();
    let mut n = 0;
    ids.expect_next_row_id().times(6).returning(move || {
        n += 1;
        format!("-fixed{n}")
    });

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        create_accepting_store(),
        create_silent_chat(),
        ids,
    );
    match importer.import(&api(grak_command())) {
        Ok(report) => assert_eq!(report.attribute_records, 16),
        Err(e) => panic!("import failed: {e}"),
    }
}

#[test]
fn test_colliding_generator_is_retried() {
    let mut ids = MockRowIds::new();
    let mut calls = 0;
    // Every id is issued twice in a row.
    ids.expect_next_row_id().returning(move || {
        calls += 1;
        format!("-dup{}", (calls + 1) / 2)
    });

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        crate::core::host::InMemoryRecordStore::new(),
        crate::core::host::RecordingNotifier::new(),
        ids,
    );
    let report = importer.import(&api(grak_command())).unwrap();

    let mut rows: Vec<String> = importer
        .store()
        .children(&report.character_id)
        .filter_map(|r| r.name())
        .filter(|n| n.starts_with("repeating_") && !n.ends_with("_description"))
        .map(|n| n.split('_').nth(2).unwrap_or_default().to_string())
        .collect();
    let total = rows.len();
    rows.sort();
    rows.dedup();
    assert_eq!(rows.len(), total);
    assert_eq!(total, 6);
}

#[test]
fn test_stuck_generator_creates_nothing() {
    let mut ids = MockRowIds::new();
    ids.expect_next_row_id().returning(|| "-same".to_string());

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        create_untouched_store(),
        expect_one_whisper(|n| n.text.starts_with("Error creating NPC:")),
        ids,
    );
    assert!(matches!(
        importer.handle(&api(grak_command())),
        HandleOutcome::Failed(ImportError::RowIdExhausted { .. })
    ));
}

// ============================================================================
// Store failures
// ============================================================================

fn failing_store(accept: usize) -> MockStore {
    let mut store = MockStore::new();
    let mut n = 0;
    store.expect_create().returning(move |r| {
        if n >= accept {
            return Err(StoreError::rejected(r.kind, "sandbox quota exceeded"));
        }
        echo_record(&mut n, r)
    });
    store
}

#[test]
fn test_direct_mode_never_removes() {
    let mut store = failing_store(3);
    store.expect_remove().never();

    let mut importer = NpcImporter::new(
        ImporterOptions::default(),
        store,
        expect_one_whisper(|n| {
            n.text == "Error creating NPC: Store rejected attribute record: sandbox quota exceeded"
        }),
        SequentialRowIds::default(),
    );
    assert!(matches!(
        importer.handle(&api(grak_command())),
        HandleOutcome::Failed(ImportError::RecordStoreFailure {
            written: 3,
            rolled_back: false,
            ..
        })
    ));
}

#[test]
fn test_compensate_mode_removes_newest_first() {
    let mut store = failing_store(3);
    let mut seq = Sequence::new();
    for id in ["rec-3", "rec-2", "rec-1"] {
        store
            .expect_remove()
            .with(eq(RecordId::from(id)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
    }

    let mut importer = NpcImporter::new(
        ImporterOptions {
            commit: CommitMode::Compensate,
            ..ImporterOptions::default()
        },
        store,
        expect_one_whisper(|n| n.text.starts_with("Error creating NPC:")),
        SequentialRowIds::default(),
    );
    assert!(matches!(
        importer.handle(&api(grak_command())),
        HandleOutcome::Failed(ImportError::RecordStoreFailure {
            written: 3,
            rolled_back: true,
            ..
        })
    ));
}

#[test]
fn test_failed_rollback_is_reported() {
    let mut store = failing_store(2);
    store
        .expect_remove()
        .times(2)
        .returning(|id| Err(StoreError::NotFound(id.clone())));

    let mut importer = NpcImporter::new(
        ImporterOptions {
            commit: CommitMode::Compensate,
            ..ImporterOptions::default()
        },
        store,
        create_silent_chat(),
        SequentialRowIds::default(),
    );
    match importer.import(&api(grak_command())) {
        Err(err @ ImportError::RecordStoreFailure { rolled_back: false, .. }) => {
            assert!(err.may_leave_records())
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
