//! NPC descriptor: the typed view of a validated payload.
//!
//! Conversion is lenient by design of the presence policy. Scalar attribute
//! values keep their JSON form, text fields are rendered for display, a
//! non-list value in a list field becomes a single entry, and `null` becomes
//! an empty list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::RawDescriptor;

// ============================================================================
// Schema
// ============================================================================

/// Every key a payload must carry.
pub const REQUIRED_FIELDS: [&str; 17] = [
    "name",
    "race",
    "class",
    "level",
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
    "actions",
    "background",
    "personality_traits",
    "equipment",
    "skills",
    "languages",
    "appearance",
];

/// The six ability scores.
pub const ABILITY_FIELDS: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// Fields written as the fixed scalar attribute records.
pub const SCALAR_ATTRIBUTES: [&str; 9] = [
    "race",
    "class",
    "level",
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// Free-text fields that must be strings under the strict policy.
pub const TEXT_FIELDS: [&str; 5] = ["name", "race", "class", "background", "appearance"];

/// Repeating list fields as `(payload key, group, column)`.
pub const LIST_FIELDS: [(&str, &str, &str); 3] = [
    ("equipment", "equipment", "itemname"),
    ("skills", "skills", "skillname"),
    ("languages", "languages", "language"),
];

pub const ACTIONS_FIELD: &str = "actions";
pub const ACTION_GROUP: &str = "npcaction";
pub const PERSONALITY_FIELD: &str = "personality_traits";
pub const IMAGE_URL_FIELD: &str = "image_url";

// ============================================================================
// Descriptor
// ============================================================================

/// One entry of the action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A validated NPC ready for materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDescriptor {
    pub name: String,
    pub race: Value,
    pub class: Value,
    pub level: Value,
    pub strength: Value,
    pub dexterity: Value,
    pub constitution: Value,
    pub intelligence: Value,
    pub wisdom: Value,
    pub charisma: Value,
    pub actions: Vec<ActionDescriptor>,
    pub background: String,
    pub personality_traits: Vec<String>,
    pub equipment: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub appearance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NpcDescriptor {
    /// Build from a payload that passed schema validation.
    pub fn from_validated(raw: &RawDescriptor) -> Self {
        let field = |key: &str| raw.get(key).unwrap_or(&Value::Null);

        Self {
            name: display(field("name")),
            race: field("race").clone(),
            class: field("class").clone(),
            level: field("level").clone(),
            strength: field("strength").clone(),
            dexterity: field("dexterity").clone(),
            constitution: field("constitution").clone(),
            intelligence: field("intelligence").clone(),
            wisdom: field("wisdom").clone(),
            charisma: field("charisma").clone(),
            actions: to_actions(field(ACTIONS_FIELD)),
            background: display(field("background")),
            personality_traits: to_list(field(PERSONALITY_FIELD)),
            equipment: to_list(field("equipment")),
            skills: to_list(field("skills")),
            languages: to_list(field("languages")),
            appearance: display(field("appearance")),
            image_url: raw
                .get(IMAGE_URL_FIELD)
                .and_then(Value::as_str)
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string),
        }
    }

    /// The nine scalar attributes in write order.
    pub fn scalar_attributes(&self) -> [(&'static str, &Value); 9] {
        [
            ("race", &self.race),
            ("class", &self.class),
            ("level", &self.level),
            ("strength", &self.strength),
            ("dexterity", &self.dexterity),
            ("constitution", &self.constitution),
            ("intelligence", &self.intelligence),
            ("wisdom", &self.wisdom),
            ("charisma", &self.charisma),
        ]
    }

    /// Repeating lists as `(group, column, items)` in write order.
    pub fn repeating_lists(&self) -> [(&'static str, &'static str, &[String]); 3] {
        let [(_, eq_group, eq_col), (_, sk_group, sk_col), (_, la_group, la_col)] = LIST_FIELDS;
        [
            (eq_group, eq_col, self.equipment.as_slice()),
            (sk_group, sk_col, self.skills.as_slice()),
            (la_group, la_col, self.languages.as_slice()),
        ]
    }

    /// Personality traits as a single display string.
    pub fn personality_line(&self) -> String {
        self.personality_traits.join(",")
    }

    /// Background paragraph followed by the personality paragraph.
    pub fn narrative(&self) -> String {
        format!(
            "Background: {}\n\nPersonality Traits: {}\n\n",
            self.background,
            self.personality_line()
        )
    }

    /// Number of rows across all repeating lists, actions excluded.
    pub fn list_rows(&self) -> usize {
        self.equipment.len() + self.skills.len() + self.languages.len()
    }

    /// Render as a chat command line.
    pub fn to_command(&self, token: &str) -> Result<String, serde_json::Error> {
        Ok(format!("{token} {}", serde_json::to_string(self)?))
    }
}

/// Display form of a JSON value: strings unquoted, `null` empty.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(display).collect(),
        other => vec![display(other)],
    }
}

fn to_actions(value: &Value) -> Vec<ActionDescriptor> {
    let one = |v: &Value| match v {
        Value::Object(obj) => ActionDescriptor::new(
            display(obj.get("name").unwrap_or(&Value::Null)),
            display(obj.get("description").unwrap_or(&Value::Null)),
        ),
        other => ActionDescriptor::new(display(other), ""),
    };
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(one).collect(),
        other => vec![one(other)],
    }
}
