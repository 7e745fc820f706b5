//! Shared fixtures for importer tests.

use super::descriptor::NpcDescriptor;
use super::payload::{parse_payload, RawDescriptor};

pub const GRAK_JSON: &str = r#"{"name":"Grak","race":"Orc","class":"Fighter","level":3,"strength":16,"dexterity":12,"constitution":14,"intelligence":8,"wisdom":10,"charisma":9,"actions":[{"name":"Slam","description":"2d6 bludgeoning"}],"background":"Former gladiator","personality_traits":["Gruff","Loyal"],"equipment":["Axe","Shield"],"skills":["Athletics"],"languages":["Common","Orcish"],"appearance":"Scarred and massive"}"#;

pub fn grak_payload() -> RawDescriptor {
    parse_payload(GRAK_JSON, None).expect("fixture is valid JSON")
}

pub fn grak() -> NpcDescriptor {
    NpcDescriptor::from_validated(&grak_payload())
}

pub fn grak_command() -> String {
    format!("!create-npc {GRAK_JSON}")
}
