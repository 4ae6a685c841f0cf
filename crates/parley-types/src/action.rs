//! Parsed actions and their transport envelopes.
//!
//! [`Action`] is the typed form the engine works on. [`ActionEntry`] is the
//! loosely-typed shape that arrives from the command layer: every field is
//! optional and the parsed action is raw JSON, because the engine must skip
//! malformed entries individually instead of rejecting the whole batch.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, Intent};
use crate::ids::GuildId;

/// A typed key/value attribute attached to an action by the intent parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionEntity {
    /// What the value denotes.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// The raw value, e.g. an id or a name.
    pub value: String,
}

impl ActionEntity {
    /// Build an entity from a kind and a value.
    pub fn new(kind: impl Into<EntityKind>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// A single structured action an actor intends to take this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The player's original wording.
    #[serde(default)]
    pub raw_text: String,
    /// The normalized verb.
    pub intent: Intent,
    /// Entities in parser insertion order. Kinds may repeat.
    #[serde(default)]
    pub entities: Vec<ActionEntity>,
}

impl Action {
    /// Build an action from its parts.
    pub fn new(
        raw_text: impl Into<String>,
        intent: impl Into<Intent>,
        entities: Vec<ActionEntity>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            intent: intent.into(),
            entities,
        }
    }

    /// The first non-blank value of the given kind, if any.
    pub fn first_value(&self, kind: &EntityKind) -> Option<&str> {
        self.entities
            .iter()
            .filter(|e| &e.kind == kind)
            .map(|e| e.value.as_str())
            .find(|v| !v.trim().is_empty())
    }
}

/// One submitted action as it arrives from the command layer.
///
/// Nothing here is validated yet; see the engine's intake stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Database id of the acting entity.
    #[serde(default)]
    pub actor_id: Option<i64>,
    /// `"player"` or `"generated_npc"`.
    #[serde(default)]
    pub actor_type: Option<String>,
    /// The parsed action payload: `{raw_text, intent, entities}`.
    #[serde(default)]
    pub parsed_action: Option<serde_json::Value>,
}

/// A full turn's worth of submitted actions for one guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBatch {
    /// The guild all actors must belong to.
    pub guild_id: GuildId,
    /// Submitted actions in arrival order.
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
}
