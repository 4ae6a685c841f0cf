//! Conflict records produced by a simulation pass.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::action::ActionEntity;
use crate::enums::{ActorType, ConflictStatus};
use crate::ids::{ActorId, GuildId};

/// One actor's side of a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvolvedEntity {
    /// Database id of the actor.
    pub entity_id: ActorId,
    /// Player or generated NPC.
    pub entity_type: ActorType,
    /// The intent of the conflicting action, as its wire string.
    pub action_intent: String,
    /// The actor's original wording.
    pub action_text: String,
    /// The entities of the conflicting action.
    pub action_entities: Vec<ActionEntity>,
}

/// Rule-specific explanation attached to a conflict.
///
/// Serializes as a flat JSON map; which keys appear depends on the rule that
/// produced the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionDetails {
    /// Same intent from an exclusivity category without a dedicated name.
    Exclusivity {
        /// The shared target.
        target_signature: String,
        /// The exclusivity category that matched.
        category: String,
        /// The intent every involved actor issued.
        conflicting_intent: String,
    },
    /// Two different intents registered as incompatible.
    IntentPair {
        /// The shared target.
        target_signature: String,
        /// Both intents, sorted.
        intents: [String; 2],
    },
    /// Same intent from a category with a dedicated conflict name.
    Target {
        /// The shared target.
        target_signature: String,
    },
    /// Using an item on oneself while someone else takes it.
    SelfUseVsTake {
        /// The contested item reference.
        item_signature: String,
    },
}

impl ResolutionDetails {
    /// The signature the conflict is about: a target signature, or the item
    /// signature for self-use conflicts.
    pub fn signature(&self) -> &str {
        match self {
            Self::Exclusivity {
                target_signature, ..
            }
            | Self::IntentPair {
                target_signature, ..
            }
            | Self::Target { target_signature } => target_signature,
            Self::SelfUseVsTake { item_signature } => item_signature,
        }
    }
}

/// A group of actions judged mutually incompatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// The guild the pass ran for.
    pub guild_id: GuildId,
    /// Rule-derived conflict name, e.g. `sim_multi_attack_on_npc_1`.
    pub conflict_type: String,
    /// Always [`ConflictStatus::SimulatedInternalConflict`].
    pub status: ConflictStatus,
    /// The actors involved, at least two, unique per actor.
    pub involved_entities: Vec<InvolvedEntity>,
    /// Rule-specific details.
    pub resolution_details: ResolutionDetails,
    /// Always `0`; the caller assigns the real turn.
    pub turn_number: u64,
}

impl ConflictRecord {
    /// The identity used to deduplicate records.
    pub fn key(&self) -> ConflictKey {
        ConflictKey {
            conflict_type: self.conflict_type.clone(),
            actors: self
                .involved_entities
                .iter()
                .map(|e| (e.entity_id, e.entity_type, e.action_intent.clone()))
                .collect(),
            signature: self.resolution_details.signature().to_owned(),
        }
    }
}

/// Order-independent identity of a [`ConflictRecord`].
///
/// Two records with equal keys describe the same conflict even if their
/// involved entities were listed in a different order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConflictKey {
    /// The conflict name.
    pub conflict_type: String,
    /// `(actor id, actor type, intent)` for every involved actor.
    pub actors: BTreeSet<(ActorId, ActorType, String)>,
    /// Target or item signature.
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn involved(id: i64, intent: &str) -> InvolvedEntity {
        InvolvedEntity {
            entity_id: ActorId::new(id),
            entity_type: ActorType::Player,
            action_intent: intent.to_owned(),
            action_text: String::new(),
            action_entities: Vec::new(),
        }
    }

    fn record(entities: Vec<InvolvedEntity>) -> ConflictRecord {
        ConflictRecord {
            guild_id: GuildId::new(1),
            conflict_type: "sim_item_contention_on_item_instance_101".to_owned(),
            status: ConflictStatus::SimulatedInternalConflict,
            involved_entities: entities,
            resolution_details: ResolutionDetails::IntentPair {
                target_signature: "item_instance:101".to_owned(),
                intents: ["take".to_owned(), "use".to_owned()],
            },
            turn_number: 0,
        }
    }

    #[test]
    fn key_ignores_entity_order() {
        let a = record(vec![involved(1, "take"), involved(2, "use")]);
        let b = record(vec![involved(2, "use"), involved(1, "take")]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().signature, "item_instance:101");
    }

    #[test]
    fn details_serialize_as_flat_maps() {
        let pair = record(Vec::new()).resolution_details;
        assert_eq!(
            serde_json::to_value(&pair).ok(),
            Some(json!({"target_signature": "item_instance:101", "intents": ["take", "use"]}))
        );

        let self_use = ResolutionDetails::SelfUseVsTake {
            item_signature: "item_static:rope".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&self_use).ok(),
            Some(json!({"item_signature": "item_static:rope"}))
        );
    }

    #[test]
    fn details_deserialize_to_most_specific_variant() {
        let parsed: Result<ResolutionDetails, _> = serde_json::from_value(json!({
            "target_signature": "obj_static:lever",
            "category": "object_interaction_exclusive",
            "conflicting_intent": "interact"
        }));
        assert!(matches!(parsed, Ok(ResolutionDetails::Exclusivity { .. })));

        let parsed: Result<ResolutionDetails, _> =
            serde_json::from_value(json!({"target_signature": "npc:1"}));
        assert!(matches!(parsed, Ok(ResolutionDetails::Target { .. })));
    }
}
