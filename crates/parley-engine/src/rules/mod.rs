//! Conflict rules applied during a simulation pass.
//!
//! Every rule is driven by a static table; none of them hold state between
//! passes.
//!
//! # Submodules
//!
//! - [`exclusivity`] -- Rule 1: several actors issuing the same exclusive
//!   intent at one target.
//! - [`intent_pairs`] -- Rule 2: two different intents registered as
//!   incompatible at one target.
//! - [`self_use`] -- Rule 3: using an item on oneself while another actor
//!   takes that same item.

pub mod exclusivity;
pub mod intent_pairs;
pub mod self_use;

use std::collections::BTreeSet;

use parley_types::{
    Action, Actor, ActorId, ActorType, ConflictKey, ConflictRecord, ConflictStatus, GuildId,
    InvolvedEntity, ResolutionDetails,
};

use crate::signature::{TargetSignature, extract_signature};

/// A resolved actor paired with the action they submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorAction {
    /// Who is acting.
    pub actor: Actor,
    /// What they intend to do.
    pub action: Action,
    /// The action's target signature, computed once at construction.
    pub signature: Option<TargetSignature>,
}

impl ActorAction {
    /// Pair an actor with an action and derive the action's signature.
    pub fn new(actor: Actor, action: Action) -> Self {
        let signature = extract_signature(&action);
        Self {
            actor,
            action,
            signature,
        }
    }

    /// The actor's identity, unique across players and NPCs.
    pub const fn actor_key(&self) -> (ActorId, ActorType) {
        (self.actor.id, self.actor.entity_type)
    }

    /// This actor's side of a conflict record.
    pub fn involved(&self) -> InvolvedEntity {
        InvolvedEntity {
            entity_id: self.actor.id,
            entity_type: self.actor.entity_type,
            action_intent: self.action.intent.as_str().to_owned(),
            action_text: self.action.raw_text.clone(),
            action_entities: self.action.entities.clone(),
        }
    }
}

/// Build a conflict record from the given participants.
///
/// Participants are deduplicated by actor, keeping each actor's first
/// action. Returns `None` unless at least two distinct actors remain.
pub(crate) fn build_record(
    guild_id: GuildId,
    conflict_type: String,
    participants: &[&ActorAction],
    resolution_details: ResolutionDetails,
) -> Option<ConflictRecord> {
    let mut seen = BTreeSet::new();
    let involved_entities: Vec<InvolvedEntity> = participants
        .iter()
        .filter(|p| seen.insert(p.actor_key()))
        .map(|p| p.involved())
        .collect();

    if involved_entities.len() < 2 {
        return None;
    }

    Some(ConflictRecord {
        guild_id,
        conflict_type,
        status: ConflictStatus::SimulatedInternalConflict,
        involved_entities,
        resolution_details,
        turn_number: 0,
    })
}

/// Tracks which conflicts have already been emitted in a dedup scope.
#[derive(Debug, Clone, Default)]
pub struct ConflictLedger {
    seen: BTreeSet<ConflictKey>,
}

impl ConflictLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conflict. Returns `false` if an identical one was already
    /// recorded.
    pub fn admit(&mut self, record: &ConflictRecord) -> bool {
        self.seen.insert(record.key())
    }

    /// Number of distinct conflicts recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use parley_types::ActorType;

    use super::test_support::{GUILD, actor_action, player_action};
    use super::*;

    fn details() -> ResolutionDetails {
        ResolutionDetails::Target {
            target_signature: "npc:1".to_owned(),
        }
    }

    #[test]
    fn record_requires_two_distinct_actors() {
        let first = player_action(1, "attack", &[("target_npc_id", "1")]);
        let again = player_action(1, "attack", &[("target_npc_id", "1")]);
        assert!(build_record(GUILD, "t".to_owned(), &[&first, &again], details()).is_none());

        let other = player_action(2, "attack", &[("target_npc_id", "1")]);
        let record = build_record(GUILD, "t".to_owned(), &[&first, &again, &other], details());
        assert_eq!(record.map(|r| r.involved_entities.len()), Some(2));
    }

    #[test]
    fn player_and_npc_with_same_id_are_distinct() {
        let player = player_action(5, "attack", &[("target_npc_id", "1")]);
        let npc = actor_action(5, ActorType::GeneratedNpc, "attack", &[("target_npc_id", "1")]);
        let record = build_record(GUILD, "t".to_owned(), &[&player, &npc], details());
        assert!(record.is_some());
    }

    #[test]
    fn ledger_rejects_repeats() {
        let a = player_action(1, "attack", &[("target_npc_id", "1")]);
        let b = player_action(2, "attack", &[("target_npc_id", "1")]);
        let forward = build_record(GUILD, "t".to_owned(), &[&a, &b], details());
        let backward = build_record(GUILD, "t".to_owned(), &[&b, &a], details());

        let mut ledger = ConflictLedger::new();
        assert!(forward.as_ref().is_some_and(|r| ledger.admit(r)));
        assert!(backward.as_ref().is_some_and(|r| !ledger.admit(r)));
        assert_eq!(ledger.len(), 1);
    }
}
