//! Rule 2: incompatible intent pairs.
//!
//! Two *different* intents aimed at the same target can still be
//! incompatible: one actor cannot take an item while another uses it, and an
//! NPC being attacked cannot also hold a conversation or run a shop. Each
//! [`IntentPairRule`] registers one unordered pair and the conflicts it
//! produces, each limited to certain kinds of target.

use parley_types::{ConflictRecord, GuildId, Intent, ResolutionDetails};
use tracing::debug;

use super::{ActorAction, ConflictLedger, build_record};
use crate::signature::{CHARACTER_PREFIXES, ITEM_PREFIXES, NPC_PREFIXES, TargetSignature};

/// A named conflict produced by a registered intent pair.
#[derive(Debug)]
pub struct PairConflict {
    /// Name embedded in the conflict type: `sim_<name>_on_<sig>`.
    pub name: &'static str,
    /// The conflict only applies to signatures with one of these prefixes.
    pub prefixes: &'static [&'static str],
}

/// An unordered pair of intents that cannot coexist on one target.
#[derive(Debug)]
pub struct IntentPairRule {
    /// One side of the pair.
    pub first: Intent,
    /// The other side of the pair.
    pub second: Intent,
    /// Conflicts raised when the pair meets on a matching target.
    pub conflicts: &'static [PairConflict],
}

const ITEM_CONTENTION: &[PairConflict] = &[PairConflict {
    name: "item_contention",
    prefixes: ITEM_PREFIXES,
}];

const ATTACK_INTERRUPTS_TRADE: &[PairConflict] = &[PairConflict {
    name: "attack_interrupts_trade",
    prefixes: NPC_PREFIXES,
}];

/// Every registered incompatible intent pair.
pub static INTENT_PAIR_RULES: &[IntentPairRule] = &[
    IntentPairRule {
        first: Intent::Take,
        second: Intent::Use,
        conflicts: ITEM_CONTENTION,
    },
    IntentPairRule {
        first: Intent::Take,
        second: Intent::Drop,
        conflicts: ITEM_CONTENTION,
    },
    IntentPairRule {
        first: Intent::Attack,
        second: Intent::Talk,
        conflicts: &[PairConflict {
            name: "attack_interrupts_talk",
            prefixes: CHARACTER_PREFIXES,
        }],
    },
    IntentPairRule {
        first: Intent::Attack,
        second: Intent::TradeViewInventory,
        conflicts: ATTACK_INTERRUPTS_TRADE,
    },
    IntentPairRule {
        first: Intent::Attack,
        second: Intent::TradeBuyItem,
        conflicts: ATTACK_INTERRUPTS_TRADE,
    },
    IntentPairRule {
        first: Intent::Attack,
        second: Intent::TradeSellItem,
        conflicts: ATTACK_INTERRUPTS_TRADE,
    },
];

impl IntentPairRule {
    /// Whether `a` and `b`, in either order, form this pair.
    pub fn matches(&self, a: &Intent, b: &Intent) -> bool {
        (a == &self.first && b == &self.second) || (a == &self.second && b == &self.first)
    }
}

/// The registered pair rule for two intents, if any.
pub fn pair_rule(a: &Intent, b: &Intent) -> Option<&'static IntentPairRule> {
    INTENT_PAIR_RULES.iter().find(|rule| rule.matches(a, b))
}

/// Apply the pair table to every unordered pair of actions in one signature
/// group.
///
/// Records already in `ledger` (from Rule 1 or earlier pairs) are not
/// emitted again.
pub fn apply_intent_pair_rules(
    guild_id: GuildId,
    signature: &TargetSignature,
    group: &[&ActorAction],
    ledger: &mut ConflictLedger,
) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();
    let mut rest = group;

    while let Some((&first, tail)) = rest.split_first() {
        rest = tail;

        for &second in tail {
            if first.actor_key() == second.actor_key() {
                continue;
            }
            let Some(rule) = pair_rule(&first.action.intent, &second.action.intent) else {
                continue;
            };

            for conflict in rule
                .conflicts
                .iter()
                .filter(|c| signature.has_any_prefix(c.prefixes))
            {
                let mut intents = [
                    first.action.intent.as_str().to_owned(),
                    second.action.intent.as_str().to_owned(),
                ];
                intents.sort();

                let conflict_type = format!("sim_{}_on_{}", conflict.name, signature.normalized());
                let details = ResolutionDetails::IntentPair {
                    target_signature: signature.as_str().to_owned(),
                    intents,
                };

                let Some(record) = build_record(guild_id, conflict_type, &[first, second], details)
                else {
                    continue;
                };
                if ledger.admit(&record) {
                    debug!(
                        conflict_type = record.conflict_type,
                        first_actor = %first.actor.id,
                        second_actor = %second.actor.id,
                        "intent pair conflict"
                    );
                    conflicts.push(record);
                }
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::test_support::{GUILD, player_action};
    use super::*;

    fn run_on(signature: &str, actions: &[ActorAction]) -> Vec<ConflictRecord> {
        let group: Vec<&ActorAction> = actions.iter().collect();
        let mut ledger = ConflictLedger::new();
        apply_intent_pair_rules(GUILD, &TargetSignature::new(signature), &group, &mut ledger)
    }

    #[test]
    fn take_and_use_on_one_item_instance() {
        let conflicts = run_on(
            "item_instance:101",
            &[
                player_action(1, "use", &[("target_item_id", "101")]),
                player_action(2, "take", &[("target_item_id", "101")]),
            ],
        );
        assert_eq!(conflicts.len(), 1);
        let record = conflicts.first();
        assert_eq!(
            record.map(|r| r.conflict_type.as_str()),
            Some("sim_item_contention_on_item_instance_101")
        );
        assert_eq!(
            record.and_then(|r| serde_json::to_value(&r.resolution_details).ok()),
            Some(json!({"target_signature": "item_instance:101", "intents": ["take", "use"]}))
        );
    }

    #[test]
    fn take_use_examine_yields_only_the_pair() {
        let conflicts = run_on(
            "item_static:potion_healing_s",
            &[
                player_action(1, "take", &[("item_static_id", "potion_healing_s")]),
                player_action(2, "use", &[("item_static_id", "potion_healing_s")]),
                player_action(3, "examine", &[("item_static_id", "potion_healing_s")]),
            ],
        );
        assert_eq!(conflicts.len(), 1);
        let ids: Vec<i64> = conflicts
            .iter()
            .flat_map(|r| r.involved_entities.iter().map(|e| e.entity_id.into_inner()))
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn attack_interrupts_conversation_and_trade() {
        let conflicts = run_on(
            "npc:5",
            &[
                player_action(1, "attack", &[("target_npc_id", "5")]),
                player_action(2, "talk", &[("target_npc_id", "5")]),
                player_action(3, "trade_buy_item", &[("target_npc_id", "5")]),
            ],
        );
        let types: Vec<&str> = conflicts.iter().map(|r| r.conflict_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["sim_attack_interrupts_talk_on_npc_5", "sim_attack_interrupts_trade_on_npc_5"]
        );
    }

    #[test]
    fn trade_pair_requires_npc_id_target() {
        let conflicts = run_on(
            "npc_name:mira",
            &[
                player_action(1, "attack", &[("target_npc_name", "Mira")]),
                player_action(2, "trade_view_inventory", &[("target_npc_name", "Mira")]),
            ],
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn examine_and_talk_are_not_registered() {
        assert!(pair_rule(&Intent::Examine, &Intent::Talk).is_none());
        let conflicts = run_on(
            "npc:5",
            &[
                player_action(1, "examine", &[("target_npc_id", "5")]),
                player_action(2, "talk", &[("target_npc_id", "5")]),
            ],
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn repeated_pairs_are_deduplicated() {
        // Actor 1 submits the same take twice; only one record survives.
        let conflicts = run_on(
            "item_instance:7",
            &[
                player_action(1, "take", &[("target_item_id", "7")]),
                player_action(1, "take", &[("target_item_id", "7")]),
                player_action(2, "drop", &[("target_item_id", "7")]),
            ],
        );
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn pair_lookup_is_unordered() {
        assert!(pair_rule(&Intent::Use, &Intent::Take).is_some());
        assert!(pair_rule(&Intent::Take, &Intent::Use).is_some());
        assert!(pair_rule(&Intent::Take, &Intent::Take).is_none());
    }
}
