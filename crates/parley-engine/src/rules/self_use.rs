//! Rule 3: using an item on oneself while another actor takes it.
//!
//! A self-targeted `use` has the signature `use_on_self:<item-ref>` while a
//! `take` of the same item has the signature `<item-ref>`, so the two never
//! land in the same signature group. This rule scans the whole batch and
//! matches them by item reference instead.

use std::collections::BTreeMap;

use parley_types::{ConflictRecord, GuildId, Intent, ResolutionDetails};
use tracing::debug;

use super::{ActorAction, ConflictLedger, build_record};
use crate::signature::{USE_ON_SELF_PREFIX, normalize_signature};

/// Match every self-use against every take of the same item.
///
/// Deduplicated against its own output only; the per-group rules keep a
/// separate ledger.
pub fn apply_self_use_rule(guild_id: GuildId, actions: &[ActorAction]) -> Vec<ConflictRecord> {
    let self_uses: Vec<(&ActorAction, &str)> = actions
        .iter()
        .filter_map(|entry| {
            let signature = entry.signature.as_ref()?;
            signature
                .as_str()
                .strip_prefix(USE_ON_SELF_PREFIX)
                .map(|item_ref| (entry, item_ref))
        })
        .collect();

    if self_uses.is_empty() {
        return Vec::new();
    }

    let mut takes: BTreeMap<&str, Vec<&ActorAction>> = BTreeMap::new();
    for entry in actions.iter().filter(|e| e.action.intent == Intent::Take) {
        if let Some(signature) = &entry.signature {
            takes.entry(signature.as_str()).or_default().push(entry);
        }
    }

    let mut ledger = ConflictLedger::new();
    let mut conflicts = Vec::new();

    for (user, item_ref) in self_uses {
        let Some(takers) = takes.get(item_ref) else {
            continue;
        };

        for &taker in takers {
            let conflict_type = format!(
                "sim_item_use_self_vs_take_{}",
                normalize_signature(item_ref)
            );
            let details = ResolutionDetails::SelfUseVsTake {
                item_signature: item_ref.to_owned(),
            };

            let Some(record) = build_record(guild_id, conflict_type, &[user, taker], details)
            else {
                continue;
            };
            if ledger.admit(&record) {
                debug!(
                    conflict_type = record.conflict_type,
                    user = %user.actor.id,
                    taker = %taker.actor.id,
                    "self-use versus take conflict"
                );
                conflicts.push(record);
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

    #[test]
    fn self_use_against_take_of_same_static_item() {
        let actions = [
            player_action(1, "use", &[("item_static_id", "potion_healing_s")]),
            player_action(2, "take", &[("item_static_id", "potion_healing_s")]),
        ];
        let conflicts = apply_self_use_rule(GUILD, &actions);
        assert_eq!(conflicts.len(), 1);
        let record = conflicts.first();
        assert_eq!(
            record.map(|r| r.conflict_type.as_str()),
            Some("sim_item_use_self_vs_take_item_static_potion_healing_s")
        );
        assert_eq!(
            record.and_then(|r| serde_json::to_value(&r.resolution_details).ok()),
            Some(json!({"item_signature": "item_static:potion_healing_s"}))
        );
    }

    #[test]
    fn one_record_per_taker() {
        let actions = [
            player_action(1, "use", &[("target_item_id", "42")]),
            player_action(2, "take", &[("target_item_id", "42")]),
            player_action(3, "take", &[("target_item_id", "42")]),
        ];
        let conflicts = apply_self_use_rule(GUILD, &actions);
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn targeted_use_is_not_self_use() {
        let actions = [
            player_action(1, "use", &[("item_static_id", "bandage"), ("target_player_id", "2")]),
            player_action(2, "take", &[("item_static_id", "bandage")]),
        ];
        assert!(apply_self_use_rule(GUILD, &actions).is_empty());
    }

    #[test]
    fn different_reference_kinds_do_not_match() {
        // Instance 42 and static "rope" may be the same thing in the world,
        // but their signatures differ.
        let actions = [
            player_action(1, "use", &[("target_item_id", "42")]),
            player_action(2, "take", &[("item_static_id", "rope")]),
        ];
        assert!(apply_self_use_rule(GUILD, &actions).is_empty());
    }

    #[test]
    fn own_take_is_ignored_and_repeats_collapse() {
        let actions = [
            player_action(1, "use", &[("item_name", "Rope")]),
            player_action(1, "take", &[("item_name", "rope")]),
            player_action(1, "use", &[("item_name", "ROPE")]),
            player_action(2, "take", &[("item_name", "Rope")]),
        ];
        let conflicts = apply_self_use_rule(GUILD, &actions);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts.first().map(|r| r.conflict_type.as_str()),
            Some("sim_item_use_self_vs_take_item_name_rope")
        );
    }
}
