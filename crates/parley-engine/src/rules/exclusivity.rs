//! Rule 1: same-intent exclusivity.
//!
//! Some intents can only be carried out by one actor at a time against a
//! given target: two players cannot both pick up the same potion, and two
//! attackers on one NPC need adjudicating. Each [`ExclusivityCategory`] names
//! such a set of intents and, optionally, the kinds of target it applies to.
//!
//! Within one signature group, actions are bucketed by their *specific*
//! intent. A `trade_buy_item` and a `trade_sell_item` on the same merchant
//! share a category but do not conflict with each other under this rule.

use parley_types::{ConflictRecord, GuildId, Intent, ResolutionDetails};
use tracing::debug;

use super::{ActorAction, build_record};
use crate::signature::{
    CHARACTER_PREFIXES, ITEM_PREFIXES, NPC_PREFIXES, OBJECT_PREFIXES, TargetSignature,
};

/// How a category's conflicts are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusivityNaming {
    /// `sim_multi_attack_on_<sig>`.
    MultiAttack,
    /// `sim_item_take_contention_on_<sig>`.
    ItemTakeContention,
    /// `sim_<category>_on_<intent>_for_<sig>`.
    Generic,
}

/// A named set of intents that conflict with themselves.
#[derive(Debug)]
pub struct ExclusivityCategory {
    /// Category name, used in generic conflict names and details.
    pub name: &'static str,
    /// Intents covered by the category.
    pub intents: &'static [Intent],
    /// Signature prefixes the category is limited to; `None` means any.
    pub prefixes: Option<&'static [&'static str]>,
    /// Naming scheme for emitted conflicts.
    pub naming: ExclusivityNaming,
}

/// The exclusivity categories checked in every signature group.
pub static EXCLUSIVITY_CATEGORIES: &[ExclusivityCategory] = &[
    ExclusivityCategory {
        name: "item_manipulation_exclusive",
        intents: &[Intent::Take],
        prefixes: Some(ITEM_PREFIXES),
        naming: ExclusivityNaming::ItemTakeContention,
    },
    ExclusivityCategory {
        name: "object_interaction_exclusive",
        intents: &[Intent::Interact, Intent::Use],
        prefixes: Some(OBJECT_PREFIXES),
        naming: ExclusivityNaming::Generic,
    },
    ExclusivityCategory {
        name: "combat_exclusive",
        intents: &[Intent::Attack],
        prefixes: Some(CHARACTER_PREFIXES),
        naming: ExclusivityNaming::MultiAttack,
    },
    ExclusivityCategory {
        name: "trade_session_exclusive",
        intents: &[
            Intent::TradeViewInventory,
            Intent::TradeBuyItem,
            Intent::TradeSellItem,
        ],
        prefixes: Some(NPC_PREFIXES),
        naming: ExclusivityNaming::Generic,
    },
];

impl ExclusivityCategory {
    /// Whether the category's prefix constraint admits `signature`.
    pub fn applies_to(&self, signature: &TargetSignature) -> bool {
        self.prefixes
            .is_none_or(|prefixes| signature.has_any_prefix(prefixes))
    }

    /// Whether `intent` belongs to this category.
    pub fn covers(&self, intent: &Intent) -> bool {
        self.intents.contains(intent)
    }

    fn conflict_type(&self, signature: &TargetSignature, intent: &Intent) -> String {
        let sig = signature.normalized();
        match self.naming {
            ExclusivityNaming::MultiAttack => format!("sim_multi_attack_on_{sig}"),
            ExclusivityNaming::ItemTakeContention => format!("sim_item_take_contention_on_{sig}"),
            ExclusivityNaming::Generic => format!("sim_{}_on_{intent}_for_{sig}", self.name),
        }
    }

    fn details(&self, signature: &TargetSignature, intent: &Intent) -> ResolutionDetails {
        match self.naming {
            ExclusivityNaming::MultiAttack | ExclusivityNaming::ItemTakeContention => {
                ResolutionDetails::Target {
                    target_signature: signature.as_str().to_owned(),
                }
            }
            ExclusivityNaming::Generic => ResolutionDetails::Exclusivity {
                target_signature: signature.as_str().to_owned(),
                category: self.name.to_owned(),
                conflicting_intent: intent.as_str().to_owned(),
            },
        }
    }
}

/// Apply every exclusivity category to one signature group.
pub fn apply_exclusivity_rules(
    guild_id: GuildId,
    signature: &TargetSignature,
    group: &[&ActorAction],
) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();

    for category in EXCLUSIVITY_CATEGORIES {
        if !category.applies_to(signature) {
            continue;
        }

        // Bucket by specific intent, preserving first-seen order.
        let mut buckets: Vec<(&Intent, Vec<&ActorAction>)> = Vec::new();
        for &entry in group.iter().filter(|e| category.covers(&e.action.intent)) {
            let intent = &entry.action.intent;
            match buckets.iter_mut().find(|(seen, _)| *seen == intent) {
                Some((_, members)) => members.push(entry),
                None => buckets.push((intent, vec![entry])),
            }
        }

        for (intent, members) in buckets {
            let conflict_type = category.conflict_type(signature, intent);
            let details = category.details(signature, intent);
            if let Some(record) = build_record(guild_id, conflict_type, &members, details) {
                debug!(
                    conflict_type = record.conflict_type,
                    category = category.name,
                    actors = record.involved_entities.len(),
                    "exclusivity conflict"
                );
                conflicts.push(record);
            }
        }
    }

    conflicts
}
