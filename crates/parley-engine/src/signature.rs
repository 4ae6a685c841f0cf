//! Target signatures: a canonical string for what an action is aimed at.
//!
//! Two actions with equal signatures are considered to target the same
//! thing, so the signature is the grouping key for the conflict rules.
//! Extraction dispatches on [`Intent`] and then walks a fixed priority list
//! of entity kinds, returning on the first non-blank match. Identifiers are
//! kept verbatim; names are lowercased.
//!
//! | Intent | Signature shapes, in priority order |
//! |--------|-------------------------------------|
//! | attack, talk, trade_* | `npc:`, `player:`, `npc_name:` |
//! | take, drop | `item_instance:`, `item_static:`, `item_name:` |
//! | interact | `obj_static:`, `obj_name:` |
//! | use | `use:<ref>@target:npc:`, `use:<ref>@target:player:`, `use_on_self:<ref>` |
//! | move | `location_static:`, `location_name:`, `direction:` |
//! | go_to | `subloc_static:`, `subloc_name:`, `point_name:` |
//! | examine | item, object, character ids, then names |
//!
//! Anything else falls through to `generic_target:<type>:<value>` when the
//! action carries exactly one meaningful entity.

use parley_types::{Action, EntityKind, Intent};
use serde::{Deserialize, Serialize};

/// Prefix of signatures produced by using an item or skill on oneself.
pub const USE_ON_SELF_PREFIX: &str = "use_on_self:";

/// Prefixes of signatures that point at an item.
pub const ITEM_PREFIXES: &[&str] = &["item_instance:", "item_static:", "item_name:"];

/// Prefixes of signatures that point at a world object.
pub const OBJECT_PREFIXES: &[&str] = &["obj_static:", "obj_name:"];

/// Prefixes of signatures that point at an NPC or player.
pub const CHARACTER_PREFIXES: &[&str] = &["npc:", "player:", "npc_name:"];

/// Prefixes of signatures that point at an NPC by id.
pub const NPC_PREFIXES: &[&str] = &["npc:"];

/// Entity kinds never used on their own as a generic target.
const FALLBACK_EXCLUDED_KINDS: &[EntityKind] = &[
    EntityKind::Direction,
    EntityKind::Manner,
    EntityKind::GeneralConcept,
    EntityKind::Conjunction,
];

/// Pronouns and deictic words that never identify a target.
const FALLBACK_STOPWORDS: &[&str] = &["it", "them", "self", "myself", "here", "there"];

/// A canonical target key derived from one [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSignature(String);

impl TargetSignature {
    /// Wrap an already-canonical signature string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The signature text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the signature starts with any of `prefixes`.
    pub fn has_any_prefix(&self, prefixes: &[&str]) -> bool {
        prefixes.iter().any(|p| self.0.starts_with(p))
    }

    /// The signature rewritten for embedding in a conflict type name.
    pub fn normalized(&self) -> String {
        normalize_signature(&self.0)
    }
}

impl core::fmt::Display for TargetSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace separators and whitespace with `_` so a signature can be part of
/// an identifier-like conflict name.
pub fn normalize_signature(signature: &str) -> String {
    signature
        .chars()
        .map(|c| if c == ':' || c.is_whitespace() { '_' } else { c })
        .collect()
}

// ---------------------------------------------------------------------------
// Priority tables
// ---------------------------------------------------------------------------

/// How a matched value is rendered into the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Render {
    /// Identifiers: kept as given.
    Verbatim,
    /// Names and directions: lowercased.
    Lowercase,
}

/// One step of a priority list: look for `kind`, emit `<prefix>:<value>`.
#[derive(Debug)]
struct Probe {
    kind: EntityKind,
    prefix: &'static str,
    render: Render,
}

impl Probe {
    const fn id(kind: EntityKind, prefix: &'static str) -> Self {
        Self {
            kind,
            prefix,
            render: Render::Verbatim,
        }
    }

    const fn name(kind: EntityKind, prefix: &'static str) -> Self {
        Self {
            kind,
            prefix,
            render: Render::Lowercase,
        }
    }
}

const CHARACTER_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::TargetNpcId, "npc"),
    Probe::id(EntityKind::TargetPlayerId, "player"),
    Probe::name(EntityKind::TargetNpcName, "npc_name"),
];

const ITEM_REFERENCES: &[Probe] = &[
    Probe::id(EntityKind::TargetItemId, "item_instance"),
    Probe::id(EntityKind::ItemStaticId, "item_static"),
    Probe::name(EntityKind::ItemName, "item_name"),
];

const SKILL_REFERENCES: &[Probe] = &[
    Probe::id(EntityKind::SkillId, "skill"),
    Probe::name(EntityKind::SkillName, "skill"),
];

const OBJECT_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::TargetObjectStaticId, "obj_static"),
    Probe::name(EntityKind::TargetObjectName, "obj_name"),
];

const USE_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::TargetNpcId, "npc"),
    Probe::id(EntityKind::TargetPlayerId, "player"),
];

const LOCATION_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::LocationStaticId, "location_static"),
    Probe::name(EntityKind::LocationName, "location_name"),
    Probe::name(EntityKind::Direction, "direction"),
];

const SUBLOCATION_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::TargetSublocationStaticId, "subloc_static"),
    Probe::name(EntityKind::TargetSublocationName, "subloc_name"),
    Probe::name(EntityKind::TargetPointName, "point_name"),
];

const EXAMINE_TARGETS: &[Probe] = &[
    Probe::id(EntityKind::TargetItemId, "item_instance"),
    Probe::id(EntityKind::ItemStaticId, "item_static"),
    Probe::id(EntityKind::TargetObjectStaticId, "obj_static"),
    Probe::id(EntityKind::TargetNpcId, "npc"),
    Probe::id(EntityKind::TargetPlayerId, "player"),
    Probe::name(EntityKind::ItemName, "item_name"),
    Probe::name(EntityKind::TargetObjectName, "obj_name"),
    Probe::name(EntityKind::TargetNpcName, "npc_name"),
];

/// Return `<prefix>:<value>` for the first probe whose kind is present.
fn first_match(action: &Action, probes: &[Probe]) -> Option<String> {
    probes.iter().find_map(|probe| {
        action.first_value(&probe.kind).map(|value| {
            let value = value.trim();
            match probe.render {
                Render::Verbatim => format!("{}:{value}", probe.prefix),
                Render::Lowercase => format!("{}:{}", probe.prefix, value.to_lowercase()),
            }
        })
    })
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Derive the target signature of an action.
///
/// Returns `None` when nothing identifiable is targeted. Never fails.
pub fn extract_signature(action: &Action) -> Option<TargetSignature> {
    let specific = match &action.intent {
        Intent::Attack
        | Intent::Talk
        | Intent::TradeViewInventory
        | Intent::TradeBuyItem
        | Intent::TradeSellItem => first_match(action, CHARACTER_TARGETS),
        Intent::Take | Intent::Drop => first_match(action, ITEM_REFERENCES),
        Intent::Interact => first_match(action, OBJECT_TARGETS),
        Intent::Use => use_signature(action),
        Intent::Move => first_match(action, LOCATION_TARGETS),
        Intent::GoTo => first_match(action, SUBLOCATION_TARGETS),
        Intent::Examine => first_match(action, EXAMINE_TARGETS),
        Intent::Other(_) => None,
    };

    specific
        .or_else(|| generic_target(action))
        .map(TargetSignature)
}

/// `use` combines what is used (an item, else a skill) with who it is used
/// on. No character target, or an explicit `target_self`, means self-use.
fn use_signature(action: &Action) -> Option<String> {
    let reference =
        first_match(action, ITEM_REFERENCES).or_else(|| first_match(action, SKILL_REFERENCES))?;

    Some(match first_match(action, USE_TARGETS) {
        Some(target) => format!("use:{reference}@target:{target}"),
        None => format!("{USE_ON_SELF_PREFIX}{reference}"),
    })
}

/// Single-entity fallback shared by every intent.
fn generic_target(action: &Action) -> Option<String> {
    let [entity] = action.entities.as_slice() else {
        return None;
    };

    let value = entity.value.trim();
    if value.is_empty() || FALLBACK_EXCLUDED_KINDS.contains(&entity.kind) {
        return None;
    }

    let lowered = value.to_lowercase();
    if FALLBACK_STOPWORDS.contains(&lowered.as_str()) {
        return None;
    }

    Some(format!("generic_target:{}:{lowered}", entity.kind))
}
