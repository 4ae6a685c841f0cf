//! Enumeration types for the Parley conflict engine.
//!
//! [`Intent`] and [`EntityKind`] are open vocabularies: the upstream parser
//! may emit verbs and entity types the engine has no rule for, so each
//! carries an `Other` variant that keeps the raw string verbatim. Both
//! serialize as their plain wire string.

use serde::{Deserialize, Serialize};

/// Generates a string-backed enum with a fixed set of recognized values and
/// an `Other(String)` catch-all.
macro_rules! open_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value outside the recognized vocabulary, kept verbatim.
            Other(String),
        }

        impl $name {
            /// The wire string for this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $text, )+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $text => Self::$variant, )+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::from(raw.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// The kind of entity submitting an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// A human player.
    Player,
    /// A non-player character generated by the game master.
    GeneratedNpc,
}

impl ActorType {
    /// The wire string for this actor type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::GeneratedNpc => "generated_npc",
        }
    }

    /// Parse the wire string, returning `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "player" => Some(Self::Player),
            "generated_npc" => Some(Self::GeneratedNpc),
            _ => None,
        }
    }
}

impl core::fmt::Display for ActorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

open_vocabulary! {
    /// The normalized verb of an action, as produced by the intent parser.
    Intent {
        /// Strike an NPC or player.
        Attack => "attack",
        /// Start or continue a conversation.
        Talk => "talk",
        /// Open a merchant's wares.
        TradeViewInventory => "trade_view_inventory",
        /// Buy from a merchant.
        TradeBuyItem => "trade_buy_item",
        /// Sell to a merchant.
        TradeSellItem => "trade_sell_item",
        /// Pick an item up.
        Take => "take",
        /// Put an item down.
        Drop => "drop",
        /// Operate a world object (lever, door, chest).
        Interact => "interact",
        /// Use an item or skill, optionally on a target.
        Use => "use",
        /// Travel between locations.
        Move => "move",
        /// Walk to a sublocation or named point inside the current location.
        GoTo => "go_to",
        /// Look closely at something.
        Examine => "examine",
    }
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

open_vocabulary! {
    /// The type tag of an [`ActionEntity`](crate::action::ActionEntity).
    EntityKind {
        /// Database id of a targeted NPC.
        TargetNpcId => "target_npc_id",
        /// Database id of a targeted player.
        TargetPlayerId => "target_player_id",
        /// Free-text name of a targeted NPC.
        TargetNpcName => "target_npc_name",
        /// Id of a concrete item instance.
        TargetItemId => "target_item_id",
        /// Static (template) id of an item.
        ItemStaticId => "item_static_id",
        /// Free-text item name.
        ItemName => "item_name",
        /// Static id of a world object.
        TargetObjectStaticId => "target_object_static_id",
        /// Free-text world object name.
        TargetObjectName => "target_object_name",
        /// Id of a skill or ability.
        SkillId => "skill_id",
        /// Free-text skill name.
        SkillName => "skill_name",
        /// Explicit marker that the actor targets themselves.
        TargetSelf => "target_self",
        /// Static id of a location.
        LocationStaticId => "location_static_id",
        /// Free-text location name.
        LocationName => "location_name",
        /// Compass or relative direction.
        Direction => "direction",
        /// Static id of a sublocation.
        TargetSublocationStaticId => "target_sublocation_static_id",
        /// Free-text sublocation name.
        TargetSublocationName => "target_sublocation_name",
        /// Free-text named point inside a location.
        TargetPointName => "target_point_name",
        /// Adverbial manner ("quietly").
        Manner => "manner",
        /// Abstract concept ("peace", "the war").
        GeneralConcept => "general_concept",
        /// Grammatical conjunction left over from parsing.
        Conjunction => "conjunction",
    }
}

// ---------------------------------------------------------------------------
// Conflict status
// ---------------------------------------------------------------------------

/// Status stamped on every record produced by a simulation pass.
///
/// This is a sentinel, not a persisted resolution state: the caller replaces
/// it when the record is stored for adjudication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    /// Detected by a simulation pass; not yet persisted or resolved.
    #[default]
    SimulatedInternalConflict,
}
