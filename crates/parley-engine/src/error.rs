//! Error types for the parley-engine crate.
//!
//! Most failures in a simulation pass are per-entry: the entry is skipped,
//! a warning is logged, and the pass continues. Those outcomes are described
//! by [`SkipReason`]. Only [`SimulationError`] aborts a pass, and even that is
//! caught at the top of the engine and turned into an empty result.

use parley_types::{ActorId, ActorType, GuildId};

/// Why a single entity of a parsed action was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityParseError {
    /// The entity is not a JSON object.
    #[error("entity is not an object")]
    NotAnObject,

    /// The `type` key is missing or not a string.
    #[error("entity has no string `type`")]
    InvalidType,

    /// The `value` key is missing or neither a string nor a number.
    #[error("entity `{kind}` has no string or numeric `value`")]
    InvalidValue {
        /// The entity type whose value was unusable.
        kind: String,
    },
}

/// Why a parsed action payload could not be turned into an action at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    /// The payload is not a JSON object.
    #[error("parsed action is not an object")]
    NotAnObject,

    /// The `intent` key is missing.
    #[error("parsed action has no intent")]
    MissingIntent,

    /// A top-level field has the wrong shape.
    #[error("parsed action field `{field}` is invalid: {detail}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// What was wrong with it.
        detail: &'static str,
    },
}

/// Errors reported by an [`ActorResolver`](crate::resolver::ActorResolver).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The lookup for one actor failed. The entry is skipped.
    #[error("actor lookup failed: {message}")]
    Lookup {
        /// Description of the failure.
        message: String,
    },

    /// The backing store is unreachable. The whole pass is abandoned.
    #[error("actor store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Why an input entry was left out of a simulation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// A required top-level field of the entry is absent.
    #[error("entry is missing `{field}`")]
    MissingField {
        /// The absent field.
        field: &'static str,
    },

    /// The actor type string is not one the engine knows.
    #[error("unknown actor type `{actor_type}`")]
    UnknownActorType {
        /// The unrecognized value.
        actor_type: String,
    },

    /// The resolver has no such actor.
    #[error("{actor_type} {actor_id} not found")]
    ActorNotFound {
        /// The requested id.
        actor_id: ActorId,
        /// The requested type.
        actor_type: ActorType,
    },

    /// The resolver failed for this actor only.
    #[error("lookup of actor {actor_id} failed: {source}")]
    LookupFailed {
        /// The requested id.
        actor_id: ActorId,
        /// The resolver's error.
        source: ResolveError,
    },

    /// The resolved actor belongs to another guild.
    #[error("actor {actor_id} belongs to guild {found}, not {expected}")]
    GuildMismatch {
        /// The requested id.
        actor_id: ActorId,
        /// The guild the pass runs for.
        expected: GuildId,
        /// The guild the actor belongs to.
        found: GuildId,
    },

    /// The parsed action payload is structurally invalid.
    #[error("malformed action: {source}")]
    MalformedAction {
        /// What was wrong with the payload.
        #[from]
        source: ActionParseError,
    },
}

/// A failure that invalidates the whole simulation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The actor resolver reported that its store is unreachable.
    #[error("actor resolution aborted at entry {entry_index}: {source}")]
    ResolverUnavailable {
        /// Index of the entry being resolved when the store failed.
        entry_index: usize,
        /// The resolver's error.
        source: ResolveError,
    },
}
