//! Shared type definitions for the Parley turn conflict engine.
//!
//! This crate is the single source of truth for the data that flows between
//! the command layer, the conflict engine, and whatever persists or displays
//! the engine's output.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for guild and actor identifiers
//! - [`enums`] -- Actor types, intents, entity kinds, conflict status
//! - [`action`] -- Parsed actions, entities, and their transport envelopes
//! - [`actor`] -- Resolved actor identities
//! - [`conflict`] -- Conflict records, resolution details, and record identity

pub mod action;
pub mod actor;
pub mod conflict;
pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use action::{Action, ActionEntity, ActionEntry, SimulationBatch};
pub use actor::Actor;
pub use conflict::{ConflictKey, ConflictRecord, InvolvedEntity, ResolutionDetails};
pub use enums::{ActorType, ConflictStatus, EntityKind, Intent};
pub use ids::{ActorId, GuildId};
