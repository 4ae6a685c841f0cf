//! Turn conflict detection for the Parley game master.
//!
//! When several players and NPCs submit actions for the same turn, some of
//! those actions cannot all succeed: two people grab one potion, an NPC is
//! attacked while someone is haggling with them. This crate finds those
//! contentions so an adjudicator can settle them before anything is applied
//! to the world. It does no I/O and never decides a winner.
//!
//! # Modules
//!
//! - [`signature`] -- Target signature extraction ([`extract_signature`])
//! - [`rules`] -- Exclusivity, intent-pair, and self-use rules with their
//!   static tables
//! - [`intake`] -- Entry validation, actor resolution, action parsing
//! - [`resolver`] -- The [`ActorResolver`] collaborator and [`ActorRoster`]
//! - [`simulate`] -- The full pass ([`simulate_conflicts`])
//! - [`error`] -- Skip reasons and pass-level errors

pub mod error;
pub mod intake;
pub mod resolver;
pub mod rules;
pub mod signature;
pub mod simulate;

// Re-export primary types at crate root for convenience.
pub use error::{ActionParseError, EntityParseError, ResolveError, SimulationError, SkipReason};
pub use intake::{EntryOutcome, admit_entry, parse_action};
pub use resolver::{ActorResolver, ActorRoster};
pub use rules::{ActorAction, ConflictLedger};
pub use signature::{TargetSignature, extract_signature};
pub use simulate::{
    SimulationReport, SkippedEntry, detect_conflicts, simulate_conflicts, simulate_with_report,
};
