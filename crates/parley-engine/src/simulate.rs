//! The simulation pass: intake, grouping, rules, deduplication.
//!
//! ```text
//! entries --> intake (validate, resolve, parse) --> group by signature
//!         --> Rule 1 + Rule 2 per group --> Rule 3 over the batch --> records
//! ```
//!
//! The pass is synchronous and holds no state between calls. It fails open:
//! malformed entries are skipped, and a failure that invalidates the whole
//! pass is logged and reported as "no conflicts" rather than surfaced to the
//! caller. That includes a panic raised inside a caller-supplied resolver.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use parley_types::{ActionEntry, ConflictRecord, GuildId};
use tracing::{debug, error, info, warn};

use crate::error::{SimulationError, SkipReason};
use crate::intake::{EntryOutcome, admit_entry};
use crate::resolver::ActorResolver;
use crate::rules::exclusivity::apply_exclusivity_rules;
use crate::rules::intent_pairs::apply_intent_pair_rules;
use crate::rules::self_use::apply_self_use_rule;
use crate::rules::{ActorAction, ConflictLedger};
use crate::signature::TargetSignature;

/// Minimum number of admitted actions for any conflict to be possible.
pub const MIN_ACTIONS_FOR_CONFLICT: usize = 2;

/// An entry that was left out of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position of the entry in the input batch.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Everything a pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Detected conflicts. Order is not meaningful.
    pub conflicts: Vec<ConflictRecord>,
    /// Entries that did not take part.
    pub skipped: Vec<SkippedEntry>,
    /// Number of entries admitted to the rule stage.
    pub admitted: usize,
}

/// Run a simulation pass and return only the conflicts.
///
/// Never fails: an aborted or panicking pass yields an empty list.
pub fn simulate_conflicts<R: ActorResolver + ?Sized>(
    guild_id: GuildId,
    entries: &[ActionEntry],
    resolver: &R,
) -> Vec<ConflictRecord> {
    simulate_with_report(guild_id, entries, resolver).conflicts
}

/// Run a simulation pass and return the conflicts along with the skipped
/// entries.
///
/// An aborted pass yields an empty report, as does a panic anywhere in the
/// pass.
pub fn simulate_with_report<R: ActorResolver + ?Sized>(
    guild_id: GuildId,
    entries: &[ActionEntry],
    resolver: &R,
) -> SimulationReport {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_pass(guild_id, entries, resolver)));
    let Ok(result) = outcome else {
        error!(
            guild_id = %guild_id,
            entries = entries.len(),
            "conflict simulation panicked, reporting no conflicts"
        );
        return SimulationReport::default();
    };

    match result {
        Ok(report) => {
            info!(
                guild_id = %guild_id,
                entries = entries.len(),
                valid_actions = report.admitted,
                skipped = report.skipped.len(),
                conflicts = report.conflicts.len(),
                "conflict simulation complete"
            );
            report
        }
        Err(e) => {
            error!(
                guild_id = %guild_id,
                entries = entries.len(),
                error = %e,
                "conflict simulation aborted, reporting no conflicts"
            );
            SimulationReport::default()
        }
    }
}

fn run_pass<R: ActorResolver + ?Sized>(
    guild_id: GuildId,
    entries: &[ActionEntry],
    resolver: &R,
) -> Result<SimulationReport, SimulationError> {
    let mut admitted = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match admit_entry(guild_id, index, entry, resolver)? {
            EntryOutcome::Admitted(actor_action) => admitted.push(actor_action),
            EntryOutcome::Skipped(reason) => {
                if matches!(reason, SkipReason::MalformedAction { .. }) {
                    warn!(
                        entry_index = index,
                        actor_id = ?entry.actor_id,
                        reason = %reason,
                        payload = ?entry.parsed_action,
                        "skipping entry"
                    );
                } else {
                    warn!(
                        entry_index = index,
                        actor_id = ?entry.actor_id,
                        reason = %reason,
                        "skipping entry"
                    );
                }
                skipped.push(SkippedEntry { index, reason });
            }
        }
    }

    let conflicts = detect_conflicts(guild_id, &admitted);
    Ok(SimulationReport {
        conflicts,
        skipped,
        admitted: admitted.len(),
    })
}

/// Apply every rule to already-admitted actions.
///
/// Actions without a signature take no part in the per-group rules but are
/// still scanned by the batch-wide self-use rule.
pub fn detect_conflicts(guild_id: GuildId, actions: &[ActorAction]) -> Vec<ConflictRecord> {
    if actions.len() < MIN_ACTIONS_FOR_CONFLICT {
        debug!(admitted = actions.len(), "too few actions for a conflict");
        return Vec::new();
    }

    let groups = group_by_signature(actions);
    let mut ledger = ConflictLedger::new();
    let mut conflicts = Vec::new();

    for (signature, group) in &groups {
        if group.len() < MIN_ACTIONS_FOR_CONFLICT {
            continue;
        }
        debug!(signature = %signature, actions = group.len(), "checking signature group");

        for record in apply_exclusivity_rules(guild_id, signature, group) {
            if ledger.admit(&record) {
                conflicts.push(record);
            }
        }
        conflicts.extend(apply_intent_pair_rules(guild_id, signature, group, &mut ledger));
    }

    conflicts.extend(apply_self_use_rule(guild_id, actions));
    conflicts
}

/// Group signed actions by signature, in order of each signature's first
/// appearance.
fn group_by_signature(actions: &[ActorAction]) -> Vec<(&TargetSignature, Vec<&ActorAction>)> {
    let mut positions: BTreeMap<&TargetSignature, usize> = BTreeMap::new();
    let mut groups: Vec<(&TargetSignature, Vec<&ActorAction>)> = Vec::new();

    for entry in actions {
        let Some(signature) = &entry.signature else {
            continue;
        };
        if let Some(members) = positions
            .get(signature)
            .and_then(|&position| groups.get_mut(position))
        {
            members.1.push(entry);
        } else {
            positions.insert(signature, groups.len());
            groups.push((signature, vec![entry]));
        }
    }

    groups
}
