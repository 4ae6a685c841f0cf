//! Intake: turning transport entries into resolved actor actions.
//!
//! Each [`ActionEntry`] is checked for required fields, its actor is
//! resolved and checked against the pass's guild, and its parsed-action JSON
//! is rebuilt into a typed [`Action`]. Every step reports an explicit
//! outcome; nothing here panics or aborts the batch except an unavailable
//! actor store.

use parley_types::{Action, ActionEntity, ActionEntry, ActorId, ActorType, EntityKind, GuildId};
use serde_json::Value;
use tracing::warn;

use crate::error::{ActionParseError, EntityParseError, ResolveError, SimulationError, SkipReason};
use crate::resolver::ActorResolver;
use crate::rules::ActorAction;

/// What became of one input entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The entry takes part in the pass.
    Admitted(ActorAction),
    /// The entry was left out.
    Skipped(SkipReason),
}

/// Validate, resolve, and parse one entry.
///
/// # Errors
///
/// Returns [`SimulationError::ResolverUnavailable`] if the resolver reports
/// that its store is unreachable. Every other problem is an
/// [`EntryOutcome::Skipped`].
pub fn admit_entry<R: ActorResolver + ?Sized>(
    guild_id: GuildId,
    entry_index: usize,
    entry: &ActionEntry,
    resolver: &R,
) -> Result<EntryOutcome, SimulationError> {
    let (Some(raw_id), Some(raw_type), Some(payload)) =
        (entry.actor_id, entry.actor_type.as_deref(), entry.parsed_action.as_ref())
    else {
        return Ok(EntryOutcome::Skipped(SkipReason::MissingField {
            field: missing_field(entry),
        }));
    };

    let actor_id = ActorId::new(raw_id);
    let Some(actor_type) = ActorType::parse(raw_type) else {
        return Ok(EntryOutcome::Skipped(SkipReason::UnknownActorType {
            actor_type: raw_type.to_owned(),
        }));
    };

    let actor = match resolver.resolve_actor(guild_id, actor_id, actor_type) {
        Ok(Some(actor)) => actor,
        Ok(None) => {
            return Ok(EntryOutcome::Skipped(SkipReason::ActorNotFound {
                actor_id,
                actor_type,
            }));
        }
        Err(source @ ResolveError::Lookup { .. }) => {
            return Ok(EntryOutcome::Skipped(SkipReason::LookupFailed { actor_id, source }));
        }
        Err(source @ ResolveError::Unavailable { .. }) => {
            return Err(SimulationError::ResolverUnavailable {
                entry_index,
                source,
            });
        }
    };

    if actor.guild_id != guild_id {
        return Ok(EntryOutcome::Skipped(SkipReason::GuildMismatch {
            actor_id,
            expected: guild_id,
            found: actor.guild_id,
        }));
    }

    match parse_action(payload) {
        Ok(action) => Ok(EntryOutcome::Admitted(ActorAction::new(actor, action))),
        Err(source) => Ok(EntryOutcome::Skipped(source.into())),
    }
}

/// The first required field absent from `entry`.
fn missing_field(entry: &ActionEntry) -> &'static str {
    if entry.actor_id.is_none() {
        "actor_id"
    } else if entry.actor_type.is_none() {
        "actor_type"
    } else {
        "parsed_action"
    }
}

/// Rebuild an [`Action`] from its JSON transport form.
///
/// `intent` is required. `raw_text` and `entities` may be absent or null.
/// Individual entities that are malformed are dropped with a warning; the
/// action survives as long as its top-level shape is valid.
///
/// # Errors
///
/// Returns [`ActionParseError`] if the payload is not an object, has no
/// usable intent, or has a top-level field of the wrong type.
pub fn parse_action(payload: &Value) -> Result<Action, ActionParseError> {
    let Value::Object(fields) = payload else {
        return Err(ActionParseError::NotAnObject);
    };

    let intent = match fields.get("intent") {
        None | Some(Value::Null) => return Err(ActionParseError::MissingIntent),
        Some(Value::String(intent)) if !intent.trim().is_empty() => intent.trim(),
        Some(Value::String(_)) => {
            return Err(ActionParseError::InvalidField {
                field: "intent",
                detail: "blank",
            });
        }
        Some(_) => {
            return Err(ActionParseError::InvalidField {
                field: "intent",
                detail: "not a string",
            });
        }
    };

    let raw_text = match fields.get("raw_text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(_) => {
            return Err(ActionParseError::InvalidField {
                field: "raw_text",
                detail: "not a string",
            });
        }
    };

    let entities = match fields.get("entities") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => parse_entities(items),
        Some(_) => {
            return Err(ActionParseError::InvalidField {
                field: "entities",
                detail: "not an array",
            });
        }
    };

    Ok(Action::new(raw_text, intent, entities))
}

/// Parse each entity independently, dropping the malformed ones.
fn parse_entities(items: &[Value]) -> Vec<ActionEntity> {
    items
        .iter()
        .enumerate()
        .filter_map(|(entity_index, item)| match parse_entity(item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(entity_index, error = %e, entity = %item, "dropping malformed entity");
                None
            }
        })
        .collect()
}

fn parse_entity(item: &Value) -> Result<ActionEntity, EntityParseError> {
    let Value::Object(fields) = item else {
        return Err(EntityParseError::NotAnObject);
    };

    let Some(Value::String(kind)) = fields.get("type") else {
        return Err(EntityParseError::InvalidType);
    };

    let value = match fields.get("value") {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => {
            return Err(EntityParseError::InvalidValue { kind: kind.clone() });
        }
    };

    Ok(ActionEntity::new(EntityKind::from(kind.as_str()), value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use parley_types::{Actor, Intent};
    use serde_json::json;

    use super::*;
    use crate::resolver::ActorRoster;

    const GUILD: GuildId = GuildId::new(10);

    fn roster() -> ActorRoster {
        ActorRoster::from_actors([
            Actor {
                id: ActorId::new(1),
                entity_type: ActorType::Player,
                name: "Ada".to_owned(),
                guild_id: GUILD,
            },
            Actor {
                id: ActorId::new(2),
                entity_type: ActorType::GeneratedNpc,
                name: "Bram".to_owned(),
                guild_id: GuildId::new(11),
            },
        ])
    }

    fn entry(
        actor_id: Option<i64>,
        actor_type: Option<&str>,
        parsed: Option<Value>,
    ) -> ActionEntry {
        ActionEntry {
            actor_id,
            actor_type: actor_type.map(str::to_owned),
            parsed_action: parsed,
        }
    }

    fn attack() -> Value {
        json!({
            "raw_text": "I attack the goblin",
            "intent": "attack",
            "entities": [{"type": "target_npc_id", "value": "3"}]
        })
    }

    struct DownResolver;

    impl ActorResolver for DownResolver {
        fn resolve_actor(
            &self,
            _guild_id: GuildId,
            _actor_id: ActorId,
            _actor_type: ActorType,
        ) -> Result<Option<Actor>, ResolveError> {
            Err(ResolveError::Unavailable {
                message: "connection refused".to_owned(),
            })
        }
    }

    struct FlakyResolver;

    impl ActorResolver for FlakyResolver {
        fn resolve_actor(
            &self,
            _guild_id: GuildId,
            _actor_id: ActorId,
            _actor_type: ActorType,
        ) -> Result<Option<Actor>, ResolveError> {
            Err(ResolveError::Lookup {
                message: "row locked".to_owned(),
            })
        }
    }

    #[test]
    fn admits_valid_entry() {
        let input = entry(Some(1), Some("player"), Some(attack()));
        let outcome = admit_entry(GUILD, 0, &input, &roster());
        let Ok(EntryOutcome::Admitted(admitted)) = outcome else {
            panic!("expected admission, got {outcome:?}");
        };
        assert_eq!(admitted.actor.name, "Ada");
        assert_eq!(admitted.action.intent, Intent::Attack);
        assert_eq!(admitted.signature.map(|s| s.as_str().to_owned()).as_deref(), Some("npc:3"));
    }

    #[test]
    fn reports_first_missing_field() {
        let cases = [
            (entry(None, Some("player"), Some(attack())), "actor_id"),
            (entry(Some(1), None, Some(attack())), "actor_type"),
            (entry(Some(1), Some("player"), None), "parsed_action"),
        ];
        for (input, field) in cases {
            assert_eq!(
                admit_entry(GUILD, 0, &input, &roster()),
                Ok(EntryOutcome::Skipped(SkipReason::MissingField { field }))
            );
        }
    }

    #[test]
    fn skips_unknown_type_missing_actor_and_foreign_guild() {
        let input = entry(Some(1), Some("wizard"), Some(attack()));
        let unknown = admit_entry(GUILD, 0, &input, &roster());
        assert!(matches!(
            unknown,
            Ok(EntryOutcome::Skipped(SkipReason::UnknownActorType { .. }))
        ));

        let input = entry(Some(7), Some("player"), Some(attack()));
        let missing = admit_entry(GUILD, 0, &input, &roster());
        assert!(matches!(
            missing,
            Ok(EntryOutcome::Skipped(SkipReason::ActorNotFound { .. }))
        ));

        let foreign = admit_entry(
            GUILD,
            0,
            &entry(Some(2), Some("generated_npc"), Some(attack())),
            &roster(),
        );
        assert_eq!(
            foreign,
            Ok(EntryOutcome::Skipped(SkipReason::GuildMismatch {
                actor_id: ActorId::new(2),
                expected: GUILD,
                found: GuildId::new(11),
            }))
        );
    }

    #[test]
    fn lookup_failure_skips_but_unavailable_store_aborts() {
        let input = entry(Some(1), Some("player"), Some(attack()));
        assert!(matches!(
            admit_entry(GUILD, 0, &input, &FlakyResolver),
            Ok(EntryOutcome::Skipped(SkipReason::LookupFailed { .. }))
        ));
        assert!(matches!(
            admit_entry(GUILD, 4, &input, &DownResolver),
            Err(SimulationError::ResolverUnavailable { entry_index: 4, .. })
        ));
    }

    #[test]
    fn structurally_invalid_actions_are_skipped() {
        let payloads = [
            json!("attack the goblin"),
            json!({"raw_text": "hm"}),
            json!({"intent": 5}),
            json!({"intent": "   "}),
            json!({"intent": "take", "entities": {"type": "item_name"}}),
            json!({"intent": "take", "raw_text": ["no"]}),
        ];
        for payload in payloads {
            let input = entry(Some(1), Some("player"), Some(payload));
            let outcome = admit_entry(GUILD, 0, &input, &roster());
            assert!(
                matches!(outcome, Ok(EntryOutcome::Skipped(SkipReason::MalformedAction { .. }))),
                "{outcome:?}"
            );
        }
    }

    #[test]
    fn malformed_entities_are_dropped_individually() {
        let action = parse_action(&json!({
            "raw_text": "take the rope",
            "intent": "take",
            "entities": [
                "rope",
                {"value": "rope"},
                {"type": "item_name", "value": null},
                {"type": "target_item_id", "value": 101},
                {"type": "item_name", "value": "Rope"}
            ]
        }))
        .unwrap();
        assert_eq!(
            action.entities,
            vec![
                ActionEntity::new(EntityKind::TargetItemId, "101"),
                ActionEntity::new(EntityKind::ItemName, "Rope"),
            ]
        );
    }

    #[test]
    fn optional_fields_default() {
        let action = parse_action(&json!({"intent": "look", "entities": null})).unwrap();
        assert_eq!(action.raw_text, "");
        assert!(action.entities.is_empty());
        assert_eq!(action.intent, Intent::Other("look".to_owned()));
    }
}
