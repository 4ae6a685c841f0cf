//! Actor resolution collaborator.
//!
//! The engine does not own actor data. Before any rule runs, each entry's
//! `(guild, actor id, actor type)` is handed to an [`ActorResolver`], which
//! may be backed by a database, a cache, or the in-memory [`ActorRoster`].

use std::collections::BTreeMap;

use parley_types::{Actor, ActorId, ActorType, GuildId};
use tracing::debug;

use crate::error::ResolveError;

/// A source of actor identities.
///
/// Implementations return `Ok(None)` when the actor does not exist. They may
/// return an actor from a different guild; the engine checks the guild
/// itself and skips such entries.
pub trait ActorResolver {
    /// Look up one actor.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Lookup`] if this one lookup failed, or
    /// [`ResolveError::Unavailable`] if no further lookups can succeed.
    fn resolve_actor(
        &self,
        guild_id: GuildId,
        actor_id: ActorId,
        actor_type: ActorType,
    ) -> Result<Option<Actor>, ResolveError>;
}

impl<R: ActorResolver + ?Sized> ActorResolver for &R {
    fn resolve_actor(
        &self,
        guild_id: GuildId,
        actor_id: ActorId,
        actor_type: ActorType,
    ) -> Result<Option<Actor>, ResolveError> {
        (**self).resolve_actor(guild_id, actor_id, actor_type)
    }
}

/// An in-memory actor table keyed by actor type and id.
#[derive(Debug, Clone, Default)]
pub struct ActorRoster {
    actors: BTreeMap<(ActorType, ActorId), Actor>,
}

impl ActorRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from a list of actors. Later duplicates replace
    /// earlier ones.
    pub fn from_actors(actors: impl IntoIterator<Item = Actor>) -> Self {
        let mut roster = Self::new();
        for actor in actors {
            roster.insert(actor);
        }
        roster
    }

    /// Add or replace an actor, returning the one it replaced.
    pub fn insert(&mut self, actor: Actor) -> Option<Actor> {
        let replaced = self.actors.insert((actor.entity_type, actor.id), actor);
        if let Some(old) = &replaced {
            debug!(actor_id = %old.id, actor_type = %old.entity_type, "roster entry replaced");
        }
        replaced
    }

    /// Number of actors in the roster.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl ActorResolver for ActorRoster {
    fn resolve_actor(
        &self,
        _guild_id: GuildId,
        actor_id: ActorId,
        actor_type: ActorType,
    ) -> Result<Option<Actor>, ResolveError> {
        Ok(self.actors.get(&(actor_type, actor_id)).cloned())
    }
}
