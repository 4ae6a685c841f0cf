//! Resolved actor identities.

use serde::{Deserialize, Serialize};

use crate::enums::ActorType;
use crate::ids::{ActorId, GuildId};

/// An acting entity as returned by the actor-resolution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Database id, unique per [`ActorType`].
    pub id: ActorId,
    /// Whether this is a player or a generated NPC.
    pub entity_type: ActorType,
    /// Display name.
    pub name: String,
    /// The guild the actor belongs to.
    pub guild_id: GuildId,
}
