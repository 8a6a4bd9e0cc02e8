use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every entity in the world registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The kind of a registry entity. Name lookups are scoped by kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A named non-player character or creature.
    Npc,
    /// A place in the world.
    Location,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npc => write!(f, "npc"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// A world-state value. Choice consequences only ever set flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A flag.
    Boolean(bool),
}

/// A long-lived registry entry: a named NPC or location.
///
/// Entries carry two names. `name` is the real name; `generic_name` is what
/// the party calls the entity until `party_knows_name` flips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// The kind (type) of this entity.
    pub kind: EntityKind,
    /// Real name of the entity.
    pub name: String,
    /// Name shown while the party does not know the real name.
    pub generic_name: Option<String>,
    /// Whether the party has learned the real name.
    pub party_knows_name: bool,
    /// Free-text race or creature type.
    pub race: String,
    /// Free-text combat class.
    pub class: String,
    /// Free-text occupation.
    pub occupation: String,
    /// Where the entity was last seen.
    pub current_location: Option<String>,
    /// Encounter in which the entity was first met.
    pub first_encountered_in: Option<String>,
    /// When the entity was first met.
    pub first_encountered_at: Option<DateTime<Utc>>,
    /// Timestamp when the entity was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the entity was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Create a new entity with a random ID.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::with_id(EntityId::new(), kind, name)
    }

    /// Create an entity with a pre-assigned ID.
    pub fn with_id(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            name: name.into(),
            generic_name: None,
            party_knows_name: false,
            race: String::new(),
            class: String::new(),
            occupation: String::new(),
            current_location: None,
            first_encountered_in: None,
            first_encountered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the generic (unrevealed) name.
    pub fn with_generic_name(mut self, generic_name: impl Into<String>) -> Self {
        self.generic_name = Some(generic_name.into());
        self
    }

    /// Mark the real name as known (or not) to the party.
    pub fn with_known_name(mut self, known: bool) -> Self {
        self.party_knows_name = known;
        self
    }

    /// The name the party currently uses for this entity.
    pub fn display_name(&self) -> &str {
        if self.party_knows_name {
            &self.name
        } else {
            self.generic_name.as_deref().unwrap_or("Stranger")
        }
    }

    /// Apply a partial update, touching `updated_at`.
    pub fn apply(&mut self, update: EntityUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(generic_name) = update.generic_name {
            self.generic_name = Some(generic_name);
        }
        if let Some(known) = update.party_knows_name {
            self.party_knows_name = known;
        }
        if let Some(race) = update.race {
            self.race = race;
        }
        if let Some(class) = update.class {
            self.class = class;
        }
        if let Some(occupation) = update.occupation {
            self.occupation = occupation;
        }
        if let Some(location) = update.current_location {
            self.current_location = Some(location);
        }
        self.updated_at = Utc::now();
    }
}

/// A partial update for an existing registry entity. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityUpdate {
    /// New real name.
    pub name: Option<String>,
    /// New generic name.
    pub generic_name: Option<String>,
    /// New known-name flag.
    pub party_knows_name: Option<bool>,
    /// New race.
    pub race: Option<String>,
    /// New class.
    pub class: Option<String>,
    /// New occupation.
    pub occupation: Option<String>,
    /// New current location.
    pub current_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_shows_short_form() {
        let id = EntityId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn entity_kind_serializes_snake_case() {
        assert_eq!(EntityKind::Npc.to_string(), "npc");
        assert_eq!(serde_json::to_string(&EntityKind::Location).unwrap(), "\"location\"");
        let npc = Entity::new(EntityKind::Npc, "Grix");
        let json = serde_json::to_value(&npc).unwrap();
        assert!(json.get("tags").is_none());
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn display_name_respects_fog_of_war() {
        let mut npc = Entity::new(EntityKind::Npc, "Grix").with_generic_name("Goblin scout");
        assert_eq!(npc.display_name(), "Goblin scout");
        npc.party_knows_name = true;
        assert_eq!(npc.display_name(), "Grix");
    }

    #[test]
    fn display_name_falls_back_to_stranger() {
        let npc = Entity::new(EntityKind::Npc, "Mira");
        assert_eq!(npc.display_name(), "Stranger");
    }

    #[test]
    fn apply_update_only_touches_given_fields() {
        let mut npc = Entity::new(EntityKind::Npc, "Mira").with_generic_name("Innkeeper");
        npc.race = "human".to_string();
        npc.apply(EntityUpdate {
            party_knows_name: Some(true),
            current_location: Some("Rusty Flagon".to_string()),
            ..Default::default()
        });
        assert!(npc.party_knows_name);
        assert_eq!(npc.race, "human");
        assert_eq!(npc.generic_name.as_deref(), Some("Innkeeper"));
        assert_eq!(npc.current_location.as_deref(), Some("Rusty Flagon"));
    }
}
