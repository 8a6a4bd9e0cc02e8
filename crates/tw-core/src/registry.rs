use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityKind, EntityUpdate, MetadataValue};
use crate::error::{TwError, TwResult};
use crate::store::KeyValueStore;

/// Store key under which [`InMemoryRegistry::save_to`] writes its snapshot.
pub const REGISTRY_KEY: &str = "world_registry";

/// The long-term store of named characters, locations, and factions.
///
/// Session code only ever holds [`EntityId`]s pointing into a registry; it
/// never owns registry entries.
pub trait WorldRegistry {
    /// Find an entity of `kind` by name (case-insensitive).
    fn find_entity_by_name(&self, kind: &EntityKind, name: &str) -> Option<&Entity>;

    /// Get an entity by ID.
    fn get_entity(&self, id: EntityId) -> Option<&Entity>;

    /// Insert a new entity and return its ID.
    fn create_entity(&mut self, entity: Entity) -> TwResult<EntityId>;

    /// Apply a partial update to an existing entity.
    fn update_entity(&mut self, id: EntityId, update: EntityUpdate) -> TwResult<()>;

    /// Mark an entity's real name as known to the party.
    fn reveal_name(&mut self, id: EntityId) -> TwResult<()>;

    /// Set a world-state flag such as `location_Millbrook_protected`.
    fn set_world_state(&mut self, key: &str, value: MetadataValue) -> TwResult<()>;

    /// Read a world-state flag.
    fn world_state(&self, key: &str) -> Option<&MetadataValue>;
}

/// Serialized form of an [`InMemoryRegistry`]. Indexes are rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistrySnapshot {
    entities: Vec<Entity>,
    world_state: HashMap<String, MetadataValue>,
}

/// A registry kept entirely in memory, indexed by kind and lowercase name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entities: HashMap<EntityId, Entity>,
    world_state: HashMap<String, MetadataValue>,

    // Indexes
    by_kind: HashMap<EntityKind, Vec<EntityId>>,
    by_name_lower: HashMap<(EntityKind, String), EntityId>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all entities of a specific kind, in insertion order.
    pub fn entities_by_kind(&self, kind: &EntityKind) -> Vec<&Entity> {
        self.by_kind
            .get(kind)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get all entities.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities in the registry.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Write the registry to a key/value store as JSON.
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> TwResult<()> {
        let mut entities: Vec<Entity> = self.entities.values().cloned().collect();
        entities.sort_by_key(|e| e.created_at);
        let snapshot = RegistrySnapshot {
            entities,
            world_state: self.world_state.clone(),
        };
        store.set(REGISTRY_KEY, serde_json::to_string(&snapshot)?)
    }

    /// Load a registry previously written by [`save_to`](Self::save_to).
    ///
    /// A store without a saved registry yields an empty one.
    pub fn load_from(store: &dyn KeyValueStore) -> TwResult<Self> {
        let Some(raw) = store.get(REGISTRY_KEY) else {
            return Ok(Self::new());
        };
        let snapshot: RegistrySnapshot = serde_json::from_str(&raw)?;
        let mut registry = Self::new();
        for entity in snapshot.entities {
            registry.create_entity(entity)?;
        }
        registry.world_state = snapshot.world_state;
        Ok(registry)
    }

    fn name_key(kind: &EntityKind, name: &str) -> (EntityKind, String) {
        (kind.clone(), name.to_lowercase())
    }
}

impl WorldRegistry for InMemoryRegistry {
    fn find_entity_by_name(&self, kind: &EntityKind, name: &str) -> Option<&Entity> {
        self.by_name_lower
            .get(&Self::name_key(kind, name))
            .and_then(|id| self.entities.get(id))
    }

    fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn create_entity(&mut self, entity: Entity) -> TwResult<EntityId> {
        let key = Self::name_key(&entity.kind, &entity.name);
        if self.by_name_lower.contains_key(&key) {
            return Err(TwError::DuplicateName {
                kind: entity.kind.clone(),
                name: entity.name.clone(),
            });
        }

        let id = entity.id;
        self.by_kind
            .entry(entity.kind.clone())
            .or_default()
            .push(id);
        self.by_name_lower.insert(key, id);
        tracing::debug!(entity = %id, name = %entity.name, "registry entity created");
        self.entities.insert(id, entity);
        Ok(id)
    }

    fn update_entity(&mut self, id: EntityId, update: EntityUpdate) -> TwResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(TwError::EntityNotFound(id))?;

        let old_key = Self::name_key(&entity.kind, &entity.name);
        if let Some(new_name) = update.name.as_deref() {
            let new_key = Self::name_key(&entity.kind, new_name);
            if new_key != old_key {
                if self.by_name_lower.contains_key(&new_key) {
                    return Err(TwError::DuplicateName {
                        kind: entity.kind.clone(),
                        name: new_name.to_string(),
                    });
                }
                self.by_name_lower.remove(&old_key);
                self.by_name_lower.insert(new_key, id);
            }
        }

        entity.apply(update);
        Ok(())
    }

    fn reveal_name(&mut self, id: EntityId) -> TwResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(TwError::EntityNotFound(id))?;
        if !entity.party_knows_name {
            entity.party_knows_name = true;
            tracing::info!(entity = %id, name = %entity.name, "name revealed");
        }
        Ok(())
    }

    fn set_world_state(&mut self, key: &str, value: MetadataValue) -> TwResult<()> {
        self.world_state.insert(key.to_string(), value);
        Ok(())
    }

    fn world_state(&self, key: &str) -> Option<&MetadataValue> {
        self.world_state.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn create_and_find_case_insensitive() {
        let mut registry = InMemoryRegistry::new();
        let id = registry
            .create_entity(Entity::new(EntityKind::Npc, "Sir Aldrich"))
            .unwrap();
        let found = registry
            .find_entity_by_name(&EntityKind::Npc, "sir aldrich")
            .unwrap();
        assert_eq!(found.id, id);
        assert!(
            registry
                .find_entity_by_name(&EntityKind::Location, "Sir Aldrich")
                .is_none()
        );
    }

    #[test]
    fn duplicate_name_rejected_within_kind() {
        let mut registry = InMemoryRegistry::new();
        registry
            .create_entity(Entity::new(EntityKind::Npc, "Mira"))
            .unwrap();
        assert!(
            registry
                .create_entity(Entity::new(EntityKind::Npc, "MIRA"))
                .is_err()
        );
        assert!(
            registry
                .create_entity(Entity::new(EntityKind::Location, "Mira"))
                .is_ok()
        );
    }

    #[test]
    fn update_renames_and_reindexes() {
        let mut registry = InMemoryRegistry::new();
        let id = registry
            .create_entity(Entity::new(EntityKind::Npc, "the ancient dragon"))
            .unwrap();
        registry
            .update_entity(
                id,
                EntityUpdate {
                    name: Some("Vermithrax".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(
            registry
                .find_entity_by_name(&EntityKind::Npc, "the ancient dragon")
                .is_none()
        );
        assert_eq!(
            registry
                .find_entity_by_name(&EntityKind::Npc, "vermithrax")
                .unwrap()
                .id,
            id
        );
    }

    #[test]
    fn update_unknown_entity_errors() {
        let mut registry = InMemoryRegistry::new();
        let result = registry.update_entity(EntityId::new(), EntityUpdate::default());
        assert!(matches!(result, Err(TwError::EntityNotFound(_))));
    }

    #[test]
    fn reveal_name_sets_flag() {
        let mut registry = InMemoryRegistry::new();
        let id = registry
            .create_entity(Entity::new(EntityKind::Npc, "Grix").with_generic_name("Goblin"))
            .unwrap();
        assert_eq!(registry.get_entity(id).unwrap().display_name(), "Goblin");
        registry.reveal_name(id).unwrap();
        assert_eq!(registry.get_entity(id).unwrap().display_name(), "Grix");
    }

    #[test]
    fn world_state_roundtrip() {
        let mut registry = InMemoryRegistry::new();
        registry
            .set_world_state("location_Millbrook_protected", MetadataValue::Boolean(true))
            .unwrap();
        assert_eq!(
            registry.world_state("location_Millbrook_protected"),
            Some(&MetadataValue::Boolean(true))
        );
        assert!(registry.world_state("location_Millbrook_destroyed").is_none());
    }

    #[test]
    fn save_and_load_through_store() {
        let mut registry = InMemoryRegistry::new();
        registry
            .create_entity(Entity::new(EntityKind::Npc, "Grix").with_known_name(true))
            .unwrap();
        registry
            .set_world_state("bridge_burned", MetadataValue::Boolean(true))
            .unwrap();

        let mut store = MemoryStore::new();
        registry.save_to(&mut store).unwrap();

        let loaded = InMemoryRegistry::load_from(&store).unwrap();
        assert_eq!(loaded.entity_count(), 1);
        assert!(
            loaded
                .find_entity_by_name(&EntityKind::Npc, "grix")
                .is_some()
        );
        assert_eq!(
            loaded.world_state("bridge_burned"),
            Some(&MetadataValue::Boolean(true))
        );
    }

    #[test]
    fn load_from_empty_store_is_empty() {
        let store = MemoryStore::new();
        let loaded = InMemoryRegistry::load_from(&store).unwrap();
        assert_eq!(loaded.entity_count(), 0);
    }
}
