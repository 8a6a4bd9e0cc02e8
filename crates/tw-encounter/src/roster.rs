use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tw_core::{Entity, EntityId, EntityKind, EntityUpdate, TwResult, WorldRegistry};
use tw_scene::SceneExtraction;
use uuid::Uuid;

use crate::config::EncounterConfig;
use crate::naming::{base_name, is_generic_name, numbered};
use crate::participant::{Participant, ParticipantData, ParticipantId, ParticipantStatus};

/// One active encounter: participants plus the per-base-name counters.
#[derive(Debug, Clone)]
pub struct Encounter {
    id: String,
    location: String,
    started_at: DateTime<Utc>,
    participants: HashMap<ParticipantId, Participant>,
    order: Vec<ParticipantId>,
    generic_counters: HashMap<String, u32>,
}

impl Encounter {
    fn new(location: String) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("encounter_{}", &uuid[..8]),
            location,
            started_at: Utc::now(),
            participants: HashMap::new(),
            order: Vec::new(),
            generic_counters: HashMap::new(),
        }
    }

    /// Encounter identifier, e.g. `encounter_1a2b3c4d`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the encounter takes place.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// When the encounter started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Participants in the order they were added.
    pub fn participants(&self) -> Vec<&Participant> {
        self.order
            .iter()
            .filter_map(|id| self.participants.get(id))
            .collect()
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether nobody has joined yet.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn unpromoted_count(&self) -> usize {
        self.participants
            .values()
            .filter(|p| p.is_promotable() && p.registry_id.is_none())
            .count()
    }

    fn next_generic_name(&mut self, base: &str) -> String {
        loop {
            let counter = self.generic_counters.entry(base.to_string()).or_insert(0);
            *counter += 1;
            let candidate = numbered(base, *counter);
            if !self
                .participants
                .values()
                .any(|p| p.display_name == candidate)
            {
                return candidate;
            }
        }
    }
}

/// A registry entry written when a participant was promoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// The participant's real name.
    pub name: String,
    /// The registry entry it was written to.
    pub entity_id: EntityId,
}

/// What happened when an encounter ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    /// The encounter that ended, if one was active.
    pub encounter_id: Option<String>,
    /// Participants written to the registry.
    pub promoted: Vec<Promotion>,
    /// Participants dropped without a registry trace.
    pub discarded: usize,
    /// Promotions that the registry rejected or could not receive.
    pub failed: usize,
}

/// Session-scoped participant registry.
///
/// States: no encounter, then `start`, then active, then `end`. Registry
/// collaborators are optional on every call; without one the roster stays
/// purely session-local.
#[derive(Debug, Clone, Default)]
pub struct EncounterRoster {
    config: EncounterConfig,
    current: Option<Encounter>,
}

impl EncounterRoster {
    /// Create an idle roster.
    pub fn new(config: EncounterConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// The active encounter.
    pub fn current(&self) -> Option<&Encounter> {
        self.current.as_ref()
    }

    /// Whether an encounter is running.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Start a new encounter and return its ID.
    ///
    /// An encounter that is still active is dropped without promotion; any
    /// named participants it had are lost.
    pub fn start(&mut self, location: Option<&str>) -> &str {
        if let Some(previous) = self.current.take() {
            tracing::warn!(
                encounter = %previous.id,
                lost = previous.unpromoted_count(),
                "discarding active encounter without promotion"
            );
        }
        let location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.config.default_location)
            .to_string();
        let encounter = self.current.insert(Encounter::new(location));
        tracing::info!(encounter = %encounter.id, location = %encounter.location, "encounter started");
        &encounter.id
    }

    /// Add a participant, starting an encounter first if none is active.
    pub fn add_participant(
        &mut self,
        data: ParticipantData,
        registry: Option<&dyn WorldRegistry>,
    ) -> &Participant {
        if self.current.is_none() {
            self.start(None);
        }
        let encounter = self
            .current
            .get_or_insert_with(|| Encounter::new(self.config.default_location.clone()));
        let participant = build_participant(encounter, data, registry);
        let id = participant.id;
        tracing::debug!(participant = %id, name = %participant.display_name, "participant added");
        if encounter.participants.insert(id, participant).is_none() {
            encounter.order.push(id);
        }
        &encounter.participants[&id]
    }

    /// Turn every mention of a scene into a participant. Named and boss
    /// mentions are linked to a registry NPC of the same name when one
    /// exists.
    pub fn add_mentions(
        &mut self,
        scene: &SceneExtraction,
        registry: Option<&dyn WorldRegistry>,
        rng: &mut StdRng,
    ) -> Vec<ParticipantId> {
        let mut added = Vec::with_capacity(scene.mentions.len());
        for mention in &scene.mentions {
            let mut data = ParticipantData::from_mention(mention, rng);
            if let (Some(registry), Some(name)) = (registry, data.name.as_deref()) {
                if let Some(entity) = registry.find_entity_by_name(&EntityKind::Npc, name) {
                    data.registry_id = Some(entity.id);
                }
            }
            added.push(self.add_participant(data, registry).id);
        }
        added
    }

    /// Remove a participant. Unknown IDs are ignored.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        let encounter = self.current.as_mut()?;
        let removed = encounter.participants.remove(&id)?;
        encounter.order.retain(|p| *p != id);
        tracing::debug!(participant = %id, name = %removed.display_name, "participant removed");
        Some(removed)
    }

    /// Look up a participant.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.current.as_ref()?.participants.get(&id)
    }

    /// Find a participant by its current display name (case-insensitive).
    pub fn find_by_display_name(&self, name: &str) -> Option<&Participant> {
        let encounter = self.current.as_ref()?;
        encounter
            .order
            .iter()
            .filter_map(|id| encounter.participants.get(id))
            .find(|p| p.display_name.eq_ignore_ascii_case(name.trim()))
    }

    /// Participants of the active encounter, in insertion order.
    pub fn participants(&self) -> Vec<&Participant> {
        self.current
            .as_ref()
            .map(Encounter::participants)
            .unwrap_or_default()
    }

    /// Display name for a participant, or "Unknown".
    pub fn display_name(&self, id: ParticipantId) -> &str {
        self.participant(id)
            .map(|p| p.display_name.as_str())
            .unwrap_or("Unknown")
    }

    /// Set a participant's status. Returns false for unknown IDs.
    pub fn update_status(&mut self, id: ParticipantId, status: ParticipantStatus) -> bool {
        let Some(participant) = self
            .current
            .as_mut()
            .and_then(|e| e.participants.get_mut(&id))
        else {
            return false;
        };
        participant.status = status;
        true
    }

    /// Reveal a participant's real name.
    ///
    /// Linked participants forward the reveal to the registry; unlinked,
    /// non-generic ones are promoted right away. Unknown IDs are ignored.
    pub fn reveal_participant_name(
        &mut self,
        id: ParticipantId,
        real_name: &str,
        registry: Option<&mut dyn WorldRegistry>,
    ) -> Option<&Participant> {
        let real_name = real_name.trim();
        if real_name.is_empty() {
            return self.participant(id);
        }
        let fallback_occupation = self.config.fallback_occupation.clone();
        let encounter = self.current.as_mut()?;
        let context = PromotionContext::of(encounter, &fallback_occupation);
        let participant = encounter.participants.get_mut(&id)?;

        let previous = std::mem::replace(&mut participant.display_name, real_name.to_string());
        participant.real_name = Some(real_name.to_string());
        participant.party_knows_name = true;
        tracing::info!(participant = %id, from = %previous, to = real_name, "name revealed");

        match (participant.registry_id, registry) {
            (Some(entity_id), Some(registry)) => {
                if let Err(e) = forward_reveal(registry, entity_id, real_name) {
                    tracing::warn!(entity = %entity_id, error = %e, "registry reveal failed");
                }
            }
            (None, Some(registry)) if !participant.is_generic => {
                if let Err(e) = promote(registry, participant, &context) {
                    tracing::warn!(participant = %id, error = %e, "promotion failed");
                }
            }
            (_, None) if !participant.is_generic => {
                tracing::warn!(participant = %id, "no world registry; reveal kept session-local");
            }
            _ => {}
        }
        Some(&*participant)
    }

    /// Re-sync participants linked to `entity_id` after the registry itself
    /// revealed a name. Returns how many participants changed.
    pub fn handle_registry_reveal(&mut self, entity_id: EntityId, name: &str) -> usize {
        let Some(encounter) = self.current.as_mut() else {
            return 0;
        };
        let mut updated = 0;
        for participant in encounter.participants.values_mut() {
            if participant.registry_id == Some(entity_id) {
                participant.display_name = name.to_string();
                participant.real_name = Some(name.to_string());
                participant.party_knows_name = true;
                updated += 1;
            }
        }
        updated
    }

    /// End the encounter: promote every eligible participant, then clear all
    /// session state. Failed promotions are logged and skipped. Ending with
    /// no active encounter returns an empty summary.
    pub fn end(&mut self, mut registry: Option<&mut dyn WorldRegistry>) -> EncounterSummary {
        let Some(mut encounter) = self.current.take() else {
            return EncounterSummary::default();
        };
        let context = PromotionContext::of(&encounter, &self.config.fallback_occupation);
        let mut summary = EncounterSummary {
            encounter_id: Some(encounter.id.clone()),
            ..EncounterSummary::default()
        };

        for id in &encounter.order {
            let Some(participant) = encounter.participants.get_mut(id) else {
                continue;
            };
            if !participant.is_promotable() {
                summary.discarded += 1;
                continue;
            }
            let Some(registry) = registry.as_deref_mut() else {
                summary.failed += 1;
                continue;
            };
            match promote(registry, participant, &context) {
                Ok(entity_id) => summary.promoted.push(Promotion {
                    name: participant.real_name.clone().unwrap_or_default(),
                    entity_id,
                }),
                Err(e) => {
                    tracing::warn!(participant = %id, error = %e, "promotion failed");
                    summary.failed += 1;
                }
            }
        }

        if registry.is_none() && summary.failed > 0 {
            tracing::warn!(
                encounter = %encounter.id,
                lost = summary.failed,
                "no world registry; named participants not promoted"
            );
        }
        tracing::info!(
            encounter = %encounter.id,
            promoted = summary.promoted.len(),
            discarded = summary.discarded,
            "encounter ended"
        );
        summary
    }
}

/// Encounter facts copied onto promoted registry entries.
struct PromotionContext {
    encounter_id: String,
    location: String,
    started_at: DateTime<Utc>,
    fallback_occupation: String,
}

impl PromotionContext {
    fn of(encounter: &Encounter, fallback_occupation: &str) -> Self {
        Self {
            encounter_id: encounter.id.clone(),
            location: encounter.location.clone(),
            started_at: encounter.started_at,
            fallback_occupation: fallback_occupation.to_string(),
        }
    }
}

fn build_participant(
    encounter: &mut Encounter,
    data: ParticipantData,
    registry: Option<&dyn WorldRegistry>,
) -> Participant {
    let is_generic = data.infer_generic();
    let name = data
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let linked = data
        .registry_id
        .and_then(|id| registry.and_then(|r| r.get_entity(id)));

    let (real_name, generic_name, display_name, party_knows_name) = match linked {
        Some(entity) if !is_generic => (
            Some(entity.name.clone()),
            entity.generic_name.clone(),
            entity.display_name().to_string(),
            entity.party_knows_name,
        ),
        _ => match name.filter(|n| !is_generic && !is_generic_name(n)) {
            Some(name) => (Some(name.clone()), None, name, true),
            None => {
                let base = base_name(&data.occupation, &data.race, &data.class);
                let generic = encounter.next_generic_name(&base);
                (None, Some(generic.clone()), generic, data.party_knows_name)
            }
        },
    };

    Participant {
        id: data.id.unwrap_or_default(),
        registry_id: data.registry_id,
        real_name,
        generic_name,
        display_name,
        party_knows_name,
        is_player_character: data.is_player_character,
        is_generic,
        race: data.race,
        class: data.class,
        occupation: data.occupation,
        stats: data.stats.unwrap_or_default(),
        status: ParticipantStatus::Active,
    }
}

fn forward_reveal(
    registry: &mut dyn WorldRegistry,
    entity_id: EntityId,
    real_name: &str,
) -> TwResult<()> {
    let renamed = registry
        .get_entity(entity_id)
        .is_some_and(|e| !e.name.eq_ignore_ascii_case(real_name));
    if renamed {
        registry.update_entity(
            entity_id,
            EntityUpdate {
                name: Some(real_name.to_string()),
                ..EntityUpdate::default()
            },
        )?;
    }
    registry.reveal_name(entity_id)
}

/// Write a participant to the registry: update its linked entry, else adopt
/// an NPC with the same name, else create one. Links the participant.
fn promote(
    registry: &mut dyn WorldRegistry,
    participant: &mut Participant,
    context: &PromotionContext,
) -> TwResult<EntityId> {
    let Some(real_name) = participant.real_name.clone() else {
        return Err(tw_core::TwError::Unavailable(format!(
            "participant {} has no real name",
            participant.id
        )));
    };

    let existing = participant.registry_id.or_else(|| {
        registry
            .find_entity_by_name(&EntityKind::Npc, &real_name)
            .map(|e| e.id)
    });

    let entity_id = match existing {
        Some(entity_id) => {
            registry.update_entity(
                entity_id,
                EntityUpdate {
                    name: Some(real_name.clone()),
                    generic_name: participant.generic_name.clone(),
                    party_knows_name: Some(participant.party_knows_name),
                    race: non_empty(&participant.race),
                    class: non_empty(&participant.class),
                    occupation: non_empty(&participant.occupation),
                    current_location: Some(context.location.clone()),
                    ..EntityUpdate::default()
                },
            )?;
            entity_id
        }
        None => {
            let mut entity = Entity::new(EntityKind::Npc, real_name.clone())
                .with_known_name(participant.party_knows_name);
            entity.generic_name = participant.generic_name.clone();
            entity.race = participant.race.clone();
            entity.class = participant.class.clone();
            entity.occupation = [&participant.occupation, &participant.class]
                .into_iter()
                .find(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| context.fallback_occupation.clone());
            entity.current_location = Some(context.location.clone());
            entity.first_encountered_in = Some(context.encounter_id.clone());
            entity.first_encountered_at = Some(context.started_at);
            registry.create_entity(entity)?
        }
    };

    participant.registry_id = Some(entity_id);
    tracing::info!(name = %real_name, entity = %entity_id, "promoted to world registry");
    Ok(entity_id)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
