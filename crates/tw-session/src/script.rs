//! Scripted session input and the report a replay produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tw_choice::{Category, ChoiceAnalysis, ChoiceInput, Effect, PersonalityView, WorldEvent};
use tw_encounter::{EncounterSummary, ParticipantData, ParticipantStatus};
use tw_scene::CombatStart;

/// One narrative event, processed to completion before the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SessionStep {
    /// Narrator text: extract mentions and add them to the encounter.
    Narrate {
        /// The narration.
        text: String,
    },
    /// Start an encounter, discarding any active one.
    StartEncounter {
        /// Where it takes place.
        #[serde(default)]
        location: Option<String>,
    },
    /// End the active encounter and promote its named participants.
    EndEncounter,
    /// Add a participant by hand.
    AddParticipant {
        /// Participant data.
        participant: ParticipantData,
    },
    /// Reveal the real name of a participant, found by display name.
    Reveal {
        /// Current display name.
        participant: String,
        /// The real name.
        name: String,
    },
    /// Change a participant's status, found by display name.
    SetStatus {
        /// Current display name.
        participant: String,
        /// New status.
        status: ParticipantStatus,
    },
    /// Record a player decision.
    Choose {
        /// The decision.
        choice: ChoiceInput,
    },
    /// Deliver a world event to waiting seeds.
    Event {
        /// The event.
        event: WorldEvent,
    },
    /// Add a player character to the party.
    AddPartyMember {
        /// Character name.
        name: String,
    },
}

/// A replayable session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Player-character names known from the start.
    #[serde(default)]
    pub party: Vec<String>,
    /// Starting trust per character ID.
    #[serde(default)]
    pub relationships: BTreeMap<String, i32>,
    /// Steps in order.
    #[serde(default)]
    pub steps: Vec<SessionStep>,
}

impl SessionScript {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Narration was processed.
    Narrated {
        /// Display names of the participants added.
        added: Vec<String>,
        /// Combat-start payload, when the narration opens a fight.
        combat: Option<CombatStart>,
    },
    /// An encounter started.
    EncounterStarted {
        /// Its ID.
        encounter_id: String,
    },
    /// An encounter ended.
    EncounterEnded {
        /// What happened to its participants.
        summary: EncounterSummary,
    },
    /// A participant was added by hand.
    ParticipantAdded {
        /// Display name.
        participant: String,
    },
    /// A name was revealed.
    Revealed {
        /// Display name before the reveal.
        from: String,
        /// The real name.
        to: String,
    },
    /// A status changed.
    StatusChanged {
        /// Display name.
        participant: String,
        /// New status.
        status: ParticipantStatus,
    },
    /// A choice was recorded.
    ChoiceRecorded {
        /// The choice ID.
        choice_id: String,
        /// Its categories.
        categories: Vec<Category>,
        /// Its moral weight.
        moral_weight: i32,
        /// Its narrative impact.
        narrative_impact: f64,
        /// Number of immediate consequences.
        consequences: usize,
        /// Number of seeds planted.
        seeds: usize,
    },
    /// A world event was delivered.
    EventProcessed {
        /// Effects released by fired seeds.
        effects: Vec<Effect>,
    },
    /// A party member was added.
    PartyMemberAdded {
        /// Name.
        name: String,
    },
    /// The step referred to something that does not exist.
    Skipped {
        /// Why.
        reason: String,
    },
}

/// The result of replaying a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// One outcome per step.
    pub outcomes: Vec<StepOutcome>,
    /// Names promoted into the registry, in order.
    pub promoted: Vec<String>,
    /// Every effect released during the replay.
    pub effects: Vec<Effect>,
    /// Registry NPC display names at the end of the replay.
    pub world_npcs: Vec<String>,
    /// Personality at the end of the replay.
    pub personality: PersonalityView,
    /// Choice statistics at the end of the replay.
    pub analysis: ChoiceAnalysis,
}
