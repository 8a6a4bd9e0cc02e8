//! Table session management.
//!
//! `TableSession` owns one set of in-memory collaborators (registry, ledger,
//! party) and wires the scene extractor, the encounter roster and the choice
//! engine to them. Steps are processed one at a time, each to completion.

use rand::SeedableRng;
use rand::rngs::StdRng;

use tw_choice::{Choice, ChoiceEngine, ChoiceInput, Collaborators, Effect, WorldEvent};
use tw_core::{
    EntityKind, InMemoryLedger, InMemoryRegistry, KeyValueStore, PartyRoster, WorldRegistry,
};
use tw_encounter::{
    EncounterRoster, EncounterSummary, Participant, ParticipantData, ParticipantId,
    ParticipantStatus,
};
use tw_scene::{CombatStart, SceneExtraction, extract_mentions};

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::script::{SessionReport, SessionScript, SessionStep, StepOutcome};

/// Store key for the relationship ledger.
pub const LEDGER_KEY: &str = "relationship_ledger";
/// Store key for the party roster.
pub const PARTY_KEY: &str = "party";

/// The result of narrating one piece of text.
#[derive(Debug, Clone)]
pub struct Narration {
    /// What the extractor found.
    pub extraction: SceneExtraction,
    /// Participants added to the encounter, in mention order.
    pub added: Vec<ParticipantId>,
    /// Combat-start payload, when the text opens a fight.
    pub combat: Option<CombatStart>,
}

/// A table session: extractor, roster and choice engine over shared
/// collaborators.
pub struct TableSession {
    config: SessionConfig,
    registry: InMemoryRegistry,
    ledger: InMemoryLedger,
    party: PartyRoster,
    roster: EncounterRoster,
    engine: ChoiceEngine,
    rng: StdRng,
}

impl TableSession {
    /// Create an empty session.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_state(
            config,
            InMemoryRegistry::new(),
            InMemoryLedger::new(),
            PartyRoster::new(),
            None,
        )
    }

    fn with_state(
        config: SessionConfig,
        registry: InMemoryRegistry,
        ledger: InMemoryLedger,
        party: PartyRoster,
        engine: Option<ChoiceEngine>,
    ) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let roster = EncounterRoster::new(config.encounter.clone());
        let engine = engine.unwrap_or_else(|| ChoiceEngine::new(config.choice.clone()));
        Self {
            config,
            registry,
            ledger,
            party,
            roster,
            engine,
            rng,
        }
    }

    /// Get the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the world registry.
    pub fn registry(&self) -> &InMemoryRegistry {
        &self.registry
    }

    /// Get the relationship ledger.
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// Get the relationship ledger for seeding starting trust.
    pub fn ledger_mut(&mut self) -> &mut InMemoryLedger {
        &mut self.ledger
    }

    /// Get the party.
    pub fn party(&self) -> &PartyRoster {
        &self.party
    }

    /// Get the encounter roster.
    pub fn roster(&self) -> &EncounterRoster {
        &self.roster
    }

    /// Get the choice engine.
    pub fn engine(&self) -> &ChoiceEngine {
        &self.engine
    }

    /// Extract mentions from narrator text and add them to the encounter.
    pub fn narrate(&mut self, text: &str) -> Narration {
        let extraction =
            extract_mentions(text, &self.party, &self.config.extractor, &mut self.rng);
        let registry: &dyn WorldRegistry = &self.registry;
        let added = self
            .roster
            .add_mentions(&extraction, Some(registry), &mut self.rng);
        let combat = extraction.combat_start();
        if let Some(start) = &combat {
            tracing::info!(enemies = start.enemies.len(), "combat triggered");
        }
        tracing::debug!(
            mentions = extraction.mentions.len(),
            added = added.len(),
            "narration processed"
        );
        Narration {
            extraction,
            added,
            combat,
        }
    }

    /// Start an encounter and return its ID.
    pub fn start_encounter(&mut self, location: Option<&str>) -> String {
        self.roster.start(location).to_string()
    }

    /// End the active encounter, promoting into the registry.
    pub fn end_encounter(&mut self) -> EncounterSummary {
        let registry: &mut dyn WorldRegistry = &mut self.registry;
        self.roster.end(Some(registry))
    }

    /// Add a participant by hand.
    pub fn add_participant(&mut self, data: ParticipantData) -> &Participant {
        let registry: &dyn WorldRegistry = &self.registry;
        self.roster.add_participant(data, Some(registry))
    }

    /// Reveal the real name of the participant currently shown as
    /// `display_name`. Returns the participant, or `None` when no
    /// participant has that display name.
    pub fn reveal(&mut self, display_name: &str, real_name: &str) -> Option<&Participant> {
        let Some(id) = self.roster.find_by_display_name(display_name).map(|p| p.id) else {
            tracing::warn!(participant = display_name, "no participant to reveal");
            return None;
        };
        let registry: &mut dyn WorldRegistry = &mut self.registry;
        let linked = self
            .roster
            .reveal_participant_name(id, real_name, Some(registry))
            .and_then(|p| p.registry_id.map(|entity| (entity, p.display_name.clone())));
        if let Some((entity, name)) = linked {
            self.roster.handle_registry_reveal(entity, &name);
        }
        self.roster.participant(id)
    }

    /// Change the status of the participant shown as `display_name`.
    pub fn set_status(&mut self, display_name: &str, status: ParticipantStatus) -> bool {
        let Some(id) = self.roster.find_by_display_name(display_name).map(|p| p.id) else {
            tracing::warn!(participant = display_name, "no participant to update");
            return false;
        };
        self.roster.update_status(id, status)
    }

    /// Record a player decision against the session's ledger and registry.
    pub fn record_choice(&mut self, input: ChoiceInput) -> &Choice {
        let collaborators = Collaborators::none()
            .with_ledger(&mut self.ledger)
            .with_registry(&mut self.registry);
        self.engine.record_choice(input, collaborators)
    }

    /// Deliver a world event to waiting seeds.
    pub fn world_event(&mut self, event: &WorldEvent) -> Vec<Effect> {
        self.engine.check_triggers(event)
    }

    /// Add a player character to the party.
    pub fn add_party_member(&mut self, name: &str) {
        self.party.add(name.trim());
    }

    /// Apply one scripted step.
    pub fn apply(&mut self, step: SessionStep) -> StepOutcome {
        match step {
            SessionStep::Narrate { text } => {
                let narration = self.narrate(&text);
                let added = narration
                    .added
                    .iter()
                    .map(|id| self.roster.display_name(*id).to_string())
                    .collect();
                StepOutcome::Narrated {
                    added,
                    combat: narration.combat,
                }
            }
            SessionStep::StartEncounter { location } => StepOutcome::EncounterStarted {
                encounter_id: self.start_encounter(location.as_deref()),
            },
            SessionStep::EndEncounter => StepOutcome::EncounterEnded {
                summary: self.end_encounter(),
            },
            SessionStep::AddParticipant { participant } => StepOutcome::ParticipantAdded {
                participant: self.add_participant(participant).display_name.clone(),
            },
            SessionStep::Reveal { participant, name } => match self.reveal(&participant, &name) {
                Some(p) => StepOutcome::Revealed {
                    from: participant,
                    to: p.display_name.clone(),
                },
                None => StepOutcome::Skipped {
                    reason: format!("no participant named \"{participant}\""),
                },
            },
            SessionStep::SetStatus {
                participant,
                status,
            } => {
                if self.set_status(&participant, status) {
                    StepOutcome::StatusChanged {
                        participant,
                        status,
                    }
                } else {
                    StepOutcome::Skipped {
                        reason: format!("no participant named \"{participant}\""),
                    }
                }
            }
            SessionStep::Choose { choice } => {
                let choice = self.record_choice(choice);
                StepOutcome::ChoiceRecorded {
                    choice_id: choice.id.to_string(),
                    categories: choice.categories.clone(),
                    moral_weight: choice.moral_weight,
                    narrative_impact: choice.narrative_impact,
                    consequences: choice.consequences.len(),
                    seeds: choice.seed_ids.len(),
                }
            }
            SessionStep::Event { event } => StepOutcome::EventProcessed {
                effects: self.world_event(&event),
            },
            SessionStep::AddPartyMember { name } => {
                self.add_party_member(&name);
                StepOutcome::PartyMemberAdded { name }
            }
        }
    }

    /// Replay a whole script and report on the result.
    pub fn run_script(&mut self, script: SessionScript) -> SessionReport {
        for name in &script.party {
            self.add_party_member(name);
        }
        for (character, trust) in script.relationships {
            self.ledger.set_relationship(character, trust);
        }

        let mut outcomes = Vec::with_capacity(script.steps.len());
        let mut promoted = Vec::new();
        let mut effects = Vec::new();
        for step in script.steps {
            let outcome = self.apply(step);
            match &outcome {
                StepOutcome::EncounterEnded { summary } => {
                    promoted.extend(summary.promoted.iter().map(|p| p.name.clone()));
                }
                StepOutcome::EventProcessed { effects: fired } => {
                    effects.extend(fired.iter().cloned());
                }
                _ => {}
            }
            outcomes.push(outcome);
        }
        tracing::info!(steps = outcomes.len(), promoted = promoted.len(), "script replayed");

        SessionReport {
            outcomes,
            promoted,
            effects,
            world_npcs: self
                .registry
                .entities_by_kind(&EntityKind::Npc)
                .iter()
                .map(|e| e.display_name().to_string())
                .collect(),
            personality: self.engine.personality_profile(),
            analysis: self.engine.choice_analysis(),
        }
    }

    /// Persist registry, ledger, party and choice state.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> SessionResult<()> {
        self.registry.save_to(store)?;
        store.set(LEDGER_KEY, serde_json::to_string(&self.ledger)?)?;
        store.set(PARTY_KEY, serde_json::to_string(&self.party)?)?;
        self.engine.save_to(store)?;
        Ok(())
    }

    /// Restore a session saved by [`save`](Self::save). Missing keys start
    /// empty. The encounter roster is session-scoped and always starts idle.
    pub fn load(config: SessionConfig, store: &dyn KeyValueStore) -> SessionResult<Self> {
        let registry = InMemoryRegistry::load_from(store)?;
        let ledger = match store.get(LEDGER_KEY) {
            Some(json) => serde_json::from_str(&json)?,
            None => InMemoryLedger::new(),
        };
        let party = match store.get(PARTY_KEY) {
            Some(json) => serde_json::from_str(&json)?,
            None => PartyRoster::new(),
        };
        let engine = ChoiceEngine::load_from(config.choice.clone(), store)?;
        Ok(Self::with_state(config, registry, ledger, party, Some(engine)))
    }
}
