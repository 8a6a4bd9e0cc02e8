//! The choice engine: owns every accumulator and runs the recording pipeline.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tw_core::{KeyValueStore, RelationshipLedger, WorldRegistry};

use crate::analysis::{self, ChoiceAnalysis};
use crate::arc::{NpcArc, PlayerArc};
use crate::choice::{ArcInfluence, Category, Choice, ChoiceContext, ChoiceId, ChoiceInput, Stakes};
use crate::config::ChoiceConfig;
use crate::consequence::{self, Consequence};
use crate::error::ChoiceResult;
use crate::personality::{MoralAlignment, PersonalityProfile, PersonalityView};
use crate::scoring;
use crate::seed::{
    Effect, EffectSeed, Polarity, SeedCondition, SeedKind, SeedPool, SeedStatus, TriggerKind,
    WorldEvent,
};

/// Key under which [`ChoiceEngine::save_to`] stores its snapshot.
pub const CHOICE_STORE_KEY: &str = "choice_tracking";

/// The external stores a choice writes through. Either may be absent; the
/// engine then keeps the effect locally and logs a warning.
#[derive(Default)]
pub struct Collaborators<'a> {
    /// Relationship ledger for trust changes and arc lookups.
    pub ledger: Option<&'a mut dyn RelationshipLedger>,
    /// World registry for world-state flags.
    pub registry: Option<&'a mut dyn WorldRegistry>,
}

impl<'a> Collaborators<'a> {
    /// No collaborators at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach a ledger.
    pub fn with_ledger(mut self, ledger: &'a mut dyn RelationshipLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Attach a registry.
    pub fn with_registry(mut self, registry: &'a mut dyn WorldRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Serializable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSnapshot {
    /// Every recorded choice, oldest first.
    pub choices: Vec<Choice>,
    /// Immediate consequences per choice.
    pub consequence_chains: BTreeMap<ChoiceId, Vec<Consequence>>,
    /// Trait tallies.
    pub personality: PersonalityProfile,
    /// The player arc, once a choice exists.
    pub player_arc: Option<PlayerArc>,
    /// Arcs of characters the player has influenced.
    pub npc_arcs: BTreeMap<String, NpcArc>,
    /// Seeds still waiting.
    pub seeds: SeedPool,
    /// In-world day counter.
    pub world_day: u32,
}

/// Records player decisions and tracks what they set in motion.
#[derive(Debug, Clone, Default)]
pub struct ChoiceEngine {
    config: ChoiceConfig,
    history: Vec<Choice>,
    index: HashMap<ChoiceId, usize>,
    consequence_chains: BTreeMap<ChoiceId, Vec<Consequence>>,
    seeds: SeedPool,
    profile: PersonalityProfile,
    player_arc: Option<PlayerArc>,
    npc_arcs: BTreeMap<String, NpcArc>,
    world_day: u32,
}

impl ChoiceEngine {
    /// Create an empty engine.
    pub fn new(config: ChoiceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuild an engine from a snapshot.
    pub fn from_snapshot(config: ChoiceConfig, snapshot: ChoiceSnapshot) -> Self {
        let mut engine = Self::new(config);
        engine.import(snapshot);
        engine
    }

    /// The engine configuration.
    pub fn config(&self) -> &ChoiceConfig {
        &self.config
    }

    /// Record a decision. Runs the whole pipeline (categorize, score, arc
    /// influence, personality, consequences, seeds, arcs) before the choice
    /// is stored, and returns the stored record.
    pub fn record_choice(&mut self, input: ChoiceInput, collaborators: Collaborators<'_>) -> &Choice {
        let Collaborators {
            mut ledger,
            mut registry,
        } = collaborators;

        let mut context = input.context;
        if context.location.trim().is_empty() {
            context.location = self.config.location_fallback.clone();
        }
        let selected = input.selected_option.to_lowercase();
        let text = format!("{} {}", input.description, input.selected_option).to_lowercase();

        let categories = scoring::categorize(&text, &context);
        let moral_weight = scoring::moral_weight(&selected, context.stakes);
        let sides = scoring::trait_sides(&selected);
        let alignment =
            scoring::pattern_alignment(&sides, &self.profile, self.config.dominant_trait_count);
        let narrative_impact =
            scoring::narrative_impact(&context, alignment, self.config.novelty_multiplier);
        tracing::debug!(
            categories = categories.len(),
            moral_weight,
            narrative_impact,
            alignment,
            "choice scored"
        );

        let delta = scoring::relationship_delta(&selected);
        let arc_influence: Vec<ArcInfluence> = match ledger.as_deref() {
            Some(ledger) => context
                .characters
                .iter()
                .filter_map(|c| ledger.get_relationship(c))
                .map(|view| scoring::arc_influence(&view, delta, moral_weight, narrative_impact))
                .collect(),
            None => Vec::new(),
        };

        let intensity = if moral_weight != 0 {
            moral_weight.unsigned_abs()
        } else {
            1
        };
        for side in &sides {
            self.profile.add(*side, intensity);
        }

        let mut id = ChoiceId::new();
        while self.index.contains_key(&id) {
            id = ChoiceId::new();
        }

        let consequences = consequence::derive(&selected, &context, delta);
        consequence::apply(
            &consequences,
            &input.description,
            ledger.as_deref_mut(),
            registry.as_deref_mut(),
        );
        self.consequence_chains
            .insert(id.clone(), consequences.clone());

        let timestamp = Utc::now();
        let planted = self.plan_seeds(
            &id,
            &categories,
            moral_weight,
            &context,
            delta,
            &selected,
            timestamp,
        );
        let seed_ids: Vec<String> = planted.iter().map(|s| s.id.clone()).collect();
        for seed in planted {
            tracing::debug!(seed = %seed.id, trigger = %seed.trigger, "seed planted");
            self.seeds.plant(seed);
        }

        let choice = Choice {
            id: id.clone(),
            timestamp,
            description: input.description,
            options: input.options,
            selected_option: input.selected_option,
            context,
            categories,
            moral_weight,
            narrative_impact,
            arc_influence,
            consequences,
            seed_ids,
        };

        let themes = scoring::themes(&text);
        let alignment = MoralAlignment::from_weights(
            self.history
                .iter()
                .chain(std::iter::once(&choice))
                .filter(|c| c.has_category(Category::Moral))
                .map(|c| c.moral_weight),
        );
        self.player_arc.get_or_insert_with(PlayerArc::default).absorb(
            &choice,
            &themes,
            self.config.key_moment_threshold,
            self.profile.tallies(),
            alignment,
        );
        for influence in &choice.arc_influence {
            self.npc_arcs
                .entry(influence.character_id.clone())
                .or_default()
                .absorb(&choice, influence);
        }

        tracing::info!(
            choice = %id,
            moral_weight = choice.moral_weight,
            impact = choice.narrative_impact,
            consequences = choice.consequences.len(),
            seeds = choice.seed_ids.len(),
            "choice recorded"
        );

        let pos = self.history.len();
        self.history.push(choice);
        self.index.insert(id, pos);
        &self.history[pos]
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_seeds(
        &self,
        id: &ChoiceId,
        categories: &[Category],
        moral_weight: i32,
        context: &ChoiceContext,
        delta: i32,
        selected: &str,
        planted_at: DateTime<Utc>,
    ) -> Vec<EffectSeed> {
        let mut specs: Vec<(SeedKind, TriggerKind, SeedCondition, String, f64)> = Vec::new();

        if categories.contains(&Category::Moral) && moral_weight != 0 {
            let (polarity, shift) = if moral_weight > 0 {
                (Polarity::Good, "positive")
            } else {
                (Polarity::Evil, "negative")
            };
            specs.push((
                SeedKind::Reputation,
                TriggerKind::TimePassage,
                SeedCondition::MoralThreshold {
                    polarity,
                    min_days: self.config.reputation_delay_days,
                },
                format!("reputation_shift_{shift}"),
                f64::from(moral_weight.abs()),
            ));
        }

        if categories.contains(&Category::Social) {
            let magnitude = if delta != 0 { f64::from(delta.abs()) } else { 1.0 };
            for character in &context.characters {
                specs.push((
                    SeedKind::CharacterMemory,
                    TriggerKind::CharacterEncounter,
                    SeedCondition::MeetCharacter {
                        character_id: character.clone(),
                    },
                    "modified_dialogue_options".to_string(),
                    magnitude,
                ));
            }
        }

        if categories.contains(&Category::Tactical) && context.stakes == Stakes::High {
            specs.push((
                SeedKind::SkillDevelopment,
                TriggerKind::SimilarSituation,
                SeedCondition::SimilarChoice {
                    skill_area: scoring::skill_area(selected),
                },
                "enhanced_options".to_string(),
                1.0,
            ));
        }

        specs
            .into_iter()
            .enumerate()
            .map(|(n, (kind, trigger, condition, consequence, magnitude))| EffectSeed {
                id: format!("seed_{id}_{n}"),
                kind,
                trigger,
                condition,
                consequence,
                magnitude,
                source_choice: id.clone(),
                planted_at,
                planted_day: self.world_day,
            })
            .collect()
    }

    /// Deliver a world event to the seeds subscribed to its trigger kind.
    /// Matching seeds fire and are removed. Time passage advances the
    /// world day before matching.
    pub fn check_triggers(&mut self, event: &WorldEvent) -> Vec<Effect> {
        if let WorldEvent::TimePassage { days } = event {
            self.world_day = self.world_day.saturating_add(*days);
        }
        let effects: Vec<Effect> = self
            .seeds
            .fire(event, self.world_day)
            .into_iter()
            .map(EffectSeed::release)
            .collect();
        if effects.is_empty() {
            tracing::debug!(trigger = %event.trigger_kind(), "no seeds fired");
        } else {
            tracing::info!(
                trigger = %event.trigger_kind(),
                count = effects.len(),
                "effects triggered"
            );
        }
        effects
    }

    /// Fire one seed by ID regardless of its condition.
    pub fn force_trigger(&mut self, seed_id: &str) -> Option<Effect> {
        let seed = self.seeds.take(seed_id)?;
        tracing::info!(seed = %seed.id, "seed forced");
        Some(seed.release())
    }

    /// Alignment over every moral-category choice.
    pub fn moral_alignment(&self) -> MoralAlignment {
        MoralAlignment::from_weights(
            self.history
                .iter()
                .filter(|c| c.has_category(Category::Moral))
                .map(|c| c.moral_weight),
        )
    }

    /// Derived personality view.
    pub fn personality_profile(&self) -> PersonalityView {
        PersonalityView {
            traits: self.profile.percentages(),
            dominant_traits: self.profile.dominant(self.config.dominant_trait_count),
            moral_alignment: self.moral_alignment(),
            narrative_personality: self.profile.narrative_personality().to_string(),
        }
    }

    /// Raw trait tallies.
    pub fn personality(&self) -> &PersonalityProfile {
        &self.profile
    }

    /// Campaign statistics.
    pub fn choice_analysis(&self) -> ChoiceAnalysis {
        analysis::analyze(
            &self.history,
            &self.profile,
            self.seeds.len(),
            self.player_arc.as_ref(),
            self.config.key_moment_threshold,
        )
    }

    /// Immediate consequences of a choice; empty for unknown IDs.
    pub fn consequence_chain(&self, id: &ChoiceId) -> &[Consequence] {
        self.consequence_chains
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every recorded choice, oldest first.
    pub fn choice_history(&self) -> &[Choice] {
        &self.history
    }

    /// Look up a choice by ID.
    pub fn choice(&self, id: &ChoiceId) -> Option<&Choice> {
        self.index.get(id).and_then(|pos| self.history.get(*pos))
    }

    /// Summary of waiting seeds.
    pub fn seed_status(&self) -> SeedStatus {
        self.seeds.status()
    }

    /// The player arc, once a choice exists.
    pub fn player_arc(&self) -> Option<&PlayerArc> {
        self.player_arc.as_ref()
    }

    /// A character's arc, once a choice has influenced them.
    pub fn npc_arc(&self, character_id: &str) -> Option<&NpcArc> {
        self.npc_arcs.get(character_id)
    }

    /// In-world days passed.
    pub fn world_day(&self) -> u32 {
        self.world_day
    }

    /// Copy the full state out.
    pub fn export(&self) -> ChoiceSnapshot {
        ChoiceSnapshot {
            choices: self.history.clone(),
            consequence_chains: self.consequence_chains.clone(),
            personality: self.profile.clone(),
            player_arc: self.player_arc.clone(),
            npc_arcs: self.npc_arcs.clone(),
            seeds: self.seeds.clone(),
            world_day: self.world_day,
        }
    }

    /// Replace the full state with a snapshot.
    pub fn import(&mut self, snapshot: ChoiceSnapshot) {
        self.index = snapshot
            .choices
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id.clone(), pos))
            .collect();
        self.history = snapshot.choices;
        self.consequence_chains = snapshot.consequence_chains;
        self.profile = snapshot.personality;
        self.player_arc = snapshot.player_arc;
        self.npc_arcs = snapshot.npc_arcs;
        self.seeds = snapshot.seeds;
        self.world_day = snapshot.world_day;
        tracing::debug!(choices = self.history.len(), "choice state imported");
    }

    /// Write the snapshot as JSON under [`CHOICE_STORE_KEY`].
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> ChoiceResult<()> {
        let json = serde_json::to_string(&self.export())?;
        store.set(CHOICE_STORE_KEY, json)?;
        Ok(())
    }

    /// Read an engine back from a store. An empty store yields an empty
    /// engine.
    pub fn load_from(config: ChoiceConfig, store: &dyn KeyValueStore) -> ChoiceResult<Self> {
        match store.get(CHOICE_STORE_KEY) {
            Some(json) => {
                let snapshot: ChoiceSnapshot = serde_json::from_str(&json)?;
                Ok(Self::from_snapshot(config, snapshot))
            }
            None => Ok(Self::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::NarrativeDirection;
    use crate::choice::{ArcDirection, ArcType};
    use crate::personality::Trait;
    use crate::seed::SkillArea;
    use tw_core::{InMemoryLedger, InMemoryRegistry, MemoryStore, MetadataValue};

    fn engine() -> ChoiceEngine {
        ChoiceEngine::new(ChoiceConfig::default())
    }

    fn negotiate() -> ChoiceInput {
        ChoiceInput::new("Negotiate with the bandit chief", "Offer them safe passage")
            .with_options(["Attack", "Offer them safe passage"])
            .involving(["bandit_chief"])
            .with_stakes(Stakes::High)
            .at("Millbrook")
    }

    #[test]
    fn bandit_chief_negotiation() {
        let mut engine = engine();
        let mut ledger = InMemoryLedger::new();
        ledger.set_relationship("bandit_chief", 20);

        let choice = engine
            .record_choice(negotiate(), Collaborators::none().with_ledger(&mut ledger))
            .clone();

        assert!(choice.has_category(Category::Social));
        assert!(choice.has_category(Category::HighStakes));
        assert!(choice.has_category(Category::InvolvesNpcs));
        assert_eq!(choice.moral_weight, 0);
        assert_eq!(choice.narrative_impact, 3.5);
        assert_eq!(
            choice.consequences,
            vec![Consequence::Relationship {
                target: "bandit_chief".into(),
                change: 1,
                description: "bandit_chief approves of your choice".into(),
            }]
        );
        let rel = ledger.get_relationship("bandit_chief").unwrap();
        assert_eq!(rel.trust, 21);
        assert_eq!(rel.notes[0].reason, "Negotiate with the bandit chief");

        assert_eq!(choice.arc_influence.len(), 1);
        assert_eq!(choice.arc_influence[0].arc_type, ArcType::Reconciliation);
        assert_eq!(choice.arc_influence[0].direction, ArcDirection::Positive);
        assert_eq!(choice.arc_influence[0].magnitude, 1.75);
        assert_eq!(engine.npc_arc("bandit_chief").unwrap().trust, 1.75);

        assert_eq!(choice.seed_ids, vec![format!("seed_{}_0", choice.id)]);
        assert_eq!(engine.consequence_chain(&choice.id), choice.consequences.as_slice());
    }

    #[test]
    fn offer_gold_for_safe_passage_with_both_stores() {
        let mut engine = engine();
        let mut ledger = InMemoryLedger::new();
        ledger.set_relationship("bandit_chief", 20);
        let mut registry = InMemoryRegistry::new();

        let input = ChoiceInput::new("Negotiate with the bandit chief", "offer gold for safe passage")
            .with_options(["Attack", "offer gold for safe passage"])
            .involving(["bandit_chief"])
            .with_stakes(Stakes::High)
            .at("Millbrook");
        let choice = engine
            .record_choice(
                input,
                Collaborators::none()
                    .with_ledger(&mut ledger)
                    .with_registry(&mut registry),
            )
            .clone();

        assert_eq!(
            choice.categories,
            vec![Category::Social, Category::HighStakes, Category::InvolvesNpcs]
        );
        assert_eq!(choice.moral_weight, 0);
        assert_eq!(choice.narrative_impact, 3.5);
        assert_eq!(choice.consequences.len(), 1);
        assert_eq!(
            choice.consequences[0].description(),
            "bandit_chief approves of your choice"
        );
        assert_eq!(ledger.get_relationship("bandit_chief").unwrap().trust, 21);
        assert!(registry.world_state("location_Millbrook_protected").is_none());
        assert_eq!(choice.arc_influence[0].arc_type, ArcType::Reconciliation);
        assert_eq!(choice.arc_influence[0].magnitude, 1.75);
    }

    #[test]
    fn no_arc_influence_without_ledger_entry() {
        let mut engine = engine();
        let mut ledger = InMemoryLedger::new();
        let choice = engine
            .record_choice(negotiate(), Collaborators::none().with_ledger(&mut ledger))
            .clone();
        assert!(choice.arc_influence.is_empty());
        assert!(engine.npc_arc("bandit_chief").is_none());
        assert_eq!(ledger.get_relationship("bandit_chief").unwrap().trust, 51);
    }

    #[test]
    fn missing_collaborators_keep_consequences_locally() {
        let mut engine = engine();
        let choice = engine
            .record_choice(
                ChoiceInput::new("Guard the gate", "Protect the villagers").involving(["mira"]),
                Collaborators::none(),
            )
            .clone();
        assert_eq!(choice.context.location, "Unknown");
        let kinds: Vec<&str> = choice.consequences.iter().map(Consequence::kind).collect();
        assert_eq!(kinds, vec!["relationship", "world_state"]);
        assert_eq!(engine.consequence_chain(&choice.id).len(), 2);
    }

    #[test]
    fn world_flags_reach_registry() {
        let mut engine = engine();
        let mut registry = InMemoryRegistry::new();
        engine.record_choice(
            ChoiceInput::new("The mill burns", "Burn it to the ground").at("Millbrook"),
            Collaborators::none().with_registry(&mut registry),
        );
        assert_eq!(
            registry.world_state("location_Millbrook_destroyed"),
            Some(&MetadataValue::Boolean(true))
        );
    }

    #[test]
    fn personality_and_novelty() {
        let mut engine = engine();
        let first = engine
            .record_choice(ChoiceInput::new("A farmer is hurt", "Help the farmer"), Collaborators::none())
            .narrative_impact;
        assert_eq!(first, 1.0);
        assert_eq!(engine.personality().value(Trait::Compassionate), 2);

        let unusual = engine
            .record_choice(ChoiceInput::new("A wolf blocks the road", "Kill the wolf"), Collaborators::none())
            .narrative_impact;
        assert_eq!(unusual, 1.5);
        assert_eq!(engine.personality().value(Trait::Ruthless), 3);

        let view = engine.personality_profile();
        assert_eq!(view.dominant_traits[0], (Trait::Ruthless, 3));
        assert_eq!(view.traits[&Trait::Ruthless], 60.0);
        assert_eq!(view.narrative_personality, "The Conqueror");
    }

    #[test]
    fn neutral_choice_credits_one_point() {
        let mut engine = engine();
        engine.record_choice(ChoiceInput::new("Door", "Wait and listen"), Collaborators::none());
        assert_eq!(engine.personality().value(Trait::Cautious), 1);
    }

    #[test]
    fn reputation_seed_waits_for_days() {
        let mut engine = engine();
        let choice = engine
            .record_choice(ChoiceInput::new("Spare the thief", "Show mercy and help him"), Collaborators::none())
            .clone();
        assert!(choice.has_category(Category::Moral));
        assert_eq!(choice.moral_weight, 3);
        assert_eq!(choice.seed_ids.len(), 1);

        assert!(engine.check_triggers(&WorldEvent::TimePassage { days: 3 }).is_empty());
        let effects = engine.check_triggers(&WorldEvent::TimePassage { days: 4 });
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, SeedKind::Reputation);
        assert_eq!(effects[0].magnitude, 3.0);
        assert_eq!(effects[0].consequence, "reputation_shift_positive");
        assert_eq!(engine.world_day(), 7);
        assert!(engine.check_triggers(&WorldEvent::TimePassage { days: 30 }).is_empty());
    }

    #[test]
    fn memory_seed_fires_once_per_encounter() {
        let mut engine = engine();
        engine.record_choice(negotiate(), Collaborators::none());
        let meet = WorldEvent::NpcInteraction {
            character_id: "bandit_chief".into(),
        };
        // unrelated trigger kinds leave the seed alone
        assert!(engine.check_triggers(&WorldEvent::TimePassage { days: 100 }).is_empty());
        let effects = engine.check_triggers(&meet);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].target.as_deref(), Some("bandit_chief"));
        assert!(engine.check_triggers(&meet).is_empty());
        assert_eq!(engine.seed_status().active, 0);
    }

    #[test]
    fn skill_seed_matches_area() {
        let mut engine = engine();
        engine.record_choice(
            ChoiceInput::new("Infiltrate the keep with stealth", "Sneak past the guards")
                .with_stakes(Stakes::High),
            Collaborators::none(),
        );
        let status = engine.seed_status();
        assert_eq!(status.by_trigger[&TriggerKind::SimilarSituation], 1);

        let opportunity = |area| WorldEvent::ChoiceOpportunity {
            categories: vec![Category::Tactical],
            skill_area: Some(area),
        };
        assert!(engine.check_triggers(&opportunity(SkillArea::Deception)).is_empty());
        assert_eq!(engine.check_triggers(&opportunity(SkillArea::Stealth)).len(), 1);
    }

    #[test]
    fn force_trigger_consumes_seed() {
        let mut engine = engine();
        let seed_id = engine
            .record_choice(negotiate(), Collaborators::none())
            .seed_ids[0]
            .clone();
        let effect = engine.force_trigger(&seed_id).unwrap();
        assert_eq!(effect.seed_id, seed_id);
        assert!(engine.force_trigger(&seed_id).is_none());
        assert!(engine.force_trigger("seed_unknown_0").is_none());
    }

    #[test]
    fn key_moments_and_direction() {
        let mut engine = engine();
        engine.record_choice(
            ChoiceInput::new("The traitor kneels", "Help him up")
                .with_stakes(Stakes::High)
                .involving(["aldric"]),
            Collaborators::none(),
        );
        let arc = engine.player_arc().unwrap();
        assert_eq!(arc.progression, 1);
        assert_eq!(arc.key_moments.len(), 0);
        assert_eq!(arc.narrative_direction, NarrativeDirection::Discovery);

        engine.record_choice(
            ChoiceInput::new("Seek redemption for the order", "Help the wounded")
                .with_stakes(Stakes::High)
                .involving(["aldric", "mira", "tomas", "edda"]),
            Collaborators::none(),
        );
        let arc = engine.player_arc().unwrap();
        assert_eq!(arc.progression, 2);
        assert_eq!(arc.key_moments.len(), 1);
        assert_eq!(arc.narrative_direction, NarrativeDirection::Redemption);
    }

    #[test]
    fn unknown_ids_are_neutral() {
        let engine = engine();
        let id = ChoiceId("choice_missing".into());
        assert!(engine.consequence_chain(&id).is_empty());
        assert!(engine.choice(&id).is_none());
        assert!(engine.player_arc().is_none());
        assert_eq!(engine.choice_analysis().total_choices, 0);
    }

    #[test]
    fn export_import_reproduces_analysis() {
        let mut engine = engine();
        let mut ledger = InMemoryLedger::new();
        ledger.set_relationship("bandit_chief", 60);
        engine.record_choice(negotiate(), Collaborators::none().with_ledger(&mut ledger));
        engine.record_choice(
            ChoiceInput::new("Spare the thief", "Show mercy and help him"),
            Collaborators::none(),
        );
        engine.check_triggers(&WorldEvent::TimePassage { days: 2 });

        let json = serde_json::to_string(&engine.export()).unwrap();
        let snapshot: ChoiceSnapshot = serde_json::from_str(&json).unwrap();
        let restored = ChoiceEngine::from_snapshot(ChoiceConfig::default(), snapshot);

        assert_eq!(restored.choice_analysis(), engine.choice_analysis());
        assert_eq!(restored.choice_history().len(), 2);
        assert_eq!(restored.world_day(), 2);
        assert_eq!(restored.seed_status().active, engine.seed_status().active);
        let first = &engine.choice_history()[0];
        assert_eq!(restored.choice(&first.id).map(|c| &c.description), Some(&first.description));
    }

    #[test]
    fn save_and_load_through_store() {
        let mut engine = engine();
        engine.record_choice(negotiate(), Collaborators::none());
        let mut store = MemoryStore::new();
        engine.save_to(&mut store).unwrap();

        let loaded = ChoiceEngine::load_from(ChoiceConfig::default(), &store).unwrap();
        assert_eq!(loaded.choice_analysis(), engine.choice_analysis());

        let empty = ChoiceEngine::load_from(ChoiceConfig::default(), &MemoryStore::new()).unwrap();
        assert_eq!(empty.choice_history().len(), 0);
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(CHOICE_STORE_KEY, "not json".to_string()).unwrap();
        assert!(ChoiceEngine::load_from(ChoiceConfig::default(), &store).is_err());
    }
}
