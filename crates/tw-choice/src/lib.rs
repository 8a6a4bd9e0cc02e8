//! Choice and consequence engine for Taleweaver.
//!
//! A [`ChoiceEngine`] records player decisions. Each call to
//! [`ChoiceEngine::record_choice`] categorizes and scores the decision,
//! applies its immediate consequences through the relationship ledger and
//! world registry, plants deferred [`EffectSeed`]s, and folds the decision
//! into the running personality profile and character arcs.
//!
//! Seeds sit in a subscription table keyed by trigger kind until a matching
//! [`WorldEvent`] is passed to [`ChoiceEngine::check_triggers`].

/// Per-choice analysis and campaign statistics.
pub mod analysis;
/// Player and NPC narrative arcs.
pub mod arc;
/// The choice record and its inputs.
pub mod choice;
/// Engine configuration.
pub mod config;
/// Immediate consequences.
pub mod consequence;
/// The engine and its persistence.
pub mod engine;
/// Error types.
pub mod error;
/// Fixed keyword tables.
pub mod keywords;
/// Personality accumulators.
pub mod personality;
/// Scoring functions.
pub mod scoring;
/// Deferred effect seeds.
pub mod seed;

pub use analysis::{
    ArcProgress, ChoiceAnalysis, ConsequencePatterns, ImpactSummary, KeyDecision, MoralProfile,
};
pub use arc::{InfluenceRecord, KeyMoment, NarrativeDirection, NpcArc, PlayerArc, Theme};
pub use choice::{
    ArcDirection, ArcInfluence, ArcType, Category, Choice, ChoiceContext, ChoiceId, ChoiceInput,
    Meaningfulness, MeaningfulnessLevel, Stakes,
};
pub use config::ChoiceConfig;
pub use consequence::Consequence;
pub use engine::{CHOICE_STORE_KEY, ChoiceEngine, ChoiceSnapshot, Collaborators};
pub use error::{ChoiceError, ChoiceResult};
pub use personality::{MoralAlignment, PersonalityProfile, PersonalityView, Trait};
pub use seed::{
    Effect, EffectSeed, Polarity, SeedCondition, SeedKind, SeedPool, SeedStatus, SkillArea,
    TriggerKind, WorldEvent,
};
