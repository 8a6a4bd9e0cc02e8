use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::choice::{Category, ChoiceId};

/// What a seed does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedKind {
    /// Word of a moral act spreads.
    Reputation,
    /// A character remembers how they were treated.
    CharacterMemory,
    /// Practice in a skill area pays off.
    SkillDevelopment,
}

impl fmt::Display for SeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reputation => write!(f, "reputation"),
            Self::CharacterMemory => write!(f, "character_memory"),
            Self::SkillDevelopment => write!(f, "skill_development"),
        }
    }
}

/// The kind of world event a seed subscribes to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// In-world days pass.
    TimePassage,
    /// The party meets a character again.
    CharacterEncounter,
    /// The party faces a similar decision.
    SimilarSituation,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimePassage => write!(f, "time_passage"),
            Self::CharacterEncounter => write!(f, "character_encounter"),
            Self::SimilarSituation => write!(f, "similar_situation"),
        }
    }
}

/// Skill area of a tactical decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillArea {
    /// Sneaking and hiding.
    Stealth,
    /// Convincing.
    Persuasion,
    /// Threatening.
    Intimidation,
    /// Searching and investigating.
    Investigation,
    /// Lying.
    Deception,
    /// Anything else.
    #[default]
    General,
}

impl fmt::Display for SkillArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stealth => "stealth",
            Self::Persuasion => "persuasion",
            Self::Intimidation => "intimidation",
            Self::Investigation => "investigation",
            Self::Deception => "deception",
            Self::General => "general",
        };
        write!(f, "{s}")
    }
}

/// Sign of a moral act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Positive moral weight.
    Good,
    /// Negative moral weight.
    Evil,
}

/// When a subscribed seed actually fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedCondition {
    /// Enough days have passed since planting.
    MoralThreshold {
        /// Good or evil deed.
        polarity: Polarity,
        /// Days that must pass.
        min_days: u32,
    },
    /// The given character is met again.
    MeetCharacter {
        /// Character ID.
        character_id: String,
    },
    /// A tactical decision in the same skill area comes up.
    SimilarChoice {
        /// Skill area of the planting choice.
        skill_area: SkillArea,
    },
}

/// Something that happened in the world and may fire seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEvent {
    /// Days pass.
    TimePassage {
        /// Number of in-world days.
        days: u32,
    },
    /// The party talks to a character.
    NpcInteraction {
        /// Character ID.
        character_id: String,
    },
    /// A new decision is on the table.
    ChoiceOpportunity {
        /// Categories of the pending decision.
        #[serde(default)]
        categories: Vec<Category>,
        /// Skill area, when known.
        #[serde(default)]
        skill_area: Option<SkillArea>,
    },
}

impl WorldEvent {
    /// The subscription bucket this event is delivered to.
    pub fn trigger_kind(&self) -> TriggerKind {
        match self {
            Self::TimePassage { .. } => TriggerKind::TimePassage,
            Self::NpcInteraction { .. } => TriggerKind::CharacterEncounter,
            Self::ChoiceOpportunity { .. } => TriggerKind::SimilarSituation,
        }
    }
}

/// A deferred consequence waiting for a matching world event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSeed {
    /// `seed_<choice id>_<n>`.
    pub id: String,
    /// What it does.
    pub kind: SeedKind,
    /// What it listens for.
    pub trigger: TriggerKind,
    /// When it fires.
    pub condition: SeedCondition,
    /// Symbolic consequence, e.g. `reputation_shift_positive`.
    pub consequence: String,
    /// Strength of the effect.
    pub magnitude: f64,
    /// The choice that planted it.
    pub source_choice: ChoiceId,
    /// Wall-clock planting time.
    pub planted_at: DateTime<Utc>,
    /// In-world day of planting.
    pub planted_day: u32,
}

impl EffectSeed {
    /// Whether `event` satisfies this seed's condition on `world_day`.
    pub fn matches(&self, event: &WorldEvent, world_day: u32) -> bool {
        match (&self.condition, event) {
            (SeedCondition::MoralThreshold { min_days, .. }, WorldEvent::TimePassage { .. }) => {
                world_day.saturating_sub(self.planted_day) >= *min_days
            }
            (
                SeedCondition::MeetCharacter { character_id },
                WorldEvent::NpcInteraction { character_id: met },
            ) => character_id.eq_ignore_ascii_case(met),
            (
                SeedCondition::SimilarChoice { skill_area },
                WorldEvent::ChoiceOpportunity {
                    categories,
                    skill_area: area,
                },
            ) => {
                categories.contains(&Category::Tactical)
                    && (*skill_area == SkillArea::General
                        || area.is_none_or(|a| a == *skill_area))
            }
            _ => false,
        }
    }

    /// Turn the seed into the effect it releases.
    pub fn release(self) -> Effect {
        let (target, description) = match &self.condition {
            SeedCondition::MoralThreshold { polarity, .. } => {
                let deeds = match polarity {
                    Polarity::Good => "good",
                    Polarity::Evil => "dark",
                };
                (None, format!("Word of your {deeds} deeds has spread"))
            }
            SeedCondition::MeetCharacter { character_id } => (
                Some(character_id.clone()),
                format!("{character_id} remembers how you treated them"),
            ),
            SeedCondition::SimilarChoice { skill_area } => (
                None,
                format!("Past experience with {skill_area} opens new options"),
            ),
        };
        Effect {
            seed_id: self.id,
            kind: self.kind,
            source_choice: self.source_choice,
            target,
            magnitude: self.magnitude,
            consequence: self.consequence,
            description,
        }
    }
}

/// The released result of a fired seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// ID of the seed that fired.
    pub seed_id: String,
    /// What kind of seed it was.
    pub kind: SeedKind,
    /// The choice that planted it.
    pub source_choice: ChoiceId,
    /// Character the effect concerns, if any.
    pub target: Option<String>,
    /// Strength.
    pub magnitude: f64,
    /// Symbolic consequence copied from the seed.
    pub consequence: String,
    /// Human-readable summary.
    pub description: String,
}

/// Snapshot of the seed pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedStatus {
    /// Number of seeds waiting.
    pub active: usize,
    /// Waiting seeds per trigger kind.
    pub by_trigger: BTreeMap<TriggerKind, usize>,
    /// The seeds themselves.
    pub seeds: Vec<EffectSeed>,
}

/// Trigger-kind subscription table of waiting seeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedPool {
    subscriptions: BTreeMap<TriggerKind, Vec<EffectSeed>>,
}

impl SeedPool {
    /// Subscribe a seed to its trigger kind.
    pub fn plant(&mut self, seed: EffectSeed) {
        self.subscriptions.entry(seed.trigger).or_default().push(seed);
    }

    /// Remove and return every seed subscribed to the event's trigger kind
    /// whose condition holds.
    pub fn fire(&mut self, event: &WorldEvent, world_day: u32) -> Vec<EffectSeed> {
        let Some(bucket) = self.subscriptions.get_mut(&event.trigger_kind()) else {
            return Vec::new();
        };
        let (fired, waiting): (Vec<_>, Vec<_>) = std::mem::take(bucket)
            .into_iter()
            .partition(|seed| seed.matches(event, world_day));
        *bucket = waiting;
        fired
    }

    /// Remove one seed by ID.
    pub fn take(&mut self, seed_id: &str) -> Option<EffectSeed> {
        self.subscriptions.values_mut().find_map(|bucket| {
            let pos = bucket.iter().position(|s| s.id == seed_id)?;
            Some(bucket.remove(pos))
        })
    }

    /// Number of waiting seeds.
    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    /// Whether no seeds are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summary of the waiting seeds.
    pub fn status(&self) -> SeedStatus {
        SeedStatus {
            active: self.len(),
            by_trigger: self
                .subscriptions
                .iter()
                .filter(|(_, seeds)| !seeds.is_empty())
                .map(|(kind, seeds)| (*kind, seeds.len()))
                .collect(),
            seeds: self.subscriptions.values().flatten().cloned().collect(),
        }
    }
}
