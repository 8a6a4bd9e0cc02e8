use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consequence::Consequence;

/// Identifier of a recorded choice, e.g. `choice_1a2b3c4d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub String);

impl ChoiceId {
    /// Generate a fresh choice ID.
    pub fn new() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("choice_{}", &uuid[..8]))
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much rides on a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stakes {
    /// Everyday decisions.
    #[default]
    Low,
    /// Noticeable consequences.
    Medium,
    /// Lives, fortunes or the story's direction.
    High,
}

impl Stakes {
    /// Narrative impact multiplier.
    pub fn impact_multiplier(&self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 2.0,
            Self::High => 3.0,
        }
    }
}

impl fmt::Display for Stakes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Taxonomy tag attached to a choice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Right and wrong.
    Moral,
    /// Dealing with people.
    Social,
    /// How a problem is approached.
    Tactical,
    /// Money and goods.
    Resource,
    /// Story direction.
    Narrative,
    /// Time horizon of the outcome.
    Consequence,
    /// Contextual: the stakes were high.
    HighStakes,
    /// Contextual: other characters were involved.
    InvolvesNpcs,
}

impl Category {
    /// The six keyword-driven categories, in taxonomy order.
    pub const TAXONOMY: [Category; 6] = [
        Category::Moral,
        Category::Social,
        Category::Tactical,
        Category::Resource,
        Category::Narrative,
        Category::Consequence,
    ];

    /// Snake-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moral => "moral",
            Self::Social => "social",
            Self::Tactical => "tactical",
            Self::Resource => "resource",
            Self::Narrative => "narrative",
            Self::Consequence => "consequence",
            Self::HighStakes => "high_stakes",
            Self::InvolvesNpcs => "involves_npcs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_timeframe() -> String {
    "immediate".to_string()
}

/// Circumstances of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceContext {
    /// Where the decision was made. Empty means unknown.
    #[serde(default)]
    pub location: String,
    /// IDs of the characters involved.
    #[serde(default)]
    pub characters: Vec<String>,
    /// Free-form situation tag, such as "dialogue".
    #[serde(default)]
    pub situation: Option<String>,
    /// What rides on it.
    #[serde(default)]
    pub stakes: Stakes,
    /// When the outcome lands.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

impl Default for ChoiceContext {
    fn default() -> Self {
        Self {
            location: String::new(),
            characters: Vec::new(),
            situation: None,
            stakes: Stakes::Low,
            timeframe: default_timeframe(),
        }
    }
}

/// A decision as reported by the caller, before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceInput {
    /// What the decision was about.
    pub description: String,
    /// The options on offer. May be empty.
    #[serde(default)]
    pub options: Vec<String>,
    /// The option the player took.
    pub selected_option: String,
    /// Circumstances.
    #[serde(default)]
    pub context: ChoiceContext,
}

impl ChoiceInput {
    /// A decision with no options and a default context.
    pub fn new(description: impl Into<String>, selected_option: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            selected_option: selected_option.into(),
            ..Self::default()
        }
    }

    /// Set the candidate options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the location.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.context.location = location.into();
        self
    }

    /// Set the involved characters.
    pub fn involving<I, S>(mut self, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.characters = characters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the stakes.
    pub fn with_stakes(mut self, stakes: Stakes) -> Self {
        self.context.stakes = stakes;
        self
    }

    /// Set the situation tag.
    pub fn in_situation(mut self, situation: impl Into<String>) -> Self {
        self.context.situation = Some(situation.into());
        self
    }
}

/// Which way a choice pushes a character's arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    /// Toward the player.
    Positive,
    /// Away from the player.
    Negative,
    /// Neither.
    Neutral,
}

impl ArcDirection {
    /// +1, -1 or 0.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }
}

/// The shape of a choice's effect on a character's story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcType {
    /// A friend drawn closer.
    Loyalty,
    /// A cool or hostile character won over.
    Reconciliation,
    /// A friend let down.
    Betrayal,
    /// An existing grudge deepened.
    Antagonism,
    /// The character only watched.
    Observation,
}

/// How a choice bends one involved character's arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcInfluence {
    /// The character.
    pub character_id: String,
    /// Kind of influence.
    pub arc_type: ArcType,
    /// Strength: mean of |moral weight| and narrative impact.
    pub magnitude: f64,
    /// Direction.
    pub direction: ArcDirection,
}

/// Bucketed meaningfulness of a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeaningfulnessLevel {
    /// Under 30.
    Minor,
    /// 30 to 60.
    Moderate,
    /// 60 to 100.
    Significant,
    /// 100 and up.
    Profound,
}

impl MeaningfulnessLevel {
    /// Bucket a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 100.0 {
            Self::Profound
        } else if score >= 60.0 {
            Self::Significant
        } else if score >= 30.0 {
            Self::Moderate
        } else {
            Self::Minor
        }
    }
}

/// How much a choice matters, with the reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meaningfulness {
    /// Raw score.
    pub score: f64,
    /// Bucketed score.
    pub level: MeaningfulnessLevel,
    /// Human-readable contributing factors.
    pub reasons: Vec<String>,
}

/// One recorded player decision. Built once by the engine and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Identifier.
    pub id: ChoiceId,
    /// When the choice was recorded.
    pub timestamp: DateTime<Utc>,
    /// What the decision was about.
    pub description: String,
    /// Options on offer.
    pub options: Vec<String>,
    /// The option taken.
    pub selected_option: String,
    /// Circumstances, with the location resolved.
    pub context: ChoiceContext,
    /// Taxonomy tags.
    pub categories: Vec<Category>,
    /// Moral weight in [-5, 5].
    pub moral_weight: i32,
    /// Narrative impact in [1, 10].
    pub narrative_impact: f64,
    /// Influence on involved characters that have a ledger entry.
    pub arc_influence: Vec<ArcInfluence>,
    /// Immediate consequences.
    pub consequences: Vec<Consequence>,
    /// Seeds this choice planted.
    pub seed_ids: Vec<String>,
}

impl Choice {
    /// Whether the choice carries a category tag.
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Score how much the choice matters: consequences, moral weight,
    /// impact, characters and seeds, scaled by stakes.
    pub fn meaningfulness(&self) -> Meaningfulness {
        let consequences = self.consequences.len() as f64 * 10.0;
        let moral = f64::from(self.moral_weight.abs()) * 15.0;
        let impact = self.narrative_impact * 5.0;
        let characters = self.context.characters.len() as f64 * 8.0;
        let seeds = self.seed_ids.len() as f64 * 12.0;

        let multiplier = match self.context.stakes {
            Stakes::High => 1.5,
            Stakes::Medium => 1.2,
            Stakes::Low => 1.0,
        };
        let score = (consequences + moral + impact + characters + seeds) * multiplier;

        let mut reasons = Vec::new();
        if !self.consequences.is_empty() {
            reasons.push(format!(
                "{} immediate consequence(s)",
                self.consequences.len()
            ));
        }
        if self.moral_weight != 0 {
            reasons.push(format!("moral weight {}", self.moral_weight));
        }
        if self.narrative_impact >= 5.0 {
            reasons.push(format!("high narrative impact ({})", self.narrative_impact));
        }
        if !self.context.characters.is_empty() {
            reasons.push(format!(
                "involves {}",
                self.context.characters.join(", ")
            ));
        }
        if !self.seed_ids.is_empty() {
            reasons.push(format!("{} deferred effect(s)", self.seed_ids.len()));
        }
        if self.context.stakes != Stakes::Low {
            reasons.push(format!("{} stakes", self.context.stakes));
        }

        Meaningfulness {
            score,
            level: MeaningfulnessLevel::from_score(score),
            reasons,
        }
    }
}
