use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::choice::{ArcInfluence, Choice, ChoiceId};
use crate::personality::{MoralAlignment, Trait};

/// A recurring narrative theme picked up from choice text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Giving something up.
    Sacrifice,
    /// Paying back a wrong.
    Revenge,
    /// Forgiveness and second chances.
    Redemption,
    /// Control over others.
    Power,
    /// Liberty.
    Freedom,
    /// Romance.
    Love,
    /// Obligation.
    Duty,
    /// Truth and learning.
    Knowledge,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sacrifice => "sacrifice",
            Self::Revenge => "revenge",
            Self::Redemption => "redemption",
            Self::Power => "power",
            Self::Freedom => "freedom",
            Self::Love => "love",
            Self::Duty => "duty",
            Self::Knowledge => "knowledge",
        };
        write!(f, "{s}")
    }
}

/// Where the player's story is heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeDirection {
    /// No choices yet.
    #[default]
    Undefined,
    /// Redemption themes with good alignment.
    Redemption,
    /// Power themes with evil alignment.
    Corruption,
    /// Sacrifice themes.
    HeroicSacrifice,
    /// Love themes.
    Romance,
    /// Everything else.
    Discovery,
}

impl NarrativeDirection {
    /// Decide the direction from the first three themes and the alignment.
    pub fn decide(themes: &[Theme], alignment: MoralAlignment) -> Self {
        let leading = &themes[..themes.len().min(3)];
        if leading.contains(&Theme::Redemption) && alignment.is_good() {
            Self::Redemption
        } else if leading.contains(&Theme::Power) && alignment.is_evil() {
            Self::Corruption
        } else if leading.contains(&Theme::Sacrifice) {
            Self::HeroicSacrifice
        } else if leading.contains(&Theme::Love) {
            Self::Romance
        } else {
            Self::Discovery
        }
    }
}

impl fmt::Display for NarrativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Undefined => "undefined",
            Self::Redemption => "redemption",
            Self::Corruption => "corruption",
            Self::HeroicSacrifice => "heroic_sacrifice",
            Self::Romance => "romance",
            Self::Discovery => "discovery",
        };
        write!(f, "{s}")
    }
}

/// A high-impact choice remembered by the player arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    /// The choice.
    pub choice_id: ChoiceId,
    /// Its description.
    pub description: String,
    /// Its narrative impact.
    pub impact: f64,
    /// When it was made.
    pub timestamp: DateTime<Utc>,
}

/// The player character's arc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerArc {
    /// Themes in order of first appearance.
    pub themes: Vec<Theme>,
    /// Number of choices that shaped the arc.
    pub progression: u32,
    /// Choices at or above the key-moment threshold.
    pub key_moments: Vec<KeyMoment>,
    /// Trait tallies as of the latest choice.
    pub personality_shift: BTreeMap<Trait, u32>,
    /// Current direction.
    pub narrative_direction: NarrativeDirection,
}

impl PlayerArc {
    /// Fold one choice into the arc.
    pub fn absorb(
        &mut self,
        choice: &Choice,
        themes: &[Theme],
        key_moment_threshold: f64,
        tallies: &BTreeMap<Trait, u32>,
        alignment: MoralAlignment,
    ) {
        for theme in themes {
            if !self.themes.contains(theme) {
                self.themes.push(*theme);
            }
        }
        if choice.narrative_impact >= key_moment_threshold {
            self.key_moments.push(KeyMoment {
                choice_id: choice.id.clone(),
                description: choice.description.clone(),
                impact: choice.narrative_impact,
                timestamp: choice.timestamp,
            });
        }
        self.personality_shift = tallies.clone();
        self.progression += 1;
        self.narrative_direction = NarrativeDirection::decide(&self.themes, alignment);
    }
}

/// One entry in an NPC arc's influence log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceRecord {
    /// The choice.
    pub choice_id: ChoiceId,
    /// How it bent the arc.
    pub influence: ArcInfluence,
    /// When it was made.
    pub timestamp: DateTime<Utc>,
}

/// A non-player character's arc as shaped by the player's choices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcArc {
    /// Signed sum of influence magnitudes.
    pub trust: f64,
    /// Unsigned sum of influence magnitudes.
    pub character_development: f64,
    /// Every choice that touched this character.
    pub influenced_by: Vec<InfluenceRecord>,
}

impl NpcArc {
    /// Record an influence.
    pub fn absorb(&mut self, choice: &Choice, influence: &ArcInfluence) {
        self.trust += influence.magnitude * influence.direction.sign();
        self.character_development += influence.magnitude;
        self.influenced_by.push(InfluenceRecord {
            choice_id: choice.id.clone(),
            influence: influence.clone(),
            timestamp: choice.timestamp,
        });
    }
}
