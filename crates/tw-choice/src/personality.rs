use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A personality trait accumulator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    /// Helps and spares.
    Compassionate,
    /// Kills and destroys.
    Ruthless,
    /// Tells the truth.
    Honest,
    /// Lies and tricks.
    Deceptive,
    /// Charges in.
    Brave,
    /// Waits and avoids.
    Cautious,
    /// Gives and shares.
    Generous,
    /// Keeps and hoards.
    Selfish,
    /// Talks it out.
    Diplomatic,
    /// Threatens and forces.
    Aggressive,
    /// Explores and learns.
    Curious,
    /// Ignores distractions.
    Focused,
}

impl Trait {
    /// Every trait, in declaration order.
    pub const ALL: [Trait; 12] = [
        Trait::Compassionate,
        Trait::Ruthless,
        Trait::Honest,
        Trait::Deceptive,
        Trait::Brave,
        Trait::Cautious,
        Trait::Generous,
        Trait::Selfish,
        Trait::Diplomatic,
        Trait::Aggressive,
        Trait::Curious,
        Trait::Focused,
    ];

    /// Snake-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compassionate => "compassionate",
            Self::Ruthless => "ruthless",
            Self::Honest => "honest",
            Self::Deceptive => "deceptive",
            Self::Brave => "brave",
            Self::Cautious => "cautious",
            Self::Generous => "generous",
            Self::Selfish => "selfish",
            Self::Diplomatic => "diplomatic",
            Self::Aggressive => "aggressive",
            Self::Curious => "curious",
            Self::Focused => "focused",
        }
    }

    /// Storytelling archetype for a player dominated by this trait.
    pub fn archetype(&self) -> &'static str {
        match self {
            Self::Compassionate => "The Protector",
            Self::Ruthless => "The Conqueror",
            Self::Honest => "The Truthseeker",
            Self::Deceptive => "The Trickster",
            Self::Brave => "The Hero",
            Self::Cautious => "The Survivor",
            Self::Generous => "The Benefactor",
            Self::Selfish => "The Opportunist",
            Self::Diplomatic => "The Peacemaker",
            Self::Aggressive => "The Warlord",
            Self::Curious => "The Explorer",
            Self::Focused => "The Zealot",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moral alignment bucket from the mean moral weight of moral choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoralAlignment {
    /// Mean of 2 or more.
    Paragon,
    /// Mean of 1 or more.
    Good,
    /// In between, or no moral choices yet.
    #[default]
    Neutral,
    /// Mean of -1 or less.
    Evil,
    /// Mean of -2 or less.
    Renegade,
}

impl MoralAlignment {
    /// Bucket a mean moral weight.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 2.0 {
            Self::Paragon
        } else if mean >= 1.0 {
            Self::Good
        } else if mean <= -2.0 {
            Self::Renegade
        } else if mean <= -1.0 {
            Self::Evil
        } else {
            Self::Neutral
        }
    }

    /// Alignment of a set of moral weights; neutral when empty.
    pub fn from_weights(weights: impl IntoIterator<Item = i32>) -> Self {
        let (sum, count) = weights
            .into_iter()
            .fold((0i64, 0u32), |(s, c), w| (s + i64::from(w), c + 1));
        if count == 0 {
            Self::Neutral
        } else {
            Self::from_mean(sum as f64 / f64::from(count))
        }
    }

    /// Paragon or good.
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Paragon | Self::Good)
    }

    /// Evil or renegade.
    pub fn is_evil(&self) -> bool {
        matches!(self, Self::Evil | Self::Renegade)
    }
}

impl fmt::Display for MoralAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Paragon => "paragon",
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Evil => "evil",
            Self::Renegade => "renegade",
        };
        write!(f, "{s}")
    }
}

/// Running trait tallies. Only ever incremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    traits: BTreeMap<Trait, u32>,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            traits: Trait::ALL.iter().map(|t| (*t, 0)).collect(),
        }
    }
}

impl PersonalityProfile {
    /// A profile with every trait at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a trait.
    pub fn add(&mut self, t: Trait, amount: u32) {
        let value = self.traits.entry(t).or_insert(0);
        *value = value.saturating_add(amount);
    }

    /// Current tally of a trait.
    pub fn value(&self, t: Trait) -> u32 {
        self.traits.get(&t).copied().unwrap_or(0)
    }

    /// Sum of all tallies.
    pub fn total(&self) -> u64 {
        self.traits.values().map(|v| u64::from(*v)).sum()
    }

    /// All tallies.
    pub fn tallies(&self) -> &BTreeMap<Trait, u32> {
        &self.traits
    }

    /// The `count` highest traits, highest first. Ties keep declaration
    /// order.
    pub fn dominant(&self, count: usize) -> Vec<(Trait, u32)> {
        let mut sorted: Vec<(Trait, u32)> = self.traits.iter().map(|(t, v)| (*t, *v)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(count);
        sorted
    }

    /// Like [`dominant`](Self::dominant) but skipping zero tallies.
    pub fn dominant_nonzero(&self, count: usize) -> Vec<Trait> {
        self.dominant(count)
            .into_iter()
            .filter(|(_, v)| *v > 0)
            .map(|(t, _)| t)
            .collect()
    }

    /// Share of each trait in percent; all zero for an empty profile.
    pub fn percentages(&self) -> BTreeMap<Trait, f64> {
        let total = self.total();
        self.traits
            .iter()
            .map(|(t, v)| {
                let pct = if total > 0 {
                    f64::from(*v) / total as f64 * 100.0
                } else {
                    0.0
                };
                (*t, pct)
            })
            .collect()
    }

    /// Archetype label for the leading trait, or "The Undecided".
    pub fn narrative_personality(&self) -> &'static str {
        self.dominant_nonzero(1)
            .first()
            .map(Trait::archetype)
            .unwrap_or("The Undecided")
    }
}

/// Read-only personality summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityView {
    /// Share of each trait in percent.
    pub traits: BTreeMap<Trait, f64>,
    /// Top traits with their tallies.
    pub dominant_traits: Vec<(Trait, u32)>,
    /// Current moral alignment.
    pub moral_alignment: MoralAlignment,
    /// Archetype label.
    pub narrative_personality: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_buckets() {
        assert_eq!(MoralAlignment::from_mean(2.0), MoralAlignment::Paragon);
        assert_eq!(MoralAlignment::from_mean(1.5), MoralAlignment::Good);
        assert_eq!(MoralAlignment::from_mean(0.9), MoralAlignment::Neutral);
        assert_eq!(MoralAlignment::from_mean(-1.0), MoralAlignment::Evil);
        assert_eq!(MoralAlignment::from_mean(-2.5), MoralAlignment::Renegade);
        assert_eq!(MoralAlignment::from_weights([]), MoralAlignment::Neutral);
        assert_eq!(MoralAlignment::from_weights([3, 2, -1]), MoralAlignment::Good);
    }

    #[test]
    fn empty_profile() {
        let p = PersonalityProfile::new();
        assert_eq!(p.total(), 0);
        assert_eq!(p.tallies().len(), 12);
        assert!(p.dominant_nonzero(3).is_empty());
        assert!(p.percentages().values().all(|v| *v == 0.0));
        assert_eq!(p.narrative_personality(), "The Undecided");
    }

    #[test]
    fn dominant_traits_sorted() {
        let mut p = PersonalityProfile::new();
        p.add(Trait::Curious, 2);
        p.add(Trait::Ruthless, 5);
        p.add(Trait::Honest, 2);
        assert_eq!(
            p.dominant(3),
            vec![(Trait::Ruthless, 5), (Trait::Honest, 2), (Trait::Curious, 2)]
        );
        assert_eq!(p.narrative_personality(), "The Conqueror");
        let pct = p.percentages();
        assert!((pct[&Trait::Ruthless] - 55.555).abs() < 0.01);
    }

    #[test]
    fn profile_serializes_trait_names() {
        let mut p = PersonalityProfile::new();
        p.add(Trait::Brave, 1);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"brave\":1"));
        let back: PersonalityProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
