use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arc::{NarrativeDirection, PlayerArc, Theme};
use crate::choice::{Category, Choice, ChoiceId};
use crate::personality::{MoralAlignment, PersonalityProfile, Trait};

/// How many key decisions the analysis lists.
const KEY_DECISION_LIMIT: usize = 10;

/// Campaign-wide statistics over every recorded choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceAnalysis {
    /// Number of choices recorded.
    pub total_choices: usize,
    /// Choices per taxonomy category, zeros included.
    pub category_breakdown: BTreeMap<Category, usize>,
    /// Moral statistics.
    pub moral_profile: MoralProfile,
    /// Impact statistics.
    pub narrative_impact: ImpactSummary,
    /// Consequence and seed counts.
    pub consequence_patterns: ConsequencePatterns,
    /// Raw trait tallies.
    pub personality: BTreeMap<Trait, u32>,
    /// Highest-impact key decisions, highest first.
    pub key_decisions: Vec<KeyDecision>,
    /// Seeds still waiting to fire.
    pub active_seeds: usize,
    /// Player arc summary, once any choice has been recorded.
    pub arc_progress: Option<ArcProgress>,
}

/// Moral statistics over choices with nonzero weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoralProfile {
    /// Choices with nonzero weight.
    pub total_moral_choices: usize,
    /// Mean weight of those choices.
    pub average_morality: f64,
    /// Alignment over moral-category choices.
    pub alignment: MoralAlignment,
    /// Choices with positive weight.
    pub good_choices: usize,
    /// Choices with negative weight.
    pub evil_choices: usize,
}

/// Narrative impact statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// Sum of impacts.
    pub total_impact: f64,
    /// Mean impact.
    pub average_impact: f64,
    /// Choices at or above the key-moment threshold.
    pub high_impact_count: usize,
    /// Those choices, in recording order.
    pub key_moments: Vec<KeyDecision>,
}

/// Consequence statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequencePatterns {
    /// Immediate consequences over all choices.
    pub total_consequences: usize,
    /// Consequences per type label.
    pub by_type: BTreeMap<String, usize>,
    /// Seeds planted over all choices, fired or not.
    pub seeds_planted: usize,
}

/// A high-impact choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDecision {
    /// The choice.
    pub id: ChoiceId,
    /// Its description.
    pub description: String,
    /// Its impact.
    pub impact: f64,
}

/// Player arc summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcProgress {
    /// Themes so far.
    pub themes: Vec<Theme>,
    /// Number of key moments.
    pub key_moments: usize,
    /// Current direction.
    pub narrative_direction: NarrativeDirection,
    /// Number of choices that shaped the arc.
    pub progression: u32,
}

impl KeyDecision {
    fn of(choice: &Choice) -> Self {
        Self {
            id: choice.id.clone(),
            description: choice.description.clone(),
            impact: choice.narrative_impact,
        }
    }
}

pub(crate) fn analyze(
    history: &[Choice],
    profile: &PersonalityProfile,
    active_seeds: usize,
    player_arc: Option<&PlayerArc>,
    key_moment_threshold: f64,
) -> ChoiceAnalysis {
    let category_breakdown = Category::TAXONOMY
        .iter()
        .map(|category| {
            let n = history.iter().filter(|c| c.has_category(*category)).count();
            (*category, n)
        })
        .collect();

    let weighted: Vec<i32> = history
        .iter()
        .map(|c| c.moral_weight)
        .filter(|w| *w != 0)
        .collect();
    let moral_profile = MoralProfile {
        total_moral_choices: weighted.len(),
        average_morality: mean(weighted.iter().map(|w| f64::from(*w))),
        alignment: MoralAlignment::from_weights(
            history
                .iter()
                .filter(|c| c.has_category(Category::Moral))
                .map(|c| c.moral_weight),
        ),
        good_choices: weighted.iter().filter(|w| **w > 0).count(),
        evil_choices: weighted.iter().filter(|w| **w < 0).count(),
    };

    let key_moments: Vec<KeyDecision> = history
        .iter()
        .filter(|c| c.narrative_impact >= key_moment_threshold)
        .map(KeyDecision::of)
        .collect();
    let narrative_impact = ImpactSummary {
        total_impact: history.iter().map(|c| c.narrative_impact).sum(),
        average_impact: mean(history.iter().map(|c| c.narrative_impact)),
        high_impact_count: key_moments.len(),
        key_moments: key_moments.clone(),
    };

    let mut by_type = BTreeMap::new();
    for consequence in history.iter().flat_map(|c| &c.consequences) {
        *by_type.entry(consequence.kind().to_string()).or_insert(0) += 1;
    }
    let consequence_patterns = ConsequencePatterns {
        total_consequences: history.iter().map(|c| c.consequences.len()).sum(),
        by_type,
        seeds_planted: history.iter().map(|c| c.seed_ids.len()).sum(),
    };

    let mut key_decisions = key_moments;
    key_decisions.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    key_decisions.truncate(KEY_DECISION_LIMIT);

    ChoiceAnalysis {
        total_choices: history.len(),
        category_breakdown,
        moral_profile,
        narrative_impact,
        consequence_patterns,
        personality: profile.tallies().clone(),
        key_decisions,
        active_seeds,
        arc_progress: player_arc.map(|arc| ArcProgress {
            themes: arc.themes.clone(),
            key_moments: arc.key_moments.len(),
            narrative_direction: arc.narrative_direction,
            progression: arc.progression,
        }),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::ChoiceContext;
    use chrono::Utc;

    fn choice(id: &str, categories: Vec<Category>, weight: i32, impact: f64) -> Choice {
        Choice {
            id: ChoiceId(id.into()),
            timestamp: Utc::now(),
            description: format!("decision {id}"),
            options: vec![],
            selected_option: String::new(),
            context: ChoiceContext::default(),
            categories,
            moral_weight: weight,
            narrative_impact: impact,
            arc_influence: vec![],
            consequences: vec![],
            seed_ids: vec![format!("seed_{id}_0")],
        }
    }

    #[test]
    fn empty_history() {
        let a = analyze(&[], &PersonalityProfile::new(), 0, None, 5.0);
        assert_eq!(a.total_choices, 0);
        assert_eq!(a.category_breakdown.len(), 6);
        assert!(a.category_breakdown.values().all(|n| *n == 0));
        assert_eq!(a.moral_profile.alignment, MoralAlignment::Neutral);
        assert_eq!(a.narrative_impact.average_impact, 0.0);
        assert!(a.key_decisions.is_empty());
        assert!(a.arc_progress.is_none());
    }

    #[test]
    fn statistics_over_history() {
        let history = vec![
            choice("a", vec![Category::Moral], 3, 6.0),
            choice("b", vec![Category::Social], -1, 2.0),
            choice("c", vec![Category::Moral, Category::Tactical], 1, 9.0),
        ];
        let a = analyze(&history, &PersonalityProfile::new(), 2, None, 5.0);
        assert_eq!(a.total_choices, 3);
        assert_eq!(a.category_breakdown[&Category::Moral], 2);
        assert_eq!(a.moral_profile.total_moral_choices, 3);
        assert_eq!(a.moral_profile.good_choices, 2);
        assert_eq!(a.moral_profile.evil_choices, 1);
        assert_eq!(a.moral_profile.alignment, MoralAlignment::Paragon);
        assert_eq!(a.narrative_impact.total_impact, 17.0);
        assert_eq!(a.narrative_impact.high_impact_count, 2);
        let ids: Vec<&str> = a.key_decisions.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(a.consequence_patterns.seeds_planted, 3);
        assert_eq!(a.active_seeds, 2);
    }
}
