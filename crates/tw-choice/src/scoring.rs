//! Pure scoring functions behind the choice pipeline.
//!
//! Every function takes lowercase text where it scans keywords; the engine
//! lowercases once per choice.

use tw_core::RelationshipView;

use crate::arc::Theme;
use crate::choice::{ArcDirection, ArcInfluence, ArcType, Category, ChoiceContext, Stakes};
use crate::keywords::{
    CATEGORY_KEYWORDS, MORAL_WEIGHTS, RELATIONSHIP_DELTAS, SKILL_AREAS, THEMES, TRAIT_FAMILIES,
    mentions_any,
};
use crate::personality::{PersonalityProfile, Trait};
use crate::seed::SkillArea;

/// Moral weight bounds.
pub const MORAL_WEIGHT_RANGE: (i32, i32) = (-5, 5);
/// Narrative impact bounds.
pub const IMPACT_RANGE: (f64, f64) = (1.0, 10.0);

/// Tag a choice from `description + selected_option` and its context.
pub fn categorize(text: &str, context: &ChoiceContext) -> Vec<Category> {
    let mut categories: Vec<Category> = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, words)| mentions_any(text, words))
        .map(|(category, _)| *category)
        .collect();
    if context.stakes == Stakes::High {
        categories.push(Category::HighStakes);
    }
    if !context.characters.is_empty() {
        categories.push(Category::InvolvesNpcs);
    }
    categories
}

/// Moral weight of the selected option, scaled for high stakes, rounded
/// half away from zero and clamped.
pub fn moral_weight(selected: &str, stakes: Stakes) -> i32 {
    let raw: i32 = MORAL_WEIGHTS
        .iter()
        .filter(|(_, words)| mentions_any(selected, words))
        .map(|(weight, _)| *weight)
        .sum();
    let scaled = if stakes == Stakes::High {
        (f64::from(raw) * 1.5).round() as i32
    } else {
        raw
    };
    scaled.clamp(MORAL_WEIGHT_RANGE.0, MORAL_WEIGHT_RANGE.1)
}

/// The trait side credited for each family the selected option touches.
/// The positive side wins when both match.
pub fn trait_sides(selected: &str) -> Vec<Trait> {
    TRAIT_FAMILIES
        .iter()
        .filter_map(|family| {
            if mentions_any(selected, family.positive_keywords) {
                Some(family.positive)
            } else if mentions_any(selected, family.negative_keywords) {
                Some(family.negative)
            } else {
                None
            }
        })
        .collect()
}

/// Fraction of the touched trait sides that are among the player's
/// dominant traits. 1.0 when nothing is touched or no pattern exists yet.
pub fn pattern_alignment(sides: &[Trait], profile: &PersonalityProfile, dominant: usize) -> f64 {
    let pattern = profile.dominant_nonzero(dominant);
    if sides.is_empty() || pattern.is_empty() {
        return 1.0;
    }
    let hits = sides.iter().filter(|t| pattern.contains(t)).count();
    hits as f64 / sides.len() as f64
}

/// Narrative impact from stakes, characters and how unusual the choice is.
pub fn narrative_impact(context: &ChoiceContext, alignment: f64, novelty_multiplier: f64) -> f64 {
    let mut impact = context.stakes.impact_multiplier();
    impact += context.characters.len() as f64 * 0.5;
    if alignment < 0.5 {
        impact *= novelty_multiplier;
    }
    impact.clamp(IMPACT_RANGE.0, IMPACT_RANGE.1)
}

/// Relationship change for every involved character.
pub fn relationship_delta(selected: &str) -> i32 {
    RELATIONSHIP_DELTAS
        .iter()
        .filter(|(_, words)| mentions_any(selected, words))
        .map(|(delta, _)| *delta)
        .sum()
}

/// First matching skill area, else general.
pub fn skill_area(selected: &str) -> SkillArea {
    SKILL_AREAS
        .iter()
        .find(|(_, words)| mentions_any(selected, words))
        .map(|(area, _)| *area)
        .unwrap_or_default()
}

/// Themes in table order.
pub fn themes(text: &str) -> Vec<Theme> {
    THEMES
        .iter()
        .filter(|(_, words)| mentions_any(text, words))
        .map(|(theme, _)| *theme)
        .collect()
}

/// How a choice bends one character's arc given their current ledger entry.
pub fn arc_influence(
    relationship: &RelationshipView,
    delta: i32,
    moral_weight: i32,
    impact: f64,
) -> ArcInfluence {
    let signal = if delta != 0 { delta } else { moral_weight };
    let direction = match signal.signum() {
        1 => ArcDirection::Positive,
        -1 => ArcDirection::Negative,
        _ => ArcDirection::Neutral,
    };
    let warm = relationship.standing.is_warm();
    let arc_type = match (direction, warm) {
        (ArcDirection::Positive, true) => ArcType::Loyalty,
        (ArcDirection::Positive, false) => ArcType::Reconciliation,
        (ArcDirection::Negative, true) => ArcType::Betrayal,
        (ArcDirection::Negative, false) => ArcType::Antagonism,
        (ArcDirection::Neutral, _) => ArcType::Observation,
    };
    ArcInfluence {
        character_id: relationship.character_id.clone(),
        arc_type,
        magnitude: (f64::from(moral_weight.abs()) + impact) / 2.0,
        direction,
    }
}
