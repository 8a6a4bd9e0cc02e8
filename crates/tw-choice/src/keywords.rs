//! Fixed keyword tables for choice scoring.
//!
//! Matching is case-insensitive and anchored at word starts, so "help"
//! matches "helping" but "agree" does not match inside "disagree".

use crate::arc::Theme;
use crate::choice::Category;
use crate::personality::Trait;
use crate::seed::SkillArea;

/// Category taxonomy, scanned over description and selected option.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Moral,
        &["help", "harm", "mercy", "justice", "sacrifice"],
    ),
    (
        Category::Social,
        &[
            "persuade",
            "intimidate",
            "deceive",
            "ally",
            "enemy",
            "negotiate",
            "bargain",
            "bribe",
        ],
    ),
    (
        Category::Tactical,
        &[
            "stealth",
            "combat",
            "diplomacy",
            "investigation",
            "ambush",
            "flank",
        ],
    ),
    (
        Category::Resource,
        &["spend", "save", "share", "hoard", "trade"],
    ),
    (
        Category::Narrative,
        &["explore", "skip", "lore", "character_development"],
    ),
    (
        Category::Consequence,
        &["immediate", "short_term", "long_term", "permanent"],
    ),
];

/// Moral weight groups, scanned over the selected option. Each group counts
/// once no matter how many of its keywords match.
pub const MORAL_WEIGHTS: &[(i32, &[&str])] = &[
    (2, &["help", "save", "protect"]),
    (1, &["mercy", "forgive", "heal"]),
    (1, &["share", "give", "donate"]),
    (-3, &["kill", "murder", "destroy"]),
    (-2, &["steal", "cheat", "betray"]),
    (-1, &["lie", "deceive", "trick"]),
];

/// A pair of opposed traits and the keywords feeding each side.
pub struct TraitFamily {
    /// Trait credited when `positive_keywords` match.
    pub positive: Trait,
    /// Keywords for the positive side.
    pub positive_keywords: &'static [&'static str],
    /// Trait credited when only `negative_keywords` match.
    pub negative: Trait,
    /// Keywords for the negative side.
    pub negative_keywords: &'static [&'static str],
}

/// The six trait families.
pub const TRAIT_FAMILIES: &[TraitFamily] = &[
    TraitFamily {
        positive: Trait::Compassionate,
        positive_keywords: &["help", "mercy", "heal"],
        negative: Trait::Ruthless,
        negative_keywords: &["kill", "destroy", "ruthless"],
    },
    TraitFamily {
        positive: Trait::Honest,
        positive_keywords: &["truth", "honest", "admit"],
        negative: Trait::Deceptive,
        negative_keywords: &["lie", "deceive", "trick"],
    },
    TraitFamily {
        positive: Trait::Brave,
        positive_keywords: &["charge", "confront", "bold"],
        negative: Trait::Cautious,
        negative_keywords: &["careful", "wait", "avoid"],
    },
    TraitFamily {
        positive: Trait::Generous,
        positive_keywords: &["give", "share", "donate"],
        negative: Trait::Selfish,
        negative_keywords: &["keep", "hoard", "mine"],
    },
    TraitFamily {
        positive: Trait::Diplomatic,
        positive_keywords: &["negotiate", "peaceful", "discuss"],
        negative: Trait::Aggressive,
        negative_keywords: &["attack", "threaten", "force"],
    },
    TraitFamily {
        positive: Trait::Curious,
        positive_keywords: &["explore", "investigate", "learn"],
        negative: Trait::Focused,
        negative_keywords: &["focus", "direct", "ignore"],
    },
];

/// Relationship deltas toward every involved character.
pub const RELATIONSHIP_DELTAS: &[(i32, &[&str])] = &[
    (2, &["help", "protect"]),
    (1, &["agree", "support", "offer", "negotiate"]),
    (-2, &["insult", "threaten"]),
    (-1, &["disagree", "refuse"]),
];

/// World-state flags set on the choice's location: `location_<loc>_<suffix>`.
pub const WORLD_FLAGS: &[(&str, &[&str])] = &[
    ("destroyed", &["destroy", "burn"]),
    ("protected", &["save", "protect"]),
];

/// Resource deltas: resource, change, keywords, description.
pub const RESOURCE_DELTAS: &[(&str, i32, &[&str], &str)] = &[
    ("gold", -50, &["spend", "buy", "pay"], "Spent gold on choice"),
    ("items", 1, &["gain", "reward", "find"], "Gained items from choice"),
];

/// Skill areas for tactical seeds, first match wins.
pub const SKILL_AREAS: &[(SkillArea, &[&str])] = &[
    (SkillArea::Stealth, &["sneak", "hide"]),
    (SkillArea::Persuasion, &["persuade", "convince"]),
    (SkillArea::Intimidation, &["intimidate", "threaten"]),
    (SkillArea::Investigation, &["investigate", "search"]),
    (SkillArea::Deception, &["deceive", "lie"]),
];

/// Narrative themes, scanned over description and selected option.
pub const THEMES: &[(Theme, &[&str])] = &[
    (Theme::Sacrifice, &["sacrifice", "give up"]),
    (Theme::Revenge, &["revenge", "vengeance"]),
    (Theme::Redemption, &["redemption", "forgive"]),
    (Theme::Power, &["power", "control"]),
    (Theme::Freedom, &["freedom", "liberty"]),
    (Theme::Love, &["love", "romance"]),
    (Theme::Duty, &["duty", "responsibility"]),
    (Theme::Knowledge, &["knowledge", "truth"]),
];

/// Whether lowercase `text` contains `keyword` at the start of a word.
pub fn mentions(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Whether lowercase `text` contains any of `keywords`.
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| mentions(text, k))
}
