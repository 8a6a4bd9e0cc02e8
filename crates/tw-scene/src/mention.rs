use std::fmt;

use serde::{Deserialize, Serialize};

/// Which extraction pass produced a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    /// A proper name followed by an action verb.
    Named,
    /// A creature noun such as "goblin", one mention per unit of quantity.
    GenericEnemy,
    /// An occupation such as "the shopkeeper".
    OccupationNpc,
    /// A member spawned by a "band of ..." phrase.
    GroupMember,
    /// An intensified creature such as "an ancient dragon".
    Boss,
}

impl MentionKind {
    /// Whether mentions of this kind count as enemies for combat start.
    pub fn is_hostile(&self) -> bool {
        matches!(self, Self::GenericEnemy | Self::GroupMember | Self::Boss)
    }

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Named => "named",
            Self::GenericEnemy => "generic_enemy",
            Self::OccupationNpc => "occupation_npc",
            Self::GroupMember => "group_member",
            Self::Boss => "boss",
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A possible character or creature found in narrator text.
///
/// Mentions have no identity beyond the extraction call that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMention {
    /// Pass that produced this mention.
    pub kind: MentionKind,
    /// The literal substring that matched.
    pub display_text: String,
    /// Proper name, for named and boss mentions.
    pub resolved_name: Option<String>,
    /// Creature type, lowercase. Empty when unknown.
    pub race: String,
    /// Combat class inferred from the race. Empty when unknown.
    pub class: String,
    /// Occupation, lowercase. Empty unless an occupation NPC.
    pub occupation: String,
    /// Whether this is an interchangeable, unnamed creature.
    pub is_generic: bool,
}

impl CharacterMention {
    pub(crate) fn named(display_text: &str, name: &str) -> Self {
        Self {
            kind: MentionKind::Named,
            display_text: display_text.to_string(),
            resolved_name: Some(name.to_string()),
            race: String::new(),
            class: String::new(),
            occupation: String::new(),
            is_generic: false,
        }
    }

    pub(crate) fn creature(
        kind: MentionKind,
        display_text: &str,
        race: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            display_text: display_text.to_string(),
            resolved_name: None,
            race: race.into(),
            class: class.into(),
            occupation: String::new(),
            is_generic: true,
        }
    }

    pub(crate) fn occupation(display_text: &str, occupation: impl Into<String>) -> Self {
        Self {
            kind: MentionKind::OccupationNpc,
            display_text: display_text.to_string(),
            resolved_name: None,
            race: String::new(),
            class: String::new(),
            occupation: occupation.into(),
            is_generic: false,
        }
    }

    pub(crate) fn boss(display_text: &str, race: impl Into<String>) -> Self {
        Self {
            kind: MentionKind::Boss,
            display_text: display_text.to_string(),
            resolved_name: Some(display_text.to_string()),
            race: race.into(),
            class: String::new(),
            occupation: String::new(),
            is_generic: false,
        }
    }

    /// Name the party would use before learning a real one. Only occupation
    /// NPCs have one: the capitalized occupation.
    pub fn generic_name(&self) -> Option<String> {
        match self.kind {
            MentionKind::OccupationNpc => Some(capitalize(&self.occupation)),
            _ => None,
        }
    }

    /// Generic enemies, group members and bosses are hostile.
    pub fn is_hostile(&self) -> bool {
        self.kind.is_hostile()
    }

    /// A short human-readable label for listings.
    pub fn label(&self) -> String {
        if let Some(name) = &self.resolved_name {
            return name.clone();
        }
        if let Some(generic) = self.generic_name() {
            return generic;
        }
        if self.race.is_empty() {
            "Unknown".to_string()
        } else {
            capitalize(&self.race)
        }
    }
}

/// Payload handed to the combat-start consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStart {
    /// The hostile mentions of the scene.
    pub enemies: Vec<CharacterMention>,
}

/// Result of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneExtraction {
    /// Mentions in pass order.
    pub mentions: Vec<CharacterMention>,
    /// Whether a combat trigger phrase appeared in the text.
    pub combat_detected: bool,
}

impl SceneExtraction {
    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Number of mentions of one kind.
    pub fn count_of(&self, kind: MentionKind) -> usize {
        self.mentions.iter().filter(|m| m.kind == kind).count()
    }

    /// Hostile mentions, in order.
    pub fn hostiles(&self) -> impl Iterator<Item = &CharacterMention> {
        self.mentions.iter().filter(|m| m.is_hostile())
    }

    /// The combat-start signal: present only when a trigger phrase was found
    /// and at least one hostile was mentioned.
    pub fn combat_start(&self) -> Option<CombatStart> {
        if !self.combat_detected {
            return None;
        }
        let enemies: Vec<CharacterMention> = self.hostiles().cloned().collect();
        if enemies.is_empty() {
            None
        } else {
            Some(CombatStart { enemies })
        }
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
