use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tw_core::EntityId;
use tw_scene::{CharacterMention, MentionKind};
use uuid::Uuid;

/// Session-unique participant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Generate a new random participant ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Whether a participant is still in the fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Still acting.
    #[default]
    Active,
    /// Down but alive.
    Unconscious,
    /// Dead.
    Dead,
    /// Left the encounter.
    Fled,
}

impl ParticipantStatus {
    /// Parse a status name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "unconscious" => Some(Self::Unconscious),
            "dead" => Some(Self::Dead),
            "fled" => Some(Self::Fled),
            _ => None,
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Unconscious => write!(f, "unconscious"),
            Self::Dead => write!(f, "dead"),
            Self::Fled => write!(f, "fled"),
        }
    }
}

/// Default combat numbers. The combat resolver owns the real ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Current hit points.
    pub hit_points: u32,
    /// Maximum hit points.
    pub max_hit_points: u32,
    /// Armor class.
    pub armor_class: u32,
    /// Initiative roll.
    pub initiative: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            hit_points: 10,
            max_hit_points: 10,
            armor_class: 10,
            initiative: 0,
        }
    }
}

/// Roll starting stats for a mention: bosses are tougher than rank-and-file
/// hostiles, and everyone else sits in between.
pub fn default_stats(mention: &CharacterMention, rng: &mut StdRng) -> CombatStats {
    let (hit_points, armor_class) = match mention.kind {
        MentionKind::Boss => (rng.random_range(50..=99), rng.random_range(15..=17)),
        MentionKind::GenericEnemy | MentionKind::GroupMember => {
            (rng.random_range(10..=24), rng.random_range(10..=13))
        }
        MentionKind::Named | MentionKind::OccupationNpc => {
            (rng.random_range(20..=29), rng.random_range(12..=14))
        }
    };
    CombatStats {
        hit_points,
        max_hit_points: hit_points,
        armor_class,
        initiative: rng.random_range(1..=20),
    }
}

/// A session-scoped actor in the current encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Session-unique ID.
    pub id: ParticipantId,
    /// Weak link to a world registry entry.
    pub registry_id: Option<EntityId>,
    /// Real name, once there is one.
    pub real_name: Option<String>,
    /// Generated or registry-provided stand-in name.
    pub generic_name: Option<String>,
    /// The name shown to players.
    pub display_name: String,
    /// Whether the party has learned the real name.
    pub party_knows_name: bool,
    /// Whether a player controls this participant.
    pub is_player_character: bool,
    /// Whether this is an interchangeable creature that never persists.
    pub is_generic: bool,
    /// Free-text race.
    pub race: String,
    /// Free-text class.
    pub class: String,
    /// Free-text occupation.
    pub occupation: String,
    /// Default combat numbers.
    pub stats: CombatStats,
    /// Current status.
    pub status: ParticipantStatus,
}

impl Participant {
    /// Whether the participant has a real (non-generic) name.
    pub fn has_real_name(&self) -> bool {
        self.real_name.is_some()
    }

    /// Whether ending the encounter would write this participant to the
    /// registry.
    pub fn is_promotable(&self) -> bool {
        self.has_real_name() && !self.is_generic && !self.is_player_character
    }
}

/// Input for [`EncounterRoster::add_participant`](crate::EncounterRoster::add_participant).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantData {
    /// Pre-assigned ID.
    pub id: Option<ParticipantId>,
    /// Proposed name. Generic-looking names are treated as absent.
    pub name: Option<String>,
    /// Free-text race.
    pub race: String,
    /// Free-text class.
    pub class: String,
    /// Free-text occupation.
    pub occupation: String,
    /// Explicit generic flag; inferred when `None`.
    pub is_generic: Option<bool>,
    /// Whether a player controls this participant.
    pub is_player_character: bool,
    /// Link to an existing registry entry.
    pub registry_id: Option<EntityId>,
    /// Whether the party already knows the name.
    pub party_knows_name: bool,
    /// Combat numbers; defaults when `None`.
    pub stats: Option<CombatStats>,
}

impl ParticipantData {
    /// Empty data: an unnamed, inferred participant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Data for a participant with a proposed name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Build participant data from an extracted mention, rolling default
    /// stats. Occupation NPCs carry no name; the roster names them after
    /// their occupation until a real name is revealed.
    pub fn from_mention(mention: &CharacterMention, rng: &mut StdRng) -> Self {
        let name = if mention.is_generic {
            None
        } else {
            mention.resolved_name.clone()
        };
        Self {
            party_knows_name: name.is_some(),
            name,
            race: mention.race.clone(),
            class: mention.class.clone(),
            occupation: mention.occupation.clone(),
            is_generic: Some(mention.is_generic),
            stats: Some(default_stats(mention, rng)),
            ..Self::default()
        }
    }

    /// Set the race.
    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = race.into();
        self
    }

    /// Set the class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set the occupation.
    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = occupation.into();
        self
    }

    /// Force the generic flag.
    pub fn generic(mut self, is_generic: bool) -> Self {
        self.is_generic = Some(is_generic);
        self
    }

    /// Mark as a player character.
    pub fn player_character(mut self) -> Self {
        self.is_player_character = true;
        self
    }

    /// Link to a registry entry.
    pub fn linked_to(mut self, id: EntityId) -> Self {
        self.registry_id = Some(id);
        self
    }

    /// Set combat stats.
    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Whether this data describes an interchangeable creature: the explicit
    /// flag wins, then player characters and registry-linked entries are
    /// never generic, then a missing or generic-looking name is.
    pub fn infer_generic(&self) -> bool {
        if let Some(flag) = self.is_generic {
            return flag;
        }
        if self.is_player_character || self.registry_id.is_some() {
            return false;
        }
        self.name
            .as_deref()
            .is_none_or(crate::naming::is_generic_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tw_core::PartyRoster;
    use tw_scene::{ExtractorConfig, extract_mentions};

    fn mentions(text: &str) -> Vec<CharacterMention> {
        let mut rng = StdRng::seed_from_u64(3);
        extract_mentions(text, &PartyRoster::new(), &ExtractorConfig::default(), &mut rng)
            .mentions
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!(ParticipantStatus::parse("Dead"), Some(ParticipantStatus::Dead));
        assert_eq!(ParticipantStatus::parse("asleep"), None);
        assert_eq!(ParticipantStatus::Fled.to_string(), "fled");
    }

    #[test]
    fn default_stats_ranges() {
        let mut rng = StdRng::seed_from_u64(9);
        for mention in mentions("An ancient dragon and two goblins watch the innkeeper.") {
            for _ in 0..50 {
                let stats = default_stats(&mention, &mut rng);
                assert_eq!(stats.hit_points, stats.max_hit_points);
                assert!((1..=20).contains(&stats.initiative));
                match mention.kind {
                    MentionKind::Boss => {
                        assert!((50..=99).contains(&stats.hit_points));
                        assert!((15..=17).contains(&stats.armor_class));
                    }
                    MentionKind::GenericEnemy => {
                        assert!((10..=24).contains(&stats.hit_points));
                        assert!((10..=13).contains(&stats.armor_class));
                    }
                    _ => {
                        assert!((20..=29).contains(&stats.hit_points));
                        assert!((12..=14).contains(&stats.armor_class));
                    }
                }
            }
        }
    }

    #[test]
    fn infer_generic_rules() {
        assert!(ParticipantData::new().infer_generic());
        assert!(ParticipantData::named("Goblin 3").infer_generic());
        assert!(!ParticipantData::named("Grix").infer_generic());
        assert!(!ParticipantData::new().player_character().infer_generic());
        assert!(!ParticipantData::new().linked_to(EntityId::new()).infer_generic());
        assert!(ParticipantData::named("Grix").generic(true).infer_generic());
        assert!(!ParticipantData::named("Goblin").generic(false).infer_generic());
    }

    #[test]
    fn from_mention_keeps_names_only_for_named_kinds() {
        let mut rng = StdRng::seed_from_u64(1);
        for mention in mentions("Grix attacks the shopkeeper while a goblin watches.") {
            let data = ParticipantData::from_mention(&mention, &mut rng);
            match mention.kind {
                MentionKind::Named => {
                    assert_eq!(data.name.as_deref(), Some("Grix"));
                    assert!(data.party_knows_name);
                    assert_eq!(data.is_generic, Some(false));
                }
                MentionKind::OccupationNpc => {
                    assert!(data.name.is_none());
                    assert_eq!(data.occupation, "shopkeeper");
                    assert_eq!(data.is_generic, Some(false));
                }
                _ => {
                    assert!(data.name.is_none());
                    assert_eq!(data.is_generic, Some(true));
                }
            }
            assert!(data.stats.is_some());
        }
    }
}
