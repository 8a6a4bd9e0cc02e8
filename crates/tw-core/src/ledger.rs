use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TwResult;

/// Trust level every relationship starts from.
pub const DEFAULT_TRUST: i32 = 50;

/// The relationship and reputation store.
pub trait RelationshipLedger {
    /// Shift trust with a character by `delta`, recording why.
    fn modify_relationship(&mut self, character_id: &str, delta: i32, reason: &str)
    -> TwResult<()>;

    /// Current relationship with a character, if one has been recorded.
    fn get_relationship(&self, character_id: &str) -> Option<RelationshipView>;
}

/// How a character regards the party, bucketed from trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    /// Trust 10 or below.
    Enemy,
    /// Trust 11 to 30.
    Unfriendly,
    /// Trust 31 to 40.
    Neutral,
    /// Trust 41 to 70.
    Friendly,
    /// Trust 71 to 90.
    Ally,
    /// Trust above 90.
    Devoted,
}

impl Standing {
    /// Bucket a trust level.
    pub fn from_trust(trust: i32) -> Self {
        match trust {
            ..=10 => Self::Enemy,
            11..=30 => Self::Unfriendly,
            31..=40 => Self::Neutral,
            41..=70 => Self::Friendly,
            71..=90 => Self::Ally,
            _ => Self::Devoted,
        }
    }

    /// Returns true for friendly standings and better.
    pub fn is_warm(&self) -> bool {
        *self >= Self::Friendly
    }

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enemy => "enemy",
            Self::Unfriendly => "unfriendly",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
            Self::Ally => "ally",
            Self::Devoted => "devoted",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded trust change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustNote {
    /// Requested change.
    pub change: i32,
    /// Why the change happened.
    pub reason: String,
    /// Trust before the change.
    pub old_value: i32,
    /// Trust after the change (clamped).
    pub new_value: i32,
    /// When the change was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A read-only view of one relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipView {
    /// The character this relationship is with.
    pub character_id: String,
    /// Trust level in 0..=100.
    pub trust: i32,
    /// Bucketed standing.
    pub standing: Standing,
    /// Number of recorded interactions.
    pub interactions: u32,
    /// Trust change history, oldest first.
    pub notes: Vec<TrustNote>,
}

impl RelationshipView {
    fn new(character_id: impl Into<String>, trust: i32) -> Self {
        let trust = trust.clamp(0, 100);
        Self {
            character_id: character_id.into(),
            trust,
            standing: Standing::from_trust(trust),
            interactions: 0,
            notes: Vec::new(),
        }
    }
}

/// A trust ledger kept in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    relationships: HashMap<String, RelationshipView>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite a relationship at an explicit trust level.
    pub fn set_relationship(&mut self, character_id: impl Into<String>, trust: i32) {
        let character_id = character_id.into();
        self.relationships.insert(
            character_id.clone(),
            RelationshipView::new(character_id, trust),
        );
    }

    /// Number of tracked relationships.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether no relationships are tracked.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

impl RelationshipLedger for InMemoryLedger {
    fn modify_relationship(
        &mut self,
        character_id: &str,
        delta: i32,
        reason: &str,
    ) -> TwResult<()> {
        let view = self
            .relationships
            .entry(character_id.to_string())
            .or_insert_with(|| RelationshipView::new(character_id, DEFAULT_TRUST));

        let old_value = view.trust;
        let new_value = (old_value + delta).clamp(0, 100);
        view.trust = new_value;
        view.interactions += 1;
        view.notes.push(TrustNote {
            change: delta,
            reason: reason.to_string(),
            old_value,
            new_value,
            timestamp: Utc::now(),
        });

        let standing = Standing::from_trust(new_value);
        if standing != view.standing {
            tracing::info!(
                character = character_id,
                from = %view.standing,
                to = %standing,
                "relationship standing changed"
            );
            view.standing = standing;
        }
        Ok(())
    }

    fn get_relationship(&self, character_id: &str) -> Option<RelationshipView> {
        self.relationships.get(character_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_buckets() {
        assert_eq!(Standing::from_trust(0), Standing::Enemy);
        assert_eq!(Standing::from_trust(10), Standing::Enemy);
        assert_eq!(Standing::from_trust(11), Standing::Unfriendly);
        assert_eq!(Standing::from_trust(40), Standing::Neutral);
        assert_eq!(Standing::from_trust(50), Standing::Friendly);
        assert_eq!(Standing::from_trust(90), Standing::Ally);
        assert_eq!(Standing::from_trust(91), Standing::Devoted);
        assert!(Standing::Ally.is_warm());
        assert!(!Standing::Neutral.is_warm());
    }

    #[test]
    fn unknown_character_has_no_relationship() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.get_relationship("bandit_chief").is_none());
    }

    #[test]
    fn modify_creates_entry_at_default_trust() {
        let mut ledger = InMemoryLedger::new();
        ledger
            .modify_relationship("bandit_chief", 1, "offered gold")
            .unwrap();
        let view = ledger.get_relationship("bandit_chief").unwrap();
        assert_eq!(view.trust, DEFAULT_TRUST + 1);
        assert_eq!(view.interactions, 1);
        assert_eq!(view.notes[0].reason, "offered gold");
        assert_eq!(view.notes[0].old_value, DEFAULT_TRUST);
    }

    #[test]
    fn trust_is_clamped() {
        let mut ledger = InMemoryLedger::new();
        ledger.set_relationship("mira", 98);
        ledger.modify_relationship("mira", 10, "saved her").unwrap();
        let view = ledger.get_relationship("mira").unwrap();
        assert_eq!(view.trust, 100);
        assert_eq!(view.standing, Standing::Devoted);

        ledger.modify_relationship("mira", -500, "betrayal").unwrap();
        assert_eq!(ledger.get_relationship("mira").unwrap().trust, 0);
    }

    #[test]
    fn standing_follows_trust() {
        let mut ledger = InMemoryLedger::new();
        ledger.set_relationship("grix", 42);
        assert_eq!(
            ledger.get_relationship("grix").unwrap().standing,
            Standing::Friendly
        );
        ledger.modify_relationship("grix", -2, "insult").unwrap();
        assert_eq!(
            ledger.get_relationship("grix").unwrap().standing,
            Standing::Neutral
        );
    }
}
