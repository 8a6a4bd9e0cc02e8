use serde::{Deserialize, Serialize};

/// Answers whether a name belongs to one of the players' characters.
pub trait PlayerRoster {
    /// True if `name` is a known player character (case-insensitive).
    fn is_player_character_name(&self, name: &str) -> bool;
}

/// A simple list of player-character names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyRoster {
    names: Vec<String>,
}

impl PartyRoster {
    /// Create an empty party.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a party from a list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a player character. Duplicate names are ignored.
    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.is_player_character_name(&name) {
            self.names.push(name);
        }
    }

    /// All player-character names.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl PlayerRoster for PartyRoster {
    fn is_player_character_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}
