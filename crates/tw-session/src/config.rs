//! Configuration for a table session.

use tw_choice::ChoiceConfig;
use tw_encounter::EncounterConfig;
use tw_scene::ExtractorConfig;

/// Configuration for a table session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// RNG seed for reproducible group sizes and combat stats.
    pub seed: u64,
    /// Scene extractor settings.
    pub extractor: ExtractorConfig,
    /// Encounter roster settings.
    pub encounter: EncounterConfig,
    /// Choice engine settings.
    pub choice: ChoiceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            extractor: ExtractorConfig::default(),
            encounter: EncounterConfig::default(),
            choice: ChoiceConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the extractor configuration.
    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the encounter configuration.
    pub fn with_encounter(mut self, encounter: EncounterConfig) -> Self {
        self.encounter = encounter;
        self
    }

    /// Set the choice engine configuration.
    pub fn with_choice(mut self, choice: ChoiceConfig) -> Self {
        self.choice = choice;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.extractor.max_quantity, 50);
        assert_eq!(cfg.encounter.default_location, "Unknown Location");
        assert_eq!(cfg.choice.reputation_delay_days, 7);
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default()
            .with_seed(7)
            .with_choice(ChoiceConfig::default().with_reputation_delay_days(2))
            .with_encounter(EncounterConfig::default().with_default_location("Crossroads"));
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.choice.reputation_delay_days, 2);
        assert_eq!(cfg.encounter.default_location, "Crossroads");
    }
}
