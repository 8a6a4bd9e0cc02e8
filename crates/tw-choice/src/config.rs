/// Configuration for the choice engine.
#[derive(Debug, Clone)]
pub struct ChoiceConfig {
    /// Narrative impact at which a choice becomes a key moment.
    pub key_moment_threshold: f64,
    /// Impact multiplier for choices that break the player's pattern.
    pub novelty_multiplier: f64,
    /// How many top traits count as the player's dominant pattern.
    pub dominant_trait_count: usize,
    /// Days that must pass before a reputation seed can fire.
    pub reputation_delay_days: u32,
    /// Location recorded when a choice context names none.
    pub location_fallback: String,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            key_moment_threshold: 5.0,
            novelty_multiplier: 1.5,
            dominant_trait_count: 3,
            reputation_delay_days: 7,
            location_fallback: "Unknown".to_string(),
        }
    }
}

impl ChoiceConfig {
    /// Set the key-moment threshold.
    pub fn with_key_moment_threshold(mut self, threshold: f64) -> Self {
        self.key_moment_threshold = threshold;
        self
    }

    /// Set the novelty multiplier (at least 1).
    pub fn with_novelty_multiplier(mut self, multiplier: f64) -> Self {
        self.novelty_multiplier = multiplier.max(1.0);
        self
    }

    /// Set the dominant trait count (at least 1).
    pub fn with_dominant_trait_count(mut self, count: usize) -> Self {
        self.dominant_trait_count = count.max(1);
        self
    }

    /// Set the reputation delay in days.
    pub fn with_reputation_delay_days(mut self, days: u32) -> Self {
        self.reputation_delay_days = days;
        self
    }

    /// Set the fallback location.
    pub fn with_location_fallback(mut self, location: impl Into<String>) -> Self {
        self.location_fallback = location.into();
        self
    }
}
