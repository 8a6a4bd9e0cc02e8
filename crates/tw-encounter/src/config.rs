/// Configuration for the encounter roster.
#[derive(Debug, Clone)]
pub struct EncounterConfig {
    /// Location used when an encounter starts without one.
    pub default_location: String,
    /// Occupation recorded for promoted characters that have neither an
    /// occupation nor a class.
    pub fallback_occupation: String,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            default_location: "Unknown Location".to_string(),
            fallback_occupation: "Adventurer".to_string(),
        }
    }
}

impl EncounterConfig {
    /// Set the default location.
    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = location.into();
        self
    }

    /// Set the fallback occupation.
    pub fn with_fallback_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.fallback_occupation = occupation.into();
        self
    }
}
