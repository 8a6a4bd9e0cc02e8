//! Session encounter roster for Taleweaver.
//!
//! An [`EncounterRoster`] holds the participants of the current encounter.
//! Participants come from scene extraction or manual entry; unnamed ones get
//! numbered generic names, named ones are linked to (or promoted into) the
//! world registry when the encounter ends.

/// Roster configuration.
pub mod config;
/// Generic-name detection and generation.
pub mod naming;
/// Participant types and default combat stats.
pub mod participant;
/// The encounter state machine.
pub mod roster;

pub use config::EncounterConfig;
pub use naming::{base_name, is_generic_name};
pub use participant::{
    CombatStats, Participant, ParticipantData, ParticipantId, ParticipantStatus, default_stats,
};
pub use roster::{Encounter, EncounterRoster, EncounterSummary, Promotion};
