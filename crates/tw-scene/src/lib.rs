//! Scene entity extraction for Taleweaver.
//!
//! Narrator text goes in, an ordered list of [`CharacterMention`]s and a
//! combat flag come out. Extraction is a pure function of the text, the
//! static pattern tables in [`patterns`], the player roster and a
//! caller-owned RNG (used only for group sizes).
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tw_core::PartyRoster;
//! use tw_scene::{ExtractorConfig, MentionKind, extract_mentions};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let scene = extract_mentions(
//!     "Three goblins emerge while a shopkeeper cowers.",
//!     &PartyRoster::new(),
//!     &ExtractorConfig::default(),
//!     &mut rng,
//! );
//! assert_eq!(scene.count_of(MentionKind::GenericEnemy), 3);
//! assert!(!scene.combat_detected);
//! ```

/// Extractor tuning knobs.
pub mod config;
/// The extraction passes.
pub mod extractor;
/// Mention and extraction result types.
pub mod mention;
/// Fixed lexical tables.
pub mod patterns;

pub use config::ExtractorConfig;
pub use extractor::{detect_combat, extract_mentions};
pub use mention::{CharacterMention, CombatStart, MentionKind, SceneExtraction, capitalize};
