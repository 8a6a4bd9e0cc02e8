//! Core types for Taleweaver: the world registry, the relationship ledger, and
//! the narrow collaborator contracts the scene, encounter and choice crates
//! are written against.
//!
//! Every collaborator is a trait so that callers can plug in their own
//! storage. The in-memory implementations here back the tests, the table
//! session and the CLI.

/// Registry entity types, identifiers, and metadata values.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Relationship ledger contract and in-memory trust ledger.
pub mod ledger;
/// Player-character roster used to disambiguate names.
pub mod party;
/// World registry contract and in-memory registry.
pub mod registry;
/// Opaque key/value persistence.
pub mod store;

/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityKind, EntityUpdate, MetadataValue};
/// Re-export error types.
pub use error::{TwError, TwResult};
/// Re-export ledger types.
pub use ledger::{
    DEFAULT_TRUST, InMemoryLedger, RelationshipLedger, RelationshipView, Standing, TrustNote,
};
/// Re-export the player roster types.
pub use party::{PartyRoster, PlayerRoster};
/// Re-export registry types.
pub use registry::{InMemoryRegistry, WorldRegistry};
/// Re-export store types.
pub use store::{KeyValueStore, MemoryStore};
