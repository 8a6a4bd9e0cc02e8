//! Table session facade for Taleweaver.
//!
//! A [`TableSession`] owns the world registry, relationship ledger and party
//! for one table, and routes narration through the scene extractor into the
//! encounter roster and player decisions into the choice engine. Sessions
//! can be driven step by step or replayed from a JSON [`SessionScript`].

pub mod config;
pub mod error;
pub mod script;
pub mod session;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use script::{SessionReport, SessionScript, SessionStep, StepOutcome};
pub use session::{LEDGER_KEY, Narration, PARTY_KEY, TableSession};
