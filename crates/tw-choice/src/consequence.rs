use std::fmt;

use serde::{Deserialize, Serialize};
use tw_core::{MetadataValue, RelationshipLedger, WorldRegistry};

use crate::choice::ChoiceContext;
use crate::keywords::{RESOURCE_DELTAS, WORLD_FLAGS, mentions_any};

/// An immediate, first-order result of a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Consequence {
    /// Trust shift toward one character.
    Relationship {
        /// Character ID.
        target: String,
        /// Signed trust delta.
        change: i32,
        /// Human-readable summary.
        description: String,
    },
    /// A world-state flag.
    WorldState {
        /// Flag key, `location_<loc>_<suffix>`.
        key: String,
        /// Flag value.
        value: bool,
        /// Human-readable summary.
        description: String,
    },
    /// A party resource change. Kept locally; no collaborator owns resources.
    Resource {
        /// Resource name.
        resource: String,
        /// Signed amount.
        change: i32,
        /// Human-readable summary.
        description: String,
    },
}

impl Consequence {
    /// Short type label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Relationship { .. } => "relationship",
            Self::WorldState { .. } => "world_state",
            Self::Resource { .. } => "resource",
        }
    }

    /// Human-readable summary.
    pub fn description(&self) -> &str {
        match self {
            Self::Relationship { description, .. }
            | Self::WorldState { description, .. }
            | Self::Resource { description, .. } => description,
        }
    }
}

impl fmt::Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Build the consequence list for a selected option: relationships first,
/// then world flags, then resources.
pub(crate) fn derive(selected: &str, context: &ChoiceContext, delta: i32) -> Vec<Consequence> {
    let mut consequences = Vec::new();

    if delta != 0 {
        for character in &context.characters {
            let verb = if delta > 0 { "approves" } else { "disapproves" };
            consequences.push(Consequence::Relationship {
                target: character.clone(),
                change: delta,
                description: format!("{character} {verb} of your choice"),
            });
        }
    }

    for (suffix, words) in WORLD_FLAGS {
        if mentions_any(selected, words) {
            let location = &context.location;
            let description = match *suffix {
                "destroyed" => format!("{location} has been damaged or destroyed"),
                _ => format!("{location} has been protected or saved"),
            };
            consequences.push(Consequence::WorldState {
                key: format!("location_{location}_{suffix}"),
                value: true,
                description,
            });
        }
    }

    for (resource, change, words, description) in RESOURCE_DELTAS {
        if mentions_any(selected, words) {
            consequences.push(Consequence::Resource {
                resource: (*resource).to_string(),
                change: *change,
                description: (*description).to_string(),
            });
        }
    }

    consequences
}

/// Push consequences out to the collaborators that own them. Missing or
/// failing collaborators are logged and skipped.
pub(crate) fn apply<'l, 'r>(
    consequences: &[Consequence],
    reason: &str,
    mut ledger: Option<&mut (dyn RelationshipLedger + 'l)>,
    mut registry: Option<&mut (dyn WorldRegistry + 'r)>,
) {
    for consequence in consequences {
        match consequence {
            Consequence::Relationship { target, change, .. } => match ledger.as_deref_mut() {
                Some(ledger) => {
                    if let Err(e) = ledger.modify_relationship(target, *change, reason) {
                        tracing::warn!(character = %target, error = %e, "relationship update failed");
                    }
                }
                None => {
                    tracing::warn!(character = %target, "no relationship ledger; change kept locally");
                }
            },
            Consequence::WorldState { key, value, .. } => match registry.as_deref_mut() {
                Some(registry) => {
                    if let Err(e) = registry.set_world_state(key, MetadataValue::Boolean(*value)) {
                        tracing::warn!(key = %key, error = %e, "world state update failed");
                    }
                }
                None => {
                    tracing::warn!(key = %key, "no world registry; flag kept locally");
                }
            },
            Consequence::Resource { .. } => {}
        }
    }
}
