//! CLI tests.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCRIPT: &str = r#"{
    "party": ["Thalia"],
    "relationships": {"bandit_chief": 20},
    "steps": [
        {"step": "start_encounter", "location": "Millbrook Road"},
        {"step": "narrate", "text": "Thalia draws her bow. Grix attacks! Two bandits charge."},
        {"step": "narrate", "text": "The innkeeper cowers behind the bar."},
        {"step": "reveal", "participant": "Innkeeper", "name": "Harold"},
        {"step": "set_status", "participant": "Bandit rogue 2", "status": "fled"},
        {"step": "end_encounter"},
        {"step": "choose", "choice": {
            "description": "Negotiate with the bandit chief",
            "selected_option": "Offer them safe passage",
            "context": {"characters": ["bandit_chief"], "stakes": "high"}
        }},
        {"step": "event", "event": {"type": "npc_interaction", "character_id": "bandit_chief"}}
    ]
}"#;

fn script_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn tw() -> Command {
    Command::cargo_bin("tw").unwrap()
}

// ---------------------------------------------------------------------------
// extract
// ---------------------------------------------------------------------------

#[test]
fn extract_lists_goblins_and_shopkeeper() {
    tw().args(["extract", "Three goblins emerge while a shopkeeper cowers."])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Goblin")
                .and(predicate::str::contains("Shopkeeper"))
                .and(predicate::str::contains("4 mentions"))
                .and(predicate::str::contains("Combat detected:")),
        );
}

#[test]
fn extract_json_output() {
    let output = tw()
        .args(["extract", "Grix attacks with a snarl.", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["combat_detected"], true);
    assert_eq!(value["mentions"][0]["kind"], "named");
    assert_eq!(value["mentions"][0]["resolved_name"], "Grix");
}

#[test]
fn extract_skips_party_members() {
    tw().args([
        "extract",
        "Thalia draws her blade as Grix approaches.",
        "--party",
        "thalia",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Grix").and(predicate::str::contains("Thalia").not()));
}

#[test]
fn extract_empty_text() {
    tw().args(["extract", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("No mentions found"));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

#[test]
fn replay_prints_report() {
    let (_dir, path) = script_file(SCRIPT);
    tw().args(["replay", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Bandit rogue 2")
                .and(predicate::str::contains("Harold"))
                .and(predicate::str::contains("NPCs:"))
                .and(predicate::str::contains("1 effects fired"))
                .and(predicate::str::contains("1 choices")),
        );
}

#[test]
fn replay_json_report() {
    let (_dir, path) = script_file(SCRIPT);
    let output = tw()
        .args(["replay", path.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 8);
    assert_eq!(report["outcomes"][1]["outcome"], "narrated");
    assert_eq!(report["outcomes"][3]["to"], "Harold");
    // Harold was promoted at the reveal; the end of the encounter refreshes him
    assert_eq!(report["promoted"], serde_json::json!(["Grix", "Harold"]));
    assert_eq!(report["world_npcs"], serde_json::json!(["Harold", "Grix"]));
    assert_eq!(report["analysis"]["total_choices"], 1);
    assert_eq!(report["effects"][0]["kind"], "character_memory");
}

#[test]
fn replay_missing_file_fails() {
    tw().args(["replay", "/nonexistent/session.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: cannot read"));
}

#[test]
fn replay_invalid_script_fails() {
    let (_dir, path) = script_file(r#"{"steps": [{"step": "teleport"}]}"#);
    tw().args(["replay", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid session script"));
}
