use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tw_session::{SessionConfig, SessionReport, SessionScript, StepOutcome, TableSession};

pub fn run(file: &Path, seed: u64, json: bool) -> Result<(), String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let script = SessionScript::from_json(&source)
        .map_err(|e| format!("invalid session script {}: {e}", file.display()))?;

    let mut session = TableSession::new(SessionConfig::default().with_seed(seed));
    let report = session.run_script(script);

    if json {
        return super::print_json(&report);
    }

    println!(
        "  {} {}",
        "Replay".bold(),
        format!("({} steps, seed={seed})", report.outcomes.len()).dimmed()
    );
    println!();
    print_outcomes(&report);
    print_world(&report);
    print_choices(&report);

    Ok(())
}

fn print_outcomes(report: &SessionReport) {
    if report.outcomes.is_empty() {
        println!("  {}", "(no steps)".dimmed());
        println!();
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Step", "Result"]);
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let (step, detail) = describe(outcome);
        table.add_row(vec![(i + 1).to_string(), step.to_string(), detail]);
    }
    println!("{table}");
    println!();
}

fn describe(outcome: &StepOutcome) -> (&'static str, String) {
    match outcome {
        StepOutcome::Narrated { added, combat } => {
            let mut detail = if added.is_empty() {
                "nobody new".to_string()
            } else {
                added.join(", ")
            };
            if let Some(start) = combat {
                detail.push_str(&format!(" | combat: {} enemies", start.enemies.len()));
            }
            ("narrate", detail)
        }
        StepOutcome::EncounterStarted { encounter_id } => {
            ("start encounter", encounter_id.clone())
        }
        StepOutcome::EncounterEnded { summary } => (
            "end encounter",
            format!(
                "{} promoted, {} discarded, {} failed",
                summary.promoted.len(),
                summary.discarded,
                summary.failed
            ),
        ),
        StepOutcome::ParticipantAdded { participant } => ("add participant", participant.clone()),
        StepOutcome::Revealed { from, to } => ("reveal", format!("{from} -> {to}")),
        StepOutcome::StatusChanged {
            participant,
            status,
        } => ("set status", format!("{participant}: {status}")),
        StepOutcome::ChoiceRecorded {
            choice_id,
            categories,
            moral_weight,
            narrative_impact,
            consequences,
            seeds,
        } => {
            let categories: Vec<String> = categories.iter().map(ToString::to_string).collect();
            (
                "choose",
                format!(
                    "{choice_id} [{}] moral {moral_weight:+}, impact {narrative_impact:.1}, \
                     {consequences} consequences, {seeds} seeds",
                    categories.join(", ")
                ),
            )
        }
        StepOutcome::EventProcessed { effects } => {
            ("event", format!("{} effects fired", effects.len()))
        }
        StepOutcome::PartyMemberAdded { name } => ("add party member", name.clone()),
        StepOutcome::Skipped { reason } => ("skipped", reason.clone()),
    }
}

fn print_world(report: &SessionReport) {
    println!("  {}", "World".bold().underline());
    if report.world_npcs.is_empty() {
        println!("  {}", "(no NPCs recorded)".dimmed());
    } else {
        println!("  NPCs: {}", report.world_npcs.join(", "));
    }
    if !report.promoted.is_empty() {
        println!("  Promoted this session: {}", report.promoted.join(", "));
    }
    for effect in &report.effects {
        println!("  {} {}", "effect".yellow(), effect.description);
    }
    println!();
}

fn print_choices(report: &SessionReport) {
    let analysis = &report.analysis;
    let personality = &report.personality;

    println!("  {}", "Choices".bold().underline());
    println!(
        "  {} choices, average impact {:.1}, {} seeds waiting",
        analysis.total_choices, analysis.narrative_impact.average_impact, analysis.active_seeds
    );
    println!(
        "  Alignment: {}  Personality: {}",
        personality.moral_alignment, personality.narrative_personality
    );
    if !personality.dominant_traits.is_empty() {
        let traits: Vec<String> = personality
            .dominant_traits
            .iter()
            .map(|(t, n)| format!("{t} ({n})"))
            .collect();
        println!("  Dominant traits: {}", traits.join(", "));
    }
    if let Some(arc) = &analysis.arc_progress {
        println!(
            "  Arc: {} after {} choices, {} key moments",
            arc.narrative_direction, arc.progression, arc.key_moments
        );
    }
}
