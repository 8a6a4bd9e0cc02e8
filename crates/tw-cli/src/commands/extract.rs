use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tw_core::PartyRoster;
use tw_scene::{ExtractorConfig, extract_mentions};

pub fn run(text: &str, party: &[String], seed: u64, json: bool) -> Result<(), String> {
    let party = PartyRoster::from_names(party);
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = extract_mentions(text, &party, &ExtractorConfig::default(), &mut rng);

    if json {
        return super::print_json(&scene);
    }

    if scene.is_empty() {
        println!("  No mentions found.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Label", "Kind", "Race", "Class", "Matched"]);
        for mention in &scene.mentions {
            let dash = |s: &str| {
                if s.is_empty() {
                    "-".to_string()
                } else {
                    s.to_string()
                }
            };
            table.add_row(vec![
                mention.label(),
                mention.kind.to_string(),
                dash(&mention.race),
                dash(&mention.class),
                mention.display_text.clone(),
            ]);
        }
        println!("{table}");
        println!();
        println!("  {} mentions", scene.mentions.len());
    }

    println!("  {} {}", "Combat detected:".bold(), super::flag(scene.combat_detected));
    if let Some(start) = scene.combat_start() {
        println!("  {} enemies enter combat", start.enemies.len());
    }

    Ok(())
}
