use std::collections::HashSet;
use std::sync::LazyLock;

use rand::Rng;
use rand::rngs::StdRng;
use regex::Regex;
use tw_core::PlayerRoster;

use crate::config::ExtractorConfig;
use crate::mention::{CharacterMention, MentionKind, SceneExtraction};
use crate::patterns::{
    ACTION_VERBS, COMBAT_TRIGGERS, GROUP_WORDS, INTENSIFIERS, NUMBER_WORDS, OCCUPATIONS,
    RACE_CLASSES, alternation, class_for_race, parse_quantity, singularize,
};

// Names are matched case-sensitively; verbs are not.
static NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b([A-Z][a-z]+(?:\s+(?:the\s+)?[A-Z][a-z]+)*)\s+(?i:{})\b",
        alternation(ACTION_VERBS)
    ))
    .expect("valid regex")
});

static GENERIC_ENEMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let numbers: Vec<&str> = NUMBER_WORDS.iter().map(|(w, _)| *w).collect();
    let mut creatures: Vec<&str> = RACE_CLASSES.iter().map(|(r, _)| *r).collect();
    creatures.push("wolves");
    Regex::new(&format!(
        r"(?i)\b(?:({}|\d+)\s+)?({})s?\b",
        alternation(&numbers),
        alternation(&creatures)
    ))
    .expect("valid regex")
});

static OCCUPATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:the|an?)\s+)?({})s?\b",
        alternation(OCCUPATIONS)
    ))
    .expect("valid regex")
});

static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:a\s+)?(?:{})\s+of\s+(\w+)\b",
        alternation(GROUP_WORDS)
    ))
    .expect("valid regex")
});

static BOSS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:the|an?)\s+)?(?:{})\s+(\w+)\b",
        alternation(INTENSIFIERS)
    ))
    .expect("valid regex")
});

static COMBAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation(COMBAT_TRIGGERS))).expect("valid regex")
});

/// Find every character and creature mention in `text`.
///
/// The five passes run in a fixed order and never suppress one another, so
/// one span may yield mentions from several passes. Only named mentions are
/// deduplicated (case-insensitively, first occurrence wins).
pub fn extract_mentions(
    text: &str,
    party: &dyn PlayerRoster,
    config: &ExtractorConfig,
    rng: &mut StdRng,
) -> SceneExtraction {
    if text.trim().is_empty() {
        return SceneExtraction::default();
    }

    let mut mentions = Vec::new();
    named_pass(text, party, &mut mentions);
    generic_enemy_pass(text, config, &mut mentions);
    occupation_pass(text, &mut mentions);
    group_pass(text, config, rng, &mut mentions);
    boss_pass(text, &mut mentions);

    let combat_detected = detect_combat(text);
    tracing::debug!(
        mentions = mentions.len(),
        combat_detected,
        "scene extracted"
    );

    SceneExtraction {
        mentions,
        combat_detected,
    }
}

/// Whether `text` contains a combat trigger phrase (whole words, any case).
pub fn detect_combat(text: &str) -> bool {
    COMBAT_RE.is_match(text)
}

fn named_pass(text: &str, party: &dyn PlayerRoster, out: &mut Vec<CharacterMention>) {
    let mut seen = HashSet::new();
    for caps in NAMED_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str().trim();
        if party.is_player_character_name(name) {
            tracing::debug!(name, "skipping player character");
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            out.push(CharacterMention::named(whole.as_str(), name));
        }
    }
}

fn generic_enemy_pass(text: &str, config: &ExtractorConfig, out: &mut Vec<CharacterMention>) {
    for caps in GENERIC_ENEMY_RE.captures_iter(text) {
        let (Some(whole), Some(creature)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let quantity = parse_quantity(caps.get(1).map(|m| m.as_str())).min(config.quantity_cap());
        let race = singularize(creature.as_str());
        let class = class_for_race(&race);
        for _ in 0..quantity {
            out.push(CharacterMention::creature(
                MentionKind::GenericEnemy,
                whole.as_str(),
                race.as_str(),
                class,
            ));
        }
    }
}

fn occupation_pass(text: &str, out: &mut Vec<CharacterMention>) {
    for caps in OCCUPATION_RE.captures_iter(text) {
        let (Some(whole), Some(occupation)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let occupation = occupation.as_str().to_lowercase();
        if already_detected(&occupation, out) {
            continue;
        }
        out.push(CharacterMention::occupation(whole.as_str(), occupation));
    }
}

fn group_pass(
    text: &str,
    config: &ExtractorConfig,
    rng: &mut StdRng,
    out: &mut Vec<CharacterMention>,
) {
    for caps in GROUP_RE.captures_iter(text) {
        let (Some(whole), Some(noun)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let race = singularize(noun.as_str());
        let class = class_for_race(&race);
        let (lo, hi) = config.group_bounds();
        let count = rng.random_range(lo..=hi);
        for _ in 0..count {
            out.push(CharacterMention::creature(
                MentionKind::GroupMember,
                whole.as_str(),
                race.as_str(),
                class,
            ));
        }
    }
}

fn boss_pass(text: &str, out: &mut Vec<CharacterMention>) {
    for caps in BOSS_RE.captures_iter(text) {
        let (Some(whole), Some(creature)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(CharacterMention::boss(
            whole.as_str().trim(),
            creature.as_str().to_lowercase(),
        ));
    }
}

/// True when an earlier mention already carries `text` as its name,
/// occupation or generic name.
fn already_detected(text: &str, mentions: &[CharacterMention]) -> bool {
    mentions.iter().any(|m| {
        m.resolved_name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(text))
            || m.occupation.eq_ignore_ascii_case(text)
            || m.generic_name()
                .is_some_and(|g| g.eq_ignore_ascii_case(text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use tw_core::PartyRoster;

    fn extract(text: &str) -> SceneExtraction {
        extract_with_party(text, &PartyRoster::new())
    }

    fn extract_with_party(text: &str, party: &PartyRoster) -> SceneExtraction {
        let mut rng = StdRng::seed_from_u64(42);
        extract_mentions(text, party, &ExtractorConfig::default(), &mut rng)
    }

    #[test]
    fn goblins_and_cowering_shopkeeper() {
        let scene = extract("Three goblins emerge while a shopkeeper cowers.");
        assert_eq!(scene.mentions.len(), 4);
        assert!(!scene.combat_detected);

        let goblins: Vec<_> = scene
            .mentions
            .iter()
            .filter(|m| m.kind == MentionKind::GenericEnemy)
            .collect();
        assert_eq!(goblins.len(), 3);
        for goblin in goblins {
            assert_eq!(goblin.race, "goblin");
            assert_eq!(goblin.class, "warrior");
            assert!(goblin.is_generic);
        }

        let shopkeeper = &scene.mentions[3];
        assert_eq!(shopkeeper.kind, MentionKind::OccupationNpc);
        assert_eq!(shopkeeper.occupation, "shopkeeper");
        assert_eq!(shopkeeper.generic_name().as_deref(), Some("Shopkeeper"));
        assert!(!shopkeeper.is_generic);
    }

    #[test]
    fn grix_attacks() {
        let scene = extract("Grix attacks with a snarl.");
        assert_eq!(scene.mentions.len(), 1);
        assert_eq!(scene.mentions[0].kind, MentionKind::Named);
        assert_eq!(scene.mentions[0].resolved_name.as_deref(), Some("Grix"));
        assert!(scene.combat_detected);
        // No hostile mention, so nothing to hand to the combat resolver.
        assert!(scene.combat_start().is_none());
    }

    #[test]
    fn empty_and_whitespace_text() {
        for text in ["", "   \n\t "] {
            let scene = extract(text);
            assert!(scene.is_empty());
            assert!(!scene.combat_detected);
        }
    }

    #[test]
    fn multi_word_names() {
        let scene = extract("Sir Aldrich draws his sword and approaches menacingly.");
        let named: Vec<_> = scene
            .mentions
            .iter()
            .filter(|m| m.kind == MentionKind::Named)
            .collect();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].resolved_name.as_deref(), Some("Sir Aldrich"));
        assert_eq!(named[0].display_text, "Sir Aldrich draws");

        let scene = extract("Bob the Bold shouts a challenge.");
        assert_eq!(
            scene.mentions[0].resolved_name.as_deref(),
            Some("Bob the Bold")
        );
    }

    #[test]
    fn named_mentions_are_deduplicated() {
        let scene = extract("Grix attacks. Grix runs. Mira shouts. Grix shouts.");
        let names: Vec<_> = scene
            .mentions
            .iter()
            .filter_map(|m| m.resolved_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Grix", "Mira"]);
    }

    #[test]
    fn player_characters_are_discarded() {
        let party = PartyRoster::from_names(["Thalia"]);
        let scene = extract_with_party("Thalia draws her bow. Grix runs.", &party);
        let names: Vec<_> = scene
            .mentions
            .iter()
            .filter_map(|m| m.resolved_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Grix"]);
    }

    #[test]
    fn quantities() {
        let scene = extract("Two orcs and 4 skeletons and a bandit.");
        assert_eq!(
            scene
                .mentions
                .iter()
                .filter(|m| m.race == "orc")
                .count(),
            2
        );
        let skeletons: Vec<_> = scene
            .mentions
            .iter()
            .filter(|m| m.race == "skeleton")
            .collect();
        assert_eq!(skeletons.len(), 4);
        assert_eq!(skeletons[0].class, "undead");
        let bandit = scene.mentions.iter().find(|m| m.race == "bandit").unwrap();
        assert_eq!(bandit.class, "rogue");
    }

    #[test]
    fn quantity_is_capped() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = ExtractorConfig::default().with_max_quantity(5);
        let scene = extract_mentions(
            "10000 rats pour out of the sewer.",
            &PartyRoster::new(),
            &config,
            &mut rng,
        );
        assert_eq!(scene.count_of(MentionKind::GenericEnemy), 5);
    }

    #[test]
    fn default_cap_is_fifty_mentions() {
        let fifty = extract("50 goblins swarm the walls.");
        assert_eq!(fifty.count_of(MentionKind::GenericEnemy), 50);
        let more = extract("51 goblins swarm the walls.");
        assert_eq!(more.count_of(MentionKind::GenericEnemy), 50);
    }

    #[test]
    fn wolves_become_wolf() {
        let scene = extract("Wolves howl in the distance.");
        assert_eq!(scene.mentions.len(), 1);
        assert_eq!(scene.mentions[0].race, "wolf");
        assert_eq!(scene.mentions[0].class, "beast");
    }

    #[test]
    fn guard_appears_as_enemy_and_occupation() {
        let scene = extract("A guard blocks the gate.");
        assert_eq!(scene.count_of(MentionKind::GenericEnemy), 1);
        assert_eq!(scene.count_of(MentionKind::OccupationNpc), 1);
    }

    #[test]
    fn repeated_occupation_captured_once() {
        let scene = extract("The innkeeper waves. Later the innkeeper frowns.");
        assert_eq!(scene.count_of(MentionKind::OccupationNpc), 1);
    }

    #[test]
    fn group_spawns_members_in_range() {
        let scene = extract("A pack of wolves circles the camp.");
        let members: Vec<_> = scene
            .mentions
            .iter()
            .filter(|m| m.kind == MentionKind::GroupMember)
            .collect();
        assert!((3..=5).contains(&members.len()));
        assert!(members.iter().all(|m| m.race == "wolf" && m.class == "beast"));
        // The plain noun is also a generic enemy.
        assert_eq!(scene.count_of(MentionKind::GenericEnemy), 1);
    }

    #[test]
    fn reversed_group_size_field_is_drawn_in_order() {
        let config = ExtractorConfig {
            group_size: 5..=2,
            ..Default::default()
        };
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let scene = extract_mentions(
                "A band of goblins blocks the road.",
                &PartyRoster::new(),
                &config,
                &mut rng,
            );
            assert!((2..=5).contains(&scene.count_of(MentionKind::GroupMember)));
        }
    }

    #[test]
    fn group_size_is_reproducible() {
        let a = extract("A band of bandits waits.");
        let b = extract("A band of bandits waits.");
        assert_eq!(a, b);
    }

    #[test]
    fn boss_named_by_full_phrase() {
        let scene = extract("An ancient dragon lands with a thunderous roar.");
        let boss = scene
            .mentions
            .iter()
            .find(|m| m.kind == MentionKind::Boss)
            .unwrap();
        assert_eq!(boss.resolved_name.as_deref(), Some("An ancient dragon"));
        assert_eq!(boss.race, "dragon");
        assert!(!boss.is_generic);
    }

    #[test]
    fn combat_start_with_hostiles() {
        let scene = extract("The dire wolf charges!");
        assert!(scene.combat_detected);
        let start = scene.combat_start().unwrap();
        assert!(start.enemies.iter().any(|m| m.kind == MentionKind::Boss));
    }

    #[test]
    fn combat_triggers_are_whole_words() {
        assert!(detect_combat("Roll initiative!"));
        assert!(detect_combat("A fight  breaks out in the tavern."));
        assert!(detect_combat("The crowd turns HOSTILE."));
        assert!(!detect_combat("She recasts the net."));
        assert!(!detect_combat("A quiet evening."));
        for trigger in COMBAT_TRIGGERS {
            assert!(detect_combat(trigger), "trigger {trigger}");
        }
    }

    #[test]
    fn mentions_follow_pass_order() {
        let scene = extract("Mira speaks to the merchant while a rat scurries.");
        let kinds: Vec<_> = scene.mentions.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MentionKind::Named,
                MentionKind::GenericEnemy,
                MentionKind::OccupationNpc
            ]
        );
    }

    proptest! {
        #[test]
        fn digit_quantity_yields_exact_count(q in 1u32..=50, idx in 0usize..RACE_CLASSES.len()) {
            let (race, class) = RACE_CLASSES[idx];
            let scene = extract(&format!("Suddenly {q} {race}s appear."));
            let enemies: Vec<_> = scene
                .mentions
                .iter()
                .filter(|m| m.kind == MentionKind::GenericEnemy)
                .collect();
            prop_assert_eq!(enemies.len() as u32, q);
            prop_assert!(enemies.iter().all(|m| m.race == race && m.class == class));
        }

        #[test]
        fn extraction_never_panics(text in ".{0,200}") {
            let _ = extract(&text);
        }
    }
}
