//! Fixed lexical tables for scene extraction.
//!
//! Every keyword the extractor reacts to lives here as a `const` table so
//! each entry can be tested on its own.

/// Action verbs (surface forms) that mark the preceding proper noun as a
/// named character.
pub const ACTION_VERBS: &[&str] = &[
    "draws",
    "draw",
    "attacks",
    "attack",
    "approaches",
    "approach",
    "speaks",
    "speak",
    "says",
    "say",
    "shouts",
    "shout",
    "casts",
    "cast",
    "fires",
    "fire",
    "swings",
    "swing",
    "charges",
    "charge",
    "blocks",
    "block",
    "dodges",
    "dodge",
    "parries",
    "parry",
    "stands",
    "stand",
    "sits",
    "sit",
    "walks",
    "walk",
    "runs",
    "run",
];

/// Creature nouns and the combat class each implies.
pub const RACE_CLASSES: &[(&str, &str)] = &[
    ("goblin", "warrior"),
    ("orc", "warrior"),
    ("bandit", "rogue"),
    ("skeleton", "undead"),
    ("zombie", "undead"),
    ("wolf", "beast"),
    ("spider", "beast"),
    ("rat", "beast"),
    ("guard", "fighter"),
    ("soldier", "fighter"),
    ("warrior", "fighter"),
    ("scout", "ranger"),
    ("archer", "ranger"),
];

/// Class for races missing from [`RACE_CLASSES`].
pub const DEFAULT_CLASS: &str = "warrior";

/// Quantity words and their values.
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("a", 1),
    ("an", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Occupations that identify a non-hostile NPC.
pub const OCCUPATIONS: &[&str] = &[
    "shopkeeper",
    "merchant",
    "blacksmith",
    "innkeeper",
    "guard",
    "captain",
    "villager",
    "farmer",
    "noble",
    "priest",
    "wizard",
    "traveler",
    "stranger",
    "bartender",
    "maid",
    "servant",
    "scholar",
    "sage",
];

/// Collective nouns in "{group} of {noun}".
pub const GROUP_WORDS: &[&str] = &["group", "band", "pack", "horde", "squad", "team", "party"];

/// Adjectives that turn a creature into a unique boss.
pub const INTENSIFIERS: &[&str] = &[
    "ancient", "elder", "dire", "giant", "mighty", "fearsome", "terrible",
];

/// Phrases that signal combat is starting.
pub const COMBAT_TRIGGERS: &[&str] = &[
    "attacks",
    "charges",
    "fires",
    "casts",
    "swings",
    "initiative",
    "combat begins",
    "battle starts",
    "fight breaks out",
    "draws weapon",
    "hostile",
    "aggressive",
];

/// Plurals that do not follow the suffix rules.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("wolves", "wolf"),
    ("elves", "elf"),
    ("dwarves", "dwarf"),
    ("thieves", "thief"),
    ("men", "man"),
    ("mice", "mouse"),
];

/// Class for a race, defaulting to [`DEFAULT_CLASS`].
pub fn class_for_race(race: &str) -> &'static str {
    let race = race.to_lowercase();
    RACE_CLASSES
        .iter()
        .find(|(r, _)| *r == race)
        .map(|(_, class)| *class)
        .unwrap_or(DEFAULT_CLASS)
}

/// Parse a quantity word or numeral. Missing, unrecognized and zero
/// quantities count as 1.
pub fn parse_quantity(word: Option<&str>) -> u32 {
    let Some(word) = word else {
        return 1;
    };
    let word = word.trim().to_lowercase();
    if let Some((_, n)) = NUMBER_WORDS.iter().find(|(w, _)| *w == word) {
        return *n;
    }
    if word.chars().all(|c| c.is_ascii_digit()) && !word.is_empty() {
        // Overlong numerals saturate; the caller caps them anyway.
        return word.parse::<u32>().unwrap_or(u32::MAX).max(1);
    }
    1
}

/// Lowercased singular form of a noun.
pub fn singularize(noun: &str) -> String {
    let noun = noun.to_lowercase();
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(p, _)| *p == noun) {
        return (*singular).to_string();
    }
    if let Some(stem) = noun.strip_suffix("ies").filter(|s| !s.is_empty()) {
        return format!("{stem}y");
    }
    if noun.ends_with("ss") {
        return noun;
    }
    match noun.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => noun,
    }
}

/// Join table entries into a regex alternation. Spaces inside an entry match
/// any run of whitespace.
pub(crate) fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}
