use std::sync::LazyLock;

use regex::Regex;
use tw_scene::capitalize;

static GENERIC_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:goblin|orc|bandit|guard|soldier|warrior|scout|archer)\s*\d*$",
        r"(?i)^(?:skeleton|zombie|ghoul|wight)\s*\d*$",
        r"(?i)^(?:wolf|bear|spider|rat)\s*\d*$",
        r"^\w+\s+\d+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Whether a name looks like a label for an interchangeable creature
/// ("Skeleton", "Goblin 2", "Thug 3"). Blank names count as generic.
pub fn is_generic_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || GENERIC_NAME_PATTERNS.iter().any(|re| re.is_match(name))
}

/// Base for a generated display name: the occupation, else
/// "{race} {class}", else the race, else "Enemy". Every branch is
/// capitalized, so "goblin warrior" and "Goblin warrior" count as one base.
pub fn base_name(occupation: &str, race: &str, class: &str) -> String {
    let occupation = occupation.trim();
    let race = race.trim();
    let class = class.trim();
    if !occupation.is_empty() {
        capitalize(occupation)
    } else if !class.is_empty() {
        capitalize(format!("{race} {class}").trim())
    } else if !race.is_empty() {
        capitalize(race)
    } else {
        "Enemy".to_string()
    }
}

/// The `n`th generated name for `base`. The first keeps the bare base.
pub(crate) fn numbered(base: &str, n: u32) -> String {
    if n > 1 {
        format!("{base} {n}")
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_names() {
        for name in [
            "Goblin", "goblin 2", "Skeleton", "WIGHT 12", "Rat", "Thug 3", "", "  ",
        ] {
            assert!(is_generic_name(name), "{name:?} should be generic");
        }
        for name in ["Grix", "Sir Aldrich", "Goblin King", "Bear Grylls"] {
            assert!(!is_generic_name(name), "{name:?} should be named");
        }
    }

    #[test]
    fn base_name_precedence() {
        assert_eq!(base_name("shopkeeper", "human", "rogue"), "Shopkeeper");
        assert_eq!(base_name("", "goblin", "warrior"), "Goblin warrior");
        assert_eq!(base_name("", "", "warrior"), "Warrior");
        assert_eq!(base_name("", "skeleton", ""), "Skeleton");
        assert_eq!(base_name("", "", ""), "Enemy");
    }

    #[test]
    fn race_case_shares_counter() {
        assert_eq!(
            base_name("", "goblin", "warrior"),
            base_name("", "Goblin", "warrior")
        );
        assert_eq!(numbered(&base_name("", "goblin", "warrior"), 2), "Goblin warrior 2");
    }

    #[test]
    fn numbering_starts_at_two() {
        assert_eq!(numbered("Goblin", 1), "Goblin");
        assert_eq!(numbered("Goblin", 2), "Goblin 2");
        assert_eq!(numbered("Goblin", 10), "Goblin 10");
    }
}
