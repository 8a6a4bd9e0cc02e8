pub mod extract;
pub mod replay;

use colored::Colorize;

/// Render a yes/no flag the way every listing shows it.
fn flag(value: bool) -> String {
    if value {
        "yes".red().bold().to_string()
    } else {
        "no".dimmed().to_string()
    }
}

/// Serialize a value as pretty JSON and print it.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| format!("JSON error: {e}"))?;
    println!("{json}");
    Ok(())
}
