pub mod endings;
pub mod inspect;
pub mod play;
pub mod rooms;

/// Shorten `text` to `max` characters for a table cell.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
