//! Name resolution with fuzzy matching.

use strsim::jaro_winkler;

/// Minimum similarity score for fuzzy matching (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Resolve typed text to one of `candidates` using exact or fuzzy matching.
///
/// Returns the candidate as it appears in the list.
pub fn resolve_name<'a, I>(candidates: I, input: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidates: Vec<&str> = candidates.into_iter().collect();
    let input = input.trim();

    // Try exact match first (case-insensitive)
    if let Some(exact) = candidates
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(input))
    {
        return Some(exact);
    }

    fuzzy_match(candidates, input, FUZZY_THRESHOLD)
        .first()
        .map(|(name, _)| *name)
}

/// Find candidates matching the input with a similarity score above the threshold.
///
/// Returns a list of (name, score) sorted by score descending.
pub fn fuzzy_match<'a, I>(candidates: I, input: &str, threshold: f64) -> Vec<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut matches: Vec<(&str, f64)> = candidates
        .into_iter()
        .filter_map(|name| {
            let score = jaro_winkler(&input_lower, &name.to_lowercase());
            (score >= threshold).then_some((name, score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOMS: [&str; 3] = ["Lobby", "Server Closet", "Break Room"];

    #[test]
    fn resolve_exact_match() {
        assert_eq!(resolve_name(ROOMS, "server closet"), Some("Server Closet"));
        assert_eq!(resolve_name(ROOMS, "  LOBBY "), Some("Lobby"));
    }

    #[test]
    fn resolve_fuzzy_match() {
        assert_eq!(resolve_name(ROOMS, "server closit"), Some("Server Closet"));
        assert_eq!(resolve_name(ROOMS, "brake room"), Some("Break Room"));
    }

    #[test]
    fn resolve_no_match() {
        assert_eq!(resolve_name(ROOMS, "zzzzzzz"), None);
        assert_eq!(resolve_name([], "lobby"), None);
    }

    #[test]
    fn fuzzy_sorted_by_score() {
        let matches = fuzzy_match(["keycard", "keypad", "crowbar"], "keycad", 0.7);
        assert!(!matches.is_empty());
        assert_eq!(matches[0].0, "keycard");
        for pair in matches.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
