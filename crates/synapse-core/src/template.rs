//! Minimal `{name}` template rendering for dialogue text.

use crate::error::{CoreError, CoreResult};

/// Token replaced by the player's name.
pub const PLAYER_TOKEN: &str = "{player}";

/// Render `template`, replacing each `{key}` with its value from `vars`.
///
/// `{{` and `}}` produce literal braces. An unclosed brace, a stray `}` or a
/// key missing from `vars` is an error.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> CoreResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let rest = &template[i + 1..];
                let end = rest
                    .find('}')
                    .ok_or_else(|| CoreError::Template(format!("unclosed '{{' in \"{template}\"")))?;
                let key = &rest[..end];
                if key.contains('{') {
                    return Err(CoreError::Template(format!(
                        "nested '{{' in \"{template}\""
                    )));
                }
                let value = vars
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| CoreError::Template(format!("unknown variable \"{key}\"")))?;
                out.push_str(value);
                // Skip the key and the closing brace.
                for _ in 0..key.chars().count() + 1 {
                    chars.next();
                }
            }
            '}' => {
                return Err(CoreError::Template(format!(
                    "stray '}}' in \"{template}\""
                )));
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Replace the player token without validating anything else.
pub fn substitute_player(text: &str, player_name: &str) -> String {
    text.replace(PLAYER_TOKEN, player_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_variables() {
        let out = render_template("Hello, {player}. I am {bot}.", &[
            ("player", "Ada"),
            ("bot", "SYNAPSE"),
        ])
        .unwrap();
        assert_eq!(out, "Hello, Ada. I am SYNAPSE.");
    }

    #[test]
    fn escaped_braces() {
        let out = render_template("{{literal}}", &[]).unwrap();
        assert_eq!(out, "{literal}");
    }

    #[test]
    fn unclosed_brace_is_error() {
        let err = render_template("Hello, {player", &[("player", "Ada")]).unwrap_err();
        assert!(matches!(err, CoreError::Template(_)));
    }

    #[test]
    fn unknown_variable_is_error() {
        assert!(render_template("{nobody}", &[("player", "Ada")]).is_err());
    }

    #[test]
    fn stray_closing_brace_is_error() {
        assert!(render_template("oops}", &[]).is_err());
    }

    #[test]
    fn multibyte_text_survives() {
        let out = render_template("Grüße, {player}…", &[("player", "Zoë")]).unwrap();
        assert_eq!(out, "Grüße, Zoë…");
    }

    #[test]
    fn substitute_player_is_lenient() {
        assert_eq!(substitute_player("hi {player} {x", "Ada"), "hi Ada {x");
    }
}
