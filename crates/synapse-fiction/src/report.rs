//! Output of a processed turn.

use crate::endings::Ending;

/// How a line of output should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Room descriptions and action results.
    Narration,
    /// Something SYNAPSE says.
    Synapse,
    /// A room or facility event.
    Event,
    /// A rejected action or recoverable error.
    Warning,
    /// Saves, help, stats and other out-of-world output.
    System,
    /// Ending narrative.
    Ending,
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Presentation hint.
    pub kind: LineKind,
    /// The text.
    pub text: String,
}

/// Everything a single input produced.
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// Output lines in order.
    pub lines: Vec<Line>,
    /// The ending that fired this turn, if any.
    pub ending: Option<&'static Ending>,
    /// The player asked to quit.
    pub quit: bool,
    /// Whether this input advanced the turn counter.
    pub turn_taken: bool,
}

impl TurnReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(Line {
            kind,
            text: text.into(),
        });
    }

    /// Append a narration line.
    pub fn narrate(&mut self, text: impl Into<String>) {
        self.push(LineKind::Narration, text);
    }

    /// Append a warning line.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(LineKind::Warning, text);
    }

    /// Append a system line.
    pub fn system(&mut self, text: impl Into<String>) {
        self.push(LineKind::System, text);
    }

    /// All lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any line contains `needle` (case-insensitive).
    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.lines
            .iter()
            .any(|l| l.text.to_lowercase().contains(&needle))
    }

    /// Whether the game ended this turn.
    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }
}
