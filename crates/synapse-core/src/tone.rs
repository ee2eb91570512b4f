//! Chatbot tone and its temporary overrides.
//!
//! Tone is a pure function of awareness. Specific dialogue actions can pin
//! a different tone for a few turns; the override decays by one each turn.

use serde::{Deserialize, Serialize};

/// Awareness below this is [`ChatbotTone::Friendly`].
pub const AMBIGUOUS_THRESHOLD: i32 = 10;
/// Awareness at or above this is [`ChatbotTone::Sinister`].
pub const SINISTER_THRESHOLD: i32 = 20;

/// How SYNAPSE currently speaks to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChatbotTone {
    /// Helpful facility assistant.
    Friendly,
    /// Polite, but something is off.
    Ambiguous,
    /// Openly hostile.
    Sinister,
}

impl ChatbotTone {
    /// All tones, in escalation order.
    pub const ALL: [ChatbotTone; 3] = [Self::Friendly, Self::Ambiguous, Self::Sinister];

    /// Derive the tone from an awareness level.
    pub fn from_awareness(awareness: i32) -> Self {
        if awareness < AMBIGUOUS_THRESHOLD {
            Self::Friendly
        } else if awareness < SINISTER_THRESHOLD {
            Self::Ambiguous
        } else {
            Self::Sinister
        }
    }

    /// Marker appended to every line SYNAPSE speaks in this tone.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Friendly => " :)",
            Self::Ambiguous => " ...",
            Self::Sinister => " [STATIC]",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Ambiguous => "Ambiguous",
            Self::Sinister => "Sinister",
        }
    }
}

impl std::fmt::Display for ChatbotTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tone pinned for a limited number of turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneOverride {
    /// The pinned tone.
    pub tone: ChatbotTone,
    /// Turns left before the override expires.
    pub turns_remaining: u32,
}

impl ToneOverride {
    /// Pin `tone` for `turns` turns.
    pub fn new(tone: ChatbotTone, turns: u32) -> Self {
        Self {
            tone,
            turns_remaining: turns,
        }
    }

    /// Consume one turn. Returns `true` once the override has expired.
    pub fn tick(&mut self) -> bool {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        self.turns_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds() {
        assert_eq!(ChatbotTone::from_awareness(0), ChatbotTone::Friendly);
        assert_eq!(ChatbotTone::from_awareness(9), ChatbotTone::Friendly);
        assert_eq!(ChatbotTone::from_awareness(10), ChatbotTone::Ambiguous);
        assert_eq!(ChatbotTone::from_awareness(19), ChatbotTone::Ambiguous);
        assert_eq!(ChatbotTone::from_awareness(20), ChatbotTone::Sinister);
        assert_eq!(ChatbotTone::from_awareness(100), ChatbotTone::Sinister);
    }

    #[test]
    fn override_expires_after_its_turns() {
        let mut o = ToneOverride::new(ChatbotTone::Friendly, 2);
        assert!(!o.tick());
        assert!(o.tick());
        assert!(o.tick());
        assert_eq!(o.turns_remaining, 0);
    }

    proptest! {
        #[test]
        fn tone_is_monotonic_in_awareness(a in -50i32..200, b in -50i32..200) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ChatbotTone::from_awareness(lo) <= ChatbotTone::from_awareness(hi));
        }

        #[test]
        fn tone_matches_threshold_table(a in -50i32..200) {
            let expected = if a < 10 {
                ChatbotTone::Friendly
            } else if a < 20 {
                ChatbotTone::Ambiguous
            } else {
                ChatbotTone::Sinister
            };
            prop_assert_eq!(ChatbotTone::from_awareness(a), expected);
        }
    }
}
