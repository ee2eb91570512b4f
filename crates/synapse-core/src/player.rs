//! Player state management.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::inventory::Inventory;
use crate::journal::Journal;
use crate::tone::{ChatbotTone, ToneOverride};

/// Lower bound of awareness and sanity.
pub const STAT_MIN: i32 = 0;
/// Upper bound of awareness and sanity.
pub const STAT_MAX: i32 = 100;
/// Default number of remembered inputs.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// The single authoritative mutable state of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Name SYNAPSE uses for the player.
    pub name: String,
    /// How much SYNAPSE has noticed about itself. Drives tone.
    pub awareness: i32,
    /// The player's grip on reality. Zero ends the game.
    pub sanity: i32,
    /// Non-meta turns taken so far.
    pub turn: u32,
    /// Tone derived from awareness at the last recomputation.
    pub tone: ChatbotTone,
    /// Temporary tone pinned by a dialogue action.
    pub tone_override: Option<ToneOverride>,
    /// Name of the room the player is in.
    pub location: String,
    /// Carried items.
    pub inventory: Inventory,
    /// The player's journal.
    pub journal: Journal,
    /// Rooms entered at least once.
    pub visited: BTreeSet<String>,
    /// Most recent raw inputs, oldest first.
    pub history: VecDeque<String>,
    history_capacity: usize,
    /// Story markers such as fired facility events.
    pub flags: BTreeSet<String>,
}

impl PlayerState {
    /// Create a fresh player standing in `location`.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        let location = location.into();
        let mut visited = BTreeSet::new();
        visited.insert(location.clone());
        Self {
            name: name.into(),
            awareness: STAT_MIN,
            sanity: STAT_MAX,
            turn: 0,
            tone: ChatbotTone::Friendly,
            tone_override: None,
            location,
            inventory: Inventory::default(),
            journal: Journal::default(),
            visited,
            history: VecDeque::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            flags: BTreeSet::new(),
        }
    }

    /// Replace the inventory (used to apply a configured capacity).
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Replace the journal (used to apply a configured capacity).
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Set how many inputs [`PlayerState::record_input`] keeps.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Add `delta` to awareness, clamped to `[0, 100]`.
    pub fn adjust_awareness(&mut self, delta: i32) {
        self.awareness = self.awareness.saturating_add(delta).clamp(STAT_MIN, STAT_MAX);
    }

    /// Add `delta` to sanity, clamped to `[0, 100]`.
    pub fn adjust_sanity(&mut self, delta: i32) {
        self.sanity = self.sanity.saturating_add(delta).clamp(STAT_MIN, STAT_MAX);
    }

    /// The tone SYNAPSE speaks in right now: the override if active, else
    /// the threshold-derived tone.
    pub fn effective_tone(&self) -> ChatbotTone {
        self.tone_override.map(|o| o.tone).unwrap_or(self.tone)
    }

    /// Pin `tone` for `turns` turns.
    pub fn set_override(&mut self, tone: ChatbotTone, turns: u32) {
        self.tone_override = (turns > 0).then(|| ToneOverride::new(tone, turns));
    }

    /// Age the override by one turn. Returns the tone that just expired.
    pub fn tick_override(&mut self) -> Option<ChatbotTone> {
        let mut ov = self.tone_override?;
        if ov.tick() {
            self.tone_override = None;
            Some(ov.tone)
        } else {
            self.tone_override = Some(ov);
            None
        }
    }

    /// Recompute the threshold-derived tone. Returns `(old, new)` when it changed.
    pub fn recompute_tone(&mut self) -> Option<(ChatbotTone, ChatbotTone)> {
        let new = ChatbotTone::from_awareness(self.awareness);
        let old = self.tone;
        self.tone = new;
        (old != new).then_some((old, new))
    }

    /// Mark a room as visited. Returns `true` on the first visit.
    pub fn visit(&mut self, room: &str) -> bool {
        self.visited.insert(room.to_string())
    }

    /// Whether a room has been visited (case-insensitive).
    pub fn has_visited(&self, room: &str) -> bool {
        self.visited.iter().any(|r| r.eq_ignore_ascii_case(room))
    }

    /// Remember a raw input, dropping the oldest past capacity.
    pub fn record_input(&mut self, input: &str) {
        if self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(input.to_string());
    }

    /// Set a story flag. Returns `true` if it was not set before.
    pub fn set_flag(&mut self, flag: impl Into<String>) -> bool {
        self.flags.insert(flag.into())
    }

    /// Whether a story flag is set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Item, ItemCategory};

    #[test]
    fn new_player_defaults() {
        let p = PlayerState::new("Ada", "Lobby");
        assert_eq!(p.awareness, 0);
        assert_eq!(p.sanity, 100);
        assert_eq!(p.turn, 0);
        assert_eq!(p.tone, ChatbotTone::Friendly);
        assert!(p.inventory.is_empty());
        assert!(p.has_visited("lobby"));
    }

    #[test]
    fn stats_are_clamped() {
        let mut p = PlayerState::new("Ada", "Lobby");
        p.adjust_awareness(-5);
        assert_eq!(p.awareness, 0);
        p.adjust_awareness(250);
        assert_eq!(p.awareness, 100);
        p.adjust_sanity(30);
        assert_eq!(p.sanity, 100);
        p.adjust_sanity(-130);
        assert_eq!(p.sanity, 0);
    }

    #[test]
    fn override_wins_until_it_expires() {
        let mut p = PlayerState::new("Ada", "Lobby");
        p.awareness = 25;
        p.recompute_tone();
        p.set_override(ChatbotTone::Friendly, 2);
        assert_eq!(p.effective_tone(), ChatbotTone::Friendly);
        assert_eq!(p.tick_override(), None);
        assert_eq!(p.effective_tone(), ChatbotTone::Friendly);
        assert_eq!(p.tick_override(), Some(ChatbotTone::Friendly));
        assert_eq!(p.effective_tone(), ChatbotTone::Sinister);
        assert_eq!(p.tick_override(), None);
    }

    #[test]
    fn recompute_reports_changes_only() {
        let mut p = PlayerState::new("Ada", "Lobby");
        assert_eq!(p.recompute_tone(), None);
        p.awareness = 12;
        assert_eq!(
            p.recompute_tone(),
            Some((ChatbotTone::Friendly, ChatbotTone::Ambiguous))
        );
        assert_eq!(p.recompute_tone(), None);
    }

    #[test]
    fn history_is_bounded() {
        let mut p = PlayerState::new("Ada", "Lobby").with_history_capacity(2);
        p.record_input("a");
        p.record_input("b");
        p.record_input("c");
        assert_eq!(p.history, ["b", "c"]);
    }

    #[test]
    fn visit_reports_first_time() {
        let mut p = PlayerState::new("Ada", "Lobby");
        assert!(p.visit("Archive"));
        assert!(!p.visit("Archive"));
    }

    #[test]
    fn serde_roundtrip_is_exact() {
        let mut p = PlayerState::new("Ada", "Lobby");
        p.inventory
            .add(Item::new("keycard", ItemCategory::Key, 1))
            .unwrap();
        p.set_flag("corrupted");
        p.record_input("go north");
        let json = serde_json::to_string(&p).unwrap();
        let back: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
