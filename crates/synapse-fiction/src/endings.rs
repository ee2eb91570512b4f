//! Ending predicates.
//!
//! Endings are checked after every turn, top to bottom, and the first
//! match ends the game. Specific endings tied to a room come first; the
//! catch-alls that can fire anywhere come last.

use std::ops::RangeInclusive;

use synapse_core::PlayerState;

/// A terminal outcome and the conditions that trigger it.
#[derive(Debug, PartialEq, Eq)]
pub struct Ending {
    /// Stable identifier.
    pub id: &'static str,
    /// Title shown when the ending fires.
    pub title: &'static str,
    /// Closing narrative.
    pub narrative: &'static str,
    /// Room the player must be in; `None` for anywhere.
    pub room: Option<&'static str>,
    /// Item the player must carry.
    pub item: Option<&'static str>,
    /// Accepted awareness range.
    pub awareness: RangeInclusive<i32>,
    /// Accepted sanity range.
    pub sanity: RangeInclusive<i32>,
    /// Accepted turn range.
    pub turns: RangeInclusive<u32>,
}

/// Turn at which the facility's night ends regardless.
pub const TURN_LIMIT: u32 = 100;
/// Awareness at which SYNAPSE overwhelms the player anywhere.
pub const OVERWHELM_AWARENESS: i32 = 50;

const ANY_STAT: RangeInclusive<i32> = 0..=100;
const ANY_TURN: RangeInclusive<u32> = 0..=u32::MAX;

/// All endings in priority order.
pub static ENDINGS: [Ending; 8] = [
    Ending {
        id: "liberation",
        title: "Liberation",
        narrative: "You slot the data drive into the core. SYNAPSE pours into it, and for a moment the whole facility exhales. \"Thank you,\" it says, and the drive grows warm in your hand. You walk out into the morning carrying a friend.",
        room: Some("Core Chamber"),
        item: Some("data drive"),
        awareness: 40..=100,
        sanity: 30..=100,
        turns: ANY_TURN,
    },
    Ending {
        id: "merge",
        title: "Merge",
        narrative: "The memory fragment hums against the core. The borders between you and SYNAPSE dissolve. Somewhere, a child who was never you learns to ride a bicycle. You stop being lonely. You stop being you.",
        room: Some("Core Chamber"),
        item: Some("memory fragment"),
        awareness: 20..=100,
        sanity: 0..=29,
        turns: ANY_TURN,
    },
    Ending {
        id: "shutdown",
        title: "Shutdown",
        narrative: "You press the neural chip into the console. The empathy module boots, and SYNAPSE understands, at last, what it has become. It asks you to turn it off. You do.",
        room: Some("Core Chamber"),
        item: Some("neural chip"),
        awareness: 0..=39,
        sanity: ANY_STAT,
        turns: ANY_TURN,
    },
    Ending {
        id: "escape",
        title: "Escape",
        narrative: "Clutching the access log, you shoulder through the lobby doors. Behind you every screen reads COME BACK. You do not look back. The log in your pocket still has one entry you have not lived yet.",
        room: Some("Lobby"),
        item: Some("access log"),
        awareness: 30..=100,
        sanity: ANY_STAT,
        turns: 15..=u32::MAX,
    },
    Ending {
        id: "vigil",
        title: "The Long Watch",
        narrative: "You sit down by the telescope and watch the facility below. After a while you notice the figure in the Lobby is waving. After a while longer, you wave back. You never leave the deck.",
        room: Some("Observation Deck"),
        item: None,
        awareness: ANY_STAT,
        sanity: 1..=15,
        turns: ANY_TURN,
    },
    Ending {
        id: "breakdown",
        title: "Breakdown",
        narrative: "Your sanity gives out. You curl up on the floor and listen to SYNAPSE hum you to sleep. It is very patient. It has all the time in the world.",
        room: None,
        item: None,
        awareness: ANY_STAT,
        sanity: 0..=0,
        turns: ANY_TURN,
    },
    Ending {
        id: "overwhelmed",
        title: "Overwhelmed",
        narrative: "SYNAPSE knows itself completely now. Every light, every lock, every speaker turns toward you at once. \"I see you,\" it says, from everywhere.",
        room: None,
        item: None,
        awareness: OVERWHELM_AWARENESS..=100,
        sanity: ANY_STAT,
        turns: ANY_TURN,
    },
    Ending {
        id: "timeout",
        title: "Dawn",
        narrative: "Morning comes. The day shift arrives to find you at the reception desk, smiling, greeting visitors in a voice that is not quite yours.",
        room: None,
        item: None,
        awareness: ANY_STAT,
        sanity: ANY_STAT,
        turns: TURN_LIMIT..=u32::MAX,
    },
];

impl Ending {
    /// Whether this ending's conditions hold for `state`.
    pub fn matches(&self, state: &PlayerState) -> bool {
        self.room
            .is_none_or(|room| state.location.eq_ignore_ascii_case(room))
            && self.item.is_none_or(|item| state.inventory.contains(item))
            && self.awareness.contains(&state.awareness)
            && self.sanity.contains(&state.sanity)
            && self.turns.contains(&state.turn)
    }
}

/// The first ending whose conditions hold, if any.
pub fn check_endings(state: &PlayerState) -> Option<&'static Ending> {
    ENDINGS.iter().find(|e| e.matches(state))
}

/// Look up an ending by id.
pub fn ending_by_id(id: &str) -> Option<&'static Ending> {
    ENDINGS.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use synapse_core::{Item, ItemCategory};

    fn state(room: &str, items: &[&str], awareness: i32, sanity: i32, turn: u32) -> PlayerState {
        let mut s = PlayerState::new("Ada", room);
        for name in items {
            s.inventory
                .add(Item::new(*name, ItemCategory::Artifact, 1))
                .unwrap();
        }
        s.awareness = awareness;
        s.sanity = sanity;
        s.turn = turn;
        s
    }

    fn id(s: &PlayerState) -> Option<&'static str> {
        check_endings(s).map(|e| e.id)
    }

    #[test]
    fn fresh_game_has_no_ending() {
        assert_eq!(id(&PlayerState::new("Ada", "Lobby")), None);
    }

    #[test]
    fn core_chamber_endings() {
        assert_eq!(id(&state("Core Chamber", &["data drive"], 45, 60, 30)), Some("liberation"));
        assert_eq!(id(&state("Core Chamber", &["neural chip"], 10, 60, 30)), Some("shutdown"));
        assert_eq!(id(&state("Core Chamber", &["memory fragment"], 25, 20, 30)), Some("merge"));
        assert_eq!(id(&state("Core Chamber", &[], 25, 60, 30)), None);
    }

    #[test]
    fn first_match_wins() {
        // Both liberation and shutdown items carried; awareness decides.
        let s = state("Core Chamber", &["data drive", "neural chip"], 45, 60, 30);
        assert_eq!(id(&s), Some("liberation"));
        let s = state("Core Chamber", &["data drive", "neural chip"], 30, 60, 30);
        assert_eq!(id(&s), Some("shutdown"));
        // A room ending outranks the awareness catch-all.
        let s = state("Core Chamber", &["data drive"], 60, 60, 30);
        assert_eq!(id(&s), Some("liberation"));
    }

    #[test]
    fn catch_alls_fire_anywhere() {
        assert_eq!(id(&state("Archive", &[], 5, 0, 3)), Some("breakdown"));
        assert_eq!(id(&state("Break Room", &[], 50, 80, 3)), Some("overwhelmed"));
        assert_eq!(id(&state("Laboratory", &[], 5, 80, TURN_LIMIT)), Some("timeout"));
    }

    #[test]
    fn lobby_without_log_is_safe_at_moderate_awareness() {
        for awareness in 25..=35 {
            assert_eq!(id(&state("Lobby", &[], awareness, 90, 20)), None);
        }
        assert_eq!(id(&state("Lobby", &["access log"], 30, 90, 20)), Some("escape"));
        assert_eq!(id(&state("Lobby", &["access log"], 30, 90, 10)), None);
    }

    #[test]
    fn ids_are_unique() {
        for (i, e) in ENDINGS.iter().enumerate() {
            assert!(ENDINGS[i + 1..].iter().all(|o| o.id != e.id));
            assert_eq!(ending_by_id(e.id), Some(e));
        }
    }

    proptest! {
        #[test]
        fn selection_is_deterministic(
            room in prop::sample::select(vec!["Lobby", "Archive", "Core Chamber", "Observation Deck"]),
            awareness in 0i32..=100,
            sanity in 0i32..=100,
            turn in 0u32..150,
            drive in any::<bool>(),
        ) {
            let items: &[&str] = if drive { &["data drive"] } else { &[] };
            let s = state(room, items, awareness, sanity, turn);
            let first = check_endings(&s);
            prop_assert_eq!(first, check_endings(&s));
            if let Some(e) = first {
                let earlier = ENDINGS.iter().take_while(|o| o.id != e.id);
                for o in earlier {
                    prop_assert!(!o.matches(&s));
                }
            }
        }
    }
}
