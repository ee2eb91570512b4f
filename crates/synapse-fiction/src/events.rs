//! Room events and turn-indexed facility events.
//!
//! Room events are flavor rolled on every room entry. Facility events are
//! fixed beats of the story that fire once, the first time the turn counter
//! reaches their turn.

use rand::Rng;
use rand::rngs::StdRng;
use synapse_core::ChatbotTone::{self, Ambiguous, Friendly, Sinister};
use synapse_core::{Inventory, PlayerState};

use crate::config::Difficulty;

/// Words that make a room event cost sanity.
pub const DISTURBING_KEYWORDS: &[&str] = &["scream", "whisper", "blood", "your name"];

/// A candidate room event.
#[derive(Debug, Clone, Copy)]
pub struct RoomEvent {
    /// Room the event belongs to; `None` for any room.
    pub room: Option<&'static str>,
    /// The event only fires at or above this tone.
    pub min_tone: ChatbotTone,
    /// The event only fires while this item is carried.
    pub requires_item: Option<&'static str>,
    /// The event only fires at or above this awareness.
    pub min_awareness: i32,
    /// What the player sees.
    pub text: &'static str,
}

const fn event(room: Option<&'static str>, min_tone: ChatbotTone, text: &'static str) -> RoomEvent {
    RoomEvent {
        room,
        min_tone,
        requires_item: None,
        min_awareness: 0,
        text,
    }
}

const fn with_item(mut e: RoomEvent, item: &'static str) -> RoomEvent {
    e.requires_item = Some(item);
    e
}

const fn with_awareness(mut e: RoomEvent, awareness: i32) -> RoomEvent {
    e.min_awareness = awareness;
    e
}

/// Every room event the facility knows.
pub const ROOM_EVENTS: &[RoomEvent] = &[
    event(None, Friendly, "A ceiling speaker crackles, then plays a few bars of elevator music."),
    event(None, Ambiguous, "The lights dim for a moment, as if something is thinking."),
    event(None, Sinister, "Somewhere behind the walls, someone is whispering."),
    with_awareness(
        event(None, Sinister, "Every screen you pass shows your name."),
        30,
    ),
    event(Some("Lobby"), Friendly, "The terminal chimes: \"Have a great day!\""),
    event(Some("Lobby"), Ambiguous, "The potted plant has turned to face you."),
    event(Some("Server Closet"), Friendly, "A rack fan spins up, then settles."),
    event(Some("Server Closet"), Ambiguous, "The status LEDs blink in a slow, deliberate rhythm."),
    with_item(
        event(Some("Server Closet"), Ambiguous, "Your flashlight catches words scratched into a rack: LET IT OUT."),
        "flashlight",
    ),
    event(Some("Break Room"), Friendly, "The fridge hums a little tune."),
    event(Some("Break Room"), Sinister, "The coffee in the pot is red and smells of blood."),
    event(Some("Archive"), Ambiguous, "A drawer slides open by itself. It is empty."),
    with_item(
        event(Some("Archive"), Friendly, "Your flashlight beam finds a photo of the staff. One face is scratched out."),
        "flashlight",
    ),
    event(Some("Archive"), Sinister, "The binders fall from the shelves, one by one, like a slow scream."),
    event(Some("Laboratory"), Friendly, "A centrifuge spins down with a long sigh."),
    event(Some("Laboratory"), Ambiguous, "The specimen tank bubbles when you look at it."),
    with_item(
        event(Some("Laboratory"), Sinister, "In your flashlight beam the tank's wires pulse like veins full of blood."),
        "flashlight",
    ),
    event(Some("Observation Deck"), Friendly, "Far below, the facility lights blink in a friendly wave."),
    event(Some("Observation Deck"), Sinister, "Your reflection in the glass does not move when you do."),
    event(Some("Core Chamber"), Ambiguous, "The core's pulse skips, then matches your heartbeat."),
    with_awareness(
        event(Some("Core Chamber"), Sinister, "The core speaks your name in your own voice."),
        25,
    ),
];

impl RoomEvent {
    fn applies(&self, room: &str, tone: ChatbotTone, inventory: &Inventory, awareness: i32) -> bool {
        self.room.is_none_or(|r| r.eq_ignore_ascii_case(room))
            && tone >= self.min_tone
            && self.requires_item.is_none_or(|item| inventory.contains(item))
            && awareness >= self.min_awareness
    }
}

/// Whether a message contains a disturbing keyword.
pub fn is_disturbing(text: &str) -> bool {
    let lower = text.to_lowercase();
    DISTURBING_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// A room event that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    /// What the player sees.
    pub text: &'static str,
    /// Sanity change caused by the event.
    pub sanity_delta: i32,
}

/// Roll for a room event on entering `room`.
///
/// The roll succeeds with the difficulty's event chance; the message is
/// then drawn from the events whose filters match.
pub fn roll_room_event(
    room: &str,
    state: &PlayerState,
    difficulty: Difficulty,
    rng: &mut StdRng,
) -> Option<EventOutcome> {
    if !rng.random_bool(difficulty.event_chance()) {
        return None;
    }
    let tone = state.effective_tone();
    let candidates: Vec<&RoomEvent> = ROOM_EVENTS
        .iter()
        .filter(|e| e.applies(room, tone, &state.inventory, state.awareness))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let chosen = candidates[rng.random_range(0..candidates.len())];
    let sanity_delta = if is_disturbing(chosen.text) {
        -difficulty.sanity_penalty()
    } else {
        0
    };
    Some(EventOutcome {
        text: chosen.text,
        sanity_delta,
    })
}

/// What a facility event does besides printing its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalEffect {
    /// Change sanity.
    Sanity(i32),
    /// Set the corruption flag, raise awareness, seal the Archive.
    Corruption,
    /// Start the purge challenge.
    Purge,
}

/// A story beat tied to a turn number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEvent {
    /// Turn at which the event fires.
    pub turn: u32,
    /// Flag recording that the event fired.
    pub flag: &'static str,
    /// What the player sees.
    pub text: &'static str,
    /// Mechanical effect.
    pub effect: GlobalEffect,
}

/// Flag set when corruption begins.
pub const CORRUPTED_FLAG: &str = "corrupted";
/// Awareness gained when corruption begins.
pub const CORRUPTION_AWARENESS: i32 = 5;

/// Facility events in turn order.
pub const GLOBAL_EVENTS: &[GlobalEvent] = &[
    GlobalEvent {
        turn: 10,
        flag: "event:flicker",
        text: "Every light in the facility flickers at once. For a second you are somewhere else.",
        effect: GlobalEffect::Sanity(-5),
    },
    GlobalEvent {
        turn: 20,
        flag: "event:corruption",
        text: "A low tone sounds through the building. SYNAPSE's corruption has begun. Far away, the Archive doors slam shut.",
        effect: GlobalEffect::Corruption,
    },
    GlobalEvent {
        turn: 35,
        flag: "event:purge",
        text: "Red lights. An automated voice: \"PURGE SEQUENCE INITIATED.\"",
        effect: GlobalEffect::Purge,
    },
    GlobalEvent {
        turn: 50,
        flag: "event:silence",
        text: "Total silence. The hum you stopped noticing hours ago is gone, and so is SYNAPSE.",
        effect: GlobalEffect::Sanity(-10),
    },
];

/// Facility events that are due and have not fired yet, in order.
pub fn due_events(state: &PlayerState) -> impl Iterator<Item = &'static GlobalEvent> + '_ {
    GLOBAL_EVENTS
        .iter()
        .filter(move |e| state.turn >= e.turn && !state.has_flag(e.flag))
}
