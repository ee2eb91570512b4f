//! Core types for SYNAPSE: the dialogue graph, the room graph, and the
//! player state shared between them.
//!
//! This crate is a pure data model. It performs no I/O and applies no side
//! effects on its own; the turn loop in `synapse-fiction` decides when
//! awareness and sanity change.

/// Dialogue tree stored as an arena of nodes, plus the navigation cursor.
pub mod dialogue;
/// Error types used throughout the crate.
pub mod error;
/// Carried items and the global takeable-item catalog.
pub mod inventory;
/// Bounded journal of timestamped notes.
pub mod journal;
/// Mutable player state: awareness, sanity, tone, collections.
pub mod player;
/// Rooms, exits, and access rules.
pub mod room;
/// `{name}`-style template rendering.
pub mod template;
/// Chatbot tone derived from awareness.
pub mod tone;

/// Re-export dialogue types.
pub use dialogue::{DialogueCursor, DialogueGraph, DialogueNode, Navigation, NodeId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export inventory types.
pub use inventory::{Inventory, Item, ItemCatalog, ItemCategory};
/// Re-export journal types.
pub use journal::{EntryKind, Journal, JournalEntry};
/// Re-export player state.
pub use player::PlayerState;
/// Re-export room types.
pub use room::{KEYCARD, Room, RoomDelta, RoomGraph};
/// Re-export template helpers.
pub use template::{PLAYER_TOKEN, render_template, substitute_player};
/// Re-export tone types.
pub use tone::{ChatbotTone, ToneOverride};
