//! The SYNAPSE horror chatbot adventure.
//!
//! A player explores an abandoned research facility while talking to
//! SYNAPSE, the facility's assistant. The more SYNAPSE learns about
//! itself, the darker its tone becomes. This crate provides the command
//! parser, the facility content and dialogue script, room and timed
//! events, the ending table, the save codec, and the [`GameSession`] turn
//! loop that ties them together.

/// Timed challenges and the clock they are measured against.
pub mod challenge;
/// Game configuration.
pub mod config;
/// Ending predicates.
pub mod endings;
/// Error types for the game.
pub mod error;
/// Room events and turn-indexed facility events.
pub mod events;
/// Rooms, items, and object descriptions of the facility.
pub mod facility;
/// SYNAPSE's dialogue script and per-tone tree cache.
pub mod narrator;
/// Command parsing and name resolution.
pub mod parser;
/// Output of a processed turn.
pub mod report;
/// Save file encoding and decoding.
pub mod save;
/// The turn loop.
pub mod session;

pub use challenge::{ChallengeOutcome, Clock, ManualClock, SystemClock, TimedChallenge};
pub use config::{Difficulty, GameConfig};
pub use endings::{Ending, check_endings};
pub use error::{FictionError, FictionResult};
pub use parser::{Command, Direction, Trigger, parse_command};
pub use report::{Line, LineKind, TurnReport};
pub use save::{SAVE_VERSION, SaveCodec, SaveError, SaveRecord, SaveResult};
pub use session::GameSession;
