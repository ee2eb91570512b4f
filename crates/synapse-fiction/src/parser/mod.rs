//! Command parsing and name resolution.

mod command;
mod resolver;

pub use command::{Command, Direction, Trigger, parse_command};
pub use resolver::{fuzzy_match, resolve_name};
