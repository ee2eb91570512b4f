//! SYNAPSE's dialogue: the per-tone script and the tree cache.

mod cache;
mod script;

pub use cache::{DialogueCache, DialogueSnapshot};
pub use script::{Beat, Script, build_dialogue, build_from_script, build_or_stub, script_for};
