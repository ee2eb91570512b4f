//! Save file encoding and decoding.
//!
//! A save is a single JSON document tagged with a version string. The
//! codec checks the tag before anything else and rejects the whole file on
//! any mismatch or parse error, so a bad save never half-applies.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use synapse_core::{PlayerState, RoomDelta};
use thiserror::Error;

use crate::narrator::DialogueSnapshot;

/// Version tag written by this build.
pub const SAVE_VERSION: &str = "1.2";

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Errors raised while saving or loading.
#[derive(Debug, Error)]
pub enum SaveError {
    /// There is no save file at the path.
    #[error("No saved game found at {}", .0.display())]
    NoSave(PathBuf),

    /// The file was written by a different version.
    #[error("save file version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// The version this codec reads.
        expected: String,
        /// The version in the file.
        found: String,
    },

    /// The file is not a valid save.
    #[error("save file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error("save file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to resume a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Codec version that wrote the record.
    pub version: String,
    /// When the record was written.
    pub saved_at: DateTime<Utc>,
    /// Player state, including the current room.
    pub player: PlayerState,
    /// Dialogue position as stable choice paths.
    pub dialogue: DialogueSnapshot,
    /// Rooms that changed since the facility was built.
    pub rooms: Vec<RoomDelta>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: String,
}

/// Reads and writes [`SaveRecord`]s for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCodec {
    version: String,
}

impl Default for SaveCodec {
    fn default() -> Self {
        Self::new(SAVE_VERSION)
    }
}

impl SaveCodec {
    /// A codec that writes and accepts `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// The version this codec writes and accepts.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build a record stamped with this codec's version and the current time.
    pub fn record(
        &self,
        player: PlayerState,
        dialogue: DialogueSnapshot,
        rooms: Vec<RoomDelta>,
    ) -> SaveRecord {
        SaveRecord {
            version: self.version.clone(),
            saved_at: Utc::now(),
            player,
            dialogue,
            rooms,
        }
    }

    /// Serialize a record. The codec's version replaces the record's.
    pub fn encode(&self, record: &SaveRecord) -> SaveResult<String> {
        let mut record = record.clone();
        record.version = self.version.clone();
        Ok(serde_json::to_string_pretty(&record)?)
    }

    /// Parse a record, rejecting other versions before parsing the rest.
    pub fn decode(&self, text: &str) -> SaveResult<SaveRecord> {
        let header: VersionHeader = serde_json::from_str(text)?;
        if header.version != self.version {
            return Err(SaveError::VersionMismatch {
                expected: self.version.clone(),
                found: header.version,
            });
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Write a record to `path`.
    pub fn write(&self, path: &Path, record: &SaveRecord) -> SaveResult<()> {
        let text = self.encode(record)?;
        std::fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Read a record from `path`.
    pub fn read(&self, path: &Path) -> SaveResult<SaveRecord> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SaveError::NoSave(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        self.decode(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_core::{EntryKind, Item, ItemCategory, JournalEntry};

    fn sample_record(codec: &SaveCodec) -> SaveRecord {
        let mut player = PlayerState::new("Ada", "Lobby");
        player.awareness = 12;
        player.sanity = 77;
        player.turn = 9;
        player.recompute_tone();
        player
            .inventory
            .add(Item::new("keycard", ItemCategory::Key, 1))
            .unwrap();
        player
            .journal
            .append(JournalEntry::now(EntryKind::Note, "cold in here", 3));
        player.visit("Server Closet");
        player.record_input("take keycard");
        player.set_flag("event:flicker");
        let dialogue = DialogueSnapshot {
            current: vec!["who are you?".into()],
            back: vec![vec![]],
            in_conversation: true,
        };
        let rooms = vec![RoomDelta {
            room: "Lobby".into(),
            sealed: false,
            removed_objects: vec!["keycard".into()],
        }];
        codec.record(player, dialogue, rooms)
    }

    #[test]
    fn encode_decode_preserves_record() {
        let codec = SaveCodec::default();
        let record = sample_record(&codec);
        let decoded = codec.decode(&codec.encode(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let newer = SaveCodec::new("1.3");
        let text = newer.encode(&sample_record(&newer)).unwrap();
        match SaveCodec::default().decode(&text) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, "1.2");
                assert_eq!(found, "1.3");
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn version_is_checked_before_the_body() {
        let text = r#"{"version": "0.9", "player": "not a player"}"#;
        assert!(matches!(
            SaveCodec::default().decode(text),
            Err(SaveError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn corrupt_body_is_rejected() {
        let text = r#"{"version": "1.2", "player": 42}"#;
        assert!(matches!(
            SaveCodec::default().decode(text),
            Err(SaveError::Parse(_))
        ));
        assert!(matches!(
            SaveCodec::default().decode("not json"),
            Err(SaveError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_no_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing.json");
        let err = SaveCodec::default().read(&path).unwrap_err();
        assert!(matches!(err, SaveError::NoSave(_)));
        assert!(err.to_string().contains("No saved game"));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let codec = SaveCodec::default();
        let record = sample_record(&codec);
        codec.write(&path, &record).unwrap();
        assert_eq!(codec.read(&path).unwrap(), record);
    }
}
