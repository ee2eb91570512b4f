//! Rooms and the room graph.
//!
//! Exits are directed: a room reachable from A by "north" need not lead
//! back to A by "south". Movement and pickup checks are the only logic
//! here; entering a room has no side effects at this level.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::inventory::{Inventory, Item, ItemCatalog};

/// Name of the item that opens keycard-gated rooms.
pub const KEYCARD: &str = "keycard";

/// A room in the facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Display name; unique (case-insensitive) within a graph.
    pub name: String,
    /// Descriptions keyed by the awareness level that reveals them.
    pub descriptions: BTreeMap<i32, String>,
    /// Direction (lower-case) to destination room name.
    pub exits: BTreeMap<String, String>,
    /// Crossing in or out requires a carried keycard.
    pub requires_keycard: bool,
    /// Once sealed, nothing enters or leaves.
    pub sealed: bool,
    /// Objects lying in the room.
    pub objects: Vec<String>,
    /// Short ambient cue printed on entry.
    pub ambient: Option<String>,
    /// Sanity change applied when the player enters.
    pub sanity_effect: i32,
    initial_objects: Vec<String>,
}

impl Room {
    /// Create an empty room.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptions: BTreeMap::new(),
            exits: BTreeMap::new(),
            requires_keycard: false,
            sealed: false,
            objects: Vec::new(),
            ambient: None,
            sanity_effect: 0,
            initial_objects: Vec::new(),
        }
    }

    /// Add a description revealed at `threshold` awareness.
    pub fn with_description(mut self, threshold: i32, text: impl Into<String>) -> Self {
        self.descriptions.insert(threshold, text.into());
        self
    }

    /// Add an exit.
    pub fn with_exit(mut self, direction: &str, destination: impl Into<String>) -> Self {
        self.exits
            .insert(direction.trim().to_lowercase(), destination.into());
        self
    }

    /// Gate the room behind a keycard.
    pub fn locked(mut self) -> Self {
        self.requires_keycard = true;
        self
    }

    /// Place an object in the room.
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        let object = object.into();
        self.initial_objects.push(object.clone());
        self.objects.push(object);
        self
    }

    /// Set the ambient cue.
    pub fn with_ambient(mut self, cue: impl Into<String>) -> Self {
        self.ambient = Some(cue.into());
        self
    }

    /// Set the sanity change applied on entry.
    pub fn with_sanity_effect(mut self, delta: i32) -> Self {
        self.sanity_effect = delta;
        self
    }

    /// The description for the highest threshold not above `awareness`.
    ///
    /// Falls back to the lowest-threshold description, and to an empty
    /// string for a room without descriptions.
    pub fn describe(&self, awareness: i32) -> &str {
        self.descriptions
            .range(..=awareness)
            .next_back()
            .or_else(|| self.descriptions.iter().next())
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }

    /// Whether an object lies here (case-insensitive).
    pub fn has_object(&self, name: &str) -> bool {
        self.find_object(name).is_some()
    }

    fn find_object(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.objects.iter().position(|o| o.eq_ignore_ascii_case(name))
    }

    /// Objects present at construction that are gone now.
    fn removed_objects(&self) -> Vec<String> {
        self.initial_objects
            .iter()
            .filter(|o| !self.objects.contains(o))
            .cloned()
            .collect()
    }
}

/// Persistent changes to one room since the graph was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDelta {
    /// Room name.
    pub room: String,
    /// Sealed flag.
    pub sealed: bool,
    /// Objects that have been taken out of the room.
    #[serde(default)]
    pub removed_objects: Vec<String>,
}

/// All rooms, keyed by case-insensitive name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    by_name_lower: HashMap<String, usize>,
}

impl RoomGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room.
    pub fn add_room(&mut self, room: Room) -> CoreResult<()> {
        let key = room.name.to_lowercase();
        if self.by_name_lower.contains_key(&key) {
            return Err(CoreError::DuplicateRoom(room.name));
        }
        self.by_name_lower.insert(key, self.rooms.len());
        self.rooms.push(room);
        Ok(())
    }

    /// Find a room by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Room> {
        self.by_name_lower
            .get(&name.trim().to_lowercase())
            .and_then(|&i| self.rooms.get(i))
    }

    /// Find a room by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Room> {
        let idx = *self.by_name_lower.get(&name.trim().to_lowercase())?;
        self.rooms.get_mut(idx)
    }

    fn require(&self, name: &str) -> CoreResult<&Room> {
        self.get(name)
            .ok_or_else(|| CoreError::RoomNotFound(name.to_string()))
    }

    /// All rooms in insertion order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Room names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.rooms.iter().map(|r| r.name.as_str()).collect()
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the graph has no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Describe a room at the given awareness level.
    pub fn describe(&self, room: &str, awareness: i32) -> CoreResult<String> {
        Ok(self.require(room)?.describe(awareness).to_string())
    }

    /// Check whether the player may enter `to` with this inventory.
    pub fn check_entry(&self, to: &str, inventory: &Inventory) -> CoreResult<&Room> {
        let dest = self.require(to)?;
        if dest.requires_keycard && !inventory.contains(KEYCARD) {
            return Err(CoreError::KeycardRequired(dest.name.clone()));
        }
        if dest.sealed {
            return Err(CoreError::RoomSealed(dest.name.clone()));
        }
        Ok(dest)
    }

    /// Resolve a move without performing it. Returns the destination name.
    ///
    /// Rejected when there is no such exit, when either end requires a
    /// keycard the player lacks, or when either end is sealed.
    pub fn move_from(
        &self,
        from: &str,
        direction: &str,
        inventory: &Inventory,
    ) -> CoreResult<&str> {
        let source = self.require(from)?;
        let direction = direction.trim().to_lowercase();
        let to = source
            .exits
            .get(&direction)
            .ok_or_else(|| CoreError::NoExit(direction.clone()))?;
        if source.requires_keycard && !inventory.contains(KEYCARD) {
            return Err(CoreError::KeycardRequired(source.name.clone()));
        }
        if source.sealed {
            return Err(CoreError::RoomSealed(source.name.clone()));
        }
        let dest = self.check_entry(to, inventory)?;
        Ok(dest.name.as_str())
    }

    /// Take an object out of a room and into the inventory.
    ///
    /// The object must lie in the room and be in the catalog; the inventory
    /// must accept it. Nothing changes on rejection.
    pub fn take(
        &mut self,
        room: &str,
        object: &str,
        catalog: &ItemCatalog,
        inventory: &mut Inventory,
    ) -> CoreResult<Item> {
        let here = self.require(room)?;
        let object = object.trim();
        let pos = here
            .find_object(object)
            .ok_or_else(|| CoreError::ItemNotHere(object.to_string()))?;
        let item = catalog
            .get(object)
            .cloned()
            .ok_or_else(|| CoreError::NotTakeable(here.objects[pos].clone()))?;
        inventory.check_add(&item)?;

        if let Some(r) = self.get_mut(room) {
            r.objects.remove(pos);
        }
        inventory.add(item.clone())?;
        Ok(item)
    }

    /// Seal a room.
    pub fn seal(&mut self, room: &str) -> CoreResult<()> {
        let r = self
            .get_mut(room)
            .ok_or_else(|| CoreError::RoomNotFound(room.to_string()))?;
        r.sealed = true;
        Ok(())
    }

    /// Unseal a room.
    pub fn unseal(&mut self, room: &str) -> CoreResult<()> {
        let r = self
            .get_mut(room)
            .ok_or_else(|| CoreError::RoomNotFound(room.to_string()))?;
        r.sealed = false;
        Ok(())
    }

    /// Names of sealed rooms.
    pub fn sealed_rooms(&self) -> Vec<&str> {
        self.rooms
            .iter()
            .filter(|r| r.sealed)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Changes since construction, one entry per changed room.
    pub fn deltas(&self) -> Vec<RoomDelta> {
        self.rooms
            .iter()
            .filter_map(|r| {
                let removed = r.removed_objects();
                (r.sealed || !removed.is_empty()).then(|| RoomDelta {
                    room: r.name.clone(),
                    sealed: r.sealed,
                    removed_objects: removed,
                })
            })
            .collect()
    }

    /// Re-apply saved changes to a freshly built graph.
    pub fn apply_deltas(&mut self, deltas: &[RoomDelta]) -> CoreResult<()> {
        for delta in deltas {
            let room = self
                .get_mut(&delta.room)
                .ok_or_else(|| CoreError::RoomNotFound(delta.room.clone()))?;
            room.sealed = delta.sealed;
            room.objects
                .retain(|o| !delta.removed_objects.iter().any(|r| r.eq_ignore_ascii_case(o)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ItemCategory;

    fn graph() -> RoomGraph {
        let mut g = RoomGraph::new();
        g.add_room(
            Room::new("Lobby")
                .with_description(0, "A bright lobby.")
                .with_description(10, "The lobby lights hum.")
                .with_description(20, "The lobby is watching you.")
                .with_exit("north", "Server Closet")
                .with_exit("east", "Break Room")
                .with_object("keycard")
                .with_object("brochure"),
        )
        .unwrap();
        g.add_room(
            Room::new("Server Closet")
                .with_description(0, "Racks of servers.")
                .with_exit("south", "Lobby")
                .locked(),
        )
        .unwrap();
        g.add_room(Room::new("Break Room").with_description(0, "Stale coffee."))
            .unwrap();
        g
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::new().with_item(Item::new("keycard", ItemCategory::Key, 1))
    }

    #[test]
    fn describe_picks_highest_threshold_not_above() {
        let g = graph();
        assert_eq!(g.describe("Lobby", 0).unwrap(), "A bright lobby.");
        assert_eq!(g.describe("lobby", 15).unwrap(), "The lobby lights hum.");
        assert_eq!(g.describe("LOBBY", 99).unwrap(), "The lobby is watching you.");
        assert_eq!(g.describe("Lobby", 15).unwrap(), g.describe("Lobby", 15).unwrap());
    }

    #[test]
    fn duplicate_room_rejected() {
        let mut g = graph();
        assert_eq!(
            g.add_room(Room::new("lobby")),
            Err(CoreError::DuplicateRoom("lobby".to_string()))
        );
    }

    #[test]
    fn keycard_gate() {
        let mut g = graph();
        let mut inv = Inventory::default();
        assert_eq!(
            g.move_from("Lobby", "north", &inv),
            Err(CoreError::KeycardRequired("Server Closet".to_string()))
        );
        g.take("Lobby", "keycard", &catalog(), &mut inv).unwrap();
        assert_eq!(g.move_from("Lobby", "North", &inv).unwrap(), "Server Closet");
    }

    #[test]
    fn exits_are_directed() {
        let g = graph();
        let inv = Inventory::default();
        assert_eq!(g.move_from("Lobby", "east", &inv).unwrap(), "Break Room");
        assert_eq!(
            g.move_from("Break Room", "west", &inv),
            Err(CoreError::NoExit("west".to_string()))
        );
    }

    #[test]
    fn sealed_rooms_block_both_ways() {
        let mut g = graph();
        let inv = Inventory::default();
        g.seal("Break Room").unwrap();
        assert_eq!(
            g.move_from("Lobby", "east", &inv),
            Err(CoreError::RoomSealed("Break Room".to_string()))
        );
        g.unseal("Break Room").unwrap();
        g.seal("Lobby").unwrap();
        assert_eq!(
            g.move_from("Lobby", "east", &inv),
            Err(CoreError::RoomSealed("Lobby".to_string()))
        );
    }

    #[test]
    fn take_rules() {
        let mut g = graph();
        let mut inv = Inventory::default();
        assert_eq!(
            g.take("Lobby", "brochure", &catalog(), &mut inv),
            Err(CoreError::NotTakeable("brochure".to_string()))
        );
        assert_eq!(
            g.take("Break Room", "keycard", &catalog(), &mut inv),
            Err(CoreError::ItemNotHere("keycard".to_string()))
        );
        g.take("Lobby", "KEYCARD", &catalog(), &mut inv).unwrap();
        assert!(!g.get("Lobby").unwrap().has_object("keycard"));
        assert!(g.take("Lobby", "keycard", &catalog(), &mut inv).is_err());
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn overweight_take_leaves_room_intact() {
        let mut g = graph();
        let mut inv = Inventory::with_capacity(0);
        assert!(matches!(
            g.take("Lobby", "keycard", &catalog(), &mut inv),
            Err(CoreError::TooHeavy { .. })
        ));
        assert!(g.get("Lobby").unwrap().has_object("keycard"));
        assert!(inv.is_empty());
    }

    #[test]
    fn deltas_roundtrip() {
        let mut g = graph();
        let mut inv = Inventory::default();
        g.take("Lobby", "keycard", &catalog(), &mut inv).unwrap();
        g.seal("Break Room").unwrap();
        let deltas = g.deltas();
        assert_eq!(deltas.len(), 2);

        let mut fresh = graph();
        fresh.apply_deltas(&deltas).unwrap();
        assert!(!fresh.get("Lobby").unwrap().has_object("keycard"));
        assert!(fresh.get("Break Room").unwrap().sealed);
        assert_eq!(fresh.sealed_rooms(), ["Break Room"]);
    }
}
