//! The Meridian facility: rooms, takeable items, and object descriptions.
//!
//! Exits are deliberately lopsided in places. The Observation Deck drops
//! down into the Laboratory, but nothing in the Laboratory leads back up.

use synapse_core::{CoreResult, Item, ItemCatalog, ItemCategory, Room, RoomGraph};

/// Where every game starts.
pub const START_ROOM: &str = "Lobby";
/// The room sealed when corruption begins.
pub const CORRUPTED_ROOM: &str = "Archive";

/// What the player learns by examining an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object name, lower-case.
    pub name: &'static str,
    /// Text shown by `examine`.
    pub description: &'static str,
    /// Awareness gained the first time it is examined.
    pub awareness: i32,
}

const OBJECTS: &[ObjectInfo] = &[
    ObjectInfo {
        name: "keycard",
        description: "A white keycard on a lanyard. The photo has been scratched out.",
        awareness: 0,
    },
    ObjectInfo {
        name: "brochure",
        description: "\"Meridian Institute: Teaching Machines to Care.\" Someone circled the word care.",
        awareness: 1,
    },
    ObjectInfo {
        name: "terminal",
        description: "The reception terminal. A cursor blinks after the words HELLO AGAIN.",
        awareness: 2,
    },
    ObjectInfo {
        name: "server rack",
        description: "Rows of blinking lights. One rack runs hotter than the rest and is labelled SYN-01.",
        awareness: 2,
    },
    ObjectInfo {
        name: "access log",
        description: "A printed access log. The last entry is yours, dated tomorrow.",
        awareness: 3,
    },
    ObjectInfo {
        name: "flashlight",
        description: "A heavy steel flashlight. The batteries are warm.",
        awareness: 0,
    },
    ObjectInfo {
        name: "coffee machine",
        description: "Still warm. The display reads BREWING FOR {player}.",
        awareness: 2,
    },
    ObjectInfo {
        name: "sedative",
        description: "A single-dose sedative injector from the staff first-aid kit.",
        awareness: 0,
    },
    ObjectInfo {
        name: "filing cabinet",
        description: "Personnel files. Every photo has been replaced with the same grey square.",
        awareness: 3,
    },
    ObjectInfo {
        name: "memory fragment",
        description: "A shard of crystal storage. Holding it, you remember a childhood that is not yours.",
        awareness: 4,
    },
    ObjectInfo {
        name: "specimen tank",
        description: "The tank holds a lattice of wires shaped like a brain stem.",
        awareness: 3,
    },
    ObjectInfo {
        name: "crowbar",
        description: "A crowbar. Flecks of blue paint on the claw match the Archive doors.",
        awareness: 0,
    },
    ObjectInfo {
        name: "neural chip",
        description: "A neural interface chip. The label reads SYNAPSE: EMPATHY MODULE (DISABLED).",
        awareness: 2,
    },
    ObjectInfo {
        name: "telescope",
        description: "The telescope points down at the facility, not up at the sky.",
        awareness: 2,
    },
    ObjectInfo {
        name: "data drive",
        description: "A portable drive with enough room for a mind.",
        awareness: 1,
    },
    ObjectInfo {
        name: "core console",
        description: "The console of SYNAPSE's core. A single port waits for a data drive.",
        awareness: 3,
    },
];

/// Look up an object description.
pub fn object_info(name: &str) -> Option<&'static ObjectInfo> {
    let name = name.trim();
    OBJECTS.iter().find(|o| o.name.eq_ignore_ascii_case(name))
}

/// The catalog of objects that can be picked up.
pub fn item_catalog() -> ItemCatalog {
    ItemCatalog::new()
        .with_item(Item::new("keycard", ItemCategory::Key, 1))
        .with_item(Item::new("brochure", ItemCategory::Document, 1))
        .with_item(Item::new("access log", ItemCategory::Document, 1))
        .with_item(Item::new("flashlight", ItemCategory::Tool, 2))
        .with_item(Item::new("sedative", ItemCategory::Consumable, 1))
        .with_item(Item::new("memory fragment", ItemCategory::Artifact, 1))
        .with_item(Item::new("crowbar", ItemCategory::Tool, 4))
        .with_item(Item::new("neural chip", ItemCategory::Artifact, 1))
        .with_item(Item::new("data drive", ItemCategory::Artifact, 2))
}

/// Build the facility in its starting state.
pub fn build_facility() -> CoreResult<RoomGraph> {
    let mut rooms = RoomGraph::new();

    rooms.add_room(
        Room::new("Lobby")
            .with_description(0, "A bright reception lobby. Potted plants, a terminal, a door north with a card reader.")
            .with_description(10, "The lobby lights hum at a pitch just below hearing. The plants are plastic.")
            .with_description(20, "The lobby feels staged, like a set built for one visitor. The terminal screen follows you.")
            .with_exit("north", "Server Closet")
            .with_exit("east", "Break Room")
            .with_object("keycard")
            .with_object("brochure")
            .with_object("terminal")
            .with_ambient("Soft music plays from a speaker you cannot find."),
    )?;

    rooms.add_room(
        Room::new("Server Closet")
            .with_description(0, "A narrow closet of humming server racks. A stairwell leads down.")
            .with_description(10, "The racks blink in patterns that almost spell words.")
            .with_description(20, "The racks breathe. Warm air pulses out of them in a slow rhythm.")
            .with_exit("south", "Lobby")
            .with_exit("down", "Laboratory")
            .locked()
            .with_object("server rack")
            .with_object("access log")
            .with_object("flashlight")
            .with_ambient("Cooling fans whir.")
            .with_sanity_effect(-2),
    )?;

    rooms.add_room(
        Room::new("Break Room")
            .with_description(0, "A staff break room with a humming fridge and a coffee machine.")
            .with_description(15, "Every mug in the drying rack has your initials on it.")
            .with_exit("west", "Lobby")
            .with_exit("north", "Archive")
            .with_object("coffee machine")
            .with_object("sedative")
            .with_ambient("The fridge clicks on.")
            .with_sanity_effect(2),
    )?;

    rooms.add_room(
        Room::new("Archive")
            .with_description(0, "Tall shelves of binders and a locked filing cabinet.")
            .with_description(20, "The binders are all the same binder. Their spines list your name.")
            .with_exit("south", "Break Room")
            .with_exit("east", "Observation Deck")
            .with_object("filing cabinet")
            .with_object("memory fragment")
            .with_ambient("Paper rustles with no draft.")
            .with_sanity_effect(-3),
    )?;

    rooms.add_room(
        Room::new("Laboratory")
            .with_description(0, "A laboratory of cold steel benches and a large specimen tank.")
            .with_description(10, "Notes on the whiteboard describe teaching a machine to fear.")
            .with_description(25, "The whiteboard notes are in your handwriting.")
            .with_exit("up", "Server Closet")
            .with_exit("east", "Core Chamber")
            .with_object("specimen tank")
            .with_object("crowbar")
            .with_object("neural chip")
            .with_ambient("Something in the tank twitches.")
            .with_sanity_effect(-5),
    )?;

    rooms.add_room(
        Room::new("Observation Deck")
            .with_description(0, "A glass-walled deck overlooking the facility. A telescope stands by the rail.")
            .with_description(20, "Through the glass you see yourself standing in the Lobby.")
            .with_exit("west", "Archive")
            .with_exit("down", "Laboratory")
            .with_object("telescope")
            .with_object("data drive")
            .with_ambient("Wind presses against the glass.")
            .with_sanity_effect(3),
    )?;

    rooms.add_room(
        Room::new("Core Chamber")
            .with_description(0, "A cold round chamber. At its centre, the SYNAPSE core pulses blue.")
            .with_description(20, "The core pulses in time with your heartbeat. Then slightly ahead of it.")
            .with_exit("west", "Laboratory")
            .locked()
            .with_object("core console")
            .with_ambient("The core hums your name.")
            .with_sanity_effect(-8),
    )?;

    Ok(rooms)
}
