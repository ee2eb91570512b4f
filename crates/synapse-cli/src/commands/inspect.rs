use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use synapse_core::EntryKind;
use synapse_fiction::SaveCodec;

use super::truncate;

pub fn run(save: &Path, journal: bool) -> Result<(), String> {
    let record = SaveCodec::default().read(save).map_err(|e| e.to_string())?;
    let player = &record.player;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let tone = match player.tone_override {
        Some(o) => format!("{} (pinned {} for {} turns)", player.tone, o.tone, o.turns_remaining),
        None => player.tone.to_string(),
    };
    let items: Vec<&str> = player
        .inventory
        .items()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    let visited: Vec<&str> = player.visited.iter().map(String::as_str).collect();
    let flags: Vec<&str> = player.flags.iter().map(String::as_str).collect();
    let dialogue = if !record.dialogue.in_conversation {
        "not talking".to_string()
    } else if record.dialogue.current.is_empty() {
        "(greeting)".to_string()
    } else {
        record.dialogue.current.join(" > ")
    };
    let sealed: Vec<&str> = record
        .rooms
        .iter()
        .filter(|d| d.sealed)
        .map(|d| d.room.as_str())
        .collect();
    let taken: Vec<String> = record
        .rooms
        .iter()
        .flat_map(|d| {
            d.removed_objects
                .iter()
                .map(move |o| format!("{o} ({})", d.room))
        })
        .collect();

    let rows = [
        ("Version", record.version.clone()),
        ("Saved at", record.saved_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ("Player", player.name.clone()),
        ("Turn", player.turn.to_string()),
        ("Location", player.location.clone()),
        ("Awareness", player.awareness.to_string()),
        ("Sanity", player.sanity.to_string()),
        ("Tone", tone),
        ("Inventory", items.join(", ")),
        ("Visited", visited.join(", ")),
        ("Flags", flags.join(", ")),
        ("Dialogue", dialogue),
        ("Sealed rooms", sealed.join(", ")),
        ("Taken objects", taken.join(", ")),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), truncate(&value, 70)]);
    }
    println!("{table}");

    if journal {
        println!();
        if player.journal.is_empty() {
            println!("  Journal is empty.");
            return Ok(());
        }
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Turn", "Kind", "Entry"]);
        for entry in player.journal.entries() {
            let kind = match entry.kind {
                EntryKind::Note => "note",
                EntryKind::Discovery => "discovery",
                EntryKind::Event => "event",
            };
            table.add_row(vec![entry.turn.to_string(), kind.to_string(), entry.text.clone()]);
        }
        println!("{table}");
        println!();
        println!("  {} entries", player.journal.len());
    }

    Ok(())
}
