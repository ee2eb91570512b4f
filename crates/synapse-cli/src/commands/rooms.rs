use comfy_table::{ContentArrangement, Table};
use synapse_fiction::facility::build_facility;

use super::truncate;

pub fn run() -> Result<(), String> {
    let rooms = build_facility().map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Room", "Exits", "Keycard", "Sanity", "Description"]);

    for room in rooms.rooms() {
        let exits: Vec<String> = room
            .exits
            .iter()
            .map(|(dir, to)| format!("{dir}: {to}"))
            .collect();
        table.add_row(vec![
            room.name.clone(),
            exits.join("\n"),
            if room.requires_keycard { "yes" } else { "" }.to_string(),
            format!("{:+}", room.sanity_effect),
            truncate(room.describe(0), 60),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} rooms", rooms.len());

    Ok(())
}
