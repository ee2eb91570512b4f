use std::ops::RangeInclusive;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use synapse_fiction::endings::{ENDINGS, Ending, ending_by_id};

pub fn run(id: Option<&str>) -> Result<(), String> {
    match id {
        Some(id) => {
            let ending = ending_by_id(&id.trim().to_lowercase())
                .ok_or_else(|| format!("no ending called '{id}'"))?;
            show(ending);
        }
        None => list(),
    }
    Ok(())
}

fn list() {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Id", "Ending", "Room", "Item", "Awareness", "Sanity", "Turns"]);

    for (i, ending) in ENDINGS.iter().enumerate() {
        let mut row = vec![(i + 1).to_string(), ending.id.to_string()];
        row.extend(conditions(ending));
        table.add_row(row);
    }

    println!("{table}");
    println!();
    println!("  Endings are checked in order; the first match wins.");
}

fn show(ending: &Ending) {
    println!("  {}", ending.title.bold());
    println!();
    println!("  {}", ending.narrative);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ending", "Room", "Item", "Awareness", "Sanity", "Turns"]);
    table.add_row(conditions(ending));
    println!("{table}");
}

fn conditions(ending: &Ending) -> Vec<String> {
    vec![
        ending.title.to_string(),
        ending.room.unwrap_or("any").to_string(),
        ending.item.unwrap_or("-").to_string(),
        range(&ending.awareness, i32::MAX),
        range(&ending.sanity, i32::MAX),
        range(&ending.turns, u32::MAX),
    ]
}

fn range<T: PartialOrd + std::fmt::Display>(r: &RangeInclusive<T>, max: T) -> String {
    if *r.end() >= max {
        format!("{}+", r.start())
    } else if r.start() == r.end() {
        r.start().to_string()
    } else {
        format!("{}-{}", r.start(), r.end())
    }
}
