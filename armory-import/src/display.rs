//! Console table of imported characters

use armory_common::Character;

const HEADERS: [&str; 8] = [
    "Name", "Race", "Class", "Faction", "Level", "Spec", "Realm", "Guild",
];

/// Render characters as an aligned text table with a header row
pub fn render_character_table(characters: &[Character]) -> String {
    let rows: Vec<[String; 8]> = characters
        .iter()
        .map(|c| {
            [
                c.name.clone(),
                c.race.clone(),
                c.character_class.clone(),
                c.faction.clone(),
                c.level.to_string(),
                c.active_spec.clone().unwrap_or_else(|| "-".to_string()),
                c.realm.clone(),
                c.guild.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, HEADERS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
