// src/export.rs
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::aggregate::AggregatedItem;
use crate::config::options::GroupMode;

const SEP: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn quoted(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Write a single CSV row. `force_quote[i]` quotes column `i` unconditionally.
pub fn write_row<W: Write>(mut w: W, row: &[String], force_quote: &[bool]) -> io::Result<()> {
    let mut first = true;
    for (i, cell) in row.iter().enumerate() {
        if !first { write!(w, "{}", SEP)?; } else { first = false; }
        if force_quote.get(i).copied().unwrap_or(false) || needs_quotes(cell) {
            write!(w, "{}", quoted(cell))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

pub fn headers(group: GroupMode) -> Vec<String> {
    let mut h = vec![s!("Name"), s!("Tier"), s!("Rarity"), s!("Count")];
    if group == GroupMode::ItemAndPlayer {
        h.push(s!("Player"));
    }
    h
}

/// One output row. The Player column only exists when grouping by player.
pub fn build_row(row: &AggregatedItem, group: GroupMode) -> Vec<String> {
    let it = &row.item;
    let mut out = vec![it.name.clone(), it.tier.to_string(), s!(it.rarity.as_str()), it.count.to_string()];
    if group == GroupMode::ItemAndPlayer {
        out.push(it.player_name.clone());
    }
    out
}

/// Full CSV text for the Copy/Export actions. Names are always quoted.
pub fn to_export_string(rows: &[AggregatedItem], group: GroupMode, include_headers: bool) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        let _ = write_row(&mut buf, &headers(group), &[]);
    }
    for r in rows {
        let _ = write_row(&mut buf, &build_row(r, group), &[true]);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Write the export file, creating parent directories as needed.
/// Returns the path written to.
pub fn export_to_path(
    path: &Path,
    rows: &[AggregatedItem],
    group: GroupMode,
    include_headers: bool,
) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, to_export_string(rows, group, include_headers))?;
    logf!("Export: {} rows → {}", rows.len(), path.display());
    Ok(path.to_path_buf())
}
