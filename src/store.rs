//! Inventory persistence
//!
//! The inventory is stored as a Markdown pipe table, one row per album, so it
//! can be reviewed and hand-edited between runs. Columns are matched by name;
//! their order on disk does not matter but every required column must exist.
//!
//! # Escaping
//!
//! - Cells: `\` → `\\`, `|` → `\|`, newline → `\n`, carriage return → `\r`.
//!   Whitespace at either end of a value is escaped too (`\s` for a space,
//!   `\t`, or `\u{hex}`), since padding around cells is trimmed on load.
//! - Actions log cell: entries joined by `"; "`, with `\` → `\\` and
//!   `;` → `\;` inside each entry (applied before cell escaping). An empty
//!   entry is written as `\e`.
//!
//! Writes go to a hidden temp file next to the target and are renamed into
//! place, so an interrupted save never leaves a truncated inventory behind.

use crate::album::{AlbumRecord, Inventory};
use crate::error::{Result, StoreLoadError, SweepError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const COL_TITLE: &str = "Album Title";
pub const COL_NEW_TITLE: &str = "Album New Title";
pub const COL_PHOTO_COUNT: &str = "Photo Count";
pub const COL_DELETE_FLAG: &str = "Delete Flag";
pub const COL_ID: &str = "Album ID";
pub const COL_URL: &str = "Album URL";
pub const COL_ACTIONS_LOG: &str = "Actions Log";

/// Required columns in the order they are written.
pub const COLUMNS: [&str; 7] = [
    COL_TITLE,
    COL_NEW_TITLE,
    COL_PHOTO_COUNT,
    COL_DELETE_FLAG,
    COL_ID,
    COL_URL,
    COL_ACTIONS_LOG,
];

const LOG_SEPARATOR: &str = "; ";

/// Stands in for an empty actions log entry, keeping `[""]` apart from `[]`.
const EMPTY_LOG_ENTRY: &str = "\\e";

/// Load an inventory file.
pub fn load(path: &Path) -> Result<Inventory> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreLoadError::NotFound(path.display().to_string()).into());
        }
        Err(e) => return Err(e.into()),
    };
    let inventory = parse_table(&content)?;
    info!(path = %path.display(), albums = inventory.len(), "Loaded inventory");
    Ok(inventory)
}

/// Write an inventory file, replacing any previous content atomically.
pub fn save(inventory: &Inventory, path: &Path) -> Result<()> {
    let tmp = temp_path(path);
    let table = render_table(inventory);

    let write_tmp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(table.as_bytes())?;
        file.sync_all()
    };
    if let Err(e) = write_tmp() {
        let _ = fs::remove_file(&tmp);
        return Err(SweepError::store_save(format!(
            "failed to write {}: {e}",
            tmp.display()
        )));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        SweepError::store_save(format!("failed to replace {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), albums = inventory.len(), "Saved inventory");
    Ok(())
}

/// `.name.tmp` beside the target, so the final rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "inventory".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Render the inventory as a Markdown pipe table.
pub fn render_table(inventory: &Inventory) -> String {
    let mut out = String::new();
    out.push_str(&render_row(COLUMNS.iter().map(|c| c.to_string())));
    out.push_str(&render_row(COLUMNS.iter().map(|_| ":---".to_string())));
    for record in inventory {
        out.push_str(&render_row(
            [
                escape_cell(&record.title),
                escape_cell(&record.proposed_title),
                record.photo_count.to_string(),
                record.delete_flag.to_string(),
                escape_cell(&record.id),
                escape_cell(&record.url),
                escape_cell(&join_log(&record.actions_log)),
            ]
            .into_iter(),
        ));
    }
    out
}

fn render_row(cells: impl Iterator<Item = String>) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(&cell);
        line.push_str(" |");
    }
    line.push('\n');
    line
}

/// Parse a Markdown pipe table into an inventory.
pub fn parse_table(content: &str) -> std::result::Result<Inventory, StoreLoadError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(StoreLoadError::MissingColumn(COL_TITLE.to_string()));
    };
    let header_cells = split_row(header).ok_or_else(|| StoreLoadError::BadRow {
        line: header_line,
        reason: "header is not a pipe table row".to_string(),
    })?;

    let mut positions = [0usize; COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = header_cells
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| StoreLoadError::MissingColumn(column.to_string()))?;
    }
    let [title, new_title, count, flag, id, url, log] = positions;

    let mut inventory = Inventory::new();
    for (line, raw) in lines {
        let cells = split_row(raw).ok_or_else(|| StoreLoadError::BadRow {
            line,
            reason: "not a pipe table row".to_string(),
        })?;
        if is_separator(&cells) {
            continue;
        }
        if cells.len() != header_cells.len() {
            return Err(StoreLoadError::BadRow {
                line,
                reason: format!(
                    "expected {} cells, found {}",
                    header_cells.len(),
                    cells.len()
                ),
            });
        }

        let photo_count = cells[count].parse::<u64>().map_err(|_| StoreLoadError::BadRow {
            line,
            reason: format!("invalid photo count '{}'", cells[count]),
        })?;
        let delete_flag = parse_flag(&cells[flag]).ok_or_else(|| StoreLoadError::BadRow {
            line,
            reason: format!("invalid delete flag '{}'", cells[flag]),
        })?;

        let record = AlbumRecord {
            id: cells[id].clone(),
            title: cells[title].clone(),
            proposed_title: cells[new_title].clone(),
            photo_count,
            delete_flag,
            url: cells[url].clone(),
            actions_log: split_log(&cells[log]),
        };
        if record.id.is_empty() {
            return Err(StoreLoadError::BadRow {
                line,
                reason: "empty album ID".to_string(),
            });
        }
        let album_id = record.id.clone();
        if !inventory.insert(record) {
            return Err(StoreLoadError::DuplicateId(album_id));
        }
    }
    debug!(rows = inventory.len(), "Parsed inventory table");
    Ok(inventory)
}

fn parse_flag(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" | "" => Some(false),
        _ => None,
    }
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, ':' | '-')))
}

/// Split `| a | b |` into unescaped cells. Padding around each raw cell is
/// dropped before unescaping, so escaped edge whitespace survives.
fn split_row(line: &str) -> Option<Vec<String>> {
    let inner = line.strip_prefix('|')?;
    let mut cells = Vec::new();
    let mut raw = String::new();
    let mut chars = inner.chars();
    let mut closed = false;

    while let Some(ch) = chars.next() {
        closed = false;
        match ch {
            '\\' => {
                raw.push('\\');
                if let Some(next) = chars.next() {
                    raw.push(next);
                }
            }
            '|' => {
                cells.push(unescape_cell(raw.trim()));
                raw.clear();
                closed = true;
            }
            _ => raw.push(ch),
        }
    }
    if !closed {
        return None;
    }
    Some(cells)
}

fn unescape_cell(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('|') => out.push('|'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('u') if chars.peek() == Some(&'{') => {
                chars.next();
                let mut hex = String::new();
                let mut terminated = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        terminated = true;
                        break;
                    }
                    hex.push(c);
                }
                let decoded = terminated
                    .then(|| u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32))
                    .flatten();
                match decoded {
                    Some(c) => out.push(c),
                    None => {
                        out.push_str("\\u{");
                        out.push_str(&hex);
                        if terminated {
                            out.push('}');
                        }
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escape a value for a table cell. Whitespace at either end is written as an
/// escape so the padding trim on load cannot eat it.
fn escape_cell(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(value.len());
    for (i, ch) in value.chars().enumerate() {
        let edge = i == 0 || i == last;
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' if edge => out.push_str("\\t"),
            ' ' if edge => out.push_str("\\s"),
            c if edge && c.is_whitespace() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            _ => out.push(ch),
        }
    }
    out
}

fn join_log(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| {
            if e.is_empty() {
                EMPTY_LOG_ENTRY.to_string()
            } else {
                e.replace('\\', "\\\\").replace(';', "\\;")
            }
        })
        .collect::<Vec<_>>()
        .join(LOG_SEPARATOR)
}

fn split_log(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    let mut raw_entries = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => raw_entries.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    raw_entries.push(current);

    raw_entries
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            // Every entry after the first follows a "; " separator
            let raw = if i > 0 {
                raw.strip_prefix(' ').unwrap_or(raw)
            } else {
                raw.as_str()
            };
            if raw == EMPTY_LOG_ENTRY {
                String::new()
            } else {
                unescape_log_entry(raw)
            }
        })
        .collect()
}

fn unescape_log_entry(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Inventory {
        let mut inv = Inventory::new();
        let mut a = AlbumRecord::new("A1", "Trip | Beach", 0, "https://photos/a1");
        a.delete_flag = true;
        a.actions_log = vec![
            "Deleted on 2024-03-01 10:22:03".to_string(),
            "note; with semicolon \\ and slash".to_string(),
        ];
        let mut b = AlbumRecord::new("B2", "Copy of Trip", 7, "https://photos/b2");
        b.proposed_title = "Trip".to_string();
        inv.insert(a);
        inv.insert(b);
        inv
    }

    #[test]
    fn test_render_then_parse_preserves_rows() {
        let inv = sample();
        let parsed = parse_table(&render_table(&inv)).unwrap();
        assert_eq!(parsed, inv);
    }

    #[test]
    fn test_edge_whitespace_survives_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("albums.md");
        let mut inv = Inventory::new();
        let mut a = AlbumRecord::new("A1", "Copy of ", 3, "https://photos/a1");
        a.proposed_title = " Trip ".to_string();
        inv.insert(a);
        inv.insert(AlbumRecord::new("B2", "\tTabbed\u{a0}", 1, "https://photos/b2"));

        save(&inv, &path).unwrap();
        let loaded = load(&path).unwrap();
        save(&loaded, &path).unwrap();
        let reloaded = load(&path).unwrap();

        assert_eq!(reloaded, inv);
        assert_eq!(reloaded.get("A1").unwrap().title, "Copy of ");
        assert_eq!(reloaded.get("A1").unwrap().proposed_title, " Trip ");
        assert!(fs::read_to_string(&path).unwrap().contains("| Copy of\\s |"));
    }

    #[test]
    fn test_hand_written_escapes_decode() {
        let table = "\
| Album Title | Album New Title | Photo Count | Delete Flag | Album ID | Album URL | Actions Log |
|---|---|---|---|---|---|---|
| \\sPadded\\u{20} | bad \\u{zz} | 1 | false | X | https://photos/x | |
";
        let inv = parse_table(table).unwrap();
        let x = inv.get("X").unwrap();
        assert_eq!(x.title, " Padded ");
        assert_eq!(x.proposed_title, "bad \\u{zz}");
    }

    #[test]
    fn test_empty_log_entries_are_kept() {
        for log in [
            vec![String::new()],
            vec![String::new(), "b".to_string()],
            vec!["a".to_string(), String::new()],
            vec![" x ".to_string(), " ".to_string()],
            vec!["\\e".to_string()],
        ] {
            assert_eq!(split_log(&join_log(&log)), log, "log {log:?}");

            let mut inv = Inventory::new();
            let mut record = AlbumRecord::new("L", "Logged", 0, "https://photos/l");
            record.actions_log = log.clone();
            inv.insert(record);
            assert_eq!(parse_table(&render_table(&inv)).unwrap(), inv);
        }
        assert!(split_log("").is_empty());
        assert_eq!(join_log(&[]), "");
    }

    #[test]
    fn test_columns_in_any_order() {
        let table = "\
| Album ID | Actions Log | Album URL | Delete Flag | Photo Count | Album New Title | Album Title |
|---|---|---|---|---|---|---|
| X | | https://photos/x | True | 3 | | Summer |
";
        let inv = parse_table(table).unwrap();
        let x = inv.get("X").unwrap();
        assert_eq!(x.title, "Summer");
        assert_eq!(x.photo_count, 3);
        assert!(x.delete_flag);
        assert!(x.actions_log.is_empty());
    }

    #[test]
    fn test_missing_column_is_load_failure() {
        let table = "\
| Album Title | Album New Title | Photo Count | Delete Flag | Album ID | Actions Log |
|---|---|---|---|---|---|
";
        assert_eq!(
            parse_table(table),
            Err(StoreLoadError::MissingColumn(COL_URL.to_string()))
        );
    }

    #[test]
    fn test_bad_photo_count() {
        let table = "\
| Album Title | Album New Title | Photo Count | Delete Flag | Album ID | Album URL | Actions Log |
|:---|:---|:---|:---|:---|:---|:---|
| T | | many | false | A | u | |
";
        assert!(matches!(
            parse_table(table),
            Err(StoreLoadError::BadRow { line: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let table = "\
| Album Title | Album New Title | Photo Count | Delete Flag | Album ID | Album URL | Actions Log |
|:---|:---|:---|:---|:---|:---|:---|
| T | | 1 | false | A | u | |
| U | | 2 | false | A | v | |
";
        assert_eq!(
            parse_table(table),
            Err(StoreLoadError::DuplicateId("A".to_string()))
        );
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("albums.md")).unwrap_err();
        assert!(matches!(err, SweepError::StoreLoad(StoreLoadError::NotFound(_))));
    }

    #[test]
    fn test_save_replaces_file_and_cleans_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("albums.md");
        fs::write(&path, "old content").unwrap();

        save(&sample(), &path).unwrap();

        assert!(!dir.path().join(".albums.md.tmp").exists());
        assert_eq!(load(&path).unwrap(), sample());
    }
}
