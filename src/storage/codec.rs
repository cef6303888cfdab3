//! Text codec for the two record streams.
//!
//! Items and patrons are persisted as independent comma-delimited files,
//! one entity per line, no header:
//!
//! ```text
//! items:   id,title,author,genre,availability,borrowerNameOrEmpty
//! patrons: id,name,contact[,borrowedItemId]*
//! ```
//!
//! The delimiter is reserved: field values must not contain it, and the
//! format has no escaping. Saves go through a temporary file followed by an
//! atomic rename, so a crash mid-write leaves the previous snapshot intact.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::{Item, Patron},
    store::{catalog::Catalog, roster::Roster},
};

/// Reserved field delimiter of the record format.
const FIELD_DELIMITER: char = ',';

/// Serializes and deserializes the catalog and roster record streams.
#[derive(Debug, Clone)]
pub struct PersistenceCodec {
    items_path: PathBuf,
    patrons_path: PathBuf,
}

impl PersistenceCodec {
    pub fn new(items_path: impl Into<PathBuf>, patrons_path: impl Into<PathBuf>) -> Self {
        Self {
            items_path: items_path.into(),
            patrons_path: patrons_path.into(),
        }
    }

    /// Write both record streams, replacing prior contents.
    pub fn save(&self, catalog: &Catalog, roster: &Roster) -> AppResult<()> {
        let mut items = String::new();
        for item in catalog.iter() {
            items.push_str(&encode_item(item));
            items.push('\n');
        }
        let mut patrons = String::new();
        for patron in roster.iter() {
            patrons.push_str(&encode_patron(patron));
            patrons.push('\n');
        }

        // Each stream is replaced atomically; the two files together are
        // not one atomic unit.
        atomic_write(&self.items_path, items.as_bytes()).map_err(AppError::PersistenceFailed)?;
        atomic_write(&self.patrons_path, patrons.as_bytes())
            .map_err(AppError::PersistenceFailed)?;
        Ok(())
    }

    /// Read both record streams.
    ///
    /// Returns `None` when neither file exists yet (first run). Borrowed-item
    /// identifiers that do not resolve against the loaded item set are
    /// dropped and logged rather than failing the load; anything else that
    /// does not parse aborts the whole load with `CorruptRecord`.
    pub fn load(&self) -> AppResult<Option<(Vec<Item>, Vec<Patron>)>> {
        if !self.items_path.exists() && !self.patrons_path.exists() {
            return Ok(None);
        }

        let items_raw = read_or_empty(&self.items_path)?;
        let patrons_raw = read_or_empty(&self.patrons_path)?;

        let mut items = Vec::new();
        let mut item_ids = HashSet::new();
        for (idx, line) in items_raw.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let item = decode_item(idx + 1, line)?;
            if !item_ids.insert(item.id) {
                return Err(corrupt(
                    "items",
                    idx + 1,
                    format!("duplicate item id {}", item.id),
                ));
            }
            items.push(item);
        }

        let mut patrons = Vec::new();
        let mut patron_ids = HashSet::new();
        let mut dropped = 0usize;
        for (idx, line) in patrons_raw.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut patron = decode_patron(idx + 1, line)?;
            if !patron_ids.insert(patron.id) {
                return Err(corrupt(
                    "patrons",
                    idx + 1,
                    format!("duplicate patron id {}", patron.id),
                ));
            }
            // Referential-integrity repair: tolerate records that point at
            // items no longer present instead of rejecting the whole load.
            patron.borrowed.retain(|item_id| {
                let known = item_ids.contains(item_id);
                if !known {
                    tracing::warn!(
                        patron_id = patron.id,
                        item_id,
                        "dropping borrowed-item reference to unknown item"
                    );
                    dropped += 1;
                }
                known
            });
            patrons.push(patron);
        }

        if dropped > 0 {
            tracing::warn!(dropped, "repaired dangling borrowed-item references");
        }

        Ok(Some((items, patrons)))
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    pub fn patrons_path(&self) -> &Path {
        &self.patrons_path
    }
}

fn read_or_empty(path: &Path) -> AppResult<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(AppError::PersistenceFailed(e)),
    }
}

fn corrupt(stream: &'static str, line: usize, details: String) -> AppError {
    AppError::CorruptRecord {
        stream,
        details: format!("line {}: {}", line, details),
    }
}

fn encode_item(item: &Item) -> String {
    format!(
        "{1}{0}{2}{0}{3}{0}{4}{0}{5}{0}{6}",
        FIELD_DELIMITER,
        item.id,
        item.title,
        item.author,
        item.genre,
        item.available,
        item.borrower.as_deref().unwrap_or(""),
    )
}

fn decode_item(line_no: usize, line: &str) -> AppResult<Item> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != 6 {
        return Err(corrupt(
            "items",
            line_no,
            format!("expected 6 fields, found {}", fields.len()),
        ));
    }

    let id: i32 = fields[0]
        .parse()
        .map_err(|_| corrupt("items", line_no, format!("invalid item id '{}'", fields[0])))?;
    let available = match fields[4] {
        "true" => true,
        "false" => false,
        other => {
            return Err(corrupt(
                "items",
                line_no,
                format!("invalid availability '{}'", other),
            ))
        }
    };

    Ok(Item {
        id,
        title: fields[1].to_string(),
        author: fields[2].to_string(),
        genre: fields[3].to_string(),
        available,
        // Borrower is derived state; an available item never has one.
        borrower: if available || fields[5].is_empty() {
            None
        } else {
            Some(fields[5].to_string())
        },
    })
}

fn encode_patron(patron: &Patron) -> String {
    let mut line = format!(
        "{1}{0}{2}{0}{3}",
        FIELD_DELIMITER, patron.id, patron.name, patron.contact
    );
    for item_id in &patron.borrowed {
        line.push(FIELD_DELIMITER);
        line.push_str(&item_id.to_string());
    }
    line
}

fn decode_patron(line_no: usize, line: &str) -> AppResult<Patron> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < 3 {
        return Err(corrupt(
            "patrons",
            line_no,
            format!("expected at least 3 fields, found {}", fields.len()),
        ));
    }

    let id: i32 = fields[0].parse().map_err(|_| {
        corrupt(
            "patrons",
            line_no,
            format!("invalid patron id '{}'", fields[0]),
        )
    })?;

    let mut borrowed = Vec::with_capacity(fields.len() - 3);
    for raw in &fields[3..] {
        let item_id: i32 = raw.parse().map_err(|_| {
            corrupt(
                "patrons",
                line_no,
                format!("invalid borrowed item id '{}'", raw),
            )
        })?;
        borrowed.push(item_id);
    }

    Ok(Patron {
        id,
        name: fields[1].to_string(),
        contact: fields[2].to_string(),
        borrowed,
    })
}

/// Write to a sibling temporary file, sync, then rename over the target.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "records".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)
}
