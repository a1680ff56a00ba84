//! Card discovery on disk.
//!
//! A deck is a directory; every `.md` file beneath it is a card. Scans never
//! fail as a whole: unreadable files and directories are reported as
//! warnings next to whatever could be loaded.

use crate::codec;
use crate::types::{Card, DeckStats};
use crate::stats;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Key used for the base directory in a deck tree.
pub const ROOT_DECK: &str = ".";

/// A file or directory that could not be read during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse card {}: {}", self.path.display(), self.message)
    }
}

/// Cards found by a scan plus the files that were skipped.
#[derive(Debug, Clone, Default)]
pub struct CardScan {
    pub cards: Vec<Card>,
    pub warnings: Vec<ScanWarning>,
}

impl CardScan {
    fn warn(&mut self, path: PathBuf, message: String) {
        tracing::warn!(path = %path.display(), %message, "skipping unreadable card");
        self.warnings.push(ScanWarning { path, message });
    }
}

/// Recursively load every card under `root`.
pub fn enumerate(root: &Path) -> CardScan {
    scan(WalkDir::new(root))
}

/// Load the cards that are direct children of `dir`.
pub fn enumerate_shallow(dir: &Path) -> CardScan {
    scan(WalkDir::new(dir).max_depth(1))
}

/// Cards whose due date is at or before `now`.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    cards.iter().filter(|card| card.is_due(now)).cloned().collect()
}

/// Whether a file name looks like a card (`.md`, any case).
pub fn is_card_file(name: &str) -> bool {
    name.to_lowercase().ends_with(".md")
}

/// Per-directory statistics for every directory under `base` that directly
/// contains at least one card. Keys are paths relative to `base`, with the
/// base itself as [`ROOT_DECK`].
pub fn deck_tree(base: &Path, now: DateTime<Utc>) -> (BTreeMap<String, DeckStats>, Vec<ScanWarning>) {
    let mut decks = BTreeMap::new();
    let mut warnings = Vec::new();

    for entry in WalkDir::new(base).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(base).to_path_buf();
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                warnings.push(ScanWarning {
                    path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let scan = enumerate_shallow(entry.path());
        warnings.extend(scan.warnings);
        if scan.cards.is_empty() {
            continue;
        }

        decks.insert(deck_key(base, entry.path()), stats::compute_at(&scan.cards, now));
    }

    (decks, warnings)
}

fn deck_key(base: &Path, dir: &Path) -> String {
    match dir.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => ROOT_DECK.to_string(),
        Ok(rel) => rel.to_string_lossy().to_string(),
        Err(_) => dir.to_string_lossy().to_string(),
    }
}

fn scan(walker: WalkDir) -> CardScan {
    let mut result = CardScan::default();

    for entry in walker.follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                result.warn(path, err.to_string());
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_card_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        match codec::read_card(entry.path()) {
            Ok(card) => result.cards.push(card),
            Err(err) => result.warn(entry.path().to_path_buf(), err.to_string()),
        }
    }

    result
}
