//! Card file codec.
//!
//! # Format
//! ```markdown
//! <!-- FSRS: due:2024-01-15T10:30:00Z, stability:2.50, difficulty:5.00, elapsed_days:0, scheduled_days:1, reps:1, lapses:0, state:Review -->
//!
//! What is Rust?
//! ---
//! A systems programming language.
//! ```
//!
//! The metadata line is optional. Decoding is permissive: a field that fails
//! to parse keeps its default and the rest of the file is still read.

use crate::error::{CoreError, Result};
use crate::types::{Card, LearningState, SchedulingState};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const METADATA_PREFIX: &str = "<!-- FSRS:";
pub const METADATA_SUFFIX: &str = "-->";
pub const SEPARATOR: &str = "---";

/// Parse card file content. Never fails; malformed metadata degrades to defaults.
pub fn parse(content: &str, path: impl Into<PathBuf>) -> Card {
    let mut lines = content.lines();
    let mut scheduling = SchedulingState::default();
    let mut body: Vec<&str> = Vec::new();

    if let Some(first) = lines.next() {
        match metadata_body(first) {
            Some(meta) => scheduling = parse_metadata(meta),
            None => body.push(first),
        }
    }
    body.extend(lines);

    let (question, answer) = match body.iter().position(|line| *line == SEPARATOR) {
        Some(split) => (body[..split].join("\n"), body[split + 1..].join("\n")),
        None => (body.join("\n"), String::new()),
    };

    Card {
        path: path.into(),
        question: question.trim().to_string(),
        answer: answer.trim().to_string(),
        scheduling,
        review_log: Vec::new(),
    }
}

/// Read and parse a card from disk.
pub fn read_card(path: &Path) -> Result<Card> {
    let content = fs::read_to_string(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content, path))
}

/// Rebuild file content with a fresh metadata line for `card`.
///
/// Every existing metadata line is dropped; the rest of `original` is kept
/// byte for byte.
pub fn serialize(card: &Card, original: &str) -> String {
    let remainder = original
        .split('\n')
        .filter(|line| !line.starts_with(METADATA_PREFIX))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}", format_metadata(&card.scheduling), remainder)
}

/// Persist the card's scheduling state into its file.
///
/// The new content goes to a temporary file next to the real file which then
/// replaces it, so the card is either fully updated or untouched. Symlinks are
/// resolved first so the link survives and its target is the file rewritten.
/// The original permissions carry over to the replacement.
pub fn write_card(card: &Card) -> Result<()> {
    let read_err = |source| CoreError::Read {
        path: card.path.clone(),
        source,
    };
    let target = fs::canonicalize(&card.path).map_err(read_err)?;
    let original = fs::read_to_string(&target).map_err(read_err)?;
    let permissions = fs::metadata(&target).map_err(read_err)?.permissions();
    let content = serialize(card, &original);

    let write_err = |source| CoreError::Write {
        path: card.path.clone(),
        source,
    };
    let dir = target.parent().unwrap_or_else(|| Path::new("/"));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %card.path.display(), due = %card.scheduling.due, "card updated");
    Ok(())
}

/// Build the metadata line for a scheduling state.
pub fn format_metadata(state: &SchedulingState) -> String {
    format!(
        "{} due:{}, stability:{:.2}, difficulty:{:.2}, elapsed_days:{}, scheduled_days:{}, reps:{}, lapses:{}, state:{} {}",
        METADATA_PREFIX,
        state.due.to_rfc3339_opts(SecondsFormat::Secs, true),
        state.stability,
        state.difficulty,
        state.elapsed_days,
        state.scheduled_days,
        state.reps,
        state.lapses,
        state.state,
        METADATA_SUFFIX,
    )
}

/// Parse the `key:value, ...` body of a metadata line.
pub fn parse_metadata(body: &str) -> SchedulingState {
    let mut state = SchedulingState::default();

    for pair in body.split(',') {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "due" => {
                if let Ok(due) = DateTime::parse_from_rfc3339(value) {
                    state.due = due.with_timezone(&Utc);
                }
            }
            "stability" => set_parsed(&mut state.stability, value),
            "difficulty" => set_parsed(&mut state.difficulty, value),
            "elapsed_days" => set_parsed(&mut state.elapsed_days, value),
            "scheduled_days" => set_parsed(&mut state.scheduled_days, value),
            "reps" => set_parsed(&mut state.reps, value),
            "lapses" => set_parsed(&mut state.lapses, value),
            "state" => state.state = LearningState::from_name(value),
            _ => {}
        }
    }

    state
}

fn metadata_body(line: &str) -> Option<&str> {
    line.strip_prefix(METADATA_PREFIX)?
        .strip_suffix(METADATA_SUFFIX)
        .map(str::trim)
}

fn set_parsed<T: std::str::FromStr>(field: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *field = parsed;
    }
}
