//! Deck tree rendering for `srs list`.

use chrono::{DateTime, Utc};
use srs_core::Card;
use std::collections::BTreeMap;
use std::path::Path;

use super::{paint, Color};

const BRANCH: &str = "\u{251c}\u{2500}\u{2500} ";
const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} ";
const PIPE: &str = "\u{2502}   ";
const SPACE: &str = "    ";

#[derive(Default)]
struct DeckNode<'a> {
    cards: Vec<&'a Card>,
    children: BTreeMap<String, DeckNode<'a>>,
}

/// Render the cards under `base` as a tree, cards before subdirectories,
/// both sorted by name. Cards outside `base` are ignored.
pub fn render(base: &Path, cards: &[Card], now: DateTime<Utc>, use_color: bool) -> Vec<String> {
    let mut root = DeckNode::default();

    for card in cards {
        let Ok(rel) = card.path.strip_prefix(base) else {
            continue;
        };
        let mut node = &mut root;
        if let Some(dir) = rel.parent() {
            for part in dir.iter() {
                node = node
                    .children
                    .entry(part.to_string_lossy().to_string())
                    .or_default();
            }
        }
        node.cards.push(card);
    }

    let mut lines = Vec::new();
    render_node(&mut root, "", now, use_color, &mut lines);
    lines
}

fn render_node(
    node: &mut DeckNode<'_>,
    prefix: &str,
    now: DateTime<Utc>,
    use_color: bool,
    lines: &mut Vec<String>,
) {
    node.cards.sort_by_key(|card| card_name(card));

    let child_count = node.children.len();
    let card_count = node.cards.len();

    for (i, card) in node.cards.iter().enumerate() {
        let is_last = i + 1 == card_count && child_count == 0;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!(
            "{prefix}{connector}{} {}",
            card_name(card),
            due_hint(card.scheduling.due, now, use_color)
        ));
    }

    for (i, (name, child)) in node.children.iter_mut().enumerate() {
        let is_last = i + 1 == child_count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{prefix}{connector}{name}/"));

        let child_prefix = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
        render_node(child, &child_prefix, now, use_color, lines);
    }
}

fn card_name(card: &Card) -> String {
    let name = card
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.len().checked_sub(3) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".md") => {
            name[..cut].to_string()
        }
        _ => name,
    }
}

/// Short description of when a card is due next.
pub fn due_hint(due: DateTime<Utc>, now: DateTime<Utc>, use_color: bool) -> String {
    if due <= now {
        return paint("due now", Color::RED, use_color);
    }

    let hours = (due - now).num_hours();
    let (text, color) = if hours < 24 {
        (format!("due in {hours}h"), Color::YELLOW)
    } else if hours < 24 * 7 {
        (format!("due in {}d", hours / 24), Color::GREEN)
    } else if hours < 24 * 30 {
        (format!("due in {}w", hours / (24 * 7)), Color::BLUE)
    } else {
        (format!("due in {}mo", hours / (24 * 30)), Color::GRAY)
    };
    paint(&text, color, use_color)
}
