use anyhow::{bail, Context, Result};
use chrono::Utc;
use srs_core::{codec, repository, Fsrs, Rating, ReviewSession, Scheduler};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

use crate::app::App;
use crate::render::{paint, Color};

const PROMPT: &str = "1=Again  2=Hard  3=Good  4=Easy  e=Edit  q=Quit\n> ";

#[derive(Debug, PartialEq, Eq)]
struct Summary {
    reviewed: usize,
    quit: bool,
}

pub fn run(app: &App, deck: Option<&str>) -> Result<()> {
    let deck_path = app.deck_path(deck)?;
    let scan = repository::enumerate(&deck_path);
    app.report(&scan.warnings);

    let mut session = ReviewSession::due(Fsrs::default(), scan.cards, Utc::now());
    if session.is_empty() {
        println!("No cards are due for review in {}", deck_path.display());
        return Ok(());
    }

    let editor = app.editor();
    let summary = review_loop(
        &mut session,
        io::stdin().lock(),
        io::stdout(),
        |path| open_editor(&editor, path),
        app.use_color,
    )?;

    if summary.quit {
        println!("\nSession ended. {} cards reviewed.", summary.reviewed);
    } else {
        println!("\nReview complete! {} cards reviewed.", summary.reviewed);
    }
    Ok(())
}

/// Drive a session from line-based input until it runs out of cards, the
/// user quits or the input ends.
fn review_loop<S, R, W, E>(
    session: &mut ReviewSession<S>,
    mut input: R,
    mut out: W,
    mut edit: E,
    use_color: bool,
) -> Result<Summary>
where
    S: Scheduler,
    R: BufRead,
    W: Write,
    E: FnMut(&Path) -> Result<()>,
{
    let mut reviewed = 0;
    let quit = |reviewed: usize| -> Result<Summary> { Ok(Summary { reviewed, quit: true }) };

    while session.has_next() {
        let (position, total) = session.progress();
        let card = session.current()?.clone();

        writeln!(out, "\n[{position}/{total}] {}", card.path.display())?;
        writeln!(out, "{}", paint(&card.question, Color::BOLD, use_color))?;
        write!(out, "\n[Press Enter to show answer...]")?;
        out.flush()?;
        if read_line(&mut input)?.is_none() {
            return quit(reviewed);
        }
        writeln!(out, "\n{}\n", card.answer)?;

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(choice) = read_line(&mut input)? else {
                return quit(reviewed);
            };

            match choice.as_str() {
                "q" | "Q" => return quit(reviewed),
                "e" | "E" => {
                    let edited = edit(&card.path).and_then(|()| Ok(codec::read_card(&card.path)?));
                    match edited {
                        Ok(updated) => {
                            writeln!(
                                out,
                                "\n{}\n\n{}\n",
                                paint(&updated.question, Color::BOLD, use_color),
                                updated.answer
                            )?;
                            session.update_current(updated)?;
                        }
                        Err(err) => writeln!(out, "Error editing card: {err:#}")?,
                    }
                }
                other => match other.parse::<i64>().ok().and_then(Rating::from_value) {
                    Some(rating) => match session.rate(rating) {
                        Ok(rated) => {
                            writeln!(
                                out,
                                "Rated {rating}. Next review: {}",
                                rated.scheduling.due.format("%Y-%m-%d %H:%M UTC")
                            )?;
                            reviewed += 1;
                            break;
                        }
                        Err(err) => writeln!(out, "Failed to save rating: {err}")?,
                    },
                    None => writeln!(out, "Invalid choice.")?,
                },
            }
        }
    }

    Ok(Summary {
        reviewed,
        quit: false,
    })
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn open_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("editor command is empty")?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use srs_core::Card;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn deck(cards: &[(&str, &str)]) -> (TempDir, Vec<Card>) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in cards {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let scan = repository::enumerate(dir.path());
        (dir, scan.cards)
    }

    fn no_edit(_: &Path) -> Result<()> {
        bail!("editor not available")
    }

    fn drive(
        cards: Vec<Card>,
        input: &str,
        edit: impl FnMut(&Path) -> Result<()>,
    ) -> (Summary, String) {
        let mut session = ReviewSession::due(Fsrs::default(), cards, Utc::now());
        let mut out = Vec::new();
        let summary = review_loop(&mut session, Cursor::new(input), &mut out, edit, false).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn rates_every_card() {
        let (dir, cards) = deck(&[("a.md", "First\n---\n1"), ("b.md", "Second\n---\n2")]);

        let (summary, output) = drive(cards, "\n3\n\n4\n", no_edit);

        assert_eq!(summary, Summary { reviewed: 2, quit: false });
        assert!(output.contains("[1/2]"));
        assert!(output.contains("Rated Good."));
        assert!(output.contains("Rated Easy."));
        for name in ["a.md", "b.md"] {
            let content = fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(content.contains("reps:1"));
        }
    }

    #[test]
    fn invalid_choice_then_quit() {
        let (dir, cards) = deck(&[("a.md", "Q\n---\nA")]);

        let (summary, output) = drive(cards, "\n9\nq\n", no_edit);

        assert_eq!(summary, Summary { reviewed: 0, quit: true });
        assert!(output.contains("Invalid choice."));
        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "Q\n---\nA");
    }

    #[test]
    fn end_of_input_stops_session() {
        let (_dir, cards) = deck(&[("a.md", "Q\n---\nA")]);
        let (summary, _) = drive(cards, "", no_edit);
        assert_eq!(summary, Summary { reviewed: 0, quit: true });
    }

    #[test]
    fn edit_reloads_current_card() {
        let (dir, cards) = deck(&[("a.md", "Old question\n---\nOld answer")]);

        let edit = |path: &Path| -> Result<()> {
            fs::write(path, "New question\n---\nNew answer")?;
            Ok(())
        };
        let (summary, output) = drive(cards, "\ne\n3\n", edit);

        assert_eq!(summary.reviewed, 1);
        assert!(output.contains("New question"));
        let content = fs::read_to_string(dir.path().join("a.md")).unwrap();
        assert!(content.ends_with("New question\n---\nNew answer"));
    }

    #[test]
    fn failed_edit_keeps_card() {
        let (_dir, cards) = deck(&[("a.md", "Q\n---\nA")]);

        let (summary, output) = drive(cards, "\ne\n2\n", no_edit);

        assert!(output.contains("Error editing card: editor not available"));
        assert_eq!(summary.reviewed, 1);
    }

    #[test]
    fn empty_editor_command() {
        assert!(open_editor("  ", Path::new("a.md")).is_err());
    }
}
