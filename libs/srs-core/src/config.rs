//! User configuration and deck path resolution.
//!
//! The config file lives at `<config dir>/srs/config` and holds simple
//! `key=value` lines:
//!
//! ```text
//! # SRS Configuration
//! base_deck=~/flashcards
//! editor=nvim
//! ```

use crate::error::{CoreError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

const CONFIG_DIR_NAME: &str = "srs";
const CONFIG_FILE_NAME: &str = "config";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Root directory all deck paths are relative to.
    pub base_deck_path: Option<PathBuf>,
    /// Command used to edit a card during review.
    pub editor: Option<String>,
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config from its default location. A missing file is an empty config.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content, dirs::home_dir().as_deref())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(CoreError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse config file content. Unknown keys and malformed lines are ignored.
    pub fn parse(content: &str, home: Option<&Path>) -> Self {
        let mut config = Self::default();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim() {
                "base_deck" => config.base_deck_path = Some(expand_home(value, home)),
                "editor" => config.editor = Some(value.to_string()),
                _ => {}
            }
        }

        config
    }

    /// Render the config file, folding the home directory back to `~`.
    pub fn render(&self, home: Option<&Path>) -> String {
        let mut out = String::from(
            "# SRS Configuration\n# Base deck path - all subdirectories will be relative to this\n\n",
        );
        if let Some(base) = &self.base_deck_path {
            out.push_str(&format!("base_deck={}\n", collapse_home(base, home)));
        }
        if let Some(editor) = &self.editor {
            out.push_str(&format!("editor={editor}\n"));
        }
        out
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| CoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.render(dirs::home_dir().as_deref())).map_err(write_err)
    }

    pub fn base_deck(&self) -> Result<&Path> {
        self.base_deck_path.as_deref().ok_or(CoreError::NoBaseDeck)
    }

    /// Resolve a user-supplied deck name. Absolute paths are used as is, `.`
    /// or an empty name is the base deck, anything else is a subdirectory of it.
    pub fn resolve_deck_path(&self, deck: &str) -> Result<PathBuf> {
        let deck = deck.trim();
        if Path::new(deck).is_absolute() {
            return Ok(PathBuf::from(deck));
        }
        let base = self.base_deck()?;
        if deck.is_empty() || deck == "." {
            return Ok(base.to_path_buf());
        }
        Ok(base.join(deck))
    }

    /// Resolve a card file path that must stay inside the base deck.
    ///
    /// Relative paths are taken from the base deck and absolute ones must
    /// already point into it. `..` components are refused outright. Symlinks
    /// placed inside the deck are followed like any other deck entry.
    pub fn resolve_card_path(&self, file: &str) -> Result<PathBuf> {
        let path = Path::new(file);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(CoreError::OutsideDeck(path.to_path_buf()));
        }
        let base = self.base_deck()?;
        if !path.is_absolute() {
            return Ok(base.join(path));
        }
        if path.starts_with(base) {
            return Ok(path.to_path_buf());
        }
        match fs::canonicalize(base) {
            Ok(canonical) if path.starts_with(&canonical) => Ok(path.to_path_buf()),
            _ => Err(CoreError::OutsideDeck(path.to_path_buf())),
        }
    }
}

/// Expand a leading `~/` to the current user's home directory.
pub fn expand_user_path(value: &str) -> PathBuf {
    expand_home(value, dirs::home_dir().as_deref())
}

fn expand_home(value: &str, home: Option<&Path>) -> PathBuf {
    match (value.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}

fn collapse_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}
