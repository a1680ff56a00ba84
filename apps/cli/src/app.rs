use anyhow::{Context, Result};
use srs_core::repository::ROOT_DECK;
use srs_core::{Config, CoreError, ScanWarning};
use std::path::PathBuf;

use crate::OutputFormat;

/// Loaded configuration plus the global output options.
pub struct App {
    pub config: Config,
    pub format: OutputFormat,
    pub use_color: bool,
}

impl App {
    pub fn new(format: OutputFormat, use_color: bool) -> Result<Self> {
        let config = Config::load().context("failed to load config")?;
        Ok(Self::with_config(config, format, use_color))
    }

    pub fn with_config(config: Config, format: OutputFormat, use_color: bool) -> Self {
        Self {
            config,
            format,
            use_color,
        }
    }

    /// Resolve a deck argument and check that it exists.
    pub fn deck_path(&self, deck: Option<&str>) -> Result<PathBuf> {
        let path = self.config.resolve_deck_path(deck.unwrap_or(ROOT_DECK))?;
        if !path.exists() {
            return Err(CoreError::NotFound(path).into());
        }
        Ok(path)
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print scan warnings to stderr.
    pub fn report(&self, warnings: &[ScanWarning]) {
        for warning in warnings {
            eprintln!("Warning: {warning}");
        }
    }

    /// Editor command: configured editor, then `$EDITOR`, then `$VISUAL`.
    pub fn editor(&self) -> String {
        self.config
            .editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.is_empty()))
            .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "vi".to_string())
    }
}
