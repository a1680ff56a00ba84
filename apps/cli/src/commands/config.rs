use anyhow::{bail, Context, Result};
use serde::Serialize;
use srs_core::Config;
use std::fs;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

#[derive(Serialize)]
struct ConfigView<'a> {
    config_path: Option<&'a Path>,
    base_deck: Option<&'a Path>,
    editor: Option<&'a str>,
}

/// Print the configuration, or update it when any option is given.
pub fn run(base_deck: Option<&str>, editor: Option<&str>, format: OutputFormat) -> Result<()> {
    let config_path = Config::default_path().context("no configuration directory on this system")?;
    let mut config = Config::load_from(&config_path)?;

    if base_deck.is_none() && editor.is_none() {
        return show(&config, &config_path, format);
    }

    if let Some(base) = base_deck {
        let path = absolute(&srs_core::config::expand_user_path(base))?;
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            println!("Created directory: {}", path.display());
        } else if !path.is_dir() {
            bail!("{} is not a directory", path.display());
        }
        config.base_deck_path = Some(path);
    }
    if let Some(editor) = editor {
        config.editor = Some(editor.to_string()).filter(|e| !e.trim().is_empty());
    }

    config.save_to(&config_path)?;
    tracing::info!(path = %config_path.display(), "configuration saved");
    println!("Configuration saved to {}", config_path.display());
    Ok(())
}

fn show(config: &Config, config_path: &Path, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let view = ConfigView {
            config_path: Some(config_path),
            base_deck: config.base_deck_path.as_deref(),
            editor: config.editor.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Config file: {}", config_path.display());
    match &config.base_deck_path {
        Some(base) => println!("Base deck:   {}", base.display()),
        None => println!("Base deck:   (not set, use --base-deck)"),
    }
    println!("Editor:      {}", config.editor.as_deref().unwrap_or("(from $EDITOR)"));
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("failed to read working directory")?
        .join(path))
}
