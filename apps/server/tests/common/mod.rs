//! Common test utilities for integration tests.
//!
//! Each `TestContext` owns a temporary directory holding a base deck seeded
//! with cards, plus a router configured to serve that deck. Files written with
//! `write_outside` sit next to the deck, not in it.

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use axum::Router;
use srs_core::Config;
use tempfile::TempDir;

use srs_server::{router, AppState};

pub struct TestContext {
    dir: TempDir,
    base: PathBuf,
    app: Router,
}

impl TestContext {
    /// Create a context over an empty base deck.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = dir.path().join("deck");
        fs::create_dir(&base).expect("Failed to create base deck");
        let config = Config {
            base_deck_path: Some(base.clone()),
            editor: None,
        };
        let app = router(AppState::new(config));
        Self { dir, base, app }
    }

    /// Create a context seeded with the standard sample deck.
    pub fn with_sample_deck() -> Self {
        let ctx = Self::new();
        ctx.write_card("basics.md", fixtures::NEW_CARD);
        ctx.write_card("spanish/verbs.md", fixtures::NEW_CARD);
        ctx.write_card("spanish/later.md", &fixtures::review_card("2099-01-01T00:00:00Z"));
        ctx.write_card("spanish/grammar/subjunctive.md", &fixtures::learning_card("2020-01-01T00:00:00Z"));
        ctx
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.base.join(rel)
    }

    /// Write a file beside the base deck and return its path.
    pub fn write_outside(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_card(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read_card(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }
}

/// Router with no base deck configured.
pub fn unconfigured_router() -> Router {
    router(AppState::new(Config::default()))
}
