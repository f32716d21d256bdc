// ⚙️ Settings - where the data files live and how wide the rating table is
//
// Loaded from an optional JSON file, then overridden by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ratings::DEFAULT_MAX_BOOKS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Book file (`author,title,year` per line). Prompted for when absent.
    #[serde(default)]
    pub book_file: Option<PathBuf>,

    /// Member/rating file (name line, then ratings line). Prompted for when absent.
    #[serde(default)]
    pub ratings_file: Option<PathBuf>,

    /// Maximum number of books each member can rate
    #[serde(default = "Settings::default_max_books")]
    pub max_books: usize,
}

impl Settings {
    fn default_max_books() -> usize {
        DEFAULT_MAX_BOOKS
    }

    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse settings JSON")
    }

    /// Replace any field for which an override is given
    pub fn with_overrides(
        mut self,
        book_file: Option<PathBuf>,
        ratings_file: Option<PathBuf>,
        max_books: Option<usize>,
    ) -> Self {
        if book_file.is_some() {
            self.book_file = book_file;
        }
        if ratings_file.is_some() {
            self.ratings_file = ratings_file;
        }
        if let Some(max_books) = max_books {
            self.max_books = max_books;
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            book_file: None,
            ratings_file: None,
            max_books: Self::default_max_books(),
        }
    }
}
