//! Color palettes and dark-mode persistence.

use anyhow::{Context, Result};
use ratatui::style::Color;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted dark-mode choice inside the state directory.
pub const DARK_MODE_FILE: &str = "dark-mode";

/// Palette for the whole interface. Terminal-palette colors only, so the
/// user's scheme still applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub accept: Color,
    pub reject: Color,
    pub highlight: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color::Black,
            foreground: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            accept: Color::Green,
            reject: Color::Red,
            highlight: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            accept: Color::Green,
            reject: Color::Red,
            highlight: Color::LightBlue,
        }
    }

    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Persists the dark-mode choice between sessions as the literal strings
/// "true" and "false", one value per file.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(DARK_MODE_FILE),
        }
    }

    /// Reads the stored choice. A missing, unreadable, or unrecognized
    /// value means light mode, same as a first run.
    pub fn load(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents == "true",
            Err(_) => false,
        }
    }

    pub fn save(&self, dark: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory {}", parent.display())
            })?;
        }
        let value = if dark { "true" } else { "false" };
        fs::write(&self.path, value)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_state_means_light_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        assert!(!store.load());
    }

    #[test]
    fn saved_value_is_the_literal_string() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());

        store.save(true).unwrap();
        let raw = fs::read_to_string(dir.path().join(DARK_MODE_FILE)).unwrap();
        assert_eq!(raw, "true");
        assert!(store.load());

        store.save(false).unwrap();
        let raw = fs::read_to_string(dir.path().join(DARK_MODE_FILE)).unwrap();
        assert_eq!(raw, "false");
        assert!(!store.load());
    }

    #[test]
    fn unrecognized_contents_fall_back_to_light() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DARK_MODE_FILE), "TRUE\n").unwrap();
        let store = ThemeStore::new(dir.path());
        assert!(!store.load());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("state");
        let store = ThemeStore::new(&nested);
        store.save(true).unwrap();
        assert!(store.load());
    }

    #[test]
    fn palettes_differ_where_it_matters() {
        assert!(Theme::dark().dark);
        assert!(!Theme::light().dark);
        assert_ne!(Theme::dark().background, Theme::light().background);
        assert_eq!(Theme::from_dark_flag(true), Theme::dark());
        assert_eq!(Theme::from_dark_flag(false), Theme::light());
    }
}
