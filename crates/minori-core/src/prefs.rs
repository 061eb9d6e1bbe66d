//! User preference resolution and persistence.
//!
//! Two preferences exist: UI theme and NSFW content visibility. Each is
//! resolved from three sources in priority order (server-provided value for
//! authenticated users, locally persisted choice, system/default) and
//! persisted locally only on an explicit user decision.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

/// Outcome of NSFW preference resolution.
///
/// `prompt_needed` is set when no source decided, meaning the consent dialog
/// should be shown once; until the user answers, `allowed` stays `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NsfwResolution {
    pub allowed: bool,
    pub prompt_needed: bool,
}

/// Resolve the NSFW preference. The server value is authoritative for
/// authenticated users and the local choice is ignored entirely.
pub fn resolve_nsfw(
    authenticated: bool,
    server_flag: bool,
    local_choice: Option<bool>,
) -> NsfwResolution {
    if authenticated {
        NsfwResolution {
            allowed: server_flag,
            prompt_needed: false,
        }
    } else if let Some(choice) = local_choice {
        NsfwResolution {
            allowed: choice,
            prompt_needed: false,
        }
    } else {
        NsfwResolution {
            allowed: false,
            prompt_needed: true,
        }
    }
}

/// Resolve the theme: persisted value, then the OS-level signal, then light.
/// Runs before first paint so the page never flashes the wrong theme.
pub fn resolve_theme(saved: Option<Theme>, system: Option<Theme>) -> Theme {
    saved.or(system).unwrap_or_default()
}

/// OS-level color scheme signal.
pub fn system_theme() -> Option<Theme> {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => Some(Theme::Dark),
        Ok(dark_light::Mode::Light) => Some(Theme::Light),
        _ => None,
    }
}

/// What gets written to disk. Both fields are tri-state: absent means the
/// user never made a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredPrefs {
    #[serde(default)]
    theme: Option<Theme>,
    #[serde(default)]
    nsfw_choice: Option<bool>,
}

/// Local preference file, the browser-storage analog.
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    prefs: StoredPrefs,
}

impl PrefStore {
    /// Load from the platform config dir. A missing or unreadable file
    /// falls back to defaults; preferences are never load-bearing.
    pub fn load() -> Self {
        Self::load_from(Self::prefs_path())
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "preference file unreadable, using defaults");
                StoredPrefs::default()
            }),
            Err(_) => StoredPrefs::default(),
        };
        Self { path, prefs }
    }

    /// Path to the preference file (XDG on Linux, AppData on Windows).
    pub fn prefs_path() -> PathBuf {
        ProjectDirs::from("", "", "minori")
            .map(|d| d.config_dir().join("prefs.toml"))
            .unwrap_or_else(|| PathBuf::from("prefs.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn theme(&self) -> Option<Theme> {
        self.prefs.theme
    }

    pub fn nsfw_choice(&self) -> Option<bool> {
        self.prefs.nsfw_choice
    }

    /// Theme toggles always persist; switching is an explicit action.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PrefsError> {
        self.prefs.theme = Some(theme);
        self.save()
    }

    /// Apply the consent dialog's answer. The choice takes effect in memory
    /// immediately; it is written to disk only when the user asked to be
    /// remembered. Returns the now-effective NSFW setting.
    pub fn apply_nsfw_choice(&mut self, allow: bool, remember: bool) -> Result<bool, PrefsError> {
        if remember {
            self.prefs.nsfw_choice = Some(allow);
            self.save()?;
        }
        Ok(allow)
    }

    fn save(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(&self.prefs).map_err(|e| PrefsError::Config(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_wins_for_authenticated_users() {
        // Local storage says yes, server says no: server is authoritative.
        let r = resolve_nsfw(true, false, Some(true));
        assert!(!r.allowed);
        assert!(!r.prompt_needed);
    }

    #[test]
    fn local_choice_wins_for_anonymous_users() {
        let r = resolve_nsfw(false, true, Some(true));
        assert!(r.allowed);
        assert!(!r.prompt_needed);

        let r = resolve_nsfw(false, false, Some(false));
        assert!(!r.allowed);
    }

    #[test]
    fn unset_defaults_to_safe_and_prompts_once() {
        let r = resolve_nsfw(false, false, None);
        assert!(!r.allowed);
        assert!(r.prompt_needed);
    }

    #[test]
    fn theme_resolution_order() {
        assert_eq!(
            resolve_theme(Some(Theme::Dark), Some(Theme::Light)),
            Theme::Dark
        );
        assert_eq!(resolve_theme(None, Some(Theme::Dark)), Theme::Dark);
        assert_eq!(resolve_theme(None, None), Theme::Light);
    }

    #[test]
    fn nsfw_choice_persists_only_when_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let mut store = PrefStore::load_from(&path);
        assert_eq!(store.nsfw_choice(), None);

        // Not remembered: effective in memory, nothing written.
        assert!(store.apply_nsfw_choice(true, false).unwrap());
        assert!(!path.exists());
        assert_eq!(store.nsfw_choice(), None);

        // Remembered: round-trips through the file.
        assert!(store.apply_nsfw_choice(true, true).unwrap());
        let reloaded = PrefStore::load_from(&path);
        assert_eq!(reloaded.nsfw_choice(), Some(true));
    }

    #[test]
    fn theme_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let mut store = PrefStore::load_from(&path);
        store.set_theme(Theme::Dark).unwrap();

        let reloaded = PrefStore::load_from(&path);
        assert_eq!(reloaded.theme(), Some(Theme::Dark));
        assert_eq!(reloaded.nsfw_choice(), None);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let store = PrefStore::load_from(&path);
        assert_eq!(store.theme(), None);
        assert_eq!(store.nsfw_choice(), None);
    }
}
