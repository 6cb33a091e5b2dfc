use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Stored preference wins, then the OS hint, then light.
pub fn resolve(stored: Option<Theme>, os: Option<Theme>) -> Theme {
    stored.or(os).unwrap_or(Theme::Light)
}

/// Terminal colour-scheme hint from `COLORFGBG` ("fg;bg" or "fg;default;bg").
pub fn os_preference() -> Option<Theme> {
    std::env::var("COLORFGBG").ok().and_then(|v| theme_from_colorfgbg(&v))
}

fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(Theme::Dark),
        7 | 9..=15 => Some(Theme::Light),
        _ => None,
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredState {
    theme: Option<Theme>,
}

/// The single persisted key: `theme` in `state.toml`
pub struct ThemeStore {
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// `<config_dir>/nb/state.toml`; no path when the platform has no config dir.
    pub fn default_location() -> Self {
        ThemeStore {
            path: dirs::config_dir().map(|d| d.join("nb").join("state.toml")),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        ThemeStore { path: Some(path.into()) }
    }

    pub fn load(&self) -> Option<Theme> {
        let path = self.path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<StoredState>(&content) {
            Ok(state) => state.theme,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable theme state");
                None
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(&StoredState { theme: Some(theme) })?;
        std::fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

/// Active theme plus where toggles are written
pub struct ThemeController {
    current: Theme,
    store: ThemeStore,
}

impl ThemeController {
    pub fn load(store: ThemeStore, os: Option<Theme>) -> Self {
        let current = resolve(store.load(), os);
        ThemeController { current, store }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme and persist it right away. The in-memory switch happens even if saving fails.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.current = self.current.toggled();
        self.store.save(self.current)?;
        tracing::info!(theme = self.current.label(), "theme changed");
        Ok(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_preference_wins() {
        assert_eq!(resolve(Some(Theme::Light), Some(Theme::Dark)), Theme::Light);
        assert_eq!(resolve(Some(Theme::Dark), None), Theme::Dark);
    }

    #[test]
    fn os_preference_is_fallback() {
        assert_eq!(resolve(None, Some(Theme::Dark)), Theme::Dark);
    }

    #[test]
    fn default_is_light() {
        assert_eq!(resolve(None, None), Theme::Light);
    }

    #[test]
    fn colorfgbg_parsing() {
        assert_eq!(theme_from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(theme_from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(theme_from_colorfgbg("12;default;8"), Some(Theme::Dark));
        assert_eq!(theme_from_colorfgbg("0;7"), Some(Theme::Light));
        assert_eq!(theme_from_colorfgbg("garbage"), None);
        assert_eq!(theme_from_colorfgbg("0;200"), None);
    }

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::at(dir.path().join("nb/state.toml"));
        assert_eq!(store.load(), None);
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Some(Theme::Dark));
    }

    #[test]
    fn corrupt_state_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "theme = \"sepia\"").unwrap();
        let controller = ThemeController::load(ThemeStore::at(&path), Some(Theme::Dark));
        assert_eq!(controller.current(), Theme::Dark);
    }

    #[test]
    fn toggle_writes_every_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        let mut controller = ThemeController::load(ThemeStore::at(&path), None);
        assert_eq!(controller.current(), Theme::Light);

        assert_eq!(controller.toggle().unwrap(), Theme::Dark);
        assert_eq!(ThemeStore::at(&path).load(), Some(Theme::Dark));

        assert_eq!(controller.toggle().unwrap(), Theme::Light);
        assert_eq!(ThemeStore::at(&path).load(), Some(Theme::Light));
    }

    #[test]
    fn toggle_without_location_still_switches() {
        let mut controller = ThemeController {
            current: Theme::Light,
            store: ThemeStore { path: None },
        };
        assert!(controller.toggle().is_err());
        assert_eq!(controller.current(), Theme::Dark);
    }
}
