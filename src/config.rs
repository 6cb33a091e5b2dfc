use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NbConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// [source] section configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Index document, relative to the notes root
    #[serde(default = "default_index")]
    pub index: String,
    /// Syntax used when a file extension is not recognised
    #[serde(default = "default_language")]
    pub language: String,
}

/// [activity] section configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// "owner/repo"; empty = derive from the local checkout's origin remote
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,
}

fn default_true() -> bool {
    true
}

fn default_index() -> String {
    "README.md".into()
}

fn default_language() -> String {
    "cpp".into()
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_repo() -> String {
    "Manraj-Mann/Enhanced-CPP-Notes".into()
}

fn default_per_page() -> u8 {
    10
}

fn default_title() -> String {
    "Enhanced C++ Notes 🚀".into()
}

fn default_subtitle() -> String {
    "A comprehensive guide to modern C++ programming".into()
}

fn default_tab_width() -> u8 {
    4
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            language: default_language(),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_api_url(),
            repo: default_repo(),
            per_page: default_per_page(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            line_numbers: true,
            tab_width: default_tab_width(),
        }
    }
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
            None
        }
    }
}

/// Load config by merging global defaults with per-notes overrides.
/// Priority: `<root>/.nb-config.toml` > global `~/.config/nb/config.toml` > built-in defaults.
/// Merging is deep: individual fields within sections override independently.
pub fn load_config(local_root: Option<&Path>) -> NbConfig {
    let global_path = dirs::config_dir().map(|d| d.join("nb/config.toml"));
    let global_table = global_path.as_deref().and_then(read_table);
    let local_table = local_root.and_then(|root| read_table(&root.join(".nb-config.toml")));
    merge_tables(global_table, local_table)
}

fn merge_tables(
    global: Option<toml::map::Map<String, toml::Value>>,
    local: Option<toml::map::Map<String, toml::Value>>,
) -> NbConfig {
    let merged = match (global, local) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return NbConfig::default(),
    };

    merged.try_into().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config does not match schema, using defaults");
        NbConfig::default()
    })
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), &value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table.clone());
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn defaults_when_nothing_present() {
        let cfg = merge_tables(None, None);
        assert_eq!(cfg.source.index, "README.md");
        assert_eq!(cfg.activity.per_page, 10);
        assert!(cfg.activity.enabled);
        assert_eq!(cfg.display.tab_width, 4);
    }

    #[test]
    fn local_overrides_single_field() {
        let global = table("[activity]\nrepo = \"a/b\"\nper_page = 5\n");
        let local = table("[activity]\nper_page = 3\n");
        let cfg = merge_tables(Some(global), Some(local));
        assert_eq!(cfg.activity.repo, "a/b");
        assert_eq!(cfg.activity.per_page, 3);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = merge_tables(None, Some(table("[display]\ntitle = \"Rust Notes\"\n")));
        assert_eq!(cfg.display.title, "Rust Notes");
        assert!(cfg.display.line_numbers);
        assert_eq!(cfg.source.language, "cpp");
    }

    #[test]
    fn schema_mismatch_falls_back_to_defaults() {
        let cfg = merge_tables(None, Some(table("[activity]\nper_page = \"many\"\n")));
        assert_eq!(cfg.activity.per_page, 10);
    }

    #[test]
    fn reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".nb-config.toml"),
            "[source]\nindex = \"docs/INDEX.md\"\n",
        )
        .unwrap();
        let cfg = load_config(Some(dir.path()));
        assert_eq!(cfg.source.index, "docs/INDEX.md");
    }

    #[test]
    fn invalid_local_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".nb-config.toml"), "not = [valid").unwrap();
        assert!(read_table(&dir.path().join(".nb-config.toml")).is_none());
    }
}
