use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use treebolic_core::Settings;
use treebolic_core::synthetic::TreeShape;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Engine options: colors, fonts, layout, focus.
    pub engine: Settings,
    pub show_tooltips: bool,
    pub animate_on_start: bool,
    /// Milliseconds the pointer must rest on a node before it is focused
    /// (only when focus on hover is enabled).
    pub long_hover_ms: u64,
    /// Node image keys are resolved against this directory.
    pub image_dir: Option<PathBuf>,
    pub tree: TreeSettings,
}

/// Shape of the demo tree shown at startup and grown at mount points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    pub depth: usize,
    pub fanout: usize,
    pub mount_every: usize,
    pub mount_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            depth: 3,
            fanout: 4,
            mount_every: 5,
            mount_depth: 2,
        }
    }
}

impl TreeSettings {
    pub fn shape(&self) -> TreeShape {
        TreeShape {
            depth: self.depth,
            fanout: self.fanout,
            mount_every: self.mount_every,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            engine: Settings::default(),
            show_tooltips: true,
            animate_on_start: true,
            long_hover_ms: 800,
            image_dir: None,
            tree: TreeSettings::default(),
        }
    }
}

impl AppSettings {
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("treebolic").join("settings.json"))
    }

    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::error!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent()
            && !dir.exists()
        {
            let _ = std::fs::create_dir_all(dir);
        }
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = std::fs::write(path, content) {
                    tracing::error!("Failed to write settings: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = AppSettings::default();
        settings.long_hover_ms = 250;
        settings.engine.focus = Some("n.1".into());
        settings.save_to(&path);
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "show_tooltips": false }"#).unwrap();
        let settings = AppSettings::load_from(&path);
        assert!(!settings.show_tooltips);
        assert_eq!(settings.tree, TreeSettings::default());
    }
}
