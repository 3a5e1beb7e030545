use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

use crate::history::HistorySettings;
use crate::keyboard::KeyboardToPadMap;
use crate::macros::{DEFAULT_THEME, MacroTable, ThemeTemplate};
use crate::mapping::InputMap;
use crate::socd::{DirectionSources, SocdMode};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub socd: SocdMode,
    #[serde(default = "default_enabled_directions")]
    pub enabled_directions: Vec<String>,
    /// Derived from the window geometry when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
    #[serde(default = "default_space_between_inputs")]
    pub space_between_inputs: u32,
    #[serde(default = "default_space_between_commands")]
    pub space_between_commands: u32,
    #[serde(default = "default_true")]
    pub auto_correct_multiple: bool,
    #[serde(default = "default_true")]
    pub shadow_holding: bool,
    #[serde(default)]
    pub hide_button_release: bool,
    #[serde(default)]
    pub invert_history: bool,
    #[serde(default = "default_true")]
    pub show_frames: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub macros: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub input_map: InputMap,
    #[serde(default)]
    pub keyboard: KeyboardToPadMap,
}

fn default_enabled_directions() -> Vec<String> {
    DirectionSources::all().names()
}
fn default_width() -> u32 {
    480
}
fn default_height() -> u32 {
    1024
}
fn default_icon_size() -> u32 {
    40
}
fn default_space_between_inputs() -> u32 {
    2
}
fn default_space_between_commands() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            socd: SocdMode::default(),
            enabled_directions: default_enabled_directions(),
            max_entries: None,
            width: default_width(),
            height: default_height(),
            icon_size: default_icon_size(),
            space_between_inputs: default_space_between_inputs(),
            space_between_commands: default_space_between_commands(),
            auto_correct_multiple: true,
            shadow_holding: true,
            hide_button_release: false,
            invert_history: false,
            show_frames: true,
            theme: default_theme(),
            macros: BTreeMap::new(),
            input_map: InputMap::default(),
            keyboard: KeyboardToPadMap::default(),
        }
    }
}

impl AppConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            log::info!("Created default config at {}", path.as_ref().display());
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;

        if config.icon_size < 1 {
            log::warn!("icon_size {} is too small, using 1", config.icon_size);
            config.icon_size = 1;
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let mut result = String::from(
            "# socd: Neutral, UpPriority, LastPriority or Bypass\n\
             # enabled_directions: any of \"DPad\", \"LeftAnalog\", \"RightAnalog\"\n\
             # max_entries: history length; derived from the window size when omitted\n\
             # hide_button_release: only show entries with a fresh input\n\
             # shadow_holding: draw held buttons dimmed instead of hiding them\n\
             # theme: built-in button layout used to expand macro buttons\n\
             # [macros]: per-button overrides, e.g. PP = [\"LP\", \"MP\", \"HP\"]\n\
             # [input_map.<device>]: physical control bound to each button, \"None\" to unmap\n\n",
        );
        result.push_str(&toml::to_string_pretty(self)?);

        fs::write(path, result)?;
        Ok(())
    }

    /// History length, either explicit or as many icon rows as fit the
    /// longer window side, doubled.
    pub fn max_entries(&self) -> usize {
        if let Some(max) = self.max_entries {
            return max;
        }

        let window = self.width.max(self.height) as f64;
        let spacing = self.space_between_commands as f64 + self.space_between_inputs as f64;
        let row = self.space_between_commands as f64 + self.icon_size as f64;

        (((window - spacing) / row) * 2.0).ceil().max(0.0) as usize
    }

    /// Enabled sources; unknown names are skipped.
    pub fn direction_sources(&self) -> DirectionSources {
        self.enabled_directions
            .iter()
            .fold(DirectionSources::NONE, |acc, name| {
                match DirectionSources::parse_name(name) {
                    Ok(source) => acc | source,
                    Err(e) => {
                        log::warn!("Ignoring direction source: {e}");
                        acc
                    }
                }
            })
    }

    pub fn custom_macros(&self) -> MacroTable {
        MacroTable::from_names(&self.macros)
    }

    pub fn theme(&self) -> Option<&'static ThemeTemplate> {
        let theme = ThemeTemplate::find(&self.theme);
        if theme.is_none() {
            log::warn!("Unknown theme {:?}, macros fall back to identity", self.theme);
        }
        theme
    }

    /// Values the per-frame core reads.
    pub fn history_settings(&self) -> HistorySettings {
        HistorySettings {
            socd: self.socd,
            sources: self.direction_sources(),
            max_entries: self.max_entries(),
            auto_correct_multiple: self.auto_correct_multiple,
            hide_button_release: self.hide_button_release,
            shadow_holding: self.shadow_holding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_entries_from_geometry() {
        let config = AppConfig::default();
        // (1024 - 6) / 44 * 2 = 46.27
        assert_eq!(config.max_entries(), 47);
    }

    #[test]
    fn test_max_entries_uses_longer_side() {
        let config = AppConfig {
            width: 2000,
            height: 100,
            ..Default::default()
        };
        // (2000 - 6) / 44 * 2 = 90.6
        assert_eq!(config.max_entries(), 91);
    }

    #[test]
    fn test_explicit_max_entries() {
        let config = AppConfig {
            max_entries: Some(3),
            ..Default::default()
        };
        assert_eq!(config.max_entries(), 3);
        assert_eq!(config.history_settings().max_entries, 3);
    }

    #[test]
    fn test_tiny_window_yields_zero() {
        let config = AppConfig {
            width: 2,
            height: 2,
            ..Default::default()
        };
        assert_eq!(config.max_entries(), 0);
    }

    #[test]
    fn test_huge_spacing_does_not_overflow() {
        let config = AppConfig {
            space_between_commands: u32::MAX,
            space_between_inputs: u32::MAX,
            icon_size: u32::MAX,
            ..Default::default()
        };
        assert_eq!(config.max_entries(), 0);
    }

    #[test]
    fn test_direction_sources_skip_unknown() {
        let config = AppConfig {
            enabled_directions: vec!["DPad".into(), "Mouse".into()],
            ..Default::default()
        };
        assert_eq!(config.direction_sources(), DirectionSources::DPAD);

        let config = AppConfig {
            enabled_directions: vec![],
            ..Default::default()
        };
        assert_eq!(config.direction_sources(), DirectionSources::NONE);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: AppConfig = toml::from_str("socd = \"LastPriority\"").unwrap();
        assert_eq!(config.socd, SocdMode::LastPriority);
        assert_eq!(config.theme, DEFAULT_THEME);
        assert_eq!(config.direction_sources(), DirectionSources::all());
        assert!(config.auto_correct_multiple);
        assert!(config.show_frames);
        assert!(!config.hide_button_release);
    }

    #[test]
    fn test_unknown_theme() {
        let config = AppConfig {
            theme: "Pong".into(),
            ..Default::default()
        };
        assert!(config.theme().is_none());
        assert!(AppConfig::default().theme().is_some());
    }
}
