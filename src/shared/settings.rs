use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;

use crate::core::features::unit_converter::{Category, CategoryGroup};
use crate::shared::errors::SettingsError;

const SETTINGS_FILE: &str = "settings.json";
const SCALING_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub enum Appearance {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "settings.ts")]
pub enum Theme {
    #[default]
    Blue,
    DarkBlue,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub enum StartPage {
    #[default]
    Home,
    Converter,
    Calculator,
    Misc,
    Settings,
    About,
}

/// User preferences shared by every front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "settings.ts")]
pub struct AppSettings {
    pub appearance: Appearance,
    pub scaling: f64,
    pub theme: Theme,
    pub start_page: StartPage,
    pub enter_to_convert: bool,
    pub remember_last_category: bool,
    pub default_category_main: String,
    pub default_category_misc: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            appearance: Appearance::System,
            scaling: 1.0,
            theme: Theme::Blue,
            start_page: StartPage::Home,
            enter_to_convert: true,
            remember_last_category: true,
            default_category_main: Category::Length.name().to_string(),
            default_category_misc: Category::Angle.name().to_string(),
        }
    }
}

impl AppSettings {
    pub const KEYS: [&'static str; 8] = [
        "appearance",
        "scaling",
        "theme",
        "start_page",
        "enter_to_convert",
        "remember_last_category",
        "default_category_main",
        "default_category_misc",
    ];

    /// Build settings from a stored document. Missing or invalid fields keep
    /// their defaults.
    pub fn from_value(data: &Value) -> Self {
        let mut settings = Self::default();
        let Some(fields) = data.as_object() else {
            tracing::warn!("settings document is not an object, using defaults");
            return settings;
        };

        for (key, value) in fields {
            if let Err(e) = settings.apply_value(key, value) {
                tracing::warn!(key = %key, error = %e, "ignoring stored setting");
            }
        }
        settings
    }

    /// Set one field from its command-line text form
    pub fn set(&mut self, key: &str, text: &str) -> Result<(), SettingsError> {
        let value = match key {
            "scaling" => text
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .map_err(|_| invalid(key, text))?,
            "enter_to_convert" | "remember_last_category" => text
                .trim()
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|_| invalid(key, text))?,
            _ => Value::String(text.trim().to_string()),
        };
        self.apply_value(key, &value)
    }

    fn apply_value(&mut self, key: &str, value: &Value) -> Result<(), SettingsError> {
        match key {
            "appearance" => self.appearance = parse_choice(key, value)?,
            "theme" => self.theme = parse_choice(key, value)?,
            "start_page" => self.start_page = parse_choice(key, value)?,
            "scaling" => {
                // Stored files may carry the number as text
                let scaling = match value {
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    other => other.as_f64(),
                };
                match scaling {
                    Some(s) if SCALING_RANGE.contains(&s) => self.scaling = s,
                    _ => return Err(invalid(key, &value.to_string())),
                }
            }
            "enter_to_convert" => self.enter_to_convert = parse_bool(key, value)?,
            "remember_last_category" => self.remember_last_category = parse_bool(key, value)?,
            "default_category_main" => {
                self.default_category_main = parse_category(key, value, CategoryGroup::Main)?.name().to_string()
            }
            "default_category_misc" => {
                self.default_category_misc = parse_category(key, value, CategoryGroup::Misc)?.name().to_string()
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Default category for a panel, falling back to the built-in one if the
    /// stored name no longer resolves
    pub fn default_category(&self, group: CategoryGroup) -> Category {
        match group {
            CategoryGroup::Main => Category::from_name(&self.default_category_main).unwrap_or(Category::Length),
            CategoryGroup::Misc => Category::from_name(&self.default_category_misc).unwrap_or(Category::Angle),
        }
    }

    /// Record `category` as its panel's default when remembering is enabled.
    /// Returns true if anything changed.
    pub fn remember_category(&mut self, category: Category) -> bool {
        if !self.remember_last_category {
            return false;
        }
        let slot = match category.group() {
            CategoryGroup::Main => &mut self.default_category_main,
            CategoryGroup::Misc => &mut self.default_category_misc,
        };
        if slot.as_str() == category.name() {
            return false;
        }
        *slot = category.name().to_string();
        true
    }
}

fn invalid(key: &str, value: &str) -> SettingsError {
    SettingsError::InvalidValue { key: key.to_string(), value: value.to_string() }
}

fn parse_choice<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, SettingsError> {
    serde_json::from_value(value.clone()).map_err(|_| invalid(key, &value.to_string()))
}

fn parse_bool(key: &str, value: &Value) -> Result<bool, SettingsError> {
    value.as_bool().ok_or_else(|| invalid(key, &value.to_string()))
}

fn parse_category(key: &str, value: &Value, group: CategoryGroup) -> Result<Category, SettingsError> {
    value
        .as_str()
        .and_then(Category::from_name)
        .filter(|category| category.group() == group)
        .ok_or_else(|| invalid(key, &value.to_string()))
}

/// JSON settings file with atomic saves
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.json` in the per-user config directory
    pub fn default_location() -> Result<Self, SettingsError> {
        ProjectDirs::from("com", "unitcalc", "unit-calc")
            .map(|dirs| Self::new(dirs.config_dir().join(SETTINGS_FILE)))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| SETTINGS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load settings. A missing file gives defaults; an unreadable or corrupt
    /// one is logged and also gives defaults.
    pub async fn load(&self) -> AppSettings {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AppSettings::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read settings, using defaults");
                return AppSettings::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(data) => AppSettings::from_value(&data),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt settings file, using defaults");
                AppSettings::default()
            }
        }
    }

    /// Write to a sibling temp file, sync it, then rename over the target
    pub async fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsError::Write(format!("Failed to create config directory: {}", e)))?;
        }

        let content =
            serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Serialize(e.to_string()))?;

        let tmp_path = self.temp_path();
        if let Err(e) = write_synced(&tmp_path, content.as_bytes(), &self.path).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                tracing::debug!(path = %tmp_path.display(), error = %cleanup, "temp settings file not removed");
            }
            return Err(SettingsError::Write(e.to_string()));
        }

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Overwrite the stored file with defaults
    pub async fn reset(&self) -> Result<AppSettings, SettingsError> {
        let settings = AppSettings::default();
        self.save(&settings).await?;
        tracing::info!(path = %self.path.display(), "settings reset to defaults");
        Ok(settings)
    }
}

async fn write_synced(tmp_path: &Path, content: &[u8], target: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp_path, target).await
}
