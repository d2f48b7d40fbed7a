//! CLI Configuration

use formdesk_common::{FormdeskError, FormdeskResult};
use formdesk_forms::{DateFormat, DEFAULT_DISPLAY_FORMAT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::output::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_COLLECTION: &str = "users";

/// Contents of `~/.formdesk/config[.<profile>].toml`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub collection: Option<String>,
    pub schema_path: Option<String>,
    pub date_format: Option<String>,
    pub default_format: Option<String>,
}

/// Everything a records command needs, after flags and file are merged
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub collection: String,
    pub schema_path: Option<String>,
    pub date_format: String,
    pub format: OutputFormat,
}

impl Settings {
    pub fn dates(&self) -> FormdeskResult<DateFormat> {
        DateFormat::new(self.date_format.clone())
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] =
        ["api_url", "collection", "schema_path", "date_format", "default_format"];

    pub fn load(profile: Option<&str>) -> FormdeskResult<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| config_error(&path, e))?;
            toml::from_str(&content).map_err(|e| config_error(&path, e))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> FormdeskResult<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| config_error(parent, e))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| config_error(&path, e))?;
        fs::write(&path, content).map_err(|e| config_error(&path, e))?;
        Ok(path)
    }

    /// Flags win over the file, the file over built-in defaults
    pub fn resolve(self, api_url: Option<String>, format: Option<OutputFormat>) -> Settings {
        let format = format
            .or_else(|| {
                self.default_format
                    .as_deref()
                    .and_then(|f| clap::ValueEnum::from_str(f, true).ok())
            })
            .unwrap_or(OutputFormat::Table);
        Settings {
            api_url: api_url
                .or(self.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            collection: self.collection.unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            schema_path: self.schema_path,
            date_format: self
                .date_format
                .unwrap_or_else(|| DEFAULT_DISPLAY_FORMAT.into()),
            format,
        }
    }

    pub fn get(&self, key: &str) -> FormdeskResult<Option<&str>> {
        let value = match key {
            "api_url" => &self.api_url,
            "collection" => &self.collection,
            "schema_path" => &self.schema_path,
            "date_format" => &self.date_format,
            "default_format" => &self.default_format,
            _ => return Err(FormdeskError::Config(format!("Unknown config key: {key}"))),
        };
        Ok(value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: String) -> FormdeskResult<()> {
        match key {
            "api_url" => self.api_url = Some(value),
            "collection" => self.collection = Some(value),
            "schema_path" => self.schema_path = Some(value),
            "date_format" => {
                DateFormat::new(value.clone())?;
                self.date_format = Some(value);
            }
            "default_format" => {
                <OutputFormat as clap::ValueEnum>::from_str(&value, true)
                    .map_err(|_| FormdeskError::Config(format!("Unknown output format: {value}")))?;
                self.default_format = Some(value);
            }
            _ => return Err(FormdeskError::Config(format!("Unknown config key: {key}"))),
        }
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> FormdeskResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FormdeskError::Config("Cannot find home directory".into()))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".formdesk").join(filename))
    }
}

fn config_error(path: &std::path::Path, err: impl std::fmt::Display) -> FormdeskError {
    FormdeskError::Config(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_win_over_file() {
        let config = Config {
            api_url: Some("http://file:1".into()),
            default_format: Some("yaml".into()),
            ..Default::default()
        };
        let settings = config.resolve(Some("http://flag:2".into()), None);
        assert_eq!(settings.api_url, "http://flag:2");
        assert_eq!(settings.format, OutputFormat::Yaml);
        assert_eq!(settings.collection, DEFAULT_COLLECTION);
        assert_eq!(settings.date_format, DEFAULT_DISPLAY_FORMAT);
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set("date_format", "%Y-%m-%d".into()).is_ok());
        assert!(config.set("default_format", "xml".into()).is_err());
        assert!(config.set("api_key", "x".into()).is_err());
        assert_eq!(config.get("date_format").unwrap(), Some("%Y-%m-%d"));
    }
}
