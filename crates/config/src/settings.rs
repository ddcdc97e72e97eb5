// User settings
// Loaded from <config dir>/dailyboard/settings.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot write settings '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no user configuration directory on this platform")]
    NoConfigDir,
}

/// Extra outputs written next to the HTML board on every build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Layout used when `--layout` is not given.
    pub layout: Option<PathBuf>,

    /// Directory for board outputs when `-o` is not given.
    pub output_dir: Option<PathBuf>,

    /// Open the HTML board in the default browser after a build.
    pub open_browser: bool,

    pub formats: Vec<ExportFormat>,
}

const DEFAULT_FILE: &str = r#"# dailyboard settings
#
# Relative paths are resolved against this file's directory.

# layout = "layouts/daily.toml"
# output_dir = "boards"
open_browser = false

# Extra outputs written next to the HTML board: "json", "csv", "xlsx"
formats = []
"#;

impl Settings {
    /// `<config dir>/dailyboard/settings.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dailyboard").join("settings.toml"))
    }

    /// Load from the per-user location; a missing file (or platform without a
    /// config directory) yields defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("no config directory; using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load a settings file. Missing file → defaults. Relative paths inside
    /// are resolved against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("settings '{}' not found; using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = Self::from_toml(&contents).map_err(|message| SettingsError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        log::debug!("loaded settings from '{}'", path.display());

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(settings.resolved_against(base))
    }

    pub fn from_toml(input: &str) -> Result<Self, String> {
        toml::from_str(input).map_err(|e| e.to_string())
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.layout = self.layout.map(resolve);
        self.output_dir = self.output_dir.map(resolve);
        self
    }

    pub fn wants(&self, format: ExportFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Write the commented default file to the per-user location unless one
    /// already exists. Returns the path.
    pub fn create_default_file() -> Result<PathBuf, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, DEFAULT_FILE).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.open_browser);
    }

    #[test]
    fn default_file_parses() {
        let settings = Settings::from_toml(DEFAULT_FILE).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn relative_paths_resolve_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "layout = \"layouts/daily.toml\"\noutput_dir = \"/srv/boards\"\nformats = [\"csv\", \"xlsx\"]\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.layout, Some(dir.path().join("layouts/daily.toml")));
        assert_eq!(settings.output_dir, Some(PathBuf::from("/srv/boards")));
        assert!(settings.wants(ExportFormat::Csv));
        assert!(!settings.wants(ExportFormat::Json));
    }

    #[test]
    fn unknown_format_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "formats = [\"pdf\"]\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("settings.toml"));
    }
}
