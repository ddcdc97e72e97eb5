//! Locating and loading the layout file shared by every command.

use std::path::{Path, PathBuf};

use dailyboard_config::Settings;
use dailyboard_report::config::TeamLayout;
use dailyboard_report::Layout;

use crate::exit_codes::{EXIT_LAYOUT_INVALID, EXIT_USAGE};
use crate::CliError;

pub(crate) struct LoadedLayout {
    pub layout: Layout,
    pub path: PathBuf,
}

impl LoadedLayout {
    /// Team files are resolved relative to the layout file's directory.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn team_file(&self, team: &TeamLayout) -> Option<PathBuf> {
        team.file.as_ref().map(|f| self.base_dir().join(f))
    }
}

/// `--layout` (or `DAILYBOARD_LAYOUT`) first, then the settings file.
pub(crate) fn resolve_layout_path(flag: Option<PathBuf>, settings: &Settings) -> Result<PathBuf, CliError> {
    flag.or_else(|| settings.layout.clone()).ok_or_else(|| {
        CliError::usage("no layout given").with_hint("pass --layout <file>, or create one with `dailyboard init`")
    })
}

pub(crate) fn load_layout(path: &Path) -> Result<LoadedLayout, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("cannot read layout '{}': {e}", path.display())))?;
    let layout = Layout::from_toml(&text).map_err(|e| CliError {
        code: EXIT_LAYOUT_INVALID,
        message: format!("{}: {e}", path.display()),
        hint: None,
    })?;
    log::info!("layout '{}' ({} teams) from '{}'", layout.name, layout.teams.len(), path.display());
    Ok(LoadedLayout {
        layout,
        path: path.to_path_buf(),
    })
}

/// Parse a repeated `--team id=path` value.
pub(crate) fn parse_team_arg(arg: &str) -> Result<(String, PathBuf), CliError> {
    match arg.split_once('=') {
        Some((id, path)) if !id.trim().is_empty() && !path.trim().is_empty() => {
            Ok((id.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(CliError {
            code: EXIT_USAGE,
            message: format!("invalid --team value '{arg}'"),
            hint: Some("expected ID=PATH, e.g. --team heavy=reports/heavy.xlsx".into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_arg_parsing() {
        let (id, path) = parse_team_arg("heavy=in/중량물.xlsx").unwrap();
        assert_eq!(id, "heavy");
        assert_eq!(path, PathBuf::from("in/중량물.xlsx"));

        assert_eq!(parse_team_arg("heavy").unwrap_err().code, EXIT_USAGE);
        assert_eq!(parse_team_arg("=a.xlsx").unwrap_err().code, EXIT_USAGE);
        assert_eq!(parse_team_arg("dock=").unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn layout_flag_wins_over_settings() {
        let settings = Settings {
            layout: Some(PathBuf::from("/etc/dailyboard/layout.toml")),
            ..Default::default()
        };
        let path = resolve_layout_path(Some(PathBuf::from("mine.toml")), &settings).unwrap();
        assert_eq!(path, PathBuf::from("mine.toml"));
        let path = resolve_layout_path(None, &settings).unwrap();
        assert_eq!(path, PathBuf::from("/etc/dailyboard/layout.toml"));
        let err = resolve_layout_path(None, &Settings::default()).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.is_some());
    }

    #[test]
    fn team_files_relative_to_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, dailyboard_report::config::STARTER_LAYOUT).unwrap();
        let loaded = load_layout(&path).unwrap();
        let heavy = loaded.layout.team("heavy").unwrap();
        assert_eq!(loaded.team_file(heavy), Some(dir.path().join("heavy.xlsx")));
    }

    #[test]
    fn invalid_layout_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "name = \"x\"\nteams = []\n").unwrap();
        assert_eq!(load_layout(&path).err().map(|e| e.code), Some(EXIT_LAYOUT_INVALID));
        assert_eq!(load_layout(&dir.path().join("none.toml")).err().map(|e| e.code), Some(EXIT_USAGE));
    }
}
