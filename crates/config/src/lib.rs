// Configuration loading

pub mod settings;

pub use settings::{ExportFormat, Settings, SettingsError};
