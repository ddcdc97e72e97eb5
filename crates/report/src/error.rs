use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// TOML parse / deserialization error.
    #[error("layout parse error: {0}")]
    Parse(String),
    /// Layout validation error (empty team list, bad locator, etc.).
    #[error("layout validation error: {0}")]
    Validation(String),
    /// Two teams share the same id.
    #[error("duplicate team id: '{0}'")]
    DuplicateTeam(String),
    /// A column mapping names a field outside the section's canonical schema.
    #[error("team '{team}', {section}: unknown field '{field}'")]
    UnknownField { team: String, section: String, field: String },
    /// A column reference could not be parsed.
    #[error("team '{team}', {section}: bad column reference '{value}'")]
    BadColumn { team: String, section: String, value: String },
}
