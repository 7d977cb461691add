// Centralized error types for Kinetic search URL building
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KineticError {
    #[error("Missing control field '{name}' ({role})")]
    MissingControlField { role: &'static str, name: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, KineticError>;

// Helper conversions
impl From<config::ConfigError> for KineticError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<serde_json::Error> for KineticError {
    fn from(e: serde_json::Error) -> Self { Self::Input(e.to_string()) }
}

impl From<std::io::Error> for KineticError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
