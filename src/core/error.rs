use thiserror::Error;

/// Every failure the crate can report.
///
/// All of these surface while loading data or building a roster. Once a
/// combat run has started nothing in the engine returns an error.
#[derive(Error, Debug)]
pub enum EncounterError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Invalid damage dice: {0}")]
    InvalidDice(String),

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("Unknown damage type: {0}")]
    UnknownDamageType(String),

    #[error("Invalid action weights: {0}")]
    InvalidActionWeights(String),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncounterError>;
