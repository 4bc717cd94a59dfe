use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No such player unit: {0}")]
    UnknownPlayer(u32),

    #[error("No such adversary: {0}")]
    UnknownAdversary(u32),

    #[error("Battle definition invalid: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Why a player command was rejected
///
/// Command rejection is a normal result value, never a panic; the engine
/// state is untouched when any of these are returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("unit's action gauge is not full")]
    GaugeNotReady,

    #[error("unit cannot act")]
    CannotAct,

    #[error("the required capability is disabled")]
    CapabilityDisabled,

    #[error("not enough mana to cast")]
    InsufficientResource,

    #[error("unit is dead")]
    UnitDead,

    #[error("another command is still charging")]
    AlreadyCharging,

    #[error("no such command slot")]
    UnknownCommand,

    #[error("no such unit")]
    UnknownUnit,
}

pub type Result<T> = std::result::Result<T, EngineError>;
