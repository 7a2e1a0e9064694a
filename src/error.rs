use thiserror::Error;

/// Errors surfaced by the game library.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("save data error: {0}")]
    Save(#[from] serde_json::Error),

    #[error("unknown screen return code {0}")]
    InvalidReturnCode(i32),

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: u32, requested: u32 },

    #[error("draw call out of order: {0}")]
    DrawOrder(&'static str),

    #[error("lane {0} worker disconnected")]
    LaneDisconnected(usize),

    #[error("lane {0} worker panicked")]
    LanePanicked(usize),

    #[error("could not install logger: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
