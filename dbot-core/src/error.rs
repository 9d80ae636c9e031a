use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbotError>;
