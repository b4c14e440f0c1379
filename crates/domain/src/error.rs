/// Shared error type used across all bridge crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("adapter: {0}")]
    Adapter(String),

    #[error("client not ready")]
    NotReady,

    #[error("already paired")]
    AlreadyPaired,

    #[error("already connected")]
    AlreadyConnected,

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
