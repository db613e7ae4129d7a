use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Protocol errors
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Message encoding failed: {0}")]
    MessageEncoding(String),

    // Connection errors
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected to peripheral service")]
    NotConnected,

    // Validation errors
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("Invalid access token: {0}")]
    InvalidAccessToken(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
