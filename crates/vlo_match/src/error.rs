use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed conflict rule '{0}': {1}")]
    MalformedRule(String, String),
}

pub type Result<T> = std::result::Result<T, Error>;
