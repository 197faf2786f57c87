use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
