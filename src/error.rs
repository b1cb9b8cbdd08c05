use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("transport error: {0}")]
  Transport(String),
  #[error("decode error: {0}")]
  Decode(String),
  #[error("store error: {0}")]
  Store(String),
  #[error("no stored entry named '{0}'")]
  NotFound(String),
  #[error("configuration error: {0}")]
  Config(String),
  #[error("writing output failed: {0}")]
  Output(String),
  #[error("logger initialization failed: {0}")]
  Logger(String),
}

impl From<reqwest::Error> for CatalogError {
  fn from(error: reqwest::Error) -> Self {
    if error.is_decode() {
      CatalogError::Decode(error.to_string())
    } else {
      CatalogError::Transport(error.to_string())
    }
  }
}

impl From<serde_json::Error> for CatalogError {
  fn from(error: serde_json::Error) -> Self {
    CatalogError::Decode(error.to_string())
  }
}

impl From<rusqlite::Error> for CatalogError {
  fn from(error: rusqlite::Error) -> Self {
    CatalogError::Store(error.to_string())
  }
}

impl From<io::Error> for CatalogError {
  fn from(error: io::Error) -> Self {
    CatalogError::Store(error.to_string())
  }
}

impl From<toml::de::Error> for CatalogError {
  fn from(error: toml::de::Error) -> Self {
    CatalogError::Config(error.to_string())
  }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
