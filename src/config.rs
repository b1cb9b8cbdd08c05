use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CatalogError, Result};

const CONFIG_ENV: &str = "POKEDEX_CONFIG";
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  pub base_url: String,
  pub page_size: usize,
  /// Upper bound on concurrent detail fetches.
  pub max_concurrency: usize,
  pub db_path: PathBuf,
  pub request_timeout_secs: Option<u64>,
  pub user_agent: String,
  pub log_level: Option<String>,
  pub log_json: bool,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      page_size: DEFAULT_PAGE_SIZE,
      max_concurrency: DEFAULT_PAGE_SIZE,
      db_path: PathBuf::from("pokedex.db"),
      request_timeout_secs: None,
      user_agent: format!("pokedex/{}", env!("CARGO_PKG_VERSION")),
      log_level: Some(String::from("info")),
      log_json: false,
    }
  }
}

impl CatalogConfig {
  pub fn from_sources(cli_path: Option<&Path>) -> Result<Self> {
    if let Some(path) = cli_path {
      if path.as_os_str().is_empty() {
        return Err(CatalogError::Config(
          "configuration path must not be empty".into(),
        ));
      }
    }

    let env_path = std::env::var(CONFIG_ENV).ok();
    let config = if let Some(path) = cli_path {
      Self::load_from_path(path)?
    } else if let Some(path) = env_path.as_deref().filter(|p| !p.is_empty()) {
      Self::load_from_path(path)?
    } else {
      Self::default()
    };

    config.validate()?;
    Ok(config)
  }

  pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| {
      CatalogError::Config(format!("unable to read {}: {}", path.display(), err))
    })?;
    let mut config: CatalogConfig = toml::from_str(&raw)?;
    let base = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));
    config.normalize_paths(&base);
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.base_url.trim().is_empty() {
      return Err(CatalogError::Config("base_url must not be empty".into()));
    }
    if self.page_size == 0 {
      return Err(CatalogError::Config(
        "page_size must be greater than zero".into(),
      ));
    }
    if self.max_concurrency == 0 {
      return Err(CatalogError::Config(
        "max_concurrency must be greater than zero".into(),
      ));
    }
    if self.db_path.as_os_str().is_empty() {
      return Err(CatalogError::Config("db_path must not be empty".into()));
    }
    Ok(())
  }

  fn normalize_paths(&mut self, base: &Path) {
    if self.db_path.is_relative() && !self.db_path.as_os_str().is_empty() {
      self.db_path = base.join(&self.db_path);
    }
  }
}
