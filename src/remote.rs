use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::model::{DetailResponse, EntryDetail, EntrySummary, ListResponse};

/// Implementations are shared across the detail fan-out workers.
pub trait CatalogSource: Send + Sync {
  fn fetch_list(&self, page_size: usize) -> Result<Vec<EntrySummary>>;

  fn fetch_detail(&self, detail_url: &str) -> Result<EntryDetail>;
}

pub struct PokeApiClient {
  client: Client,
  base_url: String,
  user_agent: String,
}

impl PokeApiClient {
  pub fn new(config: &CatalogConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(seconds) = config.request_timeout_secs {
      builder = builder.timeout(Duration::from_secs(seconds));
    }
    let client = builder.build()?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      user_agent: config.user_agent.clone(),
    })
  }

  pub fn list_url(&self, page_size: usize) -> String {
    format!("{}/pokemon?limit={}", self.base_url, page_size)
  }

  fn get(&self, url: &str) -> Result<Response> {
    let response = self
      .client
      .get(url)
      .header(USER_AGENT, self.user_agent.as_str())
      .header(ACCEPT, "application/json")
      .send()?;

    if !response.status().is_success() {
      return Err(CatalogError::Transport(format!(
        "GET {} failed with status {}",
        url,
        response.status()
      )));
    }

    Ok(response)
  }
}

impl CatalogSource for PokeApiClient {
  fn fetch_list(&self, page_size: usize) -> Result<Vec<EntrySummary>> {
    let url = self.list_url(page_size);
    log::debug!("fetching catalog list from {}", url);
    let parsed: ListResponse = self.get(&url)?.json()?;
    Ok(parsed.into_summaries())
  }

  fn fetch_detail(&self, detail_url: &str) -> Result<EntryDetail> {
    let parsed: DetailResponse = self.get(detail_url)?.json()?;
    Ok(parsed.into_detail())
  }
}
