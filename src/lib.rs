pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod remote;
pub mod store;
pub mod view_model;
pub mod view_state;

use std::io;

use clap::Parser;

pub use aggregator::{CatalogAggregator, FetchFailure, LoadOutcome, LoadPhase, LoadReport};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use model::{entry_id_from_url, CatalogEntry, EntryDetail, EntrySummary, Stat};
pub use remote::{CatalogSource, PokeApiClient};
pub use store::{EntryStore, SqliteStore};
pub use view_model::CatalogViewModel;
pub use view_state::{SortDirection, SortOption, TypeFilter, ViewQuery};

pub fn run() -> Result<()> {
  let cli = cli::Cli::parse();

  let mut config = CatalogConfig::from_sources(cli.config.as_deref())?;
  if let Some(db_path) = &cli.db {
    config.db_path = db_path.clone();
  }
  if let Some(page_size) = cli.page_size {
    config.page_size = page_size;
  }
  config.validate()?;

  logging::init_logging(&config)?;
  log::debug!("using cache at {}", config.db_path.display());

  let store = SqliteStore::open(&config.db_path)?;
  let source = PokeApiClient::new(&config)?;
  let aggregator = CatalogAggregator::new(source, store, config.page_size, config.max_concurrency);
  let mut view_model = CatalogViewModel::new(aggregator);

  let stdout = io::stdout();
  let mut out = stdout.lock();
  cli::execute(&cli.command, &mut view_model, &mut out)
}
