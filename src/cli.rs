use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aggregator::LoadOutcome;
use crate::error::{CatalogError, Result};
use crate::model::CatalogEntry;
use crate::remote::CatalogSource;
use crate::store::EntryStore;
use crate::view_model::CatalogViewModel;
use crate::view_state::{SortDirection, SortOption, TypeFilter, KNOWN_TYPES};

#[derive(Parser, Debug)]
#[command(name = "pokedex", version, about = "Browse, filter and favorite the Pokémon catalog")]
pub struct Cli {
  /// Path to a TOML config file (falls back to $POKEDEX_CONFIG).
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Override the SQLite cache location.
  #[arg(long, global = true)]
  pub db: Option<PathBuf>,

  #[arg(long, global = true)]
  pub page_size: Option<usize>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Load the catalog from cache or the remote API and report what happened.
  Sync,
  /// Print the filtered and sorted list.
  List {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long = "type", default_value = "All")]
    type_filter: String,
    #[arg(long, default_value = "none")]
    sort: SortOption,
    #[arg(long)]
    desc: bool,
  },
  /// Toggle the favorite flag on an entry.
  Favorite { name: String },
  Favorites,
  Show { name: String },
  /// List the known type filters.
  Types,
  /// Delete every cached entry.
  Reset,
}

pub fn execute<S, T, W>(command: &Command, view_model: &mut CatalogViewModel<S, T>, out: &mut W) -> Result<()>
where
  S: CatalogSource,
  T: EntryStore,
  W: Write,
{
  match command {
    Command::Sync => {
      let outcome = view_model.load_data()?;
      writeln!(out, "{}", describe_outcome(&outcome)).map_err(output_error)?;
    }
    Command::List {
      search,
      type_filter,
      sort,
      desc,
    } => {
      let filter = TypeFilter::parse(type_filter);
      if !filter.is_known() {
        log::warn!("type '{}' is not a known catalog type", filter);
      }
      view_model.load_data()?;
      view_model.set_search_text(search.as_str());
      view_model.set_type_filter(filter);
      view_model.set_sort_option(*sort);
      view_model.set_sort_direction(if *desc {
        SortDirection::Descending
      } else {
        SortDirection::Ascending
      });
      write_entries(out, view_model.filtered_pokemon_list())?;
    }
    Command::Favorite { name } => {
      view_model.load_data()?;
      let value = view_model.toggle_favorite(name)?;
      let verb = if value { "added to" } else { "removed from" };
      writeln!(out, "{} {} favorites", name, verb).map_err(output_error)?;
    }
    Command::Favorites => {
      view_model.load_data()?;
      write_entries(out, view_model.favorited_pokemon())?;
    }
    Command::Show { name } => {
      view_model.load_data()?;
      let entry = view_model
        .aggregator()
        .find_by_name(name)
        .ok_or_else(|| CatalogError::NotFound(name.clone()))?;
      write!(out, "{}", render_detail(entry)).map_err(output_error)?;
    }
    Command::Types => {
      for name in KNOWN_TYPES {
        writeln!(out, "{}", name).map_err(output_error)?;
      }
    }
    Command::Reset => {
      let removed = view_model.reset()?;
      writeln!(out, "removed {} cached entries", removed).map_err(output_error)?;
    }
  }
  Ok(())
}

pub fn describe_outcome(outcome: &LoadOutcome) -> String {
  match outcome {
    LoadOutcome::Cached => "catalog already loaded".to_string(),
    LoadOutcome::Restored(count) => format!("restored {} entries from local cache", count),
    LoadOutcome::AlreadyLoading => "a load is already in progress".to_string(),
    LoadOutcome::Fetched(report) => {
      let mut text = format!(
        "fetched {} of {} entries ({} duplicates skipped)",
        report.merged, report.listed, report.duplicates
      );
      for failure in &report.failures {
        text.push_str(&format!("\n  failed: {} ({})", failure.name, failure.error));
      }
      if report.persist_failures > 0 {
        text.push_str(&format!("\n  {} entries were not cached", report.persist_failures));
      }
      if let Some(error) = &report.store_read_error {
        text.push_str(&format!("\n  local cache unreadable: {}", error));
      }
      text
    }
  }
}

pub fn render_line(entry: &CatalogEntry) -> String {
  let heart = if entry.is_favorite { "♥" } else { " " };
  format!("{} {:<12} {}", heart, entry.name, entry.types.join("/"))
}

pub fn render_detail(entry: &CatalogEntry) -> String {
  let mut text = format!("{}\n", entry.name);
  if !entry.image_url.is_empty() {
    text.push_str(&format!("image: {}\n", entry.image_url));
  }
  text.push_str(&format!("types: {}\n", entry.types.join(", ")));
  text.push_str("stats:\n");
  for stat in &entry.stats {
    text.push_str(&format!("  {:<16} {:>3}\n", stat.stat_name, stat.base_stat));
  }
  if entry.is_favorite {
    text.push_str("favorite\n");
  }
  text
}

fn write_entries<W: Write>(out: &mut W, entries: &[CatalogEntry]) -> Result<()> {
  for entry in entries {
    writeln!(out, "{}", render_line(entry)).map_err(output_error)?;
  }
  Ok(())
}

fn output_error(error: io::Error) -> CatalogError {
  CatalogError::Output(error.to_string())
}
