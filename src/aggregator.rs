use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::error::{CatalogError, Result};
use crate::model::{CatalogEntry, EntryDetail, EntrySummary};
use crate::remote::CatalogSource;
use crate::store::EntryStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
  Idle,
  Loading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
  pub name: String,
  pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
  pub listed: usize,
  pub merged: usize,
  pub duplicates: usize,
  pub failures: Vec<FetchFailure>,
  pub persist_failures: usize,
  pub store_read_error: Option<String>,
}

impl LoadReport {
  pub fn is_complete(&self) -> bool {
    self.failures.is_empty() && self.persist_failures == 0 && self.store_read_error.is_none()
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
  Cached,
  Restored(usize),
  Fetched(LoadReport),
  AlreadyLoading,
}

pub struct CatalogAggregator<S, T> {
  source: S,
  store: T,
  page_size: usize,
  max_concurrency: usize,
  entries: Vec<CatalogEntry>,
  phase: LoadPhase,
}

impl<S: CatalogSource, T: EntryStore> CatalogAggregator<S, T> {
  pub fn new(source: S, store: T, page_size: usize, max_concurrency: usize) -> Self {
    Self {
      source,
      store,
      page_size,
      max_concurrency: max_concurrency.max(1),
      entries: Vec::new(),
      phase: LoadPhase::Idle,
    }
  }

  pub fn entries(&self) -> &[CatalogEntry] {
    &self.entries
  }

  pub fn phase(&self) -> LoadPhase {
    self.phase
  }

  pub fn store(&self) -> &T {
    &self.store
  }

  pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
    self.entries.iter().find(|entry| entry.name == name)
  }

  pub fn load_data(&mut self) -> Result<LoadOutcome> {
    if self.phase == LoadPhase::Loading {
      log::debug!("load already in progress, ignoring");
      return Ok(LoadOutcome::AlreadyLoading);
    }
    if !self.entries.is_empty() {
      return Ok(LoadOutcome::Cached);
    }

    let mut report = LoadReport::default();
    match self.store.load_all() {
      Ok(rows) => {
        let mut seen = HashSet::new();
        self.entries = rows.into_iter().filter(|row| seen.insert(row.id)).collect();
      }
      Err(error) => {
        log::warn!("reading local store failed, falling back to remote: {}", error);
        report.store_read_error = Some(error.to_string());
      }
    }
    if !self.entries.is_empty() {
      log::info!("restored {} entries from local store", self.entries.len());
      return Ok(LoadOutcome::Restored(self.entries.len()));
    }

    self.phase = LoadPhase::Loading;
    let result = self.fetch_remote(&mut report);
    self.phase = LoadPhase::Idle;
    result?;

    log::info!(
      "fetched catalog: {} listed, {} merged, {} failed",
      report.listed,
      report.merged,
      report.failures.len()
    );
    Ok(LoadOutcome::Fetched(report))
  }

  fn fetch_remote(&mut self, report: &mut LoadReport) -> Result<()> {
    let items = self.source.fetch_list(self.page_size)?;
    report.listed = items.len();

    let entries = &mut self.entries;
    let store = &self.store;
    fan_out_details(&self.source, &items, self.max_concurrency, |summary, result| {
      match result {
        Ok(detail) => {
          let entry = CatalogEntry::from_remote(summary, detail);
          merge_entry(entries, store, entry, report);
        }
        Err(error) => {
          log::warn!("detail fetch for '{}' failed: {}", summary.name, error);
          report.failures.push(FetchFailure {
            name: summary.name.clone(),
            error: error.to_string(),
          });
        }
      }
    });
    Ok(())
  }

  pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
    let current = self.find_by_name(name).map(|entry| entry.is_favorite).unwrap_or(false);
    let target = !current;

    if !self.store.set_favorite(name, target)? {
      log::warn!("favorite toggle: no stored entry named '{}'", name);
      return Err(CatalogError::NotFound(name.to_string()));
    }

    if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
      entry.is_favorite = target;
    }
    Ok(target)
  }

  pub fn reset(&mut self) -> Result<usize> {
    let removed = self.store.clear_all()?;
    self.entries.clear();
    log::info!("cleared {} cached entries", removed);
    Ok(removed)
  }

  pub fn simulate_type_event(&mut self, name: &str, new_types: &[&str]) -> Result<usize> {
    let entry = self
      .entries
      .iter_mut()
      .find(|entry| entry.name == name)
      .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
    let added = entry.append_types(new_types.iter().copied());
    log::debug!("type event for '{}' added {} tags", name, added);
    Ok(added)
  }
}

fn merge_entry<T: EntryStore>(
  entries: &mut Vec<CatalogEntry>,
  store: &T,
  entry: CatalogEntry,
  report: &mut LoadReport,
) {
  if entries.iter().any(|existing| existing.id == entry.id) {
    report.duplicates += 1;
    return;
  }

  if let Err(error) = store.upsert(&entry) {
    log::warn!("persisting '{}' failed: {}", entry.name, error);
    report.persist_failures += 1;
  }
  entries.push(entry);
  report.merged += 1;
}

/// Runs `fetch_detail` for every item on up to `max_workers` scoped threads
/// and hands each result to `on_result` on the calling thread, in
/// completion order.
fn fan_out_details<S, F>(source: &S, items: &[EntrySummary], max_workers: usize, mut on_result: F)
where
  S: CatalogSource,
  F: FnMut(&EntrySummary, Result<EntryDetail>),
{
  if items.is_empty() {
    return;
  }

  let workers = max_workers.clamp(1, items.len());
  let cursor = AtomicUsize::new(0);
  let (sender, receiver) = mpsc::channel();

  thread::scope(|scope| {
    for _ in 0..workers {
      let sender = sender.clone();
      let cursor = &cursor;
      scope.spawn(move || loop {
        let index = cursor.fetch_add(1, Ordering::Relaxed);
        let Some(item) = items.get(index) else {
          break;
        };
        let result = source.fetch_detail(&item.detail_url);
        if sender.send((index, result)).is_err() {
          break;
        }
      });
    }
    drop(sender);

    for (index, result) in receiver {
      on_result(&items[index], result);
    }
  });
}
