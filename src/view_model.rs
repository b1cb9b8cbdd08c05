use crate::aggregator::{CatalogAggregator, LoadOutcome};
use crate::error::Result;
use crate::model::CatalogEntry;
use crate::remote::CatalogSource;
use crate::store::EntryStore;
use crate::view_state::{favorites_view, filtered_view, SortDirection, SortOption, TypeFilter, ViewQuery};

pub struct CatalogViewModel<S, T> {
  aggregator: CatalogAggregator<S, T>,
  query: ViewQuery,
  filtered: Vec<CatalogEntry>,
  favorites: Vec<CatalogEntry>,
}

impl<S: CatalogSource, T: EntryStore> CatalogViewModel<S, T> {
  pub fn new(aggregator: CatalogAggregator<S, T>) -> Self {
    let mut view_model = Self {
      aggregator,
      query: ViewQuery::default(),
      filtered: Vec::new(),
      favorites: Vec::new(),
    };
    view_model.recompute();
    view_model
  }

  pub fn pokemon_list(&self) -> &[CatalogEntry] {
    self.aggregator.entries()
  }

  pub fn filtered_pokemon_list(&self) -> &[CatalogEntry] {
    &self.filtered
  }

  pub fn favorited_pokemon(&self) -> &[CatalogEntry] {
    &self.favorites
  }

  pub fn query(&self) -> &ViewQuery {
    &self.query
  }

  pub fn aggregator(&self) -> &CatalogAggregator<S, T> {
    &self.aggregator
  }

  pub fn load_data(&mut self) -> Result<LoadOutcome> {
    let outcome = self.aggregator.load_data();
    self.recompute();
    outcome
  }

  pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
    let value = self.aggregator.toggle_favorite(name)?;
    self.recompute();
    Ok(value)
  }

  pub fn simulate_type_event(&mut self, name: &str, new_types: &[&str]) -> Result<usize> {
    let added = self.aggregator.simulate_type_event(name, new_types)?;
    self.recompute();
    Ok(added)
  }

  pub fn reset(&mut self) -> Result<usize> {
    let removed = self.aggregator.reset()?;
    self.recompute();
    Ok(removed)
  }

  pub fn set_search_text(&mut self, text: impl Into<String>) {
    self.query.search_text = text.into();
    self.recompute();
  }

  pub fn set_type_filter(&mut self, filter: TypeFilter) {
    self.query.type_filter = filter;
    self.recompute();
  }

  pub fn set_sort_option(&mut self, option: SortOption) {
    self.query.sort_option = option;
    self.recompute();
  }

  pub fn set_sort_direction(&mut self, direction: SortDirection) {
    self.query.sort_direction = direction;
    self.recompute();
  }

  fn recompute(&mut self) {
    let entries = self.aggregator.entries();
    self.filtered = filtered_view(entries, &self.query);
    self.favorites = favorites_view(entries);
  }
}
