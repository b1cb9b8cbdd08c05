//! Pure projections over the catalog collection: search/type filtering,
//! stable sorting and the favorites list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::CatalogEntry;

pub const ALL_TYPES_SENTINEL: &str = "All";

pub const KNOWN_TYPES: &[&str] = &[
  "normal", "fire", "fighting", "water", "flying", "grass", "poison", "electric", "ground",
  "psychic", "rock", "ice", "bug", "dragon", "ghost", "dark", "steel", "fairy",
];

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TypeFilter {
  #[default]
  All,
  Type(String),
}

impl TypeFilter {
  pub fn parse(raw: &str) -> Self {
    if raw.is_empty() || raw.to_lowercase() == ALL_TYPES_SENTINEL.to_lowercase() {
      TypeFilter::All
    } else {
      TypeFilter::Type(raw.to_string())
    }
  }

  pub fn is_known(&self) -> bool {
    match self {
      TypeFilter::All => true,
      TypeFilter::Type(name) => {
        let name = name.to_lowercase();
        KNOWN_TYPES.iter().any(|known| *known == name)
      }
    }
  }

  fn matches(&self, entry: &CatalogEntry) -> bool {
    match self {
      TypeFilter::All => true,
      TypeFilter::Type(name) => entry.has_type(name),
    }
  }
}

impl fmt::Display for TypeFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TypeFilter::All => f.write_str(ALL_TYPES_SENTINEL),
      TypeFilter::Type(name) => f.write_str(name),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOption {
  /// Keep collection order.
  #[default]
  None,
  Name,
  Attack,
  Hp,
}

impl SortOption {
  fn compare(self, left: &CatalogEntry, right: &CatalogEntry) -> Ordering {
    match self {
      SortOption::None => Ordering::Equal,
      SortOption::Name => left.name.cmp(&right.name),
      SortOption::Attack => left.base_stat("attack").cmp(&right.base_stat("attack")),
      SortOption::Hp => left.base_stat("hp").cmp(&right.base_stat("hp")),
    }
  }
}

impl FromStr for SortOption {
  type Err = String;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    match raw.trim().to_lowercase().as_str() {
      "" | "none" => Ok(SortOption::None),
      "name" | "alphabetical" => Ok(SortOption::Name),
      "attack" => Ok(SortOption::Attack),
      "hp" => Ok(SortOption::Hp),
      other => Err(format!("unknown sort option '{}'", other)),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
  pub search_text: String,
  pub type_filter: TypeFilter,
  pub sort_option: SortOption,
  pub sort_direction: SortDirection,
}

impl ViewQuery {
  pub fn matches(&self, entry: &CatalogEntry) -> bool {
    let matches_search = self.search_text.is_empty()
      || entry.name.to_lowercase().contains(&self.search_text.to_lowercase());
    matches_search && self.type_filter.matches(entry)
  }
}

pub fn filter_entries(entries: &[CatalogEntry], query: &ViewQuery) -> Vec<CatalogEntry> {
  entries
    .iter()
    .filter(|entry| query.matches(entry))
    .cloned()
    .collect()
}

/// Stable sort; equal keys keep their relative order in both directions.
pub fn sort_entries(entries: &mut [CatalogEntry], option: SortOption, direction: SortDirection) {
  if option == SortOption::None {
    return;
  }
  entries.sort_by(|left, right| {
    let ordering = option.compare(left, right);
    match direction {
      SortDirection::Ascending => ordering,
      SortDirection::Descending => ordering.reverse(),
    }
  });
}

pub fn filtered_view(entries: &[CatalogEntry], query: &ViewQuery) -> Vec<CatalogEntry> {
  let mut filtered = filter_entries(entries, query);
  sort_entries(&mut filtered, query.sort_option, query.sort_direction);
  filtered
}

pub fn favorites_view(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
  entries
    .iter()
    .filter(|entry| entry.is_favorite)
    .cloned()
    .collect()
}
