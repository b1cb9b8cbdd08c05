use std::collections::HashMap;

use pokedex_lib::{
  CatalogAggregator, CatalogError, CatalogSource, CatalogViewModel, EntryDetail, EntrySummary, LoadOutcome, Result,
  SortDirection, SortOption, SqliteStore, Stat, TypeFilter,
};
use tempfile::TempDir;

struct StarterSource {
  list: Vec<EntrySummary>,
  details: HashMap<String, EntryDetail>,
}

impl StarterSource {
  fn new() -> Self {
    let mut source = StarterSource {
      list: Vec::new(),
      details: HashMap::new(),
    };
    source.add(4, "charmander", &["fire"], 39, 52);
    source.add(6, "charizard", &["fire", "flying"], 78, 84);
    source.add(7, "squirtle", &["water"], 44, 48);
    source
  }

  fn add(&mut self, number: u32, name: &str, types: &[&str], hp: i64, attack: i64) {
    let url = format!("https://pokeapi.co/api/v2/pokemon/{number}/");
    self.list.push(EntrySummary {
      name: name.to_string(),
      detail_url: url.clone(),
    });
    self.details.insert(
      url,
      EntryDetail {
        image_url: String::new(),
        types: types.iter().map(|t| t.to_string()).collect(),
        stats: vec![Stat::new("hp", hp), Stat::new("attack", attack)],
      },
    );
  }
}

impl CatalogSource for StarterSource {
  fn fetch_list(&self, page_size: usize) -> Result<Vec<EntrySummary>> {
    Ok(self.list.iter().take(page_size).cloned().collect())
  }

  fn fetch_detail(&self, detail_url: &str) -> Result<EntryDetail> {
    self
      .details
      .get(detail_url)
      .cloned()
      .ok_or_else(|| CatalogError::Transport(format!("404 for {detail_url}")))
  }
}

/// Loads the starters one worker at a time so collection order matches
/// list order.
fn loaded_view_model(tmp: &TempDir) -> CatalogViewModel<StarterSource, SqliteStore> {
  let store = SqliteStore::open(tmp.path().join("pokedex.db")).expect("store");
  let aggregator = CatalogAggregator::new(StarterSource::new(), store, 100, 1);
  let mut view_model = CatalogViewModel::new(aggregator);
  assert!(matches!(view_model.load_data().unwrap(), LoadOutcome::Fetched(_)));
  view_model
}

fn names(entries: &[pokedex_lib::CatalogEntry]) -> Vec<&str> {
  entries.iter().map(|entry| entry.name.as_str()).collect()
}

#[test]
fn starts_empty_and_fills_after_load() {
  let tmp = TempDir::new().expect("temp dir");
  let store = SqliteStore::open(tmp.path().join("pokedex.db")).expect("store");
  let mut view_model = CatalogViewModel::new(CatalogAggregator::new(StarterSource::new(), store, 100, 1));
  assert!(view_model.filtered_pokemon_list().is_empty());

  view_model.load_data().unwrap();
  assert_eq!(names(view_model.pokemon_list()), vec!["charmander", "charizard", "squirtle"]);
  assert_eq!(view_model.filtered_pokemon_list(), view_model.pokemon_list());
}

#[test]
fn search_and_type_filter_keep_original_order() {
  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);

  view_model.set_search_text("char");
  view_model.set_type_filter(TypeFilter::parse("fire"));
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["charmander", "charizard"]);

  view_model.set_sort_option(SortOption::Name);
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["charizard", "charmander"]);

  view_model.set_sort_option(SortOption::Hp);
  view_model.set_sort_direction(SortDirection::Descending);
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["charizard", "charmander"]);

  view_model.set_type_filter(TypeFilter::All);
  view_model.set_search_text("");
  view_model.set_sort_option(SortOption::Attack);
  view_model.set_sort_direction(SortDirection::Ascending);
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["squirtle", "charmander", "charizard"]);
}

#[test]
fn favorites_follow_toggles_and_ignore_query() {
  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);
  view_model.set_search_text("char");

  assert!(view_model.toggle_favorite("squirtle").unwrap());
  assert!(view_model.toggle_favorite("charmander").unwrap());
  assert_eq!(names(view_model.favorited_pokemon()), vec!["charmander", "squirtle"]);
  assert!(view_model.filtered_pokemon_list()[0].is_favorite);

  assert!(!view_model.toggle_favorite("squirtle").unwrap());
  assert_eq!(names(view_model.favorited_pokemon()), vec!["charmander"]);
}

#[test]
fn failed_toggle_keeps_projections() {
  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);
  let before = view_model.filtered_pokemon_list().to_vec();

  assert!(matches!(view_model.toggle_favorite("pikachu"), Err(CatalogError::NotFound(_))));
  assert_eq!(view_model.filtered_pokemon_list(), before.as_slice());
  assert!(view_model.favorited_pokemon().is_empty());
}

#[test]
fn type_event_refreshes_the_filtered_view() {
  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);
  view_model.set_type_filter(TypeFilter::parse("fire"));
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["charmander", "charizard"]);

  assert_eq!(view_model.simulate_type_event("squirtle", &["Fire", "water"]).unwrap(), 1);
  assert_eq!(names(view_model.filtered_pokemon_list()), vec!["charmander", "charizard", "squirtle"]);

  assert!(matches!(
    view_model.simulate_type_event("pikachu", &["electric"]),
    Err(CatalogError::NotFound(_))
  ));
}

#[test]
fn reset_empties_every_projection() {
  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);
  view_model.toggle_favorite("charizard").unwrap();

  assert_eq!(view_model.reset().unwrap(), 3);
  assert!(view_model.pokemon_list().is_empty());
  assert!(view_model.filtered_pokemon_list().is_empty());
  assert!(view_model.favorited_pokemon().is_empty());
}

#[test]
fn cli_list_command_renders_filtered_view() {
  use pokedex_lib::cli::{execute, Command};

  let tmp = TempDir::new().expect("temp dir");
  let mut view_model = loaded_view_model(&tmp);
  let command = Command::List {
    search: "char".to_string(),
    type_filter: "fire".to_string(),
    sort: SortOption::Attack,
    desc: true,
  };

  let mut out = Vec::new();
  execute(&command, &mut view_model, &mut out).unwrap();
  let text = String::from_utf8(out).unwrap();
  let lines: Vec<&str> = text.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].contains("charizard"));
  assert!(lines[1].contains("charmander"));

  let mut out = Vec::new();
  execute(&Command::Favorite { name: "squirtle".to_string() }, &mut view_model, &mut out).unwrap();
  assert_eq!(String::from_utf8(out).unwrap(), "squirtle added to favorites\n");
}
