use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
  pub stat_name: String,
  pub base_stat: i64,
}

impl Stat {
  pub fn new(stat_name: impl Into<String>, base_stat: i64) -> Self {
    Self {
      stat_name: stat_name.into(),
      base_stat,
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
  pub id: i64,
  pub name: String,
  pub image_url: String,
  pub types: Vec<String>,
  pub stats: Vec<Stat>,
  pub is_favorite: bool,
}

impl CatalogEntry {
  pub fn from_remote(summary: &EntrySummary, detail: EntryDetail) -> Self {
    Self {
      id: entry_id_from_url(&summary.detail_url),
      name: summary.name.clone(),
      image_url: detail.image_url,
      types: detail.types,
      stats: detail.stats,
      is_favorite: false,
    }
  }

  pub fn base_stat(&self, stat_name: &str) -> i64 {
    self
      .stats
      .iter()
      .find(|stat| stat.stat_name == stat_name)
      .map(|stat| stat.base_stat)
      .unwrap_or(0)
  }

  pub fn has_type(&self, type_name: &str) -> bool {
    let wanted = type_name.to_lowercase();
    self.types.iter().any(|tag| tag.to_lowercase() == wanted)
  }

  /// Appends tags not already present, keeping existing order. Returns how
  /// many were added.
  pub fn append_types<I, T>(&mut self, new_types: I) -> usize
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let mut added = 0;
    for tag in new_types {
      let tag: String = tag.into();
      let tag = tag.trim();
      if tag.is_empty() || self.has_type(tag) {
        continue;
      }
      self.types.push(tag.to_string());
      added += 1;
    }
    added
  }
}

/// Stable identifier for a detail URL: the first 8 bytes of its SHA-256
/// digest, big-endian, masked to a non-negative i64.
pub fn entry_id_from_url(detail_url: &str) -> i64 {
  let digest = Sha256::digest(detail_url.trim().as_bytes());
  let mut bytes = [0u8; 8];
  bytes.copy_from_slice(&digest[..8]);
  (u64::from_be_bytes(bytes) & i64::MAX as u64) as i64
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrySummary {
  pub name: String,
  pub detail_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EntryDetail {
  pub image_url: String,
  pub types: Vec<String>,
  pub stats: Vec<Stat>,
}

#[derive(Deserialize)]
pub(crate) struct ListResponse {
  results: Vec<ListItem>,
}

#[derive(Deserialize)]
struct ListItem {
  name: String,
  url: String,
}

impl ListResponse {
  pub(crate) fn into_summaries(self) -> Vec<EntrySummary> {
    self
      .results
      .into_iter()
      .map(|item| EntrySummary {
        name: item.name,
        detail_url: item.url,
      })
      .collect()
  }
}

#[derive(Deserialize)]
pub(crate) struct DetailResponse {
  sprites: Sprites,
  types: Vec<TypeSlot>,
  stats: Vec<StatSlot>,
}

#[derive(Deserialize)]
struct Sprites {
  #[serde(default)]
  front_default: Option<String>,
}

#[derive(Deserialize)]
struct TypeSlot {
  #[serde(rename = "type")]
  type_info: NamedRef,
}

#[derive(Deserialize)]
struct StatSlot {
  stat: NamedRef,
  base_stat: i64,
}

#[derive(Deserialize)]
struct NamedRef {
  name: String,
}

impl DetailResponse {
  pub(crate) fn into_detail(self) -> EntryDetail {
    EntryDetail {
      image_url: self.sprites.front_default.unwrap_or_default(),
      types: self
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect(),
      stats: self
        .stats
        .into_iter()
        .map(|slot| Stat::new(slot.stat.name, slot.base_stat))
        .collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn entry_ids_are_stable_per_url() {
    let first = entry_id_from_url("https://pokeapi.co/api/v2/pokemon/1/");
    let again = entry_id_from_url("https://pokeapi.co/api/v2/pokemon/1/");
    let other = entry_id_from_url("https://pokeapi.co/api/v2/pokemon/2/");
    assert_eq!(first, again);
    assert_ne!(first, other);
    assert!(first >= 0);
  }

  #[test]
  fn detail_response_decodes_in_api_order() {
    let body = r#"{
      "sprites": { "front_default": "https://img/6.png", "back_default": null },
      "types": [
        { "slot": 1, "type": { "name": "fire", "url": "u" } },
        { "slot": 2, "type": { "name": "flying", "url": "u" } }
      ],
      "stats": [
        { "base_stat": 78, "effort": 0, "stat": { "name": "hp", "url": "u" } },
        { "base_stat": 84, "effort": 0, "stat": { "name": "attack", "url": "u" } }
      ],
      "weight": 905
    }"#;
    let detail: EntryDetail = serde_json::from_str::<DetailResponse>(body).unwrap().into_detail();
    assert_eq!(detail.image_url, "https://img/6.png");
    assert_eq!(detail.types, vec!["fire", "flying"]);
    assert_eq!(detail.stats, vec![Stat::new("hp", 78), Stat::new("attack", 84)]);
  }

  #[test]
  fn missing_sprite_becomes_empty_image_url() {
    let body = r#"{ "sprites": { "front_default": null }, "types": [], "stats": [] }"#;
    let detail: EntryDetail = serde_json::from_str::<DetailResponse>(body).unwrap().into_detail();
    assert_eq!(detail.image_url, "");
  }

  #[test]
  fn base_stat_defaults_to_zero() {
    let entry = CatalogEntry {
      id: 1,
      name: "ditto".to_string(),
      image_url: String::new(),
      types: vec!["normal".to_string()],
      stats: vec![Stat::new("hp", 48)],
      is_favorite: false,
    };
    assert_eq!(entry.base_stat("hp"), 48);
    assert_eq!(entry.base_stat("attack"), 0);
  }

  #[test]
  fn append_types_skips_known_tags() {
    let mut entry = CatalogEntry {
      id: 1,
      name: "eevee".to_string(),
      image_url: String::new(),
      types: vec!["normal".to_string()],
      stats: Vec::new(),
      is_favorite: false,
    };
    let added = entry.append_types(["Normal", "fairy", " ", "fairy"]);
    assert_eq!(added, 1);
    assert_eq!(entry.types, vec!["normal", "fairy"]);
  }

  #[test]
  fn type_match_folds_unicode_case() {
    let entry = CatalogEntry {
      id: 1,
      name: "flabébé".to_string(),
      image_url: String::new(),
      types: vec!["FAIRY".to_string(), "Élan".to_string()],
      stats: Vec::new(),
      is_favorite: false,
    };
    assert!(entry.has_type("fairy"));
    assert!(entry.has_type("élan"));
    assert!(!entry.has_type("elan"));
  }

  #[test]
  fn stats_serialize_camel_case() {
    let json = serde_json::to_string(&vec![Stat::new("hp", 45)]).unwrap();
    assert_eq!(json, r#"[{"statName":"hp","baseStat":45}]"#);
  }
}
