use std::{cmp::Reverse, sync::Arc};

use ahash::HashMap;
use tracing::instrument;

use crate::{
  error::GazarError,
  model::{AliasValue, Dictionary, DisambiguationClass, LocationRecord},
  normalize::normalize,
};

/// One normalized surface form of a location.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasEntry {
  pub tokens: Vec<String>,
  pub location: Arc<LocationRecord>,
  pub class: DisambiguationClass,
}

impl AliasEntry {
  /// Number of tokens in the alias. Never zero.
  pub fn length(&self) -> usize {
    self.tokens.len()
  }

  pub fn canonical(&self) -> &str {
    &self.location.canonical
  }

  pub fn first_token(&self) -> &str {
    &self.tokens[0]
  }

  pub fn last_token(&self) -> &str {
    &self.tokens[self.tokens.len() - 1]
  }
}

/// Aliases grouped by their first token.
///
/// Built once from a [`Dictionary`] and read-only afterwards. Within a group,
/// entries are ordered from the longest alias to the shortest, aliases of equal
/// length keeping dictionary order.
#[derive(Clone, Debug, Default)]
pub struct AliasIndex {
  entries: HashMap<String, Vec<AliasEntry>>,
  locations: usize,
}

impl AliasIndex {
  #[instrument(name = "build_alias_index", skip_all, fields(records = dictionary.len()))]
  pub fn build(dictionary: &Dictionary) -> Result<AliasIndex, GazarError> {
    let mut entries: HashMap<String, Vec<AliasEntry>> = HashMap::default();
    let mut skipped = 0;

    for (key, entry) in dictionary.iter() {
      let location = Arc::new(entry.to_record(key)?);
      let class = location.kind.class();

      for (position, alias) in entry.aliases.iter().enumerate() {
        let text = match alias {
          AliasValue::Text(text) => text,
          AliasValue::Invalid(value) => return Err(GazarError::malformed(key, format!("alias #{position} is not a string: {value}"))),
        };

        let tokens = normalize(text);

        let Some(first) = tokens.first() else {
          skipped += 1;
          continue;
        };

        let group = entries.entry(first.clone()).or_default();

        if group.iter().any(|existing| existing.tokens == tokens && existing.canonical() == location.canonical) {
          continue;
        }

        group.push(AliasEntry {
          tokens,
          location: Arc::clone(&location),
          class,
        });
      }
    }

    for group in entries.values_mut() {
      group.sort_by_key(|entry| Reverse(entry.length()));
    }

    let index = AliasIndex {
      entries,
      locations: dictionary.len(),
    };

    tracing::debug!(keys = index.key_count(), aliases = index.alias_count(), skipped, "built alias index");

    Ok(index)
  }

  /// Aliases whose first token is a prefix of `token`, longest alias first.
  ///
  /// Every character-boundary prefix of the token is looked up, so inflected
  /// forms such as `баянзүрхэд` reach the aliases of `баянзүрх`.
  pub fn candidates(&self, token: &str) -> Vec<&AliasEntry> {
    let mut candidates = token
      .char_indices()
      .rev()
      .filter_map(|(offset, c)| self.entries.get(&token[..offset + c.len_utf8()]))
      .flatten()
      .collect::<Vec<_>>();

    candidates.sort_by_key(|entry| Reverse(entry.length()));
    candidates
  }

  /// Whether some alias starts with exactly this token.
  pub fn starts_location(&self, token: &str) -> bool {
    self.entries.contains_key(token)
  }

  pub fn get(&self, first_token: &str) -> &[AliasEntry] {
    self.entries.get(first_token).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn key_count(&self) -> usize {
    self.entries.len()
  }

  pub fn alias_count(&self) -> usize {
    self.entries.values().map(Vec::len).sum()
  }

  pub fn location_count(&self) -> usize {
    self.locations
  }
}
