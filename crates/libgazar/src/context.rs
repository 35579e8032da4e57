use std::{collections::HashMap, fs, path::Path, sync::LazyLock};

use ahash::HashSet;
use bon::bon;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use validator::Validate;

use crate::error::GazarError;

pub const DEFAULT_WINDOW: usize = 3;

#[derive(Embed)]
#[folder = "./assets"]
struct Assets;

pub(crate) static BUILTIN_CONTEXT: LazyLock<ContextConfiguration> = LazyLock::new(|| {
  let file = Assets::get("context.yml").expect("could not read builtin context words");

  ContextConfiguration::from_yaml(&file.data).expect("could not unmarshal builtin context words")
});

/// How ambiguous (`common`) matches look for supporting context.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Strategy {
  /// Only the token fused onto or directly following the match counts.
  #[default]
  #[serde(rename = "next_token")]
  NextToken,
  /// Any context word up to `window` tokens before or after the match counts.
  #[serde(rename = "window")]
  Window,
}

#[serde_inline_default]
#[derive(Deserialize, Validate)]
struct ContextFile {
  location_context: HashMap<String, Vec<String>>,
  #[serde_inline_default(DEFAULT_WINDOW)]
  #[validate(range(min = 1, max = 32, message = "window must be between 1 and 32 tokens"))]
  window: usize,
  #[serde(default)]
  strategy: Strategy,
}

/// Context words and window used to accept ambiguous matches.
///
/// The category names of the `location_context` mapping only organize the
/// source file, all words end up in a single set.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextConfiguration {
  pub context_words: HashSet<String>,
  pub window: usize,
  pub strategy: Strategy,
}

impl Default for ContextConfiguration {
  fn default() -> Self {
    BUILTIN_CONTEXT.clone()
  }
}

#[bon]
impl ContextConfiguration {
  #[builder]
  pub fn builder(#[builder(start_fn)] words: &[&str], window: Option<usize>, strategy: Option<Strategy>) -> Result<ContextConfiguration, GazarError> {
    let file = ContextFile {
      location_context: HashMap::from([("words".to_string(), words.iter().map(|word| word.to_string()).collect())]),
      window: window.unwrap_or(DEFAULT_WINDOW),
      strategy: strategy.unwrap_or_default(),
    };

    ContextConfiguration::from_file(file)
  }
}

impl ContextConfiguration {
  pub fn from_json(data: &[u8]) -> Result<ContextConfiguration, GazarError> {
    ContextConfiguration::from_file(serde_json::from_slice(data)?)
  }

  pub fn from_yaml(data: &[u8]) -> Result<ContextConfiguration, GazarError> {
    ContextConfiguration::from_file(serde_yaml::from_slice(data)?)
  }

  /// Read a configuration file, as YAML if its extension says so, as JSON
  /// otherwise.
  pub fn from_path(path: impl AsRef<Path>) -> Result<ContextConfiguration, GazarError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| GazarError::Io { path: path.to_path_buf(), source })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some("yml" | "yaml") => ContextConfiguration::from_yaml(&data),
      _ => ContextConfiguration::from_json(&data),
    }
  }

  pub fn is_context_word(&self, token: &str) -> bool {
    self.context_words.contains(token)
  }

  fn from_file(file: ContextFile) -> Result<ContextConfiguration, GazarError> {
    file.validate().map_err(|err| GazarError::InvalidContext(err.to_string()))?;

    let context_words = file
      .location_context
      .into_values()
      .flatten()
      .map(|word| word.trim().to_lowercase())
      .filter(|word| !word.is_empty())
      .collect::<HashSet<_>>();

    Ok(ContextConfiguration {
      context_words,
      window: file.window,
      strategy: file.strategy,
    })
  }
}
