use std::sync::Arc;

use bon::bon;

use crate::{
  aggregate::{self, CorpusReport},
  context::{ContextConfiguration, Strategy},
  disambiguation::{NextToken, Window},
  error::GazarError,
  index::AliasIndex,
  matcher::{MatchResult, Matcher, Mention},
  model::{Dictionary, Document},
  normalize::normalize,
};

/// The main entrypoint for extracting place names.
///
/// `Gazar` owns an alias index built from a gazetteer [`Dictionary`] and the
/// context words used to decide whether ambiguous aliases (numbers, common
/// words) actually refer to a place.
///
/// # Examples
///
/// ```rust
/// # use libgazar::prelude::*;
/// let dictionary = Dictionary::from_json(r#"{
///   "nalaih": { "canonical": "Налайх", "type": "district", "aliases": ["налайх", "nalaih"] },
///   "13": { "canonical": "XIII хороолол", "type": "common", "aliases": ["13"] }
/// }"#.as_bytes()).unwrap();
///
/// let gazar = Gazar::new(&dictionary).build().unwrap();
///
/// assert!(gazar.extract("Налайхаас 13 хороолол руу").contains("XIII хороолол"));
/// assert!(gazar.extract("13 ширхэг").is_empty());
/// ```
///
/// This struct can be safely cloned and sent across thread boundaries.
#[derive(Clone, Debug)]
pub struct Gazar {
  index: Arc<AliasIndex>,
  context: Arc<ContextConfiguration>,
}

#[bon]
impl Gazar {
  /// Build the alias index for `dictionary`.
  ///
  /// Without an explicit `context`, the builtin context words are used.
  #[allow(clippy::new_ret_no_self)]
  #[builder(start_fn = new, finish_fn = build)]
  pub fn _new(#[builder(start_fn)] dictionary: &Dictionary, #[builder(default)] context: ContextConfiguration) -> Result<Gazar, GazarError> {
    crate::init();

    let index = AliasIndex::build(dictionary)?;

    tracing::info!(
      locations = index.location_count(),
      aliases = index.alias_count(),
      context_words = context.context_words.len(),
      strategy = ?context.strategy,
      "initialized gazetteer"
    );

    Ok(Gazar {
      index: Arc::new(index),
      context: Arc::new(context),
    })
  }
}

impl Gazar {
  pub fn index(&self) -> &AliasIndex {
    &self.index
  }

  pub fn context(&self) -> &ContextConfiguration {
    &self.context
  }

  /// Canonical names of the locations mentioned in `text`.
  pub fn extract(&self, text: &str) -> MatchResult {
    self.extract_tokens(&normalize(text))
  }

  /// Same as [`Gazar::extract`], over already normalized tokens.
  pub fn extract_tokens(&self, tokens: &[String]) -> MatchResult {
    self.scan_tokens(tokens).into_iter().map(|mention| mention.canonical).collect()
  }

  /// Every accepted mention in `text`, with its token position.
  pub fn scan(&self, text: &str) -> Vec<Mention> {
    self.scan_tokens(&normalize(text))
  }

  pub fn scan_tokens(&self, tokens: &[String]) -> Vec<Mention> {
    match self.context.strategy {
      Strategy::NextToken => Matcher::new(&self.index, NextToken::new(&self.context)).scan(tokens),
      Strategy::Window => Matcher::new(&self.index, Window::new(&self.context)).scan(tokens),
    }
  }

  /// Match a whole corpus in parallel and summarize it.
  ///
  /// Runs on the current rayon thread pool.
  pub fn run(&self, documents: &[Document]) -> CorpusReport {
    match self.context.strategy {
      Strategy::NextToken => aggregate::run(documents, &Matcher::new(&self.index, NextToken::new(&self.context))),
      Strategy::Window => aggregate::run(documents, &Matcher::new(&self.index, Window::new(&self.context))),
    }
  }
}
