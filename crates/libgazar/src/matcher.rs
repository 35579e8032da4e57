use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
  disambiguation::{Disambiguator, Span, Verdict},
  index::{AliasEntry, AliasIndex},
  model::{DisambiguationClass, LocationKind},
};

/// Number of characters a standard alias's last token may be followed by
/// within the same text token (case and plural endings).
pub const SUFFIX_TOLERANCE: usize = 4;

/// Canonical names found in one document.
pub type MatchResult = BTreeSet<String>;

/// An accepted match. `end` is exclusive and covers the context tokens the
/// match consumed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Mention {
  pub canonical: String,
  pub kind: LocationKind,
  pub start: usize,
  pub end: usize,
}

/// Greedy, longest-alias-first scanner over a normalized token sequence.
pub struct Matcher<'i, D> {
  index: &'i AliasIndex,
  disambiguator: D,
}

impl<'i, D: Disambiguator> Matcher<'i, D> {
  pub fn new(index: &'i AliasIndex, disambiguator: D) -> Self {
    Matcher { index, disambiguator }
  }

  pub fn index(&self) -> &AliasIndex {
    self.index
  }

  pub fn disambiguator(&self) -> &D {
    &self.disambiguator
  }

  pub fn find(&self, tokens: &[String]) -> MatchResult {
    self.scan(tokens).into_iter().map(|mention| mention.canonical).collect()
  }

  /// All accepted matches, left to right, never overlapping.
  pub fn scan(&self, tokens: &[String]) -> Vec<Mention> {
    let mut mentions = Vec::new();
    let mut cursor = 0;

    while cursor < tokens.len() {
      match self.match_at(tokens, cursor) {
        Some(mention) => {
          cursor = mention.end;
          mentions.push(mention);
        }

        None => cursor += 1,
      }
    }

    mentions
  }

  fn match_at(&self, tokens: &[String], start: usize) -> Option<Mention> {
    for alias in self.index.candidates(&tokens[start]) {
      let span = Span::new(start, alias.length());

      if span.end() > tokens.len() || !spans_alias(tokens, span, alias) {
        continue;
      }

      let skip = match alias.class {
        DisambiguationClass::Standard if within_tolerance(&tokens[span.last()], alias.last_token()) => 0,
        DisambiguationClass::Standard => continue,

        DisambiguationClass::Common => match self.disambiguator.accept(tokens, span, alias, self.index) {
          Verdict::Accept { skip } => skip,
          Verdict::Reject => continue,
        },
      };

      tracing::trace!(canonical = alias.canonical(), start, length = span.length, skip, "accepted mention");

      return Some(Mention {
        canonical: alias.canonical().to_string(),
        kind: alias.location.kind,
        start,
        end: span.end() + skip,
      });
    }

    None
  }
}

/// Every alias token but the last must be present verbatim, the last one may
/// carry a suffix.
fn spans_alias(tokens: &[String], span: Span, alias: &AliasEntry) -> bool {
  let (last, init) = match alias.tokens.split_last() {
    Some(parts) => parts,
    None => return false,
  };

  init.iter().zip(&tokens[span.start..]).all(|(expected, token)| token == expected) && tokens[span.last()].starts_with(last.as_str())
}

fn within_tolerance(token: &str, alias: &str) -> bool {
  token.chars().count() <= alias.chars().count() + SUFFIX_TOLERANCE
}
