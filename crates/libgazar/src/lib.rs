mod context;
mod disambiguation;
mod error;
mod gazar;
mod index;
mod matcher;
mod model;

pub mod aggregate;
pub mod normalize;

#[cfg(test)]
mod tests;

pub fn init() {
  let _ = *crate::context::BUILTIN_CONTEXT;
}

pub mod prelude {
  pub use crate::aggregate::{CorpusReport, DocumentMatches, LocationFrequency, PrimaryLocation};
  pub use crate::context::{ContextConfiguration, DEFAULT_WINDOW, Strategy};
  pub use crate::disambiguation::{Disambiguator, NextToken, Span, Verdict, Window};
  pub use crate::error::GazarError;
  pub use crate::gazar::Gazar;
  pub use crate::index::{AliasEntry, AliasIndex};
  pub use crate::matcher::{MatchResult, Matcher, Mention, SUFFIX_TOLERANCE};
  pub use crate::model::{AliasValue, Coordinates, Dictionary, DictionaryEntry, DisambiguationClass, Document, DocumentId, LocationKind, LocationRecord};
  pub use crate::normalize::{normalize, normalize_text};
}
