use std::{
  any::Any,
  cmp::Reverse,
  panic::{self, AssertUnwindSafe},
  time::Instant,
};

use ahash::HashMap;
use itertools::Itertools;
use metrics::{counter, histogram};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::{Span, instrument};

use crate::{
  disambiguation::Disambiguator,
  matcher::{MatchResult, Matcher},
  model::{Document, DocumentId},
  normalize::normalize,
};

/// Locations found in one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentMatches {
  pub id: DocumentId,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<DocumentId>,
  pub locations: MatchResult,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationFrequency {
  pub canonical: String,
  pub frequency: usize,
  pub percentage: f64,
}

/// Location an author mentions the most.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimaryLocation {
  pub author: DocumentId,
  pub canonical: String,
  pub count: usize,
}

/// Outcome of matching a whole corpus.
///
/// Serializes to the corpus summary only, per-document results are written
/// separately.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorpusReport {
  #[serde(skip)]
  pub results: Vec<DocumentMatches>,
  pub documents: usize,
  pub matched_documents: usize,
  pub coverage: f64,
  pub total_mentions: usize,
  pub locations: Vec<LocationFrequency>,
  pub primary_locations: Vec<PrimaryLocation>,
}

/// Match every document in parallel, then summarize.
///
/// Results keep the order of `documents`. A document whose matching panics is
/// reported with an empty location set and an error, the rest of the batch
/// carries on.
#[instrument(name = "match_corpus", skip_all, fields(documents = documents.len(), strategy = matcher.disambiguator().name()))]
pub fn run<D: Disambiguator>(documents: &[Document], matcher: &Matcher<'_, D>) -> CorpusReport {
  let span = Span::current();
  let then = Instant::now();

  let results = documents
    .par_iter()
    .map(|document| {
      let _enter = span.enter();

      process(document, matcher)
    })
    .collect::<Vec<_>>();

  counter!("gazar_documents_total").increment(documents.len() as u64);

  let report = summarize(results);

  counter!("gazar_mentions_total").increment(report.total_mentions as u64);

  tracing::info!(
    matched = report.matched_documents,
    coverage = report.coverage,
    mentions = report.total_mentions,
    elapsed = ?then.elapsed(),
    "matched corpus"
  );

  report
}

fn process<D: Disambiguator>(document: &Document, matcher: &Matcher<'_, D>) -> DocumentMatches {
  let then = Instant::now();
  let content = document.content.as_deref().unwrap_or_default();

  let outcome = panic::catch_unwind(AssertUnwindSafe(|| matcher.find(&normalize(content))));

  histogram!("gazar_matching_latency_seconds").record(then.elapsed().as_secs_f64());

  let (locations, error) = match outcome {
    Ok(locations) => (locations, None),

    Err(payload) => {
      let message = panic_message(payload.as_ref());

      tracing::error!(id = %document.id, error = %message, "could not match document");
      counter!("gazar_document_failures_total").increment(1);

      (MatchResult::new(), Some(message))
    }
  };

  DocumentMatches {
    id: document.id.clone(),
    author: document.author.clone(),
    locations,
    error,
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    return message.to_string();
  }

  match payload.downcast_ref::<String>() {
    Some(message) => message.clone(),
    None => "matching panicked".to_string(),
  }
}

/// Build the corpus statistics from per-document results.
pub fn summarize(results: Vec<DocumentMatches>) -> CorpusReport {
  let documents = results.len();
  let matched_documents = results.iter().filter(|result| !result.locations.is_empty()).count();
  let total_mentions = results.iter().map(|result| result.locations.len()).sum::<usize>();

  let coverage = match documents {
    0 => 0.0,
    n => matched_documents as f64 / n as f64,
  };

  let locations = frequencies(&results, total_mentions);
  let primary_locations = primary_locations(&results);

  CorpusReport {
    results,
    documents,
    matched_documents,
    coverage,
    total_mentions,
    locations,
    primary_locations,
  }
}

fn frequencies(results: &[DocumentMatches], total_mentions: usize) -> Vec<LocationFrequency> {
  results
    .iter()
    .flat_map(|result| result.locations.iter())
    .counts_by(String::as_str)
    .into_iter()
    .sorted_by_key(|(canonical, frequency)| (Reverse(*frequency), *canonical))
    .map(|(canonical, frequency)| LocationFrequency {
      canonical: canonical.to_string(),
      frequency,
      percentage: frequency as f64 / total_mentions as f64 * 100.0,
    })
    .collect()
}

fn primary_locations(results: &[DocumentMatches]) -> Vec<PrimaryLocation> {
  let mut counts: HashMap<&DocumentId, HashMap<&str, usize>> = HashMap::default();

  for result in results {
    let Some(author) = &result.author else {
      continue;
    };

    let tally = counts.entry(author).or_default();

    for canonical in &result.locations {
      *tally.entry(canonical.as_str()).or_default() += 1;
    }
  }

  counts
    .into_iter()
    .filter_map(|(author, tally)| {
      let (canonical, count) = tally.into_iter().min_by_key(|(canonical, count)| (Reverse(*count), *canonical))?;

      Some(PrimaryLocation {
        author: author.clone(),
        canonical: canonical.to_string(),
        count,
      })
    })
    .sorted_by(|lhs, rhs| lhs.author.cmp(&rhs.author))
    .collect()
}
