use std::{
  fs::File,
  io::{self, BufRead, BufReader, BufWriter, Write},
  path::Path,
};

use anyhow::Context;
use jiff::Timestamp;
use libgazar::prelude::*;
use serde::Serialize;
use serde_jsonlines::{JsonLinesReader, JsonLinesWriter};
use tracing::instrument;

use crate::{config::Config, errors::AppError};

/// Corpus report as written to `REPORT_PATH`.
#[derive(Debug, Serialize)]
pub struct Report<'r> {
  pub generated_at: Timestamp,
  pub strategy: Strategy,
  #[serde(flatten)]
  pub corpus: &'r CorpusReport,
}

/// Load every input, match the corpus on a dedicated thread pool and write
/// the results out.
#[instrument(name = "batch", skip_all, fields(documents = %config.documents_path.display()))]
pub fn run(config: &Config) -> anyhow::Result<CorpusReport> {
  let gazar = load_gazetteer(config)?;
  let documents = load_documents(&config.documents_path)?;

  tracing::info!(documents = documents.len(), workers = config.workers, "loaded corpus");

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(config.workers)
    .thread_name(|index| format!("gazar-worker-{index}"))
    .build()
    .context("could not create worker pool")?;

  let report = pool.install(|| gazar.run(&documents));

  match &config.output_path {
    Some(path) => write_results(File::create(path).map_err(AppError::io(path))?, &report.results).map_err(AppError::io(path))?,
    None => write_results(io::stdout().lock(), &report.results).context("could not write results")?,
  }

  if let Some(path) = &config.report_path {
    write_report(path, gazar.context().strategy, &report)?;
  }

  Ok(report)
}

fn load_gazetteer(config: &Config) -> Result<Gazar, AppError> {
  let dictionary = Dictionary::from_path(&config.dictionary_path)?;

  let context = match &config.context_path {
    Some(path) => ContextConfiguration::from_path(path)?,
    None => ContextConfiguration::default(),
  };

  Ok(Gazar::new(&dictionary).context(context).build()?)
}

/// Read documents from a JSON array, or from JSON lines when the file is named
/// `*.jsonl` or `*.ndjson`.
pub fn load_documents(path: &Path) -> Result<Vec<Document>, AppError> {
  let file = File::open(path).map_err(AppError::io(path))?;

  match path.extension().and_then(|ext| ext.to_str()) {
    Some("jsonl" | "ndjson") => read_json_lines(path, BufReader::new(file)),

    _ => serde_json::from_reader(BufReader::new(file)).map_err(|err| AppError::DocumentError {
      path: path.to_path_buf(),
      line: err.line(),
      reason: err.to_string(),
    }),
  }
}

fn read_json_lines(path: &Path, reader: impl BufRead) -> Result<Vec<Document>, AppError> {
  JsonLinesReader::new(reader)
    .read_all::<Document>()
    .enumerate()
    .map(|(index, document)| {
      document.map_err(|err| match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => AppError::DocumentError {
          path: path.to_path_buf(),
          line: index + 1,
          reason: err.to_string(),
        },
        _ => AppError::IoError { path: path.to_path_buf(), source: err },
      })
    })
    .collect()
}

fn write_results(writer: impl Write, results: &[DocumentMatches]) -> io::Result<()> {
  let mut writer = JsonLinesWriter::new(BufWriter::new(writer));

  writer.write_all(results)?;
  writer.flush()
}

fn write_report(path: &Path, strategy: Strategy, corpus: &CorpusReport) -> Result<(), AppError> {
  let report = Report {
    generated_at: Timestamp::now(),
    strategy,
    corpus,
  };

  let file = File::create(path).map_err(AppError::io(path))?;
  let mut writer = BufWriter::new(file);

  serde_json::to_writer_pretty(&mut writer, &report).map_err(|err| AppError::IoError { path: path.to_path_buf(), source: err.into() })?;
  writer.flush().map_err(AppError::io(path))?;

  tracing::info!(path = %path.display(), "wrote corpus report");

  Ok(())
}
