use std::{io, path::PathBuf};

use libgazar::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid dictionary: {0}")]
  DictionaryError(String),
  #[error("invalid document on line {line} of {}: {reason}", path.display())]
  DocumentError { path: PathBuf, line: usize, reason: String },
  #[error("could not access {}: {source}", path.display())]
  IoError {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<GazarError> for AppError {
  fn from(value: GazarError) -> Self {
    match value {
      GazarError::InvalidContext(err) => AppError::ConfigError(err),
      GazarError::MalformedDictionaryEntry { .. } => AppError::DictionaryError(value.to_string()),
      GazarError::Io { path, source } => AppError::IoError { path, source },
      GazarError::OtherError(err) => AppError::OtherError(err),
      err @ (GazarError::Json(_) | GazarError::Yaml(_)) => AppError::OtherError(err.into()),
    }
  }
}

impl AppError {
  pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> AppError {
    let path = path.into();

    move |source| AppError::IoError { path, source }
  }
}
