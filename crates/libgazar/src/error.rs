use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GazarError {
  #[error("malformed dictionary entry '{key}': {reason}")]
  MalformedDictionaryEntry { key: String, reason: String },
  #[error("invalid context configuration: {0}")]
  InvalidContext(String),
  #[error("could not read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Yaml(#[from] serde_yaml::Error),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl GazarError {
  pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> GazarError {
    GazarError::MalformedDictionaryEntry {
      key: key.to_string(),
      reason: reason.into(),
    }
  }
}
