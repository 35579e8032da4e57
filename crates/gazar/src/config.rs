use std::{
  env::{self, VarError},
  fmt::Display,
  path::PathBuf,
  str::FromStr,
};

use crate::errors::AppError;

#[derive(Clone, Debug, Default)]
pub struct Config {
  pub env: Env,

  // Inputs
  pub dictionary_path: PathBuf,
  pub context_path: Option<PathBuf>,
  pub documents_path: PathBuf,

  // Outputs
  pub output_path: Option<PathBuf>,
  pub report_path: Option<PathBuf>,
  pub metrics_path: Option<PathBuf>,

  pub workers: usize,
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      dictionary_path: required_path("DICTIONARY_PATH")?,
      context_path: optional_path("CONTEXT_PATH"),
      documents_path: required_path("DOCUMENTS_PATH")?,
      output_path: optional_path("OUTPUT_PATH"),
      report_path: optional_path("REPORT_PATH"),
      metrics_path: optional_path("METRICS_PATH"),
      workers: parse_env("WORKERS", 0)?,
    };

    Ok(config)
  }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Env {
  #[default]
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "dev" => Env::Dev,
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

fn required_path(name: &str) -> Result<PathBuf, AppError> {
  optional_path(name).ok_or_else(|| AppError::ConfigError(format!("{name} is required")))
}

fn optional_path(name: &str) -> Option<PathBuf> {
  env::var_os(name).filter(|value| !value.is_empty()).map(PathBuf::from)
}

pub fn parse_env<T>(name: &str, default: T) -> Result<T, AppError>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(default),
    Ok(value) => value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}"))),
    Err(err) => match err {
      VarError::NotPresent => Ok(default),
      _ => Err(AppError::ConfigError(format!("could not read {name}: {err}"))),
    },
  }
}
