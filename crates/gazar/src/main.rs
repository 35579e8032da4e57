mod batch;
mod config;
mod errors;
mod trace;

#[cfg(test)]
mod tests;

use std::fs;

use anyhow::Context;

use crate::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;
  let _guards = trace::init_tracing(&config, std::io::stderr());

  run(&config)
}

fn run(config: &Config) -> anyhow::Result<()> {
  let prometheus = match config.metrics_path {
    Some(_) => Some(trace::build_prometheus().context("could not install metrics recorder")?),
    None => None,
  };

  libgazar::init();

  tracing::info!(gazar = env!("CARGO_PKG_VERSION"), "starting batch");

  let report = batch::run(config)?;

  if let (Some(path), Some(prometheus)) = (&config.metrics_path, prometheus) {
    fs::write(path, prometheus.render()).with_context(|| format!("could not write metrics to {}", path.display()))?;
  }

  tracing::info!(documents = report.documents, matched = report.matched_documents, coverage = report.coverage, "batch complete");

  Ok(())
}
