use std::io::Write;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Env};

pub fn build_prometheus() -> Result<PrometheusHandle, BuildError> {
  let builder = PrometheusBuilder::new()
    .add_global_label("service", "gazar")
    .set_buckets_for_metric(Matcher::Full("gazar_matching_latency_seconds".into()), &[0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001])?;

  builder.install_recorder()
}

pub struct TraceGuards {
  _logging: WorkerGuard,
}

pub fn init_tracing(config: &Config, writer: impl Write + Send + 'static) -> TraceGuards {
  let (appender, logging_guard) = tracing_appender::non_blocking(writer);

  let logging_formatter = match config.env {
    #[cfg(not(test))]
    Env::Dev => fmt::layer().compact().with_writer(appender).with_ansi(true).boxed(),
    Env::Production => json_subscriber::layer()
      .with_writer(appender)
      .flatten_event(true)
      .flatten_span_list_on_top_level(true)
      .with_current_span(false)
      .with_span_list(false)
      .boxed(),

    #[cfg(test)]
    Env::Dev => fmt::layer().compact().with_writer(appender).with_ansi(false).boxed(),
  };

  let filter = EnvFilter::builder().try_from_env().or_else(|_| EnvFilter::try_new("info"));

  match filter {
    Ok(filter) => {
      let _ = tracing_subscriber::registry().with(filter.and_then(logging_formatter)).try_init();
    }

    Err(err) => {
      let _ = tracing_subscriber::registry().with(logging_formatter).try_init();

      tracing::warn!(%err, "could not parse log filter");
    }
  }

  TraceGuards { _logging: logging_guard }
}
