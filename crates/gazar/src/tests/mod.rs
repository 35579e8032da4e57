
use std::{
  fs,
  path::Path,
  sync::{Arc, Mutex},
};

use serde_json::json;
use serde_json_assert::assert_json_eq;

use crate::{
  batch,
  config::{Config, Env},
  tests::log_writer::VecLogWriter,
  trace::init_tracing,
};

const DICTIONARY: &str = r#"{
  "баянзүрх": { "canonical": "Баянзүрх", "type": "district", "aliases": ["баянзүрх", "bayanzurkh"] },
  "xiii хороолол": { "canonical": "XIII хороолол", "type": "common", "aliases": ["13"] }
}"#;

const DOCUMENTS: &str = r#"{ "ID": 1, "FromID": 10, "Content": "Баянзүрх дүүрэгт амьдардаг" }
{ "ID": 2, "FromID": 10, "Content": "13 хороолол дээр уулзъя" }
{ "ID": 3, "FromID": 20, "Content": "13 ширхэг байна" }
"#;

fn config(dir: &Path) -> Config {
  fs::write(dir.join("dictionary.json"), DICTIONARY).unwrap();
  fs::write(dir.join("posts.jsonl"), DOCUMENTS).unwrap();

  Config {
    env: Env::Production,
    dictionary_path: dir.join("dictionary.json"),
    documents_path: dir.join("posts.jsonl"),
    output_path: Some(dir.join("results.jsonl")),
    report_path: Some(dir.join("report.json")),
    workers: 2,
    ..Default::default()
  }
}

#[test]
fn batch_run() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(dir.path());

  let report = batch::run(&config).unwrap();

  assert_eq!(report.documents, 3);
  assert_eq!(report.matched_documents, 2);

  let results = fs::read_to_string(dir.path().join("results.jsonl"))
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
    .collect::<Vec<_>>();

  assert_json_eq!(
    json!(results),
    json!([
      { "id": 1, "author": 10, "locations": ["Баянзүрх"] },
      { "id": 2, "author": 10, "locations": ["XIII хороолол"] },
      { "id": 3, "author": 20, "locations": [] },
    ])
  );

  let mut written: serde_json::Value = serde_json::from_slice(&fs::read(dir.path().join("report.json")).unwrap()).unwrap();
  let generated_at = written.as_object_mut().and_then(|report| report.remove("generated_at")).unwrap();

  assert!(generated_at.as_str().is_some_and(|timestamp| timestamp.parse::<jiff::Timestamp>().is_ok()));

  assert_json_eq!(
    written,
    json!({
      "strategy": "next_token",
      "documents": 3,
      "matched_documents": 2,
      "coverage": 2.0 / 3.0,
      "total_mentions": 2,
      "locations": [
        { "canonical": "XIII хороолол", "frequency": 1, "percentage": 50.0 },
        { "canonical": "Баянзүрх", "frequency": 1, "percentage": 50.0 },
      ],
      "primary_locations": [{ "author": 10, "canonical": "XIII хороолол", "count": 1 }],
    })
  );
}

#[test]
fn custom_context() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = config(dir.path());

  fs::write(dir.path().join("context.yml"), "location_context:\n  counters: [ширхэг]\n").unwrap();

  config.context_path = Some(dir.path().join("context.yml"));
  config.report_path = None;

  let report = batch::run(&config).unwrap();

  assert_eq!(report.matched_documents, 2);
  assert_eq!(report.results[1].locations.len(), 0);
  assert_eq!(report.results[2].locations.iter().collect::<Vec<_>>(), vec!["XIII хороолол"]);
  assert!(!dir.path().join("report.json").exists());
}

#[test]
fn missing_dictionary() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = config(dir.path());

  config.dictionary_path = dir.path().join("missing.json");

  let err = batch::run(&config).unwrap_err();

  assert!(err.to_string().starts_with("could not access"));
}

#[test]
fn run_with_logs_and_metrics() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = config(dir.path());
  let lines = Arc::new(Mutex::new(Vec::new()));

  config.metrics_path = Some(dir.path().join("gazar.prom"));

  let guards = init_tracing(&config, VecLogWriter::new(Arc::clone(&lines)));

  crate::run(&config).unwrap();

  drop(guards);

  let metrics = fs::read_to_string(dir.path().join("gazar.prom")).unwrap();

  assert!(metrics.contains("gazar_documents_total"));
  assert!(metrics.contains("gazar_matching_latency_seconds"));

  let logs = lines
    .lock()
    .unwrap()
    .iter()
    .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
    .collect::<Vec<_>>();

  assert!(logs.iter().any(|line| line["message"] == "batch complete" && line["documents"] == 3));
}
