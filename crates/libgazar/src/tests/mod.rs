use crate::{
  context::{ContextConfiguration, Strategy},
  model::{AliasValue, Dictionary, DictionaryEntry, LocationKind},
  normalize::normalize_text,
};

#[bon::builder]
pub fn loc(#[builder(start_fn)] canonical: &str, kind: Option<LocationKind>, aliases: &[&str], lat: Option<f64>, lon: Option<f64>) -> (String, DictionaryEntry) {
  (
    normalize_text(canonical),
    DictionaryEntry {
      canonical: Some(canonical.to_string()),
      kind,
      lat,
      lon,
      aliases: aliases.iter().map(|alias| AliasValue::from(*alias)).collect(),
    },
  )
}

pub fn dictionary<I>(entries: I) -> Dictionary
where
  I: IntoIterator<Item = (String, DictionaryEntry)>,
{
  entries.into_iter().collect()
}

pub fn fixture() -> Dictionary {
  dictionary([
    loc("Баянзүрх")
      .kind(LocationKind::District)
      .aliases(&["баянзүрх", "bayanzurkh"])
      .lat(47.9267)
      .lon(106.9936)
      .call(),
    loc("Баян").kind(LocationKind::Sum).aliases(&["баян", "bayan"]).call(),
    loc("Сүхбаатар").kind(LocationKind::District).aliases(&["сүхбаатар", "suhbaatar"]).call(),
    loc("Сүхбаатарын талбай")
      .kind(LocationKind::Tourism)
      .aliases(&["сүхбаатар талбай", "suhbaatar talbai"])
      .call(),
    loc("Налайх").kind(LocationKind::District).aliases(&["налайх", "nalaih"]).call(),
    loc("XIII хороолол").kind(LocationKind::Common).aliases(&["13"]).call(),
    loc("Зайсан").kind(LocationKind::Common).aliases(&["зайсан", "zaisan"]).call(),
    loc("Улаанбаатар").kind(LocationKind::Aimag).aliases(&["улаанбаатар", "ub"]).call(),
  ])
}

pub fn context() -> ContextConfiguration {
  context_with(Strategy::NextToken)
}

pub fn context_with(strategy: Strategy) -> ContextConfiguration {
  ContextConfiguration::builder(&["хороолол", "horoolol", "р", "руу", "ruu", "дээр", "deer", "д", "т", "t", "явна", "yvna"])
    .strategy(strategy)
    .build()
    .expect("valid test context")
}
