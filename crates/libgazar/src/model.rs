use std::{collections::BTreeMap, fmt, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GazarError;

/// Kind of place a dictionary record designates.
///
/// `Common` is not a geographic kind but a marker for names that collide with
/// ordinary vocabulary (bare numerals, nicknames) and need context to be
/// accepted. Unknown kinds are read as `Other`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
  Aimag,
  Sum,
  District,
  Khoroo,
  Admin,
  RailwayStation,
  Tourism,
  BusStop,
  Common,
  #[default]
  #[serde(other)]
  Other,
}

impl fmt::Display for LocationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      LocationKind::Aimag => "aimag",
      LocationKind::Sum => "sum",
      LocationKind::District => "district",
      LocationKind::Khoroo => "khoroo",
      LocationKind::Admin => "admin",
      LocationKind::RailwayStation => "railway_station",
      LocationKind::Tourism => "tourism",
      LocationKind::BusStop => "bus_stop",
      LocationKind::Common => "common",
      LocationKind::Other => "other",
    })
  }
}

impl LocationKind {
  pub fn class(&self) -> DisambiguationClass {
    match self {
      LocationKind::Common => DisambiguationClass::Common,
      _ => DisambiguationClass::Standard,
    }
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisambiguationClass {
  /// Distinctive names, accepted on pattern alone.
  Standard,
  /// Names that also are ordinary words, accepted only with context.
  Common,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lon: f64,
}

/// A canonical place, shared by all of its aliases.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationRecord {
  pub canonical: String,
  pub kind: LocationKind,
  pub coordinates: Option<Coordinates>,
}

/// One alias as found in the dictionary file. Anything that is not a string is
/// kept around so the index builder can report which record carried it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AliasValue {
  Text(String),
  Invalid(serde_json::Value),
}

impl From<&str> for AliasValue {
  fn from(value: &str) -> Self {
    AliasValue::Text(value.to_string())
  }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DictionaryEntry {
  #[serde(default)]
  pub canonical: Option<String>,
  #[serde(rename = "type", default)]
  pub kind: Option<LocationKind>,
  #[serde(default)]
  pub lat: Option<f64>,
  #[serde(default)]
  pub lon: Option<f64>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub aliases: Vec<AliasValue>,
}

impl DictionaryEntry {
  pub(crate) fn to_record(&self, key: &str) -> Result<LocationRecord, GazarError> {
    let canonical = match self.canonical.as_deref().map(str::trim) {
      Some(canonical) if !canonical.is_empty() => canonical.to_string(),
      Some(_) => return Err(GazarError::malformed(key, "canonical name is blank")),
      None => return Err(GazarError::malformed(key, "canonical name is missing")),
    };

    let coordinates = match (self.lat, self.lon) {
      (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Coordinates { lat, lon }),
      _ => None,
    };

    Ok(LocationRecord {
      canonical,
      kind: self.kind.unwrap_or_default(),
      coordinates,
    })
  }
}

/// Location dictionary, keyed by the normalized name its producer chose.
///
/// Keys are kept sorted so that building an index from the same file always
/// yields the same candidate order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
  entries: BTreeMap<String, DictionaryEntry>,
}

impl Dictionary {
  pub fn from_json(data: &[u8]) -> Result<Dictionary, GazarError> {
    Ok(serde_json::from_slice(data)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Dictionary, GazarError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| GazarError::Io { path: path.to_path_buf(), source })?;

    Dictionary::from_json(&data)
  }

  pub fn insert(&mut self, key: impl Into<String>, entry: DictionaryEntry) {
    self.entries.insert(key.into(), entry);
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &DictionaryEntry)> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl FromIterator<(String, DictionaryEntry)> for Dictionary {
  fn from_iter<T: IntoIterator<Item = (String, DictionaryEntry)>>(iter: T) -> Self {
    Dictionary { entries: iter.into_iter().collect() }
  }
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DocumentId {
  Integer(i64),
  Text(String),
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentId::Integer(id) => write!(f, "{id}"),
      DocumentId::Text(id) => f.write_str(id),
    }
  }
}

impl From<i64> for DocumentId {
  fn from(value: i64) -> Self {
    DocumentId::Integer(value)
  }
}

impl From<&str> for DocumentId {
  fn from(value: &str) -> Self {
    DocumentId::Text(value.to_string())
  }
}

/// A post or message to extract locations from.
///
/// Only `content` is read by the matcher. Content that is missing or not a
/// string is treated as empty text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Document {
  #[serde(alias = "ID")]
  pub id: DocumentId,
  #[serde(default, alias = "FromID")]
  pub author: Option<DocumentId>,
  #[serde(default, alias = "Content", deserialize_with = "text_or_none")]
  pub content: Option<String>,
}

impl Document {
  pub fn new(id: impl Into<DocumentId>, content: &str) -> Document {
    Document {
      id: id.into(),
      author: None,
      content: Some(content.to_string()),
    }
  }

  pub fn with_author(mut self, author: impl Into<DocumentId>) -> Document {
    self.author = Some(author.into());
    self
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match serde_json::Value::deserialize(deserializer)? {
    serde_json::Value::String(text) => Some(text),
    _ => None,
  })
}
