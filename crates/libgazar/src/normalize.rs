use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

/// Split raw text into normalized tokens.
///
/// Text is NFC-composed and lowercased, every character that is neither
/// alphanumeric nor whitespace is replaced by a space, and the result is split
/// on whitespace runs. Empty or punctuation-only input yields no tokens.
pub fn normalize(text: &str) -> Vec<String> {
  clean(text).split_whitespace().map(ToOwned::to_owned).collect()
}

/// Same as [`normalize`], with tokens joined by single spaces.
pub fn normalize_text(text: &str) -> String {
  clean(text).split_whitespace().join(" ")
}

fn clean(text: &str) -> String {
  text
    .nfc()
    .flat_map(char::to_lowercase)
    .map(|c| match c {
      c if c.is_alphanumeric() || c.is_whitespace() => c,
      _ => ' ',
    })
    .collect()
}
