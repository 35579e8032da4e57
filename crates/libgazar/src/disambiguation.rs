use crate::{
  context::ContextConfiguration,
  index::{AliasEntry, AliasIndex},
};

/// Outcome of checking an ambiguous match against its surroundings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
  /// Keep the match, and consume `skip` more tokens after it.
  Accept { skip: usize },
  Reject,
}

/// Token range `start..start + length` covered by a tentative match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
  pub start: usize,
  pub length: usize,
}

impl Span {
  pub fn new(start: usize, length: usize) -> Span {
    Span { start, length }
  }

  pub fn end(&self) -> usize {
    self.start + self.length
  }

  pub fn last(&self) -> usize {
    self.end() - 1
  }
}

/// Decides whether a `common` alias match is an actual location reference.
///
/// Implementations must be pure functions of their arguments: they are called
/// concurrently from every worker matching documents.
pub trait Disambiguator: Send + Sync {
  fn name(&self) -> &'static str;
  fn accept(&self, tokens: &[String], span: Span, alias: &AliasEntry, index: &AliasIndex) -> Verdict;
}

/// Looks only at the matched token itself and the one right after it.
pub struct NextToken<'c> {
  context: &'c ContextConfiguration,
}

impl<'c> NextToken<'c> {
  pub fn new(context: &'c ContextConfiguration) -> Self {
    NextToken { context }
  }
}

impl Disambiguator for NextToken<'_> {
  fn name(&self) -> &'static str {
    "next-token"
  }

  fn accept(&self, tokens: &[String], span: Span, alias: &AliasEntry, index: &AliasIndex) -> Verdict {
    if has_context_suffix(self.context, &tokens[span.last()], alias.last_token()) {
      return Verdict::Accept { skip: 0 };
    }

    match tokens.get(span.end()) {
      Some(next) if self.context.is_context_word(next) => Verdict::Accept { skip: 1 },
      Some(next) if index.starts_location(next) => Verdict::Accept { skip: 0 },
      _ => Verdict::Reject,
    }
  }
}

/// Also accepts a match when a context word shows up anywhere within
/// `window` tokens on either side of it.
pub struct Window<'c> {
  context: &'c ContextConfiguration,
}

impl<'c> Window<'c> {
  pub fn new(context: &'c ContextConfiguration) -> Self {
    Window { context }
  }
}

impl Disambiguator for Window<'_> {
  fn name(&self) -> &'static str {
    "window"
  }

  fn accept(&self, tokens: &[String], span: Span, alias: &AliasEntry, index: &AliasIndex) -> Verdict {
    if has_context_suffix(self.context, &tokens[span.last()], alias.last_token()) {
      return Verdict::Accept { skip: 0 };
    }

    let next = tokens.get(span.end());

    if next.is_some_and(|next| self.context.is_context_word(next)) {
      return Verdict::Accept { skip: 1 };
    }

    let before = &tokens[span.start.saturating_sub(self.context.window)..span.start];
    let after = &tokens[span.end().min(tokens.len())..(span.end() + self.context.window).min(tokens.len())];

    if before.iter().chain(after).any(|token| self.context.is_context_word(token)) {
      return Verdict::Accept { skip: 0 };
    }

    match next {
      Some(next) if index.starts_location(next) => Verdict::Accept { skip: 0 },
      _ => Verdict::Reject,
    }
  }
}

/// `13р` or `120t`: the context marker is glued to the place name.
fn has_context_suffix(context: &ContextConfiguration, text: &str, alias: &str) -> bool {
  match text.strip_prefix(alias) {
    Some(suffix) if !suffix.is_empty() => context.is_context_word(suffix),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    context::Strategy,
    index::AliasIndex,
    normalize::normalize,
    tests::{context, context_with, fixture},
  };

  use super::*;

  fn verdict<D: Disambiguator>(disambiguator: &D, text: &str, start: usize) -> Verdict {
    let index = AliasIndex::build(&fixture()).unwrap();
    let tokens = normalize(text);
    let alias = index.get("13")[0].clone();

    disambiguator.accept(&tokens, Span::new(start, 1), &alias, &index)
  }

  #[test]
  fn names() {
    let context = context();

    assert_eq!(NextToken::new(&context).name(), "next-token");
    assert_eq!(Window::new(&context).name(), "window");
  }

  #[test]
  fn span() {
    let span = Span::new(2, 3);

    assert_eq!(span.end(), 5);
    assert_eq!(span.last(), 4);
  }

  #[test]
  fn suffix_context() {
    let context = context();
    let next = NextToken::new(&context);

    assert_eq!(verdict(&next, "13р байр", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&next, "13хороолол", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&next, "13ш байр", 0), Verdict::Reject);
  }

  #[test]
  fn following_context_word() {
    let context = context();
    let next = NextToken::new(&context);

    assert_eq!(verdict(&next, "13 хороолол дээр", 0), Verdict::Accept { skip: 1 });
    assert_eq!(verdict(&next, "манай 13 руу", 1), Verdict::Accept { skip: 1 });
  }

  #[test]
  fn adjacent_location() {
    let context = context();
    let next = NextToken::new(&context);

    assert_eq!(verdict(&next, "13 налайх", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&next, "13 налайхаас", 0), Verdict::Reject);
  }

  #[test]
  fn no_context() {
    let context = context();
    let next = NextToken::new(&context);

    assert_eq!(verdict(&next, "13 ширхэг байна", 0), Verdict::Reject);
    assert_eq!(verdict(&next, "13", 0), Verdict::Reject);
    assert_eq!(verdict(&next, "хороолол 13", 1), Verdict::Reject);
  }

  #[test]
  fn window() {
    let context = context_with(Strategy::Window);
    let window = Window::new(&context);

    assert_eq!(verdict(&window, "хороолол 13", 1), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&window, "13 ширхэг байр руу", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&window, "13 хороолол", 0), Verdict::Accept { skip: 1 });
    assert_eq!(verdict(&window, "13р", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&window, "13 налайх", 0), Verdict::Accept { skip: 0 });
    assert_eq!(verdict(&window, "13 ширхэг байна", 0), Verdict::Reject);
  }

  #[test]
  fn window_bounds() {
    let context = ContextConfiguration::builder(&["руу"]).window(1).strategy(Strategy::Window).build().unwrap();
    let window = Window::new(&context);

    assert_eq!(verdict(&window, "руу нэг 13 хоёр гурав", 2), Verdict::Reject);
    assert_eq!(verdict(&window, "нэг 13 хоёр руу", 1), Verdict::Reject);
    assert_eq!(verdict(&window, "нэг руу 13 хоёр", 2), Verdict::Accept { skip: 0 });
  }
}
