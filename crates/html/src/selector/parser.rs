//! CSS selector parsing.
//! Reference: <https://www.w3.org/TR/selectors-3/>
//!
//! Anything outside the supported subset (pseudo-classes, namespaces,
//! unterminated attribute selectors) makes the whole selector invalid, and an
//! invalid selector matches nothing.

use super::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};
use core::mem::take;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Internal tokenizer token kinds.
enum Tok {
    /// A combinator token like child/adjacent/general sibling.
    Combinator(Combinator),
    /// Whitespace that implies a descendant combinator.
    DescendantWS,
    /// A simple selector token (type, class, id, attribute, universal).
    Simple(SimpleSelector),
    /// Input outside the supported grammar.
    Invalid,
}

/// Tokenizer over a selector string.
struct SelectorTokenizer {
    input: Vec<char>,
    index: usize,
    /// Whether we should emit a descendant whitespace token on `next()` call.
    pending_whitespace: bool,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

impl SelectorTokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            index: 0,
            pending_whitespace: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Return the next selector token, if any.
    fn next(&mut self) -> Option<Tok> {
        if self.pending_whitespace {
            self.pending_whitespace = false;
            self.skip_spaces();
            if self.peek().is_some() {
                return Some(Tok::DescendantWS);
            }
            return None;
        }
        if self.skip_spaces() {
            self.pending_whitespace = true;
            return self.next();
        }
        let current = self.peek()?;
        let tok = match current {
            '*' => {
                self.bump();
                Tok::Simple(SimpleSelector::Universal)
            }
            '.' => {
                self.bump();
                self.consume_ident()
                    .map_or(Tok::Invalid, |ident| Tok::Simple(SimpleSelector::Class(ident)))
            }
            '#' => {
                self.bump();
                self.consume_ident()
                    .map_or(Tok::Invalid, |ident| Tok::Simple(SimpleSelector::IdSelector(ident)))
            }
            '[' => self.consume_attr(),
            '>' => {
                self.bump();
                Tok::Combinator(Combinator::Child)
            }
            '+' => {
                self.bump();
                Tok::Combinator(Combinator::AdjacentSibling)
            }
            '~' => {
                self.bump();
                Tok::Combinator(Combinator::GeneralSibling)
            }
            _ => self.consume_ident().map_or(Tok::Invalid, |ident| {
                Tok::Simple(SimpleSelector::Type(ident.to_ascii_lowercase()))
            }),
        };
        Some(tok)
    }

    /// Consume an identifier. Case is preserved; `None` if it is empty.
    fn consume_ident(&mut self) -> Option<String> {
        let start = self.index;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        let ident: String = self.input.get(start..self.index)?.iter().collect();
        (!ident.is_empty()).then_some(ident)
    }

    /// Parse `[name]`, `[name=value]` or `[name^=value]` (quoted or unquoted).
    fn consume_attr(&mut self) -> Tok {
        // skip '['
        self.bump();
        self.skip_spaces();
        let Some(name) = self.consume_ident().map(|ident| ident.to_ascii_lowercase()) else {
            return Tok::Invalid;
        };
        self.skip_spaces();
        let prefix = self.peek() == Some('^');
        if prefix {
            self.bump();
            if self.peek() != Some('=') {
                return Tok::Invalid;
            }
        }
        let simple = if self.peek() == Some('=') {
            self.bump();
            self.skip_spaces();
            let value = match self.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.bump();
                    let Some(value) = self.consume_quoted(quote) else {
                        return Tok::Invalid;
                    };
                    value
                }
                _ => self.consume_unquoted(),
            };
            if prefix {
                SimpleSelector::AttrPrefix { name, value }
            } else {
                SimpleSelector::AttrEquals { name, value }
            }
        } else {
            SimpleSelector::AttrExists(name)
        };
        self.skip_spaces();
        if self.peek() != Some(']') {
            return Tok::Invalid;
        }
        self.bump();
        Tok::Simple(simple)
    }

    /// Consume an unquoted attribute value until whitespace or a closing bracket.
    fn consume_unquoted(&mut self) -> String {
        let start = self.index;
        while self
            .peek()
            .is_some_and(|ch| !ch.is_whitespace() && ch != ']')
        {
            self.bump();
        }
        self.input
            .get(start..self.index)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Consume a quoted value up to the matching quote; `None` if unterminated.
    fn consume_quoted(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            let ch = self.peek()?;
            self.bump();
            match ch {
                '\\' => {
                    out.push(self.peek()?);
                    self.bump();
                }
                _ if ch == quote => return Some(out),
                _ => out.push(ch),
            }
        }
    }

    /// Skip whitespace, returning whether any was consumed.
    fn skip_spaces(&mut self) -> bool {
        let start = self.index;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.index != start
    }
}

/// Parse a selector list. Any invalid member invalidates the whole list,
/// which then has no selectors.
/// Selectors Level 3, Section 4
pub fn parse_selector_list(input: &str) -> SelectorList {
    let mut list = SelectorList::default();
    for part in split_list(input) {
        match parse_complex_selector(&part) {
            Some(selector) => list.selectors.push(selector),
            None => return SelectorList::default(),
        }
    }
    list
}

/// Split on top-level commas, ignoring commas inside quotes.
fn split_list(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in input.chars() {
        match (quote, ch) {
            (None, ',') => parts.push(take(&mut current)),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (Some(open), _) if open == ch => {
                quote = None;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}

/// Parse one complex selector; `None` if it is empty or invalid.
/// Selectors Level 3, Section 11: Combinators; Section 5–8: simple selectors
pub fn parse_complex_selector(input: &str) -> Option<ComplexSelector> {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut current = CompoundSelector::default();
    let mut first: Option<CompoundSelector> = None;
    let mut rest: Vec<(Combinator, CompoundSelector)> = Vec::new();
    let mut pending: Option<Combinator> = None;

    while let Some(token) = tokens.next() {
        match token {
            Tok::Invalid => return None,
            Tok::Combinator(comb) => {
                // `a > > b` or a leading combinator
                if current.simples.is_empty() && !matches!(pending, Some(Combinator::Descendant)) {
                    return None;
                }
                if !current.simples.is_empty() {
                    push_compound(&mut first, &mut rest, pending, take(&mut current));
                }
                pending = Some(comb);
            }
            Tok::DescendantWS => {
                if !current.simples.is_empty() {
                    push_compound(&mut first, &mut rest, pending, take(&mut current));
                    pending = Some(Combinator::Descendant);
                }
            }
            Tok::Simple(simple) => current.simples.push(simple),
        }
    }

    if current.simples.is_empty() {
        // trailing combinator or empty input
        return None;
    }
    push_compound(&mut first, &mut rest, pending, current);
    first.map(|first| ComplexSelector { first, rest })
}

fn push_compound(
    first: &mut Option<CompoundSelector>,
    rest: &mut Vec<(Combinator, CompoundSelector)>,
    pending: Option<Combinator>,
    compound: CompoundSelector,
) {
    if first.is_none() {
        *first = Some(compound);
    } else {
        rest.push((pending.unwrap_or(Combinator::Descendant), compound));
    }
}
