//! Selector text is split in two stages: a selector list is cut at its
//! top-level commas, then each alternative is cut into compound selectors and
//! the combinators between them.
//!
//! Text inside `[...]`, `(...)` and quotes is never split, so
//! `:contains(a, b > c)` and `[title='x y']` stay whole.

use strum_macros::Display;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Combinator {
    /// Whitespace: `A B` matches a `B` with some ancestor `A`.
    Descendant,
    /// `A > B` matches a `B` whose parent is `A`.
    Child,
    /// `A + B` matches a `B` immediately preceded by a sibling `A`.
    NextSibling,
    /// `A ~ B` matches a `B` preceded (not necessarily immediately) by a sibling `A`.
    SubsequentSibling,
}

impl Combinator {
    /// The combinator written as `symbol`, if it is one. Whitespace is not
    /// a symbol; see [`Combinator::Descendant`].
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '>' => Some(Self::Child),
            '+' => Some(Self::NextSibling),
            '~' => Some(Self::SubsequentSibling),
            _ => None,
        }
    }

    /// The character this combinator is written with.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSibling => '~',
        }
    }
}

/// One piece of a complex selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorToken {
    /// A run of simple selectors with nothing between them, e.g. `div.a#b`.
    Compound(String),
    /// The relation between the compounds on either side.
    Combinator(Combinator),
}

/// Tracks whether the scanner is inside an attribute selector, an argument
/// list or a quoted value, remembering where each was opened.
///
/// A quote only opens a quoted value where one can begin: after `=` or at
/// the start of an argument. Anywhere else, as in `:contains(it's)`, it is
/// plain text. Inside an argument only nested parentheses count, and inside
/// an attribute selector only its closing `]`.
#[derive(Debug, Default)]
pub(crate) struct Nesting {
    pub(crate) quote: Option<(char, usize)>,
    pub(crate) bracket: Option<usize>,
    pub(crate) parens: Vec<usize>,
    /// Offsets of `)` with no `(` to close.
    pub(crate) unmatched: Vec<usize>,
    previous: Option<char>,
}

impl Nesting {
    /// State just after `opener` (`[` or `(`) at offset 0.
    pub(crate) fn opened_by(opener: char) -> Self {
        let mut nesting = Self::default();
        nesting.advance(0, opener);
        nesting
    }

    pub(crate) fn is_top_level(&self) -> bool {
        self.quote.is_none() && self.bracket.is_none() && self.parens.is_empty()
    }

    /// Update the nesting for `c` at byte offset `at`.
    pub(crate) fn advance(&mut self, at: usize, c: char) {
        if let Some((quote, _)) = self.quote {
            if c == quote {
                self.quote = None;
                self.previous = Some(c);
            }
            return;
        }
        match c {
            '\'' | '"' if matches!(self.previous, Some('=' | '(')) => {
                self.quote = Some((c, at));
            }
            '[' if self.parens.is_empty() && self.bracket.is_none() => self.bracket = Some(at),
            ']' if self.parens.is_empty() => self.bracket = None,
            '(' if self.bracket.is_none() => self.parens.push(at),
            ')' if self.bracket.is_none() => {
                if self.parens.pop().is_none() {
                    self.unmatched.push(at);
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            self.previous = Some(c);
        }
    }
}

/// Split a selector list at its top-level commas. Each alternative is trimmed;
/// empty alternatives are kept so callers can see them.
///
/// ```
/// use sift_select::lexer::split_selector_list;
///
/// assert_eq!(split_selector_list("div p, span"), vec!["div p", "span"]);
/// assert_eq!(split_selector_list(":contains(a,b)"), vec![":contains(a,b)"]);
/// ```
#[must_use]
pub fn split_selector_list(input: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c == ',' && nesting.is_top_level() {
            alternatives.push(input[start..i].trim());
            start = i + 1;
        } else {
            nesting.advance(i, c);
        }
    }
    alternatives.push(input[start..].trim());
    alternatives
}

/// Split one complex selector into compounds and combinators.
///
/// Whitespace around a symbolic combinator is absorbed into it, and a run of
/// pure whitespace becomes a single descendant combinator. Leading whitespace
/// is dropped; a leading or trailing symbolic combinator is kept so the
/// compiler can decide what it means.
///
/// ```
/// use sift_select::Combinator;
/// use sift_select::lexer::{SelectorToken, lex_complex};
///
/// assert_eq!(
///     lex_complex("ul  >li"),
///     vec![
///         SelectorToken::Compound("ul".to_string()),
///         SelectorToken::Combinator(Combinator::Child),
///         SelectorToken::Compound("li".to_string()),
///     ]
/// );
/// ```
#[must_use]
pub fn lex_complex(input: &str) -> Vec<SelectorToken> {
    let mut tokens = Vec::new();
    let mut compound = String::new();
    let mut separator: Option<Combinator> = None;
    let mut nesting = Nesting::default();

    for (i, c) in input.char_indices() {
        if nesting.is_top_level() {
            if c.is_whitespace() {
                flush_compound(&mut tokens, &mut compound);
                if separator.is_none() {
                    separator = Some(Combinator::Descendant);
                }
                continue;
            }
            if let Some(combinator) = Combinator::from_symbol(c) {
                flush_compound(&mut tokens, &mut compound);
                // The first symbol in a run wins over surrounding whitespace.
                if matches!(separator, None | Some(Combinator::Descendant)) {
                    separator = Some(combinator);
                }
                continue;
            }
        }

        if compound.is_empty()
            && let Some(combinator) = separator.take()
            && (!tokens.is_empty() || combinator != Combinator::Descendant)
        {
            tokens.push(SelectorToken::Combinator(combinator));
        }
        compound.push(c);
        nesting.advance(i, c);
    }

    flush_compound(&mut tokens, &mut compound);
    if let Some(combinator) = separator
        && combinator != Combinator::Descendant
    {
        tokens.push(SelectorToken::Combinator(combinator));
    }
    tokens
}

fn flush_compound(tokens: &mut Vec<SelectorToken>, compound: &mut String) {
    if !compound.is_empty() {
        tokens.push(SelectorToken::Compound(std::mem::take(compound)));
    }
}
