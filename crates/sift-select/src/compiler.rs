//! Selector text to [`Checker`].
//!
//! Compilation never fails. Anything it cannot make sense of degrades to a
//! checker that matches nothing, and a warning is printed once.

use sift_common::warning::warn_once;

use crate::checker::{AttributeSelector, Checker, PseudoClass};
use crate::diagnostics::diagnose;
use crate::lexer::{Combinator, Nesting, SelectorToken, lex_complex, split_selector_list};

/// Compile a selector list into a single [`Checker`].
///
/// ```
/// use sift_select::{Checker, compile};
///
/// assert_eq!(compile("div"), Checker::Tag("div".to_string()));
/// assert_eq!(compile(":hover"), Checker::Never);
/// ```
#[must_use]
pub fn compile(selector: &str) -> Checker {
    for issue in diagnose(selector) {
        warn_once("Selector", &format!("{issue} in `{selector}`"));
    }
    compile_list(selector)
}

fn compile_list(selector: &str) -> Checker {
    Checker::any(
        split_selector_list(selector)
            .into_iter()
            .map(compile_complex)
            .collect(),
    )
}

/// Compile one alternative, left to right.
///
/// Each compound is ANDed with everything to its left, and each combinator
/// wraps that accumulated checker so it is tested against the related node.
fn compile_complex(selector: &str) -> Checker {
    let mut accumulated: Option<Checker> = None;
    let mut ends_with_combinator = false;

    for token in lex_complex(selector) {
        match token {
            SelectorToken::Compound(text) => {
                let compound = compile_compound(&text);
                accumulated = Some(match accumulated.take() {
                    Some(left) => Checker::all(vec![compound, left]),
                    None => compound,
                });
                ends_with_combinator = false;
            }
            SelectorToken::Combinator(combinator) => {
                // Nothing on the left: the relation can never be satisfied.
                let left = accumulated.take().unwrap_or(Checker::Never);
                accumulated = Some(wrap(combinator, left));
                ends_with_combinator = true;
            }
        }
    }

    match accumulated {
        Some(checker) if !ends_with_combinator => checker,
        _ => Checker::Never,
    }
}

fn wrap(combinator: Combinator, left: Checker) -> Checker {
    let left = Box::new(left);
    match combinator {
        Combinator::Descendant => Checker::Ancestor(left),
        Combinator::Child => Checker::Parent(left),
        Combinator::NextSibling => Checker::PreviousSibling(left),
        Combinator::SubsequentSibling => Checker::PrecedingSibling(left),
    }
}

/// Characters that end a name inside a compound.
const fn ends_name(c: char) -> bool {
    matches!(c, '.' | '#' | '[' | ':' | '*' | '(')
}

/// Compile a run of simple selectors into their conjunction.
///
/// Empty names (`div.` or a bare `#`) contribute nothing.
fn compile_compound(compound: &str) -> Checker {
    let mut checks = Vec::new();
    let mut rest = compound;

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '*' => checks.push(Checker::Always),
            '.' | '#' => {
                let (name, tail) = take_name(rest);
                rest = tail;
                if !name.is_empty() {
                    checks.push(if c == '.' {
                        Checker::Class(name.to_string())
                    } else {
                        Checker::Id(name.to_string())
                    });
                }
            }
            '[' => {
                let (body, tail) = take_until_close(rest, ']');
                rest = tail;
                if let Some(attribute) = parse_attribute(body) {
                    checks.push(Checker::Attribute(attribute));
                }
            }
            ':' => {
                let (name, tail) = take_name(rest);
                rest = tail;
                let argument = if let Some(inner) = rest.strip_prefix('(') {
                    let (argument, tail) = take_until_close(inner, ')');
                    rest = tail;
                    Some(argument)
                } else {
                    None
                };
                checks.push(compile_pseudo(name, argument));
            }
            // A stray `(` or `]` has no meaning on its own.
            '(' | ']' | ')' => {}
            _ => {
                let start = compound.len() - rest.len() - c.len_utf8();
                let (name, tail) = take_name(&compound[start..]);
                rest = tail;
                checks.push(Checker::Tag(name.to_string()));
            }
        }
    }

    Checker::all(checks)
}

fn take_name(input: &str) -> (&str, &str) {
    let end = input.find(ends_name).unwrap_or(input.len());
    input.split_at(end)
}

/// Split `input` at the `close` that ends the current group, using the same
/// nesting rules as the lexer. Returns the group body and the text after
/// `close`. An unterminated group takes the rest of the input.
fn take_until_close(input: &str, close: char) -> (&str, &str) {
    let opener = if close == ']' { '[' } else { '(' };
    let mut nesting = Nesting::opened_by(opener);
    for (i, c) in input.char_indices() {
        nesting.advance(i + 1, c);
        if nesting.is_top_level() {
            return (&input[..i], &input[i + c.len_utf8()..]);
        }
    }
    (input, "")
}

/// Remove one pair of matching outer quotes, if present.
fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parse the inside of `[...]`.
fn parse_attribute(body: &str) -> Option<AttributeSelector> {
    let Some(eq) = body.find('=') else {
        let name = body.trim();
        return (!name.is_empty()).then(|| AttributeSelector::Exists(name.to_string()));
    };

    let (name_part, operator) = match body[..eq].chars().last() {
        Some(op @ ('~' | '|' | '^' | '$' | '*' | '!')) => (&body[..eq - 1], Some(op)),
        _ => (&body[..eq], None),
    };
    let name = name_part.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let value = unquote(body[eq + 1..].trim()).to_string();

    Some(match operator {
        None => AttributeSelector::Equals(name, value),
        Some('~') => AttributeSelector::Includes(name, value),
        Some('|') => AttributeSelector::DashMatch(name, value),
        Some('^') => AttributeSelector::PrefixMatch(name, value),
        Some('$') => AttributeSelector::SuffixMatch(name, value),
        Some('*') => AttributeSelector::SubstringMatch(name, value),
        Some(_) => AttributeSelector::NotEquals(name, value),
    })
}

fn compile_pseudo(name: &str, argument: Option<&str>) -> Checker {
    match (name, argument) {
        ("has", Some(inner)) => Checker::Has(Box::new(compile_list(inner))),
        ("contains", Some(text)) => Checker::Contains(unquote(text).to_string()),
        (_, None) => name.parse::<PseudoClass>().map_or_else(
            |_| unknown_pseudo(name),
            Checker::Pseudo,
        ),
        (_, Some(_)) => unknown_pseudo(name),
    }
}

fn unknown_pseudo(name: &str) -> Checker {
    warn_once(
        "Selector",
        &format!("unsupported pseudo-class ':{name}' never matches"),
    );
    Checker::Never
}
