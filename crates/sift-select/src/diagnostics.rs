//! Structural checks on selector text.
//!
//! [`compile`](crate::compile) accepts any string. These checks point out the
//! mistakes that make a selector silently match nothing (or less than
//! intended), without changing what it compiles to.

use thiserror::Error;

use crate::lexer::{Combinator, Nesting, SelectorToken, lex_complex, split_selector_list};

/// A problem found in selector text. Byte offsets point into the original
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorIssue {
    /// A `[` with no closing `]`.
    #[error("unterminated attribute selector opened at byte {0}")]
    UnterminatedBracket(usize),

    /// A quote with no closing quote of the same kind.
    #[error("unterminated quoted value opened at byte {0}")]
    UnterminatedQuote(usize),

    /// A `(` with no `)` or a `)` with no `(`.
    #[error("unbalanced parenthesis at byte {0}")]
    UnbalancedParen(usize),

    /// Nothing between two commas, or before or after one.
    #[error("empty selector in list")]
    EmptyAlternative,

    /// A combinator with no compound selector on one side.
    #[error("combinator '{}' is missing a selector on one side", .0.symbol())]
    DanglingCombinator(Combinator),
}

/// Check `selector` for structural problems.
///
/// Bracket, quote and parenthesis problems are reported first; the list and
/// combinator checks only run when those are clean, since an unclosed group
/// changes how the rest of the text is split.
///
/// ```
/// use sift_select::{SelectorIssue, diagnose};
///
/// assert!(diagnose("div > p, a[href]").is_empty());
/// assert_eq!(diagnose("a[href"), vec![SelectorIssue::UnterminatedBracket(1)]);
/// ```
#[must_use]
pub fn diagnose(selector: &str) -> Vec<SelectorIssue> {
    let issues = nesting_issues(selector);
    if !issues.is_empty() {
        return issues;
    }

    let mut issues = Vec::new();
    for alternative in split_selector_list(selector) {
        if alternative.is_empty() {
            if !issues.contains(&SelectorIssue::EmptyAlternative) {
                issues.push(SelectorIssue::EmptyAlternative);
            }
            continue;
        }
        let tokens = lex_complex(alternative);
        for token in [tokens.first(), tokens.last()].into_iter().flatten() {
            if let SelectorToken::Combinator(combinator) = token {
                let issue = SelectorIssue::DanglingCombinator(*combinator);
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }
    }
    issues
}

fn nesting_issues(selector: &str) -> Vec<SelectorIssue> {
    let mut nesting = Nesting::default();
    for (i, c) in selector.char_indices() {
        nesting.advance(i, c);
    }

    let mut issues: Vec<SelectorIssue> = nesting
        .unmatched
        .iter()
        .map(|&at| SelectorIssue::UnbalancedParen(at))
        .collect();
    if let Some((_, at)) = nesting.quote {
        issues.push(SelectorIssue::UnterminatedQuote(at));
    }
    if let Some(at) = nesting.bracket {
        issues.push(SelectorIssue::UnterminatedBracket(at));
    }
    if let Some(&at) = nesting.parens.first() {
        issues.push(SelectorIssue::UnbalancedParen(at));
    }
    issues
}
