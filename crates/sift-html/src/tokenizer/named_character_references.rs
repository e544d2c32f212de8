//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The full table defines 2,231 entities; the common ones are carried here.
//! Anything not in the table is left in the output verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Entity names (without `&` and `;`) mapped to their replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        // Punctuation and symbols
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
        ("iexcl", "\u{00A1}"),
        ("iquest", "\u{00BF}"),
        ("shy", "\u{00AD}"),
        ("dagger", "\u{2020}"),
        ("Dagger", "\u{2021}"),
        ("prime", "\u{2032}"),
        ("larr", "\u{2190}"),
        ("rarr", "\u{2192}"),
        ("uarr", "\u{2191}"),
        ("darr", "\u{2193}"),
        ("hearts", "\u{2665}"),
        // Currency
        ("cent", "\u{00A2}"),
        ("pound", "\u{00A3}"),
        ("euro", "\u{20AC}"),
        ("yen", "\u{00A5}"),
        ("curren", "\u{00A4}"),
        // Math
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("plusmn", "\u{00B1}"),
        ("minus", "\u{2212}"),
        ("ne", "\u{2260}"),
        ("le", "\u{2264}"),
        ("ge", "\u{2265}"),
        ("deg", "\u{00B0}"),
        ("micro", "\u{00B5}"),
        ("frac12", "\u{00BD}"),
        ("frac14", "\u{00BC}"),
        ("frac34", "\u{00BE}"),
        ("infin", "\u{221E}"),
        // Latin-1 letters
        ("Agrave", "\u{00C0}"),
        ("Aacute", "\u{00C1}"),
        ("Auml", "\u{00C4}"),
        ("Ccedil", "\u{00C7}"),
        ("Eacute", "\u{00C9}"),
        ("Ntilde", "\u{00D1}"),
        ("Ouml", "\u{00D6}"),
        ("Uuml", "\u{00DC}"),
        ("szlig", "\u{00DF}"),
        ("agrave", "\u{00E0}"),
        ("aacute", "\u{00E1}"),
        ("acirc", "\u{00E2}"),
        ("auml", "\u{00E4}"),
        ("ccedil", "\u{00E7}"),
        ("egrave", "\u{00E8}"),
        ("eacute", "\u{00E9}"),
        ("ecirc", "\u{00EA}"),
        ("iacute", "\u{00ED}"),
        ("ntilde", "\u{00F1}"),
        ("oacute", "\u{00F3}"),
        ("ouml", "\u{00F6}"),
        ("uacute", "\u{00FA}"),
        ("uuml", "\u{00FC}"),
        // Greek
        ("alpha", "\u{03B1}"),
        ("beta", "\u{03B2}"),
        ("gamma", "\u{03B3}"),
        ("delta", "\u{03B4}"),
        ("lambda", "\u{03BB}"),
        ("mu", "\u{03BC}"),
        ("pi", "\u{03C0}"),
        ("sigma", "\u{03C3}"),
        ("omega", "\u{03C9}"),
    ])
});

/// Entities that are still recognized without a trailing semicolon.
const LEGACY_ENTITIES: &[&str] = &[
    "amp", "lt", "gt", "quot", "nbsp", "copy", "reg", "laquo", "raquo", "middot", "sect", "para",
    "iexcl", "iquest", "shy", "cent", "pound", "yen", "curren", "times", "divide", "plusmn", "deg",
    "micro", "frac12", "frac14", "frac34", "Agrave", "Aacute", "Auml", "Ccedil", "Eacute",
    "Ntilde", "Ouml", "Uuml", "szlig", "agrave", "aacute", "acirc", "auml", "ccedil", "egrave",
    "eacute", "ecirc", "iacute", "ntilde", "oacute", "ouml", "uacute", "uuml",
];

/// Look up a named entity by its bare name (no `&`, no `;`).
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode the character reference at the start of `rest`, which is the input
/// immediately after an `&`.
///
/// Returns the replacement text and how many bytes of `rest` it consumed, or
/// `None` if the `&` should be taken literally.
///
/// Inside attribute values a legacy (semicolon-less) reference followed by an
/// alphanumeric or `=` is not decoded, so `?a=1&copy=2` survives intact.
#[must_use]
pub fn decode_character_reference(rest: &str, in_attribute: bool) -> Option<(String, usize)> {
    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|(text, used)| (text, used + 1));
    }

    let name_len = rest
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];

    if rest[name_len..].starts_with(';')
        && let Some(value) = lookup_entity(name)
    {
        return Some((value.to_string(), name_len + 1));
    }

    // Longest legacy entity that prefixes the name.
    let (legacy, value) = (1..=name_len)
        .rev()
        .filter(|&len| LEGACY_ENTITIES.contains(&&name[..len]))
        .find_map(|len| lookup_entity(&name[..len]).map(|value| (len, value)))?;

    if in_attribute
        && rest[legacy..]
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'=')
    {
        return None;
    }
    Some((value.to_string(), legacy))
}

/// Decode `x41;`, `65;`, or the semicolon-less forms. `rest` is the input
/// after `&#`.
fn decode_numeric(rest: &str) -> Option<(String, usize)> {
    let (digits_start, radix) = match rest.as_bytes().first() {
        Some(b'x' | b'X') => (1, 16),
        _ => (0, 10),
    };
    let digits = &rest[digits_start..];
    let digit_len = digits
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if digit_len == 0 {
        return None;
    }

    let code = u32::from_str_radix(&digits[..digit_len], radix).ok();
    let ch = code
        .filter(|&c| c != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    let mut used = digits_start + digit_len;
    if rest[used..].starts_with(';') {
        used += 1;
    }
    Some((ch.to_string(), used))
}

/// Decode every character reference in `input`.
#[must_use]
pub fn decode_all(input: &str, in_attribute: bool) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match decode_character_reference(after, in_attribute) {
            Some((text, used)) => {
                out.push_str(&text);
                rest = &after[used..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
