use sift_common::warning::warn_once;
use strum_macros::Display;

use super::named_character_references::decode_all;
use super::token::{Attribute, Token};

/// Elements whose content is passed through as text, undecoded, until the
/// matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// Elements whose content is text with character references decoded.
const RCDATA_ELEMENTS: &[&str] = &["textarea", "title"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The subset of tokenizer states this machine walks through. Comments,
/// doctypes and raw text are scanned in one step from the state that
/// recognizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
}

/// A tag token under construction.
#[derive(Debug, Default)]
struct PendingTag {
    name: String,
    attributes: Vec<Attribute>,
    is_end: bool,
    self_closing: bool,
}

/// Turns markup into a flat [`Token`] stream.
///
/// ```
/// use sift_html::{MarkupTokenizer, Token};
///
/// let mut tokenizer = MarkupTokenizer::new("<p>hi</p>".to_string());
/// tokenizer.run();
/// let tokens = tokenizer.into_tokens();
/// assert_eq!(tokens[1], Token::text("hi"));
/// ```
pub struct MarkupTokenizer {
    state: TokenizerState,
    input: String,
    current_pos: usize,
    current_input_character: Option<char>,
    // "Reconsume in the X state": the main loop skips consuming once.
    reconsume: bool,
    at_eof: bool,
    token_stream: Vec<Token>,
    current_tag: Option<PendingTag>,
    current_attribute: Option<Attribute>,
    comment_buffer: String,
    // Undecoded character data since the last emitted token.
    text_buffer: String,
}

impl MarkupTokenizer {
    /// Create a new tokenizer for the given input. The initial state is the
    /// data state.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            at_eof: false,
            token_stream: Vec::new(),
            current_tag: None,
            current_attribute: None,
            comment_buffer: String::new(),
            text_buffer: String::new(),
        }
    }

    /// The state the machine is currently in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after `run()`.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the state machine to the end of the input. The stream always ends
    /// with [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while !self.at_eof {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            }
        }
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.current_pos..]
            .get(..target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    const fn is_whitespace_char(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ' | '\r')
    }

    // =========================================================================
    // Emission helpers
    // =========================================================================

    fn flush_text(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }
        let data = decode_all(&self.text_buffer, false);
        self.text_buffer.clear();
        self.token_stream.push(Token::Text { data });
    }

    fn emit(&mut self, token: Token) {
        self.flush_text();
        self.token_stream.push(token);
    }

    fn emit_eof_token(&mut self) {
        self.emit(Token::EndOfFile);
        self.at_eof = true;
    }

    /// EOF inside a tag: the unfinished tag is dropped.
    fn eof_in_tag(&mut self) {
        if let Some(tag) = self.current_tag.take() {
            let slash = if tag.is_end { "/" } else { "" };
            warn_once(
                "Tokenizer",
                &format!("input ended inside <{slash}{}>, tag dropped", tag.name),
            );
        }
        self.current_attribute = None;
        self.emit_eof_token();
    }

    fn start_tag(&mut self, is_end: bool) {
        self.current_tag = Some(PendingTag {
            is_end,
            ..PendingTag::default()
        });
        self.current_attribute = None;
    }

    fn start_attribute(&mut self) {
        self.commit_attribute();
        self.current_attribute = Some(Attribute::new("", ""));
    }

    /// Moves the attribute under construction onto the current tag. A name
    /// already present on the tag keeps its first value.
    fn commit_attribute(&mut self) {
        let Some(mut attribute) = self.current_attribute.take() else {
            return;
        };
        let Some(tag) = self.current_tag.as_mut() else {
            return;
        };
        if tag.attributes.iter().any(|a| a.name == attribute.name) {
            return;
        }
        attribute.value = decode_all(&attribute.value, true);
        tag.attributes.push(attribute);
    }

    fn push_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.name.push(c.to_ascii_lowercase());
        }
    }

    fn push_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self.current_attribute.as_mut() {
            attribute.value.push(c);
        }
    }

    fn emit_current_tag(&mut self) {
        self.commit_attribute();
        self.switch_to(TokenizerState::Data);
        let Some(tag) = self.current_tag.take() else {
            return;
        };

        if tag.is_end {
            self.emit(Token::EndTag { name: tag.name });
        } else if tag.self_closing {
            self.emit(Token::SelfClosingTag {
                name: tag.name,
                attributes: tag.attributes,
            });
        } else {
            let name = tag.name.clone();
            self.emit(Token::StartTag {
                name: tag.name,
                attributes: tag.attributes,
            });
            self.consume_element_text(&name);
        }
    }

    /// After a raw-text or RCDATA start tag, everything up to the matching
    /// end tag is a single text token. `plaintext` runs to the end of input.
    fn consume_element_text(&mut self, name: &str) {
        let raw = RAW_TEXT_ELEMENTS.contains(&name);
        let rcdata = RCDATA_ELEMENTS.contains(&name);
        if !raw && !rcdata && name != "plaintext" {
            return;
        }

        let rest = &self.input[self.current_pos..];
        let end = if name == "plaintext" {
            rest.len()
        } else {
            find_end_tag(rest, name).unwrap_or(rest.len())
        };

        let content = &rest[..end];
        if !content.is_empty() {
            let data = if rcdata {
                decode_all(content, false)
            } else {
                content.to_string()
            };
            self.token_stream.push(Token::Text { data });
        }
        self.current_pos += end;
    }

    /// Called right after `<!` has been consumed.
    fn consume_markup_declaration(&mut self) {
        if self.input[self.current_pos..].starts_with("--") {
            self.current_pos += 2;
            self.consume_comment();
        } else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.current_pos += "DOCTYPE".len();
            self.consume_doctype();
        } else {
            self.comment_buffer.clear();
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn consume_comment(&mut self) {
        let rest = &self.input[self.current_pos..];

        // Abrupt closings: `<!-->` and `<!--->`
        for abrupt in [">", "->"] {
            if rest.starts_with(abrupt) {
                self.current_pos += abrupt.len();
                self.emit(Token::Comment {
                    data: String::new(),
                });
                self.switch_to(TokenizerState::Data);
                return;
            }
        }

        if let Some(end) = rest.find("-->") {
            let data = rest[..end].to_string();
            self.current_pos += end + 3;
            self.emit(Token::Comment { data });
            self.switch_to(TokenizerState::Data);
        } else {
            warn_once("Tokenizer", "input ended inside a comment");
            let data = rest.to_string();
            self.current_pos = self.input.len();
            self.emit(Token::Comment { data });
            self.emit_eof_token();
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Only the name is kept; public and system identifiers are skipped.
    fn consume_doctype(&mut self) {
        let rest = &self.input[self.current_pos..];
        let (body, used, closed) = match rest.find('>') {
            Some(end) => (&rest[..end], end + 1, true),
            None => (rest, rest.len(), false),
        };
        let name = body
            .split_ascii_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.current_pos += used;
        self.emit(Token::Doctype { name });

        if closed {
            self.switch_to(TokenizerState::Data);
        } else {
            warn_once("Tokenizer", "input ended inside a doctype");
            self.emit_eof_token();
        }
    }

    // =========================================================================
    // State handlers
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            None => self.emit_eof_token(),
            Some(c) => self.text_buffer.push(c),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            Some('!') => self.consume_markup_declaration(),
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.start_tag(false);
                self.reconsume_in(TokenizerState::TagName);
            }
            // `<?xml ...>` and friends become bogus comments that keep the `?`.
            Some('?') => {
                self.comment_buffer.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            None => {
                self.text_buffer.push('<');
                self.emit_eof_token();
            }
            // "a < b": the `<` is just text.
            Some(_) => {
                self.text_buffer.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.start_tag(true);
                self.reconsume_in(TokenizerState::TagName);
            }
            // `</>` is dropped entirely.
            Some('>') => self.switch_to(TokenizerState::Data),
            None => {
                self.text_buffer.push_str("</");
                self.emit_eof_token();
            }
            Some(_) => {
                self.comment_buffer.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            None => self.eof_in_tag(),
            Some(c) => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - ... Start a new attribute in the current tag token.
            // Set that attribute's name to the current input character"
            Some('=') => {
                self.start_attribute();
                self.push_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c) => self.push_to_attribute_name(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // missing-attribute-value: the attribute keeps an empty value.
            Some('>') => self.emit_current_tag(),
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            None => self.eof_in_tag(),
            Some(c) => self.push_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('>') => self.emit_current_tag(),
            None => self.eof_in_tag(),
            Some(c) => self.push_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            None => self.eof_in_tag(),
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = true;
                }
                self.emit_current_tag();
            }
            None => self.eof_in_tag(),
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                let data = std::mem::take(&mut self.comment_buffer);
                self.emit(Token::Comment { data });
                self.switch_to(TokenizerState::Data);
            }
            None => {
                let data = std::mem::take(&mut self.comment_buffer);
                self.emit(Token::Comment { data });
                self.emit_eof_token();
            }
            Some(c) => self.comment_buffer.push(c),
        }
    }
}

/// Byte offset in `haystack` of the first `</name` (ASCII case-insensitive)
/// followed by whitespace, `/` or `>`.
fn find_end_tag(haystack: &str, name: &str) -> Option<usize> {
    let lowered = haystack.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;
    while let Some(found) = lowered[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        match lowered.as_bytes().get(after) {
            Some(b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'/' | b'>') => return Some(start),
            _ => from = after,
        }
    }
    None
}

/// Tokenize `input` in one call.
///
/// ```
/// use sift_html::{Token, tokenize};
///
/// let tokens = tokenize("<br/>");
/// assert_eq!(tokens, vec![Token::self_closing_tag("br", vec![]), Token::EndOfFile]);
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = MarkupTokenizer::new(input.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}
