use std::fmt;

/// A name/value pair on a start or self-closing tag.
///
/// Valueless attributes (`<input disabled>`) carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, ASCII-lowercased.
    pub name: String,
    /// Attribute value with character references decoded.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One unit of the tag stream.
///
/// The tree builder acts on the first four kinds; comments and doctypes are
/// carried so the stream is a faithful account of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value>`
    StartTag {
        /// Tag name, ASCII-lowercased.
        name: String,
        /// Attributes in source order, duplicates removed (first wins).
        attributes: Vec<Attribute>,
    },

    /// `<name attr=value/>`
    SelfClosingTag {
        /// Tag name, ASCII-lowercased.
        name: String,
        /// Attributes in source order, duplicates removed (first wins).
        attributes: Vec<Attribute>,
    },

    /// `</name>`
    EndTag {
        /// Tag name, ASCII-lowercased.
        name: String,
    },

    /// A run of character data between tags, references decoded.
    Text {
        /// Raw (unnormalized) text.
        data: String,
    },

    /// `<!-- data -->`, also used for bogus comments such as `<?xml ...>`.
    Comment {
        /// Comment body.
        data: String,
    },

    /// `<!DOCTYPE name>`
    Doctype {
        /// Doctype name, ASCII-lowercased; empty if missing.
        name: String,
    },

    /// End of input. Always the last token of a stream.
    EndOfFile,
}

impl Token {
    /// Convenience constructor for a start tag.
    #[must_use]
    pub fn start_tag(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::StartTag {
            name: name.to_string(),
            attributes,
        }
    }

    /// Convenience constructor for a self-closing tag.
    #[must_use]
    pub fn self_closing_tag(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::SelfClosingTag {
            name: name.to_string(),
            attributes,
        }
    }

    /// Convenience constructor for an end tag.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    /// Convenience constructor for a text token.
    #[must_use]
    pub fn text(data: &str) -> Self {
        Self::Text {
            data: data.to_string(),
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag { name, attributes } | Self::SelfClosingTag { name, attributes } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if matches!(self, Self::SelfClosingTag { .. }) {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Text { data } => write!(f, "Text({data:?})"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Doctype { name } => write!(f, "<!DOCTYPE {name}>"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
