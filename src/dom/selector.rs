//! A small CSS selector subset for locating binding targets.
//!
//! Supported: comma-separated lists of compound selectors built from a tag
//! (or `*`), `#id`, `.class` and attribute tests (`[attr]`, `[attr=v]`,
//! `[attr*=v]`, `[attr^=v]`, `[attr$=v]`, `[attr~=v]`). Combinators and
//! pseudo-classes are rejected so a selector never silently matches more
//! than it says.
//!
//! The source text is kept so browser backends can hand it to
//! `querySelectorAll` unchanged.

use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

/// Error returned when a selector string cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector '{selector}' at column {column}: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub column: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum Unsupported {
    #[error("empty selector")]
    Empty,
    #[error("combinators are not supported")]
    Combinator,
    #[error("pseudo-classes are not supported")]
    PseudoClass,
    #[error("type selector must come first")]
    TagPosition,
}

/// How an attribute test compares values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
    /// Whitespace-separated word match (`~=`).
    Includes(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrTest {
    pub name: String,
    pub op: AttrOp,
}

impl AttrTest {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(expected) => value == expected,
            AttrOp::Contains(needle) => !needle.is_empty() && value.contains(needle.as_str()),
            AttrOp::Prefix(prefix) => !prefix.is_empty() && value.starts_with(prefix.as_str()),
            AttrOp::Suffix(suffix) => !suffix.is_empty() && value.ends_with(suffix.as_str()),
            AttrOp::Includes(word) => value.split_whitespace().any(|w| w == word),
        }
    }
}

/// One compound selector, e.g. `meta[name=theme-color]` or `input#checkbox`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub universal: bool,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrTest>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    /// Simple form check used by markup rendering: `.name` and nothing else.
    pub fn as_single_class(&self) -> Option<&str> {
        match (&self.tag, self.universal, &self.id, self.classes.as_slice(), self.attrs.is_empty()) {
            (None, false, None, [class], true) => Some(class.as_str()),
            _ => None,
        }
    }

    /// Simple form check used by markup rendering: `#name` and nothing else.
    pub fn as_single_id(&self) -> Option<&str> {
        match (&self.tag, self.universal, &self.id, self.classes.is_empty(), self.attrs.is_empty()) {
            (None, false, Some(id), true, true) => Some(id.as_str()),
            _ => None,
        }
    }

    fn matches(&self, tag: &str, attribute: &dyn Fn(&str) -> Option<String>) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if attribute("id").as_deref() != Some(expected.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = attribute("class").unwrap_or_default();
            let has_all = self
                .classes
                .iter()
                .all(|class| class_attr.split_whitespace().any(|c| c == class));
            if !has_all {
                return false;
            }
        }
        self.attrs
            .iter()
            .all(|test| test.matches(attribute(&test.name).as_deref()))
    }
}

/// A parsed selector list.
///
/// ```rust
/// use nocturne::Selector;
///
/// let selector = Selector::parse("meta[name=theme-color]").unwrap();
/// assert_eq!(selector.source(), "meta[name=theme-color]");
/// assert!(Selector::parse(".wrapper > .toggle").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let alternatives = parse_list(&mut parser).map_err(|e| SelectorError {
            selector: source.to_string(),
            column: e.location.column,
            reason: describe(&e.kind),
        })?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }

    /// The single compound, when the selector is not a list.
    pub fn single(&self) -> Option<&Compound> {
        match self.alternatives.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Tests an element given its tag name and an attribute lookup.
    ///
    /// `class` and `id` are read through the same lookup.
    pub fn matches(&self, tag: &str, attribute: &dyn Fn(&str) -> Option<String>) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.matches(tag, attribute))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Selector::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.source
    }
}

fn parse_list<'i>(parser: &mut Parser<'i, '_>) -> Result<Vec<Compound>, ParseError<'i, Unsupported>> {
    let mut alternatives = Vec::new();
    let mut current = Compound::default();
    // Set once whitespace follows a non-empty compound; only `,` or the end
    // may come next.
    let mut closed = false;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) => {
                if !current.is_empty() {
                    closed = true;
                }
            }
            Token::Comma => {
                if current.is_empty() {
                    return Err(parser.new_custom_error(Unsupported::Empty));
                }
                alternatives.push(std::mem::take(&mut current));
                closed = false;
            }
            Token::Delim('>') | Token::Delim('+') | Token::Delim('~') => {
                return Err(parser.new_custom_error(Unsupported::Combinator));
            }
            _ if closed => {
                return Err(parser.new_custom_error(Unsupported::Combinator));
            }
            Token::Ident(name) => {
                if !current.is_empty() {
                    return Err(parser.new_custom_error(Unsupported::TagPosition));
                }
                current.tag = Some(name.to_ascii_lowercase());
            }
            Token::Delim('*') => {
                if !current.is_empty() {
                    return Err(parser.new_custom_error(Unsupported::TagPosition));
                }
                current.universal = true;
            }
            Token::IDHash(id) => {
                current.id = Some(id.to_string());
            }
            Token::Delim('.') => {
                let class = parser.expect_ident()?.to_string();
                current.classes.push(class);
            }
            Token::SquareBracketBlock => {
                let test = parser.parse_nested_block(|nested| parse_attribute(nested))?;
                current.attrs.push(test);
            }
            Token::Colon => {
                return Err(parser.new_custom_error(Unsupported::PseudoClass));
            }
            other => return Err(parser.new_unexpected_token_error(other)),
        }
    }

    if current.is_empty() {
        return Err(parser.new_custom_error(Unsupported::Empty));
    }
    alternatives.push(current);
    Ok(alternatives)
}

fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> Result<AttrTest, ParseError<'i, Unsupported>> {
    let name = parser.expect_ident()?.to_ascii_lowercase();
    if parser.is_exhausted() {
        return Ok(AttrTest {
            name,
            op: AttrOp::Exists,
        });
    }

    let operator = parser.next()?.clone();
    let value = parser.expect_ident_or_string()?.to_string();
    let op = match operator {
        Token::Delim('=') => AttrOp::Equals(value),
        Token::SubstringMatch => AttrOp::Contains(value),
        Token::PrefixMatch => AttrOp::Prefix(value),
        Token::SuffixMatch => AttrOp::Suffix(value),
        Token::IncludeMatch => AttrOp::Includes(value),
        other => return Err(parser.new_unexpected_token_error(other)),
    };

    if !parser.is_exhausted() {
        let trailing = parser.next()?.clone();
        return Err(parser.new_unexpected_token_error(trailing));
    }
    Ok(AttrTest { name, op })
}

fn describe(kind: &ParseErrorKind<'_, Unsupported>) -> String {
    match kind {
        ParseErrorKind::Custom(unsupported) => unsupported.to_string(),
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {:?}", token)
        }
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => "unexpected end of input".to_string(),
        ParseErrorKind::Basic(other) => format!("{:?}", other),
    }
}
