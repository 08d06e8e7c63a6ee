//! Pandoc document tree, as exchanged with JSON filters.
//!
//! The types mirror pandoc-types 1.23. Every node kind is a variant of a
//! closed enum so that rewrite passes match exhaustively; the serde
//! representation is pandoc's own (`{"t": tag, "c": contents}`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API version written for documents built in memory.
pub const API_VERSION: [u32; 3] = [1, 23, 1];

pub const NBSP: char = '\u{a0}';
pub const EN_DASH: char = '\u{2013}';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    pub meta: Map<String, Value>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            api_version: API_VERSION.to_vec(),
            meta: Map::new(),
            blocks,
        }
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Identifier, classes and key/value attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
    pub identifier: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

#[derive(Serialize, Deserialize)]
struct AttrRepr(String, Vec<String>, Vec<(String, String)>);

impl From<AttrRepr> for Attr {
    fn from(AttrRepr(identifier, classes, attributes): AttrRepr) -> Self {
        Self {
            identifier,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrRepr {
    fn from(attr: Attr) -> Self {
        AttrRepr(attr.identifier, attr.classes, attr.attributes)
    }
}

impl Attr {
    pub fn with_id(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// The identifier, or `None` when it is empty.
    pub fn id(&self) -> Option<&str> {
        if self.identifier.is_empty() {
            None
        } else {
            Some(&self.identifier)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove every attribute named `key`, returning the first value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == key)?;
        let (_, value) = self.attributes.remove(idx);
        self.attributes.retain(|(k, _)| k != key);
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(String, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i64, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Attr, Caption, Vec<ColSpec>, TableHead, Vec<TableBody>, TableFoot),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

impl Block {
    pub fn attr(&self) -> Option<&Attr> {
        match self {
            Block::CodeBlock(attr, _)
            | Block::Header(_, attr, _)
            | Block::Table(attr, ..)
            | Block::Figure(attr, ..)
            | Block::Div(attr, _) => Some(attr),
            Block::Plain(_)
            | Block::Para(_)
            | Block::LineBlock(_)
            | Block::RawBlock(..)
            | Block::BlockQuote(_)
            | Block::OrderedList(..)
            | Block::BulletList(_)
            | Block::DefinitionList(_)
            | Block::HorizontalRule => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.attr().and_then(Attr::id)
    }

    /// First `Str` text under this block, in document order.
    ///
    /// Captions of nested floats are not searched.
    pub fn first_str_mut(&mut self) -> Option<&mut String> {
        match self {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
                first_str_mut(inlines)
            }
            Block::LineBlock(lines) => lines.iter_mut().find_map(|line| first_str_mut(line)),
            Block::BlockQuote(blocks) | Block::Figure(_, _, blocks) | Block::Div(_, blocks) => {
                first_str_in_blocks(blocks)
            }
            Block::OrderedList(_, items) | Block::BulletList(items) => {
                items.iter_mut().find_map(|item| first_str_in_blocks(item))
            }
            Block::DefinitionList(items) => items.iter_mut().find_map(|(term, defs)| {
                if let Some(text) = first_str_mut(term) {
                    return Some(text);
                }
                defs.iter_mut().find_map(|def| first_str_in_blocks(def))
            }),
            Block::Table(_, _, _, head, bodies, foot) => head
                .1
                .iter_mut()
                .chain(bodies.iter_mut().flat_map(|b| b.2.iter_mut().chain(b.3.iter_mut())))
                .chain(foot.1.iter_mut())
                .flat_map(|row| row.1.iter_mut())
                .find_map(|cell| first_str_in_blocks(&mut cell.4)),
            Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    Cite(Vec<Citation>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(MathType, String),
    RawInline(String, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

impl Inline {
    pub fn str(s: impl Into<String>) -> Self {
        Inline::Str(s.into())
    }

    /// First `Str` text at or under this inline, in document order.
    ///
    /// Citation prefixes and suffixes are not part of a `Cite`'s content.
    pub fn first_str_mut(&mut self) -> Option<&mut String> {
        match self {
            Inline::Str(text) => Some(text),
            Inline::Emph(content)
            | Inline::Underline(content)
            | Inline::Strong(content)
            | Inline::Strikeout(content)
            | Inline::Superscript(content)
            | Inline::Subscript(content)
            | Inline::SmallCaps(content)
            | Inline::Quoted(_, content)
            | Inline::Cite(_, content)
            | Inline::Link(_, content, _)
            | Inline::Image(_, content, _)
            | Inline::Span(_, content) => first_str_mut(content),
            Inline::Note(blocks) => first_str_in_blocks(blocks),
            Inline::Code(..)
            | Inline::Space
            | Inline::SoftBreak
            | Inline::LineBreak
            | Inline::Math(..)
            | Inline::RawInline(..) => None,
        }
    }
}

pub fn first_str_mut(inlines: &mut [Inline]) -> Option<&mut String> {
    inlines.iter_mut().find_map(Inline::first_str_mut)
}

pub fn first_str_in_blocks(blocks: &mut [Block]) -> Option<&mut String> {
    blocks.iter_mut().find_map(Block::first_str_mut)
}

/// Plain text of a run of inlines; breaks and spaces become a single space.
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain(inlines, &mut out);
    out
}

fn push_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Str(text) | Inline::Code(_, text) | Inline::Math(_, text) => {
                out.push_str(text)
            }
            Inline::Space | Inline::SoftBreak | Inline::LineBreak => out.push(' '),
            Inline::Emph(content)
            | Inline::Underline(content)
            | Inline::Strong(content)
            | Inline::Strikeout(content)
            | Inline::Superscript(content)
            | Inline::Subscript(content)
            | Inline::SmallCaps(content)
            | Inline::Quoted(_, content)
            | Inline::Cite(_, content)
            | Inline::Link(_, content, _)
            | Inline::Image(_, content, _)
            | Inline::Span(_, content) => push_plain(content, out),
            Inline::RawInline(..) | Inline::Note(_) => {}
        }
    }
}

/// Short caption (if any) and caption body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption(pub Option<Vec<Inline>>, pub Vec<Block>);

impl Caption {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self(None, blocks)
    }

    pub fn first_str_mut(&mut self) -> Option<&mut String> {
        first_str_in_blocks(&mut self.1)
    }
}

/// URL and title.
pub type Target = (String, String);

pub type ListAttributes = (i64, ListNumberStyle, ListNumberDelim);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "citationId")]
    pub id: String,
    #[serde(rename = "citationPrefix")]
    pub prefix: Vec<Inline>,
    #[serde(rename = "citationSuffix")]
    pub suffix: Vec<Inline>,
    #[serde(rename = "citationMode")]
    pub mode: CitationMode,
    #[serde(rename = "citationNoteNum")]
    pub note_num: i64,
    #[serde(rename = "citationHash")]
    pub hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    AlignDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

pub type ColSpec = (Alignment, ColWidth);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableHead(pub Attr, pub Vec<Row>);

/// Attributes, row-head column count, intermediate head rows, body rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBody(pub Attr, pub i64, pub Vec<Row>, pub Vec<Row>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFoot(pub Attr, pub Vec<Row>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(pub Attr, pub Vec<Cell>);

/// Attributes, alignment, row span, column span, content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell(pub Attr, pub Alignment, pub i64, pub i64, pub Vec<Block>);
