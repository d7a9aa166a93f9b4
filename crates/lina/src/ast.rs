/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! This module defines the node tree produced by the parser. Value and block
//! nodes keep the position of their opening directive so render-time failures
//! can point back at the source.

use crate::error::SourcePosition;
use crate::formatter::{BlockFormatter, ValueFormatter};
use std::fmt;

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text to be output as-is.
    Literal(String),

    /// Reserved character token: `{{_NEWLINE}}`, `{{_SPACE}}`, ...
    Special(SpecialToken),

    /// Variable interpolation: `{{var}}` or `{{obj.field:hex}}`
    Value(ValueRef),

    /// Block: `{{#name}}...{{/name}}` or negated `{{!name}}...{{/name}}`
    Block(Block),

    /// Iteration-position sub-block: `{{#name#First}}...{{/name#First}}`
    Modifier(Modifier),

    /// Included template: `{{>name}}`
    Include(Include),
}

/// The four reserved character tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialToken {
    Newline,
    Space,
    LeftBrace,
    RightBrace,
}

impl SpecialToken {
    /// Look up a reserved token by its name without the leading underscore.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NEWLINE" => Some(SpecialToken::Newline),
            "SPACE" => Some(SpecialToken::Space),
            "LEFT_BRACE" => Some(SpecialToken::LeftBrace),
            "RIGHT_BRACE" => Some(SpecialToken::RightBrace),
            _ => None,
        }
    }

    /// The character this token emits.
    pub fn as_char(self) -> char {
        match self {
            SpecialToken::Newline => '\n',
            SpecialToken::Space => ' ',
            SpecialToken::LeftBrace => '{',
            SpecialToken::RightBrace => '}',
        }
    }
}

/// One accessor in a variable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// The current element, written `.`
    Current,
    /// A map key or object attribute.
    Field(String),
    /// A list index, written `[n]`.
    Index(usize),
}

/// A non-empty sequence of path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Create a path. Returns `None` for an empty segment list.
    pub fn new(segments: Vec<PathSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The first segment. Paths are never empty.
    pub fn head(&self) -> &PathSegment {
        &self.segments[0]
    }

    /// Everything after the first segment.
    pub fn tail(&self) -> &[PathSegment] {
        &self.segments[1..]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Current => write!(f, ".")?,
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => {
                    if self.segments[i - 1] != PathSegment::Current {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?
                }
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

/// A variable reference with its formatter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRef {
    pub path: Path,
    /// Value formatters, applied left to right.
    pub formatters: Vec<ValueFormatter>,
    pub position: SourcePosition,
}

/// A normal or negated block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The block name as written, e.g. `items` or `group.items`.
    pub name: String,
    /// The parsed form of `name`, resolved against the scope chain.
    pub path: Path,
    /// `true` for `{{!name}}`: children render only when `name` is absent.
    pub negated: bool,
    pub children: Vec<TemplateNode>,
    /// Block formatters, applied left to right to the iteration outputs.
    pub formatters: Vec<BlockFormatter>,
    pub position: SourcePosition,
}

/// Which iterations a modifier renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    First,
    Last,
    Separator,
}

impl ModifierKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "First" => Some(ModifierKind::First),
            "Last" => Some(ModifierKind::Last),
            "Separator" => Some(ModifierKind::Separator),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModifierKind::First => "First",
            ModifierKind::Last => "Last",
            ModifierKind::Separator => "Separator",
        }
    }

    /// Whether iteration `index` out of `count` selects this modifier.
    pub fn fires(self, index: usize, count: usize) -> bool {
        match self {
            ModifierKind::First => index == 0,
            ModifierKind::Last => index + 1 == count,
            ModifierKind::Separator => index + 1 < count,
        }
    }
}

/// A `First`/`Last`/`Separator` sub-block of the block named `owner`.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub owner: String,
    pub children: Vec<TemplateNode>,
}

/// An included template, resolved at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub name: String,
    pub children: Vec<TemplateNode>,
}
