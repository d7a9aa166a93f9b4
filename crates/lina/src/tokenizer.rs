/*
 * tokenizer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template tokenizer.
//!
//! Splits template source into literal text runs and `{{...}}` directives.
//! The tokenizer is a lazy, one-pass iterator that tracks line and column so
//! every token knows where it starts. Directive bodies are classified by their
//! leading sigil and their `:formatter[=argument]` suffixes are split off, but
//! nothing is validated against the formatter registry here.

use crate::error::{CompileError, CompileErrorKind, SourcePosition};
use std::sync::Arc;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A formatter reference as written in the source: `name[=argument]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterSpec<'a> {
    pub name: &'a str,
    pub argument: Option<&'a str>,
}

/// A classified directive body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `{{path}}`
    Value { path: &'a str },
    /// `{{#name}}`
    BlockOpen { name: &'a str },
    /// `{{!name}}`
    NegatedOpen { name: &'a str },
    /// `{{/name}}` or `{{/name#Kind}}`
    BlockClose { name: &'a str },
    /// `{{#owner#Kind}}`
    ModifierOpen { owner: &'a str, modifier: &'a str },
    /// `{{>name}}`
    Include { name: &'a str },
    /// `{{_NAME}}`
    Special { name: &'a str },
}

/// A single token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text {
        text: &'a str,
        position: SourcePosition,
    },
    Directive {
        directive: Directive<'a>,
        formatters: Vec<FormatterSpec<'a>>,
        /// The raw text between the braces.
        body: &'a str,
        position: SourcePosition,
    },
}

impl Token<'_> {
    pub fn position(&self) -> &SourcePosition {
        match self {
            Token::Text { position, .. } | Token::Directive { position, .. } => position,
        }
    }
}

/// Lazy iterator over the tokens of a template source.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    filename: Option<Arc<str>>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            filename: None,
            failed: false,
        }
    }

    /// Attach a filename to the positions of all produced tokens.
    pub fn with_filename(mut self, filename: Option<Arc<str>>) -> Self {
        self.filename = filename;
        self
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.offset, self.line, self.column)
            .with_filename(self.filename.clone())
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Consume `len` bytes, keeping line and column up to date.
    fn advance(&mut self, len: usize) -> &'a str {
        let consumed = &self.source[self.offset..self.offset + len];
        match consumed.rfind('\n') {
            Some(last) => {
                self.line += consumed.matches('\n').count();
                self.column = consumed[last + 1..].chars().count() + 1;
            }
            None => self.column += consumed.chars().count(),
        }
        self.offset += len;
        consumed
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.source.len() {
            return None;
        }

        let position = self.current_position();
        let rest = self.remaining();

        if !rest.starts_with(OPEN) {
            let len = rest.find(OPEN).unwrap_or(rest.len());
            let text = self.advance(len);
            return Some(Ok(Token::Text { text, position }));
        }

        let Some(body_len) = rest[OPEN.len()..].find(CLOSE) else {
            self.failed = true;
            return Some(Err(CompileError::new(
                CompileErrorKind::UnterminatedDirective,
                position,
            )));
        };

        let raw = self.advance(OPEN.len() + body_len + CLOSE.len());
        let body = &raw[OPEN.len()..OPEN.len() + body_len];
        let (directive, formatters) = classify(body);
        Some(Ok(Token::Directive {
            directive,
            formatters,
            body,
            position,
        }))
    }
}

/// Split a directive body into its classified head and formatter suffixes.
pub fn classify(body: &str) -> (Directive<'_>, Vec<FormatterSpec<'_>>) {
    let (head, formatters) = match body.split_once(':') {
        Some((head, specs)) => (head, parse_formatter_specs(specs)),
        None => (body, Vec::new()),
    };

    let directive = if let Some(name) = head.strip_prefix('#') {
        match name.split_once('#') {
            Some((owner, modifier)) => Directive::ModifierOpen { owner, modifier },
            None => Directive::BlockOpen { name },
        }
    } else if let Some(name) = head.strip_prefix('/') {
        Directive::BlockClose { name }
    } else if let Some(name) = head.strip_prefix('!') {
        Directive::NegatedOpen { name }
    } else if let Some(name) = head.strip_prefix('>') {
        Directive::Include { name }
    } else if let Some(name) = head.strip_prefix('_') {
        Directive::Special { name }
    } else {
        Directive::Value { path: head }
    };

    (directive, formatters)
}

fn parse_formatter_specs(specs: &str) -> Vec<FormatterSpec<'_>> {
    specs
        .split(':')
        .map(|spec| match spec.split_once('=') {
            Some((name, argument)) => FormatterSpec {
                name,
                argument: Some(argument),
            },
            None => FormatterSpec {
                name: spec,
                argument: None,
            },
        })
        .collect()
}
