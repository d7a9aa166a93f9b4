/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable paths and their resolution against a chain of scopes.
//!
//! A path such as `item.fields[2].name` is parsed once at compile time into
//! [`PathSegment`]s. At render time it is resolved against a [`Scope`] chain:
//! the first segment is looked up innermost scope first, the remaining
//! segments are followed strictly from the value found there.

use crate::ast::{Path, PathSegment};
use crate::context::TemplateValue;
use std::borrow::Cow;

/// Parse the textual form of a path.
///
/// Grammar: `("." | ident) { "." ident | "[" digits "]" }`, where a leading
/// `.` may be directly followed by an ident or an index (`.field`, `.[0]`).
/// Returns `None` if the text does not follow the grammar.
pub fn parse_path(text: &str) -> Option<Path> {
    let mut segments = Vec::new();
    let mut rest = text;

    if let Some(after_dot) = rest.strip_prefix('.') {
        segments.push(PathSegment::Current);
        rest = after_dot;
        if !rest.is_empty() && !rest.starts_with('[') {
            let (name, after) = split_ident(rest)?;
            segments.push(PathSegment::Field(name.to_string()));
            rest = after;
        }
    } else {
        let (name, after) = split_ident(rest)?;
        segments.push(PathSegment::Field(name.to_string()));
        rest = after;
    }

    while !rest.is_empty() {
        if let Some(after_dot) = rest.strip_prefix('.') {
            if after_dot.starts_with('[') {
                rest = after_dot;
                continue;
            }
            let (name, after) = split_ident(after_dot)?;
            segments.push(PathSegment::Field(name.to_string()));
            rest = after;
        } else if let Some(after_bracket) = rest.strip_prefix('[') {
            let (digits, after) = after_bracket.split_once(']')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            segments.push(PathSegment::Index(digits.parse().ok()?));
            rest = after;
        } else {
            return None;
        }
    }

    Path::new(segments)
}

/// Split a non-empty identifier off the front of `text`.
fn split_ident(text: &str) -> Option<(&str, &str)> {
    let end = text.find(['.', '[', ']']).unwrap_or(text.len());
    if end == 0 {
        None
    } else {
        Some(text.split_at(end))
    }
}

/// One level of the render-time context chain.
///
/// The root scope holds the context passed to `render`; every block
/// iteration pushes a child scope holding the current element. Lookups that
/// fail in a scope fall back to its parent.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    value: &'a TemplateValue,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(value: &'a TemplateValue) -> Self {
        Self {
            value,
            parent: None,
        }
    }

    /// Create a nested scope whose lookups fall back to `self`.
    pub fn child<'b>(&'b self, value: &'b TemplateValue) -> Scope<'b> {
        Scope {
            value,
            parent: Some(self),
        }
    }

    /// Number of scopes in the chain, including this one.
    #[cfg(test)]
    fn depth(&self) -> usize {
        1 + self.parent.map_or(0, |p| p.depth())
    }

    /// Find the innermost scope that defines `name`.
    fn lookup(&self, name: &str) -> Option<Cow<'a, TemplateValue>> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(value) = s.value.get_field(name) {
                return Some(value);
            }
            scope = s.parent;
        }
        None
    }

    /// Resolve a path, returning `None` when it is absent.
    ///
    /// Absent covers a missing key or attribute, an out-of-range index, an
    /// accessor applied to the wrong kind of value, and a value that resolves
    /// to null.
    pub fn resolve(&self, path: &Path) -> Option<Cow<'a, TemplateValue>> {
        let head = match path.head() {
            PathSegment::Field(name) => self.lookup(name)?,
            segment => step_ref(self.value, segment)?,
        };

        let value = path
            .tail()
            .iter()
            .try_fold(head, |value, segment| step(value, segment))?;

        if value.is_null() { None } else { Some(value) }
    }
}

fn step<'v>(
    value: Cow<'v, TemplateValue>,
    segment: &PathSegment,
) -> Option<Cow<'v, TemplateValue>> {
    match value {
        Cow::Borrowed(v) => step_ref(v, segment),
        Cow::Owned(v) => step_ref(&v, segment).map(|c| Cow::Owned(c.into_owned())),
    }
}

fn step_ref<'v>(
    value: &'v TemplateValue,
    segment: &PathSegment,
) -> Option<Cow<'v, TemplateValue>> {
    match segment {
        PathSegment::Current => Some(Cow::Borrowed(value)),
        PathSegment::Field(name) => value.get_field(name),
        PathSegment::Index(index) => value.get_index(*index).map(Cow::Borrowed),
    }
}
