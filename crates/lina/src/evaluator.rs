/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Renders a compiled node tree against a context. Rendering never mutates
//! the context: each block iteration pushes a borrowed [`Scope`] holding the
//! current element on top of the enclosing ones.

use crate::ast::{Block, TemplateNode, ValueRef};
use crate::context::TemplateValue;
use crate::error::{TemplateError, TemplateResult};
use crate::formatter::ValueFormatter;
use crate::parser::Template;
use crate::path::Scope;
use std::borrow::Cow;

impl Template {
    /// Render this template with the given context.
    ///
    /// Missing or null data renders as nothing. The only failure is a value
    /// formatter that cannot handle its input, in which case no output is
    /// produced.
    pub fn render(&self, context: &TemplateValue) -> TemplateResult<String> {
        let mut out = String::new();
        render_nodes(&self.nodes, &Scope::root(context), None, &mut out)?;
        Ok(out)
    }

    /// Render with a context built from `(name, value)` pairs.
    ///
    /// ```
    /// use lina::Template;
    ///
    /// let template = Template::compile("{{greeting}}, {{name}}!").unwrap();
    /// let out = template
    ///     .render_simple([("greeting", "Hello"), ("name", "world")])
    ///     .unwrap();
    /// assert_eq!(out, "Hello, world!");
    /// ```
    pub fn render_simple<K, V>(
        &self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> TemplateResult<String>
    where
        K: Into<String>,
        V: Into<TemplateValue>,
    {
        let context: TemplateValue = pairs.into_iter().collect();
        self.render(&context)
    }
}

/// Position of the current block iteration, for modifiers.
#[derive(Debug, Clone, Copy)]
struct Iteration {
    index: usize,
    count: usize,
}

/// Render a sequence of nodes into `out`.
///
/// `iteration` is set while rendering the direct children of a block
/// iteration; it decides which modifiers fire.
fn render_nodes(
    nodes: &[TemplateNode],
    scope: &Scope<'_>,
    iteration: Option<Iteration>,
    out: &mut String,
) -> TemplateResult<()> {
    for node in nodes {
        match node {
            TemplateNode::Literal(text) => out.push_str(text),
            TemplateNode::Special(token) => out.push(token.as_char()),
            TemplateNode::Value(value) => render_value(value, scope, out)?,
            TemplateNode::Block(block) => render_block(block, scope, out)?,
            TemplateNode::Modifier(modifier) => {
                let fires = iteration.is_some_and(|it| modifier.kind.fires(it.index, it.count));
                if fires {
                    render_nodes(&modifier.children, scope, iteration, out)?;
                }
            }
            TemplateNode::Include(include) => render_nodes(&include.children, scope, None, out)?,
        }
    }
    Ok(())
}

fn render_value(value: &ValueRef, scope: &Scope<'_>, out: &mut String) -> TemplateResult<()> {
    let resolved = scope.resolve(&value.path);

    if value.formatters.is_empty() {
        if let Some(v) = resolved {
            out.push_str(&v.render());
        }
        return Ok(());
    }

    let has_default = value
        .formatters
        .iter()
        .any(|f| matches!(f, ValueFormatter::Default(_)));
    if resolved.is_none() && !has_default {
        tracing::debug!(path = %value.path, position = %value.position, "Absent value");
        return Ok(());
    }

    let mut current = resolved.map_or(TemplateValue::Null, Cow::into_owned);
    for formatter in &value.formatters {
        current = formatter
            .apply(current)
            .map_err(|message| TemplateError::Format {
                formatter: formatter.name(),
                message,
                position: value.position.clone(),
            })?;
    }
    out.push_str(&current.render());
    Ok(())
}

fn render_block(block: &Block, scope: &Scope<'_>, out: &mut String) -> TemplateResult<()> {
    let resolved = scope.resolve(&block.path);

    if block.negated {
        if resolved.is_none() {
            let mut body = String::new();
            render_nodes(&block.children, scope, None, &mut body)?;
            push_parts(block, vec![body], out);
        }
        return Ok(());
    }

    let Some(value) = resolved else {
        tracing::trace!(block = %block.name, "Block is absent");
        return Ok(());
    };

    let elements: Vec<&TemplateValue> = match value.as_ref() {
        TemplateValue::List(items) => items.iter().collect(),
        TemplateValue::Map(map) if map.is_empty() => Vec::new(),
        other => vec![other],
    };
    let count = elements.len();
    tracing::trace!(block = %block.name, count, "Rendering block");

    let mut parts = Vec::with_capacity(count);
    for (index, element) in elements.into_iter().enumerate() {
        let child = scope.child(element);
        let mut part = String::new();
        render_nodes(
            &block.children,
            &child,
            Some(Iteration { index, count }),
            &mut part,
        )?;
        parts.push(part);
    }
    push_parts(block, parts, out);
    Ok(())
}

/// Run the block formatters over the iteration outputs and emit the result.
///
/// Per-iteration formatters run first, so `indent` tabs every iteration
/// whether it is written before or after `list-separator`.
fn push_parts(block: &Block, parts: Vec<String>, out: &mut String) {
    let (per_iteration, joining): (Vec<_>, Vec<_>) = block
        .formatters
        .iter()
        .partition(|formatter| formatter.per_iteration());
    let parts = per_iteration
        .into_iter()
        .chain(joining)
        .fold(parts, |parts, formatter| formatter.apply(parts));
    for part in parts {
        out.push_str(&part);
    }
}
