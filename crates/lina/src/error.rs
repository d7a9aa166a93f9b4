/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and rendering.
//!
//! Structural problems in a template are always reported as a [`CompileError`]
//! while the template is compiled. Rendering only fails when a formatter cannot
//! handle the runtime type of its input; missing or null data is never an error.

use crate::formatter::FormatterKind;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Location of a directive in the template source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePosition {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Name of the file the template was loaded from, if any.
    pub filename: Option<Arc<str>>,
}

impl SourcePosition {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<Arc<str>>) -> Self {
        self.filename = filename;
        self
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(filename) = &self.filename {
            write!(f, "{}:", filename)?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kind of structural problem found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    /// `{{` without a closing `}}` before the end of input.
    #[error("unterminated directive, expected '}}}}' before end of input")]
    UnterminatedDirective,

    /// A closing tag that does not match the innermost open block.
    #[error("cannot close block '{close}' here, the innermost open block is '{open}'")]
    MismatchedBlockTag { open: String, close: String },

    /// A closing tag with no open block.
    #[error("cannot close block '{name}', no block is open")]
    UnexpectedBlockClose { name: String },

    /// A block still open at the end of input.
    #[error("block '{name}' is never closed")]
    UnclosedBlock { name: String },

    /// A `#First`/`#Last`/`#Separator` block outside the block it names.
    #[error("modifier '{owner}#{modifier}' must be placed directly inside block '{owner}'")]
    MisplacedModifier { owner: String, modifier: String },

    /// A modifier other than `First`, `Last` or `Separator`.
    #[error("unknown block modifier '{modifier}' on block '{owner}'")]
    UnknownModifier { owner: String, modifier: String },

    /// A formatter name missing from the registry.
    #[error("unknown formatter '{name}'")]
    UnknownFormatter { name: String },

    /// A formatter attached to a directive it cannot decorate.
    #[error("{kind} formatter '{name}' cannot be applied to {target}")]
    FormatterKindMismatch {
        name: String,
        kind: FormatterKind,
        target: &'static str,
    },

    /// A formatter argument that is missing, unexpected or malformed.
    #[error("invalid argument for formatter '{name}': {message}")]
    InvalidFormatterArgument { name: String, message: String },

    /// A variable path that does not follow the path grammar.
    #[error("invalid variable path '{path}'")]
    InvalidPath { path: String },

    /// An underscore directive that is not one of the reserved tokens.
    #[error("unknown special token '_{name}'")]
    UnknownSpecialToken { name: String },

    /// An include that the resolver could not provide.
    #[error("included template '{name}' not found")]
    IncludeNotFound { name: String },

    /// Includes nested deeper than the configured maximum.
    #[error("includes nested deeper than {max_depth} levels while including '{name}'")]
    RecursiveInclude { name: String, max_depth: usize },
}

/// A fatal error raised while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub position: SourcePosition,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }
}

/// Errors that can occur during template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A formatter could not be applied to the value it received.
    #[error("{position}: formatter '{formatter}' failed: {message}")]
    Format {
        formatter: &'static str,
        message: String,
        position: SourcePosition,
    },

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display_without_filename() {
        let pos = SourcePosition::new(10, 2, 5);
        assert_eq!(pos.to_string(), "2:5");
    }

    #[test]
    fn test_position_display_with_filename() {
        let pos = SourcePosition::new(0, 1, 1).with_filename(Some(Arc::from("enum.tmpl")));
        assert_eq!(pos.to_string(), "enum.tmpl:1:1");
    }

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::new(
            CompileErrorKind::MismatchedBlockTag {
                open: "a".to_string(),
                close: "b".to_string(),
            },
            SourcePosition::new(3, 1, 4),
        );
        insta::assert_snapshot!(
            err.to_string(),
            @"1:4: cannot close block 'b' here, the innermost open block is 'a'"
        );
    }

    #[test]
    fn test_unterminated_display_escapes_braces() {
        let err = CompileError::new(
            CompileErrorKind::UnterminatedDirective,
            SourcePosition::new(0, 1, 1),
        );
        insta::assert_snapshot!(
            err.to_string(),
            @"1:1: unterminated directive, expected '}}' before end of input"
        );
    }

    #[test]
    fn test_template_error_from_compile_error() {
        let err: TemplateError = CompileError::new(
            CompileErrorKind::UnknownFormatter {
                name: "foo".to_string(),
            },
            SourcePosition::new(0, 1, 1),
        )
        .into();
        assert!(matches!(err, TemplateError::Compile(_)));
        assert_eq!(err.to_string(), "1:1: unknown formatter 'foo'");
    }
}
