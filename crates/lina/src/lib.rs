/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Logic-less text template engine for code and document generation.
//!
//! Templates are plain text with `{{...}}` directives:
//!
//! - Values: `{{name}}`, `{{item.fields[2]}}`, `{{.}}`
//! - Blocks: `{{#items}}...{{/items}}` iterate lists, render once for other
//!   present values and not at all for empty or absent ones
//! - Negated blocks: `{{!items}}...{{/items}}` render only when absent
//! - Iteration modifiers: `{{#items#First}}`, `#Last`, `#Separator`
//! - Formatters: `{{value:hex:width=-8}}`, `{{#items:list-separator=, }}`
//! - Reserved tokens: `{{_NEWLINE}}`, `{{_SPACE}}`, `{{_LEFT_BRACE}}`,
//!   `{{_RIGHT_BRACE}}`
//! - Includes: `{{>header}}`, resolved when the template is compiled
//!
//! All structural errors are reported by [`Template::compile`]. Rendering
//! treats missing and null data as absent and only fails when a formatter
//! cannot handle the type of its input.
//!
//! # Example
//!
//! ```
//! use lina::{Template, TemplateValue};
//! use serde_json::json;
//!
//! let template = Template::compile(
//!     "enum E {\n{{#t:list-separator=,NEWLINE}}  {{name}}={{value:hex}}{{/t}}\n}",
//! )?;
//! let ctx = TemplateValue::from(json!({
//!     "t": [{"name": "A", "value": 769}, {"name": "B", "value": 770}]
//! }));
//! assert_eq!(template.render(&ctx)?, "enum E {\n  A=0x301,\n  B=0x302\n}");
//! # Ok::<(), lina::TemplateError>(())
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod formatter;
mod macros;
pub mod parser;
pub mod path;
pub mod resolver;
pub mod tokenizer;

// Re-export main types at crate root
pub use ast::{Block, Modifier, ModifierKind, SpecialToken, TemplateNode, ValueRef};
pub use context::{TemplateObject, TemplateValue};
pub use error::{CompileError, CompileErrorKind, SourcePosition, TemplateError, TemplateResult};
pub use formatter::{BlockFormatter, FormatterKind, FormatterRegistry, ValueFormatter};
pub use parser::{CompileOptions, DEFAULT_MAX_INCLUDE_DEPTH, Template};
pub use resolver::{IncludeResolver, MemoryResolver, NullResolver, TemplateRepository};
