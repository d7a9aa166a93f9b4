/*
 * formatter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Formatters and the formatter registry.
//!
//! Formatters are attached to directives with a `:name[=argument]` suffix.
//! Value formatters transform a single resolved value; block formatters
//! transform the assembled iteration outputs of a block. The registry maps
//! every name and alias to its kind and to a constructor that validates the
//! argument, so a compiled template only holds ready-to-run formatter values.

use crate::context::TemplateValue;
use crate::error::CompileErrorKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Largest accepted `indent` depth.
pub const MAX_INDENT: usize = 255;

/// Whether a formatter decorates values or blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterKind {
    Value,
    Block,
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterKind::Value => write!(f, "value"),
            FormatterKind::Block => write!(f, "block"),
        }
    }
}

/// A validated value formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueFormatter {
    /// Pad to a width: positive pads on the right, negative on the left.
    Width(i32),
    Prefix(String),
    Suffix(String),
    /// Substitute the argument when the value is absent.
    Default(String),
    UpperCase,
    EscapeNewlines,
    EscapeString,
    WrapString,
    CBool,
    Hex,
}

impl ValueFormatter {
    /// Canonical name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueFormatter::Width(_) => "width",
            ValueFormatter::Prefix(_) => "prefix",
            ValueFormatter::Suffix(_) => "suffix",
            ValueFormatter::Default(_) => "default",
            ValueFormatter::UpperCase => "upper-case",
            ValueFormatter::EscapeNewlines => "escape-newlines",
            ValueFormatter::EscapeString => "escape-string",
            ValueFormatter::WrapString => "wrap-string",
            ValueFormatter::CBool => "cbool",
            ValueFormatter::Hex => "hex",
        }
    }

    /// Apply this formatter to the output of the previous stage.
    ///
    /// A null input stays null for every formatter except `default`, so an
    /// absent value reaches `default` wherever it sits in the chain.
    pub fn apply(&self, value: TemplateValue) -> Result<TemplateValue, String> {
        let result = match (self, value) {
            (ValueFormatter::Default(fallback), TemplateValue::Null) => {
                TemplateValue::String(fallback.clone())
            }
            (_, TemplateValue::Null) => TemplateValue::Null,
            (ValueFormatter::Default(_), value) => value,
            (ValueFormatter::Width(width), value) => {
                let text = value.render();
                // `format!` rejects padding above u16::MAX
                let pad = usize::from(u16::try_from(width.unsigned_abs()).unwrap_or(u16::MAX));
                if *width < 0 {
                    TemplateValue::String(format!("{:>pad$}", text, pad = pad))
                } else {
                    TemplateValue::String(format!("{:<pad$}", text, pad = pad))
                }
            }
            (ValueFormatter::Prefix(prefix), value) => {
                TemplateValue::String(format!("{}{}", prefix, value.render()))
            }
            (ValueFormatter::Suffix(suffix), value) => {
                TemplateValue::String(format!("{}{}", value.render(), suffix))
            }
            (ValueFormatter::UpperCase, value) => {
                TemplateValue::String(value.render().to_uppercase())
            }
            (ValueFormatter::EscapeNewlines, value) => {
                TemplateValue::String(value.render().replace('\n', "\\n"))
            }
            (ValueFormatter::EscapeString, value) => TemplateValue::String(
                value
                    .render()
                    .replace('\n', "\\n")
                    .replace('\t', "\\t")
                    .replace('"', "\\\""),
            ),
            (ValueFormatter::WrapString, TemplateValue::String(s)) => {
                TemplateValue::String(format!("\"{}\"", s))
            }
            (ValueFormatter::CBool, TemplateValue::Bool(b)) => TemplateValue::String(b.to_string()),
            (ValueFormatter::WrapString | ValueFormatter::CBool, value) => value,
            (ValueFormatter::Hex, TemplateValue::Integer(i)) if i < 0 => {
                TemplateValue::String(format!("-0x{:X}", i.unsigned_abs()))
            }
            (ValueFormatter::Hex, TemplateValue::Integer(i)) => {
                TemplateValue::String(format!("0x{:X}", i))
            }
            (ValueFormatter::Hex, other) => {
                return Err(format!(
                    "expected an integer, found {}",
                    describe_value(&other)
                ));
            }
        };
        Ok(result)
    }
}

fn describe_value(value: &TemplateValue) -> &'static str {
    match value {
        TemplateValue::Null => "null",
        TemplateValue::Bool(_) => "a boolean",
        TemplateValue::Integer(_) => "an integer",
        TemplateValue::Float(_) => "a float",
        TemplateValue::String(_) => "a string",
        TemplateValue::List(_) => "a list",
        TemplateValue::Map(_) => "a map",
        TemplateValue::Object(_) => "an object",
    }
}

/// A validated block formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockFormatter {
    /// Prefix every line with this many tabs.
    Indent(usize),
    /// Join iteration outputs with this separator.
    ListSeparator(String),
}

impl BlockFormatter {
    pub fn name(&self) -> &'static str {
        match self {
            BlockFormatter::Indent(_) => "indent",
            BlockFormatter::ListSeparator(_) => "list-separator",
        }
    }

    /// Whether this formatter works on each iteration output on its own.
    ///
    /// These run before any joining formatter, wherever they sit in the chain.
    pub fn per_iteration(&self) -> bool {
        matches!(self, BlockFormatter::Indent(_))
    }

    /// Transform the iteration outputs of a block.
    ///
    /// `indent` keeps one entry per iteration; `list-separator` collapses
    /// them into a single joined entry.
    pub fn apply(&self, parts: Vec<String>) -> Vec<String> {
        match self {
            BlockFormatter::Indent(depth) => {
                let tabs = "\t".repeat(*depth);
                let line_break = format!("\n{}", tabs);
                parts
                    .into_iter()
                    .map(|part| format!("{}{}", tabs, part.replace('\n', &line_break)))
                    .collect()
            }
            BlockFormatter::ListSeparator(separator) => {
                if parts.is_empty() {
                    parts
                } else {
                    vec![parts.join(separator)]
                }
            }
        }
    }
}

/// A formatter of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    Value(ValueFormatter),
    Block(BlockFormatter),
}

type Constructor = fn(&str, Option<&str>) -> Result<Formatter, String>;

#[derive(Clone, Copy)]
struct FormatterEntry {
    kind: FormatterKind,
    construct: Constructor,
}

/// Immutable table of all known formatters and their aliases.
///
/// Derived tables are built from [`FormatterRegistry::standard`]:
///
/// ```
/// use lina::{CompileOptions, FormatterRegistry, Template};
///
/// let registry = FormatterRegistry::standard()
///     .without(&["hex"])
///     .with_alias("pad", "width")
///     .unwrap();
/// let options = CompileOptions::new().with_registry(&registry);
/// let template = Template::compile_with_options("[{{v:pad=3}}]", &options).unwrap();
/// assert_eq!(template.render_simple([("v", "x")]).unwrap(), "[x  ]");
/// assert!(Template::compile_with_options("{{v:hex}}", &options).is_err());
/// ```
#[derive(Clone)]
pub struct FormatterRegistry {
    entries: HashMap<&'static str, FormatterEntry>,
}

static STANDARD: Lazy<FormatterRegistry> = Lazy::new(FormatterRegistry::build_standard);

impl FormatterRegistry {
    /// The registry with the built-in formatter set.
    pub fn standard() -> &'static FormatterRegistry {
        &STANDARD
    }

    fn build_standard() -> Self {
        let mut registry = FormatterRegistry {
            entries: HashMap::new(),
        };

        registry.register(&["indent"], FormatterKind::Block, |name, arg| {
            let depth = parse_integer(name, require_argument(arg)?)?;
            match usize::try_from(depth) {
                Ok(depth) if depth <= MAX_INDENT => {
                    Ok(Formatter::Block(BlockFormatter::Indent(depth)))
                }
                _ => Err(format!("indent depth must be between 0 and {}", MAX_INDENT)),
            }
        });
        registry.register(
            &["list-separator", "separator", "l-s"],
            FormatterKind::Block,
            |_, arg| {
                let separator = require_argument(arg)?
                    .replace("NEWLINE", "\n")
                    .replace("SPACE", " ");
                Ok(Formatter::Block(BlockFormatter::ListSeparator(separator)))
            },
        );
        registry.register(&["width", "w"], FormatterKind::Value, |name, arg| {
            let width = parse_integer(name, require_argument(arg)?)?;
            match i32::try_from(width) {
                Ok(width) if width.unsigned_abs() <= u32::from(u16::MAX) => {
                    Ok(Formatter::Value(ValueFormatter::Width(width)))
                }
                _ => Err(format!("width must be between -{0} and {0}", u16::MAX)),
            }
        });
        registry.register(&["prefix"], FormatterKind::Value, |_, arg| {
            Ok(Formatter::Value(ValueFormatter::Prefix(
                require_argument(arg)?.to_string(),
            )))
        });
        registry.register(&["suffix"], FormatterKind::Value, |_, arg| {
            Ok(Formatter::Value(ValueFormatter::Suffix(
                require_argument(arg)?.to_string(),
            )))
        });
        registry.register(&["default"], FormatterKind::Value, |_, arg| {
            Ok(Formatter::Value(ValueFormatter::Default(
                require_argument(arg)?.to_string(),
            )))
        });
        registry.register(&["upper-case", "uc"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::UpperCase)
        });
        registry.register(&["escape-newlines"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::EscapeNewlines)
        });
        registry.register(&["escape-string"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::EscapeString)
        });
        registry.register(&["wrap-string"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::WrapString)
        });
        registry.register(&["cbool"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::CBool)
        });
        registry.register(&["hex"], FormatterKind::Value, |_, arg| {
            no_argument(arg, ValueFormatter::Hex)
        });

        registry
    }

    fn register(&mut self, names: &[&'static str], kind: FormatterKind, construct: Constructor) {
        for &name in names {
            self.entries.insert(name, FormatterEntry { kind, construct });
        }
    }

    /// A copy of this table where `alias` also names the `target` formatter.
    ///
    /// Returns `None` if `target` is unknown.
    pub fn with_alias(&self, alias: &'static str, target: &str) -> Option<Self> {
        let entry = *self.entries.get(target)?;
        let mut registry = self.clone();
        registry.entries.insert(alias, entry);
        Some(registry)
    }

    /// A copy of this table without the given names.
    pub fn without(&self, names: &[&str]) -> Self {
        let mut registry = self.clone();
        registry.entries.retain(|name, _| !names.contains(name));
        registry
    }

    /// The kind of the named formatter, or `None` if it is unknown.
    pub fn kind_of(&self, name: &str) -> Option<FormatterKind> {
        self.entries.get(name).map(|entry| entry.kind)
    }

    /// Construct the named formatter with its argument.
    pub fn create(
        &self,
        name: &str,
        argument: Option<&str>,
    ) -> Result<Formatter, CompileErrorKind> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| CompileErrorKind::UnknownFormatter {
                name: name.to_string(),
            })?;
        (entry.construct)(name, argument).map_err(|message| {
            CompileErrorKind::InvalidFormatterArgument {
                name: name.to_string(),
                message,
            }
        })
    }

    /// All registered names and aliases, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn require_argument(argument: Option<&str>) -> Result<&str, String> {
    argument.ok_or_else(|| "an argument is required".to_string())
}

fn no_argument(argument: Option<&str>, formatter: ValueFormatter) -> Result<Formatter, String> {
    match argument {
        None => Ok(Formatter::Value(formatter)),
        Some(arg) => Err(format!("takes no argument, found '{}'", arg)),
    }
}

fn parse_integer(name: &str, argument: &str) -> Result<i64, String> {
    argument
        .trim()
        .parse()
        .map_err(|_| format!("'{}' expects an integer, found '{}'", name, argument))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value_formatter(name: &str, arg: Option<&str>) -> ValueFormatter {
        match FormatterRegistry::standard().create(name, arg) {
            Ok(Formatter::Value(f)) => f,
            other => panic!("expected value formatter, got {:?}", other),
        }
    }

    fn format(name: &str, arg: Option<&str>, value: impl Into<TemplateValue>) -> String {
        value_formatter(name, arg)
            .apply(value.into())
            .expect("formatter should apply")
            .render()
    }

    #[test]
    fn test_registry_kinds() {
        let registry = FormatterRegistry::standard();
        assert_eq!(registry.kind_of("indent"), Some(FormatterKind::Block));
        assert_eq!(registry.kind_of("l-s"), Some(FormatterKind::Block));
        assert_eq!(registry.kind_of("separator"), Some(FormatterKind::Block));
        assert_eq!(registry.kind_of("hex"), Some(FormatterKind::Value));
        assert_eq!(registry.kind_of("uc"), Some(FormatterKind::Value));
        assert_eq!(registry.kind_of("w"), Some(FormatterKind::Value));
        assert_eq!(registry.kind_of("foo"), None);
    }

    #[test]
    fn test_unknown_formatter() {
        let err = FormatterRegistry::standard().create("foo", None).unwrap_err();
        assert_eq!(
            err,
            CompileErrorKind::UnknownFormatter {
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_argument_validation() {
        let registry = FormatterRegistry::standard();
        assert!(matches!(
            registry.create("width", Some("abc")),
            Err(CompileErrorKind::InvalidFormatterArgument { .. })
        ));
        assert!(matches!(
            registry.create("width", None),
            Err(CompileErrorKind::InvalidFormatterArgument { .. })
        ));
        assert!(matches!(
            registry.create("hex", Some("2")),
            Err(CompileErrorKind::InvalidFormatterArgument { .. })
        ));
        assert!(matches!(
            registry.create("indent", Some("-1")),
            Err(CompileErrorKind::InvalidFormatterArgument { .. })
        ));
    }

    #[test]
    fn test_numeric_arguments_are_bounded() {
        let registry = FormatterRegistry::standard();
        assert_eq!(
            registry.create("width", Some("-65535")),
            Ok(Formatter::Value(ValueFormatter::Width(-65535)))
        );
        assert_eq!(
            registry.create("width", Some("70000")),
            Err(CompileErrorKind::InvalidFormatterArgument {
                name: "width".to_string(),
                message: "width must be between -65535 and 65535".to_string(),
            })
        );
        assert!(registry.create("w", Some("-9223372036854775808")).is_err());
        assert_eq!(
            registry.create("indent", Some("255")),
            Ok(Formatter::Block(BlockFormatter::Indent(MAX_INDENT)))
        );
        assert_eq!(
            registry.create("indent", Some("9223372036854775807")),
            Err(CompileErrorKind::InvalidFormatterArgument {
                name: "indent".to_string(),
                message: "indent depth must be between 0 and 255".to_string(),
            })
        );
    }

    #[test]
    fn test_width() {
        assert_eq!(format("width", Some("4"), 42), "42  ");
        assert_eq!(format("width", Some("-4"), 42), "  42");
        assert_eq!(format("w", Some("1"), "long"), "long");
        assert_eq!(format("width", Some("0"), "x"), "x");
    }

    #[test]
    fn test_prefix_suffix() {
        assert_eq!(format("prefix", Some("k"), "Red"), "kRed");
        assert_eq!(format("suffix", Some("_t"), "uint8"), "uint8_t");
    }

    #[test]
    fn test_default() {
        assert_eq!(format("default", Some("def"), TemplateValue::Null), "def");
        assert_eq!(format("default", Some("def"), "bla"), "bla");
    }

    #[test]
    fn test_null_passes_through_to_default() {
        let upper = value_formatter("upper-case", None);
        assert_eq!(upper.apply(TemplateValue::Null), Ok(TemplateValue::Null));
    }

    #[test]
    fn test_upper_case() {
        assert_eq!(format("upper-case", None, "baD"), "BAD");
        assert_eq!(format("uc", None, "abc"), "ABC");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(format("escape-newlines", None, "a\nb"), "a\\nb");
        assert_eq!(
            format("escape-string", None, "say \"hi\"\n\tnow"),
            "say \\\"hi\\\"\\n\\tnow"
        );
    }

    #[test]
    fn test_wrap_string() {
        assert_eq!(format("wrap-string", None, "x"), "\"x\"");
        assert_eq!(format("wrap-string", None, 5), "5");
    }

    #[test]
    fn test_cbool() {
        assert_eq!(format("cbool", None, true), "true");
        assert_eq!(format("cbool", None, false), "false");
        assert_eq!(format("cbool", None, 1), "1");
    }

    #[test]
    fn test_hex() {
        assert_eq!(format("hex", None, 127), "0x7F");
        assert_eq!(format("hex", None, 0x301), "0x301");
        assert_eq!(format("hex", None, -5), "-0x5");
        let err = value_formatter("hex", None)
            .apply(TemplateValue::from("x"))
            .unwrap_err();
        assert_eq!(err, "expected an integer, found a string");
    }

    #[test]
    fn test_list_separator_substitutes_reserved_words() {
        let f = FormatterRegistry::standard()
            .create("l-s", Some(",NEWLINE"))
            .expect("valid");
        assert_eq!(
            f,
            Formatter::Block(BlockFormatter::ListSeparator(",\n".to_string()))
        );
        let f = FormatterRegistry::standard()
            .create("list-separator", Some("SPACE|SPACE"))
            .expect("valid");
        assert_eq!(
            f,
            Formatter::Block(BlockFormatter::ListSeparator(" | ".to_string()))
        );
    }

    #[test]
    fn test_block_formatters() {
        let parts = vec!["0".to_string(), "1\n2".to_string()];
        assert_eq!(
            BlockFormatter::Indent(1).apply(parts.clone()),
            vec!["\t0".to_string(), "\t1\n\t2".to_string()]
        );
        assert_eq!(
            BlockFormatter::ListSeparator(", ".to_string()).apply(parts),
            vec!["0, 1\n2".to_string()]
        );
        assert!(
            BlockFormatter::ListSeparator(", ".to_string())
                .apply(Vec::new())
                .is_empty()
        );
    }

    #[test]
    fn test_derived_registries() {
        let standard = FormatterRegistry::standard();
        let registry = standard.without(&["hex", "uc"]);
        assert_eq!(registry.kind_of("hex"), None);
        assert_eq!(registry.kind_of("uc"), None);
        assert_eq!(registry.kind_of("upper-case"), Some(FormatterKind::Value));
        assert_eq!(standard.kind_of("hex"), Some(FormatterKind::Value));

        let registry = standard.with_alias("join", "l-s").expect("l-s exists");
        assert_eq!(
            registry.create("join", Some("SPACE")),
            Ok(Formatter::Block(BlockFormatter::ListSeparator(" ".to_string())))
        );
        assert!(standard.with_alias("join", "nope").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let names = FormatterRegistry::standard().names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"list-separator"));
    }
}
