/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! Turns the token stream into the node tree. Blocks are matched with an
//! explicit stack of open frames; formatter chains are validated against the
//! registry and includes are resolved, so a compiled [`Template`] never fails
//! structurally at render time.

use crate::ast::{Block, Include, Modifier, ModifierKind, SpecialToken, TemplateNode, ValueRef};
use crate::error::{CompileError, CompileErrorKind, SourcePosition, TemplateResult};
use crate::formatter::{
    BlockFormatter, Formatter, FormatterKind, FormatterRegistry, ValueFormatter,
};
use crate::path::parse_path;
use crate::resolver::{IncludeResolver, NullResolver, TemplateRepository};
use crate::tokenizer::{Directive, FormatterSpec, Token, Tokenizer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Default limit for nested includes.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 50;

/// A compiled template ready for rendering.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) nodes: Vec<TemplateNode>,
    source: String,
    filename: Option<Arc<str>>,
}

/// Settings for compiling a template.
#[derive(Clone, Copy)]
pub struct CompileOptions<'r> {
    filename: Option<&'r str>,
    registry: &'r FormatterRegistry,
    resolver: &'r dyn IncludeResolver,
    max_include_depth: usize,
}

impl<'r> CompileOptions<'r> {
    /// Standard formatters, no includes, no filename.
    pub fn new() -> Self {
        Self {
            filename: None,
            registry: FormatterRegistry::standard(),
            resolver: &NullResolver,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Name reported in error positions.
    pub fn with_filename(mut self, filename: &'r str) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn with_registry(mut self, registry: &'r FormatterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_resolver(mut self, resolver: &'r dyn IncludeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

impl Default for CompileOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompileOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("filename", &self.filename)
            .field("registry", self.registry)
            .field("max_include_depth", &self.max_include_depth)
            .finish_non_exhaustive()
    }
}

impl Template {
    /// Compile a template from source text.
    ///
    /// Uses the standard formatters. Include directives fail to compile;
    /// use [`Template::compile_with_options`] with a resolver to enable them.
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        Self::compile_with_options(source, &CompileOptions::new())
    }

    /// Compile a template from source text with a filename for error reporting.
    pub fn compile_with_filename(source: &str, filename: &str) -> Result<Self, CompileError> {
        Self::compile_with_options(source, &CompileOptions::new().with_filename(filename))
    }

    /// Compile a template from source text with explicit options.
    pub fn compile_with_options(
        source: &str,
        options: &CompileOptions<'_>,
    ) -> Result<Self, CompileError> {
        let filename: Option<Arc<str>> = options.filename.map(Arc::from);
        let nodes = compile_nodes(source, filename.clone(), options, 0)?;
        tracing::debug!(
            filename = options.filename.unwrap_or("<template>"),
            nodes = nodes.len(),
            "Compiled template"
        );
        Ok(Self {
            nodes,
            source: source.to_string(),
            filename,
        })
    }

    /// Compile a template from a file.
    ///
    /// Includes are loaded from the file's directory, with the file's
    /// extension appended to their names.
    pub fn compile_from_file(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path)?;
        let filename = path.to_string_lossy();
        let repository = TemplateRepository::for_template(path);
        let options = CompileOptions::new()
            .with_filename(&filename)
            .with_resolver(&repository);
        Ok(Self::compile_with_options(&source, &options)?)
    }

    /// The compiled node tree.
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    /// The source text the template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

impl FromStr for Template {
    type Err = CompileError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::compile(source)
    }
}

/// An open construct waiting for its closing tag.
enum Frame {
    Root,
    Block {
        name: String,
        path: crate::ast::Path,
        negated: bool,
        formatters: Vec<BlockFormatter>,
        position: SourcePosition,
    },
    Modifier {
        kind: ModifierKind,
        owner: String,
        position: SourcePosition,
    },
}

impl Frame {
    /// The text a closing tag must carry to close this frame.
    fn tag(&self) -> String {
        match self {
            Frame::Root => String::new(),
            Frame::Block { name, .. } => name.clone(),
            Frame::Modifier { kind, owner, .. } => format!("{}#{}", owner, kind.name()),
        }
    }

    fn position(&self) -> SourcePosition {
        match self {
            Frame::Root => SourcePosition::default(),
            Frame::Block { position, .. } | Frame::Modifier { position, .. } => position.clone(),
        }
    }

    fn into_node(self, children: Vec<TemplateNode>) -> Option<TemplateNode> {
        match self {
            Frame::Root => None,
            Frame::Block {
                name,
                path,
                negated,
                formatters,
                position,
            } => Some(TemplateNode::Block(Block {
                name,
                path,
                negated,
                children,
                formatters,
                position,
            })),
            Frame::Modifier { kind, owner, .. } => Some(TemplateNode::Modifier(Modifier {
                kind,
                owner,
                children,
            })),
        }
    }
}

/// Builds the node tree from a token stream.
struct TreeBuilder<'o> {
    /// Open frames with the children collected so far. Never empty.
    stack: Vec<(Frame, Vec<TemplateNode>)>,
    options: &'o CompileOptions<'o>,
    depth: usize,
}

fn compile_nodes(
    source: &str,
    filename: Option<Arc<str>>,
    options: &CompileOptions<'_>,
    depth: usize,
) -> Result<Vec<TemplateNode>, CompileError> {
    let mut builder = TreeBuilder {
        stack: vec![(Frame::Root, Vec::new())],
        options,
        depth,
    };
    for token in Tokenizer::new(source).with_filename(filename) {
        builder.push_token(token?)?;
    }
    builder.finish()
}

impl TreeBuilder<'_> {
    fn push_node(&mut self, node: TemplateNode) {
        if let Some((_, children)) = self.stack.last_mut() {
            children.push(node);
        }
    }

    fn innermost(&self) -> &Frame {
        self.stack.last().map_or(&Frame::Root, |(frame, _)| frame)
    }

    fn push_token(&mut self, token: Token<'_>) -> Result<(), CompileError> {
        let (directive, formatters, position) = match token {
            Token::Text { text, .. } => {
                self.push_node(TemplateNode::Literal(text.to_string()));
                return Ok(());
            }
            Token::Directive {
                directive,
                formatters,
                position,
                ..
            } => (directive, formatters, position),
        };
        let error = |kind| CompileError::new(kind, position.clone());

        match directive {
            Directive::Value { path } => {
                let parsed = parse_path(path).ok_or_else(|| {
                    error(CompileErrorKind::InvalidPath {
                        path: path.to_string(),
                    })
                })?;
                let formatters = self
                    .value_formatters(&formatters, "a value")
                    .map_err(error)?;
                self.push_node(TemplateNode::Value(ValueRef {
                    path: parsed,
                    formatters,
                    position: position.clone(),
                }));
            }
            Directive::BlockOpen { name } | Directive::NegatedOpen { name } => {
                let negated = matches!(directive, Directive::NegatedOpen { .. });
                let path = parse_path(name).ok_or_else(|| {
                    error(CompileErrorKind::InvalidPath {
                        path: name.to_string(),
                    })
                })?;
                let formatters = self.block_formatters(&formatters).map_err(error)?;
                self.stack.push((
                    Frame::Block {
                        name: name.to_string(),
                        path,
                        negated,
                        formatters,
                        position: position.clone(),
                    },
                    Vec::new(),
                ));
            }
            Directive::ModifierOpen { owner, modifier } => {
                let kind = ModifierKind::from_name(modifier).ok_or_else(|| {
                    error(CompileErrorKind::UnknownModifier {
                        owner: owner.to_string(),
                        modifier: modifier.to_string(),
                    })
                })?;
                self.reject_formatters(&formatters, "a block modifier")
                    .map_err(error)?;
                let inside_owner = matches!(
                    self.innermost(),
                    Frame::Block { name, negated: false, .. } if name == owner
                );
                if !inside_owner {
                    return Err(error(CompileErrorKind::MisplacedModifier {
                        owner: owner.to_string(),
                        modifier: modifier.to_string(),
                    }));
                }
                self.stack.push((
                    Frame::Modifier {
                        kind,
                        owner: owner.to_string(),
                        position: position.clone(),
                    },
                    Vec::new(),
                ));
            }
            Directive::BlockClose { name } => {
                self.reject_formatters(&formatters, "a closing tag")
                    .map_err(error)?;
                self.close(name, &position)?;
            }
            Directive::Special { name } => {
                self.reject_formatters(&formatters, "a special token")
                    .map_err(error)?;
                let token = SpecialToken::from_name(name).ok_or_else(|| {
                    error(CompileErrorKind::UnknownSpecialToken {
                        name: name.to_string(),
                    })
                })?;
                self.push_node(TemplateNode::Special(token));
            }
            Directive::Include { name } => {
                self.reject_formatters(&formatters, "an include")
                    .map_err(error)?;
                let include = self.include(name, &position)?;
                self.push_node(TemplateNode::Include(include));
            }
        }
        Ok(())
    }

    fn close(&mut self, name: &str, position: &SourcePosition) -> Result<(), CompileError> {
        if self.stack.len() <= 1 {
            return Err(CompileError::new(
                CompileErrorKind::UnexpectedBlockClose {
                    name: name.to_string(),
                },
                position.clone(),
            ));
        }
        let open = self.innermost().tag();
        if open != name {
            return Err(CompileError::new(
                CompileErrorKind::MismatchedBlockTag {
                    open,
                    close: name.to_string(),
                },
                position.clone(),
            ));
        }
        if let Some((frame, children)) = self.stack.pop()
            && let Some(node) = frame.into_node(children)
        {
            self.push_node(node);
        }
        Ok(())
    }

    fn include(&self, name: &str, position: &SourcePosition) -> Result<Include, CompileError> {
        let error = |kind| CompileError::new(kind, position.clone());
        if self.depth >= self.options.max_include_depth {
            return Err(error(CompileErrorKind::RecursiveInclude {
                name: name.to_string(),
                max_depth: self.options.max_include_depth,
            }));
        }
        let source = self
            .options
            .resolver
            .get_include(name)
            .ok_or_else(|| {
                error(CompileErrorKind::IncludeNotFound {
                    name: name.to_string(),
                })
            })?;

        let filename: Arc<str> = Arc::from(self.options.resolver.include_filename(name));
        tracing::debug!(
            name,
            filename = %filename,
            depth = self.depth + 1,
            "Resolved include"
        );
        let children = compile_nodes(&source, Some(filename), self.options, self.depth + 1)?;
        Ok(Include {
            name: name.to_string(),
            children,
        })
    }

    fn finish(mut self) -> Result<Vec<TemplateNode>, CompileError> {
        if self.stack.len() > 1 {
            let frame = self.innermost();
            return Err(CompileError::new(
                CompileErrorKind::UnclosedBlock { name: frame.tag() },
                frame.position(),
            ));
        }
        Ok(self.stack.pop().map(|(_, nodes)| nodes).unwrap_or_default())
    }

    /// Look up a formatter and check that it has the expected kind.
    fn formatter(
        &self,
        spec: &FormatterSpec<'_>,
        expected: FormatterKind,
        target: &'static str,
    ) -> Result<Formatter, CompileErrorKind> {
        let registry = self.options.registry;
        match registry.kind_of(spec.name) {
            None => Err(CompileErrorKind::UnknownFormatter {
                name: spec.name.to_string(),
            }),
            Some(kind) if kind != expected => Err(CompileErrorKind::FormatterKindMismatch {
                name: spec.name.to_string(),
                kind,
                target,
            }),
            Some(_) => registry.create(spec.name, spec.argument),
        }
    }

    fn value_formatters(
        &self,
        specs: &[FormatterSpec<'_>],
        target: &'static str,
    ) -> Result<Vec<ValueFormatter>, CompileErrorKind> {
        specs
            .iter()
            .map(|spec| match self.formatter(spec, FormatterKind::Value, target)? {
                Formatter::Value(formatter) => Ok(formatter),
                Formatter::Block(_) => Err(CompileErrorKind::FormatterKindMismatch {
                    name: spec.name.to_string(),
                    kind: FormatterKind::Block,
                    target,
                }),
            })
            .collect()
    }

    fn block_formatters(
        &self,
        specs: &[FormatterSpec<'_>],
    ) -> Result<Vec<BlockFormatter>, CompileErrorKind> {
        const TARGET: &str = "a block";
        specs
            .iter()
            .map(|spec| match self.formatter(spec, FormatterKind::Block, TARGET)? {
                Formatter::Block(formatter) => Ok(formatter),
                Formatter::Value(_) => Err(CompileErrorKind::FormatterKindMismatch {
                    name: spec.name.to_string(),
                    kind: FormatterKind::Value,
                    target: TARGET,
                }),
            })
            .collect()
    }

    /// Directives that take no formatters at all.
    fn reject_formatters(
        &self,
        specs: &[FormatterSpec<'_>],
        target: &'static str,
    ) -> Result<(), CompileErrorKind> {
        match specs.first() {
            None => Ok(()),
            Some(spec) => match self.options.registry.kind_of(spec.name) {
                None => Err(CompileErrorKind::UnknownFormatter {
                    name: spec.name.to_string(),
                }),
                Some(kind) => Err(CompileErrorKind::FormatterKindMismatch {
                    name: spec.name.to_string(),
                    kind,
                    target,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PathSegment;
    use crate::resolver::MemoryResolver;
    use pretty_assertions::assert_eq;

    fn compile_err(source: &str) -> CompileError {
        Template::compile(source).expect_err("template should not compile")
    }

    #[test]
    fn test_compile_literal_and_value() {
        let template = Template::compile("Hello, {{name}}!").expect("compiles");
        assert_eq!(template.nodes().len(), 3);
        assert_eq!(
            template.nodes()[0],
            TemplateNode::Literal("Hello, ".to_string())
        );
        match &template.nodes()[1] {
            TemplateNode::Value(value) => {
                assert_eq!(value.path.to_string(), "name");
                assert_eq!(value.position.column, 8);
            }
            other => panic!("expected a value, got {:?}", other),
        }
        assert_eq!(template.source(), "Hello, {{name}}!");
    }

    #[test]
    fn test_compile_nested_blocks() {
        let template =
            Template::compile("{{#a}}{{#b}}x{{/b}}{{!c}}y{{/c}}{{/a}}").expect("compiles");
        let TemplateNode::Block(outer) = &template.nodes()[0] else {
            panic!("expected a block");
        };
        assert_eq!(outer.name, "a");
        assert!(!outer.negated);
        assert_eq!(outer.children.len(), 2);
        let TemplateNode::Block(negated) = &outer.children[1] else {
            panic!("expected a block");
        };
        assert!(negated.negated);
        assert_eq!(negated.name, "c");
    }

    #[test]
    fn test_block_name_is_a_path() {
        let template = Template::compile("{{#.}}{{/.}}{{#a.b}}{{/a.b}}").expect("compiles");
        let TemplateNode::Block(block) = &template.nodes()[1] else {
            panic!("expected a block");
        };
        assert_eq!(
            block.path.segments(),
            &[
                PathSegment::Field("a".to_string()),
                PathSegment::Field("b".to_string())
            ]
        );
    }

    #[test]
    fn test_compile_modifier_inside_owner() {
        let template = Template::compile("{{#b}}{{.}}{{#b#Separator}},{{/b#Separator}}{{/b}}")
            .expect("compiles");
        let TemplateNode::Block(block) = &template.nodes()[0] else {
            panic!("expected a block");
        };
        assert!(matches!(
            &block.children[1],
            TemplateNode::Modifier(Modifier {
                kind: ModifierKind::Separator,
                ..
            })
        ));
    }

    #[test]
    fn test_formatters_are_validated() {
        let template = Template::compile("{{v:w=-3:uc}}{{#b:l-s=NEWLINE:indent=1}}{{/b}}")
            .expect("compiles");
        let TemplateNode::Value(value) = &template.nodes()[0] else {
            panic!("expected a value");
        };
        assert_eq!(
            value.formatters,
            vec![ValueFormatter::Width(-3), ValueFormatter::UpperCase]
        );
        let TemplateNode::Block(block) = &template.nodes()[1] else {
            panic!("expected a block");
        };
        assert_eq!(
            block.formatters,
            vec![
                BlockFormatter::ListSeparator("\n".to_string()),
                BlockFormatter::Indent(1)
            ]
        );
    }

    #[test]
    fn test_mismatched_close() {
        let err = compile_err("{{#a}}{{#b}}{{/a}}{{/b}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::MismatchedBlockTag {
                open: "b".to_string(),
                close: "a".to_string()
            }
        );
        assert_eq!(err.position.column, 13);
    }

    #[test]
    fn test_unexpected_close() {
        let err = compile_err("text{{/a}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnexpectedBlockClose {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_block_reports_opening_position() {
        let err = compile_err("line\n  {{#a}}never closed");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnclosedBlock {
                name: "a".to_string()
            }
        );
        assert_eq!(err.position, SourcePosition::new(7, 2, 3));
    }

    #[test]
    fn test_misplaced_modifiers() {
        for source in [
            "{{#b#First}}{{/b#First}}",
            "{{#a}}{{#b#First}}{{/b#First}}{{/a}}",
            "{{!b}}{{#b#First}}{{/b#First}}{{/b}}",
            "{{#b}}{{#c}}{{#b#Last}}{{/b#Last}}{{/c}}{{/b}}",
        ] {
            assert!(
                matches!(
                    compile_err(source).kind,
                    CompileErrorKind::MisplacedModifier { .. }
                ),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_unknown_modifier() {
        let err = compile_err("{{#b}}{{#b#Middle}}{{/b#Middle}}{{/b}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownModifier {
                owner: "b".to_string(),
                modifier: "Middle".to_string()
            }
        );
    }

    #[test]
    fn test_modifier_close_must_match() {
        let err = compile_err("{{#b}}{{#b#First}}{{/b}}{{/b}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::MismatchedBlockTag {
                open: "b#First".to_string(),
                close: "b".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_formatter() {
        let err = compile_err("{{test:foo}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownFormatter {
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_formatter_kind_mismatch() {
        let err = compile_err("{{#b:upper-case}}{{/b}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::FormatterKindMismatch {
                name: "upper-case".to_string(),
                kind: FormatterKind::Value,
                target: "a block"
            }
        );
        insta::assert_snapshot!(
            err.to_string(),
            @"1:1: value formatter 'upper-case' cannot be applied to a block"
        );

        let err = compile_err("{{v:indent=2}}");
        assert!(matches!(
            err.kind,
            CompileErrorKind::FormatterKindMismatch {
                kind: FormatterKind::Block,
                target: "a value",
                ..
            }
        ));
    }

    #[test]
    fn test_formatters_rejected_on_other_directives() {
        let err = compile_err("{{#b}}{{/b:uc}}");
        assert!(matches!(
            err.kind,
            CompileErrorKind::FormatterKindMismatch {
                target: "a closing tag",
                ..
            }
        ));
        let err = compile_err("{{_SPACE:indent=1}}");
        assert!(matches!(
            err.kind,
            CompileErrorKind::FormatterKindMismatch {
                target: "a special token",
                ..
            }
        ));
        let err = compile_err("{{_SPACE:bogus}}");
        assert!(matches!(err.kind, CompileErrorKind::UnknownFormatter { .. }));
    }

    #[test]
    fn test_invalid_formatter_argument() {
        for source in ["{{v:width=abc}}", "{{v:width}}", "{{v:hex=1}}", "{{#b:indent=-1}}{{/b}}"] {
            assert!(
                matches!(
                    compile_err(source).kind,
                    CompileErrorKind::InvalidFormatterArgument { .. }
                ),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_invalid_paths() {
        for source in ["{{}}", "{{a..b}}", "{{a[x]}}", "{{#a[}}{{/a[}}"] {
            assert!(
                matches!(compile_err(source).kind, CompileErrorKind::InvalidPath { .. }),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_unknown_special_token() {
        let err = compile_err("{{_NEWLINES}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownSpecialToken {
                name: "NEWLINES".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_directive() {
        assert_eq!(
            compile_err("{{test").kind,
            CompileErrorKind::UnterminatedDirective
        );
        assert_eq!(
            compile_err("{{test}").kind,
            CompileErrorKind::UnterminatedDirective
        );
    }

    #[test]
    fn test_includes_need_a_resolver() {
        let err = compile_err("{{>header}}");
        assert_eq!(
            err.kind,
            CompileErrorKind::IncludeNotFound {
                name: "header".to_string()
            }
        );
    }

    #[test]
    fn test_include_is_compiled_inline() {
        let resolver = MemoryResolver::with_includes([("item", "[{{.}}]")]);
        let options = CompileOptions::new().with_resolver(&resolver);
        let template = Template::compile_with_options("{{#l}}{{>item}}{{/l}}", &options)
            .expect("compiles");
        let TemplateNode::Block(block) = &template.nodes()[0] else {
            panic!("expected a block");
        };
        let TemplateNode::Include(include) = &block.children[0] else {
            panic!("expected an include");
        };
        assert_eq!(include.name, "item");
        assert_eq!(include.children.len(), 3);
    }

    #[test]
    fn test_include_errors_point_into_the_include() {
        let resolver = MemoryResolver::with_includes([("bad", "ok\n{{#x}}")]);
        let options = CompileOptions::new()
            .with_filename("main.tmpl")
            .with_resolver(&resolver);
        let err = Template::compile_with_options("{{>bad}}", &options).expect_err("fails");
        assert_eq!(err.to_string(), "bad:2:1: block 'x' is never closed");
    }

    #[test]
    fn test_recursive_include() {
        let resolver = MemoryResolver::with_includes([("self", "x{{>self}}")]);
        let options = CompileOptions::new()
            .with_resolver(&resolver)
            .with_max_include_depth(5);
        let err = Template::compile_with_options("{{>self}}", &options).expect_err("fails");
        assert_eq!(
            err.kind,
            CompileErrorKind::RecursiveInclude {
                name: "self".to_string(),
                max_depth: 5
            }
        );
    }

    #[test]
    fn test_filename_in_positions() {
        let err = Template::compile_with_filename("{{#a}}", "enum.tmpl").expect_err("fails");
        assert_eq!(err.to_string(), "enum.tmpl:1:1: block 'a' is never closed");
    }

    #[test]
    fn test_options_builders() {
        let registry = FormatterRegistry::standard().without(&["uc"]);
        let options = CompileOptions::default()
            .with_registry(&registry)
            .with_filename("a.tmpl")
            .with_max_include_depth(3);

        let template = Template::compile_with_options("{{v:upper-case}}", &options)
            .expect("compiles");
        assert_eq!(template.filename(), Some("a.tmpl"));
        let err = Template::compile_with_options("{{v:uc}}", &options).expect_err("fails");
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownFormatter {
                name: "uc".to_string()
            }
        );
    }

    #[test]
    fn test_from_str() {
        let template: Template = "{{a}}".parse().expect("compiles");
        assert_eq!(template.nodes().len(), 1);
        assert!(template.filename().is_none());
    }

    #[test]
    fn test_template_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Template>();
    }
}
