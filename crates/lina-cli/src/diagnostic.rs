/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compile error display with a source snippet.

use ariadne::{Color, Label, Report, ReportKind, Source};
use lina::CompileError;
use std::borrow::Cow;

/// Render a compile error as an ariadne report.
///
/// `filename` and `source` describe the template that was compiled. Errors
/// inside an included template name that file in their position; its text is
/// read from disk. When no source text is available the plain message is
/// returned.
pub fn render_compile_error(err: &CompileError, filename: &str, source: &str) -> String {
    let plain = format!("error: {}\n", err);

    let (id, text): (String, Cow<'_, str>) = match err.position.filename.as_deref() {
        Some(name) if name != filename => match std::fs::read_to_string(name) {
            Ok(text) => (name.to_string(), Cow::Owned(text)),
            Err(_) => return plain,
        },
        _ => (filename.to_string(), Cow::Borrowed(source)),
    };

    let Some(span) = char_span(&text, err.position.offset) else {
        return plain;
    };

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, id.clone(), span.start)
        .with_message(err.kind.to_string())
        .with_label(
            Label::new((id.clone(), span))
                .with_message(err.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write((id, Source::from(text.as_ref())), &mut output);

    match (written, String::from_utf8(output)) {
        (Ok(()), Ok(report)) => report,
        _ => plain,
    }
}

/// Character range of the directive starting at byte `offset`.
///
/// The span ends after the directive's closing braces, or at the end of the
/// text for an unterminated directive.
fn char_span(text: &str, offset: usize) -> Option<std::ops::Range<usize>> {
    let rest = text.get(offset..)?;
    let len = match rest.find("}}") {
        Some(end) if rest.starts_with("{{") => end + 2,
        _ => rest.len(),
    };
    let start = text[..offset].chars().count();
    let end = start + rest[..len].chars().count();
    Some(start..end.max(start + 1))
}
