//! Miette diagnostics for definition files.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A JSON definitions file that failed to parse.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid definitions: {message}")]
#[diagnostic(code(msgfmt::definitions))]
pub struct JsonDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl JsonDiagnostic {
    pub fn from_json_error(path: &Path, content: &str, err: &serde_json::Error) -> Self {
        let offset = byte_offset(content, err.line(), err.column());
        let help = err
            .is_data()
            .then(|| "each node needs a \"kind\" of text, parameter, template or compound".to_string());

        JsonDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message: err.to_string(),
            help,
        }
    }
}

/// Byte offset of a 1-based line and column, clamped to the content.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let offset = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>()
        + column.saturating_sub(1);
    offset.min(content.len().saturating_sub(1))
}
