//! berd-drv - Command-line driver.
//!
//! `berd <file>` reads a source file, runs it through lex → parse →
//! execute, prints the interpreter wall-clock runtime to stderr on
//! success, and renders any diagnostic with a source caret on failure.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use berd_util::{Diagnostic, SourceMap};

/// Exit codes for the binary.
pub mod exit_code {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const USAGE: i32 = 2;
}

/// Runs a source file, writing program output to stdout and diagnostics
/// to stderr. Language errors are rendered with a caret and reported via
/// the returned exit code; failure to read the file is a host error.
pub fn run_file(path: &Path) -> anyhow::Result<i32> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;

    let started = Instant::now();
    let stdout = std::io::stdout();
    let (_, result) = berd_run::run_source(&source, stdout.lock());
    match result {
        Ok(()) => {
            let elapsed = started.elapsed();
            eprintln!("[berd] finished in {:.2?}", elapsed);
            Ok(exit_code::OK)
        }
        Err(diagnostic) => {
            eprint!("{}", render_diagnostic(&source, path, &diagnostic));
            Ok(exit_code::ERROR)
        }
    }
}

/// Renders a diagnostic with its source line and a caret.
///
/// ```text
/// error[name]: 'y' is not assignable
///  --> prog.db:2:1
///   |
/// 2 | y = 11!
///   | ^
/// ```
pub fn render_diagnostic(source: &str, path: &Path, diagnostic: &Diagnostic) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "error[{}]: {}",
        diagnostic.kind.label(),
        diagnostic.message
    );

    let Some(span) = diagnostic.span else {
        return out;
    };
    let map = SourceMap::new(source);
    let (line, column) = map.line_col(span.start);
    let _ = writeln!(out, " --> {}:{line}:{column}", path.display());

    if let Some(text) = map.line_text(line) {
        let number = line.to_string();
        let gutter = " ".repeat(number.len());
        let _ = writeln!(out, " {gutter} |");
        let _ = writeln!(out, " {number} | {text}");
        // Caret width covers the span but never runs past the line.
        let col = column as usize - 1;
        let width = span
            .len()
            .max(1)
            .min(text.chars().count().saturating_sub(col).max(1));
        let _ = writeln!(out, " {gutter} | {}{}", " ".repeat(col), "^".repeat(width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use berd_util::Span;

    #[test]
    fn test_render_with_caret() {
        let source = "const const y = 10!\ny = 11!\n";
        let diagnostic = Diagnostic::name("'y' is not assignable", Span::new(20, 21));
        let rendered = render_diagnostic(source, Path::new("prog.db"), &diagnostic);
        assert!(rendered.starts_with("error[name]: 'y' is not assignable\n"));
        assert!(rendered.contains(" --> prog.db:2:1\n"));
        assert!(rendered.contains(" 2 | y = 11!\n"));
        assert!(rendered.contains(" | ^\n"));
    }

    #[test]
    fn test_render_without_span() {
        let diagnostic =
            Diagnostic::positionless(berd_util::ErrorKind::Safety, "dispatch bound exceeded");
        let rendered = render_diagnostic("", Path::new("prog.db"), &diagnostic);
        assert_eq!(rendered, "error[safety]: dispatch bound exceeded\n");
    }

    #[test]
    fn test_caret_spans_token() {
        let source = "delete [1, 2]!\n";
        let diagnostic = Diagnostic::type_error("cannot delete", Span::new(7, 13));
        let rendered = render_diagnostic(source, Path::new("p.db"), &diagnostic);
        assert!(rendered.contains("^^^^^^"));
    }
}
