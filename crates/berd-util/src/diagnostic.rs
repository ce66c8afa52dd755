//! Language-error reporting.
//!
//! Every failure the interpreter can surface to a program author is a
//! [`Diagnostic`]: a category, a message, and an optional source span.
//! Diagnostics are fatal, the core never recovers from one, so all
//! fallible phase APIs simply return [`Result`]. Presentation (line/column
//! translation, caret rendering) belongs to the driver.
//!
//! Internal control-flow signals (return, break, continue, try-again) are
//! *not* diagnostics; they are modelled as a separate sum type in the
//! runtime crate and only become a `Context` diagnostic when they escape
//! their legal boundary.

use std::fmt;

use crate::Span;

/// Result alias used by every fallible core API.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// The category of a language error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognised character during lexing.
    Lex,
    /// Unexpected token, missing terminator, malformed construct.
    Parse,
    /// Undefined assignment target, or assignment to a write-once name.
    Name,
    /// Operation on incompatible value kinds.
    Type,
    /// Wrong argument count or shape for a built-in.
    Shape,
    /// Control-flow signal used outside its legal context.
    Context,
    /// A value equal to a deleted primitive was produced.
    Deletion,
    /// Reactive dispatch exceeded its safety bound.
    Safety,
    /// File I/O failure from `readFile`/`readLines`.
    Io,
}

impl ErrorKind {
    /// Short lowercase label used in rendered diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Lex => "lex",
            ErrorKind::Parse => "parse",
            ErrorKind::Name => "name",
            ErrorKind::Type => "type",
            ErrorKind::Shape => "shape",
            ErrorKind::Context => "context",
            ErrorKind::Deletion => "deletion",
            ErrorKind::Safety => "safety",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fatal language error with its source location.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Byte span of the offending source, when known.
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Creates a diagnostic with a known source span.
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Some(span),
        }
    }

    /// Creates a diagnostic with no usable source location.
    pub fn positionless(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
        }
    }

    /// Attaches a span to a diagnostic that lacks one, keeping an existing
    /// span if already set.
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

macro_rules! diagnostic_ctor {
    ($(#[$doc:meta] $name:ident => $kind:ident),* $(,)?) => {
        impl Diagnostic {
            $(
                #[$doc]
                pub fn $name(message: impl Into<String>, span: Span) -> Self {
                    Self::new(ErrorKind::$kind, message, span)
                }
            )*
        }
    };
}

diagnostic_ctor! {
    /// Lex error at `span`.
    lex => Lex,
    /// Parse error at `span`.
    parse => Parse,
    /// Name error at `span`.
    name => Name,
    /// Type error at `span`.
    type_error => Type,
    /// Shape error at `span`.
    shape => Shape,
    /// Context error at `span`.
    context => Context,
    /// Deletion error at `span`.
    deletion => Deletion,
    /// Safety abort at `span`.
    safety => Safety,
    /// I/O error at `span`.
    io => Io,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let diag = Diagnostic::parse("unexpected token", Span::new(3, 4));
        assert_eq!(diag.to_string(), "unexpected token");
        assert_eq!(diag.kind, ErrorKind::Parse);
    }

    #[test]
    fn test_or_span_keeps_existing() {
        let diag = Diagnostic::name("x is not defined", Span::new(1, 2));
        let diag = diag.or_span(Span::new(9, 10));
        assert_eq!(diag.span, Some(Span::new(1, 2)));
    }

    #[test]
    fn test_or_span_fills_missing() {
        let diag = Diagnostic::positionless(ErrorKind::Safety, "dispatch bound exceeded");
        let diag = diag.or_span(Span::new(9, 10));
        assert_eq!(diag.span, Some(Span::new(9, 10)));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ErrorKind::Deletion.label(), "deletion");
        assert_eq!(ErrorKind::Io.to_string(), "io");
    }
}
