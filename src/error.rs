use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use thiserror::Error;

/// A location inside a named source buffer.
///
/// `offset` counts characters, not bytes, so it lines up with the
/// character-based ranges ariadne expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub source: Rc<str>,
}

impl Position {
    pub fn start(source: Rc<str>) -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            source,
        }
    }

    /// Step past `current`, the character that was just consumed.
    pub fn advance(&mut self, current: char) {
        self.offset += 1;
        self.column += 1;
        if current == '\n' {
            self.line += 1;
            self.column = 1;
        }
    }

    /// Copy of this position moved past `current`.
    pub fn advanced(&self, current: char) -> Self {
        let mut next = self.clone();
        next.advance(current);
        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "In {}, line {}, column {}",
            self.source, self.line, self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering the single character `c` found at `pos`.
    pub fn single(pos: Position, c: char) -> Self {
        let end = pos.advanced(c);
        Self { start: pos, end }
    }

    pub fn empty(pos: Position) -> Self {
        Self {
            start: pos.clone(),
            end: pos,
        }
    }

    /// From the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Self {
        Self {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCharacter,
    InvalidCharacter,
    InvalidSyntax,
    InvalidOperation,
    DivisionByZero,
    UndefinedIdentifier,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::UnknownCharacter => "Unknown Character Error",
            ErrorKind::InvalidCharacter => "Invalid Character Error",
            ErrorKind::InvalidSyntax => "Invalid Syntax Error",
            ErrorKind::InvalidOperation => "Invalid Operation Error",
            ErrorKind::DivisionByZero => "Division By Zero Error",
            ErrorKind::UndefinedIdentifier => "Identifier Error",
        };
        f.write_str(name)
    }
}

/// How a diagnostic is rendered for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// `<kind>: <message>.` followed by the start and end positions.
    #[default]
    Plain,
    /// Source excerpt with a labelled underline.
    Fancy,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}.\n{start}\n{end}", start = .span.start, end = .span.end)]
pub struct PengError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    /// Name of the scope an identifier was resolved against.
    pub scope: Option<String>,
}

pub type Result<T> = std::result::Result<T, PengError>;

impl PengError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            message,
            span,
            scope: None,
        }
    }

    pub fn unknown_character(span: Span, message: String) -> Self {
        Self::new(ErrorKind::UnknownCharacter, span, message)
    }

    pub fn invalid_character(span: Span, message: String) -> Self {
        Self::new(ErrorKind::InvalidCharacter, span, message)
    }

    pub fn invalid_syntax(span: Span, message: String) -> Self {
        Self::new(ErrorKind::InvalidSyntax, span, message)
    }

    pub fn invalid_operation(span: Span, message: String) -> Self {
        Self::new(ErrorKind::InvalidOperation, span, message)
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::new(ErrorKind::DivisionByZero, span, "Division by zero".to_string())
    }

    pub fn undefined_identifier(span: Span, name: &str, scope: &str) -> Self {
        Self {
            kind: ErrorKind::UndefinedIdentifier,
            message: format!("Identifier '{}' is not defined", name),
            span,
            scope: Some(scope.to_string()),
        }
    }

    pub fn report<W: Write>(&self, source: &str, style: ReportStyle, mut out: W) -> io::Result<()> {
        match style {
            ReportStyle::Plain => writeln!(out, "{}", self),
            ReportStyle::Fancy => self.report_fancy(source, out),
        }
    }

    fn report_fancy<W: Write>(&self, source: &str, out: W) -> io::Result<()> {
        let filename: &str = &self.span.start.source;

        let color = match self.kind {
            ErrorKind::UnknownCharacter | ErrorKind::InvalidCharacter => Color::Red,
            ErrorKind::InvalidSyntax => Color::Yellow,
            ErrorKind::InvalidOperation
            | ErrorKind::DivisionByZero
            | ErrorKind::UndefinedIdentifier => Color::Magenta,
        };

        // Zero-width spans (end of input) still need something to underline.
        let start = self.span.start.offset;
        let end = self.span.end.offset.max(start + 1);

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", self.kind.fg(color), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref scope) = self.scope {
            report_builder = report_builder.with_note(format!("resolved in scope {}", scope));
        }

        report_builder
            .finish()
            .write((filename, Source::from(source)), out)
    }
}

/// Failure of a whole run: either a diagnostic from the program, or the
/// output sink refusing a write.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Diagnostic(#[from] PengError),
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
}
