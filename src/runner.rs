use crate::error::{ReportStyle, RunError};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::io::{self, Write};

/// Lex, parse and evaluate `source` against a fresh `<main>` scope, writing
/// program output to `output`. `name` is only used in diagnostics.
///
/// Each stage stops the run on its first error; later stages never start.
pub fn run<W: Write>(source: &str, name: &str, output: W) -> Result<(), RunError> {
    let tokens = Lexer::new(source, name).scan_tokens()?;
    let program = Parser::new(tokens).parse()?;

    let mut evaluator = Evaluator::new(output);
    evaluator.evaluate_program(&program)
}

/// [`run`], reporting any failure to `errors`. Returns whether the program
/// ran to completion.
pub fn run_and_report<W: Write, E: Write>(
    source: &str,
    name: &str,
    style: ReportStyle,
    output: W,
    mut errors: E,
) -> bool {
    match run(source, name, output) {
        Ok(()) => true,
        Err(error) => {
            // Nowhere left to send the diagnostic if the error sink fails too.
            report(&error, source, style, &mut errors).ok();
            false
        }
    }
}

pub fn report<E: Write>(
    error: &RunError,
    source: &str,
    style: ReportStyle,
    errors: &mut E,
) -> io::Result<()> {
    match error {
        RunError::Diagnostic(diagnostic) => diagnostic.report(source, style, errors),
        RunError::Output(_) => writeln!(errors, "{}", error),
    }
}
