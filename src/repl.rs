use crate::error::{ReportStyle, RunError};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::runner;
use std::io::{self, BufRead, Write};

const SOURCE_NAME: &str = "<stdin>";

/// Interactive session. Bindings persist from one line to the next; a line
/// that fails reports its diagnostic and the session carries on.
pub fn start(style: ReportStyle) -> io::Result<()> {
    println!("PENG v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let stdin = io::stdin();
    let mut evaluator = Evaluator::new(io::stdout());
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Err(error) = run_line(line, &mut evaluator) {
            runner::report(&error, line, style, &mut io::stderr())?;
        }
    }

    Ok(())
}

fn run_line<W: Write>(source: &str, evaluator: &mut Evaluator<W>) -> Result<(), RunError> {
    let tokens = Lexer::new(source, SOURCE_NAME).scan_tokens()?;
    let program = Parser::new(tokens).parse()?;
    evaluator.evaluate_program(&program)
}
