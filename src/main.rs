use clap::{Arg, ArgAction, Command};
use peng::error::ReportStyle;
use peng::{repl, runner};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = Command::new("peng")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An interpreter for PENG, programming in plain English")
        .arg(
            Arg::new("file")
                .help("The script file to execute, or '-' to read it from stdin")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fancy")
                .long("fancy")
                .help("Show errors with an annotated source excerpt")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let style = if matches.get_flag("fancy") {
        ReportStyle::Fancy
    } else {
        ReportStyle::Plain
    };

    match matches.get_one::<String>("file") {
        Some(file) if !matches.get_flag("interactive") => run_file(file, style),
        _ => match repl::start(style) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(path: &str, style: ReportStyle) -> ExitCode {
    let (source, name) = if path == "-" {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {}", e);
            return ExitCode::FAILURE;
        }
        (source, "<stdin>".to_string())
    } else {
        let path = Path::new(path);
        match fs::read_to_string(path) {
            Ok(source) => (source, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    };

    let stdout = io::stdout();
    if runner::run_and_report(&source, &name, style, stdout.lock(), io::stderr()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
