//! Contains the command line interface of the SOOP lexical analyzer.

use std::{
    cell::Cell,
    fmt::Display,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

pub use clap::Parser;
use soop_base::{
    diagnostic::Handler,
    log::{Message, Severity},
    source_file::{self, SourceFile},
};
use soop_lexical::Analyzer;

use crate::{
    report::TokenTable,
    transport::{Transport, TransportConfig, DEFAULT_MAX_INPUT_LENGTH},
};

pub mod report;
pub mod transport;

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(name = "soop", about = "SOOP programming language lexical analyzer.")]
pub struct Argument {
    /// The task to perform.
    #[clap(subcommand)]
    pub command: Command,
}

/// The tasks the program can perform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Subcommand)]
pub enum Command {
    /// Analyzes a source file and prints its tokens.
    Lex {
        /// The input file to analyze.
        file: PathBuf,

        /// The format the tokens are printed in.
        #[clap(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// Answers one JSON analysis request read from the standard input.
    Request {
        /// The longest code, in characters, the request may carry.
        #[clap(long = "max-input-length", default_value_t = DEFAULT_MAX_INPUT_LENGTH)]
        max_input_length: usize,
    },
}

/// The output formats of [`Command::Lex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Format {
    /// A plain-text table.
    Table,

    /// The JSON array sent by the transport.
    Json,
}

/// A struct that implements [`Handler`] but prints all the message to the standard error stream.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Printer {
    printed: Cell<bool>,
}

impl Printer {
    /// Creates a new [`Printer`].
    fn new() -> Self {
        Self {
            printed: Cell::new(false),
        }
    }

    fn has_printed(&self) -> bool { self.printed.get() }
}

impl<E: Display> Handler<E> for Printer {
    fn receive(&self, error: E) {
        eprintln!("{error}");
        self.printed.set(true);
    }
}

fn report_failure(display: impl Display) -> ExitCode {
    eprintln!("{}", Message::new(Severity::Error, display));
    ExitCode::FAILURE
}

fn load(path: &Path) -> Result<Arc<SourceFile>, String> {
    let file = File::open(path).map_err(|error| format!("{}: {error}", path.display()))?;

    SourceFile::load(file, path.to_path_buf()).map_err(|error| match error {
        source_file::Error::IoError(error) => format!("{}: {error}", path.display()),
        source_file::Error::Utf8Error(error) => format!("{}: {error}", path.display()),
    })
}

fn lex(path: &Path, format: Format) -> ExitCode {
    let source_file = match load(path) {
        Ok(source_file) => source_file,
        Err(error) => return report_failure(error),
    };

    let printer = Printer::new();
    let result = Analyzer::default().analyze(&source_file, &printer);

    match format {
        Format::Table => print!("{}", TokenTable::new(result.tokens())),
        Format::Json => match serde_json::to_string_pretty(&transport::to_wire(result.tokens())) {
            Ok(json) => println!("{json}"),
            Err(error) => return report_failure(error),
        },
    }

    eprintln!(
        "{}",
        Message::new(
            Severity::Info,
            format!(
                "{}: {} tokens, {} errors",
                path.display(),
                result.tokens().without_end().len(),
                result.errors().len()
            )
        )
    );

    if printer.has_printed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn request(max_input_length: usize) -> ExitCode {
    let mut body = String::new();
    if let Err(error) = io::stdin().read_to_string(&mut body) {
        return report_failure(format!("standard input: {error}"));
    }

    let transport = Transport::new(TransportConfig::new(max_input_length), Analyzer::default());
    let response = transport.handle(&body, &Printer::new());

    let severity = if response.status().is_success() {
        Severity::Info
    } else {
        Severity::Error
    };
    eprintln!("{}", Message::new(severity, response.status()));
    println!("{}", response.body());

    if response.status().is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(argument: Argument) -> ExitCode {
    match argument.command {
        Command::Lex { file, format } => lex(&file, format),
        Command::Request { max_input_length } => request(max_input_length),
    }
}
