use std::io::{self, BufRead};

use clap::{Parser as ClapParser, Subcommand};
use contextkey::cli::{self, CheckOptions, CheckOutcome, CliError};
use contextkey::logging::{LOG_LEVEL_ENV, init_logging};
use contextkey::{LogLevel, ParserConfig};

#[derive(ClapParser)]
#[command(name = "ctxkey")]
#[command(about = "ctxkey - Parse, validate and canonicalize context key expressions")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of each expression, or its diagnostics
    Check {
        /// Expressions to check (read one per line from stdin if omitted)
        expressions: Vec<String>,

        /// Print the expression tree as JSON
        #[arg(long)]
        json: bool,

        /// Treat platform keys such as isMac as ordinary keys
        #[arg(long)]
        no_constants: bool,

        /// Fix a key to a constant, e.g. --constant isDev=true
        #[arg(long = "constant", value_name = "KEY=BOOL")]
        constants: Vec<String>,
    },

    /// Print the token stream of an expression as JSON lines
    Tokens {
        /// The expression to scan
        expression: String,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'ctxkey docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = cli
        .log_level
        .as_deref()
        .map(str::parse::<LogLevel>)
        .transpose()
        .map_err(CliError::from)
        .and_then(|level| {
            init_logging(level.unwrap_or_default());
            run(cli.command)
        });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Check {
            expressions,
            json,
            no_constants,
            constants,
        } => run_check(expressions, json, no_constants, constants),
        Commands::Tokens { expression } => {
            let (lines, errors) = cli::execute_tokens(&expression)?;
            for line in lines {
                println!("{}", line);
            }
            for error in &errors {
                eprintln!("{}", error);
            }
            if errors.is_empty() {
                Ok(())
            } else {
                Err(CliError::Failed(1))
            }
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            print!("{}", cli::get_doc_category(&category)?);
            Ok(())
        }
    }
}

fn run_check(
    expressions: Vec<String>,
    json: bool,
    no_constants: bool,
    constants: Vec<String>,
) -> Result<(), CliError> {
    let expressions = if expressions.is_empty() && !atty::is(atty::Stream::Stdin) {
        io::stdin()
            .lock()
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        expressions
    };

    let mut config = if no_constants {
        ParserConfig::without_constants()
    } else {
        ParserConfig::default()
    };
    for entry in &constants {
        config.constants.merge(entry.parse()?);
    }

    let options = CheckOptions {
        expressions,
        json,
        config,
    };

    let reports = cli::execute_check(&options)?;
    let multiple = reports.len() > 1;
    let mut failed = 0;
    for report in &reports {
        if multiple {
            println!("# {}", report.input);
        }
        match &report.outcome {
            CheckOutcome::Canonical(text) => println!("{}", text),
            CheckOutcome::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
            CheckOutcome::Failed(diagnostics) => {
                failed += 1;
                print!("{}", diagnostics);
            }
        }
    }

    if failed > 0 {
        Err(CliError::Failed(failed))
    } else {
        Ok(())
    }
}
