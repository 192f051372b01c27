mod cli;

use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use cli::{CheckArgs, Cli, Commands, TokensArgs};
use rd_check::lexer;
use rd_check::limits::CheckerLimits;
use rd_check::parser::{self, ParseError};
use rd_check::sink::Transcript;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Tokens(args) => run_tokens(&args),
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        ExitCode::from(2)
    })
}

fn load_limits(config: &Path) -> Result<CheckerLimits, Box<dyn Error>> {
    let limits = CheckerLimits::from_project_toml(config)?;
    limits.validate()?;
    tracing::debug!(?limits, config = %config.display(), "limits loaded");
    Ok(limits)
}

fn read_source(file: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e).into())
}

fn run_check(args: &CheckArgs) -> Result<ExitCode, Box<dyn Error>> {
    let limits = load_limits(&args.config)?;
    let source = read_source(&args.file)?;

    let (result, transcript) = std::thread::Builder::new()
        .name("checker".to_string())
        .stack_size(limits.parser_stack_size())
        .spawn(move || {
            let mut transcript = Transcript::new();
            let result = parser::check_source(&source, &mut transcript, &limits);
            (result, transcript)
        })?
        .join()
        .map_err(|_| "checker thread panicked")?;

    if args.trace {
        print!("{}", transcript.into_string());
    }

    match result {
        Ok(()) => {
            println!("{}: ok", args.file.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(ParseError::Syntax(diagnostic)) => {
            eprintln!("{}: syntax error", args.file.display());
            eprintln!("{}", diagnostic);
            Ok(ExitCode::from(1))
        }
        Err(e @ ParseError::Source(_)) => Err(e.into()),
    }
}

fn run_tokens(args: &TokensArgs) -> Result<ExitCode, Box<dyn Error>> {
    let limits = load_limits(&args.config)?;
    let source = read_source(&args.file)?;

    for token in lexer::lex(&source, &limits)? {
        println!("{}\t{}\t{}", token.line, token.kind, token.text);
    }

    Ok(ExitCode::SUCCESS)
}
