use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rdcheck")]
#[command(about = "Syntax checker for begin/end statement programs", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a source file against the grammar
    Check(CheckArgs),
    /// Print the token stream of a source file
    Tokens(TokensArgs),
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Input file path
    pub file: PathBuf,

    /// Print the rule and terminal trace to stdout
    #[arg(long)]
    pub trace: bool,

    /// Project file with a [limits] table
    #[arg(long, default_value = "project.toml")]
    pub config: PathBuf,
}

#[derive(clap::Args)]
pub struct TokensArgs {
    /// Input file path
    pub file: PathBuf,

    /// Project file with a [limits] table
    #[arg(long, default_value = "project.toml")]
    pub config: PathBuf,
}
