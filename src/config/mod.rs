pub mod schema_file;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "csv-bridge")]
#[command(about = "Convert between CSV files and typed JSON records")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a CSV file into typed JSON records using a schema file
    Import {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, help = "TOML column schema")]
        schema: PathBuf,

        #[arg(long, help = "Encoding label; overrides the schema file")]
        encoding: Option<String>,

        #[arg(long, help = "Write records here instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, help = "Fail when headers differ from the schema")]
        validate_headers: bool,
    },

    /// Write JSON records back out as an escaped, BOM-prefixed CSV file
    Export {
        #[arg(long, help = "JSON array of records")]
        input: PathBuf,

        #[arg(long, value_delimiter = ',', help = "Header row, also the record keys")]
        headers: Vec<String>,

        #[arg(long, default_value = "utf-8")]
        encoding: String,

        #[arg(long, help = "Explicit output path; otherwise a timestamped name is generated")]
        output: Option<PathBuf>,

        #[arg(long, default_value = "export", help = "Base for the generated file name")]
        base_name: String,

        #[arg(long, help = "Optional tag inserted into the generated file name")]
        tag: Option<String>,
    },
}
