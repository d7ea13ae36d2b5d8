mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskcal")]
#[command(about = "Turn CSV deadline lists into iCalendar files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one .ics file per section of a CSV deadline list
    Convert {
        /// CSV file with TYPE, CONTENT, DEADLINE and DESCRIPTION columns
        csv: PathBuf,

        /// Directory to write the .ics files into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Section name for deadlines listed before the first section row
        #[arg(short, long)]
        section: Option<String>,

        /// Never prompt; fail if a section name is needed but not given
        #[arg(long)]
        no_input: bool,
    },
    /// List the events in an .ics file
    Inspect {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            csv,
            out_dir,
            section,
            no_input,
        } => commands::convert::run(&csv, &out_dir, section, no_input),
        Commands::Inspect { file } => commands::inspect::run(&file),
    }
}
