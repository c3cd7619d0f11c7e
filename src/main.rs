use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mysql2pg::{convert_file, ConvertOptions};

#[derive(Parser)]
#[command(name = "mysql2pg")]
#[command(author, version, about = "Convert MySQL dump scripts to PostgreSQL or GaussDB SQL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a MySQL script file
    Convert {
        /// Path to the MySQL script
        input: PathBuf,

        /// Output path for the converted script (defaults to target.sql next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target dialect (postgresql, gauss-mysql)
        #[arg(short, long, default_value = "postgresql")]
        dialect: String,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            dialect,
            verbose,
        } => {
            let options = ConvertOptions {
                input_path: input,
                output_path: output,
                dialect,
                verbose,
            };

            convert_file(options)?;
        }
    }

    Ok(())
}
