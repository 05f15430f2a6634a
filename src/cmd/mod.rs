mod glob_util;
mod load;
mod translate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dump2sqlite")]
#[command(version)]
#[command(about = "Rewrite MySQL dumps as SQLite SQL and load them into a database file", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a MySQL dump into SQLite-compatible SQL
    Translate {
        /// Input SQL file or glob pattern (e.g., *.sql, dumps/**/*.sql)
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output SQL file or directory (default: stdout for single file, required for glob)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Show progress and statistics
        #[arg(short, long)]
        progress: bool,

        /// Strict mode: fail when the translation raised warnings
        #[arg(long)]
        strict: bool,

        /// Skip header comments
        #[arg(long)]
        no_header: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Translate a MySQL dump and load it into a SQLite database file
    Load {
        /// Input SQL file (supports .gz, .bz2, .xz, .zst compression)
        file: PathBuf,

        /// Database file to create (default: db.sqlite next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Execution engine: embedded or sqlite3
        #[arg(short, long)]
        engine: Option<String>,

        /// sqlite3 program used by the sqlite3 engine
        #[arg(long)]
        sqlite3_bin: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep the translated script next to the database
        #[arg(long)]
        keep_sql: bool,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,

        /// Show progress while reading and loading
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Translate {
            file,
            output,
            dry_run,
            progress,
            strict,
            no_header,
            fail_fast,
        } => translate::run(
            file, output, dry_run, progress, strict, no_header, fail_fast,
        ),
        Commands::Load {
            file,
            output,
            engine,
            sqlite3_bin,
            config,
            keep_sql,
            json,
            progress,
        } => load::run(
            file,
            output,
            engine,
            sqlite3_bin,
            config,
            keep_sql,
            json,
            progress,
        ),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "dump2sqlite",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
