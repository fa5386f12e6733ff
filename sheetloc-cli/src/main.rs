use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sheetloc_cli::{
    preview::{PreviewOptions, run_preview_command},
    sync::{SyncOptions, run_sync_command},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Show debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate localization files from the configured worksheets.
    Sync {
        /// Config file (defaults to sheetloc.toml/.yaml/.yml/.json in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: json, android or ios
        #[arg(short, long)]
        format: Option<String>,

        /// Directory the files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Only generate these languages (repeatable)
        #[arg(short, long = "lang")]
        langs: Vec<String>,
    },

    /// Print the files one language would produce, without writing them.
    Preview {
        /// Config file (defaults to sheetloc.toml/.yaml/.yml/.json in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: json, android or ios
        #[arg(short, long)]
        format: Option<String>,

        /// Language to preview
        #[arg(short, long)]
        lang: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    tracing_subscriber::registry().with(console_layer).init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Sync {
            config,
            format,
            output_dir,
            langs,
        } => run_sync_command(SyncOptions {
            config,
            format,
            output_dir,
            langs,
        }),
        Commands::Preview {
            config,
            format,
            lang,
        } => run_preview_command(PreviewOptions {
            config,
            format,
            lang,
        }),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(shell, &mut cmd, "sheetloc", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
