use attrplate::ErrorChain;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "attrplate")]
#[command(about = "Render and check attribute-driven templates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against a JSON context
    Render {
        /// Template file
        template: PathBuf,

        /// JSON file holding the context object (empty context if omitted)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// TOML rendering configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a template and check every directive expression
    Check {
        /// Template file
        template: PathBuf,

        /// TOML rendering configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Render {
            template,
            context,
            config,
            output,
        } => commands::render::run(template, context, config, output),
        Commands::Check { template, config } => commands::check::run(template, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (code, message) = match e.downcast_ref::<attrplate::Error>() {
                Some(err) => (err.error_code(), ErrorChain::new(err).format_for_log()),
                None => ("E_CLI", format!("{:#}", e)),
            };
            eprintln!("error [{}]: {}", code, message);
            ExitCode::FAILURE
        }
    }
}
