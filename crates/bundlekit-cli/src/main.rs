mod commands;
mod config;

use bundlekit_schema::BundleFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_INPUT_ERROR, EXIT_VALIDATION_ERROR};
use config::CliConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "bundlekit",
    version,
    about = "Validate placement directives and machine maps of deployment bundles"
)]
struct Cli {
    /// Path to a TOML config file (default: ~/.config/bundlekit/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse one or more unit placement directives.
    Placement {
        /// Placement directives, e.g. "lxc:mysql/1" or "new".
        #[arg(required = true)]
        directives: Vec<String>,
        /// Bundle format generation (v3 or v4); defaults to the configured format.
        #[arg(long)]
        format: Option<BundleFormat>,
    },
    /// Validate and normalize the machines section of a bundle file.
    Machines {
        /// Path to a YAML or JSON bundle file.
        file: PathBuf,
        /// Treat the whole document as the machines mapping.
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BUNDLEKIT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let json_output = cli.json;

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Placement { directives, format } => {
            CliConfig::resolve(config_path).and_then(|config| {
                commands::placement::run(
                    &directives,
                    format.unwrap_or(config.default_format),
                    json_output,
                )
            })
        }
        Commands::Machines { file, raw } => CliConfig::resolve(config_path).and_then(|config| {
            let key = (!raw).then_some(config.machines_key.as_str());
            commands::machines::run(&file, key, json_output)
        }),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("validation error:") {
                EXIT_VALIDATION_ERROR
            } else if msg.starts_with("input error:") || msg.starts_with("config error:") {
                EXIT_INPUT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
