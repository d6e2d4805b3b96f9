use clap::{Parser, Subcommand};
use classdeck_core::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "classdeck", version, about = "Classdeck admin dashboard")]
struct Cli {
    /// Path to the configuration file
    #[arg(
        long,
        short,
        global = true,
        env = "CLASSDECK_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the admin dashboard.
    Serve {
        /// Override `dashboard.port` from the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and the catalog it loads.
    Check,

    /// Write a default configuration file.
    Init {
        /// Where to write the file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve { port } => {
            let mut config = commands::load_config(&cli.config)?;
            init_tracing(&config.logging.level);
            if let Some(port) = port {
                config.dashboard.port = port;
            }
            commands::serve::run(config).await?
        }
        Command::Check => {
            let config = commands::load_config(&cli.config)?;
            init_tracing(&config.logging.level);
            commands::check::run(&config)?
        }
        Command::Init { path, force } => {
            init_tracing("info");
            commands::init::run(&path, force)?
        }
    }

    Ok(())
}
