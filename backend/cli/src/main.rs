mod app;
mod report_cmd;
mod serve_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use tracker_config::{
    apply_all_defaults, check, config_dir, config_file_path, load_unchecked, validate,
    validate_for_serving, write_config, TrackerConfig, ValidationReport,
};

#[derive(Parser)]
#[command(name = "activity-tracker")]
#[command(about = "Discord guild activity tracker")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.activity-tracker/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and track the configured guild
    Serve,
    /// Show one user's activity summary
    User {
        user_id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the message and voice call rankings
    Top {
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Record an event by hand
    Record {
        user_id: String,
        /// Message, Call, Join or Leave
        kind: String,
        /// Defaults to the local time now
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Write a config file with every default filled in
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::InitConfig { force } = cli.command {
        return init_config(&path, force).await;
    }

    let config = load_unchecked(&path).await?;
    tracker_logging::init_logger(config.log_dir().map(Path::new), config.log_level());
    info!(config = %path.display(), "Configuration loaded");
    check(&validation_report(&cli.command, &config))?;

    match cli.command {
        Commands::Serve => serve_cmd::run(&config).await?,
        Commands::User { user_id, json } => {
            let service = app::build_service(&config).await?;
            println!("{}", report_cmd::user(&service, &user_id, json).await?);
        }
        Commands::Top { limit, json } => {
            let service = app::build_service(&config).await?;
            println!("{}", report_cmd::top(&service, limit, json).await?);
        }
        Commands::Record {
            user_id,
            kind,
            timestamp,
            content,
        } => {
            let service = app::build_service(&config).await?;
            println!(
                "{}",
                report_cmd::record(&service, &user_id, &kind, timestamp, &content).await?
            );
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

/// Serving also needs the Discord settings; offline commands do not.
fn validation_report(command: &Commands, config: &TrackerConfig) -> ValidationReport {
    match command {
        Commands::Serve => validate_for_serving(config),
        _ => validate(config),
    }
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    write_config(&apply_all_defaults(TrackerConfig::default()), path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
