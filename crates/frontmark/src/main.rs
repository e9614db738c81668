//! Frontmark CLI - render markdown with structured frontmatter to HTML.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod document;
mod page;

use document::RenderSettings;

#[derive(Parser)]
#[command(name = "frontmark")]
#[command(about = "Render markdown with structured frontmatter to HTML")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to frontmark.toml config file
    #[arg(short, long, default_value = "frontmark.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single markdown file
    Render {
        /// Markdown file to render
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep frontmatter as raw placeholders
        #[arg(long)]
        no_upgrade: bool,

        /// Wrap the output in a complete HTML page
        #[arg(long)]
        standalone: bool,
    },

    /// Render every markdown file in a directory
    Build {
        /// Input directory (defaults to config or "docs")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep frontmatter as raw placeholders
        #[arg(long)]
        no_upgrade: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries rendered HTML
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(&cli.config)?;
    let mut settings = RenderSettings::from_config(&config);

    // Execute command
    match cli.command {
        Commands::Render {
            input,
            output,
            no_upgrade,
            standalone,
        } => {
            settings.upgrade &= !no_upgrade;
            settings.standalone |= standalone;
            commands::render::run(&config, &input, output, settings).await?;
        }
        Commands::Build {
            input,
            output,
            no_upgrade,
        } => {
            settings.upgrade &= !no_upgrade;
            commands::build::run(config, input, output, settings).await?;
        }
    }

    Ok(())
}
