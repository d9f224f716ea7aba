use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use toolchain_metadata::settings::{LOG_LEVEL_ENV_VAR, OUTPUT_FILE};
use toolchain_metadata::{ComponentConfig, GithubClient, MetadataGenerator, Settings, colors, config};

#[derive(Parser)]
#[command(name = "generate-metadata")]
#[command(author, version, about = "Generate extension metadata from GitHub releases", long_about = None)]
struct Cli {
    /// Component config (defaults to extension_info.json next to the executable)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the metadata document
    #[arg(long, value_name = "PATH", default_value = OUTPUT_FILE)]
    output: PathBuf,

    /// Resolve everything but do not write the output file
    #[arg(long)]
    no_write: bool,

    /// Also print the document to stdout
    #[arg(long)]
    stdout: bool,

    /// Enable debug logging (overrides RUST_LOG and F5_SDK_LOG_LEVEL)
    #[arg(short, long)]
    verbose: bool,
}

/// Filter directive from, in order: --verbose, RUST_LOG, F5_SDK_LOG_LEVEL, "info"
fn log_directive(verbose: bool, rust_log: Option<&str>, sdk_level: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    [rust_log, sdk_level]
        .into_iter()
        .flatten()
        .find(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string()
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let sdk_level = std::env::var(LOG_LEVEL_ENV_VAR).ok();
    let directive = log_directive(verbose, rust_log.as_deref(), sdk_level.as_deref());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&directive)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    colors::init_colors();
    init_logging(cli.verbose);

    let settings = Settings::from_env()?;

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path().context("Failed to locate component config")?,
    };
    let components = ComponentConfig::load(&config_path)?;

    let client = GithubClient::new(&settings).context("Failed to create API client")?;
    let generator = MetadataGenerator::new(client, components).with_output_file(&cli.output);

    let document = generator
        .generate(!cli.no_write)
        .await
        .context("Metadata generation failed")?;

    if cli.stdout {
        println!("{}", document.to_pretty_json()?);
    }

    let versions: usize = document.components.values().map(|c| c.versions.len()).sum();
    if cli.no_write {
        eprintln!(
            "{} Resolved {} versions across {} components",
            "✓".green(),
            versions.to_string().cyan(),
            document.components.len().to_string().cyan()
        );
    } else {
        eprintln!(
            "{} Wrote {} versions across {} components to {}",
            "✓".green(),
            versions.to_string().cyan(),
            document.components.len().to_string().cyan(),
            generator.output_file().display().to_string().bold()
        );
    }

    Ok(())
}
