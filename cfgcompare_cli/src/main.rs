use anyhow::{bail, Context};
use cfgcompare_common::{load_config, save_config, ComparisonResult, ConfigFormat};
use cfgcompare_core::{detect_format, generate_summary, ConfigDiffEngine};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfgcompare")]
#[command(author = "cfgcompare Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Compare configuration files across JSON, YAML, TOML, INI, XML and properties", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two configuration files key by key
    Compare {
        /// Source (left) file
        source: PathBuf,

        /// Target (right) file
        target: PathBuf,

        /// Separator between nested keys in flattened paths
        #[arg(short, long)]
        separator: Option<String>,

        /// Regex for keys to leave out of the comparison (can be specified multiple times)
        #[arg(short, long)]
        ignore_key: Vec<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Print only the summary counts
        #[arg(long)]
        summary_only: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },

    /// Report the detected format of one or more files
    Detect {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the flattened key/value view of a file
    Flatten {
        /// File to flatten
        file: PathBuf,

        /// Separator between nested keys in flattened paths
        #[arg(short, long)]
        separator: Option<String>,

        /// Output as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Show the configuration file location
    Config {
        /// Write a default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    // Initialize tracing to stderr (so JSON output can go cleanly to stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Compare {
            source,
            target,
            separator,
            ignore_key,
            json,
            summary_only,
            no_color,
        } => run_compare(
            &source,
            &target,
            separator,
            ignore_key,
            json,
            summary_only,
            no_color,
        ),
        Commands::Detect { files } => run_detect(&files),
        Commands::Flatten {
            file,
            separator,
            json,
        } => run_flatten(&file, separator, json),
        Commands::Config { init } => run_config(init),
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn build_engine(
    separator: Option<String>,
    ignore_keys: Vec<String>,
) -> anyhow::Result<ConfigDiffEngine> {
    let loaded = load_config(false)?;
    let mut config = loaded.config;

    if let Some(separator) = separator {
        config.separator = separator;
    }
    if !ignore_keys.is_empty() {
        config.ignore_keys.extend(ignore_keys);
    }

    Ok(ConfigDiffEngine::from_config(&config)?)
}

fn run_compare(
    source: &Path,
    target: &Path,
    separator: Option<String>,
    ignore_keys: Vec<String>,
    json: bool,
    summary_only: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    // Validate paths
    if !source.is_file() {
        bail!("Source file does not exist: {}", source.display());
    }
    if !target.is_file() {
        bail!("Target file does not exist: {}", target.display());
    }

    let engine = build_engine(separator, ignore_keys)?;
    let result = engine.compare_files(source, target)?;

    info!(
        "Compared {} ({}) with {} ({})",
        result.source_file, result.source_format, result.target_file, result.target_format
    );

    if json {
        let report = build_json_report(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let use_color = !no_color && std::io::stdout().is_terminal();
    println!("{}", render_report(&result, use_color, summary_only));
    Ok(())
}

fn run_detect(files: &[PathBuf]) -> anyhow::Result<()> {
    for file in files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        println!("{}: {}", file.display(), describe_format(&content, file));
    }
    Ok(())
}

fn describe_format(content: &str, path: &Path) -> String {
    if let Some(format) = detect_format(content) {
        return format.name().to_string();
    }
    match ConfigFormat::from_path(path) {
        Some(format) => format!("{} (by extension)", format.name()),
        None => String::from("unknown"),
    }
}

fn run_flatten(file: &Path, separator: Option<String>, json: bool) -> anyhow::Result<()> {
    let engine = build_engine(separator, Vec::new())?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let (format, flat) = engine.flatten_contents(&content, &file.display().to_string())?;

    info!("{} parsed as {} ({} keys)", file.display(), format, flat.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&flat)?);
    } else {
        for (key, value) in &flat {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

fn run_config(init: bool) -> anyhow::Result<()> {
    let loaded = load_config(false)?;
    println!("{}", loaded.path.display());

    if init && !loaded.exists {
        save_config(&loaded.path, &loaded.config)?;
        info!("Wrote default configuration to {}", loaded.path.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a ComparisonResult,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    only_in_source: usize,
    only_in_target: usize,
    different: usize,
    matching: usize,
    identical: bool,
}

fn build_json_report(result: &ComparisonResult) -> JsonReport<'_> {
    JsonReport {
        result,
        summary: JsonSummary {
            only_in_source: result.keys.only_in_source.len(),
            only_in_target: result.keys.only_in_target.len(),
            different: result.keys.value_differences.len(),
            matching: result.keys.matching_count(),
            identical: result.keys.is_identical(),
        },
    }
}

fn render_report(result: &ComparisonResult, use_color: bool, summary_only: bool) -> String {
    let mut out = generate_summary(result);
    if summary_only {
        return out;
    }

    let paint = |code: &str, text: &str| {
        if use_color {
            format!("{}{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    };

    if !result.keys.only_in_source.is_empty() {
        out.push_str(&format!("\n\n{}", paint("\x1b[33m", "<< Only in source")));
        for key in &result.keys.only_in_source {
            out.push_str(&format!("\n  {}", key));
        }
    }

    if !result.keys.only_in_target.is_empty() {
        out.push_str(&format!("\n\n{}", paint("\x1b[34m", ">> Only in target")));
        for key in &result.keys.only_in_target {
            out.push_str(&format!("\n  {}", key));
        }
    }

    if !result.keys.value_differences.is_empty() {
        out.push_str(&format!("\n\n{}", paint("\x1b[31m", "!= Different values")));
        for diff in &result.keys.value_differences {
            out.push_str(&format!(
                "\n  {}: {} -> {}",
                diff.key, diff.source_value, diff.target_value
            ));
        }
    }

    if result.keys.is_identical() {
        out.push_str(&format!("\n\n{}", paint("\x1b[32m", "== Configurations match")));
    }

    out
}
