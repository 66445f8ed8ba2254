use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use color_layers::{CancelFlag, OrderingPolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorsep::models::AppConfig;
use colorsep::rendering::read_png;
use colorsep::services::SeparationPipeline;

const DEFAULT_CONFIG: &str = "colorsep.yaml";

#[derive(Parser)]
#[command(name = "colorsep")]
#[command(about = "Reduce an image to a few colors and export one layer per color")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantize a PNG and export its color layers
    Separate {
        /// Input PNG file
        input: PathBuf,

        /// Output directory for the layer files
        #[arg(short, long)]
        output: PathBuf,

        /// Number of palette colors
        #[arg(short, long)]
        colors: Option<usize>,

        /// Maximum k-means iterations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Layer order: largest-first, smallest-first or random
        #[arg(long)]
        order: Option<OrderingPolicy>,

        /// Seed for centroid picks and random ordering
        #[arg(long)]
        seed: Option<u64>,

        /// Resize before quantizing, e.g. 700x700
        #[arg(long, value_parser = parse_dimensions)]
        resize: Option<(usize, usize)>,

        /// Re-compress output PNGs with oxipng
        #[arg(long)]
        optimize: bool,

        /// Config file (defaults to $COLORSEP_CONFIG or ./colorsep.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with default settings
    Init {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
    /// Print the effective configuration
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorsep=info,color_layers=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Separate {
            input,
            output,
            colors,
            iterations,
            order,
            seed,
            resize,
            optimize,
            config,
        }) => {
            let mut app_config = AppConfig::load(&config_path(config));
            if let Some(colors) = colors {
                app_config.quantization.colors = colors;
            }
            if let Some(iterations) = iterations {
                app_config.quantization.iterations = iterations;
            }
            if let Some(order) = order {
                app_config.export_order = order;
            }
            if seed.is_some() {
                app_config.quantization.seed = seed;
            }
            if let Some((width, height)) = resize {
                app_config.resize.enabled = true;
                app_config.resize.width = width;
                app_config.resize.height = height;
            }
            if optimize {
                app_config.export.optimize_png = true;
            }
            let order_seed = app_config.quantization.seed;
            run_separate_command(app_config, &input, &output, order_seed).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { config, force } => run_config_init(&config_path(config), force),
            ConfigAction::Show { config } => run_config_show(&config_path(config)),
        },
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Separate one image, keeping quantization off the async runtime
async fn run_separate_command(
    config: AppConfig,
    input: &Path,
    output: &Path,
    order_seed: Option<u64>,
) -> anyhow::Result<()> {
    let cancel = CancelFlag::new();
    let pipeline = Arc::new(
        SeparationPipeline::new(config)
            .context("Invalid settings")?
            .with_cancel_flag(cancel.clone()),
    );

    let buffer =
        read_png(input).with_context(|| format!("Failed to read {}", input.display()))?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling separation");
            cancel.cancel();
        }
    });

    let separation = pipeline
        .run_blocking_task(buffer, order_seed)
        .await
        .context("Separation failed")?;

    let summary = pipeline
        .export(&separation, output)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    let report = separation.report();
    println!(
        "Separated {} into {} layers ({} iterations{})",
        input.display(),
        separation.layers().len(),
        report.iterations,
        if report.converged { ", converged" } else { "" }
    );
    for (i, layer) in separation.layers().iter().enumerate() {
        println!(
            "  Layer {}: {} ({} pixels)",
            i + 1,
            layer.color().to_hex(),
            layer.coverage()
        );
    }
    println!("Wrote {}", summary.quantized.display());
    Ok(())
}

fn run_config_init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_config_show(path: &Path) -> anyhow::Result<()> {
    let config = if path.exists() {
        AppConfig::try_load(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        println!("# {} not found, showing defaults", path.display());
        AppConfig::default()
    };
    if let Err(e) = config.validate() {
        println!("# warning: {e}");
    }
    print!("{}", config.to_yaml()?);
    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_env = std::env::var("COLORSEP_CONFIG").ok();
    let path = config_path(None);

    println!("Colorsep v{VERSION}");
    println!("Color separation by k-means palette reduction\n");

    println!("Environment Variables:");
    println!(
        "  COLORSEP_CONFIG = {}",
        config_env.as_deref().unwrap_or("(not set)")
    );

    let source = if path.exists() {
        path.display().to_string()
    } else {
        "defaults (file not found)".to_string()
    };
    let config = AppConfig::load(&path);
    println!("\nConfiguration: {source}");
    println!("  Colors:     {}", config.quantization.colors);
    println!("  Iterations: {}", config.quantization.iterations);
    println!("  Order:      {}", config.export_order);
    if config.resize.enabled {
        println!(
            "  Resize:     {}x{}",
            config.resize.width, config.resize.height
        );
    } else {
        println!("  Resize:     off");
    }

    println!("\nCommands:");
    println!("  colorsep separate      Quantize a PNG and export its layers");
    println!("  colorsep config init   Write a default config file");
    println!("  colorsep config show   Print the effective configuration");
    println!("\nRun 'colorsep --help' for more details.");
}

fn config_path(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var("COLORSEP_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

/// Parse `WIDTHxHEIGHT`
fn parse_dimensions(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: usize = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height: usize = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be positive, got '{s}'"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("700x700"), Ok((700, 700)));
        assert_eq!(parse_dimensions("320X200"), Ok((320, 200)));
        assert!(parse_dimensions("700").is_err());
        assert!(parse_dimensions("0x10").is_err());
        assert!(parse_dimensions("ax10").is_err());
    }

    #[test]
    fn test_cli_parses_separate() {
        let cli = Cli::try_parse_from([
            "colorsep",
            "separate",
            "in.png",
            "-o",
            "out",
            "--colors",
            "5",
            "--order",
            "smallToLarge",
            "--resize",
            "64x32",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Separate {
                colors,
                order,
                resize,
                ..
            }) => {
                assert_eq!(colors, Some(5));
                assert_eq!(order, Some(OrderingPolicy::SmallestFirst));
                assert_eq!(resize, Some((64, 32)));
            }
            _ => panic!("Expected Separate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_order() {
        let result = Cli::try_parse_from([
            "colorsep", "separate", "in.png", "-o", "out", "--order", "sideways",
        ]);
        assert!(result.is_err());
    }
}
