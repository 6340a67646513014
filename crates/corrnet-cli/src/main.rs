//! Corrnet CLI: build a clustered correlation network from a table.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use corrnet_core::config::{LabelFormat, NetworkConfig, NetworkResult};
use corrnet_core::output::{write_graph, write_output};
use corrnet_core::pipeline;

#[derive(Parser)]
#[command(
    name = "corrnet",
    about = "Corrnet - Turn pairwise correlations into a clustered network"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a network from a correlation table (FileA, FileB, pcorValues)
    Build {
        /// Path to the delimited correlation table
        input: PathBuf,

        /// Output JSON file path
        #[arg(short, long)]
        output: Option<String>,

        /// Rows link their entities only when the correlation exceeds this
        #[arg(short, long, default_value = "0.0", allow_negative_numbers = true)]
        threshold: f64,

        /// Column delimiter (tab by default)
        #[arg(long, default_value = "\t")]
        delimiter: char,

        /// Render group labels as plain text instead of HTML
        #[arg(long)]
        plain_labels: bool,

        /// Write only the {nodes, links} graph
        #[arg(long)]
        graph_only: bool,

        /// Show per-phase timing breakdown and info logs
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            threshold,
            delimiter,
            plain_labels,
            graph_only,
            verbose,
            quiet,
        } => {
            init_logging(verbose && !quiet);

            let stem = input
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "correlations".to_string());
            let output_path = output.unwrap_or_else(|| format!("{stem}.network.json"));

            let config = NetworkConfig {
                threshold,
                delimiter,
                label_format: if plain_labels {
                    LabelFormat::Plain
                } else {
                    LabelFormat::Html
                },
                input_path: Some(input.to_string_lossy().to_string()),
                output_path: Some(output_path.clone()),
                verbose,
                quiet,
                ..Default::default()
            };

            if quiet {
                run_quiet(&config, &output_path, graph_only);
            } else {
                run_with_progress(&config, &output_path, graph_only, verbose);
            }
        }
    }
}

fn write_result(result: &NetworkResult, output_path: &str, graph_only: bool) {
    let written = if graph_only {
        write_graph(result, output_path)
    } else {
        write_output(result, output_path)
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
}

fn run_quiet(config: &NetworkConfig, output_path: &str, graph_only: bool) {
    match pipeline::run_from_path(config, None) {
        Ok(result) => write_result(&result, output_path, graph_only),
        Err(e) => {
            eprintln!("Build failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &NetworkConfig, output_path: &str, graph_only: bool, verbose: bool) {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message("Reading table...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let result = match pipeline::run_from_path(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Build failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    // Summary
    println!(
        "\n{}  Correlation network: {}",
        style("✓").green().bold(),
        style(
            config
                .input_path
                .as_deref()
                .and_then(|p| Path::new(p).file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .bold()
    );
    println!("  {:<14} {}", "Threshold:", config.threshold);
    for (label, key) in [
        ("Rows:", "rows"),
        ("Nodes:", "nodes"),
        ("Links:", "links"),
        ("Groups:", "groups"),
        ("Isolated:", "isolated_nodes"),
    ] {
        println!(
            "  {:<14} {}",
            label,
            result.stats.get(key).unwrap_or(&serde_json::json!(0))
        );
    }

    if let Some(bad) = result.stats.get("unparsable_rows").and_then(|v| v.as_u64()) {
        if bad > 0 {
            println!(
                "  {:<14} {}",
                "Unparsable:",
                style(format!("{bad} row(s) skipped")).yellow()
            );
        }
    }

    let duration = start.elapsed();
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        duration.as_secs_f64() * 1000.0
    );

    if verbose {
        if let Some(serde_json::Value::Object(timings)) = result.metadata.get("phase_timings") {
            println!("\n  Phase Timings:");
            for (phase, secs) in timings {
                if let Some(val) = secs.as_f64() {
                    println!("    {:<14} {:.3}ms", phase, val * 1000.0);
                }
            }
        }
    }

    write_result(&result, output_path, graph_only);

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path
    );
}
