use clap::Parser;
use log::{error, info};
use radscan_core::cli::{Cli, OutputFormat};
use radscan_core::{AnalysisReport, AnalyzerConfig, ImageAnalyzer, RadscanError, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => output_report(&report, &cli.format),
        Err(e) => {
            error!("Analysis of {} failed: {}", cli.file.display(), e);
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn run(cli: &Cli) -> radscan_core::Result<AnalysisReport> {
    let config = cli.apply_to(AnalyzerConfig::from_env()?);
    let bytes = std::fs::read(&cli.file)?;
    let filename = cli.file.to_string_lossy();

    info!("Processing {} ({} bytes)", cli.file.display(), bytes.len());
    let analyzer = ImageAnalyzer::from_config(&config)?;
    analyzer.analyze_bytes(&bytes, &filename)
}

/// 1 for problems with the submitted image, 2 for service-side failures
fn exit_code(e: &RadscanError) -> i32 {
    if e.is_client_error() {
        1
    } else {
        2
    }
}

fn output_report(report: &AnalysisReport, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", TextReport::new(report)),
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(2);
            }
        },
    }
}
