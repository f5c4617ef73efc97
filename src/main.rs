use clap::Parser;
use futures::future::join_all;
use retention_radar::analyzer::{Analyzer, AnalyzerImpl};
use retention_radar::config::{load_config, AppConfig};
use retention_radar::loader::DatasetLoader;
use retention_radar::model::{ConfigError, LoadError};
use retention_radar::normalizer::region_label;
use retention_radar::report::SegmentReport;
use retention_radar::source::{self, DatasetSource};
use retention_radar::winback::write_win_back_file;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.json";

/// Scores customer retention from an order table and prints a win-back report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order table path or http(s) URL (overrides the config).
    #[arg(long)]
    dataset: Option<String>,

    /// Region to report on; repeat for several segments. "All" means no filter.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Days of inactivity after which a customer counts as churned.
    #[arg(long)]
    threshold: Option<i64>,

    /// Orders needed to count a customer as loyal.
    #[arg(long)]
    min_orders: Option<usize>,

    /// Number of win-back rows shown and exported.
    #[arg(long)]
    top_n: Option<usize>,

    /// Where to write the win-back CSV.
    #[arg(long, conflicts_with = "no_export")]
    export: Option<String>,

    /// Skip the CSV export.
    #[arg(long)]
    no_export: bool,

    /// Print reports as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum SegmentError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Analyze(#[from] retention_radar::AnalyzeError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retention_radar=info")),
        )
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        dataset = %config.dataset,
        churn_threshold_days = config.churn_threshold_days,
        segments = config.regions.len(),
        "Configuration loaded"
    );

    let loader = DatasetLoader::new();
    let source = source::from_location(&config.dataset);

    match loader.load(source.as_ref()).await {
        Ok(dataset) => info!("Region options: {}", dataset.region_options().join(", ")),
        Err(e) => {
            error!("Dataset load error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let analyzer = AnalyzerImpl::new();
    let tasks: Vec<_> = config
        .regions
        .iter()
        .map(|region| process_segment(region, &config, &loader, source.as_ref(), &analyzer))
        .collect();
    let results = join_all(tasks).await;

    let multi = config.regions.len() > 1;
    let mut failed = false;
    let mut reports = Vec::new();

    for (region, result) in config.regions.iter().zip(results) {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!(region = %region, "Segment failed: {}", e);
                failed = true;
                continue;
            }
        };

        if let Some(base) = &config.export_path {
            let path = export_path_for(Path::new(base), &report.region, multi);
            match write_win_back_file(&path, &report.win_back_refs()) {
                Ok(()) => info!(
                    region = %report.region,
                    rows = report.win_back.len(),
                    "Exported win-back list to {}",
                    path.display()
                ),
                Err(e) => {
                    warn!(region = %report.region, "Export failed: {}", e);
                    failed = true;
                }
            }
        }

        reports.push(report);
    }

    if cli.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize reports: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for report in &reports {
            println!("{}", report.render());
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Loads the dataset (memoized), analyzes one region selection and builds its report.
async fn process_segment(
    region: &str,
    config: &AppConfig,
    loader: &DatasetLoader,
    source: &dyn DatasetSource,
    analyzer: &AnalyzerImpl,
) -> Result<SegmentReport, SegmentError> {
    let label = region_label(Some(region));
    info!(region = %label, "Processing segment");

    let dataset = loader.load(source).await?;
    let summaries = analyzer.analyze(&dataset.records, config.churn_threshold_days, Some(region))?;

    let report = SegmentReport::build(
        label,
        config.churn_threshold_days,
        &summaries,
        config.min_orders_for_loyal,
        config.top_n,
    );
    info!(
        region = %label,
        customers = report.kpis.total_customers,
        at_risk = report.kpis.at_risk_count,
        churn_rate = format!("{:.1}%", report.kpis.churn_rate * 100.0),
        "Segment analyzed"
    );
    Ok(report)
}

/// Reads the config file and applies command-line overrides.
/// A missing file at the default location falls back to built-in defaults.
fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => load_config(Path::new(DEFAULT_CONFIG))?,
        None => {
            info!("No {} found, using defaults", DEFAULT_CONFIG);
            AppConfig::default()
        }
    };

    if let Some(dataset) = &cli.dataset {
        config.dataset = dataset.clone();
    }
    if !cli.regions.is_empty() {
        config.regions = cli.regions.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.churn_threshold_days = threshold;
    }
    if let Some(min_orders) = cli.min_orders {
        config.min_orders_for_loyal = min_orders;
    }
    if let Some(top_n) = cli.top_n {
        config.top_n = top_n;
    }
    if let Some(export) = &cli.export {
        config.export_path = Some(export.clone());
    }
    if cli.no_export {
        config.export_path = None;
    }

    config.validate()?;
    Ok(config)
}

/// With several segments each export gets the region appended to the file stem.
fn export_path_for(base: &Path, region: &str, multi: bool) -> PathBuf {
    if !multi {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("win_back_list");
    let region = region.to_lowercase().replace(' ', "_");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, region, ext),
        None => format!("{}_{}", stem, region),
    };
    base.with_file_name(name)
}
