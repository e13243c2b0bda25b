//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_signal_adapter::CsvSignalAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_company_adapter::JsonCompanyAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::domain::catalyst::MarketConditions;
use crate::domain::company::Company;
use crate::domain::config_validation::{validate_report_config, validate_scoring_config};
use crate::domain::error::ArbError;
use crate::domain::moat::MoatScorer;
use crate::domain::momentum::MomentumScorer;
use crate::domain::report::{WeeklyAlphaReport, build_weekly_report};
use crate::domain::scoring_config::ScoringConfig;
use crate::domain::synthetic::{generate_companies, roster_size};
use crate::ports::company_port::CompanyPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(
    name = "momentum-arb",
    about = "Tech momentum arbitrage scoring and signal ranking"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Markdown,
    Csv,
    All,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the weekly alpha report and export it
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Company JSON file; overrides [data] companies
        #[arg(long)]
        companies: Option<PathBuf>,
        /// Output path without extension; overrides [report] output
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "all")]
        format: ReportFormat,
        /// Scoring date (YYYY-MM-DD); overrides [report] as_of
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Print momentum and moat scores for every company
    Score {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        companies: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Write a synthetic company file
    Generate {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short = 'n', long, default_value_t = 20)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Serve the weekly report over HTTP
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        companies: Option<PathBuf>,
        /// Listen address; overrides [web] listen
        #[arg(long)]
        listen: Option<String>,
        /// Frontend directory; overrides [web] static_dir
        #[arg(long)]
        static_dir: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Report {
            config,
            companies,
            output,
            format,
            as_of,
        } => run_report(
            config.as_deref(),
            companies.as_deref(),
            output.as_deref(),
            format,
            as_of,
        ),
        Command::Score {
            config,
            companies,
            as_of,
        } => run_score(config.as_deref(), companies.as_deref(), as_of),
        Command::Generate {
            output,
            count,
            seed,
            as_of,
        } => run_generate(&output, count, seed, as_of),
        Command::Validate { config } => run_validate(&config),
        Command::Serve {
            config,
            companies,
            listen,
            static_dir,
            as_of,
        } => run_serve(
            config.as_deref(),
            companies.as_deref(),
            listen.as_deref(),
            static_dir,
            as_of,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(&e)
        }
    }
}

/// Load an INI file, or an empty config when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ArbError> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)
        }
        None => FileConfigAdapter::from_string(""),
    }
}

/// Flag, then `[report] as_of`, then today.
pub fn resolve_as_of(
    flag: Option<NaiveDate>,
    config: &dyn ConfigPort,
) -> Result<NaiveDate, ArbError> {
    if let Some(date) = flag {
        return Ok(date);
    }
    Ok(config
        .get_date("report", "as_of")?
        .unwrap_or_else(|| chrono::Local::now().date_naive()))
}

pub fn resolve_companies_path(
    flag: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, ArbError> {
    if let Some(p) = flag {
        return Ok(p.to_path_buf());
    }
    config
        .get_string("data", "companies")
        .map(PathBuf::from)
        .ok_or_else(|| ArbError::ConfigMissing {
            section: "data".into(),
            key: "companies".into(),
        })
}

pub fn resolve_output_base(
    flag: Option<&Path>,
    config: &dyn ConfigPort,
    as_of: NaiveDate,
) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| {
            PathBuf::from(format!("weekly_alpha_report_{}", as_of.format("%Y%m%d")))
        })
}

pub fn exporters(format: ReportFormat) -> Vec<Box<dyn ReportPort>> {
    match format {
        ReportFormat::Json => vec![Box::new(JsonReportAdapter::new())],
        ReportFormat::Markdown => vec![Box::new(MarkdownReportAdapter::new())],
        ReportFormat::Csv => vec![Box::new(CsvSignalAdapter::new())],
        ReportFormat::All => vec![
            Box::new(JsonReportAdapter::new()),
            Box::new(MarkdownReportAdapter::new()),
            Box::new(CsvSignalAdapter::new()),
        ],
    }
}

/// Validate the config, load companies and run every scoring stage.
pub fn build_report(
    config: &dyn ConfigPort,
    companies: &dyn CompanyPort,
    as_of: NaiveDate,
) -> Result<(Vec<Company>, WeeklyAlphaReport), ArbError> {
    // Stage 1: validate config
    validate_scoring_config(config)?;
    validate_report_config(config)?;
    let scoring = ScoringConfig::from_config(config);
    let market = MarketConditions::from_config(config)?;

    // Stage 2: load companies
    let companies = companies.load_companies()?;
    if companies.is_empty() {
        tracing::warn!("company file is empty");
    }

    // Stage 3: score, rank and assemble
    let report = build_weekly_report(&companies, &market, &scoring, as_of)?;
    tracing::info!(
        signals = report.signals_generated,
        high_conviction = report.high_conviction_count,
        "report built"
    );
    Ok((companies, report))
}

/// Write `report` once per exporter as `<base>.<ext>`.
pub fn export_report(
    report: &WeeklyAlphaReport,
    base: &Path,
    format: ReportFormat,
) -> Result<Vec<PathBuf>, ArbError> {
    let mut written = Vec::new();
    for exporter in exporters(format) {
        let path = base.with_extension(exporter.extension());
        exporter.write(report, &path.to_string_lossy())?;
        written.push(path);
    }
    Ok(written)
}

fn run_report(
    config_path: Option<&Path>,
    companies_flag: Option<&Path>,
    output_flag: Option<&Path>,
    format: ReportFormat,
    as_of_flag: Option<NaiveDate>,
) -> Result<(), ArbError> {
    let config = load_config(config_path)?;
    let as_of = resolve_as_of(as_of_flag, &config)?;
    let port = JsonCompanyAdapter::new(resolve_companies_path(companies_flag, &config)?);

    let (_, report) = build_report(&config, &port, as_of)?;

    // Stage 4: export
    let base = resolve_output_base(output_flag, &config, as_of);
    let written = export_report(&report, &base, format)?;

    println!(
        "Generated {} signals ({} high conviction), {} bottlenecks, {} second-order plays",
        report.signals_generated,
        report.high_conviction_count,
        report.emerging_bottlenecks.len(),
        report.second_order_plays.len()
    );
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn run_score(
    config_path: Option<&Path>,
    companies_flag: Option<&Path>,
    as_of_flag: Option<NaiveDate>,
) -> Result<(), ArbError> {
    let config = load_config(config_path)?;
    validate_scoring_config(&config)?;
    let scoring = ScoringConfig::from_config(&config);
    let as_of = resolve_as_of(as_of_flag, &config)?;
    let companies =
        JsonCompanyAdapter::new(resolve_companies_path(companies_flag, &config)?).load_companies()?;

    let momentum = MomentumScorer::new(&scoring, as_of).score_companies(&companies);
    let moats = MoatScorer::new(&scoring, as_of).score_companies(&companies);

    println!(
        "{:<28} {:<15} {:>8} {:>6} {:>6} {:>6}  {}",
        "Company", "Sector", "Momentum", "Hype", "Build", "Moat", "Flag"
    );
    for m in &momentum {
        let moat = moats
            .iter()
            .find(|s| s.company_id == m.company_id)
            .map(|s| s.total_moat_score)
            .unwrap_or(0.0);
        println!(
            "{:<28} {:<15} {:>8.1} {:>6.1} {:>6.1} {:>6.1}  {}",
            m.company_name,
            m.sector.as_str(),
            m.momentum_score,
            m.hype_score,
            m.build_score,
            moat,
            m.divergence_flag
        );
    }
    Ok(())
}

fn run_generate(
    output: &Path,
    count: usize,
    seed: u64,
    as_of_flag: Option<NaiveDate>,
) -> Result<(), ArbError> {
    let as_of = as_of_flag.unwrap_or_else(|| chrono::Local::now().date_naive());
    if count > roster_size() {
        tracing::warn!(count, roster = roster_size(), "count capped at roster size");
    }
    let companies = generate_companies(seed, count, as_of);
    JsonCompanyAdapter::new(output).save_companies(&companies)?;
    println!("Wrote {} companies to {}", companies.len(), output.display());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), ArbError> {
    let config = load_config(Some(config_path))?;
    validate_scoring_config(&config)?;
    validate_report_config(&config)?;
    println!("Configuration is valid.");
    Ok(())
}

#[cfg(feature = "web")]
fn run_serve(
    config_path: Option<&Path>,
    companies_flag: Option<&Path>,
    listen_flag: Option<&str>,
    static_flag: Option<PathBuf>,
    as_of_flag: Option<NaiveDate>,
) -> Result<(), ArbError> {
    use crate::adapters::web::{self, AppState};
    use std::net::SocketAddr;

    let config = load_config(config_path)?;
    let as_of = resolve_as_of(as_of_flag, &config)?;
    let port = JsonCompanyAdapter::new(resolve_companies_path(companies_flag, &config)?);
    let (companies, report) = build_report(&config, &port, as_of)?;

    let listen = listen_flag
        .map(str::to_string)
        .or_else(|| config.get_string("web", "listen"))
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    let addr: SocketAddr = listen.parse().map_err(|_| ArbError::ConfigInvalid {
        section: "web".into(),
        key: "listen".into(),
        reason: format!("'{listen}' is not a socket address"),
    })?;
    let static_dir = static_flag.or_else(|| config.get_string("web", "static_dir").map(PathBuf::from));

    let state = AppState { report, companies };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(state, static_dir, addr))
}

#[cfg(not(feature = "web"))]
fn run_serve(
    _config_path: Option<&Path>,
    _companies_flag: Option<&Path>,
    _listen_flag: Option<&str>,
    _static_flag: Option<PathBuf>,
    _as_of_flag: Option<NaiveDate>,
) -> Result<(), ArbError> {
    Err(ArbError::ConfigInvalid {
        section: "web".into(),
        key: "listen".into(),
        reason: "built without the web feature".into(),
    })
}
