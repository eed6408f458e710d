use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skillgap_roi::acquisition::AcquisitionController;
use skillgap_roi::analysis::{run_analysis, AnalysisReport, AnalysisRun};
use skillgap_roi::config::{Config, ConfigOverrides};
use skillgap_roi::fixture::OpportunityFixture;
use skillgap_roi::output::csv::{coverage_to_csv, roi_to_csv};
use skillgap_roi::output::render_json;
use skillgap_roi::output::table::{
    render_analysis, render_coverage_table, render_investment_table, render_roi_table,
};
use skillgap_roi::roi::evaluate_investment;
use skillgap_roi::server::{bind_address, run_server};
use skillgap_roi::types::AnalysisRequest;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "skillgap-roi",
    about = "Upskilling priorities and skill coverage from job opportunity data"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    user_id: Option<String>,
    #[arg(short = 'n', long)]
    top_n: Option<usize>,
    #[arg(short, long)]
    endpoint: Option<String>,
    /// Skip the live source and analyze the bundled dataset.
    #[arg(long)]
    offline: bool,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prioritized upskilling report.
    Report,
    /// Skill-coverage matrix.
    Matrix,
    /// Report and matrix together, with data origin.
    Analyze,
    /// Return on an investment in learning one skill.
    Invest {
        #[arg(long)]
        skill: String,
        #[arg(long)]
        amount: f64,
    },
    /// Print the bundled fallback dataset.
    Fixture,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        endpoint: cli.endpoint.clone(),
        user_id: cli.user_id.clone(),
        top_n: cli.top_n,
        offline: cli.offline.then_some(true),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            return handle_config_command(*init, *show, &config, &config_path);
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = bind_address(&host, port)?;
            return run_server(config, addr).await;
        }
        Commands::Fixture => {
            let response = OpportunityFixture::bundled().load(config.analysis.top_n)?;
            println!("{}", render_json(&response)?);
            return Ok(());
        }
        _ => {}
    }

    let report = analyze(&config).await?;
    match &cli.command {
        Commands::Report => print_report(&report, cli.output)?,
        Commands::Matrix => print_matrix(&report, cli.output)?,
        Commands::Analyze => print_analysis(&report, cli.output)?,
        Commands::Invest { skill, amount } => {
            let roi = evaluate_investment(&report.roi, skill, *amount)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_investment_table(&roi)),
                OutputFormat::Json => println!("{}", render_json(&roi)?),
                OutputFormat::Csv => {
                    warn!("CSV output for invest not implemented, using JSON");
                    println!("{}", render_json(&roi)?);
                }
            }
        }
        Commands::Fixture | Commands::Serve { .. } | Commands::Config { .. } => {
            unreachable!("handled before analysis")
        }
    }

    Ok(())
}

async fn analyze(config: &Config) -> Result<AnalysisReport> {
    let request = AnalysisRequest::new(config.analysis.user_id.clone(), config.analysis.top_n);
    let mut controller =
        AcquisitionController::new(config.build_source()?, OpportunityFixture::bundled());
    match run_analysis(&mut controller, &request).await {
        AnalysisRun::Completed(report) => Ok(report),
        AnalysisRun::Exhausted { diagnostic } => {
            bail!("{diagnostic}\nRe-run the command to retry the live source.")
        }
    }
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &PathBuf,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_roi_table(&report.roi)),
        OutputFormat::Json => println!("{}", render_json(&report.roi)?),
        OutputFormat::Csv => print!("{}", roi_to_csv(&report.roi)?),
    }
    Ok(())
}

fn print_matrix(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_coverage_table(&report.coverage)),
        OutputFormat::Json => println!("{}", render_json(&report.coverage)?),
        OutputFormat::Csv => print!("{}", coverage_to_csv(&report.coverage)?),
    }
    Ok(())
}

fn print_analysis(report: &AnalysisReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_analysis(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            warn!("CSV output for analyze not implemented, printing the ROI report");
            print!("{}", roi_to_csv(&report.roi)?);
        }
    }
    Ok(())
}
