use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{Level, LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use sheet2issue::config::{self, SyncConfig};
use sheet2issue::issues::GitHubClient;
use sheet2issue::output;
use sheet2issue::sheets::{GoogleSheetsClient, parse_range_start, qualified_range};
use sheet2issue::sync::{ContentRenderer, RunReport, SyncRunner};

/// Escape a message for a workflow command (`::warning::...`)
fn escape_workflow_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn setup_logging(verbose: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }

    // Under GitHub Actions, surface warnings and errors as annotations
    if std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true") {
        builder.target(env_logger::Target::Stdout).format(|buf, record| {
            let message = record.args().to_string();
            match record.level() {
                Level::Error => writeln!(buf, "::error::{}", escape_workflow_data(&message)),
                Level::Warn => writeln!(buf, "::warning::{}", escape_workflow_data(&message)),
                Level::Debug | Level::Trace => writeln!(buf, "::debug::{}", escape_workflow_data(&message)),
                Level::Info => writeln!(buf, "{}", message),
            }
        });
    }

    builder.try_init().context("Failed to initialize logger")?;
    Ok(())
}

fn print_report(report: &RunReport) {
    let header = if report.is_aborted() {
        "Sync aborted:".red().bold()
    } else {
        "Sync complete:".green().bold()
    };
    println!("{}", header);
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }
    println!("{}", report.summary_markdown());
}

fn handle_check_command(config: &SyncConfig) -> Result<()> {
    info!("Checking configuration");

    let origin = parse_range_start(&config.read_range)?;
    ContentRenderer::new(&config.title_template, &config.body_template).context("Invalid template")?;

    let limit = if config.max_issues_per_run == 0 {
        "unlimited".to_string()
    } else {
        config.max_issues_per_run.to_string()
    };

    println!("{}", "Configuration OK".green().bold());
    println!("  Spreadsheet:   {}", config.spreadsheet_id);
    println!("  Read range:    {}", qualified_range(&config.sheet_name, &config.read_range));
    println!(
        "  Range origin:  column {} / row {}",
        origin.start_col_index, origin.start_row_number
    );
    println!("  Data from row: {}", config.data_start_row);
    println!("  Sync column:   {} (write-back '{}')", config.sync_column, config.write_back_value);
    println!("  Truthy values: {:?}", config.truthy_values);
    println!("  Repository:    {}", config.repository);
    println!("  Labels:        {:?}", config.labels);
    println!("  Max issues:    {}", limit);
    println!("  Delay:         {}ms", config.rate_limit_delay.as_millis());
    if config.dry_run {
        println!("  {}", "Dry run enabled".yellow());
    }
    Ok(())
}

async fn handle_run_command(cli: &Cli, config: SyncConfig) -> Result<()> {
    info!("sheet2issue: start");
    if config.dry_run {
        println!("{}", "Dry run: no issues will be created".yellow());
    }

    let sheets = Arc::new(GoogleSheetsClient::with_base_url(
        &config.access_token,
        &config.sheets_api_url,
        config.http_timeout,
    )?);
    let tracker = Arc::new(GitHubClient::with_api_url(
        &config.github_token,
        &config.github_api_url,
        config.http_timeout,
    )?);

    let output_path = cli.github_output.clone().or_else(|| {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });

    let runner = SyncRunner::new(config, sheets, tracker).context("Failed to prepare templates")?;
    let result = runner.fetch_and_run().await;

    let report = match &result {
        Ok(report) => Some(report),
        Err(e) => e.partial_report(),
    };
    if let Some(report) = report {
        print_report(report);
        if let Some(path) = &output_path {
            output::write_outputs(path, report)
                .with_context(|| format!("Failed to write step outputs to {}", path.display()))?;
        }
    }

    result.context("Sync run failed")?;
    info!("sheet2issue: done");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config =
        config::load_config(cli.config.as_ref(), cli.overrides()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    match cli.command.clone().unwrap_or(Commands::Run) {
        Commands::Check => handle_check_command(&config),
        Commands::Run => handle_run_command(&cli, config).await,
    }
}
