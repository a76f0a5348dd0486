use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dunning::{
    application::usecases::RunMode,
    bootstrap,
    config::{Config, DatabaseConfig},
    domain::catalog::TemplateCatalog,
    presentation::{
        Cli, Command, OutputFormat,
        cli::{OverdueArgs, RunArgs},
        report,
    },
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file());

    if let Some(Command::Periods) = cli.command {
        println!("{}", report::render_periods(&TemplateCatalog::new(), cli.format)?);
        return Ok(());
    }

    let Cli {
        run,
        format,
        command,
        ..
    } = cli;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match command {
            Some(Command::Overdue(args)) => overdue(args, format).await,
            _ => dispatch(run, format).await,
        }
    })
}

/// Console output goes to stderr so a JSON report on stdout stays parseable.
/// A copy without colours is appended to `log_file` when it can be opened.
fn init_tracing(log_file: Option<&Path>) {
    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Arc::new(file)),
            Err(err) => {
                eprintln!("cannot open log file {}: {err}", path.display());
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file)
        }))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn dispatch(args: RunArgs, format: OutputFormat) -> Result<()> {
    let mode = match RunMode::from_code(args.period.as_deref()) {
        Ok(mode) => mode,
        Err(err) => {
            let valid: Vec<String> = TemplateCatalog::new()
                .list_periods()
                .iter()
                .map(ToString::to_string)
                .collect();
            bail!("{err}; valid periods: {}", valid.join(", "));
        }
    };

    let mut config = Config::try_parse().context("invalid configuration")?;
    if let Some(cap) = args.max_messages {
        config.dispatch.max_messages = Some(cap.get());
    }

    let today = chrono::Local::now().date_naive();
    let summary = bootstrap::run_dispatch(&config, mode, args.dry_run, today).await?;
    println!("{}", report::render_summary(&summary, format)?);
    Ok(())
}

async fn overdue(args: OverdueArgs, format: OutputFormat) -> Result<()> {
    let database = DatabaseConfig::try_parse().context("invalid configuration")?;
    let today = chrono::Local::now().date_naive();
    let rows = bootstrap::list_overdue(&database, args.min_days, today).await?;
    println!("{}", report::render_overdue(&rows, args.min_days, today, format)?);
    Ok(())
}
