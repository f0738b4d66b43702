//! CLI entry point - the composition root.
//!
//! Logging, settings and the board runtime are wired together here; the
//! library modules never touch global state.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use waitboard_cli::{
    Cli, CliError, Commands, DemoArgs, DemoPlan, OutputFormat, drain_events, render,
    resolve_settings, run_demo,
};
use waitboard_engine::{BoardRunner, BoardSettings, ChannelBoardEmitter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = resolve_settings(&cli)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Demo(args) => demo(&settings, &args, cli.format).await,
        Commands::Settings => {
            let json = serde_json::to_string_pretty(&settings)
                .context("Failed to serialize settings")?;
            println!("{json}");
            Ok(())
        }
    }
}

async fn demo(
    settings: &BoardSettings,
    args: &DemoArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (emitter, events) = ChannelBoardEmitter::channel();
    let handle = BoardRunner::spawn(settings, Arc::new(emitter)).map_err(CliError::from)?;
    let renderer = tokio::spawn(drain_events(events, render::renderer_for(format)));

    let plan = DemoPlan::from_args(args);
    tracing::info!(streams = plan.streams.len(), "Starting demo");

    let reporter = handle.reporter();
    let outcome = run_demo(&plan, &reporter).await;
    reporter.finish();
    drop(reporter);

    let snapshot = handle.shutdown().await.map_err(CliError::from)?;
    renderer.await.context("Renderer task failed")?;

    if format != OutputFormat::Json {
        println!(
            "{} of {} streams complete, {} cancelled",
            snapshot.completed_count(),
            plan.streams.len(),
            outcome.cancelled
        );
    }
    Ok(())
}
