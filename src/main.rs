//! contribgrid - render a repository's contributors as a grid of linked avatars.

mod adapters;
mod avatar;
mod cassette;
mod cli;
mod compositor;
mod config;
mod context;
mod error;
mod fetcher;
mod layout;
mod model;
mod output;
mod params;
mod pipeline;
mod ports;
mod raster;
mod server;
mod svg;

use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::Level;

use crate::cli::{Cli, Command, RenderArgs, ServeArgs};
use crate::config::Config;
use crate::context::{RecordingSession, ServiceContext};
use crate::error::GridError;
use crate::output::{resolve_output, write_output, OutputTarget};
use crate::server::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GridError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GridError::Config)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    match cli.command {
        Command::Render(args) => render(args, &config).await,
        Command::Serve(args) => serve(args, config).await,
    }
}

async fn render(args: RenderArgs, config: &Config) -> Result<(), GridError> {
    // Validate before any adapter (or cassette) is touched
    let request = args.grid_options().into_request(&config.defaults)?;

    let (ctx, recording_session) = build_context(config)?;
    let image = pipeline::render(&ctx, &request).await?;

    let target =
        resolve_output(args.output.as_deref(), &request.repo, request.layout.output_format);
    write_output(&image.bytes, &target)?;
    if let OutputTarget::File(path) = &target {
        eprintln!("Saved: {}", path.display());
    }

    // Finish recording if active
    drop(ctx);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => tracing::warn!(error = %e, "failed to save cassette"),
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs, config: Config) -> Result<(), GridError> {
    let (ctx, recording_session) = build_context(&config)?;
    if recording_session.is_some() {
        return Err(GridError::Config("recording is only supported by `render`".to_string()));
    }

    let addr = args.addr.unwrap_or_else(|| config.server.addr.clone());
    let state = AppState {
        ctx: Arc::new(ctx),
        defaults: Arc::new(config.defaults),
        cache_max_age: config.server.cache_max_age,
    };
    server::serve(&addr, state).await
}

/// Create the service context based on mode (live / recording / replaying).
fn build_context(config: &Config) -> Result<(ServiceContext, Option<RecordingSession>), GridError> {
    let replay_path = std::env::var("CONTRIBGRID_REPLAY").ok();
    let is_recording = std::env::var("CONTRIBGRID_REC").is_ok_and(|v| v == "true" || v == "1");

    if let Some(ref cassette_path) = replay_path {
        tracing::debug!(cassette = %cassette_path, "replaying");
        Ok((ServiceContext::replaying(Path::new(cassette_path), &config.github)?, None))
    } else if is_recording {
        tracing::debug!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config.github, config.github_token());
        Ok((ctx, Some(session)))
    } else {
        Ok((ServiceContext::live(&config.github, config.github_token()), None))
    }
}
