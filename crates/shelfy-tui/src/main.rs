//! `shelfy-tui`: terminal UI for a shelfy book collection.
//!
//! Built on [ratatui](https://ratatui.rs). Signs in on a login screen,
//! then lists, views, edits, and deletes books, categories, and reviews
//! on tabs 1-3. Talks to the server through `shelfy-core` controllers and
//! reads the same profiles and stored tokens as the `shelfy` CLI.
//!
//! Logs go to a file (default under the platform data directory) so they
//! never corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod session_bridge;
mod store;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use shelfy_config::Profile;
use shelfy_core::Context;

use crate::app::App;

/// Terminal UI for browsing and editing a shelfy book collection.
#[derive(Parser, Debug)]
#[command(name = "shelfy-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "SHELFY_PROFILE")]
    profile: Option<String>,

    /// Server URL, overriding the profile's
    #[arg(short, long, env = "SHELFY_SERVER")]
    server: Option<String>,

    /// Log file path (defaults to shelfy-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn default_log_file() -> PathBuf {
    let dir = ProjectDirs::from("com", "shelfy", "shelfy")
        .map_or_else(std::env::temp_dir, |dirs| dirs.data_local_dir().to_path_buf());
    dir.join("shelfy-tui.log")
}

/// File-based tracing; stdout belongs to the TUI. Hold the guard for the
/// lifetime of the app so logs flush.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "shelfy_tui={level},shelfy_core={level},shelfy_api={level}",
            level = cli.log_level
        ))
    });

    let log_file = cli.log_file.clone().unwrap_or_else(default_log_file);
    let log_dir = log_file.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)?;
    let log_name = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("shelfy-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

/// Resolve the profile and build a context whose session starts logged in
/// when a stored token is found.
fn build_context(cli: &Cli) -> Result<(Context, String, Option<String>)> {
    let cfg = shelfy_config::load_config_or_default();
    let profile_name = cfg.profile_name(cli.profile.as_deref());

    let profile = match (cfg.profiles.get(&profile_name), &cli.server) {
        (Some(profile), server) => {
            let mut profile = profile.clone();
            if let Some(server) = server {
                profile.server.clone_from(server);
            }
            profile
        }
        (None, Some(server)) => Profile::new(server.clone()),
        (None, None) if cli.profile.is_some() => {
            return Err(eyre!("profile '{profile_name}' not found"));
        }
        (None, None) => {
            return Err(eyre!(
                "No server configured. Run `shelfy config init` or pass --server"
            ));
        }
    };

    let client_config = shelfy_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let session = shelfy_config::session_for(&profile, &profile_name);
    info!(
        profile = %profile_name,
        server = %client_config.base_url,
        authenticated = session.is_authenticated(),
        "resolved context"
    );
    let ctx = Context::new(&client_config, session)?;
    Ok((ctx, profile_name, profile.email))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting shelfy-tui");

    let (ctx, profile, email) = build_context(&cli)?;
    let mut app = App::new(ctx, profile, email);
    app.run().await?;

    Ok(())
}
