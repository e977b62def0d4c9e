// Supercoach draft assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Locate the working directory and load config
// 3. Load the player pool
// 4. Open the snapshot store and resume or start the draft
// 5. Create mpsc channels
// 6. Spawn the injury fetch
// 7. Spawn app logic task
// 8. Run the TUI until the user quits
// 9. Cleanup on exit

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use tokio::sync::mpsc;
use tracing::{error, info};

use supercoach_core::config;
use supercoach_core::draft::session::DraftSession;
use supercoach_core::injury::{fetch_or_default, InjuryClient};
use supercoach_core::players;
use supercoach_core::store;
use supercoach_core::valuation::rating::WeightedRating;
use supercoach_tui::app;
use supercoach_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Tracing
    init_tracing()?;
    info!("Supercoach draft assistant starting up");

    // 2. Config
    let base_dir = resolve_base_dir()?;
    config::ensure_config_files(&base_dir).context("failed to prepare config directory")?;
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;

    // 3. Players
    let players_path = base_dir.join(&config.data_paths.players);
    let pool = players::load_players(&players_path)
        .with_context(|| format!("failed to load players from {}", players_path.display()))?;
    info!("Loaded {} players", pool.len());

    // 4. Store and session
    let store = store::open_store(&config.storage, &base_dir).context("failed to open draft store")?;
    let mut session = DraftSession::restore(config.draft_config(), pool, store)
        .context("failed to start draft session")?
        .with_rating(WeightedRating::new(config.strategy.rating.clone()))
        .with_baseline(config.strategy.baseline);
    for (team_id, name) in config.league.team_names() {
        // Names saved with the draft take precedence over config.
        if !session.state().team_names.contains_key(&team_id) {
            session
                .set_team_name(team_id, &name)
                .context("invalid team name in config")?;
        }
    }

    // 5. Channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (feed_tx, feed_rx) = mpsc::channel(1);

    // 6. Injury feed: the draft is usable before it returns.
    let injury_client = InjuryClient::from_config(&config.strategy.injury);
    let feed_handle = match injury_client {
        InjuryClient::Disabled => {
            info!("Injury feed disabled");
            drop(feed_tx);
            None
        }
        client @ InjuryClient::Active(_) => Some(tokio::spawn(async move {
            let report = fetch_or_default(&client).await;
            let _ = feed_tx.send(report).await;
        })),
    };

    // 7. App loop
    let app_state = app::AppState::new(session, config.league.name.clone());
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, feed_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 8. TUI: blocks until the user quits.
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 9. Cleanup: the app loop saves its final snapshot on the way out.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;
    if let Some(handle) = feed_handle {
        handle.abort();
    }

    info!("Supercoach draft assistant shut down cleanly");
    Ok(())
}

/// Use the current directory when it holds `config/` or `defaults/`,
/// otherwise the per-user config directory.
fn resolve_base_dir() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    if has_config(&cwd) {
        return Ok(cwd);
    }
    let dirs = ProjectDirs::from("", "", "supercoach")
        .context("could not determine a home directory")?;
    let dir = dirs.config_dir().to_path_buf();
    info!("No config in {}; using {}", cwd.display(), dir.display());
    Ok(dir)
}

fn has_config(dir: &Path) -> bool {
    dir.join("config").is_dir() || dir.join("defaults").is_dir()
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("supercoach.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("supercoach=info,supercoach_core=info,supercoach_tui=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
