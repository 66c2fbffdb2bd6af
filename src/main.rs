//! syncscroll - Entry Point

use clap::Parser;
use std::path::{Path, PathBuf};
use syncscroll::config::KeyBindings;
use syncscroll::host::BufferHost;
use syncscroll::model::AlignmentMode;
use syncscroll::store::{workspace_state_path, JsonFileStore, MemoryStore, StateStore};
use syncscroll::sync::SyncCoordinator;
use syncscroll::view::{ColorConfig, PaneStyles};
use tracing::{info, warn};

/// syncscroll - view files side by side with synchronized scrolling
#[derive(Parser, Debug)]
#[command(name = "syncscroll")]
#[command(version)]
#[command(about = "Terminal viewer that keeps side-by-side files scrolled together")]
pub struct Args {
    /// Files to open, one pane each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Alignment mode to start in (normal, offset, off); ignores persisted state
    #[arg(short, long)]
    pub mode: Option<AlignmentMode>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debounce window for scroll bursts, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Keep sync state in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = syncscroll::config::load_config_with_precedence(args.config.clone())?;
        let merged = syncscroll::config::merge_config(config_file);
        let with_env = syncscroll::config::apply_env_overrides(merged);
        syncscroll::config::apply_cli_overrides(with_env, args.mode, args.debounce_ms)
    };

    syncscroll::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let key_bindings = match &config.keybindings {
        Some(overrides) => KeyBindings::with_overrides(overrides)?,
        None => KeyBindings::default(),
    };

    let mut host = BufferHost::new(1);
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        host.open(display_name(path), &text);
    }

    let store = open_store(args.no_persist, &config.state_dir);
    let coordinator = SyncCoordinator::new(store, config.sync_options());
    let styles = PaneStyles::new(ColorConfig::from_env_and_args(args.no_color));

    syncscroll::view::run(host, coordinator, key_bindings, styles)?;

    Ok(())
}

/// File name for the pane title, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Per-workspace JSON store, or an in-memory one when persistence is off or unavailable.
fn open_store(no_persist: bool, state_dir: &Path) -> Box<dyn StateStore> {
    if no_persist {
        return Box::new(MemoryStore::new());
    }

    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = workspace_state_path(state_dir, &workspace);
    match JsonFileStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "Sync state unavailable, keeping it in memory");
            Box::new(MemoryStore::new())
        }
    }
}
