//! sitemap-sync: replays controller operations against a sitemap snapshot.
//!
//! Usage: `sitemap-sync <snapshot.json> [script.json]`

use std::path::Path;
use std::process::ExitCode;

use sitemap_sync::kernel::services::adapters::{ensure_settings_file, load_config, MemoryController};
use sitemap_sync::kernel::SitemapError;
use sitemap_sync::models::{LoadState, SitemapTreeRow};
use sitemap_sync::runtime::{run_script, ScriptOp, SitemapRuntime};

mod logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(snapshot_path) = args.get(1) else {
        eprintln!("usage: sitemap-sync <snapshot.json> [script.json]");
        return ExitCode::from(2);
    };

    if let Err(e) = ensure_settings_file() {
        eprintln!("warning: cannot create settings file: {e}");
    }
    let config = load_config();
    let logging = logging::init(&config.log_filter);

    match replay(Path::new(snapshot_path), args.get(2).map(Path::new), config) {
        Ok(rows) => {
            for row in rows {
                println!("{}", format_row(&row));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            eprintln!("error: {e}");
            if let Some(guard) = &logging {
                eprintln!("logs: {}", guard.log_dir().display());
            }
            ExitCode::FAILURE
        }
    }
}

fn replay(
    snapshot: &Path,
    script: Option<&Path>,
    config: sitemap_sync::kernel::services::ports::SitemapConfig,
) -> Result<Vec<SitemapTreeRow>, SitemapError> {
    let controller = MemoryController::from_json_str(&std::fs::read_to_string(snapshot)?)?;
    let mut runtime = SitemapRuntime::new(controller, config)?;

    let ops: Vec<ScriptOp> = match script {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    let total = ops.len();
    let failed = run_script(&mut runtime, ops);
    tracing::info!(total, failed, "script replayed");

    for notification in runtime.state().notifications() {
        eprintln!("{:?}: {}", notification.kind, notification.message);
    }
    Ok(runtime.state().tree.flatten_for_view())
}

fn format_row(row: &SitemapTreeRow) -> String {
    let marker = match (row.load_state, row.is_open) {
        (LoadState::Loading, _) => "~",
        (_, true) => "-",
        (LoadState::Unloaded, false) => "+",
        (LoadState::Loaded, false) => ">",
    };
    let highlight = if row.highlighted { " *" } else { "" };
    format!(
        "{}{} {} [{}] ({}){}",
        "  ".repeat(row.depth as usize),
        marker,
        row.name,
        row.entry_id,
        row.title,
        highlight
    )
}
