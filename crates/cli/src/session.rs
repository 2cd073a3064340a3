//! Loading and saving the registry around a command.
//!
//! The menu always starts from the initial-state snapshot. One-shot commands continue from the
//! final-state snapshot when an earlier command has written one, so consecutive commands build
//! on each other.

use anyhow::Context;
use bedtrack_core::{load_snapshot, save_registry, CoreConfig, Registry, WardResult};
use std::path::Path;

pub fn load_initial(cfg: &CoreConfig) -> anyhow::Result<Registry> {
    load_from(cfg, &cfg.initial_state_path())
}

/// The registry as the last one-shot command left it, or the initial state if none has run.
pub fn load_working(cfg: &CoreConfig) -> anyhow::Result<Registry> {
    let final_path = cfg.final_state_path();
    if final_path.exists() {
        load_from(cfg, &final_path)
    } else {
        load_from(cfg, &cfg.initial_state_path())
    }
}

/// Runs `op` against the working registry and saves the result if it succeeded.
///
/// The outer error covers loading and saving; the inner one is the operation's own outcome,
/// which leaves the saved state untouched.
pub fn apply<T>(
    cfg: &CoreConfig,
    op: impl FnOnce(&mut Registry) -> WardResult<T>,
) -> anyhow::Result<WardResult<T>> {
    let mut registry = load_working(cfg)?;
    let outcome = op(&mut registry);
    if outcome.is_ok() {
        save(cfg, &registry)?;
    }
    Ok(outcome)
}

pub fn save(cfg: &CoreConfig, registry: &Registry) -> anyhow::Result<()> {
    let path = cfg.final_state_path();
    save_registry(&path, registry).with_context(|| format!("failed to save {}", path.display()))
}

// A missing file is already reported by `load_snapshot`.
fn load_from(cfg: &CoreConfig, path: &Path) -> anyhow::Result<Registry> {
    let mut registry = Registry::from_config(cfg);
    load_snapshot(path, &mut registry)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(registry)
}
