//! Change the tracking direction of a scene's selected points.

use std::path::PathBuf;

use trackdir_common::{AppConfig, TrackdirError};
use trackdir_host_api::SceneHost;
use trackdir_reconcile_core::{apply_direction, BatchOptions};
use trackdir_scene_model::{PointId, Scene, TrackingDirection};

pub fn run(
    path: PathBuf,
    direction: String,
    points: Option<String>,
    dry_run: bool,
    no_backup: bool,
) -> anyhow::Result<()> {
    let target: TrackingDirection = direction
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    println!("Applying '{target}' to scene: {}", path.display());

    let mut scene = Scene::load(&path).map_err(|e| TrackdirError::scene(e.to_string()))?;

    // Optional selection override, in the order given on the command line.
    if let Some(list) = points {
        let selection: Vec<PointId> = list
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PointId::from)
            .collect();
        let group_id = scene
            .active_group
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Scene has no active point group"))?;
        let group = scene
            .group_mut(&group_id)
            .ok_or_else(|| anyhow::anyhow!("Active point group '{group_id}' does not exist"))?;
        group.selection = selection;
    }

    let mut host = SceneHost::new(scene);
    let report = apply_direction(&mut host, target, &BatchOptions { dry_run })
        .map_err(|e| TrackdirError::reconcile(e.to_string()))?;

    println!("  Processed {} point(s)", report.processed);
    for message in &report.messages {
        println!("  {message}");
    }
    println!(
        "  Totals: {} role writes, {} stale skips, {} verify mismatches",
        report.total_status_writes(),
        report.total_stale_skips(),
        report.total_verify_mismatches()
    );

    if dry_run {
        println!("\nDry run: scene left untouched.");
        return Ok(());
    }

    let config = AppConfig::load();
    if config.reconcile.backup_before_apply && !no_backup {
        let backup = path.with_extension("json.bak");
        std::fs::copy(&path, &backup)
            .map_err(|e| anyhow::anyhow!("Failed to write backup {}: {e}", backup.display()))?;
        println!("  Backup written to: {}", backup.display());
    }

    let mut scene = host.into_scene();
    scene
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to save scene: {e}"))?;
    println!("\nScene saved to: {}", path.display());

    Ok(())
}
