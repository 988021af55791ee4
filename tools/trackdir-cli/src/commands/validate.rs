//! Check a scene snapshot for consistency.

use std::path::PathBuf;

use trackdir_common::TrackdirError;
use trackdir_scene_model::Scene;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating scene at: {}", path.display());

    let scene = Scene::load(&path).map_err(|e| TrackdirError::scene(e.to_string()))?;

    println!("  Name: {}", scene.name);
    println!("  Version: {}", scene.version);
    println!("  Cameras: {}", scene.cameras.len());
    println!(
        "  Points: {}",
        scene.groups.iter().map(|g| g.points.len()).sum::<usize>()
    );

    let findings = scene.validate();
    if findings.is_empty() {
        println!("\nScene is consistent.");
    } else {
        println!("\nValidation issues:");
        for finding in &findings {
            println!("  - {finding}");
        }
        println!(
            "\n{} issue(s) found. Reconciliation may skip or refuse parts of this scene.",
            findings.len()
        );
    }

    Ok(())
}
