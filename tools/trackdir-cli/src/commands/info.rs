//! Show scene information.

use std::path::PathBuf;

use trackdir_common::TrackdirError;
use trackdir_scene_model::Scene;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let scene = Scene::load(&path).map_err(|e| TrackdirError::scene(e.to_string()))?;

    println!("Scene: {}", scene.name);
    println!("  Version: {}", scene.version);
    println!("  Created: {}", scene.created_at);
    println!("  Modified: {}", scene.modified_at);
    println!();

    println!("Cameras:");
    for camera in &scene.cameras {
        let active = if Some(&camera.id) == scene.active_camera.as_ref() {
            " (active)"
        } else {
            ""
        };
        println!(
            "  {} '{}': {} frames{active}",
            camera.id, camera.name, camera.frame_count
        );
    }
    println!();

    println!("Point groups:");
    for group in &scene.groups {
        let active = if Some(&group.id) == scene.active_group.as_ref() {
            " (active)"
        } else {
            ""
        };
        println!(
            "  {} '{}': {} points, {} selected{active}",
            group.id,
            group.name,
            group.points.len(),
            group.selection.len()
        );
        for point in &group.points {
            println!(
                "    {} '{}': {}, {} keyframes, {} tracked frames",
                point.id,
                point.name,
                point.direction,
                point.keyframe_count(),
                point.valid_frame_count()
            );
        }
    }

    Ok(())
}
