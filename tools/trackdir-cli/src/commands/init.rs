//! Create a demo scene snapshot.

use std::path::PathBuf;

use trackdir_common::TrackdirError;
use trackdir_scene_model::{
    Camera, CameraId, GroupId, KeyframeStatus, PointGroup, Scene, TrackedPoint, TrackingDirection,
};

pub fn run(name: String, output: PathBuf, frames: u32) -> anyhow::Result<()> {
    let path = output.join(format!("{name}.json"));
    println!("Creating demo scene '{name}' at {}", path.display());

    let mut scene = demo_scene(&name, frames);
    scene
        .save(&path)
        .map_err(|e| TrackdirError::scene(e.to_string()))?;

    println!("Scene created:");
    println!("  File: {}", path.display());
    println!("  Camera: {} frames", frames);
    println!("  Points: 3 (all selected)");
    println!();
    println!("Try:");
    println!("  trackdir info {}", path.display());
    println!("  trackdir apply {} --direction backward --dry-run", path.display());

    Ok(())
}

/// One camera, one group, three points with differently shaped curves.
fn demo_scene(name: &str, frames: u32) -> Scene {
    let mut scene = Scene::new(name);
    scene.cameras.push(Camera::new("cam1", "Main Plate", frames));
    scene.active_camera = Some(CameraId::new("cam1"));

    let mut group = PointGroup::new("grp1", "Set Corners");

    // Tracked from frame 1 to 3/4 of the timeline, forward.
    let mut full = TrackedPoint::new("p_door", "Door Corner");
    let cutoff = (frames * 3 / 4).max(2);
    for frame in 1..=cutoff {
        let t = frame as f64 / frames as f64;
        full.set_position(frame, 0.2 + 0.3 * t, 0.4 + 0.1 * t);
    }
    full.set_status(1, KeyframeStatus::Regular);
    full.set_status(cutoff, KeyframeStatus::End);

    // Tracked backward from the last frame down to the middle.
    let mut tail = TrackedPoint::new("p_window", "Window Corner");
    tail.direction = TrackingDirection::Backward;
    for frame in (frames / 2).max(1)..=frames {
        let t = frame as f64 / frames as f64;
        tail.set_position(frame, 0.7 - 0.2 * t, 0.3 + 0.2 * t);
    }
    tail.set_status((frames / 2).max(1), KeyframeStatus::End);
    tail.set_status(frames, KeyframeStatus::Regular);

    // A single confirmed frame with no continuation either way.
    let mut lone = TrackedPoint::new("p_sign", "Sign Corner");
    let middle = (frames / 2).max(1);
    lone.set_position(middle, 0.5, 0.5);
    lone.set_status(middle, KeyframeStatus::Regular);

    for point in [&full, &tail, &lone] {
        group.selection.push(point.id.clone());
    }
    group.points.push(full);
    group.points.push(tail);
    group.points.push(lone);

    scene.groups.push(group);
    scene.active_group = Some(GroupId::new("grp1"));
    scene
}
