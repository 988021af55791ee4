//! End-to-end reconciliation scenarios against the in-memory scene host.

use proptest::prelude::*;

use trackdir_host_api::{SceneHost, TrackingHost};
use trackdir_reconcile_core::{apply_direction, BatchOptions};
use trackdir_scene_model::{
    Camera, CameraId, FrameNumber, GroupId, KeyframeStatus, PointGroup, PointId, Scene,
    TrackedPoint, TrackingDirection,
};

/// One camera, one group, one selected point with valid positions at
/// `valid_frames` and the given keyframe roles.
fn single_point_host(
    frame_count: u32,
    valid_frames: &[FrameNumber],
    roles: &[(FrameNumber, KeyframeStatus)],
    direction: TrackingDirection,
) -> SceneHost {
    let mut scene = Scene::new("Scenario");
    scene.cameras.push(Camera::new("cam1", "Plate", frame_count));
    scene.active_camera = Some(CameraId::new("cam1"));

    let mut group = PointGroup::new("grp1", "Group");
    let mut point = TrackedPoint::new("p1", "P1");
    point.direction = direction;
    for &frame in valid_frames {
        point.set_position(frame, 0.05 * frame as f64, 0.4);
    }
    for &(frame, role) in roles {
        point.set_status(frame, role);
    }
    group.selection.push(point.id.clone());
    group.points.push(point);
    scene.groups.push(group);
    scene.active_group = Some(GroupId::new("grp1"));

    SceneHost::new(scene)
}

fn status_at(host: &SceneHost, frame: FrameNumber) -> KeyframeStatus {
    host.status(&PointId::new("p1"), &CameraId::new("cam1"), frame)
}

#[test]
fn forward_keeps_end_marker_when_continuation_stops() {
    // Valid 1-3, invalid 4-5, end marker at 3: frame 4 has no data, so the
    // marker already sits on the terminal frame.
    let mut host = single_point_host(
        5,
        &[1, 2, 3],
        &[(3, KeyframeStatus::End)],
        TrackingDirection::Backward,
    );

    let report =
        apply_direction(&mut host, TrackingDirection::Forward, &BatchOptions::default()).unwrap();

    assert_eq!(status_at(&host, 3), KeyframeStatus::End);
    assert_eq!(report.total_status_writes(), 0);
}

#[test]
fn forward_demotes_end_marker_with_continuation() {
    // Same shape but valid through frame 5: the marker at 3 has data ahead.
    let mut host = single_point_host(
        5,
        &[1, 2, 3, 4, 5],
        &[(3, KeyframeStatus::End)],
        TrackingDirection::Backward,
    );

    let report =
        apply_direction(&mut host, TrackingDirection::Forward, &BatchOptions::default()).unwrap();

    assert_eq!(status_at(&host, 3), KeyframeStatus::Regular);
    assert_eq!(report.total_status_writes(), 1);
}

#[test]
fn backward_demotes_end_marker_preceded_by_data() {
    let mut host = single_point_host(
        5,
        &[1, 2, 3, 4],
        &[(4, KeyframeStatus::End)],
        TrackingDirection::Forward,
    );

    apply_direction(&mut host, TrackingDirection::Backward, &BatchOptions::default()).unwrap();

    assert_eq!(status_at(&host, 4), KeyframeStatus::Regular);
}

#[test]
fn backward_terminates_isolated_regular_keyframe() {
    // Frame 2 valid and regular, frames 1 and 3 without data.
    let mut host = single_point_host(
        5,
        &[2],
        &[(2, KeyframeStatus::Regular)],
        TrackingDirection::Forward,
    );

    apply_direction(&mut host, TrackingDirection::Backward, &BatchOptions::default()).unwrap();

    assert_eq!(status_at(&host, 2), KeyframeStatus::End);
}

#[test]
fn bidirectional_reclassifies_only_from_backward() {
    // Coming from backward: frame 5 is regular with no data at frame 6.
    let mut host = single_point_host(
        6,
        &[1, 2, 3, 4, 5],
        &[(5, KeyframeStatus::Regular)],
        TrackingDirection::Backward,
    );
    apply_direction(
        &mut host,
        TrackingDirection::Bidirectional,
        &BatchOptions::default(),
    )
    .unwrap();
    assert_eq!(status_at(&host, 5), KeyframeStatus::End);

    // Identical data coming from forward: the guard leaves frame 5 alone.
    let mut host = single_point_host(
        6,
        &[1, 2, 3, 4, 5],
        &[(5, KeyframeStatus::Regular)],
        TrackingDirection::Forward,
    );
    let report = apply_direction(
        &mut host,
        TrackingDirection::Bidirectional,
        &BatchOptions::default(),
    )
    .unwrap();
    assert_eq!(status_at(&host, 5), KeyframeStatus::Regular);
    assert_eq!(report.total_status_writes(), 0);
}

#[test]
fn non_keyframe_frames_are_never_touched() {
    // Valid data everywhere, keyframes only at 2 and 4.
    let mut host = single_point_host(
        5,
        &[1, 2, 3, 4, 5],
        &[(2, KeyframeStatus::Regular), (4, KeyframeStatus::End)],
        TrackingDirection::Backward,
    );

    apply_direction(&mut host, TrackingDirection::Forward, &BatchOptions::default()).unwrap();

    for frame in [1, 3, 5] {
        assert_eq!(status_at(&host, frame), KeyframeStatus::None);
    }
}

#[test]
fn last_frame_always_classifies_as_end_under_forward() {
    let mut host = single_point_host(
        4,
        &[1, 2, 3, 4],
        &[(4, KeyframeStatus::Regular)],
        TrackingDirection::Backward,
    );

    apply_direction(&mut host, TrackingDirection::Forward, &BatchOptions::default()).unwrap();

    // Frame N has no next frame, so prev/next validity substitutes false.
    assert_eq!(status_at(&host, 4), KeyframeStatus::End);
}

#[test]
fn applying_twice_writes_nothing_the_second_time() {
    let mut host = single_point_host(
        8,
        &[1, 2, 3, 5, 6],
        &[
            (1, KeyframeStatus::Regular),
            (3, KeyframeStatus::End),
            (6, KeyframeStatus::End),
        ],
        TrackingDirection::Forward,
    );

    let first =
        apply_direction(&mut host, TrackingDirection::Backward, &BatchOptions::default()).unwrap();
    let scene_after_first = host.scene().clone();

    let second =
        apply_direction(&mut host, TrackingDirection::Backward, &BatchOptions::default()).unwrap();

    assert!(first.total_status_writes() > 0);
    assert_eq!(second.total_status_writes(), 0);
    assert_eq!(host.scene().groups, scene_after_first.groups);
}

/// Strategy: a timeline with arbitrary validity and keyframe roles on valid
/// frames only.
fn arb_curve() -> impl Strategy<Value = (u32, Vec<bool>, Vec<u8>)> {
    (3u32..=10).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec(any::<bool>(), n as usize),
            proptest::collection::vec(0u8..3, n as usize),
        )
    })
}

fn arb_direction() -> impl Strategy<Value = TrackingDirection> {
    prop_oneof![
        Just(TrackingDirection::Forward),
        Just(TrackingDirection::Backward),
        Just(TrackingDirection::Bidirectional),
    ]
}

fn host_from_curve(
    n: u32,
    validity: &[bool],
    roles: &[u8],
    direction: TrackingDirection,
) -> SceneHost {
    let valid_frames: Vec<FrameNumber> = (1..=n).filter(|&f| validity[(f - 1) as usize]).collect();
    let role_entries: Vec<(FrameNumber, KeyframeStatus)> = (1..=n)
        .filter(|&f| validity[(f - 1) as usize])
        .filter_map(|f| match roles[(f - 1) as usize] {
            1 => Some((f, KeyframeStatus::Regular)),
            2 => Some((f, KeyframeStatus::End)),
            _ => None,
        })
        .collect();
    single_point_host(n, &valid_frames, &role_entries, direction)
}

proptest! {
    #[test]
    fn prop_direction_change_is_idempotent(
        (n, validity, roles) in arb_curve(),
        from in arb_direction(),
        target in arb_direction(),
    ) {
        let mut host = host_from_curve(n, &validity, &roles, from);

        apply_direction(&mut host, target, &BatchOptions::default()).unwrap();
        let scene_after_first = host.scene().clone();

        let second = apply_direction(&mut host, target, &BatchOptions::default()).unwrap();

        prop_assert_eq!(second.total_status_writes(), 0);
        prop_assert!(second.reports.iter().all(|r| !r.direction_changed));
        prop_assert_eq!(&host.scene().groups, &scene_after_first.groups);
    }

    #[test]
    fn prop_forward_keyframes_follow_next_validity(
        (n, validity, roles) in arb_curve(),
        from in arb_direction(),
    ) {
        let mut host = host_from_curve(n, &validity, &roles, from);
        let candidates: Vec<FrameNumber> = (1..=n)
            .filter(|&f| {
                host.status(&PointId::new("p1"), &CameraId::new("cam1"), f).is_keyframe()
            })
            .collect();

        apply_direction(&mut host, TrackingDirection::Forward, &BatchOptions::default()).unwrap();

        for frame in candidates {
            let next_valid = frame < n && validity[frame as usize];
            let status = host.status(&PointId::new("p1"), &CameraId::new("cam1"), frame);
            if next_valid {
                prop_assert_eq!(status, KeyframeStatus::Regular, "frame {}", frame);
            } else {
                prop_assert_eq!(status, KeyframeStatus::End, "frame {}", frame);
            }
        }
    }
}
