use std::collections::HashMap;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use ar_interface::backends::SimulatedBackend;
use ar_interface::{
    ArSession, FrameContext, HitTestResultType, PlaneEventKind, PlaneId, ScreenOrientation,
    Settings,
};
use nalgebra::{Point2, Point3};

fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn living_room() -> ArSession<SimulatedBackend> {
    let backend = SimulatedBackend::load(testdata_path("living_room.json")).expect("scene");
    let mut session = ArSession::new(backend, Settings::default());
    session.start().expect("start");
    session
}

const PORTRAIT: FrameContext = FrameContext {
    orientation: ScreenOrientation::Portrait,
};

/// Screen center of the scene camera (1080x1920).
fn center() -> Point2<f32> {
    Point2::new(540.0, 960.0)
}

fn kinds(events: &[ar_interface::PlaneEvent]) -> HashMap<PlaneEventKind, usize> {
    let mut out = HashMap::new();
    for e in events {
        *out.entry(e.kind()).or_insert(0) += 1;
    }
    out
}

#[test]
fn replays_living_room_event_sequence() {
    let mut session = living_room();
    assert_eq!(session.backend().frame_count(), 5);

    let f0 = session.update(&PORTRAIT).expect("frame 0");
    assert_eq!(kinds(&f0.plane_events), HashMap::from([(PlaneEventKind::Added, 2)]));
    let floor_id: PlaneId = session.plane(&"floor".to_string()).expect("floor").id;
    assert_eq!(f0.light_estimate.ambient_color_temperature, Some(5600.0));
    assert_eq!(f0.point_cloud.as_ref().map(|c| c.len()), Some(3));

    let f1 = session.update(&PORTRAIT).expect("frame 1");
    assert_eq!(
        kinds(&f1.plane_events),
        HashMap::from([(PlaneEventKind::Updated, 1), (PlaneEventKind::Added, 1)])
    );

    let f2 = session.update(&PORTRAIT).expect("frame 2");
    assert_eq!(
        kinds(&f2.plane_events),
        HashMap::from([(PlaneEventKind::Updated, 1), (PlaneEventKind::Removed, 1)])
    );
    assert!(session.plane(&"floor-b".to_string()).is_none());

    let f3 = session.update(&PORTRAIT).expect("frame 3");
    assert!(!f3.tracking);
    assert!(f3.plane_events.is_empty());
    assert_eq!(session.planes().count(), 2);

    let f4 = session.update(&PORTRAIT).expect("frame 4");
    assert_eq!(kinds(&f4.plane_events), HashMap::from([(PlaneEventKind::Removed, 1)]));
    assert_eq!(f4.plane_events[0].plane().center, Point3::new(0.5, 0.7, 2.0));

    let floor = session.plane(&"floor".to_string()).expect("floor");
    assert_eq!(floor.id, floor_id, "floor id is stable across updates");
    assert_eq!(floor.extents.x, 2.0);

    let drained = session.stop();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].plane().id, floor_id);
}

#[test]
fn frames_past_the_script_do_not_track() {
    let mut session = living_room();
    for _ in 0..5 {
        session.update(&PORTRAIT).expect("frame");
    }
    let extra = session.update(&PORTRAIT).expect("frame 5");
    assert!(!extra.tracking);
    assert!(session.backend().is_exhausted());
}

#[test]
fn center_tap_hits_the_floor() {
    let mut session = living_room();
    session.update(&PORTRAIT).expect("frame 0");

    let hits = session.hit_test(center(), HitTestResultType::ExistingPlaneUsingExtent);
    assert_eq!(hits.len(), 1);
    let floor = session.plane(&"floor".to_string()).expect("floor");
    assert_eq!(hits[0].plane_id, Some(floor.id));
    assert_relative_eq!(hits[0].distance, 1.5 * std::f64::consts::SQRT_2, epsilon = 1e-4);
    assert_relative_eq!(hits[0].position, Point3::new(0.0, 0.0, 1.5), epsilon = 1e-4);
}

#[test]
fn infinite_planes_include_the_table_in_front() {
    let mut session = living_room();
    session.update(&PORTRAIT).expect("frame 0");

    let hits = session.hit_test(center(), HitTestResultType::ExistingPlane);
    assert_eq!(hits.len(), 2);
    let table = session.plane(&"table".to_string()).expect("table");
    assert_eq!(hits[0].plane_id, Some(table.id));
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn feature_point_on_the_center_ray() {
    let mut session = living_room();
    session.update(&PORTRAIT).expect("frame 0");

    let hits = session.hit_test(center(), HitTestResultType::FeaturePoint);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].kind, HitTestResultType::FeaturePoint);
    assert_relative_eq!(hits[0].position, Point3::new(0.0, 0.0, 1.5), epsilon = 1e-6);
}

#[test]
fn orientation_change_reports_a_new_transform_and_fov() {
    let mut session = living_room();
    let first = session.update(&PORTRAIT).expect("frame 0");
    assert!(first.display_transform.is_some());
    let portrait_fov = first.field_of_view.expect("fov");

    let landscape = FrameContext::new(ScreenOrientation::LandscapeRight);
    let second = session.update(&landscape).expect("frame 1");
    let t = second.display_transform.expect("transform");
    assert_eq!([t.m00, t.m01, t.m10, t.m11], [-1.0, 0.0, 0.0, 1.0]);
    assert_eq!(second.field_of_view, Some(60.0));
    assert!(portrait_fov < 60.0, "portrait camera is narrower horizontally");
}

#[test]
fn settings_disable_planes() {
    let backend = SimulatedBackend::load(testdata_path("living_room.json")).expect("scene");
    let settings = Settings {
        enable_plane_detection: false,
        ..Settings::default()
    };
    let mut session = ArSession::new(backend, settings);
    session.start().expect("start");
    let update = session.update(&PORTRAIT).expect("frame 0");
    assert!(update.plane_events.is_empty());
    assert!(update.point_cloud.is_some());
    assert_eq!(session.planes().count(), 0);
}
