use anyhow::Result;
use arrowmark_annotation::{Arrow, ArrowColor, ArrowStore};
use arrowmark_base::Vec3;
use arrowmark_geometry::{Ray, ScreenPos, matrix_from_rows};
use arrowmark_io::{AppConfig, LoadOutcome, ViewState, save_sidecar};
use arrowmark_session::{
    ArrowTable, PickOutcome, PickSlot, PickState, PrimitiveCollector, Session, TableEdit,
};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

const EPS: f64 = 1.0e-9;

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("arrowmark_{stamp}_{file_name}"));
    path
}

fn sample_arrow(z: f64) -> Result<Arrow> {
    Ok(Arrow::new(
        Vec3::new(z, 10.0, 10.0),
        Vec3::new(0.0, 5.0, 0.0),
        ArrowColor::YELLOW,
        2.0,
        0.8,
    )?)
}

#[test]
fn two_picks_add_one_default_arrow() -> Result<()> {
    let mut session = Session::new(AppConfig::default());
    let table = Rc::new(RefCell::new(ArrowTable::default()));
    session.subscribe(Box::new(table.clone()));

    let first = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0))?;
    let diagonal = Vec3::new(0.0, 1.0, 1.0) / 2f64.sqrt();
    let second = Ray::new(Vec3::new(1.0, 0.0, 0.0), diagonal)?;

    assert_eq!(session.on_pick_ray(PickSlot::First, first)?, PickOutcome::Pending);
    assert_eq!(session.pick_state(), PickState::AwaitingSecond);
    let outcome = session.on_pick_ray(PickSlot::Second, second)?;

    let PickOutcome::Added { index, midpoint } = outcome else {
        panic!("expected an arrow, got {outcome:?}");
    };
    assert_eq!(index, 0);
    assert!(midpoint.distance(Vec3::new(0.5, 0.0, 0.0)) < EPS);
    assert_eq!(session.pick_state(), PickState::Idle);

    assert_eq!(session.arrows().len(), 1);
    let arrow = &session.arrows()[0];
    assert!(arrow.end().distance(Vec3::new(0.0, 0.0, 0.5)) < EPS);
    assert!((arrow.length() - 25.0).abs() < EPS);
    assert!(arrow.direction().distance(diagonal * 25.0) < EPS);
    assert_eq!(arrow.color(), &ArrowColor::RED);

    let table = table.borrow();
    assert_eq!(table.rows().len(), 1);
    assert!((table.rows()[0].length - 25.0).abs() < EPS);
    Ok(())
}

#[test]
fn screen_picks_through_perspective_transform() -> Result<()> {
    // Every canvas ray of this transform passes through world (0, 0, 1).
    let inverse = matrix_from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0, 1.0],
    ]);
    let mut session = Session::new(AppConfig::default());

    let pending = session.on_pick_event(PickSlot::Second, ScreenPos::new(4.0, -2.0), &inverse)?;
    assert_eq!(pending, PickOutcome::Pending);
    let outcome = session.on_pick_event(PickSlot::First, ScreenPos::new(-3.0, 6.0), &inverse)?;

    assert!(matches!(outcome, PickOutcome::Added { index: 0, .. }));
    assert!(session.arrows()[0].end().distance(Vec3::new(1.0, 0.0, 0.0)) < EPS);
    Ok(())
}

#[test]
fn degenerate_pick_leaves_pair_untouched() -> Result<()> {
    let flat = matrix_from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let mut session = Session::new(AppConfig::default());
    let outcome = session.on_pick_event(PickSlot::First, ScreenPos::new(1.0, 1.0), &flat)?;
    assert_eq!(outcome, PickOutcome::Degenerate);
    assert_eq!(session.pick_state(), PickState::Idle);
    Ok(())
}

#[test]
fn table_edits_flow_through_to_store_and_view() -> Result<()> {
    let mut session = Session::new(AppConfig::default());
    let table = Rc::new(RefCell::new(ArrowTable::default()));
    session.subscribe(Box::new(table.clone()));
    session.add_arrow(sample_arrow(1.0)?)?;
    session.add_arrow(sample_arrow(2.0)?)?;

    session.apply_edit(1, TableEdit::Length(12.5))?;
    session.apply_edit(0, TableEdit::Width(4.0))?;
    session.delete_arrow(0)?;

    let table = table.borrow();
    assert_eq!(table.rows().len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.end, Vec3::new(2.0, 10.0, 10.0));
    assert!((row.length - 12.5).abs() < EPS);
    assert!(session.apply_edit(3, TableEdit::Opacity(0.1)).is_err());
    Ok(())
}

#[test]
fn render_sink_receives_start_and_end() -> Result<()> {
    let mut session = Session::new(AppConfig::default());
    session.add_arrow(sample_arrow(3.0)?)?;

    let mut sink = PrimitiveCollector::default();
    session.render(&mut sink);

    assert_eq!(sink.primitives.len(), 1);
    assert_eq!(sink.primitives[0].start, Vec3::new(3.0, 5.0, 10.0));
    assert_eq!(sink.primitives[0].end, Vec3::new(3.0, 10.0, 10.0));
    Ok(())
}

#[test]
fn switching_volumes_saves_and_reloads() -> Result<()> {
    let folder = temp_path("session_volumes");
    fs::create_dir_all(&folder)?;
    fs::write(folder.join("a.tif"), b"")?;
    fs::write(folder.join("b.tif"), b"")?;
    let mut seeded = ArrowStore::new();
    seeded.add(sample_arrow(1.0)?);
    seeded.add(sample_arrow(2.0)?);
    save_sidecar(&seeded, folder.join("a.json"))?;

    let mut session = Session::new(AppConfig::default());
    let opened = session.open_folder(&folder)?;
    assert_eq!(opened, Some(LoadOutcome::Loaded { count: 2 }));
    session.add_arrow_at(Vec3::new(7.0, 8.0, 9.0))?;
    session.on_pick_ray(PickSlot::First, Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))?)?;

    assert_eq!(session.next_volume()?, Some(LoadOutcome::Missing));
    assert!(session.arrows().is_empty());
    assert_eq!(session.pick_state(), PickState::Idle);
    assert_eq!(session.current_sidecar(), Some(folder.join("b.json").as_path()));

    assert_eq!(session.prev_volume()?, Some(LoadOutcome::Loaded { count: 3 }));
    assert_eq!(session.arrows()[2].end(), Vec3::new(9.0, 8.0, 7.0));
    assert_eq!(
        session.view_snapshot_path(),
        Some(folder.join("snapshots").join("a_view.json"))
    );

    let _ = fs::remove_dir_all(&folder);
    Ok(())
}

#[test]
fn corrupt_sidecar_is_reported_and_left_on_disk() -> Result<()> {
    let folder = temp_path("session_corrupt");
    fs::create_dir_all(&folder)?;
    fs::write(folder.join("a.tif"), b"")?;
    fs::write(folder.join("b.tif"), b"")?;
    let mut seeded = ArrowStore::new();
    seeded.add(sample_arrow(1.0)?);
    save_sidecar(&seeded, folder.join("a.json"))?;
    let corrupt = folder.join("b.json");
    fs::write(&corrupt, r#"[{"end": [0, 0, 0]}"#)?;

    let mut session = Session::new(AppConfig::default());
    assert_eq!(session.open_folder(&folder)?, Some(LoadOutcome::Loaded { count: 1 }));

    let switched = session.next_volume();
    assert!(matches!(
        switched,
        Err(arrowmark_session::Error::Io(arrowmark_io::Error::Annotation(
            arrowmark_annotation::Error::CorruptFile(_)
        )))
    ));
    assert!(session.arrows().is_empty());
    assert_eq!(session.current_sidecar(), Some(corrupt.as_path()));

    assert_eq!(session.prev_volume()?, Some(LoadOutcome::Loaded { count: 1 }));
    assert_eq!(fs::read_to_string(&corrupt)?, r#"[{"end": [0, 0, 0]}"#);

    let _ = fs::remove_dir_all(&folder);
    Ok(())
}

#[test]
fn view_snapshot_follows_the_open_volume() -> Result<()> {
    let folder = temp_path("session_views");
    fs::create_dir_all(&folder)?;
    fs::write(folder.join("a.tif"), b"")?;
    fs::write(folder.join("b.tif"), b"")?;
    let state = ViewState {
        dims_point: vec![4.0, 0.0, 0.0],
        camera_center: Vec3::new(10.0, 64.0, 64.0),
        camera_angles: Vec3::new(0.0, 0.0, 90.0),
        camera_zoom: 1.5,
    };

    let mut session = Session::new(AppConfig::default());
    assert_eq!(session.open_volume(folder.join("b.tif"))?, Some(LoadOutcome::Missing));
    assert_eq!(session.restore_view()?, None);
    let written = session.save_view(&state)?;
    assert_eq!(written, Some(folder.join("snapshots").join("b_view.json")));
    assert_eq!(session.restore_view()?, Some(state.clone()));

    session.next_volume()?;
    assert_eq!(session.restore_view()?, None);
    session.next_volume()?;
    assert_eq!(session.restore_view()?, Some(state));

    assert!(matches!(
        session.open_volume(folder.join("c.tif")),
        Err(arrowmark_session::Error::UnknownVolume(_))
    ));

    let _ = fs::remove_dir_all(&folder);
    Ok(())
}

#[test]
fn explicit_load_of_missing_file_keeps_arrows() -> Result<()> {
    let mut session = Session::new(AppConfig::default());
    session.add_arrow(sample_arrow(1.0)?)?;
    let outcome = session.load(temp_path("nowhere.json"))?;
    assert_eq!(outcome, LoadOutcome::Missing);
    assert_eq!(session.arrows().len(), 1);
    Ok(())
}
