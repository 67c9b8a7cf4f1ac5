use anyhow::Result;
use arrowmark_annotation::{Arrow, ArrowColor, ArrowStore};
use arrowmark_base::Vec3;
use arrowmark_io::{
    AppConfig, Error, LoadOutcome, SaveOutcome, ViewState, list_volumes, load_config,
    load_sidecar, load_view_state, save_sidecar, save_view_state,
};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("arrowmark_{stamp}_{file_name}"));
    path
}

fn store_with(count: usize) -> Result<ArrowStore> {
    let mut store = ArrowStore::new();
    for i in 0..count {
        store.add(Arrow::new(
            Vec3::new(i as f64, 1.0, 2.0),
            Vec3::new(0.0, 3.0, 4.0),
            ArrowColor::GREEN,
            2.0,
            0.5,
        )?);
    }
    Ok(store)
}

#[test]
fn sidecar_round_trip() -> Result<()> {
    let path = temp_path("round_trip.json");
    let store = store_with(3)?;

    assert_eq!(save_sidecar(&store, &path)?, SaveOutcome::Written { count: 3 });

    let mut restored = ArrowStore::new();
    assert_eq!(
        load_sidecar(&mut restored, &path)?,
        LoadOutcome::Loaded { count: 3 }
    );
    assert_eq!(restored.arrows(), store.arrows());

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn empty_store_does_not_overwrite_existing_sidecar() -> Result<()> {
    let path = temp_path("guard.json");
    save_sidecar(&store_with(2)?, &path)?;
    let before = fs::read(&path)?;

    let outcome = save_sidecar(&ArrowStore::new(), &path)?;

    assert_eq!(outcome, SaveOutcome::SkippedEmpty);
    assert_eq!(fs::read(&path)?, before);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn empty_store_writes_when_no_sidecar_exists() -> Result<()> {
    let path = temp_path("empty.json");
    let outcome = save_sidecar(&ArrowStore::new(), &path)?;
    assert_eq!(outcome, SaveOutcome::Written { count: 0 });
    assert_eq!(serde_json::from_slice::<Vec<serde_json::Value>>(&fs::read(&path)?)?.len(), 0);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn missing_sidecar_leaves_store_alone() -> Result<()> {
    let mut store = store_with(2)?;
    let outcome = load_sidecar(&mut store, temp_path("missing.json"))?;
    assert_eq!(outcome, LoadOutcome::Missing);
    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn corrupt_sidecar_keeps_in_memory_arrows() -> Result<()> {
    let path = temp_path("corrupt.json");
    fs::write(&path, r#"[{"end": [0, 0, 0], "direction": [1, 0, 0]}, {"end": [1, 2, 3]}]"#)?;
    let mut store = store_with(4)?;

    let result = load_sidecar(&mut store, &path);

    assert!(matches!(
        result,
        Err(Error::Annotation(arrowmark_annotation::Error::CorruptFile(_)))
    ));
    assert_eq!(store.len(), 4);
    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn config_file_overrides_defaults() -> Result<()> {
    let path = temp_path("config.json");
    fs::write(
        &path,
        r#"{
            "available_colors": ["red", "green", "blue"],
            "image_pixel_size": [5, 0.91, 0.91],
            "default_arrow_direction": [0, 1, 1],
            "default_arrow_length": 25,
            "default_arrow_color": "red",
            "default_arrow_width": 3,
            "default_arrow_opacity": 1.0
        }"#,
    )?;

    let config = load_config(&path)?;
    assert_eq!(config.available_colors.len(), 3);
    assert_eq!(config.image_pixel_size, Vec3::new(5.0, 0.91, 0.91));
    assert_eq!(config.default_path, AppConfig::default().default_path);

    fs::write(&path, r#"{"default_arrow_opacity": 2.0}"#)?;
    assert!(matches!(load_config(&path), Err(Error::InvalidConfig { .. })));

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn missing_config_uses_defaults() -> Result<()> {
    let config = load_config(temp_path("no_config.json"))?;
    assert_eq!(config, AppConfig::default());
    Ok(())
}

#[test]
fn view_state_round_trip() -> Result<()> {
    let path = temp_path("views").join("snapshots").join("stack_view.json");
    let state = ViewState {
        dims_point: vec![12.0, 0.0, 0.0],
        camera_center: Vec3::new(40.0, 128.0, 128.0),
        camera_angles: Vec3::new(0.0, -30.0, 90.0),
        camera_zoom: 2.5,
    };

    save_view_state(&state, &path)?;
    assert_eq!(load_view_state(&path)?, Some(state));
    assert_eq!(load_view_state(path.with_file_name("other.json"))?, None);

    if let Some(root) = path.parent().and_then(|p| p.parent()) {
        let _ = fs::remove_dir_all(root);
    }
    Ok(())
}

#[test]
fn volumes_are_sorted_tiff_files() -> Result<()> {
    let folder = temp_path("volumes");
    fs::create_dir_all(&folder)?;
    for name in ["b.tiff", "a.tif", "notes.txt", "a.json"] {
        fs::write(folder.join(name), b"")?;
    }

    let volumes = list_volumes(&folder)?;
    let names: Vec<_> = volumes
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["a.tif", "b.tiff"]);

    let _ = fs::remove_dir_all(&folder);
    Ok(())
}
