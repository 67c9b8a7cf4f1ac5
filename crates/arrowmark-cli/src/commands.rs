use anyhow::{Context, Result, bail};
use arrowmark_annotation::{Arrow, ArrowColor, ArrowPatch, ArrowStore};
use arrowmark_base::Vec3;
use arrowmark_geometry::{Matrix4, Ray, ScreenPos, matrix_from_rows, triangulate, unproject};
use arrowmark_io::{
    AppConfig, LoadOutcome, SaveOutcome, ViewState, list_volumes, load_sidecar, sidecar_path,
};
use arrowmark_session::{ArrowRow, PickOutcome, PickSlot, Session};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::{
    AddArgs, Command, DeleteArgs, ListArgs, PickArgs, SnapshotAction, SnapshotRestoreArgs,
    SnapshotSaveArgs, TriangulateArgs, UnprojectArgs, UpdateArgs, VolumesArgs,
};

pub fn run(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Unproject(args) => run_unproject(args),
        Command::Triangulate(args) => run_triangulate(args),
        Command::Pick(args) => run_pick(args, config),
        Command::List(args) => run_list(args, config),
        Command::Add(args) => run_add(args, config),
        Command::Update(args) => run_update(args, config),
        Command::Delete(args) => run_delete(args, config),
        Command::Volumes(args) => run_volumes(args, config),
        Command::Snapshot(args) => match args.action {
            SnapshotAction::Save(args) => run_snapshot_save(args, config),
            SnapshotAction::Restore(args) => run_snapshot_restore(args, config),
        },
    }
}

fn run_unproject(args: UnprojectArgs) -> Result<()> {
    let screen = parse_screen(&args.pos)?;
    let inverse = parse_matrix(&args.inverse)?;
    let ray = unproject(screen, &inverse).context("unprojection failed")?;
    println!("origin:    {}", ray.origin());
    println!("direction: {}", ray.direction());
    Ok(())
}

fn run_triangulate(args: TriangulateArgs) -> Result<()> {
    let first = Ray::new(
        parse_vec3(&args.first_origin, "first-origin")?,
        parse_vec3(&args.first_dir, "first-dir")?,
    )
    .context("invalid first ray")?;
    let second = Ray::new(
        parse_vec3(&args.second_origin, "second-origin")?,
        parse_vec3(&args.second_dir, "second-dir")?,
    )
    .context("invalid second ray")?;

    match triangulate(&first, &second) {
        Some(midpoint) => {
            println!("midpoint: {midpoint}");
            Ok(())
        }
        None => bail!("rays are parallel; no unique closest point"),
    }
}

fn run_pick(args: PickArgs, config: AppConfig) -> Result<()> {
    let inverse = parse_matrix(&args.inverse)?;
    let first = parse_screen(&args.first)?;
    let second = parse_screen(&args.second)?;

    let mut session = open_session(config, &args.sidecar)?;
    let pending = session.on_pick_event(PickSlot::First, first, &inverse)?;
    if pending == PickOutcome::Degenerate {
        bail!("first click could not be unprojected");
    }

    match session.on_pick_event(PickSlot::Second, second, &inverse)? {
        PickOutcome::Added { index, midpoint } => {
            let row = ArrowRow::from(&session.arrows()[index]);
            println!("midpoint: {midpoint}");
            println!("added row {index}: end {}", row.end);
            report_save(session.save_current()?);
            Ok(())
        }
        PickOutcome::Parallel => bail!("picked rays are parallel; nothing added"),
        PickOutcome::Degenerate => bail!("second click could not be unprojected"),
        PickOutcome::Pending => bail!("pick pair did not complete"),
    }
}

fn run_list(args: ListArgs, config: AppConfig) -> Result<()> {
    let session = open_session(config, &args.sidecar)?;
    let context = session.volume_context();
    if session.arrows().is_empty() {
        println!("no arrows");
        return Ok(());
    }

    println!("row  end (z, y, x)                 direction (z, y, x)           color    length   width  opacity");
    for (index, arrow) in session.arrows().iter().enumerate() {
        let row = ArrowRow::from(arrow);
        println!(
            "{index:<4} {:<29} {:<29} {:<8} {:>7.2} {:>6.2} {:>8.2}",
            row.end.to_string(),
            row.direction.to_string(),
            row.color.to_string(),
            row.length,
            row.edge_width,
            row.opacity
        );
        if args.voxel {
            println!("     voxel {}", context.to_voxel(row.end));
        }
    }
    Ok(())
}

fn run_add(args: AddArgs, config: AppConfig) -> Result<()> {
    let end = parse_vec3(&args.end, "end")?;
    let color = match &args.color {
        Some(text) => text.parse::<ArrowColor>()?,
        None => config.default_arrow_color.clone(),
    };
    let width = args.width.unwrap_or(config.default_arrow_width);
    let opacity = args.opacity.unwrap_or(config.default_arrow_opacity);

    let arrow = match (&args.direction, args.length) {
        (Some(direction), None) => {
            Arrow::new(end, parse_vec3(direction, "direction")?, color, width, opacity)?
        }
        (direction, length) => {
            let orientation = match direction {
                Some(text) => parse_vec3(text, "direction")?,
                None => config.default_arrow_direction,
            };
            let length = length.unwrap_or(config.default_arrow_length);
            Arrow::with_length(end, orientation, length, color, width, opacity)?
        }
    };

    let mut session = open_session(config, &args.sidecar)?;
    let index = session.add_arrow(arrow)?;
    println!("added row {index}");
    report_save(session.save_current()?);
    Ok(())
}

fn run_update(args: UpdateArgs, config: AppConfig) -> Result<()> {
    let mut patch = ArrowPatch::new();
    if let Some(text) = &args.end {
        patch = patch.end(parse_vec3(text, "end")?);
    }
    if let Some(text) = &args.direction {
        patch = patch.direction(parse_vec3(text, "direction")?);
    }
    if let Some(length) = args.length {
        patch = patch.length(length);
    }
    if let Some(text) = &args.color {
        patch = patch.color(text.parse::<ArrowColor>()?);
    }
    if let Some(width) = args.width {
        patch = patch.edge_width(width);
    }
    if let Some(opacity) = args.opacity {
        patch = patch.opacity(opacity);
    }
    if patch.is_empty() {
        bail!("nothing to update; pass at least one field");
    }

    let mut session = open_session(config, &args.sidecar)?;
    session
        .update_arrow(args.row, &patch)
        .with_context(|| format!("update row {}", args.row))?;
    println!("updated row {}", args.row);
    report_save(session.save_current()?);
    Ok(())
}

fn run_delete(args: DeleteArgs, config: AppConfig) -> Result<()> {
    let mut session = open_session(config, &args.sidecar)?;
    session
        .delete_arrow(args.row)
        .with_context(|| format!("delete row {}", args.row))?;
    match session.save_current()? {
        Some(SaveOutcome::SkippedEmpty) => bail!(
            "deleted row {} was the last one, but {} still holds it; \
             an empty store never overwrites an existing sidecar",
            args.row,
            args.sidecar.display()
        ),
        outcome => {
            println!("deleted row {}; later rows moved up by one", args.row);
            report_save(outcome);
            Ok(())
        }
    }
}

fn run_volumes(args: VolumesArgs, config: AppConfig) -> Result<()> {
    let folder = args.folder.unwrap_or_else(|| config.default_path.clone());
    let volumes =
        list_volumes(&folder).with_context(|| format!("list volumes in {}", folder.display()))?;
    if volumes.is_empty() {
        println!("no TIFF stacks in {}", folder.display());
        return Ok(());
    }

    for volume in volumes {
        let sidecar = sidecar_path(&volume);
        let mut store = ArrowStore::new();
        let status = match load_sidecar(&mut store, &sidecar) {
            Ok(LoadOutcome::Loaded { count }) => format!("{count} arrows"),
            Ok(LoadOutcome::Missing) => "no sidecar".to_string(),
            Err(err) => {
                warn!(path = %sidecar.display(), error = %err, "unreadable sidecar");
                "unreadable sidecar".to_string()
            }
        };
        println!("{}  {status}", volume.display());
    }
    Ok(())
}

fn run_snapshot_save(args: SnapshotSaveArgs, config: AppConfig) -> Result<()> {
    let state = ViewState {
        dims_point: parse_list(&args.dims, "dims")?,
        camera_center: parse_vec3(&args.center, "center")?,
        camera_angles: parse_vec3(&args.angles, "angles")?,
        camera_zoom: args.zoom,
    };
    if !(state.camera_zoom > 0.0) || !state.camera_zoom.is_finite() {
        bail!("--zoom must be > 0");
    }

    let session = open_volume(config, &args.volume)?;
    match session.save_view(&state)? {
        Some(path) => println!("snapshot saved to {}", path.display()),
        None => bail!("no volume open for {}", args.volume.display()),
    }
    Ok(())
}

fn run_snapshot_restore(args: SnapshotRestoreArgs, config: AppConfig) -> Result<()> {
    let session = open_volume(config, &args.volume)?;
    let Some(state) = session.restore_view()? else {
        bail!("no snapshot stored for {}", args.volume.display());
    };
    let dims: Vec<String> = state.dims_point.iter().map(|v| format!("{v:.3}")).collect();
    println!("dims:   {}", dims.join(", "));
    println!("center: {}", state.camera_center);
    println!("angles: {}", state.camera_angles);
    println!("zoom:   {:.3}", state.camera_zoom);
    Ok(())
}

fn open_volume(config: AppConfig, volume: &Path) -> Result<Session> {
    let mut session = Session::new(config);
    session
        .open_volume(volume)
        .with_context(|| format!("open volume {}", volume.display()))?;
    Ok(session)
}

fn open_session(config: AppConfig, sidecar: &Path) -> Result<Session> {
    let mut session = Session::new(config);
    session
        .open_sidecar(sidecar)
        .with_context(|| format!("open sidecar {}", sidecar.display()))?;
    Ok(session)
}

fn report_save(outcome: Option<SaveOutcome>) {
    match outcome {
        Some(SaveOutcome::Written { count }) => info!(count, "sidecar written"),
        Some(SaveOutcome::SkippedEmpty) => {
            println!("store is empty; existing sidecar left unchanged")
        }
        None => {}
    }
}

fn parse_list(text: &str, name: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid number in --{name}"))
}

fn parse_numbers(text: &str, expected: usize, name: &str) -> Result<Vec<f64>> {
    let values = parse_list(text, name)?;
    if values.len() != expected {
        bail!("--{name} expects {expected} comma-separated numbers");
    }
    Ok(values)
}

fn parse_vec3(text: &str, name: &str) -> Result<Vec3> {
    let values = parse_numbers(text, 3, name)?;
    Ok(Vec3::new(values[0], values[1], values[2]))
}

fn parse_screen(text: &str) -> Result<ScreenPos> {
    let values = parse_numbers(text, 2, "pos")?;
    Ok(ScreenPos::new(values[0], values[1]))
}

fn parse_matrix(text: &str) -> Result<Matrix4<f64>> {
    let values = parse_numbers(text, 16, "inverse")?;
    let mut rows = [[0.0; 4]; 4];
    for (index, value) in values.into_iter().enumerate() {
        rows[index / 4][index % 4] = value;
    }
    Ok(matrix_from_rows(rows))
}
