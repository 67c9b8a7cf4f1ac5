use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arrowmark")]
#[command(about = "Place and edit 3D arrow annotations on TIFF stacks")]
pub struct CliArgs {
    /// Application config; defaults apply when the file is absent.
    #[arg(long, global = true, default_value = "config.json")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Cast the world-space ray under a canvas position.
    Unproject(UnprojectArgs),
    /// Closest-approach midpoint of two rays.
    Triangulate(TriangulateArgs),
    /// Pick two canvas positions and append the resulting arrow to a sidecar.
    Pick(PickArgs),
    List(ListArgs),
    Add(AddArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
    /// List the TIFF stacks of a folder with their arrow counts.
    Volumes(VolumesArgs),
    /// Save or restore the camera snapshot of a TIFF stack.
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
pub struct UnprojectArgs {
    /// Canvas position as `x,y`.
    #[arg(long)]
    pub pos: String,
    /// Inverse screen transform, 16 comma-separated values in row-major order.
    #[arg(long)]
    pub inverse: String,
}

#[derive(Args)]
pub struct TriangulateArgs {
    #[arg(long)]
    pub first_origin: String,
    #[arg(long)]
    pub first_dir: String,
    #[arg(long)]
    pub second_origin: String,
    #[arg(long)]
    pub second_dir: String,
}

#[derive(Args)]
pub struct PickArgs {
    #[arg(long)]
    pub sidecar: PathBuf,
    #[arg(long)]
    pub inverse: String,
    /// Canvas position of the first click, `x,y`.
    #[arg(long)]
    pub first: String,
    /// Canvas position of the second click, `x,y`.
    #[arg(long)]
    pub second: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub sidecar: PathBuf,
    /// Also print arrow tips in voxel indices.
    #[arg(long)]
    pub voxel: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub sidecar: PathBuf,
    /// Tip position `z,y,x`.
    #[arg(long)]
    pub end: String,
    /// Direction `dz,dy,dx`; the configured default when omitted.
    #[arg(long)]
    pub direction: Option<String>,
    #[arg(long)]
    pub length: Option<f64>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub width: Option<f64>,
    #[arg(long)]
    pub opacity: Option<f64>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub sidecar: PathBuf,
    #[arg(long)]
    pub row: usize,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub direction: Option<String>,
    #[arg(long)]
    pub length: Option<f64>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub width: Option<f64>,
    #[arg(long)]
    pub opacity: Option<f64>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(long)]
    pub sidecar: PathBuf,
    #[arg(long)]
    pub row: usize,
}

#[derive(Args)]
pub struct VolumesArgs {
    /// Folder to scan; the configured `default_path` when omitted.
    #[arg(long)]
    pub folder: Option<PathBuf>,
}

#[derive(Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub action: SnapshotAction,
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    Save(SnapshotSaveArgs),
    /// Print the stored snapshot.
    Restore(SnapshotRestoreArgs),
}

#[derive(Args)]
pub struct SnapshotSaveArgs {
    /// The TIFF stack the snapshot belongs to.
    #[arg(long)]
    pub volume: PathBuf,
    /// Slider positions, one comma-separated value per dimension.
    #[arg(long)]
    pub dims: String,
    /// Camera center `z,y,x`.
    #[arg(long)]
    pub center: String,
    /// Camera Euler angles in degrees.
    #[arg(long)]
    pub angles: String,
    #[arg(long)]
    pub zoom: f64,
}

#[derive(Args)]
pub struct SnapshotRestoreArgs {
    #[arg(long)]
    pub volume: PathBuf,
}
