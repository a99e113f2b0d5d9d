//! gt2coco: labeling-job manifests to COCO annotations.
//!
//! gt2coco reads the output manifest of a finished labeling job and writes
//! COCO-style JSON. Three kinds of jobs are supported:
//!
//! - **bounding boxes**: boxes are copied as annotations;
//! - **semantic segmentation**: label images are split into one mask per
//!   legend color and each mask is traced into simplified polygons;
//! - **video object tracking**: per-frame boxes become one document per frame,
//!   grouped by sequence.
//!
//! # Modules
//!
//! - [`catalog`], [`mask`], [`trace`], [`annotate`]: the segmentation engine
//! - [`handlers`]: one manifest handler per task
//! - [`conversion`]: job-level orchestration and the conversion report
//! - [`coco`]: output documents and JSON IO
//! - [`manifest`], [`source`]: manifest parsing and where bytes come from
//! - [`error`]: error types for gt2coco operations

pub mod annotate;
pub mod catalog;
pub mod coco;
pub mod color;
pub mod config;
pub mod conversion;
pub mod error;
pub mod handlers;
pub mod manifest;
pub mod mask;
pub mod raster;
pub mod source;
pub mod trace;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use color::Rgb;
pub use config::ConvertConfig;
pub use conversion::{convert_job, convert_manifest, ConversionReport};
pub use error::{ConvertError, GeometryError};
pub use handlers::{Conversion, Converter, TaskType};

/// The gt2coco CLI application.
#[derive(Parser)]
#[command(name = "gt2coco")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a finished labeling job, selecting the handler from its task keywords.
    ConvertJob(ConvertJobArgs),
    /// Convert a manifest directly with an explicit task.
    ConvertManifest(ConvertManifestArgs),
}

/// Arguments for the convert-job subcommand.
#[derive(clap::Args)]
struct ConvertJobArgs {
    /// Name of the labeling job.
    #[arg(long)]
    job_name: String,

    /// Directory holding job descriptions as `<job-name>.json`.
    #[arg(long, env = "GT2COCO_JOBS_DIR")]
    jobs_dir: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

/// Arguments for the convert-manifest subcommand.
#[derive(clap::Args)]
struct ConvertManifestArgs {
    /// Labeling task the manifest was produced by.
    #[arg(long, value_enum)]
    task: TaskArg,

    /// Manifest location (`s3://bucket/key` or a local path).
    #[arg(long)]
    manifest: String,

    /// Name of the labeling job; selects the per-job manifest keys.
    #[arg(long)]
    job_name: String,

    #[command(flatten)]
    common: CommonArgs,
}

/// Options shared by both conversion subcommands.
#[derive(clap::Args)]
struct CommonArgs {
    /// Output JSON path.
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Local mirror of the object store: `s3://bucket/key` is read from
    /// `<storage-root>/bucket/key`.
    #[arg(long, env = "GT2COCO_STORAGE_ROOT", default_value = ".")]
    storage_root: PathBuf,

    /// Background color of segmentation label images.
    #[arg(long, default_value = "#ffffff")]
    background: Rgb,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

impl CommonArgs {
    fn config(&self) -> ConvertConfig {
        ConvertConfig::default().with_background(self.background)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TaskArg {
    Bbox,
    Segmentation,
    VideoTracking,
}

impl From<TaskArg> for TaskType {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Bbox => TaskType::BoundingBox,
            TaskArg::Segmentation => TaskType::Segmentation,
            TaskArg::VideoTracking => TaskType::VideoTracking,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the gt2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ConvertJob(args)) => run_convert_job(args),
        Some(Commands::ConvertManifest(args)) => run_convert_manifest(args),
        None => {
            println!("gt2coco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert labeling-job manifests into COCO annotations.");
            println!();
            println!("Run 'gt2coco --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert-job subcommand.
fn run_convert_job(args: ConvertJobArgs) -> Result<(), ConvertError> {
    let jobs = source::LocalJobSource::new(&args.jobs_dir);
    let objects = source::LocalObjectSource::new(&args.common.storage_root);

    let conversion = convert_job(&args.job_name, &jobs, &objects, &args.common.config())?;
    finish(conversion, &args.common)
}

/// Execute the convert-manifest subcommand.
fn run_convert_manifest(args: ConvertManifestArgs) -> Result<(), ConvertError> {
    let objects = source::LocalObjectSource::new(&args.common.storage_root);

    let conversion = convert_manifest(
        args.task.into(),
        &args.manifest,
        &args.job_name,
        &objects,
        &args.common.config(),
    )?;
    finish(conversion, &args.common)
}

/// Writes the output, then prints the report.
fn finish(conversion: Conversion, common: &CommonArgs) -> Result<(), ConvertError> {
    conversion::write_output(&common.output, &conversion)?;

    match common.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&conversion.report)
                .map_err(ConvertError::ReportSerialize)?;
            println!("{json}");
        }
        ReportFormat::Text => {
            print!("{}", conversion.report);
            println!("Wrote {}", common.output.display());
        }
    }

    Ok(())
}
