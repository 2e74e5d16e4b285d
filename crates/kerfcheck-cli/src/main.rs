//! kerfcheck CLI — command-line interface for cut-part silhouette inspection.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use kerfcheck::synthetic::{encode_png, Edge, EdgeDefect, PartSpec};
use kerfcheck::{AttributeBundle, InspectConfig, Inspector, Verdict, VerdictStatus};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "kerfcheck")]
#[command(about = "Inspect cut-part silhouettes against a reference and classify defects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one or more part images against a reference image.
    Inspect(CliInspectArgs),

    /// Classify a defect from operator-supplied attributes.
    Classify(CliClassifyArgs),

    /// Write synthetic reference, good and burred part images.
    Generate(CliGenerateArgs),
}

#[derive(Debug, Clone, Args)]
struct CliInspectArgs {
    /// Path to the known-good reference image.
    #[arg(long)]
    reference: PathBuf,

    /// Part image(s) to inspect. Repeat for a batch.
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Path to write verdicts (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Inspection config (JSON). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deviation tolerance in pixels.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Binarization threshold (intensity >= threshold is foreground).
    #[arg(long)]
    threshold: Option<u8>,

    /// Gaussian pre-smoothing sigma in pixels (disabled when omitted).
    #[arg(long)]
    smoothing_sigma: Option<f32>,
}

impl CliInspectArgs {
    fn to_config(&self) -> CliResult<InspectConfig> {
        let mut config = match &self.config {
            Some(path) => InspectConfig::from_json_file(path)?,
            None => InspectConfig::default(),
        };
        if let Some(tolerance) = self.tolerance {
            config.tolerance_px = tolerance;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.smoothing_sigma.is_some() {
            config.smoothing_sigma = self.smoothing_sigma;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
struct CliClassifyArgs {
    /// Attribute bundle (JSON). Flags below override its fields.
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Free-text defect description.
    #[arg(long)]
    description: Option<String>,

    /// Edge color descriptor (e.g. "dark").
    #[arg(long)]
    edge_color: Option<String>,

    /// Edge characteristic descriptor (e.g. "burr").
    #[arg(long)]
    edge_characteristic: Option<String>,

    /// Measured cut depth (mm).
    #[arg(long)]
    cut_depth: Option<f64>,

    /// Material thickness (mm).
    #[arg(long)]
    thickness: Option<f64>,

    /// Dimensions out of the allowed range.
    #[arg(long)]
    dimension_out_of_range: bool,

    /// Machine fault reported.
    #[arg(long)]
    machine_fault: bool,

    /// Part misaligned.
    #[arg(long)]
    misaligned: bool,

    /// Material deformed by heat.
    #[arg(long)]
    heat_deformed: bool,
}

impl CliClassifyArgs {
    fn to_bundle(&self) -> CliResult<AttributeBundle> {
        let mut bundle = match &self.bundle {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => AttributeBundle::default(),
        };
        if let Some(v) = &self.description {
            bundle.description = v.clone();
        }
        if let Some(v) = &self.edge_color {
            bundle.edge_color = v.clone();
        }
        if let Some(v) = &self.edge_characteristic {
            bundle.edge_characteristic = v.clone();
        }
        if self.cut_depth.is_some() {
            bundle.cut_depth = self.cut_depth;
        }
        if self.thickness.is_some() {
            bundle.material_thickness = self.thickness;
        }
        bundle.dimension_out_of_range |= self.dimension_out_of_range;
        bundle.machine_fault |= self.machine_fault;
        bundle.misaligned |= self.misaligned;
        bundle.heat_deformed |= self.heat_deformed;
        Ok(bundle)
    }
}

#[derive(Debug, Clone, Args)]
struct CliGenerateArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Canvas side in pixels.
    #[arg(long, default_value = "600")]
    size: u32,

    /// Part side in pixels.
    #[arg(long, default_value = "300")]
    part: u32,

    /// Burr width and depth in pixels.
    #[arg(long, default_value = "10")]
    burr: u32,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => run_inspect(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Generate(args) => run_generate(&args),
    }
}

// ── inspect ────────────────────────────────────────────────────────────

fn run_inspect(args: &CliInspectArgs) -> CliResult<()> {
    let config = args.to_config()?;
    tracing::info!(
        "threshold={} tolerance={}px smoothing={:?}",
        config.threshold,
        config.tolerance_px,
        config.smoothing_sigma
    );

    let inspector = Inspector::new(config)?;
    tracing::info!("Loading reference: {}", args.reference.display());
    inspector.load_reference_file(&args.reference)?;

    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let bytes = std::fs::read(path).map_err(|e| -> CliError {
            format!("Failed to read image {}: {}", path.display(), e).into()
        })?;
        images.push(bytes);
    }

    let verdicts: Vec<Verdict> = if images.len() == 1 {
        vec![inspector.inspect(&images[0])]
    } else {
        inspector.inspect_batch(&images)
    };

    for (path, verdict) in args.images.iter().zip(&verdicts) {
        match verdict.status {
            VerdictStatus::Pass => tracing::info!("{}: {}", path.display(), verdict.message),
            VerdictStatus::Fail => tracing::warn!("{}: {}", path.display(), verdict.message),
            VerdictStatus::Error => tracing::error!("{}: {}", path.display(), verdict.message),
        }
    }

    let json = if verdicts.len() == 1 {
        serde_json::to_string_pretty(&verdicts[0])?
    } else {
        serde_json::to_string_pretty(&verdicts)?
    };
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            tracing::info!("Verdicts written to {}", out.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

// ── classify ───────────────────────────────────────────────────────────

fn run_classify(args: &CliClassifyArgs) -> CliResult<()> {
    let bundle = args.to_bundle()?;
    let (category, rule) = kerfcheck::classify_explained(&bundle);
    println!("category: {category}");
    println!("rule:     {rule}");
    Ok(())
}

// ── generate ───────────────────────────────────────────────────────────

fn run_generate(args: &CliGenerateArgs) -> CliResult<()> {
    let needed = args
        .burr
        .checked_mul(2)
        .and_then(|b| b.checked_add(args.part));
    if args.part == 0 || needed.map_or(true, |n| n > args.size) {
        return Err(format!(
            "part {}px with burr {}px does not fit a {}px canvas",
            args.part, args.burr, args.size
        )
        .into());
    }
    std::fs::create_dir_all(&args.out_dir)?;

    let base = PartSpec::new(args.size, args.part);
    let burred = base
        .clone()
        .with_defect(EdgeDefect::burr(Edge::Right, args.burr, args.burr));

    write_png(&args.out_dir.join("reference.png"), &base)?;
    write_png(&args.out_dir.join("part_ok.png"), &base)?;
    write_png(&args.out_dir.join("part_burr.png"), &burred)?;
    Ok(())
}

fn write_png(path: &Path, spec: &PartSpec) -> CliResult<()> {
    let bytes = encode_png(&spec.render())?;
    std::fs::write(path, bytes)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
