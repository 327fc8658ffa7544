use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;
use wellplate::core::models::experiment::{HeatmapMode, LayoutDirection};
use wellplate::core::models::plate::PlateFormat;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "WellPlate Pal Developers",
    version,
    about = "WellPlate CLI - Design microplate layouts, import plate-reader data, and analyze assays from the command line.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a plate layout from a TOML design file and write a new session.
    Design(DesignArgs),
    /// Paste a plate-reader grid (tab or comma separated) into a session.
    Import(ImportArgs),
    /// Assign wells to a group, renumbering replicates.
    Paint(PaintArgs),
    /// Clear wells, renumbering the replicates of the groups they held.
    Erase(EraseArgs),
    /// Summarize every measured group against the blank and positive controls.
    Analyze(AnalyzeArgs),
    /// Compute the Z'-factor between a positive and a negative control group.
    ZFactor(ZFactorArgs),
    /// Estimate IC50 and Hill slope for a dose-response group.
    DoseResponse(DoseResponseArgs),
    /// Write the layout and, optionally, the group results as CSV.
    Export(ExportArgs),
}

/// The session file a command reads, and writes back when it edits state.
#[derive(Args, Debug)]
pub struct SessionArg {
    /// Path to the session JSON file.
    #[arg(short = 's', long = "session", required = true, value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Path to the design file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the session JSON file to create.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write the generated layout as CSV.
    #[arg(long, value_name = "PATH")]
    pub layout_csv: Option<PathBuf>,

    // --- Plate Overrides ---
    /// Override the plate format (6, 12, 24, 48 or 96).
    #[arg(short = 'f', long, value_name = "WELLS")]
    pub plate_format: Option<PlateFormat>,

    /// Override the number of replicates per group.
    #[arg(short, long, value_name = "INT")]
    pub replicates: Option<usize>,

    /// Override the fill direction ('by-row' or 'by-column').
    #[arg(short, long, value_name = "DIRECTION")]
    pub direction: Option<LayoutDirection>,

    // --- Randomization Overrides ---
    #[command(flatten)]
    pub randomize: RandomizeFlags,

    /// Seed for a reproducible shuffle. Implies --randomize.
    #[arg(long, value_name = "INT", conflicts_with = "no_randomize")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the design file.
    /// Can be used multiple times. Example: -S plate.replicates=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// A group to handle mutually exclusive randomization flags.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct RandomizeFlags {
    /// Shuffle the generated layout across the occupied wells.
    #[arg(long)]
    pub randomize: bool,
    /// Keep the generated layout in fill order, even if the design file asks for a shuffle.
    #[arg(long)]
    pub no_randomize: bool,
}

/// Arguments for the `import` subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Text file holding the pasted grid, one plate row per line.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub grid: PathBuf,

    /// Target to import into. Created and made active if it does not exist.
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,
}

/// Arguments for the `paint` subcommand.
#[derive(Args, Debug)]
pub struct PaintArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Group to assign.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub group: String,

    /// Wells to paint, in order (e.g., A1 A2 B1).
    #[arg(required = true, value_name = "WELL")]
    pub wells: Vec<String>,
}

/// Arguments for the `erase` subcommand.
#[derive(Args, Debug)]
pub struct EraseArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Wells to clear.
    #[arg(required = true, value_name = "WELL")]
    pub wells: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Override the blank (0%) control group for this run.
    #[arg(long, value_name = "GROUP")]
    pub blank: Option<String>,

    /// Override the positive (100%) control group for this run.
    #[arg(long, value_name = "GROUP")]
    pub positive: Option<String>,

    /// Analyze this target instead of the session's active target.
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,

    /// Print a plate heatmap of raw or normalized values.
    #[arg(long, value_name = "MODE")]
    pub heatmap: Option<HeatmapMode>,

    /// Write the group results as CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `z-factor` subcommand.
#[derive(Args, Debug)]
pub struct ZFactorArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Positive control group.
    #[arg(long, required = true, value_name = "GROUP")]
    pub positive: String,

    /// Negative control group.
    #[arg(long, required = true, value_name = "GROUP")]
    pub negative: String,
}

/// Arguments for the `dose-response` subcommand.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("levels")
        .args(["concentrations", "series"])
        .multiple(false)
))]
pub struct DoseResponseArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Dose-response group to fit.
    #[arg(short, long, required = true, value_name = "GROUP")]
    pub group: String,

    /// Comma-separated concentrations, one per dose level, in plate order.
    #[arg(long, value_name = "LIST")]
    pub concentrations: Option<String>,

    /// Serial dilution as START,FACTOR,POINTS (e.g., 1000,10,4).
    #[arg(long, value_name = "START,FACTOR,POINTS")]
    pub series: Option<String>,

    /// Store the concentrations on the group and write the session back.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Path for the layout CSV.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub layout: PathBuf,

    /// Path for the group results CSV.
    #[arg(short, long, value_name = "PATH")]
    pub results: Option<PathBuf>,
}
