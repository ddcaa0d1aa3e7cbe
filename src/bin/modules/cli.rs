use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const ABOUT: &str = "Energy expectation values of the bonding and antibonding states of a two-center one-electron system.";
const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser)]
#[command(version, about = ABOUT, help_template = HELP_TEMPLATE)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub calculation: CalculationOptions,

    #[command(flatten)]
    pub quadrature: QuadratureOptions,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Integrate the energy density of both states and report the energies in eV.
    Energy,
    /// Integrate the probability density of both states.
    Normalization {
        /// Use the unnormalized density and report the implied normalization constants.
        #[arg(long)]
        raw: bool,
    },
    /// Print the symbolically derived Laplacians of both states.
    Laplacian {
        /// Substitute the configured orbital length and separation.
        #[arg(long)]
        substitute: bool,
    },
}

/// Options for controlling the output format and destination.
#[derive(Args)]
#[command(next_help_heading = "Output Options")]
pub struct OutputOptions {
    /// Output file path.
    ///
    /// If not specified, results are written to standard output.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Output format for the results.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    pub format: OutputFormat,

    /// Number of decimal places to display for floating-point values.
    #[arg(short, long, default_value_t = 6, global = true)]
    pub precision: usize,
}

/// Options for controlling the physical model.
#[derive(Args)]
#[command(next_help_heading = "Calculation Options")]
pub struct CalculationOptions {
    /// Custom configuration file in TOML format.
    ///
    /// If not specified, the built-in defaults are used.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// How the Laplacian of the wavefunction is evaluated.
    #[arg(long, value_enum, default_value_t = LaplacianArg::Analytic, global = true)]
    pub laplacian: LaplacianArg,

    /// Step of the finite-difference Laplacian in meters.
    #[arg(long, default_value_t = 1e-12, global = true)]
    pub step: f64,

    /// Fail if an integral does not reach the requested tolerance.
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Options for controlling the quadrature.
#[derive(Args)]
#[command(next_help_heading = "Quadrature Options")]
pub struct QuadratureOptions {
    /// Absolute error target of every 1-D integral, in units of the orbital length.
    #[arg(long, default_value_t = 1e-10, global = true)]
    pub abs_tol: f64,

    /// Relative error target of every 1-D integral.
    #[arg(long, default_value_t = 1e-6, global = true)]
    pub rel_tol: f64,

    /// Maximum number of bisections per 1-D integral.
    #[arg(long, default_value_t = 50, global = true)]
    pub max_subdivisions: usize,

    /// Evaluate on a single thread.
    #[arg(long, global = true)]
    pub serial: bool,
}

/// Output format for the calculation results.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Boxed tables with values, error estimates and convergence.
    Pretty,
    /// Labeled values, one per line.
    Plain,
    /// JSON array of reports.
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LaplacianArg {
    /// Exact 1s Laplacians in closed form.
    Analytic,
    /// Expression derived symbolically at startup.
    Symbolic,
    /// Seven-point central differences.
    FiniteDifference,
}
