use super::cli::{Cli, Command, LaplacianArg};
use super::error::CliError;
use super::io::{self, DerivedLaplacian};
use indicatif::{ProgressBar, ProgressStyle};
use lcao::symbolic::{LENGTH_SYMBOL, SEPARATION_SYMBOL, derive_laplacian};
use lcao::{
    Calculation, Config, DensityKind, LaplacianMethod, QuadratureOptions, State,
    get_default_config,
};

pub fn run(args: Cli) -> Result<(), CliError> {
    init_logging(args.verbose);

    let config = match &args.calculation.config {
        Some(path) => Config::load_from_file(path)?,
        None => *get_default_config(),
    };

    let options = QuadratureOptions {
        abs_tol: args.quadrature.abs_tol,
        rel_tol: args.quadrature.rel_tol,
        max_subdivisions: args.quadrature.max_subdivisions,
        parallel: !args.quadrature.serial,
    };
    options.validate()?;

    let laplacian = match args.calculation.laplacian {
        LaplacianArg::Analytic => LaplacianMethod::Analytic,
        LaplacianArg::Symbolic => LaplacianMethod::Symbolic,
        LaplacianArg::FiniteDifference => LaplacianMethod::FiniteDifference {
            step: args.calculation.step,
        },
    };

    let calculation = Calculation::new(&config)
        .with_options(options)
        .with_laplacian(laplacian)
        .with_strict(args.calculation.strict);

    match args.command {
        Command::Energy => {
            let reports = with_spinner("Integrating energy densities...", || {
                calculation.energies()
            })?;
            let writer = io::get_writer(&args.output.output)?;
            io::write_energies(writer, &reports, &args.output)?;
        }
        Command::Normalization { raw } => {
            let kind = if raw {
                DensityKind::Raw
            } else {
                DensityKind::Normalized
            };
            let reports = with_spinner("Integrating probability densities...", || {
                calculation.normalizations(kind)
            })?;
            let writer = io::get_writer(&args.output.output)?;
            io::write_normalizations(writer, &reports, &args.output)?;
        }
        Command::Laplacian { substitute } => {
            let derived: Vec<DerivedLaplacian> = State::ALL
                .iter()
                .map(|&state| {
                    let mut expr = derive_laplacian(state, state.normalization(&config.model));
                    if substitute {
                        expr = expr
                            .substitute(LENGTH_SYMBOL, config.model.bohr_radius)
                            .substitute(SEPARATION_SYMBOL, config.model.separation);
                    }
                    DerivedLaplacian {
                        state,
                        expression: expr.to_string(),
                    }
                })
                .collect();
            let writer = io::get_writer(&args.output.output)?;
            io::write_laplacians(writer, &derived, &args.output)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn with_spinner<T>(
    message: &'static str,
    task: impl FnOnce() -> Result<T, lcao::LcaoError>,
) -> Result<T, CliError> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = task();

    pb.finish_and_clear();
    Ok(result?)
}
