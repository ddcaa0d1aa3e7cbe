use lcao::{Config, QuadratureOptions, State};

/// The default model on a box of 20 orbital lengths around the two centers.
///
/// The densities have decayed by `exp(-40)` at the faces, so integrals over this box
/// agree with the full default box far below the quadrature tolerance.
pub fn compact_config() -> Config {
    let mut config = Config::default();
    let a = config.model.bohr_radius;
    config.domain.x = [-20.0 * a, 20.0 * a + config.model.separation];
    config.domain.y = [-20.0 * a, 20.0 * a];
    config.domain.z = [-20.0 * a, 20.0 * a];
    config
}

pub fn fast_options() -> QuadratureOptions {
    QuadratureOptions {
        abs_tol: 1e-7,
        rel_tol: 1e-4,
        max_subdivisions: 60,
        parallel: true,
    }
}

/// Loose enough to integrate over the full default box in a test run.
#[allow(dead_code)]
pub fn default_box_options() -> QuadratureOptions {
    QuadratureOptions {
        abs_tol: 1e-6,
        rel_tol: 1e-3,
        max_subdivisions: 60,
        parallel: true,
    }
}

/// Closed-form two-center integrals of 1s orbitals, in units of the orbital length.
struct TwoCenterIntegrals {
    overlap: f64,
    coulomb: f64,
    exchange: f64,
    kinetic_transfer: f64,
}

impl TwoCenterIntegrals {
    fn new(r: f64) -> Self {
        let decay = (-r).exp();
        Self {
            overlap: decay * (1.0 + r + r * r / 3.0),
            coulomb: -1.0 / r + (-2.0 * r).exp() * (1.0 + 1.0 / r),
            exchange: -decay * (1.0 + r),
            kinetic_transfer: decay * (1.0 + r),
        }
    }
}

/// `<psi|psi>` of a state with its configured normalization.
#[allow(dead_code)]
pub fn closed_form_norm(config: &Config, state: State) -> f64 {
    let integrals = TwoCenterIntegrals::new(config.model.separation / config.model.bohr_radius);
    let c = state.normalization(&config.model);
    2.0 * c * c * (1.0 + state.sign() * integrals.overlap)
}

/// `<psi|H|psi>` of a state with its configured normalization, in electron volts.
#[allow(dead_code)]
pub fn closed_form_energy(config: &Config, state: State) -> f64 {
    let a = config.model.bohr_radius;
    let integrals = TwoCenterIntegrals::new(config.model.separation / a);
    let constants = &config.constants;
    let kinetic_unit = 2.0 * constants.kinetic_prefactor() / (a * a);
    let potential_unit = constants.coulomb_coupling() / a;

    let diagonal = 0.5 * kinetic_unit + potential_unit * (integrals.coulomb - 1.0);
    let off_diagonal = kinetic_unit
        * (integrals.kinetic_transfer - 0.5 * integrals.overlap)
        + 2.0 * potential_unit * integrals.exchange;

    let c = state.normalization(&config.model);
    let joules = 2.0 * c * c * (diagonal + state.sign() * off_diagonal);
    joules * config.units.ev_per_joule
}

pub struct TestCase<'a> {
    pub name: &'a str,
    pub expected: f64,
    pub calculated: f64,
}

/// Prints a comparison table for a group of values and checks every relative error.
pub fn check_group(group_name: &str, cases: &[TestCase], max_relative: f64) {
    println!("\nRunning Group Test: {}", group_name);
    println!("{:-<80}", "");
    println!(
        "{:<28} | {:<16} | {:<16} | {:<10}",
        "Quantity", "Expected", "Calculated", "Rel. Err"
    );

    let mut worst: f64 = 0.0;
    for case in cases {
        let error = ((case.calculated - case.expected) / case.expected).abs();
        println!(
            "{:<28} | {:<16.8} | {:<16.8} | {:.2e}",
            case.name, case.expected, case.calculated, error
        );
        worst = worst.max(error);
    }
    println!("{:-<80}", "");
    println!(
        "  Max Relative Error: {:.2e} (Limit: {:.2e})\n",
        worst, max_relative
    );

    for case in cases {
        let error = ((case.calculated - case.expected) / case.expected).abs();
        assert!(
            error <= max_relative,
            "{}: expected {}, calculated {} (relative error {:.2e} exceeds {:.2e})",
            case.name,
            case.expected,
            case.calculated,
            error,
            max_relative
        );
    }
}
