pub mod config;
pub mod driver;
pub mod error;
pub mod math;
pub mod model;
pub mod quadrature;
pub mod symbolic;
pub mod types;

pub use config::Config;
pub use driver::{Calculation, DensityKind, EnergyReport, NormalizationReport};
pub use error::LcaoError;
pub use model::{LaplacianMethod, State};
pub use quadrature::{Integrator, QuadratureOptions};
pub use types::{FnField, IntegrationDomain, IntegrationResult, Interval, ScalarField};

use std::sync::OnceLock;

static DEFAULT_CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_default_config() -> &'static Config {
    DEFAULT_CONFIG.get_or_init(|| {
        const DEFAULT_CONFIG_TOML: &str = include_str!("../resources/default.toml");
        Config::load_from_str(DEFAULT_CONFIG_TOML)
            .expect("Failed to parse embedded default configuration. This is a library bug.")
    })
}
