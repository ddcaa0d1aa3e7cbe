//! Run configuration and utilities for loading it from TOML files.
//!
//! A [`Config`] bundles everything that is fixed for a run: the physical constants, the
//! two model lengths with the empirical normalization constants, the integration box and
//! the energy unit conversion. It is built once, validated, and passed by reference into
//! the model and the driver; nothing reads ambient module-level state.

use super::error::LcaoError;
use crate::math::constants;
use crate::types::IntegrationDomain;
use serde::Deserialize;
use std::path::Path;

/// Fundamental constants in SI units.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Reduced Planck constant in J s.
    pub hbar: f64,
    /// Electron rest mass in kg.
    pub electron_mass: f64,
    /// Vacuum permittivity in F/m.
    pub vacuum_permittivity: f64,
    /// Elementary charge in C.
    pub elementary_charge: f64,
}

impl PhysicalConstants {
    /// The prefactor `hbar^2 / (2 m_e)` of the kinetic-energy operator.
    #[inline]
    pub fn kinetic_prefactor(&self) -> f64 {
        self.hbar * self.hbar / (2.0 * self.electron_mass)
    }

    /// The Coulomb coupling `e^2 / (4 pi eps0)` in J m.
    #[inline]
    pub fn coulomb_coupling(&self) -> f64 {
        self.elementary_charge * self.elementary_charge
            / (4.0 * std::f64::consts::PI * self.vacuum_permittivity)
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            hbar: constants::HBAR,
            electron_mass: constants::ELECTRON_MASS,
            vacuum_permittivity: constants::VACUUM_PERMITTIVITY,
            elementary_charge: constants::ELEMENTARY_CHARGE,
        }
    }
}

/// Parameters of the two-center trial wavefunctions.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    /// Length scale `a` of each 1s orbital, in meters.
    pub bohr_radius: f64,
    /// Distance `L` between the centers at `(0, 0, 0)` and `(L, 0, 0)`, in meters.
    pub separation: f64,
    /// Prefactor of the symmetric combination.
    pub bonding_normalization: f64,
    /// Prefactor of the antisymmetric combination.
    pub antibonding_normalization: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            bohr_radius: constants::BOHR_RADIUS,
            separation: constants::CENTER_SEPARATION,
            bonding_normalization: constants::BONDING_NORMALIZATION,
            antibonding_normalization: constants::ANTIBONDING_NORMALIZATION,
        }
    }
}

/// Integration bounds per axis, in meters, as written in the configuration file.
///
/// Converted into a validated [`IntegrationDomain`] by [`DomainBounds::to_domain`].
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl DomainBounds {
    pub fn to_domain(&self) -> Result<IntegrationDomain, LcaoError> {
        IntegrationDomain::new(self.x, self.y, self.z)
    }
}

impl Default for DomainBounds {
    fn default() -> Self {
        let bounds = [-constants::DOMAIN_HALF_WIDTH, constants::DOMAIN_HALF_WIDTH];
        Self {
            x: bounds,
            y: bounds,
            z: bounds,
        }
    }
}

/// Unit conversion applied when reporting energies.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    /// Electron volts per joule.
    pub ev_per_joule: f64,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self {
            ev_per_joule: constants::EV_PER_JOULE,
        }
    }
}

/// The complete, immutable configuration of a run.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub constants: PhysicalConstants,
    #[serde(default)]
    pub model: ModelParameters,
    #[serde(default)]
    pub domain: DomainBounds,
    #[serde(default)]
    pub units: UnitConversion,
}

impl Config {
    /// Loads a configuration from a TOML file.
    ///
    /// Every table is optional; missing tables fall back to their defaults. The loaded
    /// configuration is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::IoError` if the file cannot be read,
    /// `LcaoError::DeserializationError` if it is not valid TOML for this layout, and
    /// `LcaoError::InvalidConfig`/`LcaoError::InvalidDomain` if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lcao::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load_from_file(Path::new("h2plus.toml")).unwrap();
    /// ```
    pub fn load_from_file(path: &Path) -> Result<Self, LcaoError> {
        let content = std::fs::read_to_string(path).map_err(|io_error| LcaoError::IoError {
            path: path.to_path_buf(),
            source: io_error,
        })?;

        Self::load_from_str(&content)
    }

    /// Parses and validates a configuration from a TOML string.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::Config;
    ///
    /// let toml_data = r#"
    /// [model]
    /// bohr_radius = 5.29e-11
    /// separation = 2.0e-10
    /// bonding_normalization = 0.6
    /// antibonding_normalization = 0.9
    ///
    /// [domain]
    /// x = [-5.0e-9, 5.0e-9]
    /// y = [-5.0e-9, 5.0e-9]
    /// z = [-5.0e-9, 5.0e-9]
    /// "#;
    ///
    /// let config = Config::load_from_str(toml_data).unwrap();
    /// assert_eq!(config.model.separation, 2.0e-10);
    /// assert_eq!(config.units.ev_per_joule, 6.24e18);
    /// ```
    pub fn load_from_str(toml_str: &str) -> Result<Self, LcaoError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value before any integration starts.
    ///
    /// Constants, lengths, normalization constants and the unit factor must be finite
    /// and strictly positive; the domain must be a proper box.
    pub fn validate(&self) -> Result<(), LcaoError> {
        require_positive("constants.hbar", self.constants.hbar)?;
        require_positive("constants.electron_mass", self.constants.electron_mass)?;
        require_positive(
            "constants.vacuum_permittivity",
            self.constants.vacuum_permittivity,
        )?;
        require_positive(
            "constants.elementary_charge",
            self.constants.elementary_charge,
        )?;
        require_positive("model.bohr_radius", self.model.bohr_radius)?;
        require_positive("model.separation", self.model.separation)?;
        require_positive(
            "model.bonding_normalization",
            self.model.bonding_normalization,
        )?;
        require_positive(
            "model.antibonding_normalization",
            self.model.antibonding_normalization,
        )?;
        require_positive("units.ev_per_joule", self.units.ev_per_joule)?;
        self.domain.to_domain()?;
        Ok(())
    }

    /// The validated integration box.
    pub fn integration_domain(&self) -> Result<IntegrationDomain, LcaoError> {
        self.domain.to_domain()
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), LcaoError> {
    if !value.is_finite() {
        return Err(LcaoError::InvalidConfig {
            field,
            reason: format!("must be finite, got {}", value),
        });
    }
    if value <= 0.0 {
        return Err(LcaoError::InvalidConfig {
            field,
            reason: format!("must be strictly positive, got {:e}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_toml_string() -> String {
        r#"
        [constants]
        hbar = 1.0
        electron_mass = 1.0
        vacuum_permittivity = 0.07957747154594767
        elementary_charge = 1.0

        [model]
        bohr_radius = 1.0
        separation = 2.0
        bonding_normalization = 0.5615
        antibonding_normalization = 1.0994

        [domain]
        x = [-20.0, 22.0]
        y = [-20.0, 20.0]
        z = [-20.0, 20.0]

        [units]
        ev_per_joule = 27.211386245988
        "#
        .to_string()
    }

    fn get_expected_config() -> Config {
        Config {
            constants: PhysicalConstants {
                hbar: 1.0,
                electron_mass: 1.0,
                vacuum_permittivity: 0.07957747154594767,
                elementary_charge: 1.0,
            },
            model: ModelParameters {
                bohr_radius: 1.0,
                separation: 2.0,
                bonding_normalization: 0.5615,
                antibonding_normalization: 1.0994,
            },
            domain: DomainBounds {
                x: [-20.0, 22.0],
                y: [-20.0, 20.0],
                z: [-20.0, 20.0],
            },
            units: UnitConversion {
                ev_per_joule: 27.211386245988,
            },
        }
    }

    #[test]
    fn test_load_from_str_valid() {
        let toml_str = create_test_toml_string();
        let config = Config::load_from_str(&toml_str).unwrap();
        assert_eq!(config, get_expected_config());
    }

    #[test]
    fn test_load_from_str_missing_tables_use_defaults() {
        let config = Config::load_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model.bonding_normalization, 0.562);
        assert_eq!(config.domain.z, [-1.0e-8, 1.0e-8]);
    }

    #[test]
    fn test_load_from_str_invalid_toml() {
        let result = Config::load_from_str("this is not valid toml");
        assert!(matches!(result, Err(LcaoError::DeserializationError(_))));
    }

    #[test]
    fn test_load_from_str_missing_field() {
        let toml_str = r#"
        [model]
        bohr_radius = 5.29e-11
        separation = 1.06e-10
        bonding_normalization = 0.562
        "#;
        let result = Config::load_from_str(toml_str);
        assert!(matches!(result, Err(LcaoError::DeserializationError(_))));
    }

    #[test]
    fn test_load_from_str_rejects_non_positive_length() {
        let toml_str = r#"
        [model]
        bohr_radius = 0.0
        separation = 1.06e-10
        bonding_normalization = 0.562
        antibonding_normalization = 1.10
        "#;
        let result = Config::load_from_str(toml_str);
        match result {
            Err(LcaoError::InvalidConfig { field, .. }) => assert_eq!(field, "model.bohr_radius"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_str_rejects_zero_width_domain() {
        let toml_str = r#"
        [domain]
        x = [-1.0e-8, 1.0e-8]
        y = [1.0e-9, 1.0e-9]
        z = [-1.0e-8, 1.0e-8]
        "#;
        let result = Config::load_from_str(toml_str);
        assert!(matches!(
            result,
            Err(LcaoError::InvalidDomain { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_constant() {
        let mut config = Config::default();
        config.constants.hbar = f64::INFINITY;
        let error = config.validate().unwrap_err().to_string();
        assert!(error.contains("constants.hbar"));
        assert!(error.contains("finite"));
    }

    #[test]
    fn test_load_from_file_valid() {
        let toml_str = create_test_toml_string();
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_str).unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config, get_expected_config());
    }

    #[test]
    fn test_load_from_file_not_found() {
        let path = Path::new("non_existent_file.toml");
        let result = Config::load_from_file(path);
        assert!(matches!(result, Err(LcaoError::IoError { .. })));
    }

    #[test]
    fn test_derived_prefactors_in_atomic_units() {
        let config = Config::load_from_str(&create_test_toml_string()).unwrap();
        assert!((config.constants.kinetic_prefactor() - 0.5).abs() < 1e-15);
        assert!((config.constants.coulomb_coupling() - 1.0).abs() < 1e-12);
    }
}
