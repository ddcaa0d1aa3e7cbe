//! Numerical integration of scalar fields over boxes.
//!
//! The engine is a nested, globally adaptive Gauss-Kronrod quadrature: `rule` holds the
//! G7K15 panel rule, `adaptive` the 1-D bisection driver, and `implementation` the
//! `Integrator` that stacks three 1-D integrals into a triple integral.

mod adaptive;
mod implementation;
mod options;
mod rule;

pub use adaptive::{AdaptiveOutcome, integrate_adaptive};
pub use implementation::Integrator;
pub use options::{NESTED_TOLERANCE_FRACTION, QuadratureOptions};
pub use rule::{Estimate, NODES_PER_PANEL, Panel, evaluate_panel};
