//! Symbolic differentiation of the trial wavefunctions.
//!
//! `expr` provides the expression tree and its calculus; `derivation` builds the bonding
//! and antibonding states from it and derives their Laplacians, either for printing or
//! for evaluation inside the energy integrand.

mod derivation;
mod expr;

pub use derivation::{
    CompiledLaplacian, LENGTH_SYMBOL, SEPARATION_SYMBOL, SPATIAL_VARIABLES, derive_laplacian,
    laplacian, molecular_orbital_expr, orbital_expr,
};
pub use expr::Expr;
