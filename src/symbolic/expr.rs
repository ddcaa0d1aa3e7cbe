//! A small expression tree over real variables.
//!
//! `Expr` supports exactly what the trial wavefunctions need: sums, products and quotients,
//! constant powers, `exp` and `sqrt`. It can be differentiated, simplified, have variables
//! replaced by numbers, be evaluated, and be printed in a conventional infix notation.

use crate::error::LcaoError;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A symbolic real-valued expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(String),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    /// `base ** exponent` with a constant exponent.
    Pow(Box<Expr>, f64),
    Exp(Box<Expr>),
    Sqrt(Box<Expr>),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    pub fn powf(self, exponent: f64) -> Self {
        Expr::Pow(Box::new(self), exponent)
    }

    pub fn exp(self) -> Self {
        Expr::Exp(Box::new(self))
    }

    pub fn sqrt(self) -> Self {
        Expr::Sqrt(Box::new(self))
    }

    /// The partial derivative with respect to `var`, simplified.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::symbolic::Expr;
    ///
    /// let x = Expr::var("x");
    /// let f = (x.clone() * x).exp();
    /// let df = f.diff("x");
    /// let value = df.eval(&[("x", 1.0)]).unwrap();
    /// assert!((value - 2.0 * std::f64::consts::E).abs() < 1e-12);
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        self.derivative(var).simplify()
    }

    fn derivative(&self, var: &str) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(name) => Expr::Const(if name == var { 1.0 } else { 0.0 }),
            Expr::Add(a, b) => a.derivative(var) + b.derivative(var),
            Expr::Sub(a, b) => a.derivative(var) - b.derivative(var),
            Expr::Neg(a) => -a.derivative(var),
            Expr::Mul(a, b) => a.derivative(var) * (**b).clone() + (**a).clone() * b.derivative(var),
            Expr::Div(a, b) => (a.derivative(var) * (**b).clone()
                - (**a).clone() * b.derivative(var))
                / (**b).clone().powf(2.0),
            Expr::Pow(base, exponent) => {
                Expr::Const(*exponent) * (**base).clone().powf(exponent - 1.0) * base.derivative(var)
            }
            Expr::Exp(a) => self.clone() * a.derivative(var),
            Expr::Sqrt(a) => a.derivative(var) / (Expr::Const(2.0) * self.clone()),
        }
    }

    /// Folds constants and removes neutral elements, bottom-up.
    ///
    /// This is not a canonical form: it only cleans up what differentiation produces, so
    /// that printed Laplacians stay readable and evaluation does less work.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Add(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Const(x), Expr::Const(y)) => Expr::Const(x + y),
                (Expr::Const(z), e) | (e, Expr::Const(z)) if z == 0.0 => e,
                (a, Expr::Neg(b)) => Expr::Sub(Box::new(a), b),
                (a, b) => a + b,
            },
            Expr::Sub(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Const(x), Expr::Const(y)) => Expr::Const(x - y),
                (e, Expr::Const(z)) if z == 0.0 => e,
                (Expr::Const(z), e) if z == 0.0 => (-e).simplify(),
                (a, Expr::Neg(b)) => Expr::Add(Box::new(a), b),
                (a, b) => a - b,
            },
            Expr::Mul(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Const(x), Expr::Const(y)) => Expr::Const(x * y),
                (Expr::Const(z), _) | (_, Expr::Const(z)) if z == 0.0 => Expr::Const(0.0),
                (Expr::Const(o), e) | (e, Expr::Const(o)) if o == 1.0 => e,
                (Expr::Const(m), e) | (e, Expr::Const(m)) if m == -1.0 => (-e).simplify(),
                (Expr::Const(x), Expr::Mul(c, e)) => match *c {
                    Expr::Const(y) => Expr::Const(x * y) * *e,
                    c => Expr::Const(x) * (c * *e),
                },
                (e, Expr::Const(c)) => Expr::Const(c) * e,
                (Expr::Neg(a), Expr::Neg(b)) => (*a * *b).simplify(),
                (Expr::Neg(a), b) | (b, Expr::Neg(a)) => -(*a * b).simplify(),
                (a, b) => a * b,
            },
            Expr::Div(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Const(x), Expr::Const(y)) if y != 0.0 => Expr::Const(x / y),
                (Expr::Const(z), _) if z == 0.0 => Expr::Const(0.0),
                (e, Expr::Const(o)) if o == 1.0 => e,
                (Expr::Neg(a), b) => -(*a / b),
                (a, b) => a / b,
            },
            Expr::Neg(a) => match a.simplify() {
                Expr::Const(x) => Expr::Const(-x),
                Expr::Neg(inner) => *inner,
                e => -e,
            },
            Expr::Pow(base, exponent) => match (base.simplify(), *exponent) {
                (_, e) if e == 0.0 => Expr::Const(1.0),
                (b, e) if e == 1.0 => b,
                (Expr::Const(x), e) => Expr::Const(pow(x, e)),
                // Only integer outer exponents commute with an inner power for every base.
                (Expr::Pow(inner, e1), e2) if e2.fract() == 0.0 => {
                    Expr::Pow(inner, e1 * e2).simplify()
                }
                (Expr::Sqrt(inner), e) => Expr::Pow(inner, 0.5 * e).simplify(),
                (b, e) => b.powf(e),
            },
            Expr::Exp(a) => match a.simplify() {
                Expr::Const(x) => Expr::Const(x.exp()),
                e => e.exp(),
            },
            Expr::Sqrt(a) => match a.simplify() {
                Expr::Const(x) if x >= 0.0 => Expr::Const(x.sqrt()),
                e => e.sqrt(),
            },
        }
    }

    /// Replaces every occurrence of `var` with the constant `value`, then simplifies.
    pub fn substitute(&self, var: &str, value: f64) -> Expr {
        self.replace(var, value).simplify()
    }

    fn replace(&self, var: &str, value: f64) -> Expr {
        let r = |e: &Expr| Box::new(e.replace(var, value));
        match self {
            Expr::Const(_) => self.clone(),
            Expr::Var(name) if name == var => Expr::Const(value),
            Expr::Var(_) => self.clone(),
            Expr::Add(a, b) => Expr::Add(r(a), r(b)),
            Expr::Sub(a, b) => Expr::Sub(r(a), r(b)),
            Expr::Mul(a, b) => Expr::Mul(r(a), r(b)),
            Expr::Div(a, b) => Expr::Div(r(a), r(b)),
            Expr::Neg(a) => Expr::Neg(r(a)),
            Expr::Pow(a, e) => Expr::Pow(r(a), *e),
            Expr::Exp(a) => Expr::Exp(r(a)),
            Expr::Sqrt(a) => Expr::Sqrt(r(a)),
        }
    }

    /// Evaluates the expression with the given variable bindings.
    ///
    /// Bindings are looked up by linear scan, which is the fastest option for the three
    /// spatial variables left after substituting the model constants.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::UnboundVariable` for the first variable without a binding.
    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<f64, LcaoError> {
        Ok(match self {
            Expr::Const(x) => *x,
            Expr::Var(name) => bindings
                .iter()
                .find(|(bound, _)| bound == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| LcaoError::UnboundVariable(name.clone()))?,
            Expr::Add(a, b) => a.eval(bindings)? + b.eval(bindings)?,
            Expr::Sub(a, b) => a.eval(bindings)? - b.eval(bindings)?,
            Expr::Mul(a, b) => a.eval(bindings)? * b.eval(bindings)?,
            Expr::Div(a, b) => a.eval(bindings)? / b.eval(bindings)?,
            Expr::Neg(a) => -a.eval(bindings)?,
            Expr::Pow(a, e) => pow(a.eval(bindings)?, *e),
            Expr::Exp(a) => a.eval(bindings)?.exp(),
            Expr::Sqrt(a) => a.eval(bindings)?.sqrt(),
        })
    }

    /// Sorted, deduplicated names of the free variables.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => names.push(name.clone()),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                a.collect_variables(names);
                b.collect_variables(names);
            }
            Expr::Neg(a) | Expr::Pow(a, _) | Expr::Exp(a) | Expr::Sqrt(a) => {
                a.collect_variables(names)
            }
        }
    }

    /// Binding strength used to decide where parentheses are needed when printing.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) | Expr::Neg(_) => 2,
            Expr::Const(x) if *x < 0.0 => 2,
            Expr::Pow(..) => 4,
            Expr::Const(_) | Expr::Var(_) | Expr::Exp(_) | Expr::Sqrt(_) => 5,
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

binary_operator!(Add, add, Add);
binary_operator!(Sub, sub, Sub);
binary_operator!(Mul, mul, Mul);
binary_operator!(Div, div, Div);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

#[inline]
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min_precedence: u8) -> fmt::Result {
    if e.precedence() < min_precedence {
        write!(f, "({})", e)
    } else {
        write!(f, "{}", e)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(x) => write!(f, "{:?}", x),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Add(a, b) => {
                write_operand(f, a, 1)?;
                write!(f, " + ")?;
                write_operand(f, b, 1)
            }
            Expr::Sub(a, b) => {
                write_operand(f, a, 1)?;
                write!(f, " - ")?;
                write_operand(f, b, 2)
            }
            Expr::Mul(a, b) => {
                write_operand(f, a, 2)?;
                write!(f, "*")?;
                write_operand(f, b, 3)
            }
            Expr::Div(a, b) => {
                write_operand(f, a, 2)?;
                write!(f, "/")?;
                write_operand(f, b, 3)
            }
            Expr::Neg(a) => {
                write!(f, "-")?;
                write_operand(f, a, 3)
            }
            Expr::Pow(base, exponent) => {
                write_operand(f, base, 5)?;
                if *exponent < 0.0 {
                    write!(f, "**({})", exponent)
                } else {
                    write!(f, "**{}", exponent)
                }
            }
            Expr::Exp(a) => write!(f, "exp({})", a),
            Expr::Sqrt(a) => write!(f, "sqrt({})", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn y() -> Expr {
        Expr::var("y")
    }

    #[test]
    fn test_derivative_of_polynomial() {
        // d/dx (3 x^4 - x y) = 12 x^3 - y
        let f = Expr::constant(3.0) * x().powf(4.0) - x() * y();
        let df = f.diff("x");
        let value = df.eval(&[("x", 2.0), ("y", 5.0)]).unwrap();
        assert_relative_eq!(value, 12.0 * 8.0 - 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_of_other_variable_is_zero() {
        let f = (x() * x()).exp();
        assert_eq!(f.diff("y"), Expr::Const(0.0));
    }

    #[test]
    fn test_quotient_and_chain_rules() {
        // d/dx sqrt(x^2 + 1) / x = -1 / (x^2 sqrt(x^2 + 1))
        let r = (x().powf(2.0) + Expr::constant(1.0)).sqrt();
        let f = r / x();
        let value = f.diff("x").eval(&[("x", 1.5)]).unwrap();
        let expected = -1.0 / (1.5f64.powi(2) * (1.5f64.powi(2) + 1.0).sqrt());
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_second_derivative_of_exponential_radial() {
        // d2/dx2 exp(-|x|) for x > 0 is exp(-x)
        let f = (-x().powf(2.0).sqrt()).exp();
        let d2 = f.diff("x").diff("x");
        let value = d2.eval(&[("x", 0.7)]).unwrap();
        assert_relative_eq!(value, (-0.7f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_simplify_removes_neutral_elements() {
        let e = Expr::constant(0.0) + Expr::constant(1.0) * x() - Expr::constant(0.0);
        assert_eq!(e.simplify(), x());
        assert_eq!((x() * Expr::constant(0.0)).simplify(), Expr::Const(0.0));
        assert_eq!((-(-x())).simplify(), x());
        assert_eq!(
            (Expr::constant(2.0) * (Expr::constant(3.0) * x())).simplify(),
            Expr::Const(6.0) * x()
        );
        assert_eq!(x().sqrt().powf(2.0).simplify(), x());
    }

    #[test]
    fn test_substitute_and_variables() {
        let f = x() / Expr::var("a") + y();
        assert_eq!(f.variables(), vec!["a", "x", "y"]);

        let g = f.substitute("a", 2.0);
        assert_eq!(g.variables(), vec!["x", "y"]);
        assert_relative_eq!(g.eval(&[("x", 3.0), ("y", 1.0)]).unwrap(), 2.5);
    }

    #[test]
    fn test_eval_reports_unbound_variable() {
        let f = x() + y();
        match f.eval(&[("x", 1.0)]) {
            Err(LcaoError::UnboundVariable(name)) => assert_eq!(name, "y"),
            other => panic!("Expected UnboundVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_display_parenthesizes_by_precedence() {
        let f = (x() + y()) * (x() - y());
        assert_eq!(f.to_string(), "(x + y)*(x - y)");

        let g = x() - (y() + x());
        assert_eq!(g.to_string(), "x - (y + x)");

        let h = x().powf(-1.5) / (Expr::var("a") * y());
        assert_eq!(h.to_string(), "x**(-1.5)/(a*y)");

        let k = (-x()).exp().sqrt();
        assert_eq!(k.to_string(), "sqrt(exp(-x))");

        let c = Expr::constant(0.562) * x() * Expr::constant(-2.0);
        assert_eq!(c.to_string(), "0.562*x*(-2.0)");
    }
}
