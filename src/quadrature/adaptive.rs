//! Globally adaptive 1-D integration by bisection of the worst panel.

use super::options::QuadratureOptions;
use super::rule::{Estimate, Panel, evaluate_panel};
use crate::types::Interval;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Outcome of one adaptive 1-D integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveOutcome {
    /// Value, total error, convergence of this level and of every node below it.
    pub estimate: Estimate,
    /// Number of bisections performed at this level.
    pub subdivisions: usize,
}

/// Heap entry ordered by panel error, largest first.
struct ByError(Panel);

impl PartialEq for ByError {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByError {}

impl PartialOrd for ByError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByError {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .error
            .total_cmp(&other.0.error)
            .then_with(|| other.0.lower.total_cmp(&self.0.lower))
    }
}

/// Integrates `f` over `interval`, bisecting the panel with the largest error until the
/// total error meets [`QuadratureOptions::tolerance_for`] or the subdivision ceiling is
/// reached.
///
/// `breakpoints` inside the interval split it into the initial panels; they do not count
/// as subdivisions. Put them at cusps and singularities of `f`: a G7K15 panel never
/// samples its end points, and a narrow peak between two wide-spaced nodes would
/// otherwise go unnoticed.
///
/// For a given `f`, the sequence of bisections does not depend on the tolerance, so a
/// run with a tighter tolerance performs every bisection of a looser run first and then
/// continues. This does not carry over to nested integrals, where the node values
/// themselves change with the tolerance of the inner levels.
pub fn integrate_adaptive<F>(
    f: &F,
    interval: Interval,
    breakpoints: &[f64],
    options: &QuadratureOptions,
    parallel: bool,
) -> AdaptiveOutcome
where
    F: Fn(f64) -> Estimate + Sync,
{
    let mut edges = Vec::with_capacity(breakpoints.len() + 2);
    edges.push(interval.lower);
    edges.extend(interval.interior_points(breakpoints.iter().copied()));
    edges.push(interval.upper);

    let mut value = 0.0;
    let mut error = 0.0;
    let mut evaluations = 0;
    let mut heap = BinaryHeap::with_capacity(edges.len() + 2 * options.max_subdivisions);
    for pair in edges.windows(2) {
        let panel = evaluate_panel(f, pair[0], pair[1], parallel);
        value += panel.value;
        error += panel.error;
        evaluations += panel.evaluations;
        heap.push(ByError(panel));
    }

    let mut subdivisions = 0;
    let mut level_converged = error <= options.tolerance_for(value);

    while !level_converged && subdivisions < options.max_subdivisions {
        let Some(ByError(worst)) = heap.pop() else {
            break;
        };
        if !worst.is_splittable() {
            heap.push(ByError(worst));
            break;
        }

        let mid = 0.5 * (worst.lower + worst.upper);
        let left = evaluate_panel(f, worst.lower, mid, parallel);
        let right = evaluate_panel(f, mid, worst.upper, parallel);

        value += left.value + right.value - worst.value;
        error += left.error + right.error - worst.error;
        evaluations += left.evaluations + right.evaluations;
        heap.push(ByError(left));
        heap.push(ByError(right));
        subdivisions += 1;

        level_converged = error <= options.tolerance_for(value);
    }

    // Re-sum from the panels so that the running updates leave no drift behind.
    let panels = heap.into_vec();
    let value: f64 = panels.iter().map(|p| p.0.value).sum();
    let error: f64 = panels.iter().map(|p| p.0.error).sum();
    let nodes_converged = panels.iter().all(|p| p.0.converged);

    AdaptiveOutcome {
        estimate: Estimate {
            value,
            error,
            converged: nodes_converged && error <= options.tolerance_for(value),
            evaluations,
        },
        subdivisions,
    }
}
