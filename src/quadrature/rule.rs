//! The 15-point Gauss-Kronrod rule with its embedded 7-point Gauss rule (G7K15).
//!
//! A panel is evaluated at 15 nodes. The Kronrod sum is the estimate, the difference to
//! the Gauss sum over the shared 7 nodes is the error estimate. Node values are
//! [`Estimate`]s rather than plain numbers so that an inner integral can pass its own
//! error and convergence state up to the enclosing level.

use rayon::prelude::*;

/// Kronrod abscissae on `[-1, 1]`, positive half, descending. The last one is the
/// midpoint. Odd indices are shared with the Gauss rule.
const KRONROD_NODES: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const KRONROD_WEIGHTS: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `KRONROD_NODES[1]`, `[3]`, `[5]` and the midpoint.
const GAUSS_WEIGHTS: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Number of integrand evaluations per panel.
pub const NODES_PER_PANEL: usize = 15;

/// A value with an absolute error estimate and bookkeeping, as produced by one
/// integrand sample or by a whole inner integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
    pub converged: bool,
    pub evaluations: u64,
}

impl Estimate {
    /// A plain function value: no error, one evaluation.
    #[inline(always)]
    pub fn exact(value: f64) -> Self {
        Self {
            value,
            error: 0.0,
            converged: true,
            evaluations: 1,
        }
    }
}

/// The G7K15 result on one subinterval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub lower: f64,
    pub upper: f64,
    /// The Kronrod estimate of the integral over the panel.
    pub value: f64,
    /// `|K15 - G7|` plus the weighted errors of the node estimates.
    pub error: f64,
    /// Whether every node estimate converged.
    pub converged: bool,
    pub evaluations: u64,
}

impl Panel {
    /// Whether the panel can still be bisected in floating point.
    #[inline]
    pub fn is_splittable(&self) -> bool {
        let mid = 0.5 * (self.lower + self.upper);
        mid > self.lower && mid < self.upper
    }
}

/// Evaluates the G7K15 rule for `f` on `[lower, upper]`.
///
/// With `parallel` set, the 15 nodes are evaluated on the rayon pool. The summation
/// order is fixed either way, so both paths give bit-identical panels.
pub fn evaluate_panel<F>(f: &F, lower: f64, upper: f64, parallel: bool) -> Panel
where
    F: Fn(f64) -> Estimate + Sync,
{
    let center = 0.5 * (lower + upper);
    let half_width = 0.5 * (upper - lower);

    // Index 2k is the node left of the center, 2k + 1 its mirror; 14 is the center.
    let abscissa = |i: usize| {
        let k = i / 2;
        if k == 7 {
            center
        } else if i % 2 == 0 {
            center - half_width * KRONROD_NODES[k]
        } else {
            center + half_width * KRONROD_NODES[k]
        }
    };

    let samples: Vec<Estimate> = if parallel {
        (0..NODES_PER_PANEL)
            .into_par_iter()
            .map(|i| f(abscissa(i)))
            .collect()
    } else {
        (0..NODES_PER_PANEL).map(|i| f(abscissa(i))).collect()
    };

    let mut kronrod = 0.0;
    let mut gauss = 0.0;
    let mut propagated_error = 0.0;
    let mut converged = true;
    let mut evaluations = 0;

    for (i, sample) in samples.iter().enumerate() {
        let k = i / 2;
        kronrod += KRONROD_WEIGHTS[k] * sample.value;
        propagated_error += KRONROD_WEIGHTS[k] * sample.error;
        if k % 2 == 1 {
            gauss += GAUSS_WEIGHTS[k / 2] * sample.value;
        }
        converged &= sample.converged;
        evaluations += sample.evaluations;
    }

    let value = kronrod * half_width;
    let error = ((kronrod - gauss) * half_width).abs() + propagated_error * half_width.abs();

    Panel {
        lower,
        upper,
        value,
        error,
        converged,
        evaluations,
    }
}
