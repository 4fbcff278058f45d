use log::{debug, warn};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4) integrator with dense output
// ---------------------------------------------------------------------------
//
// Explicit embedded Runge-Kutta pair: 5th-order propagation with a
// 4th-order error estimate, FSAL (first-same-as-last), adaptive step
// control, and Hairer's 4th-order interpolant so requested sample times
// need not coincide with internal step boundaries.

/// Dimension of the integrated state vector.
pub const STATE_DIM: usize = 12;

/// Flat state vector in solver layout.
pub type StateVec = [f64; STATE_DIM];

/// A (time, state) pair at a requested sample time.
pub type Sample = (f64, StateVec);

// Butcher tableau nodes
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// Stage coefficients
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
// 5th-order weights; also the 7th-stage row (FSAL)
const A7: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

// Difference between the 5th- and embedded 4th-order weights
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

// Dense-output coefficients (Hairer, Norsett & Wanner, dopri5)
const D: [f64; 7] = [
    -12715105075.0 / 11282082432.0,
    0.0,
    87487479700.0 / 32700410799.0,
    -10690763975.0 / 1880347072.0,
    701980252875.0 / 199316789632.0,
    -1453857185.0 / 822651844.0,
    69997945.0 / 29380423.0,
];

const SAFETY: f64 = 0.9;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 10.0;
const MAX_STEPS: usize = 1_000_000;

/// Integrator tolerances and step-size bounds.
#[derive(Debug, Clone, Copy)]
pub struct DopriOptions {
    pub rel_tol: f64,
    pub abs_tol: f64,
    pub initial_step: f64,  // s
    pub min_step: f64,      // s, floor below which the run is declared diverged
    pub max_step: f64,      // s
}

impl Default for DopriOptions {
    fn default() -> Self {
        Self {
            rel_tol: 1e-8,
            abs_tol: 1e-8,
            initial_step: 1e-3,
            min_step: 1e-10,
            max_step: f64::INFINITY,
        }
    }
}

/// Integration aborted: non-finite derivatives, or tolerance unreachable
/// at the minimum step size. Carries the last valid point and whatever
/// samples were produced before the failure.
#[derive(Debug, Error)]
#[error("integration diverged at t = {time:.4} s")]
pub struct Diverged {
    pub time: f64,
    pub state: StateVec,
    pub samples: Vec<Sample>,
}

/// Integrate `dy/dt = f(t, y)` from `t0` to `t_end`, reporting the state
/// at each requested time in `t_eval` (strictly increasing, within
/// `[t0, t_end]`). Internal steps are sized by local error independent of
/// the sample grid; samples between steps come from the 4th-order
/// interpolant, not nearest-neighbor.
pub fn integrate<F>(
    mut f: F,
    t0: f64,
    y0: StateVec,
    t_end: f64,
    t_eval: &[f64],
    opts: &DopriOptions,
) -> Result<Vec<Sample>, Diverged>
where
    F: FnMut(f64, &StateVec) -> StateVec,
{
    debug_assert!(t_eval.windows(2).all(|w| w[0] < w[1]));
    debug_assert!(t_eval.first().map_or(true, |&te| te >= t0));

    let mut samples = Vec::with_capacity(t_eval.len());
    let mut eval_idx = 0;
    while eval_idx < t_eval.len() && t_eval[eval_idx] <= t0 {
        samples.push((t_eval[eval_idx], y0));
        eval_idx += 1;
    }
    if t_end <= t0 {
        return Ok(samples);
    }

    let mut t = t0;
    let mut y = y0;
    let mut k1 = f(t, &y);
    if !finite(&k1) {
        return Err(Diverged { time: t, state: y, samples });
    }

    let mut h = opts.initial_step.min(t_end - t0);
    let mut k = [[0.0; STATE_DIM]; 7];

    for _ in 0..MAX_STEPS {
        if t >= t_end {
            break;
        }
        let h_step = h.min(t_end - t);

        // Six derivative evaluations; the 7th stage is the 5th-order
        // solution itself (FSAL), so its derivative seeds the next step.
        k[0] = k1;
        k[1] = f(t + C2 * h_step, &stage(&y, h_step, &k, &A2));
        k[2] = f(t + C3 * h_step, &stage(&y, h_step, &k, &A3));
        k[3] = f(t + C4 * h_step, &stage(&y, h_step, &k, &A4));
        k[4] = f(t + C5 * h_step, &stage(&y, h_step, &k, &A5));
        k[5] = f(t + h_step, &stage(&y, h_step, &k, &A6));
        let y_new = stage(&y, h_step, &k, &A7);
        k[6] = f(t + h_step, &y_new);

        if !finite(&y_new) || k.iter().any(|ki| !finite(ki)) {
            warn!("non-finite derivatives at t = {:.6} s, aborting", t);
            return Err(Diverged { time: t, state: y, samples });
        }

        // Scaled RMS error norm over the embedded 4th-order estimate
        let mut err_sq = 0.0;
        for i in 0..STATE_DIM {
            let e: f64 = h_step * (0..7).map(|j| E[j] * k[j][i]).sum::<f64>();
            let sc = opts.abs_tol + opts.rel_tol * y[i].abs().max(y_new[i].abs());
            err_sq += (e / sc) * (e / sc);
        }
        let err = (err_sq / STATE_DIM as f64).sqrt();

        if err <= 1.0 {
            // Accept: emit every requested time inside this step via the
            // dense-output interpolant.
            while eval_idx < t_eval.len() && t_eval[eval_idx] <= t + h_step {
                let theta = ((t_eval[eval_idx] - t) / h_step).clamp(0.0, 1.0);
                samples.push((t_eval[eval_idx], interpolate(theta, h_step, &y, &y_new, &k)));
                eval_idx += 1;
            }

            t += h_step;
            y = y_new;
            k1 = k[6];

            let fac = (SAFETY * err.powf(-0.2)).clamp(FAC_MIN, FAC_MAX);
            h = (h_step * fac).min(opts.max_step);
        } else {
            debug!("step rejected at t = {:.6} s (err = {:.3e}, h = {:.3e})", t, err, h_step);
            let fac = (SAFETY * err.powf(-0.2)).clamp(0.1, 0.9);
            h = h_step * fac;
            if h < opts.min_step {
                warn!(
                    "cannot meet tolerance at minimum step size near t = {:.6} s",
                    t
                );
                return Err(Diverged { time: t, state: y, samples });
            }
        }
    }

    if t < t_end {
        warn!("maximum step count reached at t = {:.6} s", t);
        return Err(Diverged { time: t, state: y, samples });
    }

    // Trailing samples that round to the end of the interval
    while eval_idx < t_eval.len() && t_eval[eval_idx] <= t_end + 1e-9 {
        samples.push((t_eval[eval_idx], y));
        eval_idx += 1;
    }

    Ok(samples)
}

/// y + h * sum(a_j * k_j) over the leading stages.
fn stage(y: &StateVec, h: f64, k: &[StateVec; 7], a: &[f64]) -> StateVec {
    let mut out = *y;
    for (j, &aj) in a.iter().enumerate() {
        if aj != 0.0 {
            for i in 0..STATE_DIM {
                out[i] += h * aj * k[j][i];
            }
        }
    }
    out
}

/// 4th-order dense-output interpolant at theta in [0, 1] across an
/// accepted step of size h.
fn interpolate(theta: f64, h: f64, y0: &StateVec, y1: &StateVec, k: &[StateVec; 7]) -> StateVec {
    let th1 = 1.0 - theta;
    let mut out = [0.0; STATE_DIM];
    for i in 0..STATE_DIM {
        let ydiff = y1[i] - y0[i];
        let bspl = h * k[0][i] - ydiff;
        let rcont4 = ydiff - h * k[6][i] - bspl;
        let rcont5 = h * (0..7).map(|j| D[j] * k[j][i]).sum::<f64>();
        out[i] = y0[i] + theta * (ydiff + th1 * (bspl + theta * (rcont4 + th1 * rcont5)));
    }
    out
}

fn finite(y: &StateVec) -> bool {
    y.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
