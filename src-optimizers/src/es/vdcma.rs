//! VD-CMA: CMA-ES with a linear-time covariance model
//!
//! Akimoto, Auger and Hansen, "Comparison-based natural gradient
//! optimization in high dimension", GECCO 2014.
//!
//! The covariance is restricted to `C = D (I + v v^T) D` with `D` diagonal,
//! so sampling and updates cost `O(n)` per individual. Each generation:
//!
//! 1. sample `y = z + (sqrt(1 + |v|^2) - 1) (z . v_hat) v_hat`, `x = m + sigma D y`
//! 2. recombine the best `mu` samples into the new mean
//! 3. move `(D, v)` along the natural gradient of the weighted
//!    log-likelihood of the selected steps (rank-mu) and of the evolution
//!    path (rank-one)
//! 4. adapt `sigma` by cumulative step-size adaptation
//!
//! The natural gradient is the solution of `F g = grad`, where `F` is the
//! Fisher information of the model in (relative `D`, `v`) coordinates. `F` is
//! never formed: conjugate gradients only need its `O(n)` product with a
//! vector.

use ndarray::{Array1, Array2, ArrayView1, s};
use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};
use crate::evaluator::Evaluator;
use crate::optimizer::Optimizer;
use crate::options::Options;
use crate::problem::Problem;
use crate::results::{Callback, OptimizationResults};
use crate::sampling::{argsort, initial_mean, make_rng, standard_normal, standard_normal_matrix};
use crate::termination::TerminationSignal;

/// VD-CMA settings; population sizes default to the CMA-ES rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VdcmaConfig {
    /// `lambda`, default `4 + floor(3 ln n)`
    pub n_individuals: Option<usize>,
    /// `mu`, default `lambda / 2`
    pub n_parents: Option<usize>,
    pub mean: Option<Array1<f64>>,
    /// Initial global step size, default 30% of the mean initial range
    pub sigma: Option<f64>,
}

impl VdcmaConfig {
    pub fn n_individuals(mut self, n: usize) -> Self {
        self.n_individuals = Some(n);
        self
    }
    pub fn n_parents(mut self, n: usize) -> Self {
        self.n_parents = Some(n);
        self
    }
    pub fn mean(mut self, mean: Array1<f64>) -> Self {
        self.mean = Some(mean);
        self
    }
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }
}

/// Learning rates and recombination weights, fixed for a run
#[derive(Debug, Clone)]
struct Parameters {
    lambda: usize,
    mu: usize,
    weights: Array1<f64>,
    mu_eff: f64,
    cc: f64,
    c1: f64,
    c_mu: f64,
    cs: f64,
    ds: f64,
    chi: f64,
}

impl Parameters {
    fn new(n: usize, lambda: usize, mu: usize) -> Self {
        let nf = n as f64;
        let ln_half = ((lambda as f64 + 1.0) / 2.0).ln();
        let raw = Array1::from_shape_fn(mu, |i| ln_half - ((i + 1) as f64).ln());
        let weights = &raw / raw.sum();
        let mu_eff = 1.0 / weights.dot(&weights);

        let cf = ((nf - 5.0) / 6.0).max(0.5);
        let cc = (4.0 + mu_eff / nf) / (nf + 4.0 + 2.0 * mu_eff / nf);
        let c1 = cf * 2.0 / ((nf + 1.3).powi(2) + mu_eff);
        let c_mu = (1.0 - c1)
            .min(cf * 2.0 * (mu_eff - 2.0 + 1.0 / mu_eff) / ((nf + 2.0).powi(2) + mu_eff));
        let cs = 1.0 / (2.0 * (nf / mu_eff).sqrt() + 1.0);
        let ds = 1.0 + cs + 2.0 * (((mu_eff - 1.0) / (nf + 1.0)).sqrt() - 1.0).max(0.0);
        let chi = nf.sqrt() * (1.0 - 1.0 / (4.0 * nf) + 1.0 / (21.0 * nf * nf));
        Self { lambda, mu, weights, mu_eff, cc, c1, c_mu, cs, ds, chi }
    }
}

/// Fisher-vector product in (relative D, v) coordinates
///
/// `p` stacks a relative change of `D` (first `n` entries) and a change of
/// `v` (last `n` entries).
fn fisher_vector_product(v: &Array1<f64>, p: &Array1<f64>) -> Array1<f64> {
    let n = v.len();
    let delta = p.slice(s![..n]);
    let u = p.slice(s![n..]);
    let nv2 = v.dot(v);
    let rho = 1.0 / (1.0 + nv2);
    let v2 = v.mapv(|x| x * x);
    let vu = v.dot(&u);
    let pu = &u - &(v * (rho * vu));
    let v2d = v2.dot(&delta);

    let mut out = Array1::zeros(2 * n);
    for i in 0..n {
        out[i] = delta[i] * (2.0 + v2[i] - rho * v2[i]) - rho * v2[i] * v2d
            + u[i] * rho * v[i]
            + v[i] * pu[i];
    }
    let dv = &delta * v;
    let vdv = v.dot(&dv);
    let z = (&dv / rho + &dv + v * vdv + &u * nv2 + v * vu) * rho;
    let vz = v.dot(&z);
    for i in 0..n {
        out[n + i] = z[i] - rho * v[i] * vz;
    }
    out
}

/// Gradient of `sum_k w_k log p(y_k)` in (relative D, v) coordinates
fn log_likelihood_gradient(v: &Array1<f64>, samples: &[(f64, ArrayView1<'_, f64>)]) -> Array1<f64> {
    let n = v.len();
    let rho = 1.0 / (1.0 + v.dot(v));
    let total: f64 = samples.iter().map(|(w, _)| w).sum();

    let mut gd = Array1::from_elem(n, -total);
    let mut gu = v * (-total * rho);
    for (w, y) in samples {
        let vy = v.dot(y);
        let py = y - &(v * (rho * vy));
        gd += &(&py * y * *w);
        gu.scaled_add(w * rho * vy, &py);
    }
    let mut out = Array1::zeros(2 * n);
    out.slice_mut(s![..n]).assign(&gd);
    out.slice_mut(s![n..]).assign(&gu);
    out
}

/// Solve `F g = b` by conjugate gradients, starting from zero
fn natural_gradient(v: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    let mut x = Array1::zeros(b.len());
    let mut r = b.clone();
    let mut p = r.clone();
    let mut rs = r.dot(&r);
    let rs0 = rs;
    if rs0 == 0.0 {
        return x;
    }
    for _ in 0..b.len() {
        let ap = fisher_vector_product(v, &p);
        let pap = p.dot(&ap);
        if !(pap > 0.0) {
            break;
        }
        let a = rs / pap;
        x.scaled_add(a, &p);
        r.scaled_add(-a, &ap);
        let rs_new = r.dot(&r);
        if rs_new < 1e-24 * rs0 {
            break;
        }
        p = &r + &(p * (rs_new / rs));
        rs = rs_new;
    }
    x
}

/// Largest step in `[0, 1]` along `(delta, dv)` that keeps `D` positive and
/// changes `v` by at most 70% of its norm
fn update_factor(v: &Array1<f64>, delta: ArrayView1<'_, f64>, dv: ArrayView1<'_, f64>) -> f64 {
    let mut up: f64 = 1.0;
    let ndv = dv.dot(&dv).sqrt();
    if ndv > 0.0 {
        up = up.min(0.7 * v.dot(v).sqrt() / ndv);
    }
    for &g in delta.iter().filter(|&&g| g < 0.0) {
        up = up.min(0.7 / g.abs());
    }
    up
}

fn all_finite(a: &Array1<f64>) -> bool {
    a.iter().all(|x| x.is_finite())
}

/// VD-CMA evolution strategy
pub struct Vdcma<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    problem: Problem<F>,
    options: Options,
    config: VdcmaConfig,
    params: Parameters,
    callback: Option<Callback>,
}

impl<F> Vdcma<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    pub fn new(problem: Problem<F>, options: Options, config: VdcmaConfig) -> Result<Self> {
        options.validate()?;
        let n = problem.ndim;
        let lambda = config.n_individuals.unwrap_or(4 + (3.0 * (n as f64).ln()).floor() as usize);
        let mu = config.n_parents.unwrap_or(lambda / 2);
        if lambda < 2 {
            return Err(OptError::invalid("n_individuals", "must be >= 2"));
        }
        if mu == 0 || mu > lambda {
            return Err(OptError::invalid(
                "n_parents",
                format!("must be in 1..={}, got {}", lambda, mu),
            ));
        }
        if let Some(m) = &config.mean {
            problem.check_len("mean", m)?;
        }
        if let Some(s) = config.sigma {
            if !(s > 0.0) || !s.is_finite() {
                return Err(OptError::invalid("sigma", format!("must be finite and > 0, got {}", s)));
            }
        }
        let params = Parameters::new(n, lambda, mu);
        log::debug!(
            "VDCMA lambda {} mu {} mu_eff {:.3} cs {:.4} c1 {:.2e} c_mu {:.2e}",
            params.lambda,
            params.mu,
            params.mu_eff,
            params.cs,
            params.c1,
            params.c_mu
        );
        Ok(Self { problem, options, config, params, callback: None })
    }
}

impl<F> Optimizer for Vdcma<F>
where
    F: Fn(&Array1<f64>) -> f64 + Sync,
{
    fn name(&self) -> &'static str {
        "VDCMA"
    }

    fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    fn optimize(&mut self) -> Result<OptimizationResults> {
        let n = self.problem.ndim;
        let p = &self.params;
        let mut rng = make_rng(self.options.seed);
        let mut mean = initial_mean(&mut rng, &self.problem, self.config.mean.as_ref())?;
        let mut sigma = self
            .config
            .sigma
            .unwrap_or_else(|| 0.3 * self.problem.initial_range().mean().unwrap_or(1.0));
        let mut d = Array1::<f64>::ones(n);
        let mut v = standard_normal(&mut rng, n) / (n as f64).sqrt();
        let mut ps = Array1::<f64>::zeros(n);
        let mut pc = Array1::<f64>::zeros(n);
        let mut ev = Evaluator::new("VDCMA", &self.problem, &self.options)?;

        let mut generation = 0;
        loop {
            let nv2 = v.dot(&v);
            let v_hat = &v / nv2.sqrt();
            let stretch = (1.0 + nv2).sqrt() - 1.0;

            let z = standard_normal_matrix(&mut rng, p.lambda, n);
            let mut y = Array2::<f64>::zeros((p.lambda, n));
            let mut x = Array2::<f64>::zeros((p.lambda, n));
            for k in 0..p.lambda {
                let zk = z.row(k);
                let yk = &zk + &(&v_hat * (stretch * zk.dot(&v_hat)));
                x.row_mut(k).assign(&(&mean + &(&d * &yk * sigma)));
                y.row_mut(k).assign(&yk);
            }
            let Some(fitness) = ev.evaluate_batch(&x) else { break };
            let selected = &argsort(&fitness)[..p.mu];

            let old_mean = mean.clone();
            let mut z_w = Array1::<f64>::zeros(n);
            mean.fill(0.0);
            for (j, &k) in selected.iter().enumerate() {
                mean.scaled_add(p.weights[j], &x.row(k));
                z_w.scaled_add(p.weights[j], &z.row(k));
            }
            ps = ps * (1.0 - p.cs) + z_w * (p.cs * (2.0 - p.cs) * p.mu_eff).sqrt();
            let step = (&mean - &old_mean) / (&d * sigma);
            pc = pc * (1.0 - p.cc) + step * (p.cc * (2.0 - p.cc) * p.mu_eff).sqrt();

            let mut samples: Vec<(f64, ArrayView1<'_, f64>)> = selected
                .iter()
                .enumerate()
                .map(|(j, &k)| (p.c_mu * p.weights[j], y.row(k)))
                .collect();
            samples.push((p.c1, pc.view()));
            let grad = natural_gradient(&v, &log_likelihood_gradient(&v, &samples));
            let (delta, dv) = (grad.slice(s![..n]), grad.slice(s![n..]));
            let up = update_factor(&v, delta, dv);
            v.scaled_add(up, &dv);
            d *= &delta.mapv(|g| 1.0 + up * g);
            sigma *= (p.cs / p.ds * (ps.dot(&ps).sqrt() / p.chi - 1.0)).exp();

            let healthy = all_finite(&mean)
                && all_finite(&d)
                && all_finite(&v)
                && v.dot(&v) > 0.0
                && sigma.is_finite()
                && sigma > 0.0;
            if !healthy {
                ev.stop(TerminationSignal::NumericalInstability);
                break;
            }

            generation += 1;
            if !ev.report_generation(generation, &mut self.callback) {
                break;
            }
        }
        let scale = &d * sigma;
        ev.finish(Some(mean), Some(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_parameters() {
        let p = Parameters::new(10, 4 + (3.0 * 10f64.ln()).floor() as usize, 5);
        assert_eq!(p.lambda, 10);
        assert_abs_diff_eq!(p.weights.sum(), 1.0, epsilon = 1e-12);
        assert!(p.weights.windows(2).into_iter().all(|w| w[0] > w[1]));
        assert!(p.c1 + p.c_mu <= 1.0);
        assert!(p.cs > 0.0 && p.cs < 1.0);
    }

    #[test]
    fn test_fisher_product_is_symmetric_positive() {
        let v = Array1::from_vec(vec![0.5, -0.8, 0.3]);
        let basis = |i: usize| Array1::from_shape_fn(6, |j| if i == j { 1.0 } else { 0.0 });
        for i in 0..6 {
            let fi = fisher_vector_product(&v, &basis(i));
            assert!(fi[i] > 0.0);
            for j in 0..6 {
                let fj = fisher_vector_product(&v, &basis(j));
                assert_abs_diff_eq!(fi[j], fj[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_natural_gradient_solves_system() {
        let v = Array1::from_vec(vec![0.5, -0.8, 0.3]);
        let y = Array1::from_vec(vec![1.2, -0.4, 0.7]);
        let b = log_likelihood_gradient(&v, &[(1.0, y.view())]);
        let g = natural_gradient(&v, &b);
        let back = fisher_vector_product(&v, &g);
        for i in 0..6 {
            assert_abs_diff_eq!(back[i], b[i], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_update_factor_keeps_d_positive() {
        let v = Array1::from_vec(vec![1.0, 0.0]);
        let delta = Array1::from_vec(vec![-3.5, 0.1]);
        let dv = Array1::from_vec(vec![0.0, 0.1]);
        let up = update_factor(&v, delta.view(), dv.view());
        assert_abs_diff_eq!(up, 0.2, epsilon = 1e-12);
        assert!(1.0 + up * delta[0] > 0.0);
    }

    #[test]
    fn test_rejects_bad_population() {
        let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.sum(), 2, -1.0, 1.0).unwrap();
        let o = Options::builder().max_function_evaluations(10).build().unwrap();
        assert!(Vdcma::new(p, o, VdcmaConfig::default().n_individuals(4).n_parents(5)).is_err());
    }
}
