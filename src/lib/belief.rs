use crate::error::BeliefError;
use crate::observation::Observation;
use log::debug;
use serde::{Deserialize, Serialize};
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

const QUANTILE_MAX_ITER: usize = 200;
const QUANTILE_X_TOL: f64 = 1e-13;
const QUANTILE_P_TOL: f64 = 1e-14;

/// Beta(α, β) belief about an unknown rate in [0, 1].
///
/// Snapshots are immutable, every update returns a new belief. Both shape
/// parameters are positive and finite; deserialization goes through
/// [`PriorBelief::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeParameters")]
pub struct PriorBelief {
    alpha: f64,
    beta: f64,
}

#[derive(Deserialize)]
struct ShapeParameters {
    alpha: f64,
    beta: f64,
}

impl TryFrom<ShapeParameters> for PriorBelief {
    type Error = BeliefError;

    fn try_from(params: ShapeParameters) -> Result<Self, Self::Error> {
        PriorBelief::new(params.alpha, params.beta)
    }
}

impl PriorBelief {
    pub fn new(alpha: f64, beta: f64) -> Result<Self, BeliefError> {
        if !(alpha > 0.0 && alpha.is_finite() && beta > 0.0 && beta.is_finite()) {
            return Err(BeliefError::InvalidParameter { alpha, beta });
        }
        Ok(Self { alpha, beta })
    }

    /// Uniform prior, α = β = 1
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Update with `count` positives out of `trials` tests
    pub fn apply_observation(&self, count: u64, trials: u64) -> Result<Self, BeliefError> {
        Ok(self.observe(&Observation::new(count, trials)?))
    }

    pub fn observe(&self, observation: &Observation) -> Self {
        let next = Self {
            alpha: self.alpha + observation.count() as f64,
            beta: self.beta + observation.negatives() as f64,
        };
        debug!(
            "Observed {}/{}: α = {:.1} -> {:.1}, β = {:.1} -> {:.1}",
            observation.count(),
            observation.trials(),
            self.alpha,
            next.alpha,
            self.beta,
            next.beta
        );
        next
    }

    /// Compute mean of posterior
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let total = self.alpha + self.beta;
        self.alpha * self.beta / (total.powi(2) * (total + 1.0))
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn mode(&self) -> Option<f64> {
        if self.alpha > 1.0 && self.beta > 1.0 {
            Some((self.alpha - 1.0) / (self.alpha + self.beta - 2.0))
        } else {
            None
        }
    }

    /// Number of observations the belief is worth, α + β
    pub fn pseudo_count(&self) -> f64 {
        self.alpha + self.beta
    }

    pub fn log_beta(&self) -> f64 {
        ln_gamma(self.alpha) + ln_gamma(self.beta) - ln_gamma(self.alpha + self.beta)
    }

    pub fn log_pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return f64::NEG_INFINITY;
        }
        scaled_log(self.alpha - 1.0, x.ln()) + scaled_log(self.beta - 1.0, (-x).ln_1p())
            - self.log_beta()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        self.log_pdf(x).exp()
    }

    /// Regularized incomplete beta function I_x(α, β)
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            beta_reg(self.alpha, self.beta, x)
        }
    }

    /// Smallest x with cdf(x) >= p
    pub fn quantile(&self, p: f64) -> Result<f64, BeliefError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BeliefError::Domain {
                value: p,
                domain: "probabilities [0, 1]",
            });
        }
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(1.0);
        }
        Ok(self.invert_cdf(p))
    }

    // Newton steps on I_x(α, β) - p, falling back to bisection whenever a
    // step leaves the bracket or the density is not usable.
    fn invert_cdf(&self, p: f64) -> f64 {
        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        let mut x = self.mean();

        for _ in 0..QUANTILE_MAX_ITER {
            let residual = self.cdf(x) - p;
            if residual.abs() < QUANTILE_P_TOL {
                return x;
            }
            if residual < 0.0 {
                lo = x;
            } else {
                hi = x;
            }

            let density = self.pdf(x);
            let newton = x - residual / density;
            let next = if density.is_finite() && density > 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };

            if (next - x).abs() < QUANTILE_X_TOL {
                return next;
            }
            x = next;
        }
        x
    }
}

// exponent * ln(value), with 0 * ln(0) taken as 0
fn scaled_log(exponent: f64, log_value: f64) -> f64 {
    if exponent == 0.0 {
        0.0
    } else {
        exponent * log_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {} ± {}, got {}",
            expected,
            tol,
            actual
        );
    }

    #[test]
    fn test_new_keeps_parameters() {
        for (a, b) in vec![(2.0, 18.0), (0.5, 0.5), (1e-3, 1e6), (1.0, 1.0)] {
            let belief = PriorBelief::new(a, b).unwrap();
            assert_eq!(belief.alpha(), a);
            assert_eq!(belief.beta(), b);
        }
    }

    #[test]
    fn test_new_rejects_invalid() {
        for (a, b) in vec![
            (0.0, 1.0),
            (1.0, 0.0),
            (-2.0, 18.0),
            (2.0, -18.0),
            (f64::NAN, 1.0),
            (1.0, f64::INFINITY),
        ] {
            let result = PriorBelief::new(a, b);
            assert!(
                matches!(result, Err(BeliefError::InvalidParameter { .. })),
                "({}, {}) should be rejected",
                a,
                b
            );
        }
    }

    #[test]
    fn test_deserialize_valid() {
        let belief: PriorBelief = serde_json::from_str(r#"{"alpha":2.0,"beta":18.0}"#).unwrap();
        assert_eq!(belief, PriorBelief::new(2.0, 18.0).unwrap());
        let json = serde_json::to_string(&belief).unwrap();
        assert_eq!(json, r#"{"alpha":2.0,"beta":18.0}"#);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result = PriorBelief::try_from(ShapeParameters {
            alpha: 0.0,
            beta: -3.0,
        });
        assert_eq!(
            result,
            Err(BeliefError::InvalidParameter {
                alpha: 0.0,
                beta: -3.0
            })
        );
        for json in vec![
            r#"{"alpha":0,"beta":-3}"#,
            r#"{"alpha":-1.0,"beta":1.0}"#,
            r#"{"alpha":1.0,"beta":0.0}"#,
        ] {
            let err = serde_json::from_str::<PriorBelief>(json).unwrap_err();
            assert!(
                err.to_string().starts_with("Invalid shape parameters"),
                "{} gave: {}",
                json,
                err
            );
        }
    }

    #[test]
    fn test_apply_observation() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        let updated = belief.apply_observation(5, 100).unwrap();
        assert_eq!(updated.alpha(), 7.0);
        assert_eq!(updated.beta(), 113.0);
        // old snapshot untouched
        assert_eq!(belief.alpha(), 2.0);
        assert_eq!(belief.beta(), 18.0);
    }

    #[test]
    fn test_apply_zero_trials_is_noop() {
        let belief = PriorBelief::new(3.5, 7.25).unwrap();
        assert_eq!(belief.apply_observation(0, 0).unwrap(), belief);
    }

    #[test]
    fn test_apply_observation_rejects_count_above_trials() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        let result = belief.apply_observation(101, 100);
        assert!(matches!(
            result,
            Err(BeliefError::InvalidObservation {
                count: 101,
                trials: 100,
                ..
            })
        ));
    }

    #[test]
    fn test_moments() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        assert_close(belief.mean(), 0.1, 1e-12);
        assert_close(belief.variance(), 36.0 / (400.0 * 21.0), 1e-12);
        assert_close(belief.standard_deviation(), (36.0_f64 / 8400.0).sqrt(), 1e-12);
        assert_close(belief.mode().unwrap(), 1.0 / 18.0, 1e-12);
        assert_eq!(belief.pseudo_count(), 20.0);
        assert_eq!(PriorBelief::new(0.5, 3.0).unwrap().mode(), None);
    }

    #[test]
    fn test_pdf_matches_reference() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        assert_close(belief.pdf(0.1), 5.70359614129, 1e-9);
        assert_close(belief.pdf(0.05), 7.14985773225, 1e-9);
        let posterior = PriorBelief::new(34.0, 684.0).unwrap();
        assert_close(posterior.pdf(0.05), 45.1830138445, 1e-8);
        assert_eq!(belief.pdf(-0.1), 0.0);
        assert_eq!(belief.pdf(1.1), 0.0);
    }

    #[test]
    fn test_pdf_large_parameters() {
        let belief = PriorBelief::new(2000.0, 50000.0).unwrap();
        let density = belief.pdf(0.04);
        assert!(density.is_finite());
        assert_close(density, 89.9196403508, 1e-5);
    }

    #[test]
    fn test_pdf_boundaries() {
        assert_close(PriorBelief::new(1.0, 5.0).unwrap().pdf(0.0), 5.0, 1e-9);
        assert_close(PriorBelief::new(5.0, 1.0).unwrap().pdf(1.0), 5.0, 1e-9);
        assert_eq!(PriorBelief::new(2.0, 2.0).unwrap().pdf(0.0), 0.0);
        assert_eq!(PriorBelief::new(2.0, 2.0).unwrap().pdf(1.0), 0.0);
        assert_eq!(PriorBelief::new(0.5, 0.5).unwrap().pdf(0.0), f64::INFINITY);
        assert_close(PriorBelief::uniform().pdf(0.0), 1.0, 1e-12);
        assert_close(PriorBelief::uniform().pdf(1.0), 1.0, 1e-12);
    }

    #[test]
    fn test_quantile_uniform() {
        let belief = PriorBelief::uniform();
        for p in vec![0.025, 0.3, 0.5, 0.975] {
            assert_close(belief.quantile(p).unwrap(), p, 1e-9);
        }
    }

    #[test]
    fn test_quantile_arcsine() {
        // Beta(1/2, 1/2) quantile is sin²(πp/2)
        let belief = PriorBelief::new(0.5, 0.5).unwrap();
        for p in vec![0.0125, 0.025, 0.5, 0.9, 0.975] {
            let expected = (std::f64::consts::FRAC_PI_2 * p).sin().powi(2);
            assert_close(belief.quantile(p).unwrap(), expected, 1e-8);
        }
    }

    #[test]
    fn test_quantile_reference_values() {
        let cases = vec![
            (2.0, 18.0, 0.025, 0.0130121643718),
            (2.0, 18.0, 0.5, 0.0867751636557),
            (2.0, 18.0, 0.975, 0.260280654195),
            (3.0, 3.0, 0.025, 0.146632799635),
            (3.0, 3.0, 0.975, 0.853367200365),
            (34.0, 684.0, 0.025, 0.0330598065109),
            (34.0, 684.0, 0.975, 0.0640319414329),
        ];
        for (a, b, p, expected) in cases {
            let belief = PriorBelief::new(a, b).unwrap();
            assert_close(belief.quantile(p).unwrap(), expected, 1e-8);
        }
    }

    #[test]
    fn test_quantile_inverts_cdf() {
        let belief = PriorBelief::new(340.0, 6860.0).unwrap();
        for p in vec![0.001, 0.025, 0.5, 0.975, 0.999] {
            let x = belief.quantile(p).unwrap();
            assert!(x > 0.0 && x < 1.0);
            assert_close(belief.cdf(x), p, 1e-9);
        }
    }

    #[test]
    fn test_quantile_edges_and_domain() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        assert_eq!(belief.quantile(0.0).unwrap(), 0.0);
        assert_eq!(belief.quantile(1.0).unwrap(), 1.0);
        for p in vec![-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                belief.quantile(p),
                Err(BeliefError::Domain { .. })
            ));
        }
    }

    #[test]
    fn test_cdf_clamps_outside_support() {
        let belief = PriorBelief::new(2.0, 18.0).unwrap();
        assert_eq!(belief.cdf(-1.0), 0.0);
        assert_eq!(belief.cdf(0.0), 0.0);
        assert_eq!(belief.cdf(1.0), 1.0);
        assert_eq!(belief.cdf(2.0), 1.0);
    }
}
