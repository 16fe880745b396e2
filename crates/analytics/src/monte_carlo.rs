//! Monte Carlo estimates over the historical return distribution.
//!
//! Two independent modes:
//! - risk of ruin: parametric trials drawing the average win or average loss
//!   at the historical rates, reporting how often drawdown crosses each threshold;
//! - path resampling: bootstrap of the actual per-trade results, for charting.
//!
//! Randomness always comes from the caller, so a seeded generator makes every
//! run reproducible. Parallel trials get their own generator seeded from
//! `(base_seed, trial_index)`, so their outcome does not depend on scheduling.

use crate::error::AnalyticsError;
use crate::kpi::ReturnProfile;
use crate::rounding::round_to;
use configuration::SimulationSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawdownProbability {
    /// Drawdown level in percent of account.
    pub threshold: f64,
    /// Share of trials whose maximum drawdown reached `threshold`, in percent, 1 decimal.
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskOfRuin {
    /// `false` when the history was too thin to simulate; every probability is then 0.
    pub simulated: bool,
    pub trials: usize,
    pub horizon: usize,
    pub probabilities: Vec<DrawdownProbability>,
}

impl RiskOfRuin {
    /// All thresholds at probability 0.
    pub fn not_simulated(thresholds: &[f64]) -> Self {
        Self {
            simulated: false,
            trials: 0,
            horizon: 0,
            probabilities: thresholds
                .iter()
                .map(|&threshold| DrawdownProbability { threshold, probability: 0.0 })
                .collect(),
        }
    }

    pub fn probability_at(&self, threshold: f64) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.threshold == threshold)
            .map(|p| p.probability)
    }
}

/// Runs both simulation modes with validated settings.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    settings: SimulationSettings,
}

impl MonteCarloSimulator {
    pub fn new(settings: SimulationSettings) -> Result<Self, AnalyticsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Whether the history has enough active trades for either mode.
    pub fn has_enough_history(&self, profile: &ReturnProfile) -> bool {
        profile.len() > self.settings.min_active_trades
    }

    /// Estimates the probability of each configured drawdown threshold being reached
    /// within `horizon` future trades.
    ///
    /// Needs more than `min_active_trades` results and a non-zero gross loss;
    /// otherwise every threshold is reported at 0.
    pub fn risk_of_ruin<R: Rng>(&self, profile: &ReturnProfile, rng: &mut R) -> RiskOfRuin {
        let thresholds = &self.settings.drawdown_thresholds;
        if !self.has_enough_history(profile) || profile.gross_loss <= 0.0 {
            tracing::debug!(
                active = profile.len(),
                gross_loss = profile.gross_loss,
                "Skipping risk-of-ruin simulation: insufficient history."
            );
            return RiskOfRuin::not_simulated(thresholds);
        }

        let trials = self.settings.trials;
        let horizon = self.settings.horizon;

        let max_drawdowns: Vec<f64> = if self.settings.parallel {
            let base_seed = rng.next_u64();
            (0..trials)
                .into_par_iter()
                .map(|trial| {
                    let mut trial_rng = StdRng::seed_from_u64(trial_seed(base_seed, trial as u64));
                    simulate_trial(profile, horizon, &mut trial_rng)
                })
                .collect()
        } else {
            (0..trials)
                .map(|_| simulate_trial(profile, horizon, &mut *rng))
                .collect()
        };

        let probabilities = thresholds
            .iter()
            .map(|&threshold| {
                let hits = max_drawdowns.iter().filter(|&&dd| dd >= threshold).count();
                DrawdownProbability {
                    threshold,
                    probability: round_to(hits as f64 / trials as f64 * 100.0, 1),
                }
            })
            .collect();

        tracing::debug!(trials, horizon, parallel = self.settings.parallel, "Risk-of-ruin simulation complete.");

        RiskOfRuin { simulated: true, trials, horizon, probabilities }
    }

    /// Bootstraps `paths` cumulative equity paths from the historical results.
    ///
    /// Each path has as many points as there are historical results. Empty when
    /// the history has no more than `min_active_trades` results.
    pub fn resample_paths<R: Rng>(&self, profile: &ReturnProfile, rng: &mut R) -> Vec<Vec<f64>> {
        if !self.has_enough_history(profile) {
            return Vec::new();
        }

        let n = profile.len();
        (0..self.settings.paths)
            .map(|_| {
                let mut running = 0.0;
                (0..n)
                    .map(|_| {
                        running += profile.returns[rng.gen_range(0..n)];
                        round_to(running, 2)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Maximum peak-to-trough drawdown of one simulated sequence.
fn simulate_trial<R: Rng + ?Sized>(profile: &ReturnProfile, horizon: usize, rng: &mut R) -> f64 {
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;

    for _ in 0..horizon {
        let draw: f64 = rng.r#gen();
        // The remaining probability mass belongs to breakevens, which move nothing.
        if draw < profile.win_probability {
            equity += profile.avg_win;
        } else if draw < profile.win_probability + profile.loss_probability {
            equity += profile.avg_loss;
        }
        peak = peak.max(equity);
        max_drawdown = max_drawdown.max(peak - equity);
    }

    max_drawdown
}

/// SplitMix64 finalizer over the base seed and the trial index.
fn trial_seed(base: u64, trial: u64) -> u64 {
    let mut z = base ^ trial.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SimulationSettings {
        SimulationSettings { trials: 500, horizon: 100, ..Default::default() }
    }

    fn profile(returns: &[f64]) -> ReturnProfile {
        let wins: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
        let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let n = returns.len() as f64;
        ReturnProfile {
            returns: returns.to_vec(),
            win_probability: wins.len() as f64 / n,
            loss_probability: losses.len() as f64 / n,
            avg_win: wins.iter().sum::<f64>() / wins.len().max(1) as f64,
            avg_loss: losses.iter().sum::<f64>() / losses.len().max(1) as f64,
            gross_loss: losses.iter().sum::<f64>().abs(),
        }
    }

    fn mixed() -> ReturnProfile {
        profile(&[2.0, -1.0, 1.5, -1.0, -1.0, 3.0, -2.0, 0.5])
    }

    #[test]
    fn rejects_contract_violations() {
        let zero_trials = SimulationSettings { trials: 0, ..Default::default() };
        assert!(MonteCarloSimulator::new(zero_trials).is_err());
        let zero_horizon = SimulationSettings { horizon: 0, ..Default::default() };
        assert!(MonteCarloSimulator::new(zero_horizon).is_err());
    }

    #[test]
    fn thin_history_is_not_simulated() {
        let sim = MonteCarloSimulator::new(settings()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let few = profile(&[1.0, -1.0, 1.0]);
        let ruin = sim.risk_of_ruin(&few, &mut rng);
        assert!(!ruin.simulated);
        assert!(ruin.probabilities.iter().all(|p| p.probability == 0.0));
        assert_eq!(ruin.probabilities.len(), 3);
        assert!(sim.resample_paths(&few, &mut rng).is_empty());

        let no_losses = profile(&[1.0, 2.0, 1.0, 0.5, 1.0, 3.0]);
        assert!(!sim.risk_of_ruin(&no_losses, &mut rng).simulated);
    }

    #[test]
    fn probabilities_do_not_increase_with_threshold() {
        let sim = MonteCarloSimulator::new(SimulationSettings {
            drawdown_thresholds: vec![2.0, 5.0, 10.0, 20.0, 100.0],
            ..settings()
        })
        .unwrap();
        let ruin = sim.risk_of_ruin(&mixed(), &mut StdRng::seed_from_u64(42));
        assert!(ruin.simulated);
        let probs: Vec<f64> = ruin.probabilities.iter().map(|p| p.probability).collect();
        assert!(probs.windows(2).all(|w| w[0] >= w[1]), "{probs:?}");
        assert!(probs.iter().all(|p| (0.0..=100.0).contains(p)));
        assert!(probs[0] > 0.0);
    }

    #[test]
    fn always_losing_history_always_breaches() {
        let sim = MonteCarloSimulator::new(settings()).unwrap();
        let losing = profile(&[-1.0; 8]);
        let ruin = sim.risk_of_ruin(&losing, &mut StdRng::seed_from_u64(3));
        // 100 losses of 1% is exactly a 100% drawdown.
        assert_eq!(ruin.probability_at(10.0), Some(100.0));
        assert_eq!(ruin.probability_at(100.0), Some(100.0));
    }

    #[test]
    fn same_seed_same_result() {
        let sim = MonteCarloSimulator::new(settings()).unwrap();
        let a = sim.risk_of_ruin(&mixed(), &mut StdRng::seed_from_u64(9));
        let b = sim.risk_of_ruin(&mixed(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);

        let p1 = sim.resample_paths(&mixed(), &mut StdRng::seed_from_u64(9));
        let p2 = sim.resample_paths(&mixed(), &mut StdRng::seed_from_u64(9));
        assert_eq!(p1, p2);
    }

    #[test]
    fn parallel_trials_are_reproducible() {
        let sim = MonteCarloSimulator::new(SimulationSettings { parallel: true, ..settings() }).unwrap();
        let a = sim.risk_of_ruin(&mixed(), &mut StdRng::seed_from_u64(11));
        let b = sim.risk_of_ruin(&mixed(), &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
        assert!(a.simulated);
    }

    #[test]
    fn resampled_paths_draw_from_history() {
        let sim = MonteCarloSimulator::new(settings()).unwrap();
        let history = mixed();
        let paths = sim.resample_paths(&history, &mut StdRng::seed_from_u64(5));
        assert_eq!(paths.len(), 20);
        for path in &paths {
            assert_eq!(path.len(), history.len());
            let mut prev = 0.0;
            for &point in path {
                let step = round_to(point - prev, 2);
                assert!(history.returns.contains(&step), "step {step} not in history");
                prev = point;
            }
        }
    }
}
