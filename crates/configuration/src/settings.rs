use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the analytics toolchain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationSettings,
    pub report: ReportSettings,
}

/// Contains parameters for the Monte Carlo simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of independent risk-of-ruin trials.
    pub trials: usize,
    /// Number of sequential trades drawn per trial.
    pub horizon: usize,
    /// Number of resampled equity paths produced for charting.
    pub paths: usize,
    /// Simulations only run with strictly more active trades than this.
    pub min_active_trades: usize,
    /// Drawdown levels, in percent of account, whose exceedance probability is reported.
    pub drawdown_thresholds: Vec<f64>,
    /// Spread the risk-of-ruin trials over the rayon thread pool.
    pub parallel: bool,
    /// Seed used by the CLI when none is passed on the command line.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: 1000,
            horizon: 100,
            paths: 20,
            min_active_trades: 5,
            drawdown_thresholds: vec![10.0, 20.0, 100.0],
            parallel: false,
            seed: None,
        }
    }
}

/// Contains parameters for report assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Number of points in the linear equity projection.
    pub projection_points: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { projection_points: 20 }
    }
}

/// Command-line overrides for the simulation section.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Debug, Clone, Default)]
pub struct SimulationOverrides {
    /// Number of risk-of-ruin trials.
    #[cfg_attr(feature = "clap", arg(long))]
    pub trials: Option<usize>,
    /// Trades drawn per risk-of-ruin trial.
    #[cfg_attr(feature = "clap", arg(long))]
    pub horizon: Option<usize>,
    /// Number of resampled equity paths.
    #[cfg_attr(feature = "clap", arg(long))]
    pub paths: Option<usize>,
    /// Seed for the random number generator.
    #[cfg_attr(feature = "clap", arg(long))]
    pub seed: Option<u64>,
    /// Run the risk-of-ruin trials on all cores.
    #[cfg_attr(feature = "clap", arg(long))]
    pub parallel: bool,
}

impl Config {
    /// Rejects settings that indicate misuse rather than sparse data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        if self.report.projection_points == 0 {
            return Err(ConfigError::ValidationError(
                "report.projection_points must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: &SimulationOverrides) {
        let sim = &mut self.simulation;
        if let Some(trials) = overrides.trials {
            sim.trials = trials;
        }
        if let Some(horizon) = overrides.horizon {
            sim.horizon = horizon;
        }
        if let Some(paths) = overrides.paths {
            sim.paths = paths;
        }
        if overrides.seed.is_some() {
            sim.seed = overrides.seed;
        }
        if overrides.parallel {
            sim.parallel = true;
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.trials must be greater than 0".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.horizon must be greater than 0".to_string(),
            ));
        }
        if self.paths == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.paths must be greater than 0".to_string(),
            ));
        }
        if let Some(bad) = self
            .drawdown_thresholds
            .iter()
            .find(|t| !t.is_finite() || **t <= 0.0)
        {
            return Err(ConfigError::ValidationError(format!(
                "simulation.drawdown_thresholds must be positive numbers, got {bad}"
            )));
        }
        Ok(())
    }
}
