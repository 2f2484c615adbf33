use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, PieceSeed, ROWS};

/// Tunable rules of a game.
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes. Unknown keys are rejected.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tetrimino_engine::GameConfig;
///
/// let config = GameConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.gravity_interval(0), Duration::from_millis(500));
/// assert!(config.gravity_interval(1) < config.gravity_interval(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Gravity interval at level 0, in milliseconds.
    pub base_step_ms: u64,
    /// Factor applied to the gravity interval for every level.
    pub decay: f64,
    /// Points per successful soft drop step.
    pub soft_drop_bonus: usize,
    /// Points per hard drop.
    pub hard_drop_bonus: usize,
    /// Seconds counted down before the first piece spawns.
    pub countdown_secs: i64,
    /// Gravity steps a piece may take before it locks.
    pub steps_per_piece: usize,
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_step_ms: 500,
            decay: 0.66,
            soft_drop_bonus: 1,
            hard_drop_bonus: 20,
            countdown_secs: 3,
            steps_per_piece: ROWS,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_step_ms == 0 {
            return Err(ConfigError::ZeroBaseStep);
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(ConfigError::DecayOutOfRange { decay: self.decay });
        }
        if self.countdown_secs < 0 {
            return Err(ConfigError::NegativeCountdown {
                secs: self.countdown_secs,
            });
        }
        if self.steps_per_piece == 0 {
            return Err(ConfigError::ZeroStepsPerPiece);
        }
        Ok(())
    }

    /// Returns the time between two gravity steps at `level`, in seconds.
    ///
    /// `base_step * decay^level`, strictly decreasing with the level.
    #[must_use]
    pub fn gravity_interval_secs(&self, level: usize) -> f64 {
        let exp = i32::try_from(level).unwrap_or(i32::MAX);
        #[expect(clippy::cast_precision_loss)]
        let base = self.base_step_ms as f64 / 1000.0;
        base * self.decay.powi(exp)
    }

    /// Returns [`GameConfig::gravity_interval_secs`] as a [`Duration`].
    ///
    /// The duration is rounded to whole nanoseconds, so very high levels
    /// reach zero; a [`Clock`](crate::Clock) never runs faster than
    /// [`MIN_INTERVAL`](crate::MIN_INTERVAL).
    #[must_use]
    pub fn gravity_interval(&self, level: usize) -> Duration {
        Duration::from_secs_f64(self.gravity_interval_secs(level))
    }

    /// Returns the countdown length, treating negative values as none.
    #[must_use]
    pub fn countdown(&self) -> u64 {
        u64::try_from(self.countdown_secs).unwrap_or(0)
    }
}
