//! # Fatigue Policy: Configurable Limits
//!
//! Every numeric limit the evaluators apply lives in [`FatiguePolicy`].
//! `FatiguePolicy::default()` carries the RP-755 values. Deployments may
//! override individual limits from a YAML or JSON file; omitted fields
//! keep their defaults.
//!
//! ```yaml
//! max_shift_hours: 14
//! work_set_hours:
//!   outage: 182
//! ```
//!
//! A loaded policy must pass [`FatiguePolicy::validate`] before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection of an incoherent policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// A limit that must be positive was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Value received.
        value: f64,
    },

    /// Two limits are ordered the wrong way round.
    #[error("{lower} ({lower_value}) must not exceed {upper} ({upper_value})")]
    Misordered {
        /// Field expected to be the smaller.
        lower: &'static str,
        /// Its value.
        lower_value: f64,
        /// Field expected to be the larger.
        upper: &'static str,
        /// Its value.
        upper_value: f64,
    },

    /// A limit exceeded its ceiling (or was infinite).
    #[error("{field} must not exceed {max}, got {value}")]
    TooLarge {
        /// Offending field.
        field: &'static str,
        /// Value received.
        value: f64,
        /// Ceiling for the field.
        max: f64,
    },
}

/// Ceiling on `history_lookback_hours`: ten years.
pub const MAX_HISTORY_LOOKBACK_HOURS: f64 = 24.0 * 3_660.0;

/// Consecutive-shift limit for one shift-length tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsecutiveLimit {
    /// Maximum consecutive shifts in normal operations.
    pub normal: u32,
    /// Maximum consecutive shifts during an outage.
    pub outage: u32,
}

/// Consecutive-shift limits by candidate shift length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsecutiveLimits {
    /// Upper bound (inclusive) of the short tier, in hours.
    pub short_shift_hours: f64,
    /// Limits for shifts up to `short_shift_hours`.
    pub short: ConsecutiveLimit,
    /// Upper bound (inclusive) of the medium tier, in hours.
    pub medium_shift_hours: f64,
    /// Limits for shifts up to `medium_shift_hours`.
    pub medium: ConsecutiveLimit,
    /// Limits for anything longer (nominally 12h shifts).
    pub long: ConsecutiveLimit,
}

impl Default for ConsecutiveLimits {
    fn default() -> Self {
        Self {
            short_shift_hours: 8.0,
            short: ConsecutiveLimit { normal: 10, outage: 19 },
            medium_shift_hours: 10.0,
            medium: ConsecutiveLimit { normal: 9, outage: 14 },
            long: ConsecutiveLimit { normal: 7, outage: 14 },
        }
    }
}

impl ConsecutiveLimits {
    /// Maximum consecutive shifts permitted for a candidate of this length.
    pub fn max_for(&self, shift_hours: f64, is_outage: bool) -> u32 {
        let tier = if shift_hours <= self.short_shift_hours {
            self.short
        } else if shift_hours <= self.medium_shift_hours {
            self.medium
        } else {
            self.long
        };
        if is_outage {
            tier.outage
        } else {
            tier.normal
        }
    }
}

/// Cumulative-hour caps per work-set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkSetHourLimits {
    /// Cap when every shift in the work-set is a day shift.
    pub day_only: f64,
    /// Cap when the work-set contains any night shift.
    pub mixed: f64,
    /// Cap during an outage.
    pub outage: f64,
}

impl Default for WorkSetHourLimits {
    fn default() -> Self {
        Self {
            day_only: 105.0,
            mixed: 92.0,
            outage: 182.0,
        }
    }
}

/// All limits applied by the rule evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FatiguePolicy {
    /// Longest shift before an exception is required.
    pub max_shift_hours: f64,
    /// Shift length beyond which the shift is high-risk.
    pub high_risk_shift_hours: f64,
    /// Minimum rest between any two shifts.
    pub min_rest_hours: f64,
    /// Largest gap that keeps two shifts in the same consecutive chain.
    pub consecutive_gap_hours: f64,
    /// Rest that ends a work-set.
    pub work_set_rest_hours: f64,
    /// Rest that ends a work-set holding `night_shift_threshold` nights.
    pub extended_work_set_rest_hours: f64,
    /// Night shifts after which the extended rest applies.
    pub night_shift_threshold: usize,
    /// Extended (over `max_shift_hours`) shifts allowed per work-set.
    pub max_extended_shifts_per_work_set: usize,
    /// Consecutive-shift limits.
    pub consecutive: ConsecutiveLimits,
    /// Work-set hour caps.
    pub work_set_hours: WorkSetHourLimits,
    /// How far before a candidate's start history must be supplied.
    pub history_lookback_hours: f64,
}

impl Default for FatiguePolicy {
    fn default() -> Self {
        Self {
            max_shift_hours: 14.0,
            high_risk_shift_hours: 18.0,
            min_rest_hours: 8.0,
            consecutive_gap_hours: 24.0,
            work_set_rest_hours: 34.0,
            extended_work_set_rest_hours: 46.0,
            night_shift_threshold: 4,
            max_extended_shifts_per_work_set: 1,
            consecutive: ConsecutiveLimits::default(),
            work_set_hours: WorkSetHourLimits::default(),
            // 46h extended rest plus four weeks of continuous work-set.
            history_lookback_hours: 46.0 + 28.0 * 24.0,
        }
    }
}

impl FatiguePolicy {
    /// Rest required to end a work-set holding `night_shifts` nights.
    pub fn required_work_set_rest(&self, night_shifts: usize) -> f64 {
        if night_shifts >= self.night_shift_threshold {
            self.extended_work_set_rest_hours
        } else {
            self.work_set_rest_hours
        }
    }

    /// Check the policy for incoherent limits.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let positive = [
            ("max_shift_hours", self.max_shift_hours),
            ("high_risk_shift_hours", self.high_risk_shift_hours),
            ("min_rest_hours", self.min_rest_hours),
            ("consecutive_gap_hours", self.consecutive_gap_hours),
            ("work_set_rest_hours", self.work_set_rest_hours),
            ("extended_work_set_rest_hours", self.extended_work_set_rest_hours),
            ("consecutive.short_shift_hours", self.consecutive.short_shift_hours),
            ("consecutive.medium_shift_hours", self.consecutive.medium_shift_hours),
            ("work_set_hours.day_only", self.work_set_hours.day_only),
            ("work_set_hours.mixed", self.work_set_hours.mixed),
            ("work_set_hours.outage", self.work_set_hours.outage),
            ("history_lookback_hours", self.history_lookback_hours),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(PolicyError::NonPositive { field, value });
            }
        }

        if self.history_lookback_hours > MAX_HISTORY_LOOKBACK_HOURS {
            return Err(PolicyError::TooLarge {
                field: "history_lookback_hours",
                value: self.history_lookback_hours,
                max: MAX_HISTORY_LOOKBACK_HOURS,
            });
        }

        let ordered = [
            ("max_shift_hours", self.max_shift_hours, "high_risk_shift_hours", self.high_risk_shift_hours),
            ("min_rest_hours", self.min_rest_hours, "work_set_rest_hours", self.work_set_rest_hours),
            (
                "work_set_rest_hours",
                self.work_set_rest_hours,
                "extended_work_set_rest_hours",
                self.extended_work_set_rest_hours,
            ),
            (
                "consecutive.short_shift_hours",
                self.consecutive.short_shift_hours,
                "consecutive.medium_shift_hours",
                self.consecutive.medium_shift_hours,
            ),
            (
                "extended_work_set_rest_hours",
                self.extended_work_set_rest_hours,
                "history_lookback_hours",
                self.history_lookback_hours,
            ),
        ];
        for (lower, lower_value, upper, upper_value) in ordered {
            if lower_value > upper_value {
                return Err(PolicyError::Misordered {
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        FatiguePolicy::default().validate().unwrap();
    }

    #[test]
    fn consecutive_tiers() {
        let limits = ConsecutiveLimits::default();
        assert_eq!(limits.max_for(8.0, false), 10);
        assert_eq!(limits.max_for(8.0, true), 19);
        assert_eq!(limits.max_for(8.5, false), 9);
        assert_eq!(limits.max_for(10.0, true), 14);
        assert_eq!(limits.max_for(12.0, false), 7);
        assert_eq!(limits.max_for(12.0, true), 14);
    }

    #[test]
    fn required_rest_switches_at_threshold() {
        let policy = FatiguePolicy::default();
        assert_eq!(policy.required_work_set_rest(3), 34.0);
        assert_eq!(policy.required_work_set_rest(4), 46.0);
        assert_eq!(policy.required_work_set_rest(9), 46.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "max_shift_hours: 13\nwork_set_hours:\n  outage: 170\n";
        let policy: FatiguePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.max_shift_hours, 13.0);
        assert_eq!(policy.work_set_hours.outage, 170.0);
        assert_eq!(policy.work_set_hours.day_only, 105.0);
        assert_eq!(policy.min_rest_hours, 8.0);
        policy.validate().unwrap();
    }

    #[test]
    fn non_positive_limit_rejected() {
        let policy = FatiguePolicy {
            min_rest_hours: 0.0,
            ..FatiguePolicy::default()
        };
        assert_eq!(
            policy.validate(),
            Err(PolicyError::NonPositive {
                field: "min_rest_hours",
                value: 0.0
            })
        );
    }

    #[test]
    fn nan_limit_rejected() {
        let policy = FatiguePolicy {
            max_shift_hours: f64::NAN,
            ..FatiguePolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::NonPositive { field: "max_shift_hours", .. })
        ));
    }

    #[test]
    fn extended_rest_below_base_rest_rejected() {
        let policy = FatiguePolicy {
            extended_work_set_rest_hours: 30.0,
            ..FatiguePolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::Misordered { upper: "extended_work_set_rest_hours", .. })
        ));
    }

    #[test]
    fn unbounded_lookback_rejected() {
        for value in [1e300, f64::INFINITY] {
            let policy = FatiguePolicy {
                history_lookback_hours: value,
                ..FatiguePolicy::default()
            };
            assert!(matches!(
                policy.validate(),
                Err(PolicyError::TooLarge { field: "history_lookback_hours", .. })
            ));
        }
    }

    #[test]
    fn ten_year_lookback_accepted() {
        let policy = FatiguePolicy {
            history_lookback_hours: MAX_HISTORY_LOOKBACK_HOURS,
            ..FatiguePolicy::default()
        };
        policy.validate().unwrap();
    }
}
