use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

use super::parse_keyed_pair;

/// Budget channels offered to the allocator
pub(crate) const BUDGET_CHANNELS: &[&str] = &[
    "dsp_recruit_cost",
    "dsp_conversion_cost",
    "dsp_awareness_cost",
    "sd_recruit_cost",
    "sp_auto_cost",
    "sb_defend_cost",
    "sp_recruit_cost",
    "sp_attack_cost",
    "sp_defend_cost",
    "sb_recruit_cost",
    "sd_defend_cost",
    "sb_attack_cost",
    "sd_attack_cost",
];

/// Allowed lower-bound spend multipliers
pub(crate) const LOWER_BOUND_CHOICES: &[f64] = &[0.5, 1.0, 1.2, 1.5, 1.8];
/// Allowed upper-bound spend multipliers
pub(crate) const UPPER_BOUND_CHOICES: &[f64] = &[1.5, 2.0, 2.5, 2.8, 3.0];

pub(crate) const DEFAULT_TOTAL_BUDGET: u64 = 7_000_000;
pub(crate) const DEFAULT_PLOT_FOLDER: &str = "./plots";

fn default_date_range() -> [NaiveDate; 2] {
    [
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap_or_default(),
    ]
}

fn default_export() -> bool {
    true
}

fn is_allowed(value: f64, choices: &[f64]) -> bool {
    choices.iter().any(|c| (c - value).abs() < 1e-9)
}

fn format_choices(choices: &[f64]) -> String {
    let values: Vec<String> = choices.iter().map(|c| format!("{c:?}")).collect();
    format!("one of {}", values.join(", "))
}

/// Spend multiplier range for one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChannelConstraint {
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
}

impl Default for ChannelConstraint {
    fn default() -> Self {
        Self {
            lower_bound: LOWER_BOUND_CHOICES[0],
            upper_bound: UPPER_BOUND_CHOICES[0],
        }
    }
}

impl ChannelConstraint {
    /// Both bounds must come from the allowed multiplier sets.
    ///
    /// An upper bound at or below the lower bound is accepted with a warning.
    pub(crate) fn new(lower_bound: f64, upper_bound: f64) -> Result<Self, AppError> {
        if !is_allowed(lower_bound, LOWER_BOUND_CHOICES) {
            return Err(AppError::InvalidSetting {
                name: "lower_bound",
                value: lower_bound.to_string(),
                allowed: format_choices(LOWER_BOUND_CHOICES),
            });
        }
        if !is_allowed(upper_bound, UPPER_BOUND_CHOICES) {
            return Err(AppError::InvalidSetting {
                name: "upper_bound",
                value: upper_bound.to_string(),
                allowed: format_choices(UPPER_BOUND_CHOICES),
            });
        }
        if upper_bound <= lower_bound {
            warn!("upper bound {upper_bound} does not exceed lower bound {lower_bound}");
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }
}

/// Parse `--constraint <channel>=<lower>:<upper>`
pub(crate) fn parse_constraint_override(input: &str) -> Result<(String, ChannelConstraint), AppError> {
    let (channel, lower, upper) = parse_keyed_pair(input)?;
    if !BUDGET_CHANNELS.contains(&channel) {
        return Err(AppError::UnknownChannel {
            input: channel.to_string(),
        });
    }
    Ok((channel.to_string(), ChannelConstraint::new(lower, upper)?))
}

/// Contents of `allocation_params.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AllocationParams {
    pub(crate) model: String,
    #[serde(default = "default_date_range")]
    pub(crate) date_range: [NaiveDate; 2],
    pub(crate) total_budget: u64,
    /// Keyed in `BUDGET_CHANNELS` order
    pub(crate) channel_constraints: IndexMap<String, ChannelConstraint>,
    #[serde(default = "default_export")]
    pub(crate) export: bool,
}

impl AllocationParams {
    /// Defaults for every channel, bound to the selected model
    pub(crate) fn new(model: impl Into<String>) -> Self {
        let channel_constraints = BUDGET_CHANNELS
            .iter()
            .map(|c| (c.to_string(), ChannelConstraint::default()))
            .collect();
        Self {
            model: model.into(),
            date_range: default_date_range(),
            total_budget: DEFAULT_TOTAL_BUDGET,
            channel_constraints,
            export: default_export(),
        }
    }

    pub(crate) fn set_date_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
        if to < from {
            return Err(AppError::InvalidSetting {
                name: "date range",
                value: format!("{from}..{to}"),
                allowed: "a start on or before the end".to_string(),
            });
        }
        self.date_range = [from, to];
        Ok(())
    }

    pub(crate) fn set_constraint(&mut self, channel: &str, constraint: ChannelConstraint) -> Result<(), AppError> {
        let slot = self
            .channel_constraints
            .get_mut(channel)
            .ok_or_else(|| AppError::UnknownChannel {
                input: channel.to_string(),
            })?;
        *slot = constraint;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_channels() {
        let params = AllocationParams::new("5_228_6");
        assert_eq!(params.channel_constraints.len(), BUDGET_CHANNELS.len());
        assert_eq!(params.total_budget, 7_000_000);
        assert!(params.export);
        let c = params.channel_constraints["sp_recruit_cost"];
        assert_eq!(c.lower_bound, 0.5);
        assert_eq!(c.upper_bound, 1.5);
    }

    #[test]
    fn constraints_keep_channel_order() {
        let mut params = AllocationParams::new("m1");
        params
            .set_constraint("sb_attack_cost", ChannelConstraint::new(1.0, 2.0).unwrap())
            .unwrap();
        let keys: Vec<&str> = params.channel_constraints.keys().map(String::as_str).collect();
        assert_eq!(keys, BUDGET_CHANNELS);

        let json = serde_json::to_string(&params.channel_constraints).unwrap();
        let first = json.find("dsp_recruit_cost").unwrap();
        let last = json.find("sd_attack_cost").unwrap();
        assert!(first < last);
        assert!(matches!(
            params.set_constraint("tv_cost", ChannelConstraint::default()),
            Err(AppError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn json_round_trip_is_identical() {
        let raw = r#"{
            "model": "m1",
            "total_budget": 7000000,
            "export": true,
            "channel_constraints": {
                "sp_recruit_cost": {"lower_bound": 1.0, "upper_bound": 2.0}
            }
        }"#;
        let params: AllocationParams = serde_json::from_str(raw).unwrap();
        let written = serde_json::to_string_pretty(&params).unwrap();
        let back: AllocationParams = serde_json::from_str(&written).unwrap();
        assert_eq!(back, params);
        assert_eq!(back.model, "m1");
        assert_eq!(back.total_budget, 7_000_000);
        assert_eq!(back.channel_constraints["sp_recruit_cost"].upper_bound, 2.0);
    }

    #[test]
    fn date_range_serializes_as_iso_strings() {
        let params = AllocationParams::new("m1");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["date_range"][0], "2024-01-01");
        assert_eq!(value["date_range"][1], "2024-03-31");
    }

    #[test]
    fn constraint_values_must_be_allowed() {
        assert!(ChannelConstraint::new(1.2, 2.8).is_ok());
        assert!(ChannelConstraint::new(0.7, 2.0).is_err());
        assert!(ChannelConstraint::new(1.0, 4.0).is_err());
        // Inverted bounds are allowed through with a warning
        assert!(ChannelConstraint::new(1.8, 1.5).is_ok());
    }

    #[test]
    fn constraint_override_checks_channel() {
        let (channel, c) = parse_constraint_override("sb_attack_cost=1.5:3.0").unwrap();
        assert_eq!(channel, "sb_attack_cost");
        assert_eq!(c.lower_bound, 1.5);
        assert!(matches!(
            parse_constraint_override("tv_cost=1.0:2.0"),
            Err(AppError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn date_range_must_be_ordered() {
        let mut params = AllocationParams::new("m1");
        let a = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert!(params.set_date_range(a, b).is_err());
        assert!(params.set_date_range(b, a).is_ok());
        assert_eq!(params.date_range, [b, a]);
    }
}
