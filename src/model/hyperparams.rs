//! Hyperparameter ranges per ad type
//!
//! Ranges bound the search of the external fitting engine: `alphas` is the
//! decay rate, `gammas` the saturation and `thetas` the adstock scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::parse_keyed_pair;

/// Ad types in export order
pub(crate) const AD_TYPES: &[&str] = &[
    "dsp_recruit",
    "dsp_conversion",
    "dsp_awareness",
    "sd_recruit",
    "sd_defend",
    "sd_attack",
    "sp_auto",
    "sp_recruit",
    "sp_attack",
    "sp_defend",
    "sb_defend",
    "sb_recruit",
    "sb_attack",
];

/// Points in the illustrative adstock and response curves
pub(crate) const CURVE_LENGTH: usize = 30;

const ITERATIONS_MIN: u32 = 2000;
const ITERATIONS_MAX: u32 = 10_000;
const ITERATIONS_STEP: u32 = 100;
const TRIALS_MIN: u32 = 5;
const TRIALS_MAX: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HyperParam {
    Alphas,
    Gammas,
    Thetas,
}

impl HyperParam {
    pub(crate) const ALL: [HyperParam; 3] = [HyperParam::Alphas, HyperParam::Gammas, HyperParam::Thetas];

    pub(crate) fn name(self) -> &'static str {
        match self {
            HyperParam::Alphas => "alphas",
            HyperParam::Gammas => "gammas",
            HyperParam::Thetas => "thetas",
        }
    }

    /// Global slider bounds
    pub(crate) fn bounds(self) -> (f64, f64) {
        match self {
            HyperParam::Alphas => (0.1, 3.0),
            HyperParam::Gammas | HyperParam::Thetas => (0.0, 1.0),
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alphas" | "alpha" => Some(HyperParam::Alphas),
            "gammas" | "gamma" => Some(HyperParam::Gammas),
            "thetas" | "theta" => Some(HyperParam::Thetas),
            _ => None,
        }
    }
}

impl fmt::Display for HyperParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive `(min, max)` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct ParamRange {
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl ParamRange {
    const fn of(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Checked constructor: `min <= max`, both within the parameter's bounds
    pub(crate) fn new(param: HyperParam, min: f64, max: f64) -> Result<Self, String> {
        let (lo, hi) = param.bounds();
        if min > max {
            return Err(format!("min {min} is greater than max {max}"));
        }
        if min < lo || max > hi {
            return Err(format!("{param} must stay within {lo}..={hi}"));
        }
        Ok(Self { min, max })
    }

    pub(crate) fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChannelHyperparameters {
    pub(crate) alphas: ParamRange,
    pub(crate) gammas: ParamRange,
    pub(crate) thetas: ParamRange,
}

impl ChannelHyperparameters {
    const fn of(alphas: (f64, f64), gammas: (f64, f64), thetas: (f64, f64)) -> Self {
        Self {
            alphas: ParamRange::of(alphas.0, alphas.1),
            gammas: ParamRange::of(gammas.0, gammas.1),
            thetas: ParamRange::of(thetas.0, thetas.1),
        }
    }

    /// Starting ranges for an ad type, grouped by network
    pub(crate) fn defaults_for(ad_type: &str) -> Option<Self> {
        let ranges = match ad_type {
            "dsp_recruit" => Self::of((1.0, 2.0), (0.5, 0.7), (0.2, 0.4)),
            "dsp_conversion" | "dsp_awareness" => Self::of((0.5, 2.0), (0.4, 0.5), (0.1, 0.3)),
            "sd_recruit" | "sd_defend" | "sd_attack" => {
                Self::of((0.5, 1.0), (0.2, 0.4), (0.1, 0.3))
            }
            "sp_auto" | "sp_recruit" | "sp_attack" | "sp_defend" => {
                Self::of((0.5, 3.0), (0.6, 0.9), (0.0, 0.3))
            }
            "sb_defend" | "sb_recruit" | "sb_attack" => {
                Self::of((1.1, 1.8), (0.4, 0.5), (0.0, 0.1))
            }
            _ => return None,
        };
        Some(ranges)
    }

    pub(crate) fn get(&self, param: HyperParam) -> ParamRange {
        match param {
            HyperParam::Alphas => self.alphas,
            HyperParam::Gammas => self.gammas,
            HyperParam::Thetas => self.thetas,
        }
    }

    pub(crate) fn set(&mut self, param: HyperParam, range: ParamRange) {
        match param {
            HyperParam::Alphas => self.alphas = range,
            HyperParam::Gammas => self.gammas = range,
            HyperParam::Thetas => self.thetas = range,
        }
    }

    /// Adstock curve at the alpha midpoint, scaled by the theta midpoint
    pub(crate) fn adstock_preview(&self) -> Vec<f64> {
        adstock_curve(self.alphas.midpoint(), self.thetas.midpoint(), CURVE_LENGTH)
    }

    /// Response curve at the gamma midpoint, scaled by the theta midpoint
    pub(crate) fn response_preview(&self) -> Vec<f64> {
        response_curve(self.gammas.midpoint(), self.thetas.midpoint(), CURVE_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AdTypeRanges {
    pub(crate) ad_type: String,
    #[serde(flatten)]
    pub(crate) ranges: ChannelHyperparameters,
}

/// Ranges for every ad type, kept in [`AD_TYPES`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct HyperparameterSet {
    pub(crate) channels: Vec<AdTypeRanges>,
}

impl Default for HyperparameterSet {
    fn default() -> Self {
        let channels = AD_TYPES
            .iter()
            .filter_map(|ad_type| {
                ChannelHyperparameters::defaults_for(ad_type).map(|ranges| AdTypeRanges {
                    ad_type: ad_type.to_string(),
                    ranges,
                })
            })
            .collect();
        Self { channels }
    }
}

impl HyperparameterSet {
    pub(crate) fn get(&self, ad_type: &str) -> Option<&ChannelHyperparameters> {
        self.channels
            .iter()
            .find(|c| c.ad_type == ad_type)
            .map(|c| &c.ranges)
    }

    pub(crate) fn set(
        &mut self,
        ad_type: &str,
        param: HyperParam,
        range: ParamRange,
    ) -> Result<(), AppError> {
        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.ad_type == ad_type)
            .ok_or_else(|| AppError::UnknownAdType {
                input: ad_type.to_string(),
            })?;
        channel.ranges.set(param, range);
        Ok(())
    }

    /// Flattened `(variable_name, min, max)` rows, e.g. `("dsp_recruit_alphas", 1.0, 2.0)`
    pub(crate) fn rows(&self) -> Vec<(String, f64, f64)> {
        let mut rows = Vec::with_capacity(self.channels.len() * HyperParam::ALL.len());
        for channel in &self.channels {
            for param in HyperParam::ALL {
                let range = channel.ranges.get(param);
                rows.push((format!("{}_{}", channel.ad_type, param), range.min, range.max));
            }
        }
        rows
    }
}

/// Parse `--set <ad_type>.<param>=<min>:<max>`
pub(crate) fn parse_range_override(input: &str) -> Result<(String, HyperParam, ParamRange), AppError> {
    let (key, min, max) = parse_keyed_pair(input)?;
    let invalid = |reason: String| AppError::InvalidRange {
        input: input.to_string(),
        reason,
    };
    let (ad_type, param) = key
        .rsplit_once('.')
        .ok_or_else(|| invalid("expected <ad_type>.<param>".to_string()))?;
    if !AD_TYPES.contains(&ad_type) {
        return Err(AppError::UnknownAdType {
            input: ad_type.to_string(),
        });
    }
    let param = HyperParam::parse(param)
        .ok_or_else(|| invalid(format!("unknown parameter \"{param}\"")))?;
    let range = ParamRange::new(param, min, max).map_err(invalid)?;
    Ok((ad_type.to_string(), param, range))
}

/// Geometric decay `scale * alpha^i`
pub(crate) fn adstock_curve(alpha: f64, scale: f64, length: usize) -> Vec<f64> {
    (0..length).map(|i| scale * alpha.powi(i as i32)).collect()
}

/// Saturating response `scale * (1 - e^(-gamma * i))`
pub(crate) fn response_curve(gamma: f64, scale: f64, length: usize) -> Vec<f64> {
    (0..length)
        .map(|i| scale * (1.0 - (-gamma * i as f64).exp()))
        .collect()
}

/// Run-level settings for the fitting engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ModelSettings {
    pub(crate) iterations: u32,
    pub(crate) trials: u32,
    pub(crate) ts_validation: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            iterations: ITERATIONS_MIN,
            trials: 10,
            ts_validation: false,
        }
    }
}

impl ModelSettings {
    pub(crate) fn set_iterations(&mut self, iterations: u32) -> Result<(), AppError> {
        if !(ITERATIONS_MIN..=ITERATIONS_MAX).contains(&iterations)
            || iterations % ITERATIONS_STEP != 0
        {
            return Err(AppError::InvalidSetting {
                name: "iterations",
                value: iterations.to_string(),
                allowed: format!(
                    "between {ITERATIONS_MIN} and {ITERATIONS_MAX} in steps of {ITERATIONS_STEP}"
                ),
            });
        }
        self.iterations = iterations;
        Ok(())
    }

    pub(crate) fn set_trials(&mut self, trials: u32) -> Result<(), AppError> {
        if !(TRIALS_MIN..=TRIALS_MAX).contains(&trials) {
            return Err(AppError::InvalidSetting {
                name: "trials",
                value: trials.to_string(),
                allowed: format!("between {TRIALS_MIN} and {TRIALS_MAX}"),
            });
        }
        self.trials = trials;
        Ok(())
    }
}
