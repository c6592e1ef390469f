//! Parameters handed to the external modeling and allocation engine

mod allocation;
mod hyperparams;

pub(crate) use allocation::{AllocationParams, DEFAULT_PLOT_FOLDER, parse_constraint_override};
pub(crate) use hyperparams::{
    ChannelHyperparameters, HyperParam, HyperparameterSet, ModelSettings, parse_range_override,
};

use crate::error::AppError;

/// Split `"<key>=<low>:<high>"` into its key and numeric pair
pub(crate) fn parse_keyed_pair(input: &str) -> Result<(&str, f64, f64), AppError> {
    let invalid = |reason: &str| AppError::InvalidRange {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let (key, pair) = input
        .split_once('=')
        .ok_or_else(|| invalid("expected <name>=<low>:<high>"))?;
    let (low, high) = pair
        .split_once(':')
        .ok_or_else(|| invalid("expected <low>:<high>"))?;
    let low: f64 = low.trim().parse().map_err(|_| invalid("low value is not a number"))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| invalid("high value is not a number"))?;
    if !low.is_finite() || !high.is_finite() {
        return Err(invalid("values must be finite"));
    }
    Ok((key.trim(), low, high))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_pair() {
        let (key, low, high) = parse_keyed_pair("sp_auto.alphas=0.5:2.5").unwrap();
        assert_eq!(key, "sp_auto.alphas");
        assert!((low - 0.5).abs() < 1e-12);
        assert!((high - 2.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_keyed_pair("sp_auto.alphas").is_err());
        assert!(parse_keyed_pair("sp_auto.alphas=0.5").is_err());
        assert!(parse_keyed_pair("sp_auto.alphas=a:1").is_err());
        assert!(parse_keyed_pair("sp_auto.alphas=1:NaN").is_err());
    }
}
