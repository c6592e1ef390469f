use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::consts::COUNTRY_NOT_SPECIFIED;
use crate::error::AppError;
use crate::model::{AllocationParams, HyperparameterSet, ModelSettings};

/// Floats keep a decimal point ("1.0", not "1") for the downstream reader
fn float_field(value: f64) -> String {
    format!("{value:?}")
}

/// Booleans are spelled the way the allocator scripts expect
fn bool_field(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn create(path: &Path) -> Result<csv::Writer<File>, AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| AppError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Writer::from_writer(file))
}

fn finish<W: Write>(mut writer: csv::Writer<W>, path: &Path) -> Result<(), AppError> {
    writer.flush().map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_hyperparameter_rows<W: Write>(
    set: &HyperparameterSet,
    writer: &mut csv::Writer<W>,
) -> Result<(), AppError> {
    writer.write_record(["variable_name", "min_value", "max_value"])?;
    for (name, min, max) in set.rows() {
        writer.write_record([name, float_field(min), float_field(max)])?;
    }
    Ok(())
}

/// Write one row per `<ad_type>_<param>` range
pub(crate) fn write_hyperparameters_csv(path: &Path, set: &HyperparameterSet) -> Result<(), AppError> {
    let mut writer = create(path)?;
    write_hyperparameter_rows(set, &mut writer)?;
    finish(writer, path)
}

pub(crate) fn write_model_settings_rows<W: Write>(
    settings: &ModelSettings,
    country: Option<&str>,
    customer: Option<&str>,
    writer: &mut csv::Writer<W>,
) -> Result<(), AppError> {
    writer.write_record(["parameter", "value"])?;
    writer.write_record(["iterations", &settings.iterations.to_string()])?;
    writer.write_record(["trials", &settings.trials.to_string()])?;
    writer.write_record(["ts_validation", bool_field(settings.ts_validation)])?;
    writer.write_record(["country", country.unwrap_or(COUNTRY_NOT_SPECIFIED)])?;
    writer.write_record(["cust", customer.unwrap_or("")])?;
    Ok(())
}

/// Write run-level settings, one row per parameter
pub(crate) fn write_model_settings_csv(
    path: &Path,
    settings: &ModelSettings,
    country: Option<&str>,
    customer: Option<&str>,
) -> Result<(), AppError> {
    let mut writer = create(path)?;
    write_model_settings_rows(settings, country, customer, &mut writer)?;
    finish(writer, path)
}

/// Write the single-row `budget_params.csv` read by the allocator script
pub(crate) fn write_budget_params_csv(
    path: &Path,
    params: &AllocationParams,
    plot_folder: &str,
) -> Result<(), AppError> {
    let mut writer = create(path)?;
    writer.write_record([
        "model",
        "date_range",
        "total_budget",
        "channel_constraints",
        "export",
        "plot_folder",
    ])?;
    let date_range = serde_json::to_string(&params.date_range)?;
    let constraints = serde_json::to_string(&params.channel_constraints)?;
    writer.write_record([
        params.model.as_str(),
        &date_range,
        &params.total_budget.to_string(),
        &constraints,
        bool_field(params.export),
        plot_folder,
    ])?;
    finish(writer, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllocationParams;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut csv::Writer<&mut Vec<u8>>) -> Result<(), AppError>,
    {
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            f(&mut writer).unwrap();
            writer.flush().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn hyperparameter_csv_layout() {
        let out = render(|w| write_hyperparameter_rows(&HyperparameterSet::default(), w));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "variable_name,min_value,max_value");
        assert_eq!(lines[1], "dsp_recruit_alphas,1.0,2.0");
        assert_eq!(lines[2], "dsp_recruit_gammas,0.5,0.7");
        assert_eq!(lines.len(), 1 + 39);
    }

    #[test]
    fn model_settings_csv_layout() {
        let settings = ModelSettings {
            iterations: 4000,
            trials: 7,
            ts_validation: true,
        };
        let out = render(|w| write_model_settings_rows(&settings, Some("UK"), Some("mars-pne"), w));
        assert_eq!(
            out,
            "parameter,value\niterations,4000\ntrials,7\nts_validation,True\ncountry,UK\ncust,mars-pne\n"
        );
    }

    #[test]
    fn model_settings_without_country() {
        let out = render(|w| write_model_settings_rows(&ModelSettings::default(), None, None, w));
        assert!(out.contains("country,Not specified\n"));
        assert!(out.ends_with("cust,\n"));
    }

    #[test]
    fn budget_params_quotes_embedded_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget_params.csv");
        let params = AllocationParams::new("5_228_6");
        write_budget_params_csv(&path, &params, "./plots").unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["model", "date_range", "total_budget", "channel_constraints", "export", "plot_folder"]
        );
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "5_228_6");
        assert_eq!(&row[1], r#"["2024-01-01","2024-03-31"]"#);
        assert_eq!(&row[2], "7000000");
        let constraints: serde_json::Value = serde_json::from_str(&row[3]).unwrap();
        assert_eq!(constraints["sd_attack_cost"]["upper_bound"], 1.5);
        assert_eq!(&row[4], "True");
        assert_eq!(&row[5], "./plots");
    }
}
