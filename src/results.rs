//! Allocation results written by the allocator into a run folder

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::RESULTS_FILE;
use crate::error::AppError;

const CHANNEL_COLUMN: &str = "channels";
const TOTAL_RESPONSE_COLUMN: &str = "optmResponseUnitTotalUnbound";
const ROI_COLUMN: &str = "optmRoiUnitUnbound";
const LIFT_COLUMN: &str = "optmResponseUnitLiftUnbound";

pub(crate) fn results_path(run_dir: &Path) -> PathBuf {
    run_dir.join(RESULTS_FILE)
}

/// Raw results table
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AllocationResults {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

/// Per-channel figures behind the contribution, ROI and lift views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ChannelSummary {
    pub(crate) channel: String,
    pub(crate) total_response: Option<f64>,
    pub(crate) roi: Option<f64>,
    pub(crate) lift: Option<f64>,
}

impl AllocationResults {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// One entry per row; `None` without a `channels` column
    pub(crate) fn channel_summary(&self) -> Option<Vec<ChannelSummary>> {
        let channel_idx = self.column(CHANNEL_COLUMN)?;
        let total_idx = self.column(TOTAL_RESPONSE_COLUMN);
        let roi_idx = self.column(ROI_COLUMN);
        let lift_idx = self.column(LIFT_COLUMN);

        let number = |row: &[String], idx: Option<usize>| -> Option<f64> {
            let value = row.get(idx?)?.trim();
            value.parse::<f64>().ok().filter(|v| v.is_finite())
        };

        Some(
            self.rows
                .iter()
                .map(|row| ChannelSummary {
                    channel: row.get(channel_idx).cloned().unwrap_or_default(),
                    total_response: number(row.as_slice(), total_idx),
                    roi: number(row.as_slice(), roi_idx),
                    lift: number(row.as_slice(), lift_idx),
                })
                .collect(),
        )
    }
}

pub(crate) fn load_results(path: &Path) -> Result<AllocationResults, AppError> {
    if !path.is_file() {
        return Err(AppError::MissingResultsFile {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::Reader::from_path(path)?;
    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(AllocationResults { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_results(&results_path(dir.path())),
            Err(AppError::MissingResultsFile { .. })
        ));
    }

    #[test]
    fn summarizes_known_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = results_path(dir.path());
        std::fs::write(
            &path,
            "channels,constr_low,optmResponseUnitTotalUnbound,optmRoiUnitUnbound,optmResponseUnitLiftUnbound\n\
             sp_auto_cost,0.5,1200.5,2.1,0.15\n\
             sb_attack_cost,0.5,NA,1.4,0.02\n",
        )
        .unwrap();

        let results = load_results(&path).unwrap();
        assert_eq!(results.rows.len(), 2);
        let summary = results.channel_summary().unwrap();
        assert_eq!(
            summary[0],
            ChannelSummary {
                channel: "sp_auto_cost".to_string(),
                total_response: Some(1200.5),
                roi: Some(2.1),
                lift: Some(0.15),
            }
        );
        assert_eq!(summary[1].total_response, None);
    }

    #[test]
    fn no_summary_without_channel_column() {
        let results = AllocationResults {
            columns: vec!["a".to_string()],
            rows: vec![vec!["1".to_string()]],
        };
        assert!(results.channel_summary().is_none());
    }
}
