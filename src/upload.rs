//! Upload validation
//!
//! Checks a spend/conversion CSV or Excel sheet before it is handed to the modeling engine.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use serde::Serialize;

use crate::consts::{COUNTRY_NOT_SPECIFIED, DATE_FORMAT, REQUIRED_COLUMNS};
use crate::error::AppError;

const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct UploadReport {
    pub(crate) columns: Vec<String>,
    pub(crate) row_count: usize,
    pub(crate) preview: Vec<Vec<String>>,
    /// Distinct `country` values in first-seen order; empty without the column
    pub(crate) countries: Vec<String>,
    pub(crate) missing: Vec<String>,
}

impl UploadReport {
    pub(crate) fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub(crate) fn has_country_column(&self) -> bool {
        self.columns.iter().any(|c| c == "country")
    }

    /// Pick the session country: an explicit choice must exist in the data
    pub(crate) fn choose_country(&self, requested: Option<&str>) -> Result<String, AppError> {
        match requested {
            Some(country) if self.countries.iter().any(|c| c == country) => Ok(country.to_string()),
            Some(country) => Err(AppError::InvalidSetting {
                name: "country",
                value: country.to_string(),
                allowed: if self.countries.is_empty() {
                    "present in the upload".to_string()
                } else {
                    format!("one of {}", self.countries.join(", "))
                },
            }),
            None => Ok(self
                .countries
                .first()
                .cloned()
                .unwrap_or_else(|| COUNTRY_NOT_SPECIFIED.to_string())),
        }
    }
}

/// Required columns absent from `columns`, in required-list order
pub(crate) fn missing_columns(columns: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !columns.iter().any(|c| c.as_str() == **name))
        .map(|name| name.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadFormat {
    Csv,
    Spreadsheet,
}

impl UploadFormat {
    fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Collects rows into a report as they are read
struct ReportBuilder {
    report: UploadReport,
    country_idx: Option<usize>,
}

impl ReportBuilder {
    fn new(columns: Vec<String>) -> Self {
        let country_idx = columns.iter().position(|c| c == "country");
        let report = UploadReport {
            missing: missing_columns(&columns, REQUIRED_COLUMNS),
            columns,
            ..UploadReport::default()
        };
        Self { report, country_idx }
    }

    fn push(&mut self, row: Vec<String>) {
        let report = &mut self.report;
        report.row_count += 1;
        if let Some(idx) = self.country_idx
            && let Some(country) = row.get(idx)
        {
            let country = country.trim();
            if !country.is_empty() && !report.countries.iter().any(|c| c == country) {
                report.countries.push(country.to_string());
            }
        }
        if report.preview.len() < PREVIEW_ROWS {
            report.preview.push(row);
        }
    }

    fn finish(self) -> UploadReport {
        self.report
    }
}

/// Read an upload and report what is missing.
///
/// CSV files and the first sheet of an Excel workbook are accepted.
pub(crate) fn load_upload(path: &Path) -> Result<UploadReport, AppError> {
    match UploadFormat::detect(path) {
        Some(UploadFormat::Csv) => load_csv(path),
        Some(UploadFormat::Spreadsheet) => load_spreadsheet(path),
        None => Err(AppError::UnsupportedUpload {
            path: path.to_path_buf(),
        }),
    }
}

fn load_csv(path: &Path) -> Result<UploadReport, AppError> {
    let parse_err = |source: csv::Error| AppError::UploadParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(parse_err)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut builder = ReportBuilder::new(columns);
    for record in reader.records() {
        let record = record.map_err(parse_err)?;
        builder.push(record.iter().map(str::to_string).collect());
    }
    Ok(builder.finish())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}

fn load_spreadsheet(path: &Path) -> Result<UploadReport, AppError> {
    let parse_err = |source: calamine::Error| AppError::SpreadsheetParse {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(parse_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::EmptySpreadsheet {
            path: path.to_path_buf(),
        })?
        .map_err(parse_err)?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .ok_or_else(|| AppError::EmptySpreadsheet {
            path: path.to_path_buf(),
        })?
        .iter()
        .map(|cell| cell_text(cell).trim().to_string())
        .collect();

    let mut builder = ReportBuilder::new(columns);
    for row in rows {
        // Blank rows inside the used range are not data
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        builder.push(row.iter().map(cell_text).collect());
    }
    Ok(builder.finish())
}
