use std::path::PathBuf;

use thiserror::Error;

use crate::session::Page;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("The directory '{}' does not exist. Please check the path.", path.display())]
    MissingRunsRoot { path: PathBuf },

    #[error("No run folder matches \"{input}\"")]
    UnknownRun { input: String },

    #[error("Model \"{model}\" is not a model-run image in {run}")]
    UnknownModel { model: String, run: String },

    #[error("No model selected. Run `mmmdash select <RUN> --model <ID>` first.")]
    NoModelSelected,

    #[error("No run folder selected. Run `mmmdash select <RUN>` first.")]
    NoRunSelected,

    #[error("Allocation results are open. Run `mmmdash session close-results` first.")]
    ResultsViewOpen,

    #[error("The results file '{}' does not exist.", path.display())]
    MissingResultsFile { path: PathBuf },

    #[error("Unsupported upload \"{}\" (expected a .csv, .xlsx or .xls file)", path.display())]
    UnsupportedUpload { path: PathBuf },

    #[error("Failed to parse {}: {source}", path.display())]
    UploadParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read spreadsheet {}: {source}", path.display())]
    SpreadsheetParse {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Spreadsheet {} has no header row", path.display())]
    EmptySpreadsheet { path: PathBuf },

    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("This step needs the {required} page, but the session is on {current}")]
    WrongPage { current: Page, required: Page },

    #[error("Unknown ad type: {input}")]
    UnknownAdType { input: String },

    #[error("Unknown channel: {input}")]
    UnknownChannel { input: String },

    #[error("Invalid range \"{input}\": {reason}")]
    InvalidRange { input: String, reason: String },

    #[error("{name} must be {allowed}, got {value}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid session id \"{input}\" (letters, digits, '-' and '_' only)")]
    InvalidSessionId { input: String },

    #[error("Customer name must not be empty")]
    EmptyCustomer,

    #[error("Allocator command is empty")]
    EmptyAllocatorCommand,

    #[error("Allocator \"{program}\" not found")]
    AllocatorNotFound { program: String },

    #[error("Failed to run allocator: {0}")]
    AllocatorSpawn(std::io::Error),

    #[error("Allocator exited with {status}: {stderr}")]
    AllocatorFailed { status: String, stderr: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
