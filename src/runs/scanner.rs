use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::consts::RUN_TIMESTAMP_FORMAT;
use crate::error::AppError;

/// A model-run output folder named `<prefix>_<YYYYMMDDHHMM>[_<suffix>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunFolder {
    pub(crate) name: String,
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) path: PathBuf,
}

/// Parse the timestamp carried in the second `_`-separated segment of a folder name.
///
/// The segment must be exactly twelve ASCII digits forming a valid
/// `YYYYMMDDHHMM` date-time.
pub(crate) fn parse_run_timestamp(name: &str) -> Option<NaiveDateTime> {
    let segment = name.split('_').nth(1)?;
    if segment.len() != 12 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(segment, RUN_TIMESTAMP_FORMAT).ok()
}

/// List the run folders directly under `root`, in directory listing order.
///
/// Subdirectories without a parseable timestamp are skipped. A missing root is
/// reported as [`AppError::MissingRunsRoot`] so the caller can show a message
/// and carry on with nothing to select.
pub(crate) fn scan_run_folders(root: &Path) -> Result<Vec<RunFolder>, AppError> {
    if !root.is_dir() {
        return Err(AppError::MissingRunsRoot {
            path: root.to_path_buf(),
        });
    }
    let base = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let entries = fs::read_dir(&base).map_err(|source| AppError::Read {
        path: base.clone(),
        source,
    })?;

    let mut folders = Vec::new();
    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        match parse_run_timestamp(&name) {
            Some(timestamp) => folders.push(RunFolder {
                path: base.join(&name),
                name,
                timestamp,
            }),
            None => debug!("Skipping folder without run timestamp: {name}"),
        }
    }

    debug!("Found {} run folders in {}", folders.len(), base.display());
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_second_segment() {
        assert_eq!(
            parse_run_timestamp("robyn_202403011530"),
            Some(ts(2024, 3, 1, 15, 30))
        );
        assert_eq!(
            parse_run_timestamp("robyn_202401010000_init"),
            Some(ts(2024, 1, 1, 0, 0))
        );
    }

    #[test]
    fn rejects_names_without_timestamp() {
        assert_eq!(parse_run_timestamp("plots"), None);
        assert_eq!(parse_run_timestamp("robyn_latest"), None);
        assert_eq!(parse_run_timestamp("202401010000_robyn"), None);
        assert_eq!(parse_run_timestamp("robyn_20240101"), None);
        assert_eq!(parse_run_timestamp("robyn_2024010100001"), None);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_run_timestamp("robyn_202413010000"), None);
        assert_eq!(parse_run_timestamp("robyn_202402301200"), None);
        assert_eq!(parse_run_timestamp("robyn_202401012460"), None);
    }

    #[test]
    fn scan_skips_files_and_unparseable_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("robyn_202401010000")).unwrap();
        fs::create_dir(dir.path().join("robyn_202402010000_rerun")).unwrap();
        fs::create_dir(dir.path().join("scratch")).unwrap();
        fs::write(dir.path().join("notes_202403010000"), "not a folder").unwrap();

        let mut names: Vec<_> = scan_run_folders(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["robyn_202401010000", "robyn_202402010000_rerun"]);
    }

    #[test]
    fn scan_returns_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("robyn_202401010000")).unwrap();
        let folders = scan_run_folders(dir.path()).unwrap();
        assert_eq!(folders.len(), 1);
        assert!(folders[0].path.is_absolute());
        assert!(folders[0].path.ends_with("robyn_202401010000"));
    }

    #[test]
    fn scan_reports_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("mars-pne_uk");
        assert!(matches!(
            scan_run_folders(&missing),
            Err(AppError::MissingRunsRoot { .. })
        ));
    }
}
