use std::collections::HashMap;

use serde::Serialize;

use crate::consts::RUN_LABEL_FORMAT;

use super::scanner::RunFolder;

/// A run folder with its display label
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunEntry {
    pub(crate) label: String,
    pub(crate) folder: String,
    pub(crate) run_on: String,
    #[serde(skip)]
    pub(crate) run: RunFolder,
}

/// Run folders ordered newest first, addressable by label or folder name
#[derive(Debug, Default)]
pub(crate) struct RunSelector {
    entries: Vec<RunEntry>,
    by_label: HashMap<String, usize>,
    by_folder: HashMap<String, usize>,
}

impl RunSelector {
    /// Build a selector from scanner output.
    ///
    /// The sort is stable, so runs sharing a timestamp keep the scanner's order.
    pub(crate) fn new(mut folders: Vec<RunFolder>) -> Self {
        folders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut selector = Self::default();
        for run in folders {
            let run_on = run.timestamp.format(RUN_LABEL_FORMAT).to_string();
            let label = format!("{} (Run on: {run_on})", run.name);
            let idx = selector.entries.len();
            selector.by_label.insert(label.clone(), idx);
            selector.by_folder.entry(run.name.clone()).or_insert(idx);
            selector.entries.push(RunEntry {
                label,
                folder: run.name.clone(),
                run_on,
                run,
            });
        }
        selector
    }

    pub(crate) fn entries(&self) -> &[RunEntry] {
        &self.entries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default selection: the most recent run
    pub(crate) fn latest(&self) -> Option<&RunFolder> {
        self.entries.first().map(|e| &e.run)
    }

    /// Resolve a display label or a raw folder name to its run folder
    pub(crate) fn resolve(&self, key: &str) -> Option<&RunFolder> {
        self.by_label
            .get(key)
            .or_else(|| self.by_folder.get(key))
            .map(|&idx| &self.entries[idx].run)
    }

    pub(crate) fn label_for(&self, folder: &str) -> Option<&str> {
        self.by_folder
            .get(folder)
            .map(|&idx| self.entries[idx].label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::scanner::parse_run_timestamp;
    use std::path::PathBuf;

    fn run(name: &str) -> RunFolder {
        RunFolder {
            name: name.to_string(),
            timestamp: parse_run_timestamp(name).unwrap(),
            path: PathBuf::from("/runs").join(name),
        }
    }

    #[test]
    fn orders_newest_first() {
        let selector = RunSelector::new(vec![
            run("r_202401010000"),
            run("r_202403010000"),
            run("r_202402010000"),
        ]);
        let folders: Vec<_> = selector.entries().iter().map(|e| e.folder.as_str()).collect();
        assert_eq!(
            folders,
            vec!["r_202403010000", "r_202402010000", "r_202401010000"]
        );
        assert_eq!(selector.latest().unwrap().name, "r_202403010000");
    }

    #[test]
    fn equal_timestamps_keep_scan_order() {
        let selector = RunSelector::new(vec![
            run("b_202401010000"),
            run("a_202401010000"),
            run("c_202402010000"),
        ]);
        let folders: Vec<_> = selector.entries().iter().map(|e| e.folder.as_str()).collect();
        assert_eq!(
            folders,
            vec!["c_202402010000", "b_202401010000", "a_202401010000"]
        );
    }

    #[test]
    fn label_round_trips_to_folder() {
        let selector = RunSelector::new(vec![run("robyn_202403011530_final")]);
        let label = selector.label_for("robyn_202403011530_final").unwrap();
        assert_eq!(label, "robyn_202403011530_final (Run on: 2024-03-01 15:30)");
        assert_eq!(
            selector.resolve(label).unwrap().path,
            PathBuf::from("/runs/robyn_202403011530_final")
        );
    }

    #[test]
    fn resolves_raw_folder_name() {
        let selector = RunSelector::new(vec![run("r_202401010000")]);
        assert!(selector.resolve("r_202401010000").is_some());
        assert!(selector.resolve("r_202401010001").is_none());
    }

    #[test]
    fn empty_selector_has_no_default() {
        let selector = RunSelector::new(Vec::new());
        assert!(selector.is_empty());
        assert!(selector.latest().is_none());
    }
}
