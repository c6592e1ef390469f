//! Model-run folder discovery
//!
//! The external modeling engine writes one timestamped folder per run. This
//! module finds those folders, orders them for selection and sorts the chart
//! images inside a chosen folder.

mod artifacts;
mod scanner;
mod selector;

pub(crate) use artifacts::{RunArtifacts, classify_run, model_id};
pub(crate) use scanner::scan_run_folders;
pub(crate) use selector::RunSelector;
