mod format;
mod hyperparams;
mod results;
mod runs;
mod session;
mod upload;

pub(crate) use format::print_json;
pub(crate) use hyperparams::{print_curves, print_hyperparameters};
pub(crate) use results::{output_results_json, print_results};
pub(crate) use runs::{print_charts_table, print_runs_table};
pub(crate) use session::{output_session_json, print_session};
pub(crate) use upload::print_upload_report;
