//! Files handed to the external modeling and allocation process

mod json;
mod tabular;

pub(crate) use json::{read_allocation_json, write_allocation_json};
pub(crate) use tabular::{write_budget_params_csv, write_hyperparameters_csv, write_model_settings_csv};
