use serde::Serialize;

use crate::error::AppError;
use crate::session::{SessionState, View};

use super::format::{format_number, key_value_table, print_json};

/// Session snapshot as printed by `session show --json`
#[derive(Serialize)]
struct SessionSummary<'a> {
    session: &'a str,
    page_title: &'a str,
    view: &'a str,
    run_label: Option<&'a str>,
    customers: &'a [String],
    #[serde(flatten)]
    state: &'a SessionState,
}

fn view_name(view: View) -> &'static str {
    match view {
        View::Page(page) => page.id(),
        View::AllocationResults => "allocation_results",
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub(crate) fn print_session(
    session: &str,
    state: &SessionState,
    run_label: Option<&str>,
    customers: &[String],
    use_color: bool,
) {
    let view = match state.view() {
        View::AllocationResults => "Allocation results".to_string(),
        View::Page(page) => page.title().to_string(),
    };
    let allocation = state.allocation.as_ref().map(|a| {
        format!(
            "{} / {} budget / {} to {}",
            a.model,
            format_number(i64::try_from(a.total_budget).unwrap_or(i64::MAX)),
            a.date_range[0],
            a.date_range[1]
        )
    });
    let rows = [
        ("Session", session.to_string()),
        ("Page", state.page.id().to_string()),
        ("Showing", view),
        ("Customer", or_dash(state.customer.as_deref())),
        ("Country", or_dash(state.country.as_deref())),
        (
            "Run",
            or_dash(run_label.or(state.selected_run.as_deref())),
        ),
        ("Model", or_dash(state.selected_model.as_deref())),
        ("Iterations", state.settings.iterations.to_string()),
        ("Trials", state.settings.trials.to_string()),
        ("TS validation", state.settings.ts_validation.to_string()),
        (
            "Hyperparameters",
            if state.hyperparameters.is_some() {
                "customized".to_string()
            } else {
                "defaults".to_string()
            },
        ),
        ("Allocation", or_dash(allocation.as_deref())),
        ("Known customers", customers.join(", ")),
    ];
    println!("{}", key_value_table(&rows, use_color));
}

pub(crate) fn output_session_json(
    session: &str,
    state: &SessionState,
    run_label: Option<&str>,
    customers: &[String],
) -> Result<(), AppError> {
    print_json(&SessionSummary {
        session,
        page_title: state.page.title(),
        view: view_name(state.view()),
        run_label,
        customers,
        state,
    })
}
