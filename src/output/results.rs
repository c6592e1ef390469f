use comfy_table::{Cell, Color};
use serde::Serialize;

use crate::error::AppError;
use crate::model::AllocationParams;
use crate::results::{AllocationResults, ChannelSummary};

use super::format::{
    create_styled_table, format_number, format_value, header_cell, key_value_table, print_json,
    right_cell,
};

#[derive(Serialize)]
struct ResultsJson<'a> {
    allocation: Option<&'a AllocationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<&'a [ChannelSummary]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<&'a AllocationResults>,
}

fn print_allocation(params: &AllocationParams, use_color: bool) {
    let rows = [
        ("Model", params.model.clone()),
        (
            "Total budget",
            format_number(i64::try_from(params.total_budget).unwrap_or(i64::MAX)),
        ),
        (
            "Date range",
            format!("{} to {}", params.date_range[0], params.date_range[1]),
        ),
        ("Export", params.export.to_string()),
    ];
    println!("{}", key_value_table(&rows, use_color));
}

fn print_channel_summary(summary: &[ChannelSummary], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Channel", use_color),
        header_cell("Total response", use_color),
        header_cell("ROI", use_color),
        header_cell("Lift", use_color),
    ]);

    let roi_color = if use_color { Some(Color::Green) } else { None };
    for channel in summary {
        table.add_row(vec![
            Cell::new(&channel.channel),
            right_cell(&format_value(channel.total_response, 2), None, false),
            right_cell(&format_value(channel.roi, 2), roi_color, false),
            right_cell(&format_value(channel.lift, 4), None, false),
        ]);
    }
    println!("{table}");
}

fn print_raw_results(results: &AllocationResults, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(
        results
            .columns
            .iter()
            .map(|c| header_cell(c, use_color))
            .collect::<Vec<_>>(),
    );
    for row in &results.rows {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    println!("{table}");
}

pub(crate) fn print_results(
    params: Option<&AllocationParams>,
    results: &AllocationResults,
    use_color: bool,
) {
    if let Some(params) = params {
        print_allocation(params, use_color);
    }
    match results.channel_summary() {
        Some(summary) => print_channel_summary(&summary, use_color),
        None => print_raw_results(results, use_color),
    }
}

pub(crate) fn output_results_json(
    params: Option<&AllocationParams>,
    results: &AllocationResults,
) -> Result<(), AppError> {
    let summary = results.channel_summary();
    print_json(&ResultsJson {
        allocation: params,
        channels: summary.as_deref(),
        table: if summary.is_none() { Some(results) } else { None },
    })
}
