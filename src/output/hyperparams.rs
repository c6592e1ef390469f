use comfy_table::Cell;

use crate::model::{ChannelHyperparameters, HyperParam, HyperparameterSet, ModelSettings};

use super::format::{create_styled_table, format_value, header_cell, right_cell};

pub(crate) fn print_hyperparameters(set: &HyperparameterSet, settings: &ModelSettings, use_color: bool) {
    let mut table = create_styled_table();
    let mut header = vec![header_cell("Ad type", use_color)];
    for param in HyperParam::ALL {
        header.push(header_cell(&format!("{param} min"), use_color));
        header.push(header_cell(&format!("{param} max"), use_color));
    }
    table.set_header(header);

    for channel in &set.channels {
        let mut row = vec![Cell::new(&channel.ad_type)];
        for param in HyperParam::ALL {
            let range = channel.ranges.get(param);
            row.push(right_cell(&format_value(Some(range.min), 2), None, false));
            row.push(right_cell(&format_value(Some(range.max), 2), None, false));
        }
        table.add_row(row);
    }
    println!("{table}");
    println!(
        "Iterations: {}  Trials: {}  Time-series validation: {}",
        settings.iterations, settings.trials, settings.ts_validation
    );
}

/// Adstock and response previews side by side
pub(crate) fn print_curves(ad_type: &str, ranges: &ChannelHyperparameters, use_color: bool) {
    println!(
        "{ad_type}: alpha {:.3}, gamma {:.3}, theta {:.3} (range midpoints)",
        ranges.alphas.midpoint(),
        ranges.gammas.midpoint(),
        ranges.thetas.midpoint()
    );

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Period", use_color),
        header_cell("Adstock", use_color),
        header_cell("Response", use_color),
    ]);
    let adstock = ranges.adstock_preview();
    let response = ranges.response_preview();
    for (i, (a, r)) in adstock.iter().zip(&response).enumerate() {
        table.add_row(vec![
            right_cell(&i.to_string(), None, false),
            right_cell(&format_value(Some(*a), 4), None, false),
            right_cell(&format_value(Some(*r), 4), None, false),
        ]);
    }
    println!("{table}");
}
